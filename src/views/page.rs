use chrono::NaiveDate;
use handlebars::{Handlebars, RenderError, TemplateError};
use log::debug;
use serde::Serialize;

use crate::models::travel_plan::TravelPlan;
use crate::views::map::{coordinate_listing, MapView};

const PLAN_PAGE: &str = "plan_page";
const PLAN_PAGE_TEMPLATE: &str = include_str!("templates/plan_page.hbs");

/// Timings and layout used by the in-page PDF export.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportSettings {
    pub style_settle_ms: u32,
    pub tile_settle_ms: u32,
    pub tile_timeout_ms: u32,
    pub page_format: &'static str,
    pub orientation: &'static str,
    pub margin_mm: u32,
    pub image_type: &'static str,
    pub image_quality: f64,
    pub file_name: String,
}

impl ExportSettings {
    pub fn new(file_name: String) -> Self {
        Self {
            style_settle_ms: 1000,
            tile_settle_ms: 5000,
            tile_timeout_ms: 3000,
            page_format: "a4",
            orientation: "portrait",
            margin_mm: 10,
            image_type: "JPEG",
            image_quality: 0.8,
            file_name,
        }
    }
}

/// `<destination>-itinerary-<YYYY-MM-DD>.pdf`, with the destination reduced
/// to characters that are safe in file names.
pub fn export_file_name(destination: &str, date: NaiveDate) -> String {
    let mut slug = String::with_capacity(destination.len());
    for c in destination.trim().chars() {
        if c.is_alphanumeric() || c == '_' {
            slug.push(c);
        } else if (c.is_whitespace() || c == '-') && !slug.ends_with('-') && !slug.is_empty() {
            slug.push('-');
        }
    }
    let slug = slug.trim_end_matches('-');
    let slug = if slug.is_empty() { "trip" } else { slug };
    format!("{}-itinerary-{}.pdf", slug, date.format("%Y-%m-%d"))
}

/// JSON for embedding inside a `<script>` element.
pub fn script_json<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    Ok(serde_json::to_string(value)?
        .replace('<', "\\u003c")
        .replace('>', "\\u003e")
        .replace('&', "\\u0026"))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StopContext<'a> {
    position: u32,
    name: &'a str,
    description: &'a str,
    visit_time: &'a str,
    duration: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PageContext<'a> {
    destination: &'a str,
    start_date: String,
    end_date: String,
    mode: &'static str,
    stops: Vec<StopContext<'a>>,
    coordinate_lines: Vec<String>,
    map_json: String,
    export_json: String,
}

#[derive(Debug, thiserror::Error)]
pub enum PageError {
    #[error("failed to serialize page data: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to render page: {0}")]
    Render(#[from] RenderError),
}

/// Renders the public, read-only itinerary page.
pub struct PageRenderer {
    hbs: Handlebars<'static>,
}

impl PageRenderer {
    pub fn new() -> Result<Self, TemplateError> {
        let mut hbs = Handlebars::new();
        hbs.register_template_string(PLAN_PAGE, PLAN_PAGE_TEMPLATE)?;
        Ok(Self { hbs })
    }

    /// `today` dates the exported file name.
    pub fn render_plan(&self, plan: &TravelPlan, today: NaiveDate) -> Result<String, PageError> {
        let map = MapView::from_attractions(&plan.attractions);
        let export = ExportSettings::new(export_file_name(&plan.destination, today));

        let context = PageContext {
            destination: &plan.destination,
            start_date: plan.start_date.to_string(),
            end_date: plan.end_date.to_string(),
            mode: plan.mode.label(),
            stops: plan
                .attractions
                .iter()
                .map(|a| StopContext {
                    position: a.position,
                    name: &a.name,
                    description: &a.description,
                    visit_time: &a.visit_time,
                    duration: &a.duration,
                })
                .collect(),
            coordinate_lines: coordinate_listing(&plan.attractions),
            map_json: script_json(&map)?,
            export_json: script_json(&export)?,
        };

        debug!(
            "Rendering page for plan {} ({} markers)",
            plan.id,
            map.markers.len()
        );
        Ok(self.hbs.render(PLAN_PAGE, &context)?)
    }
}

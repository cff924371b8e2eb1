use serde::Serialize;

use crate::models::travel_plan::Attraction;

pub const DEFAULT_CENTER: LatLng = LatLng {
    lat: 40.7128,
    lng: -74.0060,
};
pub const DEFAULT_ZOOM: u8 = 13;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Bounds {
    pub south_west: LatLng,
    pub north_east: LatLng,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapMarker {
    pub position: u32,
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    pub visit_time: String,
    pub duration: String,
}

/// Everything the page script needs to draw the route map.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapView {
    pub center: LatLng,
    pub zoom: u8,
    pub bounds: Option<Bounds>,
    pub markers: Vec<MapMarker>,
    /// Marker coordinates in visit order, for the connecting polyline.
    pub path: Vec<LatLng>,
}

impl MapView {
    /// Expects attractions already in visit order. Stops with out-of-range
    /// coordinates get no marker; their numbering is kept for the rest.
    pub fn from_attractions(attractions: &[Attraction]) -> Self {
        let markers: Vec<MapMarker> = attractions
            .iter()
            .filter(|a| {
                LatLng {
                    lat: a.latitude,
                    lng: a.longitude,
                }
                .is_valid()
            })
            .map(|a| MapMarker {
                position: a.position,
                name: a.name.clone(),
                lat: a.latitude,
                lng: a.longitude,
                visit_time: a.visit_time.clone(),
                duration: a.duration.clone(),
            })
            .collect();

        let path: Vec<LatLng> = markers
            .iter()
            .map(|m| LatLng {
                lat: m.lat,
                lng: m.lng,
            })
            .collect();

        let bounds = path.split_first().map(|(first, rest)| {
            rest.iter().fold(
                Bounds {
                    south_west: *first,
                    north_east: *first,
                },
                |b, p| Bounds {
                    south_west: LatLng {
                        lat: b.south_west.lat.min(p.lat),
                        lng: b.south_west.lng.min(p.lng),
                    },
                    north_east: LatLng {
                        lat: b.north_east.lat.max(p.lat),
                        lng: b.north_east.lng.max(p.lng),
                    },
                },
            )
        });

        MapView {
            center: path.first().copied().unwrap_or(DEFAULT_CENTER),
            zoom: DEFAULT_ZOOM,
            bounds,
            markers,
            path,
        }
    }
}

/// Plain-text stand-in for the live map in exported documents: numbered
/// name, coordinates to 4 decimals, then visit time and duration.
pub fn coordinate_listing(attractions: &[Attraction]) -> Vec<String> {
    attractions
        .iter()
        .map(|a| {
            let mut line = format!(
                "{}. {} \u{2014} {:.4}, {:.4}",
                a.position, a.name, a.latitude, a.longitude
            );
            let details: Vec<&str> = [a.visit_time.as_str(), a.duration.as_str()]
                .into_iter()
                .filter(|s| !s.trim().is_empty())
                .collect();
            if !details.is_empty() {
                line.push_str(" (");
                line.push_str(&details.join(", "));
                line.push(')');
            }
            line
        })
        .collect()
}

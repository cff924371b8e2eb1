mod common;

use actix_web::{http::header, test};
use serde_json::{json, Value};

use common::{
    attraction, bearer, tokyo_request, StubGenerator, TestApp, INSERT_FAILURE_DETAIL,
};

#[actix_rt::test]
async fn test_create_plan_flattens_days_into_positions() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;
    let token = test_app.token_for("user-1");

    let req = test::TestRequest::post()
        .uri("/plans")
        .insert_header(bearer(&token))
        .set_json(tokyo_request())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 201);

    let plan: Value = test::read_body_json(resp).await;
    assert_eq!(plan["destination"], "Tokyo");
    assert_eq!(plan["userId"], "user-1");
    assert_eq!(plan["mode"], "NORMAL");
    assert_eq!(plan["status"], "PRIVATE");

    let attractions = plan["attractions"].as_array().unwrap();
    let orders: Vec<u64> = attractions.iter().map(|a| a["order"].as_u64().unwrap()).collect();
    assert_eq!(orders, vec![1, 2, 3, 4, 5, 6]);
    let names: Vec<&str> = attractions.iter().map(|a| a["name"].as_str().unwrap()).collect();
    assert_eq!(
        names,
        vec![
            "Senso-ji",
            "Tokyo Skytree",
            "Ueno Park",
            "Meiji Jingu",
            "Shibuya Crossing",
            "Tokyo Tower"
        ]
    );
    assert_eq!(test_app.store.plan_count().await, 1);

    let prompts = test_app.generator.prompts();
    assert!(prompts[0].contains("2-day trip to Tokyo"));
    assert!(prompts[0].contains("local cuisine"));
}

#[actix_rt::test]
async fn test_empty_model_response_is_a_server_error() {
    let test_app = TestApp::with_generator(StubGenerator::replying("{}"));
    let app = test::init_service(test_app.create_app()).await;
    let token = test_app.token_for("user-1");

    let req = test::TestRequest::post()
        .uri("/plans")
        .insert_header(bearer(&token))
        .set_json(tokyo_request())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 500);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Failed to generate travel plan");
    assert_eq!(test_app.store.plan_count().await, 0);
}

#[actix_rt::test]
async fn test_upstream_failure_is_a_server_error() {
    let test_app = TestApp::with_generator(StubGenerator::failing());
    let app = test::init_service(test_app.create_app()).await;
    let token = test_app.token_for("user-1");

    let req = test::TestRequest::post()
        .uri("/plans")
        .insert_header(bearer(&token))
        .set_json(tokyo_request())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 500);
    assert_eq!(test_app.store.plan_count().await, 0);
}

#[actix_rt::test]
async fn test_storage_failure_is_a_generic_server_error() {
    let test_app = TestApp::with_failing_inserts();
    let app = test::init_service(test_app.create_app()).await;
    let token = test_app.token_for("user-1");

    let req = test::TestRequest::post()
        .uri("/plans")
        .insert_header(bearer(&token))
        .set_json(tokyo_request())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 500);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "error": "Failed to generate travel plan" }));
    assert!(!body.to_string().contains(INSERT_FAILURE_DETAIL));
    assert_eq!(test_app.generator.call_count(), 1);
    assert_eq!(test_app.store.plan_count().await, 0);
}

#[actix_rt::test]
async fn test_bare_array_response_is_accepted() {
    let reply = json!([
        attraction("Louvre", 48.8606, 2.3376, "Day 1, 09:00"),
        attraction("Eiffel Tower", 48.8584, 2.2945, "Day 1, 14:00")
    ])
    .to_string();
    let test_app = TestApp::with_generator(StubGenerator::replying(reply));
    let app = test::init_service(test_app.create_app()).await;
    let token = test_app.token_for("user-1");

    let req = test::TestRequest::post()
        .uri("/plans")
        .insert_header(bearer(&token))
        .set_json(json!({
            "destination": "Paris",
            "startDate": "2024-07-10",
            "endDate": "2024-07-10",
            "mode": "LEISURE"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 201);

    let plan: Value = test::read_body_json(resp).await;
    assert_eq!(plan["attractions"][1]["name"], "Eiffel Tower");
    assert_eq!(plan["attractions"][1]["order"], 2);
    assert!(test_app.generator.prompts()[0].contains("1-day trip to Paris"));
}

#[actix_rt::test]
async fn test_missing_fields_are_rejected_before_generation() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;
    let token = test_app.token_for("user-1");

    let req = test::TestRequest::post()
        .uri("/plans")
        .insert_header(bearer(&token))
        .set_json(json!({ "destination": "Tokyo", "startDate": "2024-05-01" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Missing required fields");
    assert_eq!(test_app.generator.call_count(), 0);
}

#[actix_rt::test]
async fn test_invalid_dates_and_modes_are_rejected() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;
    let token = test_app.token_for("user-1");

    for body in [
        json!({ "destination": "Tokyo", "startDate": "May 1st", "endDate": "2024-05-03", "mode": "balanced" }),
        json!({ "destination": "Tokyo", "startDate": "2024-05-03", "endDate": "2024-05-01", "mode": "balanced" }),
        json!({ "destination": "Tokyo", "startDate": "2024-05-01", "endDate": "2024-05-03", "mode": "sprint" }),
    ] {
        let req = test::TestRequest::post()
            .uri("/plans")
            .insert_header(bearer(&token))
            .set_json(body)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400);
    }
    assert_eq!(test_app.generator.call_count(), 0);
}

#[actix_rt::test]
async fn test_malformed_json_body_is_rejected() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;
    let token = test_app.token_for("user-1");

    let req = test::TestRequest::post()
        .uri("/plans")
        .insert_header(bearer(&token))
        .insert_header((header::CONTENT_TYPE, "application/json"))
        .set_payload("{\"destination\": ")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Invalid request body");
}

#[actix_rt::test]
async fn test_plans_require_authentication() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::post()
        .uri("/plans")
        .set_json(tokyo_request())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 401);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Unauthorized");

    let req = test::TestRequest::get()
        .uri("/plans")
        .insert_header(bearer("not-a-jwt"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 401);

    assert_eq!(test_app.generator.call_count(), 0);
}

#[actix_rt::test]
async fn test_get_plan_round_trip_and_owner_scoping() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;
    let owner = test_app.token_for("owner");
    let stranger = test_app.token_for("stranger");

    let req = test::TestRequest::post()
        .uri("/plans")
        .insert_header(bearer(&owner))
        .set_json(tokyo_request())
        .to_request();
    let created: Value = test::call_and_read_body_json(&app, req).await;
    let id = created["id"].as_str().unwrap();

    let req = test::TestRequest::get()
        .uri(&format!("/plans/{}", id))
        .insert_header(bearer(&owner))
        .to_request();
    let fetched: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(fetched["attractions"], created["attractions"]);

    let req = test::TestRequest::get()
        .uri(&format!("/plans/{}", id))
        .insert_header(bearer(&stranger))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Travel plan not found");

    let req = test::TestRequest::get()
        .uri("/plans/does-not-exist")
        .insert_header(bearer(&owner))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);
}

#[actix_rt::test]
async fn test_list_plans_newest_first() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;
    let token = test_app.token_for("user-1");
    let other = test_app.token_for("user-2");

    let mut ids = Vec::new();
    for destination in ["Kyoto", "Osaka"] {
        let mut body = tokyo_request();
        body["destination"] = json!(destination);
        let req = test::TestRequest::post()
            .uri("/plans")
            .insert_header(bearer(&token))
            .set_json(body)
            .to_request();
        let created: Value = test::call_and_read_body_json(&app, req).await;
        ids.push(created["id"].as_str().unwrap().to_string());
    }

    let req = test::TestRequest::get()
        .uri("/plans")
        .insert_header(bearer(&token))
        .to_request();
    let plans: Vec<Value> = test::call_and_read_body_json(&app, req).await;
    let listed: Vec<&str> = plans.iter().map(|p| p["id"].as_str().unwrap()).collect();
    assert_eq!(listed, vec![ids[1].as_str(), ids[0].as_str()]);
    assert_eq!(plans[0]["attractions"][0]["order"], 1);

    let req = test::TestRequest::get()
        .uri("/plans")
        .insert_header(bearer(&other))
        .to_request();
    let plans: Vec<Value> = test::call_and_read_body_json(&app, req).await;
    assert!(plans.is_empty());
}

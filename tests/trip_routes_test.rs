mod common;

use actix_web::test;
use serde_json::{json, Value};

use common::{stop_ids, stop_json, trip_id, trip_json, TestApp};

#[actix_web::test]
async fn test_health_endpoint() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["services"]["trip_store"]["status"], "ok");
}

#[actix_web::test]
async fn test_create_and_get_trip() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::post()
        .uri("/api/trips")
        .set_json(trip_json())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 201);

    let created: Value = test::read_body_json(resp).await;
    let id = trip_id(&created);
    assert_eq!(created["stats"]["stopCount"], 3);
    assert_eq!(created["tags"], json!(["food", "tram"]));
    assert_eq!(created["visibility"], "public");
    let orders: Vec<i64> = created["stops"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["order"].as_i64().unwrap())
        .collect();
    assert_eq!(orders, vec![1, 2, 3]);

    let req = test::TestRequest::get()
        .uri(&format!("/api/trips/{}", id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());
    let loaded: Value = test::read_body_json(resp).await;
    assert_eq!(loaded, created);
}

#[actix_web::test]
async fn test_add_and_reorder_stops() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::post()
        .uri("/api/trips")
        .set_json(trip_json())
        .to_request();
    let created: Value = test::call_and_read_body_json(&app, req).await;
    let id = trip_id(&created);

    let req = test::TestRequest::post()
        .uri(&format!("/api/trips/{}/stops", id))
        .set_json(stop_json("Sintra", 38.7979, -9.3906))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 201);
    let trip: Value = test::read_body_json(resp).await;
    let mut ids = stop_ids(&trip);
    assert_eq!(ids.len(), 4);

    ids.reverse();
    let req = test::TestRequest::put()
        .uri(&format!("/api/trips/{}/stops/reorder", id))
        .set_json(json!({ "stopIds": ids }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());
    let trip: Value = test::read_body_json(resp).await;
    assert_eq!(stop_ids(&trip), ids);
    assert_eq!(trip["stops"][0]["order"], 1);
    assert_eq!(trip["stops"][0]["name"], "Sintra");
}

#[actix_web::test]
async fn test_reorder_with_unknown_stop_is_unprocessable() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::post()
        .uri("/api/trips")
        .set_json(trip_json())
        .to_request();
    let created: Value = test::call_and_read_body_json(&app, req).await;
    let id = trip_id(&created);
    let mut ids = stop_ids(&created);
    ids[0] = -5;

    let req = test::TestRequest::put()
        .uri(&format!("/api/trips/{}/stops/reorder", id))
        .set_json(json!({ "stopIds": ids }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 422);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], "INTEGRITY_ERROR");
}

#[actix_web::test]
async fn test_invalid_trip_is_rejected() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;

    let mut trip = trip_json();
    trip["stops"][1]["coordinates"]["lat"] = json!(123.0);

    let req = test::TestRequest::post()
        .uri("/api/trips")
        .set_json(trip)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert!(body["field"].as_str().unwrap().starts_with("stops[1]"));
    assert!(test_app.service.store().is_empty().await);
}

#[actix_web::test]
async fn test_route_to_unknown_stop_is_unprocessable() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::post()
        .uri("/api/trips")
        .set_json(trip_json())
        .to_request();
    let created: Value = test::call_and_read_body_json(&app, req).await;
    let id = trip_id(&created);
    let ids = stop_ids(&created);

    let req = test::TestRequest::post()
        .uri(&format!("/api/trips/{}/routes", id))
        .set_json(json!({ "fromStopId": ids[0], "toStopId": 424242, "transportMode": "car" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 422);

    let req = test::TestRequest::post()
        .uri(&format!("/api/trips/{}/routes", id))
        .set_json(json!({ "fromStopId": ids[0], "toStopId": ids[1], "transportMode": "car" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 201);
    let trip: Value = test::read_body_json(resp).await;
    assert!(trip["routes"][0]["id"].is_string());
    assert!(trip["routes"][0]["distance"].as_f64().unwrap() > 0.0);
    assert_eq!(trip["stats"]["transportModes"], json!(["car"]));
}

#[actix_web::test]
async fn test_stop_status_and_stats() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::post()
        .uri("/api/trips")
        .set_json(trip_json())
        .to_request();
    let created: Value = test::call_and_read_body_json(&app, req).await;
    let id = trip_id(&created);
    let first = stop_ids(&created)[0];

    let req = test::TestRequest::put()
        .uri(&format!("/api/trips/{}/stops/{}/status", id, first))
        .set_json(json!({ "status": "completed" }))
        .to_request();
    let trip: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(trip["stops"][0]["status"], "completed");
    assert_eq!(trip["stops"][0]["isCompleted"], true);

    let req = test::TestRequest::get()
        .uri(&format!("/api/trips/{}/stats", id))
        .to_request();
    let stats: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(stats["stopCount"], 3);
    assert_eq!(stats["estimatedDuration"], 180);
}

#[actix_web::test]
async fn test_discover_and_owner_listing() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;

    let mut private_trip = trip_json();
    private_trip["isPublic"] = json!(false);
    private_trip["name"] = json!("Private Lisbon");
    for trip in [trip_json(), private_trip] {
        let req = test::TestRequest::post()
            .uri("/api/trips")
            .set_json(trip)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 201);
    }

    let req = test::TestRequest::get()
        .uri("/api/trips?search=lisbon&category=cultural")
        .to_request();
    let found: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(found.as_array().unwrap().len(), 1);
    assert_eq!(found[0]["name"], "Lisbon long weekend");

    let req = test::TestRequest::get()
        .uri("/api/users/owner-1/trips")
        .to_request();
    let owned: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(owned.as_array().unwrap().len(), 2);
}

#[actix_web::test]
async fn test_copy_template() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;

    let mut template = trip_json();
    template["isTemplate"] = json!(true);
    let req = test::TestRequest::post()
        .uri("/api/trips")
        .set_json(template)
        .to_request();
    let created: Value = test::call_and_read_body_json(&app, req).await;
    let id = trip_id(&created);

    let req = test::TestRequest::post()
        .uri(&format!("/api/trips/{}/copy", id))
        .set_json(json!({ "ownerId": "owner-2" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 201);
    let copy: Value = test::read_body_json(resp).await;
    assert_ne!(trip_id(&copy), id);
    assert_eq!(copy["ownerId"], "owner-2");
    assert_eq!(copy["isTemplate"], false);
    assert_eq!(copy["visibility"], "private");
    assert_eq!(stop_ids(&copy), stop_ids(&created));
}

#[actix_web::test]
async fn test_update_and_delete_trip() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::post()
        .uri("/api/trips")
        .set_json(trip_json())
        .to_request();
    let created: Value = test::call_and_read_body_json(&app, req).await;
    let id = trip_id(&created);

    let req = test::TestRequest::put()
        .uri(&format!("/api/trips/{}", id))
        .set_json(json!({ "name": "Lisbon and Porto", "estimatedDuration": 5, "isPublic": false }))
        .to_request();
    let updated: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(updated["name"], "Lisbon and Porto");
    assert_eq!(updated["isPublic"], false);
    assert_eq!(updated["visibility"], "private");
    assert_eq!(updated["length"], 5);
    assert_eq!(updated["version"], 1);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/trips/{}", id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 204);

    let req = test::TestRequest::get()
        .uri(&format!("/api/trips/{}", id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], "NOT_FOUND");
}

#[actix_web::test]
async fn test_malformed_id_is_bad_request() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::get()
        .uri("/api/trips/invalid_id_format")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
}

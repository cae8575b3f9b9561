use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App};
use serde_json::{json, Value};

use trip_planner_api::{
    db::in_memory::InMemoryTripStore, routes, services::trip_service::TripService,
};

pub struct TestApp {
    pub service: web::Data<TripService<InMemoryTripStore>>,
}

impl TestApp {
    pub fn new() -> Self {
        Self {
            service: web::Data::new(TripService::new(InMemoryTripStore::new())),
        }
    }

    pub fn create_app(
        &self,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .app_data(self.service.clone())
            .wrap(Cors::permissive())
            .wrap(Logger::default())
            .configure(routes::configure::<InMemoryTripStore>)
    }
}

pub fn stop_json(name: &str, lat: f64, lng: f64) -> Value {
    json!({
        "name": name,
        "coordinates": { "lat": lat, "lng": lng },
        "plannedArrival": "2024-07-01T10:00:00Z",
    })
}

pub fn trip_json() -> Value {
    json!({
        "name": "Lisbon long weekend",
        "ownerId": "owner-1",
        "category": "cultural",
        "isPublic": true,
        "tags": ["food", "food", "tram"],
        "stops": [
            stop_json("Belem Tower", 38.6916, -9.2160),
            stop_json("Alfama", 38.7114, -9.1301),
            stop_json("LX Factory", 38.7034, -9.1786),
        ],
    })
}

/// Hex id of a trip returned by the API.
pub fn trip_id(trip: &Value) -> String {
    trip["_id"]["$oid"].as_str().unwrap().to_string()
}

pub fn stop_ids(trip: &Value) -> Vec<i64> {
    trip["stops"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["id"].as_i64().unwrap())
        .collect()
}

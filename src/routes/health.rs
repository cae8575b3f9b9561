use actix_web::{web, HttpResponse, Responder};
use serde::Serialize;
use std::collections::HashMap;
use std::env;

use crate::db::trip_store::TripStore;
use crate::services::trip_service::TripService;

#[derive(Serialize)]
struct HealthStatus {
    status: String,
    services: HashMap<String, ServiceStatus>,
    environment: String,
    version: String,
}

#[derive(Serialize, Clone)]
struct ServiceStatus {
    status: String,
    details: Option<String>,
}

pub async fn health_check<S: TripStore>(service: web::Data<TripService<S>>) -> impl Responder {
    let store = check_store(&service).await;

    let health = HealthStatus {
        status: if store.status == "ok" { "ok" } else { "degraded" }.to_string(),
        services: HashMap::from([("trip_store".to_string(), store)]),
        environment: env::var("RUST_ENV").unwrap_or_else(|_| "development".to_string()),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    HttpResponse::Ok().json(health)
}

async fn check_store<S: TripStore>(service: &TripService<S>) -> ServiceStatus {
    match service.store().ping().await {
        Ok(()) => ServiceStatus {
            status: "ok".to_string(),
            details: None,
        },
        Err(e) => {
            log::warn!("Trip store health check failed: {}", e);
            ServiceStatus {
                status: "error".to_string(),
                details: Some(e.to_string()),
            }
        }
    }
}

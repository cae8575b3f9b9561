use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::db::trip_store::TripStore;
use crate::error::TripError;
use crate::models::stop::{Stop, StopStatus};
use crate::services::trip_service::{parse_trip_id, TripService};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderRequest {
    pub stop_ids: Vec<i64>,
}

#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    pub status: StopStatus,
}

/*
    POST /api/trips/{id}/stops
*/
pub async fn add<S: TripStore>(
    service: web::Data<TripService<S>>,
    path: web::Path<String>,
    stop: web::Json<Stop>,
) -> Result<HttpResponse, TripError> {
    let id = parse_trip_id(&path)?;
    let trip = service.add_stop(&id, stop.into_inner()).await?;
    Ok(HttpResponse::Created().json(trip))
}

/*
    PUT /api/trips/{id}/stops/reorder
*/
pub async fn reorder<S: TripStore>(
    service: web::Data<TripService<S>>,
    path: web::Path<String>,
    body: web::Json<ReorderRequest>,
) -> Result<HttpResponse, TripError> {
    let id = parse_trip_id(&path)?;
    let trip = service.reorder_stops(&id, &body.stop_ids).await?;
    Ok(HttpResponse::Ok().json(trip))
}

/*
    PUT /api/trips/{id}/stops/{stop_id}
*/
pub async fn replace<S: TripStore>(
    service: web::Data<TripService<S>>,
    path: web::Path<(String, i64)>,
    stop: web::Json<Stop>,
) -> Result<HttpResponse, TripError> {
    let (id, stop_id) = path.into_inner();
    let id = parse_trip_id(&id)?;
    let trip = service.replace_stop(&id, stop_id, stop.into_inner()).await?;
    Ok(HttpResponse::Ok().json(trip))
}

/*
    DELETE /api/trips/{id}/stops/{stop_id}
*/
pub async fn remove<S: TripStore>(
    service: web::Data<TripService<S>>,
    path: web::Path<(String, i64)>,
) -> Result<HttpResponse, TripError> {
    let (id, stop_id) = path.into_inner();
    let id = parse_trip_id(&id)?;
    let trip = service.remove_stop(&id, stop_id).await?;
    Ok(HttpResponse::Ok().json(trip))
}

/*
    PUT /api/trips/{id}/stops/{stop_id}/status
*/
pub async fn set_status<S: TripStore>(
    service: web::Data<TripService<S>>,
    path: web::Path<(String, i64)>,
    body: web::Json<StatusRequest>,
) -> Result<HttpResponse, TripError> {
    let (id, stop_id) = path.into_inner();
    let id = parse_trip_id(&id)?;
    let trip = service.set_stop_status(&id, stop_id, body.status).await?;
    Ok(HttpResponse::Ok().json(trip))
}

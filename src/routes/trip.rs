use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::db::trip_store::TripStore;
use crate::error::TripError;
use crate::models::{
    search::TripQuery,
    trip::{Trip, TripUpdate},
};
use crate::services::trip_service::{parse_trip_id, TripService};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CopyTemplateRequest {
    pub owner_id: String,
}

/*
    POST /api/trips
*/
pub async fn create<S: TripStore>(
    service: web::Data<TripService<S>>,
    trip: web::Json<Trip>,
) -> Result<HttpResponse, TripError> {
    let trip = service.create_trip(trip.into_inner()).await?;
    Ok(HttpResponse::Created().json(trip))
}

/*
    GET /api/trips?search=&category=&tag=&templatesOnly=&limit=
*/
pub async fn discover<S: TripStore>(
    service: web::Data<TripService<S>>,
    query: web::Query<TripQuery>,
) -> Result<HttpResponse, TripError> {
    let trips = service.discover(&query).await?;
    Ok(HttpResponse::Ok().json(trips))
}

/*
    GET /api/trips/{id}
*/
pub async fn get_by_id<S: TripStore>(
    service: web::Data<TripService<S>>,
    path: web::Path<String>,
) -> Result<HttpResponse, TripError> {
    let id = parse_trip_id(&path)?;
    let trip = service.get_trip(&id).await?;
    Ok(HttpResponse::Ok().json(trip))
}

/*
    PUT /api/trips/{id}
*/
pub async fn update<S: TripStore>(
    service: web::Data<TripService<S>>,
    path: web::Path<String>,
    update: web::Json<TripUpdate>,
) -> Result<HttpResponse, TripError> {
    let id = parse_trip_id(&path)?;
    let trip = service.update_trip(&id, update.into_inner()).await?;
    Ok(HttpResponse::Ok().json(trip))
}

/*
    DELETE /api/trips/{id}
*/
pub async fn delete<S: TripStore>(
    service: web::Data<TripService<S>>,
    path: web::Path<String>,
) -> Result<HttpResponse, TripError> {
    let id = parse_trip_id(&path)?;
    service.delete_trip(&id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/*
    GET /api/trips/{id}/stats
*/
pub async fn stats<S: TripStore>(
    service: web::Data<TripService<S>>,
    path: web::Path<String>,
) -> Result<HttpResponse, TripError> {
    let id = parse_trip_id(&path)?;
    let stats = service.trip_stats(&id).await?;
    Ok(HttpResponse::Ok().json(stats))
}

/*
    POST /api/trips/{id}/copy
*/
pub async fn copy_template<S: TripStore>(
    service: web::Data<TripService<S>>,
    path: web::Path<String>,
    body: web::Json<CopyTemplateRequest>,
) -> Result<HttpResponse, TripError> {
    let id = parse_trip_id(&path)?;
    if body.owner_id.trim().is_empty() {
        return Err(TripError::validation("ownerId", "must not be empty"));
    }
    let trip = service.copy_template(&id, &body.owner_id).await?;
    Ok(HttpResponse::Created().json(trip))
}

/*
    GET /api/users/{owner_id}/trips
*/
pub async fn list_owner_trips<S: TripStore>(
    service: web::Data<TripService<S>>,
    path: web::Path<String>,
) -> Result<HttpResponse, TripError> {
    let trips = service.list_owner_trips(&path).await?;
    Ok(HttpResponse::Ok().json(trips))
}

use actix_web::{web, HttpResponse};

use crate::db::trip_store::TripStore;
use crate::error::TripError;
use crate::models::route::RouteSegment;
use crate::services::trip_service::{parse_trip_id, TripService};

/*
    POST /api/trips/{id}/routes
*/
pub async fn add<S: TripStore>(
    service: web::Data<TripService<S>>,
    path: web::Path<String>,
    route: web::Json<RouteSegment>,
) -> Result<HttpResponse, TripError> {
    let id = parse_trip_id(&path)?;
    let trip = service.add_route(&id, route.into_inner()).await?;
    Ok(HttpResponse::Created().json(trip))
}

/*
    DELETE /api/trips/{id}/routes/{route_id}
*/
pub async fn remove<S: TripStore>(
    service: web::Data<TripService<S>>,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, TripError> {
    let (id, route_id) = path.into_inner();
    let id = parse_trip_id(&id)?;
    let trip = service.remove_route(&id, &route_id).await?;
    Ok(HttpResponse::Ok().json(trip))
}

use actix_web::web;

use crate::db::trip_store::TripStore;

pub mod health;
pub mod route_segment;
pub mod stop;
pub mod trip;

/*
    Mounts every trip endpoint under /api. Handlers expect a
    `web::Data<TripService<S>>` registered on the app.
*/
pub fn configure<S: TripStore + 'static>(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health::health_check::<S>))
        .service(
            web::scope("/api")
                .route(
                    "/users/{owner_id}/trips",
                    web::get().to(trip::list_owner_trips::<S>),
                )
                .service(
                    web::scope("/trips")
                        .route("", web::post().to(trip::create::<S>))
                        .route("", web::get().to(trip::discover::<S>))
                        .route("/{id}", web::get().to(trip::get_by_id::<S>))
                        .route("/{id}", web::put().to(trip::update::<S>))
                        .route("/{id}", web::delete().to(trip::delete::<S>))
                        .route("/{id}/stats", web::get().to(trip::stats::<S>))
                        .route("/{id}/copy", web::post().to(trip::copy_template::<S>))
                        .route("/{id}/stops", web::post().to(stop::add::<S>))
                        // registered before /stops/{stop_id} so "reorder" is not read as an id
                        .route("/{id}/stops/reorder", web::put().to(stop::reorder::<S>))
                        .route("/{id}/stops/{stop_id}", web::put().to(stop::replace::<S>))
                        .route("/{id}/stops/{stop_id}", web::delete().to(stop::remove::<S>))
                        .route(
                            "/{id}/stops/{stop_id}/status",
                            web::put().to(stop::set_status::<S>),
                        )
                        .route("/{id}/routes", web::post().to(route_segment::add::<S>))
                        .route(
                            "/{id}/routes/{route_id}",
                            web::delete().to(route_segment::remove::<S>),
                        ),
                ),
        );
}

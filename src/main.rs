use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use env_logger::Env;

use trip_planner_api::{
    config::AppConfig,
    db::{mongo::create_mongo_client, trip_store::MongoTripStore},
    routes,
    services::trip_service::TripService,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if cfg!(debug_assertions) {
        dotenv::dotenv().ok();
    }

    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let config = AppConfig::from_env().map_err(std::io::Error::other)?;

    let client = create_mongo_client(&config.mongodb_uri, &config.database)
        .await
        .map_err(std::io::Error::other)?;

    let store = MongoTripStore::new(client, &config.database, &config.trips_collection);
    if let Err(e) = store.ensure_indexes().await {
        log::warn!("Failed to create trip indexes: {}", e);
    }

    let service = web::Data::new(
        TripService::new(store).with_discover_limit(config.discover_default_limit),
    );

    log::info!("Starting HTTP server on {}:{}", config.host, config.port);

    let cors_origin = config.cors_allowed_origin.clone();
    HttpServer::new(move || {
        let cors = match &cors_origin {
            Some(origin) => Cors::default()
                .allowed_origin(origin)
                .allow_any_method()
                .allow_any_header()
                .max_age(3600),
            None => Cors::permissive(),
        };

        App::new()
            .wrap(Logger::default())
            .wrap(cors)
            .app_data(service.clone())
            .configure(routes::configure::<MongoTripStore>)
    })
    .bind((config.host, config.port))?
    .run()
    .await
}

pub mod distance_service;
pub mod stop_ids;
pub mod trip_aggregate;
pub mod trip_service;
pub mod trip_stats;
pub mod trip_validation;

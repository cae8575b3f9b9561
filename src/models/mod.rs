pub mod route;
pub mod search;
pub mod stop;
pub mod trip;

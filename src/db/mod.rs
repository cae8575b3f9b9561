pub mod in_memory;
pub mod mongo;
pub mod trip_store;

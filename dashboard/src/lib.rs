pub mod cameras;
pub mod config;
pub mod demographics;
pub mod forms;
pub mod queries;
pub mod query_cache;
pub mod runner;
pub mod views;

pub mod config;
pub mod models;
pub mod monitors;
pub mod sync;

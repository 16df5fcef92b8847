pub mod config;
pub mod error;
pub mod es;
pub mod filters;
pub mod models;
pub mod monitor;
pub mod utils;

pub mod app;
pub mod cli;
pub mod config;
pub mod models;
pub mod notify;
pub mod store;
pub mod sync;

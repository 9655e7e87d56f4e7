pub mod api;
pub mod config;
pub mod database;
pub mod gallery;
pub mod middleware;
pub mod models;
pub mod services;
pub mod state;
pub mod utils;

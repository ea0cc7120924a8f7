pub mod config;
pub mod error;
pub mod gateway;
pub mod middleware;
pub mod models;
pub mod registry;
pub mod routes;
pub mod scan;
pub mod state;

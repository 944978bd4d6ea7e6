pub mod error;
pub mod models;
pub mod routes;
pub mod routes_models;

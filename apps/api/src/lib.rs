pub mod config;
pub mod docgen;
pub mod errors;
pub mod form;
pub mod models;
pub mod resume;
pub mod routes;
pub mod state;
pub mod templates;

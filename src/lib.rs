//! Shop API: CRUD REST service for customers, categories, shop items and orders on SQLite.

pub mod db;
pub mod error;
pub mod handlers;
pub mod migration;
pub mod model;
pub mod openapi;
pub mod response;
pub mod routes;
pub mod seed;
pub mod service;
pub mod settings;
pub mod sql;
pub mod state;

pub use error::AppError;
pub use migration::apply_migrations;
pub use routes::app;
pub use seed::seed;
pub use service::CrudService;
pub use settings::Settings;
pub use state::AppState;

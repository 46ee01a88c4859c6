//! Control de Egresados
//!
//! Server side of the graduate-records application: configuration, the SQLx
//! database layer, sessions, Maud pages, Axum handlers, CSV export and
//! backups. Form rules come from `egresados-validation-core`, the same crate
//! the browser runs as WebAssembly.

pub mod auth;
pub mod backup;
pub mod config;
pub mod database;
pub mod error;
pub mod export;
pub mod forms;
pub mod handlers;
pub mod pages;
pub mod state;

pub use config::AppConfig;
pub use database::{Database, DatabaseType, Egresado, EgresadoUpdate, NewEgresado, User};
pub use error::{AppError, AppResult};
pub use handlers::router;
pub use state::AppState;

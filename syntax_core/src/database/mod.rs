pub mod connection;
pub mod migrations;
pub mod models;
pub mod repository;

pub use connection::get_database_pool;
pub use migrations::{MigrationManager, run_migrations};
pub use repository::{sqlite_stores, BookingRepository, ContactRepository, ProjectRepository};

pub mod admin_user_repo;
pub mod config_repo;
pub mod error;
pub mod schema;
pub mod store_repo;

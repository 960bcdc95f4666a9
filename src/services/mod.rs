pub mod auth;
pub mod cache;
pub mod clock;
pub mod config;
pub mod store;

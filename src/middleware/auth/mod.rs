pub mod access;

pub use access::AuthMiddleware;

/*
 * Responsibility
 * - HTTP surface (/health, /login, /api/stores) の公開ポイント
 * - routes() で router::Router を組み立てる
 */
pub mod dto;
pub mod handlers;
mod routes;

pub use routes::routes;

/*
 * Responsibility
 * - middleware の公開インターフェース
 * - auth: router chain 上の認証 (Bearer)
 * - http / cors / security_headers: axum app 全体に掛ける tower layer
 */
pub mod auth;
pub mod cors;
pub mod http;
pub mod security_headers;

/*
 * Responsibility
 * - GET /api/stores (認証必須: auth middleware の後ろ)
 * - 起動時に決めた scope の store 一覧 + store ごとの locale を返す
 */
use axum::{Json, response::IntoResponse};

use crate::api::dto::stores::StoreResponse;
use crate::api::handlers::login::USERNAME_CLAIM;
use crate::context::Context;
use crate::router::{HandlerResult, Request};
use crate::services::auth::CLAIMS;
use crate::services::config::{CONFIG_GETTER, ConfigScope};
use crate::services::store::{SCOPE, STORE_READER};

pub const LOCALE_PATH: &str = "general/locale/code";
pub const DEFAULT_LOCALE: &str = "en_US";

pub async fn list_stores(ctx: Context, _req: Request) -> HandlerResult {
    let claims = ctx.service(&CLAIMS)?;
    let reader = ctx.service(&STORE_READER)?;
    let config = ctx.service(&CONFIG_GETTER)?;
    let scope = ctx.service(&SCOPE)?;

    let stores = reader.stores(&scope).await?;
    tracing::debug!(
        sub = ?claims.sub,
        username = claims.custom.text(USERNAME_CLAIM),
        %scope,
        count = stores.len(),
        "listing stores"
    );

    let body: Vec<StoreResponse> = stores
        .into_iter()
        .map(|store| {
            let locale = config
                .string(
                    LOCALE_PATH,
                    ConfigScope::Store {
                        id: store.id,
                        website_id: store.website_id,
                    },
                )
                .unwrap_or_else(|| DEFAULT_LOCALE.to_string());
            StoreResponse::new(store, locale)
        })
        .collect();

    Ok(Json(body).into_response())
}

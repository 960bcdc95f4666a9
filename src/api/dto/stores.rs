/*
 * Responsibility
 * - /api/stores の response DTO
 */
use serde::Serialize;

use crate::services::store::Store;

#[derive(Debug, Serialize)]
pub struct StoreResponse {
    pub id: i64,
    pub code: String,
    pub website_id: i64,
    pub group_id: i64,
    pub name: String,
    pub sort_order: i32,
    pub is_active: bool,
    pub locale: String,
}

impl StoreResponse {
    pub fn new(store: Store, locale: String) -> Self {
        Self {
            id: store.id,
            code: store.code,
            website_id: store.website_id,
            group_id: store.group_id,
            name: store.name,
            sort_order: store.sort_order,
            is_active: store.is_active,
            locale,
        }
    }
}

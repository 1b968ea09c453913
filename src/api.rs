//! Serverless-style endpoint logic for `/api/jokers` and
//! `/api/stickers`.
//!
//! The handlers are plain functions over method/query/body so the host
//! runtime stays out of the picture; `wasm_bindgen` entry points at the
//! bottom expose them across the JS boundary. Sticker state lives in
//! process memory only and resets on every cold start - a volatile
//! placeholder, not a storage engine.

use crate::{normalize_name, Joker, SortMode};
use std::cell::RefCell;
use wasm_bindgen::prelude::*;

/// Rank assigned to unranked jokers by the endpoint sort. Kept above
/// any real `u32` rank so they always land after ranked jokers; the
/// client does a stable partition instead of using this sentinel.
pub const GAME_ORDER_SENTINEL: u64 = 9_000_000_000;

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ApiResponse {
    pub status: u16,
    pub content_type: &'static str,
    pub body: String,
}

fn json_response(body: String) -> ApiResponse {
    ApiResponse {
        status: 200,
        content_type: "application/json; charset=utf-8",
        body,
    }
}

/// Sort a copy of the catalog the way the jokers endpoint does: game
/// order by rank with the sentinel for unranked items, anything else
/// (including a missing or unknown `order` parameter) alphabetical.
pub fn sorted_catalog(catalog: &[Joker], order: Option<&str>) -> Vec<Joker> {
    let mut out = catalog.to_vec();
    match order.and_then(SortMode::from_param) {
        Some(SortMode::GameOrder) => {
            out.sort_by_key(|j| j.order.map(u64::from).unwrap_or(GAME_ORDER_SENTINEL));
        }
        _ => {
            out.sort_by(|a, b| {
                normalize_name(&a.name)
                    .cmp(&normalize_name(&b.name))
                    .then_with(|| a.name.cmp(&b.name))
            });
        }
    }
    out
}

/// `GET /api/jokers?order=alpha|game`
pub fn handle_jokers(catalog: &[Joker], order: Option<&str>) -> ApiResponse {
    let sorted = sorted_catalog(catalog, order);
    json_response(serde_json::to_string(&sorted).unwrap_or_else(|_| "[]".to_string()))
}

thread_local! {
    // Process-lifetime sticker memory, not durable across restarts
    static STICKER_MEMORY: RefCell<Vec<String>> = RefCell::new(Vec::new());
}

/// Extract the deduplicated, stringified id list from a PATCH body.
/// A malformed body or a non-array `checked` field yields the empty
/// list, which then replaces memory.
pub fn dedupe_checked(body: &str) -> Vec<String> {
    let parsed: serde_json::Value = serde_json::from_str(body).unwrap_or_default();
    let Some(items) = parsed.get("checked").and_then(|v| v.as_array()) else {
        return Vec::new();
    };

    let mut seen = std::collections::HashSet::new();
    let mut out = Vec::new();
    for item in items {
        let id = match item {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        if seen.insert(id.clone()) {
            out.push(id);
        }
    }
    out
}

fn checked_body(ids: &[String]) -> String {
    serde_json::json!({ "checked": ids }).to_string()
}

/// `GET`/`PATCH /api/stickers`; any other method is a 405.
pub fn handle_stickers(method: &str, body: Option<&str>) -> ApiResponse {
    match method {
        "GET" => STICKER_MEMORY.with(|m| json_response(checked_body(&m.borrow()))),
        "PATCH" => {
            let list = dedupe_checked(body.unwrap_or("{}"));
            STICKER_MEMORY.with(|m| {
                *m.borrow_mut() = list.clone();
            });
            json_response(checked_body(&list))
        }
        _ => ApiResponse {
            status: 405,
            content_type: "text/plain; charset=utf-8",
            body: "Use GET or PATCH".to_string(),
        },
    }
}

/// JS entry point for the jokers function host.
#[wasm_bindgen(js_name = jokersHandler)]
pub fn jokers_handler(order: Option<String>) -> JsValue {
    let catalog = crate::read_jokers_from_json_str(crate::JOKERS_JSON).unwrap_or_default();
    let resp = handle_jokers(&catalog, order.as_deref());
    serde_wasm_bindgen::to_value(&resp).unwrap_or(JsValue::NULL)
}

/// JS entry point for the stickers function host.
#[wasm_bindgen(js_name = stickersHandler)]
pub fn stickers_handler(method: String, body: Option<String>) -> JsValue {
    let resp = handle_stickers(&method, body.as_deref());
    serde_wasm_bindgen::to_value(&resp).unwrap_or(JsValue::NULL)
}

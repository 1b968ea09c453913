//! Best-effort mirror of the checked set at the stickers endpoint.
//!
//! The mirror is consulted exactly once at startup; any failure
//! (network, non-2xx status, malformed body) just means the client
//! stays on local state for this page view. Pushes after each toggle
//! are detached tasks whose outcome is discarded: successive pushes
//! may race and the last write wins, with no ordering guarantee.

use log::debug;
use std::collections::HashSet;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;

pub const STICKERS_URL: &str = "/api/stickers";

#[derive(serde::Serialize, serde::Deserialize)]
struct StickersBody {
    checked: Vec<String>,
}

/// Parse a `{ "checked": [ids] }` response body. `None` means the body
/// is not usable and the caller should fall back to local state.
pub fn parse_checked_body(raw: &str) -> Option<HashSet<String>> {
    serde_json::from_str::<StickersBody>(raw)
        .ok()
        .map(|body| body.checked.into_iter().collect())
}

/// Encode the checked set as a stickers PATCH body.
pub fn encode_checked_body(checked: &HashSet<String>) -> String {
    let mut ids: Vec<String> = checked.iter().cloned().collect();
    ids.sort();
    serde_json::to_string(&StickersBody { checked: ids })
        .unwrap_or_else(|_| r#"{"checked":[]}"#.to_string())
}

/// Fetch the remote checked set once. Bounded to a single attempt, no
/// retries; every failure path resolves to `None`.
pub async fn fetch_checked() -> Option<HashSet<String>> {
    let window = web_sys::window()?;
    let resp_value = JsFuture::from(window.fetch_with_str(STICKERS_URL))
        .await
        .ok()?;
    let resp: web_sys::Response = resp_value.dyn_into().ok()?;
    if !resp.ok() {
        return None;
    }
    let text = JsFuture::from(resp.text().ok()?).await.ok()?;
    parse_checked_body(&text.as_string()?)
}

/// Push the checked set to the mirror, fire-and-forget.
pub fn push_checked(checked: &HashSet<String>) {
    let body = encode_checked_body(checked);
    wasm_bindgen_futures::spawn_local(async move {
        if patch_checked(&body).await.is_err() {
            debug!("stickers push failed, keeping local state only");
        }
    });
}

async fn patch_checked(body: &str) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let init = web_sys::RequestInit::new();
    init.set_method("PATCH");
    init.set_body(&JsValue::from_str(body));
    let request = web_sys::Request::new_with_str_and_init(STICKERS_URL, &init)?;
    request.headers().set("content-type", "application/json")?;
    JsFuture::from(window.fetch_with_request(&request)).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_body_parses_to_set() {
        let set = parse_checked_body(r#"{"checked": ["joker", "egg", "joker"]}"#).unwrap();
        assert_eq!(set.len(), 2);
        assert!(set.contains("egg"));
    }

    #[test]
    fn malformed_body_falls_back_to_none() {
        assert_eq!(parse_checked_body("<html>offline</html>"), None);
        assert_eq!(parse_checked_body(r#"{"checked": "joker"}"#), None);
        assert_eq!(parse_checked_body(""), None);
    }

    #[test]
    fn push_body_round_trips() {
        let mut set = HashSet::new();
        set.insert("blueprint".to_string());
        let body = encode_checked_body(&set);
        assert_eq!(parse_checked_body(&body), Some(set));
    }
}

//! Shareable view state in the page's query string.
//!
//! `view` and `order` are read once at load and rewritten with
//! `history.replaceState` on every user-driven change, so a shared
//! link reproduces the same presentation without adding history
//! entries. Every helper no-ops when the browser objects are missing.

use wasm_bindgen::JsValue;

fn current_url() -> Option<web_sys::Url> {
    let href = web_sys::window()?.location().href().ok()?;
    web_sys::Url::new(&href).ok()
}

/// Read a query parameter from the current page URL.
pub fn get_param(key: &str) -> Option<String> {
    current_url()?.search_params().get(key)
}

/// Rewrite a query parameter in place, without navigation.
pub fn set_param(key: &str, value: &str) {
    let Some(url) = current_url() else {
        return;
    };
    url.search_params().set(key, value);
    let Some(history) = web_sys::window().and_then(|w| w.history().ok()) else {
        return;
    };
    let _ = history.replace_state_with_url(&JsValue::NULL, "", Some(&url.href()));
}

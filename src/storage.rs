//! Browser `localStorage` persistence for the checklist.
//!
//! Three independent keys: the checked-id list, the hide-checked flag
//! and the mute flag. Loads never fail: malformed stored data counts
//! as absent and the documented default is returned instead. Saves are
//! synchronous and silently ignore storage errors (quota, disabled
//! storage), keeping the UI unaffected.

use crate::defaults;
use log::debug;
use std::collections::HashSet;

pub const CHECKED_KEY: &str = "balatro:jokers:checked";
pub const HIDE_CHECKED_KEY: &str = "balatro:hide-checked";
pub const MUTED_KEY: &str = "balatro:muted";

/// Decode a persisted checked-id list. `None` means corrupt.
pub fn decode_checked(raw: &str) -> Option<HashSet<String>> {
    serde_json::from_str::<Vec<String>>(raw)
        .ok()
        .map(|ids| ids.into_iter().collect())
}

/// Encode the checked set in its persisted form: a JSON array of ids.
/// An explicitly cleared set round-trips as `[]`, distinguishable from
/// a key that was never written.
pub fn encode_checked(checked: &HashSet<String>) -> String {
    let mut ids: Vec<&String> = checked.iter().collect();
    ids.sort();
    serde_json::to_string(&ids).unwrap_or_else(|_| "[]".to_string())
}

/// Decode a persisted boolean flag. `None` means corrupt.
pub fn decode_flag(raw: &str) -> Option<bool> {
    serde_json::from_str::<bool>(raw).ok()
}

fn raw_storage() -> Option<web_sys::Storage> {
    web_sys::window().and_then(|w| w.local_storage().ok().flatten())
}

fn get_item(key: &str) -> Option<String> {
    raw_storage()?.get_item(key).ok().flatten()
}

fn set_item(key: &str, value: &str) {
    let Some(storage) = raw_storage() else {
        return;
    };
    if storage.set_item(key, value).is_err() {
        debug!("localStorage write for '{}' failed, dropping", key);
    }
}

pub fn load_checked() -> HashSet<String> {
    get_item(CHECKED_KEY)
        .and_then(|raw| decode_checked(&raw))
        .unwrap_or_default()
}

pub fn save_checked(checked: &HashSet<String>) {
    set_item(CHECKED_KEY, &encode_checked(checked));
}

pub fn load_hide_checked() -> bool {
    get_item(HIDE_CHECKED_KEY)
        .and_then(|raw| decode_flag(&raw))
        .unwrap_or(defaults::HIDE_CHECKED)
}

pub fn save_hide_checked(hide: bool) {
    set_item(HIDE_CHECKED_KEY, &hide.to_string());
}

pub fn load_muted() -> bool {
    get_item(MUTED_KEY)
        .and_then(|raw| decode_flag(&raw))
        .unwrap_or(defaults::MUTED)
}

pub fn save_muted(muted: bool) {
    set_item(MUTED_KEY, &muted.to_string());
}

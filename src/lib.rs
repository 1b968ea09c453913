use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;
use std::fmt;

pub mod api;
pub mod audio;
pub mod remote;
pub mod storage;

/// The embedded joker catalog, one page view's worth of read-only data.
pub const JOKERS_JSON: &str = include_str!("jokers.json");

/// Default preference values used when nothing is persisted yet.
pub mod defaults {
    pub const HIDE_CHECKED: bool = false;
    pub const MUTED: bool = false;
}

/// One collectible joker from the catalog.
///
/// `order` is the curator-declared game order. Jokers without one sort
/// after all ranked jokers, keeping their catalog position.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Joker {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<u32>,
}

// Custom error type for catalog loading
#[derive(Debug)]
pub enum CatalogError {
    Malformed(String),
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogError::Malformed(detail) => {
                write!(f, "Malformed joker catalog: {}", detail)
            }
        }
    }
}

impl std::error::Error for CatalogError {}

/// Parse the joker catalog from a JSON array string.
///
/// Duplicate ids are skipped (first occurrence wins) so a bad data file
/// degrades instead of corrupting the checked-set invariant.
pub fn read_jokers_from_json_str(json: &str) -> Result<Vec<Joker>, CatalogError> {
    let parsed: Vec<Joker> =
        serde_json::from_str(json).map_err(|e| CatalogError::Malformed(e.to_string()))?;

    let mut seen_ids = HashSet::new();
    let mut jokers = Vec::with_capacity(parsed.len());
    for joker in parsed {
        if !seen_ids.insert(joker.id.clone()) {
            debug!("Duplicate joker id '{}', skipping", joker.id);
            continue;
        }
        jokers.push(joker);
    }
    Ok(jokers)
}

// Collapses runs of whitespace, underscores and hyphens to one space.
static SEPARATOR_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[_\s\-]+").unwrap());

fn strip_diacritic(c: char) -> char {
    match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' => 'a',
        'ç' => 'c',
        'è' | 'é' | 'ê' | 'ë' => 'e',
        'ì' | 'í' | 'î' | 'ï' => 'i',
        'ñ' => 'n',
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' => 'o',
        'ù' | 'ú' | 'û' | 'ü' => 'u',
        'ý' | 'ÿ' => 'y',
        other => other,
    }
}

/// Normalize a display name or filter query for matching: diacritics
/// stripped, casefolded, separator runs collapsed to single spaces,
/// leading/trailing whitespace trimmed.
pub fn normalize_name(raw: &str) -> String {
    let mut folded = String::with_capacity(raw.len());
    for c in raw.chars() {
        // Combining marks left over from decomposed input
        if ('\u{0300}'..='\u{036f}').contains(&c) {
            continue;
        }
        for lower in c.to_lowercase() {
            folded.push(strip_diacritic(lower));
        }
    }
    SEPARATOR_RUNS.replace_all(&folded, " ").trim().to_string()
}

/// Resolve a display name from the fallback chain: heading text, then
/// image alt text, then the raw rendered text of the container.
pub fn resolve_display_name(
    heading: Option<&str>,
    img_alt: Option<&str>,
    container_text: &str,
) -> String {
    heading
        .filter(|s| !s.trim().is_empty())
        .or(img_alt.filter(|s| !s.trim().is_empty()))
        .unwrap_or(container_text)
        .trim()
        .to_string()
}

/// Visibility rule for one item. `name_key` and `query` must already be
/// normalized; matching is plain substring containment.
pub fn is_visible(name_key: &str, query: &str, hide_checked: bool, is_checked: bool) -> bool {
    let matches_text = query.is_empty() || name_key.contains(query);
    matches_text && !(hide_checked && is_checked)
}

/// Presentation layout. Purely visual, independent of sorting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    Grid,
    List,
}

impl ViewMode {
    pub const fn as_param(self) -> &'static str {
        match self {
            ViewMode::Grid => "grid",
            ViewMode::List => "list",
        }
    }

    pub fn from_param(s: &str) -> Option<Self> {
        match s {
            "grid" => Some(ViewMode::Grid),
            "list" => Some(ViewMode::List),
            _ => None,
        }
    }
}

/// Ordering of the catalog on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortMode {
    #[default]
    Alphabetical,
    GameOrder,
}

impl SortMode {
    pub const fn as_param(self) -> &'static str {
        match self {
            SortMode::Alphabetical => "alpha",
            SortMode::GameOrder => "game",
        }
    }

    pub fn from_param(s: &str) -> Option<Self> {
        match s {
            "alpha" => Some(SortMode::Alphabetical),
            "game" => Some(SortMode::GameOrder),
            _ => None,
        }
    }
}

/// Compute the display order of the catalog as indices into it.
///
/// Alphabetical mode compares casefolded, diacritic-stripped names.
/// Game-order mode is a stable partition: ranked jokers ascending by
/// `order`, unranked appended afterwards in catalog position. Unranked
/// jokers are never coerced to a numeric rank here, so they cannot
/// interleave with real ranks.
pub fn sorted_order(catalog: &[Joker], mode: SortMode) -> Vec<usize> {
    match mode {
        SortMode::Alphabetical => {
            let mut indices: Vec<usize> = (0..catalog.len()).collect();
            indices.sort_by_cached_key(|&i| {
                (normalize_name(&catalog[i].name), catalog[i].name.clone())
            });
            indices
        }
        SortMode::GameOrder => {
            let (mut ranked, unranked): (Vec<usize>, Vec<usize>) =
                (0..catalog.len()).partition(|&i| catalog[i].order.is_some());
            // Stable sort keeps catalog position for equal ranks
            ranked.sort_by_key(|&i| catalog[i].order.unwrap_or(u32::MAX));
            ranked.extend(unranked);
            ranked
        }
    }
}

/// Flip membership of `id` in the checked set. Returns true when the
/// item transitioned unchecked -> checked (the only transition that
/// triggers audio feedback).
pub fn toggle_id(checked: &mut HashSet<String>, id: &str) -> bool {
    if checked.remove(id) {
        false
    } else {
        checked.insert(id.to_string());
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn joker(id: &str, name: &str, order: Option<u32>) -> Joker {
        Joker {
            id: id.to_string(),
            name: name.to_string(),
            order,
        }
    }

    #[test]
    fn normalize_strips_accents_and_case() {
        assert_eq!(normalize_name("Café"), "cafe");
        assert_eq!(normalize_name("CAFE\u{0301}"), "cafe");
    }

    #[test]
    fn normalize_collapses_separators() {
        assert_eq!(normalize_name("  Jolly   Joker  "), "jolly joker");
        assert_eq!(normalize_name("jolly_joker-2"), "jolly joker 2");
    }

    #[test]
    fn filter_is_substring_on_normalized_names() {
        let key = normalize_name("Café");
        assert!(is_visible(&key, &normalize_name("cafe"), false, false));
        let key = normalize_name("Jolly Joker");
        assert!(is_visible(
            &key,
            &normalize_name("  Jolly   Joker  "),
            false,
            false
        ));
        assert!(is_visible(&key, "", false, false));
        assert!(!is_visible(&key, "greedy", false, false));
    }

    #[test]
    fn hide_checked_suppresses_only_checked_items() {
        assert!(!is_visible("jolly joker", "", true, true));
        assert!(is_visible("jolly joker", "", true, false));
        assert!(is_visible("jolly joker", "", false, true));
    }

    #[test]
    fn game_order_partitions_unranked_after_ranked() {
        let catalog = vec![
            joker("a", "A", Some(2)),
            joker("b", "B", None),
            joker("c", "C", Some(1)),
        ];
        let order = sorted_order(&catalog, SortMode::GameOrder);
        assert_eq!(order, vec![2, 0, 1]); // C, A, B
    }

    #[test]
    fn game_order_unranked_keep_relative_catalog_position() {
        let catalog = vec![
            joker("x", "X", None),
            joker("a", "A", Some(1)),
            joker("y", "Y", None),
        ];
        let order = sorted_order(&catalog, SortMode::GameOrder);
        assert_eq!(order, vec![1, 0, 2]);
    }

    #[test]
    fn sorting_is_idempotent_and_round_trips() {
        let catalog = vec![
            joker("a", "Zany Joker", Some(3)),
            joker("b", "Abstract Joker", None),
            joker("c", "Mad Joker", Some(1)),
        ];
        let game_once = sorted_order(&catalog, SortMode::GameOrder);
        let game_twice = sorted_order(&catalog, SortMode::GameOrder);
        assert_eq!(game_once, game_twice);

        // alpha in between must not drift the game order
        let _alpha = sorted_order(&catalog, SortMode::Alphabetical);
        assert_eq!(sorted_order(&catalog, SortMode::GameOrder), game_once);
    }

    #[test]
    fn alpha_sort_is_case_and_accent_insensitive() {
        let catalog = vec![
            joker("b", "banana", None),
            joker("a", "Ápple", None),
            joker("c", "Cherry", None),
        ];
        let order = sorted_order(&catalog, SortMode::Alphabetical);
        assert_eq!(order, vec![1, 0, 2]);
    }

    #[test]
    fn toggle_replay_yields_odd_parity_set() {
        let mut checked = HashSet::new();
        for id in ["a", "b", "a", "c", "b", "b"] {
            toggle_id(&mut checked, id);
        }
        // a twice, b three times, c once
        assert!(!checked.contains("a"));
        assert!(checked.contains("b"));
        assert!(checked.contains("c"));
        assert_eq!(checked.len(), 2);
    }

    #[test]
    fn toggle_reports_check_transition_only() {
        let mut checked = HashSet::new();
        assert!(toggle_id(&mut checked, "a"));
        assert!(!toggle_id(&mut checked, "a"));
    }

    #[test]
    fn display_name_fallback_chain() {
        assert_eq!(
            resolve_display_name(Some("Jolly Joker"), Some("alt"), "raw"),
            "Jolly Joker"
        );
        assert_eq!(resolve_display_name(None, Some("alt"), "raw"), "alt");
        assert_eq!(resolve_display_name(Some("  "), None, " raw "), "raw");
        assert_eq!(resolve_display_name(None, None, ""), "");
        // filtering an item missing all three must not panic
        assert!(!is_visible(&normalize_name(""), "q", false, false));
    }

    #[test]
    fn catalog_parse_skips_duplicate_ids() {
        let json = r#"[
            {"id": "joker", "name": "Joker", "order": 1},
            {"id": "joker", "name": "Joker Again"},
            {"id": "greedy", "name": "Greedy Joker", "order": 2}
        ]"#;
        let catalog = read_jokers_from_json_str(json).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog[0].name, "Joker");
    }

    #[test]
    fn catalog_parse_rejects_malformed_json() {
        assert!(read_jokers_from_json_str("not json").is_err());
        assert!(read_jokers_from_json_str(r#"{"id": "x"}"#).is_err());
    }

    #[test]
    fn mode_params_round_trip() {
        assert_eq!(ViewMode::from_param("list"), Some(ViewMode::List));
        assert_eq!(ViewMode::from_param("grid"), Some(ViewMode::Grid));
        assert_eq!(ViewMode::from_param("weird"), None);
        assert_eq!(
            SortMode::from_param(SortMode::GameOrder.as_param()),
            Some(SortMode::GameOrder)
        );
        assert_eq!(SortMode::from_param(""), None);
    }
}

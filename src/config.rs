//! Application-level configuration constants.

// Shown as the collection total when the catalog fails to load
pub const FALLBACK_TOTAL: usize = 150;

// Sprite location; file name is derived from the joker id
pub const JOKER_IMAGE_DIR: &str = "/images/jokers";

// Query parameter names for the shareable view state
pub const VIEW_PARAM: &str = "view";
pub const ORDER_PARAM: &str = "order";

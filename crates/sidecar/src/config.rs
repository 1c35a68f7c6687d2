use serde::{Deserialize, Serialize};

use crate::dialect::{Dialect, RatingScale};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SidecarConfig {
    pub dialect: Dialect,
    /// A user-supplied template overriding the built-in dialect layout
    /// entirely. Validated with `templating::validate` before first use
    /// (spec.md §4.6).
    pub custom_template: Option<String>,
    pub rating_scale: RatingScale,
    pub include_performers: bool,
    pub include_genres: bool,
    pub include_previews: bool,
}

impl Default for SidecarConfig {
    fn default() -> Self {
        Self {
            dialect: Dialect::Kodi,
            custom_template: None,
            rating_scale: RatingScale::Ten,
            include_performers: true,
            include_genres: true,
            include_previews: true,
        }
    }
}

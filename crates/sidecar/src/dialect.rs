use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// The four built-in NFO-style layouts, grounded on the public, well
/// documented Kodi/Jellyfin/Emby/Plex `movie.nfo` conventions (not
/// proprietary to any one project). They differ exactly where spec.md's
/// Open Question (iii) says they would: unique-id typing, and whether
/// fanart/cover nest under a shared `<fanart>`/`<art>` parent or sit flat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum Dialect {
    Kodi,
    Jellyfin,
    Emby,
    Plex,
}

impl Default for Dialect {
    fn default() -> Self {
        Dialect::Kodi
    }
}

/// The denominator a rating is scaled to. Spec.md §4.6: "a rating scaled
/// to the configured denominator (5 or 10); clipped to `[1, max]`."
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RatingScale {
    Five,
    Ten,
}

impl Default for RatingScale {
    fn default() -> Self {
        RatingScale::Ten
    }
}

impl RatingScale {
    pub fn max(self) -> f32 {
        match self {
            RatingScale::Five => 5.0,
            RatingScale::Ten => 10.0,
        }
    }

    /// Scales a rating that arrives on a 0-10 scale (the convention this
    /// pipeline's merger produces) down to this dialect's denominator,
    /// then clips to `[1, max]` per spec.md.
    pub fn scale(self, rating_out_of_ten: f32) -> f32 {
        let scaled = match self {
            RatingScale::Ten => rating_out_of_ten,
            RatingScale::Five => rating_out_of_ten / 2.0,
        };
        scaled.clamp(1.0, self.max())
    }
}

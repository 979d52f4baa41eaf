//! Shared domain enums

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of title: a single film or an episodic series
///
/// Serialized with the catalog provider's names (`movie`, `tv_series`);
/// the UI shorthands `film`, `tv` and `series` are accepted on input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MediaKind {
    #[default]
    #[serde(rename = "movie", alias = "film")]
    Film,
    #[serde(rename = "tv_series", alias = "tv", alias = "series")]
    Series,
}

impl MediaKind {
    /// Watchmode `types` value
    pub fn watchmode_type(&self) -> &'static str {
        match self {
            MediaKind::Film => "movie",
            MediaKind::Series => "tv_series",
        }
    }

    /// TMDb path segment
    pub fn tmdb_segment(&self) -> &'static str {
        match self {
            MediaKind::Film => "movie",
            MediaKind::Series => "tv",
        }
    }

    /// Embed-host path segment (same convention as TMDb)
    pub fn embed_segment(&self) -> &'static str {
        self.tmdb_segment()
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.watchmode_type())
    }
}

/// Error returned when a media kind string is not recognised
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown media kind: {0}")]
pub struct UnknownMediaKind(pub String);

impl FromStr for MediaKind {
    type Err = UnknownMediaKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "movie" | "film" => Ok(MediaKind::Film),
            "tv" | "tv_series" | "series" | "tv_miniseries" => Ok(MediaKind::Series),
            other => Err(UnknownMediaKind(other.to_string())),
        }
    }
}

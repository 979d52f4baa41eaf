//! Playback source resolution for third-party embed providers
//!
//! Turns a title's external identifiers into an embed URL for one of a fixed,
//! ordered registry of providers. Which provider is active is the caller's
//! state: if an embed fails to load, the caller asks again with
//! [`PlaybackProviderId::next`]. Resolution never fails over on its own.

use cinevault_core::MediaKind;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use url::form_urlencoded;

/// Errors raised while parsing resolver inputs
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolverError {
    #[error("Unknown playback provider: {0}")]
    UnknownProvider(String),
}

/// Registered playback providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackProviderId {
    Vidking,
    Vidnest,
    Vidsrc,
    #[serde(rename = "2embed", alias = "twoembed")]
    TwoEmbed,
}

impl PlaybackProviderId {
    /// All providers in registry order
    pub const ALL: [PlaybackProviderId; 4] = [
        PlaybackProviderId::Vidking,
        PlaybackProviderId::Vidnest,
        PlaybackProviderId::Vidsrc,
        PlaybackProviderId::TwoEmbed,
    ];

    /// Get the provider id as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            PlaybackProviderId::Vidking => "vidking",
            PlaybackProviderId::Vidnest => "vidnest",
            PlaybackProviderId::Vidsrc => "vidsrc",
            PlaybackProviderId::TwoEmbed => "2embed",
        }
    }

    /// Registry entry for this provider
    pub fn provider(&self) -> &'static PlaybackProvider {
        match self {
            PlaybackProviderId::Vidking => &REGISTRY[0],
            PlaybackProviderId::Vidnest => &REGISTRY[1],
            PlaybackProviderId::Vidsrc => &REGISTRY[2],
            PlaybackProviderId::TwoEmbed => &REGISTRY[3],
        }
    }

    /// Next provider in registry order, wrapping to the first
    pub fn next(&self) -> PlaybackProviderId {
        let index = Self::ALL.iter().position(|p| p == self).unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }

    /// Provider whose embed frame posts messages from `origin`
    pub fn from_origin(origin: &str) -> Option<PlaybackProviderId> {
        let origin = origin.trim_end_matches('/');
        REGISTRY
            .iter()
            .find(|p| p.origin == Some(origin))
            .map(|p| p.id)
    }
}

impl Default for PlaybackProviderId {
    fn default() -> Self {
        Self::ALL[0]
    }
}

impl fmt::Display for PlaybackProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlaybackProviderId {
    type Err = ResolverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "vidking" => Ok(PlaybackProviderId::Vidking),
            "vidnest" => Ok(PlaybackProviderId::Vidnest),
            "vidsrc" => Ok(PlaybackProviderId::Vidsrc),
            "2embed" | "twoembed" | "vidlink" => Ok(PlaybackProviderId::TwoEmbed),
            other => Err(ResolverError::UnknownProvider(other.to_string())),
        }
    }
}

/// Static description of a playback provider
#[derive(Debug, Clone, Serialize)]
pub struct PlaybackProvider {
    pub id: PlaybackProviderId,
    pub display_name: &'static str,
    /// 1-based position in the registry
    pub order: u8,
    /// Origin of the embed frame when it posts progress messages
    pub origin: Option<&'static str>,
    /// Whether the embed accepts an IMDb id when no TMDb id is known
    pub accepts_imdb: bool,
}

static REGISTRY: [PlaybackProvider; 4] = [
    PlaybackProvider {
        id: PlaybackProviderId::Vidking,
        display_name: "Vidking",
        order: 1,
        origin: Some("https://vidking.net"),
        accepts_imdb: false,
    },
    PlaybackProvider {
        id: PlaybackProviderId::Vidnest,
        display_name: "Vidnest",
        order: 2,
        origin: Some("https://vidnest.net"),
        accepts_imdb: false,
    },
    PlaybackProvider {
        id: PlaybackProviderId::Vidsrc,
        display_name: "Vidsrc",
        order: 3,
        origin: None,
        accepts_imdb: true,
    },
    PlaybackProvider {
        id: PlaybackProviderId::TwoEmbed,
        display_name: "2Embed",
        order: 4,
        origin: None,
        accepts_imdb: true,
    },
];

/// The provider registry in order
pub fn registry() -> &'static [PlaybackProvider] {
    &REGISTRY
}

impl PlaybackProvider {
    /// Identifier this provider's URL is templated with, if any is usable
    fn embed_id(&self, ids: &TitleIds) -> Option<String> {
        if let Some(tmdb_id) = ids.tmdb_id {
            return Some(tmdb_id.to_string());
        }
        if self.accepts_imdb {
            return ids.imdb().map(|id| urlencoding::encode(id).into_owned());
        }
        None
    }
}

/// External identifiers of a title
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TitleIds {
    /// TMDb id (the secondary metadata provider)
    pub tmdb_id: Option<u64>,
    /// IMDb id, e.g. `tt0111161`
    pub imdb_id: Option<String>,
}

impl TitleIds {
    pub fn new(tmdb_id: Option<u64>, imdb_id: Option<String>) -> Self {
        Self { tmdb_id, imdb_id }
    }

    /// IMDb id, treating a blank string as absent
    pub fn imdb(&self) -> Option<&str> {
        self.imdb_id.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }

    /// True when neither identifier is present
    pub fn is_empty(&self) -> bool {
        self.tmdb_id.is_none() && self.imdb().is_none()
    }
}

/// Presentation hints passed through to embed hosts that understand them
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaybackOptions {
    pub autoplay: bool,
    /// Hex colour such as `#e87c00`; providers fall back to their own default
    pub accent_color: Option<String>,
}

impl Default for PlaybackOptions {
    fn default() -> Self {
        Self {
            autoplay: true,
            accent_color: None,
        }
    }
}

/// Outcome of resolving a playback URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "url", rename_all = "snake_case")]
pub enum Resolution {
    Available(String),
    /// No identifier the provider can use
    Unavailable,
}

impl Resolution {
    pub fn url(&self) -> Option<&str> {
        match self {
            Resolution::Available(url) => Some(url),
            Resolution::Unavailable => None,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Resolution::Available(_))
    }
}

const VIDKING_DEFAULT_THEME: &str = "#00d1ff";
const VIDNEST_DEFAULT_COLOR: &str = "#f97316";

/// Build the embed URL for `provider`
///
/// Series URLs encode season and episode, defaulting to 1/1. Returns
/// [`Resolution::Unavailable`] when the title has no identifier the provider
/// accepts, which is always the case when both ids are absent.
pub fn build_playback_url(
    provider: PlaybackProviderId,
    ids: &TitleIds,
    kind: MediaKind,
    season: Option<u32>,
    episode: Option<u32>,
    options: &PlaybackOptions,
) -> Resolution {
    let Some(id) = provider.provider().embed_id(ids) else {
        tracing::debug!(provider = %provider, ?ids, "No usable identifier for provider");
        return Resolution::Unavailable;
    };

    let season = season.unwrap_or(1);
    let episode = episode.unwrap_or(1);

    let url = match (provider, kind) {
        (PlaybackProviderId::Vidking, MediaKind::Film) => {
            format!("https://vidking.net/embed/movie/{}", id)
        }
        (PlaybackProviderId::Vidking, MediaKind::Series) => {
            format!("https://vidking.net/embed/tv/{}/{}/{}", id, season, episode)
        }
        (PlaybackProviderId::Vidnest, MediaKind::Film) => {
            format!("https://vidnest.net/embed/movie/{}", id)
        }
        (PlaybackProviderId::Vidnest, MediaKind::Series) => {
            format!("https://vidnest.net/embed/tv/{}/{}/{}", id, season, episode)
        }
        (PlaybackProviderId::Vidsrc, MediaKind::Film) => {
            format!("https://vidsrc.to/embed/movie/{}", id)
        }
        (PlaybackProviderId::Vidsrc, MediaKind::Series) => {
            format!("https://vidsrc.to/embed/tv/{}/{}/{}", id, season, episode)
        }
        (PlaybackProviderId::TwoEmbed, MediaKind::Film) => {
            format!("https://www.2embed.cc/embed/{}", id)
        }
        (PlaybackProviderId::TwoEmbed, MediaKind::Series) => {
            format!("https://www.2embed.cc/embedtv/{}&s={}&e={}", id, season, episode)
        }
    };

    let query = match provider {
        PlaybackProviderId::Vidking => {
            let theme = options
                .accent_color
                .as_deref()
                .unwrap_or(VIDKING_DEFAULT_THEME);
            let mut query = form_urlencoded::Serializer::new(String::new());
            if options.autoplay {
                query.append_pair("autoplay", "1");
            }
            query.append_pair("theme", theme);
            Some(query.finish())
        }
        PlaybackProviderId::Vidnest => {
            // Vidnest expects the hex colour without its leading '#'
            let color = options
                .accent_color
                .as_deref()
                .unwrap_or(VIDNEST_DEFAULT_COLOR)
                .trim_start_matches('#');
            let mut query = form_urlencoded::Serializer::new(String::new());
            if options.autoplay {
                query.append_pair("autoplay", "1");
            }
            query.append_pair("color", color);
            Some(query.finish())
        }
        PlaybackProviderId::Vidsrc | PlaybackProviderId::TwoEmbed => None,
    };

    match query {
        Some(query) if !query.is_empty() => Resolution::Available(format!("{}?{}", url, query)),
        _ => Resolution::Available(url),
    }
}

/// Resolve every registered provider, in registry order
pub fn resolve_all(
    ids: &TitleIds,
    kind: MediaKind,
    season: Option<u32>,
    episode: Option<u32>,
    options: &PlaybackOptions,
) -> Vec<(PlaybackProviderId, Resolution)> {
    PlaybackProviderId::ALL
        .iter()
        .map(|&provider| {
            (
                provider,
                build_playback_url(provider, ids, kind, season, episode, options),
            )
        })
        .collect()
}

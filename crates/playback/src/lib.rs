//! CineVault Playback
//!
//! Resolves titles to third-party embed URLs, looks up trailers, and fans out
//! progress reports from embedded players.

pub mod progress;
pub mod resolver;
pub mod trailers;

pub use progress::{ProgressEvent, ProgressHub, ProgressSubscription};
pub use resolver::{
    build_playback_url, registry, resolve_all, PlaybackOptions, PlaybackProvider,
    PlaybackProviderId, Resolution, ResolverError, TitleIds,
};
pub use trailers::{
    filter_trailers, TmdbConfig, TrailerClient, TrailerError, TrailerKind, TrailerVideo,
};

//! Podcast show model for the mediacast publishing backend.
//!
//! A [`Podcast`](db::entities::Podcast) row holds one show's metadata. Its
//! episodes live in the `media` table and are reached through
//! [`EpisodeQuery`]; writes go through [`PodcastStore`], which normalizes
//! slugs and notifies [`PodcastObserver`]s.

pub mod author;
pub mod config;
pub mod db;
pub mod error;
pub mod podcasts;
pub mod slug;

pub use author::Author;
pub use config::DatabaseConfig;
pub use db::entities::{media, podcast, Explicit};
pub use error::{Error, Result};
pub use podcasts::{
    episode_counts, EpisodeCounts, EpisodeQuery, LogObserver, NewPodcast, PodcastObserver,
    PodcastRecord, PodcastStore, PodcastSummary,
};
pub use slug::{slugify, SLUG_LENGTH};

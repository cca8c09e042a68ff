//! Lifecycle observers for podcast writes.
//!
//! Observers are handed to [`PodcastStore`](super::PodcastStore) when it is
//! built and are called, in registration order, around every insert,
//! update and delete the store performs.

use crate::db::entities::podcast;

/// Callbacks around podcast writes. Every method defaults to a no-op.
///
/// `before_*` hooks may still change the active model that is about to be
/// written; `after_*` hooks see the row as stored.
pub trait PodcastObserver: Send + Sync {
    fn before_insert(&self, _podcast: &mut podcast::ActiveModel) {}

    fn after_insert(&self, _podcast: &podcast::Model) {}

    fn before_update(&self, _podcast: &mut podcast::ActiveModel) {}

    fn after_update(&self, _podcast: &podcast::Model) {}

    fn before_delete(&self, _podcast: &podcast::Model) {}

    fn after_delete(&self, _podcast: &podcast::Model) {}
}

/// Emits a tracing event for each completed write
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl PodcastObserver for LogObserver {
    fn after_insert(&self, podcast: &podcast::Model) {
        tracing::info!(id = podcast.id, slug = %podcast.slug, "podcast created");
    }

    fn after_update(&self, podcast: &podcast::Model) {
        tracing::info!(id = podcast.id, slug = %podcast.slug, "podcast updated");
    }

    fn after_delete(&self, podcast: &podcast::Model) {
        tracing::info!(id = podcast.id, slug = %podcast.slug, "podcast deleted");
    }
}

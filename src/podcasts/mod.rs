//! Podcast store: reads, writes and derived episode counts.

pub mod episodes;
pub mod events;

use std::sync::Arc;

use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, EntityTrait, IntoActiveModel,
    QueryFilter, Set,
};
use serde::{Deserialize, Serialize};
use tokio::sync::OnceCell;

use crate::author::Author;
use crate::db::entities::podcast::{self, Explicit};
use crate::db::unix_now;
use crate::error::{Error, Result};
use crate::slug::{slugify, with_suffix};

pub use episodes::EpisodeQuery;
pub use events::{LogObserver, PodcastObserver};

/// Slug used when the input has no usable characters at all
const FALLBACK_SLUG: &str = "podcast";

/// Input for creating a show
#[derive(Clone, Debug, Deserialize)]
pub struct NewPodcast {
    /// Defaults to the title; normalized either way.
    #[serde(default)]
    pub slug: Option<String>,
    pub title: String,
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    pub author: Author,
    #[serde(default)]
    pub explicit: Explicit,
    #[serde(default)]
    pub copyright: Option<String>,
    #[serde(default)]
    pub itunes_url: Option<String>,
    #[serde(default)]
    pub feedburner_url: Option<String>,
}

impl NewPodcast {
    pub fn new(title: impl Into<String>, author: Author) -> Self {
        Self {
            slug: None,
            title: title.into(),
            subtitle: None,
            description: None,
            category: None,
            author,
            explicit: Explicit::default(),
            copyright: None,
            itunes_url: None,
            feedburner_url: None,
        }
    }

    pub fn with_slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = Some(slug.into());
        self
    }

    fn into_active_model(self) -> podcast::ActiveModel {
        let mut am = podcast::ActiveModel {
            title: Set(self.title.clone()),
            subtitle: Set(self.subtitle),
            description: Set(self.description),
            category: Set(self.category),
            copyright: Set(self.copyright),
            itunes_url: Set(self.itunes_url),
            feedburner_url: Set(self.feedburner_url),
            ..Default::default()
        };
        am.set_slug(self.slug.as_deref().unwrap_or(&self.title));
        am.set_author(self.author);
        am.set_explicit(self.explicit);
        am
    }
}

/// Total and currently published episode counts of one podcast
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct EpisodeCounts {
    pub total: u64,
    pub published: u64,
}

/// Compute both counts for `podcast_id` as of `now`.
pub async fn episode_counts<C>(db: &C, podcast_id: i32, now: i64) -> Result<EpisodeCounts>
where
    C: ConnectionTrait,
{
    let total = EpisodeQuery::for_podcast_id(podcast_id).count(db).await?;
    let published = EpisodeQuery::for_podcast_id(podcast_id)
        .published(now)
        .count(db)
        .await?;
    Ok(EpisodeCounts { total, published })
}

/// A loaded podcast row plus its lazily computed episode counts.
///
/// Each count is queried the first time it is asked for and then kept for
/// the life of this value; load the podcast again to see newer episodes.
#[derive(Debug)]
pub struct PodcastRecord {
    model: podcast::Model,
    media_count: OnceCell<u64>,
    media_count_published: OnceCell<u64>,
}

impl PodcastRecord {
    pub fn new(model: podcast::Model) -> Self {
        Self {
            model,
            media_count: OnceCell::new(),
            media_count_published: OnceCell::new(),
        }
    }

    pub fn model(&self) -> &podcast::Model {
        &self.model
    }

    pub fn into_model(self) -> podcast::Model {
        self.model
    }

    /// Query handle over this podcast's episodes
    pub fn episodes(&self) -> EpisodeQuery {
        EpisodeQuery::of(&self.model)
    }

    /// Number of episodes attached to this podcast.
    pub async fn media_count<C>(&self, db: &C) -> Result<u64>
    where
        C: ConnectionTrait,
    {
        let count = self
            .media_count
            .get_or_try_init(|| self.episodes().count(db))
            .await?;
        Ok(*count)
    }

    /// Number of episodes published right now.
    pub async fn media_count_published<C>(&self, db: &C) -> Result<u64>
    where
        C: ConnectionTrait,
    {
        self.media_count_published_at(db, unix_now()).await
    }

    /// Like [`media_count_published`](Self::media_count_published) with an
    /// explicit clock; only the first call's `now` is used.
    pub async fn media_count_published_at<C>(&self, db: &C, now: i64) -> Result<u64>
    where
        C: ConnectionTrait,
    {
        let count = self
            .media_count_published
            .get_or_try_init(|| self.episodes().published(now).count(db))
            .await?;
        Ok(*count)
    }
}

/// One row of a show listing
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PodcastSummary {
    pub id: i32,
    pub slug: String,
    pub title: String,
    pub author: Author,
    pub explicit: &'static str,
    pub episodes: EpisodeCounts,
}

/// Reads and writes podcasts, notifying observers around every write.
///
/// Methods take the connection to use, so a caller-owned transaction
/// can span several calls.
#[derive(Clone, Default)]
pub struct PodcastStore {
    observers: Vec<Arc<dyn PodcastObserver>>,
}

impl PodcastStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_observer(mut self, observer: Arc<dyn PodcastObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    /// Create a show. The slug is not made unique here; a clash fails with
    /// [`Error::UniqueViolation`]. Use [`available_slug`](Self::available_slug)
    /// first to pick a free one.
    pub async fn create<C>(&self, db: &C, new: NewPodcast) -> Result<podcast::Model>
    where
        C: ConnectionTrait,
    {
        self.insert(db, new.into_active_model()).await
    }

    /// Insert a prepared active model.
    pub async fn insert<C>(&self, db: &C, mut am: podcast::ActiveModel) -> Result<podcast::Model>
    where
        C: ConnectionTrait,
    {
        for observer in &self.observers {
            observer.before_insert(&mut am);
        }
        ensure_slug(&am)?;

        let model = am.insert(db).await.map_err(|e| {
            let err = Error::from(e);
            tracing::warn!("Podcast insert rejected: {}", err);
            err
        })?;
        tracing::debug!(id = model.id, slug = %model.slug, "inserted podcast");

        for observer in &self.observers {
            observer.after_insert(&model);
        }
        Ok(model)
    }

    /// Load podcast `id`, let `edit` change it, and save.
    pub async fn update<C, F>(&self, db: &C, id: i32, edit: F) -> Result<podcast::Model>
    where
        C: ConnectionTrait,
        F: FnOnce(&mut podcast::ActiveModel),
    {
        let existing = self.require(db, id).await?;
        let mut am = existing.into_model().into_active_model();
        edit(&mut am);
        self.save(db, am).await
    }

    /// Save changes to an existing podcast.
    pub async fn save<C>(&self, db: &C, mut am: podcast::ActiveModel) -> Result<podcast::Model>
    where
        C: ConnectionTrait,
    {
        for observer in &self.observers {
            observer.before_update(&mut am);
        }
        ensure_slug(&am)?;

        let model = am.update(db).await.map_err(|e| {
            let err = Error::from(e);
            tracing::warn!("Podcast update rejected: {}", err);
            err
        })?;
        tracing::debug!(id = model.id, slug = %model.slug, "updated podcast");

        for observer in &self.observers {
            observer.after_update(&model);
        }
        Ok(model)
    }

    /// Delete podcast `id`. Its episodes are left to the schema's
    /// referential action.
    pub async fn delete<C>(&self, db: &C, id: i32) -> Result<()>
    where
        C: ConnectionTrait,
    {
        let model = self.require(db, id).await?.into_model();
        for observer in &self.observers {
            observer.before_delete(&model);
        }

        podcast::Entity::delete_by_id(model.id).exec(db).await?;
        tracing::debug!(id = model.id, slug = %model.slug, "deleted podcast");

        for observer in &self.observers {
            observer.after_delete(&model);
        }
        Ok(())
    }

    pub async fn get<C>(&self, db: &C, id: i32) -> Result<Option<PodcastRecord>>
    where
        C: ConnectionTrait,
    {
        let model = podcast::Entity::find_by_id(id).one(db).await?;
        Ok(model.map(PodcastRecord::new))
    }

    /// Like [`get`](Self::get) but a missing podcast is an error.
    pub async fn require<C>(&self, db: &C, id: i32) -> Result<PodcastRecord>
    where
        C: ConnectionTrait,
    {
        self.get(db, id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("id {}", id)))
    }

    pub async fn by_slug<C>(&self, db: &C, slug: &str) -> Result<Option<PodcastRecord>>
    where
        C: ConnectionTrait,
    {
        let model = podcast::Entity::find_by_slug(slug).one(db).await?;
        Ok(model.map(PodcastRecord::new))
    }

    /// Every podcast, ordered by title
    pub async fn list<C>(&self, db: &C) -> Result<Vec<PodcastRecord>>
    where
        C: ConnectionTrait,
    {
        let models = podcast::Entity::find_ordered().all(db).await?;
        Ok(models.into_iter().map(PodcastRecord::new).collect())
    }

    /// Listing rows with episode counts as of `now`
    pub async fn summaries<C>(&self, db: &C, now: i64) -> Result<Vec<PodcastSummary>>
    where
        C: ConnectionTrait,
    {
        let mut summaries = Vec::new();
        for record in self.list(db).await? {
            let total = record.media_count(db).await?;
            let published = record.media_count_published_at(db, now).await?;
            let model = record.into_model();
            summaries.push(PodcastSummary {
                id: model.id,
                author: model.author(),
                explicit: model.explicit_advisory().feed_value(),
                slug: model.slug,
                title: model.title,
                episodes: EpisodeCounts { total, published },
            });
        }
        Ok(summaries)
    }

    /// A slug derived from `input` that no podcast other than `ignore`
    /// is using, made unique by appending `-2`, `-3`, ...
    pub async fn available_slug<C>(&self, db: &C, input: &str, ignore: Option<i32>) -> Result<String>
    where
        C: ConnectionTrait,
    {
        let mut base = slugify(input);
        if base.is_empty() {
            base = FALLBACK_SLUG.to_string();
        }

        let mut candidate = base.clone();
        let mut n = 2;
        while slug_taken(db, &candidate, ignore).await? {
            candidate = with_suffix(&base, n);
            n += 1;
        }
        Ok(candidate)
    }
}

async fn slug_taken<C>(db: &C, slug: &str, ignore: Option<i32>) -> Result<bool>
where
    C: ConnectionTrait,
{
    let mut query = podcast::Entity::find().filter(podcast::Column::Slug.eq(slug));
    if let Some(id) = ignore {
        query = query.filter(podcast::Column::Id.ne(id));
    }
    Ok(query.one(db).await?.is_some())
}

/// Reject a slug that normalizes to nothing before it reaches storage.
fn ensure_slug(am: &podcast::ActiveModel) -> Result<()> {
    match &am.slug {
        ActiveValue::Set(slug) | ActiveValue::Unchanged(slug) if slugify(slug).is_empty() => {
            tracing::warn!("Rejected empty slug {:?}", slug);
            Err(Error::EmptySlug(slug.clone()))
        }
        _ => Ok(()),
    }
}

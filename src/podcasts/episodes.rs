//! Episode queries scoped to a single podcast.

use sea_orm::sea_query::IntoCondition;
use sea_orm::{
    ColumnTrait, ConnectionTrait, EntityTrait, ModelTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Select,
};

use crate::db::entities::{media, podcast};
use crate::error::Result;

/// A not-yet-executed query over one podcast's episodes.
///
/// Nothing is loaded until one of the async finishers (`all`, `count`,
/// `page`) runs, so callers can keep narrowing the query first.
#[derive(Clone, Debug)]
pub struct EpisodeQuery {
    select: Select<media::Entity>,
}

impl EpisodeQuery {
    /// Episodes related to a loaded podcast.
    pub fn of(podcast: &podcast::Model) -> Self {
        Self {
            select: podcast.find_related(media::Entity),
        }
    }

    /// Episodes whose `podcast_id` is `podcast_id`, without loading the podcast.
    pub fn for_podcast_id(podcast_id: i32) -> Self {
        Self {
            select: media::Entity::find().filter(media::Column::PodcastId.eq(podcast_id)),
        }
    }

    /// Keep only episodes that are live at `now`.
    pub fn published(self, now: i64) -> Self {
        self.filter(media::published_condition(now))
    }

    pub fn filter<F: IntoCondition>(mut self, condition: F) -> Self {
        self.select = self.select.filter(condition);
        self
    }

    /// Most recently published first; unscheduled episodes last.
    pub fn newest_first(mut self) -> Self {
        self.select = self
            .select
            .order_by_desc(media::Column::PublishOn)
            .order_by_desc(media::Column::Id);
        self
    }

    pub fn into_select(self) -> Select<media::Entity> {
        self.select
    }

    pub async fn all<C>(self, db: &C) -> Result<Vec<media::Model>>
    where
        C: ConnectionTrait,
    {
        Ok(self.select.all(db).await?)
    }

    pub async fn count<C>(self, db: &C) -> Result<u64>
    where
        C: ConnectionTrait,
    {
        Ok(self.select.count(db).await?)
    }

    /// Zero-based page of at most `page_size` episodes.
    pub async fn page<C>(self, db: &C, page_size: u64, page: u64) -> Result<Vec<media::Model>>
    where
        C: ConnectionTrait,
    {
        Ok(self.select.paginate(db, page_size).fetch_page(page).await?)
    }
}

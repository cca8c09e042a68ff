//! Media entity (podcast episodes)
//!
//! Only the columns the podcast model reads are mapped here.

use async_trait::async_trait;
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue, Condition, Set};
use serde::{Deserialize, Serialize};

use crate::db::unix_now;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "media")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub podcast_id: Option<i32>,
    #[sea_orm(unique)]
    pub slug: String,
    pub title: String,
    pub reviewed: bool,
    pub encoded: bool,
    pub publishable: bool,
    pub publish_on: Option<i64>,
    pub publish_until: Option<i64>,
    pub created_on: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::podcast::Entity",
        from = "Column::PodcastId",
        to = "super::podcast::Column::Id",
        on_update = "Cascade",
        on_delete = "SetNull"
    )]
    Podcast,
}

impl Related<super::podcast::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Podcast.def()
    }
}

#[async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(mut self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        if insert && matches!(self.created_on, ActiveValue::NotSet) {
            self.created_on = Set(unix_now());
        }
        Ok(self)
    }
}

/// Episodes that are live at `now`: reviewed, encoded, publishable,
/// already past `publish_on` and not yet past `publish_until`.
pub fn published_condition(now: i64) -> Condition {
    Condition::all()
        .add(Column::Reviewed.eq(true))
        .add(Column::Encoded.eq(true))
        .add(Column::Publishable.eq(true))
        .add(Column::PublishOn.lte(now))
        .add(
            Condition::any()
                .add(Column::PublishUntil.is_null())
                .add(Column::PublishUntil.gte(now)),
        )
}

impl Model {
    /// In-memory counterpart of [`published_condition`].
    pub fn is_published_at(&self, now: i64) -> bool {
        self.reviewed
            && self.encoded
            && self.publishable
            && self.publish_on.map_or(false, |on| on <= now)
            && self.publish_until.map_or(true, |until| until >= now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn episode() -> Model {
        Model {
            id: 1,
            podcast_id: Some(1),
            slug: "ep-1".to_string(),
            title: "Episode 1".to_string(),
            reviewed: true,
            encoded: true,
            publishable: true,
            publish_on: Some(100),
            publish_until: None,
            created_on: 0,
        }
    }

    #[test]
    fn test_is_published_at() {
        let ep = episode();
        assert!(ep.is_published_at(100));
        assert!(ep.is_published_at(5_000));
        assert!(!ep.is_published_at(99));
    }

    #[test]
    fn test_each_flag_blocks_publication() {
        let mut ep = episode();
        ep.reviewed = false;
        assert!(!ep.is_published_at(200));

        let mut ep = episode();
        ep.encoded = false;
        assert!(!ep.is_published_at(200));

        let mut ep = episode();
        ep.publishable = false;
        assert!(!ep.is_published_at(200));

        let mut ep = episode();
        ep.publish_on = None;
        assert!(!ep.is_published_at(200));
    }

    #[test]
    fn test_publish_window() {
        let mut ep = episode();
        ep.publish_until = Some(300);
        assert!(ep.is_published_at(300));
        assert!(!ep.is_published_at(301));
    }
}

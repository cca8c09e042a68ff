//! Podcast entity: one show's metadata

use std::fmt;

use async_trait::async_trait;
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue, QueryOrder, Set};
use serde::{Deserialize, Serialize};

use crate::author::Author;
use crate::db::unix_now;
use crate::slug::slugify;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "podcasts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Permalink; always stored in `slugify` form.
    #[sea_orm(unique)]
    pub slug: String,
    pub created_on: i64,
    pub modified_on: i64,
    pub title: String,
    pub subtitle: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    /// iTunes category; `Arts > Design` names the Design subcategory of Arts.
    pub category: Option<String>,
    pub author_name: String,
    pub author_email: String,
    /// `Some(true)` explicit, `None` no advisory, `Some(false)` clean.
    pub explicit: Option<bool>,
    pub copyright: Option<String>,
    pub itunes_url: Option<String>,
    /// Feed requests are forwarded here unless they come from FeedBurner.
    pub feedburner_url: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::media::Entity")]
    Media,
}

impl Related<super::media::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Media.def()
    }
}

#[async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(mut self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        if let ActiveValue::Set(slug) = &self.slug {
            let normalized = slugify(slug);
            self.slug = Set(normalized);
        }

        let now = unix_now();
        if insert && matches!(self.created_on, ActiveValue::NotSet) {
            self.created_on = Set(now);
        }
        self.modified_on = Set(now);

        Ok(self)
    }
}

impl ActiveModel {
    /// Assign the slug, normalizing it immediately.
    pub fn set_slug(&mut self, slug: &str) {
        self.slug = Set(slugify(slug));
    }

    /// Write both author columns in one go.
    pub fn set_author(&mut self, author: Author) {
        let (name, email) = author.into_parts();
        self.author_name = Set(name);
        self.author_email = Set(email);
    }

    pub fn set_explicit(&mut self, explicit: Explicit) {
        self.explicit = Set(explicit.into());
    }
}

impl Model {
    pub fn author(&self) -> Author {
        Author::new(self.author_name.clone(), self.author_email.clone())
    }

    pub fn explicit_advisory(&self) -> Explicit {
        Explicit::from(self.explicit)
    }

    /// Category segments from parent to child, e.g. `["Arts", "Design"]`.
    pub fn category_path(&self) -> Vec<&str> {
        self.category
            .as_deref()
            .map(|c| {
                c.split('>')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// URL the feed should redirect to for a request with `user_agent`.
    ///
    /// FeedBurner itself always gets the real feed, otherwise it would
    /// be redirected to its own copy.
    pub fn feed_redirect(&self, user_agent: Option<&str>) -> Option<&str> {
        let url = self.feedburner_url.as_deref().filter(|u| !u.is_empty())?;
        let from_feedburner = user_agent
            .map(|ua| ua.to_ascii_lowercase().contains("feedburner"))
            .unwrap_or(false);
        if from_feedburner {
            None
        } else {
            Some(url)
        }
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Podcast: {}", self.slug)
    }
}

impl Entity {
    /// All podcasts in display order (by title).
    pub fn find_ordered() -> Select<Entity> {
        Self::find()
            .order_by_asc(Column::Title)
            .order_by_asc(Column::Id)
    }

    /// Look up by slug; the input is normalized before comparison.
    pub fn find_by_slug(slug: &str) -> Select<Entity> {
        Self::find().filter(Column::Slug.eq(slugify(slug)))
    }
}

/// iTunes explicit-content advisory
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Explicit {
    /// Explicit content
    Yes,
    /// No advisory is displayed
    #[default]
    #[serde(rename = "no")]
    NoAdvisory,
    /// Explicitly marked clean
    Clean,
}

impl Explicit {
    /// Value used in the `<itunes:explicit>` feed element
    pub fn feed_value(self) -> &'static str {
        match self {
            Explicit::Yes => "yes",
            Explicit::NoAdvisory => "no",
            Explicit::Clean => "clean",
        }
    }
}

impl From<Option<bool>> for Explicit {
    fn from(value: Option<bool>) -> Self {
        match value {
            Some(true) => Explicit::Yes,
            None => Explicit::NoAdvisory,
            Some(false) => Explicit::Clean,
        }
    }
}

impl From<Explicit> for Option<bool> {
    fn from(value: Explicit) -> Self {
        match value {
            Explicit::Yes => Some(true),
            Explicit::NoAdvisory => None,
            Explicit::Clean => Some(false),
        }
    }
}

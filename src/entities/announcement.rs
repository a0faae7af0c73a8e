//! Announcement entity - News items shown on the ordering page when published.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Announcement database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "announcements")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Headline
    pub title: String,
    /// Body text
    pub body: String,
    /// Optional picture reference
    pub image_ref: Option<String>,
    /// Only published announcements reach the feed
    pub is_published: bool,
    /// When the announcement was created
    pub created_at: DateTimeUtc,
}

/// `Announcement` has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

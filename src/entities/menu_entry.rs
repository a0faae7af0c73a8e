//! Menu entry entity - The menu published for one calendar day and category.
//!
//! One entry per (date, category) is expected. Duplicates are a data-entry
//! error; resolution simply picks the first match.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// What kind of order a menu (and every order placed against it) belongs to.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "lowercase")]
pub enum MenuCategory {
    /// Lunch boxes and other meals
    #[sea_orm(string_value = "meal")]
    Meal,
    /// Drinks
    #[sea_orm(string_value = "drink")]
    Drink,
    /// Group buys
    #[sea_orm(string_value = "group")]
    Group,
}

impl MenuCategory {
    /// All categories in display order.
    pub const ALL: [Self; 3] = [Self::Meal, Self::Drink, Self::Group];

    /// Label used in exported reports.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Meal => "餐食",
            Self::Drink => "飲料",
            Self::Group => "團購",
        }
    }
}

/// Menu entry database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "menu_entries")]
pub struct Model {
    /// Unique identifier for the menu entry
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Calendar day this menu applies to
    pub menu_date: Date,
    /// Meal, drink or group buy
    pub category: MenuCategory,
    /// Name of the shop supplying the food
    pub store_name: String,
    /// Free text shown under the store name
    pub description: String,
    /// Local time-of-day after which ordering closes; None means no cutoff
    pub cutoff_time: Option<Time>,
    /// Reference to the menu picture, if any
    pub image_ref: Option<String>,
}

/// `MenuEntry` has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

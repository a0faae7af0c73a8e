//! Order entity - A submitted order.
//!
//! `line_items`, `total_amount`, `combined_note` and `order_date` are frozen at
//! submission. Only `status` and `is_paid` change afterwards.

use super::menu_entry::MenuCategory;
use sea_orm::FromJsonQueryResult;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Fulfilment state of an order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Initial state
    #[sea_orm(string_value = "preparing")]
    Preparing,
    /// Handed over
    #[sea_orm(string_value = "served")]
    Served,
}

impl OrderStatus {
    /// The other state. Applying it twice gives back the starting status.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Preparing => Self::Served,
            Self::Served => Self::Preparing,
        }
    }

    /// Label used in exported reports.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Preparing => "準備中",
            Self::Served => "已出餐",
        }
    }
}

/// Snapshot of one cart line taken at submission time.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// What was ordered
    pub item_name: String,
    /// Price per unit, in whole currency units
    pub unit_price: i64,
    /// Free-text note for this line ("less ice")
    pub note: String,
    /// Number of units
    pub quantity: u32,
}

impl LineItem {
    /// `unit_price × quantity`, saturating at `i64::MAX`.
    #[must_use]
    pub fn subtotal(&self) -> i64 {
        self.unit_price.saturating_mul(i64::from(self.quantity))
    }
}

/// Ordered line items stored as a single JSON column.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct LineItems(pub Vec<LineItem>);

/// Order database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "orders")]
pub struct Model {
    /// Unique identifier for the order
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Roster name of the person the order is for
    pub requester_name: String,
    /// Lines as they were in the cart at submission
    #[sea_orm(column_type = "Json")]
    pub line_items: LineItems,
    /// Sum of line subtotals at submission; never recomputed
    pub total_amount: i64,
    /// Non-empty line notes joined together
    pub combined_note: String,
    /// Preparing or served
    pub status: OrderStatus,
    /// Whether the requester has paid
    pub is_paid: bool,
    /// Menu category the order was placed against
    pub category: MenuCategory,
    /// Calendar day of submission; the only key used for reporting periods
    pub order_date: Date,
    /// Assigned by the engine when the order is persisted
    pub created_at: DateTimeUtc,
}

/// `Order` has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

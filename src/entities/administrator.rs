//! Administrator entity - Accounts allowed into the management side.
//!
//! The role decides who may delete other administrator accounts.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Administrator role
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "lowercase")]
pub enum AdminRole {
    /// May delete any administrator except themself
    #[sea_orm(string_value = "super")]
    Super,
    /// May view and edit, never delete administrators
    #[sea_orm(string_value = "normal")]
    Normal,
}

/// Administrator database model
#[derive(Clone, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "administrators")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Login name; unique and never changed after creation
    #[sea_orm(unique)]
    pub username: String,
    /// Name shown in the UI
    pub display_name: String,
    /// Shared-secret credential compared by plain equality
    pub pin: String,
    /// Super or normal
    pub role: AdminRole,
}

// Keep the pin out of logs.
impl std::fmt::Debug for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Administrator")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("display_name", &self.display_name)
            .field("pin", &"***")
            .field("role", &self.role)
            .finish()
    }
}

/// `Administrator` has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

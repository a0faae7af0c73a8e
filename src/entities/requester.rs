//! Requester entity - A person orders can be placed for.
//! Names are unique in practice only; imports dedupe on name equality.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Requester database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "requesters")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display name, also copied onto orders
    pub name: String,
}

/// `Requester` has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

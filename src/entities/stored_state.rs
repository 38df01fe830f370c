//! Stored state entity - one opaque value per key.
//! The usage store keeps its whole JSON snapshot in a single row.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Stored state database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "stored_state")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Storage key (e.g., `"cc_benefit_tracker_v1"`)
    #[sea_orm(unique)]
    pub key: String,
    /// Opaque value, JSON for the usage snapshot
    #[sea_orm(column_type = "Text")]
    pub value: String,
    /// When this value was last written
    pub updated_at: DateTime,
}

/// `StoredState` has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

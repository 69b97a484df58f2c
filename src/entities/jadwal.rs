//! Jadwal entity - A weekly schedule slot taught by one teacher.
//!
//! Slots point at their teacher by `guru_id`. The teacher's name is only joined in
//! for display, so renaming a teacher keeps every slot attached.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Schedule database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "jadwal")]
pub struct Model {
    /// Unique identifier for the slot
    #[sea_orm(primary_key)]
    pub id_matkul: i64,
    /// ID of the teacher who owns this slot
    pub guru_id: i64,
    /// Subject taught in this slot
    pub mapel: String,
    /// Day of the week (e.g., "Senin")
    pub hari: String,
    /// Time range (e.g., "07:00-08:30")
    pub jam: String,
}

/// Defines relationships between Jadwal and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each slot belongs to one teacher
    #[sea_orm(
        belongs_to = "super::guru::Entity",
        from = "Column::GuruId",
        to = "super::guru::Column::Id",
        on_update = "Cascade",
        on_delete = "Restrict"
    )]
    Guru,
}

impl Related<super::guru::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Guru.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

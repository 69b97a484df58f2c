//! Guru entity - A teacher who can be assigned to schedule slots.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Teacher database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "guru")]
pub struct Model {
    /// Unique identifier for the teacher
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Teacher's full name
    pub nama_guru: String,
    /// Subject the teacher is responsible for
    pub mata_pelajaran: String,
    /// Contact phone number
    pub no_telepon: String,
}

/// Defines relationships between Guru and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One teacher owns many schedule slots
    #[sea_orm(has_many = "super::jadwal::Entity")]
    Jadwal,
}

impl Related<super::jadwal::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Jadwal.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

//! Teacher (guru) business logic.
//!
//! Teachers own schedule slots through `jadwal.guru_id`. Deleting a teacher who
//! still owns slots is refused by the foreign key; the refusal is reported with
//! the number of slots that still point at the teacher.

use crate::{
    core::payload::non_empty,
    entities::{Guru, Jadwal, guru, jadwal},
    errors::{Error, Result, is_foreign_key_violation},
};
use sea_orm::{ActiveValue::NotSet, PaginatorTrait, QueryOrder, Set, prelude::*};
use serde::Deserialize;
use tracing::{debug, instrument, warn};

const RESOURCE: &str = "Teacher";

/// Raw teacher fields as they arrive in a request body.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct GuruPayload {
    /// Teacher's name
    pub nama_guru: Option<String>,
    /// Subject
    pub mata_pelajaran: Option<String>,
    /// Phone number
    pub no_telepon: Option<String>,
}

/// A validated teacher ready to be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewGuru {
    /// Teacher's name
    pub nama_guru: String,
    /// Subject
    pub mata_pelajaran: String,
    /// Phone number
    pub no_telepon: String,
}

/// A validated partial update. Only `Some` fields are written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GuruPatch {
    /// New name
    pub nama_guru: Option<String>,
    /// New subject
    pub mata_pelajaran: Option<String>,
    /// New phone number
    pub no_telepon: Option<String>,
}

impl TryFrom<GuruPayload> for NewGuru {
    type Error = Error;

    fn try_from(payload: GuruPayload) -> Result<Self> {
        let (Some(nama_guru), Some(mata_pelajaran), Some(no_telepon)) =
            (payload.nama_guru, payload.mata_pelajaran, payload.no_telepon)
        else {
            return Err(Error::validation(
                "Nama guru, mata pelajaran and no telepon are required",
            ));
        };
        Ok(Self {
            nama_guru: non_empty(nama_guru, "Nama guru")?,
            mata_pelajaran: non_empty(mata_pelajaran, "Mata pelajaran")?,
            no_telepon: non_empty(no_telepon, "No telepon")?,
        })
    }
}

impl TryFrom<GuruPayload> for GuruPatch {
    type Error = Error;

    fn try_from(payload: GuruPayload) -> Result<Self> {
        let patch = Self {
            nama_guru: payload
                .nama_guru
                .map(|v| non_empty(v, "Nama guru"))
                .transpose()?,
            mata_pelajaran: payload
                .mata_pelajaran
                .map(|v| non_empty(v, "Mata pelajaran"))
                .transpose()?,
            no_telepon: payload
                .no_telepon
                .map(|v| non_empty(v, "No telepon"))
                .transpose()?,
        };
        if patch.is_empty() {
            return Err(Error::validation("No fields to update"));
        }
        Ok(patch)
    }
}

impl GuruPatch {
    /// True when the patch would change nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.nama_guru.is_none() && self.mata_pelajaran.is_none() && self.no_telepon.is_none()
    }

    fn into_active_model(self) -> guru::ActiveModel {
        guru::ActiveModel {
            id: NotSet,
            nama_guru: self.nama_guru.map_or(NotSet, Set),
            mata_pelajaran: self.mata_pelajaran.map_or(NotSet, Set),
            no_telepon: self.no_telepon.map_or(NotSet, Set),
        }
    }
}

/// Retrieves all teachers, newest first.
pub async fn list_gurus(db: &DatabaseConnection) -> Result<Vec<guru::Model>> {
    Guru::find()
        .order_by_desc(guru::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves one teacher by id.
///
/// # Errors
/// Returns [`Error::NotFound`] if no teacher has this id.
pub async fn get_guru(db: &DatabaseConnection, guru_id: i64) -> Result<guru::Model> {
    Guru::find_by_id(guru_id)
        .one(db)
        .await?
        .ok_or(Error::NotFound { resource: RESOURCE })
}

/// Finds a teacher by exact name, returning None if there is none.
pub async fn find_by_name(db: &DatabaseConnection, name: &str) -> Result<Option<guru::Model>> {
    Guru::find()
        .filter(guru::Column::NamaGuru.eq(name.trim()))
        .order_by_asc(guru::Column::Id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Inserts a new teacher and returns the stored row.
#[instrument(skip(db))]
pub async fn create_guru(db: &DatabaseConnection, new: NewGuru) -> Result<guru::Model> {
    let model = guru::ActiveModel {
        nama_guru: Set(new.nama_guru),
        mata_pelajaran: Set(new.mata_pelajaran),
        no_telepon: Set(new.no_telepon),
        ..Default::default()
    };
    let created = model.insert(db).await?;
    debug!(id = created.id, "Teacher created");
    Ok(created)
}

/// Applies a partial update. Fields absent from the patch keep their values.
///
/// Renaming a teacher leaves their schedule slots attached.
#[instrument(skip(db))]
pub async fn update_guru(db: &DatabaseConnection, guru_id: i64, patch: GuruPatch) -> Result<()> {
    if patch.is_empty() {
        return Err(Error::validation("No fields to update"));
    }

    let result = Guru::update_many()
        .set(patch.into_active_model())
        .filter(guru::Column::Id.eq(guru_id))
        .exec(db)
        .await?;

    if result.rows_affected == 0 {
        return Err(Error::NotFound { resource: RESOURCE });
    }
    Ok(())
}

/// Counts the schedule slots owned by a teacher.
pub async fn count_schedules(db: &DatabaseConnection, guru_id: i64) -> Result<u64> {
    Jadwal::find()
        .filter(jadwal::Column::GuruId.eq(guru_id))
        .count(db)
        .await
        .map_err(Into::into)
}

/// Deletes a teacher by id.
///
/// # Errors
/// Returns [`Error::Conflict`] with the live slot count when the teacher still
/// owns schedule slots, and [`Error::NotFound`] when nothing was deleted.
#[instrument(skip(db))]
pub async fn delete_guru(db: &DatabaseConnection, guru_id: i64) -> Result<()> {
    let result = match Guru::delete_by_id(guru_id).exec(db).await {
        Ok(result) => result,
        Err(e) if is_foreign_key_violation(&e) => {
            let references = count_schedules(db, guru_id).await?;
            warn!(guru_id, references, "Refusing to delete teacher with schedules");
            return Err(Error::Conflict {
                message: format!(
                    "Cannot delete teacher: {references} schedule(s) still use this teacher. \
                     Delete or reassign those schedules first"
                ),
                references,
            });
        }
        Err(e) => return Err(e.into()),
    };

    if result.rows_affected == 0 {
        return Err(Error::NotFound { resource: RESOURCE });
    }
    Ok(())
}

//! Schedule (jadwal) business logic.
//!
//! A slot names its teacher either directly by `guru_id` or, for callers that
//! only know the name, by `guru`; the name is resolved to an id once, before the
//! write. The foreign key on `guru_id` is what actually guarantees the teacher
//! exists, so a concurrent teacher delete cannot leave a dangling slot.

use crate::{
    core::{
        guru,
        payload::{Numeric, non_empty},
    },
    entities::{Guru, Jadwal, jadwal},
    errors::{Error, Result, is_foreign_key_violation},
    models::JadwalDetail,
};
use sea_orm::{ActiveValue::NotSet, QueryOrder, Set, prelude::*};
use serde::Deserialize;
use tracing::{debug, instrument};

const RESOURCE: &str = "Schedule";

/// Raw schedule fields as they arrive in a request body.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct JadwalPayload {
    /// Teacher id; takes precedence over `guru`
    pub guru_id: Option<Numeric>,
    /// Teacher name, resolved to an id
    pub guru: Option<String>,
    /// Subject
    pub mapel: Option<String>,
    /// Day of the week
    pub hari: Option<String>,
    /// Time range
    pub jam: Option<String>,
}

/// How a payload refers to its teacher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuruRef {
    /// By primary key
    Id(i64),
    /// By exact name
    Name(String),
}

impl GuruRef {
    fn from_payload(guru_id: Option<Numeric>, guru: Option<String>) -> Result<Option<Self>> {
        if let Some(id) = guru_id {
            return Ok(Some(Self::Id(id.to_i64("Guru ID")?)));
        }
        guru.map(|name| non_empty(name, "Guru").map(Self::Name))
            .transpose()
    }
}

/// A validated schedule slot ready to be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewJadwal {
    /// Owning teacher
    pub guru: GuruRef,
    /// Subject
    pub mapel: String,
    /// Day of the week
    pub hari: String,
    /// Time range
    pub jam: String,
}

/// A validated partial update. Only `Some` fields are written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JadwalPatch {
    /// New owning teacher
    pub guru: Option<GuruRef>,
    /// New subject
    pub mapel: Option<String>,
    /// New day
    pub hari: Option<String>,
    /// New time range
    pub jam: Option<String>,
}

impl TryFrom<JadwalPayload> for NewJadwal {
    type Error = Error;

    fn try_from(payload: JadwalPayload) -> Result<Self> {
        let guru = GuruRef::from_payload(payload.guru_id, payload.guru)?;
        let (Some(guru), Some(mapel), Some(hari), Some(jam)) =
            (guru, payload.mapel, payload.hari, payload.jam)
        else {
            return Err(Error::validation("Guru, mapel, hari and jam are required"));
        };
        Ok(Self {
            guru,
            mapel: non_empty(mapel, "Mapel")?,
            hari: non_empty(hari, "Hari")?,
            jam: non_empty(jam, "Jam")?,
        })
    }
}

impl TryFrom<JadwalPayload> for JadwalPatch {
    type Error = Error;

    fn try_from(payload: JadwalPayload) -> Result<Self> {
        let patch = Self {
            guru: GuruRef::from_payload(payload.guru_id, payload.guru)?,
            mapel: payload.mapel.map(|v| non_empty(v, "Mapel")).transpose()?,
            hari: payload.hari.map(|v| non_empty(v, "Hari")).transpose()?,
            jam: payload.jam.map(|v| non_empty(v, "Jam")).transpose()?,
        };
        if patch.is_empty() {
            return Err(Error::validation("No fields to update"));
        }
        Ok(patch)
    }
}

impl JadwalPatch {
    /// True when the patch would change nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.guru.is_none() && self.mapel.is_none() && self.hari.is_none() && self.jam.is_none()
    }
}

fn missing_teacher(what: Option<String>) -> Error {
    let subject = what.map_or_else(|| "Teacher".to_string(), |w| format!("Teacher {w}"));
    Error::validation(format!("{subject} not found. Please add the teacher first"))
}

/// Resolves a teacher reference to an id.
///
/// Names are looked up; ids are passed through and checked by the foreign key
/// when the row is written.
pub async fn resolve_guru(db: &DatabaseConnection, reference: GuruRef) -> Result<i64> {
    match reference {
        GuruRef::Id(id) => Ok(id),
        GuruRef::Name(name) => guru::find_by_name(db, &name)
            .await?
            .map(|g| g.id)
            .ok_or_else(|| missing_teacher(Some(format!("'{name}'")))),
    }
}

fn map_write_error(err: DbErr, guru_id: Option<i64>) -> Error {
    if is_foreign_key_violation(&err) {
        return missing_teacher(guru_id.map(|id| format!("with id {id}")));
    }
    err.into()
}

/// Retrieves all slots with their teacher's name, ordered by day then time.
pub async fn list_jadwal(db: &DatabaseConnection) -> Result<Vec<JadwalDetail>> {
    let rows = Jadwal::find()
        .find_also_related(Guru)
        .order_by_asc(jadwal::Column::Hari)
        .order_by_asc(jadwal::Column::Jam)
        .all(db)
        .await?;
    Ok(rows.into_iter().map(JadwalDetail::from).collect())
}

/// Retrieves one slot with its teacher's name.
///
/// # Errors
/// Returns [`Error::NotFound`] if no slot has this id.
pub async fn get_jadwal(db: &DatabaseConnection, id_matkul: i64) -> Result<JadwalDetail> {
    Jadwal::find_by_id(id_matkul)
        .find_also_related(Guru)
        .one(db)
        .await?
        .map(JadwalDetail::from)
        .ok_or(Error::NotFound { resource: RESOURCE })
}

/// Inserts a new slot and returns the stored row.
///
/// # Errors
/// Returns [`Error::Validation`] if the teacher does not exist.
#[instrument(skip(db))]
pub async fn create_jadwal(db: &DatabaseConnection, new: NewJadwal) -> Result<jadwal::Model> {
    let guru_id = resolve_guru(db, new.guru).await?;
    let model = jadwal::ActiveModel {
        guru_id: Set(guru_id),
        mapel: Set(new.mapel),
        hari: Set(new.hari),
        jam: Set(new.jam),
        ..Default::default()
    };
    let created = model
        .insert(db)
        .await
        .map_err(|e| map_write_error(e, Some(guru_id)))?;
    debug!(id = created.id_matkul, "Schedule created");
    Ok(created)
}

/// Applies a partial update. Fields absent from the patch keep their values.
///
/// # Errors
/// Returns [`Error::Validation`] for an empty patch or an unknown teacher,
/// and [`Error::NotFound`] when no row was affected.
#[instrument(skip(db))]
pub async fn update_jadwal(
    db: &DatabaseConnection,
    id_matkul: i64,
    patch: JadwalPatch,
) -> Result<()> {
    if patch.is_empty() {
        return Err(Error::validation("No fields to update"));
    }

    let guru_id = match patch.guru {
        Some(reference) => Some(resolve_guru(db, reference).await?),
        None => None,
    };
    let model = jadwal::ActiveModel {
        id_matkul: NotSet,
        guru_id: guru_id.map_or(NotSet, Set),
        mapel: patch.mapel.map_or(NotSet, Set),
        hari: patch.hari.map_or(NotSet, Set),
        jam: patch.jam.map_or(NotSet, Set),
    };

    let result = Jadwal::update_many()
        .set(model)
        .filter(jadwal::Column::IdMatkul.eq(id_matkul))
        .exec(db)
        .await
        .map_err(|e| map_write_error(e, guru_id))?;

    if result.rows_affected == 0 {
        return Err(Error::NotFound { resource: RESOURCE });
    }
    Ok(())
}

/// Deletes a slot by id.
///
/// # Errors
/// Returns [`Error::NotFound`] when nothing was deleted.
#[instrument(skip(db))]
pub async fn delete_jadwal(db: &DatabaseConnection, id_matkul: i64) -> Result<()> {
    let result = Jadwal::delete_by_id(id_matkul).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::NotFound { resource: RESOURCE });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;

    fn new_slot(guru: GuruRef, hari: &str) -> NewJadwal {
        NewJadwal {
            guru,
            mapel: "Fisika".to_string(),
            hari: hari.to_string(),
            jam: "07:00-08:30".to_string(),
        }
    }

    #[test]
    fn test_payload_prefers_guru_id() {
        let payload = JadwalPayload {
            guru_id: Some(Numeric::Text("4".to_string())),
            guru: Some("Budi".to_string()),
            mapel: Some("Fisika".to_string()),
            hari: Some("Senin".to_string()),
            jam: Some("07:00".to_string()),
        };
        let new = NewJadwal::try_from(payload).unwrap();
        assert_eq!(new.guru, GuruRef::Id(4));
    }

    #[test]
    fn test_payload_requires_teacher() {
        let payload = JadwalPayload {
            mapel: Some("Fisika".to_string()),
            hari: Some("Senin".to_string()),
            jam: Some("07:00".to_string()),
            ..Default::default()
        };
        assert_eq!(
            NewJadwal::try_from(payload).unwrap_err().to_string(),
            "Guru, mapel, hari and jam are required"
        );
    }

    #[tokio::test]
    async fn test_create_by_name_joins_teacher() -> Result<()> {
        let db = setup_test_db().await?;
        let guru = create_test_guru(&db, "Budi").await?;

        let created = create_jadwal(&db, new_slot(GuruRef::Name("Budi".to_string()), "Senin"))
            .await?;
        assert_eq!(created.guru_id, guru.id);

        let detail = get_jadwal(&db, created.id_matkul).await?;
        assert_eq!(detail.guru.as_deref(), Some("Budi"));
        assert_eq!(detail.mapel, "Fisika");
        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_teacher_is_client_error() -> Result<()> {
        let db = setup_test_db().await?;

        let by_name = create_jadwal(&db, new_slot(GuruRef::Name("Nobody".to_string()), "Senin"))
            .await
            .unwrap_err();
        assert!(matches!(by_name, Error::Validation { .. }));
        assert!(by_name.to_string().contains("add the teacher first"));

        let by_id = create_jadwal(&db, new_slot(GuruRef::Id(77), "Senin"))
            .await
            .unwrap_err();
        assert!(matches!(by_id, Error::Validation { .. }));
        Ok(())
    }

    #[tokio::test]
    async fn test_update_to_unknown_teacher_is_client_error() -> Result<()> {
        let db = setup_test_db().await?;
        let guru = create_test_guru(&db, "Budi").await?;
        let slot = create_test_jadwal(&db, guru.id, "Senin").await?;

        let result = update_jadwal(
            &db,
            slot.id_matkul,
            JadwalPatch {
                guru: Some(GuruRef::Name("Nobody".to_string())),
                ..Default::default()
            },
        )
        .await;
        assert!(matches!(result, Err(Error::Validation { .. })));

        let unchanged = get_jadwal(&db, slot.id_matkul).await?;
        assert_eq!(unchanged.guru_id, guru.id);
        Ok(())
    }

    #[tokio::test]
    async fn test_partial_update_changes_only_given_fields() -> Result<()> {
        let db = setup_test_db().await?;
        let guru = create_test_guru(&db, "Budi").await?;
        let slot = create_test_jadwal(&db, guru.id, "Senin").await?;

        update_jadwal(
            &db,
            slot.id_matkul,
            JadwalPatch {
                jam: Some("10:00-11:30".to_string()),
                ..Default::default()
            },
        )
        .await?;

        let detail = get_jadwal(&db, slot.id_matkul).await?;
        assert_eq!(detail.jam, "10:00-11:30");
        assert_eq!(detail.hari, "Senin");
        assert_eq!(detail.mapel, slot.mapel);
        Ok(())
    }

    #[tokio::test]
    async fn test_list_orders_by_day_then_time() -> Result<()> {
        let db = setup_test_db().await?;
        let guru = create_test_guru(&db, "Budi").await?;
        create_test_jadwal(&db, guru.id, "Selasa").await?;
        create_jadwal(
            &db,
            NewJadwal {
                jam: "06:00-07:00".to_string(),
                ..new_slot(GuruRef::Id(guru.id), "Rabu")
            },
        )
        .await?;
        create_test_jadwal(&db, guru.id, "Rabu").await?;

        let rows = list_jadwal(&db).await?;
        let order: Vec<(&str, &str)> = rows
            .iter()
            .map(|j| (j.hari.as_str(), j.jam.as_str()))
            .collect();
        assert_eq!(
            order,
            vec![
                ("Rabu", "06:00-07:00"),
                ("Rabu", "07:00-08:30"),
                ("Selasa", "07:00-08:30"),
            ]
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found() -> Result<()> {
        let db = setup_test_db().await?;
        assert!(matches!(
            delete_jadwal(&db, 1).await,
            Err(Error::NotFound { resource: "Schedule" })
        ));
        Ok(())
    }
}

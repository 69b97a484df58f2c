//! Shared test utilities for `tabledesk`.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test entities with sensible defaults.

use crate::{
    config::{Instance, database::create_tables},
    core::{
        guru::{self, NewGuru},
        jadwal::{self, GuruRef, NewJadwal},
        product::{self, NewProduct},
        transaction::{self, NewTransaction},
    },
    entities,
    errors::Result,
};
use sea_orm::DatabaseConnection;

/// Creates an in-memory `SQLite` database with the tables of both instances.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    create_tables(&db, Instance::Inventory).await?;
    create_tables(&db, Instance::School).await?;
    Ok(db)
}

/// Creates a test product with the given name and price.
pub async fn create_test_product(
    db: &DatabaseConnection,
    name: &str,
    price: f64,
) -> Result<entities::product::Model> {
    product::create_product(
        db,
        NewProduct {
            name: name.to_string(),
            price,
        },
    )
    .await
}

/// Creates a test transaction for a product.
pub async fn create_test_transaction(
    db: &DatabaseConnection,
    product_id: i64,
    quantity: i64,
) -> Result<entities::transaction::Model> {
    transaction::create_transaction(
        db,
        NewTransaction {
            product_id,
            quantity,
        },
    )
    .await
}

/// Creates a test teacher.
///
/// # Defaults
/// * `mata_pelajaran`: "Matematika"
/// * `no_telepon`: "08123456789"
pub async fn create_test_guru(db: &DatabaseConnection, name: &str) -> Result<entities::guru::Model> {
    guru::create_guru(
        db,
        NewGuru {
            nama_guru: name.to_string(),
            mata_pelajaran: "Matematika".to_string(),
            no_telepon: "08123456789".to_string(),
        },
    )
    .await
}

/// Creates a test schedule slot for a teacher on the given day.
///
/// # Defaults
/// * `mapel`: "Fisika"
/// * `jam`: "07:00-08:30"
pub async fn create_test_jadwal(
    db: &DatabaseConnection,
    guru_id: i64,
    hari: &str,
) -> Result<entities::jadwal::Model> {
    jadwal::create_jadwal(
        db,
        NewJadwal {
            guru: GuruRef::Id(guru_id),
            mapel: "Fisika".to_string(),
            hari: hari.to_string(),
            jam: "07:00-08:30".to_string(),
        },
    )
    .await
}

/// Sets up a test database with one product ("Pen", 5000).
/// Returns (db, product) for transaction-related tests.
pub async fn setup_with_product() -> Result<(DatabaseConnection, entities::product::Model)> {
    let db = setup_test_db().await?;
    let product = create_test_product(&db, "Pen", 5000.0).await?;
    Ok((db, product))
}

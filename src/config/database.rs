//! Database configuration module.
//!
//! This module handles the database connection and table creation using `SeaORM`.
//! Tables are generated from the entity definitions with
//! `Schema::create_table_from_entity`, so the foreign keys declared on the entities
//! (`ON DELETE RESTRICT`) are enforced by the storage engine itself.

use crate::config::Instance;
use crate::entities::{Guru, Jadwal, Product, Transaction};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, EntityTrait, Schema};
use tracing::{debug, info, instrument};

/// Opens a connection pool for the given URL.
#[instrument(skip(database_url))]
pub async fn create_connection(database_url: &str) -> Result<DatabaseConnection> {
    debug!("Connecting to database");
    let db = Database::connect(database_url).await?;
    info!("Database connection established");
    Ok(db)
}

/// Creates the two tables of the given instance if they do not exist yet.
///
/// Referenced tables are created before the tables that point at them.
pub async fn create_tables(db: &DatabaseConnection, instance: Instance) -> Result<()> {
    match instance {
        Instance::Inventory => {
            create_table(db, Product).await?;
            create_table(db, Transaction).await?;
        }
        Instance::School => {
            create_table(db, Guru).await?;
            create_table(db, Jadwal).await?;
        }
    }
    info!(?instance, "Database tables ensured");
    Ok(())
}

async fn create_table<E: EntityTrait>(db: &DatabaseConnection, entity: E) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);
    let mut statement = schema.create_table_from_entity(entity);
    statement.if_not_exists();
    db.execute(builder.build(&statement)).await?;
    Ok(())
}

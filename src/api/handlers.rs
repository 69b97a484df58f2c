//! Per-resource verb handlers.
//!
//! Each function maps one HTTP verb onto one core operation. PUT and DELETE need
//! an id; bodies are parsed into typed payloads before any storage access.

use crate::{
    api::response::{created, message, ok},
    core::{
        guru::{self, GuruPatch, GuruPayload, NewGuru},
        jadwal::{self, JadwalPatch, JadwalPayload, NewJadwal},
        payload::parse_body,
        product::{self, NewProduct, ProductPatch, ProductPayload},
        transaction::{self, NewTransaction, TransactionPatch, TransactionPayload},
    },
    errors::{Error, Result},
};
use axum::{http::Method, response::Response};
use sea_orm::DatabaseConnection;

fn require_id(id: Option<i64>, label: &str) -> Result<i64> {
    id.ok_or_else(|| Error::validation(format!("{label} ID is required")))
}

/// `endpoint=products`
pub async fn products(
    db: &DatabaseConnection,
    method: &Method,
    id: Option<i64>,
    body: &[u8],
) -> Result<Response> {
    match *method {
        Method::GET => match id {
            Some(id) => Ok(ok(product::get_product(db, id).await?)),
            None => Ok(ok(product::list_products(db).await?)),
        },
        Method::POST => {
            let new = NewProduct::try_from(parse_body::<ProductPayload>(body)?)?;
            let row = product::create_product(db, new).await?;
            Ok(created("Product created successfully", row.id))
        }
        Method::PUT => {
            let id = require_id(id, "Product")?;
            let patch = ProductPatch::try_from(parse_body::<ProductPayload>(body)?)?;
            product::update_product(db, id, patch).await?;
            Ok(message("Product updated successfully"))
        }
        Method::DELETE => {
            product::delete_product(db, require_id(id, "Product")?).await?;
            Ok(message("Product deleted successfully"))
        }
        _ => Err(Error::MethodNotAllowed),
    }
}

/// `endpoint=transactions`
pub async fn transactions(
    db: &DatabaseConnection,
    method: &Method,
    id: Option<i64>,
    body: &[u8],
) -> Result<Response> {
    match *method {
        Method::GET => match id {
            Some(id) => Ok(ok(transaction::get_transaction(db, id).await?)),
            None => Ok(ok(transaction::list_transactions(db).await?)),
        },
        Method::POST => {
            let new = NewTransaction::try_from(parse_body::<TransactionPayload>(body)?)?;
            let row = transaction::create_transaction(db, new).await?;
            Ok(created("Transaction created successfully", row.id))
        }
        Method::PUT => {
            let id = require_id(id, "Transaction")?;
            let patch = TransactionPatch::try_from(parse_body::<TransactionPayload>(body)?)?;
            transaction::update_transaction(db, id, patch).await?;
            Ok(message("Transaction updated successfully"))
        }
        Method::DELETE => {
            transaction::delete_transaction(db, require_id(id, "Transaction")?).await?;
            Ok(message("Transaction deleted successfully"))
        }
        _ => Err(Error::MethodNotAllowed),
    }
}

/// `endpoint=guru`
pub async fn gurus(
    db: &DatabaseConnection,
    method: &Method,
    id: Option<i64>,
    body: &[u8],
) -> Result<Response> {
    match *method {
        Method::GET => match id {
            Some(id) => Ok(ok(guru::get_guru(db, id).await?)),
            None => Ok(ok(guru::list_gurus(db).await?)),
        },
        Method::POST => {
            let new = NewGuru::try_from(parse_body::<GuruPayload>(body)?)?;
            let row = guru::create_guru(db, new).await?;
            Ok(created("Teacher created successfully", row.id))
        }
        Method::PUT => {
            let id = require_id(id, "Teacher")?;
            let patch = GuruPatch::try_from(parse_body::<GuruPayload>(body)?)?;
            guru::update_guru(db, id, patch).await?;
            Ok(message("Teacher updated successfully"))
        }
        Method::DELETE => {
            guru::delete_guru(db, require_id(id, "Teacher")?).await?;
            Ok(message("Teacher deleted successfully"))
        }
        _ => Err(Error::MethodNotAllowed),
    }
}

/// `endpoint=jadwal`
pub async fn jadwal(
    db: &DatabaseConnection,
    method: &Method,
    id: Option<i64>,
    body: &[u8],
) -> Result<Response> {
    match *method {
        Method::GET => match id {
            Some(id) => Ok(ok(jadwal::get_jadwal(db, id).await?)),
            None => Ok(ok(jadwal::list_jadwal(db).await?)),
        },
        Method::POST => {
            let new = NewJadwal::try_from(parse_body::<JadwalPayload>(body)?)?;
            let row = jadwal::create_jadwal(db, new).await?;
            Ok(created("Schedule created successfully", row.id_matkul))
        }
        Method::PUT => {
            let id = require_id(id, "Schedule")?;
            let patch = JadwalPatch::try_from(parse_body::<JadwalPayload>(body)?)?;
            jadwal::update_jadwal(db, id, patch).await?;
            Ok(message("Schedule updated successfully"))
        }
        Method::DELETE => {
            jadwal::delete_jadwal(db, require_id(id, "Schedule")?).await?;
            Ok(message("Schedule deleted successfully"))
        }
        _ => Err(Error::MethodNotAllowed),
    }
}

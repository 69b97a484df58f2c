//! Enriched read models.
//!
//! These rows are what the API returns for resources that join a related table.
//! They are not tables themselves; the extra fields are filled in from the join
//! and are absent when the related row is missing.

use crate::entities::{guru, jadwal, product, transaction};
use serde::{Deserialize, Serialize};

/// A transaction together with the name and unit price of its product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionDetail {
    /// Transaction id
    pub id: i64,
    /// Referenced product id
    pub product_id: i64,
    /// Units sold
    pub quantity: i64,
    /// Joined product name
    #[serde(default)]
    pub product_name: Option<String>,
    /// Joined product unit price
    #[serde(default)]
    pub product_price: Option<f64>,
}

impl TransactionDetail {
    /// Line total: quantity times unit price, zero when the price is unknown.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn total(&self) -> f64 {
        self.quantity as f64 * self.product_price.unwrap_or(0.0)
    }
}

impl From<(transaction::Model, Option<product::Model>)> for TransactionDetail {
    fn from((t, p): (transaction::Model, Option<product::Model>)) -> Self {
        Self {
            id: t.id,
            product_id: t.product_id,
            quantity: t.quantity,
            product_name: p.as_ref().map(|p| p.name.clone()),
            product_price: p.map(|p| p.price),
        }
    }
}

/// A schedule slot together with its teacher's current name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JadwalDetail {
    /// Slot id
    pub id_matkul: i64,
    /// Owning teacher id
    pub guru_id: i64,
    /// Joined teacher name
    #[serde(default)]
    pub guru: Option<String>,
    /// Subject
    pub mapel: String,
    /// Day of the week
    pub hari: String,
    /// Time range
    pub jam: String,
}

impl From<(jadwal::Model, Option<guru::Model>)> for JadwalDetail {
    fn from((j, g): (jadwal::Model, Option<guru::Model>)) -> Self {
        Self {
            id_matkul: j.id_matkul,
            guru_id: j.guru_id,
            guru: g.map(|g| g.nama_guru),
            mapel: j.mapel,
            hari: j.hari,
            jam: j.jam,
        }
    }
}

/// Success body for writes: a message and, for creates, the new id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiMessage {
    /// Human-readable outcome
    pub message: String,
    /// Generated identifier (creates only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
}

impl ApiMessage {
    /// A message without an id.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            id: None,
        }
    }

    /// A message carrying the id of a freshly created row.
    pub fn created(message: impl Into<String>, id: i64) -> Self {
        Self {
            message: message.into(),
            id: Some(id),
        }
    }
}

//! Transaction business logic - Handles all transaction-related operations.
//!
//! Reads are enriched with the product's name and unit price through a left join,
//! so a transaction whose product cannot be joined still comes back, just without
//! those fields. Writes rely on the `product_id` foreign key: pointing a transaction
//! at a product that does not exist is reported as a validation error.

use crate::{
    core::payload::Numeric,
    entities::{Product, Transaction, transaction},
    errors::{Error, Result, is_foreign_key_violation},
    models::TransactionDetail,
};
use sea_orm::{ActiveValue::NotSet, QueryOrder, Set, prelude::*};
use serde::Deserialize;
use tracing::{debug, instrument};

const RESOURCE: &str = "Transaction";

/// Raw transaction fields as they arrive in a request body.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct TransactionPayload {
    /// Referenced product id
    pub product_id: Option<Numeric>,
    /// Units sold
    pub quantity: Option<Numeric>,
}

/// A validated transaction ready to be inserted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewTransaction {
    /// Referenced product id
    pub product_id: i64,
    /// Units sold, always positive
    pub quantity: i64,
}

/// A validated partial update. Only `Some` fields are written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransactionPatch {
    /// New product reference
    pub product_id: Option<i64>,
    /// New quantity
    pub quantity: Option<i64>,
}

fn validate_quantity(quantity: &Numeric) -> Result<i64> {
    let quantity = quantity.to_i64("Quantity")?;
    if quantity <= 0 {
        return Err(Error::validation("Quantity must be greater than 0"));
    }
    Ok(quantity)
}

impl TryFrom<TransactionPayload> for NewTransaction {
    type Error = Error;

    fn try_from(payload: TransactionPayload) -> Result<Self> {
        let (Some(product_id), Some(quantity)) = (payload.product_id, payload.quantity) else {
            return Err(Error::validation("Product ID and quantity are required"));
        };
        Ok(Self {
            product_id: product_id.to_i64("Product ID")?,
            quantity: validate_quantity(&quantity)?,
        })
    }
}

impl TryFrom<TransactionPayload> for TransactionPatch {
    type Error = Error;

    fn try_from(payload: TransactionPayload) -> Result<Self> {
        let patch = Self {
            product_id: payload
                .product_id
                .map(|p| p.to_i64("Product ID"))
                .transpose()?,
            quantity: payload.quantity.as_ref().map(validate_quantity).transpose()?,
        };
        if patch.is_empty() {
            return Err(Error::validation("No fields to update"));
        }
        Ok(patch)
    }
}

impl TransactionPatch {
    /// True when the patch would change nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.product_id.is_none() && self.quantity.is_none()
    }

    fn into_active_model(self) -> transaction::ActiveModel {
        transaction::ActiveModel {
            id: NotSet,
            product_id: self.product_id.map_or(NotSet, Set),
            quantity: self.quantity.map_or(NotSet, Set),
        }
    }
}

/// Maps a foreign-key failure on write to a client error naming the product.
fn missing_product(err: DbErr, product_id: Option<i64>) -> Error {
    if is_foreign_key_violation(&err) {
        let which = product_id.map_or_else(String::new, |id| format!(" with id {id}"));
        return Error::validation(format!(
            "Product{which} does not exist. Please create the product first"
        ));
    }
    err.into()
}

/// Retrieves all transactions with product details, newest first.
pub async fn list_transactions(db: &DatabaseConnection) -> Result<Vec<TransactionDetail>> {
    let rows = Transaction::find()
        .find_also_related(Product)
        .order_by_desc(transaction::Column::Id)
        .all(db)
        .await?;
    Ok(rows.into_iter().map(TransactionDetail::from).collect())
}

/// Retrieves one transaction with product details.
///
/// # Errors
/// Returns [`Error::NotFound`] if no transaction has this id.
pub async fn get_transaction(
    db: &DatabaseConnection,
    transaction_id: i64,
) -> Result<TransactionDetail> {
    Transaction::find_by_id(transaction_id)
        .find_also_related(Product)
        .one(db)
        .await?
        .map(TransactionDetail::from)
        .ok_or(Error::NotFound { resource: RESOURCE })
}

/// Inserts a new transaction and returns the stored row.
///
/// # Errors
/// Returns [`Error::Validation`] if the product does not exist.
#[instrument(skip(db))]
pub async fn create_transaction(
    db: &DatabaseConnection,
    new: NewTransaction,
) -> Result<transaction::Model> {
    let model = transaction::ActiveModel {
        product_id: Set(new.product_id),
        quantity: Set(new.quantity),
        ..Default::default()
    };
    let created = model
        .insert(db)
        .await
        .map_err(|e| missing_product(e, Some(new.product_id)))?;
    debug!(id = created.id, "Transaction created");
    Ok(created)
}

/// Applies a partial update. Fields absent from the patch keep their values.
///
/// # Errors
/// Returns [`Error::Validation`] for an empty patch or an unknown product,
/// and [`Error::NotFound`] when no row was affected.
#[instrument(skip(db))]
pub async fn update_transaction(
    db: &DatabaseConnection,
    transaction_id: i64,
    patch: TransactionPatch,
) -> Result<()> {
    if patch.is_empty() {
        return Err(Error::validation("No fields to update"));
    }

    let product_id = patch.product_id;
    let result = Transaction::update_many()
        .set(patch.into_active_model())
        .filter(transaction::Column::Id.eq(transaction_id))
        .exec(db)
        .await
        .map_err(|e| missing_product(e, product_id))?;

    if result.rows_affected == 0 {
        return Err(Error::NotFound { resource: RESOURCE });
    }
    Ok(())
}

/// Deletes a transaction by id.
///
/// # Errors
/// Returns [`Error::NotFound`] when nothing was deleted.
#[instrument(skip(db))]
pub async fn delete_transaction(db: &DatabaseConnection, transaction_id: i64) -> Result<()> {
    let result = Transaction::delete_by_id(transaction_id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::NotFound { resource: RESOURCE });
    }
    Ok(())
}

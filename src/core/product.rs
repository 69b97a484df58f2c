//! Product business logic - Handles all product-related operations.
//!
//! Products are listed newest first, fetched by id, created from a full payload,
//! partially updated from a typed patch, and deleted by id. A product that still
//! has transactions cannot be deleted; the storage layer enforces this and the
//! refusal is reported with the number of referencing transactions.

use crate::{
    core::payload::{Numeric, non_empty},
    entities::{Product, Transaction, product, transaction},
    errors::{Error, Result, is_foreign_key_violation},
};
use sea_orm::{ActiveValue::NotSet, PaginatorTrait, QueryOrder, Set, prelude::*};
use serde::Deserialize;
use tracing::{debug, instrument, warn};

const RESOURCE: &str = "Product";

/// Raw product fields as they arrive in a request body.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ProductPayload {
    /// Product name
    pub name: Option<String>,
    /// Unit price, number or numeric text
    pub price: Option<Numeric>,
}

/// A validated product ready to be inserted.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    /// Trimmed, non-empty name
    pub name: String,
    /// Finite, non-negative price
    pub price: f64,
}

/// A validated partial update. Only `Some` fields are written.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductPatch {
    /// New name
    pub name: Option<String>,
    /// New price
    pub price: Option<f64>,
}

fn validate_price(price: &Numeric) -> Result<f64> {
    let price = price.to_f64("Price")?;
    if price < 0.0 {
        return Err(Error::validation("Price cannot be negative"));
    }
    Ok(price)
}

impl TryFrom<ProductPayload> for NewProduct {
    type Error = Error;

    fn try_from(payload: ProductPayload) -> Result<Self> {
        let (Some(name), Some(price)) = (payload.name, payload.price) else {
            return Err(Error::validation("Name and price are required"));
        };
        Ok(Self {
            name: non_empty(name, "Product name")?,
            price: validate_price(&price)?,
        })
    }
}

impl TryFrom<ProductPayload> for ProductPatch {
    type Error = Error;

    fn try_from(payload: ProductPayload) -> Result<Self> {
        let patch = Self {
            name: payload
                .name
                .map(|n| non_empty(n, "Product name"))
                .transpose()?,
            price: payload.price.as_ref().map(validate_price).transpose()?,
        };
        if patch.is_empty() {
            return Err(Error::validation("No fields to update"));
        }
        Ok(patch)
    }
}

impl ProductPatch {
    /// True when the patch would change nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none() && self.price.is_none()
    }

    fn into_active_model(self) -> product::ActiveModel {
        product::ActiveModel {
            id: NotSet,
            name: self.name.map_or(NotSet, Set),
            price: self.price.map_or(NotSet, Set),
        }
    }
}

/// Retrieves all products, newest first.
pub async fn list_products(db: &DatabaseConnection) -> Result<Vec<product::Model>> {
    Product::find()
        .order_by_desc(product::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves one product by id.
///
/// # Errors
/// Returns [`Error::NotFound`] if no product has this id.
pub async fn get_product(db: &DatabaseConnection, product_id: i64) -> Result<product::Model> {
    Product::find_by_id(product_id)
        .one(db)
        .await?
        .ok_or(Error::NotFound { resource: RESOURCE })
}

/// Inserts a new product and returns the stored row.
#[instrument(skip(db))]
pub async fn create_product(db: &DatabaseConnection, new: NewProduct) -> Result<product::Model> {
    let product = product::ActiveModel {
        name: Set(new.name),
        price: Set(new.price),
        ..Default::default()
    };
    let created = product.insert(db).await?;
    debug!(id = created.id, "Product created");
    Ok(created)
}

/// Applies a partial update. Fields absent from the patch keep their values.
///
/// # Errors
/// Returns [`Error::Validation`] for an empty patch (without querying storage)
/// and [`Error::NotFound`] when no row was affected.
#[instrument(skip(db))]
pub async fn update_product(
    db: &DatabaseConnection,
    product_id: i64,
    patch: ProductPatch,
) -> Result<()> {
    if patch.is_empty() {
        return Err(Error::validation("No fields to update"));
    }

    let result = Product::update_many()
        .set(patch.into_active_model())
        .filter(product::Column::Id.eq(product_id))
        .exec(db)
        .await?;

    if result.rows_affected == 0 {
        return Err(Error::NotFound { resource: RESOURCE });
    }
    Ok(())
}

/// Counts the transactions that reference a product.
pub async fn count_transactions(db: &DatabaseConnection, product_id: i64) -> Result<u64> {
    Transaction::find()
        .filter(transaction::Column::ProductId.eq(product_id))
        .count(db)
        .await
        .map_err(Into::into)
}

/// Deletes a product by id.
///
/// # Errors
/// Returns [`Error::Conflict`] with the live transaction count when the
/// product is still referenced, and [`Error::NotFound`] when nothing was deleted.
#[instrument(skip(db))]
pub async fn delete_product(db: &DatabaseConnection, product_id: i64) -> Result<()> {
    let result = match Product::delete_by_id(product_id).exec(db).await {
        Ok(result) => result,
        Err(e) if is_foreign_key_violation(&e) => {
            let references = count_transactions(db, product_id).await?;
            warn!(product_id, references, "Refusing to delete referenced product");
            return Err(Error::Conflict {
                message: format!(
                    "Cannot delete product: it is used by {references} transaction(s)"
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

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn payload(name: Option<&str>, price: Option<Numeric>) -> ProductPayload {
        ProductPayload {
            name: name.map(ToString::to_string),
            price,
        }
    }

    #[test]
    fn test_new_product_requires_all_fields() {
        let err = NewProduct::try_from(payload(Some("Pen"), None)).unwrap_err();
        assert_eq!(err.to_string(), "Name and price are required");

        let err = NewProduct::try_from(payload(None, Some(Numeric::Int(10)))).unwrap_err();
        assert_eq!(err.to_string(), "Name and price are required");

        let ok = NewProduct::try_from(payload(
            Some(" Pen "),
            Some(Numeric::Text("5000".to_string())),
        ))
        .unwrap();
        assert_eq!(ok.name, "Pen");
        assert_eq!(ok.price, 5000.0);
    }

    #[test]
    fn test_new_product_rejects_bad_price() {
        assert!(NewProduct::try_from(payload(Some("Pen"), Some(Numeric::Int(-1)))).is_err());
        assert!(
            NewProduct::try_from(payload(Some("Pen"), Some(Numeric::Text("x".to_string()))))
                .is_err()
        );
    }

    #[test]
    fn test_patch_requires_a_field() {
        let err = ProductPatch::try_from(ProductPayload::default()).unwrap_err();
        assert_eq!(err.to_string(), "No fields to update");

        let patch = ProductPatch::try_from(payload(None, Some(Numeric::Float(7.5)))).unwrap();
        assert_eq!(patch.name, None);
        assert_eq!(patch.price, Some(7.5));
    }

    #[tokio::test]
    async fn test_empty_patch_does_not_touch_storage() -> Result<()> {
        // No query results are queued: any storage access would fail the test.
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();

        let result = update_product(&db, 1, ProductPatch::default()).await;
        assert!(matches!(result, Err(Error::Validation { .. })));
        assert!(db.into_transaction_log().is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_create_then_get_matches() -> Result<()> {
        let db = setup_test_db().await?;

        let created = create_test_product(&db, "Pen", 5000.0).await?;
        assert_eq!(created.id, 1);

        let fetched = get_product(&db, created.id).await?;
        assert_eq!(fetched.name, "Pen");
        assert_eq!(fetched.price, 5000.0);
        Ok(())
    }

    #[tokio::test]
    async fn test_list_is_newest_first() -> Result<()> {
        let db = setup_test_db().await?;
        let a = create_test_product(&db, "A", 1.0).await?;
        let b = create_test_product(&db, "B", 2.0).await?;

        let products = list_products(&db).await?;
        assert_eq!(products, vec![b, a]);
        Ok(())
    }

    #[tokio::test]
    async fn test_list_empty_is_ok() -> Result<()> {
        let db = setup_test_db().await?;
        assert!(list_products(&db).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_partial_update_keeps_other_fields() -> Result<()> {
        let db = setup_test_db().await?;
        let product = create_test_product(&db, "Pen", 5000.0).await?;

        update_product(
            &db,
            product.id,
            ProductPatch {
                price: Some(6000.0),
                ..Default::default()
            },
        )
        .await?;

        let fetched = get_product(&db, product.id).await?;
        assert_eq!(fetched.name, "Pen");
        assert_eq!(fetched.price, 6000.0);
        Ok(())
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() -> Result<()> {
        let db = setup_test_db().await?;
        let result = update_product(
            &db,
            999,
            ProductPatch {
                name: Some("Ghost".to_string()),
                price: None,
            },
        )
        .await;
        assert!(matches!(result, Err(Error::NotFound { resource: "Product" })));
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_and_delete_again() -> Result<()> {
        let db = setup_test_db().await?;
        let product = create_test_product(&db, "Pen", 5000.0).await?;

        delete_product(&db, product.id).await?;
        assert!(matches!(
            get_product(&db, product.id).await,
            Err(Error::NotFound { .. })
        ));
        assert!(matches!(
            delete_product(&db, product.id).await,
            Err(Error::NotFound { .. })
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_referenced_product_is_conflict() -> Result<()> {
        let (db, product) = setup_with_product().await?;
        create_test_transaction(&db, product.id, 2).await?;
        create_test_transaction(&db, product.id, 5).await?;

        let err = delete_product(&db, product.id).await.unwrap_err();
        match err {
            Error::Conflict { references, .. } => assert_eq!(references, 2),
            other => panic!("expected conflict, got {other:?}"),
        }

        // The product is still there.
        get_product(&db, product.id).await?;
        Ok(())
    }
}

//! Column sorting for the client tables.
//!
//! Each table keeps its own [`SortState`]. Until a column is activated the rows
//! stay in server order.

use crate::{entities::product, models::TransactionDetail};
use std::cmp::Ordering;

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    /// Smallest first
    #[default]
    Ascending,
    /// Largest first
    Descending,
}

impl SortDirection {
    /// The other direction.
    #[must_use]
    pub const fn flipped(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }
}

/// Active column and direction of one table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortState<F> {
    field: Option<F>,
    direction: SortDirection,
}

impl<F> Default for SortState<F> {
    fn default() -> Self {
        Self {
            field: None,
            direction: SortDirection::Ascending,
        }
    }
}

impl<F: Copy + PartialEq> SortState<F> {
    /// No active column.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Activates a column header.
    ///
    /// The active column flips direction; any other column becomes active in
    /// ascending order.
    pub fn toggle(&mut self, field: F) {
        if self.field == Some(field) {
            self.direction = self.direction.flipped();
        } else {
            self.field = Some(field);
            self.direction = SortDirection::Ascending;
        }
    }

    /// The active column, if any.
    #[must_use]
    pub const fn field(&self) -> Option<F> {
        self.field
    }

    /// Current direction.
    #[must_use]
    pub const fn direction(&self) -> SortDirection {
        self.direction
    }
}

/// Rows that expose a comparable value per column.
pub trait SortKey<F> {
    /// The cell value for `field`, as displayed text.
    fn sort_value(&self, field: F) -> String;
}

fn as_number(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| !v.is_nan())
}

/// Compares two cell values.
///
/// When both parse as numbers they compare numerically; otherwise they compare
/// as lowercase text.
#[must_use]
pub fn compare_values(a: &str, b: &str) -> Ordering {
    match (as_number(a), as_number(b)) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        _ => a.to_lowercase().cmp(&b.to_lowercase()),
    }
}

/// Sorts rows in place by the active column. Equal rows keep their order.
pub fn sort_rows<F, R>(rows: &mut [R], state: &SortState<F>)
where
    F: Copy + PartialEq,
    R: SortKey<F>,
{
    let Some(field) = state.field() else {
        return;
    };
    rows.sort_by(|a, b| {
        let ord = compare_values(&a.sort_value(field), &b.sort_value(field));
        match state.direction() {
            SortDirection::Ascending => ord,
            SortDirection::Descending => ord.reverse(),
        }
    });
}

/// Sortable product columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductField {
    /// Id
    Id,
    /// Name
    Name,
    /// Unit price
    Price,
}

impl SortKey<ProductField> for product::Model {
    fn sort_value(&self, field: ProductField) -> String {
        match field {
            ProductField::Id => self.id.to_string(),
            ProductField::Name => self.name.clone(),
            ProductField::Price => self.price.to_string(),
        }
    }
}

/// Sortable transaction columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionField {
    /// Id
    Id,
    /// Joined product name
    ProductName,
    /// Units sold
    Quantity,
    /// Joined unit price
    ProductPrice,
    /// Quantity times unit price
    Total,
}

impl SortKey<TransactionField> for TransactionDetail {
    fn sort_value(&self, field: TransactionField) -> String {
        match field {
            TransactionField::Id => self.id.to_string(),
            TransactionField::ProductName => self.product_name.clone().unwrap_or_default(),
            TransactionField::Quantity => self.quantity.to_string(),
            TransactionField::ProductPrice => self
                .product_price
                .map(|p| p.to_string())
                .unwrap_or_default(),
            TransactionField::Total => self.total().to_string(),
        }
    }
}

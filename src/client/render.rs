//! Pure table renderers.
//!
//! Each function turns fetched rows into display rows: text is already
//! formatted, and every row knows whether it is striped.

use crate::{
    client::format::{format_number_id, format_rupiah},
    entities::{guru, product},
    models::{JadwalDetail, TransactionDetail},
};

/// Placeholder for an empty products table.
pub const NO_PRODUCTS: &str = "No products found";
/// Placeholder for an empty transactions table.
pub const NO_TRANSACTIONS: &str = "No transactions found";
/// Placeholder for an empty teachers table.
pub const NO_TEACHERS: &str = "No teachers found";
/// Placeholder for an empty schedule table.
pub const NO_SCHEDULES: &str = "No schedules found";
/// Shown where a joined name is missing.
pub const NOT_AVAILABLE: &str = "N/A";
/// First entry of the product picker.
pub const SELECT_PRODUCT: &str = "-- Select Product --";

/// Row background.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stripe {
    /// Even rows (0, 2, ...) are shaded
    Shaded,
    /// Odd rows are plain
    Plain,
}

impl Stripe {
    /// Stripe for the row at `index`.
    #[must_use]
    pub const fn for_index(index: usize) -> Self {
        if index % 2 == 0 { Self::Shaded } else { Self::Plain }
    }
}

/// A table body: either a placeholder or rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableBody<R> {
    /// No rows; show this text across the table
    Empty(&'static str),
    /// Rows in display order
    Rows(Vec<R>),
}

impl<R> TableBody<R> {
    fn from_rows(rows: Vec<R>, placeholder: &'static str) -> Self {
        if rows.is_empty() {
            Self::Empty(placeholder)
        } else {
            Self::Rows(rows)
        }
    }

    /// Rendered rows, empty for a placeholder.
    #[must_use]
    pub fn rows(&self) -> &[R] {
        match self {
            Self::Empty(_) => &[],
            Self::Rows(rows) => rows,
        }
    }
}

/// One products table row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductRow {
    /// Record id, target of edit and delete
    pub id: i64,
    /// Product name
    pub name: String,
    /// Unit price, e.g. `Rp 5.000`
    pub price: String,
    /// Background
    pub stripe: Stripe,
}

/// One transactions table row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRow {
    /// Record id, target of edit and delete
    pub id: i64,
    /// Product name or `N/A`
    pub product_name: String,
    /// Units, e.g. `3x`
    pub quantity: String,
    /// Unit price, e.g. `Rp 5.000`
    pub unit_price: String,
    /// Line total, e.g. `Rp 15.000`
    pub total: String,
    /// Background
    pub stripe: Stripe,
}

/// The transactions table with its revenue footer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionsTable {
    /// Body
    pub body: TableBody<TransactionRow>,
    /// Revenue over the rendered rows, e.g. `Rp 15.000`
    pub total_revenue: String,
}

/// One teachers table row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuruRow {
    /// Record id
    pub id: i64,
    /// Name
    pub nama_guru: String,
    /// Subject
    pub mata_pelajaran: String,
    /// Phone number
    pub no_telepon: String,
    /// Background
    pub stripe: Stripe,
}

/// One schedule table row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JadwalRow {
    /// Record id
    pub id: i64,
    /// Teacher name or `N/A`
    pub guru: String,
    /// Subject
    pub mapel: String,
    /// Day
    pub hari: String,
    /// Time range
    pub jam: String,
    /// Background
    pub stripe: Stripe,
}

/// An `<option>` of a select box.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    /// Submitted value; empty for the placeholder
    pub value: String,
    /// Visible label
    pub label: String,
}

/// Sum of quantity times unit price over `rows`. Unknown prices count as zero.
#[must_use]
pub fn total_revenue(rows: &[TransactionDetail]) -> f64 {
    rows.iter().map(TransactionDetail::total).sum()
}

/// Renders the products table.
#[must_use]
pub fn render_products(products: &[product::Model]) -> TableBody<ProductRow> {
    let rows = products
        .iter()
        .enumerate()
        .map(|(i, p)| ProductRow {
            id: p.id,
            name: p.name.clone(),
            price: format_rupiah(p.price),
            stripe: Stripe::for_index(i),
        })
        .collect();
    TableBody::from_rows(rows, NO_PRODUCTS)
}

/// Renders the transactions table and its revenue total.
#[must_use]
pub fn render_transactions(transactions: &[TransactionDetail]) -> TransactionsTable {
    let rows = transactions
        .iter()
        .enumerate()
        .map(|(i, t)| TransactionRow {
            id: t.id,
            product_name: t
                .product_name
                .clone()
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            quantity: format!("{}x", t.quantity),
            unit_price: format_rupiah(t.product_price.unwrap_or(0.0)),
            total: format_rupiah(t.total()),
            stripe: Stripe::for_index(i),
        })
        .collect();
    TransactionsTable {
        body: TableBody::from_rows(rows, NO_TRANSACTIONS),
        total_revenue: format_rupiah(total_revenue(transactions)),
    }
}

/// Renders the teachers table.
#[must_use]
pub fn render_gurus(gurus: &[guru::Model]) -> TableBody<GuruRow> {
    let rows = gurus
        .iter()
        .enumerate()
        .map(|(i, g)| GuruRow {
            id: g.id,
            nama_guru: g.nama_guru.clone(),
            mata_pelajaran: g.mata_pelajaran.clone(),
            no_telepon: g.no_telepon.clone(),
            stripe: Stripe::for_index(i),
        })
        .collect();
    TableBody::from_rows(rows, NO_TEACHERS)
}

/// Renders the schedule table.
#[must_use]
pub fn render_jadwal(slots: &[JadwalDetail]) -> TableBody<JadwalRow> {
    let rows = slots
        .iter()
        .enumerate()
        .map(|(i, j)| JadwalRow {
            id: j.id_matkul,
            guru: j.guru.clone().unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            mapel: j.mapel.clone(),
            hari: j.hari.clone(),
            jam: j.jam.clone(),
            stripe: Stripe::for_index(i),
        })
        .collect();
    TableBody::from_rows(rows, NO_SCHEDULES)
}

/// Options for the transaction form's product picker, placeholder first.
#[must_use]
pub fn product_options(products: &[product::Model]) -> Vec<SelectOption> {
    std::iter::once(SelectOption {
        value: String::new(),
        label: SELECT_PRODUCT.to_string(),
    })
    .chain(products.iter().map(|p| SelectOption {
        value: p.id.to_string(),
        label: format!("{} - Rp {}", p.name, format_number_id(p.price)),
    }))
    .collect()
}

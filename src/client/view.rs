//! Per-table view state.
//!
//! A view owns the sort and search settings of one table and turns the rows
//! fetched from the server into the rows to display. Views hold no rows of
//! their own, so applying one is a pure function of its state and the input.

use crate::{
    client::{
        search::{SearchQuery, filter_transactions},
        sort::{ProductField, SortState, TransactionField, sort_rows},
    },
    entities::product,
    models::TransactionDetail,
};

/// View state of the products table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductsView {
    /// Active column
    pub sort: SortState<ProductField>,
}

impl ProductsView {
    /// Sorts fetched rows for display.
    #[must_use]
    pub fn apply(&self, mut rows: Vec<product::Model>) -> Vec<product::Model> {
        sort_rows(&mut rows, &self.sort);
        rows
    }
}

/// View state of the transactions table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionsView {
    /// Active column
    pub sort: SortState<TransactionField>,
    /// Current search text
    pub search: SearchQuery,
}

impl TransactionsView {
    /// Filters, then sorts, fetched rows for display.
    #[must_use]
    pub fn apply(&self, rows: &[TransactionDetail]) -> Vec<TransactionDetail> {
        let mut visible = filter_transactions(rows, &self.search);
        sort_rows(&mut visible, &self.sort);
        visible
    }

    /// Replaces the search text.
    pub fn set_search(&mut self, raw: &str) {
        self.search = SearchQuery::new(raw);
    }

    /// Clears the search text.
    pub fn clear_search(&mut self) {
        self.search = SearchQuery::default();
    }
}

//! Page controllers.
//!
//! A page ties the API client, a view, a form and the rendered table together
//! and implements the user actions: load, sort, submit, edit and delete. Every
//! failure ends up in [`Alert`] rather than being returned.

use crate::{
    client::{
        alert::Alert,
        form::{FieldError, Form, ProductForm, TransactionForm},
        http::ApiClient,
        render::{
            ProductRow, SelectOption, TableBody, TransactionsTable, product_options,
            render_products, render_transactions,
        },
        search::Debouncer,
        sort::{ProductField, TransactionField},
        view::{ProductsView, TransactionsView},
    },
    entities::product,
    models::TransactionDetail,
};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// Asks the user to confirm a destructive action.
pub trait Confirmer {
    /// True to go ahead.
    fn confirm(&self, message: &str) -> bool;
}

impl<F: Fn(&str) -> bool> Confirmer for F {
    fn confirm(&self, message: &str) -> bool {
        self(message)
    }
}

/// The products tab.
#[derive(Debug)]
pub struct ProductsPage {
    api: ApiClient,
    rows: Vec<product::Model>,
    /// Sort settings
    pub view: ProductsView,
    /// Entry form
    pub form: ProductForm,
    /// Messages from the last failed validation
    pub field_errors: Vec<FieldError>,
    /// Rendered table
    pub table: TableBody<ProductRow>,
    /// Last banner, if any
    pub alert: Option<Alert>,
}

impl ProductsPage {
    /// An empty page; call [`Self::load`] to fill it.
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            rows: Vec::new(),
            view: ProductsView::default(),
            form: ProductForm::default(),
            field_errors: Vec::new(),
            table: render_products(&[]),
            alert: None,
        }
    }

    fn rerender(&mut self) {
        self.table = render_products(&self.view.apply(self.rows.clone()));
    }

    /// Fetches the products and re-renders the table.
    pub async fn load(&mut self) {
        match self.api.list_products().await {
            Ok(rows) => {
                debug!(count = rows.len(), "Products loaded");
                self.rows = rows;
                self.rerender();
            }
            Err(e) => {
                warn!("Failed to load products: {e}");
                self.alert = Some(Alert::from_failure(&e, "failed to load products"));
            }
        }
    }

    /// Activates a column header and reloads.
    pub async fn sort_by(&mut self, field: ProductField) {
        self.view.sort.toggle(field);
        self.load().await;
    }

    /// Validates and saves the form. Returns true when the server accepted it.
    pub async fn submit(&mut self) -> bool {
        let input = match self.form.validate() {
            Ok(input) => input,
            Err(errors) => {
                self.field_errors = errors;
                return false;
            }
        };
        self.field_errors.clear();

        match self.api.save_product(self.form.mode(), &input).await {
            Ok(reply) => {
                self.alert = Some(Alert::success(reply.message));
                self.form.reset();
                self.load().await;
                true
            }
            Err(e) => {
                self.alert = Some(Alert::from_failure(&e, "Failed to save product"));
                false
            }
        }
    }

    /// Loads a product into the form for editing.
    pub async fn edit(&mut self, id: i64) {
        match self.api.get_product(id).await {
            Ok(record) => {
                self.form.populate(&record);
                self.field_errors.clear();
            }
            Err(e) => self.alert = Some(Alert::from_failure(&e, "Failed to load product")),
        }
    }

    /// Deletes a product after confirmation. Returns true when it was deleted.
    pub async fn delete(&mut self, id: i64, confirmer: &impl Confirmer) -> bool {
        if !confirmer.confirm("Are you sure you want to delete this product?") {
            return false;
        }
        match self.api.delete_product(id).await {
            Ok(reply) => {
                self.alert = Some(Alert::success(reply.message));
                self.load().await;
                true
            }
            Err(e) => {
                self.alert = Some(Alert::from_failure(&e, "Failed to delete product"));
                false
            }
        }
    }

    /// Clears the form back to create mode.
    pub fn reset_form(&mut self) {
        self.form.reset();
        self.field_errors.clear();
    }
}

/// The transactions tab.
#[derive(Debug)]
pub struct TransactionsPage {
    api: ApiClient,
    rows: Vec<TransactionDetail>,
    /// Sort and search settings
    pub view: TransactionsView,
    /// Entry form
    pub form: TransactionForm,
    /// Messages from the last failed validation
    pub field_errors: Vec<FieldError>,
    /// Rendered table and revenue
    pub table: TransactionsTable,
    /// Product picker entries
    pub product_options: Vec<SelectOption>,
    /// Last banner, if any
    pub alert: Option<Alert>,
}

impl TransactionsPage {
    /// An empty page; call [`Self::load`] to fill it.
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            rows: Vec::new(),
            view: TransactionsView::default(),
            form: TransactionForm::default(),
            field_errors: Vec::new(),
            table: render_transactions(&[]),
            product_options: product_options(&[]),
            alert: None,
        }
    }

    fn rerender(&mut self) {
        self.table = render_transactions(&self.view.apply(&self.rows));
    }

    /// Fetches transactions and products, then re-renders.
    pub async fn load(&mut self) {
        self.load_transactions().await;
        self.load_product_options().await;
    }

    /// Fetches the transactions and re-applies search and sort.
    pub async fn load_transactions(&mut self) {
        match self.api.list_transactions().await {
            Ok(rows) => {
                debug!(count = rows.len(), "Transactions loaded");
                self.rows = rows;
                self.rerender();
            }
            Err(e) => {
                warn!("Failed to load transactions: {e}");
                self.alert = Some(Alert::from_failure(&e, "Failed to load transactions"));
            }
        }
    }

    /// Refreshes the product picker.
    pub async fn load_product_options(&mut self) {
        match self.api.list_products().await {
            Ok(products) => self.product_options = product_options(&products),
            Err(e) => self.alert = Some(Alert::from_failure(&e, "Failed to load products")),
        }
    }

    /// Activates a column header and reloads.
    pub async fn sort_by(&mut self, field: TransactionField) {
        self.view.sort.toggle(field);
        self.load_transactions().await;
    }

    /// Applies new search text and reloads.
    pub async fn search(&mut self, raw: &str) {
        self.view.set_search(raw);
        self.load_transactions().await;
    }

    /// Clears the search text and reloads.
    pub async fn clear_search(&mut self) {
        self.view.clear_search();
        self.load_transactions().await;
    }

    /// Validates and saves the form. Returns true when the server accepted it.
    pub async fn submit(&mut self) -> bool {
        let input = match self.form.validate() {
            Ok(input) => input,
            Err(errors) => {
                self.field_errors = errors;
                return false;
            }
        };
        self.field_errors.clear();

        match self.api.save_transaction(self.form.mode(), &input).await {
            Ok(reply) => {
                self.alert = Some(Alert::success(reply.message));
                self.form.reset();
                self.load_transactions().await;
                true
            }
            Err(e) => {
                self.alert = Some(Alert::from_failure(&e, "Failed to save transaction"));
                false
            }
        }
    }

    /// Loads a transaction into the form for editing.
    pub async fn edit(&mut self, id: i64) {
        match self.api.get_transaction(id).await {
            Ok(record) => {
                self.form.populate(&record);
                self.field_errors.clear();
            }
            Err(e) => self.alert = Some(Alert::from_failure(&e, "Failed to load transaction")),
        }
    }

    /// Deletes a transaction after confirmation. Returns true when it was deleted.
    pub async fn delete(&mut self, id: i64, confirmer: &impl Confirmer) -> bool {
        if !confirmer.confirm("Are you sure you want to delete this transaction?") {
            return false;
        }
        match self.api.delete_transaction(id).await {
            Ok(reply) => {
                self.alert = Some(Alert::success(reply.message));
                self.load_transactions().await;
                true
            }
            Err(e) => {
                self.alert = Some(Alert::from_failure(&e, "Failed to delete transaction"));
                false
            }
        }
    }

    /// Clears the form back to create mode.
    pub fn reset_form(&mut self) {
        self.form.reset();
        self.field_errors.clear();
    }
}

/// Runs a search once typing has paused.
///
/// Each call replaces a search that is still waiting; a search already running
/// finishes and may land after a later one.
pub fn search_debounced(page: &Arc<Mutex<TransactionsPage>>, debouncer: &mut Debouncer, raw: &str) {
    let page = Arc::clone(page);
    let raw = raw.to_string();
    debouncer.schedule(async move {
        page.lock().await.search(&raw).await;
    });
}

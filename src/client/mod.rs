//! Client data and render layers.
//!
//! Everything the browser front end does besides drawing: fetching through the
//! API, per-table sort and search state, row rendering, form validation and
//! status banners. The modules are independent of any UI toolkit, so a front
//! end only has to display what they produce.

pub mod alert;
pub mod form;
pub mod format;
pub mod http;
pub mod page;
pub mod render;
pub mod search;
pub mod sort;
pub mod view;

pub use alert::{ALERT_DURATION, Alert, AlertKind};
pub use form::{Form, FormMode};
pub use http::ApiClient;
pub use page::{Confirmer, ProductsPage, TransactionsPage, search_debounced};

//! Entry forms and their client-side validation.
//!
//! Form fields hold raw text, as typed. A hidden id decides between creating
//! (empty) and updating (set by `populate`). `validate` either produces the
//! request body or the per-field messages to show next to the inputs; nothing
//! is sent when validation fails.

use crate::{
    core::payload::whole_to_i64,
    entities::{guru, product},
    models::{JadwalDetail, TransactionDetail},
};
use serde::Serialize;

/// Whether submitting creates a record or updates one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    /// POST a new record
    Create,
    /// PUT to the record with this id
    Update(i64),
}

/// A validation message bound to one input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Input name, e.g. `"price"`
    pub field: &'static str,
    /// Text shown under the input
    pub message: String,
}

impl FieldError {
    fn new(field: &'static str, message: &str) -> Self {
        Self {
            field,
            message: message.to_string(),
        }
    }
}

/// Behaviour shared by all entry forms.
pub trait Form {
    /// Record loaded into the form for editing
    type Record;
    /// Request body produced by a valid form
    type Input: Serialize;

    /// Display name, e.g. `"Product"`.
    const RESOURCE: &'static str;

    /// Checks the inputs and builds the request body.
    fn validate(&self) -> Result<Self::Input, Vec<FieldError>>;

    /// Loads a record for editing.
    fn populate(&mut self, record: &Self::Record);

    /// Clears every input, including the hidden id.
    fn reset(&mut self);

    /// The hidden id input.
    fn hidden_id(&self) -> &str;

    /// Create or update, from the hidden id.
    fn mode(&self) -> FormMode {
        match self.hidden_id().trim().parse::<i64>() {
            Ok(id) if id != 0 => FormMode::Update(id),
            _ => FormMode::Create,
        }
    }

    /// Submit button text: `Add <Resource>` or `Update <Resource>`.
    fn submit_label(&self) -> String {
        match self.mode() {
            FormMode::Create => format!("Add {}", Self::RESOURCE),
            FormMode::Update(_) => format!("Update {}", Self::RESOURCE),
        }
    }
}

fn positive(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v > 0.0)
}

fn required(raw: &str, field: &'static str, message: &str, errors: &mut Vec<FieldError>) -> String {
    let value = raw.trim();
    if value.is_empty() {
        errors.push(FieldError::new(field, message));
    }
    value.to_string()
}

fn finish<T>(input: T, errors: Vec<FieldError>) -> Result<T, Vec<FieldError>> {
    if errors.is_empty() { Ok(input) } else { Err(errors) }
}

/// Body sent when saving a product.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductInput {
    /// Name
    pub name: String,
    /// Unit price
    pub price: f64,
}

/// The product form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductForm {
    /// Hidden id
    pub id: String,
    /// Name input
    pub name: String,
    /// Price input
    pub price: String,
}

impl Form for ProductForm {
    type Record = product::Model;
    type Input = ProductInput;

    const RESOURCE: &'static str = "Product";

    fn validate(&self) -> Result<ProductInput, Vec<FieldError>> {
        let mut errors = Vec::new();
        let name = required(&self.name, "name", "Product name is required", &mut errors);
        let price = positive(&self.price).unwrap_or_else(|| {
            errors.push(FieldError::new("price", "Price must be greater than 0"));
            0.0
        });
        finish(ProductInput { name, price }, errors)
    }

    fn populate(&mut self, record: &product::Model) {
        self.id = record.id.to_string();
        self.name.clone_from(&record.name);
        self.price = record.price.to_string();
    }

    fn reset(&mut self) {
        *self = Self::default();
    }

    fn hidden_id(&self) -> &str {
        &self.id
    }
}

/// Body sent when saving a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransactionInput {
    /// Selected product
    pub product_id: i64,
    /// Units sold
    pub quantity: i64,
}

/// The transaction form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionForm {
    /// Hidden id
    pub id: String,
    /// Selected product option value; empty means nothing selected
    pub product_id: String,
    /// Quantity input
    pub quantity: String,
}

impl Form for TransactionForm {
    type Record = TransactionDetail;
    type Input = TransactionInput;

    const RESOURCE: &'static str = "Transaction";

    fn validate(&self) -> Result<TransactionInput, Vec<FieldError>> {
        let mut errors = Vec::new();
        let product_id = self
            .product_id
            .trim()
            .parse::<i64>()
            .ok()
            .filter(|id| *id > 0)
            .unwrap_or_else(|| {
                errors.push(FieldError::new("product_id", "Please select a product"));
                0
            });
        let quantity = match positive(&self.quantity) {
            Some(q) if q.fract() != 0.0 => {
                errors.push(FieldError::new("quantity", "Quantity must be a whole number"));
                0
            }
            Some(q) => whole_to_i64(q).unwrap_or_else(|| {
                errors.push(FieldError::new("quantity", "Quantity is out of range"));
                0
            }),
            None => {
                errors.push(FieldError::new("quantity", "Quantity must be greater than 0"));
                0
            }
        };
        finish(
            TransactionInput {
                product_id,
                quantity,
            },
            errors,
        )
    }

    fn populate(&mut self, record: &TransactionDetail) {
        self.id = record.id.to_string();
        self.product_id = record.product_id.to_string();
        self.quantity = record.quantity.to_string();
    }

    fn reset(&mut self) {
        *self = Self::default();
    }

    fn hidden_id(&self) -> &str {
        &self.id
    }
}

/// Body sent when saving a teacher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GuruInput {
    /// Name
    pub nama_guru: String,
    /// Subject
    pub mata_pelajaran: String,
    /// Phone number
    pub no_telepon: String,
}

/// The teacher form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GuruForm {
    /// Hidden id
    pub id: String,
    /// Name input
    pub nama_guru: String,
    /// Subject input
    pub mata_pelajaran: String,
    /// Phone input
    pub no_telepon: String,
}

impl Form for GuruForm {
    type Record = guru::Model;
    type Input = GuruInput;

    const RESOURCE: &'static str = "Teacher";

    fn validate(&self) -> Result<GuruInput, Vec<FieldError>> {
        let mut errors = Vec::new();
        let input = GuruInput {
            nama_guru: required(&self.nama_guru, "nama_guru", "Teacher name is required", &mut errors),
            mata_pelajaran: required(
                &self.mata_pelajaran,
                "mata_pelajaran",
                "Subject is required",
                &mut errors,
            ),
            no_telepon: required(&self.no_telepon, "no_telepon", "Phone number is required", &mut errors),
        };
        finish(input, errors)
    }

    fn populate(&mut self, record: &guru::Model) {
        self.id = record.id.to_string();
        self.nama_guru.clone_from(&record.nama_guru);
        self.mata_pelajaran.clone_from(&record.mata_pelajaran);
        self.no_telepon.clone_from(&record.no_telepon);
    }

    fn reset(&mut self) {
        *self = Self::default();
    }

    fn hidden_id(&self) -> &str {
        &self.id
    }
}

/// Body sent when saving a schedule slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JadwalInput {
    /// Owning teacher
    pub guru_id: i64,
    /// Subject
    pub mapel: String,
    /// Day
    pub hari: String,
    /// Time range
    pub jam: String,
}

/// The schedule form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JadwalForm {
    /// Hidden id
    pub id: String,
    /// Selected teacher option value
    pub guru_id: String,
    /// Subject input
    pub mapel: String,
    /// Day input
    pub hari: String,
    /// Time input
    pub jam: String,
}

impl Form for JadwalForm {
    type Record = JadwalDetail;
    type Input = JadwalInput;

    const RESOURCE: &'static str = "Schedule";

    fn validate(&self) -> Result<JadwalInput, Vec<FieldError>> {
        let mut errors = Vec::new();
        let guru_id = self
            .guru_id
            .trim()
            .parse::<i64>()
            .ok()
            .filter(|id| *id > 0)
            .unwrap_or_else(|| {
                errors.push(FieldError::new("guru_id", "Please select a teacher"));
                0
            });
        let input = JadwalInput {
            guru_id,
            mapel: required(&self.mapel, "mapel", "Subject is required", &mut errors),
            hari: required(&self.hari, "hari", "Day is required", &mut errors),
            jam: required(&self.jam, "jam", "Time is required", &mut errors),
        };
        finish(input, errors)
    }

    fn populate(&mut self, record: &JadwalDetail) {
        self.id = record.id_matkul.to_string();
        self.guru_id = record.guru_id.to_string();
        self.mapel.clone_from(&record.mapel);
        self.hari.clone_from(&record.hari);
        self.jam.clone_from(&record.jam);
    }

    fn reset(&mut self) {
        *self = Self::default();
    }

    fn hidden_id(&self) -> &str {
        &self.id
    }
}

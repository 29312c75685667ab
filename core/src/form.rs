//! Create/edit form state for a single product.
//!
//! The draft holds raw text exactly as typed. Rules are declared on
//! `ProductDraft` with `validator`; `submit` turns a valid draft into a
//! `ProductInput` with a normalized price and never produces one otherwise.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use validator::{Validate, ValidationError};

use crate::types::{Product, ProductId, ProductInput};

/// Whether the form creates a new product or edits an existing one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorMode {
    Create,
    Edit(ProductId),
}

/// One editable field of the draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Name,
    Description,
    Price,
    Category,
}

impl Field {
    pub const ALL: [Field; 4] = [Field::Name, Field::Description, Field::Price, Field::Category];

    pub fn as_str(self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Description => "description",
            Field::Price => "price",
            Field::Category => "category",
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        Field::ALL.into_iter().find(|field| field.as_str() == name)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// In-progress field values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Validate)]
pub struct ProductDraft {
    #[validate(length(min = 3, max = 50, message = "Name must be between 3 and 50 characters"))]
    pub name: String,

    #[validate(length(
        min = 10,
        max = 500,
        message = "Description must be between 10 and 500 characters"
    ))]
    pub description: String,

    #[validate(custom = "validate_price")]
    pub price: String,

    #[validate(length(min = 1, max = 30, message = "Category must be between 1 and 30 characters"))]
    pub category: String,
}

impl ProductDraft {
    pub fn from_product(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.price.to_string(),
            category: product.category.clone(),
        }
    }

    fn field_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::Name => &mut self.name,
            Field::Description => &mut self.description,
            Field::Price => &mut self.price,
            Field::Category => &mut self.category,
        }
    }

    pub fn field(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Description => &self.description,
            Field::Price => &self.price,
            Field::Category => &self.category,
        }
    }
}

fn parse_price(raw: &str) -> Option<Decimal> {
    Decimal::from_str(raw.trim()).ok()
}

fn validate_price(price: &str) -> Result<(), ValidationError> {
    let message = if price.trim().is_empty() {
        "Price is required"
    } else {
        match parse_price(price) {
            None => "Price must be a number",
            Some(value) if value <= Decimal::ZERO => "Price must be greater than zero",
            Some(_) => return Ok(()),
        }
    };
    let mut error = ValidationError::new("price");
    error.message = Some(message.into());
    Err(error)
}

/// Per-field validation messages, one per failing field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<Field, String>);

impl FieldErrors {
    pub fn get(&self, field: Field) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.0.iter().map(|(field, message)| (*field, message.as_str()))
    }

    /// Messages in field order.
    pub fn messages(&self) -> Vec<String> {
        self.0.values().cloned().collect()
    }

    fn from_validation(errors: &validator::ValidationErrors) -> Self {
        let mut map = BTreeMap::new();
        for (name, errs) in errors.field_errors() {
            let Some(field) = Field::from_name(name) else {
                continue;
            };
            let message = errs
                .first()
                .and_then(|e| e.message.as_ref())
                .map(|m| m.to_string())
                .unwrap_or_else(|| format!("Invalid {field}"));
            map.insert(field, message);
        }
        Self(map)
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined: Vec<String> = self
            .iter()
            .map(|(field, msg)| format!("{field}: {msg}"))
            .collect();
        f.write_str(&joined.join("; "))
    }
}

impl std::error::Error for FieldErrors {}

/// Draft values, messages and mode for one editor session.
#[derive(Debug, Clone)]
pub struct ProductForm {
    mode: EditorMode,
    draft: ProductDraft,
    errors: FieldErrors,
}

impl ProductForm {
    pub fn create() -> Self {
        Self {
            mode: EditorMode::Create,
            draft: ProductDraft::default(),
            errors: FieldErrors::default(),
        }
    }

    pub fn edit(product: &Product) -> Self {
        Self {
            mode: EditorMode::Edit(product.id.clone()),
            draft: ProductDraft::from_product(product),
            errors: FieldErrors::default(),
        }
    }

    /// Switch to create mode with an empty draft.
    pub fn reseed_create(&mut self) {
        *self = Self::create();
    }

    /// Switch to editing `product`, replacing every draft field.
    pub fn reseed_edit(&mut self, product: &Product) {
        *self = Self::edit(product);
    }

    pub fn mode(&self) -> &EditorMode {
        &self.mode
    }

    pub fn draft(&self) -> &ProductDraft {
        &self.draft
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn message(&self, field: Field) -> Option<&str> {
        self.errors.get(field)
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        *self.draft.field_mut(field) = value.into();
        self.errors.0.remove(&field);
    }

    pub fn title(&self) -> &'static str {
        match self.mode {
            EditorMode::Create => "New product",
            EditorMode::Edit(_) => "Edit product",
        }
    }

    pub fn submit_label(&self) -> &'static str {
        match self.mode {
            EditorMode::Create => "Create product",
            EditorMode::Edit(_) => "Save changes",
        }
    }

    /// Run every rule. On success the stored messages are cleared and the
    /// normalized payload is returned.
    pub fn submit(&mut self) -> Result<ProductInput, FieldErrors> {
        if let Err(errors) = self.draft.validate() {
            self.errors = FieldErrors::from_validation(&errors);
            return Err(self.errors.clone());
        }
        let Some(price) = parse_price(&self.draft.price) else {
            // Unreachable once the price rule passed.
            let mut errors = FieldErrors::default();
            errors.0.insert(Field::Price, "Price must be a number".to_string());
            self.errors = errors;
            return Err(self.errors.clone());
        };
        self.errors = FieldErrors::default();
        Ok(ProductInput {
            name: self.draft.name.clone(),
            description: self.draft.description.clone(),
            price: price.normalize(),
            category: self.draft.category.clone(),
        })
    }
}

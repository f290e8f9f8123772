// A line item is one product or service row on a quotation or invoice.
// Its total is always quantity × unit_price rounded to whole Toman and is
// never set independently of those two inputs.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::{AppError, Result, Toman};

/// Represents a single line item in a document
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineItem {
    /// Unique identifier for the line item
    pub id: String,

    /// Description of the product or service
    pub description: String,

    /// Quantity, may be fractional (hours, kilograms)
    pub quantity: Decimal,

    /// Price per unit in whole Toman
    pub unit_price: Decimal,

    /// quantity × unit_price, rounded to whole Toman
    total: Decimal,
}

/// Caller-supplied line item data
#[derive(Debug, Clone, Deserialize)]
pub struct LineItemInput {
    #[serde(default)]
    pub description: String,
    pub quantity: Decimal,
    pub unit_price: Decimal,
}

/// A single-field edit applied to an existing line item
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum ItemEdit {
    Description(String),
    Quantity(Decimal),
    UnitPrice(Decimal),
}

impl LineItem {
    /// Create a new line item with validation
    ///
    /// # Arguments
    /// * `description` - Free text, may be empty while the operator is typing
    /// * `quantity` - Must be non-negative
    /// * `unit_price` - Must be a non-negative whole Toman amount
    pub fn new(description: String, quantity: Decimal, unit_price: Decimal) -> Result<Self> {
        Self::validate_quantity(quantity)?;
        Self::validate_unit_price(unit_price)?;

        let mut item = Self {
            id: Uuid::new_v4().to_string(),
            description,
            quantity: quantity.normalize(),
            unit_price: Toman::whole(unit_price),
            total: Decimal::ZERO,
        };
        item.calculate_total()?;

        Ok(item)
    }

    /// The row added by "add item": quantity 1, price 0
    pub fn blank() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            description: String::new(),
            quantity: Decimal::ONE,
            unit_price: Decimal::ZERO,
            total: Decimal::ZERO,
        }
    }

    pub fn from_input(input: LineItemInput) -> Result<Self> {
        Self::new(input.description, input.quantity, input.unit_price)
    }

    pub fn total(&self) -> Decimal {
        self.total
    }

    /// Returns a copy of this item with the edit applied and its total recomputed
    pub fn with_edit(&self, edit: ItemEdit) -> Result<Self> {
        let mut item = self.clone();
        match edit {
            ItemEdit::Description(description) => item.description = description,
            ItemEdit::Quantity(quantity) => {
                Self::validate_quantity(quantity)?;
                item.quantity = quantity.normalize();
            }
            ItemEdit::UnitPrice(unit_price) => {
                Self::validate_unit_price(unit_price)?;
                item.unit_price = Toman::whole(unit_price);
            }
        }
        item.calculate_total()?;

        Ok(item)
    }

    /// Copy of this item under a fresh id, used when a quotation becomes an invoice
    pub(crate) fn duplicate(&self) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            ..self.clone()
        }
    }

    fn calculate_total(&mut self) -> Result<()> {
        self.total = Toman::product(self.quantity, self.unit_price)?;
        Ok(())
    }

    fn validate_quantity(quantity: Decimal) -> Result<()> {
        if quantity < Decimal::ZERO {
            return Err(AppError::validation(format!(
                "Quantity must be non-negative, got: {}",
                quantity
            )));
        }

        Ok(())
    }

    fn validate_unit_price(unit_price: Decimal) -> Result<()> {
        Toman::validate_amount(unit_price)
            .map_err(|e| AppError::validation(format!("Unit price invalid: {}", e)))
    }
}

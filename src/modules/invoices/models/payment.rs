use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::{AppError, Result, Toman};

/// How a payment was received
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Cash,
    Bank,
    Card,
    Check,
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentMethod::Cash => write!(f, "cash"),
            PaymentMethod::Bank => write!(f, "bank"),
            PaymentMethod::Card => write!(f, "card"),
            PaymentMethod::Check => write!(f, "check"),
        }
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "cash" => Ok(PaymentMethod::Cash),
            "bank" => Ok(PaymentMethod::Bank),
            "card" => Ok(PaymentMethod::Card),
            "check" => Ok(PaymentMethod::Check),
            _ => Err(format!("Invalid payment method: {}", s)),
        }
    }
}

/// A payment recorded against an invoice
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Payment {
    /// Assigned on creation, unique within a document
    pub id: String,

    /// Positive whole Toman amount
    pub amount: Decimal,

    pub method: PaymentMethod,

    /// Date the money was received (already normalized to Gregorian)
    pub date: NaiveDate,

    /// Cheque number, transfer tracking code, etc.
    pub reference: Option<String>,
}

impl Payment {
    pub fn new(
        amount: Decimal,
        method: PaymentMethod,
        date: NaiveDate,
        reference: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            amount,
            method,
            date,
            reference,
        }
    }

    /// Amount must be strictly positive and a whole number of Toman
    pub fn validate(&self) -> Result<()> {
        if self.amount <= Decimal::ZERO {
            return Err(AppError::validation(format!(
                "Payment amount must be positive, got: {}",
                self.amount
            )));
        }

        Toman::validate_amount(self.amount)
            .map_err(|e| AppError::validation(format!("Payment amount invalid: {}", e)))
    }
}

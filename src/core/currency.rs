use rust_decimal::{Decimal, RoundingStrategy};

use crate::core::error::{AppError, Result};

/// Whole-unit Toman arithmetic.
///
/// Toman has no subdivision in practice, so every stored amount is an
/// integer and every derived amount is rounded to zero decimal places.
pub struct Toman;

impl Toman {
    /// Rounds to the nearest whole Toman, midpoints away from zero
    /// (round-half-up for the non-negative amounts the ledger produces)
    pub fn round(amount: Decimal) -> Decimal {
        amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
    }

    /// Applies a 0-100 percentage and rounds the result
    pub fn percent_of(amount: Decimal, percent: Decimal) -> Result<Decimal> {
        percent
            .checked_div(Decimal::ONE_HUNDRED)
            .and_then(|rate| amount.checked_mul(rate))
            .map(Self::round)
            .ok_or_else(Self::out_of_range)
    }

    /// `quantity × unit_price`, rounded
    pub fn product(quantity: Decimal, unit_price: Decimal) -> Result<Decimal> {
        quantity
            .checked_mul(unit_price)
            .map(Self::round)
            .ok_or_else(Self::out_of_range)
    }

    /// Overflow-checked sum
    pub fn sum<I>(amounts: I) -> Result<Decimal>
    where
        I: IntoIterator<Item = Decimal>,
    {
        amounts
            .into_iter()
            .try_fold(Decimal::ZERO, |acc, amount| acc.checked_add(amount))
            .ok_or_else(Self::out_of_range)
    }

    /// Validates that an amount is a non-negative whole number of Toman
    pub fn validate_amount(amount: Decimal) -> std::result::Result<(), String> {
        if amount < Decimal::ZERO {
            return Err(format!("Toman amount cannot be negative, got: {}", amount));
        }

        if !amount.fract().is_zero() {
            return Err(format!(
                "Toman amounts must be whole numbers, got: {}",
                amount
            ));
        }

        Ok(())
    }

    /// Strips trailing zero scale so `30000.00` is stored as `30000`
    pub fn whole(amount: Decimal) -> Decimal {
        amount.round_dp(0)
    }

    /// Remaining balance as shown to a user; overpayment shows as zero
    pub fn display_remaining(remaining: Decimal) -> Decimal {
        remaining.max(Decimal::ZERO)
    }

    /// Formats an amount for logs
    pub fn format_amount(amount: Decimal) -> String {
        format!("{} Toman", Self::round(amount))
    }

    fn out_of_range() -> AppError {
        AppError::validation("Toman amount out of range")
    }
}

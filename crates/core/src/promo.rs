//! Promo codes and their discount effects.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while constructing a promo code.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PromoError {
    /// The percentage was outside the 0–100 range.
    #[error("promo percentage {0} is outside 0–100")]
    PercentOutOfRange(Decimal),

    /// The fixed discount amount was negative.
    #[error("promo amount {0} is negative")]
    NegativeAmount(Decimal),
}

/// The discount effect a promo code carries.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum PromoEffect {
    /// A percentage off the payable subtotal.
    PercentOff(Decimal),
    /// A fixed amount off the payable subtotal.
    AmountOff(Decimal),
}

/// A validated promo code: the code string plus its discount effect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromoCode {
    code: String,
    effect: PromoEffect,
}

impl PromoCode {
    /// Creates a percentage-off promo code.
    ///
    /// # Errors
    ///
    /// Returns [`PromoError::PercentOutOfRange`] when `percent` is not within 0–100.
    pub fn percent_off(code: impl Into<String>, percent: Decimal) -> Result<Self, PromoError> {
        if percent < Decimal::ZERO || percent > Decimal::ONE_HUNDRED {
            return Err(PromoError::PercentOutOfRange(percent));
        }

        Ok(Self {
            code: code.into(),
            effect: PromoEffect::PercentOff(percent),
        })
    }

    /// Creates a fixed-amount-off promo code.
    ///
    /// # Errors
    ///
    /// Returns [`PromoError::NegativeAmount`] when `amount` is negative.
    pub fn amount_off(code: impl Into<String>, amount: Decimal) -> Result<Self, PromoError> {
        if amount < Decimal::ZERO {
            return Err(PromoError::NegativeAmount(amount));
        }

        Ok(Self {
            code: code.into(),
            effect: PromoEffect::AmountOff(amount),
        })
    }

    /// Returns the code string.
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Returns the discount effect.
    pub fn effect(&self) -> PromoEffect {
        self.effect
    }

    /// The discount this code grants on the given subtotal, capped at the
    /// subtotal so a discount can never push a total negative.
    pub fn discount_on(&self, subtotal: Decimal) -> Decimal {
        let discount = match self.effect {
            PromoEffect::PercentOff(percent) => (subtotal * percent / Decimal::ONE_HUNDRED)
                .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
            PromoEffect::AmountOff(amount) => amount,
        };

        discount.min(subtotal)
    }
}

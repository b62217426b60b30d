//! Money type
//!
//! Domain primitive for currency-tagged monetary amounts. Amount and
//! currency are validated at construction time, ensuring invalid values
//! cannot exist in the system.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Add;
use std::str::FromStr;

use super::error::DomainError;

/// Required length of a currency code (ISO 4217)
const CURRENCY_CODE_LEN: usize = 3;

/// Money represents a validated amount in a specific currency.
///
/// # Invariants
/// - Amount is never negative
/// - Currency is a 3-letter code, stored uppercase
/// - Amounts combine only when their currencies match
///
/// # Example
/// ```
/// use rust_decimal::Decimal;
/// use circulation::domain::Money;
///
/// let fee = Money::new(Decimal::new(450, 2), "eur").unwrap();
/// assert_eq!(fee.currency(), "EUR");
/// assert_eq!(fee.to_string(), "EUR 4.50");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Money {
    amount: Decimal,
    currency: String,
}

impl Money {
    /// Create a new Money value with validation.
    ///
    /// # Errors
    /// - `DomainError::NegativeAmount` if amount < 0
    /// - `DomainError::EmptyField` if the currency is blank
    /// - `DomainError::InvalidCurrency` if the currency is not 3 characters
    pub fn new(amount: Decimal, currency: &str) -> Result<Self, DomainError> {
        // Rule 1: Never negative
        if amount < Decimal::ZERO {
            return Err(DomainError::NegativeAmount(amount));
        }

        // Rule 2: Currency must be present
        if currency.trim().is_empty() {
            return Err(DomainError::empty("Currency"));
        }

        // Rule 3: Exactly 3 characters, normalized to uppercase
        if currency.chars().count() != CURRENCY_CODE_LEN {
            return Err(DomainError::InvalidCurrency(currency.to_string()));
        }

        Ok(Self {
            amount,
            currency: currency.to_uppercase(),
        })
    }

    /// Get the decimal amount.
    pub fn amount(&self) -> Decimal {
        self.amount
    }

    /// Get the currency code.
    pub fn currency(&self) -> &str {
        &self.currency
    }

    /// Add another amount of the same currency.
    ///
    /// # Errors
    /// - `DomainError::CurrencyMismatch` if the currencies differ
    /// - `DomainError::AmountOverflow` if the sum does not fit a Decimal
    pub fn add(&self, other: &Money) -> Result<Money, DomainError> {
        self.require_same_currency(other)?;

        let sum = self
            .amount
            .checked_add(other.amount)
            .ok_or(DomainError::AmountOverflow)?;

        Money::new(sum, &self.currency)
    }

    /// Subtract another amount of the same currency.
    ///
    /// # Errors
    /// - `DomainError::CurrencyMismatch` if the currencies differ
    /// - `DomainError::NegativeResult` if the difference would drop below zero
    pub fn subtract(&self, other: &Money) -> Result<Money, DomainError> {
        self.require_same_currency(other)?;

        let difference = self
            .amount
            .checked_sub(other.amount)
            .ok_or(DomainError::AmountOverflow)?;

        if difference < Decimal::ZERO {
            return Err(DomainError::NegativeResult);
        }

        Money::new(difference, &self.currency)
    }

    /// Scale this amount by a non-negative factor.
    ///
    /// # Errors
    /// - `DomainError::NegativeMultiplier` if the factor is negative
    /// - `DomainError::AmountOverflow` if the product does not fit a Decimal
    pub fn multiply_by(&self, factor: Decimal) -> Result<Money, DomainError> {
        if factor < Decimal::ZERO {
            return Err(DomainError::NegativeMultiplier(factor));
        }

        let product = self
            .amount
            .checked_mul(factor)
            .ok_or(DomainError::AmountOverflow)?;

        Money::new(product, &self.currency)
    }

    fn require_same_currency(&self, other: &Money) -> Result<(), DomainError> {
        if self.currency != other.currency {
            return Err(DomainError::CurrencyMismatch {
                left: self.currency.clone(),
                right: other.currency.clone(),
            });
        }
        Ok(())
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:.2}", self.currency, self.amount)
    }
}

impl FromStr for Money {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (currency, amount) = s
            .split_once(' ')
            .ok_or_else(|| DomainError::MoneyParse(s.to_string()))?;

        let amount = Decimal::from_str(amount)
            .map_err(|e| DomainError::MoneyParse(e.to_string()))?;

        Money::new(amount, currency)
    }
}

impl TryFrom<String> for Money {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Money::from_str(&value)
    }
}

impl From<Money> for String {
    fn from(money: Money) -> Self {
        format!("{} {}", money.currency, money.amount)
    }
}

impl Add for Money {
    type Output = Result<Money, DomainError>;

    fn add(self, rhs: Self) -> Self::Output {
        Money::add(&self, &rhs)
    }
}

// Note: No Sub operator and no ordering. Subtraction must go through the
// validating method, and comparing amounts across currencies is meaningless.

//! Currency conversion seam.
//!
//! Conversion policy (where rates come from) is external to this crate; the
//! workflow only needs amounts restated in the reporting currency. Rounding
//! uses banker's rounding (round half to even) to minimize cumulative error.

use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};

use arvo_shared::types::Currency;

/// Decimal places kept on converted amounts.
pub const BASE_DECIMAL_PLACES: u32 = 2;

/// Converts an amount using the given exchange rate.
#[must_use]
pub fn convert_amount(amount: Decimal, rate: Decimal, decimal_places: u32) -> Decimal {
    let converted = amount * rate;
    converted.round_dp_with_strategy(decimal_places, RoundingStrategy::MidpointNearestEven)
}

/// Restates amounts in the reporting (base) currency.
pub trait CurrencyExchange: Send + Sync {
    /// Converts `amount` from `currency` to the base currency as of `date`.
    fn to_base(&self, currency: Currency, amount: Decimal, date: NaiveDate) -> Decimal;

    /// The reporting currency amounts are restated into.
    fn base_currency(&self) -> Currency;
}

/// A fixed table of rates into the base currency.
///
/// Suitable for tests and for deployments that load one effective rate set;
/// date-dependent rate sources implement [`CurrencyExchange`] themselves.
#[derive(Debug, Clone)]
pub struct FixedRateTable {
    base: Currency,
    rates: HashMap<Currency, Decimal>,
}

impl FixedRateTable {
    /// Creates a table with the given base currency and no rates.
    #[must_use]
    pub fn new(base: Currency) -> Self {
        Self {
            base,
            rates: HashMap::new(),
        }
    }

    /// Adds a rate from `currency` into the base currency.
    #[must_use]
    pub fn with_rate(mut self, currency: Currency, rate: Decimal) -> Self {
        self.rates.insert(currency, rate);
        self
    }
}

impl CurrencyExchange for FixedRateTable {
    fn to_base(&self, currency: Currency, amount: Decimal, _date: NaiveDate) -> Decimal {
        if currency == self.base {
            return amount;
        }
        let rate = self.rates.get(&currency).copied().unwrap_or(Decimal::ONE);
        convert_amount(amount, rate, BASE_DECIMAL_PLACES)
    }

    fn base_currency(&self) -> Currency {
        self.base
    }
}

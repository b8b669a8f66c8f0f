use serde::{Deserialize, Serialize};
use std::iter::Sum;
use std::ops::{Add, AddAssign};
use strum::{Display, EnumIter, EnumString};
use utoipa::ToSchema;

/// Currency enumeration
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    Default,
    ToSchema,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Eur,
    Usd,
    Gbp,
}

impl Currency {
    pub fn symbol(self) -> &'static str {
        match self {
            Currency::Eur => "€",
            Currency::Usd => "$",
            Currency::Gbp => "£",
        }
    }
}

/// Money representation with precision
///
/// All arithmetic happens on the integer amount, so sums of rates are exact.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
pub struct Money {
    /// Amount in the smallest currency unit (cents)
    pub amount: i64,
    /// Currency type
    pub currency: Currency,
    /// Number of decimal places (2 for cents)
    pub decimal_places: i32,
}

impl Money {
    /// Create a new Money value
    pub const fn new(amount: i64, currency: Currency) -> Self {
        Self {
            amount,
            currency,
            decimal_places: 2,
        }
    }

    /// Whole euros, e.g. `Money::euros(500)` is €500.00
    pub const fn euros(whole: i64) -> Self {
        Self::new(whole * 100, Currency::Eur)
    }

    pub const fn zero() -> Self {
        Self::new(0, Currency::Eur)
    }

    /// Convert to decimal value
    pub fn to_decimal(&self) -> f64 {
        self.amount as f64 / 10f64.powi(self.decimal_places)
    }

    pub fn is_zero(&self) -> bool {
        self.amount == 0
    }

    /// Multiply by a whole quantity.
    pub fn times(self, quantity: u32) -> Self {
        Self {
            amount: self.amount * i64::from(quantity),
            ..self
        }
    }

    /// `percent`% of this amount, truncated toward zero.
    pub fn percent(self, percent: i64) -> Self {
        Self {
            amount: self.amount * percent / 100,
            ..self
        }
    }

    /// Amount with space-grouped thousands and a decimal comma: `1 700,00`.
    pub fn amount_display(&self) -> String {
        let places = self.decimal_places.max(0) as u32;
        let divisor = 10u64.pow(places);
        let magnitude = self.amount.unsigned_abs();
        let whole = (magnitude / divisor).to_string();
        let fraction = magnitude % divisor;

        let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
        for (i, digit) in whole.chars().enumerate() {
            if i > 0 && (whole.len() - i) % 3 == 0 {
                grouped.push(' ');
            }
            grouped.push(digit);
        }

        let sign = if self.amount < 0 { "-" } else { "" };
        if places == 0 {
            format!("{}{}", sign, grouped)
        } else {
            format!(
                "{}{},{:0width$}",
                sign,
                grouped,
                fraction,
                width = places as usize
            )
        }
    }

    /// Amount followed by the currency symbol: `1 700,00 €`.
    pub fn formatted(&self) -> String {
        format!("{} {}", self.amount_display(), self.currency.symbol())
    }
}

impl Default for Money {
    fn default() -> Self {
        Self::zero()
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money {
            amount: self.amount + rhs.amount,
            ..self
        }
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        self.amount += rhs.amount;
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::zero(), Add::add)
    }
}

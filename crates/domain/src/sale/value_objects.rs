//! Value objects for the sale domain.

use serde::{Deserialize, Serialize};

const BASIS_POINTS_PER_UNIT: i64 = 10_000;

/// Money amount represented in cents to avoid floating point issues.
///
/// The operators saturate at the bounds of `i64`; the `checked_*` methods
/// report overflow instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money {
    /// Amount in cents (e.g., 1000 = $10.00)
    cents: i64,
}

impl Money {
    /// Creates a new Money amount from cents.
    pub fn from_cents(cents: i64) -> Self {
        Self { cents }
    }

    /// Returns zero money.
    pub fn zero() -> Self {
        Self { cents: 0 }
    }

    /// Returns the amount in cents.
    pub fn cents(&self) -> i64 {
        self.cents
    }

    /// Returns the dollar portion (whole number).
    pub fn dollars(&self) -> i64 {
        self.cents / 100
    }

    /// Returns the cents portion (remainder after dollars).
    pub fn cents_part(&self) -> i64 {
        self.cents.abs() % 100
    }

    /// Returns true if the amount is zero.
    pub fn is_zero(&self) -> bool {
        self.cents == 0
    }

    /// Multiplies by a quantity, saturating at the bounds of `i64`.
    pub fn multiply(&self, quantity: u32) -> Money {
        Money {
            cents: self.cents.saturating_mul(i64::from(quantity)),
        }
    }

    /// Multiplies by a quantity, returning `None` on overflow.
    pub fn checked_multiply(&self, quantity: u32) -> Option<Money> {
        self.cents
            .checked_mul(i64::from(quantity))
            .map(Money::from_cents)
    }

    /// Adds two amounts, returning `None` on overflow.
    pub fn checked_add(&self, rhs: Money) -> Option<Money> {
        self.cents.checked_add(rhs.cents).map(Money::from_cents)
    }

    /// Subtracts two amounts, returning `None` on overflow.
    pub fn checked_sub(&self, rhs: Money) -> Option<Money> {
        self.cents.checked_sub(rhs.cents).map(Money::from_cents)
    }

    /// Returns this amount reduced by a fractional discount rate.
    ///
    /// The result is rounded half away from zero to the nearest cent.
    pub fn apply_discount(&self, rate: DiscountRate) -> Money {
        let keep = BASIS_POINTS_PER_UNIT - i64::from(rate.basis_points());
        let scaled = i128::from(self.cents) * i128::from(keep);
        let divisor = i128::from(BASIS_POINTS_PER_UNIT);

        let mut cents = scaled / divisor;
        if (scaled % divisor).abs() * 2 >= divisor {
            cents += scaled.signum();
        }

        // |cents| never exceeds |self.cents| since `keep` is at most one unit.
        Money {
            cents: cents as i64,
        }
    }
}

impl Default for Money {
    fn default() -> Self {
        Self::zero()
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.cents < 0 {
            write!(f, "-${}.{:02}", self.dollars().abs(), self.cents_part())
        } else {
            write!(f, "${}.{:02}", self.dollars(), self.cents_part())
        }
    }
}

impl std::ops::Add for Money {
    type Output = Money;

    fn add(self, rhs: Self) -> Self::Output {
        Money {
            cents: self.cents.saturating_add(rhs.cents),
        }
    }
}

impl std::ops::Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Self) -> Self::Output {
        Money {
            cents: self.cents.saturating_sub(rhs.cents),
        }
    }
}

impl std::ops::AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        self.cents = self.cents.saturating_add(rhs.cents);
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

/// A fractional discount rate applied to a pre-discount total.
///
/// Distinct from a line item's flat discount, which is a money amount.
/// Stored in basis points so rates compare exactly.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct DiscountRate(u32);

impl DiscountRate {
    /// No discount.
    pub const NONE: DiscountRate = DiscountRate(0);

    /// A 10% discount.
    pub const TEN_PERCENT: DiscountRate = DiscountRate(1_000);

    /// Creates a rate from basis points (1 bp = 0.01%). Values above 100% are clamped.
    pub fn from_basis_points(bps: u32) -> Self {
        Self(bps.min(BASIS_POINTS_PER_UNIT as u32))
    }

    /// Returns the rate in basis points.
    pub fn basis_points(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a fraction, e.g. `0.10` for ten percent.
    pub fn as_fraction(&self) -> f64 {
        f64::from(self.0) / BASIS_POINTS_PER_UNIT as f64
    }

    /// Returns true if no discount applies.
    pub fn is_none(&self) -> bool {
        self.0 == 0
    }
}

impl std::fmt::Display for DiscountRate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{:02}%", self.0 / 100, self.0 % 100)
    }
}

//! Coupon code table.
//!
//! A closed set of code -> percent-off pairs. Codes are matched exactly
//! after normalization (trim + uppercase); the table is fixed configuration,
//! not user-editable.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use digital_store_core::CouponCode;

/// A coupon percent-off outside the `1..=100` range.
#[derive(Debug, Error)]
#[error("invalid percent-off {percent} for coupon {code}")]
pub struct InvalidPercentError {
    /// The offending coupon code.
    pub code: String,
    /// The rejected percent value.
    pub percent: u8,
}

/// A coupon that has been matched and applied to the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedCoupon {
    /// Normalized coupon code.
    pub code: CouponCode,
    /// Whole-number percentage off the subtotal.
    pub percent_off: u8,
}

/// Fixed table of valid coupon codes.
#[derive(Debug, Clone)]
pub struct CouponBook {
    codes: HashMap<String, u8>,
}

impl CouponBook {
    /// Build a book from code/percent pairs. Codes are normalized on entry.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidPercentError`] when a percent is zero or above 100.
    pub fn from_pairs<I, S>(pairs: I) -> Result<Self, InvalidPercentError>
    where
        I: IntoIterator<Item = (S, u8)>,
        S: Into<String>,
    {
        let mut codes = HashMap::new();
        for (code, percent) in pairs {
            let code = normalize(&code.into());
            if percent == 0 || percent > 100 {
                return Err(InvalidPercentError { code, percent });
            }
            codes.insert(code, percent);
        }
        Ok(Self { codes })
    }

    /// Look up a raw (unnormalized) code; `None` when it is not in the book.
    #[must_use]
    pub fn lookup(&self, raw: &str) -> Option<AppliedCoupon> {
        let code = normalize(raw);
        self.codes.get(&code).map(|&percent_off| AppliedCoupon {
            code: CouponCode::new(code.clone()),
            percent_off,
        })
    }

    /// Number of codes in the book.
    #[must_use]
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    /// Whether the book holds no codes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

impl Default for CouponBook {
    /// The stock simulated coupons.
    fn default() -> Self {
        Self {
            codes: HashMap::from([
                ("DESCONTO10".to_owned(), 10),
                ("PROMO20".to_owned(), 20),
                ("OFF30".to_owned(), 30),
            ]),
        }
    }
}

/// Normalize a coupon code: trim surrounding whitespace, then uppercase.
fn normalize(code: &str) -> String {
    code.trim().to_uppercase()
}

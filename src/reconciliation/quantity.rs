//! Parsing and capping of user-entered quantities

use bigdecimal::{BigDecimal, RoundingMode};
use std::str::FromStr;

use crate::types::Violation;

/// Decimal places kept on entered quantities
pub const QUANTITY_SCALE: i64 = 2;

/// Parse a quantity typed into a receipt form.
///
/// Digits past the second decimal place are dropped. Non-numeric input and
/// values that are not positive are rejected.
pub fn parse_quantity(name: &str, input: &str) -> Result<BigDecimal, Violation> {
    let invalid = || Violation::InvalidQuantityFormat {
        name: name.to_string(),
        input: input.to_string(),
    };

    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(invalid());
    }

    let quantity = BigDecimal::from_str(trimmed)
        .map_err(|_| invalid())?
        .with_scale_round(QUANTITY_SCALE, RoundingMode::Down);

    if quantity <= BigDecimal::from(0) {
        return Err(invalid());
    }

    Ok(quantity)
}

/// Whether a quantity carries more decimal places than entered quantities may
pub fn has_excess_precision(quantity: &BigDecimal) -> bool {
    *quantity != quantity.with_scale_round(QUANTITY_SCALE, RoundingMode::Down)
}

/// Cap an entered quantity at the receivable maximum
pub fn clamp_to_cap(quantity: BigDecimal, cap: &BigDecimal) -> BigDecimal {
    if quantity > *cap {
        cap.clone()
    } else {
        quantity
    }
}

/// Read the "other charges" field; absent or non-numeric input counts as zero
pub fn parse_other_charges(input: Option<&str>) -> BigDecimal {
    input
        .map(str::trim)
        .and_then(|s| BigDecimal::from_str(s).ok())
        .unwrap_or_else(|| BigDecimal::from(0))
}

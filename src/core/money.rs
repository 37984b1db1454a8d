use rust_decimal::Decimal;

use crate::core::{AppError, Result};

/// Number of decimal places every amount is stored and displayed with.
pub const AMOUNT_SCALE: u32 = 2;

/// Prices are stored as DECIMAL(12,2), so they must stay below 10^10.
const MAX_PRICE: Decimal = Decimal::from_parts(1_410_065_408, 2, 0, false, 0);

/// Rounds an amount to two decimal places (half away from zero)
pub fn round_amount(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(
        AMOUNT_SCALE,
        rust_decimal::RoundingStrategy::MidpointAwayFromZero,
    )
}

/// Renders an amount with exactly two decimal places, e.g. `5` -> `"5.00"`
pub fn format_amount(amount: Decimal) -> String {
    let mut rounded = round_amount(amount);
    rounded.rescale(AMOUNT_SCALE);
    rounded.to_string()
}

/// Validates a sale price: strictly positive, at most two decimal places,
/// and within the storage column range.
pub fn validate_price(price: Decimal) -> Result<()> {
    if price <= Decimal::ZERO {
        return Err(AppError::validation("Price must be greater than 0"));
    }

    if price.normalize().scale() > AMOUNT_SCALE {
        return Err(AppError::validation(
            "Price cannot have more than 2 decimal places",
        ));
    }

    if price >= MAX_PRICE {
        return Err(AppError::validation(format!(
            "Price must be less than {}",
            MAX_PRICE
        )));
    }

    Ok(())
}

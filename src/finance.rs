//! General functions related to finance.
use crate::units::{Dimensionless, Money, Years};

/// Calculates the capital recovery factor (CRF) for a given lifetime and discount rate.
///
/// The CRF is used to annualise capital costs over the lifetime of an asset. Only defined for a
/// positive discount rate and lifetime. A zero discount rate is not special-cased and gives NaN.
pub fn capital_recovery_factor(discount_rate: Dimensionless, lifetime: Years) -> Dimensionless {
    let discount_factor = (Dimensionless(1.0) + discount_rate).powf(-lifetime.value());
    discount_rate / (Dimensionless(1.0) - discount_factor)
}

/// Converts a one-off capital cost into an equivalent annual cost.
///
/// # Arguments
///
/// * `cost` - The up-front capital cost
/// * `discount_rate` - The discount rate, as a fraction (e.g. 0.1 for 10%)
/// * `lifetime` - The economic lifetime of the asset
pub fn annualized_capital_cost(cost: Money, discount_rate: Dimensionless, lifetime: Years) -> Money {
    cost * capital_recovery_factor(discount_rate, lifetime)
}

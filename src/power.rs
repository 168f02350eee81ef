//! Calculates how much power a connected vehicle can offer to the grid.
use crate::units::{Dimensionless, Distance, DistancePerEnergy, Energy, Hours, Power};

/// Default driving efficiency of the vehicle
pub const DEFAULT_DRIVING_EFFICIENCY: DistancePerEnergy = DistancePerEnergy(4.025);

/// Default efficiency of the DC to AC inverter
pub const DEFAULT_INVERTER_EFFICIENCY: Dimensionless = Dimensionless(0.93);

/// Compute the maximum electrical power output of a vehicle battery when connected to the grid.
///
/// The energy needed to drive `distance_driven` plus the driver's `range_buffer` is held back, the
/// remainder is converted to AC and spread over the `dispatch_time`. The result is then limited to
/// the rating of the connector and floored at zero, so a vehicle which cannot cover its driving
/// needs contributes nothing rather than drawing power.
///
/// `dispatch_time` must be positive. A zero dispatch time is not checked for: the raw power will be
/// infinite (clamped to `connector_power`) or NaN (propagated).
///
/// # Arguments
///
/// * `connector_power` - The power capacity of the connection to the grid
/// * `stored_energy` - Energy available as DC to the inverter
/// * `distance_driven` - Distance driven since the battery was full
/// * `range_buffer` - Minimum range required by the driver
/// * `dispatch_time` - Time over which the stored energy is dispatched
/// * `driving_efficiency` - Distance travelled per unit of energy
/// * `inverter_efficiency` - Conversion efficiency of the DC to AC inverter
pub fn max_vehicle_power(
    connector_power: Power,
    stored_energy: Energy,
    distance_driven: Distance,
    range_buffer: Distance,
    dispatch_time: Hours,
    driving_efficiency: DistancePerEnergy,
    inverter_efficiency: Dimensionless,
) -> Power {
    let driving_energy = (distance_driven + range_buffer) / driving_efficiency;
    let raw = (stored_energy - driving_energy) * inverter_efficiency / dispatch_time;

    clamp_power(raw, connector_power)
}

/// As [`max_vehicle_power`], using the default driving and inverter efficiencies
pub fn max_vehicle_power_default(
    connector_power: Power,
    stored_energy: Energy,
    distance_driven: Distance,
    range_buffer: Distance,
    dispatch_time: Hours,
) -> Power {
    max_vehicle_power(
        connector_power,
        stored_energy,
        distance_driven,
        range_buffer,
        dispatch_time,
        DEFAULT_DRIVING_EFFICIENCY,
        DEFAULT_INVERTER_EFFICIENCY,
    )
}

/// Limit power to `[0, connector_power]`.
///
/// `f64::min`/`f64::max` discard NaN operands, so NaN is propagated explicitly.
fn clamp_power(raw: Power, connector_power: Power) -> Power {
    if raw.0.is_nan() || connector_power.0.is_nan() {
        return Power(f64::NAN);
    }

    Power(raw.0.min(connector_power.0).max(0.0))
}

//! Battery lifetime expressed as an energy throughput.
use crate::units::{Dimensionless, Energy};

/// Compute the lifetime of a battery in energy terms.
///
/// Each rated cycle is defined at a particular depth of discharge, so the total energy the battery
/// can deliver over its life is the number of cycles times the energy moved per cycle. The result is
/// not clamped: a zero or negative lifetime is passed on to the caller.
///
/// # Arguments
///
/// * `lifetime_cycles` - Number of cycles the battery is rated for
/// * `total_energy_stored` - Size of the battery
/// * `depth_of_discharge` - The depth of discharge at which `lifetime_cycles` is defined
pub fn battery_lifetime(
    lifetime_cycles: Dimensionless,
    total_energy_stored: Energy,
    depth_of_discharge: Dimensionless,
) -> Energy {
    lifetime_cycles * total_energy_stored * depth_of_discharge
}

//! The cost of operating a vehicle for V2G services over a year.
use crate::battery::battery_lifetime;
use crate::finance::annualized_capital_cost;
use crate::units::{Dimensionless, Energy, Money, MoneyPerEnergy, Years};
use serde::Serialize;

/// The intermediate values of the V2G cost calculation
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CostBreakdown {
    /// Energy the battery can deliver over its life
    pub battery_life: Energy,
    /// Battery wear per unit of energy dispatched
    pub degradation_cost: MoneyPerEnergy,
    /// Cost per unit of energy dispatched, including losses and degradation
    pub cost_of_energy: MoneyPerEnergy,
    /// Annualised cost of the V2G equipment
    pub annualised_capex: Money,
    /// Total annual cost
    pub total: Money,
}

/// Calculate the annual cost of providing V2G services, with every intermediate value.
///
/// The degradation cost spreads the cost of the battery over its lifetime throughput. Purchased
/// energy is scaled up by the round-trip losses. A battery life or round-trip efficiency of zero
/// gives a non-finite cost.
///
/// # Arguments
///
/// * `battery_capital_cost` - Up-front cost of the battery
/// * `lifetime_cycles` - Number of cycles the battery is rated for
/// * `total_energy_stored` - Size of the battery
/// * `depth_of_discharge` - Depth of discharge at which `lifetime_cycles` is defined
/// * `purchased_energy_cost` - Price paid for charging energy
/// * `round_trip_efficiency` - Fraction of energy recovered going grid to battery to grid
/// * `energy_dispatched` - Energy delivered to the grid over the year
/// * `cost_of_v2g_equip` - Up-front cost of the V2G equipment
/// * `discount_rate` - Discount rate for annualising the equipment cost
/// * `economic_lifetime` - Lifetime over which the equipment cost is annualised
pub fn cost_breakdown(
    battery_capital_cost: Money,
    lifetime_cycles: Dimensionless,
    total_energy_stored: Energy,
    depth_of_discharge: Dimensionless,
    purchased_energy_cost: MoneyPerEnergy,
    round_trip_efficiency: Dimensionless,
    energy_dispatched: Energy,
    cost_of_v2g_equip: Money,
    discount_rate: Dimensionless,
    economic_lifetime: Years,
) -> CostBreakdown {
    let battery_life = battery_lifetime(lifetime_cycles, total_energy_stored, depth_of_discharge);
    let degradation_cost = battery_capital_cost / battery_life;
    let cost_of_energy = purchased_energy_cost / round_trip_efficiency + degradation_cost;
    let annualised_capex =
        annualized_capital_cost(cost_of_v2g_equip, discount_rate, economic_lifetime);
    let total = cost_of_energy * energy_dispatched + annualised_capex;

    CostBreakdown {
        battery_life,
        degradation_cost,
        cost_of_energy,
        annualised_capex,
        total,
    }
}

/// Calculate the total annual cost of providing V2G services.
///
/// See [`cost_breakdown`] for the arguments.
pub fn cost_of_vehicle_to_grid(
    battery_capital_cost: Money,
    lifetime_cycles: Dimensionless,
    total_energy_stored: Energy,
    depth_of_discharge: Dimensionless,
    purchased_energy_cost: MoneyPerEnergy,
    round_trip_efficiency: Dimensionless,
    energy_dispatched: Energy,
    cost_of_v2g_equip: Money,
    discount_rate: Dimensionless,
    economic_lifetime: Years,
) -> Money {
    cost_breakdown(
        battery_capital_cost,
        lifetime_cycles,
        total_energy_stored,
        depth_of_discharge,
        purchased_energy_cost,
        round_trip_efficiency,
        energy_dispatched,
        cost_of_v2g_equip,
        discount_rate,
        economic_lifetime,
    )
    .total
}

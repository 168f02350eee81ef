//! The top-level profit calculation for a vehicle providing grid regulation services.
//!
//! Revenue comes from two sources: a capacity payment for every hour the vehicle's power is
//! available to the grid operator, and payment for the energy actually dispatched. Costs are
//! battery degradation, the energy bought to replace what was dispatched and the annualised cost
//! of the V2G equipment (see [`crate::cost`]).
use crate::cost::{CostBreakdown, cost_breakdown};
use crate::power::max_vehicle_power;
use crate::scenario::Scenario;
use crate::units::{
    Dimensionless, Distance, Energy, Hours, Money, MoneyPerEnergy, Power, Years,
};
use serde::Serialize;

/// Number of days in a year
pub const DAYS_PER_YEAR: Dimensionless = Dimensionless(365.0);

/// The annual profit, revenue and cost of a scenario
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProfitResult {
    /// Revenue minus cost
    pub profit: Money,
    /// Capacity and energy payments
    pub revenue: Money,
    /// Total cost of operation
    pub cost: Money,
}

impl From<ProfitResult> for (f64, f64, f64) {
    fn from(result: ProfitResult) -> Self {
        (
            result.profit.value(),
            result.revenue.value(),
            result.cost.value(),
        )
    }
}

/// Every quantity derived while calculating the profit of a scenario
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProfitBreakdown {
    /// Cost of the battery
    pub battery_capital_cost: Money,
    /// Energy available to the inverter
    pub stored_energy: Energy,
    /// Hours connected to the grid over a year
    pub total_hours_connected: Hours,
    /// Hours per day over which stored energy is dispatched
    pub dispatch_window: Hours,
    /// Hours over a year in which energy is dispatched
    pub time_dispatched: Hours,
    /// Power the vehicle can offer to the grid
    pub power_available: Power,
    /// Energy delivered to the grid over a year
    pub energy_dispatched: Energy,
    /// Revenue from the capacity payment
    pub capacity_revenue: Money,
    /// Revenue from selling dispatched energy
    pub energy_revenue: Money,
    /// Breakdown of the costs
    pub cost: CostBreakdown,
    /// The final result
    pub result: ProfitResult,
}

impl Scenario {
    /// Calculate the profit of this scenario along with every intermediate value
    pub fn breakdown(&self) -> ProfitBreakdown {
        let battery_capital_cost = self.battery_size * self.battery_unit_cost;
        let stored_energy = self.stored_energy();
        let total_hours_connected = self.hours_connected_per_day * DAYS_PER_YEAR;
        let time_dispatched = total_hours_connected * self.ratio_dispatch_to_contract;

        // The power limit depends on the daily dispatch window, not the annual dispatch time
        let dispatch_window = self.dispatch_window();
        let power_available = max_vehicle_power(
            self.connector_power,
            stored_energy,
            self.distance_driven,
            self.range_buffer,
            dispatch_window,
            self.driving_efficiency,
            self.inverter_efficiency,
        );

        let energy_dispatched = self.ratio_dispatch_to_contract * power_available * time_dispatched;

        let capacity_revenue = self.capacity_price * power_available * total_hours_connected;
        let energy_revenue = self.electricity_price * energy_dispatched;
        let revenue = capacity_revenue + energy_revenue;

        let cost = cost_breakdown(
            battery_capital_cost,
            self.lifetime_cycles,
            self.battery_size,
            self.depth_of_discharge,
            self.purchased_energy_cost,
            self.round_trip_efficiency,
            energy_dispatched,
            self.cost_of_v2g_equip,
            self.discount_rate,
            self.economic_lifetime,
        );

        ProfitBreakdown {
            battery_capital_cost,
            stored_energy,
            total_hours_connected,
            dispatch_window,
            time_dispatched,
            power_available,
            energy_dispatched,
            capacity_revenue,
            energy_revenue,
            cost,
            result: ProfitResult {
                profit: revenue - cost.total,
                revenue,
                cost: cost.total,
            },
        }
    }

    /// Calculate the annual profit, revenue and cost of this scenario
    pub fn evaluate(&self) -> ProfitResult {
        self.breakdown().result
    }
}

/// Compute the profit of using a vehicle for regulation services.
///
/// The scenario is not validated: out of domain parameters give non-finite values in the result.
pub fn compute_profit(scenario: &Scenario) -> ProfitResult {
    scenario.evaluate()
}

/// Compute the profit of using a vehicle for regulation services from individual parameters.
///
/// The default driving and inverter efficiencies are used. See [`Scenario`] for the meaning of
/// each argument.
pub fn compute_profit_with(
    battery_size: Energy,
    battery_unit_cost: MoneyPerEnergy,
    connector_power: Power,
    lifetime_cycles: Dimensionless,
    depth_of_discharge: Dimensionless,
    electricity_price: MoneyPerEnergy,
    purchased_energy_cost: MoneyPerEnergy,
    capacity_price: MoneyPerEnergy,
    round_trip_efficiency: Dimensionless,
    cost_of_v2g_equip: Money,
    discount_rate: Dimensionless,
    economic_lifetime: Years,
    distance_driven: Distance,
    range_buffer: Distance,
    ratio_dispatch_to_contract: Dimensionless,
    hours_connected_per_day: Hours,
) -> ProfitResult {
    Scenario {
        battery_size,
        battery_unit_cost,
        connector_power,
        lifetime_cycles,
        depth_of_discharge,
        electricity_price,
        purchased_energy_cost,
        capacity_price,
        round_trip_efficiency,
        cost_of_v2g_equip,
        discount_rate,
        economic_lifetime,
        distance_driven,
        range_buffer,
        ratio_dispatch_to_contract,
        hours_connected_per_day,
        ..Scenario::default()
    }
    .evaluate()
}

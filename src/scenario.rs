//! Defines the `Scenario` struct, which holds every input to the profit calculation.
use crate::power::{DEFAULT_DRIVING_EFFICIENCY, DEFAULT_INVERTER_EFFICIENCY};
use crate::units::{
    Dimensionless, Distance, DistancePerEnergy, Energy, Hours, Money, MoneyPerEnergy, Power, Years,
};
use anyhow::{Context, Result, ensure};
use log::warn;
use serde::{Deserialize, Serialize};

macro_rules! define_unit_param_default {
    ($name:ident, $type: ty, $value: expr) => {
        fn $name() -> $type {
            <$type>::new($value)
        }
    };
}

define_unit_param_default!(default_battery_size, Energy, 70.0);
define_unit_param_default!(default_battery_unit_cost, MoneyPerEnergy, 350.0);
define_unit_param_default!(default_connector_power, Power, 14.0);
define_unit_param_default!(default_lifetime_cycles, Dimensionless, 2000.0);
define_unit_param_default!(default_depth_of_discharge, Dimensionless, 0.8);
define_unit_param_default!(default_electricity_price, MoneyPerEnergy, 0.1);
define_unit_param_default!(default_purchased_energy_cost, MoneyPerEnergy, 0.05);
define_unit_param_default!(default_capacity_price, MoneyPerEnergy, 0.007);
define_unit_param_default!(default_round_trip_efficiency, Dimensionless, 0.73);
define_unit_param_default!(default_cost_of_v2g_equip, Money, 2000.0);
define_unit_param_default!(default_discount_rate, Dimensionless, 0.1);
define_unit_param_default!(default_economic_lifetime, Years, 10.0);
define_unit_param_default!(default_distance_driven, Distance, 0.0);
define_unit_param_default!(default_range_buffer, Distance, 0.0);
define_unit_param_default!(default_ratio_dispatch_to_contract, Dimensionless, 0.1);
define_unit_param_default!(default_hours_connected_per_day, Hours, 18.0);

fn default_driving_efficiency() -> DistancePerEnergy {
    DEFAULT_DRIVING_EFFICIENCY
}

fn default_inverter_efficiency() -> Dimensionless {
    DEFAULT_INVERTER_EFFICIENCY
}

/// The names of the scenario parameters, in the order used for sample matrices
pub const SCENARIO_PARAMETER_NAMES: [&str; 18] = [
    "battery_size",
    "battery_unit_cost",
    "connector_power",
    "lifetime_cycles",
    "depth_of_discharge",
    "electricity_price",
    "purchased_energy_cost",
    "capacity_price",
    "round_trip_efficiency",
    "cost_of_v2g_equip",
    "discount_rate",
    "economic_lifetime",
    "distance_driven",
    "range_buffer",
    "ratio_dispatch_to_contract",
    "hours_connected_per_day",
    "driving_efficiency",
    "inverter_efficiency",
];

/// The technical and economic parameters of a V2G scenario.
///
/// The defaults describe a 70 kWh vehicle plugged in for 18 hours a day on a 14 kW connection.
/// Missing keys take their default value when reading from TOML.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
    /// Size of the battery (kWh)
    #[serde(default = "default_battery_size")]
    pub battery_size: Energy,
    /// Cost of the battery per unit of capacity (£/kWh)
    #[serde(default = "default_battery_unit_cost")]
    pub battery_unit_cost: MoneyPerEnergy,
    /// Power rating of the grid connection (kW)
    #[serde(default = "default_connector_power")]
    pub connector_power: Power,
    /// Number of cycles the battery is rated for
    #[serde(default = "default_lifetime_cycles")]
    pub lifetime_cycles: Dimensionless,
    /// Depth of discharge at which `lifetime_cycles` is defined (0 to 1)
    #[serde(default = "default_depth_of_discharge")]
    pub depth_of_discharge: Dimensionless,
    /// Price received for energy exported to the grid (£/kWh)
    #[serde(default = "default_electricity_price")]
    pub electricity_price: MoneyPerEnergy,
    /// Price paid for energy used to charge the battery (£/kWh)
    #[serde(default = "default_purchased_energy_cost")]
    pub purchased_energy_cost: MoneyPerEnergy,
    /// Payment for making power available, per kW per hour connected (£/kWh)
    #[serde(default = "default_capacity_price")]
    pub capacity_price: MoneyPerEnergy,
    /// Fraction of energy recovered going grid to battery to grid
    #[serde(default = "default_round_trip_efficiency")]
    pub round_trip_efficiency: Dimensionless,
    /// Up-front cost of the V2G equipment (£)
    #[serde(default = "default_cost_of_v2g_equip")]
    pub cost_of_v2g_equip: Money,
    /// Discount rate used to annualise the equipment cost
    #[serde(default = "default_discount_rate")]
    pub discount_rate: Dimensionless,
    /// Economic lifetime of the V2G equipment (years)
    #[serde(default = "default_economic_lifetime")]
    pub economic_lifetime: Years,
    /// Distance driven since the battery was last full (km)
    #[serde(default = "default_distance_driven")]
    pub distance_driven: Distance,
    /// Minimum range the driver wants kept in reserve (km)
    #[serde(default = "default_range_buffer")]
    pub range_buffer: Distance,
    /// Fraction of the contracted time for which energy is actually dispatched
    #[serde(default = "default_ratio_dispatch_to_contract")]
    pub ratio_dispatch_to_contract: Dimensionless,
    /// Hours per day the vehicle is plugged in
    #[serde(default = "default_hours_connected_per_day")]
    pub hours_connected_per_day: Hours,
    /// Distance travelled per unit of energy (km/kWh)
    #[serde(default = "default_driving_efficiency")]
    pub driving_efficiency: DistancePerEnergy,
    /// Efficiency of the DC to AC inverter
    #[serde(default = "default_inverter_efficiency")]
    pub inverter_efficiency: Dimensionless,
}

impl Default for Scenario {
    fn default() -> Self {
        Self {
            battery_size: default_battery_size(),
            battery_unit_cost: default_battery_unit_cost(),
            connector_power: default_connector_power(),
            lifetime_cycles: default_lifetime_cycles(),
            depth_of_discharge: default_depth_of_discharge(),
            electricity_price: default_electricity_price(),
            purchased_energy_cost: default_purchased_energy_cost(),
            capacity_price: default_capacity_price(),
            round_trip_efficiency: default_round_trip_efficiency(),
            cost_of_v2g_equip: default_cost_of_v2g_equip(),
            discount_rate: default_discount_rate(),
            economic_lifetime: default_economic_lifetime(),
            distance_driven: default_distance_driven(),
            range_buffer: default_range_buffer(),
            ratio_dispatch_to_contract: default_ratio_dispatch_to_contract(),
            hours_connected_per_day: default_hours_connected_per_day(),
            driving_efficiency: default_driving_efficiency(),
            inverter_efficiency: default_inverter_efficiency(),
        }
    }
}

/// Check that a value is a finite number in `[0, 1]`
fn check_proportion(name: &str, value: Dimensionless) -> Result<()> {
    ensure!(
        value.is_finite() && (0.0..=1.0).contains(&value.value()),
        "{name} must be between 0 and 1"
    );

    Ok(())
}

/// Check that a value is a finite number in `(0, 1]`
fn check_proportion_nonzero(name: &str, value: Dimensionless) -> Result<()> {
    ensure!(
        value.is_finite() && value.value() > 0.0 && value.value() <= 1.0,
        "{name} must be greater than 0 and no more than 1"
    );

    Ok(())
}

/// Check that a value is a finite number greater than zero
fn check_positive(name: &str, value: f64) -> Result<()> {
    ensure!(
        value.is_finite() && value > 0.0,
        "{name} must be a finite number greater than zero"
    );

    Ok(())
}

/// Check that a value is a finite number no less than zero
fn check_non_negative(name: &str, value: f64) -> Result<()> {
    ensure!(
        value.is_finite() && value >= 0.0,
        "{name} must be a finite number no less than zero"
    );

    Ok(())
}

impl Scenario {
    /// Parse a scenario from a TOML document.
    ///
    /// Parameters which are not given take their default value. The scenario is validated.
    pub fn from_toml_str(toml_str: &str) -> Result<Scenario> {
        let scenario: Scenario =
            toml::from_str(toml_str).context("Could not parse scenario parameters")?;
        scenario.validate()?;

        Ok(scenario)
    }

    /// The per-day window over which stored energy is dispatched
    pub fn dispatch_window(&self) -> Hours {
        self.hours_connected_per_day * self.ratio_dispatch_to_contract
    }

    /// Energy available to the inverter once the depth of discharge limit is applied
    pub fn stored_energy(&self) -> Energy {
        self.battery_size * self.depth_of_discharge
    }

    /// Energy set aside for the daily drive plus the range buffer
    pub fn driving_energy(&self) -> Energy {
        (self.distance_driven + self.range_buffer) / self.driving_efficiency
    }

    /// Whether driving uses up all of the stored energy, leaving no power for the grid
    pub fn driving_needs_exhaust_battery(&self) -> bool {
        self.driving_energy() >= self.stored_energy()
    }

    /// Check that the parameters are within the domain of the model.
    ///
    /// The profit calculation does not require this: out of domain values give non-finite or
    /// meaningless results instead of errors.
    pub fn validate(&self) -> Result<()> {
        check_non_negative("battery_size", self.battery_size.value())?;
        check_non_negative("battery_unit_cost", self.battery_unit_cost.value())?;
        check_non_negative("connector_power", self.connector_power.value())?;
        check_positive("lifetime_cycles", self.lifetime_cycles.value())?;
        check_proportion("depth_of_discharge", self.depth_of_discharge)?;
        check_non_negative("electricity_price", self.electricity_price.value())?;
        check_non_negative("purchased_energy_cost", self.purchased_energy_cost.value())?;
        check_non_negative("capacity_price", self.capacity_price.value())?;
        check_proportion_nonzero("round_trip_efficiency", self.round_trip_efficiency)?;
        check_non_negative("cost_of_v2g_equip", self.cost_of_v2g_equip.value())?;
        check_positive("discount_rate", self.discount_rate.value())?;
        check_positive("economic_lifetime", self.economic_lifetime.value())?;
        check_non_negative("distance_driven", self.distance_driven.value())?;
        check_non_negative("range_buffer", self.range_buffer.value())?;
        check_proportion_nonzero("ratio_dispatch_to_contract", self.ratio_dispatch_to_contract)?;
        check_positive("hours_connected_per_day", self.hours_connected_per_day.value())?;
        ensure!(
            self.hours_connected_per_day <= Hours(24.0),
            "hours_connected_per_day cannot exceed 24"
        );
        check_positive("driving_efficiency", self.driving_efficiency.value())?;
        check_proportion_nonzero("inverter_efficiency", self.inverter_efficiency)?;

        // Valid, but the vehicle will never offer any power
        if self.driving_needs_exhaust_battery() {
            warn!(
                "Driving needs ({} kWh) use all of the stored energy ({} kWh): no power will be \
                available for V2G",
                self.driving_energy(),
                self.stored_energy()
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::assert_error;
    use rstest::rstest;

    #[test]
    fn test_default_is_valid() {
        assert!(Scenario::default().validate().is_ok());
    }

    #[test]
    fn test_from_toml_str_empty() {
        assert_eq!(Scenario::from_toml_str("").unwrap(), Scenario::default());
    }

    #[test]
    fn test_from_toml_str() {
        let toml = "battery_size = 40.0\nconnector_power = 7\nrange_buffer = 30.0\n";
        let scenario = Scenario::from_toml_str(toml).unwrap();
        assert_eq!(
            scenario,
            Scenario {
                battery_size: Energy(40.0),
                connector_power: Power(7.0),
                range_buffer: Distance(30.0),
                ..Scenario::default()
            }
        );
    }

    #[test]
    fn test_from_toml_str_unknown_key() {
        assert_error!(
            Scenario::from_toml_str("battery_colour = 1.0"),
            "Could not parse scenario parameters"
        );
    }

    #[test]
    fn test_from_toml_str_invalid() {
        assert_error!(
            Scenario::from_toml_str("depth_of_discharge = 1.5"),
            "depth_of_discharge must be between 0 and 1"
        );
    }

    #[test]
    fn test_toml_round_trip() {
        let scenario = Scenario {
            discount_rate: Dimensionless(0.035),
            ..Scenario::default()
        };
        let toml = toml::to_string(&scenario).unwrap();
        assert_eq!(Scenario::from_toml_str(&toml).unwrap(), scenario);
    }

    #[test]
    fn test_dispatch_window() {
        let scenario = Scenario {
            hours_connected_per_day: Hours(10.0),
            ratio_dispatch_to_contract: Dimensionless(0.5),
            ..Scenario::default()
        };
        assert_eq!(scenario.dispatch_window(), Hours(5.0));
    }

    #[rstest]
    #[case(
        Scenario { depth_of_discharge: Dimensionless(-0.1), ..Scenario::default() },
        "depth_of_discharge must be between 0 and 1"
    )]
    #[case(
        Scenario { depth_of_discharge: Dimensionless(f64::NAN), ..Scenario::default() },
        "depth_of_discharge must be between 0 and 1"
    )]
    #[case(
        Scenario { discount_rate: Dimensionless(0.0), ..Scenario::default() },
        "discount_rate must be a finite number greater than zero"
    )]
    #[case(
        Scenario { economic_lifetime: Years(0.0), ..Scenario::default() },
        "economic_lifetime must be a finite number greater than zero"
    )]
    #[case(
        Scenario { round_trip_efficiency: Dimensionless(0.0), ..Scenario::default() },
        "round_trip_efficiency must be greater than 0 and no more than 1"
    )]
    #[case(
        Scenario { ratio_dispatch_to_contract: Dimensionless(0.0), ..Scenario::default() },
        "ratio_dispatch_to_contract must be greater than 0 and no more than 1"
    )]
    #[case(
        Scenario { hours_connected_per_day: Hours(0.0), ..Scenario::default() },
        "hours_connected_per_day must be a finite number greater than zero"
    )]
    #[case(
        Scenario { hours_connected_per_day: Hours(25.0), ..Scenario::default() },
        "hours_connected_per_day cannot exceed 24"
    )]
    #[case(
        Scenario { battery_size: Energy(f64::INFINITY), ..Scenario::default() },
        "battery_size must be a finite number no less than zero"
    )]
    #[case(
        Scenario { range_buffer: Distance(-5.0), ..Scenario::default() },
        "range_buffer must be a finite number no less than zero"
    )]
    #[case(
        Scenario { driving_efficiency: DistancePerEnergy(0.0), ..Scenario::default() },
        "driving_efficiency must be a finite number greater than zero"
    )]
    #[case(
        Scenario { inverter_efficiency: Dimensionless(1.2), ..Scenario::default() },
        "inverter_efficiency must be greater than 0 and no more than 1"
    )]
    fn test_validate_invalid(#[case] scenario: Scenario, #[case] msg: &str) {
        assert_error!(scenario.validate(), msg);
    }

    #[rstest]
    #[case(Scenario::default(), false)]
    #[case(Scenario { distance_driven: Distance(300.0), ..Scenario::default() }, true)]
    #[case(
        Scenario {
            battery_size: Energy(50.0),
            depth_of_discharge: Dimensionless(1.0),
            distance_driven: Distance(150.0),
            range_buffer: Distance(50.0),
            driving_efficiency: DistancePerEnergy(4.0),
            ..Scenario::default()
        },
        true
    )]
    #[case(
        Scenario {
            battery_size: Energy(50.0),
            depth_of_discharge: Dimensionless(1.0),
            distance_driven: Distance(150.0),
            range_buffer: Distance(46.0),
            driving_efficiency: DistancePerEnergy(4.0),
            ..Scenario::default()
        },
        false
    )]
    fn test_driving_needs_exhaust_battery(#[case] scenario: Scenario, #[case] exhausted: bool) {
        assert_eq!(scenario.driving_needs_exhaust_battery(), exhausted);

        // Allowed either way, though a warning is logged when exhausted
        assert!(scenario.validate().is_ok());
    }

    #[test]
    fn test_driving_and_stored_energy() {
        let scenario = Scenario {
            distance_driven: Distance(120.0),
            range_buffer: Distance(40.0),
            driving_efficiency: DistancePerEnergy(4.0),
            ..Scenario::default()
        };
        assert_eq!(scenario.driving_energy(), Energy(40.0));
        assert_eq!(scenario.stored_energy(), Energy(56.0));
    }
}

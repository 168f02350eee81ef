//! Vectorised evaluation of the model over arrays of parameter values.
//!
//! Every input is an [`ArrayD<f64>`]. Arrays broadcast against each other when their shapes are
//! equal or when one of them is zero-dimensional (a scalar); any other combination is an error.
//! Each element of the output is the scalar model evaluated with the corresponding element of
//! every input.
use crate::cost::cost_of_vehicle_to_grid;
use crate::finance::annualized_capital_cost;
use crate::power::max_vehicle_power;
use crate::scenario::{SCENARIO_PARAMETER_NAMES, Scenario};
use crate::units::{
    Dimensionless, Distance, DistancePerEnergy, Energy, Hours, Money, MoneyPerEnergy, Power, Years,
};
use crate::{battery::battery_lifetime, profit::ProfitResult};
use anyhow::{Context, Result, bail, ensure};
use log::{debug, warn};
use ndarray::{ArrayD, ArrayView2, ArrayViewD, Dimension, IxDyn, arr0};

/// A named array input
pub type NamedInput<'a> = (&'a str, &'a ArrayD<f64>);

/// Work out the shape that a set of inputs broadcasts to.
///
/// Zero-dimensional inputs broadcast to any shape. All other inputs must have the same shape.
/// If every input is zero-dimensional then so is the result.
pub fn broadcast_shape(inputs: &[NamedInput]) -> Result<IxDyn> {
    let mut shape: Option<(&str, &[usize])> = None;
    for &(name, array) in inputs {
        if array.ndim() == 0 {
            continue;
        }

        match shape {
            None => shape = Some((name, array.shape())),
            Some((first_name, first_shape)) => ensure!(
                array.shape() == first_shape,
                "Shape of {name} ({:?}) does not match shape of {first_name} ({:?})",
                array.shape(),
                first_shape
            ),
        }
    }

    Ok(shape.map_or(IxDyn(&[]), |(_, shape)| IxDyn(shape)))
}

/// Apply `f` element-wise over the broadcast inputs
fn broadcast_map<T, const N: usize, F>(inputs: [NamedInput; N], f: F) -> Result<ArrayD<T>>
where
    F: Fn([f64; N]) -> T,
{
    let shape = broadcast_shape(&inputs)?;
    let views = inputs
        .iter()
        .map(|&(name, array)| {
            array
                .broadcast(shape.clone())
                .with_context(|| format!("Could not broadcast {name}"))
        })
        .collect::<Result<Vec<ArrayViewD<f64>>>>()?;

    Ok(ArrayD::from_shape_fn(shape, |index| {
        f(std::array::from_fn(|i| views[i][index.slice()]))
    }))
}

/// Array form of [`max_vehicle_power`]
pub fn max_vehicle_power_array(
    connector_power: &ArrayD<f64>,
    stored_energy: &ArrayD<f64>,
    distance_driven: &ArrayD<f64>,
    range_buffer: &ArrayD<f64>,
    dispatch_time: &ArrayD<f64>,
    driving_efficiency: &ArrayD<f64>,
    inverter_efficiency: &ArrayD<f64>,
) -> Result<ArrayD<f64>> {
    broadcast_map(
        [
            ("connector_power", connector_power),
            ("stored_energy", stored_energy),
            ("distance_driven", distance_driven),
            ("range_buffer", range_buffer),
            ("dispatch_time", dispatch_time),
            ("driving_efficiency", driving_efficiency),
            ("inverter_efficiency", inverter_efficiency),
        ],
        |[cp, se, dd, rb, dt, de, ie]| {
            max_vehicle_power(
                Power(cp),
                Energy(se),
                Distance(dd),
                Distance(rb),
                Hours(dt),
                DistancePerEnergy(de),
                Dimensionless(ie),
            )
            .value()
        },
    )
}

/// Array form of [`battery_lifetime`]
pub fn battery_lifetime_array(
    lifetime_cycles: &ArrayD<f64>,
    total_energy_stored: &ArrayD<f64>,
    depth_of_discharge: &ArrayD<f64>,
) -> Result<ArrayD<f64>> {
    broadcast_map(
        [
            ("lifetime_cycles", lifetime_cycles),
            ("total_energy_stored", total_energy_stored),
            ("depth_of_discharge", depth_of_discharge),
        ],
        |[cycles, energy, dod]| {
            battery_lifetime(Dimensionless(cycles), Energy(energy), Dimensionless(dod)).value()
        },
    )
}

/// Array form of [`annualized_capital_cost`]
pub fn annualized_capital_cost_array(
    cost: &ArrayD<f64>,
    discount_rate: &ArrayD<f64>,
    lifetime: &ArrayD<f64>,
) -> Result<ArrayD<f64>> {
    broadcast_map(
        [
            ("cost", cost),
            ("discount_rate", discount_rate),
            ("lifetime", lifetime),
        ],
        |[cost, rate, lifetime]| {
            annualized_capital_cost(Money(cost), Dimensionless(rate), Years(lifetime)).value()
        },
    )
}

/// Array form of [`cost_of_vehicle_to_grid`]
pub fn cost_of_vehicle_to_grid_array(
    battery_capital_cost: &ArrayD<f64>,
    lifetime_cycles: &ArrayD<f64>,
    total_energy_stored: &ArrayD<f64>,
    depth_of_discharge: &ArrayD<f64>,
    purchased_energy_cost: &ArrayD<f64>,
    round_trip_efficiency: &ArrayD<f64>,
    energy_dispatched: &ArrayD<f64>,
    cost_of_v2g_equip: &ArrayD<f64>,
    discount_rate: &ArrayD<f64>,
    economic_lifetime: &ArrayD<f64>,
) -> Result<ArrayD<f64>> {
    broadcast_map(
        [
            ("battery_capital_cost", battery_capital_cost),
            ("lifetime_cycles", lifetime_cycles),
            ("total_energy_stored", total_energy_stored),
            ("depth_of_discharge", depth_of_discharge),
            ("purchased_energy_cost", purchased_energy_cost),
            ("round_trip_efficiency", round_trip_efficiency),
            ("energy_dispatched", energy_dispatched),
            ("cost_of_v2g_equip", cost_of_v2g_equip),
            ("discount_rate", discount_rate),
            ("economic_lifetime", economic_lifetime),
        ],
        |[bcc, cycles, energy, dod, pec, rte, dispatched, equip, rate, lifetime]| {
            cost_of_vehicle_to_grid(
                Money(bcc),
                Dimensionless(cycles),
                Energy(energy),
                Dimensionless(dod),
                MoneyPerEnergy(pec),
                Dimensionless(rte),
                Energy(dispatched),
                Money(equip),
                Dimensionless(rate),
                Years(lifetime),
            )
            .value()
        },
    )
}

/// Build a scenario from values ordered as in [`SCENARIO_PARAMETER_NAMES`]
fn scenario_from_values(values: [f64; 18]) -> Scenario {
    let [
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
        driving_efficiency,
        inverter_efficiency,
    ] = values;

    Scenario {
        battery_size: Energy(battery_size),
        battery_unit_cost: MoneyPerEnergy(battery_unit_cost),
        connector_power: Power(connector_power),
        lifetime_cycles: Dimensionless(lifetime_cycles),
        depth_of_discharge: Dimensionless(depth_of_discharge),
        electricity_price: MoneyPerEnergy(electricity_price),
        purchased_energy_cost: MoneyPerEnergy(purchased_energy_cost),
        capacity_price: MoneyPerEnergy(capacity_price),
        round_trip_efficiency: Dimensionless(round_trip_efficiency),
        cost_of_v2g_equip: Money(cost_of_v2g_equip),
        discount_rate: Dimensionless(discount_rate),
        economic_lifetime: Years(economic_lifetime),
        distance_driven: Distance(distance_driven),
        range_buffer: Distance(range_buffer),
        ratio_dispatch_to_contract: Dimensionless(ratio_dispatch_to_contract),
        hours_connected_per_day: Hours(hours_connected_per_day),
        driving_efficiency: DistancePerEnergy(driving_efficiency),
        inverter_efficiency: Dimensionless(inverter_efficiency),
    }
}

/// Scenario parameters where each parameter may be an array of values
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioBatch {
    /// Values for each parameter, ordered as in [`SCENARIO_PARAMETER_NAMES`]
    values: [ArrayD<f64>; 18],
}

impl Default for ScenarioBatch {
    fn default() -> Self {
        Self::from_scenario(&Scenario::default())
    }
}

impl ScenarioBatch {
    /// A batch holding the single scenario given, with every parameter zero-dimensional
    pub fn from_scenario(scenario: &Scenario) -> Self {
        let s = scenario;
        let values = [
            s.battery_size.value(),
            s.battery_unit_cost.value(),
            s.connector_power.value(),
            s.lifetime_cycles.value(),
            s.depth_of_discharge.value(),
            s.electricity_price.value(),
            s.purchased_energy_cost.value(),
            s.capacity_price.value(),
            s.round_trip_efficiency.value(),
            s.cost_of_v2g_equip.value(),
            s.discount_rate.value(),
            s.economic_lifetime.value(),
            s.distance_driven.value(),
            s.range_buffer.value(),
            s.ratio_dispatch_to_contract.value(),
            s.hours_connected_per_day.value(),
            s.driving_efficiency.value(),
            s.inverter_efficiency.value(),
        ];

        Self {
            values: values.map(|value| arr0(value).into_dyn()),
        }
    }

    /// Build a batch from a sample matrix, as produced by a sensitivity-analysis sampler.
    ///
    /// Each row of `samples` is one scenario. Each column holds the values of the parameter of the
    /// same position in `names`. Parameters which are not named keep their default value.
    pub fn from_samples(names: &[&str], samples: ArrayView2<f64>) -> Result<Self> {
        ensure!(
            names.len() == samples.ncols(),
            "Got {} parameter names for a sample matrix with {} columns",
            names.len(),
            samples.ncols()
        );

        let mut batch = Self::default();
        for (name, column) in names.iter().zip(samples.columns()) {
            batch.set(name, column.to_owned().into_dyn())?;
        }

        Ok(batch)
    }

    /// Set the values of the named parameter
    pub fn set(&mut self, name: &str, values: ArrayD<f64>) -> Result<()> {
        let Some(index) = SCENARIO_PARAMETER_NAMES.iter().position(|&n| n == name) else {
            bail!("Unknown scenario parameter: {name}");
        };
        self.values[index] = values;

        Ok(())
    }

    /// Set the values of the named parameter, consuming and returning the batch
    pub fn with(mut self, name: &str, values: ArrayD<f64>) -> Result<Self> {
        self.set(name, values)?;
        Ok(self)
    }

    /// Get the values of the named parameter
    pub fn get(&self, name: &str) -> Option<&ArrayD<f64>> {
        SCENARIO_PARAMETER_NAMES
            .iter()
            .position(|&n| n == name)
            .map(|index| &self.values[index])
    }

    /// The shape all parameters broadcast to
    pub fn shape(&self) -> Result<IxDyn> {
        broadcast_shape(&self.named_inputs())
    }

    fn named_inputs(&self) -> [NamedInput<'_>; 18] {
        std::array::from_fn(|i| (SCENARIO_PARAMETER_NAMES[i], &self.values[i]))
    }

    /// Compute the profit, revenue and cost of every scenario in the batch
    pub fn evaluate(&self) -> Result<ProfitBatch> {
        let results = broadcast_map(self.named_inputs(), |values| {
            scenario_from_values(values).evaluate()
        })?;
        debug!("Evaluated batch of scenarios with shape {:?}", results.shape());

        let batch = ProfitBatch {
            profit: results.map(|result| result.profit.value()),
            revenue: results.map(|result| result.revenue.value()),
            cost: results.map(|result| result.cost.value()),
        };

        let non_finite = batch.non_finite_count();
        if non_finite > 0 {
            warn!(
                "{non_finite} of {} scenarios gave a non-finite result",
                batch.profit.len()
            );
        }

        Ok(batch)
    }

    /// Evaluate a single element of the batch
    pub fn evaluate_at(&self, index: &[usize]) -> Result<ProfitResult> {
        let shape = self.shape()?;
        ensure!(
            index.len() == shape.ndim()
                && index.iter().zip(shape.slice()).all(|(&i, &len)| i < len),
            "Index {index:?} is out of bounds for batch of shape {:?}",
            shape.slice()
        );

        let values = self.values.each_ref().map(|array| {
            let element: &[usize] = if array.ndim() == 0 { &[] } else { index };
            array[element]
        });

        Ok(scenario_from_values(values).evaluate())
    }
}

/// Profit, revenue and cost for a batch of scenarios
#[derive(Debug, Clone, PartialEq)]
pub struct ProfitBatch {
    /// Revenue minus cost
    pub profit: ArrayD<f64>,
    /// Capacity and energy payments
    pub revenue: ArrayD<f64>,
    /// Total cost of operation
    pub cost: ArrayD<f64>,
}

impl ProfitBatch {
    /// Number of scenarios for which any of profit, revenue or cost is infinite or NaN
    pub fn non_finite_count(&self) -> usize {
        self.profit
            .iter()
            .zip(&self.revenue)
            .zip(&self.cost)
            .filter(|&((p, r), c)| !(p.is_finite() && r.is_finite() && c.is_finite()))
            .count()
    }
}

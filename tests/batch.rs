//! Integration tests for evaluating batches of scenarios.
use float_cmp::assert_approx_eq;
use ndarray::{Array1, Array2, ArrayD, arr1};
use v2g::batch::ScenarioBatch;
use v2g::scenario::{SCENARIO_PARAMETER_NAMES, Scenario};

/// Values of every parameter of the default scenario, ordered as in `SCENARIO_PARAMETER_NAMES`
fn default_row() -> Vec<f64> {
    let batch = ScenarioBatch::default();
    SCENARIO_PARAMETER_NAMES
        .iter()
        .map(|name| *batch.get(name).unwrap().first().unwrap())
        .collect()
}

/// N identical scenarios give N copies of the scalar result
#[test]
fn test_identical_rows_match_scalar() {
    const N: usize = 1000;
    let row = default_row();
    let samples = Array2::from_shape_fn((N, row.len()), |(_, j)| row[j]);

    let batch = ScenarioBatch::from_samples(&SCENARIO_PARAMETER_NAMES, samples.view()).unwrap();
    let results = batch.evaluate().unwrap();
    let expected = Scenario::default().evaluate();

    assert_eq!(results.profit.shape(), &[N]);
    for ((&profit, &revenue), &cost) in results
        .profit
        .iter()
        .zip(&results.revenue)
        .zip(&results.cost)
    {
        assert_approx_eq!(f64, profit, expected.profit.value(), ulps = 0);
        assert_approx_eq!(f64, revenue, expected.revenue.value(), ulps = 0);
        assert_approx_eq!(f64, cost, expected.cost.value(), ulps = 0);
    }
    assert_eq!(results.non_finite_count(), 0);
}

/// Array parameters of two dimensions broadcast against scalars
#[test]
fn test_two_dimensional_batch() {
    let prices = Array2::from_shape_vec((3, 4), (0..12u32).map(|n| 0.05 * f64::from(n)).collect())
        .unwrap()
        .into_dyn();
    let batch = ScenarioBatch::default()
        .with("electricity_price", prices.clone())
        .unwrap();
    let results = batch.evaluate().unwrap();

    assert_eq!(results.revenue.shape(), &[3, 4]);
    for (&price, &revenue) in prices.iter().zip(&results.revenue) {
        let scenario = Scenario {
            electricity_price: v2g::units::MoneyPerEnergy(price),
            ..Scenario::default()
        };
        assert_approx_eq!(f64, revenue, scenario.evaluate().revenue.value(), ulps = 0);
    }
}

/// Revenue never falls as the electricity price rises
#[test]
fn test_revenue_monotonic_in_electricity_price() {
    let prices: ArrayD<f64> = Array1::linspace(0.0, 1.0, 101).into_dyn();
    let results = ScenarioBatch::default()
        .with("electricity_price", prices)
        .unwrap()
        .evaluate()
        .unwrap();

    let revenue = results.revenue.as_slice().unwrap();
    assert!(revenue.windows(2).all(|w| w[0] <= w[1]));
}

/// Cost never falls as the battery unit cost rises
#[test]
fn test_cost_monotonic_in_battery_unit_cost() {
    let unit_costs = arr1(&[0.0, 50.0, 100.0, 350.0, 700.0, 1500.0]).into_dyn();
    let results = ScenarioBatch::default()
        .with("battery_unit_cost", unit_costs)
        .unwrap()
        .evaluate()
        .unwrap();

    let cost = results.cost.as_slice().unwrap();
    assert!(cost.windows(2).all(|w| w[0] <= w[1]));
}

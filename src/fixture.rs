//! Fixtures for tests

use crate::scenario::Scenario;
use crate::units::{Distance, Hours};
use rstest::fixture;

/// Assert that an error with the given message occurs
macro_rules! assert_error {
    ($result:expr, $msg:expr) => {
        assert_eq!(
            $result.unwrap_err().chain().next().unwrap().to_string(),
            $msg
        );
    };
}
pub(crate) use assert_error;

#[fixture]
pub fn scenario() -> Scenario {
    Scenario::default()
}

/// A commuter who needs to keep some charge for the drive home
#[fixture]
pub fn commuter_scenario() -> Scenario {
    Scenario {
        distance_driven: Distance(100.0),
        range_buffer: Distance(50.0),
        hours_connected_per_day: Hours(18.0),
        ..Scenario::default()
    }
}

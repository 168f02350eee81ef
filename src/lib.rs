//! A techno-economic model of the profit from using an electric vehicle's battery for grid
//! regulation services (Vehicle-to-Grid), after Kempton et al. (2005).
//!
//! Every calculation is a pure function of its inputs. Scalar calculations use the typed
//! quantities in [`units`]; [`batch`] evaluates the same formulas over arrays for sensitivity
//! analysis.
#![warn(missing_docs)]
pub mod batch;
pub mod battery;
pub mod cost;
pub mod finance;
pub mod log;
pub mod power;
pub mod profit;
pub mod scenario;
pub mod units;

#[cfg(test)]
mod fixture;

//! This module defines the unit types used by the model and the arithmetic allowed between them.
//!
//! Every quantity is a thin wrapper around an `f64`. Multiplying or dividing two quantities is only
//! possible where the result has a physical meaning, so e.g. a [`Power`] multiplied by some
//! [`Hours`] gives an [`Energy`], but a [`Power`] cannot be added to an [`Energy`].
use float_cmp::{ApproxEq, F64Margin};
use serde::{Deserialize, Serialize};

/// Represents a dimensionless quantity (ratios, efficiencies, rates and counts).
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    PartialOrd,
    Serialize,
    Deserialize,
    derive_more::Add,
    derive_more::Sub,
    derive_more::Display,
)]
#[serde(transparent)]
pub struct Dimensionless(pub f64);

impl std::ops::Mul for Dimensionless {
    type Output = Dimensionless;

    fn mul(self, rhs: Dimensionless) -> Self::Output {
        Dimensionless(self.0 * rhs.0)
    }
}

impl std::ops::Div for Dimensionless {
    type Output = Dimensionless;

    fn div(self, rhs: Dimensionless) -> Self::Output {
        Dimensionless(self.0 / rhs.0)
    }
}

impl Dimensionless {
    /// Create a new dimensionless quantity
    pub fn new(value: f64) -> Self {
        Self(value)
    }

    /// The underlying value
    pub fn value(self) -> f64 {
        self.0
    }

    /// Whether the value is neither infinite nor NaN
    pub fn is_finite(self) -> bool {
        self.0.is_finite()
    }

    /// Raise to a real-valued power
    pub fn powf(self, rhs: f64) -> Self {
        Dimensionless(self.0.powf(rhs))
    }
}

impl From<f64> for Dimensionless {
    fn from(val: f64) -> Self {
        Self(val)
    }
}

impl From<Dimensionless> for f64 {
    fn from(val: Dimensionless) -> Self {
        val.0
    }
}

impl ApproxEq for Dimensionless {
    type Margin = F64Margin;

    fn approx_eq<M: Into<Self::Margin>>(self, other: Self, margin: M) -> bool {
        self.0.approx_eq(other.0, margin)
    }
}

macro_rules! unit_struct {
    ($name:ident, $doc:literal) => {
        #[doc = $doc]
        #[derive(
            Debug,
            Default,
            Clone,
            Copy,
            PartialEq,
            PartialOrd,
            Serialize,
            Deserialize,
            derive_more::Add,
            derive_more::Sub,
            derive_more::Display,
        )]
        #[serde(transparent)]
        pub struct $name(pub f64);

        impl $name {
            /// Creates a new instance of the unit type from a f64 value.
            pub fn new(value: f64) -> Self {
                Self(value)
            }

            /// Returns the value of the unit type as a f64.
            pub fn value(self) -> f64 {
                self.0
            }

            /// Whether the value is neither infinite nor NaN
            pub fn is_finite(self) -> bool {
                self.0.is_finite()
            }
        }

        impl std::ops::Mul<Dimensionless> for $name {
            type Output = $name;
            fn mul(self, rhs: Dimensionless) -> $name {
                $name(self.0 * rhs.0)
            }
        }

        impl std::ops::Mul<$name> for Dimensionless {
            type Output = $name;
            fn mul(self, rhs: $name) -> $name {
                $name(self.0 * rhs.0)
            }
        }

        impl std::ops::Div<Dimensionless> for $name {
            type Output = $name;
            fn div(self, rhs: Dimensionless) -> $name {
                $name(self.0 / rhs.0)
            }
        }

        impl std::ops::Div for $name {
            type Output = Dimensionless;
            fn div(self, rhs: $name) -> Dimensionless {
                Dimensionless(self.0 / rhs.0)
            }
        }

        impl ApproxEq for $name {
            type Margin = F64Margin;

            fn approx_eq<M: Into<Self::Margin>>(self, other: Self, margin: M) -> bool {
                self.0.approx_eq(other.0, margin)
            }
        }
    };
}

macro_rules! impl_mul {
    ($Lhs:ty, $Rhs:ty, $Out:ty) => {
        impl std::ops::Mul<$Rhs> for $Lhs {
            type Output = $Out;
            fn mul(self, rhs: $Rhs) -> $Out {
                <$Out>::new(self.0 * rhs.0)
            }
        }
        impl std::ops::Mul<$Lhs> for $Rhs {
            type Output = $Out;
            fn mul(self, lhs: $Lhs) -> $Out {
                <$Out>::new(self.0 * lhs.0)
            }
        }
    };
}

macro_rules! impl_div {
    ($Lhs:ty, $Rhs:ty, $Out:ty) => {
        impl std::ops::Div<$Rhs> for $Lhs {
            type Output = $Out;
            fn div(self, rhs: $Rhs) -> $Out {
                <$Out>::new(self.0 / rhs.0)
            }
        }
    };
}

// Base quantities
unit_struct!(Money, "An amount of money (£).");
unit_struct!(Energy, "An amount of energy (kWh).");
unit_struct!(Power, "A rate of energy transfer (kW).");
unit_struct!(Hours, "A duration in hours.");
unit_struct!(Years, "A duration in years.");
unit_struct!(Distance, "A driving distance (km).");

// Derived quantities
unit_struct!(MoneyPerEnergy, "A price per unit of energy (£/kWh).");
unit_struct!(DistancePerEnergy, "A driving efficiency (km/kWh).");
unit_struct!(MoneyPerHour, "A payment rate over time (£/h).");

// Division rules
impl_div!(Money, Energy, MoneyPerEnergy);
impl_div!(Energy, Hours, Power);
impl_div!(Distance, DistancePerEnergy, Energy);

// Multiplication rules
impl_mul!(Power, Hours, Energy);
impl_mul!(MoneyPerEnergy, Energy, Money);
impl_mul!(MoneyPerEnergy, Power, MoneyPerHour);
impl_mul!(MoneyPerHour, Hours, Money);

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::assert_approx_eq;

    #[test]
    fn test_power_times_hours() {
        assert_eq!(Power(14.0) * Hours(2.0), Energy(28.0));
        assert_eq!(Hours(2.0) * Power(14.0), Energy(28.0));
    }

    #[test]
    fn test_energy_per_hours() {
        assert_eq!(Energy(28.0) / Hours(2.0), Power(14.0));
    }

    #[test]
    fn test_distance_per_efficiency() {
        assert_approx_eq!(
            Energy,
            Distance(80.5) / DistancePerEnergy(4.025),
            Energy(20.0)
        );
    }

    #[test]
    fn test_price_rules() {
        assert_eq!(Money(100.0) / Energy(50.0), MoneyPerEnergy(2.0));
        assert_eq!(MoneyPerEnergy(2.0) * Energy(50.0), Money(100.0));
        assert_eq!(Money(100.0) / Money(50.0), Dimensionless(2.0));
    }

    #[test]
    fn test_capacity_payment_rules() {
        assert_eq!(MoneyPerEnergy(0.5) * Power(4.0), MoneyPerHour(2.0));
        assert_eq!(Power(4.0) * MoneyPerEnergy(0.5), MoneyPerHour(2.0));
        assert_eq!(MoneyPerHour(2.0) * Hours(3.0), Money(6.0));
        assert_eq!(Hours(3.0) * MoneyPerHour(2.0), Money(6.0));
    }

    #[test]
    fn test_dimensionless_scaling() {
        assert_eq!(Money(10.0) * Dimensionless(0.5), Money(5.0));
        assert_eq!(Dimensionless(0.5) * Money(10.0), Money(5.0));
        assert_eq!(Money(10.0) / Dimensionless(0.5), Money(20.0));
        assert_eq!(Dimensionless(2.0).powf(-1.0), Dimensionless(0.5));
    }

    #[test]
    fn test_non_finite() {
        assert!(!(Money(1.0) / Dimensionless(0.0)).is_finite());
        assert!(!(Money(0.0) / Dimensionless(0.0)).is_finite());
        assert!(Money(1.0).is_finite());
    }
}

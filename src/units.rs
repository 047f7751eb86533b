//! Length units and conversion through a canonical meters base.

use std::fmt;

/// Display/compare unit for a measurement or rule
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Unit {
    #[default]
    Meters,
    Feet,
    Inches,
    Centimeters,
}

impl Unit {
    pub const ALL: [Unit; 4] = [Unit::Meters, Unit::Feet, Unit::Inches, Unit::Centimeters];

    /// How many meters one of this unit spans
    pub const fn meters_per_unit(self) -> f64 {
        match self {
            Unit::Meters => 1.0,
            Unit::Feet => 0.3048,
            Unit::Inches => 0.0254,
            Unit::Centimeters => 0.01,
        }
    }

    /// Short suffix used in labels
    pub const fn suffix(self) -> &'static str {
        match self {
            Unit::Meters => "m",
            Unit::Feet => "ft",
            Unit::Inches => "in",
            Unit::Centimeters => "cm",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Unit::Meters => "meters",
            Unit::Feet => "feet",
            Unit::Inches => "inches",
            Unit::Centimeters => "centimeters",
        };
        f.write_str(name)
    }
}

/// What a measured value physically is, which decides how units scale it
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Dimension {
    /// Linear: scales with the unit factor
    Length,
    /// Square units: scales with the factor squared
    Area,
    /// Degrees, unaffected by length units
    Angle,
}

impl Dimension {
    /// Exponent applied to a linear factor
    pub const fn power(self) -> i32 {
        match self {
            Dimension::Length => 1,
            Dimension::Area => 2,
            Dimension::Angle => 0,
        }
    }
}

/// Convert `value` expressed in `from` into `to`.
///
/// Same-unit conversions return the input untouched so frozen values stay bit-exact.
pub fn convert(value: f64, from: Unit, to: Unit, dim: Dimension) -> f64 {
    if from == to || dim == Dimension::Angle {
        return value;
    }
    let factor = from.meters_per_unit() / to.meters_per_unit();
    value * factor.powi(dim.power())
}

/// Convert a value in meters (or square meters) into `to`.
pub fn from_meters(value: f64, to: Unit, dim: Dimension) -> f64 {
    convert(value, Unit::Meters, to, dim)
}

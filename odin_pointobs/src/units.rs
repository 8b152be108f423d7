/*
 * Copyright © 2024, United States Government, as represented by the Administrator of
 * the National Aeronautics and Space Administration. All rights reserved.
 *
 * The “ODIN” software is licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License. You may obtain a copy
 * of the License at http://www.apache.org/licenses/LICENSE-2.0.
 *
 * Unless required by applicable law or agreed to in writing, software distributed under
 * the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND,
 * either express or implied. See the License for the specific language governing permissions
 * and limitations under the License.
 */

//! runtime unit tags for observation fields and grids.
//! Observation schemas are only known at runtime, hence we can't use [uom](https://docs.rs/uom/latest/uom/) quantity
//! types directly in the data model. We still use uom for all conversion factors so that we don't have to maintain
//! our own constant tables. Each unit is mapped to the SI base unit of its dimension and back.

use std::fmt;
use serde::ser::{Serialize, Serializer};
use serde::de::{Deserialize, Deserializer};

use uom::si::f64::{Length, Pressure, Ratio, ThermodynamicTemperature, Velocity};
use uom::si::length::{foot, kilometer, meter};
use uom::si::pressure::{hectopascal, millibar, pascal};
use uom::si::ratio::{percent, ratio};
use uom::si::thermodynamic_temperature::{degree_celsius, degree_fahrenheit, kelvin};
use uom::si::velocity::{kilometer_per_hour, knot, meter_per_second, mile_per_hour};

use crate::errors::{Result, schema_error};

/// physical dimension of a unit. Only units of the same dimension are convertible.
/// Geopotential meters are kept separate from lengths since the conversion is only valid under
/// a constant gravity assumption (see the first guess handling of [`crate::barnes`])
#[derive(Debug,Clone,Copy,PartialEq,Eq,Hash)]
pub enum Dimension {
    Temperature,
    Length,
    Geopotential,
    Pressure,
    Velocity,
    Ratio,
    Unknown
}

#[derive(Debug,Clone,PartialEq,Eq,Hash)]
pub enum Unit {
    Kelvin,
    Celsius,
    Fahrenheit,
    Meter,
    Kilometer,
    Foot,
    GeopotentialMeter,
    Pascal,
    Hectopascal,
    Millibar,
    MeterPerSecond,
    Knot,
    MilePerHour,
    KilometerPerHour,
    Percent,
    Dimensionless,
    /// anything we don't know how to convert. Only convertible to itself
    Other(String)
}

impl Unit {
    /// map a unit symbol or name to a Unit. This never fails - unknown symbols become `Unit::Other`
    pub fn parse (s: &str)->Unit {
        match s.trim() {
            "K" | "kelvin" | "Kelvin" => Unit::Kelvin,
            "C" | "degC" | "°C" | "celsius" | "Celsius" => Unit::Celsius,
            "F" | "degF" | "°F" | "fahrenheit" | "Fahrenheit" => Unit::Fahrenheit,
            "m" | "meter" | "meters" | "metre" => Unit::Meter,
            "km" | "kilometer" | "kilometers" => Unit::Kilometer,
            "ft" | "foot" | "feet" => Unit::Foot,
            "gpm" | "gp m" | "geopotential meter" | "geopotential meters" => Unit::GeopotentialMeter,
            "Pa" | "pascal" => Unit::Pascal,
            "hPa" | "hectopascal" => Unit::Hectopascal,
            "mb" | "mbar" | "millibar" => Unit::Millibar,
            "m/s" | "m s-1" | "mps" => Unit::MeterPerSecond,
            "kt" | "kts" | "knot" | "knots" => Unit::Knot,
            "mph" | "mi/h" => Unit::MilePerHour,
            "km/h" | "kph" => Unit::KilometerPerHour,
            "%" | "percent" => Unit::Percent,
            "" | "1" | "none" => Unit::Dimensionless,
            other => Unit::Other(other.to_string())
        }
    }

    pub fn symbol (&self)->&str {
        match self {
            Unit::Kelvin => "K",
            Unit::Celsius => "degC",
            Unit::Fahrenheit => "degF",
            Unit::Meter => "m",
            Unit::Kilometer => "km",
            Unit::Foot => "ft",
            Unit::GeopotentialMeter => "gpm",
            Unit::Pascal => "Pa",
            Unit::Hectopascal => "hPa",
            Unit::Millibar => "mb",
            Unit::MeterPerSecond => "m/s",
            Unit::Knot => "kt",
            Unit::MilePerHour => "mph",
            Unit::KilometerPerHour => "km/h",
            Unit::Percent => "%",
            Unit::Dimensionless => "1",
            Unit::Other(s) => s.as_str()
        }
    }

    pub fn dimension (&self)->Dimension {
        match self {
            Unit::Kelvin | Unit::Celsius | Unit::Fahrenheit => Dimension::Temperature,
            Unit::Meter | Unit::Kilometer | Unit::Foot => Dimension::Length,
            Unit::GeopotentialMeter => Dimension::Geopotential,
            Unit::Pascal | Unit::Hectopascal | Unit::Millibar => Dimension::Pressure,
            Unit::MeterPerSecond | Unit::Knot | Unit::MilePerHour | Unit::KilometerPerHour => Dimension::Velocity,
            Unit::Percent | Unit::Dimensionless => Dimension::Ratio,
            Unit::Other(_) => Dimension::Unknown
        }
    }

    pub fn is_convertible_to (&self, other: &Unit)->bool {
        if self == other {
            true
        } else {
            let dim = self.dimension();
            dim != Dimension::Unknown && dim == other.dimension()
        }
    }

    /// convert a value given in `self` units into `to` units
    pub fn convert (&self, value: f64, to: &Unit)->Result<f64> {
        if self == to {
            Ok(value)
        } else if self.is_convertible_to(to) {
            Ok( to.from_base( self.to_base(value)))
        } else {
            Err( schema_error( format!("unit {} not convertible to {}", self, to)))
        }
    }

    /// convert a slice of values. NaNs stay NaNs
    pub fn convert_all (&self, values: &[f64], to: &Unit)->Result<Vec<f64>> {
        if self == to {
            Ok( values.to_vec())
        } else if self.is_convertible_to(to) {
            Ok( values.iter().map( |v| to.from_base( self.to_base(*v))).collect())
        } else {
            Err( schema_error( format!("unit {} not convertible to {}", self, to)))
        }
    }

    fn to_base (&self, v: f64)->f64 {
        match self {
            Unit::Celsius => ThermodynamicTemperature::new::<degree_celsius>(v).get::<kelvin>(),
            Unit::Fahrenheit => ThermodynamicTemperature::new::<degree_fahrenheit>(v).get::<kelvin>(),
            Unit::Kilometer => Length::new::<kilometer>(v).get::<meter>(),
            Unit::Foot => Length::new::<foot>(v).get::<meter>(),
            Unit::Hectopascal => Pressure::new::<hectopascal>(v).get::<pascal>(),
            Unit::Millibar => Pressure::new::<millibar>(v).get::<pascal>(),
            Unit::Knot => Velocity::new::<knot>(v).get::<meter_per_second>(),
            Unit::MilePerHour => Velocity::new::<mile_per_hour>(v).get::<meter_per_second>(),
            Unit::KilometerPerHour => Velocity::new::<kilometer_per_hour>(v).get::<meter_per_second>(),
            Unit::Percent => Ratio::new::<percent>(v).get::<ratio>(),
            _ => v // base units
        }
    }

    fn from_base (&self, v: f64)->f64 {
        match self {
            Unit::Celsius => ThermodynamicTemperature::new::<kelvin>(v).get::<degree_celsius>(),
            Unit::Fahrenheit => ThermodynamicTemperature::new::<kelvin>(v).get::<degree_fahrenheit>(),
            Unit::Kilometer => Length::new::<meter>(v).get::<kilometer>(),
            Unit::Foot => Length::new::<meter>(v).get::<foot>(),
            Unit::Hectopascal => Pressure::new::<pascal>(v).get::<hectopascal>(),
            Unit::Millibar => Pressure::new::<pascal>(v).get::<millibar>(),
            Unit::Knot => Velocity::new::<meter_per_second>(v).get::<knot>(),
            Unit::MilePerHour => Velocity::new::<meter_per_second>(v).get::<mile_per_hour>(),
            Unit::KilometerPerHour => Velocity::new::<meter_per_second>(v).get::<kilometer_per_hour>(),
            Unit::Percent => Ratio::new::<ratio>(v).get::<percent>(),
            _ => v
        }
    }
}

impl Default for Unit {
    fn default()->Self { Unit::Dimensionless }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

// units are (de)serialized as their symbols so that RON configs and JSON output stay readable
impl Serialize for Unit {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> where S: Serializer {
        serializer.serialize_str( self.symbol())
    }
}

impl<'de> Deserialize<'de> for Unit {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error> where D: Deserializer<'de> {
        let s = String::deserialize(deserializer)?;
        Ok( Unit::parse(&s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_parse () {
        for u in [Unit::Kelvin, Unit::Celsius, Unit::Foot, Unit::GeopotentialMeter, Unit::Millibar, Unit::Knot, Unit::Percent] {
            assert_eq!( Unit::parse( u.symbol()), u);
        }
        assert_eq!( Unit::parse("furlongs"), Unit::Other("furlongs".to_string()));
    }
}

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

use std::fmt;
use serde::{Serialize,Deserialize,Deserializer};

/// normalize longitude degrees into [-180,180]
#[inline]
pub fn normalize_180 (d: f64) -> f64 {
    let x = d % 360.0;

    if x < -180.0 { 360.0 + x }
    else if x > 180.0 { x - 360.0 }
    else { x }
}

/// normalize longitude degrees into [0,360)
#[inline]
pub fn normalize_360 (d: f64) -> f64 {
    let x = d % 360.0;
    if x < 0.0 { 360.0 + x } else { x }
}

/// position of an observation. Degrees for lat/lon and meters above MSL for altitude.
/// Note that the plain struct ctor does not normalize, which is required to represent missing
/// locations and raw 0..360 longitudes from sources that use that convention
#[derive(Debug,Clone,Copy,PartialEq,Serialize,Deserialize)]
pub struct EarthLocation {
    pub lat: f64,
    pub lon: f64,
    #[serde(default)]
    pub alt: f64
}

impl EarthLocation {
    pub fn new (lat: f64, lon: f64, alt: f64)->Self {
        EarthLocation { lat, lon: normalize_180(lon), alt }
    }

    pub fn from_lat_lon (lat: f64, lon: f64)->Self {
        EarthLocation::new( lat, lon, 0.0)
    }

    pub fn missing ()->Self {
        EarthLocation { lat: f64::NAN, lon: f64::NAN, alt: f64::NAN }
    }

    pub fn is_missing (&self)->bool {
        self.lat.is_nan() || self.lon.is_nan()
    }
}

impl fmt::Display for EarthLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{},{},{}]", self.lat, self.lon, self.alt)
    }
}

/// an axis aligned lat/lon rectangle in degrees.
/// Boxes with `west > east` (after normalization) cross the antimeridian
#[derive(Debug,Copy,Clone,Serialize,PartialEq)]
pub struct LatLonBox {
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64
}

impl LatLonBox {
    pub fn new (west: f64, south: f64, east: f64, north: f64)->Self {
        if (east - west).abs() >= 360.0 {
            LatLonBox { west: -180.0, south, east: 180.0, north }
        } else {
            LatLonBox { west: normalize_180(west), south, east: normalize_180(east), north }
        }
    }

    pub fn from_wsen (wsen: &[f64;4])->Self {
        LatLonBox::new( wsen[0], wsen[1], wsen[2], wsen[3])
    }

    pub fn crosses_antimeridian (&self)->bool {
        self.west > self.east
    }

    /// inclusive containment test. Missing (NaN) coordinates are never contained
    pub fn contains (&self, lat: f64, lon: f64)->bool {
        if lat.is_nan() || lon.is_nan() { return false }
        if lat < self.south || lat > self.north { return false }

        let lon = normalize_180(lon);
        if self.crosses_antimeridian() {
            lon >= self.west || lon <= self.east
        } else {
            lon >= self.west && lon <= self.east
        }
    }
}

// deserialized boxes go through LatLonBox::new so that config values get normalized
#[derive(Deserialize)]
#[serde(rename = "LatLonBox")]
struct RawLatLonBox {
    west: f64,
    south: f64,
    east: f64,
    north: f64
}

impl<'de> Deserialize<'de> for LatLonBox {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error> where D: Deserializer<'de> {
        let raw = RawLatLonBox::deserialize(deserializer)?;
        Ok( LatLonBox::new( raw.west, raw.south, raw.east, raw.north))
    }
}

impl fmt::Display for LatLonBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[w:{},s:{},e:{},n:{}]", self.west, self.south, self.east, self.north)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize () {
        assert_eq!( normalize_180(190.0), -170.0);
        assert_eq!( normalize_180(-190.0), 170.0);
        assert_eq!( normalize_180(260.0), -100.0);
        assert_eq!( normalize_360(-100.0), 260.0);
    }

    #[test]
    fn test_antimeridian_box () {
        let bbox = LatLonBox::new( 170.0, -10.0, -170.0, 10.0);
        assert!( bbox.crosses_antimeridian());
        assert!( bbox.contains( 0.0, 175.0));
        assert!( bbox.contains( 0.0, -175.0));
        assert!( bbox.contains( 0.0, 185.0));
        assert!( !bbox.contains( 0.0, 0.0));
    }
}

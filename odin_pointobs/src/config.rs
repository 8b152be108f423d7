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

use std::{fs, path::Path};
use serde::{Serialize,Deserialize};

use crate::barnes::BarnesParams;
use crate::errors::Result;
use crate::geo::LatLonBox;

/// processing parameters for a point observation pipeline (bin → sequence → subset → analyze).
/// Missing fields in a RON config file get their default values
#[derive(Clone,Serialize,Deserialize,Debug,PartialEq)]
#[serde(default)]
pub struct PointObsConfig {
    /// minute offset of bin boundaries within the hour (0 means bins start at the first observation time)
    pub bin_round_to: f64,

    /// bin width in minutes. Values <= 0 turn binning off
    pub bin_width: f64,

    /// truncate times to multiples of this many minutes when sequencing (0 means exact times)
    pub lump_minutes: i64,

    /// optional region of interest
    pub bbox: Option<LatLonBox>,

    pub barnes: BarnesParams,
}

impl Default for PointObsConfig {
    fn default()->Self {
        PointObsConfig {
            bin_round_to: 0.0,
            bin_width: 0.0,
            lump_minutes: 0,
            bbox: None,
            barnes: BarnesParams::default()
        }
    }
}

impl PointObsConfig {
    pub fn from_ron_str (s: &str)->Result<Self> {
        Ok( ron::from_str(s)?)
    }

    pub fn load (path: impl AsRef<Path>)->Result<Self> {
        let contents = fs::read_to_string( path.as_ref())?;
        Self::from_ron_str( &contents)
    }
}

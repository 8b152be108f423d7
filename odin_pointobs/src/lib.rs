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

#![doc = include_str!("../doc/odin_pointobs.md")]

pub mod errors;
pub use errors::*;

pub mod units;
pub mod geo;
pub mod obs;
pub mod time_bin;
pub mod sequence;
pub mod subset;
pub mod grid;
pub mod interpolate;
pub mod barnes;
pub mod config;

pub use units::{Unit, Dimension};
pub use geo::{EarthLocation, LatLonBox};
pub use obs::{
    FieldDef, FieldKind, FieldValue, NamedValue, ObsCollection, ObsCollectionBuilder, ObsSchema, Observation,
    MISSING_TIME, merge
};
pub use time_bin::{bin_times, bin_observation_times};
pub use sequence::{ObsData, TimeSequence, TimeSlice, make_time_sequence};
pub use subset::{subset, subset_collection, subset_sequence};
pub use grid::{CoordinateTransform, FirstGuess, Grid, GuessField, Mesh, TimedGuess, MAX_MESH_NODES};
pub use interpolate::{BarnesInterpolator, GridInterpolator, PassParams, ScatteredPoint, RecommendedParams, recommended_parameters};
pub use barnes::{BarnesParams, BarnesResult, CancelCheck, CancelFlag, GridSpacing, MIN_OBS, barnes, barnes_with};
pub use config::PointObsConfig;

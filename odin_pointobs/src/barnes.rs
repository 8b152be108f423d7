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

//! Barnes objective analysis of point observations.
//! This module holds the analysis policy (time slicing, record filtering, mesh selection, first guess
//! handling and units). The weighting itself is delegated to a [`GridInterpolator`].

use std::sync::atomic::{AtomicBool, Ordering};
use ndarray::Array2;
use serde::{Serialize,Deserialize};
use tracing::{debug, warn};

use crate::errors::{OdinPointObsError, Result, argument_error, schema_error};
use crate::geo::{normalize_180, normalize_360};
use crate::grid::{FirstGuess, Grid, GuessField, Mesh};
use crate::interpolate::{BarnesInterpolator, GridInterpolator, PassParams, ScatteredPoint, recommended_parameters};
use crate::obs::ObsCollection;
use crate::sequence::ObsData;
use crate::units::{Dimension, Unit};

/// slices with fewer usable observations do not get a grid
pub const MIN_OBS: usize = 4;

#[derive(Debug,Clone,Copy,PartialEq,Serialize,Deserialize)]
pub enum GridSpacing {
    /// derive spacing and search radius from the data distribution
    Automatic,
    /// x (longitude) and y (latitude) spacing in degrees
    Explicit { x: f64, y: f64 }
}

#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
#[serde(default)]
pub struct BarnesParams {
    pub spacing: GridSpacing,
    pub num_passes: usize,
    /// weight parameter reduction per pass, typically in (0,1]
    pub gain: f64,
    /// in grid units. Replaced by the recommended value for automatic spacing without first guess
    pub search_radius: f64,
    /// how far (in seconds) a slice time can be outside the time range of a time varying first guess
    pub guess_time_tolerance: f64
}

impl Default for BarnesParams {
    fn default()->Self {
        BarnesParams {
            spacing: GridSpacing::Automatic,
            num_passes: 2,
            gain: 1.0,
            search_radius: 1.0,
            guess_time_tolerance: 0.0
        }
    }
}

impl BarnesParams {
    pub fn new (spacing: GridSpacing, num_passes: usize, gain: f64, search_radius: f64)->Self {
        BarnesParams { spacing, num_passes, gain, search_radius, ..Default::default() }
    }

    pub fn validate (&self)->Result<()> {
        if self.num_passes < 1 {
            return Err( argument_error("number of passes has to be >= 1"))
        }
        if !self.gain.is_finite() || self.gain <= 0.0 {
            return Err( argument_error( format!("invalid gain {}", self.gain)))
        }
        if !self.search_radius.is_finite() || self.search_radius <= 0.0 {
            return Err( argument_error( format!("invalid search radius {}", self.search_radius)))
        }
        if let GridSpacing::Explicit{x,y} = self.spacing {
            if !(x > 0.0 && y > 0.0 && x.is_finite() && y.is_finite()) {
                return Err( argument_error( format!("invalid grid spacing {},{}", x, y)))
            }
        }
        if self.guess_time_tolerance.is_nan() || self.guess_time_tolerance < 0.0 {
            return Err( argument_error( format!("invalid guess time tolerance {}", self.guess_time_tolerance)))
        }
        Ok(())
    }

    fn pass_params (&self, search_radius: f64)->PassParams {
        PassParams { search_radius, gain: self.gain, num_passes: self.num_passes }
    }
}

/// analysis output - one optional grid for a single collection, or all grids that could be computed for a time sequence
#[derive(Debug,Clone)]
pub enum BarnesResult {
    Single(Option<Grid>),
    Sequence(Vec<Grid>)
}

impl BarnesResult {
    pub fn grids (&self)->Vec<&Grid> {
        match self {
            BarnesResult::Single(grid) => grid.iter().collect(),
            BarnesResult::Sequence(grids) => grids.iter().collect()
        }
    }

    pub fn into_grids (self)->Vec<Grid> {
        match self {
            BarnesResult::Single(grid) => grid.into_iter().collect(),
            BarnesResult::Sequence(grids) => grids
        }
    }

    pub fn is_empty (&self)->bool {
        match self {
            BarnesResult::Single(grid) => grid.is_none(),
            BarnesResult::Sequence(grids) => grids.is_empty()
        }
    }
}

/// cooperative cancellation hook, checked before each time slice
pub trait CancelCheck {
    fn is_cancelled (&self)->bool;
}

impl<F> CancelCheck for F where F: Fn()->bool {
    fn is_cancelled (&self)->bool { self() }
}

/// a flag based cancellation check that can be shared between threads
#[derive(Debug,Default)]
pub struct CancelFlag(AtomicBool);

impl CancelFlag {
    pub fn new ()->Self { CancelFlag( AtomicBool::new(false)) }
    pub fn cancel (&self) { self.0.store( true, Ordering::Relaxed) }
}

impl CancelCheck for CancelFlag {
    fn is_cancelled (&self)->bool { self.0.load( Ordering::Relaxed) }
}

fn check_cancel (cancel: Option<&dyn CancelCheck>)->Result<()> {
    match cancel {
        Some(c) if c.is_cancelled() => Err( OdinPointObsError::Cancelled),
        _ => Ok(())
    }
}

/// Barnes analysis of `variable` using the default [`BarnesInterpolator`]
pub fn barnes (data: &ObsData, variable: &str, params: &BarnesParams, first_guess: Option<&FirstGuess>, cancel: Option<&dyn CancelCheck>)->Result<BarnesResult> {
    barnes_with( &BarnesInterpolator, data, variable, params, first_guess, cancel)
}

/// Barnes analysis of `variable` with an explicit interpolation routine.
/// Time sequences are analyzed slice by slice, slices without enough usable data are left out of the result
pub fn barnes_with (interpolator: &dyn GridInterpolator, data: &ObsData, variable: &str, params: &BarnesParams,
                    first_guess: Option<&FirstGuess>, cancel: Option<&dyn CancelCheck>)->Result<BarnesResult> {
    params.validate()?;
    let (var_idx, var_unit) = data.schema().real_field(variable)?;

    match data {
        ObsData::Single(obs) => {
            check_cancel(cancel)?;
            let time = obs.iter().find( |o| o.has_time()).map( |o| o.time);
            let guess = match (first_guess, time) {
                (Some(fg), Some(t)) => resolve_guess( fg, t, params.guess_time_tolerance),
                (Some(fg), None) => fg.first(),
                (None, _) => None
            };
            let grid = barnes_slice( interpolator, obs, time, var_idx, var_unit, params, guess)?;
            Ok( BarnesResult::Single(grid))
        }
        ObsData::Sequence(seq) => {
            let mut grids: Vec<Grid> = Vec::with_capacity( seq.len());
            for slice in seq.iter() {
                check_cancel(cancel)?;
                let guess = first_guess.and_then( |fg| resolve_guess( fg, slice.time, params.guess_time_tolerance));
                if let Some(grid) = barnes_slice( interpolator, &slice.obs, Some(slice.time), var_idx, var_unit, params, guess)? {
                    grids.push(grid);
                } else {
                    debug!("no grid for time slice {}", slice.time);
                }
            }
            Ok( BarnesResult::Sequence(grids))
        }
    }
}

fn resolve_guess (fg: &FirstGuess, t: f64, tolerance: f64)->Option<&GuessField> {
    let guess = fg.at_time( t, tolerance);
    if guess.is_none() {
        warn!("no first guess for time {}, analyzing without", t);
    }
    guess
}

/// the unit we analyze in if there is a first guess. Guess fields in geopotential meters are taken as meters
/// if the variable is a length
fn guess_unit (guess: &GuessField, var_unit: &Unit)->Unit {
    if guess.unit == Unit::GeopotentialMeter && var_unit.dimension() == Dimension::Length {
        Unit::Meter
    } else {
        guess.unit.clone()
    }
}

/// extract the usable (lat, normalized lon, value) triples of a slice
fn usable_records (obs: &ObsCollection, var_idx: usize)->Vec<(f64,f64,f64)> {
    let mut records = Vec::with_capacity( obs.len());
    let mut n_dropped = 0;

    for o in obs.iter() {
        let value = o.values.get(var_idx).and_then( |v| v.as_real()).unwrap_or(f64::NAN);
        let lat = o.location.lat;
        let lon = o.location.lon;

        if value.is_nan() || !(-90.0..=90.0).contains(&lat) || !(-360.0..=360.0).contains(&lon) {
            n_dropped += 1;
        } else {
            records.push( (lat, normalize_180(lon), value) );
        }
    }

    if n_dropped > 0 {
        debug!("dropped {} of {} records with missing values or invalid locations", n_dropped, obs.len());
    }
    records
}

fn barnes_slice (interpolator: &dyn GridInterpolator, obs: &ObsCollection, time: Option<f64>, var_idx: usize, var_unit: &Unit,
                 params: &BarnesParams, guess: Option<&GuessField>)->Result<Option<Grid>> {
    if obs.len() < MIN_OBS { return Ok(None) }

    let records = usable_records( obs, var_idx);
    if records.len() <= MIN_OBS - 1 { return Ok(None) }

    match guess {
        Some(guess) => {
            let unit = guess_unit( guess, var_unit);
            if !var_unit.is_convertible_to( &unit) {
                return Err( schema_error( format!("variable unit {} not convertible to first guess unit {}", var_unit, unit)))
            }
            let use_360 = guess.transform.is_none() && guess.mesh.uses_360_longitudes();

            let mut points: Vec<ScatteredPoint> = Vec::with_capacity( records.len());
            for (lat,lon,value) in records {
                let value = var_unit.convert( value, &unit)?;
                let xy = match &guess.transform {
                    Some(transform) => transform.from_lat_lon( lat, lon),
                    None => Some( (if use_360 { normalize_360(lon) } else { lon }, lat) )
                };
                if let Some((x,y)) = xy {
                    points.push( ScatteredPoint::new( x, y, value));
                }
            }
            if points.len() < MIN_OBS { return Ok(None) }

            let values = interpolator.interpolate( &points, &guess.mesh, &params.pass_params( params.search_radius), Some(&guess.values))?;
            check_shape( &values, &guess.mesh)?;
            Ok( Some( Grid { time, mesh: guess.mesh.clone(), values, unit } ))
        }

        None => {
            let points: Vec<ScatteredPoint> = records.iter().map( |(lat,lon,value)| ScatteredPoint::new( *lon, *lat, *value)).collect();

            let (mesh, search_radius) = match params.spacing {
                GridSpacing::Automatic => {
                    let rec = recommended_parameters( &points)?;
                    (rec.mesh, rec.search_radius)
                }
                GridSpacing::Explicit{x,y} => {
                    let (x0,x1,y0,y1) = extent( &points);
                    (Mesh::from_extent( x0, x1, x, y0, y1, y)?, params.search_radius)
                }
            };

            let values = interpolator.interpolate( &points, &mesh, &params.pass_params( search_radius), None)?;
            check_shape( &values, &mesh)?;
            Ok( Some( Grid { time, mesh, values, unit: var_unit.clone() } ))
        }
    }
}

fn check_shape (values: &Array2<f64>, mesh: &Mesh)->Result<()> {
    if values.dim() != mesh.shape() {
        Err( argument_error( format!("interpolator returned shape {:?} for mesh {:?}", values.dim(), mesh.shape())))
    } else {
        Ok(())
    }
}

fn extent (points: &[ScatteredPoint])->(f64,f64,f64,f64) {
    points.iter().fold(
        (f64::INFINITY, f64::NEG_INFINITY, f64::INFINITY, f64::NEG_INFINITY),
        |(x0,x1,y0,y1), p| (x0.min(p.x), x1.max(p.x), y0.min(p.y), y1.max(p.y))
    )
}

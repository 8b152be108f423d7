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

//! regular grids: the [`Mesh`] geometry, the analysis output [`Grid`] and the optional [`FirstGuess`] input

use std::{fmt, sync::Arc};
use ndarray::Array2;
use serde::{Serialize,Deserialize};

use crate::errors::{Result, argument_error};
use crate::units::Unit;

/// upper limit for the number of nodes of computed meshes
pub const MAX_MESH_NODES: usize = 16_000_000;

/// tolerance (in steps) for extents that are a whole number of steps up to rounding
const AXIS_EPS: f64 = 1e-9;

/// rectilinear mesh given by its x (longitude or projected x) and y (latitude or projected y) coordinate vectors.
/// Grid values are stored as `[iy, ix]`
#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
pub struct Mesh {
    pub x: Vec<f64>,
    pub y: Vec<f64>
}

impl Mesh {
    pub fn new (x: Vec<f64>, y: Vec<f64>)->Self {
        Mesh { x, y }
    }

    /// a mesh from min to max in given steps. The last node is at max or less than one step beyond it
    pub fn from_extent (x_min: f64, x_max: f64, dx: f64, y_min: f64, y_max: f64, dy: f64)->Result<Self> {
        let x = axis( x_min, x_max, dx)?;
        let y = axis( y_min, y_max, dy)?;
        if x.len().saturating_mul( y.len()) > MAX_MESH_NODES {
            return Err( argument_error( format!("mesh of {}x{} nodes exceeds {} nodes", x.len(), y.len(), MAX_MESH_NODES)))
        }
        Ok( Mesh { x, y } )
    }

    pub fn nx (&self)->usize { self.x.len() }
    pub fn ny (&self)->usize { self.y.len() }
    pub fn shape (&self)->(usize,usize) { (self.y.len(), self.x.len()) }

    /// does this mesh use 0..360 longitudes
    pub fn uses_360_longitudes (&self)->bool {
        self.x.iter().any( |x| *x > 180.0)
    }
}

fn axis (min: f64, max: f64, step: f64)->Result<Vec<f64>> {
    if !(step > 0.0) || !step.is_finite() {
        return Err( argument_error( format!("invalid grid spacing {}", step)))
    }
    if !min.is_finite() || !max.is_finite() || max < min {
        return Err( argument_error( format!("invalid grid extent {}..{}", min, max)))
    }

    // last node is at or beyond max
    let steps = ((max - min) / step - AXIS_EPS).ceil().max(0.0);
    if steps >= MAX_MESH_NODES as f64 {
        return Err( argument_error( format!("grid spacing {} too small for extent {}..{}", step, min, max)))
    }
    let n = steps as usize + 1;
    Ok( (0..n).map( |i| min + i as f64 * step).collect() )
}

/// locate `v` on a monotonic (ascending or descending) axis. Returns the lower node index and the
/// fractional offset to the next node. Single node axes map everything onto their node
pub(crate) fn locate (axis: &[f64], v: f64)->Option<(usize,f64)> {
    let n = axis.len();
    if n == 0 || v.is_nan() { return None }
    if n == 1 { return Some( (0, 0.0) ) }

    let ascending = axis[n-1] >= axis[0];
    let (lo,hi) = if ascending { (axis[0],axis[n-1]) } else { (axis[n-1],axis[0]) };
    if v < lo || v > hi { return None }

    // index of first node that is beyond v (in axis direction)
    let i = if ascending {
        axis.partition_point( |a| *a <= v)
    } else {
        axis.partition_point( |a| *a >= v)
    };
    let i0 = i.saturating_sub(1).min( n-2);
    let d = axis[i0+1] - axis[i0];
    let f = if d != 0.0 { (v - axis[i0]) / d } else { 0.0 };

    Some( (i0, f.clamp(0.0, 1.0)) )
}

/// bilinear interpolation of `values[iy,ix]` over `mesh`. NaN if outside of mesh or if any of the
/// contributing nodes is NaN
pub(crate) fn bilinear (mesh: &Mesh, values: &Array2<f64>, x: f64, y: f64)->f64 {
    let (Some((ix,fx)), Some((iy,fy))) = (locate( &mesh.x, x), locate( &mesh.y, y)) else { return f64::NAN };

    let ix1 = (ix+1).min( mesh.nx()-1);
    let iy1 = (iy+1).min( mesh.ny()-1);

    let v00 = values[[iy,ix]];
    let v01 = values[[iy,ix1]];
    let v10 = values[[iy1,ix]];
    let v11 = values[[iy1,ix1]];

    let v0 = v00 + (v01 - v00) * fx;
    let v1 = v10 + (v11 - v10) * fx;
    v0 + (v1 - v0) * fy
}

/// the result of an objective analysis for one time slice
#[derive(Debug,Clone,Serialize)]
pub struct Grid {
    /// epoch seconds of the time slice this grid was computed for (if any)
    pub time: Option<f64>,
    pub mesh: Mesh,
    /// `[iy,ix]`
    pub values: Array2<f64>,
    pub unit: Unit
}

impl Grid {
    pub fn nx (&self)->usize { self.mesh.nx() }
    pub fn ny (&self)->usize { self.mesh.ny() }

    pub fn value_at (&self, ix: usize, iy: usize)->Option<f64> {
        self.values.get( [iy,ix]).copied()
    }

    /// interpolated value at mesh coordinates
    pub fn sample (&self, x: f64, y: f64)->f64 {
        bilinear( &self.mesh, &self.values, x, y)
    }

    /// min/max of all non-NaN values
    pub fn value_range (&self)->Option<(f64,f64)> {
        self.values.iter().filter( |v| !v.is_nan()).fold( None, |acc, v| match acc {
            None => Some( (*v,*v) ),
            Some((lo,hi)) => Some( (lo.min(*v), hi.max(*v)) )
        })
    }
}

/// mapping from geographic lat/lon degrees into the native coordinates of a first guess field mesh.
/// Returns `None` for positions that can't be mapped
pub trait CoordinateTransform: Send + Sync {
    fn from_lat_lon (&self, lat: f64, lon: f64)->Option<(f64,f64)>;
}

impl<F> CoordinateTransform for F where F: Fn(f64,f64)->Option<(f64,f64)> + Send + Sync {
    fn from_lat_lon (&self, lat: f64, lon: f64)->Option<(f64,f64)> { self(lat,lon) }
}

/// a gridded first estimate of the analyzed variable
#[derive(Clone)]
pub struct GuessField {
    pub mesh: Mesh,
    pub values: Array2<f64>,
    pub unit: Unit,
    /// None means the mesh is a plain lon/lat mesh
    pub transform: Option<Arc<dyn CoordinateTransform>>
}

impl GuessField {
    pub fn new (mesh: Mesh, values: Array2<f64>, unit: Unit)->Result<Self> {
        if values.dim() != mesh.shape() {
            return Err( argument_error( format!("guess values shape {:?} does not match mesh {:?}", values.dim(), mesh.shape())))
        }
        Ok( GuessField { mesh, values, unit, transform: None } )
    }

    pub fn with_transform (mut self, transform: Arc<dyn CoordinateTransform>)->Self {
        self.transform = Some(transform);
        self
    }
}

impl fmt::Debug for GuessField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GuessField")
            .field("mesh", &self.mesh)
            .field("unit", &self.unit)
            .field("has_transform", &self.transform.is_some())
            .finish()
    }
}

#[derive(Debug,Clone)]
pub struct TimedGuess {
    pub time: f64,
    pub field: GuessField
}

#[derive(Debug,Clone)]
pub enum FirstGuess {
    Static(GuessField),
    /// guess fields ordered by ascending time
    TimeVarying(Vec<TimedGuess>)
}

impl FirstGuess {
    /// nearest neighbor selection of the guess for time `t`. There is no match if `t` is outside the
    /// guess time range extended by `tolerance` seconds
    pub fn at_time (&self, t: f64, tolerance: f64)->Option<&GuessField> {
        match self {
            FirstGuess::Static(field) => Some(field),
            FirstGuess::TimeVarying(guesses) => {
                if t.is_nan() { return None }
                let t_min = guesses.iter().map( |g| g.time).fold( f64::INFINITY, f64::min);
                let t_max = guesses.iter().map( |g| g.time).fold( f64::NEG_INFINITY, f64::max);
                if t < t_min - tolerance || t > t_max + tolerance { return None }

                guesses.iter()
                    .min_by( |a,b| (a.time - t).abs().total_cmp( &(b.time - t).abs()))
                    .map( |g| &g.field)
            }
        }
    }

    /// the guess to use if there is no time to match
    pub fn first (&self)->Option<&GuessField> {
        match self {
            FirstGuess::Static(field) => Some(field),
            FirstGuess::TimeVarying(guesses) => guesses.first().map( |g| &g.field)
        }
    }
}

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

//! scattered point to grid interpolation.
//! The [`GridInterpolator`] trait separates the numerical routine from the analysis policy in [`crate::barnes`].
//! [`BarnesInterpolator`] is the default implementation of the multi-pass Barnes scheme as described in
//! Koch, DesJardins and Kocin (1983): "An Interactive Barnes Objective Map Analysis Scheme for Use with
//! Satellite and Conventional Data", J. Climate Appl. Meteor., 22, 1487–1503.

use std::f64::consts::PI;
use ndarray::Array2;

use crate::errors::{Result, argument_error};
use crate::grid::{Mesh, bilinear};

/// Koch et al. weight parameter constant
const KAPPA_FACTOR: f64 = 5.052;

/// weights below exp(-MAX_EXPONENT) are treated as zero
const MAX_EXPONENT: f64 = 40.0;

/// ratio between recommended grid spacing and average data spacing (Koch et al. suggest 0.3..0.5)
const SPACING_RATIO: f64 = 0.4;

/// one input datum in mesh coordinates
#[derive(Debug,Clone,Copy,PartialEq)]
pub struct ScatteredPoint {
    pub x: f64,
    pub y: f64,
    pub value: f64
}

impl ScatteredPoint {
    pub fn new (x: f64, y: f64, value: f64)->Self { ScatteredPoint { x, y, value } }
}

#[derive(Debug,Clone,Copy,PartialEq)]
pub struct PassParams {
    /// scale length in mesh units from which the first pass weight parameter is derived
    pub search_radius: f64,
    /// factor by which the weight parameter is reduced for each subsequent pass
    pub gain: f64,
    pub num_passes: usize
}

/// strategy interface for the numerical scattered-to-grid routine. Implementations return an array of shape
/// `(mesh.ny(), mesh.nx())`, seeded with `first_guess` if one is given
pub trait GridInterpolator {
    fn interpolate (&self, points: &[ScatteredPoint], mesh: &Mesh, params: &PassParams, first_guess: Option<&Array2<f64>>)->Result<Array2<f64>>;
}

/// multi-pass Gaussian weighted averaging.
/// The first pass uses `w = exp(-r²/κ₀)` with `κ₀ = 5.052 (2R/π)²`, each further pass interpolates the residuals
/// of the previous one at the data points with `κ = gain * κ_previous`
#[derive(Debug,Clone,Copy,Default)]
pub struct BarnesInterpolator;

impl BarnesInterpolator {
    pub fn kappa (search_radius: f64)->f64 {
        let r = 2.0 * search_radius / PI;
        KAPPA_FACTOR * r * r
    }
}

impl GridInterpolator for BarnesInterpolator {
    fn interpolate (&self, points: &[ScatteredPoint], mesh: &Mesh, params: &PassParams, first_guess: Option<&Array2<f64>>)->Result<Array2<f64>> {
        if params.num_passes < 1 { return Err( argument_error("number of passes has to be >= 1")) }
        if !(params.search_radius > 0.0) { return Err( argument_error( format!("invalid search radius {}", params.search_radius))) }
        if !(params.gain > 0.0) { return Err( argument_error( format!("invalid gain {}", params.gain))) }

        let mut kappa = Self::kappa( params.search_radius);
        let mut grid = match first_guess {
            Some(guess) => {
                if guess.dim() != mesh.shape() {
                    return Err( argument_error( format!("first guess shape {:?} does not match mesh {:?}", guess.dim(), mesh.shape())))
                }
                guess.clone()
            }
            None => {
                let grid = first_pass( points, mesh, kappa);
                kappa *= params.gain;
                grid
            }
        };

        let n_corrections = if first_guess.is_some() { params.num_passes } else { params.num_passes - 1 };
        for _ in 0..n_corrections {
            let residuals: Vec<f64> = points.iter().map( |p| p.value - bilinear( mesh, &grid, p.x, p.y)).collect();
            correction_pass( points, &residuals, mesh, kappa, &mut grid);
            kappa *= params.gain;
        }

        Ok(grid)
    }
}

/// Gaussian weighted sum of `values` for mesh node (x,y). NaN values don't contribute
fn weighted_sum (points: &[ScatteredPoint], values: &[f64], x: f64, y: f64, kappa: f64)->(f64,f64) {
    let max_r2 = MAX_EXPONENT * kappa;
    let mut sum_w = 0.0;
    let mut sum_wv = 0.0;

    for (p,v) in points.iter().zip( values.iter()) {
        if v.is_nan() { continue }
        let dx = p.x - x;
        let dy = p.y - y;
        let r2 = dx*dx + dy*dy;
        if r2 > max_r2 { continue }

        let w = (-r2 / kappa).exp();
        sum_w += w;
        sum_wv += w * v;
    }

    (sum_w, sum_wv)
}

/// the initial pass is a weighted average of the data values. Nodes without weight are NaN
fn first_pass (points: &[ScatteredPoint], mesh: &Mesh, kappa: f64)->Array2<f64> {
    let values: Vec<f64> = points.iter().map( |p| p.value).collect();
    let mut grid = Array2::from_elem( mesh.shape(), f64::NAN);

    for (iy,y) in mesh.y.iter().enumerate() {
        for (ix,x) in mesh.x.iter().enumerate() {
            let (sum_w, sum_wv) = weighted_sum( points, &values, *x, *y, kappa);
            if sum_w > 0.0 {
                grid[[iy,ix]] = sum_wv / sum_w;
            }
        }
    }
    grid
}

/// add the weighted average of the residuals to the current grid. NaN nodes stay NaN
fn correction_pass (points: &[ScatteredPoint], residuals: &[f64], mesh: &Mesh, kappa: f64, grid: &mut Array2<f64>) {
    for (iy,y) in mesh.y.iter().enumerate() {
        for (ix,x) in mesh.x.iter().enumerate() {
            let cell = &mut grid[[iy,ix]];
            if cell.is_nan() { continue }

            let (sum_w, sum_wv) = weighted_sum( points, residuals, *x, *y, kappa);
            if sum_w > 0.0 {
                *cell += sum_wv / sum_w;
            }
        }
    }
}

/// data derived analysis parameters for when neither grid spacing nor first guess are given
#[derive(Debug,Clone,PartialEq)]
pub struct RecommendedParams {
    pub mesh: Mesh,
    pub search_radius: f64,
    /// average data spacing
    pub data_spacing: f64
}

/// derive mesh and search radius from the extent and density of the data points. We use the average
/// data spacing `Δn = sqrt(A) (1 + sqrt(N)) / (N - 1)` (Koch et al.) as search radius and `0.4 Δn` as grid spacing
pub fn recommended_parameters (points: &[ScatteredPoint])->Result<RecommendedParams> {
    let n = points.len();
    if n < 2 { return Err( argument_error("need at least two points to derive analysis parameters")) }

    let (x0,x1,y0,y1) = points.iter().fold(
        (f64::INFINITY, f64::NEG_INFINITY, f64::INFINITY, f64::NEG_INFINITY),
        |(x0,x1,y0,y1), p| (x0.min(p.x), x1.max(p.x), y0.min(p.y), y1.max(p.y))
    );
    let w = x1 - x0;
    let h = y1 - y0;

    // collinear points have no area - use the square of the longer extent instead
    let mut area = w * h;
    if area <= 0.0 { area = w.max(h).powi(2) }
    if area <= 0.0 { area = 1.0 }

    let nf = n as f64;
    let data_spacing = area.sqrt() * (1.0 + nf.sqrt()) / (nf - 1.0);
    let spacing = SPACING_RATIO * data_spacing;

    let mesh = Mesh::from_extent( x0, x1, spacing, y0, y1, spacing)?;
    Ok( RecommendedParams { mesh, search_radius: data_spacing, data_spacing } )
}

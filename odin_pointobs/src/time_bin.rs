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

use std::sync::Arc;
use tracing::debug;

use crate::obs::{ObsCollection, Observation};

const SECS_PER_HOUR: f64 = 3600.0;

/// return the full hour (in epoch seconds) that contains `t`
#[inline]
pub fn full_hour_secs (t: f64)->f64 {
    (t / SECS_PER_HOUR).floor() * SECS_PER_HOUR
}

/// the anchor of all bins. With a `round_to` offset this is the hour before the one containing `min_time`
/// plus the offset, which keeps bin boundaries stable no matter in which hour the data starts
pub fn bin_base_time (min_time: f64, round_to_secs: f64)->f64 {
    if round_to_secs == 0.0 {
        min_time
    } else {
        full_hour_secs(min_time) - SECS_PER_HOUR + round_to_secs
    }
}

/// map each time to the start of its bin. `round_to` and `width` are in minutes.
/// This is an element-wise remap, i.e. the result has the same length and order as `times`.
/// Missing (NaN) times stay missing. A `width <= 0` disables binning
pub fn bin_times (times: &[f64], round_to: f64, width: f64)->Vec<f64> {
    if width <= 0.0 { return times.to_vec() }

    let width_secs = width * 60.0;
    let round_to_secs = round_to * 60.0;

    let min_time = times.iter().filter( |t| !t.is_nan()).fold( f64::INFINITY, |acc,t| acc.min(*t));
    if !min_time.is_finite() { return times.to_vec() }

    let base_time = bin_base_time( min_time, round_to_secs);

    times.iter().map( |t| {
        if t.is_nan() { *t } else { base_time + width_secs * ((t - base_time) / width_secs).floor() }
    }).collect()
}

/// apply [`bin_times`] to the observation times of a collection. Observations without time are dropped,
/// observations that already have their binned time are shared with the input collection
pub fn bin_observation_times (obs: &ObsCollection, round_to: f64, width: f64)->ObsCollection {
    if width <= 0.0 { return obs.clone() }

    let with_time: Vec<&Arc<Observation>> = obs.iter().filter( |o| o.has_time()).collect();
    let n_dropped = obs.len() - with_time.len();
    if n_dropped > 0 {
        debug!("dropped {} observations without time", n_dropped);
    }

    let times: Vec<f64> = with_time.iter().map( |o| o.time).collect();
    let binned = bin_times( &times, round_to, width);

    let binned_obs = with_time.into_iter().zip( binned.into_iter()).map( |(o,t)| {
        if o.time == t { o.clone() } else { Arc::new( o.with_time(t)) }
    }).collect();

    ObsCollection::from_shared( obs.schema().clone(), binned_obs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_time () {
        // 10:20:00 with a 15min offset anchors at 09:15:00
        let t = 10.0 * 3600.0 + 20.0 * 60.0;
        assert_eq!( bin_base_time( t, 15.0 * 60.0), 9.0 * 3600.0 + 15.0 * 60.0);
        assert_eq!( bin_base_time( t, 0.0), t);
    }
}

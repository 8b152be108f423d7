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

/// unit tests for time binning
/// run with "cargo test --test test_time_bin -- --nocapture"

use std::sync::Arc;
use odin_pointobs::*;

fn obs_at_times (times: &[f64])->ObsCollection {
    let schema = ObsSchema::new( vec![ FieldDef::real("temp", Unit::Kelvin) ]).unwrap();
    let obs = times.iter().enumerate().map( |(i,t)| {
        Observation::new( EarthLocation::from_lat_lon( 40.0, -100.0 + i as f64), *t, vec![ FieldValue::Real(280.0) ])
    }).collect();
    ObsCollection::new( schema, obs).unwrap()
}

#[test]
fn test_minute_bins () {
    let times = [100.0, 130.0, 145.0, 200.0];
    let binned = bin_times( &times, 0.0, 1.0);
    println!("{times:?} -> {binned:?}");
    assert_eq!( binned, vec![100.0, 100.0, 100.0, 160.0]);
}

#[test]
fn test_no_binning () {
    let times = [100.0, 130.0, f64::NAN, 200.0];
    let binned = bin_times( &times, 15.0, 0.0);
    assert_eq!( binned.len(), times.len());
    assert_eq!( binned[0], 100.0);
    assert!( binned[2].is_nan());
    assert_eq!( binned[3], 200.0);
}

#[test]
fn test_round_to_anchor () {
    // data starts at 10:20, bins are 30min wide and anchored at :15 of the hour before (09:15)
    let t0 = 10.0 * 3600.0 + 20.0 * 60.0;
    let times = [t0, t0 + 20.0 * 60.0, t0 + 40.0 * 60.0];
    let binned = bin_times( &times, 15.0, 30.0);
    println!("{times:?} -> {binned:?}");

    let h = |hh: f64, mm: f64| hh * 3600.0 + mm * 60.0;
    assert_eq!( binned, vec![ h(10.0,15.0), h(10.0,15.0), h(10.0,45.0) ]);
}

#[test]
fn test_cardinality_and_missing () {
    let times = [5000.0, f64::NAN, 7300.0, 1234.5, 9999.0];
    let binned = bin_times( &times, 0.0, 10.0);
    assert_eq!( binned.len(), times.len());
    assert!( binned[1].is_nan());
    for (t,b) in times.iter().zip( binned.iter()) {
        if !t.is_nan() {
            assert!( b <= t && t - b < 600.0);
        }
    }
}

#[test]
fn test_idempotence () {
    let times: Vec<f64> = (0..50).map( |i| 1_700_000_000.0 + (i as f64) * 437.0).collect();

    for (round_to, width) in [(0.0, 10.0), (0.0, 7.0), (15.0, 60.0), (20.0, 30.0), (5.0, 15.0)] {
        let once = bin_times( &times, round_to, width);
        let twice = bin_times( &once, round_to, width);
        println!("round_to={round_to}, width={width}: {} distinct bins", distinct(&once));
        assert_eq!( once, twice);
    }
}

fn distinct (times: &[f64])->usize {
    let mut v = times.to_vec();
    v.dedup();
    v.len()
}

#[test]
fn test_bin_observation_times () {
    let obs = obs_at_times( &[100.0, f64::NAN, 130.0, 200.0]);
    let binned = bin_observation_times( &obs, 0.0, 1.0);

    assert_eq!( binned.len(), 3);
    assert_eq!( binned.times(), vec![100.0, 100.0, 160.0]);

    // unchanged observations are shared, changed ones are copies
    assert!( Arc::ptr_eq( binned.get(0).unwrap(), obs.get(0).unwrap()));
    assert!( !Arc::ptr_eq( binned.get(1).unwrap(), obs.get(2).unwrap()));
    assert_eq!( binned.get(1).unwrap().location, obs.get(2).unwrap().location);

    // the input is not modified
    assert_eq!( obs.get(2).unwrap().time, 130.0);
}

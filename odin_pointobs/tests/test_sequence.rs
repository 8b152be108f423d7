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

/// tests for time sequencing and spatial subsetting
/// run with "cargo test --test test_sequence -- --nocapture"

use std::sync::Arc;
use odin_pointobs::*;

fn obs (pos_times: &[(f64,f64,f64)])->ObsCollection {
    let schema = ObsSchema::new( vec![ FieldDef::real("rh", Unit::Percent) ]).unwrap();
    let obs = pos_times.iter().enumerate().map( |(i,(lat,lon,t))| {
        Observation::new( EarthLocation::from_lat_lon( *lat, *lon), *t, vec![ FieldValue::Real( i as f64) ])
    }).collect();
    ObsCollection::new( schema, obs).unwrap()
}

#[test]
fn test_grouping () {
    let c = obs( &[ (40.0,-120.0,300.0), (41.0,-121.0,100.0), (42.0,-122.0,300.0), (43.0,-123.0,f64::NAN), (44.0,-124.0,200.0) ]);
    let seq = make_time_sequence( &c, 0);

    println!("slice times: {:?}", seq.times());
    assert_eq!( seq.times(), vec![100.0, 200.0, 300.0]);
    assert_eq!( seq.obs_count(), 4); // the one without time is skipped

    // within a slice the input order is kept
    let s = seq.get(2).unwrap();
    assert_eq!( s.obs.real_values("rh").unwrap(), vec![0.0, 2.0]);

    // observations are shared with the input
    assert!( Arc::ptr_eq( s.obs.get(0).unwrap(), c.get(0).unwrap()));
}

#[test]
fn test_strictly_ascending () {
    let pts: Vec<(f64,f64,f64)> = (0..40).map( |i| (40.0, -120.0, ((i * 7919) % 13) as f64 * 60.0)).collect();
    let seq = make_time_sequence( &obs( &pts), 0);

    let times = seq.times();
    assert!( times.windows(2).all( |w| w[0] < w[1]));
    assert_eq!( seq.obs_count(), 40);
}

#[test]
fn test_lumping () {
    let c = obs( &[ (40.0,-120.0,0.0), (40.0,-120.0,290.0), (40.0,-120.0,310.0), (40.0,-120.0,599.0), (40.0,-120.0,-10.0) ]);
    let seq = make_time_sequence( &c, 5);

    println!("lumped slice times: {:?}", seq.times());
    assert_eq!( seq.times(), vec![-300.0, 0.0, 300.0]);
    assert_eq!( seq.get(1).unwrap().obs.len(), 2);
    assert_eq!( seq.get(2).unwrap().obs.len(), 2);

    // lumped observations carry the slice time
    for slice in seq.iter() {
        assert!( slice.obs.iter().all( |o| o.time == slice.time));
    }
}

#[test]
fn test_single_time () {
    let c = obs( &[ (40.0,-120.0,500.0), (41.0,-121.0,500.0), (42.0,-122.0,500.0) ]);
    let seq = make_time_sequence( &c, 0);
    assert_eq!( seq.len(), 1);
    assert!( seq.get(0).unwrap().obs.shares_observations_with( &c));

    let flat = seq.flatten();
    assert!( flat.shares_observations_with( &c));
}

#[test]
fn test_subset_collection () {
    let c = obs( &[ (40.0,-120.0,0.0), (35.0,-118.0,0.0), (45.0,-100.0,0.0), (37.0,-122.0,0.0) ]);
    let bbox = LatLonBox::new( -123.0, 34.0, -117.0, 41.0);

    let sub = subset_collection( &c, &bbox);
    assert_eq!( sub.len(), 3);
    assert!( sub.iter().all( |o| bbox.contains( o.location.lat, o.location.lon)));

    // everything inside returns the input observations
    let all = subset_collection( &c, &LatLonBox::new( -180.0, -90.0, 180.0, 90.0));
    assert!( all.shares_observations_with( &c));

    // nothing inside returns the sentinel
    let none = subset_collection( &c, &LatLonBox::new( 10.0, 10.0, 20.0, 20.0));
    assert!( none.is_sentinel());
    assert_eq!( none.len(), 1);
    assert!( none.get(0).unwrap().location.is_missing());
}

#[test]
fn test_subset_empty_input () {
    let c = obs( &[]);
    let sub = subset_collection( &c, &LatLonBox::new( -180.0, -90.0, 180.0, 90.0));
    assert!( sub.is_sentinel());
    assert_eq!( sub.len(), 1);
}

#[test]
fn test_subset_antimeridian () {
    let c = obs( &[ (0.0,179.0,0.0), (0.0,-179.0,0.0), (0.0,0.0,0.0), (0.0,181.0,0.0) ]);
    let bbox = LatLonBox::new( 170.0, -10.0, -170.0, 10.0);
    assert!( bbox.crosses_antimeridian());

    let sub = subset_collection( &c, &bbox);
    assert_eq!( sub.real_values("rh").unwrap(), vec![0.0, 1.0, 3.0]);
}

#[test]
fn test_subset_sequence () {
    let c = obs( &[ (40.0,-120.0,0.0), (50.0,-120.0,0.0), (50.0,-120.0,60.0), (40.0,-120.0,120.0) ]);
    let seq = make_time_sequence( &c, 0);
    let bbox = LatLonBox::new( -125.0, 35.0, -115.0, 45.0);

    let ObsData::Sequence(sub) = subset( &ObsData::Sequence( seq.clone()), &bbox) else { panic!("not a sequence") };
    assert_eq!( sub.times(), seq.times());

    assert_eq!( sub.get(0).unwrap().obs.len(), 1);
    assert!( sub.get(1).unwrap().obs.is_sentinel());
    assert!( sub.get(2).unwrap().obs.shares_observations_with( &seq.get(2).unwrap().obs));
}

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

use crate::geo::LatLonBox;
use crate::obs::{ObsCollection, Observation};
use crate::sequence::{ObsData, TimeSequence, TimeSlice};

/// spatial subset of a single collection or of each slice of a time sequence.
/// Never returns an empty collection: if nothing is inside `bbox` (which includes empty input) the result
/// is a singleton with an all-missing observation (see [`ObsCollection::is_sentinel`])
pub fn subset (data: &ObsData, bbox: &LatLonBox)->ObsData {
    match data {
        ObsData::Single(obs) => ObsData::Single( subset_collection( obs, bbox)),
        ObsData::Sequence(seq) => ObsData::Sequence( subset_sequence( seq, bbox))
    }
}

pub fn subset_sequence (seq: &TimeSequence, bbox: &LatLonBox)->TimeSequence {
    let slices = seq.iter().map( |slice| {
        TimeSlice { time: slice.time, obs: subset_collection( &slice.obs, bbox) }
    }).collect();

    TimeSequence::from_slices( seq.schema().clone(), slices)
}

pub fn subset_collection (obs: &ObsCollection, bbox: &LatLonBox)->ObsCollection {
    let matches: Vec<Arc<Observation>> = obs.iter()
        .filter( |o| bbox.contains( o.location.lat, o.location.lon))
        .cloned()
        .collect();

    if matches.is_empty() {
        debug!("no observations inside {}", bbox);
        ObsCollection::sentinel( obs.schema().clone())
    } else if matches.len() == obs.len() {
        obs.clone()
    } else {
        ObsCollection::from_shared( obs.schema().clone(), matches)
    }
}

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

use std::{collections::HashMap, sync::Arc};
use tracing::debug;

use crate::obs::{ObsCollection, ObsSchema, Observation};

/// all observations that share the same (possibly lumped) time
#[derive(Debug,Clone)]
pub struct TimeSlice {
    pub time: f64,
    pub obs: ObsCollection
}

/// time-major view of observations. Slice times are strictly ascending.
/// A single distinct time is just a sequence with one slice
#[derive(Debug,Clone)]
pub struct TimeSequence {
    schema: Arc<ObsSchema>,
    slices: Vec<TimeSlice>
}

impl TimeSequence {
    pub(crate) fn from_slices (schema: Arc<ObsSchema>, slices: Vec<TimeSlice>)->Self {
        TimeSequence { schema, slices }
    }

    pub fn schema (&self)->&Arc<ObsSchema> { &self.schema }
    pub fn len (&self)->usize { self.slices.len() }
    pub fn is_empty (&self)->bool { self.slices.is_empty() }
    pub fn slices (&self)->&[TimeSlice] { &self.slices }
    pub fn iter (&self)->impl Iterator<Item=&TimeSlice> { self.slices.iter() }
    pub fn get (&self, idx: usize)->Option<&TimeSlice> { self.slices.get(idx) }

    pub fn times (&self)->Vec<f64> {
        self.slices.iter().map( |s| s.time).collect()
    }

    /// total number of observations over all slices
    pub fn obs_count (&self)->usize {
        self.slices.iter().map( |s| s.obs.len()).sum()
    }

    /// back to a flat collection in time order
    pub fn flatten (&self)->ObsCollection {
        let obs = self.slices.iter().flat_map( |s| s.obs.observations().iter().cloned()).collect();
        ObsCollection::from_shared( self.schema.clone(), obs)
    }
}

/// the two shapes observation data comes in
#[derive(Debug,Clone)]
pub enum ObsData {
    Single(ObsCollection),
    Sequence(TimeSequence)
}

impl ObsData {
    pub fn schema (&self)->&Arc<ObsSchema> {
        match self {
            ObsData::Single(obs) => obs.schema(),
            ObsData::Sequence(seq) => seq.schema()
        }
    }

    pub fn obs_count (&self)->usize {
        match self {
            ObsData::Single(obs) => obs.len(),
            ObsData::Sequence(seq) => seq.obs_count()
        }
    }

    pub fn is_sequence (&self)->bool { matches!( self, ObsData::Sequence(_)) }
}

impl From<ObsCollection> for ObsData {
    fn from (obs: ObsCollection)->Self { ObsData::Single(obs) }
}

impl From<TimeSequence> for ObsData {
    fn from (seq: TimeSequence)->Self { ObsData::Sequence(seq) }
}

/// group observations by time into an ascending time sequence. If `lump_minutes > 0` times are first truncated
/// to a multiple of that many minutes. Observations without time are skipped
pub fn make_time_sequence (obs: &ObsCollection, lump_minutes: i64)->TimeSequence {
    let lump_secs = if lump_minutes > 0 { (lump_minutes * 60) as f64 } else { 0.0 };

    let mut groups: Vec<(f64,Vec<Arc<Observation>>)> = Vec::new();
    let mut group_idx: HashMap<u64,usize> = HashMap::new();
    let mut n_skipped = 0;

    for o in obs.iter() {
        if !o.has_time() {
            n_skipped += 1;
            continue
        }

        let mut t = o.time;
        if lump_secs > 0.0 {
            t -= t.rem_euclid(lump_secs);
        }
        if t == 0.0 { t = 0.0 } // fold -0.0 into 0.0 so that both get the same key

        let idx = *group_idx.entry( t.to_bits()).or_insert_with( || {
            groups.push( (t, Vec::new()) );
            groups.len() - 1
        });

        let shared = if t == o.time { o.clone() } else { Arc::new( o.with_time(t)) };
        groups[idx].1.push( shared);
    }

    if n_skipped > 0 {
        debug!("skipped {} observations without time", n_skipped);
    }

    groups.sort_by( |a,b| a.0.total_cmp(&b.0)); // stable

    let schema = obs.schema().clone();
    let slices = groups.into_iter().map( |(time,group)| {
        TimeSlice { time, obs: ObsCollection::from_shared( schema.clone(), group) }
    }).collect();

    TimeSequence::from_slices( schema, slices)
}

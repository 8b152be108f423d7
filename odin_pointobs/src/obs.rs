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

//! the point observation data model.
//! An [`ObsCollection`] is an immutable, index addressed list of shared [`Observation`]s that all conform to the
//! same [`ObsSchema`]. Derived collections (binned, subset, merged, sequenced) are new containers that share the
//! `Arc<Observation>` of their source wherever the observation itself is not changed.

use std::{fmt, sync::Arc, collections::HashSet};
use chrono::{DateTime, Utc};
use serde::{Serialize,Deserialize};

use crate::errors::{Result, schema_error, argument_error};
use crate::geo::EarthLocation;
use crate::units::Unit;

/// the value we use for observations without a valid time
pub const MISSING_TIME: f64 = f64::NAN;

/// convert epoch seconds into a DateTime. Returns None for missing or out-of-range times
pub fn epoch_secs_to_datetime (t: f64)->Option<DateTime<Utc>> {
    if t.is_finite() {
        DateTime::<Utc>::from_timestamp_millis( (t * 1000.0).round() as i64)
    } else {
        None
    }
}

pub fn datetime_to_epoch_secs (dt: &DateTime<Utc>)->f64 {
    dt.timestamp_millis() as f64 / 1000.0
}

/* #region schema ***************************************************************************************/

#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
pub enum FieldKind {
    Real(Unit),
    Text
}

#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
pub struct FieldDef {
    pub name: String,
    pub kind: FieldKind
}

impl FieldDef {
    pub fn real (name: impl ToString, unit: Unit)->Self {
        FieldDef { name: name.to_string(), kind: FieldKind::Real(unit) }
    }

    pub fn text (name: impl ToString)->Self {
        FieldDef { name: name.to_string(), kind: FieldKind::Text }
    }

    pub fn is_real (&self)->bool { matches!( self.kind, FieldKind::Real(_)) }

    pub fn unit (&self)->Option<&Unit> {
        if let FieldKind::Real(unit) = &self.kind { Some(unit) } else { None }
    }
}

/// the ordered, fixed value tuple layout shared by all observations of a collection
#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
pub struct ObsSchema {
    fields: Vec<FieldDef>
}

impl ObsSchema {
    pub fn new (fields: Vec<FieldDef>)->Result<Self> {
        let mut seen: HashSet<&str> = HashSet::with_capacity( fields.len());
        for f in &fields {
            if f.name.is_empty() { return Err( schema_error("empty field name")) }
            if !seen.insert( f.name.as_str()) {
                return Err( schema_error( format!("duplicate field name '{}'", f.name)))
            }
        }
        Ok( ObsSchema { fields } )
    }

    pub fn fields (&self)->&[FieldDef] { &self.fields }
    pub fn len (&self)->usize { self.fields.len() }
    pub fn is_empty (&self)->bool { self.fields.is_empty() }

    pub fn index_of (&self, name: &str)->Option<usize> {
        self.fields.iter().position( |f| f.name == name)
    }

    pub fn field (&self, name: &str)->Result<(usize,&FieldDef)> {
        self.index_of(name)
            .map( |i| (i, &self.fields[i]))
            .ok_or_else( || schema_error( format!("unknown field '{}'", name)))
    }

    /// look up a numeric field. Text fields are a schema error
    pub fn real_field (&self, name: &str)->Result<(usize,&Unit)> {
        let (i,fd) = self.field(name)?;
        match &fd.kind {
            FieldKind::Real(unit) => Ok( (i,unit) ),
            FieldKind::Text => Err( schema_error( format!("field '{}' is not numeric", name)))
        }
    }

    /// check shape and kinds of a value tuple
    pub fn validate (&self, values: &[FieldValue])->Result<()> {
        if values.len() != self.fields.len() {
            return Err( schema_error( format!("expected {} values, got {}", self.fields.len(), values.len())))
        }
        for (fd,v) in self.fields.iter().zip( values.iter()) {
            match (&fd.kind, v) {
                (FieldKind::Real(_), FieldValue::Real(_)) | (FieldKind::Text, FieldValue::Text(_)) => {}
                _ => return Err( schema_error( format!("value kind mismatch for field '{}'", fd.name)))
            }
        }
        Ok(())
    }

    /// a value tuple with all values missing
    pub fn missing_values (&self)->Vec<FieldValue> {
        self.fields.iter().map( |fd| match fd.kind {
            FieldKind::Real(_) => FieldValue::Real(f64::NAN),
            FieldKind::Text => FieldValue::Text(String::new())
        }).collect()
    }
}

/* #endregion schema */

/* #region observation **********************************************************************************/

#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
pub enum FieldValue {
    Real(f64),
    Text(String)
}

impl FieldValue {
    pub fn as_real (&self)->Option<f64> {
        if let FieldValue::Real(v) = self { Some(*v) } else { None }
    }

    pub fn as_text (&self)->Option<&str> {
        if let FieldValue::Text(s) = self { Some(s.as_str()) } else { None }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Real(v) => write!(f, "{}", v),
            FieldValue::Text(s) => write!(f, "{}", s)
        }
    }
}

/// a single point measurement: location + time (epoch seconds, NaN if missing) + value tuple
#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
pub struct Observation {
    pub location: EarthLocation,
    pub time: f64,
    pub values: Vec<FieldValue>
}

impl Observation {
    pub fn new (location: EarthLocation, time: f64, values: Vec<FieldValue>)->Self {
        Observation { location, time, values }
    }

    /// the all-missing observation for a given schema
    pub fn missing (schema: &ObsSchema)->Self {
        Observation { location: EarthLocation::missing(), time: MISSING_TIME, values: schema.missing_values() }
    }

    pub fn has_time (&self)->bool { !self.time.is_nan() }

    pub fn is_missing (&self)->bool {
        self.location.is_missing() && !self.has_time() && self.values.iter().all( |v| match v {
            FieldValue::Real(x) => x.is_nan(),
            FieldValue::Text(s) => s.is_empty()
        })
    }

    pub fn date (&self)->Option<DateTime<Utc>> { epoch_secs_to_datetime( self.time) }

    /// a copy of this observation with a different time
    pub fn with_time (&self, time: f64)->Self {
        Observation { location: self.location, time, values: self.values.clone() }
    }
}

/// a value with its field name, used to establish and check schemas from raw input records
#[derive(Debug,Clone,PartialEq)]
pub struct NamedValue {
    pub name: String,
    pub value: FieldValue,
    pub unit: Option<Unit>
}

impl NamedValue {
    pub fn real (name: impl ToString, value: f64, unit: Unit)->Self {
        NamedValue { name: name.to_string(), value: FieldValue::Real(value), unit: Some(unit) }
    }

    pub fn text (name: impl ToString, value: impl ToString)->Self {
        NamedValue { name: name.to_string(), value: FieldValue::Text(value.to_string()), unit: None }
    }
}

/* #endregion observation */

/* #region collection ***********************************************************************************/

#[derive(Debug,Clone)]
pub struct ObsCollection {
    schema: Arc<ObsSchema>,
    obs: Vec<Arc<Observation>>
}

impl ObsCollection {
    /// create a collection from observations that are checked against the given schema
    pub fn new (schema: impl Into<Arc<ObsSchema>>, observations: Vec<Observation>)->Result<Self> {
        let schema = schema.into();
        let mut obs = Vec::with_capacity( observations.len());
        for o in observations {
            schema.validate( &o.values)?;
            obs.push( Arc::new(o));
        }
        Ok( ObsCollection { schema, obs } )
    }

    /// this does not validate - it is only used for observations that come out of validated collections
    pub(crate) fn from_shared (schema: Arc<ObsSchema>, obs: Vec<Arc<Observation>>)->Self {
        ObsCollection { schema, obs }
    }

    /// the singleton "no match" collection that has one all-missing observation
    pub fn sentinel (schema: Arc<ObsSchema>)->Self {
        let o = Observation::missing( &schema);
        ObsCollection { schema, obs: vec![ Arc::new(o) ] }
    }

    pub fn schema (&self)->&Arc<ObsSchema> { &self.schema }
    pub fn len (&self)->usize { self.obs.len() }
    pub fn is_empty (&self)->bool { self.obs.is_empty() }
    pub fn get (&self, idx: usize)->Option<&Arc<Observation>> { self.obs.get(idx) }
    pub fn observations (&self)->&[Arc<Observation>] { &self.obs }
    pub fn iter (&self)->impl Iterator<Item=&Arc<Observation>> { self.obs.iter() }

    pub fn is_sentinel (&self)->bool {
        self.obs.len() == 1 && self.obs[0].is_missing()
    }

    /// do both collections hold the very same observation objects in the same order
    pub fn shares_observations_with (&self, other: &ObsCollection)->bool {
        self.obs.len() == other.obs.len() && self.obs.iter().zip( other.obs.iter()).all( |(a,b)| Arc::ptr_eq(a,b))
    }

    pub fn times (&self)->Vec<f64> {
        self.obs.iter().map( |o| o.time).collect()
    }

    pub fn locations (&self)->Vec<EarthLocation> {
        self.obs.iter().map( |o| o.location).collect()
    }

    /// min/max of the non-missing observation times
    pub fn time_range (&self)->Option<(f64,f64)> {
        self.obs.iter().filter( |o| o.has_time()).fold( None, |acc, o| match acc {
            None => Some( (o.time, o.time) ),
            Some((t0,t1)) => Some( (t0.min(o.time), t1.max(o.time)) )
        })
    }

    /// all values of a numeric field, in the unit of the schema
    pub fn real_values (&self, name: &str)->Result<Vec<f64>> {
        let (idx,_) = self.schema.real_field(name)?;
        Ok( self.obs.iter().map( |o| o.values[idx].as_real().unwrap_or(f64::NAN)).collect() )
    }

    pub fn text_values (&self, name: &str)->Result<Vec<&str>> {
        let (idx,fd) = self.schema.field(name)?;
        if fd.is_real() { return Err( schema_error( format!("field '{}' is not text", name))) }
        Ok( self.obs.iter().map( |o| o.values[idx].as_text().unwrap_or("")).collect() )
    }

    /// project onto a sub-schema with the given field names (in the given order)
    pub fn select_fields (&self, names: &[&str])->Result<ObsCollection> {
        let mut idxs: Vec<usize> = Vec::with_capacity( names.len());
        let mut fields: Vec<FieldDef> = Vec::with_capacity( names.len());
        for name in names {
            let (i,fd) = self.schema.field(name)?;
            idxs.push(i);
            fields.push( fd.clone());
        }
        let schema = Arc::new( ObsSchema::new(fields)?);

        let obs = self.obs.iter().map( |o| {
            let values = idxs.iter().map( |i| o.values[*i].clone()).collect();
            Arc::new( Observation::new( o.location, o.time, values))
        }).collect();

        Ok( ObsCollection { schema, obs } )
    }
}

/// concatenate collections that share the same schema
pub fn merge (collections: &[ObsCollection])->Result<ObsCollection> {
    let first = collections.first().ok_or_else( || argument_error("no collections to merge"))?;

    let n: usize = collections.iter().map( |c| c.len()).sum();
    let mut obs: Vec<Arc<Observation>> = Vec::with_capacity(n);
    for c in collections {
        if *c.schema != *first.schema {
            return Err( schema_error("cannot merge collections with different schemas"))
        }
        obs.extend( c.obs.iter().cloned());
    }

    Ok( ObsCollection { schema: first.schema.clone(), obs } )
}

/// incrementally build a collection. If no schema is given the first observation added through
/// [`ObsCollectionBuilder::add_named`] establishes it
#[derive(Debug,Default)]
pub struct ObsCollectionBuilder {
    schema: Option<Arc<ObsSchema>>,
    obs: Vec<Arc<Observation>>
}

impl ObsCollectionBuilder {
    pub fn new ()->Self { Self::default() }

    pub fn with_schema (schema: impl Into<Arc<ObsSchema>>)->Self {
        ObsCollectionBuilder { schema: Some(schema.into()), obs: Vec::new() }
    }

    pub fn schema (&self)->Option<&Arc<ObsSchema>> { self.schema.as_ref() }
    pub fn len (&self)->usize { self.obs.len() }
    pub fn is_empty (&self)->bool { self.obs.is_empty() }

    /// add a positional value tuple. Requires a schema
    pub fn push (&mut self, obs: Observation)->Result<()> {
        let schema = self.schema.as_ref().ok_or_else( || schema_error("no schema established"))?;
        schema.validate( &obs.values)?;
        self.obs.push( Arc::new(obs));
        Ok(())
    }

    /// add an observation given as named values. Numeric values with a unit that differs from (but is convertible to)
    /// the schema unit are converted
    pub fn add_named (&mut self, location: EarthLocation, time: f64, named: Vec<NamedValue>)->Result<()> {
        let schema = match &self.schema {
            Some(schema) => schema.clone(),
            None => {
                let fields = named.iter().map( |nv| match &nv.value {
                    FieldValue::Real(_) => FieldDef::real( &nv.name, nv.unit.clone().unwrap_or_default()),
                    FieldValue::Text(_) => FieldDef::text( &nv.name)
                }).collect();
                let schema = Arc::new( ObsSchema::new( fields)?);
                self.schema = Some( schema.clone());
                schema
            }
        };

        if named.len() != schema.len() {
            return Err( schema_error( format!("expected {} values, got {}", schema.len(), named.len())))
        }

        let mut values: Vec<FieldValue> = Vec::with_capacity( named.len());
        for (fd,nv) in schema.fields().iter().zip( named.into_iter()) {
            if fd.name != nv.name {
                return Err( schema_error( format!("expected field '{}', got '{}'", fd.name, nv.name)))
            }
            let v = match (&fd.kind, nv.value) {
                (FieldKind::Real(unit), FieldValue::Real(x)) => {
                    match &nv.unit {
                        Some(u) if u != unit => FieldValue::Real( u.convert( x, unit)?),
                        _ => FieldValue::Real(x)
                    }
                }
                (FieldKind::Text, FieldValue::Text(s)) => FieldValue::Text(s),
                _ => return Err( schema_error( format!("value kind mismatch for field '{}'", fd.name)))
            };
            values.push(v);
        }

        self.obs.push( Arc::new( Observation::new( location, time, values)));
        Ok(())
    }

    pub fn build (self)->Result<ObsCollection> {
        let schema = self.schema.ok_or_else( || schema_error("no observations to establish schema"))?;
        Ok( ObsCollection { schema, obs: self.obs } )
    }
}

/* #endregion collection */

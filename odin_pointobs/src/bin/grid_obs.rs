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

use std::{fs::File, io::{self, Write}, path::PathBuf};
use anyhow::{anyhow, Result};
use chrono::DateTime;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use odin_pointobs::{
    EarthLocation, FieldDef, FieldValue, Grid, ObsCollection, ObsData, ObsSchema, Observation, PointObsConfig, Unit,
    MISSING_TIME, barnes, bin_observation_times, make_time_sequence, subset
};

#[derive(Parser, Debug)]
#[command(version, about, long_about = "bin, sequence and grid point observations read from a CSV file")]
pub struct Args {
    /// RON file with a PointObsConfig (defaults are used if not set)
    #[arg(short,long)]
    pub config: Option<PathBuf>,

    /// name of the numeric CSV column to analyze
    #[arg(short,long)]
    pub variable: String,

    /// output file for the JSON grids (stdout if not set)
    #[arg(short,long)]
    pub output: Option<PathBuf>,

    /// CSV file with 'lat,lon,alt,time' columns followed by value columns named 'name' or 'name[unit]'
    pub input: PathBuf,
}

fn main()->Result<()> {
    tracing_subscriber::fmt().with_env_filter( EnvFilter::from_default_env()).init();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => PointObsConfig::load(path)?,
        None => PointObsConfig::default()
    };

    let obs = read_csv_obs( &args.input)?;
    info!("read {} observations from {:?}", obs.len(), args.input);

    let binned = bin_observation_times( &obs, config.bin_round_to, config.bin_width);
    let seq = make_time_sequence( &binned, config.lump_minutes);
    info!("{} time slices", seq.len());

    let mut data = ObsData::Sequence(seq);
    if let Some(bbox) = &config.bbox {
        data = subset( &data, bbox);
    }

    let result = barnes( &data, &args.variable, &config.barnes, None, None)?;
    let grids: Vec<Grid> = result.into_grids();
    info!("computed {} grids", grids.len());

    match &args.output {
        Some(path) => serde_json::to_writer( File::create(path)?, &grids)?,
        None => {
            let mut stdout = io::stdout().lock();
            serde_json::to_writer_pretty( &mut stdout, &grids)?;
            writeln!( stdout)?;
        }
    }

    Ok(())
}

/// split a 'name[unit]' column header
fn parse_header (h: &str)->(String,Option<Unit>) {
    if let (Some(i0), true) = (h.find('['), h.ends_with(']')) {
        (h[..i0].trim().to_string(), Some( Unit::parse( &h[i0+1..h.len()-1])))
    } else {
        (h.trim().to_string(), None)
    }
}

fn parse_time (s: &str)->Result<f64> {
    let s = s.trim();
    if s.is_empty() {
        Ok(MISSING_TIME)
    } else if let Ok(secs) = s.parse::<f64>() {
        Ok(secs)
    } else {
        let dt = DateTime::parse_from_rfc3339(s)?;
        Ok( dt.timestamp_millis() as f64 / 1000.0)
    }
}

fn parse_real (s: &str)->Option<f64> {
    let s = s.trim();
    if s.is_empty() { Some(f64::NAN) } else { s.parse::<f64>().ok() }
}

/// columns are numeric if all their non-empty entries parse as numbers
fn read_csv_obs (path: &PathBuf)->Result<ObsCollection> {
    let mut reader = csv::Reader::from_path(path)?;
    let headers = reader.headers()?.clone();
    if headers.len() < 5 {
        return Err( anyhow!("expected 'lat,lon,alt,time' plus at least one value column"))
    }

    let records: Vec<csv::StringRecord> = reader.records().collect::<std::result::Result<_,_>>()?;

    let mut fields: Vec<FieldDef> = Vec::with_capacity( headers.len() - 4);
    for (i,h) in headers.iter().enumerate().skip(4) {
        let (name,unit) = parse_header(h);
        let is_real = records.iter().all( |r| r.get(i).map( |s| parse_real(s).is_some()).unwrap_or(true));
        if is_real {
            fields.push( FieldDef::real( name, unit.unwrap_or_default()));
        } else {
            fields.push( FieldDef::text( name));
        }
    }
    let schema = ObsSchema::new(fields)?;

    let mut observations: Vec<Observation> = Vec::with_capacity( records.len());
    for r in &records {
        let get = |i: usize| r.get(i).unwrap_or("");
        let lat = parse_real( get(0)).ok_or_else( || anyhow!("invalid latitude '{}'", get(0)))?;
        let lon = parse_real( get(1)).ok_or_else( || anyhow!("invalid longitude '{}'", get(1)))?;
        let alt = parse_real( get(2)).unwrap_or(0.0);
        let time = parse_time( get(3))?;

        let values = schema.fields().iter().enumerate().map( |(j,fd)| {
            let s = get(j+4);
            if fd.is_real() { FieldValue::Real( parse_real(s).unwrap_or(f64::NAN)) } else { FieldValue::Text( s.to_string()) }
        }).collect();

        let alt = if alt.is_nan() { 0.0 } else { alt };
        observations.push( Observation::new( EarthLocation::new( lat, lon, alt), time, values));
    }

    Ok( ObsCollection::new( schema, observations)?)
}

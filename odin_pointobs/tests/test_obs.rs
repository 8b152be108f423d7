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

/// tests for the observation data model, units and config
/// run with "cargo test --test test_obs -- --nocapture"

use odin_pointobs::*;

fn station_record (temp: f64, unit: Unit, station: &str)->Vec<NamedValue> {
    vec![ NamedValue::real("temp", temp, unit), NamedValue::text("station", station) ]
}

#[test]
fn test_builder_establishes_schema () {
    let mut builder = ObsCollectionBuilder::new();
    builder.add_named( EarthLocation::from_lat_lon( 37.0, -122.0), 0.0, station_record( 20.0, Unit::Celsius, "KSJC")).unwrap();
    builder.add_named( EarthLocation::from_lat_lon( 38.0, -121.0), 60.0, station_record( 283.15, Unit::Kelvin, "KSAC")).unwrap();

    let obs = builder.build().unwrap();
    let schema = obs.schema();
    println!("schema: {:?}", schema);
    assert_eq!( schema.len(), 2);
    assert_eq!( schema.real_field("temp").unwrap(), (0, &Unit::Celsius));
    assert!( !schema.fields()[1].is_real());

    let temps = obs.real_values("temp").unwrap();
    assert_eq!( temps[0], 20.0);
    assert!( (temps[1] - 10.0).abs() < 1e-9);
    assert_eq!( obs.text_values("station").unwrap(), vec!["KSJC", "KSAC"]);
    assert_eq!( obs.time_range(), Some((0.0, 60.0)));
}

#[test]
fn test_builder_mismatch () {
    let mut builder = ObsCollectionBuilder::new();
    let loc = EarthLocation::from_lat_lon( 37.0, -122.0);
    builder.add_named( loc, 0.0, station_record( 20.0, Unit::Celsius, "KSJC")).unwrap();

    // wrong arity
    let res = builder.add_named( loc, 0.0, vec![ NamedValue::real("temp", 1.0, Unit::Celsius) ]);
    assert!( matches!( res, Err(OdinPointObsError::SchemaError(_))));

    // wrong order
    let res = builder.add_named( loc, 0.0, vec![ NamedValue::text("station", "X"), NamedValue::real("temp", 1.0, Unit::Celsius) ]);
    assert!( matches!( res, Err(OdinPointObsError::SchemaError(_))));

    // wrong kind
    let res = builder.add_named( loc, 0.0, vec![ NamedValue::text("temp", "warm"), NamedValue::text("station", "X") ]);
    assert!( matches!( res, Err(OdinPointObsError::SchemaError(_))));

    // unit that is not convertible
    let res = builder.add_named( loc, 0.0, station_record( 1000.0, Unit::Hectopascal, "X"));
    assert!( matches!( res, Err(OdinPointObsError::SchemaError(_))));

    assert_eq!( builder.len(), 1);
}

#[test]
fn test_positional_validation () {
    let schema = ObsSchema::new( vec![ FieldDef::real("wspd", Unit::Knot), FieldDef::text("id") ]).unwrap();
    let loc = EarthLocation::from_lat_lon( 0.0, 0.0);

    let ok = Observation::new( loc, 0.0, vec![ FieldValue::Real(5.0), FieldValue::Text("a".into()) ]);
    let bad = Observation::new( loc, 0.0, vec![ FieldValue::Text("a".into()), FieldValue::Real(5.0) ]);

    assert!( ObsCollection::new( schema.clone(), vec![ ok.clone() ]).is_ok());
    assert!( ObsCollection::new( schema.clone(), vec![ ok, bad ]).is_err());

    let dup = ObsSchema::new( vec![ FieldDef::real("a", Unit::Meter), FieldDef::text("a") ]);
    assert!( matches!( dup, Err(OdinPointObsError::SchemaError(_))));
}

#[test]
fn test_merge_and_select () {
    let schema = ObsSchema::new( vec![ FieldDef::real("p", Unit::Hectopascal), FieldDef::real("t", Unit::Kelvin) ]).unwrap();
    let mk = |t: f64| Observation::new( EarthLocation::from_lat_lon( 10.0, 20.0), t, vec![ FieldValue::Real(1000.0), FieldValue::Real(t) ]);

    let a = ObsCollection::new( schema.clone(), vec![ mk(1.0), mk(2.0) ]).unwrap();
    let b = ObsCollection::new( schema.clone(), vec![ mk(3.0) ]).unwrap();
    let merged = merge( &[a.clone(), b]).unwrap();
    assert_eq!( merged.times(), vec![1.0, 2.0, 3.0]);

    let other = ObsCollection::new( ObsSchema::new( vec![ FieldDef::real("p", Unit::Pascal) ]).unwrap(), vec![]).unwrap();
    assert!( matches!( merge( &[a.clone(), other]), Err(OdinPointObsError::SchemaError(_))));
    assert!( matches!( merge( &[]), Err(OdinPointObsError::ArgumentError(_))));

    let t_only = merged.select_fields( &["t"]).unwrap();
    assert_eq!( t_only.schema().len(), 1);
    assert_eq!( t_only.real_values("t").unwrap(), vec![1.0, 2.0, 3.0]);
    assert!( t_only.select_fields( &["p"]).is_err());
}

#[test]
fn test_unit_conversion () {
    let c = Unit::Fahrenheit.convert( 212.0, &Unit::Celsius).unwrap();
    assert!( (c - 100.0).abs() < 1e-9);

    let m = Unit::Foot.convert( 1000.0, &Unit::Meter).unwrap();
    assert!( (m - 304.8).abs() < 1e-9);

    let pa = Unit::Millibar.convert( 1013.25, &Unit::Hectopascal).unwrap();
    assert!( (pa - 1013.25).abs() < 1e-9);

    let kt = Unit::MeterPerSecond.convert_all( &[0.0, 1.0, f64::NAN], &Unit::Knot).unwrap();
    assert!( (kt[1] - 1.943844).abs() < 1e-6);
    assert!( kt[2].is_nan());

    assert!( !Unit::GeopotentialMeter.is_convertible_to( &Unit::Meter));
    assert!( Unit::Other("furlong".into()).convert( 1.0, &Unit::Meter).is_err());
    assert_eq!( Unit::parse("kts"), Unit::Knot);
}

#[test]
fn test_config () {
    let input = r#"(
        bin_round_to: 15.0,
        bin_width: 30.0,
        bbox: Some((west: -125.0, south: 32.0, east: -114.0, north: 42.0)),
        barnes: (
            spacing: Explicit(x: 0.25, y: 0.25),
            num_passes: 3,
        ),
    )"#;

    let config = PointObsConfig::from_ron_str( input).unwrap();
    println!("config: {config:?}");
    assert_eq!( config.bin_width, 30.0);
    assert_eq!( config.lump_minutes, 0);
    assert_eq!( config.bbox, Some( LatLonBox::new( -125.0, 32.0, -114.0, 42.0)));
    assert_eq!( config.barnes.spacing, GridSpacing::Explicit{ x: 0.25, y: 0.25 });
    assert_eq!( config.barnes.num_passes, 3);
    assert_eq!( config.barnes.gain, 1.0);
    assert!( config.barnes.validate().is_ok());

    // config boxes are normalized like constructed ones
    let config = PointObsConfig::from_ron_str( "(bbox: Some((west: 170.0, south: -10.0, east: 200.0, north: 10.0)))").unwrap();
    let bbox = config.bbox.unwrap();
    assert_eq!( bbox, LatLonBox::new( 170.0, -10.0, -160.0, 10.0));
    assert!( bbox.crosses_antimeridian());
    assert!( bbox.contains( 0.0, -170.0));
    assert!( bbox.contains( 0.0, 190.0));

    assert!( PointObsConfig::from_ron_str( "(bin_width: \"wide\")").is_err());
    assert_eq!( PointObsConfig::from_ron_str( "()").unwrap(), PointObsConfig::default());
}

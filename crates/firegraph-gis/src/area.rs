//! Area unit conversions.
//!
//! Geometry areas are carried in square meters throughout the engine;
//! reporting surfaces want acres.

const ACRES_PER_SQUARE_METER: f64 = 0.000_247_105_381;
const SQUARE_METERS_PER_ACRE: f64 = 4046.856_42;

pub fn square_meters_to_acres(area_meters: f64) -> f64 {
  area_meters * ACRES_PER_SQUARE_METER
}

pub fn acres_to_square_meters(area_acres: f64) -> f64 {
  area_acres * SQUARE_METERS_PER_ACRE
}

//! Polygonal union primitives.
//!
//! The aggregation engine unions clump and event outlines constantly, and
//! every call site shares the same contract: the result must reduce to a
//! Polygon or MultiPolygon. [`union_all`] performs the union; callers pass
//! its output through [`to_multi_polygon`] to enforce the contract.

use geo::{BooleanOps, BoundingRect, Geometry, GeometryCollection, MultiPolygon, Rect};
use tracing::{debug, error};

use crate::error::{Error, Result};

/// Union an ordered sequence of geometries into a single geometry.
///
/// A single-element input is returned unchanged, whatever its type. If any
/// input is non-polygonal no polygonal union exists; the inputs are returned
/// as a `GeometryCollection` so that [`to_multi_polygon`] can report the
/// failure with the offending type named.
pub fn union_all<'a, I>(shapes: I) -> Result<Geometry<f64>>
where
  I: IntoIterator<Item = &'a Geometry<f64>>,
{
  let shapes: Vec<&Geometry<f64>> = shapes.into_iter().collect();
  if shapes.is_empty() {
    return Err(Error::EmptyUnion);
  }
  if shapes.len() == 1 {
    return Ok(shapes[0].clone());
  }

  let mut polys: Vec<MultiPolygon<f64>> = Vec::with_capacity(shapes.len());
  for shape in &shapes {
    match as_multi_polygon(shape) {
      Some(mp) => polys.push(mp),
      None => {
        debug!(
          kind = geometry_kind(shape),
          "non-polygonal input to union"
        );
        let geoms = shapes.iter().map(|g| (*g).clone()).collect();
        return Ok(Geometry::GeometryCollection(GeometryCollection(geoms)));
      }
    }
  }

  let mut iter = polys.into_iter();
  let Some(mut acc) = iter.next() else {
    return Err(Error::EmptyUnion);
  };
  for poly in iter {
    acc = acc.union(&poly);
  }
  Ok(Geometry::MultiPolygon(acc))
}

/// Union exactly two geometries. Convenience wrapper over [`union_all`].
pub fn union(a: &Geometry<f64>, b: &Geometry<f64>) -> Result<Geometry<f64>> {
  union_all([a, b])
}

/// Reduce a geometry to a `MultiPolygon`, or fail naming the actual type.
pub fn to_multi_polygon(geom: &Geometry<f64>) -> Result<MultiPolygon<f64>> {
  match as_multi_polygon(geom) {
    Some(mp) => Ok(mp),
    None => {
      let found = geometry_kind(geom);
      error!(found, "expected Polygon or MultiPolygon from union");
      Err(Error::NonPolygonal { found })
    }
  }
}

/// The bounding rectangle of a multipolygon.
pub fn envelope(shape: &MultiPolygon<f64>) -> Result<Rect<f64>> {
  shape.bounding_rect().ok_or(Error::EmptyEnvelope)
}

/// Human-readable name of a geometry's variant, for diagnostics.
pub fn geometry_kind(geom: &Geometry<f64>) -> &'static str {
  match geom {
    Geometry::Point(_) => "Point",
    Geometry::Line(_) => "Line",
    Geometry::LineString(_) => "LineString",
    Geometry::Polygon(_) => "Polygon",
    Geometry::MultiPoint(_) => "MultiPoint",
    Geometry::MultiLineString(_) => "MultiLineString",
    Geometry::MultiPolygon(_) => "MultiPolygon",
    Geometry::GeometryCollection(_) => "GeometryCollection",
    Geometry::Rect(_) => "Rect",
    Geometry::Triangle(_) => "Triangle",
  }
}

fn as_multi_polygon(geom: &Geometry<f64>) -> Option<MultiPolygon<f64>> {
  match geom {
    Geometry::Polygon(p) => Some(MultiPolygon::new(vec![p.clone()])),
    Geometry::MultiPolygon(mp) => Some(mp.clone()),
    _ => None,
  }
}

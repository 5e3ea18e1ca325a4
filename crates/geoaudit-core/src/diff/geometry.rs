//! Geometry comparison.
//!
//! GeoJSON objects are parsed into `geo` geometries by hand so malformed
//! input (short rings, open rings, bad positions) surfaces as a
//! [`GeometryParseError`] instead of a panic inside the geometry library.
//! Equality is topological (DE-9IM equals); displacement is the discrete
//! Hausdorff distance in the coordinates' own units.

use crate::diff::model::GeometryChange;
use geo::{
    Coord, CoordsIter, Geometry, GeometryCollection, HausdorffDistance, LineString, MultiLineString,
    MultiPoint, MultiPolygon, Point, Polygon, Relate,
};
use serde_json::Value;
use std::panic::{catch_unwind, AssertUnwindSafe};
use thiserror::Error;

/// Why a GeoJSON geometry could not be interpreted.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryParseError {
    #[error("geometry must be a JSON object")]
    NotAnObject,

    #[error("geometry has no 'type' member")]
    MissingType,

    #[error("unsupported geometry type: {0}")]
    UnsupportedType(String),

    #[error("{geom_type} has no '{member}' member")]
    MissingMember {
        geom_type: String,
        member: &'static str,
    },

    #[error("invalid position: {0}")]
    InvalidPosition(String),

    #[error("{what} needs at least {min} positions, got {got}")]
    TooFewPositions {
        what: &'static str,
        min: usize,
        got: usize,
    },

    #[error("polygon ring is not closed")]
    UnclosedRing,

    #[error("polygon has no rings")]
    EmptyPolygon,

    #[error("geometry comparison failed: {0}")]
    Comparison(String),
}

type ParseResult<T> = std::result::Result<T, GeometryParseError>;

/// Parse a GeoJSON geometry object.
///
/// # Errors
///
/// Any structural problem is reported as a [`GeometryParseError`].
pub fn parse_geometry(value: &Value) -> ParseResult<Geometry<f64>> {
    let obj = value.as_object().ok_or(GeometryParseError::NotAnObject)?;
    let geom_type = obj
        .get("type")
        .and_then(Value::as_str)
        .ok_or(GeometryParseError::MissingType)?;

    if geom_type == "GeometryCollection" {
        let members = obj
            .get("geometries")
            .and_then(Value::as_array)
            .ok_or_else(|| GeometryParseError::MissingMember {
                geom_type: geom_type.to_string(),
                member: "geometries",
            })?;
        let geometries = members
            .iter()
            .map(parse_geometry)
            .collect::<ParseResult<Vec<_>>>()?;
        return Ok(Geometry::GeometryCollection(GeometryCollection(geometries)));
    }

    let coords = obj
        .get("coordinates")
        .ok_or_else(|| GeometryParseError::MissingMember {
            geom_type: geom_type.to_string(),
            member: "coordinates",
        })?;

    let geometry = match geom_type {
        "Point" => Geometry::Point(Point(parse_position(coords)?)),
        "MultiPoint" => Geometry::MultiPoint(MultiPoint::new(
            array(coords)?
                .iter()
                .map(|p| parse_position(p).map(Point))
                .collect::<ParseResult<Vec<_>>>()?,
        )),
        "LineString" => Geometry::LineString(parse_line(coords)?),
        "MultiLineString" => Geometry::MultiLineString(MultiLineString::new(
            array(coords)?
                .iter()
                .map(parse_line)
                .collect::<ParseResult<Vec<_>>>()?,
        )),
        "Polygon" => Geometry::Polygon(parse_polygon(coords)?),
        "MultiPolygon" => Geometry::MultiPolygon(MultiPolygon::new(
            array(coords)?
                .iter()
                .map(parse_polygon)
                .collect::<ParseResult<Vec<_>>>()?,
        )),
        other => return Err(GeometryParseError::UnsupportedType(other.to_string())),
    };
    Ok(geometry)
}

fn array(value: &Value) -> ParseResult<&Vec<Value>> {
    value
        .as_array()
        .ok_or_else(|| GeometryParseError::InvalidPosition(format!("expected array, got {}", value)))
}

fn parse_position(value: &Value) -> ParseResult<Coord<f64>> {
    let items = array(value)?;
    if items.len() < 2 {
        return Err(GeometryParseError::InvalidPosition(value.to_string()));
    }
    let x = items[0].as_f64();
    let y = items[1].as_f64();
    match (x, y) {
        (Some(x), Some(y)) if x.is_finite() && y.is_finite() => Ok(Coord { x, y }),
        _ => Err(GeometryParseError::InvalidPosition(value.to_string())),
    }
}

fn parse_positions(value: &Value) -> ParseResult<Vec<Coord<f64>>> {
    array(value)?.iter().map(parse_position).collect()
}

fn parse_line(value: &Value) -> ParseResult<LineString<f64>> {
    let coords = parse_positions(value)?;
    if coords.len() < 2 {
        return Err(GeometryParseError::TooFewPositions {
            what: "LineString",
            min: 2,
            got: coords.len(),
        });
    }
    Ok(LineString::new(coords))
}

fn parse_ring(value: &Value) -> ParseResult<LineString<f64>> {
    let coords = parse_positions(value)?;
    if coords.len() < 4 {
        return Err(GeometryParseError::TooFewPositions {
            what: "polygon ring",
            min: 4,
            got: coords.len(),
        });
    }
    if coords.first() != coords.last() {
        return Err(GeometryParseError::UnclosedRing);
    }
    Ok(LineString::new(coords))
}

fn parse_polygon(value: &Value) -> ParseResult<Polygon<f64>> {
    let mut rings = array(value)?
        .iter()
        .map(parse_ring)
        .collect::<ParseResult<Vec<_>>>()?
        .into_iter();
    let exterior = rings.next().ok_or(GeometryParseError::EmptyPolygon)?;
    Ok(Polygon::new(exterior, rings.collect()))
}

/// GeoJSON type name of a parsed geometry.
pub fn geom_type_name(geometry: &Geometry<f64>) -> &'static str {
    match geometry {
        Geometry::Point(_) => "Point",
        Geometry::Line(_) | Geometry::LineString(_) => "LineString",
        Geometry::Polygon(_) | Geometry::Rect(_) | Geometry::Triangle(_) => "Polygon",
        Geometry::MultiPoint(_) => "MultiPoint",
        Geometry::MultiLineString(_) => "MultiLineString",
        Geometry::MultiPolygon(_) => "MultiPolygon",
        Geometry::GeometryCollection(_) => "GeometryCollection",
    }
}

/// Compare two optional GeoJSON geometries.
///
/// Returns `None` when both are absent (null or `{}`) or both are
/// topologically equal.
/// Parse or comparison failures become [`GeometryChange::Unmeasured`]; this
/// function never fails.
pub fn geometry_diff(old: Option<&Value>, new: Option<&Value>) -> Option<GeometryChange> {
    let old = old.filter(|v| !is_absent(v));
    let new = new.filter(|v| !is_absent(v));

    match (old, new) {
        (None, None) => None,
        (Some(_), None) | (None, Some(_)) => Some(GeometryChange::AddedOrRemoved),
        (Some(old), Some(new)) => match measure(old, new) {
            Ok(change) => change,
            Err(e) => Some(GeometryChange::Unmeasured {
                error: e.to_string(),
            }),
        },
    }
}

/// Null and `{}` both mean "no geometry".
fn is_absent(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Object(members) => members.is_empty(),
        _ => false,
    }
}

fn measure(old: &Value, new: &Value) -> ParseResult<Option<GeometryChange>> {
    let a = parse_geometry(old)?;
    let b = parse_geometry(new)?;

    match (a.coords_count() == 0, b.coords_count() == 0) {
        (true, true) => return Ok(None),
        (true, false) | (false, true) => {
            return Err(GeometryParseError::Comparison(
                "hausdorff distance undefined for empty geometry".to_string(),
            ))
        }
        (false, false) => {}
    }

    // geo's relate can panic on degenerate input that still parses
    let (equal, distance) = catch_unwind(AssertUnwindSafe(|| {
        let equal = a.relate(&b).is_equal_topo();
        let distance = if equal { 0.0 } else { a.hausdorff_distance(&b) };
        (equal, distance)
    }))
    .map_err(|_| GeometryParseError::Comparison("geometry engine panicked".to_string()))?;

    if equal {
        return Ok(None);
    }
    if !distance.is_finite() {
        return Err(GeometryParseError::Comparison(format!(
            "non-finite hausdorff distance: {}",
            distance
        )));
    }

    Ok(Some(GeometryChange::Measured {
        hausdorff_distance: distance,
        geom_type_old: geom_type_name(&a).to_string(),
        geom_type_new: geom_type_name(&b).to_string(),
    }))
}

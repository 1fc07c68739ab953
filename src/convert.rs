use geo::algorithm::geodesic_area::GeodesicArea;
use geo::{BoundingRect, Coord, Geodesic, Length, LineString, MultiPoint, MultiPolygon, Point, Polygon};

use crate::ParsedKml;
use crate::geometry::{Geometry, Shape};
use crate::point::{Coordinate, LatLngBounds};

// geo works in (x, y) = (lon, lat).
impl From<&Coordinate> for Coord<f64> {
    fn from(c: &Coordinate) -> Self {
        Coord { x: c.lon, y: c.lat }
    }
}

fn ring(coords: &[Coordinate]) -> LineString<f64> {
    coords.iter().map(|c| Coord::<f64>::from(c)).collect::<Vec<_>>().into()
}

impl From<&Geometry> for geo::Geometry<f64> {
    fn from(g: &Geometry) -> Self {
        match g {
            Geometry::Point(c) => geo::Geometry::Point(Point::from(Coord::<f64>::from(c))),
            Geometry::Line(line) => geo::Geometry::LineString(ring(line)),
            Geometry::Polygon { outer, inner } => geo::Geometry::Polygon(Polygon::new(
                ring(outer),
                inner.iter().map(|r| ring(r)).collect(),
            )),
            Geometry::MultiPolygon(rings) => geo::Geometry::MultiPolygon(MultiPolygon::new(
                rings
                    .iter()
                    .map(|r| Polygon::new(ring(r), vec![]))
                    .collect(),
            )),
        }
    }
}

/// Size of a shape on the ellipsoid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Measure {
    Point,
    /// Meters.
    Length(f64),
    /// Square meters.
    Area(f64),
}

impl Shape {
    pub fn measure(&self) -> Measure {
        match geo::Geometry::from(&self.geometry) {
            geo::Geometry::LineString(line) => Measure::Length(Geodesic.length(&line)),
            geo::Geometry::Polygon(polygon) => Measure::Area(polygon.geodesic_area_unsigned()),
            geo::Geometry::MultiPolygon(polygons) => {
                Measure::Area(polygons.geodesic_area_unsigned())
            }
            _ => Measure::Point,
        }
    }
}

pub fn bounds(coords: &[Coordinate]) -> Option<LatLngBounds> {
    let points: MultiPoint<f64> = coords
        .iter()
        .map(|c| Point::from(Coord::<f64>::from(c)))
        .collect();
    let rect = points.bounding_rect()?;
    Some(LatLngBounds {
        south: rect.min().y,
        west: rect.min().x,
        north: rect.max().y,
        east: rect.max().x,
    })
}

impl ParsedKml {
    /// Bounding box of every coordinate in the document.
    pub fn bounds(&self) -> Option<LatLngBounds> {
        bounds(&self.coordinates)
    }
}

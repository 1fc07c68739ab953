use roxmltree::Node;

use crate::coordinates;
use crate::point::Coordinate;
use crate::style::StyleRecord;
use crate::xml;

#[derive(Clone, Debug, PartialEq)]
pub enum Geometry {
    Point(Coordinate),
    Line(Vec<Coordinate>),
    Polygon {
        outer: Vec<Coordinate>,
        inner: Vec<Vec<Coordinate>>,
    },
    /// Outer rings only; inner rings of multi-ring polygons are not kept.
    MultiPolygon(Vec<Vec<Coordinate>>),
}

impl Geometry {
    pub fn coordinates(&self) -> Vec<Coordinate> {
        match self {
            Geometry::Point(c) => vec![*c],
            Geometry::Line(line) => line.clone(),
            Geometry::Polygon { outer, inner } => outer
                .iter()
                .chain(inner.iter().flatten())
                .copied()
                .collect(),
            Geometry::MultiPolygon(rings) => rings.iter().flatten().copied().collect(),
        }
    }
}

/// A geometry with the style it is drawn with.
#[derive(Clone, Debug, PartialEq)]
pub struct Shape {
    pub geometry: Geometry,
    pub style: StyleRecord,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GeometryKind {
    LineString,
    Polygon,
    Point,
    Track,
}

/// Containers whose geometries are flattened into the enclosing feature.
const MULTI_TAGS: [&str; 2] = ["MultiGeometry", "MultiTrack"];

impl GeometryKind {
    /// Order in which geometries of a scope are emitted.
    pub const ALL: [GeometryKind; 4] = [
        GeometryKind::LineString,
        GeometryKind::Polygon,
        GeometryKind::Point,
        GeometryKind::Track,
    ];

    pub fn tag(self) -> &'static str {
        match self {
            GeometryKind::LineString => "LineString",
            GeometryKind::Polygon => "Polygon",
            GeometryKind::Point => "Point",
            GeometryKind::Track => "Track",
        }
    }

    pub fn build(self, node: Node, style: &StyleRecord) -> Option<Shape> {
        match self {
            GeometryKind::LineString => parse_line_string(node, style),
            GeometryKind::Polygon => parse_polygon(node, style),
            GeometryKind::Point => parse_point(node, style),
            GeometryKind::Track => parse_track(node, style),
        }
    }
}

/// Geometries directly under `scope` (a Placemark or a multi container).
pub fn build_geometries(scope: Node, style: &StyleRecord) -> Vec<Shape> {
    let mut ret = Vec::new();
    for tag in MULTI_TAGS {
        for multi in xml::children_named(scope, tag) {
            ret.extend(build_geometries(multi, style));
        }
    }
    for kind in GeometryKind::ALL {
        for node in xml::children_named(scope, kind.tag()) {
            match kind.build(node, style) {
                Some(shape) => ret.push(shape),
                None => log::debug!("empty {} skipped", kind.tag()),
            }
        }
    }
    ret
}

fn shape(geometry: Geometry, style: &StyleRecord) -> Shape {
    Shape {
        geometry,
        style: style.clone(),
    }
}

fn parse_line_string(node: Node, style: &StyleRecord) -> Option<Shape> {
    let coords = coordinates::first_coords(node);
    if coords.is_empty() {
        return None;
    }
    Some(shape(Geometry::Line(coords), style))
}

fn parse_track(node: Node, style: &StyleRecord) -> Option<Shape> {
    let coords: Vec<Coordinate> = xml::descendants_named(node, "coord")
        .filter_map(coordinates::read_gx_coord)
        .collect();
    if coords.is_empty() {
        return None;
    }
    Some(shape(Geometry::Line(coords), style))
}

fn parse_point(node: Node, style: &StyleRecord) -> Option<Shape> {
    let coord = coordinates::first_coords(node).into_iter().next()?;
    Some(shape(Geometry::Point(coord), style))
}

fn parse_polygon(node: Node, style: &StyleRecord) -> Option<Shape> {
    let rings = |tag: &'static str| -> Vec<Vec<Coordinate>> {
        xml::descendants_named(node, tag)
            .map(coordinates::first_coords)
            .filter(|ring| !ring.is_empty())
            .collect()
    };
    let mut outer = rings("outerBoundaryIs");
    let inner = rings("innerBoundaryIs");
    if outer.is_empty() {
        return None;
    }

    let mut style = style.clone();
    if style.fill_color.is_some() {
        style.fill = Some(true);
    }

    let geometry = if outer.len() == 1 {
        Geometry::Polygon {
            outer: outer.remove(0),
            inner,
        }
    } else {
        Geometry::MultiPolygon(outer)
    };
    Some(Shape { geometry, style })
}

use roxmltree::Node;

use crate::error::{KmlError, Result};
use crate::point::{Coordinate, LatLngBounds};
use crate::style::{SourceUrl, decode_color, resolve_href};
use crate::xml;

/// An image draped over `bounds`, rotated counter-clockwise by `rotation`
/// degrees.
#[derive(Clone, Debug, PartialEq)]
pub struct GroundOverlay {
    pub bounds: LatLngBounds,
    pub icon_url: Option<String>,
    pub opacity: Option<f64>,
    pub color: Option<String>,
    pub rotation: f64,
}

pub fn parse_ground_overlay(node: Node, source: Option<&SourceUrl>) -> Result<GroundOverlay> {
    let latlonbox = xml::first_descendant(node, "LatLonBox")
        .ok_or_else(|| KmlError::GroundOverlay("missing <LatLonBox>".to_string()))?;
    let edge = |tag: &str| {
        xml::child_f64(latlonbox, tag)
            .ok_or_else(|| KmlError::GroundOverlay(format!("missing or invalid <{}>", tag)))
    };
    let south = edge("south")?;
    let west = edge("west")?;
    let north = edge("north")?;
    let east = edge("east")?;
    let bounds = LatLngBounds::from(&Coordinate::new(south, west), &Coordinate::new(north, east));

    let icon_url = xml::first_child(node, "Icon")
        .and_then(|icon| xml::child_text(icon, "href"))
        .or_else(|| xml::child_text(node, "href"))
        .filter(|h| !h.is_empty())
        .map(|h| resolve_href(&h, source));

    let (opacity, color) = match xml::child_text(node, "color").and_then(|c| decode_color(&c)) {
        Some((opacity, color)) => (Some(opacity), Some(color)),
        None => (None, None),
    };

    let rotation = xml::child_f64(latlonbox, "rotation").unwrap_or(0.0);

    Ok(GroundOverlay {
        bounds,
        icon_url,
        opacity,
        color,
        rotation,
    })
}

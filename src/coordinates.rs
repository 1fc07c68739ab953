use roxmltree::Node;

use crate::point::Coordinate;
use crate::xml;

/// Parse a `lon,lat[,alt]` token list separated by any run of whitespace.
///
/// Tokens with fewer than two fields, or whose first two fields are not
/// numbers, are skipped.
pub fn parse_coords(text: &str) -> Vec<Coordinate> {
    text.split_whitespace().filter_map(parse_token).collect()
}

fn parse_token(token: &str) -> Option<Coordinate> {
    let mut fields = token.split(',');
    let lon = fields.next()?;
    let lat = fields.next()?;
    match (lon.trim().parse::<f64>(), lat.trim().parse::<f64>()) {
        (Ok(lon), Ok(lat)) => Some(Coordinate { lat, lon }),
        _ => {
            log::debug!("skipping coordinate token {:?}", token);
            None
        }
    }
}

/// Coordinates of a `<coordinates>` element; the text may span several nodes.
pub fn read_coords(node: Node) -> Vec<Coordinate> {
    parse_coords(&xml::text_content(node))
}

/// A single space separated `lon lat [alt]` value, as found in `<gx:coord>`.
pub fn parse_gx_coord(text: &str) -> Option<Coordinate> {
    let mut fields = text.split_whitespace();
    let lon = fields.next()?.parse::<f64>().ok()?;
    let lat = fields.next()?.parse::<f64>().ok()?;
    Some(Coordinate { lat, lon })
}

pub fn read_gx_coord(node: Node) -> Option<Coordinate> {
    parse_gx_coord(&xml::text_content(node))
}

/// Coordinates of the first `<coordinates>` element below `node`.
pub fn first_coords(node: Node) -> Vec<Coordinate> {
    match xml::first_descendant(node, "coordinates") {
        Some(c) => read_coords(c),
        None => Vec::new(),
    }
}

/// Every coordinate of every `<coordinates>` element below `node`.
pub fn all_coords(node: Node) -> Vec<Coordinate> {
    xml::descendants_named(node, "coordinates")
        .flat_map(read_coords)
        .collect()
}

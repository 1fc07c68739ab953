use geojson::{FeatureCollection, GeoJson, JsonObject, JsonValue, Value};

use crate::folder::Layer;
use crate::geometry::Shape;
use crate::overlay::GroundOverlay;
use crate::placemark::Feature;
use crate::style::StyleRecord;

/// Flatten a layer tree into GeoJSON features, one per shape and overlay.
///
/// Styles are written with the simplestyle property names (`stroke`,
/// `fill-opacity`, ...).
pub fn to_feature_collection(layers: &[Layer]) -> FeatureCollection {
    let mut features = Vec::new();
    for layer in layers {
        push_layer(layer, &mut features);
    }
    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}

pub fn to_geojson_string(layers: &[Layer]) -> String {
    GeoJson::FeatureCollection(to_feature_collection(layers)).to_string()
}

fn push_layer(layer: &Layer, out: &mut Vec<geojson::Feature>) {
    match layer {
        Layer::Feature(f) => out.extend(f.shapes.iter().map(|s| shape_feature(f, s))),
        Layer::Overlay(o) => out.push(overlay_feature(o)),
        Layer::Group(layers) => {
            for l in layers {
                push_layer(l, out);
            }
        }
    }
}

fn geojson_feature(geometry: &geo::Geometry<f64>, properties: JsonObject) -> geojson::Feature {
    geojson::Feature {
        bbox: None,
        geometry: Some(geojson::Geometry::new(Value::from(geometry))),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

fn shape_feature(feature: &Feature, shape: &Shape) -> geojson::Feature {
    let mut properties = JsonObject::new();
    if let Some(name) = &feature.name {
        properties.insert("name".to_string(), JsonValue::from(name.clone()));
    }
    if let Some(description) = &feature.description {
        properties.insert("description".to_string(), JsonValue::from(description.clone()));
    }
    style_properties(&shape.style, &mut properties);
    geojson_feature(&geo::Geometry::from(&shape.geometry), properties)
}

fn style_properties(style: &StyleRecord, properties: &mut JsonObject) {
    let mut set = |key: &str, value: JsonValue| {
        properties.insert(key.to_string(), value);
    };
    if let Some(color) = &style.color {
        set("stroke", JsonValue::from(color.clone()));
    }
    if let Some(opacity) = style.opacity {
        set("stroke-opacity", JsonValue::from(opacity));
    }
    if let Some(weight) = style.weight {
        set("stroke-width", JsonValue::from(weight));
    }
    if let Some(fill) = &style.fill_color {
        set("fill", JsonValue::from(fill.clone()));
    }
    if let Some(opacity) = style.fill_opacity {
        set("fill-opacity", JsonValue::from(opacity));
    }
    if let Some(icon) = &style.icon {
        set("icon", JsonValue::from(icon.icon_url.clone()));
    }
}

fn overlay_feature(overlay: &GroundOverlay) -> geojson::Feature {
    let b = &overlay.bounds;
    let rect = geo::Rect::new(
        geo::Coord {
            x: b.west,
            y: b.south,
        },
        geo::Coord {
            x: b.east,
            y: b.north,
        },
    );
    let mut properties = JsonObject::new();
    if let Some(url) = &overlay.icon_url {
        properties.insert("icon".to_string(), JsonValue::from(url.clone()));
    }
    if let Some(opacity) = overlay.opacity {
        properties.insert("opacity".to_string(), JsonValue::from(opacity));
    }
    properties.insert("rotation".to_string(), JsonValue::from(overlay.rotation));
    geojson_feature(&geo::Geometry::Polygon(rect.to_polygon()), properties)
}

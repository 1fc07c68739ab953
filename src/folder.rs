use roxmltree::Node;

use crate::Context;
use crate::error::Result;
use crate::overlay::{GroundOverlay, parse_ground_overlay};
use crate::placemark::{Feature, compile_placemark};
use crate::xml;

#[derive(Clone, Debug, PartialEq)]
pub enum Layer {
    Feature(Feature),
    Overlay(GroundOverlay),
    Group(Vec<Layer>),
}

impl Layer {
    /// Every feature of this layer tree, depth first.
    pub fn features(&self) -> Vec<&Feature> {
        let mut ret = Vec::new();
        self.visit(&mut |layer| {
            if let Layer::Feature(f) = layer {
                ret.push(f);
            }
        });
        ret
    }

    pub fn overlays(&self) -> Vec<&GroundOverlay> {
        let mut ret = Vec::new();
        self.visit(&mut |layer| {
            if let Layer::Overlay(o) = layer {
                ret.push(o);
            }
        });
        ret
    }

    pub fn count_shapes(&self) -> usize {
        self.features().iter().map(|f| f.shapes.len()).sum()
    }

    fn visit<'a>(&'a self, f: &mut impl FnMut(&'a Layer)) {
        f(self);
        if let Layer::Group(layers) = self {
            for layer in layers {
                layer.visit(f);
            }
        }
    }
}

/// No layers become nothing, a single layer stands for itself, several are
/// grouped in order.
pub fn collapse(mut layers: Vec<Layer>) -> Option<Layer> {
    match layers.len() {
        0 => None,
        1 => layers.pop(),
        _ => Some(Layer::Group(layers)),
    }
}

/// Layers of one scope: nested folders first, then placemarks, then ground
/// overlays, each in document order.
pub(crate) fn walk(scope: Node, ctx: &Context) -> Result<Vec<Layer>> {
    let elements = xml::scoped_elements(scope);
    let mut layers = Vec::new();

    for folder in elements.iter().filter(|n| xml::is(n, xml::FOLDER)) {
        if let Some(layer) = collapse(walk(*folder, ctx)?) {
            layers.push(layer);
        }
    }

    for placemark in elements.iter().filter(|n| xml::is(n, "Placemark")) {
        if let Some(feature) = compile_placemark(*placemark, ctx.styles, ctx.source) {
            layers.push(Layer::Feature(feature));
        }
    }

    for overlay in elements.iter().filter(|n| xml::is(n, "GroundOverlay")) {
        match parse_ground_overlay(*overlay, ctx.source) {
            Ok(o) => layers.push(Layer::Overlay(o)),
            Err(e) if ctx.strict => return Err(e),
            Err(e) => log::warn!("skipping ground overlay: {}", e),
        }
    }

    Ok(layers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::StyleTable;
    use roxmltree::Document;

    fn walk_str(text: &str) -> Vec<Layer> {
        let doc = Document::parse(text).unwrap();
        let styles = StyleTable::default();
        let ctx = Context {
            styles: &styles,
            source: None,
            strict: false,
        };
        walk(doc.root_element(), &ctx).unwrap()
    }

    fn point(name: &str, lon: f64) -> String {
        format!("<Placemark><name>{name}</name><Point><coordinates>{lon},0</coordinates></Point></Placemark>")
    }

    fn name(layer: &Layer) -> &str {
        match layer {
            Layer::Feature(f) => f.name.as_deref().unwrap_or(""),
            other => panic!("expected feature, got {:?}", other),
        }
    }

    #[test]
    fn test_single_child_folder_unwraps() {
        let layers = walk_str(&format!("<kml><Folder>{}</Folder></kml>", point("a", 1.0)));
        assert_eq!(layers.len(), 1);
        assert_eq!(name(&layers[0]), "a");
    }

    #[test]
    fn test_two_children_folder_groups() {
        let layers = walk_str(&format!(
            "<kml><Folder>{}{}</Folder></kml>",
            point("a", 1.0),
            point("b", 2.0)
        ));
        assert_eq!(layers.len(), 1);
        match &layers[0] {
            Layer::Group(children) => {
                assert_eq!(children.len(), 2);
                assert_eq!(name(&children[0]), "a");
                assert_eq!(name(&children[1]), "b");
            }
            other => panic!("expected group, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_folder_yields_nothing() {
        let layers = walk_str(&format!(
            "<kml><Document><Folder><Folder/></Folder>{}</Document></kml>",
            point("a", 1.0)
        ));
        assert_eq!(layers.len(), 1);
        assert_eq!(name(&layers[0]), "a");
    }

    #[test]
    fn test_emission_order() {
        let layers = walk_str(&format!(
            "<kml><Document>{}\
             <GroundOverlay><LatLonBox><north>1</north><south>0</south><east>1</east><west>0</west></LatLonBox></GroundOverlay>\
             <Folder>{}<Folder>{}</Folder></Folder>{}</Document></kml>",
            point("top1", 1.0),
            point("inner", 2.0),
            point("nested", 3.0),
            point("top2", 4.0)
        ));
        assert_eq!(layers.len(), 4);
        match &layers[0] {
            Layer::Group(children) => {
                // the nested folder comes before the placemark of its parent
                assert_eq!(name(&children[0]), "nested");
                assert_eq!(name(&children[1]), "inner");
            }
            other => panic!("expected group, got {:?}", other),
        }
        assert_eq!(name(&layers[1]), "top1");
        assert_eq!(name(&layers[2]), "top2");
        assert!(matches!(layers[3], Layer::Overlay(_)));
    }

    #[test]
    fn test_malformed_overlay_skipped_unless_strict() {
        let text = format!("<kml><GroundOverlay/>{}</kml>", point("a", 1.0));
        assert_eq!(walk_str(&text).len(), 1);

        let doc = Document::parse(&text).unwrap();
        let styles = StyleTable::default();
        let ctx = Context {
            styles: &styles,
            source: None,
            strict: true,
        };
        assert!(walk(doc.root_element(), &ctx).is_err());
    }

    #[test]
    fn test_layer_traversal() {
        let layers = walk_str(&format!(
            "<kml><Folder>{}<Folder>{}{}</Folder></Folder></kml>",
            point("a", 1.0),
            point("b", 2.0),
            point("c", 3.0)
        ));
        let names: Vec<_> = layers[0]
            .features()
            .iter()
            .filter_map(|f| f.name.clone())
            .collect();
        assert_eq!(names, vec!["b", "c", "a"]);
        assert_eq!(layers[0].count_shapes(), 3);
        assert!(layers[0].overlays().is_empty());
    }

    #[test]
    fn test_collapse() {
        assert_eq!(collapse(Vec::new()), None);
        let g = Layer::Group(Vec::new());
        assert_eq!(collapse(vec![g.clone()]), Some(g.clone()));
        assert_eq!(
            collapse(vec![g.clone(), g.clone()]),
            Some(Layer::Group(vec![g.clone(), g]))
        );
    }
}

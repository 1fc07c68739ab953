use roxmltree::Node;

use crate::geometry::{Shape, build_geometries};
use crate::style::{SourceUrl, StyleKey, StyleRecord, StyleTable, parse_style};
use crate::xml;

/// When a renderer should attach a feature's popup.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PopupBinding {
    /// Bind as soon as the feature is instantiated.
    Immediate,
    /// Bind when the shape is first added to a display.
    OnFirstDisplay,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Feature {
    pub name: Option<String>,
    pub description: Option<String>,
    pub shapes: Vec<Shape>,
    pub style: StyleRecord,
    pub popup: Option<String>,
}

impl Feature {
    pub fn is_grouped(&self) -> bool {
        self.shapes.len() > 1
    }

    pub fn popup_binding(&self) -> Option<PopupBinding> {
        self.popup.as_ref()?;
        if self.is_grouped() {
            Some(PopupBinding::Immediate)
        } else {
            Some(PopupBinding::OnFirstDisplay)
        }
    }
}

pub fn popup_html(name: Option<&str>, description: Option<&str>) -> Option<String> {
    let mut popup = String::new();
    if let Some(name) = name {
        popup.push_str(&format!("<h2>{}</h2>", name));
    }
    if let Some(description) = description {
        popup.push_str(description);
    }
    if popup.is_empty() { None } else { Some(popup) }
}

/// Effective style of a placemark: referenced styles in document order, then
/// its inline `<Style>`.
pub fn placemark_style(node: Node, styles: &StyleTable, source: Option<&SourceUrl>) -> StyleRecord {
    let mut style = StyleRecord::default();
    for url in xml::descendants_named(node, "styleUrl") {
        let key = StyleKey::from_url(&xml::text_content(url));
        match styles.get(&key) {
            Some(referenced) => style.merge(referenced),
            None => log::debug!("unresolved style reference {}", key),
        }
    }
    if let Some(inline) = xml::first_descendant(node, "Style") {
        style.merge(&parse_style(inline, source));
    }
    style
}

/// Compile a `<Placemark>`. Placemarks without any usable geometry yield
/// nothing.
pub fn compile_placemark(node: Node, styles: &StyleTable, source: Option<&SourceUrl>) -> Option<Feature> {
    let style = placemark_style(node, styles, source);
    let shapes = build_geometries(node, &style);
    if shapes.is_empty() {
        log::debug!("placemark without geometry skipped");
        return None;
    }

    // Text is kept as written; blank text counts as absent.
    let name = xml::first_descendant(node, "name")
        .and_then(xml::first_text)
        .filter(|n| !n.trim().is_empty())
        .map(str::to_string);
    let description: String = xml::descendants_named(node, "description")
        .map(xml::text_content)
        .collect();
    let description = Some(description).filter(|d| !d.trim().is_empty());
    let popup = popup_html(name.as_deref(), description.as_deref());

    Some(Feature {
        name,
        description,
        shapes,
        style,
        popup,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use roxmltree::Document;

    fn table(doc: &Document) -> StyleTable {
        StyleTable::build(doc.root_element(), None)
    }

    #[test]
    fn test_popup_html() {
        assert_eq!(popup_html(None, None), None);
        assert_eq!(popup_html(Some("A"), None).as_deref(), Some("<h2>A</h2>"));
        assert_eq!(
            popup_html(Some("A"), Some("<b>x</b>")).as_deref(),
            Some("<h2>A</h2><b>x</b>")
        );
        assert_eq!(popup_html(None, Some("x")).as_deref(), Some("x"));
    }

    #[test]
    fn test_style_reference_then_inline() {
        let doc = Document::parse(
            r##"<kml>
                 <Style id="base"><LineStyle><color>ff0000ff</color><width>3</width></LineStyle></Style>
                 <Placemark>
                   <styleUrl>#base</styleUrl>
                   <Style><LineStyle><color>ff00ff00</color></LineStyle></Style>
                   <LineString><coordinates>0,0 1,1</coordinates></LineString>
                 </Placemark>
               </kml>"##,
        )
        .unwrap();
        let styles = table(&doc);
        let placemark = xml::first_descendant(doc.root_element(), "Placemark").unwrap();
        let feature = compile_placemark(placemark, &styles, None).unwrap();
        assert_eq!(feature.style.color.as_deref(), Some("#00ff00"));
        assert_eq!(feature.style.weight, Some(3.0));
        assert_eq!(feature.shapes[0].style, feature.style);
    }

    #[test]
    fn test_unknown_style_reference() {
        let doc = Document::parse(
            r##"<kml><Placemark><styleUrl>#nope</styleUrl>
                 <Point><coordinates>1,2</coordinates></Point></Placemark></kml>"##,
        )
        .unwrap();
        let styles = table(&doc);
        let placemark = xml::first_descendant(doc.root_element(), "Placemark").unwrap();
        let feature = compile_placemark(placemark, &styles, None).unwrap();
        assert!(feature.style.is_empty());
    }

    #[test]
    fn test_name_description_and_binding() {
        let doc = Document::parse(
            r#"<kml><Placemark>
                 <name>Summit</name>
                 <description><![CDATA[<p>High</p>]]></description>
                 <description> point</description>
                 <Point><coordinates>1,2</coordinates></Point>
               </Placemark></kml>"#,
        )
        .unwrap();
        let styles = table(&doc);
        let placemark = xml::first_descendant(doc.root_element(), "Placemark").unwrap();
        let feature = compile_placemark(placemark, &styles, None).unwrap();
        assert_eq!(feature.name.as_deref(), Some("Summit"));
        assert_eq!(feature.description.as_deref(), Some("<p>High</p> point"));
        assert_eq!(feature.popup.as_deref(), Some("<h2>Summit</h2><p>High</p> point"));
        assert!(!feature.is_grouped());
        assert_eq!(feature.popup_binding(), Some(PopupBinding::OnFirstDisplay));
    }

    #[test]
    fn test_text_kept_verbatim() {
        let doc = Document::parse(
            "<kml><Placemark>\
               <name> Peak </name>\
               <description><![CDATA[<pre>\n  a\n  b\n</pre>\n]]></description>\
               <Point><coordinates>1,2</coordinates></Point>\
             </Placemark></kml>",
        )
        .unwrap();
        let styles = table(&doc);
        let placemark = xml::first_descendant(doc.root_element(), "Placemark").unwrap();
        let feature = compile_placemark(placemark, &styles, None).unwrap();
        assert_eq!(feature.name.as_deref(), Some(" Peak "));
        assert_eq!(feature.description.as_deref(), Some("<pre>\n  a\n  b\n</pre>\n"));
        assert_eq!(
            feature.popup.as_deref(),
            Some("<h2> Peak </h2><pre>\n  a\n  b\n</pre>\n")
        );

        let doc = Document::parse(
            "<kml><Placemark><name>  </name><description>\n</description>\
             <Point><coordinates>1,2</coordinates></Point></Placemark></kml>",
        )
        .unwrap();
        let placemark = xml::first_descendant(doc.root_element(), "Placemark").unwrap();
        let feature = compile_placemark(placemark, &table(&doc), None).unwrap();
        assert_eq!(feature.name, None);
        assert_eq!(feature.description, None);
        assert_eq!(feature.popup, None);
    }

    #[test]
    fn test_grouped_feature_binds_immediately() {
        let doc = Document::parse(
            r#"<kml><Placemark><name>Pair</name><MultiGeometry>
                 <Point><coordinates>1,2</coordinates></Point>
                 <Point><coordinates>3,4</coordinates></Point>
               </MultiGeometry></Placemark></kml>"#,
        )
        .unwrap();
        let styles = table(&doc);
        let placemark = xml::first_descendant(doc.root_element(), "Placemark").unwrap();
        let feature = compile_placemark(placemark, &styles, None).unwrap();
        assert!(feature.is_grouped());
        assert_eq!(feature.popup_binding(), Some(PopupBinding::Immediate));
    }

    #[test]
    fn test_no_geometry_no_feature() {
        let doc = Document::parse(
            "<kml><Placemark><name>Ghost</name><Point><coordinates/></Point></Placemark></kml>",
        )
        .unwrap();
        let styles = table(&doc);
        let placemark = xml::first_descendant(doc.root_element(), "Placemark").unwrap();
        assert_eq!(compile_placemark(placemark, &styles, None), None);
    }

    #[test]
    fn test_no_popup_without_text() {
        let doc = Document::parse(
            "<kml><Placemark><Point><coordinates>1,2</coordinates></Point></Placemark></kml>",
        )
        .unwrap();
        let styles = table(&doc);
        let placemark = xml::first_descendant(doc.root_element(), "Placemark").unwrap();
        let feature = compile_placemark(placemark, &styles, None).unwrap();
        assert_eq!(feature.popup, None);
        assert_eq!(feature.popup_binding(), None);
    }
}

//! Compile KML documents into plain geometry and style records.
//!
//! ```
//! let kml = r#"<kml><Placemark><LineString>
//!     <coordinates>0,0 1,1 2,2</coordinates>
//! </LineString></Placemark></kml>"#;
//! let parsed = kml_layers::parse(kml, &kml_layers::ParseOptions::default()).unwrap();
//! assert_eq!(parsed.layers.len(), 1);
//! assert_eq!(parsed.coordinates.len(), 3);
//! ```

pub mod convert;
pub mod coordinates;
pub mod error;
pub mod export;
pub mod folder;
pub mod geometry;
pub mod overlay;
pub mod placemark;
pub mod point;
pub mod read_kml;
pub mod style;
mod xml;

use roxmltree::Document;

pub use error::{KmlError, Result};
pub use folder::Layer;
pub use geometry::{Geometry, Shape};
pub use overlay::GroundOverlay;
pub use placemark::{Feature, PopupBinding};
pub use point::{Coordinate, LatLngBounds};
pub use style::{IconStyle, SourceUrl, StyleKey, StyleRecord, StyleTable};

#[derive(Clone, Debug, Default)]
pub struct ParseOptions {
    /// Where the document was loaded from; relative icon hrefs resolve
    /// against it.
    pub source_url: Option<String>,
    /// Fail the whole document on a ground overlay without bounds instead
    /// of skipping the overlay.
    pub strict: bool,
}

impl ParseOptions {
    pub fn with_source_url(mut self, url: impl Into<String>) -> Self {
        self.source_url = Some(url.into());
        self
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    fn source(&self) -> Option<SourceUrl> {
        self.source_url.as_deref().and_then(SourceUrl::parse)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ParsedKml {
    pub layers: Vec<Layer>,
    /// Every coordinate of every `<coordinates>` element, in document order.
    pub coordinates: Vec<Coordinate>,
}

impl ParsedKml {
    pub fn features(&self) -> Vec<&Feature> {
        self.layers.iter().flat_map(|l| l.features()).collect()
    }

    pub fn overlays(&self) -> Vec<&GroundOverlay> {
        self.layers.iter().flat_map(|l| l.overlays()).collect()
    }
}

pub(crate) struct Context<'a> {
    pub(crate) styles: &'a StyleTable,
    pub(crate) source: Option<&'a SourceUrl>,
    pub(crate) strict: bool,
}

pub fn parse(text: &str, options: &ParseOptions) -> Result<ParsedKml> {
    let doc = Document::parse(text)?;
    parse_document(&doc, options)
}

pub fn parse_document(doc: &Document, options: &ParseOptions) -> Result<ParsedKml> {
    let root = doc.root_element();
    if root.tag_name().name() != "kml" {
        return Err(KmlError::NotKml(root.tag_name().name().to_string()));
    }

    let source = options.source();
    let styles = StyleTable::build(root, source.as_ref());
    let ctx = Context {
        styles: &styles,
        source: source.as_ref(),
        strict: options.strict,
    };

    let layers = folder::walk(root, &ctx)?;
    if layers.is_empty() {
        return Err(KmlError::Empty);
    }
    let coordinates = coordinates::all_coords(root);
    log::info!(
        "kml: {} layers, {} styles, {} coordinates",
        layers.len(),
        styles.len(),
        coordinates.len()
    );

    Ok(ParsedKml {
        layers,
        coordinates,
    })
}

/// Reasons a document fails to load. Anything else found while walking a
/// document is skipped rather than reported.
#[derive(Debug, thiserror::Error)]
pub enum KmlError {
    #[error("not an XML document: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("expected a <kml> root element, found <{0}>")]
    NotKml(String),

    #[error("document contains no layers")]
    Empty,

    #[error("invalid ground overlay: {0}")]
    GroundOverlay(String),
}

pub type Result<T> = std::result::Result<T, KmlError>;

use core::fmt;
use std::collections::HashMap;
use std::sync::Arc;

use roxmltree::Node;
use url::Url;

use crate::xml;

/// Marker icons are drawn at this size unless the renderer says otherwise.
pub const DEFAULT_ICON_SIZE: (f64, f64) = (32.0, 32.0);

/// Decode a KML `AABBGGRR` color into `(opacity, "#RRGGBB")`.
pub fn decode_color(value: &str) -> Option<(f64, String)> {
    let v = value.trim();
    if v.len() != 8 || !v.chars().all(|c| c.is_ascii_hexdigit()) {
        log::debug!("ignoring malformed color {:?}", value);
        return None;
    }
    let alpha = u8::from_str_radix(&v[0..2], 16).ok()?;
    let color = format!("#{}{}{}", &v[6..8], &v[4..6], &v[2..4]);
    Some((alpha as f64 / 255.0, color))
}

/// Where a document was loaded from. Absolute URLs are joined with URL
/// rules; relative locations such as `data/trip.kml` are joined as paths.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SourceUrl {
    Absolute(Url),
    Relative(String),
}

impl SourceUrl {
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.is_empty() {
            return None;
        }
        match Url::parse(s) {
            Ok(url) => Some(SourceUrl::Absolute(url)),
            Err(url::ParseError::RelativeUrlWithoutBase) => Some(SourceUrl::Relative(s.to_string())),
            Err(e) => {
                log::warn!("ignoring source url {:?}: {}", s, e);
                None
            }
        }
    }

    pub fn join(&self, href: &str) -> String {
        match self {
            SourceUrl::Absolute(base) => match base.join(href) {
                Ok(url) => url.to_string(),
                Err(e) => {
                    log::warn!("cannot resolve icon href {:?} against {}: {}", href, base, e);
                    href.to_string()
                }
            },
            SourceUrl::Relative(base) => {
                if href.starts_with('/') {
                    return href.to_string();
                }
                let path = base.split(['?', '#']).next().unwrap_or(base.as_str());
                match path.rfind('/') {
                    Some(slash) => format!("{}{}", &path[..=slash], href),
                    None => href.to_string(),
                }
            }
        }
    }
}

impl fmt::Display for SourceUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceUrl::Absolute(url) => write!(f, "{}", url),
            SourceUrl::Relative(path) => f.write_str(path),
        }
    }
}

/// Resolve an icon href against the location the document was loaded from.
pub fn resolve_href(href: &str, source: Option<&SourceUrl>) -> String {
    let href = href.trim();
    if href.starts_with("http://") || href.starts_with("https://") || href.starts_with("data:") {
        return href.to_string();
    }
    match source {
        Some(base) => base.join(href),
        None => href.to_string(),
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnchorUnits {
    Fraction,
    Pixels,
    InsetPixels,
}

impl AnchorUnits {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "fraction" => Some(AnchorUnits::Fraction),
            "pixels" => Some(AnchorUnits::Pixels),
            "insetPixels" => Some(AnchorUnits::InsetPixels),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct HotSpot {
    pub x: Option<f64>,
    pub y: Option<f64>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AnchorTypes {
    pub x: Option<AnchorUnits>,
    pub y: Option<AnchorUnits>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct IconStyle {
    pub icon_url: String,
    pub anchor_ref: HotSpot,
    pub anchor_type: AnchorTypes,
}

impl IconStyle {
    /// Pixel margins `(left, top)` that place the hot spot on the marker
    /// position, for an icon drawn at `size`.
    pub fn anchor_offset(&self, size: (f64, f64)) -> (Option<f64>, Option<f64>) {
        let (width, height) = size;
        let left = match (self.anchor_type.x, self.anchor_ref.x) {
            (Some(AnchorUnits::Fraction), Some(x)) => Some(-x * width),
            (Some(AnchorUnits::Pixels), Some(x)) => Some(-x),
            _ => None,
        };
        let top = match (self.anchor_type.y, self.anchor_ref.y) {
            (Some(AnchorUnits::Fraction), Some(y)) => Some(-(1.0 - y) * height + 1.0),
            (Some(AnchorUnits::Pixels), Some(y)) => Some(y - height + 1.0),
            _ => None,
        };
        (left, top)
    }

    pub fn popup_anchor(&self, size: (f64, f64)) -> (f64, f64) {
        (0.0, -0.83 * size.1)
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct StyleRecord {
    pub color: Option<String>,
    pub opacity: Option<f64>,
    pub weight: Option<f64>,
    pub fill_color: Option<String>,
    pub fill_opacity: Option<f64>,
    pub fill: Option<bool>,
    pub icon: Option<IconStyle>,
}

impl StyleRecord {
    /// Copy every field set in `other` over `self`.
    pub fn merge(&mut self, other: &StyleRecord) {
        if other.color.is_some() {
            self.color = other.color.clone();
        }
        if other.opacity.is_some() {
            self.opacity = other.opacity;
        }
        if other.weight.is_some() {
            self.weight = other.weight;
        }
        if other.fill_color.is_some() {
            self.fill_color = other.fill_color.clone();
        }
        if other.fill_opacity.is_some() {
            self.fill_opacity = other.fill_opacity;
        }
        if other.fill.is_some() {
            self.fill = other.fill;
        }
        if other.icon.is_some() {
            self.icon = other.icon.clone();
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == StyleRecord::default()
    }
}

/// Parse a `<Style>` element. Only the first `LineStyle`, `PolyStyle` and
/// `IconStyle` below it are read.
pub fn parse_style(node: Node, source: Option<&SourceUrl>) -> StyleRecord {
    let mut style = StyleRecord::default();

    if let Some(line) = xml::first_descendant(node, "LineStyle") {
        if let Some((opacity, color)) = xml::child_text(line, "color").and_then(|c| decode_color(&c)) {
            style.opacity = Some(opacity);
            style.color = Some(color);
        }
        style.weight = xml::child_f64(line, "width");
    }

    if let Some(poly) = xml::first_descendant(node, "PolyStyle") {
        if let Some((opacity, color)) = xml::child_text(poly, "color").and_then(|c| decode_color(&c)) {
            style.fill_opacity = Some(opacity);
            style.fill_color = Some(color);
        }
    }

    if let Some(icon) = xml::first_descendant(node, "IconStyle") {
        style.icon = parse_icon_style(icon, source);
    }

    style
}

fn parse_icon_style(node: Node, source: Option<&SourceUrl>) -> Option<IconStyle> {
    let href = xml::first_child(node, "Icon")
        .and_then(|icon| xml::child_text(icon, "href"))
        .or_else(|| xml::child_text(node, "href"))
        .filter(|h| !h.is_empty())?;

    let mut anchor_ref = HotSpot::default();
    let mut anchor_type = AnchorTypes::default();
    if let Some(hot) = xml::first_child(node, "hotSpot") {
        anchor_ref.x = hot.attribute("x").and_then(|v| v.trim().parse().ok());
        anchor_ref.y = hot.attribute("y").and_then(|v| v.trim().parse().ok());
        anchor_type.x = hot.attribute("xunits").and_then(AnchorUnits::parse);
        anchor_type.y = hot.attribute("yunits").and_then(AnchorUnits::parse);
    }

    Some(IconStyle {
        icon_url: resolve_href(&href, source),
        anchor_ref,
        anchor_type,
    })
}

/// A style reference as written in `<styleUrl>`, e.g. `#red`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct StyleKey(String);

impl StyleKey {
    pub fn from_id(id: &str) -> Self {
        StyleKey(format!("#{}", id))
    }
    pub fn from_url(url: &str) -> Self {
        StyleKey(url.trim().to_string())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StyleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Debug, Default)]
pub struct StyleTable {
    styles: HashMap<StyleKey, Arc<StyleRecord>>,
}

impl StyleTable {
    /// Index every `Style` of the document, then resolve every `StyleMap`
    /// against the indexed styles.
    pub fn build(root: Node, source: Option<&SourceUrl>) -> Self {
        let mut table = StyleTable::default();
        for node in root.descendants().filter(|n| xml::is(n, "Style")) {
            let style = parse_style(node, source);
            match node.attribute("id") {
                Some(id) => table.insert(StyleKey::from_id(id), style),
                None => log::trace!("style without id is only usable inline"),
            }
        }
        for node in root.descendants().filter(|n| xml::is(n, "StyleMap")) {
            table.resolve_style_map(node);
        }
        log::debug!("style table: {} entries", table.len());
        table
    }

    fn resolve_style_map(&mut self, node: Node) {
        let Some(id) = node.attribute("id") else {
            return;
        };
        let pairs: Vec<Node> = xml::descendants_named(node, "Pair").collect();
        let target = if pairs.is_empty() {
            normal_target(node)
        } else {
            pairs.into_iter().find_map(normal_target)
        };
        let Some(target) = target else {
            return;
        };
        if !self.alias(StyleKey::from_id(id), &target) {
            log::debug!("style map #{} points to unknown style {}", id, target);
        }
    }

    pub fn insert(&mut self, key: StyleKey, style: StyleRecord) {
        self.styles.insert(key, Arc::new(style));
    }

    /// Make `key` share the record stored under `target`.
    pub fn alias(&mut self, key: StyleKey, target: &StyleKey) -> bool {
        match self.styles.get(target).cloned() {
            Some(record) => {
                self.styles.insert(key, record);
                true
            }
            None => false,
        }
    }

    pub fn get(&self, key: &StyleKey) -> Option<&Arc<StyleRecord>> {
        self.styles.get(key)
    }

    pub fn len(&self) -> usize {
        self.styles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }
}

// The styleUrl of a Pair (or pair-less StyleMap) keyed "normal".
fn normal_target(node: Node) -> Option<StyleKey> {
    let key = xml::first_descendant(node, "key").map(xml::text_content)?;
    if key.trim() != "normal" {
        return None;
    }
    xml::first_descendant(node, "styleUrl").map(|u| StyleKey::from_url(&xml::text_content(u)))
}

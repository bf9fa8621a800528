// src/sitemap/parse.rs
// =============================================================================
// Parses one sitemap document.
//
// Two shapes exist:
//   <sitemapindex><sitemap><loc>...</loc></sitemap>...</sitemapindex>
//   <urlset><url><loc>...</loc></url>...</urlset>
//
// The root element decides the shape; any other root (an HTML error page
// served with 200, for instance) is rejected. <loc> text is kept exactly as
// written apart from surrounding whitespace: addresses that are not valid
// URLs still get checked, and fail there.
// =============================================================================

use xml::reader::{EventReader, XmlEvent};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SitemapDocument {
    /// URLs of child sitemaps
    Index(Vec<String>),
    /// URLs of pages
    UrlSet(Vec<String>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shape {
    Index,
    UrlSet,
}

impl Shape {
    fn from_root(name: &str) -> Option<Self> {
        match name {
            "sitemapindex" => Some(Shape::Index),
            "urlset" => Some(Shape::UrlSet),
            _ => None,
        }
    }

    // Element that wraps each <loc>
    fn entry(self) -> &'static str {
        match self {
            Shape::Index => "sitemap",
            Shape::UrlSet => "url",
        }
    }
}

/// Parses a sitemap body; the error is a human readable reason
pub fn parse_sitemap(body: &[u8]) -> Result<SitemapDocument, String> {
    let mut shape = None;
    // Local names of the currently open elements
    let mut path: Vec<String> = Vec::new();
    let mut loc_text: Option<String> = None;
    let mut locations = Vec::new();

    for event in EventReader::new(body) {
        match event.map_err(|e| e.to_string())? {
            XmlEvent::StartElement { name, .. } => {
                if path.is_empty() {
                    shape = Some(Shape::from_root(&name.local_name).ok_or_else(|| {
                        format!(
                            "expected <urlset> or <sitemapindex>, found <{}>",
                            name.local_name
                        )
                    })?);
                }
                path.push(name.local_name);
                if let Some(shape) = shape {
                    if is_loc_path(&path, shape) {
                        loc_text = Some(String::new());
                    }
                }
            }
            XmlEvent::Characters(text) | XmlEvent::CData(text) => {
                if let Some(loc) = loc_text.as_mut() {
                    loc.push_str(&text);
                }
            }
            XmlEvent::EndElement { .. } => {
                if let Some(loc) = loc_text.take() {
                    locations.push(loc.trim().to_string());
                }
                path.pop();
            }
            _ => {}
        }
    }

    match shape {
        Some(Shape::Index) => Ok(SitemapDocument::Index(locations)),
        Some(Shape::UrlSet) => Ok(SitemapDocument::UrlSet(locations)),
        None => Err("document has no root element".to_string()),
    }
}

fn is_loc_path(path: &[String], shape: Shape) -> bool {
    path.len() == 3 && path[1] == shape.entry() && path[2] == "loc"
}

/// Cell construction
///
/// A cell is everything a display binding needs to show one entry: the
/// image, where clicking it leads, a caption linking the raw file and links
/// to the sibling formats. Links follow a fixed naming convention so that
/// they match the files written next to each plot.
use serde::Serialize;

use crate::state::data::Entry;

const PNG_EXT: &str = ".png";
const EPS_EXT: &str = ".eps";
const PDF_EXT: &str = ".pdf";
const ROOT_EXT: &str = ".root";

/// Page that displays a ROOT canvas in the browser
pub const VIEWER_PAGE: &str = "showROOT.html";
/// Object drawn by the viewer
const VIEWER_ITEM: &str = "c;1";
const VIEWER_FLAGS: &str = "noselect&mathjax";

/// A labelled link
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Link {
    pub href: String,
    pub label: String,
}

impl Link {
    fn new(href: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            label: label.into(),
        }
    }
}

/// Render-ready description of one entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Cell {
    /// Image source, the entry name verbatim
    pub image: String,
    /// ROOT viewer URL, present when the entry has a `.root` sibling
    pub deep_link: Option<String>,
    /// Link to the raw image, labelled with its name
    pub caption: Link,
    /// `.eps` then `.pdf`, each only when the file exists
    pub formats: Vec<Link>,
}

impl Cell {
    pub fn from_entry(entry: &Entry) -> Self {
        let name = entry.name.as_str();

        let deep_link = entry.has_root.then(|| {
            format!(
                "{VIEWER_PAGE}?file={}&item={VIEWER_ITEM}&{VIEWER_FLAGS}",
                swap_extension(name, ROOT_EXT)
            )
        });

        let mut formats = Vec::new();
        if entry.has_eps {
            formats.push(Link::new(swap_extension(name, EPS_EXT), EPS_EXT));
        }
        if entry.has_pdf {
            formats.push(Link::new(swap_extension(name, PDF_EXT), PDF_EXT));
        }

        Self {
            image: name.to_string(),
            deep_link,
            caption: Link::new(name, name),
            formats,
        }
    }

    /// Where clicking the image leads
    pub fn target(&self) -> &str {
        self.deep_link.as_deref().unwrap_or(&self.image)
    }
}

/// Build one cell per entry, in order
pub fn render(view: &[Entry]) -> Vec<Cell> {
    view.iter().map(Cell::from_entry).collect()
}

/// Replace the first `.png` in `name` with `ext`.
///
/// Names without `.png` come back unchanged.
pub fn swap_extension(name: &str, ext: &str) -> String {
    name.replacen(PNG_EXT, ext, 1)
}

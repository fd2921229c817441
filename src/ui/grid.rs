/// Grid of gallery cells
///
/// `GridSurface` is what the session renders into in the desktop window.
/// It only stores the cells; `view` turns them into widgets each frame.
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use iced::widget::{button, column, container, image, text, Row};
use iced::{Element, Length};
use iced_aw::Wrap;
use url::Url;

use super::app::Message;
use crate::gallery::render::{Cell, Link, VIEWER_PAGE};
use crate::state::session::Surface;

#[derive(Debug, Default)]
pub struct GridSurface {
    cells: Vec<Cell>,
}

impl Surface for GridSurface {
    fn clear(&mut self) {
        self.cells.clear();
    }

    fn append(&mut self, cells: Vec<Cell>) {
        self.cells.extend(cells);
    }
}

impl GridSurface {
    pub fn count(&self) -> usize {
        self.cells.len()
    }

    /// Build the widgets for the current cells.
    ///
    /// `thumbnails` maps entry names to cached thumbnails; entries without
    /// one show the image itself.
    pub fn view<'a>(
        &'a self,
        dir: &Path,
        thumbnails: &HashMap<String, PathBuf>,
        width: f32,
    ) -> Element<'a, Message> {
        if self.cells.is_empty() {
            return container(text("No plots match the filter.").size(16))
                .padding(20)
                .into();
        }

        let cells = self
            .cells
            .iter()
            .map(|cell| {
                let source = thumbnails
                    .get(&cell.image)
                    .cloned()
                    .unwrap_or_else(|| dir.join(&cell.image));
                cell_view(cell, source, width)
            })
            .collect();

        Wrap::with_elements(cells)
            .spacing(16.0)
            .line_spacing(16.0)
            .into()
    }
}

fn cell_view(cell: &Cell, source: PathBuf, width: f32) -> Element<'_, Message> {
    let picture = button(image(image::Handle::from_path(source)).width(Length::Fixed(width)))
        .padding(0)
        .style(button::text)
        .on_press(Message::OpenLink(cell.target().to_string()));

    let mut caption = Row::new().spacing(4).push(link_view(&cell.caption));
    for format in &cell.formats {
        caption = caption.push(text("/").size(13)).push(link_view(format));
    }

    column![picture, caption]
        .spacing(6)
        .width(Length::Fixed(width))
        .into()
}

fn link_view(link: &Link) -> Element<'_, Message> {
    button(text(link.label.as_str()).size(13))
        .padding(0)
        .style(button::text)
        .on_press(Message::OpenLink(link.href.clone()))
        .into()
}

/// Turn a cell link into a URL the system can open.
///
/// Links are relative to the gallery directory, which must be absolute.
/// Plot links are file names and may contain `#`, `?` or `%`; only the
/// viewer link carries a query.
pub fn resolve_link(dir: &Path, href: &str) -> Option<Url> {
    if !dir.is_absolute() {
        return None;
    }
    match href.split_once('?') {
        Some((page, query)) if page == VIEWER_PAGE => {
            let mut url = Url::from_file_path(dir.join(page)).ok()?;
            url.set_query(Some(query));
            Some(url)
        }
        _ => Url::from_file_path(dir.join(href)).ok(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[cfg(unix)]
    fn test_resolve_plain_link() {
        let url = resolve_link(Path::new("/data/plots"), "a.eps").unwrap();
        assert_eq!(url.as_str(), "file:///data/plots/a.eps");
    }

    #[test]
    #[cfg(unix)]
    fn test_resolve_viewer_link_keeps_query() {
        let url = resolve_link(
            Path::new("/data/plots"),
            "showROOT.html?file=b.root&item=c;1&noselect&mathjax",
        )
        .unwrap();
        assert_eq!(url.path(), "/data/plots/showROOT.html");
        assert_eq!(url.query(), Some("file=b.root&item=c;1&noselect&mathjax"));
    }

    #[test]
    #[cfg(unix)]
    fn test_resolve_names_with_url_syntax() {
        let dir = Path::new("/data/plots");
        for name in ["mjj#2tag.png", "what?.png", "eff_100%.pdf", "showROOT.html#top"] {
            let url = resolve_link(dir, name).unwrap();
            assert_eq!(url.to_file_path().unwrap(), dir.join(name), "{name}");
            assert_eq!(url.query(), None);
            assert_eq!(url.fragment(), None);
        }
    }

    #[test]
    fn test_relative_dir_is_rejected() {
        assert!(resolve_link(Path::new("plots"), "a.png").is_none());
    }

    #[test]
    fn test_surface_replaces_cells() {
        use crate::gallery::render::render;
        use crate::state::data::Entry;

        let mut grid = GridSurface::default();
        grid.append(render(&[Entry::new("a.png", false, false, false)]));
        assert_eq!(grid.count(), 1);
        grid.clear();
        grid.append(Vec::new());
        assert_eq!(grid.count(), 0);
    }
}

/// Static HTML export
///
/// Writes an `index.html` into every directory of a tree of plots, plus the
/// shared `style.css` and `table.js` at the top:
/// - site.rs walks the tree and builds the navigation
/// - html.rs binds a session to the page template and renders it
pub mod html;
pub mod site;

use std::path::Path;

use log::info;

use crate::config::Config;
use crate::error::{GalleryError, Result};
use crate::state::catalog::scan_directory;
use crate::state::session::Session;
use html::{embed_catalog, PageContext, PageTemplate, STYLE_CSS, TABLE_JS};
use site::DirNode;

/// Result of an export run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportSummary {
    pub pages: usize,
    pub images: usize,
}

/// Export `root` and all its subdirectories.
///
/// With a query, each page only holds the cells the query selects.
pub fn export_site(root: &Path, config: &Config, query: Option<&str>) -> Result<ExportSummary> {
    let template = match &config.template {
        Some(path) => PageTemplate::load(path)?,
        None => PageTemplate::default(),
    };
    let tree = DirNode::build(root, config)?;

    write(&root.join("style.css"), STYLE_CSS)?;
    write(&root.join("table.js"), TABLE_JS)?;

    let mut summary = ExportSummary { pages: 0, images: 0 };
    for node in tree.walk() {
        let images = export_page(root, node, &template, config, query)?;
        summary.pages += 1;
        summary.images += images;
    }

    info!(
        "Wrote {} pages with {} images under {}",
        summary.pages,
        summary.images,
        root.display()
    );
    Ok(summary)
}

fn export_page(
    root: &Path,
    node: &DirNode,
    template: &PageTemplate,
    config: &Config,
    query: Option<&str>,
) -> Result<usize> {
    let dir = root.join(&node.rel);
    let catalog = scan_directory(&dir)?;

    let mut session = Session::start(catalog, template.surface(), template.filter_input())?;
    if let Some(query) = query {
        session.on_query(query);
    }
    let files = embed_catalog(session.catalog())?;
    let cells = session.into_surface();

    let page = PageContext {
        title: &node.name,
        stylesheet: node.stylesheet_href(),
        script: node.shared_href("table.js"),
        files,
        query: query.unwrap_or_default(),
        nav: node.nav(),
        texts: node.text_dumps(root, config),
    };
    let html = template.render(&page, cells.cells())?;
    write(&dir.join("index.html"), &html)?;

    info!("{} {} images", node.name, cells.cells().len());
    Ok(cells.cells().len())
}

fn write(path: &Path, contents: &str) -> Result<()> {
    std::fs::write(path, contents).map_err(|source| GalleryError::Write {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::data::Catalog;
    use std::fs;

    fn plots() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("fits")).unwrap();
        fs::create_dir_all(root.join("pdf-files")).unwrap();
        for file in ["a.png", "a.eps", "b.png", "b.root", "fits/mjj.png", "fits/mjj.pdf"] {
            fs::write(root.join(file), b"").unwrap();
        }
        dir
    }

    #[test]
    fn test_export_writes_every_page() {
        let dir = plots();
        let summary = export_site(dir.path(), &Config::default(), None).unwrap();
        assert_eq!(summary, ExportSummary { pages: 2, images: 3 });

        assert!(dir.path().join("style.css").exists());
        assert_eq!(fs::read_to_string(dir.path().join("table.js")).unwrap(), TABLE_JS);
        assert!(!dir.path().join("pdf-files/index.html").exists());

        let page = fs::read_to_string(dir.path().join("fits/index.html")).unwrap();
        assert!(page.contains("mjj.pdf"));
        assert!(page.contains("style.css"));
        assert_eq!(page.matches("<article>").count(), 1);
    }

    #[test]
    fn test_export_with_query() {
        let dir = plots();
        let summary = export_site(dir.path(), &Config::default(), Some("b.png")).unwrap();
        assert_eq!(summary.images, 1);

        let page = fs::read_to_string(dir.path().join("index.html")).unwrap();
        assert!(page.contains("value=\"b.png\""));
        assert!(page.contains("showROOT.html?file=b.root"));
        assert!(!page.contains("a.eps"));
    }

    #[test]
    fn test_pages_carry_their_catalog_for_the_filter_box() {
        let dir = plots();
        export_site(dir.path(), &Config::default(), Some("b.png")).unwrap();

        let page = fs::read_to_string(dir.path().join("index.html")).unwrap();
        let files = page
            .split("<script>var files = ")
            .nth(1)
            .and_then(|rest| rest.split(";</script>").next())
            .unwrap();
        // The whole directory, so the box can widen the query again
        let catalog = Catalog::from_json(files).unwrap();
        let names: Vec<_> = catalog.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["a.png", "b.png"]);
        assert!(catalog[1].has_root);
        assert!(page.contains(r#"<script src="table.js"></script>"#));

        let fits = fs::read_to_string(dir.path().join("fits/index.html")).unwrap();
        assert!(fits.contains("var files = "));
        assert!(fits.contains(r#""mjj.png""#));
        assert!(fits.replace("&#x2f;", "/").contains(r#"<script src="../table.js"></script>"#));
    }

    #[test]
    fn test_template_without_container_is_fatal() {
        let dir = plots();
        let template = dir.path().join("page.html");
        fs::write(&template, r#"<input id="filter"><div id="cells"></div>"#).unwrap();
        let config = Config {
            template: Some(template),
            ..Config::default()
        };
        let err = export_site(dir.path(), &config, None).unwrap_err();
        assert!(matches!(err, GalleryError::MissingSurface(_)));
    }

    #[test]
    fn test_template_without_input_is_fatal() {
        let dir = plots();
        let template = dir.path().join("page.html");
        fs::write(&template, r#"<section id="images"></section>"#).unwrap();
        let config = Config {
            template: Some(template),
            ..Config::default()
        };
        let err = export_site(dir.path(), &config, None).unwrap_err();
        assert!(matches!(err, GalleryError::MissingQueryInput(_)));
    }
}

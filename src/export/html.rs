/// Static HTML pages
///
/// The page template holds the two elements a session binds to: the
/// `<section id="images">` container the cells go into and the
/// `<input id="filter">` query box. The page also carries its catalog and
/// loads `table.js`, which filters the cells in the browser the same way a
/// session does.
use std::path::Path;

use minijinja::{context, Environment};
use serde::Serialize;

use super::site::{NavItem, TextDump};
use crate::error::{GalleryError, Result};
use crate::gallery::render::Cell;
use crate::state::data::Catalog;
use crate::state::session::{Binding, QueryInput, Surface};

pub const IMAGES_ID: &str = "images";
pub const FILTER_ID: &str = "filter";

const PAGE_NAME: &str = "index.html";

/// Cells collected for one page
#[derive(Debug, Default)]
pub struct HtmlCells {
    cells: Vec<Cell>,
}

impl HtmlCells {
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }
}

impl Surface for HtmlCells {
    fn clear(&mut self) {
        self.cells.clear();
    }

    fn append(&mut self, cells: Vec<Cell>) {
        self.cells.extend(cells);
    }
}

/// One `<article>` as the template sees it
#[derive(Serialize)]
struct Article<'a> {
    target: &'a str,
    #[serde(flatten)]
    cell: &'a Cell,
}

/// Everything a page shows besides its cells
#[derive(Debug)]
pub struct PageContext<'a> {
    pub title: &'a str,
    pub stylesheet: String,
    pub script: String,
    /// Catalog as a JS array literal, see `embed_catalog`
    pub files: String,
    pub query: &'a str,
    pub nav: Vec<NavItem>,
    pub texts: Vec<TextDump>,
}

#[derive(Debug, Clone)]
pub struct PageTemplate {
    source: String,
}

impl Default for PageTemplate {
    fn default() -> Self {
        Self {
            source: PAGE_TEMPLATE.to_string(),
        }
    }
}

impl PageTemplate {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }

    /// Read a user-supplied template
    pub fn load(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path).map_err(|source| GalleryError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::new(source))
    }

    /// Surface to render into, found if the template has the images container
    pub fn surface(&self) -> Binding<HtmlCells> {
        Binding::lookup(IMAGES_ID, self.has_element(IMAGES_ID).then(HtmlCells::default))
    }

    pub fn filter_input(&self) -> Binding<QueryInput> {
        Binding::lookup(
            FILTER_ID,
            self.has_element(FILTER_ID).then(|| QueryInput::new(None)),
        )
    }

    fn has_element(&self, id: &str) -> bool {
        ['"', '\''].iter().any(|quote| {
            self.source.contains(&format!("id={quote}{id}{quote}"))
        })
    }

    pub fn render(&self, page: &PageContext<'_>, cells: &[Cell]) -> Result<String> {
        let mut env = Environment::new();
        env.add_template(PAGE_NAME, &self.source)?;
        let template = env.get_template(PAGE_NAME)?;

        let articles: Vec<Article<'_>> = cells
            .iter()
            .map(|cell| Article {
                target: cell.target(),
                cell,
            })
            .collect();

        let html = template.render(context! {
            title => page.title,
            stylesheet => &page.stylesheet,
            script => &page.script,
            files => &page.files,
            query => page.query,
            nav => &page.nav,
            texts => &page.texts,
            cells => &articles,
            version => env!("CARGO_PKG_VERSION"),
            generated => chrono::Local::now().format("%Y-%m-%d %H:%M").to_string(),
        })?;
        Ok(html)
    }
}

/// The catalog as a JS literal that is safe inside a `<script>` element.
///
/// `<` only occurs inside JSON strings, where `\u003c` reads the same.
pub fn embed_catalog(catalog: &Catalog) -> Result<String> {
    let json = catalog.to_json().map_err(GalleryError::Serialize)?;
    Ok(json.replace('<', "\\u003c"))
}

pub const STYLE_CSS: &str = r#"body {
  font-family: sans-serif;
  margin: 0 1em;
}
header {
  position: sticky;
  top: 0;
  background: white;
  border-bottom: 1px solid #ccc;
}
nav ul {
  list-style: square;
}
#images {
  display: flex;
  flex-wrap: wrap;
  gap: 1em;
}
#images article {
  width: 400px;
}
#images img {
  max-width: 400px;
  max-height: 300px;
}
#images p {
  font-size: small;
  word-break: break-all;
}
"#;

/// Browser side of the filter box, loaded by every page.
///
/// Reads the `files` array the page embeds and rebuilds `#images` whenever
/// the matching names change.
pub const TABLE_JS: &str = r#""use strict";

(function () {
  var MIN_QUERY_LEN = 3;

  var imagesElt = document.getElementById("images");
  if (!imagesElt) {
    throw new Error("display surface `images` not found");
  }
  var filterElt = document.getElementById("filter");
  if (!filterElt) {
    throw new Error("query input `filter` not found");
  }

  function swapExtension(name, ext) {
    return name.replace(".png", ext);
  }

  function filterFiles(query, previous) {
    if (Array.from(query).length < MIN_QUERY_LEN) {
      return files;
    }
    var regex;
    try {
      regex = new RegExp(query, "i");
    } catch (e) {
      console.warn("Ignoring invalid filter " + JSON.stringify(query) + ": " + e.message);
      return previous;
    }
    return files.filter(function (f) { return regex.test(f[0]); });
  }

  function sameEntries(a, b) {
    return a.length === b.length && a.every(function (f, i) { return f[0] === b[i][0]; });
  }

  function link(href, label) {
    var a = document.createElement("a");
    a.href = href;
    a.appendChild(document.createTextNode(label));
    return a;
  }

  function createCell(f) {
    var name = f[0];
    var cell = document.createElement("article");
    var target = document.createElement("a");
    target.href = f[3]
      ? "showROOT.html?file=" + swapExtension(name, ".root") + "&item=c;1&noselect&mathjax"
      : name;
    var img = document.createElement("img");
    img.src = name;
    target.appendChild(img);
    cell.appendChild(target);

    var par = document.createElement("p");
    par.appendChild(link(name, name));
    if (f[1]) {
      par.appendChild(document.createTextNode(" / "));
      par.appendChild(link(swapExtension(name, ".eps"), ".eps"));
    }
    if (f[2]) {
      par.appendChild(document.createTextNode(" / "));
      par.appendChild(link(swapExtension(name, ".pdf"), ".pdf"));
    }
    cell.appendChild(par);
    return cell;
  }

  function show(list) {
    imagesElt.innerHTML = "";
    list.forEach(function (f) { imagesElt.appendChild(createCell(f)); });
  }

  // The page arrives rendered for the query in the box
  var lastView = filterFiles(filterElt.value, files);
  filterElt.addEventListener("input", function (e) {
    var view = filterFiles(e.target.value, lastView);
    if (!sameEntries(view, lastView)) {
      show(view);
      lastView = view;
      console.log("Contents have been refreshed with " + view.length + " cells");
    }
  });
})();
"#;

const PAGE_TEMPLATE: &str = r#"<!doctype html>
<html>
<head>
   <meta charset="utf-8">
   <title>{{ title }}</title>
   <link rel="stylesheet" href="{{ stylesheet }}" />
</head>
<body>
<header>
  <form id="filterbar">
    <p>
    <label for="filter">Filter Images</label> :
    <input type="search" name="filter" id="filter" value="{{ query }}">
    </p>
  </form>
</header>
{%- if nav %}
<nav>
<ul>
{%- for item in nav recursive %}
<li>
<a href="{{ item.href }}">{{ item.label }}</a>
{%- if item.description %} {{ item.description }}{% endif %}
{%- if item.children %}
<ul>{{ loop(item.children) }}
</ul>
{%- endif %}
</li>
{%- endfor %}
</ul>
</nav>
{%- endif %}
{%- for text in texts %}
<pre>{{ text.content }}</pre>
{%- endfor %}
<section id="images">
{%- for cell in cells %}
<article>
<a href="{{ cell.target }}"><img src="{{ cell.image }}"></a>
<p><a href="{{ cell.caption.href }}">{{ cell.caption.label }}</a>
{%- for link in cell.formats %} / <a href="{{ link.href }}">{{ link.label }}</a>{% endfor %}</p>
</article>
{%- endfor %}
</section>
<script>var files = {{ files|safe }};</script>
<script src="{{ script }}"></script>
<footer>Generated by plot-gallery {{ version }} on {{ generated }}</footer>
</body>
</html>
"#;

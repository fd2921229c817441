/// Plain-text rendering of cells for the `list` command
use crate::gallery::render::Cell;
use crate::state::session::Surface;

/// Lines of text, one per cell
#[derive(Debug, Default)]
pub struct Listing {
    lines: Vec<String>,
}

impl Listing {
    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}

impl Surface for Listing {
    fn clear(&mut self) {
        self.lines.clear();
    }

    fn append(&mut self, cells: Vec<Cell>) {
        self.lines.extend(cells.iter().map(line));
    }
}

/// `target<TAB>caption[<TAB>format links]`
fn line(cell: &Cell) -> String {
    let mut line = format!("{}\t{}", cell.target(), cell.caption.href);
    for format in &cell.formats {
        line.push('\t');
        line.push_str(&format.href);
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gallery::render::render;
    use crate::state::data::Entry;

    #[test]
    fn test_lines() {
        let mut listing = Listing::default();
        listing.append(render(&[
            Entry::new("a.png", true, true, false),
            Entry::new("b.png", false, false, true),
        ]));
        assert_eq!(
            listing.lines(),
            [
                "a.png\ta.png\ta.eps\ta.pdf",
                "showROOT.html?file=b.root&item=c;1&noselect&mathjax\tb.png",
            ]
        );
    }
}

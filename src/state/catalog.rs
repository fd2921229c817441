use std::collections::HashSet;
use std::path::Path;

use log::{info, warn};
use serde_json::Value;
use walkdir::WalkDir;

use super::data::{Catalog, Entry};
use crate::error::{EntryError, GalleryError, Result};
use crate::gallery::render::swap_extension;

/// Extension of the images a gallery is built from
const IMAGE_EXTENSION: &str = "png";

impl Catalog {
    /// Parse a catalog written as `[[name, eps, pdf, root], ...]`.
    ///
    /// Broken elements are reported and skipped, the rest still loads.
    pub fn from_json(text: &str) -> Result<Self> {
        let elements: Vec<Value> = serde_json::from_str(text).map_err(GalleryError::CatalogFormat)?;

        let mut seen = HashSet::new();
        let mut entries = Vec::with_capacity(elements.len());
        for (index, element) in elements.iter().enumerate() {
            match parse_entry(element) {
                Ok(entry) if !seen.insert(entry.name.clone()) => {
                    warn!("Skipping catalog entry {}: {}", index, EntryError::Duplicate(entry.name));
                }
                Ok(entry) => entries.push(entry),
                Err(err) => warn!("Skipping catalog entry {}: {}", index, err),
            }
        }

        if entries.len() < elements.len() {
            info!("Loaded {} of {} catalog entries", entries.len(), elements.len());
        }
        Ok(Catalog::new(entries))
    }

    /// Read a catalog file
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| GalleryError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// Serialize back to the tuple form `from_json` reads
    pub fn to_json(&self) -> serde_json::Result<String> {
        let rows: Vec<(&str, bool, bool, bool)> = self
            .iter()
            .map(|e| (e.name.as_str(), e.has_eps, e.has_pdf, e.has_root))
            .collect();
        serde_json::to_string_pretty(&rows)
    }
}

fn parse_entry(element: &Value) -> std::result::Result<Entry, EntryError> {
    let fields = element.as_array().ok_or(EntryError::NotATuple)?;
    if fields.len() != 4 {
        return Err(EntryError::Arity(fields.len()));
    }

    let name = fields[0]
        .as_str()
        .filter(|name| !name.is_empty())
        .ok_or(EntryError::MissingName)?;
    let flag = |i: usize| fields[i].as_bool().ok_or(EntryError::BadFlag(i));

    Ok(Entry::new(name, flag(1)?, flag(2)?, flag(3)?))
}

/// Build a catalog from the `.png` files directly inside `dir`.
///
/// Files are taken in name order. Each entry records which of the `.eps`,
/// `.pdf` and `.root` siblings sit next to the image.
pub fn scan_directory(dir: &Path) -> Result<Catalog> {
    let mut names = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = match entry {
            Ok(entry) => entry,
            // Unreadable or dangling entries inside the directory
            Err(err) if err.depth() > 0 => {
                warn!("Skipping {}", err);
                continue;
            }
            Err(source) => {
                return Err(GalleryError::Scan {
                    path: dir.to_path_buf(),
                    source,
                })
            }
        };
        if entry.file_type().is_file() {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }

    let present: HashSet<&str> = names.iter().map(String::as_str).collect();
    let has = |name: &str, ext: &str| present.contains(swap_extension(name, ext).as_str());

    let entries: Vec<Entry> = names
        .iter()
        .filter(|name| {
            Path::new(name.as_str())
                .extension()
                .is_some_and(|ext| ext == IMAGE_EXTENSION)
        })
        .map(|name| Entry::new(name.as_str(), has(name, ".eps"), has(name, ".pdf"), has(name, ".root")))
        .collect();

    info!("Found {} images in {}", entries.len(), dir.display());
    Ok(Catalog::new(entries))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn names(catalog: &Catalog) -> Vec<&str> {
        catalog.iter().map(|e| e.name.as_str()).collect()
    }

    #[test]
    fn test_from_json() {
        let catalog = Catalog::from_json(
            r#"[["a.png", true, false, false], ["b.png", false, true, true]]"#,
        )
        .unwrap();
        assert_eq!(
            &*catalog,
            &[
                Entry::new("a.png", true, false, false),
                Entry::new("b.png", false, true, true),
            ]
        );
    }

    #[test]
    fn test_malformed_entries_are_skipped() {
        let catalog = Catalog::from_json(
            r#"[
                ["a.png", true, false, false],
                {"name": "obj.png"},
                ["short.png", true],
                [null, true, false, false],
                ["", true, false, false],
                ["flag.png", "yes", false, false],
                ["a.png", false, false, false],
                ["c.png", false, false, true]
            ]"#,
        )
        .unwrap();
        assert_eq!(names(&catalog), ["a.png", "c.png"]);
        assert!(catalog[0].has_eps, "first occurrence of a duplicate wins");
    }

    #[test]
    fn test_not_an_array_is_an_error() {
        let err = Catalog::from_json(r#"{"files": []}"#).unwrap_err();
        assert!(matches!(err, GalleryError::CatalogFormat(_)));
    }

    #[test]
    fn test_parse_entry_reasons() {
        use serde_json::json;
        assert_eq!(parse_entry(&json!("a.png")), Err(EntryError::NotATuple));
        assert_eq!(parse_entry(&json!(["a.png"])), Err(EntryError::Arity(1)));
        assert_eq!(parse_entry(&json!([1, true, true, true])), Err(EntryError::MissingName));
        assert_eq!(parse_entry(&json!(["a.png", true, true, 0])), Err(EntryError::BadFlag(3)));
    }

    #[test]
    fn test_to_json_reloads() {
        let catalog = Catalog::new(vec![Entry::new("a.png", true, false, true)]);
        let reloaded = Catalog::from_json(&catalog.to_json().unwrap()).unwrap();
        assert_eq!(&*reloaded, &*catalog);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Catalog::load(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, GalleryError::Read { .. }));
    }

    #[test]
    fn test_scan_directory() {
        let dir = tempfile::tempdir().unwrap();
        for file in [
            "b_mjj.png",
            "b_mjj.pdf",
            "a_pulls.png",
            "a_pulls.eps",
            "a_pulls.root",
            "notes.txt",
            "c.pdf",
        ] {
            fs::write(dir.path().join(file), b"").unwrap();
        }
        fs::create_dir(dir.path().join("sub.png")).unwrap();

        let catalog = scan_directory(dir.path()).unwrap();
        assert_eq!(
            &*catalog,
            &[
                Entry::new("a_pulls.png", true, false, true),
                Entry::new("b_mjj.png", false, true, false),
            ]
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_scan_follows_symlinked_plots() {
        use std::os::unix::fs::symlink;

        let store = tempfile::tempdir().unwrap();
        fs::write(store.path().join("fit.png"), b"").unwrap();
        fs::write(store.path().join("fit.root"), b"").unwrap();

        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("plain.png"), b"").unwrap();
        symlink(store.path().join("fit.png"), dir.path().join("fit.png")).unwrap();
        symlink(store.path().join("fit.root"), dir.path().join("fit.root")).unwrap();
        symlink(store.path().join("gone.png"), dir.path().join("dangling.png")).unwrap();

        let catalog = scan_directory(dir.path()).unwrap();
        assert_eq!(
            &*catalog,
            &[
                Entry::new("fit.png", false, false, true),
                Entry::new("plain.png", false, false, false),
            ]
        );
    }

    #[test]
    fn test_scan_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let err = scan_directory(&dir.path().join("missing")).unwrap_err();
        assert!(matches!(err, GalleryError::Scan { .. }));
    }
}

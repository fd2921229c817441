use std::path::{Path, PathBuf};

use log::{info, warn};
use serde::Serialize;
use walkdir::WalkDir;

use crate::config::Config;
use crate::error::{GalleryError, Result};

/// A directory of the exported tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirNode {
    pub name: String,
    /// Path relative to the export root, empty for the root itself
    pub rel: PathBuf,
    /// Contents of the description file, if the directory has one
    pub description: Option<String>,
    /// Subdirectories in name order
    pub children: Vec<DirNode>,
}

/// Navigation entry as the page template sees it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavItem {
    pub href: String,
    pub label: String,
    pub description: Option<String>,
    pub children: Vec<NavItem>,
}

/// A text file shown verbatim on the page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextDump {
    pub name: String,
    pub content: String,
}

impl DirNode {
    /// Walk `root` and every subdirectory not listed in `skip_dirs`
    pub fn build(root: &Path, config: &Config) -> Result<Self> {
        let name = root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| ".".to_string());
        Self::build_at(root, name, PathBuf::new(), config, &[])
    }

    /// `ancestors` holds the resolved paths above `path`, so that a symlink
    /// pointing back up the tree is not followed forever
    fn build_at(
        path: &Path,
        name: String,
        rel: PathBuf,
        config: &Config,
        ancestors: &[PathBuf],
    ) -> Result<Self> {
        let description = read_description(&path.join(&config.description_file));

        let resolved = std::fs::canonicalize(path).map_err(|source| GalleryError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut chain = ancestors.to_vec();
        chain.push(resolved);

        let mut children = Vec::new();
        for entry in WalkDir::new(path)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name()
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) if err.depth() > 0 => {
                    warn!("Skipping {}", err);
                    continue;
                }
                Err(source) => {
                    return Err(GalleryError::Scan {
                        path: path.to_path_buf(),
                        source,
                    })
                }
            };
            if !entry.file_type().is_dir() {
                continue;
            }
            let child = entry.file_name().to_string_lossy().into_owned();
            if config.skip_dirs.contains(&child) {
                info!("Skipping {}", entry.path().display());
                continue;
            }
            let target = std::fs::canonicalize(entry.path()).ok();
            if target.as_ref().is_some_and(|target| chain.contains(target)) {
                warn!("Skipping {}: links back to a parent directory", entry.path().display());
                continue;
            }
            children.push(Self::build_at(
                entry.path(),
                child.clone(),
                rel.join(&child),
                config,
                &chain,
            )?);
        }

        Ok(DirNode {
            name,
            rel,
            description,
            children,
        })
    }

    /// Number of levels below the export root
    pub fn depth(&self) -> usize {
        self.rel.components().count()
    }

    /// Every node of the tree, parents before children
    pub fn walk(&self) -> Vec<&DirNode> {
        let mut nodes = vec![self];
        for child in &self.children {
            nodes.extend(child.walk());
        }
        nodes
    }

    /// Navigation tree of the descendants, with links relative to this directory
    pub fn nav(&self) -> Vec<NavItem> {
        nav_items(&self.children, "")
    }

    /// Stylesheet path as seen from this directory's page
    pub fn stylesheet_href(&self) -> String {
        self.shared_href("style.css")
    }

    /// Path of a file at the export root as seen from this directory's page
    pub fn shared_href(&self, file: &str) -> String {
        format!("{}{file}", "../".repeat(self.depth()))
    }

    /// `.txt` files of this directory in name order, description file excluded
    pub fn text_dumps(&self, root: &Path, config: &Config) -> Vec<TextDump> {
        let dir = root.join(&self.rel);
        WalkDir::new(&dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter(|e| e.path().extension().is_some_and(|ext| ext == "txt"))
            .filter(|e| e.file_name() != config.description_file.as_str())
            .filter_map(|e| match std::fs::read_to_string(e.path()) {
                Ok(content) => Some(TextDump {
                    name: e.file_name().to_string_lossy().into_owned(),
                    content,
                }),
                Err(err) => {
                    warn!("Cannot read {}: {}", e.path().display(), err);
                    None
                }
            })
            .collect()
    }
}

fn nav_items(nodes: &[DirNode], prefix: &str) -> Vec<NavItem> {
    nodes
        .iter()
        .map(|node| {
            let base = format!("{prefix}{}/", node.name);
            NavItem {
                href: format!("{base}index.html"),
                label: node.name.clone(),
                description: node.description.clone(),
                children: nav_items(&node.children, &base),
            }
        })
        .collect()
}

fn read_description(path: &Path) -> Option<String> {
    let text = std::fs::read_to_string(path).ok()?;
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

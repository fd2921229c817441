use image::imageops::FilterType;
use log::{debug, warn};
use std::collections::hash_map::DefaultHasher;
use std::fs;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::task;

#[derive(Debug, Error)]
pub enum ThumbnailError {
    #[error("no cache directory available")]
    NoCacheDir,
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Image(#[from] image::ImageError),
}

/// Get the thumbnail cache directory
/// Returns ~/.cache/plot-gallery/thumbnails on Linux
pub fn cache_dir() -> Result<PathBuf, ThumbnailError> {
    let mut path = dirs::cache_dir()
        .or_else(dirs::home_dir)
        .ok_or(ThumbnailError::NoCacheDir)?;

    path.push("plot-gallery");
    path.push("thumbnails");

    fs::create_dir_all(&path)?;
    Ok(path)
}

/// Cache file for `source` at `size`.
///
/// The key covers the path and modification time, so an edited plot gets
/// a fresh thumbnail.
fn thumbnail_path(cache: &Path, source: &Path, size: u32) -> Result<PathBuf, ThumbnailError> {
    let modified = fs::metadata(source)?.modified()?;

    let mut hasher = DefaultHasher::new();
    source.hash(&mut hasher);
    modified.hash(&mut hasher);
    size.hash(&mut hasher);

    Ok(cache.join(format!("{:016x}.png", hasher.finish())))
}

/// Return the cached thumbnail of `source`, generating it if needed
pub fn ensure_thumbnail(cache: &Path, source: &Path, size: u32) -> Result<PathBuf, ThumbnailError> {
    let path = thumbnail_path(cache, source, size)?;
    if path.exists() {
        return Ok(path);
    }

    let img = image::open(source)?;
    let thumbnail = img.resize(size, size, FilterType::Lanczos3);
    thumbnail.save(&path)?;

    debug!("Generated thumbnail: {}", path.display());
    Ok(path)
}

/// Generate thumbnails for `names` inside `dir` on a blocking thread.
///
/// Returns the pairs that succeeded; failures are logged and the grid keeps
/// showing the full-size image for them.
pub async fn generate_thumbnails(dir: PathBuf, names: Vec<String>, size: u32) -> Vec<(String, PathBuf)> {
    let result = task::spawn_blocking(move || {
        let cache = match cache_dir() {
            Ok(cache) => cache,
            Err(e) => {
                warn!("Thumbnails disabled: {}", e);
                return Vec::new();
            }
        };

        names
            .into_iter()
            .filter_map(|name| match ensure_thumbnail(&cache, &dir.join(&name), size) {
                Ok(path) => Some((name, path)),
                Err(e) => {
                    warn!("No thumbnail for {}: {}", name, e);
                    None
                }
            })
            .collect()
    })
    .await;

    result.unwrap_or_else(|e| {
        warn!("Thumbnail task failed: {}", e);
        Vec::new()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgb};

    #[test]
    fn test_thumbnail_is_resized_and_cached() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("plot.png");
        ImageBuffer::from_pixel(40, 20, Rgb([255u8, 0, 0]))
            .save(&source)
            .unwrap();
        let cache = dir.path().join("cache");
        fs::create_dir(&cache).unwrap();

        let first = ensure_thumbnail(&cache, &source, 10).unwrap();
        let thumb = image::open(&first).unwrap();
        assert_eq!((thumb.width(), thumb.height()), (10, 5));

        let second = ensure_thumbnail(&cache, &source, 10).unwrap();
        assert_eq!(first, second);

        let bigger = ensure_thumbnail(&cache, &source, 20).unwrap();
        assert_ne!(first, bigger);
    }

    #[test]
    fn test_unreadable_image_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("broken.png");
        fs::write(&source, b"not a png").unwrap();
        let err = ensure_thumbnail(dir.path(), &source, 10).unwrap_err();
        assert!(matches!(err, ThumbnailError::Image(_)));
    }
}

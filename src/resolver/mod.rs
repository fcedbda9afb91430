//! Material and image resolution seams.
//!
//! The importer core does not parse MTL text or decode images itself; it
//! consumes the [`MaterialResolver`] and [`ImageResolver`] contracts. What the
//! core does own is the integration: invoking the material resolver only when
//! pass 1 saw material usage, collecting every distinct texture path across
//! the resolved materials, resolving relative paths against the base
//! directory, and loading each distinct path exactly once.

use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use std::thread;

use log::debug;

use crate::error::{ImportError, Result};
use crate::types::{ImageInfo, Material};

/// Resolves a material library path into named material definitions.
pub trait MaterialResolver {
    /// Resolve the library at `path` to a name → material mapping.
    ///
    /// Failures are pipeline-fatal and propagate unchanged.
    fn resolve(&self, path: &Path) -> Result<HashMap<String, Material>>;
}

/// Loads and decodes a single texture image.
///
/// `Sync` so distinct paths can be loaded on concurrent threads.
pub trait ImageResolver: Sync {
    /// Load the image at `path`.
    ///
    /// Failures are pipeline-fatal and propagate unchanged.
    fn load(&self, path: &Path) -> Result<ImageInfo>;
}

/// Filesystem-backed image resolver decoding through the `image` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileImageResolver;

impl ImageResolver for FileImageResolver {
    fn load(&self, path: &Path) -> Result<ImageInfo> {
        let data = std::fs::read(path)?;
        let rgba = image::load_from_memory(&data)?.to_rgba8();
        let (width, height) = rgba.dimensions();
        debug!("loaded texture {} ({}x{})", path.display(), width, height);

        Ok(ImageInfo {
            path: path.to_path_buf(),
            width,
            height,
            pixels: rgba.into_raw(),
        })
    }
}

/// Load every distinct texture path referenced by `materials`.
///
/// Relative paths are resolved against `base_dir`. A path shared by several
/// materials (or several map slots) is loaded once. Loads fan out on scoped
/// threads and are joined together; the first failure fails the whole batch.
/// The returned map is keyed by the path as referenced in the material.
pub fn load_images(
    base_dir: &Path,
    materials: &HashMap<String, Material>,
    resolver: &dyn ImageResolver,
) -> Result<HashMap<String, ImageInfo>> {
    // BTreeSet both deduplicates and gives a stable spawn order.
    let paths: BTreeSet<&str> = materials
        .values()
        .flat_map(|material| material.texture_paths())
        .collect();

    let mut images = HashMap::with_capacity(paths.len());
    thread::scope(|scope| -> Result<()> {
        let handles: Vec<_> = paths
            .iter()
            .map(|&referenced| {
                let full = resolve_relative(base_dir, referenced);
                (referenced, scope.spawn(move || resolver.load(&full)))
            })
            .collect();

        for (referenced, handle) in handles {
            let loaded = handle.join().map_err(|_| {
                ImportError::ImageResolution(format!("texture load panicked: {}", referenced))
            })?;
            images.insert(referenced.to_string(), loaded?);
        }
        Ok(())
    })?;

    Ok(images)
}

/// Resolve a possibly-relative path against the base directory.
pub fn resolve_relative(base_dir: &Path, path: &str) -> PathBuf {
    let path = Path::new(path);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    }
}

//! Shared types used throughout the library.

use std::path::PathBuf;

/// An axis-aligned bounding box accumulated from emitted vertex positions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min: [f32; 3],
    pub max: [f32; 3],
}

impl BoundingBox {
    pub fn new(min: [f32; 3], max: [f32; 3]) -> Self {
        Self { min, max }
    }

    /// Create an empty box that any real point will shrink onto.
    pub fn empty() -> Self {
        Self {
            min: [f32::MAX; 3],
            max: [f32::MIN; 3],
        }
    }

    /// Expand the box to include a point.
    pub fn include(&mut self, point: [f32; 3]) {
        let p = glam::Vec3::from(point);
        let min = glam::Vec3::from(self.min).min(p);
        let max = glam::Vec3::from(self.max).max(p);
        self.min = min.to_array();
        self.max = max.to_array();
    }

    pub fn dimensions(&self) -> [f32; 3] {
        [
            self.max[0] - self.min[0],
            self.max[1] - self.min[1],
            self.max[2] - self.min[2],
        ]
    }
}

/// A resolved material definition.
///
/// Produced by a [`MaterialResolver`](crate::resolver::MaterialResolver); the
/// importer only routes these through to the output and collects their texture
/// paths. Map slots left `None` reference no texture.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Material {
    /// Material name as declared in the library (`newmtl`).
    pub name: String,
    /// Ambient color (Ka).
    pub ambient: [f32; 3],
    /// Diffuse color (Kd).
    pub diffuse: [f32; 3],
    /// Specular color (Ks).
    pub specular: [f32; 3],
    /// Dissolve / opacity (d). 1.0 is fully opaque.
    pub dissolve: f32,
    /// Diffuse texture map path (map_Kd).
    pub diffuse_map: Option<String>,
    /// Ambient texture map path (map_Ka).
    pub ambient_map: Option<String>,
    /// Specular texture map path (map_Ks).
    pub specular_map: Option<String>,
    /// Bump/normal texture map path (map_Bump / bump).
    pub bump_map: Option<String>,
}

impl Material {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ambient: [1.0, 1.0, 1.0],
            diffuse: [1.0, 1.0, 1.0],
            specular: [0.0, 0.0, 0.0],
            dissolve: 1.0,
            ..Self::default()
        }
    }

    /// Iterate over the texture paths this material references.
    pub fn texture_paths(&self) -> impl Iterator<Item = &str> {
        [
            self.diffuse_map.as_deref(),
            self.ambient_map.as_deref(),
            self.specular_map.as_deref(),
            self.bump_map.as_deref(),
        ]
        .into_iter()
        .flatten()
    }
}

/// Decoded metadata for one texture path.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageInfo {
    /// Path the image was loaded from, after base-directory resolution.
    pub path: PathBuf,
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// RGBA8 pixel data (4 bytes per pixel).
    pub pixels: Vec<u8>,
}

impl ImageInfo {
    /// Check if this image has any non-opaque pixels.
    pub fn has_transparency(&self) -> bool {
        self.pixels.chunks(4).any(|pixel| pixel[3] < 255)
    }
}

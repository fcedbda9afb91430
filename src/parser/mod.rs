//! Two-pass OBJ import pipeline.
//!
//! Pass 1 scans the file for metadata (layout flags, material library), the
//! material and image resolvers run on that metadata, and pass 2 builds the
//! indexed geometry. The file is reopened per pass and streamed one line at a
//! time, so memory stays bounded regardless of file size.

pub mod builder;
pub mod line;

pub use builder::{GeometryBuilder, ParseWarning, WarningKind};

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::debug;

use crate::error::Result;
use crate::resolver::{self, ImageResolver, MaterialResolver};
use crate::scanner::{scan_metadata, ObjMetadata};
use crate::types::{ImageInfo, Material};

/// The assembled import result handed to a downstream exporter.
#[derive(Debug)]
pub struct ObjOutput {
    /// Number of distinct vertices.
    pub vertex_count: usize,
    /// Interleaved vertex data; vertex `i` occupies
    /// `[i * stride, (i + 1) * stride)`.
    pub vertex_array: Vec<f32>,
    /// Per-axis minimum over emitted positions.
    pub position_min: [f32; 3],
    /// Per-axis maximum over emitted positions.
    pub position_max: [f32; 3],
    /// Whether each vertex carries a normal.
    pub has_normals: bool,
    /// Whether each vertex carries a texture coordinate.
    pub has_uvs: bool,
    /// Triangle index lists per material name. Each length is a multiple of 3.
    pub material_groups: HashMap<String, Vec<u32>>,
    /// Resolved materials, plus the fallback material if any face used it.
    pub materials: HashMap<String, Material>,
    /// Decoded textures keyed by the path as referenced in the materials.
    pub images: HashMap<String, ImageInfo>,
    /// Non-fatal diagnostics collected during the geometry pass.
    pub warnings: Vec<ParseWarning>,
}

impl ObjOutput {
    /// Floats per vertex in [`vertex_array`](Self::vertex_array).
    pub fn stride(&self) -> usize {
        3 + if self.has_normals { 3 } else { 0 } + if self.has_uvs { 2 } else { 0 }
    }

    /// Total triangle count across all material groups.
    pub fn triangle_count(&self) -> usize {
        self.material_groups.values().map(|g| g.len() / 3).sum()
    }

    /// Returns `true` if no face produced geometry.
    pub fn is_empty(&self) -> bool {
        self.vertex_count == 0
    }
}

/// Import an OBJ file into an [`ObjOutput`].
///
/// `base_dir` anchors relative material-library and texture paths. The
/// material resolver runs only when pass 1 saw a `usemtl` record and a
/// library reference; the image resolver runs once per distinct texture path.
/// Resolver failures and I/O errors are fatal; syntactic problems in face
/// records are collected as [`ParseWarning`]s instead.
pub fn import(
    path: &Path,
    base_dir: &Path,
    material_resolver: &dyn MaterialResolver,
    image_resolver: &dyn ImageResolver,
) -> Result<ObjOutput> {
    let meta = scan_metadata(BufReader::new(File::open(path)?))?;

    let mut materials = resolve_materials(&meta, base_dir, material_resolver)?;
    let images = resolver::load_images(base_dir, &materials, image_resolver)?;

    let mut geometry_builder = GeometryBuilder::new(&meta, materials.keys().cloned());
    let reader = BufReader::new(File::open(path)?);
    for line in reader.lines() {
        geometry_builder.consume_line(&line?);
    }
    let built = geometry_builder.finish();

    // Faces that fell back to the default group need a matching material
    // entry so every group name resolves in the output.
    if let Some(name) = &built.default_material {
        materials.insert(name.clone(), Material::new(name.clone()));
    }

    debug!(
        "imported {}: {} vertices, {} triangles, {} groups, {} warnings",
        path.display(),
        built.vertex_count,
        built.material_groups.values().map(|g| g.len() / 3).sum::<usize>(),
        built.material_groups.len(),
        built.warnings.len()
    );

    Ok(ObjOutput {
        vertex_count: built.vertex_count,
        vertex_array: built.vertex_array,
        position_min: built.bounds.min,
        position_max: built.bounds.max,
        has_normals: meta.has_normals,
        has_uvs: meta.has_uvs,
        material_groups: built.material_groups,
        materials,
        images,
        warnings: built.warnings,
    })
}

/// Run the material resolver if pass 1 detected material usage.
///
/// Skipped entirely (empty map) when the file never switches materials or
/// names no library.
fn resolve_materials(
    meta: &ObjMetadata,
    base_dir: &Path,
    material_resolver: &dyn MaterialResolver,
) -> Result<HashMap<String, Material>> {
    match &meta.material_library {
        Some(library) if meta.has_material_groups => {
            let full = resolver::resolve_relative(base_dir, library);
            material_resolver.resolve(&full)
        }
        _ => Ok(HashMap::new()),
    }
}

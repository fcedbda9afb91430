//! # OBJ Importer
//!
//! A streaming Wavefront OBJ importer that produces an indexed,
//! material-partitioned vertex/triangle buffer for a downstream exporter.
//!
//! ## Overview
//!
//! The importer makes two forward passes over the file. The first pass scans
//! for metadata: which attributes are present (so the vertex layout is fixed
//! once for the whole file) and the first material-library reference. The
//! second pass builds the geometry: deduplicated vertices keyed by the
//! literal face-corner text, quad fan triangulation, a running bounding box,
//! and triangle lists partitioned per `usemtl` group.
//!
//! Material-library parsing and texture decoding are pluggable through the
//! [`MaterialResolver`] and [`ImageResolver`] traits; a filesystem-backed
//! image resolver is provided.
//!
//! ## Quick Start
//!
//! ```ignore
//! use obj_importer::{import_obj_file, FileImageResolver};
//!
//! let output = import_obj_file(
//!     "model.obj",
//!     "assets/",
//!     &my_mtl_resolver,
//!     &FileImageResolver,
//! )?;
//!
//! assert_eq!(output.vertex_array.len(), output.vertex_count * output.stride());
//! for (material, indices) in &output.material_groups {
//!     // three indices per triangle, ready for an index buffer
//! }
//! ```

pub mod error;
pub mod parser;
pub mod resolver;
pub mod scanner;
pub mod types;

// Re-export main types for convenience
pub use error::{ImportError, Result};
pub use parser::{ObjOutput, ParseWarning, WarningKind};
pub use resolver::{FileImageResolver, ImageResolver, MaterialResolver};
pub use scanner::ObjMetadata;
pub use types::{BoundingBox, ImageInfo, Material};

use std::path::Path;

/// Import an OBJ file from a path, resolving relative material-library and
/// texture paths against `base_dir`.
pub fn import_obj_file<P: AsRef<Path>, Q: AsRef<Path>>(
    path: P,
    base_dir: Q,
    material_resolver: &dyn MaterialResolver,
    image_resolver: &dyn ImageResolver,
) -> Result<ObjOutput> {
    parser::import(
        path.as_ref(),
        base_dir.as_ref(),
        material_resolver,
        image_resolver,
    )
}

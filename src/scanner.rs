//! First-pass metadata scan.
//!
//! A single forward pass over the OBJ stream that records which record kinds
//! are present and captures the first material-library reference. No geometry
//! is buffered; the scan exists so the material resolver can run before the
//! heavier geometry pass, and so the vertex layout is fixed once for the whole
//! file rather than shifting when the first `vn`/`vt` line happens to appear.

use std::io::BufRead;

use log::debug;

use crate::error::{ImportError, Result};

/// Presence flags and material-library reference gathered in pass 1.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjMetadata {
    /// At least one `v` record was seen.
    pub has_positions: bool,
    /// At least one `vn` record was seen.
    pub has_normals: bool,
    /// At least one `vt` record was seen.
    pub has_uvs: bool,
    /// At least one `usemtl` record was seen.
    pub has_material_groups: bool,
    /// The first `mtllib` reference, if any. Later references are ignored.
    pub material_library: Option<String>,
}

impl ObjMetadata {
    /// Floats per output vertex under this layout.
    pub fn stride(&self) -> usize {
        3 + if self.has_normals { 3 } else { 0 } + if self.has_uvs { 2 } else { 0 }
    }
}

/// Scan an OBJ stream for metadata.
///
/// Fails with [`ImportError::MissingGeometry`] if the stream contains no
/// position records, aborting the pipeline before the geometry pass.
pub fn scan_metadata<R: BufRead>(reader: R) -> Result<ObjMetadata> {
    let mut meta = ObjMetadata::default();

    for line in reader.lines() {
        let line = line?;
        let mut tokens = line.split_whitespace();
        match tokens.next() {
            Some("v") => meta.has_positions = true,
            Some("vn") => meta.has_normals = true,
            Some("vt") => meta.has_uvs = true,
            Some("usemtl") => meta.has_material_groups = true,
            Some("mtllib") => {
                if meta.material_library.is_none() {
                    if let Some(name) = tokens.next() {
                        meta.material_library = Some(name.to_string());
                    }
                }
            }
            _ => {}
        }
    }

    if !meta.has_positions {
        return Err(ImportError::MissingGeometry);
    }

    debug!(
        "scan: normals={} uvs={} groups={} mtllib={:?}",
        meta.has_normals, meta.has_uvs, meta.has_material_groups, meta.material_library
    );

    Ok(meta)
}

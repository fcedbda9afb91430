//! Second-pass geometry construction.
//!
//! [`GeometryBuilder`] owns all per-parse mutable state: the raw attribute
//! pools, the vertex identity cache, the interleaved output buffer, the
//! bounding box, and the material group partition. One builder is driven over
//! the line stream and then frozen into its result; nothing is shared or
//! global, so independent files can be parsed concurrently.

use std::collections::{HashMap, HashSet};
use std::fmt;

use log::warn;

use crate::parser::line::{self, ObjLine, ParsedCorner};
use crate::scanner::ObjMetadata;
use crate::types::BoundingBox;

/// A non-fatal diagnostic attached to one input line.
///
/// Warnings never abort the import; the offending record is skipped and the
/// rest of the file still produces geometry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseWarning {
    /// 1-based line number in the OBJ file.
    pub line: usize,
    /// What went wrong.
    pub kind: WarningKind,
}

/// Kinds of recoverable parse problems.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WarningKind {
    /// A face with fewer than 3 or more than 4 corners.
    UnsupportedFace { corners: usize },
    /// A recognized record whose fields could not be parsed.
    MalformedRecord,
    /// A face corner index resolving outside its attribute pool.
    IndexOutOfRange,
}

impl fmt::Display for WarningKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WarningKind::UnsupportedFace { corners } => {
                write!(f, "unsupported face with {} corners", corners)
            }
            WarningKind::MalformedRecord => write!(f, "malformed record"),
            WarningKind::IndexOutOfRange => write!(f, "face index out of range"),
        }
    }
}

/// Frozen result of the geometry pass.
#[derive(Debug)]
pub struct BuiltGeometry {
    /// Number of distinct vertices emitted.
    pub vertex_count: usize,
    /// Interleaved vertex data, `vertex_count * stride` floats.
    pub vertex_array: Vec<f32>,
    /// Bounding box over emitted positions. Sentinel-valued when no vertex
    /// was emitted.
    pub bounds: BoundingBox,
    /// Triangle index lists per material name. Each length is a multiple of 3.
    pub material_groups: HashMap<String, Vec<u32>>,
    /// Name of the fallback material, if any face landed in it.
    pub default_material: Option<String>,
    /// Diagnostics collected while parsing.
    pub warnings: Vec<ParseWarning>,
}

/// Streaming builder for the geometry pass.
pub struct GeometryBuilder {
    has_normals: bool,
    has_uvs: bool,
    stride: usize,

    // Raw attribute pools in file order, flat component layout.
    positions: Vec<f32>,
    normals: Vec<f32>,
    uvs: Vec<f32>,

    // Literal corner key -> dense vertex id, first-seen order.
    cache: HashMap<String, u32>,
    vertex_array: Vec<f32>,
    bounds: BoundingBox,

    groups: HashMap<String, Vec<u32>>,
    current_group: String,
    material_names: HashSet<String>,
    default_material: String,
    default_used: bool,

    warnings: Vec<ParseWarning>,
    line_number: usize,
}

impl GeometryBuilder {
    /// Create a builder for the layout fixed in pass 1, with the set of
    /// resolved material names used to validate `usemtl` switches.
    pub fn new(meta: &ObjMetadata, material_names: impl IntoIterator<Item = String>) -> Self {
        let material_names: HashSet<String> = material_names.into_iter().collect();

        // Pick a fallback name no resolved material already uses.
        let mut default_material = String::from("default");
        while material_names.contains(&default_material) {
            default_material.push('_');
        }

        Self {
            has_normals: meta.has_normals,
            has_uvs: meta.has_uvs,
            stride: meta.stride(),
            positions: Vec::new(),
            normals: Vec::new(),
            uvs: Vec::new(),
            cache: HashMap::new(),
            vertex_array: Vec::new(),
            bounds: BoundingBox::empty(),
            groups: HashMap::new(),
            current_group: default_material.clone(),
            material_names,
            default_material,
            default_used: false,
            warnings: Vec::new(),
            line_number: 0,
        }
    }

    /// Consume one line of the OBJ stream.
    pub fn consume_line(&mut self, raw: &str) {
        self.line_number += 1;

        match line::classify(raw) {
            ObjLine::Blank | ObjLine::Other => {}
            ObjLine::Position(xyz) => self.positions.extend_from_slice(&xyz),
            ObjLine::Normal(xyz) => {
                // Raw normals are never stored; unit-length (or zero) only.
                let n = glam::Vec3::from(xyz).normalize_or_zero();
                self.normals.extend_from_slice(&n.to_array());
            }
            ObjLine::TexCoord([u, v]) => {
                // Flip v to a bottom-left texture origin.
                self.uvs.extend_from_slice(&[u, 1.0 - v]);
            }
            ObjLine::Face(corners) => self.consume_face(&corners),
            ObjLine::UseMtl(name) => {
                self.current_group = if self.material_names.contains(name) {
                    name.to_string()
                } else {
                    self.default_material.clone()
                };
            }
            // mtllib was consumed in pass 1; nothing to do here.
            ObjLine::MtlLib(_) => {}
            ObjLine::Malformed => self.push_warning(WarningKind::MalformedRecord),
        }
    }

    /// Freeze the builder into its result.
    pub fn finish(self) -> BuiltGeometry {
        BuiltGeometry {
            vertex_count: self.cache.len(),
            vertex_array: self.vertex_array,
            bounds: self.bounds,
            material_groups: self.groups,
            default_material: self.default_used.then_some(self.default_material),
            warnings: self.warnings,
        }
    }

    fn consume_face(&mut self, corners: &[ParsedCorner<'_>]) {
        if corners.len() < 3 || corners.len() > 4 {
            self.push_warning(WarningKind::UnsupportedFace {
                corners: corners.len(),
            });
            return;
        }

        let mut ids = [0u32; 4];
        for (slot, corner) in ids.iter_mut().zip(corners) {
            match self.resolve_corner(corner) {
                Some(id) => *slot = id,
                None => {
                    self.push_warning(WarningKind::IndexOutOfRange);
                    return;
                }
            }
        }

        if self.current_group == self.default_material {
            self.default_used = true;
        }
        let group = self.groups.entry(self.current_group.clone()).or_default();
        group.extend_from_slice(&[ids[0], ids[1], ids[2]]);
        if corners.len() == 4 {
            // Fan split along the 1-3 diagonal.
            group.extend_from_slice(&[ids[0], ids[2], ids[3]]);
        }
    }

    /// Resolve one corner to its dense vertex id, emitting the vertex on
    /// first sight of its literal key.
    ///
    /// Identity is the literal key string, so a repeated key always reuses
    /// its id even when a relative index would now resolve elsewhere.
    fn resolve_corner(&mut self, corner: &ParsedCorner<'_>) -> Option<u32> {
        if let Some(&id) = self.cache.get(corner.key) {
            return Some(id);
        }

        let pos_off = resolve_index(corner.indices.position(), self.positions.len(), 3)?;
        let normal_off = match corner.indices.normal() {
            Some(index) => Some(resolve_index(index, self.normals.len(), 3)?),
            None => None,
        };
        let uv_off = match corner.indices.uv() {
            Some(index) => Some(resolve_index(index, self.uvs.len(), 2)?),
            None => None,
        };

        let position = [
            self.positions[pos_off],
            self.positions[pos_off + 1],
            self.positions[pos_off + 2],
        ];
        self.vertex_array.extend_from_slice(&position);
        self.bounds.include(position);

        if self.has_normals {
            match normal_off {
                Some(off) => {
                    let normal = [self.normals[off], self.normals[off + 1], self.normals[off + 2]];
                    self.vertex_array.extend_from_slice(&normal);
                }
                None => self.vertex_array.extend_from_slice(&[0.0, 0.0, 0.0]),
            }
        }
        if self.has_uvs {
            match uv_off {
                Some(off) => {
                    let uv = [self.uvs[off], self.uvs[off + 1]];
                    self.vertex_array.extend_from_slice(&uv);
                }
                None => self.vertex_array.extend_from_slice(&[0.0, 0.0]),
            }
        }

        let id = self.cache.len() as u32;
        self.cache.insert(corner.key.to_string(), id);
        debug_assert_eq!(self.vertex_array.len(), self.cache.len() * self.stride);
        Some(id)
    }

    fn push_warning(&mut self, kind: WarningKind) {
        warn!("line {}: {}", self.line_number, kind);
        self.warnings.push(ParseWarning {
            line: self.line_number,
            kind,
        });
    }
}

/// Resolve a 1-based or negative relative index into a flat component offset.
///
/// Negative indices count back from the pool length at the moment the face
/// line is processed, so the same index can resolve differently as the pool
/// grows. Returns `None` when the resolved record is outside the pool.
fn resolve_index(index: i64, pool_len: usize, components: usize) -> Option<usize> {
    let count = (pool_len / components) as i64;
    let record = if index < 0 { count + index } else { index - 1 };
    if record < 0 || record >= count {
        return None;
    }
    Some(record as usize * components)
}

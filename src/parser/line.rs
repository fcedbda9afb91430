//! Per-line classification of OBJ records.
//!
//! Each line is classified into exactly one [`ObjLine`] kind. The four
//! supported face-corner grammars are modelled as a tagged union so that
//! grammar coverage is explicit rather than spread over ad hoc patterns.

/// One classified OBJ line.
#[derive(Debug, Clone, PartialEq)]
pub enum ObjLine<'a> {
    /// Blank line or `#` comment.
    Blank,
    /// `v x y z` position record.
    Position([f32; 3]),
    /// `vn x y z` normal record (raw, not yet normalized).
    Normal([f32; 3]),
    /// `vt u v` texture coordinate record (raw, not yet flipped).
    TexCoord([f32; 2]),
    /// `f ...` face record with its parsed corners.
    Face(Vec<ParsedCorner<'a>>),
    /// `usemtl name` material switch.
    UseMtl(&'a str),
    /// `mtllib name` material library reference.
    MtlLib(&'a str),
    /// A recognized record whose fields failed to parse.
    Malformed,
    /// Any other record kind; ignored by both passes.
    Other,
}

/// One face corner in one of the four supported grammars.
///
/// Indices are kept as written: 1-based when positive, relative to the
/// current array length when negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CornerIndices {
    /// `v`
    Vertex { position: i64 },
    /// `v/vt`
    VertexUv { position: i64, uv: i64 },
    /// `v/vt/vn`
    VertexUvNormal { position: i64, uv: i64, normal: i64 },
    /// `v//vn`
    VertexNormal { position: i64, normal: i64 },
}

impl CornerIndices {
    pub fn position(&self) -> i64 {
        match *self {
            CornerIndices::Vertex { position }
            | CornerIndices::VertexUv { position, .. }
            | CornerIndices::VertexUvNormal { position, .. }
            | CornerIndices::VertexNormal { position, .. } => position,
        }
    }

    pub fn uv(&self) -> Option<i64> {
        match *self {
            CornerIndices::VertexUv { uv, .. } | CornerIndices::VertexUvNormal { uv, .. } => {
                Some(uv)
            }
            _ => None,
        }
    }

    pub fn normal(&self) -> Option<i64> {
        match *self {
            CornerIndices::VertexUvNormal { normal, .. }
            | CornerIndices::VertexNormal { normal, .. } => Some(normal),
            _ => None,
        }
    }
}

/// A face corner: its literal token (the vertex identity key) plus parsed indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedCorner<'a> {
    /// The corner exactly as written, e.g. `3/1/2` or `-1//4`.
    ///
    /// Two corners denote the same output vertex iff these strings are equal,
    /// so `1/2` and `1/2/` stay distinct even when they resolve identically.
    pub key: &'a str,
    /// The parsed index set.
    pub indices: CornerIndices,
}

/// Classify a single OBJ line.
pub fn classify(line: &str) -> ObjLine<'_> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return ObjLine::Blank;
    }

    let mut tokens = trimmed.split_whitespace();
    let keyword = tokens.next().unwrap_or("");
    match keyword {
        "v" => match parse_floats::<3>(&mut tokens) {
            Some(xyz) => ObjLine::Position(xyz),
            None => ObjLine::Malformed,
        },
        "vn" => match parse_floats::<3>(&mut tokens) {
            Some(xyz) => ObjLine::Normal(xyz),
            None => ObjLine::Malformed,
        },
        "vt" => match parse_floats::<2>(&mut tokens) {
            Some(uv) => ObjLine::TexCoord(uv),
            None => ObjLine::Malformed,
        },
        "f" => {
            let mut corners = Vec::with_capacity(4);
            for token in tokens {
                match parse_corner(token) {
                    Some(indices) => corners.push(ParsedCorner { key: token, indices }),
                    None => return ObjLine::Malformed,
                }
            }
            ObjLine::Face(corners)
        }
        "usemtl" => match tokens.next() {
            Some(name) => ObjLine::UseMtl(name),
            None => ObjLine::Malformed,
        },
        "mtllib" => match tokens.next() {
            Some(name) => ObjLine::MtlLib(name),
            None => ObjLine::Malformed,
        },
        _ => ObjLine::Other,
    }
}

/// Parse the first N whitespace tokens as floats. Extra tokens are ignored
/// (OBJ allows trailing components such as `w` or vertex colors).
fn parse_floats<const N: usize>(tokens: &mut dyn Iterator<Item = &str>) -> Option<[f32; N]> {
    let mut out = [0.0f32; N];
    for slot in &mut out {
        *slot = tokens.next()?.parse().ok()?;
    }
    Some(out)
}

/// Parse one face-corner token against the four supported grammars.
fn parse_corner(token: &str) -> Option<CornerIndices> {
    let mut fields = token.split('/');
    let position: i64 = fields.next()?.parse().ok()?;

    let uv_field = fields.next();
    let normal_field = fields.next();
    if fields.next().is_some() {
        return None;
    }

    match (uv_field, normal_field) {
        (None, None) => Some(CornerIndices::Vertex { position }),
        (Some(uv), None) => Some(CornerIndices::VertexUv {
            position,
            uv: uv.parse().ok()?,
        }),
        (Some(""), Some(normal)) => Some(CornerIndices::VertexNormal {
            position,
            normal: normal.parse().ok()?,
        }),
        (Some(uv), Some(normal)) => Some(CornerIndices::VertexUvNormal {
            position,
            uv: uv.parse().ok()?,
            normal: normal.parse().ok()?,
        }),
        // split yields fields in order, so this pairing cannot occur
        (None, Some(_)) => None,
    }
}

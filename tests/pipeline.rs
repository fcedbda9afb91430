//! End-to-end tests for the two-pass import pipeline.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use obj_importer::{
    import_obj_file, ImageInfo, ImageResolver, ImportError, Material, MaterialResolver, Result,
};

/// Material resolver serving a fixed library and counting invocations.
struct FixedMaterials {
    materials: HashMap<String, Material>,
    calls: AtomicUsize,
    expected_path: Option<PathBuf>,
}

impl FixedMaterials {
    fn empty() -> Self {
        Self::new(HashMap::new())
    }

    fn new(materials: HashMap<String, Material>) -> Self {
        Self {
            materials,
            calls: AtomicUsize::new(0),
            expected_path: None,
        }
    }

    fn expecting(mut self, path: PathBuf) -> Self {
        self.expected_path = Some(path);
        self
    }
}

impl MaterialResolver for FixedMaterials {
    fn resolve(&self, path: &Path) -> Result<HashMap<String, Material>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(expected) = &self.expected_path {
            assert_eq!(path, expected);
        }
        Ok(self.materials.clone())
    }
}

/// Image resolver returning dummy pixels and recording requested paths.
struct FakeImages {
    requests: Mutex<Vec<PathBuf>>,
}

impl FakeImages {
    fn new() -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
        }
    }
}

impl ImageResolver for FakeImages {
    fn load(&self, path: &Path) -> Result<ImageInfo> {
        self.requests.lock().unwrap().push(path.to_path_buf());
        Ok(ImageInfo {
            path: path.to_path_buf(),
            width: 4,
            height: 4,
            pixels: vec![255; 64],
        })
    }
}

fn write_obj(contents: &str) -> (tempfile::TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("model.obj");
    fs::write(&path, contents).unwrap();
    (dir, path)
}

fn textured_material(name: &str, map: &str) -> Material {
    let mut material = Material::new(name);
    material.diffuse_map = Some(map.to_string());
    material
}

#[test]
fn imports_textured_quad() {
    let (dir, path) = write_obj(
        "mtllib scene.mtl\n\
         v 0 0 0\n\
         v 1 0 0\n\
         v 1 1 0\n\
         v 0 1 0\n\
         vt 0 0\n\
         vt 1 0\n\
         vt 1 1\n\
         vt 0 1\n\
         vn 0 0 1\n\
         usemtl wall\n\
         f 1/1/1 2/2/1 3/3/1 4/4/1\n",
    );

    let mut materials = HashMap::new();
    materials.insert("wall".to_string(), textured_material("wall", "wall.png"));
    let material_resolver =
        FixedMaterials::new(materials).expecting(dir.path().join("scene.mtl"));
    let image_resolver = FakeImages::new();

    let output =
        import_obj_file(&path, dir.path(), &material_resolver, &image_resolver).unwrap();

    assert_eq!(output.vertex_count, 4);
    assert!(output.has_normals);
    assert!(output.has_uvs);
    assert_eq!(output.stride(), 8);
    assert_eq!(output.vertex_array.len(), 4 * 8);
    assert_eq!(output.position_min, [0.0, 0.0, 0.0]);
    assert_eq!(output.position_max, [1.0, 1.0, 0.0]);

    // Quad fan along the 1-3 diagonal.
    assert_eq!(output.material_groups["wall"], vec![0, 1, 2, 0, 2, 3]);
    assert_eq!(output.triangle_count(), 2);

    // Every group index addresses a real vertex.
    for indices in output.material_groups.values() {
        assert_eq!(indices.len() % 3, 0);
        assert!(indices.iter().all(|&i| (i as usize) < output.vertex_count));
    }

    assert_eq!(material_resolver.calls.load(Ordering::SeqCst), 1);
    assert_eq!(output.images.len(), 1);
    assert_eq!(
        output.images["wall.png"].path,
        dir.path().join("wall.png")
    );
    assert!(output.warnings.is_empty());
}

#[test]
fn missing_geometry_aborts_before_resolvers() {
    let (dir, path) = write_obj("mtllib scene.mtl\nusemtl wall\nvn 0 1 0\n");

    let material_resolver = FixedMaterials::empty();
    let image_resolver = FakeImages::new();

    let err =
        import_obj_file(&path, dir.path(), &material_resolver, &image_resolver).unwrap_err();

    assert!(matches!(err, ImportError::MissingGeometry));
    assert_eq!(material_resolver.calls.load(Ordering::SeqCst), 0);
    assert!(image_resolver.requests.lock().unwrap().is_empty());
}

#[test]
fn material_resolver_skipped_without_usemtl() {
    let (dir, path) = write_obj(
        "mtllib scene.mtl\n\
         v 0 0 0\n\
         v 1 0 0\n\
         v 0 1 0\n\
         f 1 2 3\n",
    );

    let material_resolver = FixedMaterials::empty();
    let output =
        import_obj_file(&path, dir.path(), &material_resolver, &FakeImages::new()).unwrap();

    // No usemtl: the library is never resolved and all faces land in the
    // default group.
    assert_eq!(material_resolver.calls.load(Ordering::SeqCst), 0);
    assert_eq!(output.material_groups.len(), 1);
    assert_eq!(output.material_groups["default"], vec![0, 1, 2]);
    assert!(output.materials.contains_key("default"));
    assert!(output.images.is_empty());
}

#[test]
fn shared_texture_loaded_once_across_materials() {
    let (dir, path) = write_obj(
        "mtllib scene.mtl\n\
         v 0 0 0\n\
         v 1 0 0\n\
         v 0 1 0\n\
         usemtl a\n\
         f 1 2 3\n\
         usemtl b\n\
         f 3 2 1\n",
    );

    let mut materials = HashMap::new();
    materials.insert("a".to_string(), textured_material("a", "shared.png"));
    materials.insert("b".to_string(), textured_material("b", "shared.png"));
    let image_resolver = FakeImages::new();

    let output = import_obj_file(
        &path,
        dir.path(),
        &FixedMaterials::new(materials),
        &image_resolver,
    )
    .unwrap();

    assert_eq!(image_resolver.requests.lock().unwrap().len(), 1);
    assert_eq!(output.images.len(), 1);
    assert_eq!(output.material_groups["a"], vec![0, 1, 2]);
    assert_eq!(output.material_groups["b"], vec![2, 1, 0]);
}

#[test]
fn relative_indices_match_absolute() {
    let (dir, path) = write_obj(
        "v 1 0 0\n\
         v 2 0 0\n\
         v 3 0 0\n\
         f -3 -2 -1\n",
    );

    let output =
        import_obj_file(&path, dir.path(), &FixedMaterials::empty(), &FakeImages::new()).unwrap();

    assert_eq!(output.vertex_count, 3);
    assert_eq!(
        output.vertex_array,
        vec![1.0, 0.0, 0.0, 2.0, 0.0, 0.0, 3.0, 0.0, 0.0]
    );
    assert_eq!(output.material_groups["default"], vec![0, 1, 2]);
}

#[test]
fn warnings_collected_without_aborting() {
    let (dir, path) = write_obj(
        "v 0 0 0\n\
         v 1 0 0\n\
         v 1 1 0\n\
         v 0 1 0\n\
         v 0 0 1\n\
         f 1 2 3 4 5\n\
         f 1 2 99\n\
         f 1 2 3\n",
    );

    let output =
        import_obj_file(&path, dir.path(), &FixedMaterials::empty(), &FakeImages::new()).unwrap();

    assert_eq!(output.warnings.len(), 2);
    assert_eq!(output.triangle_count(), 1);
    assert_eq!(output.material_groups["default"], vec![0, 1, 2]);
}

#[test]
fn unresolved_usemtl_falls_back_to_default_material() {
    let (dir, path) = write_obj(
        "mtllib scene.mtl\n\
         v 0 0 0\n\
         v 1 0 0\n\
         v 0 1 0\n\
         usemtl ghost\n\
         f 1 2 3\n",
    );

    let mut materials = HashMap::new();
    materials.insert("real".to_string(), Material::new("real"));

    let output = import_obj_file(
        &path,
        dir.path(),
        &FixedMaterials::new(materials),
        &FakeImages::new(),
    )
    .unwrap();

    assert_eq!(output.material_groups["default"], vec![0, 1, 2]);
    // The fallback material is present in the output alongside the resolved one.
    assert!(output.materials.contains_key("default"));
    assert!(output.materials.contains_key("real"));
    assert!(!output.material_groups.contains_key("ghost"));
}

//! Assets and per-frame transforms shared by the windowed and headless modes.

use std::fmt;
use std::path::Path;

use crystal_common::CrystalError;
use crystal_config::CrystalConfig;
use crystal_renderer::matrix::{self, Mat4};
use crystal_renderer::mesh::{generate_gem_mesh_lod, GemLod, MeshData, MeshVertex};
use crystal_renderer::{CubemapFaces, DirectoryLoader, EmbeddedLoader, ShaderSourceLoader};

pub fn renderer_error(err: impl fmt::Display) -> CrystalError {
    CrystalError::Renderer(err.to_string())
}

/// Shaders from `scene.shader_dir` when set, otherwise the built-in set.
pub fn shader_loader(config: &CrystalConfig) -> Box<dyn ShaderSourceLoader> {
    match &config.scene.shader_dir {
        Some(dir) => {
            tracing::info!("Loading shaders from {}", dir.display());
            Box::new(DirectoryLoader::new(dir))
        }
        None => Box::new(EmbeddedLoader),
    }
}

/// The configured OBJ model, or the procedural gem.
pub fn load_model(config: &CrystalConfig) -> Result<MeshData, CrystalError> {
    match &config.scene.model {
        Some(path) => load_obj(path),
        None => Ok(generate_gem_mesh_lod(GemLod::HIGH)),
    }
}

/// The configured cubemap directory, if any.
pub fn load_environment(config: &CrystalConfig) -> Result<Option<CubemapFaces>, CrystalError> {
    config
        .scene
        .environment_map
        .as_deref()
        .map(|dir| CubemapFaces::load_dir(dir).map_err(renderer_error))
        .transpose()
}

/// Load every model in an OBJ file into one triangle list.
///
/// Faces are triangulated. Vertices without normals get smooth normals
/// averaged from their faces.
pub fn load_obj(path: &Path) -> Result<MeshData, CrystalError> {
    let options = tobj::LoadOptions {
        single_index: true,
        triangulate: true,
        ..Default::default()
    };
    let (models, _materials) = tobj::load_obj(path, &options)
        .map_err(|e| CrystalError::Mesh(format!("{}: {e}", path.display())))?;

    let mut mesh = MeshData::default();
    let mut missing_normals = false;
    for model in &models {
        let m = &model.mesh;
        let base = mesh.vertices.len() as u32;
        let has_normals = m.normals.len() == m.positions.len();
        let has_texcoords = m.texcoords.len() / 2 == m.positions.len() / 3;
        missing_normals |= !has_normals;

        for i in 0..m.positions.len() / 3 {
            let position = [m.positions[3 * i], m.positions[3 * i + 1], m.positions[3 * i + 2]];
            let normal = if has_normals {
                [m.normals[3 * i], m.normals[3 * i + 1], m.normals[3 * i + 2]]
            } else {
                [0.0; 3]
            };
            let texcoord = if has_texcoords {
                [m.texcoords[2 * i], m.texcoords[2 * i + 1]]
            } else {
                [0.0; 2]
            };
            mesh.vertices.push(MeshVertex {
                position,
                normal,
                texcoord,
            });
        }
        mesh.indices.extend(m.indices.iter().map(|i| base + i));
    }

    if missing_normals {
        smooth_normals(&mut mesh);
    }
    mesh.validate()
        .map_err(|e| CrystalError::Mesh(format!("{}: {e}", path.display())))?;

    tracing::info!(
        models = models.len(),
        vertices = mesh.vertices.len(),
        triangles = mesh.triangle_count(),
        "Loaded {}",
        path.display()
    );
    Ok(mesh)
}

/// Fill zero normals with the normalized sum of adjacent face normals.
fn smooth_normals(mesh: &mut MeshData) {
    let mut sums = vec![[0.0f32; 3]; mesh.vertices.len()];
    let position = |i: u32| mesh.vertices.get(i as usize).map(|v| v.position);
    for tri in mesh.indices.chunks_exact(3) {
        let (Some(a), Some(b), Some(c)) = (position(tri[0]), position(tri[1]), position(tri[2]))
        else {
            continue;
        };
        let u = [b[0] - a[0], b[1] - a[1], b[2] - a[2]];
        let v = [c[0] - a[0], c[1] - a[1], c[2] - a[2]];
        let n = [
            u[1] * v[2] - u[2] * v[1],
            u[2] * v[0] - u[0] * v[2],
            u[0] * v[1] - u[1] * v[0],
        ];
        for &i in tri {
            for (sum, component) in sums[i as usize].iter_mut().zip(n) {
                *sum += component;
            }
        }
    }
    for (vertex, sum) in mesh.vertices.iter_mut().zip(sums) {
        if vertex.normal != [0.0; 3] {
            continue;
        }
        let len = (sum[0] * sum[0] + sum[1] * sum[1] + sum[2] * sum[2]).sqrt();
        if len > f32::EPSILON {
            vertex.normal = [sum[0] / len, sum[1] / len, sum[2] / len];
        }
    }
}

/// Object transform at `time` seconds: a spin around +Y.
pub fn model_matrix(config: &CrystalConfig, time: f32) -> Mat4 {
    matrix::rotate_y(time * config.animation.rotation_speed)
}

/// View and projection for the configured camera at `aspect`.
pub fn camera_matrices(config: &CrystalConfig, aspect: f32) -> (Mat4, Mat4) {
    let camera = &config.camera;
    let view = matrix::look_at(camera.position, camera.target, camera.up);
    let projection = matrix::perspective(
        camera.fov_degrees.to_radians(),
        aspect,
        camera.near,
        camera.far,
    );
    (view, projection)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_obj(dir: &tempfile::TempDir, name: &str, body: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn obj_quad_is_triangulated_with_smooth_normals() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_obj(
            &dir,
            "quad.obj",
            "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf 1 2 3 4\n",
        );

        let mesh = load_obj(&path).unwrap();

        assert_eq!(mesh.vertices.len(), 4);
        assert_eq!(mesh.triangle_count(), 2);
        for v in &mesh.vertices {
            assert!((v.normal[2] - 1.0).abs() < 1e-5, "normal {:?}", v.normal);
        }
    }

    #[test]
    fn obj_normals_and_texcoords_are_kept() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_obj(
            &dir,
            "tri.obj",
            "v 0 0 0\nv 1 0 0\nv 0 1 0\nvt 0 0\nvt 1 0\nvt 0 1\nvn 0 0 -1\n\
             f 1/1/1 2/2/1 3/3/1\n",
        );

        let mesh = load_obj(&path).unwrap();

        assert_eq!(mesh.triangle_count(), 1);
        assert!(mesh.vertices.iter().all(|v| v.normal == [0.0, 0.0, -1.0]));
        assert!(mesh.vertices.iter().any(|v| v.texcoord == [1.0, 0.0]));
    }

    #[test]
    fn missing_obj_is_a_mesh_error() {
        let err = load_obj(Path::new("/nonexistent/crystal.obj")).unwrap_err();
        assert!(matches!(err, CrystalError::Mesh(_)));
    }

    #[test]
    fn empty_obj_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_obj(&dir, "empty.obj", "# nothing here\n");
        assert!(load_obj(&path).is_err());
    }

    #[test]
    fn default_scene_uses_builtin_assets() {
        let config = CrystalConfig::default();
        let mesh = load_model(&config).unwrap();
        assert!(mesh.validate().is_ok());
        assert!(load_environment(&config).unwrap().is_none());
    }

    #[test]
    fn missing_environment_dir_is_an_error() {
        let mut config = CrystalConfig::default();
        config.scene.environment_map = Some("/nonexistent/sky".into());
        assert!(load_environment(&config).is_err());
    }

    #[test]
    fn model_matrix_spins_with_time() {
        let config = CrystalConfig::default();
        assert_eq!(model_matrix(&config, 0.0), matrix::IDENTITY);
        let turned = model_matrix(&config, 1.0);
        assert_eq!(turned, matrix::rotate_y(0.3));
    }

    #[test]
    fn camera_looks_at_the_origin() {
        let config = CrystalConfig::default();
        let (view, _projection) = camera_matrices(&config, config.window.aspect_ratio());
        let origin = matrix::transform_point(&view, [0.0; 3]);
        assert!((origin[2] + 5.0).abs() < 1e-5);
    }
}

//! Environment cubemap pixels.
//!
//! Faces are stored in GL order: +X, -X, +Y, -Y, +Z, -Z, each a square
//! RGBA8 image of `size * size` texels.

use std::path::Path;

use crate::gpu::RenderError;

/// File stems for each face, in upload order.
pub const FACE_NAMES: [&str; 6] = ["px", "nx", "py", "ny", "pz", "nz"];

const ZENITH: [f32; 3] = [0.35, 0.45, 0.75];
const HORIZON: [f32; 3] = [0.95, 0.93, 0.9];
const NADIR: [f32; 3] = [0.12, 0.1, 0.12];

#[derive(Debug, Clone, PartialEq)]
pub struct CubemapFaces {
    pub size: u32,
    pub faces: [Vec<u8>; 6],
}

impl CubemapFaces {
    /// Procedural studio sky: cool zenith, bright horizon band, dark floor.
    pub fn gradient(size: u32) -> Self {
        let size = size.max(1);
        let faces = std::array::from_fn(|face| {
            let mut pixels = Vec::with_capacity((size * size * 4) as usize);
            for y in 0..size {
                for x in 0..size {
                    let u = 2.0 * (x as f32 + 0.5) / size as f32 - 1.0;
                    let v = 2.0 * (y as f32 + 0.5) / size as f32 - 1.0;
                    let dir = face_direction(face, u, v);
                    let up = dir[1] / (dir[0] * dir[0] + dir[1] * dir[1] + dir[2] * dir[2]).sqrt();
                    let color = sky_color(up);
                    pixels.extend(color.iter().map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8));
                    pixels.push(255);
                }
            }
            pixels
        });
        Self { size, faces }
    }

    /// Load `px.png`, `nx.png`, `py.png`, `ny.png`, `pz.png`, `nz.png` from `dir`.
    pub fn load_dir(dir: &Path) -> Result<Self, RenderError> {
        let mut size = None;
        let mut faces: [Vec<u8>; 6] = Default::default();
        for (slot, name) in faces.iter_mut().zip(FACE_NAMES) {
            let path = dir.join(format!("{name}.png"));
            let image = image::open(&path)
                .map_err(|e| RenderError::Environment(format!("{}: {e}", path.display())))?
                .to_rgba8();
            let (w, h) = image.dimensions();
            if w != h {
                return Err(RenderError::Environment(format!(
                    "{}: face is {w}x{h}, expected a square",
                    path.display()
                )));
            }
            match size {
                None => size = Some(w),
                Some(s) if s != w => {
                    return Err(RenderError::Environment(format!(
                        "{}: face is {w}px but earlier faces are {s}px",
                        path.display()
                    )));
                }
                Some(_) => {}
            }
            *slot = image.into_raw();
        }
        let size = size.unwrap_or(1);
        tracing::info!(dir = %dir.display(), size, "environment map loaded");
        Ok(Self { size, faces })
    }

    /// Every face must hold exactly `size * size` RGBA texels.
    pub fn validate(&self) -> Result<(), String> {
        let expected = (self.size as usize) * (self.size as usize) * 4;
        if self.size == 0 {
            return Err("cubemap size is zero".into());
        }
        for (face, name) in self.faces.iter().zip(FACE_NAMES) {
            if face.len() != expected {
                return Err(format!(
                    "cubemap face {name} has {} bytes, expected {expected}",
                    face.len()
                ));
            }
        }
        Ok(())
    }
}

/// World direction through texel `(u, v)` of `face`, GL cubemap convention.
fn face_direction(face: usize, u: f32, v: f32) -> [f32; 3] {
    match face {
        0 => [1.0, -v, -u],
        1 => [-1.0, -v, u],
        2 => [u, 1.0, v],
        3 => [u, -1.0, -v],
        4 => [u, -v, 1.0],
        _ => [-u, -v, -1.0],
    }
}

fn sky_color(up: f32) -> [f32; 3] {
    let mix = |a: [f32; 3], b: [f32; 3], t: f32| {
        [
            a[0] + (b[0] - a[0]) * t,
            a[1] + (b[1] - a[1]) * t,
            a[2] + (b[2] - a[2]) * t,
        ]
    };
    if up >= 0.0 {
        mix(HORIZON, ZENITH, up.powf(0.6))
    } else {
        mix(HORIZON, NADIR, (-up).powf(0.4))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_face(dir: &Path, name: &str, size: u32) {
        let img = image::RgbaImage::from_pixel(size, size, image::Rgba([10, 20, 30, 255]));
        img.save(dir.join(format!("{name}.png"))).unwrap();
    }

    #[test]
    fn gradient_faces_are_complete() {
        let faces = CubemapFaces::gradient(8);
        assert_eq!(faces.size, 8);
        assert!(faces.validate().is_ok());
    }

    #[test]
    fn gradient_is_brighter_up_than_down() {
        let faces = CubemapFaces::gradient(4);
        let top: u32 = faces.faces[2].iter().map(|&b| b as u32).sum();
        let bottom: u32 = faces.faces[3].iter().map(|&b| b as u32).sum();
        assert!(top > bottom);
    }

    #[test]
    fn gradient_zero_size_is_clamped() {
        assert_eq!(CubemapFaces::gradient(0).size, 1);
    }

    #[test]
    fn validate_rejects_short_face() {
        let mut faces = CubemapFaces::gradient(4);
        faces.faces[5].truncate(10);
        let err = faces.validate().unwrap_err();
        assert!(err.contains("nz"));
    }

    #[test]
    fn load_dir_reads_all_faces() {
        let dir = tempfile::tempdir().unwrap();
        for name in FACE_NAMES {
            write_face(dir.path(), name, 4);
        }
        let faces = CubemapFaces::load_dir(dir.path()).unwrap();
        assert_eq!(faces.size, 4);
        assert_eq!(&faces.faces[0][..4], &[10, 20, 30, 255]);
        assert!(faces.validate().is_ok());
    }

    #[test]
    fn load_dir_missing_face_fails() {
        let dir = tempfile::tempdir().unwrap();
        for name in &FACE_NAMES[..5] {
            write_face(dir.path(), name, 4);
        }
        let err = CubemapFaces::load_dir(dir.path()).unwrap_err();
        assert!(err.to_string().contains("nz.png"));
    }

    #[test]
    fn load_dir_mismatched_sizes_fail() {
        let dir = tempfile::tempdir().unwrap();
        for name in FACE_NAMES {
            write_face(dir.path(), name, if name == "py" { 8 } else { 4 });
        }
        let err = CubemapFaces::load_dir(dir.path()).unwrap_err();
        assert!(err.to_string().contains("py.png"));
    }
}

//! Mesh vertex types and buffer layout.

/// A single vertex of the crystal mesh.
///
/// Layout: position(vec3) + normal(vec3) + texcoord(vec2) = 32 bytes,
/// bound to attribute locations 0, 1 and 2 of the base vertex shader.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub texcoord: [f32; 2],
}

impl MeshVertex {
    /// Byte stride between consecutive vertices.
    pub const STRIDE: i32 = std::mem::size_of::<MeshVertex>() as i32;
    /// `(location, component count, byte offset)` for each attribute.
    pub const ATTRIBUTES: [(u32, i32, i32); 3] = [(0, 3, 0), (1, 3, 12), (2, 2, 24)];
}

/// GPU-ready triangle list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    /// Number of triangles described by the index buffer.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Check that the mesh is a non-empty triangle list with in-range indices.
    pub fn validate(&self) -> Result<(), String> {
        if self.vertices.is_empty() || self.indices.is_empty() {
            return Err("mesh has no geometry".into());
        }
        if self.indices.len() % 3 != 0 {
            return Err(format!(
                "index count {} is not a multiple of 3",
                self.indices.len()
            ));
        }
        let vertex_count = self.vertices.len();
        if let Some(bad) = self.indices.iter().find(|&&i| i as usize >= vertex_count) {
            return Err(format!(
                "index {bad} out of range for {vertex_count} vertices"
            ));
        }
        Ok(())
    }
}

/// Gem mesh quality presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GemLod {
    /// Facets around the girdle.
    pub facets: u32,
}

impl GemLod {
    pub const LOW: Self = Self { facets: 8 };
    pub const MEDIUM: Self = Self { facets: 16 };
    pub const HIGH: Self = Self { facets: 32 };
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn vertex(x: f32) -> MeshVertex {
        MeshVertex {
            position: [x, 0.0, 0.0],
            normal: [0.0, 1.0, 0.0],
            texcoord: [0.0, 0.0],
        }
    }

    #[test]
    fn mesh_vertex_size_is_32_bytes() {
        assert_eq!(std::mem::size_of::<MeshVertex>(), 32);
        assert_eq!(MeshVertex::STRIDE, 32);
    }

    #[test]
    fn bytemuck_cast_works() {
        let vertices = [vertex(1.0), vertex(2.0)];
        let bytes: &[u8] = bytemuck::cast_slice(&vertices);
        assert_eq!(bytes.len(), 64);
    }

    #[test]
    fn empty_mesh_is_invalid() {
        assert!(MeshData::default().validate().is_err());
    }

    #[test]
    fn partial_triangle_is_invalid() {
        let mesh = MeshData {
            vertices: vec![vertex(0.0), vertex(1.0), vertex(2.0)],
            indices: vec![0, 1],
        };
        let err = mesh.validate().unwrap_err();
        assert!(err.contains("multiple of 3"));
    }

    #[test]
    fn out_of_range_index_is_invalid() {
        let mesh = MeshData {
            vertices: vec![vertex(0.0), vertex(1.0), vertex(2.0)],
            indices: vec![0, 1, 3],
        };
        let err = mesh.validate().unwrap_err();
        assert!(err.contains("index 3"));
    }

    #[test]
    fn single_triangle_is_valid() {
        let mesh = MeshData {
            vertices: vec![vertex(0.0), vertex(1.0), vertex(2.0)],
            indices: vec![0, 1, 2],
        };
        assert!(mesh.validate().is_ok());
        assert_eq!(mesh.triangle_count(), 1);
    }

    #[test]
    fn gem_lod_presets() {
        assert_eq!(GemLod::LOW.facets, 8);
        assert_eq!(GemLod::MEDIUM.facets, 16);
        assert_eq!(GemLod::HIGH.facets, 32);
    }
}

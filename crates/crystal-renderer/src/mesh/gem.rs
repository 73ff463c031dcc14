//! Procedural brilliant-cut gem.
//!
//! A flat table on top, a sloped crown down to the girdle, and a pavilion
//! narrowing to a point below. Every triangle gets its own vertices so the
//! face normal is constant across it, which gives the faceted look.

use super::types::{GemLod, MeshData, MeshVertex};

const TABLE_RADIUS: f32 = 0.55;
const CROWN_HEIGHT: f32 = 0.35;
const PAVILION_DEPTH: f32 = 0.9;

/// Generate a gem with `facets` segments around the girdle (minimum 3).
///
/// Produces `facets * 4` triangles: the table fan, two per crown quad,
/// and one per pavilion facet. The girdle sits on the XZ plane with
/// radius 1.0, so the origin is strictly inside the solid.
pub fn generate_gem_mesh(facets: u32) -> MeshData {
    let facets = facets.max(3);
    let mut mesh = MeshData {
        vertices: Vec::with_capacity((facets * 12) as usize),
        indices: Vec::with_capacity((facets * 12) as usize),
    };

    let table_center = [0.0, CROWN_HEIGHT, 0.0];
    let culet = [0.0, -PAVILION_DEPTH, 0.0];

    for i in 0..facets {
        let t0 = ring_point(i, facets, TABLE_RADIUS, CROWN_HEIGHT);
        let t1 = ring_point(i + 1, facets, TABLE_RADIUS, CROWN_HEIGHT);
        let g0 = ring_point(i, facets, 1.0, 0.0);
        let g1 = ring_point(i + 1, facets, 1.0, 0.0);

        // Table
        push_facet(&mut mesh, table_center, t0, t1);
        // Crown
        push_facet(&mut mesh, t0, g0, g1);
        push_facet(&mut mesh, t0, g1, t1);
        // Pavilion
        push_facet(&mut mesh, g0, culet, g1);
    }

    mesh
}

/// Generate a gem mesh from a quality preset.
pub fn generate_gem_mesh_lod(lod: GemLod) -> MeshData {
    generate_gem_mesh(lod.facets)
}

/// Point `index` of a ring of `count` points at height `y`.
fn ring_point(index: u32, count: u32, radius: f32, y: f32) -> [f32; 3] {
    let angle = 2.0 * std::f32::consts::PI * (index % count) as f32 / count as f32;
    [radius * angle.cos(), y, radius * angle.sin()]
}

/// Append one flat-shaded triangle, wound counter-clockwise seen from outside.
fn push_facet(mesh: &mut MeshData, a: [f32; 3], b: [f32; 3], c: [f32; 3]) {
    let mut normal = normalize(cross(sub(b, a), sub(c, a)));
    let centroid = [
        (a[0] + b[0] + c[0]) / 3.0,
        (a[1] + b[1] + c[1]) / 3.0,
        (a[2] + b[2] + c[2]) / 3.0,
    ];
    let (b, c) = if dot(normal, centroid) < 0.0 {
        normal = [-normal[0], -normal[1], -normal[2]];
        (c, b)
    } else {
        (b, c)
    };

    let base = mesh.vertices.len() as u32;
    for position in [a, b, c] {
        mesh.vertices.push(MeshVertex {
            position,
            normal,
            texcoord: spherical_uv(position),
        });
    }
    mesh.indices.extend_from_slice(&[base, base + 1, base + 2]);
}

fn spherical_uv(p: [f32; 3]) -> [f32; 2] {
    let u = 0.5 + p[2].atan2(p[0]) / (2.0 * std::f32::consts::PI);
    let v = 0.5 + p[1] * 0.5;
    [u, v.clamp(0.0, 1.0)]
}

fn sub(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

fn cross(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

fn dot(a: [f32; 3], b: [f32; 3]) -> f32 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

fn normalize(v: [f32; 3]) -> [f32; 3] {
    let len = dot(v, v).sqrt();
    if len > 0.0 {
        [v[0] / len, v[1] / len, v[2] / len]
    } else {
        v
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gem_triangle_count() {
        let mesh = generate_gem_mesh(8);
        assert_eq!(mesh.triangle_count(), 32);
        assert_eq!(mesh.vertices.len(), 96);
    }

    #[test]
    fn gem_minimum_facets() {
        let mesh = generate_gem_mesh(1);
        assert_eq!(mesh.triangle_count(), 12);
    }

    #[test]
    fn gem_mesh_is_valid() {
        assert!(generate_gem_mesh_lod(GemLod::MEDIUM).validate().is_ok());
    }

    #[test]
    fn gem_normals_are_unit_length() {
        let mesh = generate_gem_mesh(16);
        for v in &mesh.vertices {
            let len = dot(v.normal, v.normal).sqrt();
            assert!((len - 1.0).abs() < 1e-4, "normal length {len}");
        }
    }

    #[test]
    fn gem_faces_point_outward() {
        let mesh = generate_gem_mesh(12);
        for tri in mesh.indices.chunks(3) {
            let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| mesh.vertices[i as usize]);
            let centroid = [
                (a.position[0] + b.position[0] + c.position[0]) / 3.0,
                (a.position[1] + b.position[1] + c.position[1]) / 3.0,
                (a.position[2] + b.position[2] + c.position[2]) / 3.0,
            ];
            let winding = cross(sub(b.position, a.position), sub(c.position, a.position));
            assert!(dot(a.normal, centroid) > 0.0);
            assert!(dot(winding, a.normal) > 0.0);
        }
    }

    #[test]
    fn gem_fits_in_unit_height_band() {
        let mesh = generate_gem_mesh(16);
        for v in &mesh.vertices {
            assert!(v.position[1] <= CROWN_HEIGHT + 1e-6);
            assert!(v.position[1] >= -PAVILION_DEPTH - 1e-6);
        }
    }

    #[test]
    fn texcoords_are_normalized() {
        let mesh = generate_gem_mesh(16);
        for v in &mesh.vertices {
            assert!((0.0..=1.0).contains(&v.texcoord[0]));
            assert!((0.0..=1.0).contains(&v.texcoord[1]));
        }
    }
}

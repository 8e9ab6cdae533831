//! Unit primitives for instanced ornaments and the star topper
//!
//! Every primitive is centered on the origin; instance transforms place
//! and scale them.

use std::f32::consts::{PI, TAU};
use crate::math::Vec3;
use super::geometry::{Mesh, Vertex};

/// Segments used for bauble spheres
pub const SPHERE_SEGMENTS: usize = 32;

/// UV sphere with smooth normals
///
/// Pole rows skip their degenerate triangles.
pub fn sphere(radius: f32, width_segments: usize, height_segments: usize) -> Mesh {
    let w = width_segments.max(3);
    let h = height_segments.max(2);
    let mut mesh = Mesh::new();

    for iy in 0..=h {
        let v = iy as f32 / h as f32;
        let theta = v * PI;
        for ix in 0..=w {
            let u = ix as f32 / w as f32;
            let phi = u * TAU;
            let normal = Vec3::new(
                -phi.cos() * theta.sin(),
                theta.cos(),
                phi.sin() * theta.sin(),
            );
            mesh.add_vertices([Vertex::new(normal.scale(radius), normal)]);
        }
    }

    let row = (w + 1) as u32;
    for iy in 0..h as u32 {
        for ix in 0..w as u32 {
            let a = iy * row + ix + 1;
            let b = iy * row + ix;
            let c = (iy + 1) * row + ix;
            let d = (iy + 1) * row + ix + 1;

            if iy != 0 {
                mesh.add_triangle(a, b, d);
            }
            if iy != h as u32 - 1 {
                mesh.add_triangle(b, c, d);
            }
        }
    }

    mesh
}

/// Axis-aligned cube with flat face normals
pub fn cube(size: f32) -> Mesh {
    let s = size * 0.5;
    let faces = [
        (Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 0.0, -1.0), Vec3::UP),
        (Vec3::new(-1.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 1.0), Vec3::UP),
        (Vec3::UP, Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 0.0, -1.0)),
        (Vec3::new(0.0, -1.0, 0.0), Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 1.0)),
        (Vec3::new(0.0, 0.0, 1.0), Vec3::new(1.0, 0.0, 0.0), Vec3::UP),
        (Vec3::new(0.0, 0.0, -1.0), Vec3::new(-1.0, 0.0, 0.0), Vec3::UP),
    ];

    let mut mesh = Mesh::new();
    for (normal, right, up) in faces {
        let center = normal.scale(s);
        let corners = [
            center - right.scale(s) - up.scale(s),
            center + right.scale(s) - up.scale(s),
            center + right.scale(s) + up.scale(s),
            center - right.scale(s) + up.scale(s),
        ];
        let start = mesh.add_vertices(corners.map(|p| Vertex::new(p, normal)));
        mesh.add_quad(start, start + 1, start + 2, start + 3);
    }

    mesh
}

/// Octahedron with flat face normals, used for the star
pub fn octahedron(radius: f32) -> Mesh {
    let px = Vec3::new(radius, 0.0, 0.0);
    let nx = Vec3::new(-radius, 0.0, 0.0);
    let py = Vec3::new(0.0, radius, 0.0);
    let ny = Vec3::new(0.0, -radius, 0.0);
    let pz = Vec3::new(0.0, 0.0, radius);
    let nz = Vec3::new(0.0, 0.0, -radius);

    let faces = [
        (px, py, pz), (px, nz, py), (px, ny, nz), (px, pz, ny),
        (nx, pz, py), (nx, py, nz), (nx, nz, ny), (nx, ny, pz),
    ];

    let mut mesh = Mesh::new();
    for (a, b, c) in faces {
        let centroid = (a + b + c).scale(1.0 / 3.0);
        let mut normal = (b - a).cross(&(c - a)).normalize();
        // Keep CCW winding seen from outside
        let (b, c) = if normal.dot(&centroid) < 0.0 {
            normal = -normal;
            (c, b)
        } else {
            (b, c)
        };
        let start = mesh.add_vertices([a, b, c].map(|p| Vertex::new(p, normal)));
        mesh.add_triangle(start, start + 1, start + 2);
    }

    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sphere_counts() {
        let mesh = sphere(1.0, SPHERE_SEGMENTS, SPHERE_SEGMENTS);
        assert_eq!(mesh.vertex_count(), 33 * 33);
        assert_eq!(mesh.triangle_count(), 32 * (2 * 32 - 2));
        assert!((mesh.extent() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_sphere_indices_in_range() {
        let mesh = sphere(0.5, 8, 6);
        let n = mesh.vertex_count() as u32;
        assert!(mesh.index_data().iter().all(|&i| i < n));
    }

    #[test]
    fn test_cube_faces() {
        let mesh = cube(1.0);
        assert_eq!(mesh.vertex_count(), 24);
        assert_eq!(mesh.triangle_count(), 12);
        for v in &mesh.vertices {
            for c in v.position.to_array() {
                assert!((c.abs() - 0.5).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn test_cube_winding_faces_outward() {
        let mesh = cube(1.0);
        for tri in mesh.indices.chunks(3) {
            let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| mesh.vertices[i as usize]);
            let n = (b.position - a.position).cross(&(c.position - a.position));
            assert!(n.dot(&a.normal) > 0.0);
        }
    }

    #[test]
    fn test_octahedron_normals_point_outward() {
        let mesh = octahedron(0.5);
        assert_eq!(mesh.triangle_count(), 8);
        for tri in mesh.vertices.chunks(3) {
            let centroid = (tri[0].position + tri[1].position + tri[2].position).scale(1.0 / 3.0);
            assert!(tri[0].normal.dot(&centroid) > 0.0);
            let winding = (tri[1].position - tri[0].position).cross(&(tri[2].position - tri[0].position));
            assert!(winding.dot(&centroid) > 0.0);
        }
    }
}

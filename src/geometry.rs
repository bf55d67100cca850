use std::f32::consts::{PI, TAU};

use glam::Vec3;

use crate::types::Vertex;

/// CPU-side indexed triangle mesh. Triangles wind counter-clockwise seen from
/// the side the normals point to; texture v runs top to bottom.
#[derive(Debug, Clone, Default)]
pub struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Axis-aligned cube centered on the origin, one texture per face
pub fn cube(size: f32) -> MeshData {
    let h = size * 0.5;
    // (normal, u axis, v axis) with u x v == normal
    let faces = [
        (Vec3::X, Vec3::NEG_Z, Vec3::Y),
        (Vec3::NEG_X, Vec3::Z, Vec3::Y),
        (Vec3::Y, Vec3::X, Vec3::NEG_Z),
        (Vec3::NEG_Y, Vec3::X, Vec3::Z),
        (Vec3::Z, Vec3::X, Vec3::Y),
        (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
    ];

    let mut mesh = MeshData::default();
    for (normal, u_axis, v_axis) in faces {
        let base = mesh.vertices.len() as u32;
        for (s, t) in [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)] {
            let position = normal * h
                + u_axis * h * (2.0 * s - 1.0)
                + v_axis * h * (2.0 * t - 1.0);
            mesh.vertices.push(Vertex::new(
                position.to_array(),
                normal.to_array(),
                [s, 1.0 - t],
                u_axis.extend(1.0).to_array(),
            ));
        }
        mesh.indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    mesh
}

/// UV sphere centered on the origin. Seam vertices are duplicated so the
/// texture wraps once around the equator.
pub fn sphere(radius: f32, width_segments: u32, height_segments: u32) -> MeshData {
    let width_segments = width_segments.max(3);
    let height_segments = height_segments.max(2);
    let row = width_segments + 1;

    let mut mesh = MeshData::default();
    for iy in 0..=height_segments {
        let v = iy as f32 / height_segments as f32;
        let theta = v * PI;
        for ix in 0..=width_segments {
            let u = ix as f32 / width_segments as f32;
            let phi = u * TAU;

            let position = Vec3::new(
                -radius * phi.cos() * theta.sin(),
                radius * theta.cos(),
                radius * phi.sin() * theta.sin(),
            );
            let normal = position.normalize_or(Vec3::Y);
            let tangent = Vec3::new(phi.sin(), 0.0, phi.cos());

            mesh.vertices.push(Vertex::new(
                position.to_array(),
                normal.to_array(),
                [u, v],
                tangent.extend(1.0).to_array(),
            ));
        }
    }

    for iy in 0..height_segments {
        for ix in 0..width_segments {
            let a = iy * row + ix + 1;
            let b = iy * row + ix;
            let c = (iy + 1) * row + ix;
            let d = (iy + 1) * row + ix + 1;

            // Pole rows collapse to a single triangle per segment
            if iy != 0 {
                mesh.indices.extend_from_slice(&[a, b, d]);
            }
            if iy != height_segments - 1 {
                mesh.indices.extend_from_slice(&[b, c, d]);
            }
        }
    }

    mesh
}

/// Single-quad plane in the XY plane facing +Z
pub fn plane(width: f32, height: f32) -> MeshData {
    let (w, h) = (width * 0.5, height * 0.5);
    let normal = [0.0, 0.0, 1.0];
    let tangent = [1.0, 0.0, 0.0, 1.0];

    MeshData {
        vertices: vec![
            Vertex::new([-w, h, 0.0], normal, [0.0, 0.0], tangent),
            Vertex::new([w, h, 0.0], normal, [1.0, 0.0], tangent),
            Vertex::new([-w, -h, 0.0], normal, [0.0, 1.0], tangent),
            Vertex::new([w, -h, 0.0], normal, [1.0, 1.0], tangent),
        ],
        indices: vec![2, 3, 1, 2, 1, 0],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn face_normal(mesh: &MeshData, tri: usize) -> Vec3 {
        let p = |i: usize| Vec3::from_array(mesh.vertices[mesh.indices[tri * 3 + i] as usize].position);
        (p(1) - p(0)).cross(p(2) - p(0))
    }

    #[test]
    fn cube_has_outward_ccw_faces() {
        let mesh = cube(4.0);
        assert_eq!(mesh.vertices.len(), 24);
        assert_eq!(mesh.triangle_count(), 12);

        for tri in 0..mesh.triangle_count() {
            let n = Vec3::from_array(mesh.vertices[mesh.indices[tri * 3] as usize].normal);
            assert!(face_normal(&mesh, tri).dot(n) > 0.0, "triangle {} winds inward", tri);
        }
    }

    #[test]
    fn cube_vertices_sit_on_half_extent() {
        let mesh = cube(4.0);
        for v in &mesh.vertices {
            let max = Vec3::from_array(v.position).abs().max_element();
            assert!((max - 2.0).abs() < 1e-5);
        }
    }

    #[test]
    fn sphere_counts_match_segments() {
        let mesh = sphere(3.0, 32, 16);
        assert_eq!(mesh.vertices.len(), 33 * 17);
        // Two triangles per quad minus one per segment at each pole
        assert_eq!(mesh.triangle_count(), 32 * 16 * 2 - 2 * 32);
    }

    #[test]
    fn sphere_vertices_on_radius_and_faces_outward() {
        let mesh = sphere(3.0, 32, 16);
        for v in &mesh.vertices {
            assert!((Vec3::from_array(v.position).length() - 3.0).abs() < 1e-4);
        }

        for tri in 0..mesh.triangle_count() {
            let centroid = (0..3)
                .map(|i| Vec3::from_array(mesh.vertices[mesh.indices[tri * 3 + i] as usize].position))
                .sum::<Vec3>();
            assert!(face_normal(&mesh, tri).dot(centroid) > 0.0);
        }
    }

    #[test]
    fn plane_faces_positive_z() {
        let mesh = plane(256.0, 128.0);
        assert_eq!(mesh.triangle_count(), 2);
        for tri in 0..2 {
            assert!(face_normal(&mesh, tri).z > 0.0);
        }
        assert_eq!(mesh.vertices[3].position, [128.0, -64.0, 0.0]);
    }
}

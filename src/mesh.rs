use glam::{Mat3, Mat4, Vec3};
use serde::{Deserialize, Serialize};

/// Floats per vertex: `position.xyz` followed by `normal.xyz`.
pub const VERTEX_STRIDE: usize = 6;

/// GPU ready triangle mesh with interleaved vertices and `u32` indices.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MeshData {
    pub vertices: Vec<f32>,
    pub indices: Vec<u32>,
}

/// Axis aligned bounds of a mesh.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }
}

impl MeshData {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / VERTEX_STRIDE
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn position(&self, index: usize) -> Vec3 {
        Vec3::from_slice(&self.vertices[index * VERTEX_STRIDE..index * VERTEX_STRIDE + 3])
    }

    pub fn normal(&self, index: usize) -> Vec3 {
        Vec3::from_slice(&self.vertices[index * VERTEX_STRIDE + 3..index * VERTEX_STRIDE + 6])
    }

    pub fn positions(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.vertices
            .chunks_exact(VERTEX_STRIDE)
            .map(|chunk| Vec3::new(chunk[0], chunk[1], chunk[2]))
    }

    /// Appends a triangle with its own three vertices sharing the face normal.
    pub fn push_triangle(&mut self, a: Vec3, b: Vec3, c: Vec3) {
        let normal = (b - a).cross(c - a).normalize_or_zero();
        let base = self.vertex_count() as u32;
        for position in [a, b, c] {
            self.push_vertex(position, normal);
        }
        self.indices.extend_from_slice(&[base, base + 1, base + 2]);
    }

    /// Appends the quad `a b c d` (counter-clockwise) as two triangles sharing one normal.
    pub fn push_quad(&mut self, a: Vec3, b: Vec3, c: Vec3, d: Vec3) {
        let mut normal = (b - a).cross(d - a);
        if normal.length_squared() <= f32::EPSILON * f32::EPSILON {
            normal = (c - b).cross(d - b);
        }
        let normal = normal.normalize_or_zero();
        let base = self.vertex_count() as u32;
        for position in [a, b, c, d] {
            self.push_vertex(position, normal);
        }
        self.indices
            .extend_from_slice(&[base, base + 1, base + 3, base + 1, base + 2, base + 3]);
    }

    fn push_vertex(&mut self, position: Vec3, normal: Vec3) {
        self.vertices
            .extend_from_slice(&[position.x, position.y, position.z, normal.x, normal.y, normal.z]);
    }

    /// Applies `matrix` to positions and its inverse transpose to normals.
    pub fn apply_matrix(&mut self, matrix: Mat4) {
        let normal_matrix = Mat3::from_mat4(matrix).inverse().transpose();
        for chunk in self.vertices.chunks_exact_mut(VERTEX_STRIDE) {
            let position = matrix.transform_point3(Vec3::new(chunk[0], chunk[1], chunk[2]));
            let normal =
                (normal_matrix * Vec3::new(chunk[3], chunk[4], chunk[5])).normalize_or_zero();
            chunk[..3].copy_from_slice(&position.to_array());
            chunk[3..].copy_from_slice(&normal.to_array());
        }
    }

    pub fn rotate_x(&mut self, angle: f32) {
        self.apply_matrix(Mat4::from_rotation_x(angle));
    }

    /// Bounds of all positions, `None` for an empty mesh.
    pub fn bounds(&self) -> Option<Aabb> {
        let mut positions = self.positions();
        let first = positions.next()?;
        Some(positions.fold(Aabb { min: first, max: first }, |aabb, p| Aabb {
            min: aabb.min.min(p),
            max: aabb.max.max(p),
        }))
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::FRAC_PI_2;

    use super::*;

    #[test]
    fn triangle_gets_face_normal() {
        let mut mesh = MeshData::default();
        mesh.push_triangle(Vec3::ZERO, Vec3::X, Vec3::Y);
        assert_eq!(mesh.indices, vec![0, 1, 2]);
        assert_eq!(mesh.vertex_count(), 3);
        for i in 0..3 {
            assert!((mesh.normal(i) - Vec3::Z).length() < 1e-6);
        }
    }

    #[test]
    fn quad_is_two_triangles() {
        let mut mesh = MeshData::default();
        mesh.push_quad(Vec3::ZERO, Vec3::X, Vec3::new(1.0, 1.0, 0.0), Vec3::Y);
        assert_eq!(mesh.triangle_count(), 2);
        assert_eq!(mesh.vertex_count(), 4);
        assert!((mesh.normal(0) - Vec3::Z).length() < 1e-6);
    }

    #[test]
    fn rotate_x_turns_z_into_negative_y() {
        let mut mesh = MeshData::default();
        mesh.push_triangle(Vec3::ZERO, Vec3::X, Vec3::new(0.0, 0.0, 2.0));
        mesh.rotate_x(FRAC_PI_2);
        let bounds = mesh.bounds().unwrap();
        assert!((bounds.min.y + 2.0).abs() < 1e-5);
        assert!(bounds.max.y.abs() < 1e-5);
        assert!(bounds.size().z.abs() < 1e-5);
    }

    #[test]
    fn empty_mesh_has_no_bounds() {
        assert!(MeshData::default().bounds().is_none());
    }
}

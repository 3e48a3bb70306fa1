use glam::Vec2;

use crate::mesh::MeshData;
use crate::shape::{signed_area, triangulate, GeometryError, Shape, DEFAULT_CURVE_SEGMENTS};

/// Parameters for sweeping a shape along +Z. Edges are never bevelled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExtrudeSettings {
    pub depth: f32,
    /// Subdivisions of the side walls along the depth.
    pub steps: usize,
    pub curve_segments: usize,
}

impl Default for ExtrudeSettings {
    fn default() -> Self {
        Self {
            depth: 1.0,
            steps: 1,
            curve_segments: DEFAULT_CURVE_SEGMENTS,
        }
    }
}

/// Extrudes `shape` from `z = 0` to `z = depth` with flat shaded faces.
///
/// Both caps are always emitted. A zero depth yields two coincident caps
/// facing opposite ways and no side walls.
pub fn extrude(shape: &Shape, settings: &ExtrudeSettings) -> Result<MeshData, GeometryError> {
    if !settings.depth.is_finite() || settings.depth < 0.0 {
        return Err(GeometryError::InvalidDepth(settings.depth));
    }
    if settings.steps == 0 {
        return Err(GeometryError::ZeroSteps);
    }

    let mut contour = shape.extract_points(settings.curve_segments)?;
    if signed_area(&contour) < 0.0 {
        contour.reverse();
    }
    let triangles = triangulate(&contour);
    let depth = settings.depth;
    let at = |point: Vec2, z: f32| point.extend(z);

    let mut mesh = MeshData::default();
    for [a, b, c] in &triangles {
        mesh.push_triangle(at(contour[*a], depth), at(contour[*b], depth), at(contour[*c], depth));
    }
    for [a, b, c] in &triangles {
        mesh.push_triangle(at(contour[*a], 0.0), at(contour[*c], 0.0), at(contour[*b], 0.0));
    }

    if depth > 0.0 {
        let layers: Vec<f32> = (0..=settings.steps)
            .map(|step| depth * step as f32 / settings.steps as f32)
            .collect();
        for (i, &start) in contour.iter().enumerate() {
            let end = contour[(i + 1) % contour.len()];
            for pair in layers.windows(2) {
                let (z0, z1) = (pair[0], pair[1]);
                mesh.push_quad(at(start, z0), at(end, z0), at(end, z1), at(start, z1));
            }
        }
    }

    Ok(mesh)
}

#[cfg(test)]
mod tests {
    use std::f32::consts::TAU;

    use glam::Vec3;

    use super::*;

    fn wedge(span: f32) -> Shape {
        let mut shape = Shape::new();
        shape
            .move_to(1.0, 0.0)
            .arc(0.0, 0.0, 1.0, 0.0, span, false)
            .line_to(1.0, 0.0);
        shape
    }

    fn expected_vertex_count(points: usize, steps: usize, has_walls: bool) -> usize {
        let caps = 2 * points.saturating_sub(2) * 3;
        let walls = if has_walls { points * steps * 4 } else { 0 };
        caps + walls
    }

    fn wall_normal(start: Vec2, end: Vec2) -> Vec3 {
        let edge = end - start;
        Vec3::new(edge.y, -edge.x, 0.0).normalize_or_zero()
    }

    #[test]
    fn extrudes_wedge_with_stepped_walls() {
        let settings = ExtrudeSettings {
            depth: 2.0,
            steps: 55,
            ..ExtrudeSettings::default()
        };
        let mesh = extrude(&wedge(TAU / 3.0), &settings).unwrap();
        assert_eq!(mesh.vertex_count(), expected_vertex_count(26, 55, true));
        let bounds = mesh.bounds().unwrap();
        assert!(bounds.min.z.abs() < 1e-6);
        assert!((bounds.max.z - 2.0).abs() < 1e-6);
        assert!((bounds.max.x - 2.0).abs() < 1e-6);
    }

    #[test]
    fn zero_depth_is_flat_caps_only() {
        let settings = ExtrudeSettings {
            depth: 0.0,
            steps: 55,
            ..ExtrudeSettings::default()
        };
        let mesh = extrude(&wedge(TAU / 5.0), &settings).unwrap();
        assert_eq!(mesh.vertex_count(), expected_vertex_count(26, 55, false));
        assert_eq!(mesh.bounds().unwrap().size().z, 0.0);
    }

    #[test]
    fn caps_face_outward() {
        let mesh = extrude(&wedge(TAU / 4.0), &ExtrudeSettings::default()).unwrap();
        let cap_vertices = 24 * 3;
        for i in 0..cap_vertices {
            assert!((mesh.normal(i) - Vec3::Z).length() < 1e-5);
            assert!((mesh.normal(cap_vertices + i) + Vec3::Z).length() < 1e-5);
        }
    }

    #[test]
    fn side_walls_point_away_from_contour() {
        let mesh = extrude(&wedge(TAU / 4.0), &ExtrudeSettings::default()).unwrap();
        let first_wall = 2 * 24 * 3;
        let start = Vec2::new(2.0, 0.0);
        let end = mesh.position(first_wall + 1).truncate();
        let expected = wall_normal(start, end);
        assert!((mesh.normal(first_wall) - expected).length() < 1e-5);
        assert!(expected.x > 0.0);
    }

    #[test]
    fn rejects_invalid_settings() {
        let shape = wedge(1.0);
        let negative = ExtrudeSettings {
            depth: -1.0,
            ..ExtrudeSettings::default()
        };
        assert_eq!(
            extrude(&shape, &negative),
            Err(GeometryError::InvalidDepth(-1.0))
        );
        let nan = ExtrudeSettings {
            depth: f32::NAN,
            ..ExtrudeSettings::default()
        };
        assert!(matches!(
            extrude(&shape, &nan),
            Err(GeometryError::InvalidDepth(_))
        ));
        let no_steps = ExtrudeSettings {
            steps: 0,
            ..ExtrudeSettings::default()
        };
        assert_eq!(extrude(&shape, &no_steps), Err(GeometryError::ZeroSteps));
    }
}

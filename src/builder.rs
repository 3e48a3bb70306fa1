//! Procedural construction of the radar's wedge ring.

use std::f32::consts::FRAC_PI_2;
use std::f64::consts::TAU;

use glam::Vec3;
use log::debug;

use crate::color::{golden_angle_hue, sequential_color};
use crate::extrude::{extrude, ExtrudeSettings};
use crate::scene::{DirectionalLight, GridHelper, Mesh, SceneNode, Wedge};
use crate::shape::{GeometryError, Shape, DEFAULT_CURVE_SEGMENTS};

pub const WEDGE_RADIUS: f32 = 1.0;
pub const EXTRUDE_STEPS: usize = 55;
/// Shift applied to every wedge group; it moves the wedge apex at local
/// `(WEDGE_RADIUS, 0)` back onto the world origin.
pub const GROUP_OFFSET: Vec3 = Vec3::new(-1.0, 0.0, 0.0);

/// Angular span `[start, end)` of wedge `index` out of `count`, in radians.
pub fn wedge_span(index: u32, count: u32) -> (f64, f64) {
    let count = count as f64;
    (
        index as f64 * TAU / count,
        (index as f64 + 1.0) * TAU / count,
    )
}

/// Builds wedge `index` of a ring with `count` wedges.
pub fn build_wedge(index: u32, count: u32) -> Result<Wedge, GeometryError> {
    let (start_angle, end_angle) = wedge_span(index, count);
    let depth = index as f32;

    let mut shape = Shape::new();
    shape
        .move_to(WEDGE_RADIUS, 0.0)
        .arc(
            0.0,
            0.0,
            WEDGE_RADIUS,
            start_angle as f32,
            end_angle as f32,
            false,
        )
        .line_to(WEDGE_RADIUS, 0.0);

    let settings = ExtrudeSettings {
        depth,
        steps: EXTRUDE_STEPS,
        curve_segments: DEFAULT_CURVE_SEGMENTS,
    };
    let mut geometry = extrude(&shape, &settings)?;
    // Stand the extrusion up: +Z becomes -Y.
    geometry.rotate_x(FRAC_PI_2);

    Ok(Wedge {
        index,
        start_angle,
        end_angle,
        depth,
        hue: golden_angle_hue(index),
        color: sequential_color(index),
        offset: GROUP_OFFSET,
        mesh: Mesh {
            geometry,
            position: Vec3::new(0.0, depth, 0.0),
        },
    })
}

/// Builds the wedge ring. Counts below one produce no wedges.
pub fn build_wedges(count: i64) -> Result<Vec<Wedge>, GeometryError> {
    if count <= 0 {
        return Ok(Vec::new());
    }
    let count = u32::try_from(count).unwrap_or(u32::MAX);
    (0..count).map(|index| build_wedge(index, count)).collect()
}

/// Full scene contents for `count` wedges: the light, the grid, then the ring.
pub fn build_scene_contents(count: i64) -> Result<Vec<SceneNode>, GeometryError> {
    let wedges = build_wedges(count)?;
    debug!("built {} wedge(s)", wedges.len());
    let mut nodes = Vec::with_capacity(wedges.len() + 2);
    nodes.push(SceneNode::Light(DirectionalLight::default()));
    nodes.push(SceneNode::Grid(GridHelper::default()));
    nodes.extend(wedges.into_iter().map(SceneNode::Wedge));
    Ok(nodes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::Aabb;

    #[test]
    fn three_wedges_match_reference_layout() {
        let wedges = build_wedges(3).unwrap();
        let hues: Vec<f64> = wedges.iter().map(|w| w.hue).collect();
        let spans: Vec<(f64, f64)> = wedges.iter().map(Wedge::span_degrees).collect();
        let depths: Vec<f32> = wedges.iter().map(|w| w.depth).collect();
        let colors: Vec<u32> = wedges.iter().map(|w| w.color.hex()).collect();

        for (hue, expected) in hues.iter().zip([0.0, 137.508, 275.016]) {
            assert!((hue - expected).abs() < 1e-9);
        }
        for ((start, end), (es, ee)) in spans.iter().zip([(0.0, 120.0), (120.0, 240.0), (240.0, 360.0)]) {
            assert!((start - es).abs() < 1e-9);
            assert!((end - ee).abs() < 1e-9);
        }
        assert_eq!(depths, vec![0.0, 1.0, 2.0]);
        assert_eq!(colors, vec![0xff0000, 0x00ff4a, 0x9500ff]);
    }

    #[test]
    fn spans_partition_the_circle() {
        for n in 1..=25u32 {
            let wedges = build_wedges(n as i64).unwrap();
            assert_eq!(wedges.len(), n as usize);
            assert_eq!(wedges[0].start_angle, 0.0);
            assert!((wedges[n as usize - 1].end_angle - TAU).abs() < 1e-12);
            for pair in wedges.windows(2) {
                assert_eq!(pair[0].end_angle, pair[1].start_angle);
            }
        }
    }

    #[test]
    fn hue_is_independent_of_count() {
        let five = build_wedges(5).unwrap();
        let nine = build_wedges(9).unwrap();
        for (a, b) in five.iter().zip(nine.iter()) {
            assert_eq!(a.hue, b.hue);
            assert_eq!(a.color, b.color);
        }
    }

    #[test]
    fn wedges_stand_on_the_grid_with_height_equal_to_index() {
        let wedges = build_wedges(6).unwrap();
        for wedge in &wedges {
            assert_eq!(wedge.depth, wedge.index as f32);
            assert_eq!(wedge.mesh.position.y, wedge.index as f32);
            assert_eq!(wedge.offset, GROUP_OFFSET);
            let bounds = wedge.world_bounds().unwrap();
            assert!(bounds.min.y.abs() < 1e-4, "wedge {}", wedge.index);
            assert!((bounds.max.y - wedge.index as f32).abs() < 1e-4);
        }
        for pair in wedges.windows(2) {
            let lower = pair[0].world_bounds().unwrap().size().y;
            let higher = pair[1].world_bounds().unwrap().size().y;
            assert!(higher > lower);
        }
    }

    #[test]
    fn ring_is_centered_on_the_origin() {
        let wedges = build_wedges(4).unwrap();
        let ring = wedges
            .iter()
            .filter_map(Wedge::world_bounds)
            .reduce(|a, b| Aabb {
                min: a.min.min(b.min),
                max: a.max.max(b.max),
            })
            .unwrap();
        assert!((ring.min.x + 1.0).abs() < 1e-4);
        assert!((ring.max.x - 1.0).abs() < 1e-4);
        assert!((ring.min.z + 1.0).abs() < 1e-4);
        assert!((ring.max.z - 1.0).abs() < 1e-4);
    }

    #[test]
    fn single_segment_is_a_full_disc() {
        let wedges = build_wedges(1).unwrap();
        assert_eq!(wedges.len(), 1);
        let (start, end) = wedges[0].span_degrees();
        assert_eq!(start, 0.0);
        assert!((end - 360.0).abs() < 1e-9);
        let bounds = wedges[0].world_bounds().unwrap();
        assert!((bounds.size().x - 2.0).abs() < 1e-4);
        assert!((bounds.size().z - 2.0).abs() < 1e-4);
    }

    #[test]
    fn non_positive_counts_build_nothing() {
        assert!(build_wedges(0).unwrap().is_empty());
        assert!(build_wedges(-4).unwrap().is_empty());
        let nodes = build_scene_contents(0).unwrap();
        assert_eq!(nodes.len(), 2);
    }

    #[test]
    fn scene_contents_lead_with_light_and_grid() {
        let nodes = build_scene_contents(5).unwrap();
        assert_eq!(nodes.len(), 7);
        assert!(matches!(nodes[0], SceneNode::Light(_)));
        assert!(matches!(nodes[1], SceneNode::Grid(_)));
        assert!(nodes[2..]
            .iter()
            .all(|node| matches!(node, SceneNode::Wedge(_))));
    }
}

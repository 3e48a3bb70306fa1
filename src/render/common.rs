use glam::{Mat4, Vec2, Vec3, Vec4};

use crate::camera::PerspectiveCamera;
use crate::color::Color;
use crate::scene::{DirectionalLight, Scene};

/// Per-frame camera and lighting state shared by both renderers.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameParams {
    pub view_proj: Mat4,
    pub camera_position: Vec3,
    /// Unit vector towards the light.
    pub light_direction: Vec3,
    /// Linear light color premultiplied by intensity.
    pub light_radiance: Vec3,
    pub background: Vec3,
}

impl FrameParams {
    pub fn new(scene: &Scene, camera: &PerspectiveCamera) -> Self {
        let light = scene.lights().next().copied().unwrap_or(DirectionalLight {
            intensity: 0.0,
            ..DirectionalLight::default()
        });
        Self {
            view_proj: camera.view_proj(),
            camera_position: camera.position,
            light_direction: light.direction,
            light_radiance: light.color.to_linear() * light.intensity,
            background: scene.background().to_linear(),
        }
    }
}

/// Lambert shading of a linear `albedo` under a single directional light.
/// Physically based intensities are divided by pi, as in three.js.
pub fn lambert(albedo: Vec3, normal: Vec3, params: &FrameParams) -> Vec3 {
    let diffuse = normal.dot(params.light_direction).max(0.0);
    albedo * params.light_radiance * diffuse / std::f32::consts::PI
}

/// Encodes a linear channel back to sRGB.
pub fn linear_to_srgb(value: f32) -> f32 {
    let value = value.clamp(0.0, 1.0);
    if value <= 0.003_130_8 {
        value * 12.92
    } else {
        1.055 * value.powf(1.0 / 2.4) - 0.055
    }
}

/// Filled, flat shaded triangle in canvas pixel space.
#[derive(Clone, Debug, PartialEq)]
pub struct ScreenTriangle {
    pub points: [Vec2; 3],
    /// Mean normalized device depth; larger is farther away.
    pub depth: f32,
    pub color: Color,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ScreenLine {
    pub from: Vec2,
    pub to: Vec2,
    pub color: Color,
}

/// Everything a software rasterizer needs to paint one frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProjectedFrame {
    pub lines: Vec<ScreenLine>,
    /// Sorted back to front.
    pub triangles: Vec<ScreenTriangle>,
}

impl ProjectedFrame {
    pub fn new(scene: &Scene, params: &FrameParams, viewport: (u32, u32)) -> Self {
        let viewport = Vec2::new(viewport.0.max(1) as f32, viewport.1.max(1) as f32);
        let lines = scene
            .grids()
            .flat_map(|grid| grid.lines())
            .filter_map(|line| {
                let (from, to) = clip_segment(
                    params.view_proj * line.from.extend(1.0),
                    params.view_proj * line.to.extend(1.0),
                )?;
                Some(ScreenLine {
                    from: to_screen(from, viewport),
                    to: to_screen(to, viewport),
                    color: line.color,
                })
            })
            .collect();

        let mut triangles = Vec::new();
        for wedge in scene.wedges() {
            let model = wedge.model_matrix();
            let albedo = wedge.color.to_linear();
            let geometry = &wedge.mesh.geometry;
            for face in geometry.indices.chunks_exact(3) {
                let corners = [face[0], face[1], face[2]].map(|index| {
                    let world = model.transform_point3(geometry.position(index as usize));
                    params.view_proj * world.extend(1.0)
                });
                if corners.iter().any(|clip| clip.w <= f32::EPSILON || clip.z < 0.0) {
                    continue;
                }
                let ndc = corners.map(|clip| clip.truncate() / clip.w);
                // Back faces wind clockwise after projection.
                let facing = (ndc[1] - ndc[0]).truncate().perp_dot((ndc[2] - ndc[0]).truncate());
                if facing <= 0.0 {
                    continue;
                }
                let normal = model
                    .transform_vector3(geometry.normal(face[0] as usize))
                    .normalize_or_zero();
                let lit = lambert(albedo, normal, params);
                triangles.push(ScreenTriangle {
                    points: corners.map(|clip| to_screen(clip, viewport)),
                    depth: (ndc[0].z + ndc[1].z + ndc[2].z) / 3.0,
                    color: Color::from_rgb(
                        linear_to_srgb(lit.x),
                        linear_to_srgb(lit.y),
                        linear_to_srgb(lit.z),
                    ),
                });
            }
        }
        triangles.sort_by(|a, b| b.depth.total_cmp(&a.depth));

        Self { lines, triangles }
    }
}

/// Trims a clip-space segment to the visible side of the near plane.
fn clip_segment(a: Vec4, b: Vec4) -> Option<(Vec4, Vec4)> {
    match (a.z >= 0.0, b.z >= 0.0) {
        (true, true) => Some((a, b)),
        (false, false) => None,
        (a_visible, _) => {
            let t = a.z / (a.z - b.z);
            let cut = a.lerp(b, t);
            if a_visible {
                Some((a, cut))
            } else {
                Some((cut, b))
            }
        }
    }
}

fn to_screen(clip: Vec4, viewport: Vec2) -> Vec2 {
    let ndc = clip.truncate().truncate() / clip.w;
    Vec2::new(
        (ndc.x + 1.0) * 0.5 * viewport.x,
        (1.0 - ndc.y) * 0.5 * viewport.y,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::build_scene_contents;

    fn scene() -> Scene {
        let mut scene = Scene::default();
        scene.replace_contents(build_scene_contents(2).unwrap());
        scene
    }

    #[test]
    fn params_follow_scene_light() {
        let camera = PerspectiveCamera::new(75.0, 1.0, 0.1, 1000.0)
            .with_position(Vec3::new(0.0, 5.0, 10.0));
        let params = FrameParams::new(&scene(), &camera);
        assert!((params.light_radiance - Vec3::splat(3.0)).length() < 1e-5);
        assert_eq!(params.camera_position, camera.position);
        assert_eq!(params.background, Color::from_hex(0x999999).to_linear());
    }

    #[test]
    fn surfaces_facing_away_from_light_are_black() {
        let camera = PerspectiveCamera::new(75.0, 1.0, 0.1, 1000.0);
        let params = FrameParams::new(&scene(), &camera);
        assert_eq!(lambert(Vec3::ONE, -params.light_direction, &params), Vec3::ZERO);
        let lit = lambert(Vec3::ONE, params.light_direction, &params);
        assert!((lit.x - 3.0 / std::f32::consts::PI).abs() < 1e-4);
    }

    #[test]
    fn srgb_encoding_is_monotonic_and_bounded() {
        assert_eq!(linear_to_srgb(0.0), 0.0);
        assert!((linear_to_srgb(1.0) - 1.0).abs() < 1e-6);
        assert!(linear_to_srgb(0.2) > linear_to_srgb(0.1));
        assert_eq!(linear_to_srgb(4.0), linear_to_srgb(1.0));
    }

    fn radar_camera() -> PerspectiveCamera {
        let mut camera = PerspectiveCamera::new(75.0, 800.0 / 600.0, 0.1, 1000.0)
            .with_position(Vec3::new(0.0, 5.0, 10.0));
        camera.look_at(Vec3::ZERO);
        camera
    }

    #[test]
    fn projected_frame_is_sorted_back_to_front() {
        let scene = scene();
        let camera = radar_camera();
        let params = FrameParams::new(&scene, &camera);
        let frame = ProjectedFrame::new(&scene, &params, (800, 600));
        assert!(!frame.triangles.is_empty());
        assert!(frame
            .triangles
            .windows(2)
            .all(|pair| pair[0].depth >= pair[1].depth));
        assert!(frame.triangles.iter().all(|tri| tri.depth >= 0.0 && tri.depth <= 1.0));
    }

    #[test]
    fn grid_lines_behind_the_camera_are_clipped_not_dropped() {
        let scene = scene();
        let camera = radar_camera();
        let params = FrameParams::new(&scene, &camera);
        let frame = ProjectedFrame::new(&scene, &params, (800, 600));
        // Lines running along z pass behind the camera and must survive clipping.
        assert!(frame.lines.len() > 51);
        assert!(frame.lines.len() <= 102);
    }

    #[test]
    fn origin_lands_in_viewport_center() {
        let camera = radar_camera();
        let clip = camera.view_proj() * Vec4::new(0.0, 0.0, 0.0, 1.0);
        let screen = to_screen(clip, Vec2::new(800.0, 600.0));
        assert!((screen - Vec2::new(400.0, 300.0)).length() < 1e-3);
    }

    #[test]
    fn segments_are_cut_at_the_near_plane() {
        let a = Vec4::new(0.0, 0.0, 1.0, 2.0);
        let b = Vec4::new(0.0, 0.0, -1.0, 0.5);
        let (from, to) = clip_segment(a, b).unwrap();
        assert_eq!(from, a);
        assert!(to.z.abs() < 1e-6);
        assert!(clip_segment(b, b).is_none());
    }
}

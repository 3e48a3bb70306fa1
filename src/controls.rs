//! Orbit camera controls: drag to rotate around a target, secondary drag to
//! pan, wheel to zoom.

use std::f32::consts::{PI, TAU};

use glam::{Vec2, Vec3};

use crate::camera::PerspectiveCamera;
use crate::input::MouseButton;

const MIN_POLAR_EPSILON: f32 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq)]
enum DragMode {
    Rotate,
    Pan,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Drag {
    mode: DragMode,
    button: MouseButton,
    last: Vec2,
}

/// Orbit state kept in spherical coordinates around `target`.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitControls {
    pub target: Vec3,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    radius: f32,
    /// Angle from the +Y axis.
    phi: f32,
    /// Angle around +Y, measured from +Z.
    theta: f32,
    drag: Option<Drag>,
}

impl OrbitControls {
    /// Starts orbiting around the camera's current target.
    pub fn new(camera: &PerspectiveCamera) -> Self {
        let mut controls = Self {
            target: camera.target,
            rotate_speed: 1.0,
            zoom_speed: 1.0,
            pan_speed: 1.0,
            min_distance: 0.1,
            max_distance: 500.0,
            radius: 1.0,
            phi: PI / 2.0,
            theta: 0.0,
            drag: None,
        };
        controls.sync_from(camera);
        controls
    }

    fn sync_from(&mut self, camera: &PerspectiveCamera) {
        let offset = camera.position - self.target;
        self.radius = offset.length().clamp(self.min_distance, self.max_distance);
        if offset.length_squared() > f32::EPSILON {
            self.theta = offset.x.atan2(offset.z);
            self.phi = (offset.y / offset.length()).clamp(-1.0, 1.0).acos();
        }
        self.clamp_phi();
    }

    pub fn distance(&self) -> f32 {
        self.radius
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Camera position implied by the orbit state.
    pub fn eye(&self) -> Vec3 {
        let sin_phi = self.phi.sin();
        self.target
            + Vec3::new(
                self.radius * sin_phi * self.theta.sin(),
                self.radius * self.phi.cos(),
                self.radius * sin_phi * self.theta.cos(),
            )
    }

    /// Writes position and target into `camera`.
    pub fn apply(&self, camera: &mut PerspectiveCamera) {
        camera.position = self.eye();
        camera.look_at(self.target);
    }

    pub fn pointer_down(&mut self, button: MouseButton, position: Vec2) {
        let mode = match button {
            MouseButton::LEFT => DragMode::Rotate,
            MouseButton::RIGHT | MouseButton::MIDDLE => DragMode::Pan,
            _ => return,
        };
        self.drag = Some(Drag {
            mode,
            button,
            last: position,
        });
    }

    pub fn pointer_up(&mut self, button: MouseButton) {
        if self.drag.is_some_and(|drag| drag.button == button) {
            self.drag = None;
        }
    }

    /// Returns `true` when the move changed the orbit.
    pub fn pointer_move(
        &mut self,
        position: Vec2,
        viewport: (u32, u32),
        camera: &PerspectiveCamera,
    ) -> bool {
        let Some(drag) = self.drag.as_mut() else {
            return false;
        };
        let delta = position - drag.last;
        drag.last = position;
        let mode = drag.mode;
        if delta == Vec2::ZERO {
            return false;
        }
        let height = viewport.1.max(1) as f32;
        match mode {
            DragMode::Rotate => self.rotate(delta, height),
            DragMode::Pan => self.pan(delta, height, camera),
        }
        true
    }

    /// Zooms one step per wheel notch; positive deltas move away.
    pub fn wheel(&mut self, delta: f32) -> bool {
        if delta == 0.0 || !delta.is_finite() {
            return false;
        }
        let scale = 0.95_f32.powf(self.zoom_speed);
        let radius = if delta > 0.0 {
            self.radius / scale
        } else {
            self.radius * scale
        };
        let radius = radius.clamp(self.min_distance, self.max_distance);
        let changed = radius != self.radius;
        self.radius = radius;
        changed
    }

    fn rotate(&mut self, delta: Vec2, height: f32) {
        self.theta -= TAU * delta.x / height * self.rotate_speed;
        self.phi -= TAU * delta.y / height * self.rotate_speed;
        self.clamp_phi();
    }

    fn pan(&mut self, delta: Vec2, height: f32, camera: &PerspectiveCamera) {
        let target_distance = self.radius * (camera.fov.to_radians() / 2.0).tan();
        let scale = 2.0 * target_distance / height * self.pan_speed;
        let offset = -camera.right() * delta.x * scale + camera.screen_up() * delta.y * scale;
        self.target += offset;
    }

    fn clamp_phi(&mut self) {
        self.phi = self.phi.clamp(MIN_POLAR_EPSILON, PI - MIN_POLAR_EPSILON);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (OrbitControls, PerspectiveCamera) {
        let mut camera = PerspectiveCamera::new(75.0, 1.0, 0.1, 1000.0)
            .with_position(Vec3::new(0.0, 5.0, 10.0));
        camera.look_at(Vec3::ZERO);
        (OrbitControls::new(&camera), camera)
    }

    #[test]
    fn starts_at_camera_position() {
        let (controls, camera) = setup();
        assert!((controls.eye() - camera.position).length() < 1e-4);
        assert!((controls.distance() - 125.0_f32.sqrt()).abs() < 1e-4);
    }

    #[test]
    fn left_drag_rotates_around_target() {
        let (mut controls, mut camera) = setup();
        controls.pointer_down(MouseButton::LEFT, Vec2::new(100.0, 100.0));
        assert!(controls.pointer_move(Vec2::new(150.0, 100.0), (600, 600), &camera));
        controls.apply(&mut camera);
        assert!((camera.position.length() - 125.0_f32.sqrt()).abs() < 1e-3);
        assert!(camera.position.x < 0.0);
        assert!((camera.position.y - 5.0).abs() < 1e-3);
        controls.pointer_up(MouseButton::LEFT);
        assert!(!controls.pointer_move(Vec2::new(300.0, 300.0), (600, 600), &camera));
    }

    #[test]
    fn vertical_drag_never_flips_over_the_pole() {
        let (mut controls, mut camera) = setup();
        controls.pointer_down(MouseButton::LEFT, Vec2::ZERO);
        controls.pointer_move(Vec2::new(0.0, 5000.0), (600, 600), &camera);
        controls.apply(&mut camera);
        assert!(camera.position.y > 0.0);
        assert!(camera.position.x.abs() < 1e-3 && camera.position.z.abs() < 1e-3);
    }

    #[test]
    fn right_drag_pans_target() {
        let (mut controls, camera) = setup();
        controls.pointer_down(MouseButton::RIGHT, Vec2::ZERO);
        assert!(controls.pointer_move(Vec2::new(10.0, 0.0), (600, 600), &camera));
        assert!(controls.target.x < 0.0);
        assert!(controls.target.y.abs() < 1e-6);
    }

    #[test]
    fn wheel_zooms_within_limits() {
        let (mut controls, _) = setup();
        let start = controls.distance();
        assert!(controls.wheel(-1.0));
        assert!(controls.distance() < start);
        assert!(controls.wheel(1.0));
        assert!((controls.distance() - start).abs() < 1e-4);
        assert!(!controls.wheel(0.0));
        controls.max_distance = controls.distance();
        assert!(!controls.wheel(1.0));
    }

    #[test]
    fn unrelated_button_release_keeps_drag() {
        let (mut controls, _) = setup();
        controls.pointer_down(MouseButton::LEFT, Vec2::ZERO);
        controls.pointer_up(MouseButton::RIGHT);
        assert!(controls.is_dragging());
    }
}

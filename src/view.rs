//! View context tying the scene, camera, orbit controls and a display
//! surface together.

use anyhow::{Context, Result};
use glam::{Vec2, Vec3};
use log::{debug, info};

use crate::builder::build_scene_contents;
use crate::camera::PerspectiveCamera;
use crate::config::{aspect_ratio, SegmentCount, ViewConfig};
use crate::controls::OrbitControls;
use crate::input::MouseButton;
use crate::scene::{Scene, SceneNode};
use crate::shape::GeometryError;

/// Surface the view draws into.
pub trait Display {
    /// Current drawable size in physical pixels.
    fn viewport_size(&self) -> (u32, u32);

    fn resize(&mut self, width: u32, height: u32);

    fn render(&mut self, scene: &Scene, camera: &PerspectiveCamera) -> Result<()>;
}

/// Whether the host can provide a display surface.
#[derive(Debug)]
pub enum Platform<D> {
    Display(D),
    Headless,
}

struct Mounted<D> {
    display: D,
    scene: Scene,
    camera: PerspectiveCamera,
    controls: OrbitControls,
    segments: SegmentCount,
}

/// The radar visualization. A headless view ignores every operation.
pub struct RadarView<D: Display> {
    inner: Option<Mounted<D>>,
}

impl<D: Display> RadarView<D> {
    /// Sets up the scene, camera and controls, builds the initial ring and
    /// draws the first frame.
    pub fn mount(platform: Platform<D>, config: ViewConfig) -> Result<Self> {
        let display = match platform {
            Platform::Display(display) => display,
            Platform::Headless => {
                info!("no display available; radar view stays headless");
                return Ok(Self { inner: None });
            }
        };

        let (width, height) = match display.viewport_size() {
            (0, _) | (_, 0) => (config.width, config.height),
            size => size,
        };
        let mut camera = PerspectiveCamera::new(
            config.fov,
            aspect_ratio(width, height),
            config.near,
            config.far,
        )
        .with_position(config.camera_position);
        camera.look_at(Vec3::ZERO);
        let controls = OrbitControls::new(&camera);

        let mut view = Self {
            inner: Some(Mounted {
                display,
                scene: Scene::default(),
                camera,
                controls,
                segments: config.segments,
            }),
        };
        view.set_segment_count(config.segments)?;
        Ok(view)
    }

    pub fn is_headless(&self) -> bool {
        self.inner.is_none()
    }

    pub fn scene(&self) -> Option<&Scene> {
        self.inner.as_ref().map(|inner| &inner.scene)
    }

    pub fn camera(&self) -> Option<&PerspectiveCamera> {
        self.inner.as_ref().map(|inner| &inner.camera)
    }

    pub fn segment_count(&self) -> Option<SegmentCount> {
        self.inner.as_ref().map(|inner| inner.segments)
    }

    pub fn display(&self) -> Option<&D> {
        self.inner.as_ref().map(|inner| &inner.display)
    }

    /// Rebuilds the wedge ring. The scene is only touched once the new
    /// contents built successfully.
    pub fn set_segment_count(&mut self, segments: SegmentCount) -> Result<()> {
        self.rebuild_with(segments, build_scene_contents)
    }

    fn rebuild_with(
        &mut self,
        segments: SegmentCount,
        build: impl FnOnce(i64) -> Result<Vec<SceneNode>, GeometryError>,
    ) -> Result<()> {
        let Some(inner) = self.inner.as_mut() else {
            return Ok(());
        };
        let nodes = build(segments.get() as i64)
            .with_context(|| format!("failed to build {segments} wedge(s)"))?;
        inner.scene.replace_contents(nodes);
        inner.segments = segments;
        debug!(
            "scene rebuilt with {segments} wedge(s), generation {}",
            inner.scene.generation()
        );
        inner.draw()
    }

    /// Applies a raw form value. Returns `false` and keeps the current
    /// scene when the value is not a valid count.
    pub fn on_segment_input(&mut self, raw: f64) -> Result<bool> {
        if self.is_headless() {
            return Ok(false);
        }
        match SegmentCount::from_input(raw) {
            Ok(segments) => {
                self.set_segment_count(segments)?;
                Ok(true)
            }
            Err(err) => {
                debug!("ignoring segment input: {err}");
                Ok(false)
            }
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        let Some(inner) = self.inner.as_mut() else {
            return Ok(());
        };
        if width == 0 || height == 0 {
            return Ok(());
        }
        inner.camera.set_aspect(aspect_ratio(width, height));
        inner.display.resize(width, height);
        inner.draw()
    }

    pub fn pointer_down(&mut self, button: MouseButton, x: f32, y: f32) {
        if let Some(inner) = self.inner.as_mut() {
            inner.controls.pointer_down(button, Vec2::new(x, y));
        }
    }

    pub fn pointer_move(&mut self, x: f32, y: f32) -> Result<()> {
        let Some(inner) = self.inner.as_mut() else {
            return Ok(());
        };
        let viewport = inner.display.viewport_size();
        if inner
            .controls
            .pointer_move(Vec2::new(x, y), viewport, &inner.camera)
        {
            inner.controls.apply(&mut inner.camera);
            inner.draw()?;
        }
        Ok(())
    }

    pub fn pointer_up(&mut self, button: MouseButton) {
        if let Some(inner) = self.inner.as_mut() {
            inner.controls.pointer_up(button);
        }
    }

    pub fn wheel(&mut self, delta: f32) -> Result<()> {
        let Some(inner) = self.inner.as_mut() else {
            return Ok(());
        };
        if inner.controls.wheel(delta) {
            inner.controls.apply(&mut inner.camera);
            inner.draw()?;
        }
        Ok(())
    }

    pub fn render(&mut self) -> Result<()> {
        match self.inner.as_mut() {
            Some(inner) => inner.draw(),
            None => Ok(()),
        }
    }
}

impl<D: Display> Mounted<D> {
    fn draw(&mut self) -> Result<()> {
        self.display.render(&self.scene, &self.camera)
    }
}

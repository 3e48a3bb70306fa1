//! Interactive 3D radar pie: a ring of extruded wedges, colored by
//! golden-angle hue rotation, standing on a ground grid.
//!
//! Scene construction, geometry, camera and orbit controls are platform
//! independent and testable headless. Drawing goes through the
//! [`view::Display`] trait, implemented by a wgpu renderer on native targets
//! and a canvas renderer in the browser.

pub mod app;
pub mod builder;
pub mod camera;
pub mod color;
pub mod config;
pub mod controls;
pub mod extrude;
pub mod input;
pub mod mesh;
pub mod render;
pub mod scene;
pub mod shape;
pub mod view;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use app::{build_report, SceneReport};
pub use builder::{build_scene_contents, build_wedges};
pub use camera::PerspectiveCamera;
pub use color::Color;
pub use config::{SegmentCount, SegmentCountError, ViewConfig};
pub use controls::OrbitControls;
pub use input::{MouseButton, SegmentKey};
pub use mesh::MeshData;
pub use scene::{DirectionalLight, GridHelper, Scene, SceneNode, Wedge};
pub use shape::{GeometryError, Shape};
pub use view::{Display, Platform, RadarView};

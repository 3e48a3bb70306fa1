use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::mesh::{Aabb, MeshData};

/// Flat background behind the radar.
pub const BACKGROUND: Color = Color::from_hex(0x999999);

/// Runtime representation of the radar scene.
///
/// Every content change bumps [`Scene::generation`] so renderers can tell
/// when cached GPU buffers are stale.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    background: Color,
    nodes: Vec<SceneNode>,
    generation: u64,
}

impl Scene {
    pub fn new(background: Color) -> Self {
        Self {
            background,
            nodes: Vec::new(),
            generation: 0,
        }
    }

    pub fn background(&self) -> Color {
        self.background
    }

    pub fn nodes(&self) -> &[SceneNode] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Swaps in a fully built set of nodes in one step.
    pub fn replace_contents(&mut self, nodes: Vec<SceneNode>) {
        self.nodes = nodes;
        self.generation += 1;
    }

    pub fn lights(&self) -> impl Iterator<Item = &DirectionalLight> {
        self.nodes.iter().filter_map(|node| match node {
            SceneNode::Light(light) => Some(light),
            _ => None,
        })
    }

    pub fn grids(&self) -> impl Iterator<Item = &GridHelper> {
        self.nodes.iter().filter_map(|node| match node {
            SceneNode::Grid(grid) => Some(grid),
            _ => None,
        })
    }

    pub fn wedges(&self) -> impl Iterator<Item = &Wedge> {
        self.nodes.iter().filter_map(|node| match node {
            SceneNode::Wedge(wedge) => Some(wedge),
            _ => None,
        })
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new(BACKGROUND)
    }
}

/// Renderable entry of the scene.
#[derive(Debug, Clone, PartialEq)]
pub enum SceneNode {
    Light(DirectionalLight),
    Grid(GridHelper),
    Wedge(Wedge),
}

/// Light arriving from a fixed direction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DirectionalLight {
    pub color: Color,
    pub intensity: f32,
    /// Unit vector pointing from the scene towards the light.
    pub direction: Vec3,
}

impl DirectionalLight {
    pub fn new(color: Color, intensity: f32, position: Vec3) -> Self {
        Self {
            color,
            intensity,
            direction: position.normalize_or_zero(),
        }
    }
}

impl Default for DirectionalLight {
    fn default() -> Self {
        Self::new(Color::WHITE, 3.0, Vec3::new(0.5, 1.0, 0.5))
    }
}

/// Square line grid lying on the XZ plane, centered at the origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridHelper {
    pub size: f32,
    pub divisions: u32,
    pub center_color: Color,
    pub color: Color,
}

/// Colored line segment of a grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLine {
    pub from: Vec3,
    pub to: Vec3,
    pub color: Color,
}

impl GridHelper {
    /// Emits one line per division boundary in each direction. With an even
    /// division count the pair through the origin takes `center_color`.
    pub fn lines(&self) -> Vec<GridLine> {
        let step = self.size / self.divisions.max(1) as f32;
        let half = self.size / 2.0;
        let mut lines = Vec::with_capacity(2 * (self.divisions as usize + 1));
        for i in 0..=self.divisions {
            let k = -half + i as f32 * step;
            let color = if 2 * i == self.divisions {
                self.center_color
            } else {
                self.color
            };
            lines.push(GridLine {
                from: Vec3::new(-half, 0.0, k),
                to: Vec3::new(half, 0.0, k),
                color,
            });
            lines.push(GridLine {
                from: Vec3::new(k, 0.0, -half),
                to: Vec3::new(k, 0.0, half),
                color,
            });
        }
        lines
    }
}

impl Default for GridHelper {
    fn default() -> Self {
        Self {
            size: 50.0,
            divisions: 50,
            center_color: Color::WHITE,
            color: Color::from_hex(0x7b7b7b),
        }
    }
}

/// Geometry placed at an offset inside its group.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    pub geometry: MeshData,
    pub position: Vec3,
}

/// One pie slice of the radar: an extruded mesh wrapped in an offset group.
#[derive(Debug, Clone, PartialEq)]
pub struct Wedge {
    pub index: u32,
    /// Start of the angular span in radians, inclusive.
    pub start_angle: f64,
    /// End of the angular span in radians, exclusive.
    pub end_angle: f64,
    pub depth: f32,
    pub hue: f64,
    pub color: Color,
    /// Translation of the enclosing group.
    pub offset: Vec3,
    pub mesh: Mesh,
}

impl Wedge {
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_translation(self.offset) * Mat4::from_translation(self.mesh.position)
    }

    pub fn span_degrees(&self) -> (f64, f64) {
        (self.start_angle.to_degrees(), self.end_angle.to_degrees())
    }

    /// Bounds of the mesh after the group and mesh translations.
    pub fn world_bounds(&self) -> Option<Aabb> {
        let shift = self.offset + self.mesh.position;
        self.mesh.geometry.bounds().map(|aabb| Aabb {
            min: aabb.min + shift,
            max: aabb.max + shift,
        })
    }

    pub fn summary(&self) -> WedgeSummary {
        let (start_degrees, end_degrees) = self.span_degrees();
        WedgeSummary {
            index: self.index,
            hue: self.hue,
            color: self.color.to_string(),
            start_degrees,
            end_degrees,
            depth: self.depth,
            vertices: self.mesh.geometry.vertex_count(),
            triangles: self.mesh.geometry.triangle_count(),
        }
    }
}

/// Serializable description of a wedge without its geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WedgeSummary {
    pub index: u32,
    pub hue: f64,
    pub color: String,
    pub start_degrees: f64,
    pub end_degrees: f64,
    pub depth: f32,
    pub vertices: usize,
    pub triangles: usize,
}

use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use bytemuck::{bytes_of, Pod, Zeroable};
use glam::{Mat3, Mat4};
use log::{debug, warn};
use wgpu::util::DeviceExt;
use winit::dpi::PhysicalSize;
use winit::window::{Window, WindowId};

use crate::camera::PerspectiveCamera;
use crate::mesh::{MeshData, VERTEX_STRIDE};
use crate::scene::{GridLine, Scene, Wedge};
use crate::view::Display;

use super::common::FrameParams;

/// GPU renderer backed by wgpu that draws the radar scene into a window.
pub struct Renderer {
    window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    sample_count: u32,
    depth: DepthBuffer,
    msaa: Option<MsaaBuffer>,
    mesh_pipeline: wgpu::RenderPipeline,
    line_pipeline: wgpu::RenderPipeline,
    global_buffer: wgpu::Buffer,
    global_bind_group: wgpu::BindGroup,
    object_layout: wgpu::BindGroupLayout,
    buffers: Option<SceneBuffers>,
}

impl Renderer {
    /// Initializes the GPU renderer for the provided window.
    pub async fn new(window: Arc<Window>) -> Result<Self> {
        let size = window.inner_size();
        if size.width == 0 || size.height == 0 {
            return Err(anyhow!("window has zero area"));
        }

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            flags: wgpu::InstanceFlags::default(),
            memory_budget_thresholds: Default::default(),
            backend_options: Default::default(),
        });
        let surface = instance
            .create_surface(Arc::clone(&window))
            .context("failed to create window surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("failed to acquire GPU adapter")?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("radar-device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                experimental_features: Default::default(),
                memory_hints: Default::default(),
                trace: Default::default(),
            })
            .await
            .context("failed to create GPU device")?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|format| format.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .context("surface reports no supported formats")?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width,
            height: size.height,
            present_mode: wgpu::PresentMode::AutoVsync,
            desired_maximum_frame_latency: 2,
            alpha_mode,
            view_formats: vec![],
        };
        surface.configure(&device, &config);

        let sample_count =
            msaa_sample_count(adapter.get_texture_format_features(surface_format).flags);
        debug!("rendering with {sample_count}x multisampling");
        let depth = DepthBuffer::create(&device, config.width, config.height, sample_count);
        let msaa = MsaaBuffer::create(&device, &config, sample_count);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("radar-shader"),
            source: wgpu::ShaderSource::Wgsl(SHADER.into()),
        });

        let global_layout = uniform_layout::<GlobalUniform>(&device, "global-bind-layout");
        let object_layout = uniform_layout::<ObjectConstants>(&device, "object-bind-layout");

        let global_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("global-uniform"),
            size: std::mem::size_of::<GlobalUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let global_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("global-bind-group"),
            layout: &global_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: global_buffer.as_entire_binding(),
            }],
        });

        let mesh_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("mesh-pipeline-layout"),
            bind_group_layouts: &[&global_layout, &object_layout],
            push_constant_ranges: &[],
        });
        let line_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("line-pipeline-layout"),
            bind_group_layouts: &[&global_layout],
            push_constant_ranges: &[],
        });

        let mesh_pipeline = create_pipeline(
            &device,
            PipelineSpec {
                label: "mesh-pipeline",
                layout: &mesh_layout,
                shader: &shader,
                vs_entry: "vs_mesh",
                fs_entry: "fs_mesh",
                topology: wgpu::PrimitiveTopology::TriangleList,
                format: surface_format,
                sample_count,
            },
        );
        let line_pipeline = create_pipeline(
            &device,
            PipelineSpec {
                label: "line-pipeline",
                layout: &line_layout,
                shader: &shader,
                vs_entry: "vs_line",
                fs_entry: "fs_line",
                topology: wgpu::PrimitiveTopology::LineList,
                format: surface_format,
                sample_count,
            },
        );

        Ok(Self {
            window,
            surface,
            device,
            queue,
            config,
            sample_count,
            depth,
            msaa,
            mesh_pipeline,
            line_pipeline,
            global_buffer,
            global_bind_group,
            object_layout,
            buffers: None,
        })
    }

    /// Returns the identifier of the window owned by the renderer.
    pub fn window_id(&self) -> WindowId {
        self.window.id()
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    fn reconfigure(&mut self, size: PhysicalSize<u32>) {
        if size.width == 0 || size.height == 0 {
            return;
        }
        self.config.width = size.width;
        self.config.height = size.height;
        self.surface.configure(&self.device, &self.config);
        self.depth =
            DepthBuffer::create(&self.device, size.width, size.height, self.sample_count);
        self.msaa = MsaaBuffer::create(&self.device, &self.config, self.sample_count);
    }

    fn update_globals(&self, params: &FrameParams) {
        let uniform = GlobalUniform {
            view_proj: params.view_proj.to_cols_array_2d(),
            camera_position: params.camera_position.extend(1.0).into(),
            light_direction: params.light_direction.extend(0.0).into(),
            light_radiance: params.light_radiance.extend(1.0).into(),
        };
        self.queue
            .write_buffer(&self.global_buffer, 0, bytes_of(&uniform));
    }

    /// Re-uploads geometry when the scene generation moved on.
    fn sync_buffers(&mut self, scene: &Scene) {
        if self
            .buffers
            .as_ref()
            .is_some_and(|buffers| buffers.generation == scene.generation())
        {
            return;
        }
        let wedges = scene
            .wedges()
            .map(|wedge| WedgeBuffers::new(&self.device, &self.object_layout, wedge))
            .collect::<Vec<_>>();
        let lines = scene
            .grids()
            .flat_map(|grid| grid.lines())
            .collect::<Vec<_>>();
        let grid = LineBuffers::new(&self.device, &lines);
        debug!(
            "uploaded {} wedge mesh(es) and {} grid line(s) for generation {}",
            wedges.len(),
            lines.len(),
            scene.generation()
        );
        self.buffers = Some(SceneBuffers {
            generation: scene.generation(),
            wedges,
            grid,
        });
    }

    fn draw_frame(&mut self, params: &FrameParams) -> Result<(), wgpu::SurfaceError> {
        let output = self.surface.get_current_texture()?;
        let surface_view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        // Multisampled frames resolve into the surface texture.
        let (view, resolve_target) = match self.msaa.as_ref() {
            Some(msaa) => (&msaa.view, Some(&surface_view)),
            None => (&surface_view, None),
        };
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("radar-encoder"),
            });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("main-pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    depth_slice: None,
                    resolve_target,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: params.background.x as f64,
                            g: params.background.y as f64,
                            b: params.background.z as f64,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            if let Some(buffers) = self.buffers.as_ref() {
                pass.set_bind_group(0, &self.global_bind_group, &[]);

                if let Some(grid) = buffers.grid.as_ref() {
                    pass.set_pipeline(&self.line_pipeline);
                    pass.set_vertex_buffer(0, grid.vertex.slice(..));
                    pass.draw(0..grid.vertex_count, 0..1);
                }

                pass.set_pipeline(&self.mesh_pipeline);
                for wedge in &buffers.wedges {
                    pass.set_vertex_buffer(0, wedge.vertex.slice(..));
                    pass.set_index_buffer(wedge.index.slice(..), wgpu::IndexFormat::Uint32);
                    pass.set_bind_group(1, &wedge.bind_group, &[]);
                    pass.draw_indexed(0..wedge.index_count, 0, 0..1);
                }
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }
}

impl Display for Renderer {
    fn viewport_size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.reconfigure(PhysicalSize::new(width, height));
    }

    fn render(&mut self, scene: &Scene, camera: &PerspectiveCamera) -> Result<()> {
        let params = FrameParams::new(scene, camera);
        self.update_globals(&params);
        self.sync_buffers(scene);
        match self.draw_frame(&params) {
            Ok(()) => Ok(()),
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                let size = self.window.inner_size();
                warn!("surface lost or outdated; reconfiguring at {}x{}", size.width, size.height);
                self.reconfigure(size);
                self.window.request_redraw();
                Ok(())
            }
            Err(wgpu::SurfaceError::OutOfMemory) => Err(anyhow!("GPU is out of memory")),
            Err(err) => {
                warn!("skipping frame: {err}");
                Ok(())
            }
        }
    }
}

struct SceneBuffers {
    generation: u64,
    wedges: Vec<WedgeBuffers>,
    grid: Option<LineBuffers>,
}

struct WedgeBuffers {
    vertex: wgpu::Buffer,
    index: wgpu::Buffer,
    index_count: u32,
    _uniform: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl WedgeBuffers {
    fn new(device: &wgpu::Device, layout: &wgpu::BindGroupLayout, wedge: &Wedge) -> Self {
        let label = format!("wedge-{}", wedge.index);
        let MeshData { vertices, indices } = &wedge.mesh.geometry;
        let vertex = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label}-vertices")),
            contents: bytemuck::cast_slice(vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label}-indices")),
            contents: bytemuck::cast_slice(indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        let model = wedge.model_matrix();
        let constants = ObjectConstants {
            model: model.to_cols_array_2d(),
            normal: mat3_to_3x4(normal_matrix(model)),
            color: wedge.color.to_linear().extend(1.0).into(),
        };
        let uniform = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label}-uniform")),
            contents: bytes_of(&constants),
            usage: wgpu::BufferUsages::UNIFORM,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&format!("{label}-bind-group")),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform.as_entire_binding(),
            }],
        });

        Self {
            vertex,
            index,
            index_count: indices.len() as u32,
            _uniform: uniform,
            bind_group,
        }
    }
}

struct LineBuffers {
    vertex: wgpu::Buffer,
    vertex_count: u32,
}

impl LineBuffers {
    fn new(device: &wgpu::Device, lines: &[GridLine]) -> Option<Self> {
        if lines.is_empty() {
            return None;
        }
        let vertices = line_vertices(lines);
        let vertex = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("grid-vertices"),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        Some(Self {
            vertex,
            vertex_count: (vertices.len() / VERTEX_STRIDE) as u32,
        })
    }
}

/// Interleaves grid lines as `position, linear color` pairs.
fn line_vertices(lines: &[GridLine]) -> Vec<f32> {
    let mut vertices = Vec::with_capacity(lines.len() * 2 * VERTEX_STRIDE);
    for line in lines {
        let color = line.color.to_linear();
        for point in [line.from, line.to] {
            vertices.extend_from_slice(&point.to_array());
            vertices.extend_from_slice(&color.to_array());
        }
    }
    vertices
}

fn normal_matrix(model: Mat4) -> Mat3 {
    Mat3::from_mat4(model).inverse().transpose()
}

fn mat3_to_3x4(matrix: Mat3) -> [[f32; 4]; 3] {
    let cols = matrix.to_cols_array();
    [
        [cols[0], cols[1], cols[2], 0.0],
        [cols[3], cols[4], cols[5], 0.0],
        [cols[6], cols[7], cols[8], 0.0],
    ]
}

fn uniform_layout<T>(device: &wgpu::Device, label: &str) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some(label),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: wgpu::BufferSize::new(std::mem::size_of::<T>() as u64),
            },
            count: None,
        }],
    })
}

struct PipelineSpec<'a> {
    label: &'a str,
    layout: &'a wgpu::PipelineLayout,
    shader: &'a wgpu::ShaderModule,
    vs_entry: &'a str,
    fs_entry: &'a str,
    topology: wgpu::PrimitiveTopology,
    format: wgpu::TextureFormat,
    sample_count: u32,
}

/// Both pipelines read `position, vec3` interleaved vertices.
fn create_pipeline(device: &wgpu::Device, spec: PipelineSpec<'_>) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(spec.label),
        layout: Some(spec.layout),
        vertex: wgpu::VertexState {
            module: spec.shader,
            entry_point: Some(spec.vs_entry),
            compilation_options: Default::default(),
            buffers: &[wgpu::VertexBufferLayout {
                array_stride: (VERTEX_STRIDE * std::mem::size_of::<f32>()) as u64,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &[
                    wgpu::VertexAttribute {
                        format: wgpu::VertexFormat::Float32x3,
                        offset: 0,
                        shader_location: 0,
                    },
                    wgpu::VertexAttribute {
                        format: wgpu::VertexFormat::Float32x3,
                        offset: (3 * std::mem::size_of::<f32>()) as u64,
                        shader_location: 1,
                    },
                ],
            }],
        },
        primitive: wgpu::PrimitiveState {
            topology: spec.topology,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            ..Default::default()
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DepthBuffer::FORMAT,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::LessEqual,
            stencil: Default::default(),
            bias: Default::default(),
        }),
        multisample: wgpu::MultisampleState {
            count: spec.sample_count,
            ..Default::default()
        },
        fragment: Some(wgpu::FragmentState {
            module: spec.shader,
            entry_point: Some(spec.fs_entry),
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format: spec.format,
                blend: Some(wgpu::BlendState::REPLACE),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),
        multiview: None,
        cache: None,
    })
}

struct DepthBuffer {
    _texture: wgpu::Texture,
    view: wgpu::TextureView,
}

impl DepthBuffer {
    const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth24Plus;

    fn create(device: &wgpu::Device, width: u32, height: u32, sample_count: u32) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("depth-texture"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count,
            dimension: wgpu::TextureDimension::D2,
            format: Self::FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self {
            _texture: texture,
            view,
        }
    }
}

/// Multisampled color target, absent when rendering single sampled.
struct MsaaBuffer {
    _texture: wgpu::Texture,
    view: wgpu::TextureView,
}

impl MsaaBuffer {
    const SAMPLES: u32 = 4;

    fn create(
        device: &wgpu::Device,
        config: &wgpu::SurfaceConfiguration,
        sample_count: u32,
    ) -> Option<Self> {
        if sample_count <= 1 {
            return None;
        }
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("msaa-color-texture"),
            size: wgpu::Extent3d {
                width: config.width.max(1),
                height: config.height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count,
            dimension: wgpu::TextureDimension::D2,
            format: config.format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Some(Self {
            _texture: texture,
            view,
        })
    }
}

/// 4x when the surface format can be multisampled and resolved, else 1.
fn msaa_sample_count(flags: wgpu::TextureFormatFeatureFlags) -> u32 {
    let required = wgpu::TextureFormatFeatureFlags::MULTISAMPLE_X4
        | wgpu::TextureFormatFeatureFlags::MULTISAMPLE_RESOLVE;
    if flags.contains(required) {
        MsaaBuffer::SAMPLES
    } else {
        1
    }
}

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
struct GlobalUniform {
    view_proj: [[f32; 4]; 4],
    camera_position: [f32; 4],
    light_direction: [f32; 4],
    light_radiance: [f32; 4],
}

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
struct ObjectConstants {
    model: [[f32; 4]; 4],
    normal: [[f32; 4]; 3],
    color: [f32; 4],
}

const SHADER: &str = r#"
const PI: f32 = 3.14159265;

struct GlobalUniform {
    view_proj: mat4x4<f32>,
    camera_position: vec4<f32>,
    light_direction: vec4<f32>,
    light_radiance: vec4<f32>,
}

struct ObjectConstants {
    model: mat4x4<f32>,
    normal: mat3x4<f32>,
    color: vec4<f32>,
}

@group(0) @binding(0)
var<uniform> globals: GlobalUniform;

@group(1) @binding(0)
var<uniform> object: ObjectConstants;

struct MeshInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
}

struct MeshOutput {
    @builtin(position) position: vec4<f32>,
    @location(0) normal: vec3<f32>,
}

@vertex
fn vs_mesh(input: MeshInput) -> MeshOutput {
    var out: MeshOutput;
    let world_position = object.model * vec4<f32>(input.position, 1.0);
    out.position = globals.view_proj * world_position;
    out.normal = mat3x3<f32>(
        object.normal[0].xyz,
        object.normal[1].xyz,
        object.normal[2].xyz
    ) * input.normal;
    return out;
}

@fragment
fn fs_mesh(input: MeshOutput) -> @location(0) vec4<f32> {
    let normal = normalize(input.normal);
    let diffuse = max(dot(normal, globals.light_direction.xyz), 0.0);
    let lit = object.color.rgb * globals.light_radiance.rgb * diffuse / PI;
    return vec4<f32>(lit, object.color.a);
}

struct LineInput {
    @location(0) position: vec3<f32>,
    @location(1) color: vec3<f32>,
}

struct LineOutput {
    @builtin(position) position: vec4<f32>,
    @location(0) color: vec3<f32>,
}

@vertex
fn vs_line(input: LineInput) -> LineOutput {
    var out: LineOutput;
    out.position = globals.view_proj * vec4<f32>(input.position, 1.0);
    out.color = input.color;
    return out;
}

@fragment
fn fs_line(input: LineOutput) -> @location(0) vec4<f32> {
    return vec4<f32>(input.color, 1.0);
}
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::GridHelper;
    use glam::Vec3;

    #[test]
    fn grid_lines_interleave_position_and_color() {
        let lines = GridHelper::default().lines();
        let vertices = line_vertices(&lines);
        assert_eq!(vertices.len(), lines.len() * 2 * VERTEX_STRIDE);
        assert_eq!(&vertices[..3], &lines[0].from.to_array());
        assert_eq!(&vertices[3..6], &lines[0].color.to_linear().to_array());
        assert_eq!(
            &vertices[VERTEX_STRIDE..VERTEX_STRIDE + 3],
            &lines[0].to.to_array()
        );
    }

    #[test]
    fn translation_keeps_normals() {
        let model = Mat4::from_translation(Vec3::new(-1.0, 4.0, 0.0));
        let normal = normal_matrix(model);
        assert!((normal * Vec3::Y - Vec3::Y).length() < 1e-6);
        let packed = mat3_to_3x4(normal);
        assert_eq!(packed[1], [0.0, 1.0, 0.0, 0.0]);
    }

    #[test]
    fn multisampling_needs_resolve_support() {
        use wgpu::TextureFormatFeatureFlags as Flags;
        assert_eq!(
            msaa_sample_count(Flags::MULTISAMPLE_X4 | Flags::MULTISAMPLE_RESOLVE | Flags::FILTERABLE),
            4
        );
        assert_eq!(msaa_sample_count(Flags::MULTISAMPLE_X4), 1);
        assert_eq!(msaa_sample_count(Flags::empty()), 1);
    }

    #[test]
    fn uniforms_match_wgsl_layout() {
        assert_eq!(std::mem::size_of::<GlobalUniform>(), 112);
        assert_eq!(std::mem::size_of::<ObjectConstants>(), 128);
    }
}

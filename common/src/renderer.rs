//! Scene rendering for the celestial viewers
//!
//! Bodies are drawn as instanced billboards, trails, orbit loops and the
//! spacetime grid as one line list, and the star backdrop as points pinned at
//! infinity.

use celestial::{Body, BodyKind, Camera, Projection};
use glam::DVec3;
use wgpu::util::DeviceExt;

use crate::graphics::{create_uniform_buffer, create_vertex_buffer, GraphicsContext, Vertex};

/// Billboard size relative to the horizon for black holes
const HORIZON_HALO_SCALE: f32 = 4.0;
const STAR_COLOR: [f32; 4] = [0.85, 0.85, 1.0, 0.8];

/// Camera matrices for the shader; `view` gives the billboard axes
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
    pub view: [[f32; 4]; 4],
}

impl CameraUniform {
    pub fn new(camera: &Camera, projection: &Projection) -> Self {
        let view = camera.view_matrix();
        Self {
            view_proj: (projection.matrix() * view).to_cols_array_2d(),
            view: view.to_cols_array_2d(),
        }
    }
}

/// How a body billboard is shaded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyStyle {
    Lit,
    Emissive,
    Horizon,
}

impl BodyStyle {
    fn for_kind(kind: BodyKind) -> Self {
        match kind {
            BodyKind::Star | BodyKind::Photon => BodyStyle::Emissive,
            BodyKind::BlackHole => BodyStyle::Horizon,
            BodyKind::Planet => BodyStyle::Lit,
        }
    }

    fn code(self) -> f32 {
        match self {
            BodyStyle::Lit => 0.0,
            BodyStyle::Emissive => 1.0,
            BodyStyle::Horizon => 2.0,
        }
    }
}

/// Per-body instance data
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct BodyInstance {
    pub position: [f32; 3],
    pub radius: f32,
    pub color: [f32; 4],
    pub style: f32,
    /// Self-rotation in radians, turns the surface banding
    pub spin: f32,
}

impl BodyInstance {
    const ATTRIBS: [wgpu::VertexAttribute; 5] = wgpu::vertex_attr_array![
        2 => Float32x3,
        3 => Float32,
        4 => Float32x4,
        5 => Float32,
        6 => Float32,
    ];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<BodyInstance>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRIBS,
        }
    }

    pub fn from_body(body: &Body) -> Self {
        let style = BodyStyle::for_kind(body.kind);
        let mut radius = body.radius as f32;
        if style == BodyStyle::Horizon {
            radius *= HORIZON_HALO_SCALE;
        }
        Self {
            position: body.position.as_vec3().to_array(),
            radius,
            color: body.color,
            style: style.code(),
            spin: body.spin_angle.to_radians() as f32,
        }
    }
}

/// Quad vertex for billboards
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
struct QuadVertex {
    position: [f32; 2],
}

impl QuadVertex {
    const ATTRIBS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x2];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<QuadVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBS,
        }
    }
}

const QUAD_VERTICES: &[QuadVertex] = &[
    QuadVertex { position: [-1.0, -1.0] },
    QuadVertex { position: [1.0, -1.0] },
    QuadVertex { position: [1.0, 1.0] },
    QuadVertex { position: [-1.0, -1.0] },
    QuadVertex { position: [1.0, 1.0] },
    QuadVertex { position: [-1.0, 1.0] },
];

/// Everything to draw in one frame, rebuilt by the viewer every frame
#[derive(Debug, Default, Clone)]
pub struct Scene {
    bodies: Vec<BodyInstance>,
    lines: Vec<Vertex>,
}

impl Scene {
    pub fn clear(&mut self) {
        self.bodies.clear();
        self.lines.clear();
    }

    pub fn bodies(&self) -> &[BodyInstance] {
        &self.bodies
    }

    /// Line-list vertices, two per segment
    pub fn lines(&self) -> &[Vertex] {
        &self.lines
    }

    pub fn push_body(&mut self, body: &Body) {
        self.bodies.push(BodyInstance::from_body(body));
    }

    /// Body trail with per-point opacity from its fade policy, scaled by
    /// `opacity`
    pub fn push_trail(&mut self, body: &Body, opacity: f32) {
        let [r, g, b, _] = body.color;
        let points: Vec<(DVec3, f32)> = body.trail().iter_faded().collect();
        for pair in points.windows(2) {
            for &(pos, alpha) in pair {
                self.lines
                    .push(Vertex::new(pos.as_vec3().to_array(), [r, g, b, alpha * opacity]));
            }
        }
    }

    pub fn push_polyline(&mut self, points: &[DVec3], color: [f32; 4]) {
        for pair in points.windows(2) {
            for pos in pair {
                self.lines.push(Vertex::new(pos.as_vec3().to_array(), color));
            }
        }
    }
}

/// GPU buffer that is recreated at the next power of two when a frame
/// outgrows it
struct DynamicBuffer {
    buffer: wgpu::Buffer,
    capacity: u64,
    len: u32,
    label: &'static str,
}

impl DynamicBuffer {
    fn new(device: &wgpu::Device, label: &'static str, capacity: u64) -> Self {
        Self {
            buffer: Self::allocate(device, label, capacity),
            capacity,
            len: 0,
            label,
        }
    }

    fn allocate(device: &wgpu::Device, label: &str, size: u64) -> wgpu::Buffer {
        device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    fn upload<T: bytemuck::Pod>(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        items: &[T],
    ) {
        let bytes: &[u8] = bytemuck::cast_slice(items);
        let size = bytes.len() as u64;
        if size > self.capacity {
            self.capacity = size.next_power_of_two();
            log::debug!("growing {} to {} bytes", self.label, self.capacity);
            self.buffer = Self::allocate(device, self.label, self.capacity);
        }
        if size > 0 {
            queue.write_buffer(&self.buffer, 0, bytes);
        }
        self.len = items.len() as u32;
    }
}

pub struct SceneRenderer {
    body_pipeline: wgpu::RenderPipeline,
    line_pipeline: wgpu::RenderPipeline,
    star_pipeline: wgpu::RenderPipeline,
    quad_buffer: wgpu::Buffer,
    instances: DynamicBuffer,
    lines: DynamicBuffer,
    stars: Option<(wgpu::Buffer, u32)>,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    depth_texture: wgpu::TextureView,
}

impl SceneRenderer {
    pub fn new(ctx: &GraphicsContext) -> Self {
        let device = &ctx.device;

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Scene Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/scene.wgsl").into()),
        });

        let camera_buffer = create_uniform_buffer(
            device,
            &CameraUniform {
                view_proj: glam::Mat4::IDENTITY.to_cols_array_2d(),
                view: glam::Mat4::IDENTITY.to_cols_array_2d(),
            },
        );

        let camera_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Camera Bind Group Layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            });

        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Camera Bind Group"),
            layout: &camera_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Scene Pipeline Layout"),
            bind_group_layouts: &[&camera_bind_group_layout],
            push_constant_ranges: &[],
        });

        let depth_texture = Self::create_depth_texture(device, ctx.size.width, ctx.size.height);

        let builder = PipelineBuilder {
            device,
            layout: &pipeline_layout,
            shader: &shader,
            format: ctx.config.format,
        };

        let body_pipeline = builder.build(
            "Body Pipeline",
            ("vs_body", "fs_body"),
            &[QuadVertex::layout(), BodyInstance::layout()],
            wgpu::PrimitiveTopology::TriangleList,
            true,
        );
        // Lines blend over each other; they test depth but never write it
        let line_pipeline = builder.build(
            "Line Pipeline",
            ("vs_line", "fs_line"),
            &[Vertex::LAYOUT],
            wgpu::PrimitiveTopology::LineList,
            false,
        );
        let star_pipeline = builder.build(
            "Star Pipeline",
            ("vs_star", "fs_line"),
            &[Vertex::LAYOUT],
            wgpu::PrimitiveTopology::PointList,
            false,
        );

        let quad_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Quad Buffer"),
            contents: bytemuck::cast_slice(QUAD_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let instances = DynamicBuffer::new(
            device,
            "Instance Buffer",
            (std::mem::size_of::<BodyInstance>() * 64) as u64,
        );
        let lines = DynamicBuffer::new(
            device,
            "Line Buffer",
            (std::mem::size_of::<Vertex>() * 16_384) as u64,
        );

        Self {
            body_pipeline,
            line_pipeline,
            star_pipeline,
            quad_buffer,
            instances,
            lines,
            stars: None,
            camera_buffer,
            camera_bind_group,
            depth_texture,
        }
    }

    fn create_depth_texture(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Depth Texture"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Depth32Float,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        texture.create_view(&wgpu::TextureViewDescriptor::default())
    }

    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.depth_texture = Self::create_depth_texture(device, width, height);
    }

    /// Upload the star backdrop once; only directions matter
    pub fn set_stars(&mut self, device: &wgpu::Device, stars: &[DVec3]) {
        if stars.is_empty() {
            self.stars = None;
            return;
        }
        let vertices: Vec<Vertex> = stars
            .iter()
            .map(|s| Vertex::new(s.as_vec3().to_array(), STAR_COLOR))
            .collect();
        let buffer = create_vertex_buffer(device, "Star Buffer", &vertices);
        self.stars = Some((buffer, vertices.len() as u32));
    }

    pub fn update_camera(&self, queue: &wgpu::Queue, camera: &Camera, projection: &Projection) {
        let uniform = CameraUniform::new(camera, projection);
        queue.write_buffer(&self.camera_buffer, 0, bytemuck::cast_slice(&[uniform]));
    }

    pub fn prepare(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, scene: &Scene) {
        self.instances.upload(device, queue, scene.bodies());
        self.lines.upload(device, queue, scene.lines());
    }

    pub fn render(&self, encoder: &mut wgpu::CommandEncoder, view: &wgpu::TextureView) {
        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Scene Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.depth_texture,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        });
        render_pass.set_bind_group(0, &self.camera_bind_group, &[]);

        if let Some((stars, count)) = &self.stars {
            render_pass.set_pipeline(&self.star_pipeline);
            render_pass.set_vertex_buffer(0, stars.slice(..));
            render_pass.draw(0..*count, 0..1);
        }

        // Opaque bodies first so trails behind them are hidden
        if self.instances.len > 0 {
            render_pass.set_pipeline(&self.body_pipeline);
            render_pass.set_vertex_buffer(0, self.quad_buffer.slice(..));
            render_pass.set_vertex_buffer(1, self.instances.buffer.slice(..));
            render_pass.draw(0..6, 0..self.instances.len);
        }

        if self.lines.len > 0 {
            render_pass.set_pipeline(&self.line_pipeline);
            render_pass.set_vertex_buffer(0, self.lines.buffer.slice(..));
            render_pass.draw(0..self.lines.len, 0..1);
        }
    }
}

struct PipelineBuilder<'a> {
    device: &'a wgpu::Device,
    layout: &'a wgpu::PipelineLayout,
    shader: &'a wgpu::ShaderModule,
    format: wgpu::TextureFormat,
}

impl PipelineBuilder<'_> {
    fn build(
        &self,
        label: &str,
        (vs, fs): (&str, &str),
        buffers: &[wgpu::VertexBufferLayout<'_>],
        topology: wgpu::PrimitiveTopology,
        depth_write: bool,
    ) -> wgpu::RenderPipeline {
        self.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(label),
            layout: Some(self.layout),
            vertex: wgpu::VertexState {
                module: self.shader,
                entry_point: vs,
                buffers,
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: self.shader,
                entry_point: fs,
                targets: &[Some(wgpu::ColorTargetState {
                    format: self.format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: wgpu::TextureFormat::Depth32Float,
                depth_write_enabled: depth_write,
                depth_compare: wgpu::CompareFunction::LessEqual,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use celestial::{FadePolicy, TrailConfig};

    #[test]
    fn trail_becomes_faded_segments() {
        let mut body = Body::keplerian("Streak", 10.0, 0.1, 0.0)
            .with_color([1.0, 0.0, 0.0, 1.0])
            .with_trail(TrailConfig {
                capacity: 4,
                fade: FadePolicy::FadeOut,
            });
        for _ in 0..4 {
            body.update(1.0);
        }

        let mut scene = Scene::default();
        scene.push_trail(&body, 0.5);

        // 4 points give 3 segments
        assert_eq!(scene.lines().len(), 6);
        assert_eq!(scene.lines()[0].color, [1.0, 0.0, 0.0, 0.0]);
        assert_eq!(scene.lines()[5].color[3], 0.75 * 0.5);
    }

    #[test]
    fn black_hole_billboard_includes_halo() {
        let hole = Body::newtonian("Hole", DVec3::ZERO, DVec3::ZERO, 450.0)
            .with_kind(BodyKind::BlackHole)
            .with_radius(30.0);
        let instance = BodyInstance::from_body(&hole);
        assert_eq!(instance.radius, 120.0);
        assert_eq!(instance.style, BodyStyle::Horizon.code());
    }

    #[test]
    fn instance_carries_spin_in_radians() {
        let mut sun = Body::newtonian("Sun", DVec3::ZERO, DVec3::ZERO, 1.0)
            .with_kind(BodyKind::Star)
            .with_spin_rate(10.0);
        sun.advance_spin(9.0);
        let instance = BodyInstance::from_body(&sun);
        assert!((instance.spin - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
        assert_eq!(instance.style, BodyStyle::Emissive.code());
    }

    #[test]
    fn short_polyline_draws_nothing() {
        let mut scene = Scene::default();
        scene.push_polyline(&[DVec3::ZERO], [1.0; 4]);
        assert!(scene.lines().is_empty());
        scene.push_polyline(&[DVec3::ZERO, DVec3::X, DVec3::Y], [1.0; 4]);
        assert_eq!(scene.lines().len(), 4);
    }
}

//! wgpu line renderer and the render bridge that feeds it.

use std::sync::Arc;

use bytemuck::{Pod, Zeroable};
use glam::Mat4;
use log::info;
use wgpu::util::DeviceExt;
use winit::window::Window;

use crate::bridge::RenderBridge;
use crate::error::{Error, Result};
use crate::params::{RenderConfig, SurfaceDomain};
use crate::surface::SurfaceGrid;

/// Line vertex (position + colour)
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
}

/// Uniform buffer for the line shader
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct Uniforms {
    pub view_proj: [[f32; 4]; 4],
}

/// Rendering system managing wgpu device, pipeline and buffers
pub struct RenderSystem {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    surface_vertices: Option<(wgpu::Buffer, usize)>,
    surface_indices: Option<(wgpu::Buffer, u32)>,
    overlay_vertices: Option<(wgpu::Buffer, usize)>,
}

impl RenderSystem {
    /// Create new rendering system
    pub async fn new(window: Arc<Window>) -> Result<Self> {
        let size = window.inner_size();

        // Create wgpu instance
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        // Create surface (window must have 'static lifetime via Arc)
        let surface = instance
            .create_surface(window)
            .map_err(|e| Error::Render(format!("Failed to create surface: {}", e)))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| Error::Render("Failed to find suitable GPU adapter".to_string()))?;

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Main Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: Default::default(),
                },
                None,
            )
            .await
            .map_err(|e| Error::Render(format!("Failed to request device: {}", e)))?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .or_else(|| surface_caps.formats.first().copied())
            .ok_or_else(|| Error::Render("Surface reports no texture formats".to_string()))?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Wireframe Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("wireframe.wgsl").into()),
        });

        let uniforms = Uniforms {
            view_proj: Mat4::IDENTITY.to_cols_array_2d(),
        };

        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Uniform Buffer"),
            contents: bytemuck::cast_slice(&[uniforms]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let uniform_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Uniform Bind Group Layout"),
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

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Uniform Bind Group"),
            layout: &uniform_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Wireframe Pipeline Layout"),
            bind_group_layouts: &[&uniform_bind_group_layout],
            push_constant_ranges: &[],
        });

        // Both the surface and the overlays are plain line lists
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Wireframe Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &[
                        wgpu::VertexAttribute {
                            offset: 0,
                            shader_location: 0,
                            format: wgpu::VertexFormat::Float32x3,
                        },
                        wgpu::VertexAttribute {
                            offset: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                            shader_location: 1,
                            format: wgpu::VertexFormat::Float32x3,
                        },
                    ],
                }],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::LineList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        info!("Renderer ready ({:?}, {}x{})", surface_format, config.width, config.height);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            pipeline,
            uniform_buffer,
            uniform_bind_group,
            surface_vertices: None,
            surface_indices: None,
            overlay_vertices: None,
        })
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
    }

    /// Replace the static index buffer for the surface wireframe
    pub fn set_wireframe(&mut self, indices: &[u32]) {
        if indices.is_empty() {
            self.surface_indices = None;
            return;
        }
        let buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Wireframe Index Buffer"),
                contents: bytemuck::cast_slice(indices),
                usage: wgpu::BufferUsages::INDEX,
            });
        self.surface_indices = Some((buffer, indices.len() as u32));
    }

    /// Upload surface vertices, reallocating only when the count changes
    pub fn update_surface(&mut self, vertices: &[Vertex]) {
        Self::upload(
            &self.device,
            &self.queue,
            &mut self.surface_vertices,
            vertices,
            "Surface Vertex Buffer",
        );
    }

    /// Upload outline and source-marker vertices
    pub fn update_overlay(&mut self, vertices: &[Vertex]) {
        Self::upload(
            &self.device,
            &self.queue,
            &mut self.overlay_vertices,
            vertices,
            "Overlay Vertex Buffer",
        );
    }

    fn upload(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        slot: &mut Option<(wgpu::Buffer, usize)>,
        vertices: &[Vertex],
        label: &str,
    ) {
        if let Some((buffer, len)) = slot.as_ref() {
            if *len == vertices.len() {
                queue.write_buffer(buffer, 0, bytemuck::cast_slice(vertices));
                return;
            }
        }

        if vertices.is_empty() {
            *slot = None;
            return;
        }

        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(vertices),
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        });
        *slot = Some((buffer, vertices.len()));
    }

    pub fn update_uniforms(&self, uniforms: &Uniforms) {
        self.queue
            .write_buffer(&self.uniform_buffer, 0, bytemuck::cast_slice(&[*uniforms]));
    }

    /// Render a frame
    pub fn render(&self) -> std::result::Result<(), wgpu::SurfaceError> {
        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            render_pass.set_pipeline(&self.pipeline);
            render_pass.set_bind_group(0, &self.uniform_bind_group, &[]);

            if let (Some((vertices, _)), Some((indices, count))) =
                (&self.surface_vertices, &self.surface_indices)
            {
                render_pass.set_vertex_buffer(0, vertices.slice(..));
                render_pass.set_index_buffer(indices.slice(..), wgpu::IndexFormat::Uint32);
                render_pass.draw_indexed(0..*count, 0, 0..1);
            }

            if let Some((overlay, len)) = &self.overlay_vertices {
                render_pass.set_vertex_buffer(0, overlay.slice(..));
                render_pass.draw(0..*len as u32, 0..1);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

/// Render bridge backed by the wgpu renderer
///
/// Keeps the latest submission on the CPU side so a renderer attached (or
/// re-attached) later starts from current data.
pub struct ViewerBridge {
    config: RenderConfig,
    render: Option<RenderSystem>,
    indices: Vec<u32>,
    surface: Vec<Vertex>,
    overlay: Vec<Vertex>,
    outline: Vec<Vertex>,
}

impl ViewerBridge {
    pub fn new(config: RenderConfig, domain: &SurfaceDomain) -> Self {
        let outline = domain_outline(domain, config.outline_color);
        Self {
            config,
            render: None,
            indices: Vec::new(),
            surface: Vec::new(),
            overlay: outline.clone(),
            outline,
        }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn attach(&mut self, mut render: RenderSystem) {
        render.set_wireframe(&self.indices);
        render.update_surface(&self.surface);
        render.update_overlay(&self.overlay);
        self.render = Some(render);
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.config.window_width = width.max(1);
        self.config.window_height = height.max(1);
        if let Some(render) = &mut self.render {
            render.resize(width, height);
        }
    }

    /// Draw the most recent submission with the given camera
    pub fn draw(&self, view_proj: Mat4) -> std::result::Result<(), wgpu::SurfaceError> {
        let Some(render) = &self.render else {
            return Ok(());
        };
        render.update_uniforms(&Uniforms {
            view_proj: view_proj.to_cols_array_2d(),
        });
        render.render()
    }

    /// Reconfigure after the surface was lost or outdated
    pub fn reconfigure(&mut self) {
        let (width, height) = (self.config.window_width, self.config.window_height);
        if let Some(render) = &mut self.render {
            render.resize(width, height);
        }
    }
}

impl RenderBridge for ViewerBridge {
    fn submit_wireframe_edges(&mut self, indices: &[u32]) -> Result<()> {
        self.indices = indices.to_vec();
        if let Some(render) = &mut self.render {
            render.set_wireframe(indices);
        }
        Ok(())
    }

    fn submit_surface(&mut self, grid: &SurfaceGrid) -> Result<()> {
        let (lo, hi) = grid.height_range();
        let peak = lo.abs().max(hi.abs()).max(f64::EPSILON);
        let base = self.config.surface_color;

        self.surface.clear();
        self.surface.extend(grid.points().iter().map(|p| {
            // Crests bright, troughs dim
            let shade = (0.6 + 0.4 * p.z / peak) as f32;
            Vertex {
                position: [p.x as f32, p.y as f32, p.z as f32],
                color: base.map(|c| c * shade),
            }
        }));

        if let Some(render) = &mut self.render {
            render.update_surface(&self.surface);
        }
        Ok(())
    }

    fn submit_sources(&mut self, markers: &[[f64; 3]; 2]) -> Result<()> {
        self.overlay.clear();
        self.overlay.extend_from_slice(&self.outline);
        for marker in markers {
            let centre = marker.map(|v| v as f32);
            self.overlay.extend(cross(
                centre,
                self.config.source_marker_size,
                self.config.source_color,
            ));
        }

        if let Some(render) = &mut self.render {
            render.update_overlay(&self.overlay);
        }
        Ok(())
    }
}

/// Rectangle around the domain at z = 0, as line-list vertices
fn domain_outline(domain: &SurfaceDomain, color: [f32; 3]) -> Vec<Vertex> {
    let (x0, x1) = (domain.x_min as f32, domain.x_max as f32);
    let (y0, y1) = (domain.y_min as f32, domain.y_max as f32);
    let corners = [[x0, y0], [x1, y0], [x1, y1], [x0, y1]];

    (0..4)
        .flat_map(|i| [corners[i], corners[(i + 1) % 4]])
        .map(|[x, y]| Vertex {
            position: [x, y, 0.0],
            color,
        })
        .collect()
}

/// Three axis-aligned segments through `centre`
fn cross(centre: [f32; 3], half: f32, color: [f32; 3]) -> impl Iterator<Item = Vertex> {
    (0..3).flat_map(move |axis| {
        let mut a = centre;
        let mut b = centre;
        a[axis] -= half;
        b[axis] += half;
        [Vertex { position: a, color }, Vertex { position: b, color }]
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::WaveField;
    use crate::params::WaveParameters;
    use crate::surface::{SourceGeometry, SurfaceGrid};

    #[test]
    fn test_outline_is_four_segments() {
        let outline = domain_outline(&SurfaceDomain::default(), [0.0, 0.0, 1.0]);
        assert_eq!(outline.len(), 8);
        assert_eq!(outline[0].position, [-200.0, -200.0, 0.0]);
        assert_eq!(outline[7].position, [-200.0, -200.0, 0.0]);
    }

    #[test]
    fn test_bridge_buffers_without_renderer() {
        let domain = SurfaceDomain::default();
        let mut grid = SurfaceGrid::create(domain).unwrap();
        let params = WaveParameters::default();
        grid.initialize(&SourceGeometry::new(10.0, -200.0).sources());
        grid.update_heights(&WaveField::new(&params), 0.05);

        let mut bridge = ViewerBridge::new(RenderConfig::default(), &domain);
        bridge
            .submit_wireframe_edges(&grid.wireframe_indices())
            .unwrap();
        bridge.submit_surface(&grid).unwrap();
        bridge
            .submit_sources(&[[-5.0, -200.0, 1.0], [5.0, -200.0, -1.0]])
            .unwrap();

        assert_eq!(bridge.indices.len(), grid.edge_count() * 2);
        assert_eq!(bridge.surface.len(), grid.points().len());
        assert_eq!(bridge.overlay.len(), 8 + 2 * 6);
        assert_eq!(bridge.surface[0].position[2], grid.points()[0].z as f32);
        assert!(bridge.draw(Mat4::IDENTITY).is_ok());
    }
}

// src/rendering_lib/renderer.rs

use bytemuck::{Pod, Zeroable};
use glam::Mat4;
use log::{debug, warn};
use wgpu::util::DeviceExt;

use koch_snowflake::geometry::Polygon;

use super::vertex::Vertex;

// Enough for the reference seed's first few stages without reallocating.
const INITIAL_VERTEX_CAPACITY: usize = 4096;

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct ViewUniform {
    view_proj: [[f32; 4]; 4],
    color: [f32; 4],
}

/// Closed outline as a line strip: every vertex, then the first one again.
pub fn line_loop_vertices(polygon: &Polygon) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity(polygon.len() + 1);
    vertices.extend(polygon.vertices().iter().map(Vertex::from_point));
    vertices.push(Vertex::from_point(&polygon.vertices()[0]));
    vertices
}

pub struct Renderer {
    render_pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
    vertex_capacity: usize,
    vertex_count: u32,

    view_uniform_buffer: wgpu::Buffer,
    view_bind_group: wgpu::BindGroup,
}

impl Renderer {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        shader_source: &str,
    ) -> Self {
        let shader_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Snowflake Shader Module"),
            source: wgpu::ShaderSource::Wgsl(shader_source.into()),
        });

        let view_uniform_data = ViewUniform {
            view_proj: Mat4::IDENTITY.to_cols_array_2d(),
            color: [0.0, 0.0, 0.0, 1.0],
        };
        let view_uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("View Uniform Buffer"),
            contents: bytemuck::bytes_of(&view_uniform_data),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let view_bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
            label: Some("view_bind_group_layout"),
        });

        let view_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &view_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: view_uniform_buffer.as_entire_binding(),
            }],
            label: Some("view_bind_group"),
        });

        let render_pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Snowflake Pipeline Layout"),
                bind_group_layouts: &[&view_bind_group_layout],
                push_constant_ranges: &[],
            });

        let render_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Snowflake Pipeline"),
            layout: Some(&render_pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader_module,
                entry_point: "vs_main",
                buffers: &[Vertex::desc()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader_module,
                entry_point: "fs_main",
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::LineStrip,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview: None,
        });

        let vertex_buffer = Self::create_vertex_buffer(device, INITIAL_VERTEX_CAPACITY);

        Self {
            render_pipeline,
            vertex_buffer,
            vertex_capacity: INITIAL_VERTEX_CAPACITY,
            vertex_count: 0,
            view_uniform_buffer,
            view_bind_group,
        }
    }

    fn create_vertex_buffer(device: &wgpu::Device, capacity: usize) -> wgpu::Buffer {
        device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Snowflake Vertex Buffer"),
            size: (capacity * std::mem::size_of::<Vertex>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    /// Replaces the outline drawn by `render`. Grows the vertex buffer when
    /// needed; a polygon too large for the device keeps the previous outline.
    pub fn upload_polygon(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, polygon: &Polygon) {
        let vertices = line_loop_vertices(polygon);

        if vertices.len() > self.vertex_capacity {
            let capacity = vertices.len().next_power_of_two();
            let bytes = (capacity * std::mem::size_of::<Vertex>()) as u64;
            let max_bytes = device.limits().max_buffer_size;
            if bytes > max_bytes {
                warn!(
                    "Outline of {} vertices needs {} bytes, device limit is {}; keeping previous outline",
                    vertices.len(),
                    bytes,
                    max_bytes
                );
                return;
            }
            debug!("Growing vertex buffer to {} vertices", capacity);
            self.vertex_buffer = Self::create_vertex_buffer(device, capacity);
            self.vertex_capacity = capacity;
        }

        queue.write_buffer(&self.vertex_buffer, 0, bytemuck::cast_slice(&vertices));
        self.vertex_count = vertices.len() as u32;
    }

    pub fn render(
        &self,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        output_view: &wgpu::TextureView,
        view_proj: Mat4,
        line_color: [f32; 4],
        clear_color: wgpu::Color,
    ) {
        let view_uniform_data = ViewUniform {
            view_proj: view_proj.to_cols_array_2d(),
            color: line_color,
        };
        queue.write_buffer(&self.view_uniform_buffer, 0, bytemuck::bytes_of(&view_uniform_data));

        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Snowflake Render Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: output_view,
                resolve_target: None,
                ops: wgpu::Operations { load: wgpu::LoadOp::Clear(clear_color), store: wgpu::StoreOp::Store },
            })],
            depth_stencil_attachment: None, occlusion_query_set: None, timestamp_writes: None,
        });

        if self.vertex_count > 0 {
            let used_bytes = self.vertex_count as u64 * std::mem::size_of::<Vertex>() as u64;
            render_pass.set_pipeline(&self.render_pipeline);
            render_pass.set_bind_group(0, &self.view_bind_group, &[]);
            render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..used_bytes));
            render_pass.draw(0..self.vertex_count, 0..1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_loop_closes_on_first_vertex() {
        let seed = Polygon::reference_seed();
        let vertices = line_loop_vertices(&seed);
        assert_eq!(vertices.len(), 4);
        assert_eq!(vertices[0], vertices[3]);
        assert_eq!(vertices[0].position, [-0.5, 0.0]);
    }

    #[test]
    fn view_uniform_is_tightly_packed() {
        assert_eq!(std::mem::size_of::<ViewUniform>(), 80);
        assert_eq!(std::mem::size_of::<Vertex>(), 8);
    }
}

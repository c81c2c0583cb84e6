//! GPU renderer for the igloo scene.
//!
//! Draws the ice sphere, then the particle cloud, into a transparent target
//! so page content behind the canvas stays visible.

use bytemuck::{Pod, Zeroable};
use std::iter;
use wgpu::util::DeviceExt;

use crate::gpu::mesh;
use crate::gpu::pipeline::{self, DEPTH_FORMAT};
use crate::scene_state::SceneState;

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct IceUniforms {
    view_proj: [[f32; 4]; 4],
    model: [[f32; 4]; 4],
    color: [f32; 4],
    camera_pos: [f32; 4],
    surface: [f32; 4],
    extra: [f32; 4],
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct PointsUniforms {
    view: [[f32; 4]; 4],
    proj: [[f32; 4]; 4],
    model: [[f32; 4]; 4],
    color: [f32; 4],
    params: [f32; 4],
}

impl IceUniforms {
    fn from_state(state: &SceneState) -> Self {
        let graph = state.graph();
        let camera = &graph.camera;
        let igloo = &graph.igloo;
        let m = &igloo.material;

        Self {
            view_proj: camera.view_projection_matrix().to_cols_array_2d(),
            model: igloo.transform.matrix().to_cols_array_2d(),
            color: [m.color[0], m.color[1], m.color[2], m.alpha()],
            camera_pos: [camera.position.x, camera.position.y, camera.position.z, 1.0],
            surface: [m.roughness, m.metalness, m.clearcoat, m.clearcoat_roughness],
            extra: [m.reflectivity, m.thickness, 0.0, 0.0],
        }
    }
}

impl PointsUniforms {
    fn from_state(state: &SceneState) -> Self {
        let graph = state.graph();
        let camera = &graph.camera;
        let particles = &graph.particles;
        let m = &particles.material;

        Self {
            view: camera.view_matrix().to_cols_array_2d(),
            proj: camera.projection_matrix().to_cols_array_2d(),
            model: particles.transform.matrix().to_cols_array_2d(),
            color: [m.color[0], m.color[1], m.color[2], m.opacity],
            params: [m.size, 0.0, 0.0, 0.0],
        }
    }
}

fn uniform_layout(device: &wgpu::Device, label: &str, size: usize) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: wgpu::BufferSize::new(size as u64),
            },
            count: None,
        }],
        label: Some(label),
    })
}

fn create_depth_view(device: &wgpu::Device, size: wgpu::Extent3d) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Depth Texture"),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}

pub struct Renderer {
    device: wgpu::Device,
    queue: wgpu::Queue,
    size: wgpu::Extent3d,
    depth_view: wgpu::TextureView,

    ice_pipeline: wgpu::RenderPipeline,
    ice_uniform_buffer: wgpu::Buffer,
    ice_bind_group: wgpu::BindGroup,
    sphere_vertex_buffer: wgpu::Buffer,
    sphere_index_buffer: wgpu::Buffer,
    sphere_index_count: u32,

    points_pipeline: wgpu::RenderPipeline,
    points_uniform_buffer: wgpu::Buffer,
    points_bind_group: wgpu::BindGroup,
    point_instance_buffer: wgpu::Buffer,
    point_count: u32,
}

impl Renderer {
    /// Build pipelines and upload the static geometry of `state`'s scene.
    ///
    /// The sphere mesh and particle positions never change after start-up,
    /// so they are uploaded once here.
    pub fn new(
        device: wgpu::Device,
        queue: wgpu::Queue,
        format: wgpu::TextureFormat,
        width: u32,
        height: u32,
        state: &SceneState,
    ) -> Self {
        let size = wgpu::Extent3d {
            width: width.max(1),
            height: height.max(1),
            depth_or_array_layers: 1,
        };
        let depth_view = create_depth_view(&device, size);

        // === Ice ===

        let ice_uniforms = IceUniforms::from_state(state);
        let ice_uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Ice Uniform Buffer"),
            contents: bytemuck::cast_slice(&[ice_uniforms]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let ice_layout = uniform_layout(&device, "ice_bind_group_layout", std::mem::size_of::<IceUniforms>());
        let ice_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &ice_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: ice_uniform_buffer.as_entire_binding(),
            }],
            label: Some("ice_bind_group"),
        });
        let ice_pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Ice Pipeline Layout"),
            bind_group_layouts: &[&ice_layout],
            push_constant_ranges: &[],
        });
        let ice_pipeline = pipeline::create_ice_pipeline(&device, &ice_pipeline_layout, format);

        let igloo = &state.graph().igloo;
        let (sphere_vertices, sphere_indices) = mesh::create_sphere_geometry(igloo.radius, igloo.segments);
        let sphere_vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Sphere Vertex Buffer"),
            contents: bytemuck::cast_slice(&sphere_vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let sphere_index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Sphere Index Buffer"),
            contents: bytemuck::cast_slice(&sphere_indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        // === Particles ===

        let points_uniforms = PointsUniforms::from_state(state);
        let points_uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Points Uniform Buffer"),
            contents: bytemuck::cast_slice(&[points_uniforms]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let points_layout =
            uniform_layout(&device, "points_bind_group_layout", std::mem::size_of::<PointsUniforms>());
        let points_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &points_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: points_uniform_buffer.as_entire_binding(),
            }],
            label: Some("points_bind_group"),
        });
        let points_pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Points Pipeline Layout"),
            bind_group_layouts: &[&points_layout],
            push_constant_ranges: &[],
        });
        let points_pipeline = pipeline::create_points_pipeline(&device, &points_pipeline_layout, format);

        let instances = mesh::point_instances(&state.graph().particles.positions);
        // A zero-sized vertex buffer is invalid; keep one dummy instance around.
        let instance_bytes: Vec<mesh::PointInstance> = if instances.is_empty() {
            vec![mesh::PointInstance { position: [0.0; 3] }]
        } else {
            instances.clone()
        };
        let point_instance_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Point Instance Buffer"),
            contents: bytemuck::cast_slice(&instance_bytes),
            usage: wgpu::BufferUsages::VERTEX,
        });

        log::info!(
            "Renderer ready: {}x{}, sphere {} indices, {} particles",
            size.width,
            size.height,
            sphere_indices.len(),
            instances.len()
        );

        Self {
            device,
            queue,
            size,
            depth_view,
            ice_pipeline,
            ice_uniform_buffer,
            ice_bind_group,
            sphere_vertex_buffer,
            sphere_index_buffer,
            sphere_index_count: sphere_indices.len() as u32,
            points_pipeline,
            points_uniform_buffer,
            points_bind_group,
            point_instance_buffer,
            point_count: instances.len() as u32,
        }
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    pub fn size(&self) -> wgpu::Extent3d {
        self.size
    }

    /// Recreate size-dependent resources. The camera aspect is owned by the
    /// scene state and picked up on the next `render`.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.size = wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            };
            self.depth_view = create_depth_view(&self.device, self.size);
        }
    }

    pub fn render(&mut self, view: &wgpu::TextureView, state: &SceneState) {
        self.queue.write_buffer(
            &self.ice_uniform_buffer,
            0,
            bytemuck::cast_slice(&[IceUniforms::from_state(state)]),
        );
        self.queue.write_buffer(
            &self.points_uniform_buffer,
            0,
            bytemuck::cast_slice(&[PointsUniforms::from_state(state)]),
        );

        let mut encoder = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Scene Encoder"),
        });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            render_pass.set_pipeline(&self.ice_pipeline);
            render_pass.set_bind_group(0, &self.ice_bind_group, &[]);
            render_pass.set_vertex_buffer(0, self.sphere_vertex_buffer.slice(..));
            render_pass.set_index_buffer(self.sphere_index_buffer.slice(..), wgpu::IndexFormat::Uint16);
            render_pass.draw_indexed(0..self.sphere_index_count, 0, 0..1);

            // Fully faded particles are skipped entirely.
            if self.point_count > 0 && state.graph().particles.material.opacity > 0.0 {
                render_pass.set_pipeline(&self.points_pipeline);
                render_pass.set_bind_group(0, &self.points_bind_group, &[]);
                render_pass.set_vertex_buffer(0, self.point_instance_buffer.slice(..));
                render_pass.draw(0..6, 0..self.point_count);
            }
        }

        self.queue.submit(iter::once(encoder.finish()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SceneConfig;

    #[test]
    fn test_uniform_sizes_are_16_byte_aligned() {
        assert_eq!(std::mem::size_of::<IceUniforms>() % 16, 0);
        assert_eq!(std::mem::size_of::<IceUniforms>(), 192);
        assert_eq!(std::mem::size_of::<PointsUniforms>(), 224);
    }

    #[test]
    fn test_points_uniforms_track_opacity() {
        let mut state = SceneState::new(SceneConfig::default(), 800.0, 600.0);
        assert_eq!(PointsUniforms::from_state(&state).color[3], 0.0);

        state.on_scroll(2000.0, 600.0);
        state.settle();
        assert_eq!(PointsUniforms::from_state(&state).color[3], 1.0);
    }

    #[test]
    fn test_ice_uniforms_track_depth() {
        let mut state = SceneState::new(SceneConfig::default(), 800.0, 600.0);
        state.on_scroll(400.0, 600.0);
        state.settle();
        let uniforms = IceUniforms::from_state(&state);
        // Column 3 holds the translation.
        assert_eq!(uniforms.model[3][2], -5.0);
    }
}

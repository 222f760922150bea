use std::collections::BTreeMap;
use std::sync::Arc;

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use lego_common::NodeId;
use lego_render::{GridSettings, Renderer};
use lego_scene::{Geometry, Light, NodeKind, PerspectiveCamera, Scene};
use wgpu::util::DeviceExt;

use crate::shaders;

/// Non-ambient lights the shader evaluates per fragment.
pub const MAX_LIGHTS: usize = 8;
const MAX_INSTANCES: u32 = 10_000;
/// Lift the grid off the ground's top face to avoid z-fighting.
const GRID_LIFT: f32 = 0.002;
const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct GpuLight {
    position: [f32; 4],
    color: [f32; 4],
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct Uniforms {
    view_proj: [[f32; 4]; 4],
    ambient: [f32; 4],
    light_count: [u32; 4],
    lights: [GpuLight; MAX_LIGHTS],
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct Vertex {
    position: [f32; 3],
    normal: [f32; 3],
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct InstanceData {
    model_0: [f32; 4],
    model_1: [f32; 4],
    model_2: [f32; 4],
    model_3: [f32; 4],
    color: [f32; 4],
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
struct GridVertex {
    position: [f32; 3],
    color: [f32; 4],
}

/// Outcome of one [`WgpuRenderer`] frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderStatus {
    /// The scene was drawn into the current target.
    Drawn { meshes: usize },
    /// No target was set for this frame; nothing was drawn.
    NoTarget,
}

/// Buffers uploaded for one mesh node.
struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    vertex_count: usize,
}

impl GpuMesh {
    fn upload(device: &wgpu::Device, id: NodeId, geometry: &Geometry) -> Self {
        let vertices: Vec<Vertex> = geometry
            .positions
            .iter()
            .zip(&geometry.normals)
            .map(|(&position, &normal)| Vertex { position, normal })
            .collect();
        let label = format!("mesh_{}", id.short());
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label.as_str()),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label.as_str()),
            contents: bytemuck::cast_slice(&geometry.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        Self {
            vertex_buffer,
            index_buffer,
            index_count: geometry.indices.len() as u32,
            vertex_count: geometry.vertex_count(),
        }
    }

    fn matches(&self, geometry: &Geometry) -> bool {
        self.vertex_count == geometry.vertex_count()
            && self.index_count as usize == geometry.indices.len()
    }
}

/// Pack the camera and the scene's lights into the shader's uniform block.
fn build_uniforms(scene: &Scene, camera: &PerspectiveCamera) -> Uniforms {
    let mut uniforms = Uniforms {
        view_proj: camera.view_projection().to_cols_array_2d(),
        ambient: scene.ambient().to_rgba(1.0),
        light_count: [0; 4],
        lights: [GpuLight::zeroed(); MAX_LIGHTS],
    };

    let mut count = 0;
    for (transform, light) in scene.lights() {
        let packed = match *light {
            Light::Ambient { .. } => continue,
            Light::Directional { color, intensity } => {
                let dir = transform.position.try_normalize().unwrap_or(Vec3::Y);
                GpuLight {
                    position: dir.extend(0.0).to_array(),
                    color: color.scaled(intensity).to_rgba(0.0),
                }
            }
            Light::Point {
                color,
                intensity,
                distance,
            } => GpuLight {
                position: transform.position.extend(1.0).to_array(),
                color: color.scaled(intensity).to_rgba(distance.max(0.0)),
            },
        };
        if count == MAX_LIGHTS {
            tracing::trace!("light limit reached, ignoring the rest");
            break;
        }
        uniforms.lights[count] = packed;
        count += 1;
    }
    uniforms.light_count[0] = count as u32;
    uniforms
}

/// Grid line vertices on the XZ plane.
fn grid_mesh(grid: &GridSettings) -> Vec<GridVertex> {
    let n = grid.half_extent as i32;
    let extent = n as f32 * grid.spacing;
    let color = grid.color.to_rgba(1.0);
    let mut verts = Vec::with_capacity((2 * n as usize + 1) * 4);

    for i in -n..=n {
        let offset = i as f32 * grid.spacing;
        for position in [
            [-extent, GRID_LIFT, offset],
            [extent, GRID_LIFT, offset],
            [offset, GRID_LIFT, -extent],
            [offset, GRID_LIFT, extent],
        ] {
            verts.push(GridVertex { position, color });
        }
    }
    verts
}

/// wgpu scene renderer.
///
/// Holds shared handles to the device and queue so the host can keep
/// drawing its own passes (the egui overlay) with the same device. Call
/// [`WgpuRenderer::set_target`] with the frame's view before each render.
pub struct WgpuRenderer {
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    mesh_pipeline: wgpu::RenderPipeline,
    grid_pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    grid_vertex_buffer: Option<(wgpu::Buffer, u32)>,
    instance_buffer: wgpu::Buffer,
    meshes: BTreeMap<NodeId, GpuMesh>,
    depth_texture: wgpu::TextureView,
    surface_format: wgpu::TextureFormat,
    target: Option<wgpu::TextureView>,
}

impl WgpuRenderer {
    pub fn new(
        device: Arc<wgpu::Device>,
        queue: Arc<wgpu::Queue>,
        surface_format: wgpu::TextureFormat,
        (width, height): (u32, u32),
        grid: &GridSettings,
    ) -> Self {
        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("uniform_buffer"),
            size: std::mem::size_of::<Uniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("uniform_bind_group_layout"),
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
        });

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("uniform_bind_group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pipeline_layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let depth_state = || wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: Default::default(),
            bias: Default::default(),
        };
        let color_target = [Some(wgpu::ColorTargetState {
            format: surface_format,
            blend: Some(wgpu::BlendState::REPLACE),
            write_mask: wgpu::ColorWrites::ALL,
        })];

        let mesh_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("mesh_shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::MESH_SHADER.into()),
        });

        let mesh_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("mesh_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &mesh_shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[
                    wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<Vertex>() as u64,
                        step_mode: wgpu::VertexStepMode::Vertex,
                        attributes: &wgpu::vertex_attr_array![
                            0 => Float32x3,
                            1 => Float32x3,
                        ],
                    },
                    wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<InstanceData>() as u64,
                        step_mode: wgpu::VertexStepMode::Instance,
                        attributes: &wgpu::vertex_attr_array![
                            2 => Float32x4,
                            3 => Float32x4,
                            4 => Float32x4,
                            5 => Float32x4,
                            6 => Float32x4,
                        ],
                    },
                ],
            },
            fragment: Some(wgpu::FragmentState {
                module: &mesh_shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &color_target,
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: Some(wgpu::Face::Back),
                ..Default::default()
            },
            depth_stencil: Some(depth_state()),
            multisample: Default::default(),
            multiview: None,
            cache: None,
        });

        let grid_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("grid_shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::GRID_SHADER.into()),
        });

        let grid_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("grid_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &grid_shader,
                entry_point: Some("vs_grid"),
                compilation_options: Default::default(),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<GridVertex>() as u64,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &wgpu::vertex_attr_array![
                        0 => Float32x3,
                        1 => Float32x4,
                    ],
                }],
            },
            fragment: Some(wgpu::FragmentState {
                module: &grid_shader,
                entry_point: Some("fs_grid"),
                compilation_options: Default::default(),
                targets: &color_target,
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::LineList,
                ..Default::default()
            },
            depth_stencil: Some(depth_state()),
            multisample: Default::default(),
            multiview: None,
            cache: None,
        });

        let grid_vertex_buffer = grid.enabled.then(|| {
            let verts = grid_mesh(grid);
            let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("grid_vertex_buffer"),
                contents: bytemuck::cast_slice(&verts),
                usage: wgpu::BufferUsages::VERTEX,
            });
            (buffer, verts.len() as u32)
        });

        let instance_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("instance_buffer"),
            size: MAX_INSTANCES as u64 * std::mem::size_of::<InstanceData>() as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let depth_texture = Self::create_depth_texture(&device, width, height);

        Self {
            device,
            queue,
            mesh_pipeline,
            grid_pipeline,
            uniform_buffer,
            uniform_bind_group,
            grid_vertex_buffer,
            instance_buffer,
            meshes: BTreeMap::new(),
            depth_texture,
            surface_format,
            target: None,
        }
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.surface_format
    }

    /// View the next [`Renderer::render`] call draws into. Consumed by it.
    pub fn set_target(&mut self, view: wgpu::TextureView) {
        self.target = Some(view);
    }

    /// Upload new meshes, re-upload changed ones, drop removed ones.
    fn sync_meshes(&mut self, scene: &Scene) {
        self.meshes.retain(|id, _| scene.get(*id).is_some());
        for (id, node) in scene.nodes() {
            let NodeKind::Mesh(mesh) = &node.kind else {
                continue;
            };
            let stale = self
                .meshes
                .get(id)
                .is_none_or(|gpu| !gpu.matches(&mesh.geometry));
            if stale {
                tracing::debug!(id = %id.short(), name = %node.name, "uploading mesh");
                self.meshes
                    .insert(*id, GpuMesh::upload(&self.device, *id, &mesh.geometry));
            }
        }
    }

    fn create_depth_texture(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("depth_texture"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        texture.create_view(&Default::default())
    }
}

impl Renderer for WgpuRenderer {
    type Output = RenderStatus;

    fn render(&mut self, scene: &Scene, camera: &PerspectiveCamera) -> RenderStatus {
        let Some(view) = self.target.take() else {
            return RenderStatus::NoTarget;
        };

        self.sync_meshes(scene);
        self.queue.write_buffer(
            &self.uniform_buffer,
            0,
            bytemuck::bytes_of(&build_uniforms(scene, camera)),
        );

        let mut draws: Vec<&GpuMesh> = Vec::new();
        let mut instances: Vec<InstanceData> = Vec::new();
        for (id, node) in scene.nodes() {
            if !node.visible || instances.len() >= MAX_INSTANCES as usize {
                continue;
            }
            let (NodeKind::Mesh(mesh), Some(gpu)) = (&node.kind, self.meshes.get(id)) else {
                continue;
            };
            let cols = node.transform.matrix().to_cols_array_2d();
            instances.push(InstanceData {
                model_0: cols[0],
                model_1: cols[1],
                model_2: cols[2],
                model_3: cols[3],
                color: mesh.color.to_rgba(1.0),
            });
            draws.push(gpu);
        }

        if !instances.is_empty() {
            self.queue
                .write_buffer(&self.instance_buffer, 0, bytemuck::cast_slice(&instances));
        }

        let bg = scene.background;
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("scene_encoder"),
            });
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: bg.r as f64,
                            g: bg.g as f64,
                            b: bg.b as f64,
                            a: 1.0,
                        }),
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
                ..Default::default()
            });

            if let Some((buffer, count)) = &self.grid_vertex_buffer {
                pass.set_pipeline(&self.grid_pipeline);
                pass.set_bind_group(0, &self.uniform_bind_group, &[]);
                pass.set_vertex_buffer(0, buffer.slice(..));
                pass.draw(0..*count, 0..1);
            }

            pass.set_pipeline(&self.mesh_pipeline);
            pass.set_bind_group(0, &self.uniform_bind_group, &[]);
            pass.set_vertex_buffer(1, self.instance_buffer.slice(..));
            for (i, gpu) in draws.iter().enumerate() {
                let i = i as u32;
                pass.set_vertex_buffer(0, gpu.vertex_buffer.slice(..));
                pass.set_index_buffer(gpu.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                pass.draw_indexed(0..gpu.index_count, 0, i..i + 1);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        RenderStatus::Drawn {
            meshes: draws.len(),
        }
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.depth_texture = Self::create_depth_texture(&self.device, width, height);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lego_common::{Color, Transform};
    use lego_scene::Node;

    fn light(scene: &mut Scene, light: Light, position: Vec3) {
        scene.add(Node::light("light", light, Transform::from_position(position)));
    }

    #[test]
    fn uniform_block_layout() {
        // Must match the WGSL struct: mat4 + 2 vec4 + 8 lights of 2 vec4.
        assert_eq!(std::mem::size_of::<Uniforms>(), 64 + 32 + MAX_LIGHTS * 32);
    }

    #[test]
    fn ambient_lights_fold_into_ambient_term() {
        let mut scene = Scene::new();
        light(&mut scene, Light::ambient(Color::WHITE, 0.5), Vec3::ZERO);

        let u = build_uniforms(&scene, &PerspectiveCamera::default());
        assert_eq!(u.ambient, [0.5, 0.5, 0.5, 1.0]);
        assert_eq!(u.light_count[0], 0);
    }

    #[test]
    fn directional_light_points_back_at_its_position() {
        let mut scene = Scene::new();
        light(
            &mut scene,
            Light::directional(Color::WHITE, 2.0),
            Vec3::new(0.0, 10.0, 0.0),
        );

        let u = build_uniforms(&scene, &PerspectiveCamera::default());
        assert_eq!(u.light_count[0], 1);
        assert_eq!(u.lights[0].position, [0.0, 1.0, 0.0, 0.0]);
        assert_eq!(u.lights[0].color, [2.0, 2.0, 2.0, 0.0]);
    }

    #[test]
    fn point_light_carries_position_and_range() {
        let mut scene = Scene::new();
        light(
            &mut scene,
            Light::point(Color::rgb(1.0, 0.0, 0.0), 1.0, 12.0),
            Vec3::new(1.0, 2.0, 3.0),
        );

        let u = build_uniforms(&scene, &PerspectiveCamera::default());
        assert_eq!(u.lights[0].position, [1.0, 2.0, 3.0, 1.0]);
        assert_eq!(u.lights[0].color, [1.0, 0.0, 0.0, 12.0]);
    }

    #[test]
    fn extra_lights_are_dropped() {
        let mut scene = Scene::new();
        for i in 0..MAX_LIGHTS + 3 {
            light(
                &mut scene,
                Light::point(Color::WHITE, 1.0, 0.0),
                Vec3::splat(i as f32),
            );
        }
        let u = build_uniforms(&scene, &PerspectiveCamera::default());
        assert_eq!(u.light_count[0] as usize, MAX_LIGHTS);
    }

    #[test]
    fn grid_vertex_count() {
        let grid = GridSettings {
            half_extent: 5,
            ..GridSettings::default()
        };
        let verts = grid_mesh(&grid);
        assert_eq!(verts.len(), 11 * 4);
        assert!(verts.iter().all(|v| v.position[1] == GRID_LIFT));
    }
}

use std::sync::Arc;

use wgpu::util::DeviceExt;
use wgpu::{BindGroup, BindGroupLayout, Buffer, Device, RenderPipeline, Surface, SurfaceConfiguration, TextureView};
use winit::event::WindowEvent;
use winit::window::Window;

use super::gpu_context::GpuContext;
use super::render_pipeline::{FrameView, RenderSurface};
use super::timer::FpsCounter;
use super::window::SurfaceSize;
use crate::errors::SceneError;
use crate::overlay::Overlay;
use crate::scene::{geometry, ObjectId, ParticleCloud, Scene, SceneObject, Vertex};
use crate::types::{FrameUniform, ObjectUniform, PointsUniform};

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// GPU buffers of one scene object
struct GpuMesh {
    vertices: Buffer,
    indices: Buffer,
    index_count: u32,
    uniform: Buffer,
    bind_group: BindGroup,
}

/// GPU buffers of the particle cloud
struct GpuPoints {
    instances: Buffer,
    count: u32,
    uniform: Buffer,
    bind_group: BindGroup,
}

/// Draws a [`Scene`] to a window surface with wgpu
///
/// Meshes go first with depth testing, then the particle sprites blended on
/// top without depth writes, then the optional overlay.
pub struct SceneRenderer {
    gpu: GpuContext,
    surface: Surface<'static>,
    surface_config: SurfaceConfiguration,
    depth_view: TextureView,
    mesh_pipeline: RenderPipeline,
    points_pipeline: RenderPipeline,
    object_layout: BindGroupLayout,
    frame_buffer: Buffer,
    frame_bind_group: BindGroup,
    meshes: Vec<Option<GpuMesh>>,
    points: Option<GpuPoints>,
    overlay: Option<Overlay>,
    fps: FpsCounter,
}

impl SceneRenderer {
    /// Acquire the window surface and upload every object of `scene`
    pub async fn new(window: Arc<Window>, scene: &Scene, show_overlay: bool) -> Result<Self, SceneError> {
        let (gpu, surface, surface_config) = GpuContext::for_window(window.clone()).await?;
        let device = gpu.device();

        let frame_layout = Self::uniform_layout(device, "Frame Bind Group Layout");
        let object_layout = Self::uniform_layout(device, "Object Bind Group Layout");

        let frame_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Frame Uniform Buffer"),
            size: std::mem::size_of::<FrameUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let frame_bind_group = Self::bind_uniform(device, &frame_layout, &frame_buffer, "Frame Bind Group");

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Scene Pipeline Layout"),
            bind_group_layouts: &[&frame_layout, &object_layout],
            push_constant_ranges: &[],
        });

        let mesh_pipeline = Self::create_mesh_pipeline(device, &pipeline_layout, surface_config.format);
        let points_pipeline = Self::create_points_pipeline(device, &pipeline_layout, surface_config.format);
        let depth_view = Self::create_depth_view(device, &surface_config);

        let overlay = show_overlay.then(|| Overlay::new(window, device, surface_config.format));

        let mut renderer = Self {
            gpu,
            surface,
            surface_config,
            depth_view,
            mesh_pipeline,
            points_pipeline,
            object_layout,
            frame_buffer,
            frame_bind_group,
            meshes: Vec::new(),
            points: None,
            overlay,
            fps: FpsCounter::new(),
        };

        for (index, object) in scene.objects.iter().enumerate() {
            renderer.add_object(ObjectId(index), object);
        }
        renderer.points = scene
            .particles
            .as_ref()
            .filter(|cloud| !cloud.is_empty())
            .map(|cloud| renderer.upload_points(cloud));

        log::info!(
            "scene renderer ready: {} meshes, {} particles",
            renderer.meshes.iter().flatten().count(),
            renderer.points.as_ref().map_or(0, |p| p.count)
        );

        Ok(renderer)
    }

    /// Forward a window event to the overlay. Returns true when it was consumed.
    pub fn handle_window_event(&mut self, event: &WindowEvent) -> bool {
        match &mut self.overlay {
            Some(overlay) => overlay.handle_window_event(event),
            None => false,
        }
    }

    pub fn size(&self) -> SurfaceSize {
        SurfaceSize::new(self.surface_config.width, self.surface_config.height)
    }

    fn upload_points(&self, cloud: &ParticleCloud) -> GpuPoints {
        let device = self.gpu.device();
        let instances = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Particle Instance Buffer"),
            contents: bytemuck::cast_slice(&cloud.positions),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let uniform = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Particle Uniform Buffer"),
            contents: bytemuck::cast_slice(&[PointsUniform::new(cloud)]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let bind_group = Self::bind_uniform(device, &self.object_layout, &uniform, "Particle Bind Group");

        GpuPoints {
            instances,
            count: cloud.len() as u32,
            uniform,
            bind_group,
        }
    }

    fn uniform_layout(device: &Device, label: &str) -> BindGroupLayout {
        device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some(label),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        })
    }

    fn bind_uniform(device: &Device, layout: &BindGroupLayout, buffer: &Buffer, label: &str) -> BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
        })
    }

    fn create_depth_view(device: &Device, config: &SurfaceConfiguration) -> TextureView {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Depth Texture"),
            size: wgpu::Extent3d {
                width: config.width.max(1),
                height: config.height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        texture.create_view(&wgpu::TextureViewDescriptor::default())
    }

    fn create_mesh_pipeline(
        device: &Device,
        layout: &wgpu::PipelineLayout,
        format: wgpu::TextureFormat,
    ) -> RenderPipeline {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Scene Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../scene.wgsl").into()),
        });

        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Mesh Pipeline"),
            layout: Some(layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[Vertex::layout()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                front_face: wgpu::FrontFace::Ccw,
                // Loaded models are not guaranteed to wind consistently
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        })
    }

    fn create_points_pipeline(
        device: &Device,
        layout: &wgpu::PipelineLayout,
        format: wgpu::TextureFormat,
    ) -> RenderPipeline {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Points Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../points.wgsl").into()),
        });

        const INSTANCE_ATTRIBUTES: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x3];

        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Points Pipeline"),
            layout: Some(layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    step_mode: wgpu::VertexStepMode::Instance,
                    attributes: &INSTANCE_ATTRIBUTES,
                }],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: false,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        })
    }
}

impl RenderSurface for SceneRenderer {
    fn resize(&mut self, size: SurfaceSize) {
        if size.is_empty() {
            return;
        }

        self.surface_config.width = size.width;
        self.surface_config.height = size.height;
        self.surface.configure(self.gpu.device(), &self.surface_config);
        self.depth_view = Self::create_depth_view(self.gpu.device(), &self.surface_config);
    }

    fn add_object(&mut self, id: ObjectId, object: &SceneObject) {
        let mesh = geometry::build(&object.shape);
        if mesh.is_empty() {
            log::warn!("object {:?} has no triangles, not uploaded", object.name);
            return;
        }

        let device = self.gpu.device();
        let vertices = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Vertex Buffer"),
            contents: bytemuck::cast_slice(&mesh.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let indices = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Index Buffer"),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        let uniform = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Object Uniform Buffer"),
            contents: bytemuck::cast_slice(&[ObjectUniform::new(object, &object.base)]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let bind_group = Self::bind_uniform(device, &self.object_layout, &uniform, "Object Bind Group");

        if self.meshes.len() <= id.index() {
            self.meshes.resize_with(id.index() + 1, || None);
        }
        self.meshes[id.index()] = Some(GpuMesh {
            vertices,
            indices,
            index_count: mesh.indices.len() as u32,
            uniform,
            bind_group,
        });

        log::debug!(
            "uploaded {} {:?}: {} triangles",
            object.shape.kind(),
            object.name,
            mesh.triangle_count()
        );
    }

    fn draw(&mut self, view: &FrameView<'_>) -> Result<(), SceneError> {
        let scene = view.scene;
        let queue = self.gpu.queue();

        self.fps.tick(view.frame.delta);

        queue.write_buffer(
            &self.frame_buffer,
            0,
            bytemuck::cast_slice(&[FrameUniform::new(view.camera, scene, view.frame.time)]),
        );
        for ((object, transform), mesh) in scene.objects.iter().zip(&scene.transforms).zip(&self.meshes) {
            if let Some(mesh) = mesh {
                queue.write_buffer(&mesh.uniform, 0, bytemuck::cast_slice(&[ObjectUniform::new(object, transform)]));
            }
        }
        if let (Some(points), Some(cloud)) = (&self.points, &scene.particles) {
            queue.write_buffer(&points.uniform, 0, bytemuck::cast_slice(&[PointsUniform::new(cloud)]));
        }

        let output = self.surface.get_current_texture()?;
        let target = output.texture.create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .gpu
            .device()
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Scene Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &target,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(scene.clear_color().to_wgpu()),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Discard,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            render_pass.set_bind_group(0, &self.frame_bind_group, &[]);

            render_pass.set_pipeline(&self.mesh_pipeline);
            for mesh in self.meshes.iter().flatten() {
                render_pass.set_bind_group(1, &mesh.bind_group, &[]);
                render_pass.set_vertex_buffer(0, mesh.vertices.slice(..));
                render_pass.set_index_buffer(mesh.indices.slice(..), wgpu::IndexFormat::Uint32);
                render_pass.draw_indexed(0..mesh.index_count, 0, 0..1);
            }

            if let Some(points) = &self.points {
                render_pass.set_pipeline(&self.points_pipeline);
                render_pass.set_bind_group(1, &points.bind_group, &[]);
                render_pass.set_vertex_buffer(0, points.instances.slice(..));
                render_pass.draw(0..6, 0..points.count);
            }
        }

        if let Some(overlay) = &mut self.overlay {
            let size = [self.surface_config.width, self.surface_config.height];
            overlay.render(
                self.gpu.device(),
                self.gpu.queue(),
                &mut encoder,
                &target,
                size,
                view,
                self.fps.fps(),
            );
        }

        self.gpu.queue().submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

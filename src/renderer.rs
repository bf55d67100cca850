use std::sync::Arc;

use anyhow::Result;
use wgpu::util::DeviceExt;
use winit::window::Window;

use crate::core::gpu_context::GpuContext;
use crate::frame::FrameInfo;
use crate::hud::Hud;
use crate::scene::{Sampling, SceneObject};
use crate::texture::{GpuTexture, ImageData, TextureKind};
use crate::traits::{PixelSize, SceneRenderer};
use crate::types::{FrameUniform, ObjectUniform, RainInstance, Vertex};
use crate::world::World;

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;
const QUAD_VERTICES: u32 = 6;

const FRAME_WGSL: &str = include_str!("shaders/frame.wgsl");
const MESH_WGSL: &str = include_str!("shaders/mesh.wgsl");
const RAIN_WGSL: &str = include_str!("shaders/rain.wgsl");
const SKY_WGSL: &str = include_str!("shaders/sky.wgsl");

/// GPU resources of one scene object
struct GpuObject {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    double_sided: bool,
    lit: bool,
    has_normal_map: bool,
    uv_scale: [f32; 2],
}

/// wgpu rasterizer for the rain scene
pub struct Renderer {
    gpu: GpuContext,
    depth_view: wgpu::TextureView,
    frame_buffer: wgpu::Buffer,
    frame_bind_group: wgpu::BindGroup,
    sky_pipeline: wgpu::RenderPipeline,
    sky_bind_group: wgpu::BindGroup,
    mesh_pipeline: wgpu::RenderPipeline,
    double_sided_pipeline: wgpu::RenderPipeline,
    objects: Vec<GpuObject>,
    rain_pipeline: wgpu::RenderPipeline,
    rain_buffer: wgpu::Buffer,
    rain_capacity: usize,
    rain_staging: Vec<RainInstance>,
    hud: Option<Hud>,
}

impl Renderer {
    pub async fn new(window: Arc<Window>, world: &World, show_hud: bool) -> Result<Self> {
        let gpu = GpuContext::new(window.clone()).await?;
        let device = gpu.device();
        let queue = gpu.queue();
        let size = gpu.size();
        let format = gpu.format();

        let frame_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("frame_bind_group_layout"),
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

        let frame_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Frame Uniform"),
            contents: bytemuck::bytes_of(&frame_uniform(world)),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let frame_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("frame_bind_group"),
            layout: &frame_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: frame_buffer.as_entire_binding(),
            }],
        });

        // Sky
        let sky_texture = GpuTexture::load(device, queue, &world.scene.background, TextureKind::Color);
        let sky_layout = texture_layout(device, "sky_bind_group_layout", &[0]);
        let sky_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("sky_bind_group"),
            layout: &sky_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&sky_texture.view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&sky_texture.sampler),
                },
            ],
        });
        let sky_pipeline = Self::create_sky_pipeline(device, &sky_layout, format);

        // Meshes
        let object_layout = Self::create_object_layout(device);
        let mesh_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Mesh Shader"),
            source: wgpu::ShaderSource::Wgsl(format!("{FRAME_WGSL}\n{MESH_WGSL}").into()),
        });
        let mesh_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Mesh Pipeline Layout"),
            bind_group_layouts: &[&frame_layout, &object_layout],
            push_constant_ranges: &[],
        });
        let mesh_pipeline =
            Self::create_mesh_pipeline(device, &mesh_layout, &mesh_shader, format, Some(wgpu::Face::Back));
        let double_sided_pipeline =
            Self::create_mesh_pipeline(device, &mesh_layout, &mesh_shader, format, None);

        let objects = world
            .scene
            .objects()
            .into_iter()
            .map(|object| Self::upload_object(device, queue, &object_layout, object))
            .collect();

        // Rain
        let rain_pipeline = Self::create_rain_pipeline(device, &frame_layout, format);
        let rain_capacity = world.rain.len().max(1);
        let rain_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Rain Instances"),
            size: (rain_capacity * std::mem::size_of::<RainInstance>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let depth_view = create_depth_view(device, size);
        let hud = show_hud.then(|| Hud::new(window, device, format));

        log::info!(
            "Renderer initialized: {}x{}, {:?}, {} objects, {} rain drops",
            size.width,
            size.height,
            format,
            world.scene.objects().len(),
            world.rain.len()
        );

        Ok(Self {
            gpu,
            depth_view,
            frame_buffer,
            frame_bind_group,
            sky_pipeline,
            sky_bind_group,
            mesh_pipeline,
            double_sided_pipeline,
            objects,
            rain_pipeline,
            rain_buffer,
            rain_capacity,
            rain_staging: Vec::with_capacity(rain_capacity),
            hud,
        })
    }

    /// Forward a window event to the HUD, returns true if it was consumed
    pub fn handle_event(&mut self, event: &winit::event::WindowEvent) -> bool {
        self.hud
            .as_mut()
            .is_some_and(|hud| hud.handle_event(event))
    }

    fn create_object_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
        let texture_entry = |binding| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Texture {
                sample_type: wgpu::TextureSampleType::Float { filterable: true },
                view_dimension: wgpu::TextureViewDimension::D2,
                multisampled: false,
            },
            count: None,
        };
        let sampler_entry = |binding| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
            count: None,
        };

        device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("object_bind_group_layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                texture_entry(1),
                sampler_entry(2),
                texture_entry(3),
                sampler_entry(4),
            ],
        })
    }

    fn upload_object(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layout: &wgpu::BindGroupLayout,
        object: &SceneObject,
    ) -> GpuObject {
        let material = &object.material;
        let map = GpuTexture::load(device, queue, material.map(), TextureKind::Color);
        let normal = match material.normal_map() {
            Some(reference) => GpuTexture::load(device, queue, reference, TextureKind::Normal),
            None => GpuTexture::from_image(
                device,
                queue,
                &ImageData::flat_normal(),
                TextureKind::Normal,
                &Sampling::default(),
                "flat normal",
            ),
        };

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(object.name),
            contents: bytemuck::cast_slice::<Vertex, u8>(&object.mesh.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(object.name),
            contents: bytemuck::cast_slice(&object.mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        let lit = material.is_lit();
        let has_normal_map = material.normal_map().is_some();
        let uv_scale = material.map().sampling.repeat;
        let uniform = object_uniform(object, uv_scale, lit, has_normal_map);

        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(object.name),
            contents: bytemuck::bytes_of(&uniform),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(object.name),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&map.view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&map.sampler),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: wgpu::BindingResource::TextureView(&normal.view),
                },
                wgpu::BindGroupEntry {
                    binding: 4,
                    resource: wgpu::BindingResource::Sampler(&normal.sampler),
                },
            ],
        });

        log::debug!(
            "Uploaded {} ({} triangles, lit: {})",
            object.name,
            object.mesh.triangle_count(),
            lit
        );

        GpuObject {
            vertex_buffer,
            index_buffer,
            index_count: object.mesh.indices.len() as u32,
            uniform_buffer,
            bind_group,
            double_sided: material.double_sided(),
            lit,
            has_normal_map,
            uv_scale,
        }
    }

    fn create_sky_pipeline(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        format: wgpu::TextureFormat,
    ) -> wgpu::RenderPipeline {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Sky Shader"),
            source: wgpu::ShaderSource::Wgsl(SKY_WGSL.into()),
        });
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Sky Pipeline Layout"),
            bind_group_layouts: &[layout],
            push_constant_ranges: &[],
        });

        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Sky Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_sky"),
                buffers: &[],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_sky"),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: false,
                depth_compare: wgpu::CompareFunction::Always,
                stencil: Default::default(),
                bias: Default::default(),
            }),
            multisample: Default::default(),
            multiview: None,
            cache: None,
        })
    }

    fn create_mesh_pipeline(
        device: &wgpu::Device,
        layout: &wgpu::PipelineLayout,
        shader: &wgpu::ShaderModule,
        format: wgpu::TextureFormat,
        cull_mode: Option<wgpu::Face>,
    ) -> wgpu::RenderPipeline {
        let label = if cull_mode.is_some() {
            "Mesh Pipeline"
        } else {
            "Double Sided Mesh Pipeline"
        };

        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(label),
            layout: Some(layout),
            vertex: wgpu::VertexState {
                module: shader,
                entry_point: Some("vs_main"),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<Vertex>() as u64,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &wgpu::vertex_attr_array![
                        0 => Float32x3,
                        1 => Float32x3,
                        2 => Float32x2,
                        3 => Float32x4,
                    ],
                }],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: Default::default(),
                bias: Default::default(),
            }),
            multisample: Default::default(),
            multiview: None,
            cache: None,
        })
    }

    fn create_rain_pipeline(
        device: &wgpu::Device,
        frame_layout: &wgpu::BindGroupLayout,
        format: wgpu::TextureFormat,
    ) -> wgpu::RenderPipeline {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Rain Shader"),
            source: wgpu::ShaderSource::Wgsl(format!("{FRAME_WGSL}\n{RAIN_WGSL}").into()),
        });
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Rain Pipeline Layout"),
            bind_group_layouts: &[frame_layout],
            push_constant_ranges: &[],
        });

        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Rain Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_rain"),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<RainInstance>() as u64,
                    step_mode: wgpu::VertexStepMode::Instance,
                    attributes: &wgpu::vertex_attr_array![0 => Float32x3],
                }],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_rain"),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: false,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: Default::default(),
                bias: Default::default(),
            }),
            multisample: Default::default(),
            multiview: None,
            cache: None,
        })
    }

    fn write_uniforms(&mut self, world: &World) -> u32 {
        let queue = self.gpu.queue();
        queue.write_buffer(&self.frame_buffer, 0, bytemuck::bytes_of(&frame_uniform(world)));

        for (object, gpu_object) in world.scene.objects().into_iter().zip(&self.objects) {
            let uniform = object_uniform(
                object,
                gpu_object.uv_scale,
                gpu_object.lit,
                gpu_object.has_normal_map,
            );
            queue.write_buffer(&gpu_object.uniform_buffer, 0, bytemuck::bytes_of(&uniform));
        }

        self.rain_staging.clear();
        self.rain_staging.extend(
            world
                .rain
                .positions()
                .iter()
                .take(self.rain_capacity)
                .map(|p| RainInstance { center: p.to_array() }),
        );
        if !self.rain_staging.is_empty() {
            queue.write_buffer(&self.rain_buffer, 0, bytemuck::cast_slice(&self.rain_staging));
        }
        self.rain_staging.len() as u32
    }
}

impl SceneRenderer for Renderer {
    fn buffer_size(&self) -> PixelSize {
        self.gpu.size()
    }

    fn resize(&mut self, size: PixelSize) {
        if size.is_empty() {
            return;
        }
        self.gpu.resize(size);
        self.depth_view = create_depth_view(self.gpu.device(), size);
    }

    fn render(&mut self, world: &World, frame: &FrameInfo) -> Result<()> {
        let Some(output) = self.gpu.acquire()? else {
            return Ok(());
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let drop_count = self.write_uniforms(world);
        let visible: Vec<bool> = world.scene.objects().iter().map(|o| o.visible).collect();

        let mut encoder = self
            .gpu
            .device()
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Scene Encoder"),
            });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            pass.set_pipeline(&self.sky_pipeline);
            pass.set_bind_group(0, &self.sky_bind_group, &[]);
            pass.draw(0..3, 0..1);

            pass.set_bind_group(0, &self.frame_bind_group, &[]);
            for (gpu_object, _) in self.objects.iter().zip(&visible).filter(|(_, v)| **v) {
                let pipeline = if gpu_object.double_sided {
                    &self.double_sided_pipeline
                } else {
                    &self.mesh_pipeline
                };
                pass.set_pipeline(pipeline);
                pass.set_bind_group(1, &gpu_object.bind_group, &[]);
                pass.set_vertex_buffer(0, gpu_object.vertex_buffer.slice(..));
                pass.set_index_buffer(gpu_object.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                pass.draw_indexed(0..gpu_object.index_count, 0, 0..1);
            }

            if drop_count > 0 {
                pass.set_pipeline(&self.rain_pipeline);
                pass.set_bind_group(0, &self.frame_bind_group, &[]);
                pass.set_vertex_buffer(0, self.rain_buffer.slice(..));
                pass.draw(0..QUAD_VERTICES, 0..drop_count);
            }
        }

        let mut command_buffers = Vec::new();
        if let Some(hud) = self.hud.as_mut() {
            command_buffers = hud.draw(
                self.gpu.device(),
                self.gpu.queue(),
                &mut encoder,
                &view,
                self.gpu.size(),
                world,
                frame,
            );
        }

        command_buffers.push(encoder.finish());
        self.gpu.queue().submit(command_buffers);
        output.present();

        log::trace!("Frame {} drawn with {} drops", frame.number, drop_count);
        Ok(())
    }
}

/// Per-frame uniform from the camera, lights, fog and rain look
pub fn frame_uniform(world: &World) -> FrameUniform {
    let camera = &world.camera;
    let scene = &world.scene;
    let rain = &scene.rain_look;

    FrameUniform {
        view_proj: camera.view_projection().to_cols_array_2d(),
        camera_position: camera.position.to_array(),
        fog_near: scene.fog.near,
        camera_right: camera.right().to_array(),
        fog_far: scene.fog.far,
        camera_up: camera.up().to_array(),
        rain_size: rain.point_size,
        fog_color: [scene.fog.color[0], scene.fog.color[1], scene.fog.color[2], 1.0],
        rain_color: [rain.color[0], rain.color[1], rain.color[2], rain.opacity],
        light_direction: scene.directional.direction().to_array(),
        light_intensity: scene.directional.intensity,
        light_color: scene.directional.color,
        ambient_intensity: scene.ambient.intensity,
        ambient_color: scene.ambient.color,
        hemisphere_intensity: scene.hemisphere.intensity,
        hemisphere_sky: [scene.hemisphere.sky[0], scene.hemisphere.sky[1], scene.hemisphere.sky[2], 1.0],
        hemisphere_ground: [
            scene.hemisphere.ground[0],
            scene.hemisphere.ground[1],
            scene.hemisphere.ground[2],
            1.0,
        ],
    }
}

fn object_uniform(object: &SceneObject, uv_scale: [f32; 2], lit: bool, has_normal_map: bool) -> ObjectUniform {
    let flag = |on: bool| if on { 1.0 } else { 0.0 };
    ObjectUniform {
        model: object.transform.matrix().to_cols_array_2d(),
        uv_scale,
        lit: flag(lit),
        has_normal_map: flag(has_normal_map),
    }
}

/// Layout with a filterable 2D texture at each binding in `textures`
/// followed by its sampler at the next binding
fn texture_layout(device: &wgpu::Device, label: &str, textures: &[u32]) -> wgpu::BindGroupLayout {
    let entries: Vec<_> = textures
        .iter()
        .flat_map(|&binding| {
            [
                wgpu::BindGroupLayoutEntry {
                    binding,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: binding + 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ]
        })
        .collect();

    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some(label),
        entries: &entries,
    })
}

fn create_depth_view(device: &wgpu::Device, size: PixelSize) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Depth Texture"),
        size: wgpu::Extent3d {
            width: size.width.max(1),
            height: size.height.max(1),
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

use crate::shaders;
use bytemuck::{Pod, Zeroable};
use diorama_common::{MeshData, TextureData};
use diorama_kernel::scene::pole_light_color;
use diorama_kernel::{Diorama, MaterialKind, ParticleField, Scene};
use wgpu::util::DeviceExt;

const COLOR_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;
const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;
/// Scene passes render 4x MSAA and resolve into the offscreen color texture.
const SAMPLE_COUNT: u32 = 4;

fn scene_multisample() -> wgpu::MultisampleState {
    wgpu::MultisampleState {
        count: SAMPLE_COUNT,
        ..Default::default()
    }
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct CameraGpu {
    view: [[f32; 4]; 4],
    projection: [[f32; 4]; 4],
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
struct PortalGpu {
    color_start: [f32; 3],
    time: f32,
    color_end: [f32; 3],
    _pad: f32,
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
struct FirefliesGpu {
    time: f32,
    pixel_ratio: f32,
    size: f32,
    _pad: f32,
    resolution: [f32; 2],
    _pad2: [f32; 2],
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
struct MeshVertex {
    position: [f32; 3],
    uv: [f32; 2],
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
struct FireflyInstance {
    position: [f32; 3],
    scale: f32,
}

fn camera_gpu(diorama: &Diorama) -> CameraGpu {
    let camera = diorama.camera();
    CameraGpu {
        view: camera.view_matrix().to_cols_array_2d(),
        projection: camera.projection_matrix().to_cols_array_2d(),
    }
}

fn portal_gpu(diorama: &Diorama) -> PortalGpu {
    let portal = diorama.portal_uniforms();
    PortalGpu {
        color_start: portal.color_start.to_array(),
        time: portal.time,
        color_end: portal.color_end.to_array(),
        _pad: 0.0,
    }
}

fn fireflies_gpu(diorama: &Diorama) -> FirefliesGpu {
    let fireflies = diorama.fireflies_uniforms();
    let (width, height) = diorama.viewport().drawing_buffer_size();
    FirefliesGpu {
        time: fireflies.time,
        pixel_ratio: fireflies.pixel_ratio,
        size: fireflies.point_size,
        _pad: 0.0,
        resolution: [width as f32, height as f32],
        _pad2: [0.0; 2],
    }
}

fn mesh_vertices(mesh: &MeshData) -> Vec<MeshVertex> {
    mesh.positions
        .iter()
        .zip(&mesh.uvs)
        .map(|(&position, &uv)| MeshVertex { position, uv })
        .collect()
}

fn firefly_instances(field: &ParticleField) -> Vec<FireflyInstance> {
    field
        .iter()
        .map(|(position, scale)| FireflyInstance { position, scale })
        .collect()
}

fn clear_color(diorama: &Diorama) -> wgpu::Color {
    let [r, g, b] = diorama.clear_color().to_array();
    wgpu::Color {
        r: r as f64,
        g: g as f64,
        b: b as f64,
        a: 1.0,
    }
}

/// One uploaded scene node.
struct GpuMesh {
    name: String,
    material: MaterialKind,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
}

/// Offscreen target at drawing-buffer resolution: multisampled color and
/// depth, plus the single-sample color they resolve into.
struct RenderTarget {
    size: (u32, u32),
    msaa_color: wgpu::TextureView,
    color: wgpu::TextureView,
    depth: wgpu::TextureView,
    blit_bind_group: wgpu::BindGroup,
}

/// wgpu-based diorama renderer.
///
/// Draws into an offscreen target sized by the viewport's drawing buffer,
/// then blits it onto the caller's surface view. Scene meshes are uploaded
/// lazily whenever the scene revision changes.
pub struct WgpuRenderer {
    baked_pipeline: wgpu::RenderPipeline,
    pole_light_pipeline: wgpu::RenderPipeline,
    portal_pipeline: wgpu::RenderPipeline,
    fireflies_pipeline: wgpu::RenderPipeline,
    blit_pipeline: wgpu::RenderPipeline,
    texture_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    portal_buffer: wgpu::Buffer,
    portal_bind_group: wgpu::BindGroup,
    fireflies_buffer: wgpu::Buffer,
    fireflies_bind_group: wgpu::BindGroup,
    firefly_instances: wgpu::Buffer,
    firefly_count: u32,
    baked_bind_group: wgpu::BindGroup,
    meshes: Vec<GpuMesh>,
    scene_revision: Option<u64>,
    target: RenderTarget,
}

impl WgpuRenderer {
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        surface_format: wgpu::TextureFormat,
        diorama: &Diorama,
    ) -> Self {
        let uniform_entry = |visibility| wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        };

        let camera_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("camera_bind_group_layout"),
            entries: &[uniform_entry(wgpu::ShaderStages::VERTEX)],
        });
        let portal_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("portal_bind_group_layout"),
            entries: &[uniform_entry(wgpu::ShaderStages::FRAGMENT)],
        });
        let fireflies_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("fireflies_bind_group_layout"),
            entries: &[uniform_entry(wgpu::ShaderStages::VERTEX)],
        });
        let texture_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("texture_bind_group_layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let uniform_buffer = |label, contents: &[u8]| {
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents,
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            })
        };
        let camera_buffer = uniform_buffer("camera_buffer", bytemuck::bytes_of(&camera_gpu(diorama)));
        let portal_buffer = uniform_buffer("portal_buffer", bytemuck::bytes_of(&portal_gpu(diorama)));
        let fireflies_buffer =
            uniform_buffer("fireflies_buffer", bytemuck::bytes_of(&fireflies_gpu(diorama)));

        let uniform_bind_group = |label, layout, buffer: &wgpu::Buffer| {
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some(label),
                layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: buffer.as_entire_binding(),
                }],
            })
        };
        let camera_bind_group = uniform_bind_group("camera_bind_group", &camera_layout, &camera_buffer);
        let portal_bind_group = uniform_bind_group("portal_bind_group", &portal_layout, &portal_buffer);
        let fireflies_bind_group =
            uniform_bind_group("fireflies_bind_group", &fireflies_layout, &fireflies_buffer);

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("linear_sampler"),
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let layout = |label, layouts: &[&wgpu::BindGroupLayout]| {
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some(label),
                bind_group_layouts: layouts,
                push_constant_ranges: &[],
            })
        };
        let baked_layout = layout("baked_pipeline_layout", &[&camera_layout, &texture_layout]);
        let pole_light_layout = layout("pole_light_pipeline_layout", &[&camera_layout]);
        let portal_pipeline_layout = layout("portal_pipeline_layout", &[&camera_layout, &portal_layout]);
        let fireflies_pipeline_layout =
            layout("fireflies_pipeline_layout", &[&camera_layout, &fireflies_layout]);
        let blit_layout = layout("blit_pipeline_layout", &[&texture_layout]);

        let module = |label, source: String| {
            device.create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some(label),
                source: wgpu::ShaderSource::Wgsl(source.into()),
            })
        };
        let baked_shader = module("baked_shader", shaders::mesh_shader(shaders::BAKED_FRAGMENT));
        let pole_light_shader = module(
            "pole_light_shader",
            shaders::pole_light_shader(pole_light_color().to_array()),
        );
        let portal_shader = module("portal_shader", shaders::mesh_shader(shaders::PORTAL_FRAGMENT));
        let fireflies_shader = module("fireflies_shader", shaders::FIREFLIES_SHADER.to_string());
        let blit_shader = module("blit_shader", shaders::BLIT_SHADER.to_string());

        let baked_pipeline = mesh_pipeline(device, "baked_pipeline", &baked_layout, &baked_shader, "fs_baked");
        let pole_light_pipeline = mesh_pipeline(
            device,
            "pole_light_pipeline",
            &pole_light_layout,
            &pole_light_shader,
            "fs_pole_light",
        );
        let portal_pipeline = mesh_pipeline(
            device,
            "portal_pipeline",
            &portal_pipeline_layout,
            &portal_shader,
            "fs_portal",
        );

        let fireflies_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("fireflies_pipeline"),
            layout: Some(&fireflies_pipeline_layout),
            vertex: wgpu::VertexState {
                module: &fireflies_shader,
                entry_point: Some("vs_fireflies"),
                compilation_options: Default::default(),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<FireflyInstance>() as u64,
                    step_mode: wgpu::VertexStepMode::Instance,
                    attributes: &wgpu::vertex_attr_array![
                        0 => Float32x3,
                        1 => Float32,
                    ],
                }],
            },
            fragment: Some(wgpu::FragmentState {
                module: &fireflies_shader,
                entry_point: Some("fs_fireflies"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: COLOR_FORMAT,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                ..Default::default()
            },
            // Transparent: test against the scene but never occlude.
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: false,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: Default::default(),
                bias: Default::default(),
            }),
            multisample: scene_multisample(),
            multiview: None,
            cache: None,
        });

        let blit_entry = if surface_format.is_srgb() {
            "fs_blit_srgb"
        } else {
            "fs_blit"
        };
        let blit_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("blit_pipeline"),
            layout: Some(&blit_layout),
            vertex: wgpu::VertexState {
                module: &blit_shader,
                entry_point: Some("vs_blit"),
                compilation_options: Default::default(),
                buffers: &[],
            },
            fragment: Some(wgpu::FragmentState {
                module: &blit_shader,
                entry_point: Some(blit_entry),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: Default::default(),
            depth_stencil: None,
            multisample: Default::default(),
            multiview: None,
            cache: None,
        });

        let instances = firefly_instances(diorama.fireflies());
        let firefly_instances = if instances.is_empty() {
            device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("firefly_instances"),
                size: std::mem::size_of::<FireflyInstance>() as u64,
                usage: wgpu::BufferUsages::VERTEX,
                mapped_at_creation: false,
            })
        } else {
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("firefly_instances"),
                contents: bytemuck::cast_slice(&instances),
                usage: wgpu::BufferUsages::VERTEX,
            })
        };

        // White until the baked texture arrives.
        let baked_bind_group =
            Self::create_texture_bind_group(device, queue, &texture_layout, &sampler, &TextureData::white());
        let target = Self::create_target(
            device,
            &texture_layout,
            &sampler,
            diorama.viewport().drawing_buffer_size(),
        );

        tracing::debug!(
            fireflies = instances.len(),
            ?surface_format,
            width = target.size.0,
            height = target.size.1,
            "wgpu renderer ready"
        );

        Self {
            baked_pipeline,
            pole_light_pipeline,
            portal_pipeline,
            fireflies_pipeline,
            blit_pipeline,
            texture_layout,
            sampler,
            camera_buffer,
            camera_bind_group,
            portal_buffer,
            portal_bind_group,
            fireflies_buffer,
            fireflies_bind_group,
            firefly_instances,
            firefly_count: instances.len() as u32,
            baked_bind_group,
            meshes: Vec::new(),
            scene_revision: None,
            target,
        }
    }

    /// Recreate the offscreen target if `size` differs from the current one.
    pub fn resize(&mut self, device: &wgpu::Device, size: (u32, u32)) {
        let size = (size.0.max(1), size.1.max(1));
        if size == self.target.size {
            return;
        }
        self.target = Self::create_target(device, &self.texture_layout, &self.sampler, size);
        tracing::debug!(width = size.0, height = size.1, "render target resized");
    }

    /// Render one frame of `diorama` onto `view`.
    pub fn render(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        view: &wgpu::TextureView,
        diorama: &Diorama,
    ) {
        self.resize(device, diorama.viewport().drawing_buffer_size());
        self.sync_scene(device, queue, diorama.scene());

        queue.write_buffer(&self.camera_buffer, 0, bytemuck::bytes_of(&camera_gpu(diorama)));
        queue.write_buffer(&self.portal_buffer, 0, bytemuck::bytes_of(&portal_gpu(diorama)));
        queue.write_buffer(
            &self.fireflies_buffer,
            0,
            bytemuck::bytes_of(&fireflies_gpu(diorama)),
        );

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("render_encoder"),
        });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &self.target.msaa_color,
                    resolve_target: Some(&self.target.color),
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(clear_color(diorama)),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.target.depth,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                ..Default::default()
            });

            pass.set_bind_group(0, &self.camera_bind_group, &[]);
            for mesh in &self.meshes {
                match mesh.material {
                    MaterialKind::Baked => {
                        pass.set_pipeline(&self.baked_pipeline);
                        pass.set_bind_group(1, &self.baked_bind_group, &[]);
                    }
                    MaterialKind::PoleLight => {
                        pass.set_pipeline(&self.pole_light_pipeline);
                    }
                    MaterialKind::PortalLight => {
                        pass.set_pipeline(&self.portal_pipeline);
                        pass.set_bind_group(1, &self.portal_bind_group, &[]);
                    }
                }
                pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
                pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                pass.draw_indexed(0..mesh.index_count, 0, 0..1);
            }

            // Fireflies last so they blend over the opaque scene.
            if self.firefly_count > 0 {
                pass.set_pipeline(&self.fireflies_pipeline);
                pass.set_bind_group(1, &self.fireflies_bind_group, &[]);
                pass.set_vertex_buffer(0, self.firefly_instances.slice(..));
                pass.draw(0..6, 0..self.firefly_count);
            }
        }

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("blit_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                ..Default::default()
            });
            pass.set_pipeline(&self.blit_pipeline);
            pass.set_bind_group(0, &self.target.blit_bind_group, &[]);
            pass.draw(0..3, 0..1);
        }

        queue.submit(std::iter::once(encoder.finish()));
    }

    /// Upload scene meshes and the baked texture when the scene changed.
    fn sync_scene(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, scene: &Scene) {
        if self.scene_revision == Some(scene.revision()) {
            return;
        }
        self.scene_revision = Some(scene.revision());

        if let Some(texture) = scene.baked_texture() {
            self.baked_bind_group = Self::create_texture_bind_group(
                device,
                queue,
                &self.texture_layout,
                &self.sampler,
                texture,
            );
        }

        self.meshes = scene
            .nodes()
            .iter()
            .filter(|node| !node.mesh.is_empty())
            .map(|node| GpuMesh {
                name: node.name.clone(),
                material: node.material,
                vertex_buffer: device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("mesh_vertex_buffer"),
                    contents: bytemuck::cast_slice(&mesh_vertices(&node.mesh)),
                    usage: wgpu::BufferUsages::VERTEX,
                }),
                index_buffer: device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("mesh_index_buffer"),
                    contents: bytemuck::cast_slice(&node.mesh.indices),
                    usage: wgpu::BufferUsages::INDEX,
                }),
                index_count: node.mesh.indices.len() as u32,
            })
            .collect();

        tracing::debug!(
            revision = scene.revision(),
            meshes = ?self.meshes.iter().map(|m| m.name.as_str()).collect::<Vec<_>>(),
            "uploaded scene"
        );
    }

    fn create_texture_bind_group(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layout: &wgpu::BindGroupLayout,
        sampler: &wgpu::Sampler,
        data: &TextureData,
    ) -> wgpu::BindGroup {
        // Stored as-is: colors are display-encoded end to end.
        let texture = device.create_texture_with_data(
            queue,
            &wgpu::TextureDescriptor {
                label: Some("baked_texture"),
                size: wgpu::Extent3d {
                    width: data.width.max(1),
                    height: data.height.max(1),
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: COLOR_FORMAT,
                usage: wgpu::TextureUsages::TEXTURE_BINDING,
                view_formats: &[],
            },
            wgpu::util::TextureDataOrder::LayerMajor,
            &data.rgba,
        );
        let view = texture.create_view(&Default::default());
        texture_bind_group(device, "baked_bind_group", layout, &view, sampler)
    }

    fn create_target(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        sampler: &wgpu::Sampler,
        size: (u32, u32),
    ) -> RenderTarget {
        let texture = |label, format, usage, sample_count| {
            device
                .create_texture(&wgpu::TextureDescriptor {
                    label: Some(label),
                    size: wgpu::Extent3d {
                        width: size.0,
                        height: size.1,
                        depth_or_array_layers: 1,
                    },
                    mip_level_count: 1,
                    sample_count,
                    dimension: wgpu::TextureDimension::D2,
                    format,
                    usage,
                    view_formats: &[],
                })
                .create_view(&Default::default())
        };
        let msaa_color = texture(
            "offscreen_msaa_color",
            COLOR_FORMAT,
            wgpu::TextureUsages::RENDER_ATTACHMENT,
            SAMPLE_COUNT,
        );
        let color = texture(
            "offscreen_color",
            COLOR_FORMAT,
            wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            1,
        );
        let depth = texture(
            "offscreen_depth",
            DEPTH_FORMAT,
            wgpu::TextureUsages::RENDER_ATTACHMENT,
            SAMPLE_COUNT,
        );
        let blit_bind_group = texture_bind_group(device, "blit_bind_group", layout, &color, sampler);
        RenderTarget {
            size,
            msaa_color,
            color,
            depth,
            blit_bind_group,
        }
    }
}

fn texture_bind_group(
    device: &wgpu::Device,
    label: &str,
    layout: &wgpu::BindGroupLayout,
    view: &wgpu::TextureView,
    sampler: &wgpu::Sampler,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(label),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(sampler),
            },
        ],
    })
}

/// Opaque mesh pipeline sharing `vs_mesh` and the mesh vertex layout.
fn mesh_pipeline(
    device: &wgpu::Device,
    label: &str,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    fragment_entry: &str,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_mesh"),
            compilation_options: Default::default(),
            buffers: &[wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<MeshVertex>() as u64,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &wgpu::vertex_attr_array![
                    0 => Float32x3,
                    1 => Float32x2,
                ],
            }],
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some(fragment_entry),
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format: COLOR_FORMAT,
                blend: Some(wgpu::BlendState::REPLACE),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            cull_mode: Some(wgpu::Face::Back),
            ..Default::default()
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: Default::default(),
            bias: Default::default(),
        }),
        multisample: scene_multisample(),
        multiview: None,
        cache: None,
    })
}

//! Renderer: wgpu surface/device setup, sky-box pass and lit mesh pass.
//! wgpu = 26.x, winit = 0.30.x
//!
//! Frame order is fixed: clear, sky, then every scene object in list order.
//! Meshes are uploaded once and referenced by handle; per-object uniforms are
//! rewritten each frame from the scene.

use std::num::NonZeroU64;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use bytemuck::{Pod, Zeroable};
use glam::{Mat3, Mat4};
use wgpu::{
    util::DeviceExt, BindGroup, BindGroupLayout, BindGroupLayoutDescriptor, BindGroupLayoutEntry,
    BindingType, BlendState, Buffer, BufferBindingType, BufferUsages, ColorTargetState,
    ColorWrites, CommandEncoderDescriptor, CompareFunction, DepthBiasState, DepthStencilState,
    Device, DeviceDescriptor, Extent3d, Face, Features, FragmentState, Instance,
    InstanceDescriptor, Limits, LoadOp, Operations, PipelineLayoutDescriptor, PowerPreference,
    PresentMode, Queue, RenderPassColorAttachment, RenderPassDescriptor, RenderPipeline,
    RenderPipelineDescriptor, SamplerBindingType, ShaderModule, ShaderModuleDescriptor,
    ShaderSource, ShaderStages, StoreOp, Surface, SurfaceConfiguration, SurfaceError,
    TexelCopyBufferLayout, TexelCopyTextureInfo, TextureDescriptor, TextureDimension,
    TextureFormat, TextureSampleType, TextureUsages, TextureView, TextureViewDescriptor,
    TextureViewDimension, VertexBufferLayout, VertexState, VertexStepMode,
};
use winit::{dpi::PhysicalSize, window::Window};

use asset::mesh::MeshData;
use asset::tangent::generate_tangents;
use asset::texture::{CubemapData, TextureData};
use corelib::scene::{Material, MeshId, Scene};

/// Interleaved GPU vertex: position + normal + uv + tangent.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct MeshVertex {
    pub pos: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
    pub tangent: [f32; 3],
}

impl MeshVertex {
    pub const LAYOUT: VertexBufferLayout<'static> = VertexBufferLayout {
        array_stride: std::mem::size_of::<MeshVertex>() as u64,
        step_mode: VertexStepMode::Vertex,
        attributes: &wgpu::vertex_attr_array![
            0 => Float32x3, 1 => Float32x3, 2 => Float32x2, 3 => Float32x3
        ],
    };
}

/// Camera UBO (16-byte aligned).
#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
struct CameraUniform {
    view_proj: [[f32; 4]; 4],
    /// View with translation stripped, for the sky pass.
    sky_view_proj: [[f32; 4]; 4],
    eye: [f32; 4],
}

/// Per-object UBO: model matrix + material params.
#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
struct ObjectUniform {
    model: [[f32; 4]; 4],
    /// x: material kind, y: reflectivity, z: height scale, w: unused.
    params: [f32; 4],
}

fn material_params(material: Material) -> [f32; 4] {
    match material {
        Material::NormalMapped => [0.0, 0.0, 0.0, 0.0],
        Material::Reflective { reflectivity } => [1.0, reflectivity, 0.0, 0.0],
        Material::Parallax { height_scale } => [2.0, 0.0, height_scale, 0.0],
    }
}

const DEPTH_FORMAT: TextureFormat = TextureFormat::Depth32Float;

/// Everything the renderer needs at startup besides the window.
pub struct RendererConfig {
    pub backends: wgpu::Backends,
    pub diffuse: TextureData,
    pub normal_height: TextureData,
    pub sky: CubemapData,
}

struct GpuMesh {
    vertex_buf: Buffer,
    index_buf: Buffer,
    index_count: u32,
}

struct GpuObject {
    uniform_buf: Buffer,
    bind_group: BindGroup,
}

pub struct GpuState {
    // Surface
    surface: Surface<'static>,
    surface_config: SurfaceConfiguration,

    // Device/queue
    device: Device,
    queue: Queue,

    // Pipelines & shared bindings
    sky_pipeline: RenderPipeline,
    mesh_pipeline: RenderPipeline,
    camera_buf: Buffer,
    camera_bg: BindGroup,
    texture_bg: BindGroup,
    object_bgl: BindGroupLayout,

    // Geometry
    sky_cube: GpuMesh,
    meshes: Vec<GpuMesh>,
    objects: Vec<GpuObject>,

    // Depth
    depth_view: TextureView,

    // Size cache
    width: u32,
    height: u32,
}

impl GpuState {
    /// Create GPU state bound to an `Arc<Window>`.
    pub async fn new(window: Arc<Window>, config: RendererConfig) -> Result<Self> {
        let PhysicalSize { width, height } = window.inner_size();
        let width = width.max(1);
        let height = height.max(1);

        // Instance & surface
        let instance = Instance::new(&InstanceDescriptor {
            backends: config.backends,
            ..Default::default()
        });
        let surface: Surface<'static> = instance
            .create_surface(window.clone())
            .context("create_surface failed")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("No suitable GPU adapter")?;
        log::info!("Adapter: {:?}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(&DeviceDescriptor {
                label: Some("Veles3D Device"),
                required_features: Features::empty(),
                required_limits: Limits::downlevel_webgl2_defaults()
                    .using_resolution(adapter.limits()),
                memory_hints: Default::default(),
                trace: Default::default(),
            })
            .await
            .context("request_device failed")?;

        // Surface format (prefer sRGB)
        let caps = surface.get_capabilities(&adapter);
        let surface_format = caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .unwrap_or(caps.formats[0]);

        let surface_config = SurfaceConfiguration {
            usage: TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width,
            height,
            present_mode: PresentMode::AutoVsync,
            alpha_mode: caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &surface_config);

        let depth_view = create_depth_view(&device, &surface_config);

        // ==== Shaders ====
        let sky_shader = device.create_shader_module(ShaderModuleDescriptor {
            label: Some("Sky WGSL"),
            source: ShaderSource::Wgsl(include_str!("shaders/sky.wgsl").into()),
        });
        let mesh_shader = device.create_shader_module(ShaderModuleDescriptor {
            label: Some("Mesh WGSL"),
            source: ShaderSource::Wgsl(include_str!("shaders/mesh.wgsl").into()),
        });

        // ==== Bind group layouts ====
        let camera_bgl = device.create_bind_group_layout(&BindGroupLayoutDescriptor {
            label: Some("Camera BGL"),
            entries: &[uniform_entry::<CameraUniform>(0)],
        });
        let texture_bgl = device.create_bind_group_layout(&BindGroupLayoutDescriptor {
            label: Some("Texture BGL"),
            entries: &[
                texture_entry(0, TextureViewDimension::D2),
                texture_entry(1, TextureViewDimension::D2),
                texture_entry(2, TextureViewDimension::Cube),
                BindGroupLayoutEntry {
                    binding: 3,
                    visibility: ShaderStages::FRAGMENT,
                    ty: BindingType::Sampler(SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });
        let object_bgl = device.create_bind_group_layout(&BindGroupLayoutDescriptor {
            label: Some("Object BGL"),
            entries: &[uniform_entry::<ObjectUniform>(0)],
        });

        // ==== Camera UBO ====
        let camera_init = CameraUniform {
            view_proj: Mat4::IDENTITY.to_cols_array_2d(),
            sky_view_proj: Mat4::IDENTITY.to_cols_array_2d(),
            eye: [0.0; 4],
        };
        let camera_buf = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Camera UBO"),
            contents: bytemuck::bytes_of(&camera_init),
            usage: BufferUsages::UNIFORM | BufferUsages::COPY_DST,
        });
        let camera_bg = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Camera BG"),
            layout: &camera_bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buf.as_entire_binding(),
            }],
        });

        // ==== Textures ====
        let diffuse_view = upload_texture(
            &device,
            &queue,
            &config.diffuse,
            TextureFormat::Rgba8UnormSrgb,
            "Diffuse",
        )?;
        // Normal/height data is not color; keep it linear.
        let normal_view = upload_texture(
            &device,
            &queue,
            &config.normal_height,
            TextureFormat::Rgba8Unorm,
            "NormalHeight",
        )?;
        let sky_view = upload_cubemap(&device, &queue, &config.sky)?;

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Linear Repeat"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            address_mode_w: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let texture_bg = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Texture BG"),
            layout: &texture_bgl,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&diffuse_view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&normal_view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::TextureView(&sky_view),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: wgpu::BindingResource::Sampler(&sampler),
                },
            ],
        });

        // ==== Pipelines ====
        let sky_layout = device.create_pipeline_layout(&PipelineLayoutDescriptor {
            label: Some("Sky PipelineLayout"),
            bind_group_layouts: &[&camera_bgl, &texture_bgl],
            push_constant_ranges: &[],
        });
        // Sky: no culling (seen from inside), depth test only, z forced to far.
        let sky_pipeline = create_pipeline(
            &device,
            &sky_layout,
            &sky_shader,
            surface_format,
            "Sky Pipeline",
            None,
            false,
            CompareFunction::LessEqual,
        );

        let mesh_layout = device.create_pipeline_layout(&PipelineLayoutDescriptor {
            label: Some("Mesh PipelineLayout"),
            bind_group_layouts: &[&camera_bgl, &texture_bgl, &object_bgl],
            push_constant_ranges: &[],
        });
        let mesh_pipeline = create_pipeline(
            &device,
            &mesh_layout,
            &mesh_shader,
            surface_format,
            "Mesh Pipeline",
            Some(Face::Back),
            true,
            CompareFunction::Less,
        );

        // ==== Sky geometry: unit cube, reusing the shared vertex layout ====
        let mut sky_mesh = MeshData::cube();
        generate_tangents(&mut sky_mesh).context("sky cube tangents")?;
        let sky_cube = upload_mesh_buffers(&device, &sky_mesh, "Sky Cube");

        Ok(Self {
            surface,
            surface_config,
            device,
            queue,
            sky_pipeline,
            mesh_pipeline,
            camera_buf,
            camera_bg,
            texture_bg,
            object_bgl,
            sky_cube,
            meshes: Vec::new(),
            objects: Vec::new(),
            depth_view,
            width,
            height,
        })
    }

    /// Upload a mesh once; the returned handle is what scene objects reference.
    /// The mesh must already carry tangents.
    pub fn upload_mesh(&mut self, mesh: &MeshData) -> Result<MeshId> {
        mesh.validate()?;
        if !mesh.has_tangents() {
            bail!("Mesh uploaded without tangents; run generate_tangents first");
        }
        let id = self.meshes.len() as MeshId;
        self.meshes
            .push(upload_mesh_buffers(&self.device, mesh, "Mesh"));
        log::debug!(
            "Uploaded mesh {id}: {} vertices, {} triangles",
            mesh.vertex_count(),
            mesh.triangle_count()
        );
        Ok(id)
    }

    /// Resize: reconfigure surface & recreate depth view.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width.max(1);
        self.height = height.max(1);
        self.surface_config.width = self.width;
        self.surface_config.height = self.height;
        self.surface.configure(&self.device, &self.surface_config);
        self.depth_view = create_depth_view(&self.device, &self.surface_config);
    }

    /// Render one frame: camera + object uniforms, clear, sky, scene objects.
    pub fn render(&mut self, scene: &Scene) -> std::result::Result<(), SurfaceError> {
        // --- camera
        let view = scene.camera.view();
        let proj = scene.projection.matrix();
        let sky_view = Mat4::from_mat3(Mat3::from_mat4(view));
        let camera = CameraUniform {
            view_proj: (proj * view).to_cols_array_2d(),
            sky_view_proj: (proj * sky_view).to_cols_array_2d(),
            eye: scene.camera.position.extend(1.0).to_array(),
        };
        self.queue
            .write_buffer(&self.camera_buf, 0, bytemuck::bytes_of(&camera));

        // --- per-object uniforms
        self.ensure_object_slots(scene.objects().len());
        for (slot, object) in self.objects.iter().zip(scene.objects()) {
            let uniform = ObjectUniform {
                model: object.transform.matrix().to_cols_array_2d(),
                params: material_params(object.material),
            };
            self.queue
                .write_buffer(&slot.uniform_buf, 0, bytemuck::bytes_of(&uniform));
        }

        // --- frame & pass
        let frame = self.surface.get_current_texture()?;
        let view = frame.texture.create_view(&Default::default());

        let mut encoder = self
            .device
            .create_command_encoder(&CommandEncoderDescriptor {
                label: Some("MainEncoder"),
            });

        {
            let mut rpass = encoder.begin_render_pass(&RenderPassDescriptor {
                label: Some("MainPass"),
                color_attachments: &[Some(RenderPassColorAttachment {
                    view: &view,
                    depth_slice: None, // required in 26.x
                    resolve_target: None,
                    ops: Operations {
                        load: LoadOp::Clear(wgpu::Color {
                            r: 0.05,
                            g: 0.05,
                            b: 0.08,
                            a: 1.0,
                        }),
                        store: StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(Operations {
                        load: LoadOp::Clear(1.0),
                        store: StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            // Sky first; it lands at depth 1.0 behind everything.
            rpass.set_pipeline(&self.sky_pipeline);
            rpass.set_bind_group(0, &self.camera_bg, &[]);
            rpass.set_bind_group(1, &self.texture_bg, &[]);
            rpass.set_vertex_buffer(0, self.sky_cube.vertex_buf.slice(..));
            rpass.set_index_buffer(self.sky_cube.index_buf.slice(..), wgpu::IndexFormat::Uint32);
            rpass.draw_indexed(0..self.sky_cube.index_count, 0, 0..1);

            rpass.set_pipeline(&self.mesh_pipeline);
            for (slot, object) in self.objects.iter().zip(scene.objects()) {
                let Some(mesh) = self.meshes.get(object.mesh as usize) else {
                    log::warn!("Scene references unknown mesh {}", object.mesh);
                    continue;
                };
                rpass.set_bind_group(2, &slot.bind_group, &[]);
                rpass.set_vertex_buffer(0, mesh.vertex_buf.slice(..));
                rpass.set_index_buffer(mesh.index_buf.slice(..), wgpu::IndexFormat::Uint32);
                rpass.draw_indexed(0..mesh.index_count, 0, 0..1);
            }
        }

        self.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }

    pub fn is_surface_lost(err: &SurfaceError) -> bool {
        matches!(err, SurfaceError::Lost | SurfaceError::Outdated)
    }

    pub fn recreate_surface(&mut self) {
        self.resize(self.width, self.height);
    }

    /// Grow the per-object uniform pool to `count` slots.
    fn ensure_object_slots(&mut self, count: usize) {
        while self.objects.len() < count {
            let uniform_buf = self.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("Object UBO"),
                size: std::mem::size_of::<ObjectUniform>() as u64,
                usage: BufferUsages::UNIFORM | BufferUsages::COPY_DST,
                mapped_at_creation: false,
            });
            let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("Object BG"),
                layout: &self.object_bgl,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform_buf.as_entire_binding(),
                }],
            });
            self.objects.push(GpuObject {
                uniform_buf,
                bind_group,
            });
        }
    }
}

fn uniform_entry<T>(binding: u32) -> BindGroupLayoutEntry {
    BindGroupLayoutEntry {
        binding,
        visibility: ShaderStages::VERTEX_FRAGMENT,
        ty: BindingType::Buffer {
            ty: BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: NonZeroU64::new(std::mem::size_of::<T>() as u64),
        },
        count: None,
    }
}

fn texture_entry(binding: u32, view_dimension: TextureViewDimension) -> BindGroupLayoutEntry {
    BindGroupLayoutEntry {
        binding,
        visibility: ShaderStages::FRAGMENT,
        ty: BindingType::Texture {
            sample_type: TextureSampleType::Float { filterable: true },
            view_dimension,
            multisampled: false,
        },
        count: None,
    }
}

#[allow(clippy::too_many_arguments)]
fn create_pipeline(
    device: &Device,
    layout: &wgpu::PipelineLayout,
    shader: &ShaderModule,
    surface_format: TextureFormat,
    label: &str,
    cull_mode: Option<Face>,
    depth_write: bool,
    depth_compare: CompareFunction,
) -> RenderPipeline {
    device.create_render_pipeline(&RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(layout),
        vertex: VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            buffers: &[MeshVertex::LAYOUT],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        fragment: Some(FragmentState {
            module: shader,
            entry_point: Some("fs_main"),
            targets: &[Some(ColorTargetState {
                format: surface_format,
                blend: Some(BlendState::REPLACE),
                write_mask: ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        primitive: wgpu::PrimitiveState {
            cull_mode,
            ..Default::default()
        },
        depth_stencil: Some(DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: depth_write,
            depth_compare,
            stencil: wgpu::StencilState::default(),
            bias: DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}

/// Create a depth texture view matching the surface config.
fn create_depth_view(device: &Device, sc: &SurfaceConfiguration) -> TextureView {
    let tex = device.create_texture(&TextureDescriptor {
        label: Some("DepthTex"),
        size: Extent3d {
            width: sc.width.max(1),
            height: sc.height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    tex.create_view(&TextureViewDescriptor::default())
}

/// Interleave SoA mesh attributes into the GPU vertex format.
fn interleave(mesh: &MeshData) -> Vec<MeshVertex> {
    (0..mesh.vertex_count())
        .map(|i| MeshVertex {
            pos: mesh.positions[i],
            normal: mesh.normals[i],
            uv: mesh.uvs[i],
            tangent: mesh.tangents[i],
        })
        .collect()
}

fn upload_mesh_buffers(device: &Device, mesh: &MeshData, label: &str) -> GpuMesh {
    let vertices = interleave(mesh);
    let vertex_buf = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(&format!("{label} VB")),
        contents: bytemuck::cast_slice(&vertices),
        usage: BufferUsages::VERTEX,
    });
    let index_buf = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(&format!("{label} IB")),
        contents: bytemuck::cast_slice(&mesh.indices),
        usage: BufferUsages::INDEX,
    });
    GpuMesh {
        vertex_buf,
        index_buf,
        index_count: mesh.indices.len() as u32,
    }
}

fn upload_texture(
    device: &Device,
    queue: &Queue,
    data: &TextureData,
    format: TextureFormat,
    label: &str,
) -> Result<TextureView> {
    if !data.is_valid() {
        bail!("Texture '{label}' has inconsistent dimensions");
    }
    let size = Extent3d {
        width: data.width,
        height: data.height,
        depth_or_array_layers: 1,
    };
    let texture = device.create_texture(&TextureDescriptor {
        label: Some(label),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: TextureDimension::D2,
        format,
        usage: TextureUsages::TEXTURE_BINDING | TextureUsages::COPY_DST,
        view_formats: &[],
    });
    queue.write_texture(
        TexelCopyTextureInfo {
            texture: &texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        &data.data,
        TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(4 * data.width),
            rows_per_image: Some(data.height),
        },
        size,
    );
    Ok(texture.create_view(&TextureViewDescriptor::default()))
}

fn upload_cubemap(device: &Device, queue: &Queue, sky: &CubemapData) -> Result<TextureView> {
    let face_size = sky.face_size();
    let texture = device.create_texture(&TextureDescriptor {
        label: Some("SkyCube"),
        size: Extent3d {
            width: face_size,
            height: face_size,
            depth_or_array_layers: 6,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: TextureDimension::D2,
        format: TextureFormat::Rgba8UnormSrgb,
        usage: TextureUsages::TEXTURE_BINDING | TextureUsages::COPY_DST,
        view_formats: &[],
    });
    for (layer, face) in sky.faces.iter().enumerate() {
        if !face.is_valid() {
            bail!("Cubemap face {layer} has inconsistent dimensions");
        }
        queue.write_texture(
            TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d {
                    x: 0,
                    y: 0,
                    z: layer as u32,
                },
                aspect: wgpu::TextureAspect::All,
            },
            &face.data,
            TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * face_size),
                rows_per_image: Some(face_size),
            },
            Extent3d {
                width: face_size,
                height: face_size,
                depth_or_array_layers: 1,
            },
        );
    }
    Ok(texture.create_view(&TextureViewDescriptor {
        label: Some("SkyCube View"),
        dimension: Some(TextureViewDimension::Cube),
        ..Default::default()
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interleave_matches_vertex_count() {
        let mut mesh = MeshData::cube();
        generate_tangents(&mut mesh).unwrap();
        let vertices = interleave(&mesh);
        assert_eq!(vertices.len(), mesh.vertex_count());
        assert_eq!(vertices[0].pos, mesh.positions[0]);
        assert_eq!(vertices[0].tangent, mesh.tangents[0]);
    }

    #[test]
    fn material_params_encode_kind() {
        assert_eq!(material_params(Material::NormalMapped)[0], 0.0);
        let p = material_params(Material::Reflective { reflectivity: 0.6 });
        assert_eq!(p[0], 1.0);
        assert_eq!(p[1], 0.6);
        let p = material_params(Material::Parallax { height_scale: 0.2 });
        assert_eq!(p[0], 2.0);
        assert_eq!(p[2], 0.2);
    }

    #[test]
    fn vertex_layout_stride_matches_struct() {
        assert_eq!(
            MeshVertex::LAYOUT.array_stride,
            std::mem::size_of::<MeshVertex>() as u64
        );
    }
}

use std::collections::HashMap;

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use crate::compositor::Compositor;
use crate::gpu::TextureHandle;
use crate::image::ImageBuffer;
use crate::render::{RenderCtx, RenderTarget};

use super::quad::{QuadVertex, ViewportUniform, QUAD_INDICES, QUAD_VERTICES};

/// Draws the compositor's render queue.
///
/// Every image buffer is mirrored by one GPU texture keyed by its
/// [`TextureHandle`]. Each frame the renderer drops textures of deleted
/// images, re-uploads buffers whose pixels changed, then draws all visible
/// instances back-to-front, one instanced draw per run of equal textures.
///
/// Pixels are sampled with nearest filtering at 1 image pixel per physical
/// pixel. Alpha is straight (not premultiplied).
#[derive(Default)]
pub struct ImageRenderer {
    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,

    viewport_layout: Option<wgpu::BindGroupLayout>,
    image_layout: Option<wgpu::BindGroupLayout>,
    viewport_group: Option<wgpu::BindGroup>,
    viewport_ubo: Option<wgpu::Buffer>,
    sampler: Option<wgpu::Sampler>,

    quad_vbo: Option<wgpu::Buffer>,
    quad_ibo: Option<wgpu::Buffer>,

    instance_vbo: Option<wgpu::Buffer>,
    instance_capacity: usize,

    textures: HashMap<TextureHandle, GpuImage>,
    batch: Vec<(TextureHandle, ImageInstance)>,
}

struct GpuImage {
    texture: wgpu::Texture,
    bind_group: wgpu::BindGroup,
}

impl ImageRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of image textures currently resident on the GPU.
    pub fn resident_textures(&self) -> usize {
        self.textures.len()
    }

    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        compositor: &mut Compositor,
    ) {
        self.ensure_pipeline(ctx);
        self.ensure_static_buffers(ctx);
        self.ensure_bindings(ctx);

        for handle in compositor.textures_mut().take_released() {
            if self.textures.remove(&handle).is_some() {
                log::trace!("texture {} dropped", handle.raw());
            }
        }

        let mut created = Vec::new();
        for (_, image) in compositor.images_mut() {
            if self.sync_texture(ctx, image) {
                created.push(image.texture_handle());
            }
        }
        for handle in created {
            compositor.textures_mut().mark_resident(handle);
        }

        self.batch.clear();
        self.batch.extend(compositor.visible_in_paint_order().map(|item| {
            (
                item.image.texture_handle(),
                ImageInstance {
                    origin: [item.instance.x as f32, item.instance.y as f32],
                    size: [item.image.width() as f32, item.image.height() as f32],
                },
            )
        }));
        self.batch.retain(|(handle, _)| self.textures.contains_key(handle));

        if self.batch.is_empty() {
            return;
        }

        self.write_viewport_uniform(ctx);
        self.ensure_instance_capacity(ctx, self.batch.len());

        let Some(instance_vbo) = self.instance_vbo.as_ref() else { return };
        let raw: Vec<ImageInstance> = self.batch.iter().map(|(_, inst)| *inst).collect();
        ctx.queue.write_buffer(instance_vbo, 0, bytemuck::cast_slice(&raw));

        let Some(pipeline) = self.pipeline.as_ref() else { return };
        let Some(viewport_group) = self.viewport_group.as_ref() else { return };
        let Some(quad_vbo) = self.quad_vbo.as_ref() else { return };
        let Some(quad_ibo) = self.quad_ibo.as_ref() else { return };

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("tessera image pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(0, viewport_group, &[]);
        rpass.set_vertex_buffer(0, quad_vbo.slice(..));
        rpass.set_vertex_buffer(1, instance_vbo.slice(..));
        rpass.set_index_buffer(quad_ibo.slice(..), wgpu::IndexFormat::Uint16);

        // Paint order must hold across textures, so only consecutive runs batch.
        let mut i = 0;
        while i < self.batch.len() {
            let handle = self.batch[i].0;
            let mut j = i + 1;
            while j < self.batch.len() && self.batch[j].0 == handle {
                j += 1;
            }
            if let Some(gpu_image) = self.textures.get(&handle) {
                rpass.set_bind_group(1, &gpu_image.bind_group, &[]);
                rpass.draw_indexed(0..6, 0, i as u32..j as u32);
            }
            i = j;
        }
    }

    /// Creates the texture for `image` on first sight and uploads its pixels
    /// whenever they changed since the last upload. Returns whether a texture
    /// was created.
    fn sync_texture(&mut self, ctx: &RenderCtx<'_>, image: &mut ImageBuffer) -> bool {
        let handle = image.texture_handle();
        let (width, height) = (image.width() as u32, image.height() as u32);
        let mut created = false;

        if !self.textures.contains_key(&handle) {
            let max = ctx.device.limits().max_texture_dimension_2d;
            if width > max || height > max {
                if image.is_dirty() {
                    log::warn!("image {width}x{height} exceeds the GPU limit of {max}; not drawn");
                    image.mark_clean();
                }
                return false;
            }
            let Some(gpu_image) = self.create_texture(ctx, width, height) else { return false };
            self.textures.insert(handle, gpu_image);
            log::trace!("texture {} created ({width}x{height})", handle.raw());
            created = true;
        } else if !image.is_dirty() {
            return false;
        }

        let Some(gpu_image) = self.textures.get(&handle) else { return created };
        ctx.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &gpu_image.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            image.pixels(),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(width * 4),
                rows_per_image: Some(height),
            },
            wgpu::Extent3d { width, height, depth_or_array_layers: 1 },
        );
        image.mark_clean();
        created
    }

    fn create_texture(&self, ctx: &RenderCtx<'_>, width: u32, height: u32) -> Option<GpuImage> {
        let layout = self.image_layout.as_ref()?;
        let sampler = self.sampler.as_ref()?;

        let texture = ctx.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("tessera image"),
            size: wgpu::Extent3d { width, height, depth_or_array_layers: 1 },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("tessera image bind group"),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        });

        Some(GpuImage { texture, bind_group })
    }

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline_format == Some(ctx.surface_format) && self.pipeline.is_some() {
            return;
        }

        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("tessera image shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/image.wgsl").into()),
        });

        let viewport_layout = ctx
            .device
            .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("tessera viewport bgl"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: wgpu::BufferSize::new(ViewportUniform::SIZE),
                    },
                    count: None,
                }],
            });

        let image_layout = ctx
            .device
            .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("tessera image bgl"),
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

        let pipeline_layout = ctx
            .device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("tessera image pipeline layout"),
                bind_group_layouts: &[&viewport_layout, &image_layout],
                immediate_size: 0,
            });

        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("tessera image pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[QuadVertex::layout(), ImageInstance::layout()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.surface_format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        // Existing bind groups were built against the old layouts.
        if self.pipeline.is_some() {
            self.textures.clear();
            self.viewport_group = None;
            self.viewport_ubo = None;
        }

        self.pipeline_format = Some(ctx.surface_format);
        self.pipeline = Some(pipeline);
        self.viewport_layout = Some(viewport_layout);
        self.image_layout = Some(image_layout);
    }

    fn ensure_bindings(&mut self, ctx: &RenderCtx<'_>) {
        if self.sampler.is_none() {
            self.sampler = Some(ctx.device.create_sampler(&wgpu::SamplerDescriptor {
                label: Some("tessera image sampler"),
                address_mode_u: wgpu::AddressMode::ClampToEdge,
                address_mode_v: wgpu::AddressMode::ClampToEdge,
                address_mode_w: wgpu::AddressMode::ClampToEdge,
                mag_filter: wgpu::FilterMode::Nearest,
                min_filter: wgpu::FilterMode::Nearest,
                mipmap_filter: wgpu::MipmapFilterMode::Nearest,
                ..Default::default()
            }));
        }

        if self.viewport_group.is_some() && self.viewport_ubo.is_some() {
            return;
        }
        let Some(layout) = self.viewport_layout.as_ref() else { return };

        let viewport_ubo = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("tessera viewport ubo"),
            size: ViewportUniform::SIZE,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let viewport_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("tessera viewport bind group"),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: viewport_ubo.as_entire_binding(),
            }],
        });

        self.viewport_ubo = Some(viewport_ubo);
        self.viewport_group = Some(viewport_group);
    }

    fn ensure_static_buffers(&mut self, ctx: &RenderCtx<'_>) {
        if self.quad_vbo.is_some() && self.quad_ibo.is_some() {
            return;
        }

        self.quad_vbo = Some(ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("tessera quad vbo"),
            contents: bytemuck::cast_slice(&QUAD_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        }));
        self.quad_ibo = Some(ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("tessera quad ibo"),
            contents: bytemuck::cast_slice(&QUAD_INDICES),
            usage: wgpu::BufferUsages::INDEX,
        }));
    }

    fn write_viewport_uniform(&self, ctx: &RenderCtx<'_>) {
        let Some(ubo) = self.viewport_ubo.as_ref() else { return };
        let uniform = ViewportUniform::new(ctx.viewport);
        ctx.queue.write_buffer(ubo, 0, bytemuck::bytes_of(&uniform));
    }

    fn ensure_instance_capacity(&mut self, ctx: &RenderCtx<'_>, required: usize) {
        if required <= self.instance_capacity && self.instance_vbo.is_some() {
            return;
        }

        let capacity = required.next_power_of_two().max(64);
        self.instance_vbo = Some(ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("tessera image instance vbo"),
            size: (capacity * std::mem::size_of::<ImageInstance>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        }));
        self.instance_capacity = capacity;
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct ImageInstance {
    origin: [f32; 2],
    size: [f32; 2],
}

impl ImageInstance {
    const ATTRS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        1 => Float32x2, // origin
        2 => Float32x2  // size
    ];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<ImageInstance>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRS,
        }
    }
}

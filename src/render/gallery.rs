use super::helpers;
use super::GpuContext;
use crate::constants::PLACEHOLDER_RGBA;
use crate::core::gallery::{Gallery, Placement};
use glam::{Mat4, Vec2};
use web_sys as web;

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct ItemUniforms {
    mvp: [[f32; 4]; 4],
    color: [f32; 4],
    alpha: f32,
    border_radius: f32,
    _pad: [f32; 2],
}

impl ItemUniforms {
    fn new(mvp: Mat4, rgb: [f32; 3], alpha: f32, border_radius: f32) -> Self {
        Self {
            mvp: mvp.to_cols_array_2d(),
            color: [rgb[0], rgb[1], rgb[2], 1.0],
            alpha,
            border_radius,
            _pad: [0.0; 2],
        }
    }
}

/// One textured quad: its texture, uniforms and the bind group tying them
/// together. Replacing the texture rebuilds the bind group.
struct Plane {
    texture: wgpu::Texture,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

struct PlaneBinding<'a> {
    device: &'a wgpu::Device,
    layout: &'a wgpu::BindGroupLayout,
    sampler: &'a wgpu::Sampler,
}

impl PlaneBinding<'_> {
    fn bind(&self, label: &str, view: &wgpu::TextureView, uniforms: &wgpu::Buffer) -> wgpu::BindGroup {
        self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout: self.layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(self.sampler),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: uniforms.as_entire_binding(),
                },
            ],
        })
    }
}

impl Plane {
    fn placeholder(binding: &PlaneBinding, queue: &wgpu::Queue, label: &str) -> Self {
        let (texture, view) =
            helpers::create_rgba_texture(binding.device, queue, label, 1, 1, &PLACEHOLDER_RGBA);
        let uniform_buffer = helpers::uniform_buffer::<ItemUniforms>(binding.device, label);
        let bind_group = binding.bind(label, &view, &uniform_buffer);
        Self {
            texture,
            uniform_buffer,
            bind_group,
        }
    }

    fn replace_texture(
        &mut self,
        binding: &PlaneBinding,
        queue: &wgpu::Queue,
        label: &str,
        width: u32,
        height: u32,
        pixels: &[u8],
    ) {
        let (texture, view) =
            helpers::create_rgba_texture(binding.device, queue, label, width, height, pixels);
        self.bind_group = binding.bind(label, &view, &self.uniform_buffer);
        std::mem::replace(&mut self.texture, texture).destroy();
    }
}

impl Drop for Plane {
    fn drop(&mut self) {
        self.texture.destroy();
        self.uniform_buffer.destroy();
    }
}

struct ItemGpu {
    image: Plane,
    label: Plane,
    // Zero until the caption is rasterized.
    label_size: Vec2,
}

/// WebGPU renderer for the circular gallery: one image card and one caption
/// plane per item, drawn back to front with premultiplied blending.
pub struct GalleryRenderer {
    gpu: GpuContext,
    layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    image_pipeline: wgpu::RenderPipeline,
    label_pipeline: wgpu::RenderPipeline,
    items: Vec<ItemGpu>,
}

fn plane_pipeline(
    device: &wgpu::Device,
    label: &str,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    frag_entry: &str,
    format: wgpu::TextureFormat,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_plane"),
            buffers: &[],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        primitive: wgpu::PrimitiveState::default(),
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some(frag_entry),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::PREMULTIPLIED_ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        cache: None,
        multiview: None,
    })
}

impl GalleryRenderer {
    /// Every item starts with a transparent placeholder until its image and
    /// caption are uploaded.
    pub async fn new(canvas: &web::HtmlCanvasElement, count: usize) -> anyhow::Result<Self> {
        let gpu = GpuContext::new(canvas).await?;
        let device = &gpu.device;
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("gallery_shader"),
            source: wgpu::ShaderSource::Wgsl(crate::core::GALLERY_WGSL.into()),
        });
        let stages = wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT;
        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("gallery_bgl"),
            entries: &[
                helpers::texture_entry(0, wgpu::ShaderStages::FRAGMENT),
                helpers::sampler_entry(1, wgpu::ShaderStages::FRAGMENT),
                helpers::uniform_entry(2, stages),
            ],
        });
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("gallery_pl"),
            bind_group_layouts: &[&layout],
            push_constant_ranges: &[],
        });
        let format = gpu.format();
        let image_pipeline =
            plane_pipeline(device, "gallery_image", &pipeline_layout, &shader, "fs_image", format);
        let label_pipeline =
            plane_pipeline(device, "gallery_label", &pipeline_layout, &shader, "fs_label", format);
        let sampler = helpers::linear_sampler(device, "gallery_sampler");

        let binding = PlaneBinding {
            device,
            layout: &layout,
            sampler: &sampler,
        };
        let items = (0..count)
            .map(|i| ItemGpu {
                image: Plane::placeholder(&binding, &gpu.queue, &format!("gallery_image_{i}")),
                label: Plane::placeholder(&binding, &gpu.queue, &format!("gallery_label_{i}")),
                label_size: Vec2::ZERO,
            })
            .collect();
        log::info!("[gallery] gpu renderer ready for {count} items");
        Ok(Self {
            gpu,
            layout,
            sampler,
            image_pipeline,
            label_pipeline,
            items,
        })
    }

    /// Upload decoded RGBA pixels for item `index`. Out-of-range indices are
    /// ignored.
    pub fn set_image(&mut self, index: usize, width: u32, height: u32, pixels: &[u8]) {
        let binding = PlaneBinding {
            device: &self.gpu.device,
            layout: &self.layout,
            sampler: &self.sampler,
        };
        if let Some(item) = self.items.get_mut(index) {
            item.image.replace_texture(
                &binding,
                &self.gpu.queue,
                &format!("gallery_image_{index}"),
                width,
                height,
                pixels,
            );
        }
    }

    /// Upload a rasterized caption and the world size of its plane.
    pub fn set_label(&mut self, index: usize, width: u32, height: u32, pixels: &[u8], world_size: Vec2) {
        let binding = PlaneBinding {
            device: &self.gpu.device,
            layout: &self.layout,
            sampler: &self.sampler,
        };
        if let Some(item) = self.items.get_mut(index) {
            item.label.replace_texture(
                &binding,
                &self.gpu.queue,
                &format!("gallery_label_{index}"),
                width,
                height,
                pixels,
            );
            item.label_size = world_size;
        }
    }

    /// Draw every visible item at `size` device pixels.
    pub fn render(&mut self, gallery: &Gallery, size: (u32, u32)) -> anyhow::Result<()> {
        self.gpu.resize_if_needed(size.0, size.1);
        let cfg = gallery.config();
        let rgb = cfg.text_rgb();
        let view_proj = gallery.camera().view_proj();

        let mut visible: Vec<Placement> = gallery
            .placements()
            .into_iter()
            .filter(|p| p.alpha > 0.0 && p.index < self.items.len())
            .collect();
        // Back to front: the most negative z first.
        visible.sort_by(|a, b| a.z.total_cmp(&b.z));

        for p in &visible {
            let item = &self.items[p.index];
            let image = ItemUniforms::new(view_proj * p.image_model(), rgb, p.alpha, cfg.border_radius);
            self.gpu
                .queue
                .write_buffer(&item.image.uniform_buffer, 0, bytemuck::bytes_of(&image));
            let label = ItemUniforms::new(
                view_proj * p.label_model(item.label_size),
                rgb,
                p.alpha,
                0.0,
            );
            self.gpu
                .queue
                .write_buffer(&item.label.uniform_buffer, 0, bytemuck::bytes_of(&label));
        }

        let Some(surface) = self.gpu.acquire()? else {
            return Ok(());
        };
        let view = surface
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("gallery_encoder"),
            });
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("gallery_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            for p in &visible {
                let item = &self.items[p.index];
                pass.set_pipeline(&self.image_pipeline);
                pass.set_bind_group(0, &item.image.bind_group, &[]);
                pass.draw(0..6, 0..1);
                if item.label_size != Vec2::ZERO {
                    pass.set_pipeline(&self.label_pipeline);
                    pass.set_bind_group(0, &item.label.bind_group, &[]);
                    pass.draw(0..6, 0..1);
                }
            }
        }
        self.gpu.queue.submit(Some(encoder.finish()));
        surface.present();
        Ok(())
    }
}

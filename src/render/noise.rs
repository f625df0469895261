use super::helpers::{self, blit, make_fullscreen_pipeline};

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct NoiseUniforms {
    resolution: [f32; 2],
    mouse: [f32; 2],
    time: f32,
    _pad: [f32; 3],
}

impl NoiseUniforms {
    pub(crate) fn new(resolution: [f32; 2], mouse: [f32; 2], time: f32) -> Self {
        Self {
            resolution,
            mouse,
            time,
            _pad: [0.0; 3],
        }
    }
}

/// Fullscreen noise field distorted by the fluid velocity, blended
/// premultiplied onto a transparent surface.
pub(crate) struct NoisePass {
    pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    // One per velocity slot.
    bind_groups: [wgpu::BindGroup; 2],
}

impl NoisePass {
    pub(crate) fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        velocity: [&wgpu::TextureView; 2],
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("noise_shader"),
            source: wgpu::ShaderSource::Wgsl(crate::core::NOISE_FIELD_WGSL.into()),
        });
        let frag = wgpu::ShaderStages::FRAGMENT;
        let bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("noise_bgl"),
            entries: &[
                helpers::texture_entry(0, frag),
                helpers::sampler_entry(1, frag),
                helpers::uniform_entry(2, frag),
            ],
        });
        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("noise_pl"),
            bind_group_layouts: &[&bgl],
            push_constant_ranges: &[],
        });
        let pipeline = make_fullscreen_pipeline(
            device,
            "noise_pipeline",
            &layout,
            &shader,
            "fs_noise",
            surface_format,
            Some(wgpu::BlendState::PREMULTIPLIED_ALPHA_BLENDING),
        );
        let sampler = helpers::linear_sampler(device, "noise_sampler");
        let uniform_buffer = helpers::uniform_buffer::<NoiseUniforms>(device, "noise_uniforms");
        let bind = |label: &str, view: &wgpu::TextureView| {
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some(label),
                layout: &bgl,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: wgpu::BindingResource::TextureView(view),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::Sampler(&sampler),
                    },
                    wgpu::BindGroupEntry {
                        binding: 2,
                        resource: uniform_buffer.as_entire_binding(),
                    },
                ],
            })
        };
        let bind_groups = [
            bind("bg_noise_0", velocity[0]),
            bind("bg_noise_1", velocity[1]),
        ];
        Self {
            pipeline,
            uniform_buffer,
            bind_groups,
        }
    }

    pub(crate) fn write_uniforms(&self, queue: &wgpu::Queue, u: &NoiseUniforms) {
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(u));
    }

    pub(crate) fn draw(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        target: &wgpu::TextureView,
        velocity_slot: usize,
    ) {
        blit(
            encoder,
            "noise_pass",
            target,
            wgpu::Color::TRANSPARENT,
            &self.pipeline,
            &self.bind_groups[velocity_slot & 1],
        );
    }
}

impl Drop for NoisePass {
    fn drop(&mut self) {
        self.uniform_buffer.destroy();
    }
}

use super::helpers::{self, blit, make_fullscreen_pipeline};
use super::noise::{NoisePass, NoiseUniforms};
use super::GpuContext;
use crate::core::fluid::{DoubleBuffer, FluidBackend, FluidController, FluidFrame, Splat};
use web_sys as web;

const FIELD_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba16Float;

#[repr(C)]
#[derive(Copy, Clone, Default, bytemuck::Pod, bytemuck::Zeroable)]
struct SimUniforms {
    texel: [f32; 2],
    point: [f32; 2],
    force: [f32; 2],
    radius: f32,
    dt: f32,
    dissipation: f32,
    aspect: f32,
    _pad: [f32; 2],
}

/// One simulation field on the GPU.
struct Field {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
}

impl Field {
    fn new(device: &wgpu::Device, label: &str, resolution: u32) -> Self {
        let (texture, view) = helpers::create_color_texture(
            device,
            label,
            resolution,
            resolution,
            FIELD_FORMAT,
            wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
        );
        Self { texture, view }
    }
}

struct SimPipelines {
    splat: wgpu::RenderPipeline,
    advect: wgpu::RenderPipeline,
    divergence: wgpu::RenderPipeline,
    pressure: wgpu::RenderPipeline,
    gradient: wgpu::RenderPipeline,
}

/// Velocity, pressure and divergence fields plus the five pass pipelines.
///
/// Every pass reads through one bind group layout `(tex_a, tex_b, sampler,
/// uniforms)`. Bind groups for each read-slot parity are built once, so a
/// swap only flips an index.
pub struct FluidSim {
    resolution: u32,
    velocity: DoubleBuffer<Field>,
    pressure: DoubleBuffer<Field>,
    divergence: Field,
    uniforms: SimUniforms,
    uniform_buffer: wgpu::Buffer,
    pipelines: SimPipelines,
    // (velocity[v], velocity[v])
    bg_velocity: [wgpu::BindGroup; 2],
    // (pressure[p], divergence)
    bg_pressure: [wgpu::BindGroup; 2],
    // [p][v]: (pressure[p], velocity[v])
    bg_gradient: [[wgpu::BindGroup; 2]; 2],
}

impl FluidSim {
    pub fn new(device: &wgpu::Device, resolution: u32) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("fluid_shader"),
            source: wgpu::ShaderSource::Wgsl(crate::core::FLUID_WGSL.into()),
        });
        let frag = wgpu::ShaderStages::FRAGMENT;
        let bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("fluid_bgl"),
            entries: &[
                helpers::texture_entry(0, frag),
                helpers::texture_entry(1, frag),
                helpers::sampler_entry(2, frag),
                helpers::uniform_entry(3, frag),
            ],
        });
        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("fluid_pl"),
            bind_group_layouts: &[&bgl],
            push_constant_ranges: &[],
        });
        let pipeline = |label: &str, entry: &str| {
            make_fullscreen_pipeline(device, label, &layout, &shader, entry, FIELD_FORMAT, None)
        };
        let pipelines = SimPipelines {
            splat: pipeline("fluid_splat", "fs_splat"),
            advect: pipeline("fluid_advect", "fs_advect"),
            divergence: pipeline("fluid_divergence", "fs_divergence"),
            pressure: pipeline("fluid_pressure", "fs_pressure"),
            gradient: pipeline("fluid_gradient", "fs_gradient"),
        };

        let velocity = DoubleBuffer::new(
            Field::new(device, "fluid_velocity_0", resolution),
            Field::new(device, "fluid_velocity_1", resolution),
        );
        let pressure = DoubleBuffer::new(
            Field::new(device, "fluid_pressure_0", resolution),
            Field::new(device, "fluid_pressure_1", resolution),
        );
        let divergence = Field::new(device, "fluid_divergence", resolution);
        let sampler = helpers::linear_sampler(device, "fluid_sampler");
        let uniform_buffer = helpers::uniform_buffer::<SimUniforms>(device, "fluid_uniforms");

        let bind = |label: &str, a: &wgpu::TextureView, b: &wgpu::TextureView| {
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some(label),
                layout: &bgl,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: wgpu::BindingResource::TextureView(a),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::TextureView(b),
                    },
                    wgpu::BindGroupEntry {
                        binding: 2,
                        resource: wgpu::BindingResource::Sampler(&sampler),
                    },
                    wgpu::BindGroupEntry {
                        binding: 3,
                        resource: uniform_buffer.as_entire_binding(),
                    },
                ],
            })
        };
        let [v0, v1] = velocity.slots();
        let [p0, p1] = pressure.slots();
        let bg_velocity = [
            bind("bg_velocity_0", &v0.view, &v0.view),
            bind("bg_velocity_1", &v1.view, &v1.view),
        ];
        let bg_pressure = [
            bind("bg_pressure_0", &p0.view, &divergence.view),
            bind("bg_pressure_1", &p1.view, &divergence.view),
        ];
        let bg_gradient = [
            [
                bind("bg_gradient_00", &p0.view, &v0.view),
                bind("bg_gradient_01", &p0.view, &v1.view),
            ],
            [
                bind("bg_gradient_10", &p1.view, &v0.view),
                bind("bg_gradient_11", &p1.view, &v1.view),
            ],
        ];

        let texel = 1.0 / resolution as f32;
        Self {
            resolution,
            velocity,
            pressure,
            divergence,
            uniforms: SimUniforms {
                texel: [texel, texel],
                aspect: 1.0,
                ..Default::default()
            },
            uniform_buffer,
            pipelines,
            bg_velocity,
            bg_pressure,
            bg_gradient,
        }
    }

    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    /// Surface width over height, used to keep splats round.
    pub fn set_aspect(&mut self, aspect: f32) {
        if aspect.is_finite() && aspect > 0.0 {
            self.uniforms.aspect = aspect;
        }
    }

    /// Views of both velocity slots, for consumers that sample the field.
    pub fn velocity_views(&self) -> [&wgpu::TextureView; 2] {
        let [a, b] = self.velocity.slots();
        [&a.view, &b.view]
    }

    pub fn velocity_read_index(&self) -> usize {
        self.velocity.read_index()
    }

    /// Record passes into `encoder` through the [`FluidBackend`] interface.
    pub fn passes<'a>(&'a mut self, encoder: &'a mut wgpu::CommandEncoder) -> SimPasses<'a> {
        SimPasses { sim: self, encoder }
    }

    /// Upload the uniforms accumulated while recording. Must run before the
    /// recorded commands are submitted.
    pub fn flush_uniforms(&self, queue: &wgpu::Queue) {
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&self.uniforms));
    }
}

impl Drop for FluidSim {
    fn drop(&mut self) {
        for f in self.velocity.slots().iter().chain(self.pressure.slots()) {
            f.texture.destroy();
        }
        self.divergence.texture.destroy();
        self.uniform_buffer.destroy();
    }
}

/// Pass recorder borrowed for one frame.
pub struct SimPasses<'a> {
    sim: &'a mut FluidSim,
    encoder: &'a mut wgpu::CommandEncoder,
}

impl FluidBackend for SimPasses<'_> {
    fn splat(&mut self, splat: Splat, radius: f32) {
        let sim = &mut *self.sim;
        sim.uniforms.point = splat.point.to_array();
        sim.uniforms.force = splat.force.to_array();
        sim.uniforms.radius = radius;
        let v = sim.velocity.read_index();
        blit(
            self.encoder,
            "fluid_splat",
            &sim.velocity.write().view,
            wgpu::Color::TRANSPARENT,
            &sim.pipelines.splat,
            &sim.bg_velocity[v],
        );
        sim.velocity.swap();
    }

    fn advect(&mut self, dt: f32, dissipation: f32) {
        let sim = &mut *self.sim;
        sim.uniforms.dt = dt;
        sim.uniforms.dissipation = dissipation;
        let v = sim.velocity.read_index();
        blit(
            self.encoder,
            "fluid_advect",
            &sim.velocity.write().view,
            wgpu::Color::TRANSPARENT,
            &sim.pipelines.advect,
            &sim.bg_velocity[v],
        );
        sim.velocity.swap();
    }

    fn divergence(&mut self) {
        let sim = &mut *self.sim;
        let v = sim.velocity.read_index();
        blit(
            self.encoder,
            "fluid_divergence",
            &sim.divergence.view,
            wgpu::Color::TRANSPARENT,
            &sim.pipelines.divergence,
            &sim.bg_velocity[v],
        );
    }

    fn relax_pressure(&mut self) {
        let sim = &mut *self.sim;
        let p = sim.pressure.read_index();
        blit(
            self.encoder,
            "fluid_pressure",
            &sim.pressure.write().view,
            wgpu::Color::TRANSPARENT,
            &sim.pipelines.pressure,
            &sim.bg_pressure[p],
        );
        sim.pressure.swap();
    }

    fn subtract_gradient(&mut self) {
        let sim = &mut *self.sim;
        let p = sim.pressure.read_index();
        let v = sim.velocity.read_index();
        blit(
            self.encoder,
            "fluid_gradient",
            &sim.velocity.write().view,
            wgpu::Color::TRANSPARENT,
            &sim.pipelines.gradient,
            &sim.bg_gradient[p][v],
        );
        sim.velocity.swap();
    }
}

/// WebGPU fluid overlay: simulation plus the noise pass drawn to the canvas.
pub struct FluidRenderer {
    gpu: GpuContext,
    sim: FluidSim,
    noise: NoisePass,
}

impl FluidRenderer {
    pub async fn new(canvas: &web::HtmlCanvasElement, resolution: u32) -> anyhow::Result<Self> {
        let gpu = GpuContext::new(canvas).await?;
        let sim = FluidSim::new(&gpu.device, resolution);
        let noise = NoisePass::new(&gpu.device, gpu.format(), sim.velocity_views());
        log::info!("[fluid] gpu solver ready at {resolution}x{resolution}");
        Ok(Self { gpu, sim, noise })
    }

    /// Step the solver once and draw the overlay at `size` device pixels.
    pub fn frame(
        &mut self,
        controller: &mut FluidController,
        raw_dt: f32,
        size: (u32, u32),
    ) -> anyhow::Result<FluidFrame> {
        self.gpu.resize_if_needed(size.0, size.1);
        if size.1 > 0 {
            self.sim.set_aspect(size.0 as f32 / size.1 as f32);
        }
        let mut encoder = self
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("fluid_encoder"),
            });
        let frame = controller.frame(&mut self.sim.passes(&mut encoder), raw_dt);
        self.sim.flush_uniforms(&self.gpu.queue);

        let (w, h) = self.gpu.size();
        self.noise.write_uniforms(
            &self.gpu.queue,
            &NoiseUniforms::new([w as f32, h as f32], frame.pointer.to_array(), frame.time),
        );
        let surface = self.gpu.acquire()?;
        if let Some(surface) = &surface {
            let view = surface
                .texture
                .create_view(&wgpu::TextureViewDescriptor::default());
            self.noise
                .draw(&mut encoder, &view, self.sim.velocity_read_index());
        }
        self.gpu.queue.submit(Some(encoder.finish()));
        if let Some(surface) = surface {
            surface.present();
        }
        Ok(frame)
    }
}

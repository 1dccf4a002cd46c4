//! Main renderer managing wgpu state and drawing the smoke scene.

use anyhow::Result;
use procgen::ChimneyMesh;
use smoke::{FrameUniforms, GpuParticle, RenderFeed, RenderSink};
use std::sync::Arc;
use wgpu::util::DeviceExt;
use winit::window::Window;

use crate::pipeline::{
    create_chimney_pipeline, create_depth_view, create_frame_bind_group_layout,
    create_smoke_pipeline,
};
use crate::vertex::{SceneLighting, BILLBOARD_VERTICES, SKY_COLOR};

/// Chimney geometry on the GPU.
struct ChimneyBuffers {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    num_indices: u32,
}

/// Billboards drawn this frame; records past the instance buffer are dropped.
fn visible_instances(records: usize, max_instances: u32) -> u32 {
    u32::try_from(records).map_or(max_instances, |n| n.min(max_instances))
}

/// Draws the chimney and the smoke billboards into a window.
pub struct SmokeRenderer {
    pub window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,

    chimney_pipeline: wgpu::RenderPipeline,
    smoke_pipeline: wgpu::RenderPipeline,

    frame_buffer: wgpu::Buffer,
    frame_bind_group: wgpu::BindGroup,
    depth_view: wgpu::TextureView,

    chimney: Option<ChimneyBuffers>,
    /// One [`GpuParticle`] per slot of the particle pool.
    instance_buffer: wgpu::Buffer,
    max_instances: u32,

    base_title: String,
    shown_count: Option<usize>,
}

impl SmokeRenderer {
    /// Create a renderer for `window` with room for `max_particles` billboards.
    pub async fn new(window: Arc<Window>, max_particles: usize, title: &str) -> Result<Self> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance.create_surface(window.clone())?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("Failed to find suitable GPU adapter"))?;

        log::info!("Using GPU: {:?}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Main Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: Default::default(),
                },
                None,
            )
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .or_else(|| surface_caps.formats.first().copied())
            .ok_or_else(|| anyhow::anyhow!("Surface reports no texture formats"))?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let present_mode = surface_caps
            .present_modes
            .iter()
            .find(|m| matches!(m, wgpu::PresentMode::Mailbox))
            .copied()
            .unwrap_or(wgpu::PresentMode::AutoVsync);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 1,
        };
        surface.configure(&device, &config);

        let frame_layout = create_frame_bind_group_layout(&device);
        let frame_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Frame Uniform Buffer"),
            size: std::mem::size_of::<FrameUniforms>() as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let lighting_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Lighting Buffer"),
            contents: bytemuck::bytes_of(&SceneLighting::default()),
            usage: wgpu::BufferUsages::UNIFORM,
        });
        let frame_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Frame Bind Group"),
            layout: &frame_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: frame_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: lighting_buffer.as_entire_binding(),
                },
            ],
        });

        let chimney_pipeline = create_chimney_pipeline(&device, &frame_layout, surface_format);
        let smoke_pipeline = create_smoke_pipeline(&device, &frame_layout, surface_format);

        let max_instances = u32::try_from(max_particles.max(1))?;
        let instance_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Particle Instance Buffer"),
            size: u64::from(max_instances) * std::mem::size_of::<GpuParticle>() as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let depth_view = create_depth_view(&device, config.width, config.height);

        Ok(Self {
            window,
            surface,
            device,
            queue,
            config,
            chimney_pipeline,
            smoke_pipeline,
            frame_buffer,
            frame_bind_group,
            depth_view,
            chimney: None,
            instance_buffer,
            max_instances,
            base_title: title.to_string(),
            shown_count: None,
        })
    }

    /// Resize the surface and depth buffer.
    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
            self.depth_view = create_depth_view(&self.device, self.config.width, self.config.height);
        }
    }

    /// Clear to sky, draw the chimney, then blend the smoke over it.
    pub fn draw(
        &mut self,
        feed: &RenderFeed,
        uniforms: &FrameUniforms,
    ) -> Result<(), wgpu::SurfaceError> {
        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.queue
            .write_buffer(&self.frame_buffer, 0, bytemuck::bytes_of(uniforms));

        let instance_count = visible_instances(feed.len(), self.max_instances);
        if instance_count > 0 {
            self.queue.write_buffer(
                &self.instance_buffer,
                0,
                bytemuck::cast_slice(&feed.records()[..instance_count as usize]),
            );
        }

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(SKY_COLOR),
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

            render_pass.set_bind_group(0, &self.frame_bind_group, &[]);

            if let Some(chimney) = &self.chimney {
                render_pass.set_pipeline(&self.chimney_pipeline);
                render_pass.set_vertex_buffer(0, chimney.vertex_buffer.slice(..));
                render_pass
                    .set_index_buffer(chimney.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                render_pass.draw_indexed(0..chimney.num_indices, 0, 0..1);
            }

            if instance_count > 0 {
                render_pass.set_pipeline(&self.smoke_pipeline);
                render_pass.set_vertex_buffer(0, self.instance_buffer.slice(..));
                render_pass.draw(0..BILLBOARD_VERTICES, 0..instance_count);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }

    fn update_title(&mut self, count: usize) {
        // set_title is a round trip to the compositor; skip it when nothing changed.
        if self.shown_count != Some(count) {
            self.shown_count = Some(count);
            self.window
                .set_title(&format!("{} | {} particles", self.base_title, count));
        }
    }
}

impl RenderSink for SmokeRenderer {
    fn upload_chimney(&mut self, mesh: &ChimneyMesh) {
        let vertex_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Chimney Vertex Buffer"),
                contents: mesh.vertex_bytes(),
                usage: wgpu::BufferUsages::VERTEX,
            });
        let index_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Chimney Index Buffer"),
                contents: mesh.index_bytes(),
                usage: wgpu::BufferUsages::INDEX,
            });
        log::debug!(
            "Chimney uploaded: {} vertices, {} indices",
            mesh.vertices.len(),
            mesh.indices.len()
        );
        self.chimney = Some(ChimneyBuffers {
            vertex_buffer,
            index_buffer,
            num_indices: mesh.indices.len() as u32,
        });
    }

    fn submit(&mut self, feed: &RenderFeed, uniforms: &FrameUniforms) {
        match self.draw(feed, uniforms) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.surface.configure(&self.device, &self.config);
            }
            Err(wgpu::SurfaceError::Timeout) => {
                log::warn!("Surface timeout, skipping frame");
            }
            Err(e) => {
                log::error!("Render error: {:?}", e);
            }
        }
        self.update_title(feed.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instance_count_is_clamped_to_the_buffer() {
        assert_eq!(visible_instances(0, 1000), 0);
        assert_eq!(visible_instances(640, 1000), 640);
        assert_eq!(visible_instances(1500, 1000), 1000);
    }

    #[test]
    fn instance_buffer_holds_whole_records() {
        assert_eq!(std::mem::size_of::<GpuParticle>(), 20);
        assert_eq!(std::mem::size_of::<FrameUniforms>(), 176);
    }
}

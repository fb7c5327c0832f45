use anyhow::{Context, Result};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::device::{Gpu, GpuInit, SurfaceErrorAction};
use crate::engine::Engine;
use crate::hooks::LoopControl;
use crate::image::unpack_rgba;
use crate::logging;
use crate::render::{ImageRenderer, RenderCtx, RenderTarget};
use crate::time::FrameClock;

/// Window parameters.
///
/// Sizes are physical pixels; one image pixel covers one window pixel.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub resizable: bool,
    /// Background as packed `0xRRGGBBAA`.
    pub clear_color: u32,
}

impl RuntimeConfig {
    pub fn new(title: impl Into<String>, width: u32, height: u32, resizable: bool) -> Self {
        Self {
            title: title.into(),
            width,
            height,
            resizable,
            ..Self::default()
        }
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "tessera".to_string(),
            width: 800,
            height: 600,
            resizable: false,
            clear_color: 0x000000FF,
        }
    }
}

/// Drives one window: per frame, runs the engine's hooks, then draws its
/// render queue.
pub struct Runtime;

impl Runtime {
    /// Blocks until the window closes or a hook calls `quit`.
    ///
    /// The engine keeps its images afterwards; GPU resources are released
    /// before this returns.
    pub fn run(config: RuntimeConfig, gpu_init: GpuInit, engine: &mut Engine) -> Result<()> {
        anyhow::ensure!(
            config.width > 0 && config.height > 0,
            "window size must be non-zero, got {}x{}",
            config.width,
            config.height
        );

        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = LoopState {
            config,
            gpu_init,
            engine,
            window: None,
            error: None,
        };

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        state.window = None;
        match state.error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

#[self_referencing]
struct WindowEntry {
    clock: FrameClock,
    renderer: ImageRenderer,

    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

struct LoopState<'e> {
    config: RuntimeConfig,
    gpu_init: GpuInit,
    engine: &'e mut Engine,
    window: Option<WindowEntry>,
    error: Option<anyhow::Error>,
}

impl LoopState<'_> {
    fn open_window(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(PhysicalSize::new(self.config.width, self.config.height))
            .with_resizable(self.config.resizable);

        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;

        let gpu_init = self.gpu_init.clone();
        let entry = WindowEntryTryBuilder {
            clock: FrameClock::new(),
            renderer: ImageRenderer::new(),
            window,
            gpu_builder: |w| pollster::block_on(Gpu::new(w, gpu_init)),
        }
        .try_build()
        .context("GPU initialization failed")?;

        entry.with_window(|w| w.request_redraw());
        self.window = Some(entry);
        log::info!(
            "window \"{}\" opened ({}x{})",
            self.config.title,
            self.config.width,
            self.config.height
        );
        Ok(())
    }

    /// Runs hooks and draws one frame.
    fn frame(&mut self) -> LoopControl {
        let Some(entry) = self.window.as_mut() else {
            return LoopControl::Exit;
        };
        let engine = &mut *self.engine;
        let clear = clear_color(self.config.clear_color);

        entry.with_mut(|fields| {
            let time = fields.clock.tick();
            let control = engine.run_hooks(time);

            let gpu = fields.gpu;
            let size = gpu.size();
            if size.width == 0 || size.height == 0 {
                return control;
            }

            let mut frame = match gpu.begin_frame() {
                Ok(frame) => frame,
                Err(err) => {
                    if gpu.handle_surface_error(err) == SurfaceErrorAction::Fatal {
                        logging::fatal("GPU ran out of memory acquiring a frame");
                    }
                    return control;
                }
            };

            {
                let _clear = frame.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("tessera clear"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &frame.view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Clear(clear),
                            store: wgpu::StoreOp::Store,
                        },
                        depth_slice: None,
                    })],
                    depth_stencil_attachment: None,
                    timestamp_writes: None,
                    occlusion_query_set: None,
                    multiview_mask: None,
                });
            }

            let ctx = RenderCtx::new(
                gpu.device(),
                gpu.queue(),
                gpu.surface_format(),
                [size.width, size.height],
            );
            let mut target = RenderTarget::new(&mut frame.encoder, &frame.view);
            fields
                .renderer
                .render(&ctx, &mut target, engine.compositor_mut());

            gpu.submit(frame);
            control
        })
    }
}

impl ApplicationHandler for LoopState<'_> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.open_window(event_loop) {
            log::error!("{e:#}");
            self.error = Some(e);
            event_loop.exit();
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        event_loop.set_control_flow(ControlFlow::Wait);
        if let Some(entry) = self.window.as_ref() {
            entry.with_window(|w| w.request_redraw());
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                log::info!("window closed");
                self.window = None;
                event_loop.exit();
            }

            WindowEvent::Resized(new_size) => {
                if let Some(entry) = self.window.as_mut() {
                    entry.with_gpu_mut(|gpu| gpu.resize(new_size));
                    entry.with_window(|w| w.request_redraw());
                }
            }

            WindowEvent::RedrawRequested => {
                if self.frame() == LoopControl::Exit {
                    self.window = None;
                    event_loop.exit();
                }
            }

            _ => {}
        }
    }
}

/// Packed sRGB color to the linear clear value an sRGB surface expects.
fn clear_color(packed: u32) -> wgpu::Color {
    let [r, g, b, a] = unpack_rgba(packed);
    let linear = |c: u8| {
        let c = c as f64 / 255.0;
        if c <= 0.04045 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    };
    wgpu::Color {
        r: linear(r),
        g: linear(g),
        b: linear(b),
        a: a as f64 / 255.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clear_color_endpoints() {
        let black = clear_color(0x000000FF);
        assert_eq!((black.r, black.g, black.b, black.a), (0.0, 0.0, 0.0, 1.0));

        let white = clear_color(0xFFFFFF00);
        assert!((white.r - 1.0).abs() < 1e-9);
        assert_eq!(white.a, 0.0);
    }

    #[test]
    fn config_new_keeps_defaults() {
        let config = RuntimeConfig::new("demo", 320, 200, true);
        assert_eq!((config.width, config.height, config.resizable), (320, 200, true));
        assert_eq!(config.clear_color, RuntimeConfig::default().clear_color);
    }
}

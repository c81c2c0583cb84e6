//! Native preview window.
//!
//! Stands in for the browser page: the mouse wheel scrolls a virtual page
//! three viewports tall, cursor movement is fed to the pointer mapping, and
//! window resizes update the camera and surface.

use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, Event, MouseScrollDelta, WindowEvent};
use winit::event_loop::EventLoop;
use winit::keyboard::{Key, NamedKey};
use winit::window::WindowBuilder;

use crate::config::SceneConfig;
use crate::gpu::renderer::Renderer;
use crate::scene_state::SceneState;

/// Pixels scrolled per wheel line.
const LINE_HEIGHT: f32 = 40.0;

/// Virtual page height in viewports; far enough to reach the pointer gate.
const PAGE_VIEWPORTS: f32 = 3.0;

pub fn run(config: SceneConfig, width: u32, height: u32) -> Result<()> {
    let event_loop = EventLoop::new()?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title("igloo-scene")
            .with_inner_size(PhysicalSize::new(width, height))
            .build(&event_loop)?,
    );

    let instance = wgpu::Instance::new(wgpu::InstanceDescriptor::default());
    let surface = instance.create_surface(window.clone())?;
    let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
        power_preference: wgpu::PowerPreference::default(),
        compatible_surface: Some(&surface),
        force_fallback_adapter: false,
    }))
    .ok_or_else(|| anyhow::anyhow!("No adapter found"))?;
    let (device, queue) = pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor::default(), None))?;

    let size = window.inner_size();
    let caps = surface.get_capabilities(&adapter);
    let format = caps
        .formats
        .iter()
        .copied()
        .find(|f| f.is_srgb())
        .or_else(|| caps.formats.first().copied())
        .ok_or_else(|| anyhow::anyhow!("Surface reports no formats"))?;
    let mut surface_config = wgpu::SurfaceConfiguration {
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        format,
        width: size.width.max(1),
        height: size.height.max(1),
        present_mode: wgpu::PresentMode::Fifo,
        alpha_mode: caps.alpha_modes[0],
        view_formats: vec![],
        desired_maximum_frame_latency: 2,
    };
    surface.configure(&device, &surface_config);

    let mut state = SceneState::new(config, surface_config.width as f32, surface_config.height as f32);
    let mut renderer = Renderer::new(device, queue, format, surface_config.width, surface_config.height, &state);
    let mut scroll_y = 0.0_f32;
    let mut last_frame = Instant::now();

    log::info!("Preview open: scroll with the mouse wheel, Escape to quit");

    event_loop.run(move |event, elwt| match event {
        Event::WindowEvent { event, .. } => match event {
            WindowEvent::CloseRequested => elwt.exit(),
            WindowEvent::KeyboardInput { event, .. }
                if event.state == ElementState::Pressed
                    && event.logical_key == Key::Named(NamedKey::Escape) =>
            {
                elwt.exit()
            }
            WindowEvent::Resized(new_size) => {
                if new_size.width > 0 && new_size.height > 0 {
                    surface_config.width = new_size.width;
                    surface_config.height = new_size.height;
                    surface.configure(renderer.device(), &surface_config);
                    renderer.resize(new_size.width, new_size.height);
                    state.resize(new_size.width as f32, new_size.height as f32);
                }
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let dy = match delta {
                    MouseScrollDelta::LineDelta(_, y) => -y * LINE_HEIGHT,
                    MouseScrollDelta::PixelDelta(pos) => -pos.y as f32,
                };
                let h = surface_config.height as f32;
                scroll_y = (scroll_y + dy).clamp(0.0, h * (PAGE_VIEWPORTS - 1.0));
                state.on_scroll(scroll_y, h);
            }
            WindowEvent::CursorMoved { position, .. } => {
                state.on_pointer_move(position.x as f32, position.y as f32);
            }
            WindowEvent::RedrawRequested => {
                let now = Instant::now();
                let dt = now.duration_since(last_frame).as_secs_f32();
                last_frame = now;
                state.update(dt);

                match surface.get_current_texture() {
                    Ok(output) => {
                        let view = output.texture.create_view(&wgpu::TextureViewDescriptor::default());
                        renderer.render(&view, &state);
                        output.present();
                    }
                    Err(wgpu::SurfaceError::Lost) | Err(wgpu::SurfaceError::Outdated) => {
                        surface.configure(renderer.device(), &surface_config);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Surface out of memory");
                        elwt.exit();
                    }
                    Err(e) => {
                        log::warn!("Surface error: {:?}", e);
                    }
                }
            }
            _ => {}
        },
        Event::AboutToWait => window.request_redraw(),
        _ => {}
    })?;

    Ok(())
}

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use crate::config::SceneConfig;
use crate::gpu::renderer::Renderer;
use crate::scene_state::SceneState;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// JSON scene configuration (partial documents are filled with defaults)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args)]
struct ScrollPath {
    /// Scroll offsets (pixels) visited in order
    #[arg(long, value_delimiter = ',', default_value = "0,800,1600,2400")]
    offsets: Vec<f32>,

    /// Seconds spent at each offset before moving to the next
    #[arg(long, default_value_t = 1.5)]
    hold: f32,

    /// Viewport width
    #[arg(long, default_value_t = 800)]
    width: u32,

    /// Viewport height
    #[arg(long, default_value_t = 600)]
    height: u32,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a scroll path to PNG frames
    Render {
        /// Output directory for frames
        #[arg(long)]
        out: PathBuf,

        /// Frames per second
        #[arg(long, default_value_t = 60.0)]
        fps: f32,

        #[command(flatten)]
        path: ScrollPath,
    },
    /// Print the scene state after each stop of a scroll path as JSON lines
    Trace {
        /// Simulation step in seconds
        #[arg(long, default_value_t = 1.0 / 60.0)]
        step: f32,

        #[command(flatten)]
        path: ScrollPath,
    },
    /// Open an interactive preview window (mouse wheel scrolls, cursor drives the pointer)
    Preview {
        #[arg(long, default_value_t = 1280)]
        width: u32,

        #[arg(long, default_value_t = 720)]
        height: u32,
    },
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Render { out, fps, path } => {
            pollster::block_on(render_offline(config, &path, &out, fps))?;
        }
        Commands::Trace { step, path } => {
            trace(config, &path, step)?;
        }
        Commands::Preview { width, height } => {
            crate::preview::run(config, width, height)?;
        }
    }
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<SceneConfig> {
    match path {
        Some(path) => {
            let config = SceneConfig::from_file(path)?;
            log::info!("Loaded scene config from {:?}", path);
            Ok(config)
        }
        None => Ok(SceneConfig::default()),
    }
}

fn validate_path(path: &ScrollPath) -> Result<()> {
    if path.width == 0 || path.height == 0 {
        anyhow::bail!("Viewport must be non-empty, got {}x{}", path.width, path.height);
    }
    if path.offsets.is_empty() {
        anyhow::bail!("At least one scroll offset is required");
    }
    if !(path.hold > 0.0) {
        anyhow::bail!("--hold must be positive");
    }
    Ok(())
}

fn trace(config: SceneConfig, path: &ScrollPath, step: f32) -> Result<()> {
    validate_path(path)?;
    if !(step > 0.0) {
        anyhow::bail!("--step must be positive");
    }

    let mut state = SceneState::new(config, path.width as f32, path.height as f32);
    let steps = (path.hold / step).ceil() as usize;

    for &offset in &path.offsets {
        state.on_scroll(offset, path.height as f32);
        for _ in 0..steps {
            state.update(step);
        }
        println!("{}", serde_json::to_string(&state.snapshot())?);
    }
    Ok(())
}

async fn render_offline(config: SceneConfig, path: &ScrollPath, out_dir: &Path, fps: f32) -> Result<()> {
    validate_path(path)?;
    if !(fps > 0.0) {
        anyhow::bail!("--fps must be positive");
    }
    let (width, height) = (path.width, path.height);
    let frames_per_stop = (path.hold * fps).ceil() as usize;
    let total_frames = frames_per_stop * path.offsets.len();
    let dt = 1.0 / fps;

    std::fs::create_dir_all(out_dir)?;

    // WGPU Init
    let instance = wgpu::Instance::new(wgpu::InstanceDescriptor::default());
    let adapter = instance
        .request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: None, // Headless
            force_fallback_adapter: false,
        })
        .await
        .ok_or_else(|| anyhow::anyhow!("No adapter found"))?;

    let (device, queue) = adapter
        .request_device(&wgpu::DeviceDescriptor::default(), None)
        .await?;

    let texture_desc = wgpu::TextureDescriptor {
        label: Some("Target Texture"),
        size: wgpu::Extent3d { width, height, depth_or_array_layers: 1 },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8UnormSrgb,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
        view_formats: &[],
    };

    let texture = device.create_texture(&texture_desc);
    let texture_view = texture.create_view(&wgpu::TextureViewDescriptor::default());

    // Rows in the readback buffer are padded to 256 bytes
    let unpadded_bytes_per_row = 4 * width;
    let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
    let padded_bytes_per_row = unpadded_bytes_per_row.div_ceil(align) * align;

    let output_buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Output Buffer"),
        size: (padded_bytes_per_row * height) as wgpu::BufferAddress,
        usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
        mapped_at_creation: false,
    });

    let mut state = SceneState::new(config, width as f32, height as f32);
    let mut renderer = Renderer::new(device, queue, texture_desc.format, width, height, &state);

    log::info!("Rendering {} frames to {:?}", total_frames, out_dir);

    let mut frame = 0usize;
    for &offset in &path.offsets {
        state.on_scroll(offset, height as f32);

        for _ in 0..frames_per_stop {
            state.update(dt);
            renderer.render(&texture_view, &state);

            let mut encoder = renderer
                .device()
                .create_command_encoder(&wgpu::CommandEncoderDescriptor { label: Some("Readback Encoder") });
            encoder.copy_texture_to_buffer(
                wgpu::ImageCopyTexture {
                    texture: &texture,
                    mip_level: 0,
                    origin: wgpu::Origin3d::ZERO,
                    aspect: wgpu::TextureAspect::All,
                },
                wgpu::ImageCopyBuffer {
                    buffer: &output_buffer,
                    layout: wgpu::ImageDataLayout {
                        offset: 0,
                        bytes_per_row: Some(padded_bytes_per_row),
                        rows_per_image: Some(height),
                    },
                },
                texture_desc.size,
            );
            renderer.queue().submit(Some(encoder.finish()));

            let buffer_slice = output_buffer.slice(..);
            let (tx, rx) = std::sync::mpsc::channel();
            buffer_slice.map_async(wgpu::MapMode::Read, move |v| {
                let _ = tx.send(v);
            });
            renderer.device().poll(wgpu::Maintain::Wait);
            rx.recv()??;

            let data = buffer_slice.get_mapped_range();
            let mut unpadded = Vec::with_capacity((unpadded_bytes_per_row * height) as usize);
            for row in 0..height {
                let start = (row * padded_bytes_per_row) as usize;
                unpadded.extend_from_slice(&data[start..start + unpadded_bytes_per_row as usize]);
            }

            let frame_path = out_dir.join(format!("frame_{:05}.png", frame));
            image::save_buffer(&frame_path, &unpadded, width, height, image::ColorType::Rgba8)?;

            drop(data);
            output_buffer.unmap();

            if frame % 60 == 0 {
                log::info!("frame {}/{} (scroll_y={})", frame, total_frames, offset);
            }
            frame += 1;
        }
    }
    log::info!("Done.");

    Ok(())
}

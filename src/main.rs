//! Headless scene driver.
//!
//! Builds the scene from a config and an asset directory, then runs the
//! per-frame update loop at a fixed step.
//!
//! Usage: cargo run --release -- [OPTIONS]
//!
//! Options:
//!   --config <PATH>   Scene config JSON (default: built-in scene)
//!   --assets <DIR>    Asset root holding models/ and textures/ (default: "public")
//!   --frames <N>      Frames to simulate (default: 600)
//!   --fps <HZ>        Fixed step rate (default: 60)
//!   --grass <N>       Visible grass blades after generation
//!   --dump <PATH>     Write every placement as JSON
//!   --gpu             Compile programs and stream uniforms on a headless device

use std::path::PathBuf;

use grove::assets::FsAssetLoader;
use grove::core::logging;
use grove::core::time::SceneClock;
use grove::core::Result;
use grove::render::buffer::{CameraUniform, FogUniform, LightUniform};
use grove::render::{GpuContext, InstanceGpuBuffer, LitPipeline, SceneBuffer, WindUniformBuffer};
use grove::scene::{SceneConfig, TreeScene};

struct Args {
    config: Option<PathBuf>,
    assets: PathBuf,
    frames: u64,
    fps: f32,
    grass: Option<usize>,
    dump: Option<PathBuf>,
    gpu: bool,
}

impl Args {
    fn parse() -> Self {
        let args: Vec<String> = std::env::args().collect();
        Self {
            config: parse_str_arg(&args, "--config").map(PathBuf::from),
            assets: parse_str_arg(&args, "--assets").map_or_else(|| PathBuf::from("public"), PathBuf::from),
            frames: parse_arg(&args, "--frames").unwrap_or(600),
            fps: parse_arg(&args, "--fps").unwrap_or(60.0),
            grass: parse_arg(&args, "--grass"),
            dump: parse_str_arg(&args, "--dump").map(PathBuf::from),
            gpu: args.iter().any(|a| a == "--gpu"),
        }
    }
}

fn parse_arg<T: std::str::FromStr>(args: &[String], flag: &str) -> Option<T> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
}

fn parse_str_arg(args: &[String], flag: &str) -> Option<String> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .cloned()
}

const TARGET_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;
const TARGET_SIZE: (u32, u32) = (320, 180);

/// GPU resources mirroring the scene: one pipeline per material, wind
/// uniform buffers for shaded ones, instance buffers for grass and rocks,
/// and an offscreen target cleared to the sky colour each frame.
struct GpuMirror {
    gpu: GpuContext,
    scene_buffer: SceneBuffer,
    camera: CameraUniform,
    light: LightUniform,
    fog: FogUniform,
    sky: wgpu::Color,
    target: wgpu::TextureView,
    pipelines: Vec<LitPipeline>,
    wind_buffers: Vec<WindUniformBuffer>,
    instance_buffers: Vec<InstanceGpuBuffer>,
}

impl GpuMirror {
    async fn new(scene: &TreeScene) -> Result<Self> {
        let gpu = GpuContext::headless().await?;
        let scene_buffer = SceneBuffer::new(&gpu.device);

        let mut pipelines = Vec::new();
        let mut wind_buffers = Vec::new();
        let materials = scene
            .scene_materials()
            .into_iter()
            .map(|m| (m.material(), m.wind()))
            .chain(scene.environment.ground.material().map(|m| (m, None)));
        for (material, wind) in materials {
            pipelines.push(LitPipeline::new(
                &gpu.device,
                TARGET_FORMAT,
                scene_buffer.bind_group_layout(),
                material,
            )?);
            if let Some(wind) = wind {
                wind_buffers.push(WindUniformBuffer::new(&gpu.device, &material.name, wind));
            }
        }

        let instanced = scene
            .environment
            .grass
            .blades()
            .into_iter()
            .chain(scene.environment.rocks.meshes());
        let mut instance_buffers = Vec::new();
        for mesh in instanced {
            let mut buf = InstanceGpuBuffer::new(&gpu.device, &mesh.label, mesh.instances.capacity());
            buf.upload(&gpu.queue, &mesh.instances);
            instance_buffers.push(buf);
        }

        log::info!(
            "GPU: {} pipelines, {} wind buffers, {} instances uploaded",
            pipelines.len(),
            wind_buffers.len(),
            instance_buffers.iter().map(|b| b.count()).sum::<u32>()
        );

        let target = gpu
            .device
            .create_texture(&wgpu::TextureDescriptor {
                label: Some("offscreen_target"),
                size: wgpu::Extent3d {
                    width: TARGET_SIZE.0,
                    height: TARGET_SIZE.1,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: TARGET_FORMAT,
                usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
                view_formats: &[],
            })
            .create_view(&wgpu::TextureViewDescriptor::default());
        let background = scene.config().sky.background_rgb();

        Ok(Self {
            gpu,
            scene_buffer,
            camera: CameraUniform::default(),
            light: LightUniform::from_config(scene.config()),
            fog: FogUniform::from_config(scene.config()),
            sky: wgpu::Color {
                r: background.x as f64,
                g: background.y as f64,
                b: background.z as f64,
                a: 1.0,
            },
            target,
            pipelines,
            wind_buffers,
            instance_buffers,
        })
    }

    fn frame(&self) {
        self.scene_buffer.update(&self.gpu.queue, &self.camera, &self.light, &self.fog);
        for buf in &self.wind_buffers {
            buf.write(&self.gpu.queue);
        }

        let mut encoder = self.gpu.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("frame_encoder"),
        });
        // Geometry is decoded elsewhere; the pass only clears to the sky
        let pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("sky_clear_pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &self.target,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(self.sky),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });
        drop(pass);
        self.gpu.queue.submit([encoder.finish()]);
    }
}

async fn run(args: Args) -> Result<()> {
    let config = match &args.config {
        Some(path) => SceneConfig::load(path)?,
        None => SceneConfig::default(),
    };

    log::info!("Building scene from assets in {}", args.assets.display());
    let mut scene = TreeScene::build(config, FsAssetLoader::new(&args.assets)).await?;
    if let Some(count) = args.grass {
        scene.environment.grass.set_instance_count(count);
    }

    let stats = scene.stats();
    log::info!(
        "Scene: {}/{} grass, {} flowers, {} rocks, {} trees, {} shaded materials, ground {}",
        stats.grass_visible,
        stats.grass_written,
        stats.flowers,
        stats.rocks,
        stats.trees,
        stats.shaded_materials,
        if stats.ground_ready { "ready" } else { "missing" }
    );

    if let Some(path) = &args.dump {
        scene.placements().write_json(path)?;
        log::info!("Wrote placements to {}", path.display());
    }

    let gpu = if args.gpu {
        Some(GpuMirror::new(&scene).await?)
    } else {
        None
    };

    let mut clock = SceneClock::fixed(args.fps);
    for _ in 0..args.frames {
        let elapsed = clock.tick();
        scene.update(elapsed);
        if let Some(gpu) = &gpu {
            gpu.frame();
        }
        if clock.frame_count() % (args.fps.max(1.0) as u64) == 0 {
            log::debug!("t = {:.2}s, frame {}", elapsed, clock.frame_count());
        }
    }

    if let Some(gpu) = &gpu {
        gpu.gpu.wait_idle();
        log::info!(
            "GPU: streamed {} frames through {} pipelines ({} instance buffers)",
            clock.frame_count(),
            gpu.pipelines.len(),
            gpu.instance_buffers.len()
        );
    }

    log::info!("Simulated {:.2}s over {} frames", clock.elapsed_secs(), clock.frame_count());
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    logging::init();

    if let Err(e) = run(Args::parse()).await {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

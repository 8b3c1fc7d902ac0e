use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use sphere_tracing_lib::{
    application::{AppState, Application, Layer, Screen, WindowSettings},
    config::{load_scene, RenderConfig},
    controller::{apply_command, SceneController},
    frame::{render_frame, CanvasSize, ImageSink},
    renderer::{IndexBuffer, Vertex, VertexBuffer, QUAD_INDICES, QUAD_VERTICES},
    scene::Scene,
    texture::Texture,
};
use wgpu::{
    include_wgsl, CommandEncoderDescriptor, PipelineLayoutDescriptor, RenderPassColorAttachment,
    RenderPassDescriptor, RenderPipelineDescriptor, TextureViewDescriptor,
};
use winit::event::{Event, WindowEvent};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Trace => write!(f, "trace"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Error => write!(f, "error"),
        }
    }
}

#[derive(Parser)]
#[command(name = "sphere_tracing")]
#[command(version)]
#[command(about = "Recursive ray tracer for scenes made of spheres")]
struct Cli {
    /// Scene file (TOML). The built-in demo scene is used when omitted
    #[arg(short, long, global = true)]
    scene: Option<PathBuf>,

    /// Reflection recursion depth, clamped to 0..=5
    #[arg(short, long, global = true, default_value_t = 3, allow_negative_numbers = true)]
    depth: i64,

    /// Canvas width in pixels
    #[arg(long, global = true, default_value_t = 600)]
    width: u32,

    /// Canvas height in pixels
    #[arg(long, global = true, default_value_t = 600)]
    height: u32,

    /// Set logging level (trace, debug, info, warn, error)
    #[arg(long, global = true, value_name = "LEVEL")]
    log_level: Option<LogLevel>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a single frame to a PNG file
    Render {
        #[arg(short, long, default_value = "frame.png")]
        output: PathBuf,
    },

    /// Open a window and move the first sphere with W/A/S/D and PageUp/PageDown
    View,
}

struct ViewerInit {
    scene: Scene,
    config: RenderConfig,
    canvas: CanvasSize,
}

struct RayTracingViewer {
    scene: Scene,
    config: RenderConfig,
    controller: SceneController,
    sink: ImageSink,
    uploaded_frames: u64,
    render_pipeline: wgpu::RenderPipeline,
    vertex_buffer: VertexBuffer,
    index_buffer: IndexBuffer,
    texture: Texture,
    frame_bind_group: wgpu::BindGroup,
}

impl RayTracingViewer {
    fn rerender(&mut self) {
        let canvas = self.sink.canvas();
        render_frame(&self.scene, &self.config, canvas, &mut self.sink);
    }
}

impl Layer for RayTracingViewer {
    type Init = ViewerInit;
    type LayerErr = ();

    fn start(init: ViewerInit, screen: &mut Screen, _app: &AppState) -> Self {
        let ViewerInit {
            scene,
            config,
            canvas,
        } = init;

        let mut sink = ImageSink::new(canvas);
        render_frame(&scene, &config, canvas, &mut sink);

        let shader = screen
            .device
            .create_shader_module(include_wgsl!("asset/shader/frame.wgsl"));

        let vertex_buffer =
            VertexBuffer::init_immediate(&screen.device, QUAD_VERTICES, Some("Vertex Buffer"));
        let index_buffer =
            IndexBuffer::init_immediate_u16(&screen.device, QUAD_INDICES, Some("Index Buffer"));

        let texture = Texture::from_image(
            &screen.device,
            &screen.queue,
            sink.image(),
            Some("Frame texture"),
        );

        let texture_bind_group_layout =
            screen
                .device
                .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                    entries: &[
                        wgpu::BindGroupLayoutEntry {
                            binding: 0,
                            visibility: wgpu::ShaderStages::FRAGMENT,
                            ty: wgpu::BindingType::Texture {
                                multisampled: false,
                                view_dimension: wgpu::TextureViewDimension::D2,
                                sample_type: wgpu::TextureSampleType::Float { filterable: true },
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
                    label: Some("frame_bind_group_layout"),
                });

        let frame_bind_group = screen.device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &texture_bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&texture.view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&texture.sampler),
                },
            ],
            label: Some("frame_bind_group"),
        });

        let render_pipeline_layout =
            screen
                .device
                .create_pipeline_layout(&PipelineLayoutDescriptor {
                    label: Some("Render Pipeline Layout"),
                    bind_group_layouts: &[&texture_bind_group_layout],
                    push_constant_ranges: &[],
                });

        let render_pipeline = screen
            .device
            .create_render_pipeline(&RenderPipelineDescriptor {
                label: Some("Render Pipeline"),
                layout: Some(&render_pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: "vs_main",
                    buffers: &[Vertex::layout()],
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: "fs_main",
                    targets: &[Some(wgpu::ColorTargetState {
                        format: screen.config.format,
                        blend: Some(wgpu::BlendState::REPLACE),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    strip_index_format: None,
                    front_face: wgpu::FrontFace::Ccw,
                    cull_mode: Some(wgpu::Face::Back),
                    polygon_mode: wgpu::PolygonMode::Fill,
                    unclipped_depth: false,
                    conservative: false,
                },
                depth_stencil: None,
                multisample: wgpu::MultisampleState {
                    count: 1,
                    mask: !0,
                    alpha_to_coverage_enabled: false,
                },
                multiview: None,
            });

        let uploaded_frames = sink.frames();
        Self {
            scene,
            config,
            controller: SceneController::default(),
            sink,
            uploaded_frames,
            render_pipeline,
            vertex_buffer,
            index_buffer,
            texture,
            frame_bind_group,
        }
    }

    fn process_event(&mut self, event: &Event<()>, screen: &mut Screen) {
        let Event::WindowEvent { event, .. } = event else {
            return;
        };
        if let WindowEvent::KeyboardInput { .. } = event {
            if let Some(command) = self.controller.process_events(event) {
                // the whole frame is redrawn before the next event is looked at
                if apply_command(&mut self.scene, &mut self.config, command) {
                    self.rerender();
                    screen.window().request_redraw();
                }
            }
        }
    }

    fn update(&mut self, _app: &AppState, screen: &mut Screen) {
        if self.sink.frames() != self.uploaded_frames {
            self.texture.update_data(&screen.queue, self.sink.image());
            self.uploaded_frames = self.sink.frames();
        }
    }

    fn render(&mut self, _app: &AppState, screen: &mut Screen) -> Result<(), wgpu::SurfaceError> {
        let output = screen.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&TextureViewDescriptor::default());
        let mut encoder = screen
            .device
            .create_command_encoder(&CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: true,
                    },
                })],
                depth_stencil_attachment: None,
            });

            render_pass.set_pipeline(&self.render_pipeline);
            render_pass.set_bind_group(0, &self.frame_bind_group, &[]);
            render_pass.set_vertex_buffer(0, self.vertex_buffer.buffer().slice(..));
            render_pass.set_index_buffer(
                self.index_buffer.buffer().slice(..),
                self.index_buffer.format(),
            );
            render_pass.draw_indexed(0..self.index_buffer.count(), 0, 0..1);
        }

        screen.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }

    fn shutdown(&mut self, app: &AppState, _screen: &mut Screen) -> Result<(), Self::LayerErr> {
        tracing::info!(
            frames = self.sink.frames(),
            redraws = app.redraws(),
            uptime_secs = app.uptime_secs(),
            "exiting"
        );
        Ok(())
    }
}

fn render_to_file(
    scene: &Scene,
    config: &RenderConfig,
    canvas: CanvasSize,
    output: &Path,
) -> anyhow::Result<()> {
    let mut sink = ImageSink::new(canvas);
    let stats = render_frame(scene, config, canvas, &mut sink);
    sink.save(output)
        .with_context(|| format!("failed to write {}", output.display()))?;
    tracing::info!(
        output = %output.display(),
        pixels = stats.pixels,
        "frame written"
    );
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level_filter = if let Some(level) = cli.log_level {
        level.to_string()
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"))
            .to_string()
    };

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&level_filter))
        .init();

    let scene = match &cli.scene {
        Some(path) => load_scene(path)
            .with_context(|| format!("failed to load scene {}", path.display()))?,
        None => Scene::demo(),
    };
    let config = RenderConfig::new(cli.depth);
    anyhow::ensure!(
        cli.width > 0 && cli.height > 0,
        "canvas size must be positive, got {}x{}",
        cli.width,
        cli.height
    );
    let canvas = CanvasSize::new(cli.width, cli.height);

    match cli.command.unwrap_or(Commands::View) {
        Commands::Render { output } => render_to_file(&scene, &config, canvas, &output)?,
        Commands::View => {
            let settings = WindowSettings {
                title: "sphere_tracing".to_owned(),
                width: canvas.width,
                height: canvas.height,
            };
            let init = ViewerInit {
                scene,
                config,
                canvas,
            };
            pollster::block_on(Application::<RayTracingViewer>::init(settings, init))
                .map_err(|e| anyhow::anyhow!("viewer failed to start: {e}"))?;
        }
    }

    Ok(())
}

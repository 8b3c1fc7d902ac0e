use std::time::Instant;

use wgpu::SurfaceError;
use winit::{
    dpi::{LogicalSize, PhysicalSize},
    event::*,
    event_loop::{ControlFlow, EventLoop, EventLoopWindowTarget},
    window::{Window, WindowBuilder},
};

#[derive(Debug, thiserror::Error)]
pub enum ViewerError {
    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),

    #[error("failed to create surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),

    #[error("no graphics adapter compatible with the window surface")]
    NoAdapter,

    #[error("failed to open graphics device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),

    #[error("surface is not supported by the selected adapter")]
    UnsupportedSurface,
}

#[derive(Debug)]
pub struct AppState {
    started: Instant,
    redraws: u64,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
            redraws: 0,
        }
    }

    pub fn update(&mut self) {
        self.redraws += 1;
    }

    pub fn redraws(&self) -> u64 {
        self.redraws
    }

    pub fn uptime_secs(&self) -> f32 {
        self.started.elapsed().as_secs_f32()
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone)]
pub struct WindowSettings {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

pub struct Application<L: Layer + 'static> {
    layer: Option<L>,
    init: Option<L::Init>,
    screen: Screen,
    state: AppState,
}

impl<L: Layer + 'static> Application<L> {
    pub fn new(screen: Screen, init: L::Init) -> Self {
        Self {
            screen,
            layer: None,
            init: Some(init),
            state: AppState::new(),
        }
    }

    fn shutdown(&mut self, control_flow: &mut ControlFlow) {
        control_flow.set_exit_with_code(0);
        if let Some(layer) = self.layer.as_mut() {
            if let Err(e) = layer.shutdown(&self.state, &mut self.screen) {
                tracing::error!("shutdown failed: {:?}", e);
                control_flow.set_exit_with_code(1);
            }
        }
    }

    fn run(
        &mut self,
        event: Event<()>,
        _event_loop: &EventLoopWindowTarget<()>,
        control_flow: &mut ControlFlow,
    ) {
        control_flow.set_wait();

        if let Some(layer) = self.layer.as_mut() {
            layer.process_event(&event, &mut self.screen);
        }

        match event {
            Event::NewEvents(StartCause::Init) => {
                if let Some(init) = self.init.take() {
                    self.layer = Some(L::start(init, &mut self.screen, &self.state));
                }
            }
            Event::WindowEvent {
                window_id,
                ref event,
            } if self.screen.window().id() == window_id => match event {
                WindowEvent::CloseRequested
                | WindowEvent::KeyboardInput {
                    input:
                        KeyboardInput {
                            state: ElementState::Pressed,
                            virtual_keycode: Some(VirtualKeyCode::Escape),
                            ..
                        },
                    ..
                } => self.shutdown(control_flow),
                WindowEvent::Resized(physical_size) => {
                    self.screen.resize(*physical_size);
                }
                WindowEvent::ScaleFactorChanged { new_inner_size, .. } => {
                    self.screen.resize(**new_inner_size);
                }
                _ => {}
            },
            Event::MainEventsCleared => {
                self.screen.window().request_redraw();
            }
            Event::RedrawRequested(window_id) if self.screen.window().id() == window_id => {
                self.state.update();
                let Some(layer) = self.layer.as_mut() else {
                    return;
                };
                layer.update(&self.state, &mut self.screen);

                match layer.render(&self.state, &mut self.screen) {
                    Ok(_) => {}
                    Err(SurfaceError::Lost) => self.screen.resize_to_current(),
                    Err(SurfaceError::OutOfMemory) => control_flow.set_exit_with_code(137),
                    Err(e) => tracing::error!("{:?}", e),
                }
            }
            _ => {}
        }
    }

    /// Opens the window and runs the event loop. Only returns on setup errors.
    pub async fn init(settings: WindowSettings, init: L::Init) -> Result<(), ViewerError> {
        let event_loop = EventLoop::new();
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor::default());
        let screen = Screen::new(&event_loop, &instance, &settings).await?;
        let mut application = Self::new(screen, init);
        event_loop.run(move |event, event_loop, control_flow| {
            application.run(event, event_loop, control_flow);
        });
    }
}

pub struct Screen {
    pub surface: wgpu::Surface,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    window: Window,
}

impl Screen {
    pub async fn new(
        event_loop: &EventLoopWindowTarget<()>,
        instance: &wgpu::Instance,
        settings: &WindowSettings,
    ) -> Result<Self, ViewerError> {
        let window = WindowBuilder::new()
            .with_title(settings.title.as_str())
            .with_inner_size(LogicalSize::new(settings.width, settings.height))
            .build(event_loop)?;

        // SAFETY:
        // The surface needs to live as long as the window that created it.
        // Screen owns the window so this should be safe.
        let surface = unsafe { instance.create_surface(&window) }?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(ViewerError::NoAdapter)?;
        tracing::info!(adapter = ?adapter.get_info().name, "graphics adapter selected");

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    features: wgpu::Features::empty(),
                    limits: wgpu::Limits::default(),
                    label: None,
                },
                None,
            )
            .await?;
        let size = window.inner_size();
        let config = surface
            .get_default_config(&adapter, size.width, size.height)
            .ok_or(ViewerError::UnsupportedSurface)?;
        surface.configure(&device, &config);

        Ok(Self {
            window,
            surface,
            device,
            queue,
            config,
        })
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    /// Resize the screen to new window size.
    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    /// Resize the screen to current window inner size.
    pub fn resize_to_current(&mut self) {
        self.resize(self.window.inner_size());
    }
}

pub trait Layer: Sized {
    type Init;
    type LayerErr: std::fmt::Debug + 'static;

    fn start(init: Self::Init, screen: &mut Screen, app: &AppState) -> Self;
    fn process_event(&mut self, event: &Event<()>, screen: &mut Screen);
    fn update(&mut self, app: &AppState, screen: &mut Screen);
    fn render(&mut self, app: &AppState, screen: &mut Screen) -> Result<(), SurfaceError>;
    fn shutdown(&mut self, app: &AppState, screen: &mut Screen) -> Result<(), Self::LayerErr>;
}

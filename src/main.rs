#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    if let Err(err) = native::run() {
        eprintln!("Error: {err:?}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::fmt;
    use std::sync::Arc;

    use anyhow::Result;
    use clap::Parser;
    use log::{info, warn};
    use pollster::block_on;
    use winit::application::ApplicationHandler;
    use winit::dpi::LogicalSize;
    use winit::event::{ElementState, KeyEvent, MouseScrollDelta, WindowEvent};
    use winit::event_loop::{ActiveEventLoop, EventLoop};
    use winit::keyboard::{KeyCode, PhysicalKey};
    use winit::window::{Window, WindowId};

    use radar_pie::app::{build_report, print_report, report_json};
    use radar_pie::config::{SegmentCount, ViewConfig, DEFAULT_SEGMENTS, MAX_SEGMENTS, MIN_SEGMENTS};
    use radar_pie::input::{wheel_notch, MouseButton, SegmentKey};
    use radar_pie::render::Renderer;
    use radar_pie::view::{Platform, RadarView};

    #[derive(Parser, Debug)]
    #[command(name = "radar-pie")]
    #[command(about = "Interactive 3D radar pie chart", long_about = None)]
    struct Cli {
        /// Number of wedges in the ring.
        #[arg(
            long,
            default_value_t = DEFAULT_SEGMENTS,
            value_parser = clap::value_parser!(u32).range(MIN_SEGMENTS as i64..=MAX_SEGMENTS as i64)
        )]
        segments: u32,

        #[arg(long, default_value_t = 1280)]
        width: u32,

        #[arg(long, default_value_t = 720)]
        height: u32,

        /// Build the scene without opening a window and print a report.
        #[arg(long)]
        summary_only: bool,

        /// Print the summary report as JSON.
        #[arg(long, requires = "summary_only")]
        json: bool,
    }

    pub fn run() -> Result<()> {
        let cli = Cli::parse();
        let segments = SegmentCount::new(cli.segments as i64)?;
        let config = ViewConfig {
            segments,
            width: cli.width.max(1),
            height: cli.height.max(1),
            ..ViewConfig::default()
        };

        if cli.summary_only {
            return run_headless(segments, cli.json);
        }

        match run_interactive(config) {
            Ok(()) => Ok(()),
            Err(err) if err.downcast_ref::<WindowInitError>().is_some() => {
                eprintln!(
                    "{err}. Falling back to --summary-only mode (set DISPLAY or install a GPU driver to enable rendering)."
                );
                run_headless(segments, cli.json)
            }
            Err(err) => Err(err),
        }
    }

    fn run_headless(segments: SegmentCount, json: bool) -> Result<()> {
        let report = build_report(segments)?;
        if json {
            println!("{}", report_json(&report)?);
        } else {
            print_report(&report);
        }
        Ok(())
    }

    fn run_interactive(config: ViewConfig) -> Result<()> {
        let event_loop =
            EventLoop::new().map_err(|err| WindowInitError::new("event loop", err))?;
        let mut app = App::new(config);
        event_loop.run_app(&mut app)?;
        match app.failure {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Raised when no window or GPU surface can be created.
    #[derive(Debug)]
    struct WindowInitError {
        message: String,
    }

    impl WindowInitError {
        fn new(stage: &str, err: impl fmt::Display) -> Self {
            Self {
                message: format!("failed to initialize {stage}: {err}"),
            }
        }
    }

    impl fmt::Display for WindowInitError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(&self.message)
        }
    }

    impl std::error::Error for WindowInitError {}

    struct App {
        config: ViewConfig,
        view: Option<RadarView<Renderer>>,
        cursor: (f32, f32),
        failure: Option<anyhow::Error>,
    }

    impl App {
        fn new(config: ViewConfig) -> Self {
            Self {
                config,
                view: None,
                cursor: (0.0, 0.0),
                failure: None,
            }
        }

        fn mount(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
            let window = event_loop
                .create_window(
                    Window::default_attributes()
                        .with_title("Radar Pie")
                        .with_inner_size(LogicalSize::new(self.config.width, self.config.height)),
                )
                .map_err(|err| WindowInitError::new("window", err))?;
            let renderer = block_on(Renderer::new(Arc::new(window)))
                .map_err(|err| WindowInitError::new("renderer", format!("{err:#}")))?;
            let view = RadarView::mount(Platform::Display(renderer), self.config)?;
            info!(
                "radar mounted with {} segment(s); arrow keys change the count",
                self.config.segments
            );
            self.view = Some(view);
            Ok(())
        }

        fn handle(&mut self, event_loop: &ActiveEventLoop, event: WindowEvent) -> Result<()> {
            let Some(view) = self.view.as_mut() else {
                return Ok(());
            };
            match event {
                WindowEvent::CloseRequested => event_loop.exit(),
                WindowEvent::Resized(size) => view.resize(size.width, size.height)?,
                WindowEvent::RedrawRequested => view.render()?,
                WindowEvent::CursorMoved { position, .. } => {
                    self.cursor = (position.x as f32, position.y as f32);
                    view.pointer_move(self.cursor.0, self.cursor.1)?;
                }
                WindowEvent::MouseInput { state, button, .. } => {
                    let Some(button) = map_mouse_button(button) else {
                        return Ok(());
                    };
                    match state {
                        ElementState::Pressed => {
                            view.pointer_down(button, self.cursor.0, self.cursor.1)
                        }
                        ElementState::Released => view.pointer_up(button),
                    }
                }
                WindowEvent::MouseWheel { delta, .. } => {
                    let vertical = match delta {
                        MouseScrollDelta::LineDelta(_, y) => y as f64,
                        MouseScrollDelta::PixelDelta(position) => position.y,
                    };
                    // Scrolling up zooms in.
                    view.wheel(-wheel_notch(vertical))?;
                }
                WindowEvent::KeyboardInput {
                    event:
                        KeyEvent {
                            physical_key: PhysicalKey::Code(code),
                            state: ElementState::Pressed,
                            ..
                        },
                    ..
                } => {
                    if code == KeyCode::Escape {
                        event_loop.exit();
                    } else if let Some(key) = map_segment_key(code) {
                        match view.segment_count().and_then(|count| count.step(key.delta())) {
                            Some(next) => view.set_segment_count(next)?,
                            None => info!("segment count stays within {MIN_SEGMENTS}..={MAX_SEGMENTS}"),
                        }
                    }
                }
                _ => {}
            }
            Ok(())
        }

        fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
            self.failure = Some(err);
            event_loop.exit();
        }
    }

    impl ApplicationHandler for App {
        fn resumed(&mut self, event_loop: &ActiveEventLoop) {
            if self.view.is_some() {
                return;
            }
            if let Err(err) = self.mount(event_loop) {
                self.fail(event_loop, err);
            }
        }

        fn window_event(
            &mut self,
            event_loop: &ActiveEventLoop,
            window_id: WindowId,
            event: WindowEvent,
        ) {
            let ours = self
                .view
                .as_ref()
                .and_then(|view| view.display())
                .is_some_and(|renderer| renderer.window_id() == window_id);
            if !ours {
                return;
            }
            if let Err(err) = self.handle(event_loop, event) {
                warn!("event handling failed: {err:#}");
                self.fail(event_loop, err);
            }
        }
    }

    fn map_mouse_button(button: winit::event::MouseButton) -> Option<MouseButton> {
        match button {
            winit::event::MouseButton::Left => Some(MouseButton::LEFT),
            winit::event::MouseButton::Middle => Some(MouseButton::MIDDLE),
            winit::event::MouseButton::Right => Some(MouseButton::RIGHT),
            _ => None,
        }
    }

    fn map_segment_key(code: KeyCode) -> Option<SegmentKey> {
        match code {
            KeyCode::ArrowUp | KeyCode::ArrowRight | KeyCode::Equal | KeyCode::NumpadAdd => {
                Some(SegmentKey::Increase)
            }
            KeyCode::ArrowDown | KeyCode::ArrowLeft | KeyCode::Minus | KeyCode::NumpadSubtract => {
                Some(SegmentKey::Decrease)
            }
            _ => None,
        }
    }
}

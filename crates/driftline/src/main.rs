mod cli;
mod container;
mod logging;

use std::time::Duration;

use clap::Parser;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use driftline_config::Config;
use driftline_core::RendererConfig;
use driftline_render::{FrameLoop, NoiseLineRenderer, StopSignal, render_surface};
use ratatui::{
    DefaultTerminal, Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Stylize},
    text::Line,
};
use tracing::info;

use crate::cli::Cli;
use crate::container::TerminalContainer;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    if let Some(path) = &cli.log {
        logging::init(path)?;
    }

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    cli.apply(&mut config);

    if cli.write_config {
        let path = match &cli.config {
            Some(path) => {
                config.save_to(path)?;
                path.clone()
            }
            None => config.save()?,
        };
        println!("Wrote {}", path.display());
        return Ok(());
    }

    let renderer_config = cli.attributes().apply_to(config.renderer_config());
    let frame_loop = FrameLoop::new(config.fps);

    let terminal = ratatui::init();
    let result = run(terminal, renderer_config, config.pixel_ratio, &frame_loop);
    ratatui::restore();
    result
}

fn run(
    terminal: DefaultTerminal,
    renderer_config: RendererConfig,
    pixel_ratio: f64,
    frame_loop: &FrameLoop,
) -> color_eyre::Result<()> {
    let size = terminal.size()?;
    let app = App::new(
        renderer_config,
        pixel_ratio,
        canvas_area(Rect::new(0, 0, size.width, size.height)),
        frame_loop.stop_signal(),
    );
    app.run(terminal, frame_loop)
}

/// Split the screen into the canvas and the help line.
fn split_screen(area: Rect) -> [Rect; 2] {
    Layout::vertical([
        Constraint::Fill(1),   // Canvas
        Constraint::Length(1), // Help text
    ])
    .areas(area)
}

fn canvas_area(area: Rect) -> Rect {
    split_screen(area)[0]
}

/// The main application which holds the state and logic of the application.
#[derive(Debug)]
pub struct App {
    /// Line renderer attached to the canvas area.
    renderer: NoiseLineRenderer,
    /// Canvas area as seen by the renderer.
    container: TerminalContainer,
    /// Whether the canvas counts as in view.
    in_view: bool,
    /// Ends the frame loop.
    stop: StopSignal,
}

impl App {
    /// Construct a new instance of [`App`].
    pub fn new(config: RendererConfig, pixel_ratio: f64, canvas: Rect, stop: StopSignal) -> Self {
        let container = TerminalContainer::new(canvas, pixel_ratio);
        let mut renderer = NoiseLineRenderer::new(&container, config);
        // The whole canvas is on screen from the start
        renderer.observe_intersection(true);
        Self {
            renderer,
            container,
            in_view: true,
            stop,
        }
    }

    /// Run the application's main loop.
    pub fn run(
        mut self,
        mut terminal: DefaultTerminal,
        frame_loop: &FrameLoop,
    ) -> color_eyre::Result<()> {
        info!(
            fps = 1.0 / frame_loop.interval().as_secs_f64(),
            orientation = ?self.renderer.config().orientation,
            "starting frame loop"
        );
        let frames = frame_loop.run(|tick| {
            terminal.draw(|frame| self.render(frame, tick.now_ms))?;
            self.handle_crossterm_events(tick.remaining())
        })?;
        info!(frames, "frame loop stopped");
        Ok(())
    }

    /// Renders the user interface.
    fn render(&mut self, frame: &mut Frame, now_ms: f64) {
        let [canvas, help_area] = split_screen(frame.area());

        if self.container.set_area(canvas) {
            self.renderer.observe_resize(&self.container);
        }
        self.renderer.frame(now_ms, &self.container);
        render_surface(frame, self.renderer.surface(), canvas);

        let accent = self
            .renderer
            .lines()
            .first()
            .map(|line| Color::Rgb(line.color.r, line.color.g, line.color.b))
            .unwrap_or(Color::Cyan);
        let pause_label = if self.in_view { " pause  " } else { " resume  " };
        let fade_label = if self.container.is_faded() { " unfade" } else { " fade" };

        let help = Line::from(vec![
            "q".bold().fg(accent),
            " quit  ".dark_gray(),
            "space".bold().fg(accent),
            pause_label.dark_gray(),
            "o".bold().fg(accent),
            fade_label.dark_gray(),
        ])
        .centered();
        frame.render_widget(help, help_area);
    }

    /// Reads the crossterm events and updates the state of [`App`].
    /// Waits at most `timeout` so the next frame starts on time.
    fn handle_crossterm_events(&mut self, timeout: Duration) -> color_eyre::Result<()> {
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => self.on_key_event(key),
                // The next render picks up the new canvas size
                Event::Resize(_, _) => {}
                _ => {}
            }
        }
        Ok(())
    }

    /// Handles the key events and updates the state of [`App`].
    fn on_key_event(&mut self, key: KeyEvent) {
        match (key.modifiers, key.code) {
            (_, KeyCode::Esc | KeyCode::Char('q'))
            | (KeyModifiers::CONTROL, KeyCode::Char('c') | KeyCode::Char('C')) => self.quit(),
            (_, KeyCode::Char(' ')) => self.toggle_in_view(),
            (_, KeyCode::Char('o')) => self.container.toggle_fade(),
            _ => {}
        }
    }

    /// Toggle whether the canvas counts as in view.
    fn toggle_in_view(&mut self) {
        self.in_view = !self.in_view;
        self.renderer.observe_intersection(self.in_view);
    }

    /// Stop the frame loop.
    fn quit(&mut self) {
        self.stop.stop();
    }
}

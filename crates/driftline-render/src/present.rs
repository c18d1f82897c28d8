//! Terminal presentation of a [`Surface`].
//!
//! Each cell shows two logical pixels stacked vertically using half blocks.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::surface::{Rgba, Surface};

/// Alpha below which a half cell is left empty.
const ALPHA_THRESHOLD: f32 = 0.02;

/// Render the surface into `area` of the frame.
pub fn render_surface(frame: &mut Frame, surface: &Surface, area: Rect) {
    let lines = surface_lines(surface, area.width, area.height);
    frame.render_widget(Paragraph::new(lines), area);
}

/// Build one line of spans per terminal row.
pub fn surface_lines(surface: &Surface, width: u16, height: u16) -> Vec<Line<'static>> {
    (0..height)
        .map(|row| {
            let spans: Vec<Span> = (0..width)
                .map(|col| {
                    let top = surface.sample_logical(col as u32, row as u32 * 2);
                    let bottom = surface.sample_logical(col as u32, row as u32 * 2 + 1);
                    render_cell(top, bottom)
                })
                .collect();
            Line::from(spans)
        })
        .collect()
}

/// Pick the glyph and colors for a cell from its two halves.
fn render_cell(top: Rgba, bottom: Rgba) -> Span<'static> {
    let top = visible_color(top);
    let bottom = visible_color(bottom);

    match (top, bottom) {
        (None, None) => Span::raw(" "),
        (Some(fg), None) => Span::styled("▀", Style::new().fg(fg)),
        (None, Some(fg)) => Span::styled("▄", Style::new().fg(fg)),
        (Some(fg), Some(bg)) => Span::styled("▀", Style::new().fg(fg).bg(bg)),
    }
}

/// Premultiply onto black, or `None` when too faint to show.
fn visible_color([r, g, b, a]: Rgba) -> Option<Color> {
    if a < ALPHA_THRESHOLD {
        return None;
    }
    let channel = |v: f32| (v * a * 255.0).round().clamp(0.0, 255.0) as u8;
    Some(Color::Rgb(channel(r), channel(g), channel(b)))
}

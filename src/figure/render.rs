//! Rasterises a [`Figure`] onto a [`Canvas`].

use super::artifact::ArtifactError;
use super::canvas::{Canvas, GLYPH_SIZE};
use super::types::{Figure, SeriesKind};

const BACKGROUND: [u8; 3] = [255, 255, 255];
const AXIS_COLOR: [u8; 3] = [0, 0, 0];
const TEXT_COLOR: [u8; 3] = [32, 32, 32];

/// Series colors, cycled in order of creation
const PALETTE: [[u8; 3]; 10] = [
    [31, 119, 180],
    [255, 127, 14],
    [44, 160, 44],
    [214, 39, 40],
    [148, 103, 189],
    [140, 86, 75],
    [227, 119, 194],
    [127, 127, 127],
    [188, 189, 34],
    [23, 190, 207],
];

const MARGIN_LEFT: i32 = 72;
const MARGIN_RIGHT: i32 = 24;
const MARGIN_TOP: i32 = 44;
const MARGIN_BOTTOM: i32 = 52;
const TICK_COUNT: usize = 5;
const TICK_LENGTH: i32 = 4;
const MARKER_SIZE: i32 = 5;
const BAR_FRACTION: f64 = 0.8;

/// Smallest canvas the axes layout fits into
pub const MIN_WIDTH: u32 = 160;
pub const MIN_HEIGHT: u32 = 120;

/// Largest canvas rendered; bigger requests are clamped
pub const MAX_WIDTH: u32 = 4096;
pub const MAX_HEIGHT: u32 = 4096;

/// Maps data coordinates into the plot area
struct Viewport {
    left: i32,
    right: i32,
    top: i32,
    bottom: i32,
    x_range: (f64, f64),
    y_range: (f64, f64),
}

impl Viewport {
    fn px(&self, x: f64) -> i32 {
        let (lo, hi) = self.x_range;
        let t = (x - lo) / (hi - lo);
        self.left + (t * f64::from(self.right - self.left)).round() as i32
    }

    fn py(&self, y: f64) -> i32 {
        let (lo, hi) = self.y_range;
        let t = (y - lo) / (hi - lo);
        self.bottom - (t * f64::from(self.bottom - self.top)).round() as i32
    }

    fn x_unit(&self) -> f64 {
        f64::from(self.right - self.left) / (self.x_range.1 - self.x_range.0)
    }
}

/// Render a figure to PNG bytes.
pub fn render_png(figure: &Figure, width: u32, height: u32) -> Result<Vec<u8>, ArtifactError> {
    render_canvas(figure, width, height)?.to_png()
}

/// Render a figure onto a fresh canvas.
pub fn render_canvas(figure: &Figure, width: u32, height: u32) -> Result<Canvas, ArtifactError> {
    let width = width.clamp(MIN_WIDTH, MAX_WIDTH);
    let height = height.clamp(MIN_HEIGHT, MAX_HEIGHT);
    let mut canvas = Canvas::new(width, height, BACKGROUND)?;

    let (x_min, x_max, y_min, y_max) = figure.bounds().unwrap_or((0.0, 1.0, 0.0, 1.0));
    let view = Viewport {
        left: MARGIN_LEFT,
        right: width as i32 - MARGIN_RIGHT,
        top: MARGIN_TOP,
        bottom: height as i32 - MARGIN_BOTTOM,
        x_range: (x_min, x_max),
        y_range: (y_min, y_max),
    };

    for (idx, series) in figure.series.iter().enumerate() {
        let color = PALETTE[idx % PALETTE.len()];
        let points: Vec<(f64, f64)> = series
            .xs
            .iter()
            .zip(&series.ys)
            .map(|(&x, &y)| (x, y))
            .filter(|(x, y)| x.is_finite() && y.is_finite())
            .collect();

        match series.kind {
            SeriesKind::Line => {
                for pair in points.windows(2) {
                    let from = (view.px(pair[0].0), view.py(pair[0].1));
                    let to = (view.px(pair[1].0), view.py(pair[1].1));
                    canvas.draw_line(from, to, color);
                    canvas.draw_line((from.0, from.1 + 1), (to.0, to.1 + 1), color);
                }
                if let [(x, y)] = points.as_slice() {
                    draw_marker(&mut canvas, view.px(*x), view.py(*y), color);
                }
            }
            SeriesKind::Scatter => {
                for (x, y) in &points {
                    draw_marker(&mut canvas, view.px(*x), view.py(*y), color);
                }
            }
            SeriesKind::Bar => {
                let bar_width = ((view.x_unit() * BAR_FRACTION).round() as i32).max(1);
                let baseline = view.py(0.0);
                for (x, y) in &points {
                    let left = view.px(*x) - bar_width / 2;
                    let top = view.py(*y);
                    let (start, end) = if top <= baseline { (top, baseline) } else { (baseline, top) };
                    canvas.fill_rect(left, start, bar_width, (end - start).max(1), color);
                }
            }
        }
    }

    draw_axes(&mut canvas, &view);
    draw_labels(&mut canvas, figure, &view);
    Ok(canvas)
}

fn draw_marker(canvas: &mut Canvas, x: i32, y: i32, color: [u8; 3]) {
    let half = MARKER_SIZE / 2;
    canvas.fill_rect(x - half, y - half, MARKER_SIZE, MARKER_SIZE, color);
}

fn draw_axes(canvas: &mut Canvas, view: &Viewport) {
    let (l, r, t, b) = (view.left, view.right, view.top, view.bottom);
    canvas.draw_line((l, t), (r, t), AXIS_COLOR);
    canvas.draw_line((l, b), (r, b), AXIS_COLOR);
    canvas.draw_line((l, t), (l, b), AXIS_COLOR);
    canvas.draw_line((r, t), (r, b), AXIS_COLOR);

    let glyph = GLYPH_SIZE as i32;
    for i in 0..TICK_COUNT {
        let t_frac = i as f64 / (TICK_COUNT - 1) as f64;

        let x_value = view.x_range.0 + t_frac * (view.x_range.1 - view.x_range.0);
        let px = view.px(x_value);
        canvas.draw_line((px, b), (px, b + TICK_LENGTH), AXIS_COLOR);
        let label = format_tick(x_value);
        let label_width = Canvas::text_width(&label, 1) as i32;
        canvas.draw_text(px - label_width / 2, b + TICK_LENGTH + 4, &label, TEXT_COLOR, 1);

        let y_value = view.y_range.0 + t_frac * (view.y_range.1 - view.y_range.0);
        let py = view.py(y_value);
        canvas.draw_line((l - TICK_LENGTH, py), (l, py), AXIS_COLOR);
        let label = format_tick(y_value);
        let label_width = Canvas::text_width(&label, 1) as i32;
        canvas.draw_text(l - TICK_LENGTH - 4 - label_width, py - glyph / 2, &label, TEXT_COLOR, 1);
    }
}

fn draw_labels(canvas: &mut Canvas, figure: &Figure, view: &Viewport) {
    let glyph = GLYPH_SIZE as i32;
    let center = (view.left + view.right) / 2;

    if let Some(title) = &figure.title {
        let w = Canvas::text_width(title, 2) as i32;
        canvas.draw_text(center - w / 2, (view.top - 2 * glyph) / 2, title, TEXT_COLOR, 2);
    }
    if let Some(xlabel) = &figure.xlabel {
        let w = Canvas::text_width(xlabel, 1) as i32;
        canvas.draw_text(center - w / 2, view.bottom + TICK_LENGTH + glyph + 12, xlabel, TEXT_COLOR, 1);
    }
    if let Some(ylabel) = &figure.ylabel {
        canvas.draw_text(4, view.top - glyph - 4, ylabel, TEXT_COLOR, 1);
    }
}

/// Compact tick text: integers without decimals, others to two places.
pub fn format_tick(value: f64) -> String {
    if value.fract().abs() < 1e-9 && value.abs() < 1e12 {
        return format!("{}", value.round() as i64);
    }
    let text = format!("{:.2}", value);
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}

//! Immediate-mode drawing surface.
//!
//! Animations draw through the [`Surface`] trait in cell space (`f64`, origin
//! top-left). [`Canvas`] records the calls as `DrawOp`s tagged with the
//! current layer; it never touches the terminal.

use crate::types::{Color, DrawOp, ResolvedScene, Style};

/// Terminal cells are about twice as tall as they are wide.
pub const ASPECT: f64 = 2.0;

const DOT: char = '●';

/// The drawing primitives available to an animation's `render`.
pub trait Surface {
    /// Drawable area in cells, `(width, height)`.
    fn size(&self) -> (f64, f64);
    /// Layer for subsequent draw calls; higher layers paint over lower ones.
    fn set_layer(&mut self, layer: i32);
    fn set_fill(&mut self, hue: f64, saturation: f64, brightness: f64);
    /// Stroke color for lines. `alpha` is 0..=100; faint strokes render dim.
    fn set_stroke(&mut self, hue: f64, saturation: f64, brightness: f64, alpha: f64);
    fn no_stroke(&mut self);
    /// Filled circle centred on `(x, y)`. `diameter` is in rows.
    fn circle(&mut self, x: f64, y: f64, diameter: f64);
    fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64);
    /// Text in the fill color, one character per cell.
    fn text(&mut self, text: &str, x: f64, y: f64);
}

pub struct Canvas {
    width: u16,
    height: u16,
    layer: i32,
    fill: Style,
    stroke: Option<Style>,
    ops: Vec<DrawOp>,
}

impl Canvas {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            layer: 0,
            fill: Style {
                fg: Some(Color::hsb(0.0, 0.0, 100.0)),
                ..Default::default()
            },
            stroke: None,
            ops: Vec::new(),
        }
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    /// Drop all recorded ops and reset drawing state for a new frame.
    pub fn clear(&mut self) {
        self.ops.clear();
        self.layer = 0;
        self.stroke = None;
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.clear();
    }

    /// Hand the recorded ops to the renderer, leaving the canvas empty.
    pub fn take_scene(&mut self) -> ResolvedScene {
        ResolvedScene {
            ops: std::mem::take(&mut self.ops),
        }
    }

    /// Text drawn above every animation layer in a fixed style.
    pub fn overlay_text(&mut self, text: &str, x: u16, y: u16, style: Style) {
        let layer = std::mem::replace(&mut self.layer, i32::MAX);
        for (i, ch) in text.chars().enumerate() {
            self.plot(f64::from(x) + i as f64, f64::from(y), ch, style);
        }
        self.layer = layer;
    }

    /// Liang-Barsky: the parameter range of `(x1, y1) + t * (dx, dy)`, `t` in
    /// `0..=1`, whose points round onto the canvas. `None` if it misses entirely.
    fn clip(&self, x1: f64, y1: f64, dx: f64, dy: f64) -> Option<(f64, f64)> {
        let lo = -0.499;
        let hi_x = f64::from(self.width) - 0.501;
        let hi_y = f64::from(self.height) - 0.501;
        let (mut t0, mut t1) = (0.0_f64, 1.0_f64);
        for (p, q) in [(-dx, x1 - lo), (dx, hi_x - x1), (-dy, y1 - lo), (dy, hi_y - y1)] {
            if p == 0.0 {
                if q < 0.0 {
                    return None;
                }
                continue;
            }
            let r = q / p;
            if p < 0.0 {
                t0 = t0.max(r);
            } else {
                t1 = t1.min(r);
            }
            if t0 > t1 {
                return None;
            }
        }
        Some((t0, t1))
    }

    fn plot(&mut self, x: f64, y: f64, ch: char, style: Style) {
        let (x, y) = (x.round(), y.round());
        if x < 0.0 || y < 0.0 || x >= f64::from(self.width) || y >= f64::from(self.height) {
            return;
        }
        self.ops.push(DrawOp {
            x: x as u16,
            y: y as u16,
            ch,
            style,
            z_order: self.layer,
        });
    }
}

/// Pick a box-drawing glyph for a segment, judged in visual (aspect-corrected) space.
fn line_glyph(dx: f64, dy: f64) -> char {
    let run = (dx / ASPECT).abs();
    let rise = dy.abs();
    if rise <= run * 0.4 {
        '─'
    } else if rise >= run * 2.5 {
        '│'
    } else if (dx > 0.0) == (dy > 0.0) {
        '╲'
    } else {
        '╱'
    }
}

impl Surface for Canvas {
    fn size(&self) -> (f64, f64) {
        (f64::from(self.width), f64::from(self.height))
    }

    fn set_layer(&mut self, layer: i32) {
        self.layer = layer;
    }

    fn set_fill(&mut self, hue: f64, saturation: f64, brightness: f64) {
        self.fill = Style {
            fg: Some(Color::hsb(hue, saturation, brightness)),
            ..Default::default()
        };
    }

    fn set_stroke(&mut self, hue: f64, saturation: f64, brightness: f64, alpha: f64) {
        self.stroke = Some(Style {
            fg: Some(Color::hsb(hue, saturation, brightness)),
            dim: alpha < 50.0,
            ..Default::default()
        });
    }

    fn no_stroke(&mut self) {
        self.stroke = None;
    }

    fn circle(&mut self, x: f64, y: f64, diameter: f64) {
        let r = diameter / 2.0;
        if r < 1.0 {
            self.plot(x, y, DOT, self.fill);
            return;
        }
        let (rows, cols) = (r.ceil() as i64, (r * ASPECT).ceil() as i64);
        for j in -rows..=rows {
            for i in -cols..=cols {
                let (dx, dy) = (i as f64 / ASPECT, j as f64);
                if dx * dx + dy * dy <= r * r {
                    self.plot(x + i as f64, y + dy, DOT, self.fill);
                }
            }
        }
    }

    fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) {
        let Some(style) = self.stroke else {
            return;
        };
        let (dx, dy) = (x2 - x1, y2 - y1);
        let ch = line_glyph(dx, dy);
        let Some((t0, t1)) = self.clip(x1, y1, dx, dy) else {
            return;
        };
        let span = t1 - t0;
        let steps = (dx.abs().max(dy.abs()) * span).ceil().max(1.0) as usize;
        for s in 0..=steps {
            let t = t0 + span * (s as f64 / steps as f64);
            self.plot(x1 + dx * t, y1 + dy * t, ch, style);
        }
    }

    fn text(&mut self, text: &str, x: f64, y: f64) {
        for (i, ch) in text.chars().enumerate() {
            self.plot(x + i as f64, y, ch, self.fill);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_circle_is_a_single_dot() {
        let mut c = Canvas::new(10, 10);
        c.circle(3.0, 4.0, 1.0);
        assert_eq!(c.ops().len(), 1);
        assert_eq!((c.ops()[0].x, c.ops()[0].y, c.ops()[0].ch), (3, 4, DOT));
    }

    #[test]
    fn off_canvas_points_are_clipped() {
        let mut c = Canvas::new(4, 4);
        c.circle(-1.0, 2.0, 1.0);
        c.circle(2.0, 4.0, 1.0);
        c.text("abcdef", 1.0, 0.0);
        assert_eq!(c.ops().len(), 3);
    }

    #[test]
    fn lines_need_a_stroke() {
        let mut c = Canvas::new(20, 5);
        c.line(0.0, 0.0, 10.0, 0.0);
        assert!(c.ops().is_empty());
        c.set_stroke(0.0, 100.0, 100.0, 90.0);
        c.line(0.0, 0.0, 10.0, 0.0);
        assert_eq!(c.ops().len(), 11);
        assert!(c.ops().iter().all(|op| op.ch == '─' && !op.style.dim));
    }

    #[test]
    fn huge_lines_only_walk_the_visible_part() {
        let mut c = Canvas::new(20, 10);
        c.set_stroke(0.0, 100.0, 100.0, 90.0);
        c.line(-1e9, 5.0, 1e9, 5.0);
        assert!(!c.ops().is_empty());
        assert!(c.ops().len() <= 21, "walked {} cells", c.ops().len());
        assert!(c.ops().iter().all(|op| op.x < 20 && op.y == 5));

        c.clear();
        c.set_stroke(0.0, 100.0, 100.0, 90.0);
        c.line(-1e9, -1e9, -1e9, 1e9);
        assert!(c.ops().is_empty());
    }

    #[test]
    fn clipped_line_keeps_its_endpoints_on_canvas() {
        let mut c = Canvas::new(10, 10);
        c.set_stroke(0.0, 100.0, 100.0, 90.0);
        c.line(2.0, 3.0, 50.0, 3.0);
        let xs: Vec<_> = c.ops().iter().map(|op| op.x).collect();
        assert_eq!(xs.first(), Some(&2));
        assert_eq!(xs.last(), Some(&9));
    }

    #[test]
    fn faint_stroke_is_dim() {
        let mut c = Canvas::new(5, 5);
        c.set_stroke(0.0, 100.0, 100.0, 20.0);
        c.line(0.0, 0.0, 0.0, 3.0);
        assert!(c.ops().iter().all(|op| op.ch == '│' && op.style.dim));
    }

    #[test]
    fn glyph_follows_visual_slope() {
        assert_eq!(line_glyph(10.0, 0.5), '─');
        assert_eq!(line_glyph(0.2, 6.0), '│');
        assert_eq!(line_glyph(4.0, 2.0), '╲');
        assert_eq!(line_glyph(-4.0, 2.0), '╱');
    }

    #[test]
    fn ops_carry_current_layer() {
        let mut c = Canvas::new(5, 5);
        c.set_layer(3);
        c.text("x", 0.0, 0.0);
        assert_eq!(c.ops()[0].z_order, 3);
        c.clear();
        assert!(c.ops().is_empty());
    }

    #[test]
    fn overlay_sits_above_all_layers() {
        let mut c = Canvas::new(10, 2);
        c.set_layer(1);
        c.overlay_text("hi", 0, 1, Style::default());
        c.text("x", 0.0, 0.0);
        let z: Vec<_> = c.ops().iter().map(|op| op.z_order).collect();
        assert_eq!(z, vec![i32::MAX, i32::MAX, 1]);
    }
}

use crate::engine::animation::Animation;
use crate::renderer::Surface;

use super::geometry::CircleGeometry;
use super::shared::{Publisher, View};

const FACTOR_STEP: f64 = 0.01;
const STROKE_ALPHA: f64 = 90.0;

/// Modulo multiplication chords: dot `i` is joined to dot `i * factor mod n`.
///
/// The factor creeps upward forever, so this never finishes and never
/// unlocks anything behind it. Draws on whatever ring it was given.
pub struct ModuloLines {
    ring: View<CircleGeometry>,
    factor: Publisher<f64>,
}

impl ModuloLines {
    pub fn new(ring: View<CircleGeometry>) -> Self {
        Self {
            ring,
            factor: Publisher::new(0.0),
        }
    }

    /// Live view of the current multiplication factor.
    pub fn factor(&self) -> View<f64> {
        self.factor.view()
    }
}

impl Animation for ModuloLines {
    fn advance(&mut self) {
        self.factor.set(self.factor.get() + FACTOR_STEP);
    }

    fn render(&self, surface: &mut dyn Surface) {
        let (w, h) = surface.size();
        let (cx, cy) = (w / 2.0, h / 2.0);
        let g = self.ring.get();
        let n = f64::from(g.dot_count);
        let factor = self.factor.get();
        for i in 0..=g.dot_count {
            let i = f64::from(i);
            let target = (i * factor) % n;
            let (x1, y1) = g.point(i, cx, cy);
            let (x2, y2) = g.point(target, cx, cy);
            surface.set_stroke((360.0 / n) * i, 100.0, 100.0, STROKE_ALPHA);
            surface.line(x1, y1, x2, y2);
        }
    }

    fn is_finished(&self) -> bool {
        false
    }

    fn reset(&mut self) {
        self.factor.set(0.0);
    }

    fn name(&self) -> &str {
        "modulo-lines"
    }
}

use crate::engine::animation::Animation;
use crate::renderer::Surface;

use super::geometry::CircleGeometry;
use super::shared::{Publisher, View};

/// How the growth step evolves from one advance to the next.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Stepping {
    Constant(f64),
    /// The step itself grows by `growth` after every advance.
    Accelerating { initial: f64, growth: f64 },
}

impl Stepping {
    fn initial(self) -> f64 {
        match self {
            Stepping::Constant(step) => step,
            Stepping::Accelerating { initial, .. } => initial,
        }
    }

    fn next(self, step: f64) -> f64 {
        match self {
            Stepping::Constant(step) => step,
            Stepping::Accelerating { growth, .. } => step + growth,
        }
    }
}

/// A ring of dots growing outward from the centre until it reaches
/// `max_radius`.
///
/// Reaching full size unlocks the next unit. A ring that spins keeps rotating
/// forever and never finishes; a still ring finishes at full size.
pub struct DotRing {
    max_radius: f64,
    stepping: Stepping,
    /// Degrees of rotation per advance.
    spin: f64,
    hue: f64,
    saturation: f64,
    step: f64,
    geometry: Publisher<CircleGeometry>,
    finished: bool,
    unlocked: bool,
}

impl DotRing {
    pub fn new(dot_count: u32, max_radius: f64, stepping: Stepping) -> Self {
        Self {
            max_radius,
            stepping,
            spin: 0.0,
            hue: 0.0,
            saturation: 0.0,
            step: stepping.initial(),
            geometry: Publisher::new(CircleGeometry::new(dot_count.max(1))),
            finished: false,
            unlocked: false,
        }
    }

    pub fn spinning(mut self, degrees_per_step: f64) -> Self {
        self.spin = degrees_per_step;
        self
    }

    /// Dot color; white when unset.
    pub fn tinted(mut self, hue: f64, saturation: f64) -> Self {
        self.hue = hue;
        self.saturation = saturation;
        self
    }

    /// Read access to the ring's current radius and rotation.
    pub fn geometry(&self) -> View<CircleGeometry> {
        self.geometry.view()
    }

    pub fn radius(&self) -> f64 {
        self.geometry.get().radius
    }
}

impl Animation for DotRing {
    fn advance(&mut self) {
        if self.finished {
            return;
        }
        let mut g = self.geometry.get();
        g.angle_offset += self.spin;
        if g.radius < self.max_radius {
            g.radius = (g.radius + self.step).min(self.max_radius);
            self.step = self.stepping.next(self.step);
        }
        if g.radius >= self.max_radius {
            self.unlocked = true;
            self.finished = self.spin == 0.0;
        }
        self.geometry.set(g);
    }

    fn render(&self, surface: &mut dyn Surface) {
        let (w, h) = surface.size();
        let (cx, cy) = (w / 2.0, h / 2.0);
        let g = self.geometry.get();
        surface.no_stroke();
        surface.set_fill(self.hue, self.saturation, 100.0);
        for i in 0..g.dot_count {
            let (x, y) = g.point(f64::from(i), cx, cy);
            surface.circle(x, y, 1.0);
        }
    }

    fn is_finished(&self) -> bool {
        self.finished
    }

    fn unlocks_next(&self) -> bool {
        self.unlocked
    }

    fn reset(&mut self) {
        let g = self.geometry.get();
        self.geometry.set(CircleGeometry::new(g.dot_count));
        self.step = self.stepping.initial();
        self.finished = false;
        self.unlocked = false;
    }

    fn name(&self) -> &str {
        "dot-ring"
    }
}

use crate::renderer::ASPECT;

/// Where the ring currently is: published by the ring, read by anything
/// drawing on it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CircleGeometry {
    pub dot_count: u32,
    pub radius: f64,
    /// Rotation in degrees.
    pub angle_offset: f64,
}

impl CircleGeometry {
    pub fn new(dot_count: u32) -> Self {
        Self {
            dot_count,
            radius: 0.0,
            angle_offset: 0.0,
        }
    }

    /// Cell position of (possibly fractional) dot `i` around `(cx, cy)`.
    pub fn point(&self, i: f64, cx: f64, cy: f64) -> (f64, f64) {
        let angle = (360.0 / f64::from(self.dot_count)) * i + self.angle_offset;
        let (sin, cos) = angle.to_radians().sin_cos();
        (cx + cos * self.radius * ASPECT, cy + sin * self.radius)
    }
}

//! Compiled-in animation variants.
//!
//! Each variant lives in its own module with its state and `Animation`
//! implementation side by side.

mod dot_ring;
mod geometry;
mod modulo_lines;
mod shared;

pub use dot_ring::{DotRing, Stepping};
pub use geometry::CircleGeometry;
pub use modulo_lines::ModuloLines;
pub use shared::{Publisher, View};

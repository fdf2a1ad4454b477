//! Engine — the sequential animation core.
//!
//! Owns one [`Scheduler`] loaded with a compiled-in scene. Each frame the
//! scheduler picks the eligible prefix of the scene's units and the engine
//! has them advance and draw onto a [`Surface`].
//!
//! The engine never deals with terminals, ANSI codes, or grids.

pub mod animation;
pub mod gate;
pub mod objects;
pub mod scheduler;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::renderer::Surface;
use gate::Gate;
use objects::{DotRing, ModuloLines, Stepping, View};
use scheduler::Scheduler;

/// Frames the rings scene takes to open each ring.
const RING_GROWTH_FRAMES: f64 = 128.0;

/// The compiled-in scenes. Each one fixes its own gate policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SceneKind {
    /// Spinning, accelerating ring followed by modulo multiplication chords.
    /// Early-unlock: the chords start once the ring is full size.
    #[default]
    Modulo,
    /// Two still rings, the outer one waiting for the inner one to finish.
    Rings,
}

impl SceneKind {
    pub fn gate(self) -> Gate {
        match self {
            SceneKind::Modulo => Gate::EarlyUnlock,
            SceneKind::Rings => Gate::Completion,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneParams {
    pub dot_count: u32,
    /// Full ring radius in rows.
    pub max_radius: f64,
}

pub struct Engine {
    kind: SceneKind,
    scheduler: Scheduler,
    factor: Option<View<f64>>,
}

impl Engine {
    /// Build the scheduler for a scene, registering its units in dependency order.
    pub fn build(kind: SceneKind, params: SceneParams) -> Self {
        let mut scheduler = Scheduler::new(kind.gate());
        let mut factor = None;

        match kind {
            SceneKind::Modulo => {
                // Step sizes are scaled so the ring takes roughly the same
                // number of frames to open whatever its final size.
                let scale = params.max_radius / 400.0;
                let ring = DotRing::new(
                    params.dot_count,
                    params.max_radius,
                    Stepping::Accelerating {
                        initial: scale,
                        growth: scale * 0.1,
                    },
                )
                .spinning(0.1);
                let lines = ModuloLines::new(ring.geometry());
                factor = Some(lines.factor());
                scheduler.register(Box::new(ring));
                scheduler.register(Box::new(lines));
            }
            SceneKind::Rings => {
                let inner = params.max_radius / 2.0;
                let step = inner / RING_GROWTH_FRAMES;
                scheduler.register(Box::new(DotRing::new(
                    params.dot_count,
                    inner,
                    Stepping::Constant(step),
                )));
                scheduler.register(Box::new(
                    DotRing::new(params.dot_count, params.max_radius, Stepping::Constant(step))
                        .tinted(200.0, 80.0),
                ));
            }
        }

        info!(
            scene = ?kind,
            gate = %scheduler.gate(),
            units = scheduler.len(),
            dot_count = params.dot_count,
            max_radius = params.max_radius,
            "scene built"
        );

        Self {
            kind,
            scheduler,
            factor,
        }
    }

    pub fn kind(&self) -> SceneKind {
        self.kind
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// Advance and draw one frame. Returns the wavefront size.
    pub fn frame(&mut self, surface: &mut dyn Surface) -> usize {
        self.scheduler.frame(surface)
    }

    pub fn restart(&mut self) {
        self.scheduler.restart();
    }

    /// Heads-up caption for the scene, if it has one.
    pub fn caption(&self) -> Option<String> {
        self.factor
            .as_ref()
            .map(|f| format!("Multiplication : {:.2}", f.get()))
    }

    /// Names of the units currently in the wavefront.
    pub fn active_units(&self) -> Vec<&str> {
        self.scheduler
            .units()
            .take(self.scheduler.wavefront_len())
            .map(|unit| unit.name())
            .collect()
    }
}

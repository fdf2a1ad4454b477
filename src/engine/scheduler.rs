//! Sequential animation scheduler.
//!
//! Units run in registration order. Each frame the scheduler walks the
//! sequence from the front and stops at the first unit whose predecessor's
//! gate is closed; the eligible prefix is the *wavefront*. There is no stored
//! cursor: the wavefront is recomputed from the units' flags every tick, so
//! resetting any unit retracts everything behind it on the next frame.

use std::sync::atomic::{AtomicU64, Ordering};

use thiserror::Error;
use tracing::{debug, trace};

use crate::renderer::Surface;

use super::animation::Animation;
use super::gate::Gate;

static NEXT_SCHEDULER: AtomicU64 = AtomicU64::new(0);

/// Handle to a registered unit, valid only for the scheduler that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UnitId {
    owner: u64,
    index: usize,
}

impl UnitId {
    /// Position in the sequence.
    pub fn index(self) -> usize {
        self.index
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchedulerError {
    #[error("unit {index} is not registered with this scheduler")]
    UnknownUnit { index: usize },
}

pub struct Scheduler {
    id: u64,
    gate: Gate,
    units: Vec<Box<dyn Animation>>,
    frames_ticked: u64,
}

impl Scheduler {
    pub fn new(gate: Gate) -> Self {
        Self {
            id: NEXT_SCHEDULER.fetch_add(1, Ordering::Relaxed),
            gate,
            units: Vec::new(),
            frames_ticked: 0,
        }
    }

    pub fn gate(&self) -> Gate {
        self.gate
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Number of completed `tick` calls.
    pub fn frames_ticked(&self) -> u64 {
        self.frames_ticked
    }

    /// Append a unit to the end of the sequence.
    ///
    /// Registration normally happens before the first frame. A unit added later
    /// simply joins the back of the dependency chain.
    pub fn register(&mut self, unit: Box<dyn Animation>) -> UnitId {
        let index = self.units.len();
        if self.frames_ticked > 0 {
            debug!(index, name = unit.name(), frame = self.frames_ticked, "late registration");
        } else {
            debug!(index, name = unit.name(), "registered unit");
        }
        self.units.push(unit);
        UnitId {
            owner: self.id,
            index,
        }
    }

    /// Length of the eligible prefix given the units' current flags.
    ///
    /// Unit 0 is always eligible (unless the sequence is empty).
    pub fn wavefront_len(&self) -> usize {
        if self.units.is_empty() {
            return 0;
        }
        let gated = self
            .units
            .windows(2)
            .take_while(|pair| self.gate.permits(pair[0].as_ref()))
            .count();
        gated + 1
    }

    /// Start a frame: return the eligible units in sequence order.
    ///
    /// Eligibility is fixed when this is called, so a unit that unlocks its
    /// successor while advancing this frame only lets it in on the next tick.
    /// The returned borrow keeps the sequence locked for the rest of the frame.
    pub fn tick(&mut self) -> &mut [Box<dyn Animation>] {
        let len = self.wavefront_len();
        self.frames_ticked += 1;
        trace!(frame = self.frames_ticked, wavefront = len, "tick");
        &mut self.units[..len]
    }

    /// Tick, then advance and render every eligible unit front to back.
    ///
    /// Each unit draws on its own layer so later units composite on top.
    /// Returns the number of units drawn.
    pub fn frame(&mut self, surface: &mut dyn Surface) -> usize {
        let wavefront = self.tick();
        for (layer, unit) in wavefront.iter_mut().enumerate() {
            surface.set_layer(layer as i32);
            unit.advance();
            unit.render(surface);
        }
        wavefront.len()
    }

    /// Reset every unit, front to back.
    pub fn restart(&mut self) {
        debug!(frame = self.frames_ticked, units = self.units.len(), "restart");
        for unit in &mut self.units {
            unit.reset();
        }
    }

    /// Reset a subset of units, in sequence order regardless of the order given.
    ///
    /// All ids are checked before anything is reset.
    pub fn reset(&mut self, ids: &[UnitId]) -> Result<(), SchedulerError> {
        let mut indices = ids
            .iter()
            .map(|&id| self.resolve(id))
            .collect::<Result<Vec<_>, _>>()?;
        indices.sort_unstable();
        indices.dedup();
        for index in indices {
            debug!(index, name = self.units[index].name(), "reset unit");
            self.units[index].reset();
        }
        Ok(())
    }

    pub fn unit(&self, id: UnitId) -> Result<&dyn Animation, SchedulerError> {
        let index = self.resolve(id)?;
        Ok(self.units[index].as_ref())
    }

    /// Units in sequence order, for inspection.
    pub fn units(&self) -> impl Iterator<Item = &dyn Animation> {
        self.units.iter().map(|u| &**u as &dyn Animation)
    }

    fn resolve(&self, id: UnitId) -> Result<usize, SchedulerError> {
        if id.owner == self.id && id.index < self.units.len() {
            Ok(id.index)
        } else {
            Err(SchedulerError::UnknownUnit { index: id.index })
        }
    }
}

//! Scheduler behaviour observed frame by frame through the public API.

use pretty_assertions::assert_eq;

use modulo_circle::engine::animation::Animation;
use modulo_circle::engine::gate::Gate;
use modulo_circle::engine::objects::{Publisher, View};
use modulo_circle::engine::scheduler::{Scheduler, UnitId};
use modulo_circle::renderer::{Canvas, Surface};

/// Counts advances up to `threshold`. Unlocks its successor at `unlock_at`
/// (defaults to the threshold) and publishes its progress for inspection.
struct Counter {
    progress: Publisher<u32>,
    threshold: u32,
    unlock_at: u32,
}

impl Counter {
    fn new(threshold: u32) -> Self {
        Self::unlocking_at(threshold, threshold)
    }

    fn unlocking_at(threshold: u32, unlock_at: u32) -> Self {
        Self {
            progress: Publisher::new(0),
            threshold,
            unlock_at,
        }
    }
}

impl Animation for Counter {
    fn advance(&mut self) {
        let p = self.progress.get();
        if p < self.threshold {
            self.progress.set(p + 1);
        }
    }

    fn render(&self, surface: &mut dyn Surface) {
        surface.text(&self.progress.get().to_string(), 0.0, 0.0);
    }

    fn is_finished(&self) -> bool {
        self.progress.get() >= self.threshold
    }

    fn unlocks_next(&self) -> bool {
        self.progress.get() >= self.unlock_at
    }

    fn reset(&mut self) {
        self.progress.set(0);
    }

    fn name(&self) -> &str {
        "counter"
    }
}

struct Rig {
    scheduler: Scheduler,
    ids: Vec<UnitId>,
    progress: Vec<View<u32>>,
    canvas: Canvas,
}

impl Rig {
    fn new(gate: Gate, units: Vec<Counter>) -> Self {
        let mut scheduler = Scheduler::new(gate);
        let mut ids = Vec::new();
        let mut progress = Vec::new();
        for unit in units {
            progress.push(unit.progress.view());
            ids.push(scheduler.register(Box::new(unit)));
        }
        Self {
            scheduler,
            ids,
            progress,
            canvas: Canvas::new(10, 1),
        }
    }

    /// Run one frame; returns the number of units drawn.
    fn frame(&mut self) -> usize {
        self.canvas.clear();
        self.scheduler.frame(&mut self.canvas)
    }

    fn progress(&self) -> Vec<u32> {
        self.progress.iter().map(View::get).collect()
    }
}

#[test]
fn three_step_pipeline_with_completion_gate() {
    let mut rig = Rig::new(Gate::Completion, (0..3).map(|_| Counter::new(5)).collect());

    for f in 1..=5 {
        assert_eq!(rig.frame(), 1, "frame {f}");
        assert_eq!(rig.progress(), vec![f, 0, 0]);
    }
    assert!(rig.scheduler.unit(rig.ids[0]).unwrap().is_finished());

    assert_eq!(rig.frame(), 2, "frame 6");
    assert_eq!(rig.progress(), vec![5, 1, 0]);

    for _ in 7..=10 {
        assert_eq!(rig.frame(), 2);
    }
    assert_eq!(rig.progress(), vec![5, 5, 0]);

    assert_eq!(rig.frame(), 3, "frame 11");
    assert_eq!(rig.progress(), vec![5, 5, 1]);
}

#[test]
fn restart_returns_to_the_first_unit() {
    let mut rig = Rig::new(Gate::Completion, (0..3).map(|_| Counter::new(5)).collect());
    for _ in 0..20 {
        rig.frame();
    }
    assert_eq!(rig.scheduler.wavefront_len(), 3);

    rig.scheduler.restart();
    assert_eq!(rig.progress(), vec![0, 0, 0]);

    assert_eq!(rig.frame(), 1, "frame 21");
    assert_eq!(rig.progress(), vec![1, 0, 0]);
}

#[test]
fn early_unlock_overlaps_units() {
    let mut rig = Rig::new(
        Gate::EarlyUnlock,
        vec![Counter::unlocking_at(10, 2), Counter::new(3), Counter::new(1)],
    );
    assert_eq!(rig.frame(), 1);
    assert_eq!(rig.frame(), 1);
    // Unit 0 unlocked at the end of frame 2 but is far from finished.
    assert_eq!(rig.frame(), 2);
    assert!(!rig.scheduler.unit(rig.ids[0]).unwrap().is_finished());
    assert_eq!(rig.progress(), vec![3, 1, 0]);
}

#[test]
fn wavefront_is_a_monotonic_prefix_until_reset() {
    let mut rig = Rig::new(
        Gate::EarlyUnlock,
        vec![
            Counter::unlocking_at(6, 2),
            Counter::unlocking_at(4, 4),
            Counter::unlocking_at(9, 1),
            Counter::new(2),
        ],
    );
    let mut previous = 0;
    for _ in 0..20 {
        let drawn = rig.frame();
        assert!(drawn >= 1, "first unit must always be live");
        assert!(drawn >= previous, "wavefront retracted without a reset");
        // Everything behind the wavefront is untouched.
        assert!(rig.progress()[drawn..].iter().all(|&p| p == 0));
        previous = drawn;
    }
    assert_eq!(previous, 4);
}

#[test]
fn partial_reset_retracts_only_what_follows() {
    let mut rig = Rig::new(Gate::Completion, (0..3).map(|_| Counter::new(2)).collect());
    for _ in 0..6 {
        rig.frame();
    }
    assert_eq!(rig.progress(), vec![2, 2, 2]);

    rig.scheduler.reset(&[rig.ids[1]]).unwrap();
    assert_eq!(rig.scheduler.wavefront_len(), 2);
    assert_eq!(rig.progress(), vec![2, 0, 2]);

    // Unit 2 keeps its finished state but is not drawn until unit 1 is done again.
    assert_eq!(rig.frame(), 2);
    assert_eq!(rig.frame(), 2);
    assert_eq!(rig.frame(), 3);
}

#[test]
fn finished_units_keep_rendering() {
    let mut rig = Rig::new(Gate::Completion, vec![Counter::new(1)]);
    rig.frame();
    rig.frame();
    let scene = rig.canvas.take_scene();
    assert_eq!(scene.ops.len(), 1);
    assert_eq!(scene.ops[0].ch, '1');
}

#[test]
fn later_units_draw_on_higher_layers() {
    let mut rig = Rig::new(Gate::Completion, vec![Counter::new(1), Counter::new(1)]);
    rig.frame();
    rig.frame();
    let layers: Vec<_> = rig.canvas.ops().iter().map(|op| op.z_order).collect();
    assert_eq!(layers, vec![0, 1]);
}

#[test]
fn empty_scheduler_draws_nothing() {
    let mut rig = Rig::new(Gate::Completion, Vec::new());
    assert_eq!(rig.frame(), 0);
    assert!(rig.canvas.ops().is_empty());
}

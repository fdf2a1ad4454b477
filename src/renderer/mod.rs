//! Renderer — the deterministic rasterizer.
//!
//! Takes `ResolvedScene`s (recorded by the canvas each frame) and produces
//! `Frame`s for the player: a full grid the first time, cell diffs after that.
//!
//! Rasterizing is pure. The only state kept is the previous grid to diff against.

mod canvas;

pub use canvas::{ASPECT, Canvas, Surface};

use crate::types::{Cell, CellChange, Frame, ResolvedScene, TerminalContract};

pub struct Renderer {
    contract: TerminalContract,
    prev_grid: Option<Vec<Vec<Cell>>>,
}

impl Renderer {
    pub fn new(contract: TerminalContract) -> Self {
        Self {
            contract,
            prev_grid: None,
        }
    }

    pub fn contract(&self) -> TerminalContract {
        self.contract
    }

    /// Change the target size. The next frame is a full frame.
    pub fn resize(&mut self, contract: TerminalContract) {
        self.contract = contract;
        self.prev_grid = None;
    }

    /// Force the next frame to be a full frame.
    pub fn invalidate(&mut self) {
        self.prev_grid = None;
    }

    /// Render one scene into a frame.
    ///
    /// The first frame after construction, a resize or `invalidate` is a full
    /// frame. Subsequent frames are diffs against the previous frame.
    pub fn render(&mut self, scene: &ResolvedScene) -> Frame {
        let grid = Self::rasterize(scene, &self.contract);
        let frame = match &self.prev_grid {
            None => Frame::Full {
                cells: grid.clone(),
            },
            Some(prev) => Frame::Diff {
                changes: Self::diff(prev, &grid),
            },
        };
        self.prev_grid = Some(grid);
        frame
    }

    /// Rasterize a resolved scene onto a fixed-size cell grid.
    ///
    /// Draw operations are sorted by z-order so that higher z values
    /// paint over lower ones; ties keep draw order.
    pub fn rasterize(scene: &ResolvedScene, contract: &TerminalContract) -> Vec<Vec<Cell>> {
        let w = contract.width as usize;
        let h = contract.height as usize;
        let mut grid = vec![vec![Cell::default(); w]; h];

        let mut ops: Vec<_> = scene.ops.iter().collect();
        ops.sort_by_key(|op| op.z_order);

        for op in ops {
            let x = op.x as usize;
            let y = op.y as usize;
            if x < w && y < h {
                grid[y][x] = Cell {
                    ch: op.ch,
                    style: op.style,
                };
            }
        }

        grid
    }

    /// Compute a cell-level diff between two grids.
    pub fn diff(prev: &[Vec<Cell>], next: &[Vec<Cell>]) -> Vec<CellChange> {
        let mut changes = Vec::new();
        for (y, (prev_row, next_row)) in prev.iter().zip(next.iter()).enumerate() {
            for (x, (prev_cell, next_cell)) in prev_row.iter().zip(next_row.iter()).enumerate() {
                if prev_cell != next_cell {
                    changes.push(CellChange {
                        x: x as u16,
                        y: y as u16,
                        cell: next_cell.clone(),
                    });
                }
            }
        }
        changes
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::types::{DrawOp, Style};

    fn op(x: u16, y: u16, ch: char, z_order: i32) -> DrawOp {
        DrawOp { x, y, ch, style: Style::default(), z_order }
    }

    fn scene(ops: Vec<DrawOp>) -> ResolvedScene {
        ResolvedScene { ops }
    }

    const CONTRACT: TerminalContract = TerminalContract { width: 3, height: 2 };

    #[test]
    fn higher_layers_paint_over_lower_ones() {
        let grid = Renderer::rasterize(&scene(vec![op(1, 1, 'b', 1), op(1, 1, 'a', 0)]), &CONTRACT);
        assert_eq!(grid[1][1].ch, 'b');
    }

    #[test]
    fn same_layer_keeps_draw_order() {
        let grid = Renderer::rasterize(&scene(vec![op(0, 0, 'a', 0), op(0, 0, 'b', 0)]), &CONTRACT);
        assert_eq!(grid[0][0].ch, 'b');
    }

    #[test]
    fn first_frame_is_full_then_diffs() {
        let mut r = Renderer::new(CONTRACT);
        assert!(matches!(r.render(&scene(vec![op(0, 0, 'x', 0)])), Frame::Full { .. }));

        let Frame::Diff { changes } = r.render(&scene(vec![op(2, 1, 'y', 0)])) else {
            panic!("expected a diff frame");
        };
        assert_eq!(
            changes,
            vec![
                CellChange { x: 0, y: 0, cell: Cell::default() },
                CellChange { x: 2, y: 1, cell: Cell { ch: 'y', style: Style::default() } },
            ]
        );

        r.invalidate();
        assert!(matches!(r.render(&scene(vec![])), Frame::Full { .. }));
    }
}

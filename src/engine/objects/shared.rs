//! Single-writer shared values.
//!
//! Lets one animation publish part of its progress (ring radius, current
//! factor) for later units and the HUD to read within the same frame. Only
//! the [`Publisher`] can write; [`View`]s are read-only. Both are `!Send`,
//! which keeps them on the frame-pump thread.

use std::cell::Cell;
use std::rc::Rc;

pub struct Publisher<T: Copy>(Rc<Cell<T>>);

impl<T: Copy> Publisher<T> {
    pub fn new(value: T) -> Self {
        Self(Rc::new(Cell::new(value)))
    }

    pub fn set(&self, value: T) {
        self.0.set(value);
    }

    pub fn get(&self) -> T {
        self.0.get()
    }

    pub fn view(&self) -> View<T> {
        View(Rc::clone(&self.0))
    }
}

#[derive(Clone)]
pub struct View<T: Copy>(Rc<Cell<T>>);

impl<T: Copy> View<T> {
    pub fn get(&self) -> T {
        self.0.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn views_see_latest_value() {
        let p = Publisher::new(1);
        let v = p.view();
        let w = v.clone();
        p.set(7);
        assert_eq!((v.get(), w.get(), p.get()), (7, 7, 7));
    }
}

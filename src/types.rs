//! Shared boundary types for the modulo circle renderer.
//!
//! This module defines the two key data contracts:
//! - Animations → Renderer (in-memory): `ResolvedScene` containing `DrawOp`s
//! - Renderer → Player (in-memory): `Frame`s of `Cell`s ready for the terminal

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Shared style primitives
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Color {
    Named(NamedColor),
    Rgb { r: u8, g: u8, b: u8 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NamedColor {
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
}

impl Color {
    /// Build a color from hue (degrees, wrapped into 0..360), saturation and
    /// brightness (both 0..=100).
    pub fn hsb(hue: f64, saturation: f64, brightness: f64) -> Self {
        let (r, g, b) = hsb_to_rgb(hue, saturation, brightness);
        Color::Rgb { r, g, b }
    }
}

/// Sextant HSB → RGB conversion.
pub fn hsb_to_rgb(hue: f64, saturation: f64, brightness: f64) -> (u8, u8, u8) {
    let h = hue.rem_euclid(360.0) / 60.0;
    let s = (saturation / 100.0).clamp(0.0, 1.0);
    let v = (brightness / 100.0).clamp(0.0, 1.0);

    let c = v * s;
    let x = c * (1.0 - (h % 2.0 - 1.0).abs());
    let m = v - c;

    let (r, g, b) = match h as u8 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    let to_byte = |f: f64| ((f + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    (to_byte(r), to_byte(g), to_byte(b))
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Style {
    pub fg: Option<Color>,
    pub bg: Option<Color>,
    pub bold: bool,
    pub dim: bool,
}

// ---------------------------------------------------------------------------
// Animations → Renderer boundary
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct DrawOp {
    pub x: u16,
    pub y: u16,
    pub ch: char,
    pub style: Style,
    pub z_order: i32,
}

#[derive(Debug, Clone, Default)]
pub struct ResolvedScene {
    pub ops: Vec<DrawOp>,
}

// ---------------------------------------------------------------------------
// Renderer → Player boundary
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerminalContract {
    pub width: u16,
    pub height: u16,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub style: Style,
}

impl Default for Cell {
    fn default() -> Self {
        Cell {
            ch: ' ',
            style: Style::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellChange {
    pub x: u16,
    pub y: u16,
    pub cell: Cell,
}

#[derive(Debug, Clone)]
pub enum Frame {
    Full { cells: Vec<Vec<Cell>> },
    Diff { changes: Vec<CellChange> },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primary_hues() {
        assert_eq!(hsb_to_rgb(0.0, 100.0, 100.0), (255, 0, 0));
        assert_eq!(hsb_to_rgb(120.0, 100.0, 100.0), (0, 255, 0));
        assert_eq!(hsb_to_rgb(240.0, 100.0, 100.0), (0, 0, 255));
    }

    #[test]
    fn hue_wraps_around() {
        assert_eq!(hsb_to_rgb(360.0, 100.0, 100.0), hsb_to_rgb(0.0, 100.0, 100.0));
        assert_eq!(hsb_to_rgb(-120.0, 100.0, 100.0), hsb_to_rgb(240.0, 100.0, 100.0));
    }

    #[test]
    fn zero_saturation_is_grey() {
        assert_eq!(hsb_to_rgb(200.0, 0.0, 100.0), (255, 255, 255));
        assert_eq!(hsb_to_rgb(200.0, 0.0, 0.0), (0, 0, 0));
    }

    #[test]
    fn named_and_rgb_colors_deserialize() {
        let named: Color = serde_json::from_str("\"cyan\"").unwrap();
        assert_eq!(named, Color::Named(NamedColor::Cyan));
        let rgb: Color = serde_json::from_str(r#"{"r":1,"g":2,"b":3}"#).unwrap();
        assert_eq!(rgb, Color::Rgb { r: 1, g: 2, b: 3 });
    }
}

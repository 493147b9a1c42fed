//! Mapping from element values to square fills.
//!
//! The hue assignment and the value-to-shade / value-to-alpha convention
//! have to match existing plots made with this tool, so they are fixed.

use crate::{config::ColorMode, types::Element};

/// Renderable fill of a square or label. Channels are in `[0, 1]` but are
/// stored unclamped.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Fill {
    /// Grayscale shade, 0 = black, 1 = white.
    Gray(f64),
    /// Straight (non-premultiplied) RGBA.
    Rgba([f64; 4]),
}

pub const RED: [f64; 3] = [1.0, 0.0, 0.0];
pub const YELLOW: [f64; 3] = [1.0, 1.0, 0.0];
pub const CYAN: [f64; 3] = [0.0, 1.0, 1.0];
pub const BLUE: [f64; 3] = [0.0, 0.0, 1.0];

impl Fill {
    /// Converts to 8-bit straight RGBA, clamping out-of-range channels.
    pub fn to_rgba8(self) -> [u8; 4] {
        match self {
            Fill::Gray(v) => {
                let c = unit_to_u8(v);
                [c, c, c, u8::MAX]
            }
            Fill::Rgba(channels) => channels.map(unit_to_u8),
        }
    }
}

fn unit_to_u8(v: f64) -> u8 {
    // NaN casts to 0.
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Fixed color-mode hue of an element.
pub fn hue(element: Element) -> [f64; 3] {
    match element {
        Element::OneOne => YELLOW,
        Element::OneTwo => RED,
        Element::TwoOne => CYAN,
        Element::TwoTwo => BLUE,
    }
}

/// Maps an element value to its fill.
///
/// - [`ColorMode::Bw`]: `Gray(value)`, the same for every element.
/// - [`ColorMode::Color`]: the element's [`hue`] with `value` as alpha.
pub fn fill_for(element: Element, value: f64, mode: ColorMode) -> Fill {
    match mode {
        ColorMode::Bw => Fill::Gray(value),
        ColorMode::Color => {
            let [r, g, b] = hue(element);
            Fill::Rgba([r, g, b, value])
        }
    }
}

/// Label text color: red on grayscale squares, black on colored ones.
pub fn label_color(mode: ColorMode) -> Fill {
    match mode {
        ColorMode::Bw => Fill::Rgba([1.0, 0.0, 0.0, 1.0]),
        ColorMode::Color => Fill::Rgba([0.0, 0.0, 0.0, 1.0]),
    }
}

//! The 2x2 grid of element squares and their labels.
//!
//! World coordinates run from [`WORLD_MIN`] to [`WORLD_MAX`] on both axes
//! with y pointing up. Each element owns a `SHIFT x SHIFT` cell; its square
//! is inset by [`BORDER`] on every side and its label sits at the cell
//! center.

use anyhow::{Result, anyhow};
use glam::Vec2;
use tracing::{debug, trace};

use crate::{
    color::{Fill, fill_for, label_color},
    config::ColorMode,
    table::{DensityRow, DensityTable},
    types::{Element, FrameIndex},
};

/// Cell size.
pub const SHIFT: f32 = 10.0;
/// Gap between a square and the edge of its cell.
pub const BORDER: f32 = 0.1;
/// Side length of a square.
pub const SIDE: f32 = SHIFT - 2.0 * BORDER;
/// Lower bound of the visible world window on both axes.
pub const WORLD_MIN: f32 = -1.0;
/// Upper bound of the visible world window on both axes.
pub const WORLD_MAX: f32 = 21.0;

/// Lower-left corner of the element's grid cell.
fn cell_origin(element: Element) -> Vec2 {
    match element {
        Element::OneOne => Vec2::new(0.0, SHIFT),
        Element::OneTwo => Vec2::new(SHIFT, SHIFT),
        Element::TwoOne => Vec2::new(0.0, 0.0),
        Element::TwoTwo => Vec2::new(SHIFT, 0.0),
    }
}

/// Square of one matrix element.
///
/// Geometry is fixed at construction; only `fill` changes per frame.
///
/// ### Fields
/// - `element` - Matrix element this square shows.
/// - `min` - Lower-left corner in world units.
/// - `side` - Side length in world units ([`SIDE`]).
/// - `fill` - Color for the current frame, see [`fill_for`].
#[derive(Clone, Debug, PartialEq)]
pub struct Square {
    pub element: Element,
    pub min: Vec2,
    pub side: f32,
    pub fill: Fill,
}

impl Square {
    /// Upper-right corner in world units.
    pub fn max(&self) -> Vec2 {
        self.min + Vec2::splat(self.side)
    }

    /// Whether `p` lies inside the square (edges included).
    pub fn contains(&self, p: Vec2) -> bool {
        let max = self.max();
        p.x >= self.min.x && p.x <= max.x && p.y >= self.min.y && p.y <= max.y
    }
}

/// Static ket-bra label of one element, created once per scene.
///
/// ### Fields
/// - `element` - Matrix element this label names.
/// - `pos` - Text center in world units (center of the element's cell).
/// - `text` - Ket-bra notation, see [`Element::ket_bra`].
/// - `color` - Text color, see [`label_color`].
#[derive(Clone, Debug, PartialEq)]
pub struct Label {
    pub element: Element,
    pub pos: Vec2,
    pub text: &'static str,
    pub color: Fill,
}

/// Lifecycle of a [`Scene`].
///
/// A scene starts in `Initialized` after [`Scene::build`]. Each
/// [`Scene::apply_frame`] moves it to `Playing(frame)`, and
/// [`Scene::reset`] moves it back.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SceneState {
    /// Squares show row 0, no frame has been applied yet.
    Initialized,
    /// Squares show the given frame.
    Playing(FrameIndex),
}

/// Four recolorable squares plus four static labels.
#[derive(Clone, Debug)]
pub struct Scene {
    squares: [Square; 4],
    labels: [Label; 4],
    mode: ColorMode,
    state: SceneState,
}

impl Scene {
    /// Creates the squares colored from row 0 and the static labels.
    ///
    /// ### Errors
    /// Fails if `table` has no rows, since there is nothing to show.
    #[tracing::instrument(level = "debug", skip(table))]
    pub fn build(table: &DensityTable, mode: ColorMode) -> Result<Self> {
        let first = table
            .row(0)
            .ok_or_else(|| anyhow!("Input table has no rows, nothing to animate"))?;

        let squares = Element::ALL.map(|element| Square {
            element,
            min: cell_origin(element) + Vec2::splat(BORDER),
            side: SIDE,
            fill: fill_for(element, first.value(element), mode),
        });

        let color = label_color(mode);
        let labels = Element::ALL.map(|element| Label {
            element,
            pos: cell_origin(element) + Vec2::splat(SHIFT / 2.0),
            text: element.ket_bra(),
            color,
        });

        debug!(frames = table.len(), %mode, "Built scene");
        Ok(Self {
            squares,
            labels,
            mode,
            state: SceneState::Initialized,
        })
    }

    /// Recolors every square from row `frame` of `table`.
    ///
    /// ### Panics
    /// Panics if `frame` is out of bounds for `table`.
    pub fn apply_frame(&mut self, table: &DensityTable, frame: FrameIndex) {
        self.recolor(&table.rows()[frame]);
        self.state = SceneState::Playing(frame);
        trace!(frame, "Applied frame");
    }

    /// Returns to the freshly built state (row 0, no frame applied).
    ///
    /// ### Panics
    /// Panics if `table` is empty.
    pub fn reset(&mut self, table: &DensityTable) {
        self.recolor(&table.rows()[0]);
        self.state = SceneState::Initialized;
    }

    fn recolor(&mut self, row: &DensityRow) {
        for sq in &mut self.squares {
            sq.fill = fill_for(sq.element, row.value(sq.element), self.mode);
        }
    }

    /// Squares in [`Element::ALL`] order.
    pub fn squares(&self) -> &[Square; 4] {
        &self.squares
    }

    /// Labels in [`Element::ALL`] order.
    pub fn labels(&self) -> &[Label; 4] {
        &self.labels
    }

    pub fn square(&self, element: Element) -> &Square {
        // Squares are stored in `Element::ALL` order.
        &self.squares[element.column() - 1]
    }

    pub fn mode(&self) -> ColorMode {
        self.mode
    }

    pub fn state(&self) -> SceneState {
        self.state
    }
}

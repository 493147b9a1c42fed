//! Core of the density-matrix element viewer.
//!
//! Main components:
//! - [`config`] — color mode and run configuration.
//! - [`table`] — loading or synthesizing the element time series.
//! - [`color`] — mapping element values to fills.
//! - [`scene`] — the 2x2 grid of squares and labels.
//! - [`player`] — timed, frame-by-frame playback of a table.
//! - [`export`] — offline GIF export of the animation.
//! - [`types`] — shared element and frame identifiers.

pub mod color;
pub mod config;
pub mod export;
pub mod player;
pub mod scene;
pub mod table;
pub mod types;

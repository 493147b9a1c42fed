//! Timed playback of a [`DensityTable`] through a [`Scene`].
//!
//! The player is the frame-update state machine: it owns the table and
//! the scene and, on every [`Player::tick`], applies the next row once the
//! frame interval has elapsed. Playback runs `0..frame_count` exactly once
//! and then stays on the last frame.

use std::time::Duration;

use anyhow::Result;
use tracing::{debug, info};

use crate::{
    config::ColorMode,
    scene::Scene,
    table::{DensityRow, DensityTable},
    types::FrameIndex,
};

/// The whole animation is paced so that `frame_count` frames take about
/// `frame_count / PACING_DIVISOR` milliseconds each.
pub const PACING_DIVISOR: usize = 30;

/// Delay between two frames for a table of `frame_count` rows.
///
/// Tables shorter than [`PACING_DIVISOR`] rows get a zero interval and
/// advance on every repaint.
pub fn frame_interval(frame_count: usize) -> Duration {
    Duration::from_millis((frame_count / PACING_DIVISOR) as u64)
}

/// Playback state for one loaded table.
///
/// [`Player`] owns the immutable [`DensityTable`] and the [`Scene`] it
/// recolors. The display driver calls [`Player::tick`] with its clock on
/// every repaint. The player decides whether the next frame is due.
///
/// ### Fields
/// - `table` - Loaded rows; row `i` drives frame `i`.
/// - `scene` - Squares and labels showing the current frame.
/// - `interval` - Minimum time between two applied frames, see [`frame_interval`].
/// - `next_frame` - Frame that the next successful tick will apply.
/// - `last_tick_time` - Clock value (seconds) of the last applied frame.
#[derive(Debug)]
pub struct Player {
    table: DensityTable,
    scene: Scene,
    interval: Duration,

    next_frame: FrameIndex,
    last_tick_time: Option<f64>,
}

impl Player {
    /// Builds the scene for `table` and prepares playback from frame 0.
    ///
    /// ### Errors
    /// Fails if `table` is empty.
    pub fn new(table: DensityTable, mode: ColorMode) -> Result<Self> {
        let scene = Scene::build(&table, mode)?;
        let interval = frame_interval(table.len());
        debug!(
            frames = table.len(),
            interval_ms = interval.as_millis() as u64,
            "Player ready"
        );

        Ok(Self {
            table,
            scene,
            interval,
            next_frame: 0,
            last_tick_time: None,
        })
    }

    /// Applies the next frame if the interval has elapsed since the last one.
    ///
    /// The first tick always applies frame 0.
    ///
    /// ### Parameters
    /// - `now` - Monotonic time in seconds (e.g. egui's `input.time`).
    ///
    /// ### Returns
    /// The index of the frame applied by this call, or `None` if it was too
    /// early or playback has finished.
    pub fn tick(&mut self, now: f64) -> Option<FrameIndex> {
        if self.is_finished() {
            return None;
        }

        if let Some(last) = self.last_tick_time
            && now - last < self.interval.as_secs_f64()
        {
            return None;
        }

        let frame = self.next_frame;
        self.scene.apply_frame(&self.table, frame);
        self.next_frame += 1;
        self.last_tick_time = Some(now);

        if self.is_finished() {
            info!(frames = self.frame_count(), "Reached last frame");
        }
        Some(frame)
    }

    /// Rewinds to the state right after construction.
    pub fn restart(&mut self) {
        self.scene.reset(&self.table);
        self.next_frame = 0;
        self.last_tick_time = None;
        debug!("Playback restarted");
    }

    /// Returns `true` once every row has been applied.
    pub fn is_finished(&self) -> bool {
        self.next_frame >= self.table.len()
    }

    /// Most recently applied frame, `None` before the first tick.
    pub fn current_frame(&self) -> Option<FrameIndex> {
        self.next_frame.checked_sub(1)
    }

    /// Row currently shown by the scene (row 0 before the first tick).
    pub fn current_row(&self) -> &DensityRow {
        &self.table.rows()[self.current_frame().unwrap_or(0)]
    }

    /// Number of frames, i.e. rows of the table.
    pub fn frame_count(&self) -> usize {
        self.table.len()
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn table(&self) -> &DensityTable {
        &self.table
    }
}

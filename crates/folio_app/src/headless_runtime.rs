//! Fixed-step frame loop used by scenario runs.
//!
//! Time never comes from the wall clock: frame `n` of a run sits at
//! `(n + 1) * tick_ms` logical milliseconds after the run began.

use crate::config::FolioConfig;
use anyhow::{ensure, Result};

#[derive(Debug, Clone, Copy)]
pub struct HeadlessRunConfig {
    /// Viewport size in logical pixels
    pub width: f32,
    pub height: f32,
    pub max_frames: u32,
    pub tick_ms: u64,
}

impl Default for HeadlessRunConfig {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 800.0,
            max_frames: 1,
            tick_ms: 16,
        }
    }
}

impl HeadlessRunConfig {
    /// Viewport and tick length from the page configuration, one frame
    pub fn from_config(config: &FolioConfig) -> Self {
        Self {
            width: config.viewport.width,
            height: config.viewport.height,
            tick_ms: config.motion.tick_ms,
            ..Self::default()
        }
    }

    pub fn with_frames(self, max_frames: u32) -> Self {
        Self { max_frames, ..self }
    }

    fn validate(&self) -> Result<()> {
        ensure!(
            self.width > 0.0 && self.height > 0.0,
            "viewport {}x{} has no area",
            self.width,
            self.height
        );
        ensure!(self.max_frames > 0, "frame budget is empty");
        ensure!(self.tick_ms > 0, "tick length must be at least 1ms");
        Ok(())
    }
}

/// Position of one frame inside a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeadlessContext {
    pub frame_index: u32,
    pub elapsed_ms: u64,
}

pub struct HeadlessRuntime;

impl HeadlessRuntime {
    /// Calls `on_frame` once per frame in the budget. The first error stops
    /// the loop and is returned.
    pub fn run<F>(cfg: HeadlessRunConfig, mut on_frame: F) -> Result<()>
    where
        F: FnMut(&HeadlessContext) -> Result<()>,
    {
        cfg.validate()?;
        frames(cfg).try_for_each(|ctx| on_frame(&ctx))
    }
}

fn frames(cfg: HeadlessRunConfig) -> impl Iterator<Item = HeadlessContext> {
    (0..cfg.max_frames).map(move |frame_index| HeadlessContext {
        frame_index,
        elapsed_ms: (u64::from(frame_index) + 1).saturating_mul(cfg.tick_ms),
    })
}

/// Whole frames spanning `wait_ms`; a partial tick counts as one
pub fn wait_frames(wait_ms: u64, tick_ms: u64) -> u32 {
    let frames = wait_ms.div_ceil(tick_ms.max(1));
    u32::try_from(frames).unwrap_or(u32::MAX)
}

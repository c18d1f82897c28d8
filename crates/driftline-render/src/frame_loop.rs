//! Self-rescheduling frame loop with an explicit stop signal.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

/// Default frames per second.
pub const DEFAULT_FPS: u32 = 60;

/// Cloneable handle that ends a [`FrameLoop`].
#[derive(Debug, Clone, Default)]
pub struct StopSignal(Arc<AtomicBool>);

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the loop to stop before its next frame.
    pub fn stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// One scheduled frame.
#[derive(Debug, Clone, Copy)]
pub struct FrameTick {
    /// Milliseconds since the loop started.
    pub now_ms: f64,
    /// When the next frame is due.
    pub deadline: Instant,
}

impl FrameTick {
    /// Time left in this frame's budget.
    pub fn remaining(&self) -> Duration {
        self.deadline.saturating_duration_since(Instant::now())
    }
}

/// Calls a tick closure once per frame interval until stopped.
#[derive(Debug, Clone)]
pub struct FrameLoop {
    interval: Duration,
    stop: StopSignal,
}

impl Default for FrameLoop {
    fn default() -> Self {
        Self::new(DEFAULT_FPS)
    }
}

impl FrameLoop {
    /// Create a loop targeting `fps` frames per second (at least one).
    pub fn new(fps: u32) -> Self {
        Self {
            interval: Duration::from_secs_f64(1.0 / fps.max(1) as f64),
            stop: StopSignal::new(),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Handle that stops this loop.
    pub fn stop_signal(&self) -> StopSignal {
        self.stop.clone()
    }

    /// Run until the stop signal is raised or `tick` fails.
    ///
    /// Returns the number of frames run.
    pub fn run<E, F>(&self, mut tick: F) -> Result<u64, E>
    where
        F: FnMut(FrameTick) -> Result<(), E>,
    {
        let start = Instant::now();
        let mut frames = 0;

        while !self.stop.is_stopped() {
            let frame_start = Instant::now();
            let deadline = frame_start + self.interval;
            let now_ms = frame_start.duration_since(start).as_secs_f64() * 1000.0;

            tick(FrameTick { now_ms, deadline })?;
            frames += 1;

            let remaining = deadline.saturating_duration_since(Instant::now());
            if !remaining.is_zero() && !self.stop.is_stopped() {
                thread::sleep(remaining);
            }
        }

        Ok(frames)
    }
}

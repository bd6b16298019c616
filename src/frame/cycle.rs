use chrono::{DateTime, Local};
use statum::{machine, state};
use tracing::debug;

use super::job::{FrameView, JobList};
use super::FrameError;
use crate::controller::{ControllerRegistry, RawJoystick};
use crate::gpu::{GpuBackend, ProgramGuard};
use crate::input::FrameInput;

// Outcome of the stepping phase, carried into drawing
#[derive(Debug, Clone)]
pub struct StepSummary {
    pub delta: f64,
    pub finished: usize,
}

/// What one complete frame did.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameReport {
    pub frame: u64,
    pub delta: f64,
    pub jobs: usize,
    pub finished: usize,
    pub controllers: usize,
}

// Phases of one frame; a frame can only step after polling and draw after stepping
#[state]
#[derive(Debug, Clone)]
pub enum FramePhase {
    Polling,
    Stepping,
    Drawing(StepSummary),
}

#[machine]
#[derive(Debug)]
pub struct FrameCycle<S: FramePhase> {
    frame: u64,
    started: DateTime<Local>,
    delta: f64,
}

impl<S: FramePhase> FrameCycle<S> {
    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn started(&self) -> DateTime<Local> {
        self.started
    }
}

impl FrameCycle<Polling> {
    pub fn begin(frame: u64, started: DateTime<Local>, previous: Option<DateTime<Local>>) -> Self {
        let delta = previous
            .and_then(|previous| (started - previous).to_std().ok())
            .map(|elapsed| elapsed.as_secs_f64())
            .unwrap_or(0.0);
        debug!(
            "Starting frame {} at {} (delta {:.2} ms)",
            frame,
            started.format("%H:%M:%S.%3f"),
            delta * 1000.0
        );
        Self::new(frame, started, delta)
    }

    // Latches everything that was recorded since the last frame
    pub fn poll<J: RawJoystick>(
        self,
        input: &mut FrameInput,
        controllers: &mut ControllerRegistry<J>,
    ) -> FrameCycle<Stepping> {
        input.advance();
        controllers.poll();
        debug!(
            "Frame {}: input cycle {}, {} controller(s) polled",
            self.frame,
            input.cycle(),
            controllers.len()
        );
        self.transition()
    }
}

impl FrameCycle<Stepping> {
    pub fn step<G: GpuBackend, J: RawJoystick>(
        self,
        jobs: &mut JobList<G, J>,
        input: &FrameInput,
        controllers: &ControllerRegistry<J>,
    ) -> FrameCycle<Drawing> {
        let view = FrameView {
            input,
            controllers,
            frame: self.frame,
            delta: self.delta,
        };
        let finished = jobs.step_all(&view);
        if finished > 0 {
            debug!("Frame {}: {} job(s) finished", self.frame, finished);
        }
        let summary = StepSummary {
            delta: self.delta,
            finished,
        };
        self.transition_with(summary)
    }
}

impl FrameCycle<Drawing> {
    pub fn draw<G: GpuBackend, J: RawJoystick>(
        self,
        jobs: &JobList<G, J>,
        guard: &ProgramGuard<G>,
        controllers: usize,
    ) -> Result<FrameReport, FrameError> {
        let (delta, finished) = match self.get_state_data() {
            Some(summary) => (summary.delta, summary.finished),
            None => (self.delta, 0),
        };
        jobs.draw_all(guard)?;
        Ok(FrameReport {
            frame: self.frame,
            delta,
            jobs: jobs.len(),
            finished,
            controllers,
        })
    }
}

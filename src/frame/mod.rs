//! Frame loop driver
//!
//! One frame runs three phases, enforced by the [`cycle::FrameCycle`] typestate:
//!
//! 1. **Polling** - latch keyboard/mouse input and every attached controller
//! 2. **Stepping** - run each job's logic, dropping the ones that finished
//! 3. **Drawing** - let each job render through the program guard
//!
//! [`Engine`] owns all per-loop state and runs the cycle via [`Engine::run_frame`].

pub mod cycle;
pub mod engine;
pub mod job;
pub mod stats;

pub use cycle::{FrameCycle, FrameReport};
pub use engine::Engine;
pub use job::{FrameView, Job, JobList, JobStatus};
pub use stats::{FrameStats, StatsWindow};

use crate::gpu::GuardError;

#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    #[error("Job '{job}' failed to draw: {source}")]
    Draw {
        job: String,
        #[source]
        source: GuardError,
    },
}

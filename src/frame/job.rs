use crate::controller::{ControllerRegistry, RawJoystick};
use crate::gpu::{GpuBackend, GuardError, ProgramGuard};
use crate::input::FrameInput;
use tracing::{debug, info};

use super::FrameError;

/// What a job wants after its step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    Continue,
    /// Remove the job before this frame is drawn.
    Finished,
}

/// Read-only view of the frame's input, handed to every job's step.
#[derive(Debug)]
pub struct FrameView<'a, J: RawJoystick> {
    pub input: &'a FrameInput,
    pub controllers: &'a ControllerRegistry<J>,
    pub frame: u64,
    /// Seconds since the previous frame started, `0.0` on the first frame.
    pub delta: f64,
}

/// Something that runs once per frame: logic in `step`, rendering in `draw`.
pub trait Job<G: GpuBackend, J: RawJoystick> {
    fn name(&self) -> &str {
        "job"
    }

    fn step(&mut self, view: &FrameView<'_, J>) -> JobStatus;

    fn draw(&self, _guard: &ProgramGuard<G>) -> Result<(), GuardError> {
        Ok(())
    }
}

/// Owning list of jobs, stepped and drawn in insertion order.
pub struct JobList<G: GpuBackend, J: RawJoystick> {
    jobs: Vec<Box<dyn Job<G, J>>>,
}

impl<G: GpuBackend, J: RawJoystick> Default for JobList<G, J> {
    fn default() -> Self {
        Self { jobs: Vec::new() }
    }
}

impl<G: GpuBackend, J: RawJoystick> std::fmt::Debug for JobList<G, J> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.jobs.iter().map(|job| job.name()))
            .finish()
    }
}

impl<G: GpuBackend, J: RawJoystick> JobList<G, J> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, job: Box<dyn Job<G, J>>) {
        info!("Adding job '{}' ({} total)", job.name(), self.jobs.len() + 1);
        self.jobs.push(job);
    }

    /// Removes every job with the given name and returns how many went.
    pub fn remove(&mut self, name: &str) -> usize {
        let before = self.jobs.len();
        self.jobs.retain(|job| job.name() != name);
        let removed = before - self.jobs.len();
        if removed > 0 {
            info!("Removed {} job(s) named '{}'", removed, name);
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.jobs.iter().map(|job| job.name())
    }

    /// Steps every job and drops the ones that finished. Returns the number dropped.
    pub fn step_all(&mut self, view: &FrameView<'_, J>) -> usize {
        let before = self.jobs.len();
        self.jobs.retain_mut(|job| match job.step(view) {
            JobStatus::Continue => true,
            JobStatus::Finished => {
                debug!("Job '{}' finished in frame {}", job.name(), view.frame);
                false
            }
        });
        before - self.jobs.len()
    }

    /// Draws all jobs, stopping at the first failure.
    pub fn draw_all(&self, guard: &ProgramGuard<G>) -> Result<(), FrameError> {
        for job in &self.jobs {
            job.draw(guard).map_err(|source| FrameError::Draw {
                job: job.name().to_owned(),
                source,
            })?;
        }
        Ok(())
    }

    pub fn clear(&mut self) {
        self.jobs.clear();
    }
}

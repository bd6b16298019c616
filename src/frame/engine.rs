use chrono::{DateTime, Local};
use std::time::Duration;
use tracing::{info, warn};

use super::cycle::{FrameCycle, FrameReport};
use super::job::{Job, JobList};
use super::stats::{FrameStats, StatsWindow};
use super::FrameError;
use crate::config::EngineSettings;
use crate::controller::{ControllerRegistry, RawJoystick};
use crate::gpu::{GpuBackend, ProgramGuard};
use crate::input::FrameInput;

/// Everything one frame loop owns: input, controllers, the GPU program guard and the jobs.
///
/// Platform code feeds events in between frames (`input_mut`, `controllers_mut`)
/// and calls [`run_frame`](Self::run_frame) once per frame.
#[derive(Debug)]
pub struct Engine<G: GpuBackend, J: RawJoystick> {
    settings: EngineSettings,
    input: FrameInput,
    controllers: ControllerRegistry<J>,
    guard: ProgramGuard<G>,
    jobs: JobList<G, J>,
    stats: FrameStats,
    frame: u64,
    last_frame: Option<DateTime<Local>>,
    last_window: Option<StatsWindow>,
}

impl<G: GpuBackend, J: RawJoystick> Engine<G, J> {
    pub fn init(settings: EngineSettings, gpu: G) -> Self {
        info!(
            "Initializing engine '{}' ({}x{}, target {} fps)",
            settings.window.title, settings.window.width, settings.window.height, settings.target_fps
        );
        let stats = FrameStats::new(settings.stats_interval_seconds, Local::now());
        Self {
            input: FrameInput::new(),
            controllers: ControllerRegistry::new(),
            guard: ProgramGuard::new(gpu),
            jobs: JobList::new(),
            stats,
            frame: 0,
            last_frame: None,
            last_window: None,
            settings,
        }
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn input(&self) -> &FrameInput {
        &self.input
    }

    pub fn input_mut(&mut self) -> &mut FrameInput {
        &mut self.input
    }

    pub fn controllers(&self) -> &ControllerRegistry<J> {
        &self.controllers
    }

    pub fn controllers_mut(&mut self) -> &mut ControllerRegistry<J> {
        &mut self.controllers
    }

    pub fn guard(&self) -> &ProgramGuard<G> {
        &self.guard
    }

    pub fn gpu(&self) -> &G {
        self.guard.gpu()
    }

    pub fn add_job(&mut self, job: Box<dyn Job<G, J>>) {
        self.jobs.add(job);
    }

    pub fn remove_job(&mut self, name: &str) -> usize {
        self.jobs.remove(name)
    }

    pub fn jobs(&self) -> &JobList<G, J> {
        &self.jobs
    }

    /// Number of frames run so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// The most recent closed statistics window.
    pub fn last_stats(&self) -> Option<&StatsWindow> {
        self.last_window.as_ref()
    }

    /// Time one frame may take at the configured rate, `None` when uncapped.
    pub fn frame_budget(&self) -> Option<Duration> {
        match self.settings.target_fps {
            0 => None,
            fps => Some(Duration::from_secs_f64(1.0 / f64::from(fps))),
        }
    }

    /// Polls input, steps all jobs, then draws them.
    pub fn run_frame(&mut self) -> Result<FrameReport, FrameError> {
        let started = Local::now();
        self.frame += 1;

        let cycle = FrameCycle::begin(self.frame, started, self.last_frame);
        self.last_frame = Some(started);

        let cycle = cycle.poll(&mut self.input, &mut self.controllers);
        let cycle = cycle.step(&mut self.jobs, &self.input, &self.controllers);
        let report = cycle.draw(&self.jobs, &self.guard, self.controllers.len())?;

        if self.guard.reference_count() != 0 {
            warn!(
                "Frame {} ended with {} open shader scope(s)",
                self.frame,
                self.guard.reference_count()
            );
        }

        let finished_at = Local::now();
        if let Some(window) = self.stats.record(finished_at - started, finished_at) {
            self.last_window = Some(window);
        }
        Ok(report)
    }

    /// Drops all jobs and controllers, releasing their GPU programs and joysticks.
    ///
    /// The engine stays usable afterwards, as if freshly initialized.
    pub fn teardown(&mut self) {
        info!(
            "Tearing down engine after {} frames ({} job(s), {} controller(s))",
            self.frame,
            self.jobs.len(),
            self.controllers.len()
        );
        self.jobs.clear();
        self.controllers.clear();
        self.input = FrameInput::new();
        self.stats.reset(Local::now());
        self.frame = 0;
        self.last_frame = None;
        self.last_window = None;
    }
}

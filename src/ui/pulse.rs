use egui::Key;
use framekit::controller::{LogicalButton, RawJoystick};
use framekit::frame::{FrameView, Job, JobStatus};
use framekit::gpu::{GpuBackend, GuardError, ProgramGuard, Shader, ShaderError, ShaderProgram, ShaderStage};
use std::path::Path;
use tracing::info;

const VERTEX_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/shaders/pulse.vert");
const FRAGMENT_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/shaders/pulse.frag");

/// Drives a shader's `intensity` and `offset` uniforms from input.
///
/// Space or A pauses, the right trigger speeds the pulse up, the left stick
/// moves the offset and Delete removes the job.
pub struct PulseJob<G: GpuBackend> {
    program: ShaderProgram<G>,
    phase: f64,
    paused: bool,
    offset: (f32, f32),
}

impl<G: GpuBackend + Clone> PulseJob<G> {
    pub fn load(gpu: &G) -> Result<Self, ShaderError> {
        let vertex = Shader::from_file(gpu, ShaderStage::Vertex, Path::new(VERTEX_PATH))?;
        let fragment = Shader::from_file(gpu, ShaderStage::Fragment, Path::new(FRAGMENT_PATH))?;
        Ok(Self::new(ShaderProgram::link(gpu, &vertex, &fragment)?))
    }
}

impl<G: GpuBackend> PulseJob<G> {
    pub fn new(program: ShaderProgram<G>) -> Self {
        Self {
            program,
            phase: 0.0,
            paused: false,
            offset: (0.0, 0.0),
        }
    }

    pub fn intensity(&self) -> f32 {
        (0.5 + 0.5 * self.phase.sin()) as f32
    }
}

impl<G: GpuBackend, J: RawJoystick> Job<G, J> for PulseJob<G> {
    fn name(&self) -> &str {
        "pulse"
    }

    fn step(&mut self, view: &FrameView<'_, J>) -> JobStatus {
        if view.input.key_pressed(Key::Delete) {
            info!("Pulse job removed after frame {}", view.frame);
            return JobStatus::Finished;
        }

        let toggled = view.input.key_pressed(Key::Space)
            || view
                .controllers
                .iter()
                .any(|controller| controller.pressed(LogicalButton::A));
        if toggled {
            self.paused = !self.paused;
            info!("Pulse {}", if self.paused { "paused" } else { "resumed" });
        }

        // Triggers rest at -1
        let boost = view
            .controllers
            .iter()
            .map(|controller| (controller.state(LogicalButton::RightTrigger) + 1.0) / 2.0)
            .fold(0.0f32, f32::max);
        if !self.paused {
            self.phase += view.delta * std::f64::consts::TAU * (1.0 + 3.0 * f64::from(boost));
        }

        if let Some(controller) = view.controllers.get(0) {
            self.offset = (
                0.5 * controller.state(LogicalButton::LeftStickX),
                0.5 * controller.state(LogicalButton::LeftStickY),
            );
        }
        JobStatus::Continue
    }

    fn draw(&self, guard: &ProgramGuard<G>) -> Result<(), GuardError> {
        let scope = guard.use_program(&self.program)?;
        if let Some(location) = self.program.uniform_location("intensity") {
            scope.set_uniform_1f(&location, self.intensity());
        }
        scope.set_named_2f("offset", self.offset.0, self.offset.1);
        Ok(())
    }
}

use framekit::config::EngineSettings;
use framekit::controller::{ControllerModel, LogicalButton, RawJoystick, SampledJoystick};
use framekit::frame::{Engine, FrameView, Job, JobStatus};
use framekit::gpu::{GuardError, HeadlessGpu, ProgramGuard, ShaderProgram};
use egui::Key;
use std::cell::RefCell;
use std::rc::Rc;

type Gpu = Rc<HeadlessGpu>;
type Pad = SampledJoystick<u32>;

const VERTEX: &str = "void main() { gl_Position = vec4(0.0); }";
const FRAGMENT: &str = "void main() { }";
const PAD: u32 = 1;

#[derive(Debug, Default, Clone, PartialEq)]
struct Seen {
    a_down: bool,
    a_pressed: bool,
    space_pressed: bool,
    left_x: f32,
    controllers: usize,
}

/// Records what the frame's input looked like from inside a job.
struct Recorder {
    log: Rc<RefCell<Vec<Seen>>>,
    program: Option<ShaderProgram<Gpu>>,
}

impl Job<Gpu, Pad> for Recorder {
    fn name(&self) -> &str {
        "recorder"
    }

    fn step(&mut self, view: &FrameView<'_, Pad>) -> JobStatus {
        let pad = view.controllers.find(PAD);
        self.log.borrow_mut().push(Seen {
            a_down: pad.is_some_and(|pad| pad.held(LogicalButton::A)),
            a_pressed: pad.is_some_and(|pad| pad.pressed(LogicalButton::A)),
            space_pressed: view.input.key_pressed(Key::Space),
            left_x: pad.map_or(0.0, |pad| pad.state(LogicalButton::LeftStickX)),
            controllers: view.controllers.len(),
        });
        JobStatus::Continue
    }

    fn draw(&self, guard: &ProgramGuard<Gpu>) -> Result<(), GuardError> {
        if let Some(program) = &self.program {
            let outer = guard.use_program(program)?;
            let inner = guard.use_program(program)?;
            inner.set_named_2f("offset", 0.0, 0.0);
            drop(inner);
            drop(outer);
        }
        Ok(())
    }
}

fn engine_with_recorder(program: bool) -> (Gpu, Engine<Gpu, Pad>, Rc<RefCell<Vec<Seen>>>) {
    let gpu = Rc::new(HeadlessGpu::new());
    let mut engine = Engine::init(EngineSettings::default(), Rc::clone(&gpu));
    let log = Rc::new(RefCell::new(Vec::new()));
    let program = if program {
        Some(ShaderProgram::from_sources(&gpu, VERTEX, FRAGMENT).unwrap())
    } else {
        None
    };
    engine.add_job(Box::new(Recorder {
        log: Rc::clone(&log),
        program,
    }));
    (gpu, engine, log)
}

fn set_a(engine: &mut Engine<Gpu, Pad>, down: bool) {
    let pad = engine.controllers_mut().find_mut(PAD).unwrap();
    pad.joystick_mut().sample.set_button(0, down);
}

#[test]
fn button_press_is_visible_for_exactly_one_frame() {
    let (_gpu, mut engine, log) = engine_with_recorder(false);
    engine.controllers_mut().attach(SampledJoystick::new(PAD, 15));
    assert_eq!(engine.controllers().find(PAD).unwrap().model(), ControllerModel::Xbox);

    for down in [false, true, true, false, true] {
        set_a(&mut engine, down);
        engine.run_frame().unwrap();
    }

    let log = log.borrow();
    let pressed: Vec<bool> = log.iter().map(|seen| seen.a_pressed).collect();
    let down: Vec<bool> = log.iter().map(|seen| seen.a_down).collect();
    assert_eq!(pressed, vec![false, true, false, false, true]);
    assert_eq!(down, vec![false, true, true, false, true]);
}

#[test]
fn keys_recorded_between_frames_latch_on_the_next_frame() {
    let (_gpu, mut engine, log) = engine_with_recorder(false);

    engine.run_frame().unwrap();
    engine.input_mut().record_key(Key::Space, true);
    assert!(!engine.input().key_pressed(Key::Space));
    engine.run_frame().unwrap();
    engine.run_frame().unwrap();

    let space: Vec<bool> = log.borrow().iter().map(|seen| seen.space_pressed).collect();
    assert_eq!(space, vec![false, true, false]);
    assert!(engine.input().key_down(Key::Space));
}

#[test]
fn small_stick_motion_stays_in_the_deadzone() {
    let (_gpu, mut engine, log) = engine_with_recorder(false);
    engine.controllers_mut().attach(SampledJoystick::new(PAD, 15));

    {
        let pad = engine.controllers_mut().find_mut(PAD).unwrap();
        pad.joystick_mut().sample.set_axis(0, 6553);
        pad.joystick_mut().sample.set_axis(1, -6553);
    }
    engine.run_frame().unwrap();

    {
        let pad = engine.controllers_mut().find_mut(PAD).unwrap();
        pad.joystick_mut().sample.set_axis(0, 16384);
        pad.joystick_mut().sample.set_axis(1, 0);
    }
    engine.run_frame().unwrap();

    let log = log.borrow();
    assert_eq!(log[0].left_x, 0.0);
    assert!((log[1].left_x - 16384.0 / 32767.0).abs() < 1e-6);
}

#[test]
fn unplugged_controller_disappears_from_the_next_frame() {
    let (_gpu, mut engine, log) = engine_with_recorder(false);
    engine.controllers_mut().attach(SampledJoystick::new(PAD, 13));
    engine.controllers_mut().attach(SampledJoystick::new(2, 11));
    engine.run_frame().unwrap();

    let removed = engine.controllers_mut().detach(PAD).unwrap();
    assert_eq!(removed.model(), ControllerModel::Ds4);
    assert_eq!(removed.handle(), PAD);
    engine.run_frame().unwrap();

    let counts: Vec<usize> = log.borrow().iter().map(|seen| seen.controllers).collect();
    assert_eq!(counts, vec![2, 1]);
    let report = engine.run_frame().unwrap();
    assert_eq!(report.controllers, 1);
}

#[test]
fn nested_draws_bind_once_per_frame_and_teardown_releases_programs() {
    let (gpu, mut engine, _log) = engine_with_recorder(true);

    for frame in 1..=3 {
        let report = engine.run_frame().unwrap();
        assert_eq!(report.frame, frame);
        assert_eq!(engine.guard().reference_count(), 0);
        assert_eq!(engine.guard().active_program(), None);
    }
    assert_eq!(gpu.bind_count(), 3);
    assert_eq!(gpu.uniform_writes().len(), 3);
    assert_eq!(gpu.live_programs(), 1);

    engine.input_mut().record_key(Key::Enter, true);
    engine.run_frame().unwrap();
    assert!(engine.input().key_down(Key::Enter));

    engine.teardown();
    assert!(!engine.input().key_down(Key::Enter));
    assert_eq!(engine.input().cycle(), 0);
    assert_eq!(gpu.live_programs(), 0);
    assert!(engine.jobs().is_empty());
    assert_eq!(engine.frame(), 0);
}

#[test]
fn conflicting_job_fails_the_frame_without_leaking_scopes() {
    struct Greedy {
        first: ShaderProgram<Gpu>,
        second: ShaderProgram<Gpu>,
    }

    impl Job<Gpu, Pad> for Greedy {
        fn name(&self) -> &str {
            "greedy"
        }

        fn step(&mut self, _view: &FrameView<'_, Pad>) -> JobStatus {
            JobStatus::Continue
        }

        fn draw(&self, guard: &ProgramGuard<Gpu>) -> Result<(), GuardError> {
            let _first = guard.use_program(&self.first)?;
            let _second = guard.use_program(&self.second)?;
            Ok(())
        }
    }

    let (gpu, mut engine, _log) = engine_with_recorder(false);
    engine.add_job(Box::new(Greedy {
        first: ShaderProgram::from_sources(&gpu, VERTEX, FRAGMENT).unwrap(),
        second: ShaderProgram::from_sources(&gpu, VERTEX, FRAGMENT).unwrap(),
    }));

    let error = engine.run_frame().unwrap_err();
    assert!(error.to_string().contains("greedy"));
    assert_eq!(engine.guard().reference_count(), 0);

    assert_eq!(engine.remove_job("greedy"), 1);
    assert!(engine.run_frame().is_ok());
    assert_eq!(gpu.live_programs(), 0);
}

#[test]
fn same_sample_normalizes_identically() {
    let mut pad = SampledJoystick::new(PAD, 16);
    pad.sample.set_axis(0, 12000);
    pad.sample.set_axis(1, -20000);
    let first = (pad.axis(0), pad.axis(1));

    let (_gpu, mut engine, _log) = engine_with_recorder(false);
    engine.controllers_mut().attach(pad);
    engine.run_frame().unwrap();
    let controller = engine.controllers().find(PAD).unwrap();
    let x = controller.state(LogicalButton::LeftStickX);
    let y = controller.state(LogicalButton::LeftStickY);
    engine.run_frame().unwrap();
    let controller = engine.controllers().find(PAD).unwrap();
    assert_eq!(controller.state(LogicalButton::LeftStickX), x);
    assert_eq!(controller.state(LogicalButton::LeftStickY), y);
    assert_eq!(
        (controller.joystick().axis(0), controller.joystick().axis(1)),
        first
    );
}

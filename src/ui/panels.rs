use eframe::egui::{self, Color32, RichText, Ui};
use framekit::controller::{Controller, GilrsJoystick, LogicalButton};
use framekit::frame::{FrameReport, StatsWindow};
use framekit::gpu::{GpuBackend, ProgramGuard};
use framekit::input::FrameInput;

const HELD: Color32 = Color32::from_rgb(90, 170, 255);
const PRESSED: Color32 = Color32::from_rgb(255, 200, 60);
const IDLE: Color32 = Color32::from_rgb(110, 110, 110);

pub fn controller_panel(ui: &mut Ui, controller: &Controller<GilrsJoystick>) {
    ui.group(|ui| {
        ui.horizontal(|ui| {
            ui.heading(controller.joystick().name());
            ui.label(format!("({}, {})", controller.model(), controller.handle()));
        });

        egui::Grid::new(("axes", controller.handle()))
            .num_columns(2)
            .show(ui, |ui| {
                axis_row(ui, "Left stick", controller, LogicalButton::LeftStickX, LogicalButton::LeftStickY);
                axis_row(ui, "Right stick", controller, LogicalButton::RightStickX, LogicalButton::RightStickY);
                for trigger in [LogicalButton::LeftTrigger, LogicalButton::RightTrigger] {
                    ui.label(trigger.to_string());
                    ui.add(
                        egui::ProgressBar::new((controller.state(trigger) + 1.0) / 2.0)
                            .desired_width(160.0),
                    );
                    ui.end_row();
                }
            });

        ui.horizontal_wrapped(|ui| {
            for button in LogicalButton::DIGITAL {
                let color = if controller.pressed(button) {
                    PRESSED
                } else if controller.held(button) {
                    HELD
                } else {
                    IDLE
                };
                ui.label(RichText::new(button.to_string()).color(color).monospace());
            }
        });
    });
}

fn axis_row(
    ui: &mut Ui,
    label: &str,
    controller: &Controller<GilrsJoystick>,
    x: LogicalButton,
    y: LogicalButton,
) {
    ui.label(label);
    ui.monospace(format!("{:+.3} {:+.3}", controller.state(x), controller.state(y)));
    ui.end_row();
}

pub fn input_panel(ui: &mut Ui, input: &FrameInput) {
    ui.group(|ui| {
        ui.heading("Keyboard & mouse");
        let down: Vec<String> = input.down_keys().map(|key| key.name().to_string()).collect();
        let pressed: Vec<String> = input
            .pressed_keys()
            .map(|key| key.name().to_string())
            .collect();
        ui.label(format!("Held: {}", down.join(" ")));
        ui.label(RichText::new(format!("Pressed: {}", pressed.join(" "))).color(PRESSED));
        ui.label(format!("Typed: {:?}", input.typed()));

        let pointer = input.mouse_pos();
        let wheel = input.mouse_wheel();
        ui.label(format!(
            "Mouse ({:.0}, {:.0}) wheel ({:.1}, {:.1}) primary {}",
            pointer.x,
            pointer.y,
            wheel.x,
            wheel.y,
            if input.mouse_down(egui::PointerButton::Primary) {
                "down"
            } else {
                "up"
            }
        ));
    });
}

pub fn frame_panel<G: GpuBackend>(
    ui: &mut Ui,
    report: Option<&FrameReport>,
    stats: Option<&StatsWindow>,
    guard: &ProgramGuard<G>,
    error: Option<&str>,
) {
    ui.horizontal_centered(|ui| {
        if let Some(report) = report {
            ui.label(format!(
                "Frame {} | {:.1} ms | {} job(s) | {} controller(s)",
                report.frame,
                report.delta * 1000.0,
                report.jobs,
                report.controllers
            ));
        }
        if let Some(stats) = stats {
            ui.label(format!(
                "{:.1} fps (avg {:.2} ms)",
                stats.fps, stats.average_frame_ms
            ));
        }
        ui.label(format!("Program binds: {}", guard.bind_count()));
        if let Some(error) = error {
            ui.label(RichText::new(error).color(Color32::RED));
        }
    });
}

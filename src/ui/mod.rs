//! # Inspector user interface
//!
//! The eframe app that hosts the engine. Every egui repaint is one engine
//! frame:
//!
//! 1. `raw_input_hook` copies the platform's keyboard, mouse and text events
//!    into the engine's [`FrameInput`](framekit::input::FrameInput)
//! 2. gilrs is pumped for hot-plug and fresh gamepad samples
//! 3. [`Engine::run_frame`] latches all input, steps and draws the jobs
//! 4. the panels show what the latches saw this frame
//!
//! The GPU side runs on the glow context eframe renders with.

mod panels;
mod pulse;

use color_eyre::{eyre::eyre, Result};
use eframe::egui;
use eframe::glow;
use framekit::config::EngineSettings;
use framekit::controller::{GilrsJoystick, GilrsPoller};
use framekit::frame::{Engine, FrameReport};
use std::sync::Arc;
use tracing::{error, info, warn};

use pulse::PulseJob;

pub struct InspectorApp {
    engine: Engine<Arc<glow::Context>, GilrsJoystick>,
    gamepads: Option<GilrsPoller>,
    last_report: Option<FrameReport>,
    last_error: Option<String>,
}

impl InspectorApp {
    pub fn new(cc: &eframe::CreationContext<'_>, settings: EngineSettings) -> Result<Self> {
        let gl = cc
            .gl
            .clone()
            .ok_or_else(|| eyre!("eframe did not provide a glow context"))?;
        let mut engine = Engine::init(settings, gl);

        let gamepads = if engine.settings().gamepads_enabled {
            match GilrsPoller::new() {
                Ok(mut poller) => {
                    poller.attach_connected(engine.controllers_mut());
                    Some(poller)
                }
                Err(e) => {
                    warn!("Continuing without gamepads: {}", e);
                    None
                }
            }
        } else {
            info!("Gamepads disabled in settings");
            None
        };

        match PulseJob::load(engine.gpu()) {
            Ok(job) => engine.add_job(Box::new(job)),
            Err(e) => warn!("Pulse job unavailable: {}", e),
        }

        Ok(Self {
            engine,
            gamepads,
            last_report: None,
            last_error: None,
        })
    }
}

impl eframe::App for InspectorApp {
    fn raw_input_hook(&mut self, _ctx: &egui::Context, raw_input: &mut egui::RawInput) {
        let input = self.engine.input_mut();
        for event in &raw_input.events {
            input.record_event(event);
        }
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if let Some(poller) = self.gamepads.as_mut() {
            poller.poll(self.engine.controllers_mut());
        }

        match self.engine.run_frame() {
            Ok(report) => {
                self.last_report = Some(report);
                self.last_error = None;
            }
            Err(e) => {
                error!("Frame {} failed: {}", self.engine.frame(), e);
                self.last_error = Some(e.to_string());
            }
        }

        if self.engine.input().key_pressed(self.engine.settings().quit_key) {
            info!("Quit key pressed, closing");
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }

        egui::TopBottomPanel::bottom("frame_panel")
            .show_separator_line(false)
            .show(ctx, |ui| {
                panels::frame_panel(
                    ui,
                    self.last_report.as_ref(),
                    self.engine.last_stats(),
                    self.engine.guard(),
                    self.last_error.as_deref(),
                );
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                panels::input_panel(ui, self.engine.input());
                ui.separator();
                if self.engine.controllers().is_empty() {
                    ui.label("No controller connected");
                }
                for controller in self.engine.controllers().iter() {
                    panels::controller_panel(ui, controller);
                }
            });
        });

        match self.engine.frame_budget() {
            Some(budget) => ctx.request_repaint_after(budget),
            None => ctx.request_repaint(),
        }
    }

    fn on_exit(&mut self, _gl: Option<&glow::Context>) {
        self.engine.teardown();
    }
}

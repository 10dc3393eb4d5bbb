//! Desktop panel implemented with egui/eframe
//!
//! The UI thread owns the [`Panel`]. Tasks returned by `dispatch`/`apply` run
//! on the tokio runtime and post their event back over a channel.

use std::sync::mpsc::{self, Receiver, Sender};
use std::time::Instant;

use anyhow::{Result, anyhow};
use eframe::{CreationContext, NativeOptions, egui};
use tokio::runtime::Handle;
use tracing::{debug, info};

use super::components::{api_test, notification, test_print};
use super::constants::*;
use crate::config::Config;
use crate::panel::{Action, Panel, PanelEvent, Tab, Task};

const APP_TITLE: &str = "Refine Print Panel";

struct PanelApp {
    panel: Panel,
    runtime: Handle,
    events_tx: Sender<PanelEvent>,
    events_rx: Receiver<PanelEvent>,
}

impl PanelApp {
    fn new(cc: &CreationContext<'_>, panel: Panel, runtime: Handle) -> Self {
        info!("Initializing panel window");
        egui_extras::install_image_loaders(&cc.egui_ctx);

        let (events_tx, events_rx) = mpsc::channel();
        let mut app = Self {
            panel,
            runtime,
            events_tx,
            events_rx,
        };

        // Prefills the API form's file row with the first project image
        app.dispatch(&cc.egui_ctx, Action::LoadImages);
        app
    }

    fn dispatch(&mut self, ctx: &egui::Context, action: Action) {
        if let Some(task) = self.panel.dispatch(action) {
            self.spawn(ctx, task);
        }
    }

    fn spawn(&self, ctx: &egui::Context, task: Task) {
        let tx = self.events_tx.clone();
        let ctx = ctx.clone();
        self.runtime.spawn(async move {
            let event = task.await;
            if tx.send(event).is_err() {
                debug!("Window closed before task finished");
            }
            ctx.request_repaint();
        });
    }

    fn drain_events(&mut self, ctx: &egui::Context) {
        while let Ok(event) = self.events_rx.try_recv() {
            if let Some(task) = self.panel.apply(event) {
                self.spawn(ctx, task);
            }
        }
    }

    fn tab_bar(&self, ui: &mut egui::Ui) -> Option<Action> {
        let mut action = None;
        ui.horizontal(|ui| {
            let current = self.panel.tab();
            for tab in Tab::ALL {
                if ui.selectable_label(current == tab, tab.title()).clicked() && current != tab {
                    action = Some(Action::SwitchTab(tab));
                }
            }
        });
        action
    }
}

impl eframe::App for PanelApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.drain_events(ctx);
        let now = Instant::now();
        self.panel.tick(now);

        let mut actions = Vec::new();

        egui::TopBottomPanel::top("tabs").show(ctx, |ui| {
            ui.add_space(PADDING / 2.0);
            actions.extend(self.tab_bar(ui));
            ui.add_space(PADDING / 2.0);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.add_space(PADDING);
                let action = match self.panel.tab() {
                    Tab::ApiTest => api_test::ui(ui, self.panel.api_tab()),
                    Tab::TestPrint => test_print::ui(ui, self.panel.print_tab()),
                };
                actions.extend(action);
            });
        });

        actions.extend(notification::show(ctx, self.panel.notifier()));

        for action in actions {
            self.dispatch(ctx, action);
        }

        if let Some(remaining) = self.panel.notifier().remaining(now) {
            ctx.request_repaint_after(remaining);
        }
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        info!("Panel exiting");
    }
}

pub fn run_gui(panel: Panel, runtime: Handle, config: &Config) -> Result<()> {
    let options = NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.window.width, config.window.height])
            .with_min_inner_size([WINDOW_MIN_WIDTH, WINDOW_MIN_HEIGHT])
            .with_title(APP_TITLE),
        ..Default::default()
    };

    eframe::run_native(
        APP_TITLE,
        options,
        Box::new(move |cc| Ok(Box::new(PanelApp::new(cc, panel, runtime)))),
    )
    .map_err(|err| anyhow!("Failed to launch panel window: {err}"))
}

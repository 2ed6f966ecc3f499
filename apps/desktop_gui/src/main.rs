use std::{fs, path::Path, thread};

use arboard::Clipboard;
use clap::Parser;
use client_core::{AnalyzerClient, AnalyzerController, ReportArtifact, RequestToken};
use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use eframe::egui;
use shared::protocol::{AnalysisReport, AnalyzeRequest};
use tracing::error;

const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:5000";

#[derive(Parser, Debug)]
struct Args {
    /// Analyzer server base URL.
    #[arg(long, default_value = DEFAULT_SERVER_URL)]
    server_url: String,
}

enum BackendCommand {
    Analyze {
        token: RequestToken,
        request: AnalyzeRequest,
    },
}

enum UiEvent {
    Info(String),
    AnalyzeCompleted {
        token: RequestToken,
        report: AnalysisReport,
    },
    AnalyzeFailed {
        token: RequestToken,
        message: String,
    },
}

/// All network I/O runs on one worker thread owning a tokio runtime; the UI
/// thread only exchanges commands and completed events over the channels.
fn spawn_backend_thread(
    server_url: String,
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
) {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Info(format!(
                    "Analyzer backend failed to start: {err}"
                )));
                error!("failed to build backend runtime: {err}");
                return;
            }
        };

        runtime.block_on(async move {
            let client = AnalyzerClient::new(server_url);
            let _ = ui_tx.try_send(UiEvent::Info("Analyzer backend ready".to_string()));

            while let Ok(cmd) = cmd_rx.recv() {
                match cmd {
                    BackendCommand::Analyze { token, request } => {
                        let event = match client.analyze(&request).await {
                            Ok(report) => UiEvent::AnalyzeCompleted { token, report },
                            Err(err) => UiEvent::AnalyzeFailed {
                                token,
                                message: err.to_string(),
                            },
                        };
                        let _ = ui_tx.try_send(event);
                    }
                }
            }
        });
    });
}

struct DesktopGuiApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    controller: AnalyzerController,
    status: Option<String>,
}

impl DesktopGuiApp {
    fn new(cmd_tx: Sender<BackendCommand>, ui_rx: Receiver<UiEvent>) -> Self {
        Self {
            cmd_tx,
            ui_rx,
            controller: AnalyzerController::new(),
            status: Some("Starting analyzer backend...".to_string()),
        }
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            match event {
                UiEvent::Info(message) => self.status = Some(message),
                UiEvent::AnalyzeCompleted { token, report } => {
                    self.controller.apply_success(token, &report);
                }
                UiEvent::AnalyzeFailed { token, message } => {
                    self.controller.apply_failure(token, &message);
                }
            }
        }
    }

    fn dispatch_analyze(&mut self) {
        let Some((token, request)) = self.controller.on_analyze() else {
            return;
        };
        self.status = None;
        if let Err(err) = self.cmd_tx.try_send(BackendCommand::Analyze { token, request }) {
            let message = match err {
                TrySendError::Full(_) => "analyzer backend is overloaded",
                TrySendError::Disconnected(_) => "analyzer backend is unavailable",
            };
            self.controller.apply_failure(token, message);
        }
    }

    fn copy_summary(&mut self) {
        let Some(summary) = self.controller.on_copy_summary() else {
            return;
        };
        match Clipboard::new().and_then(|mut clipboard| clipboard.set_text(summary)) {
            Ok(()) => self.status = Some("Copied!".to_string()),
            Err(err) => self.status = Some(format!("Failed to copy summary: {err}")),
        }
    }

    fn download_report(&mut self) {
        let Some(artifact) = self.controller.report_artifact() else {
            return;
        };
        let Some(path) = rfd::FileDialog::new()
            .set_file_name(ReportArtifact::SUGGESTED_FILENAME)
            .save_file()
        else {
            return;
        };
        let outcome = match write_artifact(&path, artifact) {
            Ok(()) => format!("Report saved to {}", path.display()),
            Err(err) => format!("Failed to save report: {err}"),
        };
        self.status = Some(outcome);
    }

    fn show_status(&self, ui: &mut egui::Ui) {
        if self.controller.is_busy() {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label("Analyzing…");
            });
        } else if let Some(notice) = self.controller.notice() {
            ui.colored_label(egui::Color32::from_rgb(0xc0, 0x39, 0x2b), notice);
        } else if let Some(status) = &self.status {
            ui.weak(status.as_str());
        }
    }

    fn show_results(&self, ui: &mut egui::Ui) {
        let Some(view) = self.controller.results() else {
            return;
        };
        ui.add_space(8.0);
        ui.separator();
        egui::ScrollArea::vertical().show(ui, |ui| {
            ui.strong(view.verdict.as_str());
            ui.label(format!("Score: {}", view.score));
            ui.label(view.explanation.as_str());
            if !view.flagged_sentences.is_empty() {
                ui.add_space(6.0);
                ui.strong("Flagged sentences");
                for sentence in &view.flagged_sentences {
                    ui.label(format!("• {sentence}"));
                }
            }
            if !view.advice.is_empty() {
                ui.add_space(6.0);
                ui.strong("Advice");
                for line in &view.advice {
                    ui.label(format!("• {line}"));
                }
            }
        });
    }
}

impl eframe::App for DesktopGuiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Misinformation Analyzer");
            ui.add_space(8.0);

            ui.label("Paste text to analyze:");
            ui.add(
                egui::TextEdit::multiline(&mut self.controller.text_input)
                    .desired_rows(6)
                    .desired_width(f32::INFINITY)
                    .hint_text("Paste a headline or article text"),
            );
            ui.add_space(4.0);
            ui.label("Or provide a URL:");
            ui.add(
                egui::TextEdit::singleline(&mut self.controller.url_input)
                    .desired_width(f32::INFINITY)
                    .hint_text("https://example.com/article"),
            );
            ui.add_space(8.0);

            ui.horizontal(|ui| {
                if ui.button("Analyze").clicked() {
                    self.dispatch_analyze();
                }
                if ui.button("Clear").clicked() {
                    self.controller.on_clear();
                }
                let can_copy = self.controller.results().is_some();
                if ui
                    .add_enabled(can_copy, egui::Button::new("Copy summary"))
                    .clicked()
                {
                    self.copy_summary();
                }
                let can_download = self.controller.report_artifact().is_some();
                if ui
                    .add_enabled(can_download, egui::Button::new("Download report"))
                    .clicked()
                {
                    self.download_report();
                }
            });

            ui.add_space(8.0);
            self.show_status(ui);
            self.show_results(ui);
        });

        ctx.request_repaint_after(std::time::Duration::from_millis(100));
    }
}

fn write_artifact(path: &Path, artifact: &ReportArtifact) -> std::io::Result<()> {
    fs::write(path, artifact.as_bytes())
}

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();
    let args = Args::parse();

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(64);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(256);
    spawn_backend_thread(args.server_url, cmd_rx, ui_tx);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Misinformation Analyzer")
            .with_inner_size([720.0, 640.0])
            .with_min_inner_size([520.0, 480.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Misinformation Analyzer",
        options,
        Box::new(|_cc| Ok(Box::new(DesktopGuiApp::new(cmd_tx, ui_rx)))),
    )
}

use std::collections::VecDeque;
use std::path::PathBuf;

use clap::Parser;
use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use egui_plot::{Legend, Line, Plot, PlotPoints};

use wavfilter::audio::Player;
use wavfilter::config::AppConfig;
use wavfilter::plot::Chart;
use wavfilter::session::{DomainCharts, Session, Stage, View};

#[derive(Parser, Debug)]
#[command(name = "wavfilter_gui")]
#[command(about = "FFT low-pass filter - GUI", long_about = None)]
struct Args {
    /// WAV file to load at startup
    #[arg(short = 'i', long)]
    input: Option<PathBuf>,

    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,
}

struct GuiLogger {
    tx: Sender<String>,
    max_level: log::LevelFilter,
}

impl log::Log for GuiLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= self.max_level
    }

    fn log(&self, record: &log::Record) {
        if self.enabled(record.metadata()) {
            let msg = format!("[{}] {}", record.level(), record.args());
            let _ = self.tx.send(msg);
        }
    }

    fn flush(&self) {}
}

const MAX_LOG_LINES: usize = 1000;
const PLOT_HEIGHT: f32 = 180.0;

const ORIGINAL_COLOR: egui::Color32 = egui::Color32::from_rgb(100, 200, 255);
const FILTERED_COLOR: egui::Color32 = egui::Color32::from_rgb(255, 200, 50);
const ERROR_COLOR: egui::Color32 = egui::Color32::from_rgb(255, 80, 80);

struct FilterGuiApp {
    session: Session,
    view: View,
    player: Player,
    log_rx: Receiver<String>,
    log_lines: VecDeque<String>,
    path_input: String,
    pending_cutoff: u32,
    status: Option<String>,
}

impl FilterGuiApp {
    fn new(_cc: &eframe::CreationContext<'_>, session: Session, log_rx: Receiver<String>) -> Self {
        let view = session.render();
        let pending_cutoff = session.selected_cutoff();
        Self {
            session,
            view,
            player: Player::new(),
            log_rx,
            log_lines: VecDeque::new(),
            path_input: String::new(),
            pending_cutoff,
            status: None,
        }
    }

    fn refresh(&mut self) {
        self.player.stop();
        self.view = self.session.render();
        self.pending_cutoff = self.session.selected_cutoff();
    }

    fn drain_logs(&mut self) {
        while let Ok(line) = self.log_rx.try_recv() {
            self.log_lines.push_back(line);
            while self.log_lines.len() > MAX_LOG_LINES {
                self.log_lines.pop_front();
            }
        }
    }

    fn open_path(&mut self) {
        let path = PathBuf::from(self.path_input.trim());
        // failures are kept in the session and shown by the next render
        let _ = self.session.open(&path);
        self.status = None;
        self.refresh();
    }

    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        let Some(file) = dropped.into_iter().next() else {
            return;
        };

        if let Some(bytes) = file.bytes {
            let _ = self.session.upload(file.name, bytes.to_vec());
        } else if let Some(path) = file.path {
            self.path_input = path.display().to_string();
            let _ = self.session.open(&path);
        }
        self.status = None;
        self.refresh();
    }

    fn play_original(&mut self) {
        let Some(file) = self.session.state().file() else {
            return;
        };
        if let Err(e) = self.player.play(&file.buffer) {
            self.status = Some(e.to_string());
        }
    }

    fn play_filtered(&mut self) {
        let Some(filtered) = self.session.filtered() else {
            return;
        };
        if let Err(e) = self.player.play(filtered) {
            self.status = Some(e.to_string());
        }
    }

    fn save_filtered(&mut self) {
        let (Some(name), Some(filtered)) = (&self.view.file_name, &self.view.filtered) else {
            return;
        };
        let target = PathBuf::from(format!("lowpass_{}hz_{}", filtered.cutoff, name));
        self.status = Some(match std::fs::write(&target, &filtered.playback) {
            Ok(()) => {
                log::info!("Saved {}", target.display());
                format!("Saved {}", target.display())
            }
            Err(e) => format!("Could not save {}: {}", target.display(), e),
        });
    }

    fn draw_controls(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label(egui::RichText::new("WAV file:").color(egui::Color32::LIGHT_GRAY));
            let response = ui.add(
                egui::TextEdit::singleline(&mut self.path_input)
                    .hint_text("path to .wav, or drop a file on the window")
                    .desired_width(360.0),
            );
            let submitted =
                response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
            if ui.button("Load").clicked() || submitted {
                self.open_path();
            }
            if ui.button("Reset").clicked() {
                self.session.reset();
                self.status = None;
                self.refresh();
            }
        });

        ui.horizontal(|ui| {
            let loaded = self.view.stage != Stage::NoFileLoaded;

            ui.label(egui::RichText::new("Cutoff:").color(egui::Color32::LIGHT_GRAY));
            let before = self.pending_cutoff;
            egui::ComboBox::from_id_salt("cutoff_select")
                .selected_text(format!("{} Hz", self.pending_cutoff))
                .show_ui(ui, |ui| {
                    for &hz in &self.view.cutoff_choices {
                        ui.selectable_value(&mut self.pending_cutoff, hz, format!("{} Hz", hz));
                    }
                });
            if self.pending_cutoff != before {
                let _ = self.session.select_cutoff(self.pending_cutoff);
                self.refresh();
            }

            if ui
                .add_enabled(loaded, egui::Button::new("Apply filter"))
                .clicked()
            {
                let _ = self.session.apply_filter();
                self.refresh();
            }

            ui.separator();

            if ui
                .add_enabled(loaded, egui::Button::new("\u{25b6} Original"))
                .clicked()
            {
                self.play_original();
            }
            let applied = self.view.filtered.is_some();
            if ui
                .add_enabled(applied, egui::Button::new("\u{25b6} Filtered"))
                .clicked()
            {
                self.play_filtered();
            }
            if ui.button("\u{23f9}").clicked() {
                self.player.stop();
            }
            if let Some(progress) = self.player.progress() {
                ui.add(egui::ProgressBar::new(progress).desired_width(120.0));
            }

            ui.separator();

            if ui
                .add_enabled(applied, egui::Button::new("Save filtered"))
                .clicked()
            {
                self.save_filtered();
            }
        });

        ui.horizontal(|ui| {
            let stage = match self.view.stage {
                Stage::NoFileLoaded => "No file loaded".to_string(),
                Stage::FileLoaded => "File loaded".to_string(),
                Stage::FilterRequested => format!("{} Hz selected, not applied", self.view.selected_cutoff),
                Stage::FilterApplied => format!("{} Hz low-pass applied", self.view.selected_cutoff),
            };
            if let Some(name) = &self.view.file_name {
                ui.label(egui::RichText::new(name).color(egui::Color32::WHITE).strong());
                ui.separator();
            }
            ui.label(egui::RichText::new(stage).color(egui::Color32::LIGHT_GRAY));
            if let Some(error) = &self.view.error {
                ui.separator();
                ui.label(egui::RichText::new(error).color(ERROR_COLOR).strong());
            }
            if let Some(status) = &self.status {
                ui.separator();
                ui.label(egui::RichText::new(status).color(egui::Color32::YELLOW));
            }
        });
    }

    fn draw_chart(ui: &mut egui::Ui, id: &str, chart: &Chart, color: egui::Color32) {
        ui.label(
            egui::RichText::new(&chart.title)
                .color(egui::Color32::LIGHT_GRAY)
                .small(),
        );

        let mut plot = Plot::new(id)
            .height(PLOT_HEIGHT)
            .x_axis_label(chart.x_label.clone())
            .y_axis_label(chart.y_label.clone())
            .y_axis_min_width(60.0)
            .allow_scroll(false);
        if let Some((lo, hi)) = chart.x_range {
            plot = plot.include_x(lo).include_x(hi);
        }
        if chart.series.len() > 1 {
            plot = plot.legend(Legend::default());
        }

        plot.show(ui, |plot_ui| {
            for (i, series) in chart.series.iter().enumerate() {
                let points: PlotPoints = chart.visible_points(series).into_iter().collect();
                let line_color = if i == 0 { color } else { color.gamma_multiply(0.6) };
                plot_ui.line(Line::new(series.name.clone(), points).color(line_color));
            }
        });
    }

    fn draw_domain(ui: &mut egui::Ui, label: &str, charts: &DomainCharts, color: egui::Color32) {
        ui.label(egui::RichText::new(label).color(egui::Color32::WHITE).strong());
        Self::draw_chart(ui, &format!("{}_time", label), &charts.time, color);
        ui.add_space(4.0);
        Self::draw_chart(ui, &format!("{}_frequency", label), &charts.frequency, color);
        ui.add_space(8.0);
    }
}

impl eframe::App for FilterGuiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.drain_logs();
        self.handle_dropped_files(ctx);
        if self.player.is_playing() {
            ctx.request_repaint();
        }

        egui::TopBottomPanel::top("controls").show(ctx, |ui| {
            ui.add_space(4.0);
            self.draw_controls(ui);
            ui.add_space(4.0);
        });

        egui::TopBottomPanel::bottom("debug_log")
            .resizable(true)
            .default_height(120.0)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(
                        egui::RichText::new("Log")
                            .color(egui::Color32::LIGHT_GRAY)
                            .strong(),
                    );
                    if ui.small_button("Clear").clicked() {
                        self.log_lines.clear();
                    }
                });
                egui::ScrollArea::vertical()
                    .stick_to_bottom(true)
                    .show(ui, |ui| {
                        for line in &self.log_lines {
                            ui.label(
                                egui::RichText::new(line)
                                    .font(egui::FontId::monospace(11.0))
                                    .color(egui::Color32::from_rgb(180, 180, 180)),
                            );
                        }
                    });
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                match &self.view.original {
                    Some(charts) => Self::draw_domain(ui, "Original", charts, ORIGINAL_COLOR),
                    None => {
                        ui.label(
                            egui::RichText::new("Load a WAV file to begin.")
                                .color(egui::Color32::DARK_GRAY),
                        );
                    }
                }
                if let Some(filtered) = &self.view.filtered {
                    let label = format!("Filtered ({} Hz)", filtered.cutoff);
                    Self::draw_domain(ui, &label, &filtered.charts, FILTERED_COLOR);
                }
            });
        });
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.verbose {
        0 => log::LevelFilter::Info,
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    let (tx, rx) = crossbeam_channel::unbounded::<String>();
    let logger = GuiLogger {
        tx,
        max_level: log_level,
    };
    log::set_boxed_logger(Box::new(logger)).ok();
    log::set_max_level(log_level);

    let config = match &args.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };

    let mut session = Session::new(config);
    if let Some(path) = &args.input {
        // shown in the status line on first render
        let _ = session.open(path);
    }

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 850.0])
            .with_min_inner_size([700.0, 500.0])
            .with_drag_and_drop(true)
            .with_title("wavfilter - FFT low-pass"),
        ..Default::default()
    };

    let input = args.input.clone();
    eframe::run_native(
        "wavfilter",
        native_options,
        Box::new(move |cc| {
            let mut app = FilterGuiApp::new(cc, session, rx);
            if let Some(path) = input {
                app.path_input = path.display().to_string();
            }
            Ok(Box::new(app))
        }),
    )
    .map_err(|e| anyhow::anyhow!("eframe error: {}", e))?;

    Ok(())
}

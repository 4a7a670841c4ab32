use eframe::egui;
use std::sync::Arc;
use std::time::Duration;
use crossbeam_channel::{unbounded, Receiver, Sender};
use crate::backdrop::Backdrop;
use crate::catalog::ConfidenceTier;
use crate::controller::{TriageController, TriageState};
use crate::history::format_timestamp;
use crate::metrics::{CONFUSION_ORDER, MODEL_PERFORMANCE, MODEL_VERSION};
use crate::notify::Severity;
use crate::upload::{PickedFile, UploadError, UploadedImage};
use crate::{i18n, Condition, SimulationSettings};

#[cfg(not(target_arch = "wasm32"))]
use std::path::PathBuf;
#[cfg(not(target_arch = "wasm32"))]
use std::thread;

#[cfg(not(target_arch = "wasm32"))]
pub fn run(initial_file: Option<PathBuf>, settings: SimulationSettings) -> anyhow::Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 720.0])
            .with_min_inner_size([900.0, 600.0])
            .with_drag_and_drop(true),
        ..Default::default()
    };
    eframe::run_native(
        "MediAI Triage",
        options,
        Box::new(move |cc| {
            configure_visuals(&cc.egui_ctx);
            Ok(Box::new(TriageApp::new(initial_file, settings, cc.egui_ctx.clone())))
        }),
    ).map_err(|e| anyhow::anyhow!("GUI Error: {}", e))
}

pub fn configure_visuals(ctx: &egui::Context) {
    let mut visuals = egui::Visuals::light();
    visuals.window_corner_radius = egui::CornerRadius::same(8);
    visuals.selection.bg_fill = ACCENT;
    ctx.set_visuals(visuals);
}

const ACCENT: egui::Color32 = egui::Color32::from_rgb(37, 99, 235);

pub fn condition_color(condition: Condition) -> egui::Color32 {
    match condition {
        Condition::Pneumonia => egui::Color32::from_rgb(220, 38, 38),
        Condition::Normal => egui::Color32::from_rgb(22, 163, 74),
        Condition::Covid19 => egui::Color32::from_rgb(234, 88, 12),
    }
}

fn tier_colors(tier: ConfidenceTier) -> (egui::Color32, egui::Color32) {
    match tier {
        ConfidenceTier::High => (egui::Color32::from_rgb(220, 252, 231), egui::Color32::from_rgb(22, 101, 52)),
        ConfidenceTier::Medium => (egui::Color32::from_rgb(254, 249, 195), egui::Color32::from_rgb(133, 77, 14)),
        ConfidenceTier::Low => (egui::Color32::from_rgb(254, 226, 226), egui::Color32::from_rgb(153, 27, 27)),
    }
}

fn severity_color(severity: Severity) -> egui::Color32 {
    match severity {
        Severity::Success => egui::Color32::from_rgb(22, 163, 74),
        Severity::Error => egui::Color32::from_rgb(220, 38, 38),
        Severity::Warning => egui::Color32::from_rgb(202, 138, 4),
        Severity::Info => ACCENT,
    }
}

enum AppMessage {
    Loaded(Result<UploadedImage, UploadError>),
    ReadError(String),
}

pub struct TriageApp {
    controller: TriageController,
    msg_receiver: Receiver<AppMessage>,
    msg_sender: Sender<AppMessage>,
    ctx: egui::Context,

    // UI State
    reading: bool,
    preview: Option<(Arc<UploadedImage>, egui::TextureHandle)>,
    backdrop: Backdrop,
}

impl TriageApp {
    #[cfg_attr(target_arch = "wasm32", allow(unused_variables))]
    pub fn new(initial_file: Option<std::path::PathBuf>, settings: SimulationSettings, ctx: egui::Context) -> Self {
        let (sender, receiver) = unbounded();
        let backdrop_seed = settings.seed.unwrap_or(0x5eed);
        let mut controller = TriageController::new(settings);
        controller.start(now(&ctx));

        let mut app = Self {
            controller,
            msg_receiver: receiver,
            msg_sender: sender,
            backdrop: Backdrop::new(egui::vec2(1100.0, 720.0), backdrop_seed),
            ctx,
            reading: false,
            preview: None,
        };

        // Initial file load (Native only)
        #[cfg(not(target_arch = "wasm32"))]
        if let Some(path) = initial_file {
            app.load_file_native(path);
        }

        app
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn load_file_native(&mut self, path: PathBuf) {
        self.reading = true;
        let sender = self.msg_sender.clone();
        let ctx = self.ctx.clone();

        thread::spawn(move || {
            match crate::upload::read_picked_file(&path) {
                Ok(file) => {
                    sender.send(AppMessage::Loaded(file.decode())).ok();
                }
                Err(e) => {
                    sender.send(AppMessage::ReadError(format!("{:#}", e))).ok();
                }
            }
            ctx.request_repaint();
        });
    }

    #[cfg(target_arch = "wasm32")]
    fn pick_file_web(&mut self) {
        let sender = self.msg_sender.clone();
        let ctx = self.ctx.clone();

        wasm_bindgen_futures::spawn_local(async move {
            if let Some(file) = rfd::AsyncFileDialog::new()
                .add_filter("image", &["png", "jpg", "jpeg", "gif", "bmp", "webp", "tif", "tiff"])
                .pick_file()
                .await
            {
                let name = file.file_name();
                let data = file.read().await;
                let loaded = PickedFile::new(name, None, data).decode();
                sender.send(AppMessage::Loaded(loaded)).ok();
                ctx.request_repaint();
            }
        });
    }

    fn pick_file(&mut self) {
        #[cfg(not(target_arch = "wasm32"))]
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("image", &["png", "jpg", "jpeg", "gif", "bmp", "webp", "tif", "tiff"])
            .add_filter("all files", &["*"])
            .pick_file()
        {
            self.load_file_native(path);
        }
        #[cfg(target_arch = "wasm32")]
        self.pick_file_web();
    }

    /// Decodes dropped bytes away from the frame and posts the result back.
    fn decode_in_background(&mut self, file: PickedFile) {
        self.reading = true;
        let sender = self.msg_sender.clone();
        let ctx = self.ctx.clone();

        #[cfg(not(target_arch = "wasm32"))]
        thread::spawn(move || {
            sender.send(AppMessage::Loaded(file.decode())).ok();
            ctx.request_repaint();
        });
        #[cfg(target_arch = "wasm32")]
        wasm_bindgen_futures::spawn_local(async move {
            sender.send(AppMessage::Loaded(file.decode())).ok();
            ctx.request_repaint();
        });
    }

    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        let Some(file) = dropped.first() else {
            return;
        };

        if let Some(bytes) = &file.bytes {
            let mime = (!file.mime.is_empty()).then_some(file.mime.as_str());
            let picked = PickedFile::new(file.name.clone(), mime, bytes.to_vec());
            self.decode_in_background(picked);
            return;
        }

        #[cfg(not(target_arch = "wasm32"))]
        if let Some(path) = &file.path {
            self.load_file_native(path.clone());
        }
    }

    fn sync_preview_texture(&mut self, ctx: &egui::Context) {
        let current = self.controller.image().cloned();
        let stale = match (&self.preview, &current) {
            (Some((shown, _)), Some(img)) => !Arc::ptr_eq(shown, img),
            (None, None) => false,
            _ => true,
        };
        if !stale {
            return;
        }

        let max_side = ctx.input(|i| i.max_texture_side) as u32;
        self.preview = current.and_then(|img| {
            let mut pixels = img.preview.clone()?;
            if pixels.width() > max_side || pixels.height() > max_side {
                let fitted = image::DynamicImage::ImageRgba8((*pixels).clone()).thumbnail(max_side, max_side);
                pixels = Arc::new(fitted.to_rgba8());
            }
            let size = [pixels.width() as usize, pixels.height() as usize];
            let color_image = egui::ColorImage::from_rgba_unmultiplied(size, pixels.as_raw());
            let texture = ctx.load_texture("preview", color_image, Default::default());
            Some((img, texture))
        });
    }

    fn render_upload_zone(&mut self, ui: &mut egui::Ui, hovering: bool) {
        let stroke_color = if hovering { ACCENT } else { egui::Color32::from_gray(180) };
        let response = egui::Frame::group(ui.style())
            .stroke(egui::Stroke::new(2.0, stroke_color))
            .fill(if hovering { egui::Color32::from_rgb(239, 246, 255) } else { egui::Color32::from_white_alpha(200) })
            .inner_margin(egui::Margin::same(24))
            .show(ui, |ui| {
                ui.set_min_size(egui::vec2(ui.available_width(), 240.0));
                ui.vertical_centered(|ui| {
                    ui.add_space(70.0);
                    if self.reading {
                        ui.spinner();
                        ui.label(i18n::t("reading"));
                    } else {
                        ui.label(egui::RichText::new(i18n::t("drag_drop")).heading().color(egui::Color32::GRAY));
                        ui.small("PNG, JPEG, BMP, GIF, WebP, TIFF");
                    }
                });
            })
            .response
            .interact(egui::Sense::click());

        if response.clicked() {
            self.pick_file();
        }
    }

    fn render_preview(&mut self, ui: &mut egui::Ui, now: Duration) {
        let Some(image) = self.controller.image().cloned() else {
            return;
        };

        ui.horizontal(|ui| {
            ui.label(egui::RichText::new(&image.name).strong());
            if let Some((w, h)) = image.dimensions() {
                ui.small(format!("{}×{}", w, h));
            }
        });

        egui::Frame::canvas(ui.style()).show(ui, |ui| {
            ui.set_min_height(280.0);
            match &self.preview {
                Some((_, texture)) => {
                    ui.add(
                        egui::Image::new(egui::load::SizedTexture::new(texture.id(), texture.size_vec2()))
                            .max_width(ui.available_width())
                            .max_height(320.0)
                            .maintain_aspect_ratio(true),
                    );
                }
                None => {
                    ui.centered_and_justified(|ui| {
                        ui.label(egui::RichText::new(i18n::t("no_preview")).color(egui::Color32::GRAY));
                    });
                }
            }
        });

        let analyzing = self.controller.state() == TriageState::Analyzing;
        ui.horizontal(|ui| {
            if ui.add_enabled(!analyzing, egui::Button::new(egui::RichText::new(i18n::t("analyze")).color(egui::Color32::WHITE)).fill(ACCENT)).clicked() {
                self.controller.analyze(now);
            }
            if ui.button(i18n::t("clear")).clicked() {
                self.controller.clear();
            }
        });
    }

    fn render_results(&mut self, ui: &mut egui::Ui, now: Duration) {
        match self.controller.state() {
            TriageState::Analyzing => {
                ui.vertical_centered(|ui| {
                    ui.add_space(60.0);
                    ui.spinner();
                    ui.label(i18n::t("analyzing"));
                });
                return;
            }
            TriageState::HasResult => {}
            _ => {
                ui.vertical_centered(|ui| {
                    ui.add_space(60.0);
                    ui.label(egui::RichText::new(i18n::t("results_placeholder")).color(egui::Color32::GRAY));
                });
                return;
            }
        }

        let Some(diagnosis) = self.controller.result().copied() else {
            return;
        };
        let record = diagnosis.record;

        ui.label(egui::RichText::new(record.condition.label()).size(30.0).strong().color(condition_color(record.condition)));
        let (badge_bg, badge_fg) = tier_colors(ConfidenceTier::of(record.confidence));
        egui::Frame::default()
            .fill(badge_bg)
            .corner_radius(egui::CornerRadius::same(10))
            .inner_margin(egui::Margin::symmetric(10, 4))
            .show(ui, |ui| {
                ui.label(egui::RichText::new(format!("{}% {}", record.confidence, i18n::t("confidence"))).color(badge_fg));
            });
        ui.label(record.description);
        ui.add_space(8.0);

        for (condition, value) in diagnosis.bars.iter() {
            let id = ui.id().with(("bar", condition.label()));
            let shown = ui.ctx().animate_value_with_time(id, value as f32 / 100.0, 1.0);
            ui.add(
                egui::ProgressBar::new(shown)
                    .fill(condition_color(condition))
                    .text(format!("{} {}%", condition.label(), value)),
            );
        }

        ui.add_space(8.0);
        ui.horizontal(|ui| {
            if ui.button(i18n::t("save_record")).clicked() {
                self.controller.save_record(now);
            }
            if ui.button(i18n::t("generate_report")).clicked() {
                self.controller.generate_report(now);
            }
        });
    }

    fn render_dashboard(&self, ui: &mut egui::Ui, now: Duration) {
        let stats = self.controller.stats();
        let stat = |ui: &mut egui::Ui, label: String, value: String| {
            egui::Frame::group(ui.style()).show(ui, |ui| {
                ui.set_min_width(ui.available_width());
                ui.small(label);
                ui.label(egui::RichText::new(value).size(22.0).strong().color(ACCENT));
            });
        };
        stat(ui, i18n::t("patients_today"), format!("{}", stats.patients.value_at(now).floor() as u32));
        stat(ui, i18n::t("queue"), format!("{}", stats.queue.value_at(now).round() as u32));
        stat(ui, i18n::t("accuracy"), format!("{:.1}%", stats.accuracy.value_at(now)));
        stat(ui, i18n::t("avg_wait"), format!("{:.1} {}", stats.average_wait, i18n::t("minutes")));
        stat(ui, i18n::t("total_scans"), format!("{}", stats.total_scans()));

        ui.separator();
        egui::CollapsingHeader::new(i18n::t("model_performance")).default_open(false).show(ui, |ui| {
            render_model_performance(ui);
        });

        ui.separator();
        ui.label(egui::RichText::new(i18n::t("recent")).strong());
        egui::ScrollArea::vertical().show(ui, |ui| {
            for entry in self.controller.history().iter() {
                ui.horizontal(|ui| {
                    ui.monospace(&entry.patient_id);
                    ui.colored_label(condition_color(entry.condition), entry.condition.label());
                    ui.label(format!("{}%", entry.confidence));
                });
                ui.small(format!("{} · {}", format_timestamp(&entry.timestamp), entry.image.name));
                ui.small(format!(
                    "{} · {} {:.1}s",
                    entry.model_version,
                    i18n::t("processing_time"),
                    entry.processing_time.as_secs_f32()
                ));
                ui.add_space(4.0);
            }
        });
    }

    fn render_toasts(&self, ctx: &egui::Context, now: Duration) {
        egui::Area::new(egui::Id::new("toasts"))
            .anchor(egui::Align2::RIGHT_TOP, egui::vec2(-16.0, 16.0))
            .order(egui::Order::Foreground)
            .show(ctx, |ui| {
                for toast in self.controller.toasts() {
                    let progress = toast.progress(now);
                    ui.scope(|ui| {
                        if progress > 0.9 {
                            ui.set_opacity((1.0 - progress) * 10.0);
                        }
                        egui::Frame::default()
                            .fill(severity_color(toast.severity))
                            .corner_radius(egui::CornerRadius::same(8))
                            .inner_margin(egui::Margin::symmetric(16, 10))
                            .show(ui, |ui| {
                                ui.label(egui::RichText::new(&toast.message).color(egui::Color32::WHITE).strong());
                            });
                    });
                    ui.add_space(6.0);
                }
            });
    }
}

fn render_model_performance(ui: &mut egui::Ui) {
    let perf = &MODEL_PERFORMANCE;
    egui::Grid::new("model_scores").num_columns(2).striped(true).show(ui, |ui| {
        for (label, value) in [
            (i18n::t("accuracy"), perf.accuracy),
            (i18n::t("precision"), perf.precision),
            (i18n::t("recall"), perf.recall),
            (i18n::t("f1_score"), perf.f1),
        ] {
            ui.label(label);
            ui.label(format!("{:.1}%", value));
            ui.end_row();
        }
        for (condition, auc) in perf.auc {
            ui.label(format!("{} {}", i18n::t("auc"), condition.label()));
            ui.colored_label(condition_color(condition), format!("{:.2}", auc));
            ui.end_row();
        }
    });

    ui.add_space(4.0);
    ui.small(i18n::t("confusion_matrix"));
    egui::Grid::new("confusion").num_columns(4).show(ui, |ui| {
        ui.label("");
        for c in CONFUSION_ORDER {
            ui.small(c.label());
        }
        ui.end_row();
        for (row, actual) in CONFUSION_ORDER.iter().enumerate() {
            ui.small(actual.label());
            for col in 0..CONFUSION_ORDER.len() {
                let n = perf.confusion[row][col];
                let text = egui::RichText::new(n.to_string()).monospace();
                if row == col {
                    ui.label(text.strong().color(condition_color(*actual)));
                } else {
                    ui.label(text);
                }
            }
            ui.end_row();
        }
    });
}

fn now(ctx: &egui::Context) -> Duration {
    Duration::from_secs_f64(ctx.input(|i| i.time).max(0.0))
}

impl eframe::App for TriageApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = now(ctx);

        while let Ok(msg) = self.msg_receiver.try_recv() {
            match msg {
                AppMessage::Loaded(loaded) => {
                    self.reading = false;
                    if let Err(e) = self.controller.submit_loaded(now, loaded) {
                        log::debug!("Submission rejected: {}", e);
                    }
                }
                AppMessage::ReadError(e) => {
                    self.reading = false;
                    self.controller.notify(now, format!("{}{}", i18n::t("read_fail"), e), Severity::Error);
                }
            }
        }

        self.controller.tick(now);
        self.sync_preview_texture(ctx);

        let screen = ctx.screen_rect();
        self.backdrop.resize(screen.size());
        self.backdrop.step();
        self.backdrop.paint(&ctx.layer_painter(egui::LayerId::background()), screen.min);

        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(egui::RichText::new(i18n::t("app_title")).strong().size(18.0).color(ACCENT));
                ui.small(MODEL_VERSION);

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    egui::ComboBox::from_id_salt("lang_select")
                        .selected_text(if i18n::get_language() == i18n::Language::Zh { "中文" } else { "English" })
                        .show_ui(ui, |ui| {
                            if ui.selectable_label(i18n::get_language() == i18n::Language::Zh, "中文").clicked() {
                                i18n::set_language(i18n::Language::Zh);
                            }
                            if ui.selectable_label(i18n::get_language() == i18n::Language::En, "English").clicked() {
                                i18n::set_language(i18n::Language::En);
                            }
                        });

                    if ui.button(i18n::t("open_file")).clicked() {
                        self.pick_file();
                    }
                });
            });
        });

        egui::SidePanel::right("dashboard")
            .resizable(false)
            .default_width(260.0)
            .show(ctx, |ui| self.render_dashboard(ui, now));

        let hovering = ctx.input(|i| !i.raw.hovered_files.is_empty());
        egui::CentralPanel::default()
            .frame(egui::Frame::central_panel(&ctx.style()).fill(egui::Color32::TRANSPARENT))
            .show(ctx, |ui| {
                ui.spacing_mut().item_spacing = egui::vec2(10.0, 10.0);
                ui.columns(2, |cols| {
                    if self.controller.image().is_some() {
                        self.render_preview(&mut cols[0], now);
                    } else {
                        self.render_upload_zone(&mut cols[0], hovering);
                    }
                    self.render_results(&mut cols[1], now);
                });
            });

        self.render_toasts(ctx, now);
        self.handle_dropped_files(ctx);

        // The backdrop moves every frame.
        ctx.request_repaint();
    }
}

use std::collections::HashMap;
use std::future::Future;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;

use eframe::egui::{self, Color32, RichText};
use tracing::{info, warn};
use vidshelf_core::actions::{self, Rejection};
use vidshelf_core::thumbnails::{intersection_ratio, THUMB_HEIGHT, THUMB_WIDTH};
use vidshelf_core::{
    build_source, ActionOutcome, ClientConfig, ExternalPlayer, FfmpegGrabber, FilterEffect, FilterMode, Gallery,
    HttpClient, ItemId, LoadOutcome, ManagementApi, PlayerPanel, ScrollMetrics, SourceKind, ThumbnailCapturer,
    VideoEntry, VideoSource,
};

use crate::app_state::{AccessGate, Dialog, Msg, RecordingForm, StatusKind, StatusLine, UploadForm};
use crate::config::{save_config, AppConfig};
use crate::helpers::{describe_file, title_from_path, truncate_text};
use crate::i18n::{t, Language};

/// Network-facing pieces rebuilt whenever the client settings change.
pub struct Backend {
    http: Arc<HttpClient>,
    source: Arc<dyn VideoSource>,
    capturer: ThumbnailCapturer,
}

impl Backend {
    pub fn new(cfg: &ClientConfig) -> vidshelf_core::Result<Self> {
        let http = Arc::new(HttpClient::new(cfg)?);
        let source = build_source(cfg, http.clone());
        let grabber = Arc::new(FfmpegGrabber::new(cfg.ffmpeg_path.clone()));
        let capturer = ThumbnailCapturer::new(grabber, cfg.thumbnail_seek_secs, cfg.thumbnail_parallel);
        info!(base = http.base(), source = cfg.source.as_str(), "Backend ready");
        Ok(Self { http, source, capturer })
    }
}

enum DialogAction {
    Close,
    Rename(VideoEntry, String),
    Delete(VideoEntry),
}

pub struct VidShelfApp {
    config: AppConfig,
    settings_draft: Option<AppConfig>,
    backend: Backend,
    gallery: Gallery,
    panel: PlayerPanel<ExternalPlayer>,
    textures: HashMap<ItemId, egui::TextureHandle>,
    tx: Sender<Msg>,
    rx: Receiver<Msg>,
    search_text: String,
    loading: bool,
    load_error: Option<String>,
    last_scroll_offset: f32,
    scroll_to_top: bool,
    gate: AccessGate,
    dialog: Dialog,
    upload: UploadForm,
    recording: RecordingForm,
    status: Option<StatusLine>,
}

impl VidShelfApp {
    pub fn new(ctx: &egui::Context, config: AppConfig, backend: Backend) -> Self {
        let (tx, rx) = mpsc::channel();
        let gallery = new_gallery(&config.client, backend.source.filter_mode());
        let panel = PlayerPanel::new(ExternalPlayer::new(config.player_command.clone()));
        let mut app = Self {
            config,
            settings_draft: None,
            backend,
            gallery,
            panel,
            textures: HashMap::new(),
            tx,
            rx,
            search_text: String::new(),
            loading: false,
            load_error: None,
            last_scroll_offset: 0.0,
            scroll_to_top: false,
            gate: AccessGate::default(),
            dialog: Dialog::None,
            upload: UploadForm::default(),
            recording: RecordingForm::default(),
            status: None,
        };
        app.spawn_load(ctx);
        app
    }

    fn lang(&self) -> Language {
        self.config.language
    }

    fn spawn_task<F>(&self, ctx: &egui::Context, fut: F)
    where
        F: Future<Output = Msg> + Send + 'static,
    {
        let tx = self.tx.clone();
        let ctx = ctx.clone();
        tokio::spawn(async move {
            let msg = fut.await;
            let _ = tx.send(msg);
            ctx.request_repaint();
        });
    }

    fn spawn_load(&mut self, ctx: &egui::Context) {
        let ticket = self.gallery.begin_load();
        self.loading = true;
        let source = self.backend.source.clone();
        self.spawn_task(ctx, async move {
            let result = source.fetch(ticket.query()).await;
            Msg::CatalogLoaded { ticket, result }
        });
    }

    fn spawn_capture(&self, ctx: &egui::Context, id: ItemId, url: String) {
        let tx = self.tx.clone();
        let ctx = ctx.clone();
        self.backend.capturer.spawn_capture(id, url, move |ready| {
            let _ = tx.send(Msg::ThumbnailReady(ready));
            ctx.request_repaint();
        });
    }

    fn handle_messages(&mut self, ctx: &egui::Context) {
        while let Ok(msg) = self.rx.try_recv() {
            match msg {
                Msg::CatalogLoaded { ticket, result } => match self.gallery.finish_load(&ticket, result) {
                    LoadOutcome::Applied { .. } => {
                        self.loading = false;
                        self.load_error = None;
                        self.textures.clear();
                        self.last_scroll_offset = 0.0;
                        self.scroll_to_top = true;
                    }
                    LoadOutcome::Stale => {}
                    LoadOutcome::Failed(e) => {
                        self.loading = false;
                        self.load_error = Some(e);
                    }
                },
                Msg::ThumbnailReady(ready) => {
                    let id = ready.id;
                    let image = ready
                        .result
                        .as_ref()
                        .ok()
                        .map(|c| egui::ColorImage::from_rgba_unmultiplied([c.width as usize, c.height as usize], &c.rgba));
                    if self.gallery.set_thumbnail(ready) {
                        if let Some(image) = image {
                            let name = format!("thumb-{}-{}", id.generation, id.index);
                            let tex = ctx.load_texture(name, image, egui::TextureOptions::LINEAR);
                            self.textures.insert(id, tex);
                        }
                    }
                }
                Msg::AccessChecked(outcome) => {
                    self.gate.checking = false;
                    match outcome {
                        ActionOutcome::AccessGranted => {
                            self.gate.granted = true;
                            self.gate.key_input.clear();
                        }
                        _ => self.dialog = Dialog::Alert(t("invalid_key", self.lang())),
                    }
                }
                Msg::ActionFinished(outcome) => {
                    let reload = outcome.needs_reload();
                    match outcome {
                        ActionOutcome::Renamed { previous_url, entry } => {
                            let title = entry.display_name.clone();
                            self.panel.replace_current(&previous_url, entry);
                            self.status = Some(StatusLine::success(format!("{}: {}", t("renamed", self.lang()), title)));
                        }
                        ActionOutcome::Deleted => {
                            self.panel.clear();
                            self.status = Some(StatusLine::success(t("deleted", self.lang())));
                        }
                        ActionOutcome::Failed(e) => self.dialog = Dialog::Alert(e),
                        _ => {}
                    }
                    if reload {
                        self.spawn_load(ctx);
                    }
                }
                Msg::UploadFinished(outcome) => {
                    self.upload.in_flight = false;
                    let status = match outcome {
                        ActionOutcome::Uploaded { message } => {
                            self.upload.request = Default::default();
                            StatusLine::success(message)
                        }
                        ActionOutcome::Rejected(r) => StatusLine::error(self.rejection_text(r)),
                        ActionOutcome::Failed(e) => StatusLine::error(e),
                        other => StatusLine::info(format!("{other:?}")),
                    };
                    self.upload.status = Some(status);
                }
                Msg::RecordingFinished(outcome) => {
                    self.recording.in_flight = false;
                    self.recording.status = match outcome {
                        ActionOutcome::Recording { message } => Some(StatusLine::success(message)),
                        ActionOutcome::Failed(e) => Some(StatusLine::error(e)),
                        _ => None,
                    };
                }
            }
        }
    }

    fn rejection_text(&self, r: Rejection) -> String {
        let key = match r {
            Rejection::MissingFile => "no_file",
            Rejection::MissingTitle => "no_title",
            Rejection::InvalidKey => "invalid_key",
        };
        t(key, self.lang())
    }

    fn select(&mut self, id: ItemId) {
        let Some(entry) = self.gallery.activate(id) else { return };
        info!(video = %entry.display_name, "Selected");
        if let Err(e) = self.panel.select(entry) {
            warn!(error = %e, "Playback failed");
            self.status = Some(StatusLine::error(format!("{}: {e}", t("player_failed", self.lang()))));
        }
    }

    fn on_search_changed(&mut self, ctx: &egui::Context) {
        let text = self.search_text.clone();
        if self.gallery.set_filter(&text) == FilterEffect::Refetch {
            self.spawn_load(ctx);
        }
    }

    fn copy_to_clipboard(&mut self, text: String) {
        use arboard::Clipboard;
        let lang = self.lang();
        self.status = Some(match Clipboard::new().and_then(|mut clipboard| clipboard.set_text(text)) {
            Ok(()) => StatusLine::success(t("copied", lang)),
            Err(_) => StatusLine::error(t("clipboard_failed", lang)),
        });
    }

    fn open_download(&mut self, entry: &VideoEntry) {
        match self.backend.http.download_url(&entry.file_name()) {
            Ok(url) => {
                if let Err(e) = webbrowser::open(&url) {
                    warn!(%url, error = %e, "Cannot open browser");
                    self.status = Some(StatusLine::error(e.to_string()));
                }
            }
            Err(e) => self.status = Some(StatusLine::error(e.to_string())),
        }
    }

    fn apply_config(&mut self, ctx: &egui::Context, new: AppConfig) {
        if new.client != self.config.client {
            match Backend::new(&new.client) {
                Ok(backend) => {
                    self.backend = backend;
                    self.gallery = new_gallery(&new.client, self.backend.source.filter_mode());
                    self.textures.clear();
                    self.search_text.clear();
                    self.spawn_load(ctx);
                }
                Err(e) => {
                    warn!(error = %e, "Rejected client settings");
                    self.status = Some(StatusLine::error(e.to_string()));
                    return;
                }
            }
        }
        if new.player_command != self.config.player_command {
            self.panel = PlayerPanel::new(ExternalPlayer::new(new.player_command.clone()));
        }
        self.config = new;
    }

    fn show_top_bar(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        let lang = self.lang();
        ui.horizontal(|ui| {
            ui.heading("🎞 vidshelf");
            ui.separator();
            let resp = ui.add(
                egui::TextEdit::singleline(&mut self.search_text)
                    .hint_text(t("search", lang))
                    .desired_width(260.0),
            );
            if resp.changed() {
                self.on_search_changed(ctx);
            }
            if ui.button(t("reload", lang)).clicked() {
                self.spawn_load(ctx);
            }
            if self.gallery.catalog().filter_mode() == FilterMode::Server {
                let page = self.gallery.catalog().page();
                let pages = self.gallery.catalog().total_pages();
                if ui.add_enabled(page > 0, egui::Button::new("◀")).clicked() && self.gallery.prev_page() {
                    self.spawn_load(ctx);
                }
                ui.label(format!("{} {} / {}", t("page", lang), page + 1, pages.max(1)));
                if ui.add_enabled(page + 1 < pages, egui::Button::new("▶")).clicked() && self.gallery.next_page() {
                    self.spawn_load(ctx);
                }
            }
            if self.loading {
                ui.spinner();
            }
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button(t("settings", lang)).clicked() {
                    self.settings_draft = Some(self.config.clone());
                }
            });
        });
    }

    fn show_list(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        let lang = self.lang();
        if let Some(err) = &self.load_error {
            ui.colored_label(Color32::RED, format!("{}: {err}", t("load_failed", lang)));
        }
        if self.gallery.catalog().entries().is_empty() {
            ui.label(if self.loading { t("loading", lang) } else { t("empty_list", lang) });
            return;
        }

        let mut samples: Vec<(ItemId, f32)> = Vec::new();
        let mut clicked: Option<ItemId> = None;
        let selected_url = self.panel.current().map(|e| e.url.clone());
        let gallery = &self.gallery;
        let textures = &self.textures;

        let mut area = egui::ScrollArea::vertical().id_source("video_list").auto_shrink([false; 2]);
        if std::mem::take(&mut self.scroll_to_top) {
            area = area.vertical_scroll_offset(0.0);
        }
        let output = area.show(ui, |ui| {
            let view = ui.clip_rect();
            let thumb = egui::vec2(THUMB_WIDTH as f32, THUMB_HEIGHT as f32);
            for item in gallery.visible_items() {
                let is_selected = selected_url.as_deref() == Some(item.entry.url.as_str());
                let row = ui.horizontal(|ui| {
                    match textures.get(&item.id) {
                        Some(tex) => {
                            ui.add(egui::Image::new(tex).fit_to_exact_size(thumb));
                        }
                        None => {
                            let (rect, _) = ui.allocate_exact_size(thumb, egui::Sense::hover());
                            ui.painter().rect_filled(rect, 3.0, Color32::from_gray(36));
                        }
                    }
                    ui.vertical(|ui| {
                        let name = RichText::new(truncate_text(&item.entry.display_name, 70)).strong();
                        ui.label(if is_selected { name.color(Color32::LIGHT_BLUE) } else { name });
                        ui.weak(item.entry.date_label());
                    });
                });
                let resp = row.response.interact(egui::Sense::click());
                if resp.clicked() {
                    clicked = Some(item.id);
                }
                let r = resp.rect;
                samples.push((item.id, intersection_ratio(r.top(), r.bottom(), view.top(), view.bottom())));
                ui.separator();
            }
        });

        for (id, ratio) in samples {
            if let Some((id, url)) = self.gallery.report_intersection(id, ratio) {
                self.spawn_capture(ctx, id, url);
            }
        }
        if let Some(id) = clicked {
            self.select(id);
        }

        let metrics = ScrollMetrics {
            offset: output.state.offset.y,
            viewport_height: output.inner_rect.height(),
            content_height: output.content_size.y,
        };
        if (metrics.offset - self.last_scroll_offset).abs() > f32::EPSILON {
            self.last_scroll_offset = metrics.offset;
            if self.gallery.on_scroll(metrics) > 0 {
                ctx.request_repaint();
            }
        }
    }

    fn show_detail(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        let lang = self.lang();
        match self.panel.current().cloned() {
            None => {
                ui.weak(t("no_selection", lang));
            }
            Some(entry) => {
                ui.heading(self.panel.title().unwrap_or_default());
                ui.weak(self.panel.date_label().unwrap_or_default());
                ui.add_space(6.0);
                ui.horizontal_wrapped(|ui| {
                    if ui.button(t("rename", lang)).clicked() {
                        let input = entry.display_name.clone();
                        self.dialog = Dialog::Rename { entry: entry.clone(), input };
                    }
                    if ui.button(t("delete", lang)).clicked() {
                        self.dialog = Dialog::ConfirmDelete { entry: entry.clone() };
                    }
                    if ui.button(t("download", lang)).clicked() {
                        self.open_download(&entry);
                    }
                    if ui.button(t("copy_link", lang)).clicked() {
                        self.copy_to_clipboard(entry.url.clone());
                    }
                });
            }
        }

        ui.separator();
        ui.strong(t("upload", lang));
        if ui.button(t("choose_file", lang)).clicked() {
            let exts: Vec<&str> = self.config.client.video_extensions.iter().map(String::as_str).collect();
            if let Some(path) = rfd::FileDialog::new().add_filter("Video", &exts).pick_file() {
                let title = title_from_path(&path);
                self.upload.pick(path, title);
            }
        }
        if let Some(path) = &self.upload.request.file {
            ui.label(describe_file(path));
        }
        ui.add(egui::TextEdit::singleline(&mut self.upload.request.title).hint_text(t("title", lang)));
        let can_upload = !self.upload.in_flight;
        if ui.add_enabled(can_upload, egui::Button::new(t("upload", lang))).clicked() {
            self.upload.in_flight = true;
            self.upload.status = Some(StatusLine::info(t("uploading", lang)));
            let http = self.backend.http.clone();
            let request = self.upload.request.clone();
            self.spawn_task(ctx, async move {
                Msg::UploadFinished(actions::upload_video(&*http, request.file.as_deref(), &request.title).await)
            });
        }
        if let Some(status) = &self.upload.status {
            status_label(ui, status);
        }

        ui.separator();
        ui.strong(t("recording", lang));
        ui.horizontal(|ui| {
            ui.add(
                egui::TextEdit::singleline(&mut self.recording.stream_key)
                    .hint_text(t("stream_key", lang))
                    .desired_width(160.0),
            );
            let enabled = !self.recording.in_flight && !self.recording.stream_key.trim().is_empty();
            if ui.add_enabled(enabled, egui::Button::new(t("start_recording", lang))).clicked() {
                self.recording.in_flight = true;
                let http = self.backend.http.clone();
                let key = self.recording.stream_key.clone();
                self.spawn_task(ctx, async move {
                    Msg::RecordingFinished(actions::start_recording(&*http, &key).await)
                });
            }
        });
        if let Some(status) = &self.recording.status {
            status_label(ui, status);
        }
    }

    fn show_access_gate(&mut self, ctx: &egui::Context) {
        let lang = self.lang();
        let mut submit = false;
        egui::Window::new(t("access_title", lang))
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
            .show(ctx, |ui| {
                ui.label(t("access_prompt", lang));
                let resp = ui.add(egui::TextEdit::singleline(&mut self.gate.key_input).password(true));
                if resp.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                    submit = true;
                }
                ui.horizontal(|ui| {
                    if ui.add_enabled(!self.gate.checking, egui::Button::new(t("check_key", lang))).clicked() {
                        submit = true;
                    }
                    if self.gate.checking {
                        ui.spinner();
                    }
                });
            });
        if submit && !self.gate.checking {
            self.gate.checking = true;
            let http = self.backend.http.clone();
            let key = self.gate.key_input.clone();
            self.spawn_task(ctx, async move { Msg::AccessChecked(actions::check_access(&*http, &key).await) });
        }
    }

    fn show_dialog(&mut self, ctx: &egui::Context) {
        let lang = self.lang();
        let mut action: Option<DialogAction> = None;
        let window = |title: String| {
            egui::Window::new(title)
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
        };
        match &mut self.dialog {
            Dialog::None => {}
            Dialog::Rename { entry, input } => {
                window(t("rename", lang)).show(ctx, |ui| {
                    ui.label(t("rename_prompt", lang));
                    let resp = ui.add(egui::TextEdit::singleline(&mut *input).desired_width(280.0));
                    let enter = resp.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                    ui.horizontal(|ui| {
                        if ui.button(t("ok", lang)).clicked() || enter {
                            action = Some(DialogAction::Rename(entry.clone(), input.clone()));
                        }
                        if ui.button(t("cancel", lang)).clicked() {
                            action = Some(DialogAction::Close);
                        }
                    });
                });
            }
            Dialog::ConfirmDelete { entry } => {
                window(t("delete", lang)).show(ctx, |ui| {
                    ui.label(t("confirm_delete", lang));
                    ui.strong(&entry.display_name);
                    ui.horizontal(|ui| {
                        if ui.button(t("yes", lang)).clicked() {
                            action = Some(DialogAction::Delete(entry.clone()));
                        }
                        if ui.button(t("no", lang)).clicked() {
                            action = Some(DialogAction::Close);
                        }
                    });
                });
            }
            Dialog::Alert(text) => {
                window("vidshelf".to_string()).show(ctx, |ui| {
                    ui.label(text.as_str());
                    if ui.button(t("ok", lang)).clicked() {
                        action = Some(DialogAction::Close);
                    }
                });
            }
        }

        let Some(action) = action else { return };
        self.dialog = Dialog::None;
        let http = self.backend.http.clone();
        match action {
            DialogAction::Close => {}
            DialogAction::Rename(entry, input) => self.spawn_task(ctx, async move {
                Msg::ActionFinished(actions::rename_video(&*http, &entry, Some(&input)).await)
            }),
            DialogAction::Delete(entry) => self.spawn_task(ctx, async move {
                Msg::ActionFinished(actions::delete_video(&*http, &entry, true).await)
            }),
        }
    }

    fn show_settings(&mut self, ctx: &egui::Context) {
        let Some(mut draft) = self.settings_draft.take() else { return };
        let lang = self.lang();
        let mut open = true;
        let mut save = false;
        let mut cancel = false;
        egui::Window::new(t("settings", lang))
            .collapsible(false)
            .resizable(true)
            .default_width(480.0)
            .open(&mut open)
            .show(ctx, |ui| {
                settings_grid(ui, &mut draft);
                ui.separator();
                ui.horizontal(|ui| {
                    save = ui.button(t("save", lang)).clicked();
                    cancel = ui.button(t("cancel", lang)).clicked();
                });
            });
        if save {
            self.status = Some(match save_config(&draft) {
                Ok(()) => StatusLine::success(t("saved", draft.language)),
                Err(e) => {
                    warn!(error = %e, "Saving config failed");
                    StatusLine::error(format!("{}: {e}", t("save_failed", lang)))
                }
            });
            self.apply_config(ctx, draft);
        } else if open && !cancel {
            self.settings_draft = Some(draft);
        }
    }
}

fn new_gallery(cfg: &ClientConfig, mode: FilterMode) -> Gallery {
    Gallery::new(cfg.page_size, cfg.batch_size, mode)
}

fn status_label(ui: &mut egui::Ui, status: &StatusLine) {
    let color = match status.kind {
        StatusKind::Info => Color32::LIGHT_BLUE,
        StatusKind::Success => Color32::GREEN,
        StatusKind::Error => Color32::RED,
    };
    ui.colored_label(color, &status.text);
}

fn settings_grid(ui: &mut egui::Ui, draft: &mut AppConfig) {
    let lang = draft.language;
    egui::Grid::new("settings_grid").num_columns(2).spacing([12.0, 6.0]).show(ui, |ui| {
        let c = &mut draft.client;
        ui.label("base_url");
        ui.text_edit_singleline(&mut c.base_url);
        ui.end_row();
        ui.label("auth_url");
        ui.text_edit_singleline(&mut c.auth_url);
        ui.end_row();
        ui.label("source");
        egui::ComboBox::from_id_source("source_kind").selected_text(c.source.as_str()).show_ui(ui, |ui| {
            ui.selectable_value(&mut c.source, SourceKind::StaticListing, SourceKind::StaticListing.as_str());
            ui.selectable_value(&mut c.source, SourceKind::PaginatedApi, SourceKind::PaginatedApi.as_str());
        });
        ui.end_row();
        ui.label("listing_path");
        ui.text_edit_singleline(&mut c.listing_path);
        ui.end_row();
        ui.label("video_extensions");
        let mut exts = c.video_extensions.join(",");
        if ui.text_edit_singleline(&mut exts).changed() {
            c.video_extensions =
                exts.split(',').map(|e| e.trim().trim_start_matches('.').to_lowercase()).filter(|e| !e.is_empty()).collect();
        }
        ui.end_row();
        ui.label("page_size");
        ui.add(egui::DragValue::new(&mut c.page_size).clamp_range(1..=500));
        ui.end_row();
        ui.label("batch_size");
        ui.add(egui::DragValue::new(&mut c.batch_size).clamp_range(1..=500));
        ui.end_row();
        ui.label("thumbnail_seek_secs");
        ui.add(egui::DragValue::new(&mut c.thumbnail_seek_secs).speed(0.5).clamp_range(0.0..=600.0));
        ui.end_row();
        ui.label("thumbnail_parallel");
        ui.add(egui::DragValue::new(&mut c.thumbnail_parallel).clamp_range(0..=64));
        ui.end_row();
        ui.label("head_parallel");
        ui.add(egui::DragValue::new(&mut c.head_parallel).clamp_range(1..=64));
        ui.end_row();
        ui.label("ffmpeg_path");
        ui.text_edit_singleline(&mut c.ffmpeg_path);
        ui.end_row();
        ui.label("request_timeout_secs");
        ui.add(egui::DragValue::new(&mut c.request_timeout_secs).clamp_range(1..=600));
        ui.end_row();
        ui.label("upload_timeout_secs");
        ui.add(egui::DragValue::new(&mut c.upload_timeout_secs).clamp_range(1..=7200));
        ui.end_row();
        ui.label("player_command");
        ui.text_edit_singleline(&mut draft.player_command);
        ui.end_row();
        ui.label(t("language", lang));
        egui::ComboBox::from_id_source("language").selected_text(draft.language.label()).show_ui(ui, |ui| {
            for l in Language::ALL {
                ui.selectable_value(&mut draft.language, l, l.label());
            }
        });
        ui.end_row();
    });
}

impl eframe::App for VidShelfApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_messages(ctx);

        let enabled = self.gate.granted;
        egui::TopBottomPanel::top("top").show(ctx, |ui| {
            ui.add_enabled_ui(enabled, |ui| self.show_top_bar(ui, ctx));
        });
        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.horizontal(|ui| {
                let catalog = self.gallery.catalog();
                ui.weak(format!("{} / {}", self.gallery.renderer().len(), catalog.entries().len()));
                if let Some(status) = &self.status {
                    ui.separator();
                    status_label(ui, status);
                }
            });
        });
        egui::SidePanel::right("detail").default_width(320.0).show(ctx, |ui| {
            ui.add_enabled_ui(enabled, |ui| self.show_detail(ui, ctx));
        });
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.add_enabled_ui(enabled, |ui| self.show_list(ui, ctx));
        });

        if !self.gate.granted {
            self.show_access_gate(ctx);
        }
        if self.dialog.is_open() {
            self.show_dialog(ctx);
        }
        self.show_settings(ctx);
    }
}

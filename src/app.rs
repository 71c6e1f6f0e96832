use std::path::Path;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};

use eframe::egui::{self, Color32, LayerId};

use crate::color;
use crate::config::Settings;
use crate::data::loader;
use crate::data::model::TypedTable;
use crate::error::IngestError;
use crate::insight::{InsightRequest, acquire_insight};
use crate::insight::client::{InsightService, MessagesClient};
use crate::insight::model::Insight;
use crate::particles::{FrameTicker, PARTICLE_COUNT, ParticleField, Trail};
use crate::state::{AnalysisTicket, AppState};
use crate::ui::{UiAction, canvas, panels};

/// Window size the particle field is seeded for before the first frame.
pub const INITIAL_SIZE: [f32; 2] = [1200.0, 800.0];

/// Frames kept to emulate the fading trail.
const TRAIL_DEPTH: usize = 24;

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct NeuralCanvasApp {
    pub state: AppState,
    settings: Settings,
    /// `None` when the HTTP client could not be built; analysis then goes
    /// straight to the fallback.
    service: Option<Arc<dyn InsightService>>,
    ticker: FrameTicker,
    trail: Trail,
    insight_tx: Sender<(AnalysisTicket, Insight)>,
    insight_rx: Receiver<(AnalysisTicket, Insight)>,
}

impl NeuralCanvasApp {
    pub fn new(settings: Settings) -> Self {
        let service: Option<Arc<dyn InsightService>> =
            match MessagesClient::new(settings.insight.clone()) {
                Ok(client) => {
                    log::info!("Insight service endpoint: {}", client.endpoint());
                    Some(Arc::new(client))
                }
                Err(e) => {
                    log::error!("Insight client unavailable, analysis will use fallback: {e}");
                    None
                }
            };

        let field = ParticleField::new(
            &mut rand::thread_rng(),
            INITIAL_SIZE[0],
            INITIAL_SIZE[1],
            PARTICLE_COUNT,
        );
        let (insight_tx, insight_rx) = mpsc::channel();

        Self {
            state: AppState::default(),
            settings,
            service,
            ticker: FrameTicker::new(field),
            trail: Trail::new(TRAIL_DEPTH),
            insight_tx,
            insight_rx,
        }
    }

    fn poll_insights(&mut self) {
        while let Ok((ticket, insight)) = self.insight_rx.try_recv() {
            self.state.finish_analysis(ticket, insight);
        }
    }

    fn animate(&mut self, ctx: &egui::Context) {
        let rect = ctx.screen_rect();
        if self.ticker.is_running() {
            self.ticker.field_mut().resize(rect.width(), rect.height());
        }

        if let Some(frame) = self.ticker.tick() {
            self.trail.push(frame);
            ctx.request_repaint();
        }

        let painter = ctx.layer_painter(LayerId::background());
        canvas::paint(&painter, rect, &self.trail);
    }

    fn dropped_files(ctx: &egui::Context) -> Option<UiAction> {
        let file = ctx.input(|i| i.raw.dropped_files.first().cloned())?;
        if let Some(path) = file.path {
            return Some(UiAction::LoadPath(path));
        }
        let bytes = file.bytes?;
        Some(UiAction::LoadBytes {
            name: file.name,
            bytes: bytes.to_vec(),
        })
    }

    fn handle(&mut self, action: UiAction, ctx: &egui::Context) {
        match action {
            UiAction::OpenFile => {
                if let Some(path) = panels::open_file_dialog() {
                    self.load_path(&path);
                }
            }
            UiAction::LoadPath(path) => self.load_path(&path),
            UiAction::LoadBytes { name, bytes } => {
                let result =
                    loader::ingest_bytes_limited(&name, &bytes, self.settings.max_upload_bytes);
                self.apply_load(name, result);
            }
            UiAction::Analyze => self.start_analysis(ctx),
            UiAction::SetColumnScan(scan) => {
                log::info!("Column classification: {scan:?}");
                self.state.set_column_scan(scan);
            }
            UiAction::Reset => {
                log::info!("Resetting workspace");
                self.state.reset();
            }
        }
    }

    fn load_path(&mut self, path: &Path) {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let result = loader::load_file(path, self.settings.max_upload_bytes);
        self.apply_load(name, result);
    }

    fn apply_load(&mut self, name: String, result: Result<TypedTable, IngestError>) {
        match result {
            Ok(table) => {
                log::info!(
                    "Loaded {name}: {} rows, columns {:?}",
                    table.len(),
                    table.headers
                );
                self.state.load_table(name, table);
            }
            Err(e) => {
                log::error!("Failed to load {name}: {e}");
                self.state.load_failed(format!("Error: {e}"));
            }
        }
    }

    /// Run one acquisition on a worker thread. Only the prompt and fallback
    /// cross over; replies are matched to their ticket in `poll_insights`.
    fn start_analysis(&mut self, ctx: &egui::Context) {
        let Some(table) = &self.state.table else {
            return;
        };
        let request = InsightRequest::from_table(table);
        let rows = table.len();
        let Some(ticket) = self.state.begin_analysis() else {
            return;
        };
        log::info!("Requesting insight for {rows} rows (ticket {ticket})");

        let service = self.service.clone();
        let tx = self.insight_tx.clone();
        let ctx = ctx.clone();

        std::thread::spawn(move || {
            let insight = match &service {
                Some(service) => acquire_insight(service.as_ref(), &request),
                None => request.fallback,
            };
            if tx.send((ticket, insight)).is_err() {
                log::debug!("App closed before insight {ticket} arrived");
            }
            ctx.request_repaint();
        });
    }
}

impl eframe::App for NeuralCanvasApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_insights();
        self.animate(ctx);

        let mut actions: Vec<UiAction> = Self::dropped_files(ctx).into_iter().collect();

        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar")
            .frame(egui::Frame::side_top_panel(&ctx.style()).fill(color::PANEL_FILL))
            .show(ctx, |ui| {
                panels::top_bar(ui, &self.state, &mut actions);
            });

        // ---- Central panel: overview over the particle canvas ----
        egui::CentralPanel::default()
            .frame(egui::Frame::central_panel(&ctx.style()).fill(Color32::TRANSPARENT))
            .show(ctx, |ui| {
                panels::content(ui, &self.state, self.settings.max_upload_bytes, &mut actions);
            });

        for action in actions {
            self.handle(action, ctx);
        }
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        if self.ticker.cancel() {
            self.trail.clear();
        }
    }
}

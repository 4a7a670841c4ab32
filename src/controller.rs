//! Triage workflow state: the current image, the simulated analysis, the
//! recent-results list, toasts and the dashboard counters.
//!
//! Nothing here knows about egui. Callers pass a monotonic `now` into every
//! operation and call [`TriageController::tick`] regularly; delayed work is
//! kept on an owned [`Timeline`] and runs inside `tick`.

use std::sync::Arc;
use std::time::Duration;
use chrono::Local;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::history::{synthetic_patient_id, PredictionEntry, PredictionHistory};
use crate::i18n;
use crate::inference::{run_inference, CannedClassifier, Classifier, Diagnosis};
use crate::notify::{Notice, Severity, Toast, ToastQueue};
use crate::schedule::{TimerId, Timeline};
use crate::stats::LiveStats;
use crate::upload::{load_image_from_bytes, UploadError, UploadedImage};
use crate::SimulationSettings;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriageState {
    Empty,
    HasImage,
    Analyzing,
    HasResult,
}

#[derive(Debug, Clone)]
enum TimerEvent {
    AnalysisDone,
    ReportDone,
    RevealStats,
    LiveStats,
}

pub struct TriageController {
    settings: SimulationSettings,
    rng: StdRng,
    classifier: Box<dyn Classifier>,

    image: Option<Arc<UploadedImage>>,
    result: Option<Diagnosis>,
    processing: bool,
    pending_analysis: Option<(TimerId, Duration)>, // Timer and the moment analysis started

    history: PredictionHistory,
    toasts: ToastQueue,
    stats: LiveStats,
    timeline: Timeline<TimerEvent>,
}

impl TriageController {
    pub fn new(settings: SimulationSettings) -> Self {
        Self::with_classifier(settings, Box::new(CannedClassifier))
    }

    pub fn with_classifier(settings: SimulationSettings, classifier: Box<dyn Classifier>) -> Self {
        let rng = match settings.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        log::info!("Triage controller ready (seed: {:?})", settings.seed);
        Self {
            history: PredictionHistory::new(settings.history_capacity),
            toasts: ToastQueue::new(settings.toast_duration),
            stats: LiveStats::default(),
            timeline: Timeline::new(),
            rng,
            classifier,
            image: None,
            result: None,
            processing: false,
            pending_analysis: None,
            settings,
        }
    }

    /// Arms the dashboard timers: the initial patient counter reveal and
    /// the periodic live-stats refresh.
    pub fn start(&mut self, now: Duration) {
        self.timeline.after(now, self.settings.initial_stats_delay, TimerEvent::RevealStats);
        self.timeline.every(now, self.settings.live_stats_interval, TimerEvent::LiveStats);
    }

    pub fn state(&self) -> TriageState {
        match (&self.image, self.processing, &self.result) {
            (None, _, _) => TriageState::Empty,
            (Some(_), true, _) => TriageState::Analyzing,
            (Some(_), false, Some(_)) => TriageState::HasResult,
            (Some(_), false, None) => TriageState::HasImage,
        }
    }

    /// Decodes on the calling thread. The GUI decodes on its loader instead
    /// and hands the outcome to [`TriageController::submit_loaded`].
    pub fn submit_image(
        &mut self,
        now: Duration,
        bytes: impl Into<Arc<[u8]>>,
        mime: &str,
        name: &str,
    ) -> Result<(), UploadError> {
        self.submit_loaded(now, load_image_from_bytes(bytes, mime, name))
    }

    pub fn submit_loaded(&mut self, now: Duration, loaded: Result<UploadedImage, UploadError>) -> Result<(), UploadError> {
        match loaded {
            Ok(image) => {
                log::info!("Accepted {} ({}, {} bytes)", image.name, image.mime, image.bytes.len());
                self.cancel_pending_analysis();
                self.image = Some(Arc::new(image));
                self.result = None;
                Ok(())
            }
            Err(e) => {
                log::warn!("Rejected upload: {}", e);
                self.toasts.push(now, Notice::InvalidFileType, i18n::t("invalid_file"), Severity::Error);
                Err(e)
            }
        }
    }

    pub fn clear(&mut self) {
        if self.image.is_some() {
            log::info!("Cleared current image");
        }
        self.cancel_pending_analysis();
        self.image = None;
        self.result = None;
    }

    fn cancel_pending_analysis(&mut self) {
        if let Some((id, _)) = self.pending_analysis.take() {
            self.timeline.cancel(id);
        }
        self.processing = false;
    }

    /// Returns whether an analysis was started.
    pub fn analyze(&mut self, now: Duration) -> bool {
        if self.image.is_none() || self.processing {
            return false;
        }
        self.processing = true;
        let id = self.timeline.after(now, self.settings.analysis_delay, TimerEvent::AnalysisDone);
        self.pending_analysis = Some((id, now));
        log::info!("Analysis started, result in {:?}", self.settings.analysis_delay);
        true
    }

    pub fn save_record(&mut self, now: Duration) {
        self.toasts.push(now, Notice::RecordSaved, i18n::t("record_saved"), Severity::Success);
        self.stats.increment_patients(now, self.settings.counter_animation);
    }

    pub fn generate_report(&mut self, now: Duration) {
        self.toasts.push(now, Notice::ReportStarted, i18n::t("report_started"), Severity::Info);
        self.timeline.after(now, self.settings.report_delay, TimerEvent::ReportDone);
    }

    pub fn notify(&mut self, now: Duration, message: impl Into<String>, severity: Severity) -> u64 {
        self.toasts.push(now, Notice::Custom, message, severity)
    }

    /// Runs every timer due at `now`, then drops expired toasts.
    pub fn tick(&mut self, now: Duration) {
        while let Some(event) = self.timeline.pop_due(now) {
            match event {
                TimerEvent::AnalysisDone => self.finish_analysis(now),
                TimerEvent::ReportDone => {
                    self.toasts.push(now, Notice::ReportReady, i18n::t("report_ready"), Severity::Success);
                }
                TimerEvent::RevealStats => self.stats.reveal_patients(now, self.settings.counter_animation),
                TimerEvent::LiveStats => self.stats.drift(now, self.settings.counter_animation, &mut self.rng),
            }
        }
        self.toasts.expire(now);
    }

    fn finish_analysis(&mut self, now: Duration) {
        let started = self.pending_analysis.take().map(|(_, at)| at).unwrap_or(now);
        self.processing = false;
        let Some(image) = self.image.clone() else {
            return;
        };

        let diagnosis = run_inference(self.classifier.as_mut(), &image, &mut self.rng);
        let patient_id = synthetic_patient_id(&mut self.rng);
        let processing_time = now.saturating_sub(started);
        log::info!(
            "Analysis of {} finished: {} ({}%), patient {}, {:.1}s",
            image.name,
            diagnosis.record.condition,
            diagnosis.record.confidence,
            patient_id,
            processing_time.as_secs_f32()
        );
        self.history.push(PredictionEntry {
            processing_time,
            ..PredictionEntry::new(&diagnosis, image, patient_id, Local::now())
        });
        self.stats.record_scan();
        self.result = Some(diagnosis);
    }

    /// Earliest moment something changes on its own (a timer or a toast expiry).
    pub fn next_wakeup(&self) -> Option<Duration> {
        match (self.timeline.next_due(), self.toasts.next_expiry()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    pub fn image(&self) -> Option<&Arc<UploadedImage>> {
        self.image.as_ref()
    }

    pub fn result(&self) -> Option<&Diagnosis> {
        self.result.as_ref()
    }

    pub fn is_processing(&self) -> bool {
        self.processing
    }

    pub fn history(&self) -> &PredictionHistory {
        &self.history
    }

    pub fn toasts(&self) -> &[Toast] {
        self.toasts.active()
    }

    pub fn stats(&self) -> &LiveStats {
        &self.stats
    }
}

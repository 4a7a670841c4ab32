use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

/// What a toast is about, so callers can react without parsing the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    InvalidFileType,
    RecordSaved,
    ReportStarted,
    ReportReady,
    Custom,
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub id: u64,
    pub notice: Notice,
    pub message: String,
    pub severity: Severity,
    pub shown_at: Duration,
    pub expires_at: Duration,
}

impl Toast {
    /// 0.0 when it first appears, 1.0 when it is about to vanish.
    pub fn progress(&self, now: Duration) -> f32 {
        let total = self.expires_at.saturating_sub(self.shown_at).as_secs_f32();
        if total <= 0.0 {
            return 1.0;
        }
        (now.saturating_sub(self.shown_at).as_secs_f32() / total).clamp(0.0, 1.0)
    }
}

/// Toasts live independently: a new one never cancels an older one.
#[derive(Debug)]
pub struct ToastQueue {
    toasts: Vec<Toast>,
    display_for: Duration,
    next_id: u64,
}

impl ToastQueue {
    pub fn new(display_for: Duration) -> Self {
        Self {
            toasts: Vec::new(),
            display_for,
            next_id: 0,
        }
    }

    pub fn push(&mut self, now: Duration, notice: Notice, message: impl Into<String>, severity: Severity) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        let message = message.into();
        log::info!("Toast [{:?}] {}", severity, message);
        self.toasts.push(Toast {
            id,
            notice,
            message,
            severity,
            shown_at: now,
            expires_at: now + self.display_for,
        });
        id
    }

    pub fn expire(&mut self, now: Duration) {
        self.toasts.retain(|t| t.expires_at > now);
    }

    pub fn active(&self) -> &[Toast] {
        &self.toasts
    }

    pub fn next_expiry(&self) -> Option<Duration> {
        self.toasts.iter().map(|t| t.expires_at).min()
    }
}

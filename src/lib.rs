pub mod backdrop;
pub mod catalog;
pub mod controller;
pub mod gui;
pub mod history;
pub mod i18n;
pub mod inference;
pub mod metrics;
pub mod notify;
pub mod schedule;
pub mod stats;
pub mod upload;

use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Condition {
    Pneumonia,
    Normal,
    Covid19,
}

impl Condition {
    /// Display order of the confidence bars.
    pub const ALL: [Condition; 3] = [Condition::Pneumonia, Condition::Normal, Condition::Covid19];

    pub fn label(&self) -> &'static str {
        match self {
            Condition::Pneumonia => "Pneumonia",
            Condition::Normal => "Normal",
            Condition::Covid19 => "COVID-19",
        }
    }
}

impl std::fmt::Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiagnosisRecord {
    pub condition: Condition,
    pub confidence: u8, // Percentage, 0-100
    pub description: &'static str,
}

#[derive(Clone, Debug)]
pub struct SimulationSettings {
    pub analysis_delay: Duration, // Fake inference latency
    pub report_delay: Duration,
    pub toast_duration: Duration, // How long each toast stays on screen
    pub live_stats_interval: Duration,
    pub initial_stats_delay: Duration,
    pub counter_animation: Duration,
    pub history_capacity: usize,
    pub seed: Option<u64>, // None seeds from entropy
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            analysis_delay: Duration::from_millis(2500),
            report_delay: Duration::from_millis(1500),
            toast_duration: Duration::from_millis(3000),
            live_stats_interval: Duration::from_millis(5000),
            initial_stats_delay: Duration::from_millis(1000),
            counter_animation: Duration::from_millis(1000),
            history_capacity: 10,
            seed: None,
        }
    }
}

impl SimulationSettings {
    /// Every delay set to zero, for driving the controller without waiting.
    pub fn instant(seed: u64) -> Self {
        Self {
            analysis_delay: Duration::ZERO,
            report_delay: Duration::ZERO,
            initial_stats_delay: Duration::ZERO,
            counter_animation: Duration::ZERO,
            seed: Some(seed),
            ..Default::default()
        }
    }
}

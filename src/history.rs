use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use chrono::{DateTime, Local};
use rand::{Rng, RngCore};
use crate::inference::{ConfidenceBars, Diagnosis};
use crate::metrics::MODEL_VERSION;
use crate::upload::UploadedImage;
use crate::Condition;

#[derive(Clone, Debug)]
pub struct PredictionEntry {
    pub condition: Condition,
    pub confidence: u8,
    pub description: &'static str,
    pub bars: ConfidenceBars,
    pub timestamp: DateTime<Local>,
    pub patient_id: String,
    pub image: Arc<UploadedImage>, // Snapshot of the image that was analyzed
    pub processing_time: Duration,
    pub model_version: &'static str,
}

impl PredictionEntry {
    pub fn new(diagnosis: &Diagnosis, image: Arc<UploadedImage>, patient_id: String, timestamp: DateTime<Local>) -> Self {
        Self {
            condition: diagnosis.record.condition,
            confidence: diagnosis.record.confidence,
            description: diagnosis.record.description,
            bars: diagnosis.bars,
            timestamp,
            patient_id,
            image,
            processing_time: Duration::ZERO,
            model_version: MODEL_VERSION,
        }
    }
}

/// Synthetic identifier such as `P4821`.
pub fn synthetic_patient_id(rng: &mut dyn RngCore) -> String {
    format!("P{:04}", rng.gen_range(1000..=9999u32))
}

/// "Oct 18, 2026, 10:34 AM"
pub fn format_timestamp(ts: &DateTime<Local>) -> String {
    ts.format("%b %-d, %Y, %I:%M %p").to_string()
}

/// Most recent predictions, newest first.
#[derive(Debug)]
pub struct PredictionHistory {
    entries: VecDeque<PredictionEntry>,
    capacity: usize,
}

impl PredictionHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, entry: PredictionEntry) {
        self.entries.push_front(entry);
        self.entries.truncate(self.capacity);
    }

    pub fn latest(&self) -> Option<&PredictionEntry> {
        self.entries.front()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PredictionEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CATALOG;
    use crate::upload::load_image_from_bytes;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn entry(idx: usize, patient: &str) -> PredictionEntry {
        let img = Arc::new(load_image_from_bytes(vec![0u8], "image/png", "x.png").unwrap());
        let record = &CATALOG[idx % CATALOG.len()];
        let diagnosis = Diagnosis {
            record,
            bars: ConfidenceBars { pneumonia: 1, normal: 1, covid19: 1 },
        };
        PredictionEntry::new(&diagnosis, img, patient.to_string(), Local::now())
    }

    #[test]
    fn keeps_newest_first_and_caps_length() {
        let mut history = PredictionHistory::new(10);
        for i in 0..13 {
            history.push(entry(i, &format!("P{:04}", 1000 + i)));
        }
        assert_eq!(history.len(), 10);
        let ids: Vec<_> = history.iter().map(|e| e.patient_id.as_str()).collect();
        assert_eq!(ids.first(), Some(&"P1012"));
        assert_eq!(ids.last(), Some(&"P1003"));
    }

    #[test]
    fn patient_ids_are_four_digits() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..100 {
            let id = synthetic_patient_id(&mut rng);
            assert_eq!(id.len(), 5);
            assert!(id.starts_with('P'));
            let n: u32 = id[1..].parse().unwrap();
            assert!((1000..=9999).contains(&n));
        }
    }

    #[test]
    fn timestamp_format_matches_display_style() {
        use chrono::TimeZone;
        let ts = Local.with_ymd_and_hms(2026, 10, 18, 14, 5, 0).unwrap();
        assert_eq!(format_timestamp(&ts), "Oct 18, 2026, 02:05 PM");
    }
}

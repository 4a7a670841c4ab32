use crate::{Condition, DiagnosisRecord};

/// Canned results the simulated model chooses from.
pub static CATALOG: [DiagnosisRecord; 5] = [
    DiagnosisRecord {
        condition: Condition::Pneumonia,
        confidence: 94,
        description: "AI model detected signs of pneumonia with high confidence. Recommend immediate clinical review.",
    },
    DiagnosisRecord {
        condition: Condition::Normal,
        confidence: 96,
        description: "No abnormalities detected. Chest X-ray appears normal.",
    },
    DiagnosisRecord {
        condition: Condition::Covid19,
        confidence: 87,
        description: "Characteristics consistent with COVID-19 pneumonia detected.",
    },
    DiagnosisRecord {
        condition: Condition::Pneumonia,
        confidence: 91,
        description: "Bilateral pneumonia patterns identified in lower lobes.",
    },
    DiagnosisRecord {
        condition: Condition::Normal,
        confidence: 98,
        description: "Clear lung fields with normal cardiac silhouette.",
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfidenceTier {
    High,   // >= 90
    Medium, // >= 80
    Low,
}

impl ConfidenceTier {
    pub fn of(confidence: u8) -> Self {
        if confidence >= 90 {
            ConfidenceTier::High
        } else if confidence >= 80 {
            ConfidenceTier::Medium
        } else {
            ConfidenceTier::Low
        }
    }
}

#[cfg(test)]
pub fn contains(record: &DiagnosisRecord) -> bool {
    CATALOG.iter().any(|r| r == record)
}

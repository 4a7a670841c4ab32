//! Published evaluation figures for the bundled model. These are fixed
//! numbers shown on the dashboard; nothing here is computed at runtime.

use crate::Condition;

pub const MODEL_VERSION: &str = "MediAI v2.1";

/// Row/column order of [`ModelPerformance::confusion`].
pub const CONFUSION_ORDER: [Condition; 3] = [Condition::Normal, Condition::Pneumonia, Condition::Covid19];

#[derive(Debug, Clone, PartialEq)]
pub struct ModelPerformance {
    pub accuracy: f32,
    pub precision: f32,
    pub recall: f32,
    pub f1: f32,
    pub auc: [(Condition, f32); 3],
    /// Rows are the true class, columns the predicted class.
    pub confusion: [[u32; 3]; 3],
}

pub static MODEL_PERFORMANCE: ModelPerformance = ModelPerformance {
    accuracy: 94.7,
    precision: 92.1,
    recall: 89.5,
    f1: 90.7,
    auc: [
        (Condition::Normal, 0.95),
        (Condition::Pneumonia, 0.92),
        (Condition::Covid19, 0.89),
    ],
    confusion: [[45, 3, 2], [2, 38, 4], [1, 2, 28]],
};

impl ModelPerformance {
    pub fn evaluated_cases(&self) -> u32 {
        self.confusion.iter().flatten().sum()
    }

    /// Share of each true class that was predicted correctly, in percent.
    pub fn per_class_recall(&self) -> impl Iterator<Item = (Condition, f32)> + '_ {
        CONFUSION_ORDER.iter().enumerate().map(move |(i, c)| {
            let row: u32 = self.confusion[i].iter().sum();
            let hit = self.confusion[i][i];
            (*c, if row == 0 { 0.0 } else { hit as f32 * 100.0 / row as f32 })
        })
    }
}

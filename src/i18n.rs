use std::sync::Mutex;
use lazy_static::lazy_static;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Language {
    En,
    Zh,
}

lazy_static! {
    static ref CURRENT_LANG: Mutex<Language> = Mutex::new(Language::En);
}

pub fn set_language(lang: Language) {
    if let Ok(mut current) = CURRENT_LANG.lock() {
        *current = lang;
    }
}

pub fn get_language() -> Language {
    CURRENT_LANG.lock().map(|l| *l).unwrap_or(Language::En)
}

pub fn t(key: &str) -> String {
    let val = match get_language() {
        Language::En => get_en(key),
        Language::Zh => get_zh(key),
    };
    if val.is_empty() {
        key.to_string()
    } else {
        val.to_string()
    }
}

fn get_zh(key: &str) -> &'static str {
    match key {
        "app_title" => "MediAI 胸片分诊",
        "open_file" => "选择影像...",
        "drag_drop" => "拖拽胸部 X 光片到此处，或点击选择文件",
        "reading" => "读取文件中...",
        "analyzing" => "AI 正在分析影像...",
        "analyze" => "开始分析",
        "clear" => "清除",
        "save_record" => "保存到病历",
        "generate_report" => "生成报告",
        "results_placeholder" => "上传影像并点击分析以查看结果",
        "confidence" => "置信度",
        "patients_today" => "今日患者",
        "queue" => "排队中",
        "accuracy" => "AI 准确率",
        "recent" => "最近预测",
        "no_preview" => "无法预览该影像",
        "invalid_file" => "请选择有效的图像文件。",
        "record_saved" => "患者记录保存成功！",
        "report_started" => "正在生成详细报告...",
        "report_ready" => "报告生成成功！",
        "read_fail" => "读取文件失败：",
        "avg_wait" => "平均等待",
        "minutes" => "分钟",
        "total_scans" => "累计扫描",
        "model_performance" => "模型性能",
        "precision" => "精确率",
        "recall" => "召回率",
        "f1_score" => "F1 分数",
        "auc" => "AUC",
        "confusion_matrix" => "混淆矩阵（行：真实，列：预测）",
        "processing_time" => "耗时",
        _ => "",
    }
}

fn get_en(key: &str) -> &'static str {
    match key {
        "app_title" => "MediAI Chest X-ray Triage",
        "open_file" => "Choose Image...",
        "drag_drop" => "Drop a chest X-ray here or click to browse",
        "reading" => "Reading file...",
        "analyzing" => "AI is analyzing the image...",
        "analyze" => "Analyze",
        "clear" => "Clear",
        "save_record" => "Save to Record",
        "generate_report" => "Generate Report",
        "results_placeholder" => "Upload an image and press Analyze to see results",
        "confidence" => "Confidence",
        "patients_today" => "Patients Today",
        "queue" => "In Queue",
        "accuracy" => "AI Accuracy",
        "recent" => "Recent Predictions",
        "no_preview" => "Preview not available for this image",
        "invalid_file" => "Please select a valid image file.",
        "record_saved" => "Patient record saved successfully!",
        "report_started" => "Generating detailed report...",
        "report_ready" => "Report generated successfully!",
        "read_fail" => "Could not read file: ",
        "avg_wait" => "Avg. Wait",
        "minutes" => "min",
        "total_scans" => "Total Scans",
        "model_performance" => "Model Performance",
        "precision" => "Precision",
        "recall" => "Recall",
        "f1_score" => "F1 Score",
        "auc" => "AUC",
        "confusion_matrix" => "Confusion matrix (rows: actual, columns: predicted)",
        "processing_time" => "took",
        _ => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_keys_fall_back_to_the_key() {
        assert_eq!(t("definitely_missing"), "definitely_missing");
    }

    #[test]
    fn both_tables_cover_the_same_keys() {
        for key in ["app_title", "analyze", "invalid_file", "record_saved", "report_started", "report_ready", "avg_wait", "total_scans", "model_performance", "confusion_matrix"] {
            assert!(!get_en(key).is_empty(), "en missing {key}");
            assert!(!get_zh(key).is_empty(), "zh missing {key}");
        }
    }
}

use std::time::Duration;

use mediai_triage::catalog::CATALOG;
use mediai_triage::metrics::MODEL_VERSION;
use mediai_triage::stats::INITIAL_TOTAL_SCANS;
use mediai_triage::controller::{TriageController, TriageState};
use mediai_triage::notify::{Notice, Severity};
use mediai_triage::upload::{UploadError, PREVIEW_MAX_SIDE};
use mediai_triage::SimulationSettings;

fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

fn png_bytes() -> Vec<u8> {
    png_of(4, 4)
}

fn png_of(w: u32, h: u32) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(w, h, image::Rgba([10, 10, 10, 255]));
    let mut out = std::io::Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png).unwrap();
    out.into_inner()
}

#[test]
fn xray_png_walkthrough() {
    let mut c = TriageController::new(SimulationSettings {
        seed: Some(2024),
        ..Default::default()
    });
    c.start(ms(0));

    c.submit_image(ms(100), png_bytes(), "image/png", "xray.png").unwrap();
    assert_eq!(c.state(), TriageState::HasImage);
    assert_eq!(c.image().unwrap().dimensions(), Some((4, 4)));

    assert!(c.analyze(ms(200)));
    assert_eq!(c.state(), TriageState::Analyzing);
    c.tick(ms(2000));
    assert_eq!(c.state(), TriageState::Analyzing);
    c.tick(ms(2700));
    assert_eq!(c.state(), TriageState::HasResult);

    let expected = [(94, "Pneumonia"), (96, "Normal"), (87, "COVID-19"), (91, "Pneumonia"), (98, "Normal")];
    let d = c.result().unwrap();
    assert!(expected.contains(&(d.record.confidence, d.record.condition.label())));
    assert!(CATALOG.iter().any(|r| r.description == d.record.description && r.confidence == d.record.confidence));

    assert_eq!(c.history().len(), 1);
    let entry = c.history().latest().unwrap();
    assert!(entry.patient_id.starts_with('P'));
    assert_eq!(entry.patient_id[1..].len(), 4);
    assert!(entry.patient_id[1..].chars().all(|ch| ch.is_ascii_digit()));
    assert_eq!(entry.image.name, "xray.png");
    assert_eq!(entry.model_version, MODEL_VERSION);
    assert_eq!(entry.processing_time, ms(2500));
    assert_eq!(c.stats().total_scans(), INITIAL_TOTAL_SCANS + 1);
}

#[test]
fn oversized_scan_gets_a_bounded_preview() {
    let mut c = TriageController::new(SimulationSettings::instant(3));
    c.submit_image(ms(0), png_of(5000, 100), "image/png", "panorama.png").unwrap();
    let image = c.image().unwrap();
    assert_eq!(image.dimensions(), Some((5000, 100)));
    let preview = image.preview.as_ref().unwrap();
    assert!(preview.width() <= PREVIEW_MAX_SIDE && preview.height() <= PREVIEW_MAX_SIDE);
}

#[test]
fn report_pdf_is_rejected() {
    let mut c = TriageController::new(SimulationSettings::instant(1));
    let err = c.submit_image(ms(0), b"%PDF-1.7".to_vec(), "application/pdf", "report.pdf").unwrap_err();
    assert!(matches!(err, UploadError::InvalidFileType { .. }));
    assert_eq!(c.state(), TriageState::Empty);

    let errors: Vec<_> = c.toasts().iter().filter(|t| t.severity == Severity::Error).collect();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].notice, Notice::InvalidFileType);
}

#[test]
fn seeded_controllers_agree() {
    let run = |seed| {
        let mut c = TriageController::new(SimulationSettings::instant(seed));
        c.submit_image(ms(0), png_bytes(), "image/png", "xray.png").unwrap();
        let mut out = Vec::new();
        for i in 0..5 {
            c.analyze(ms(i));
            c.tick(ms(i));
            let e = c.history().latest().unwrap();
            out.push((e.confidence, e.bars, e.patient_id.clone()));
        }
        out
    };
    assert_eq!(run(77), run(77));
}

#[test]
fn newest_result_is_first_in_history() {
    let mut c = TriageController::new(SimulationSettings::instant(5));
    c.submit_image(ms(0), png_bytes(), "image/png", "first.png").unwrap();
    c.analyze(ms(0));
    c.tick(ms(0));
    c.submit_image(ms(1), png_bytes(), "image/jpeg", "second.jpg").unwrap();
    assert_eq!(c.state(), TriageState::HasImage);
    c.analyze(ms(1));
    c.tick(ms(1));

    let names: Vec<_> = c.history().iter().map(|e| e.image.name.as_str()).collect();
    assert_eq!(names, vec!["second.jpg", "first.png"]);
}

#[test]
fn live_stats_refresh_on_interval() {
    let mut c = TriageController::new(SimulationSettings {
        live_stats_interval: ms(5000),
        initial_stats_delay: ms(1000),
        counter_animation: Duration::ZERO,
        seed: Some(8),
        ..Default::default()
    });
    c.start(ms(0));
    assert_eq!(c.stats().patients_count(), 0);
    c.tick(ms(1000));
    assert_eq!(c.stats().patients_count(), 247);

    for i in 1..=20 {
        c.tick(ms(i * 5000));
        let acc = c.stats().accuracy_percent();
        assert!((94.0..=95.5).contains(&acc));
        assert!((1.8..=2.8).contains(&c.stats().average_wait));
    }
}

use anyhow::Result;
use mediai_triage::catalog::CATALOG;
use mediai_triage::controller::TriageController;
use mediai_triage::SimulationSettings;
use std::time::Duration;

// Runs many zero-latency analyses and prints how often each canned result
// and filler value came up.
fn main() -> Result<()> {
    let runs: usize = std::env::args().nth(1).map(|s| s.parse()).transpose()?.unwrap_or(10_000);
    let seed: u64 = std::env::args().nth(2).map(|s| s.parse()).transpose()?.unwrap_or(1);

    let mut controller = TriageController::new(SimulationSettings::instant(seed));
    controller.submit_image(Duration::ZERO, vec![0u8; 8], "image/png", "debug.png")?;

    let mut hits = [0usize; CATALOG.len()];
    let mut filler = [0usize; 11];
    for i in 0..runs {
        let now = Duration::from_millis(i as u64);
        controller.analyze(now);
        controller.tick(now);
        let Some(d) = controller.result() else { continue };

        if let Some(idx) = CATALOG.iter().position(|r| std::ptr::eq(r, d.record)) {
            hits[idx] += 1;
        }
        for (condition, value) in d.bars.iter() {
            if condition != d.record.condition {
                filler[value as usize] += 1;
            }
        }
    }

    println!("{} runs, seed {}", runs, seed);
    for (record, n) in CATALOG.iter().zip(hits) {
        println!("{:<10} {:>3}%  {:>6} ({:.1}%)", record.condition, record.confidence, n, n as f64 * 100.0 / runs as f64);
    }
    println!("Filler values:");
    for (value, n) in filler.iter().enumerate().skip(1) {
        println!("  {:>2}: {}", value, n);
    }
    Ok(())
}

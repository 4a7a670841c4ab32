use mediai_triage::{gui, SimulationSettings};

// --- Native (CLI/Desktop) Entry Point ---
#[cfg(not(target_arch = "wasm32"))]
use clap::Parser;
#[cfg(not(target_arch = "wasm32"))]
use std::path::PathBuf;

#[cfg(not(target_arch = "wasm32"))]
#[derive(Parser)]
#[command(author, version, about = "Simulated chest X-ray triage demo", long_about = None)]
struct Cli {
    /// Image to preload (or to analyze with --headless)
    input: Option<PathBuf>,
    /// Seed for the simulated model, makes results reproducible
    #[arg(short, long)]
    seed: Option<u64>,
    /// Run one simulated analysis and print it instead of opening a window
    #[arg(long)]
    headless: bool,
    /// Simulated inference latency in milliseconds
    #[arg(long, default_value_t = 2500)]
    delay_ms: u64,
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let settings = SimulationSettings {
        analysis_delay: std::time::Duration::from_millis(cli.delay_ms),
        seed: cli.seed,
        ..Default::default()
    };

    if !cli.headless {
        return gui::run(cli.input, settings);
    }

    let Some(input_path) = cli.input else {
        anyhow::bail!("--headless needs an image path");
    };
    headless::run(&input_path, settings)
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use anyhow::Result;
    use mediai_triage::controller::TriageController;
    use mediai_triage::history::format_timestamp;
    use mediai_triage::upload::read_picked_file;
    use mediai_triage::SimulationSettings;
    use std::path::Path;
    use std::time::Instant;

    pub fn run(path: &Path, settings: SimulationSettings) -> Result<()> {
        println!("Loading image: {:?}", path);
        let file = read_picked_file(path)?;

        let started = Instant::now();
        let mut controller = TriageController::new(settings);
        controller.submit_image(started.elapsed(), file.bytes, &file.mime, &file.name)?;
        if let Some((w, h)) = controller.image().and_then(|img| img.dimensions()) {
            println!("Image accepted: {}x{} ({})", w, h, file.mime);
        }

        println!("Analyzing...");
        controller.analyze(started.elapsed());
        while controller.is_processing() {
            if let Some(wake) = controller.next_wakeup() {
                std::thread::sleep(wake.saturating_sub(started.elapsed()));
            }
            controller.tick(started.elapsed());
        }

        let entry = controller
            .history()
            .latest()
            .ok_or_else(|| anyhow::anyhow!("analysis produced no result"))?;
        println!("Patient:     {}", entry.patient_id);
        println!("Time:        {}", format_timestamp(&entry.timestamp));
        println!("Diagnosis:   {} ({}%)", entry.condition, entry.confidence);
        println!("Notes:       {}", entry.description);
        println!("Model:       {}", entry.model_version);
        println!("Processing:  {:.1}s", entry.processing_time.as_secs_f32());
        for (condition, value) in entry.bars.iter() {
            println!("  {:<10} {:>3}% {}", condition.label(), value, "#".repeat(value as usize / 4));
        }
        Ok(())
    }
}

// --- WASM Entry Point ---
#[cfg(target_arch = "wasm32")]
fn main() {
    // Make sure panics are logged using console.error
    console_error_panic_hook::set_once();

    // Redirect tracing to console.log
    tracing_wasm::set_as_global_default();

    let web_options = eframe::WebOptions::default();

    wasm_bindgen_futures::spawn_local(async {
        use wasm_bindgen::JsCast;
        let document = web_sys::window().expect("No window").document().expect("No document");
        let canvas = document.get_element_by_id("the_canvas_id")
            .expect("Failed to find the_canvas_id")
            .dyn_into::<web_sys::HtmlCanvasElement>()
            .expect("the_canvas_id was not a HtmlCanvasElement");

        eframe::WebRunner::new()
            .start(
                canvas,
                web_options,
                Box::new(|cc| {
                    gui::configure_visuals(&cc.egui_ctx);
                    Ok(Box::new(gui::TriageApp::new(None, SimulationSettings::default(), cc.egui_ctx.clone())))
                }),
            )
            .await
            .expect("failed to start eframe");
    });
}

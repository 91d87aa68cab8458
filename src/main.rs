mod capture;
mod config;
mod overlay;
mod pipeline;
mod vision;

use crate::capture::grabber::capture_screen;
use crate::capture::scaling::ScalingFactor;
use crate::config::AppConfig;
use crate::overlay::annotate::Annotator;
use crate::pipeline::locate_text;
use crate::vision::ocr::TesseractRecognizer;

use anyhow::{Context, Result};
use log::{debug, info};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = AppConfig::load();

    let capture = capture_screen().context("screen capture failed")?;
    let scale = ScalingFactor::resolve(capture.logical_size, capture.raster_size())?;
    info!(
        "Captured {:?} raster, scaling {}",
        capture.raster_size(),
        scale
    );

    let recognizer = TesseractRecognizer::new(&config.ocr);
    let phrases = locate_text(&capture.image, scale, &recognizer, &config)?;

    let annotator = Annotator::new(&config.annotate);
    let marked = annotator.annotate(&capture.image, &phrases, scale);
    marked
        .save(&config.output_path)
        .with_context(|| format!("writing {}", config.output_path.display()))?;

    println!(
        "Detected {} text items. Marked image saved as '{}'",
        phrases.len(),
        config.output_path.display()
    );
    for phrase in &phrases {
        debug!(
            "{:?} raster {:?} logical {:?}",
            phrase.text, phrase.bounding_box, phrase.bounding_box_logical
        );
        println!("{}", phrase);
    }
    println!(
        "Actual screen size: ({}, {})",
        capture.logical_size.0, capture.logical_size.1
    );
    println!("Scaling factors: {}", scale);

    Ok(())
}

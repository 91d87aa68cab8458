use anyhow::Result;
use image::{imageops, RgbaImage};
use log::info;

use crate::capture::scaling::ScalingFactor;
use crate::config::AppConfig;
use crate::vision::cluster::cluster_words;
use crate::vision::ocr::{collect_words, TextRecognizer};
use crate::vision::phrase::{build_phrases, Phrase};

/// Recognize, filter, cluster and project in one pass over `image`.
pub fn locate_text(
    image: &RgbaImage,
    scale: ScalingFactor,
    recognizer: &dyn TextRecognizer,
    config: &AppConfig,
) -> Result<Vec<Phrase>> {
    let gray = imageops::grayscale(image);
    let tokens = recognizer.recognize(&gray)?;
    let token_count = tokens.len();

    let words = collect_words(tokens);
    let clusters = cluster_words(&words, &config.cluster);
    let phrases = build_phrases(&words, &clusters, scale, config.click_offset_x);

    info!(
        "{} OCR tokens, {} words kept, {} phrases",
        token_count,
        words.len(),
        phrases.len()
    );
    Ok(phrases)
}

use anyhow::{anyhow, Context, Result};
use image::GrayImage;
use log::debug;
use rusty_tesseract::{Args, Image};
use std::collections::HashMap;

use crate::config::OcrConfig;
use crate::vision::filter::is_valid_word;

/// One row of OCR output, before any filtering.
#[derive(Debug, Clone, PartialEq)]
pub struct OcrToken {
    pub text: String,
    pub left: i32,
    pub top: i32,
    pub width: i32,
    pub height: i32,
}

/// A token that passed the word filter, in raster pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct Word {
    pub text: String,
    pub left: i32,
    pub top: i32,
    pub width: i32,
    pub height: i32,
}

impl Word {
    pub fn right(&self) -> i32 {
        self.left + self.width
    }

    pub fn bottom(&self) -> i32 {
        self.top + self.height
    }
}

/// Anything that turns a grayscale raster into positioned tokens.
pub trait TextRecognizer {
    fn recognize(&self, image: &GrayImage) -> Result<Vec<OcrToken>>;
}

pub struct TesseractRecognizer {
    args: Args,
}

impl TesseractRecognizer {
    pub fn new(config: &OcrConfig) -> Self {
        let args = Args {
            lang: config.lang.clone(),
            config_variables: HashMap::from([("tessedit_create_tsv".into(), "1".into())]),
            dpi: config.dpi,
            psm: config.psm,
            oem: None,
        };
        Self { args }
    }
}

impl TextRecognizer for TesseractRecognizer {
    fn recognize(&self, image: &GrayImage) -> Result<Vec<OcrToken>> {
        let file = tempfile::Builder::new()
            .prefix("screen-locator-")
            .suffix(".png")
            .tempfile()
            .context("creating OCR scratch file")?;
        image
            .save(file.path())
            .context("writing OCR scratch image")?;

        let input = Image::from_path(file.path())
            .map_err(|e| anyhow!("loading image for tesseract: {}", e))?;
        let output = rusty_tesseract::image_to_data(&input, &self.args)
            .map_err(|e| anyhow!("tesseract failed: {}", e))?;

        debug!("Tesseract returned {} rows", output.data.len());
        Ok(output
            .data
            .into_iter()
            .map(|row| OcrToken {
                text: row.text,
                left: row.left,
                top: row.top,
                width: row.width,
                height: row.height,
            })
            .collect())
    }
}

/// Drops blank and implausible tokens. The filter sees the trimmed text but
/// the word keeps what the engine returned.
pub fn collect_words(tokens: Vec<OcrToken>) -> Vec<Word> {
    tokens
        .into_iter()
        .filter(|t| {
            let trimmed = t.text.trim();
            !trimmed.is_empty() && is_valid_word(trimmed)
        })
        .map(|t| Word {
            text: t.text,
            left: t.left,
            top: t.top,
            width: t.width,
            height: t.height,
        })
        .collect()
}

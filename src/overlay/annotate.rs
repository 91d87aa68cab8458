use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_hollow_rect_mut, draw_text_mut};
use imageproc::rect::Rect;
use log::{debug, warn};
use rusttype::{Font, Scale};
use std::fs;
use std::path::Path;

use crate::capture::scaling::ScalingFactor;
use crate::config::AnnotateConfig;
use crate::vision::phrase::Phrase;

const OUTLINE: Rgba<u8> = Rgba([255, 0, 0, 255]);

pub struct Annotator {
    font: Option<Font<'static>>,
    scale: Scale,
    label_offset: i32,
}

fn load_font(path: &Path) -> Option<Font<'static>> {
    let data = fs::read(path).ok()?;
    Font::try_from_vec(data)
}

impl Annotator {
    pub fn new(config: &AnnotateConfig) -> Self {
        let font = load_font(&config.font_path).or_else(|| {
            config.fallback_fonts.iter().find_map(|path| {
                let font = load_font(path)?;
                debug!("Using fallback font {}", path.display());
                Some(font)
            })
        });
        if font.is_none() {
            warn!(
                "No usable font ({} or fallbacks); drawing boxes without labels",
                config.font_path.display()
            );
        }
        Self::with_font(font, config)
    }

    pub fn with_font(font: Option<Font<'static>>, config: &AnnotateConfig) -> Self {
        Self {
            font,
            scale: Scale::uniform(config.font_size),
            label_offset: config.label_offset,
        }
    }

    /// Draws every phrase onto a copy of `image`.
    pub fn annotate(
        &self,
        image: &RgbaImage,
        phrases: &[Phrase],
        scale: ScalingFactor,
    ) -> RgbaImage {
        let mut canvas = image.clone();
        for phrase in phrases {
            let b = phrase.bounding_box_logical.to_raster(scale);
            let width = (b.x_max - b.x_min).max(1) as u32;
            let height = (b.y_max - b.y_min).max(1) as u32;

            // Two nested outlines for a 2px stroke
            draw_hollow_rect_mut(
                &mut canvas,
                Rect::at(b.x_min, b.y_min).of_size(width, height),
                OUTLINE,
            );
            if width > 2 && height > 2 {
                draw_hollow_rect_mut(
                    &mut canvas,
                    Rect::at(b.x_min + 1, b.y_min + 1).of_size(width - 2, height - 2),
                    OUTLINE,
                );
            }

            if let Some(font) = &self.font {
                draw_text_mut(
                    &mut canvas,
                    OUTLINE,
                    b.x_min,
                    b.y_min - self.label_offset,
                    self.scale,
                    font,
                    &phrase.label(),
                );
            }
        }
        canvas
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vision::phrase::BoundingBox;
    use std::path::PathBuf;

    fn phrase(bbox: BoundingBox) -> Phrase {
        Phrase {
            text: "OK".to_string(),
            bounding_box: bbox,
            center: (0, 0),
            bounding_box_logical: bbox,
        }
    }

    fn no_fonts() -> AnnotateConfig {
        AnnotateConfig {
            font_path: PathBuf::from("/nonexistent/font.ttf"),
            fallback_fonts: vec![PathBuf::from("/nonexistent/other.ttf")],
            ..AnnotateConfig::default()
        }
    }

    #[test]
    fn missing_fonts_still_annotates() {
        let annotator = Annotator::new(&no_fonts());
        assert!(annotator.font.is_none());

        let image = RgbaImage::from_pixel(50, 50, Rgba([0, 0, 0, 255]));
        let bbox = BoundingBox {
            x_min: 5,
            y_min: 5,
            x_max: 10,
            y_max: 10,
        };
        let scale = ScalingFactor {
            width_scale: 2.0,
            height_scale: 2.0,
        };
        let out = annotator.annotate(&image, &[phrase(bbox)], scale);

        // Box projected back to raster: (10, 10) .. (20, 20)
        assert_eq!(*out.get_pixel(10, 10), OUTLINE);
        assert_eq!(*out.get_pixel(11, 11), OUTLINE);
        assert_eq!(*out.get_pixel(15, 10), OUTLINE);
        assert_eq!(*out.get_pixel(15, 15), Rgba([0, 0, 0, 255]));
        assert_eq!(*out.get_pixel(5, 5), Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn input_is_not_mutated() {
        let annotator = Annotator::new(&no_fonts());
        let image = RgbaImage::from_pixel(30, 30, Rgba([9, 9, 9, 255]));
        let bbox = BoundingBox {
            x_min: 2,
            y_min: 2,
            x_max: 20,
            y_max: 20,
        };
        let scale = ScalingFactor {
            width_scale: 1.0,
            height_scale: 1.0,
        };
        let out = annotator.annotate(&image, &[phrase(bbox)], scale);
        assert!(image.pixels().all(|p| *p == Rgba([9, 9, 9, 255])));
        assert_ne!(out, image);
    }

    #[test]
    fn boxes_off_canvas_are_clipped() {
        let annotator = Annotator::new(&no_fonts());
        let image = RgbaImage::new(20, 20);
        let bbox = BoundingBox {
            x_min: 15,
            y_min: -5,
            x_max: 40,
            y_max: 15,
        };
        let scale = ScalingFactor {
            width_scale: 1.0,
            height_scale: 1.0,
        };
        let out = annotator.annotate(&image, &[phrase(bbox)], scale);
        assert_eq!(out.dimensions(), (20, 20));
        assert_eq!(*out.get_pixel(15, 10), OUTLINE);
    }
}

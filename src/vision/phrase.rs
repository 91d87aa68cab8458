use std::collections::BTreeMap;
use std::fmt;

use crate::capture::scaling::ScalingFactor;
use crate::vision::ocr::Word;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub x_min: i32,
    pub y_min: i32,
    pub x_max: i32,
    pub y_max: i32,
}

impl BoundingBox {
    /// Divides each edge by the scale, truncating toward zero.
    pub fn to_logical(&self, scale: ScalingFactor) -> Self {
        Self {
            x_min: (self.x_min as f64 / scale.width_scale) as i32,
            y_min: (self.y_min as f64 / scale.height_scale) as i32,
            x_max: (self.x_max as f64 / scale.width_scale) as i32,
            y_max: (self.y_max as f64 / scale.height_scale) as i32,
        }
    }

    /// Inverse of [`BoundingBox::to_logical`], up to truncation.
    pub fn to_raster(&self, scale: ScalingFactor) -> Self {
        Self {
            x_min: (self.x_min as f64 * scale.width_scale) as i32,
            y_min: (self.y_min as f64 * scale.height_scale) as i32,
            x_max: (self.x_max as f64 * scale.width_scale) as i32,
            y_max: (self.y_max as f64 * scale.height_scale) as i32,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Phrase {
    pub text: String,
    /// Union of the member word boxes, raster pixels.
    pub bounding_box: BoundingBox,
    /// Click target in logical screen pixels, offset applied.
    pub center: (i32, i32),
    pub bounding_box_logical: BoundingBox,
}

impl Phrase {
    pub fn label(&self) -> String {
        format!("{}: ({}, {})", self.text, self.center.0, self.center.1)
    }
}

impl fmt::Display for Phrase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}': ({}, {})", self.text, self.center.0, self.center.1)
    }
}

/// Builds one phrase per cluster, in ascending cluster id order.
pub fn build_phrases(
    words: &[Word],
    clusters: &[usize],
    scale: ScalingFactor,
    click_offset_x: i32,
) -> Vec<Phrase> {
    let mut groups: BTreeMap<usize, Vec<&Word>> = BTreeMap::new();
    for (word, &cluster_id) in words.iter().zip(clusters) {
        groups.entry(cluster_id).or_default().push(word);
    }

    groups
        .into_values()
        .filter_map(|members| project(members, scale, click_offset_x))
        .collect()
}

fn project(mut members: Vec<&Word>, scale: ScalingFactor, click_offset_x: i32) -> Option<Phrase> {
    // Column first, then row. Multi-line clusters can interleave.
    members.sort_by_key(|w| (w.left, w.top));

    let text = members
        .iter()
        .map(|w| w.text.as_str())
        .collect::<Vec<_>>()
        .join(" ");

    let bounding_box = BoundingBox {
        x_min: members.iter().map(|w| w.left).min()?,
        y_min: members.iter().map(|w| w.top).min()?,
        x_max: members.iter().map(|w| w.right()).max()?,
        y_max: members.iter().map(|w| w.bottom()).max()?,
    };

    let center_x =
        ((bounding_box.x_min + bounding_box.x_max) as f64 / (2.0 * scale.width_scale)) as i32;
    let center_y =
        ((bounding_box.y_min + bounding_box.y_max) as f64 / (2.0 * scale.height_scale)) as i32;

    Some(Phrase {
        text,
        bounding_box,
        center: (center_x + click_offset_x, center_y),
        bounding_box_logical: bounding_box.to_logical(scale),
    })
}

use log::warn;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ClusterConfig {
    pub horizontal_threshold: f64,
    pub vertical_threshold: f64,
    pub max_cluster_size: usize,
    /// Dendrogram cut for the first clustering pass.
    pub merge_cutoff: f64,
    /// Tighter cut used when an oversized cluster is split.
    pub split_cutoff: f64,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            horizontal_threshold: 80.0,
            vertical_threshold: 5.0,
            max_cluster_size: 5,
            merge_cutoff: 2.0,
            split_cutoff: 0.5,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct OcrConfig {
    pub lang: String,
    #[serde(default)]
    pub psm: Option<i32>,
    #[serde(default)]
    pub dpi: Option<i32>,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            lang: "eng".to_string(),
            psm: None,
            dpi: None,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct AnnotateConfig {
    pub font_path: PathBuf,
    pub font_size: f32,
    /// Distance in raster pixels between a label's baseline box and its rectangle.
    pub label_offset: i32,
    #[serde(default)]
    pub fallback_fonts: Vec<PathBuf>,
}

impl Default for AnnotateConfig {
    fn default() -> Self {
        Self {
            font_path: PathBuf::from("arial.ttf"),
            font_size: 15.0,
            label_offset: 20,
            fallback_fonts: [
                "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
                "/usr/share/fonts/TTF/DejaVuSans.ttf",
                "/Library/Fonts/Arial.ttf",
                "/System/Library/Fonts/Supplemental/Arial.ttf",
                "C:\\Windows\\Fonts\\arial.ttf",
            ]
            .iter()
            .map(PathBuf::from)
            .collect(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub cluster: ClusterConfig,
    /// Added to every projected center's x coordinate.
    pub click_offset_x: i32,
    pub ocr: OcrConfig,
    pub annotate: AnnotateConfig,
    pub output_path: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            cluster: ClusterConfig::default(),
            click_offset_x: 100,
            ocr: OcrConfig::default(),
            annotate: AnnotateConfig::default(),
            output_path: PathBuf::from("tmp_marked_screenshot.png"),
        }
    }
}

impl AppConfig {
    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Self {
        if let Ok(content) = fs::read_to_string(path) {
            match serde_json::from_str(&content) {
                Ok(config) => return config,
                Err(e) => warn!("Ignoring {}: {}", path.display(), e),
            }
        }
        Self::default()
    }

    #[allow(dead_code)]
    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    fn config_path() -> PathBuf {
        PathBuf::from("locator.json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_calibration() {
        let c = AppConfig::default();
        assert_eq!(c.cluster.horizontal_threshold, 80.0);
        assert_eq!(c.cluster.vertical_threshold, 5.0);
        assert_eq!(c.cluster.max_cluster_size, 5);
        assert_eq!(c.cluster.merge_cutoff, 2.0);
        assert_eq!(c.cluster.split_cutoff, 0.5);
        assert_eq!(c.click_offset_x, 100);
        assert_eq!(c.annotate.font_size, 15.0);
        assert_eq!(c.output_path, PathBuf::from("tmp_marked_screenshot.png"));
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("locator.json");
        let mut c = AppConfig::default();
        c.click_offset_x = 0;
        c.cluster.max_cluster_size = 8;
        c.save_to(&path).unwrap();
        assert_eq!(AppConfig::load_from(&path), c);
    }

    #[test]
    fn missing_or_broken_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("locator.json");
        assert_eq!(AppConfig::load_from(&path), AppConfig::default());

        fs::write(&path, "{ not json").unwrap();
        assert_eq!(AppConfig::load_from(&path), AppConfig::default());
    }

    #[test]
    fn partial_file_fills_sections() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("locator.json");
        fs::write(
            &path,
            r#"{ "click_offset_x": 40, "cluster": { "horizontal_threshold": 60.0, "vertical_threshold": 4.0, "max_cluster_size": 3, "merge_cutoff": 2.0, "split_cutoff": 0.5 } }"#,
        )
        .unwrap();
        let c = AppConfig::load_from(&path);
        assert_eq!(c.click_offset_x, 40);
        assert_eq!(c.cluster.max_cluster_size, 3);
        assert_eq!(c.ocr.lang, "eng");
        assert_eq!(c.output_path, PathBuf::from("tmp_marked_screenshot.png"));
    }
}

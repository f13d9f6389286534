//! JSON configuration and report helpers for the `board-cells` binary.

use std::{
    fs,
    path::{Path, PathBuf},
};

use board_cells_grid::GridOrdering;
use board_cells_state::{BoardMsg, BOARD_SLOTS};
use serde::{Deserialize, Serialize};

use crate::{BoardSnapshot, TrackerParams};

#[derive(thiserror::Error, Debug)]
pub enum IoError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

fn default_threshold() -> u8 {
    150
}

fn default_schema_slots() -> usize {
    BOARD_SLOTS
}

/// Configuration for a single-frame board detection run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardCellsConfig {
    pub image_path: String,
    #[serde(default)]
    pub output_path: Option<String>,
    /// Grey level above which a pixel counts as board foreground.
    #[serde(default = "default_threshold")]
    pub threshold: u8,
    #[serde(default)]
    pub ordering: GridOrdering,
    #[serde(default = "default_schema_slots")]
    pub schema_slots: usize,
}

impl BoardCellsConfig {
    pub fn new(image_path: impl Into<String>) -> Self {
        Self {
            image_path: image_path.into(),
            output_path: None,
            threshold: default_threshold(),
            ordering: GridOrdering::default(),
            schema_slots: default_schema_slots(),
        }
    }

    /// Load a JSON config from disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, IoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this config to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), IoError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Resolve the output report path.
    pub fn output_path(&self) -> PathBuf {
        self.output_path
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("board_cells_report.json"))
    }

    pub fn tracker_params(&self) -> TrackerParams {
        TrackerParams {
            ordering: self.ordering,
            schema_slots: self.schema_slots,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameReport {
    pub image_path: String,
    pub config_path: String,
    pub threshold: u8,
    pub num_cells: usize,
    #[serde(default)]
    pub snapshot: Option<BoardSnapshot>,
    #[serde(default)]
    pub board: Option<BoardMsg>,
    #[serde(default)]
    pub error: Option<String>,
}

impl FrameReport {
    /// Build an empty report for the given input config.
    pub fn new(cfg: &BoardCellsConfig, config_path: &Path) -> Self {
        Self {
            image_path: cfg.image_path.clone(),
            config_path: config_path.to_string_lossy().into_owned(),
            threshold: cfg.threshold,
            num_cells: 0,
            snapshot: None,
            board: None,
            error: None,
        }
    }

    /// Populate report fields from a processed frame.
    pub fn set_snapshot(&mut self, snapshot: BoardSnapshot, board: BoardMsg) {
        self.num_cells = snapshot.cells.len();
        self.snapshot = Some(snapshot);
        self.board = Some(board);
        self.error = None;
    }

    /// Record a failure.
    pub fn set_error(&mut self, err: impl std::fmt::Display) {
        self.error = Some(err.to_string());
    }

    /// Load a report from JSON on disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, IoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this report to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), IoError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults_fill_missing_fields() {
        let cfg: BoardCellsConfig =
            serde_json::from_str(r#"{ "image_path": "frame.png" }"#).expect("config");
        assert_eq!(cfg, BoardCellsConfig::new("frame.png"));
        assert_eq!(cfg.threshold, 150);
        assert_eq!(cfg.schema_slots, 9);
        assert_eq!(cfg.output_path(), PathBuf::from("board_cells_report.json"));
        assert_eq!(cfg.tracker_params(), TrackerParams::default());
    }

    #[test]
    fn config_overrides() {
        let cfg: BoardCellsConfig = serde_json::from_str(
            r#"{
                "image_path": "frame.png",
                "output_path": "out/report.json",
                "threshold": 90,
                "ordering": { "kind": "scan_order" },
                "schema_slots": 16
            }"#,
        )
        .expect("config");
        assert_eq!(cfg.threshold, 90);
        assert_eq!(cfg.ordering, GridOrdering::ScanOrder);
        assert_eq!(cfg.tracker_params().schema_slots, 16);
        assert_eq!(cfg.output_path(), PathBuf::from("out/report.json"));
    }

    #[test]
    fn files_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.json");
        let mut cfg = BoardCellsConfig::new("board.png");
        cfg.threshold = 120;
        cfg.write_json(&path).expect("write");
        assert_eq!(BoardCellsConfig::load_json(&path).expect("load"), cfg);

        let mut report = FrameReport::new(&cfg, &path);
        report.set_error("no board");
        let out = dir.path().join("report.json");
        report.write_json(&out).expect("write");
        let back = FrameReport::load_json(&out).expect("load");
        assert_eq!(back.error.as_deref(), Some("no board"));
        assert_eq!(back.threshold, 120);
        assert!(back.snapshot.is_none());
    }

    #[test]
    fn missing_config_is_an_io_error() {
        let err = BoardCellsConfig::load_json("/nonexistent/board-cells.json").unwrap_err();
        assert!(matches!(err, IoError::Io(_)));
    }
}

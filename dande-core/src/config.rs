use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Không đọc được tệp cấu hình: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cấu hình JSON không hợp lệ: {0}")]
    Json(#[from] serde_json::Error),
}

/// Giới hạn nhập liệu do giao diện áp đặt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Limits {
    pub max_input_chars: usize,
    /// "Thêm số"
    pub max_priority: usize,
    /// "Loại bỏ"
    pub max_exclude: usize,
    pub max_special_sets: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_input_chars: 1000,
            max_priority: 40,
            max_exclude: 5,
            max_special_sets: 5,
        }
    }
}

impl Limits {
    pub fn from_json(json: &str) -> serde_json::Result<Limits> {
        serde_json::from_str(json)
    }

    pub fn load(path: &Path) -> Result<Limits, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Ok(Limits::from_json(&raw)?)
    }
}

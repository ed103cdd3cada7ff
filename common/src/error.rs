//! エラー型定義

use thiserror::Error;

/// データセット読み込みエラー
///
/// 起動時に致命的なもののみ。座標の変換に失敗した行はエラーにせず除外する。
#[derive(Error, Debug)]
pub enum DataLoadError {
    #[error("Data source unavailable: {0}")]
    SourceUnavailable(String),

    #[error("Missing mandatory columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    #[error("Data load error: {0}")]
    DataLoad(#[from] DataLoadError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),
}

impl Error {
    /// データセット読み込み由来のエラーか
    pub fn is_data_load(&self) -> bool {
        matches!(self, Error::DataLoad(_))
    }
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;

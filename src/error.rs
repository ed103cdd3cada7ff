use thiserror::Error;

#[derive(Error, Debug)]
pub enum MapError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("未対応のファイル形式です: {0}（csv/xlsx/xls/ods に対応）")]
    UnsupportedFormat(String),

    #[error("Excel読み込みエラー: {0}")]
    Excel(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error("対話入力エラー: {0}")]
    Prompt(String),

    #[error(transparent)]
    Common(#[from] mmto_map_common::Error),
}

impl MapError {
    /// 起動時に致命的なデータセット読み込みエラーか
    pub fn is_data_load(&self) -> bool {
        match self {
            MapError::FileNotFound(_) | MapError::UnsupportedFormat(_) | MapError::Excel(_) => true,
            MapError::Common(e) => e.is_data_load(),
            _ => false,
        }
    }
}

impl From<dialoguer::Error> for MapError {
    fn from(e: dialoguer::Error) -> Self {
        MapError::Prompt(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, MapError>;

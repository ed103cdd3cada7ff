//! 表形式データの読み込みモジュール
//!
//! CSV/Excelなど外部の表データを、型の緩い行（RawTable）として保持する。
//! 座標の数値変換やレコード化は store 側で行う。

use crate::error::{DataLoadError, Result};
use serde::{Deserialize, Serialize};
use std::io::Read;

/// セル値（型が緩い）
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Text(String),
    Number(f64),
    Empty,
}

impl RawValue {
    /// 文字列として取得（空セルは空文字）
    pub fn as_text(&self) -> String {
        match self {
            RawValue::Text(s) => s.trim().to_string(),
            RawValue::Number(n) => n.to_string(),
            RawValue::Empty => String::new(),
        }
    }

    /// 数値に変換。小数点カンマ（"4,65"）も受け付ける
    pub fn to_number(&self) -> Option<f64> {
        match self {
            RawValue::Number(n) => Some(*n),
            RawValue::Text(s) => {
                let s = s.trim();
                if s.is_empty() {
                    return None;
                }
                s.parse::<f64>()
                    .ok()
                    .or_else(|| s.replace(',', ".").parse::<f64>().ok())
            }
            RawValue::Empty => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            RawValue::Text(s) => s.trim().is_empty(),
            RawValue::Number(_) => false,
            RawValue::Empty => true,
        }
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        if s.trim().is_empty() {
            RawValue::Empty
        } else {
            RawValue::Text(s.to_string())
        }
    }
}

impl From<f64> for RawValue {
    fn from(n: f64) -> Self {
        RawValue::Number(n)
    }
}

/// 表データ全体（ヘッダー + 行）
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    columns: Vec<String>,
    rows: Vec<Vec<RawValue>>,
}

impl RawTable {
    /// 列名と行から作成。列数に満たない行は Empty で埋める
    pub fn new(columns: Vec<String>, rows: Vec<Vec<RawValue>>) -> Self {
        let columns: Vec<String> = columns
            .into_iter()
            .map(|c| c.trim_start_matches('\u{feff}').trim().to_string())
            .collect();
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                if row.len() < width {
                    row.resize(width, RawValue::Empty);
                }
                row
            })
            .collect();

        Self { columns, rows }
    }

    /// CSVを読み込み
    ///
    /// 区切り文字はヘッダー行から判定する（`;` のみを含めば `;`、それ以外は `,`）。
    /// UTF-8でないバイトは置換文字に変換する。
    pub fn from_csv_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut bytes = Vec::new();
        reader
            .read_to_end(&mut bytes)
            .map_err(|e| DataLoadError::SourceUnavailable(e.to_string()))?;

        if bytes.iter().all(|b| b.is_ascii_whitespace()) {
            return Err(DataLoadError::SourceUnavailable("empty input".to_string()).into());
        }

        let header_line = bytes.split(|&b| b == b'\n').next().unwrap_or_default();
        let delimiter = sniff_delimiter(&String::from_utf8_lossy(header_line));

        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .delimiter(delimiter)
            .from_reader(bytes.as_slice());

        let columns: Vec<String> = rdr
            .byte_headers()
            .map_err(DataLoadError::from)?
            .iter()
            .map(|h| String::from_utf8_lossy(h).into_owned())
            .collect();

        let mut rows = Vec::new();
        for record in rdr.byte_records() {
            let record = record.map_err(DataLoadError::from)?;
            let row: Vec<RawValue> = record
                .iter()
                .map(|field| RawValue::from(&*String::from_utf8_lossy(field)))
                .collect();
            rows.push(row);
        }

        Ok(Self::new(columns, rows))
    }

    /// CSV文字列から読み込み
    pub fn from_csv_str(content: &str) -> Result<Self> {
        Self::from_csv_reader(content.as_bytes())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<RawValue>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// 列位置を検索（前後空白を無視した完全一致を優先し、次に大文字小文字を無視）
    pub fn column_index(&self, name: &str) -> Option<usize> {
        let name = name.trim();
        self.columns
            .iter()
            .position(|c| c == name)
            .or_else(|| {
                let lower = name.to_lowercase();
                self.columns.iter().position(|c| c.to_lowercase() == lower)
            })
    }
}

fn sniff_delimiter(header: &str) -> u8 {
    if header.contains(';') && !header.contains(',') {
        b';'
    } else {
        b','
    }
}

/// ActionRecordの各フィールドに対応する列名
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ColumnMapping {
    pub id: String,
    pub latitude: String,
    pub longitude: String,
    pub action_type: String,
    pub record_type: String,
    pub description: String,
    pub status: String,
    pub month: String,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            id: "Sticker".into(),
            latitude: "LATITUD".into(),
            longitude: "LONGITUD".into(),
            action_type: "Acción".into(),
            record_type: "Tipo".into(),
            description: "Descripción".into(),
            status: "Estado".into(),
            month: "Mes".into(),
        }
    }
}

//! データセット読み込みモジュール
//!
//! CSV（MMTO_ABRIL.csv 等）または Excel ファイルを RawTable に読み込み、
//! RecordStore を構築する。

use crate::config::Config;
use crate::error::{MapError, Result};
use calamine::{open_workbook_auto, Data, Reader};
use mmto_map_common::{
    filter_controls, render, ColumnMapping, DatasetVariant, FilterControl, FilterState, RawTable, RawValue,
    RecordStore, SceneDescription, SceneSettings, Session,
};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;

const EXCEL_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xls", "ods"];

/// ファイルを表データとして読み込み（拡張子で形式を判定）
pub fn load_table(path: &Path) -> Result<RawTable> {
    if !path.is_file() {
        return Err(MapError::FileNotFound(path.display().to_string()));
    }

    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "csv" | "txt" => {
            let file = File::open(path)?;
            Ok(RawTable::from_csv_reader(BufReader::new(file))?)
        }
        e if EXCEL_EXTENSIONS.contains(&e) => load_excel(path),
        _ => Err(MapError::UnsupportedFormat(path.display().to_string())),
    }
}

/// 先頭シートを読み込み。1行目をヘッダーとする
fn load_excel(path: &Path) -> Result<RawTable> {
    let mut workbook = open_workbook_auto(path).map_err(|e| MapError::Excel(e.to_string()))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| MapError::Excel(format!("シートがありません: {}", path.display())))?
        .map_err(|e| MapError::Excel(e.to_string()))?;

    let mut rows = range.rows();
    let columns: Vec<String> = rows
        .next()
        .map(|header| header.iter().map(|cell| cell.to_string()).collect())
        .unwrap_or_default();

    if columns.is_empty() {
        return Err(MapError::Excel(format!("ヘッダー行がありません: {}", path.display())));
    }

    let rows = rows
        .map(|row| row.iter().map(raw_value).collect())
        .collect();

    Ok(RawTable::new(columns, rows))
}

fn raw_value(cell: &Data) -> RawValue {
    match cell {
        Data::Empty => RawValue::Empty,
        Data::Float(f) => RawValue::Number(*f),
        Data::Int(i) => RawValue::Number(*i as f64),
        Data::String(s) => RawValue::from(s.as_str()),
        other => RawValue::Text(other.to_string()),
    }
}

/// データセットを読み込んで RecordStore を構築
pub fn load_store(path: &Path, mapping: &ColumnMapping) -> Result<RecordStore> {
    tracing::info!(path = %path.display(), "loading dataset");
    let table = load_table(path)?;
    let store = RecordStore::load(&table, mapping)?;
    tracing::info!(rows = table.len(), records = store.len(), dropped = store.dropped(), "dataset loaded");
    Ok(store)
}

/// 読み込み済みデータセットと表示設定
///
/// ストアと設定は読み込み後に変わらないため、セッション間で共有する。
#[derive(Debug, Clone)]
pub struct Dataset {
    pub store: Arc<RecordStore>,
    pub variant: DatasetVariant,
    pub settings: Arc<SceneSettings>,
}

impl Dataset {
    /// データセットを開く。種類の指定が無ければ Mes 列の有無で判定
    pub fn open(path: &Path, variant: Option<DatasetVariant>, config: &Config) -> Result<Self> {
        let store = load_store(path, &config.columns)?;
        let variant = variant.unwrap_or_else(|| DatasetVariant::detect(&store));
        tracing::debug!(%variant, "dataset variant");
        let settings = config.scene_settings(&store, variant);

        Ok(Self {
            store: Arc::new(store),
            variant,
            settings: Arc::new(settings),
        })
    }

    /// 絞り込みUIの選択肢
    pub fn controls(&self) -> Vec<FilterControl> {
        filter_controls(&self.store, self.variant.filter_attributes())
    }

    pub fn scene(&self, filter: &FilterState) -> SceneDescription {
        render(&self.store, filter, &self.settings)
    }

    /// 新しい閲覧セッション（絞り込みなしから開始）
    pub fn session(&self) -> Session {
        Session::new(Arc::clone(&self.store), Arc::clone(&self.settings))
    }
}

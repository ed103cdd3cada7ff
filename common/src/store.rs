//! レコードストアモジュール
//!
//! 表データを検証済み・不変の ActionRecord 列に変換して保持する。
//! 座標が数値に変換できない行は読み込み時に除外する（エラーにはしない）。

use crate::error::{DataLoadError, Result};
use crate::source::{ColumnMapping, RawTable, RawValue};
use crate::types::{ActionRecord, FilterAttribute, LatLon};
use std::collections::{BTreeSet, HashMap};

/// 読み込み済みのレコード集合
///
/// 読み込み後は変更されないため、複数セッションからロックなしで共有できる。
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    records: Vec<ActionRecord>,
    /// 属性 → 値 → レコード位置（昇順）
    index: HashMap<FilterAttribute, HashMap<String, Vec<usize>>>,
    /// 月の列があったか
    has_month: bool,
    /// 座標変換で除外した行数
    dropped: usize,
}

/// 列名の解決結果
struct ResolvedColumns {
    id: Option<usize>,
    latitude: usize,
    longitude: usize,
    action_type: usize,
    record_type: usize,
    description: Option<usize>,
    status: Option<usize>,
    month: Option<usize>,
}

impl ResolvedColumns {
    fn resolve(table: &RawTable, mapping: &ColumnMapping) -> Result<Self> {
        let mandatory = [
            &mapping.latitude,
            &mapping.longitude,
            &mapping.action_type,
            &mapping.record_type,
        ];
        let missing: Vec<String> = mandatory
            .iter()
            .filter(|name| table.column_index(name).is_none())
            .map(|name| name.to_string())
            .collect();

        if !missing.is_empty() {
            return Err(DataLoadError::MissingColumns(missing).into());
        }

        let required = |name: &str| {
            table
                .column_index(name)
                .ok_or_else(|| DataLoadError::MissingColumns(vec![name.to_string()]))
        };

        Ok(Self {
            id: table.column_index(&mapping.id),
            latitude: required(&mapping.latitude)?,
            longitude: required(&mapping.longitude)?,
            action_type: required(&mapping.action_type)?,
            record_type: required(&mapping.record_type)?,
            description: table.column_index(&mapping.description),
            status: table.column_index(&mapping.status),
            month: table.column_index(&mapping.month),
        })
    }
}

fn text_at(row: &[RawValue], column: Option<usize>) -> String {
    column
        .and_then(|i| row.get(i))
        .map(RawValue::as_text)
        .unwrap_or_default()
}

fn coerce_position(row: &[RawValue], columns: &ResolvedColumns) -> Option<LatLon> {
    let lat = row.get(columns.latitude)?.to_number()?;
    let lon = row.get(columns.longitude)?.to_number()?;
    let position = LatLon::new(lat, lon);
    position.is_valid().then_some(position)
}

impl RecordStore {
    /// 表データから読み込み
    ///
    /// 必須列（緯度・経度・作業区分・種別）が無い場合のみエラー。
    pub fn load(table: &RawTable, mapping: &ColumnMapping) -> Result<Self> {
        let columns = ResolvedColumns::resolve(table, mapping)?;

        let mut records = Vec::with_capacity(table.len());
        let mut dropped = 0;

        for (line, row) in table.rows().iter().enumerate() {
            let Some(position) = coerce_position(row, &columns) else {
                tracing::debug!(row = line + 1, "invalid coordinates, row excluded");
                dropped += 1;
                continue;
            };

            let month = text_at(row, columns.month);
            records.push(ActionRecord {
                id: text_at(row, columns.id),
                latitude: position.lat,
                longitude: position.lon,
                action_type: text_at(row, Some(columns.action_type)),
                record_type: text_at(row, Some(columns.record_type)),
                month: (!month.is_empty()).then_some(month),
                description: text_at(row, columns.description),
                status: text_at(row, columns.status),
            });
        }

        if dropped > 0 {
            tracing::warn!(dropped, kept = records.len(), "rows excluded by coordinate coercion");
        }

        let mut store = Self::from_records(records);
        store.has_month = columns.month.is_some();
        store.dropped = dropped;
        Ok(store)
    }

    /// 検証済みレコードから直接作成（座標が不正なものは除外）
    pub fn from_records(records: Vec<ActionRecord>) -> Self {
        let before = records.len();
        let records: Vec<ActionRecord> = records
            .into_iter()
            .filter(|r| r.position().is_valid())
            .collect();
        let has_month = records.iter().any(|r| r.month.is_some());
        let index = build_index(&records);

        Self {
            dropped: before - records.len(),
            records,
            index,
            has_month,
        }
    }

    /// 全レコード（読み込み順）
    pub fn all(&self) -> &[ActionRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// 月の列を持つデータセットか
    pub fn has_month(&self) -> bool {
        self.has_month
    }

    /// 座標変換で除外した行数
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    /// 属性の値一覧（重複なし・昇順、空文字は除く）
    pub fn distinct_values(&self, attribute: FilterAttribute) -> Vec<String> {
        self.index
            .get(&attribute)
            .map(|values| {
                values
                    .keys()
                    .filter(|v| !v.is_empty())
                    .cloned()
                    .collect::<BTreeSet<_>>()
                    .into_iter()
                    .collect()
            })
            .unwrap_or_default()
    }

    /// 属性値に一致するレコード位置（昇順）
    pub fn positions(&self, attribute: FilterAttribute, value: &str) -> &[usize] {
        self.index
            .get(&attribute)
            .and_then(|values| values.get(value))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// 全レコードの重心（レコードが無ければ None）
    pub fn centroid(&self) -> Option<LatLon> {
        crate::projection::centroid(self.records.iter())
    }
}

fn build_index(records: &[ActionRecord]) -> HashMap<FilterAttribute, HashMap<String, Vec<usize>>> {
    let mut index: HashMap<FilterAttribute, HashMap<String, Vec<usize>>> = HashMap::new();

    for (pos, record) in records.iter().enumerate() {
        for attribute in FilterAttribute::ALL {
            if let Some(value) = record.attribute(attribute) {
                index
                    .entry(attribute)
                    .or_default()
                    .entry(value.to_string())
                    .or_default()
                    .push(pos);
            }
        }
    }

    index
}

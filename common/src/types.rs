//! 保守作業レコードの型定義
//!
//! - LatLon: 緯度経度
//! - ActionRecord: 読み込み・検証済みの1件の作業記録
//! - FilterAttribute: 絞り込み可能なカテゴリ属性
//! - RecordField: ツールチップ等で参照するレコードのフィールド

use serde::{Deserialize, Serialize};
use std::fmt;

/// 緯度経度（度）
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

impl LatLon {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// 有限かつ範囲内（緯度 -90..90、経度 -180..180）か
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }
}

/// 保守作業レコード
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionRecord {
    /// 表示用ID（ステッカー番号）。一意とは限らない
    pub id: String,
    pub latitude: f64,
    pub longitude: f64,
    /// 作業区分（Podas / Correctivo / Preventivo ...）
    pub action_type: String,
    /// 種別（Tipo）
    pub record_type: String,
    /// 月（複数月データセットのみ）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month: Option<String>,
    pub description: String,
    pub status: String,
}

impl ActionRecord {
    pub fn position(&self) -> LatLon {
        LatLon::new(self.latitude, self.longitude)
    }

    /// 絞り込み属性の値。月が無いレコードは None
    pub fn attribute(&self, attribute: FilterAttribute) -> Option<&str> {
        match attribute {
            FilterAttribute::ActionType => Some(&self.action_type),
            FilterAttribute::RecordType => Some(&self.record_type),
            FilterAttribute::Month => self.month.as_deref(),
        }
    }

    /// フィールド値を表示用文字列で取得
    pub fn field_value(&self, field: RecordField) -> String {
        match field {
            RecordField::Id => self.id.clone(),
            RecordField::Latitude => self.latitude.to_string(),
            RecordField::Longitude => self.longitude.to_string(),
            RecordField::ActionType => self.action_type.clone(),
            RecordField::RecordType => self.record_type.clone(),
            RecordField::Month => self.month.clone().unwrap_or_default(),
            RecordField::Description => self.description.clone(),
            RecordField::Status => self.status.clone(),
        }
    }
}

/// 絞り込み可能な属性
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FilterAttribute {
    ActionType,
    RecordType,
    Month,
}

impl FilterAttribute {
    pub const ALL: [FilterAttribute; 3] = [
        FilterAttribute::ActionType,
        FilterAttribute::RecordType,
        FilterAttribute::Month,
    ];

    /// 画面表示用ラベル
    pub fn label(&self) -> &'static str {
        match self {
            FilterAttribute::ActionType => "Acción",
            FilterAttribute::RecordType => "Tipo",
            FilterAttribute::Month => "Mes",
        }
    }
}

impl fmt::Display for FilterAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for FilterAttribute {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "actiontype" | "action" | "accion" | "acción" => Ok(FilterAttribute::ActionType),
            "recordtype" | "tipo" | "type" => Ok(FilterAttribute::RecordType),
            "month" | "mes" => Ok(FilterAttribute::Month),
            _ => Err(format!("Unknown filter attribute: {}. Use accion, tipo, or mes", s)),
        }
    }
}

/// レコードのフィールド
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RecordField {
    Id,
    Latitude,
    Longitude,
    ActionType,
    RecordType,
    Month,
    Description,
    Status,
}

//! 表示ポリシーモジュール
//!
//! 作業区分 → 色、ツールチップ項目、カメラ・スタイル設定。
//! いずれも起動時に固定し、シーン生成時に参照するだけ。

use crate::types::{LatLon, RecordField};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 描画側の既定色（未登録の区分に使用）
pub const DEFAULT_FALLBACK_COLOR: &str = "#636efa";
pub const DEFAULT_ZOOM: f64 = 12.0;
pub const DEFAULT_MAP_STYLE: &str = "carto-positron";
pub const DEFAULT_MARKER_SIZE: f64 = 0.6;

/// 作業区分 → 色
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ColorPolicy {
    pub colors: BTreeMap<String, String>,
    pub fallback: String,
}

impl Default for ColorPolicy {
    fn default() -> Self {
        let mut colors = BTreeMap::new();
        colors.insert("Podas".into(), "green".into());
        colors.insert("Correctivo".into(), "orange".into());
        colors.insert("Preventivo".into(), "purple".into());

        Self {
            colors,
            fallback: DEFAULT_FALLBACK_COLOR.into(),
        }
    }
}

impl ColorPolicy {
    /// 区分の色。未登録なら既定色
    pub fn resolve(&self, action_type: &str) -> &str {
        self.colors
            .get(action_type)
            .map(String::as_str)
            .unwrap_or(&self.fallback)
    }

    pub fn set(&mut self, action_type: impl Into<String>, color: impl Into<String>) {
        self.colors.insert(action_type.into(), color.into());
    }
}

/// ツールチップの1項目
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TooltipField {
    pub field: RecordField,
    pub label: String,
    #[serde(default = "default_visible")]
    pub visible: bool,
}

fn default_visible() -> bool {
    true
}

impl TooltipField {
    pub fn shown(field: RecordField, label: &str) -> Self {
        Self { field, label: label.into(), visible: true }
    }

    pub fn hidden(field: RecordField, label: &str) -> Self {
        Self { field, label: label.into(), visible: false }
    }
}

/// ツールチップ構成（項目の順序と表示可否）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TooltipConfig {
    pub fields: Vec<TooltipField>,
}

impl TooltipConfig {
    /// 単月データセット用
    pub fn single_month() -> Self {
        Self {
            fields: vec![
                TooltipField::shown(RecordField::ActionType, "Acción"),
                TooltipField::shown(RecordField::RecordType, "Tipo"),
                TooltipField::shown(RecordField::Description, "Descripción"),
                TooltipField::shown(RecordField::Status, "Estado"),
                TooltipField::hidden(RecordField::Latitude, "LATITUD"),
                TooltipField::hidden(RecordField::Longitude, "LONGITUD"),
            ],
        }
    }

    /// 複数月データセット用
    pub fn multi_month() -> Self {
        let mut config = Self::single_month();
        config.fields.insert(0, TooltipField::shown(RecordField::Month, "Mes"));
        config
    }

    pub fn visible(&self) -> impl Iterator<Item = &TooltipField> {
        self.fields.iter().filter(|f| f.visible)
    }
}

impl Default for TooltipConfig {
    fn default() -> Self {
        Self::single_month()
    }
}

/// カメラ設定
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Camera {
    pub center: LatLon,
    pub zoom: f64,
}

/// シーン生成の設定一式
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SceneSettings {
    pub title: String,
    pub colors: ColorPolicy,
    pub tooltip: TooltipConfig,
    /// 絞り込み結果があるときのズーム
    pub zoom: f64,
    /// 絞り込み結果が空のときのカメラ
    pub fallback_camera: Camera,
    pub map_style: String,
    /// 全点共通のマーカーサイズ
    pub marker_size: f64,
}

impl Default for SceneSettings {
    fn default() -> Self {
        Self {
            title: String::new(),
            colors: ColorPolicy::default(),
            tooltip: TooltipConfig::default(),
            zoom: DEFAULT_ZOOM,
            fallback_camera: Camera {
                center: LatLon::default(),
                zoom: DEFAULT_ZOOM,
            },
            map_style: DEFAULT_MAP_STYLE.into(),
            marker_size: DEFAULT_MARKER_SIZE,
        }
    }
}

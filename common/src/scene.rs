//! シーン生成モジュール
//!
//! 絞り込み結果を、外部の地図描画コンポーネントが描くための宣言的な
//! シーン（点・色・ラベル・ツールチップ・カメラ・凡例）に変換する。
//! 純粋な変換であり失敗しない。

use crate::policy::{Camera, SceneSettings};
use crate::projection::FilteredView;
use crate::types::{ActionRecord, LatLon};
use geojson::{Feature, FeatureCollection, Geometry, JsonObject, Value};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::HashSet;

/// ツールチップの1行
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TooltipEntry {
    pub name: String,
    pub value: String,
}

/// 描画する1点
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenePoint {
    pub position: LatLon,
    pub color: String,
    /// ホバー時の見出し（ステッカー番号）
    pub label: String,
    pub size: f64,
    pub tooltip: Vec<TooltipEntry>,
}

/// 凡例の1項目
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegendEntry {
    pub action_type: String,
    pub color: String,
}

/// 凡例の配置（左上）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegendAnchor {
    pub x: f64,
    pub y: f64,
    pub x_anchor: String,
    pub y_anchor: String,
}

impl Default for LegendAnchor {
    fn default() -> Self {
        Self {
            x: 0.01,
            y: 0.99,
            x_anchor: "left".into(),
            y_anchor: "top".into(),
        }
    }
}

/// 描画側への表示指定
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneLayout {
    pub margin: u32,
    pub scroll_zoom: bool,
    pub legend_anchor: LegendAnchor,
}

impl Default for SceneLayout {
    fn default() -> Self {
        Self {
            margin: 0,
            scroll_zoom: true,
            legend_anchor: LegendAnchor::default(),
        }
    }
}

/// 描画用シーン
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneDescription {
    pub title: String,
    pub map_style: String,
    pub points: Vec<ScenePoint>,
    pub camera: Camera,
    pub legend: Vec<LegendEntry>,
    pub layout: SceneLayout,
}

/// シーンを生成
///
/// 結果が空のときは重心を計算せず、設定の fallback_camera を使う。
pub fn build(view: &FilteredView<'_>, settings: &SceneSettings) -> SceneDescription {
    let points = view
        .rows
        .iter()
        .map(|record| build_point(record, settings))
        .collect();

    let camera = match view.centroid {
        Some(center) => Camera {
            center,
            zoom: settings.zoom,
        },
        None => settings.fallback_camera,
    };

    SceneDescription {
        title: settings.title.clone(),
        map_style: settings.map_style.clone(),
        points,
        camera,
        legend: build_legend(view, settings),
        layout: SceneLayout::default(),
    }
}

fn build_point(record: &ActionRecord, settings: &SceneSettings) -> ScenePoint {
    let tooltip = settings
        .tooltip
        .visible()
        .map(|f| TooltipEntry {
            name: f.label.clone(),
            value: record.field_value(f.field),
        })
        .collect();

    ScenePoint {
        position: record.position(),
        color: settings.colors.resolve(&record.action_type).to_string(),
        label: record.id.clone(),
        size: settings.marker_size,
        tooltip,
    }
}

/// 出現順に作業区分を並べる
fn build_legend(view: &FilteredView<'_>, settings: &SceneSettings) -> Vec<LegendEntry> {
    let mut seen = HashSet::new();
    view.rows
        .iter()
        .filter(|r| seen.insert(r.action_type.as_str()))
        .map(|r| LegendEntry {
            action_type: r.action_type.clone(),
            color: settings.colors.resolve(&r.action_type).to_string(),
        })
        .collect()
}

impl SceneDescription {
    /// GeoJSON (FeatureCollection) に変換
    ///
    /// 座標は [経度, 緯度]。ツールチップは properties の `tooltip` に入れ、
    /// ラベルや色とは名前が衝突しない。カメラ・凡例・タイトルは foreign members に入れる。
    pub fn to_feature_collection(&self) -> FeatureCollection {
        let features = self
            .points
            .iter()
            .map(|point| {
                let mut properties = JsonObject::new();
                properties.insert("label".into(), point.label.clone().into());
                properties.insert("color".into(), point.color.clone().into());
                properties.insert("size".into(), point.size.into());
                let tooltip: JsonObject = point
                    .tooltip
                    .iter()
                    .map(|entry| (entry.name.clone(), serde_json::Value::from(entry.value.clone())))
                    .collect();
                properties.insert("tooltip".into(), tooltip.into());

                Feature {
                    bbox: None,
                    geometry: Some(Geometry::new(Value::Point(vec![
                        point.position.lon,
                        point.position.lat,
                    ]))),
                    id: None,
                    properties: Some(properties),
                    foreign_members: None,
                }
            })
            .collect();

        let mut members = JsonObject::new();
        members.insert("title".into(), self.title.clone().into());
        members.insert("mapStyle".into(), self.map_style.clone().into());
        members.insert(
            "camera".into(),
            json!({
                "center": { "lat": self.camera.center.lat, "lon": self.camera.center.lon },
                "zoom": self.camera.zoom,
            }),
        );
        let legend: Vec<serde_json::Value> = self
            .legend
            .iter()
            .map(|l| json!({ "actionType": l.action_type, "color": l.color }))
            .collect();
        members.insert("legend".into(), legend.into());

        FeatureCollection {
            bbox: None,
            features,
            foreign_members: Some(members),
        }
    }
}

use crate::error::{MapError, Result};
use mmto_map_common::policy::{DEFAULT_FALLBACK_COLOR, DEFAULT_MAP_STYLE, DEFAULT_MARKER_SIZE, DEFAULT_ZOOM};
use mmto_map_common::{
    fallback_camera, ColorPolicy, ColumnMapping, DatasetVariant, LatLon, RecordStore, SceneSettings,
    TooltipConfig,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// 設定ファイルの場所を上書きする環境変数
pub const CONFIG_ENV: &str = "MMTO_MAP_CONFIG";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    pub columns: ColumnMapping,
    /// 作業区分 → 色
    pub colors: BTreeMap<String, String>,
    pub fallback_color: String,
    pub zoom: f64,
    pub fallback_zoom: f64,
    /// 絞り込み結果が空のときの中心（未設定ならデータ全体の重心）
    pub fallback_center: Option<LatLon>,
    pub map_style: String,
    pub marker_size: f64,
    /// タイトル（未設定ならデータセット種類の既定）
    pub title: Option<String>,
    /// ツールチップ項目（未設定ならデータセット種類の既定）
    pub tooltip: Option<TooltipConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            columns: ColumnMapping::default(),
            colors: ColorPolicy::default().colors,
            fallback_color: DEFAULT_FALLBACK_COLOR.into(),
            zoom: DEFAULT_ZOOM,
            fallback_zoom: DEFAULT_ZOOM,
            fallback_center: None,
            map_style: DEFAULT_MAP_STYLE.into(),
            marker_size: DEFAULT_MARKER_SIZE,
            title: None,
            tooltip: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        Self::load_from(&config_path)
    }

    /// 指定パスから読み込み。ファイルが無ければ既定値
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            tracing::debug!(path = %config_path.display(), "loading config");
            let content = std::fs::read_to_string(config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            config.validate()?;
            Ok(config)
        } else {
            tracing::debug!(path = %config_path.display(), "config not found, using defaults");
            Ok(Self::default())
        }
    }

    /// 設定変更の起点を読み込み
    ///
    /// reset 指定時はファイルを読まずに既定値から始めるため、壊れた設定ファイルも上書きできる。
    pub fn load_for_update(config_path: &Path, reset: bool) -> Result<Self> {
        if reset {
            tracing::debug!(path = %config_path.display(), "resetting config");
            Ok(Self::default())
        } else {
            Self::load_from(config_path)
        }
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    /// 環境変数を優先し、無ければ ~/.config/mmto-map/config.json
    pub fn config_path() -> Result<PathBuf> {
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            return Ok(PathBuf::from(path));
        }

        let home = dirs::home_dir()
            .ok_or_else(|| MapError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("mmto-map").join("config.json"))
    }

    fn validate(&self) -> Result<()> {
        if !(self.zoom.is_finite() && self.zoom >= 0.0) {
            return Err(MapError::Config(format!("zoom が不正です: {}", self.zoom)));
        }
        if !(self.fallback_zoom.is_finite() && self.fallback_zoom >= 0.0) {
            return Err(MapError::Config(format!("fallbackZoom が不正です: {}", self.fallback_zoom)));
        }
        if let Some(center) = self.fallback_center {
            if !center.is_valid() {
                return Err(MapError::Config(format!(
                    "fallbackCenter が範囲外です: ({}, {})",
                    center.lat, center.lon
                )));
            }
        }
        Ok(())
    }

    pub fn set_zoom(&mut self, zoom: f64) -> Result<()> {
        self.zoom = zoom;
        self.validate()
    }

    /// "Podas=green" 形式で色を設定
    pub fn set_color(&mut self, assignment: &str) -> Result<()> {
        let (category, color) = assignment
            .split_once('=')
            .map(|(k, v)| (k.trim(), v.trim()))
            .filter(|(k, v)| !k.is_empty() && !v.is_empty())
            .ok_or_else(|| MapError::Config(format!("区分=色 の形式で指定してください: {}", assignment)))?;

        self.colors.insert(category.to_string(), color.to_string());
        Ok(())
    }

    pub fn color_policy(&self) -> ColorPolicy {
        ColorPolicy {
            colors: self.colors.clone(),
            fallback: self.fallback_color.clone(),
        }
    }

    /// シーン生成設定を組み立て
    pub fn scene_settings(&self, store: &RecordStore, variant: DatasetVariant) -> SceneSettings {
        SceneSettings {
            title: self
                .title
                .clone()
                .unwrap_or_else(|| variant.default_title().to_string()),
            colors: self.color_policy(),
            tooltip: self.tooltip.clone().unwrap_or_else(|| variant.tooltip()),
            zoom: self.zoom,
            fallback_camera: fallback_camera(store, self.fallback_center, self.fallback_zoom),
            map_style: self.map_style.clone(),
            marker_size: self.marker_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mmto_map_common::ActionRecord;
    use tempfile::tempdir;

    #[test]
    fn test_load_missing_returns_default() {
        let dir = tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.json")).unwrap();
        assert_eq!(config.zoom, 12.0);
        assert_eq!(config.columns.latitude, "LATITUD");
        assert_eq!(config.colors.get("Podas").map(String::as_str), Some("green"));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let mut config = Config::default();
        config.set_zoom(14.0).unwrap();
        config.set_color("Emergencia=red").unwrap();
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.zoom, 14.0);
        assert_eq!(loaded.colors.get("Emergencia").map(String::as_str), Some("red"));
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"mapStyle": "open-street-map", "fallbackCenter": {"lat": 4.6, "lon": -74.1}}"#).unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.map_style, "open-street-map");
        assert_eq!(config.fallback_center, Some(LatLon::new(4.6, -74.1)));
        assert_eq!(config.marker_size, 0.6);
    }

    #[test]
    fn test_malformed_file_is_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ zoom: ").unwrap();
        assert!(matches!(Config::load_from(&path), Err(MapError::JsonParse(_))));
    }

    #[test]
    fn test_invalid_values_rejected() {
        let mut config = Config::default();
        assert!(config.set_zoom(-1.0).is_err());

        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"fallbackCenter": {"lat": 120.0, "lon": 0.0}}"#).unwrap();
        assert!(matches!(Config::load_from(&path), Err(MapError::Config(_))));
    }

    #[test]
    fn test_reset_overwrites_broken_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ zoom: ").unwrap();
        assert!(Config::load_for_update(&path, false).is_err());

        let config = Config::load_for_update(&path, true).unwrap();
        config.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap().zoom, 12.0);

        std::fs::write(&path, r#"{"fallbackCenter": {"lat": 120.0, "lon": 0.0}}"#).unwrap();
        let config = Config::load_for_update(&path, true).unwrap();
        assert_eq!(config.fallback_center, None);
    }

    #[test]
    fn test_set_color_format() {
        let mut config = Config::default();
        assert!(config.set_color("Podas").is_err());
        assert!(config.set_color("=red").is_err());
        config.set_color(" Podas = darkgreen ").unwrap();
        assert_eq!(config.color_policy().resolve("Podas"), "darkgreen");
    }

    #[test]
    fn test_scene_settings_by_variant() {
        let store = RecordStore::from_records(vec![ActionRecord {
            latitude: 4.0,
            longitude: -74.0,
            ..Default::default()
        }]);
        let config = Config::default();

        let settings = config.scene_settings(&store, DatasetVariant::Abril);
        assert_eq!(settings.title, "ESIP - Registro de Acciones Abril 2024");
        assert_eq!(settings.fallback_camera.center, LatLon::new(4.0, -74.0));

        let settings = config.scene_settings(&store, DatasetVariant::Multimes);
        assert_eq!(settings.tooltip, TooltipConfig::multi_month());
    }
}

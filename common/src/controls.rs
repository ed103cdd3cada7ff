//! 絞り込みUIの選択肢
//!
//! データセットの種類（単月 / 複数月）ごとに、絞り込み可能な属性と
//! その選択肢（観測された値の昇順）を提供する。

use crate::policy::TooltipConfig;
use crate::store::RecordStore;
use crate::types::FilterAttribute;
use serde::{Deserialize, Serialize};
use std::fmt;

/// データセットの種類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatasetVariant {
    /// 単月（MMTO_ABRIL）
    #[default]
    Abril,
    /// 複数月（Mes 列あり）
    Multimes,
}

impl DatasetVariant {
    /// Mes 列の有無で判定
    pub fn detect(store: &RecordStore) -> Self {
        if store.has_month() {
            DatasetVariant::Multimes
        } else {
            DatasetVariant::Abril
        }
    }

    /// 絞り込みUIに出す属性
    pub fn filter_attributes(&self) -> &'static [FilterAttribute] {
        match self {
            DatasetVariant::Abril => &[FilterAttribute::RecordType],
            DatasetVariant::Multimes => &[FilterAttribute::RecordType, FilterAttribute::Month],
        }
    }

    pub fn tooltip(&self) -> TooltipConfig {
        match self {
            DatasetVariant::Abril => TooltipConfig::single_month(),
            DatasetVariant::Multimes => TooltipConfig::multi_month(),
        }
    }

    pub fn default_title(&self) -> &'static str {
        match self {
            DatasetVariant::Abril => "ESIP - Registro de Acciones Abril 2024",
            DatasetVariant::Multimes => "ESIP - Registro de Acciones",
        }
    }
}

impl std::str::FromStr for DatasetVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "abril" | "single" => Ok(DatasetVariant::Abril),
            "multimes" | "multi" => Ok(DatasetVariant::Multimes),
            _ => Err(format!("Unknown variant: {}. Use abril or multimes", s)),
        }
    }
}

impl fmt::Display for DatasetVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatasetVariant::Abril => write!(f, "abril"),
            DatasetVariant::Multimes => write!(f, "multimes"),
        }
    }
}

/// 絞り込みUIの1項目（複数選択・クリア可能）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterControl {
    pub attribute: FilterAttribute,
    pub label: String,
    pub options: Vec<String>,
    pub multi: bool,
    pub clearable: bool,
}

/// 各属性の選択肢を生成
pub fn filter_controls(store: &RecordStore, attributes: &[FilterAttribute]) -> Vec<FilterControl> {
    attributes
        .iter()
        .map(|&attribute| FilterControl {
            attribute,
            label: format!("Filtrar por {}:", attribute.label()),
            options: store.distinct_values(attribute),
            multi: true,
            clearable: true,
        })
        .collect()
}

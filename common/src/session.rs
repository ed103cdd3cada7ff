//! 閲覧セッション
//!
//! (データセット, 絞り込み状態) → シーン の純粋関数と、それを保持する
//! 閲覧者ごとのセッション。ストアは Arc で共有し、絞り込み状態は共有しない。

use crate::filter::FilterState;
use crate::policy::{Camera, SceneSettings};
use crate::projection::project;
use crate::scene::{build, SceneDescription};
use crate::store::RecordStore;
use crate::types::LatLon;
use std::sync::Arc;

/// 絞り込み → シーン生成を一度に行う
pub fn render(store: &RecordStore, filter: &FilterState, settings: &SceneSettings) -> SceneDescription {
    let view = project(store, filter);
    build(&view, settings)
}

/// 結果が空のときのカメラ
///
/// 指定があればそれを、無ければストア全体の重心、ストアも空なら (0, 0)。
pub fn fallback_camera(store: &RecordStore, configured: Option<LatLon>, zoom: f64) -> Camera {
    let center = configured
        .or_else(|| store.centroid())
        .unwrap_or_default();
    Camera { center, zoom }
}

/// 閲覧者1人分の状態
#[derive(Debug, Clone)]
pub struct Session {
    store: Arc<RecordStore>,
    settings: Arc<SceneSettings>,
    filter: FilterState,
}

impl Session {
    pub fn new(store: Arc<RecordStore>, settings: Arc<SceneSettings>) -> Self {
        Self {
            store,
            settings,
            filter: FilterState::new(),
        }
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    /// 絞り込み状態を丸ごと置き換え、新しいシーンを返す
    pub fn apply(&mut self, filter: FilterState) -> SceneDescription {
        self.filter = filter;
        self.scene()
    }

    /// 現在の状態のシーン
    pub fn scene(&self) -> SceneDescription {
        render(&self.store, &self.filter, &self.settings)
    }
}

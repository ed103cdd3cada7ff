//! 射影モジュール
//!
//! RecordStore と FilterState から、条件を満たすレコード列と重心を求める。
//! 制約のある属性ごとにインデックスの候補位置を取り出し、その積集合を取る。

use crate::filter::FilterState;
use crate::store::RecordStore;
use crate::types::{ActionRecord, LatLon};
use std::collections::BTreeSet;

/// 絞り込み結果
///
/// 状態が変わるたびに作り直す。rows はストアの順序を保つ。
#[derive(Debug, Clone, PartialEq)]
pub struct FilteredView<'a> {
    pub rows: Vec<&'a ActionRecord>,
    /// 行が無ければ None
    pub centroid: Option<LatLon>,
}

impl FilteredView<'_> {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// 絞り込みを実行
pub fn project<'a>(store: &'a RecordStore, filter: &FilterState) -> FilteredView<'a> {
    let rows: Vec<&ActionRecord> = match candidate_positions(store, filter) {
        None => store.all().iter().collect(),
        Some(positions) => positions
            .into_iter()
            .map(|pos| &store.all()[pos])
            .collect(),
    };

    tracing::debug!(kept = rows.len(), total = store.len(), "projection");

    let centroid = centroid(rows.iter().copied());
    FilteredView { rows, centroid }
}

/// 制約のある属性の候補位置の積集合（制約が無ければ None）
fn candidate_positions(store: &RecordStore, filter: &FilterState) -> Option<BTreeSet<usize>> {
    let mut candidates: Option<BTreeSet<usize>> = None;

    for (attribute, values) in filter.constraints() {
        let union: BTreeSet<usize> = values
            .iter()
            .flat_map(|value| store.positions(attribute, value).iter().copied())
            .collect();

        candidates = Some(match candidates {
            None => union,
            Some(current) => current.intersection(&union).copied().collect(),
        });

        if candidates.as_ref().is_some_and(BTreeSet::is_empty) {
            break;
        }
    }

    candidates
}

/// 緯度・経度それぞれの算術平均（平面近似）。空なら None
pub fn centroid<'a, I>(records: I) -> Option<LatLon>
where
    I: IntoIterator<Item = &'a ActionRecord>,
{
    let (count, lat_sum, lon_sum) = records
        .into_iter()
        .fold((0usize, 0.0f64, 0.0f64), |(n, lat, lon), r| {
            (n + 1, lat + r.latitude, lon + r.longitude)
        });

    if count == 0 {
        return None;
    }

    Some(LatLon::new(lat_sum / count as f64, lon_sum / count as f64))
}

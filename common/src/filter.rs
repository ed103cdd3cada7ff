//! 絞り込み状態モジュール
//!
//! 属性ごとの選択値の集合を保持する値オブジェクト。
//! 同一属性内の複数値は OR、属性間は AND で結合する。
//! 空の選択は「制約なし（すべて）」を意味する。

use crate::types::{ActionRecord, FilterAttribute};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    /// 空集合は保持しない
    selections: BTreeMap<FilterAttribute, BTreeSet<String>>,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    /// 属性の選択を置き換えた新しい状態を返す。空なら制約を外す
    pub fn with_selection<I, S>(&self, attribute: FilterAttribute, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values: BTreeSet<String> = values.into_iter().map(Into::into).collect();
        let mut next = self.clone();
        if values.is_empty() {
            next.selections.remove(&attribute);
        } else {
            next.selections.insert(attribute, values);
        }
        next
    }

    /// 属性の制約を外した新しい状態を返す
    pub fn cleared(&self, attribute: FilterAttribute) -> Self {
        let mut next = self.clone();
        next.selections.remove(&attribute);
        next
    }

    /// 属性の選択値（制約なしなら None）
    pub fn selection(&self, attribute: FilterAttribute) -> Option<&BTreeSet<String>> {
        self.selections.get(&attribute)
    }

    /// 制約のある属性と選択値
    pub fn constraints(&self) -> impl Iterator<Item = (FilterAttribute, &BTreeSet<String>)> {
        self.selections.iter().map(|(attr, values)| (*attr, values))
    }

    /// どの属性にも制約が無いか
    pub fn is_unconstrained(&self) -> bool {
        self.selections.is_empty()
    }

    /// レコードが全制約を満たすか
    pub fn matches(&self, record: &ActionRecord) -> bool {
        self.selections.iter().all(|(attribute, values)| {
            record
                .attribute(*attribute)
                .is_some_and(|value| values.contains(value))
        })
    }
}

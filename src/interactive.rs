//! 対話式絞り込みモジュール
//!
//! 属性を選び、値を複数選択（空選択で解除）するたびにシーンを再生成して
//! 出力ファイルを置き換える。最後に書いた内容が常に最新の状態。

use crate::cli::SceneFormat;
use crate::error::Result;
use crate::output::write_scene;
use dialoguer::{MultiSelect, Select};
use mmto_map_common::{filter_controls, FilterAttribute, FilterControl, FilterState, Session};
use std::collections::BTreeSet;
use std::path::Path;

/// メニュー操作
#[derive(Debug, Clone, PartialEq)]
pub enum MenuAction {
    /// 属性の選択を編集
    Edit(usize),
    /// すべての絞り込みを解除
    ClearAll,
    /// 終了
    Quit,
}

/// メニュー項目（属性 + 全解除 + 終了）
pub fn menu_items(controls: &[FilterControl], filter: &FilterState) -> Vec<String> {
    let mut items: Vec<String> = controls
        .iter()
        .map(|c| {
            let current = filter
                .selection(c.attribute)
                .map(|s| s.iter().cloned().collect::<Vec<_>>().join(", "))
                .unwrap_or_else(|| "すべて".to_string());
            format!("{} [{}]", c.attribute.label(), current)
        })
        .collect();
    items.push("すべて解除".to_string());
    items.push("終了".to_string());
    items
}

/// メニューの選択位置を操作に変換
pub fn menu_action(index: usize, control_count: usize) -> MenuAction {
    if index < control_count {
        MenuAction::Edit(index)
    } else if index == control_count {
        MenuAction::ClearAll
    } else {
        MenuAction::Quit
    }
}

/// 現在の選択を MultiSelect の初期チェックに変換
pub fn checked_defaults(options: &[String], current: Option<&BTreeSet<String>>) -> Vec<bool> {
    options
        .iter()
        .map(|o| current.is_some_and(|set| set.contains(o)))
        .collect()
}

/// 選択位置から値を取り出す
pub fn selected_values(options: &[String], indices: &[usize]) -> Vec<String> {
    indices
        .iter()
        .filter_map(|&i| options.get(i).cloned())
        .collect()
}

/// 状態の要約（表示用）
pub fn summarize(filter: &FilterState, points: usize) -> String {
    if filter.is_unconstrained() {
        return format!("絞り込みなし: {}件", points);
    }

    let parts: Vec<String> = filter
        .constraints()
        .map(|(attr, values)| {
            format!("{}={}", attr.label(), values.iter().cloned().collect::<Vec<_>>().join("|"))
        })
        .collect();
    format!("{}: {}件", parts.join(" かつ "), points)
}

/// 対話ループ
pub fn run_interactive(
    mut session: Session,
    attributes: &[FilterAttribute],
    output: &Path,
    format: SceneFormat,
) -> Result<()> {
    let controls = filter_controls(session.store(), attributes);

    let scene = session.scene();
    write_scene(&scene, format, output)?;
    println!("✔ {}", summarize(session.filter(), scene.points.len()));
    println!("  出力: {}\n", output.display());

    loop {
        let items = menu_items(&controls, session.filter());
        let index = Select::new()
            .with_prompt("操作を選択")
            .items(&items)
            .default(0)
            .interact()?;

        let next = match menu_action(index, controls.len()) {
            MenuAction::Quit => break,
            MenuAction::ClearAll => FilterState::new(),
            MenuAction::Edit(i) => {
                let control = &controls[i];
                if control.options.is_empty() {
                    println!("⚠ {} の選択肢がありません\n", control.attribute.label());
                    continue;
                }

                let defaults = checked_defaults(&control.options, session.filter().selection(control.attribute));
                let chosen = MultiSelect::new()
                    .with_prompt(format!("{}（Spaceで選択、未選択ですべて）", control.label))
                    .items(&control.options)
                    .defaults(&defaults)
                    .interact()?;

                session
                    .filter()
                    .with_selection(control.attribute, selected_values(&control.options, &chosen))
            }
        };

        let scene = session.apply(next);
        write_scene(&scene, format, output)?;
        println!("✔ {}\n", summarize(session.filter(), scene.points.len()));
    }

    println!("✅ 終了: {}", output.display());
    Ok(())
}

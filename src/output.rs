//! シーン出力モジュール

use crate::cli::SceneFormat;
use crate::error::Result;
use mmto_map_common::SceneDescription;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// 形式に応じてシーンを文字列化
pub fn render_scene(scene: &SceneDescription, format: SceneFormat) -> Result<String> {
    let text = match format {
        SceneFormat::Json => serde_json::to_string_pretty(scene)?,
        SceneFormat::GeoJson => serde_json::to_string_pretty(&scene.to_feature_collection())?,
    };
    Ok(text)
}

/// ファイルへ書き出し（既存ファイルは置き換え）
///
/// 同じディレクトリの一時ファイルに書いてから置き換えるため、読み手が途中の内容を見ることはない。
pub fn write_scene(scene: &SceneDescription, format: SceneFormat, path: &Path) -> Result<()> {
    let text = render_scene(scene, format)?;

    let parent = match path.parent().filter(|p| !p.as_os_str().is_empty()) {
        Some(parent) => {
            std::fs::create_dir_all(parent)?;
            parent
        }
        None => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(parent)?;
    tmp.write_all(text.as_bytes())?;
    tmp.persist(path).map_err(|e| e.error)?;
    tracing::debug!(path = %path.display(), points = scene.points.len(), "scene written");
    Ok(())
}

/// 標準出力へ書き出し
pub fn print_scene(scene: &SceneDescription, format: SceneFormat) -> Result<()> {
    let text = render_scene(scene, format)?;
    let stdout = std::io::stdout();
    let mut lock = stdout.lock();
    writeln!(lock, "{}", text)?;
    Ok(())
}

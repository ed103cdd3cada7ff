//! 保守作業レコードの地図表示ツール
//!
//! データセットの読み込み・設定・CLI。絞り込みとシーン生成は mmto-map-common。

pub mod cli;
pub mod config;
pub mod error;
pub mod interactive;
pub mod loader;
pub mod output;

use clap::{Parser, Subcommand};
use mmto_map_common::{DatasetVariant, FilterAttribute, FilterState};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "mmto-map")]
#[command(about = "保守作業レコードの地図表示・絞り込みツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// 絞り込み条件（複数指定は OR、属性間は AND）
#[derive(clap::Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// 種別（Tipo）で絞り込み
    #[arg(long = "tipo", value_name = "TIPO")]
    pub record_types: Vec<String>,

    /// 作業区分（Acción）で絞り込み
    #[arg(long = "accion", value_name = "ACCION")]
    pub action_types: Vec<String>,

    /// 月（Mes）で絞り込み
    #[arg(long = "mes", value_name = "MES")]
    pub months: Vec<String>,
}

impl FilterArgs {
    pub fn to_filter_state(&self) -> FilterState {
        FilterState::new()
            .with_selection(FilterAttribute::RecordType, self.record_types.iter().cloned())
            .with_selection(FilterAttribute::ActionType, self.action_types.iter().cloned())
            .with_selection(FilterAttribute::Month, self.months.iter().cloned())
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// 絞り込み結果から地図シーンを出力
    Scene {
        /// データセット（csv/xlsx）
        #[arg(required = true)]
        data: PathBuf,

        #[command(flatten)]
        filter: FilterArgs,

        /// データセット種類 (abril/multimes)。省略時は Mes 列の有無で判定
        #[arg(long)]
        variant: Option<DatasetVariant>,

        /// 出力形式 (json/geojson)
        #[arg(short, long, default_value = "json")]
        format: SceneFormat,

        /// 出力ファイル（省略時は標準出力）
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// 絞り込みの選択肢を表示
    Options {
        /// データセット（csv/xlsx）
        #[arg(required = true)]
        data: PathBuf,

        /// データセット種類 (abril/multimes)
        #[arg(long)]
        variant: Option<DatasetVariant>,

        /// JSONで出力
        #[arg(long)]
        json: bool,
    },

    /// 対話的に絞り込み、変更のたびにシーンを書き出す
    Interactive {
        /// データセット（csv/xlsx）
        #[arg(required = true)]
        data: PathBuf,

        /// シーンの出力先
        #[arg(short, long, required = true)]
        output: PathBuf,

        /// データセット種類 (abril/multimes)
        #[arg(long)]
        variant: Option<DatasetVariant>,

        /// 出力形式 (json/geojson)
        #[arg(short, long, default_value = "json")]
        format: SceneFormat,
    },

    /// 設定を表示/編集
    Config {
        /// 設定を表示
        #[arg(long)]
        show: bool,

        /// 設定ファイルのパスを表示
        #[arg(long)]
        path: bool,

        /// ズームを設定
        #[arg(long)]
        set_zoom: Option<f64>,

        /// 区分の色を設定（例: Podas=green）
        #[arg(long, value_name = "CATEGORY=COLOR")]
        set_color: Vec<String>,

        /// 既定値に戻す
        #[arg(long)]
        reset: bool,
    },
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SceneFormat {
    #[default]
    Json,
    GeoJson,
}

impl std::str::FromStr for SceneFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(SceneFormat::Json),
            "geojson" | "geo" => Ok(SceneFormat::GeoJson),
            _ => Err(format!("Unknown format: {}. Use json or geojson", s)),
        }
    }
}

impl std::fmt::Display for SceneFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SceneFormat::Json => write!(f, "json"),
            SceneFormat::GeoJson => write!(f, "geojson"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_scene_filters() {
        let cli = Cli::try_parse_from([
            "mmto-map", "scene", "MMTO_ABRIL.csv", "--tipo", "Poste", "--tipo", "Red", "--accion", "Podas",
            "--format", "geojson",
        ])
        .unwrap();

        match cli.command {
            Commands::Scene { filter, format, output, variant, .. } => {
                assert_eq!(filter.record_types, vec!["Poste", "Red"]);
                assert_eq!(format, SceneFormat::GeoJson);
                assert!(output.is_none());
                assert!(variant.is_none());

                let state = filter.to_filter_state();
                assert_eq!(state.selection(FilterAttribute::RecordType).map(|s| s.len()), Some(2));
                assert!(state.selection(FilterAttribute::Month).is_none());
            }
            _ => panic!("scene expected"),
        }
    }

    #[test]
    fn test_empty_filter_args_are_unconstrained() {
        assert!(FilterArgs::default().to_filter_state().is_unconstrained());
    }

    #[test]
    fn test_interactive_requires_output() {
        assert!(Cli::try_parse_from(["mmto-map", "interactive", "datos.csv"]).is_err());
    }

    #[test]
    fn test_scene_format_from_str() {
        assert_eq!("JSON".parse::<SceneFormat>(), Ok(SceneFormat::Json));
        assert_eq!("geojson".parse::<SceneFormat>(), Ok(SceneFormat::GeoJson));
        assert!("png".parse::<SceneFormat>().is_err());
    }
}

use anyhow::Context;
use clap::Parser;
use mmto_map::{cli, config, interactive, loader, output};
use cli::{Cli, Commands};
use config::Config;
use loader::Dataset;
use tracing_subscriber::EnvFilter;

/// RUST_LOG 未指定時のフィルタ。--verbose でも他クレートは info のまま
fn default_directives(verbose: bool) -> &'static str {
    if verbose {
        "info,mmto_map=debug,mmto_map_common=debug"
    } else {
        "info"
    }
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(verbose)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Scene { data, filter, variant, format, output: out } => {
            let config = Config::load()?;
            let dataset = Dataset::open(&data, variant, &config)?;
            let scene = dataset.scene(&filter.to_filter_state());

            match out {
                Some(path) => {
                    output::write_scene(&scene, format, &path)
                        .with_context(|| format!("シーンを書き出せません: {}", path.display()))?;
                    println!("✔ {}点を出力: {}", scene.points.len(), path.display());
                }
                None => output::print_scene(&scene, format)?,
            }
        }

        Commands::Options { data, variant, json } => {
            let config = Config::load()?;
            let dataset = Dataset::open(&data, variant, &config)?;
            let controls = dataset.controls();

            if json {
                println!("{}", serde_json::to_string_pretty(&controls)?);
            } else {
                println!("📋 {} ({}件, {})\n", data.display(), dataset.store.len(), dataset.variant);
                for control in &controls {
                    println!("{}", control.label);
                    for option in &control.options {
                        println!("  - {}", option);
                    }
                    println!();
                }
            }
        }

        Commands::Interactive { data, output, variant, format } => {
            println!("🗺  mmto-map - 対話式絞り込み\n");
            let config = Config::load()?;
            let dataset = Dataset::open(&data, variant, &config)?;
            println!("✔ {}件を読み込み ({})\n", dataset.store.len(), dataset.variant);
            interactive::run_interactive(
                dataset.session(),
                dataset.variant.filter_attributes(),
                &output,
                format,
            )?;
        }

        Commands::Config { show, path, set_zoom, set_color, reset } => {
            let config_path = Config::config_path()?;
            let changed = reset || set_zoom.is_some() || !set_color.is_empty();
            if path {
                println!("{}", config_path.display());
                if !changed && !show {
                    return Ok(());
                }
            }

            let mut config = Config::load_for_update(&config_path, reset)?;

            if let Some(zoom) = set_zoom {
                config.set_zoom(zoom)?;
            }
            for assignment in &set_color {
                config.set_color(assignment)?;
            }

            if changed {
                config.save_to(&config_path)?;
                println!("✔ 設定を保存しました");
            }

            if show || (!changed && !path) {
                println!("設定:");
                println!("  ズーム: {}", config.zoom);
                println!("  空表示のズーム: {}", config.fallback_zoom);
                match config.fallback_center {
                    Some(c) => println!("  空表示の中心: ({}, {})", c.lat, c.lon),
                    None => println!("  空表示の中心: データ全体の重心"),
                }
                println!("  地図スタイル: {}", config.map_style);
                println!("  マーカーサイズ: {}", config.marker_size);
                println!("  色:");
                for (category, color) in &config.colors {
                    println!("    {} = {}", category, color);
                }
                println!("    (その他) = {}", config.fallback_color);
            }
        }
    }

    Ok(())
}

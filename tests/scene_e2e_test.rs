//! 読み込み → 絞り込み → シーン生成の通しテスト

use mmto_map::config::Config;
use mmto_map::loader::Dataset;
use mmto_map_common::{DatasetVariant, FilterAttribute, FilterState, LatLon};
use std::path::PathBuf;
use tempfile::{tempdir, TempDir};

const THREE_RECORDS: &str = "Sticker,LATITUD,LONGITUD,Acción,Tipo,Descripción,Estado
A,10,20,Podas,Poste,Poda norte,Cerrado
B,10,22,Correctivo,Red,Cable suelto,Abierto
C,12,20,Podas,Luminaria,Poda sur,Cerrado
";

fn write_csv(content: &str) -> (TempDir, PathBuf) {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("MMTO_ABRIL.csv");
    std::fs::write(&path, content).expect("CSV書き込み失敗");
    (dir, path)
}

fn open(content: &str) -> (TempDir, Dataset) {
    let (dir, path) = write_csv(content);
    let dataset = Dataset::open(&path, None, &Config::default()).expect("読み込み失敗");
    (dir, dataset)
}

/// Podas で絞り込むと A, C が残り、重心 (11, 20)、凡例は Podas: green のみ
#[test]
fn test_filter_podas_scenario() {
    let (_dir, dataset) = open(THREE_RECORDS);
    let filter = FilterState::new().with_selection(FilterAttribute::ActionType, ["Podas"]);
    let scene = dataset.scene(&filter);

    let labels: Vec<&str> = scene.points.iter().map(|p| p.label.as_str()).collect();
    assert_eq!(labels, vec!["A", "C"]);
    assert_eq!(scene.camera.center, LatLon::new(11.0, 20.0));
    assert_eq!(scene.camera.zoom, 12.0);
    assert_eq!(scene.legend.len(), 1);
    assert_eq!(scene.legend[0].action_type, "Podas");
    assert_eq!(scene.legend[0].color, "green");
}

/// どのレコードにも無い値 → 空のシーン、既定カメラ
#[test]
fn test_filter_absent_value_scenario() {
    let (_dir, dataset) = open(THREE_RECORDS);
    let filter = FilterState::new().with_selection(FilterAttribute::ActionType, ["Emergencia"]);
    let scene = dataset.scene(&filter);

    assert!(scene.points.is_empty());
    assert!(scene.legend.is_empty());
    // 既定カメラ = データ全体の重心
    let c = scene.camera.center;
    assert!((c.lat - 32.0 / 3.0).abs() < 1e-9);
    assert!((c.lon - 62.0 / 3.0).abs() < 1e-9);
    assert!(!c.lat.is_nan() && !c.lon.is_nan());
}

/// 設定で中心を指定した場合は空結果でもその中心
#[test]
fn test_configured_fallback_center() {
    let (_dir, path) = write_csv(THREE_RECORDS);
    let config = Config {
        fallback_center: Some(LatLon::new(4.6, -74.1)),
        fallback_zoom: 9.0,
        ..Default::default()
    };
    let dataset = Dataset::open(&path, None, &config).unwrap();
    let filter = FilterState::new().with_selection(FilterAttribute::RecordType, ["Nada"]);
    let scene = dataset.scene(&filter);

    assert_eq!(scene.camera.center, LatLon::new(4.6, -74.1));
    assert_eq!(scene.camera.zoom, 9.0);
}

/// 絞り込みなしは全件を元の順序で
#[test]
fn test_unconstrained_returns_everything_in_order() {
    let (_dir, dataset) = open(THREE_RECORDS);
    let scene = dataset.scene(&FilterState::new());
    let labels: Vec<&str> = scene.points.iter().map(|p| p.label.as_str()).collect();
    assert_eq!(labels, vec!["A", "B", "C"]);
    assert_eq!(dataset.variant, DatasetVariant::Abril);
    assert_eq!(scene.title, "ESIP - Registro de Acciones Abril 2024");
}

/// 緯度が数値でない行はどの絞り込みにも現れない
#[test]
fn test_non_numeric_latitude_never_projected() {
    let csv = format!("{}D,n/a,20,Podas,Poste,Sin GPS,Abierto\n", THREE_RECORDS);
    let (_dir, dataset) = open(&csv);
    assert_eq!(dataset.store.len(), 3);
    assert_eq!(dataset.store.dropped(), 1);

    let filters = [
        FilterState::new(),
        FilterState::new().with_selection(FilterAttribute::ActionType, ["Podas"]),
        FilterState::new().with_selection(FilterAttribute::RecordType, ["Poste"]),
    ];
    for filter in &filters {
        let scene = dataset.scene(filter);
        assert!(scene.points.iter().all(|p| p.label != "D"));
    }
}

/// 複数月データセット: Tipo と Mes の AND
#[test]
fn test_multi_month_dataset() {
    let csv = "Sticker,LATITUD,LONGITUD,Acción,Tipo,Descripción,Estado,Mes
A,10,20,Podas,Poste,x,Cerrado,Abril
B,10,22,Correctivo,Poste,x,Abierto,Mayo
C,12,20,Preventivo,Red,x,Cerrado,Mayo
";
    let (_dir, dataset) = open(csv);
    assert_eq!(dataset.variant, DatasetVariant::Multimes);

    let controls = dataset.controls();
    assert_eq!(controls.len(), 2);
    assert_eq!(controls[1].options, vec!["Abril", "Mayo"]);

    let filter = FilterState::new()
        .with_selection(FilterAttribute::RecordType, ["Poste"])
        .with_selection(FilterAttribute::Month, ["Mayo"]);
    let scene = dataset.scene(&filter);
    assert_eq!(scene.points.len(), 1);
    assert_eq!(scene.points[0].label, "B");
    assert_eq!(scene.points[0].color, "orange");
    assert_eq!(scene.points[0].tooltip[0].name, "Mes");
    assert_eq!(scene.points[0].tooltip[0].value, "Mayo");
}

/// セッションは絞り込み状態を丸ごと置き換える
#[test]
fn test_session_last_write_wins() {
    let (_dir, dataset) = open(THREE_RECORDS);
    let mut first = dataset.session();
    let mut second = dataset.session();

    first.apply(FilterState::new().with_selection(FilterAttribute::RecordType, ["Red"]));
    let scene = first.apply(FilterState::new().with_selection(FilterAttribute::RecordType, ["Poste", "Luminaria"]));
    assert_eq!(scene.points.len(), 2);

    // 別セッションは影響を受けない
    assert!(second.filter().is_unconstrained());
    assert_eq!(second.apply(FilterState::new()).points.len(), 3);
}

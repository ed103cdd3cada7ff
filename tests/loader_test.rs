//! データセット読み込みテスト
//!
//! CSV/Excel の読み込みと、必須列・座標変換の扱いを検証

use mmto_map::error::MapError;
use mmto_map::loader::{load_store, load_table};
use mmto_map_common::{ColumnMapping, DataLoadError, FilterAttribute};
use rust_xlsxwriter::Workbook;
use tempfile::tempdir;

/// Excel（xlsx）からの読み込み
#[test]
fn test_load_xlsx() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("MMTO_MAYO.xlsx");

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    let headers = ["Sticker", "LATITUD", "LONGITUD", "Acción", "Tipo", "Estado"];
    for (col, name) in headers.iter().enumerate() {
        sheet.write_string(0, col as u16, *name).unwrap();
    }
    sheet.write_string(1, 0, "ST-1").unwrap();
    sheet.write_number(1, 1, 4.65).unwrap();
    sheet.write_number(1, 2, -74.05).unwrap();
    sheet.write_string(1, 3, "Podas").unwrap();
    sheet.write_string(1, 4, "Poste").unwrap();
    sheet.write_string(1, 5, "Cerrado").unwrap();

    sheet.write_string(2, 0, "ST-2").unwrap();
    sheet.write_string(2, 1, "4,70").unwrap();
    sheet.write_number(2, 2, -74.10).unwrap();
    sheet.write_string(2, 3, "Correctivo").unwrap();
    sheet.write_string(2, 4, "Red").unwrap();

    sheet.write_string(3, 0, "ST-3").unwrap();
    sheet.write_string(3, 1, "sin dato").unwrap();
    sheet.write_number(3, 2, -74.10).unwrap();
    sheet.write_string(3, 3, "Podas").unwrap();
    sheet.write_string(3, 4, "Red").unwrap();
    workbook.save(&path).expect("xlsx保存失敗");

    let store = load_store(&path, &ColumnMapping::default()).expect("読み込み失敗");
    assert_eq!(store.len(), 2);
    assert_eq!(store.dropped(), 1);

    let first = &store.all()[0];
    assert_eq!(first.id, "ST-1");
    assert_eq!(first.latitude, 4.65);
    assert_eq!(first.status, "Cerrado");

    let second = &store.all()[1];
    assert_eq!(second.latitude, 4.70);
    assert_eq!(second.status, "");

    assert_eq!(store.distinct_values(FilterAttribute::RecordType), vec!["Poste", "Red"]);
}

/// 必須列が無い場合は DataLoadError
#[test]
fn test_missing_mandatory_column() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("datos.csv");
    std::fs::write(&path, "Sticker,LATITUD,LONGITUD,Tipo\nA,1,2,Poste\n").unwrap();

    let err = load_store(&path, &ColumnMapping::default()).unwrap_err();
    assert!(err.is_data_load());
    match err {
        MapError::Common(mmto_map_common::Error::DataLoad(DataLoadError::MissingColumns(cols))) => {
            assert_eq!(cols, vec!["Acción".to_string()]);
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

/// 列名の対応を変更して読み込み
#[test]
fn test_custom_column_mapping() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("datos.csv");
    std::fs::write(&path, "code;lat;lon;action;kind\nX1;4,6;-74,1;Podas;Poste\n").unwrap();

    let mapping = ColumnMapping {
        id: "code".into(),
        latitude: "lat".into(),
        longitude: "lon".into(),
        action_type: "action".into(),
        record_type: "kind".into(),
        ..Default::default()
    };
    let store = load_store(&path, &mapping).unwrap();
    assert_eq!(store.len(), 1);
    assert_eq!(store.all()[0].id, "X1");
    assert_eq!(store.all()[0].longitude, -74.1);
}

/// 存在しないファイル
#[test]
fn test_missing_source() {
    let err = load_table(std::path::Path::new("/nonexistent/MMTO_ABRIL.csv")).unwrap_err();
    assert!(matches!(err, MapError::FileNotFound(_)));
}

/// 空のCSVは読み込み不可
#[test]
fn test_empty_csv_is_unavailable() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("vacio.csv");
    std::fs::write(&path, "").unwrap();

    let err = load_table(&path).unwrap_err();
    assert!(err.is_data_load());
}

/// ヘッダーのみのCSVは0件で読み込める
#[test]
fn test_header_only_csv() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("solo_cabecera.csv");
    std::fs::write(&path, "Sticker,LATITUD,LONGITUD,Acción,Tipo\n").unwrap();

    let store = load_store(&path, &ColumnMapping::default()).unwrap();
    assert!(store.is_empty());
    assert_eq!(store.centroid(), None);
}

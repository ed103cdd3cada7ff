//! MMTO Map Common Library
//!
//! 保守作業レコードの読み込み・絞り込み・地図シーン生成（CLIから利用）

pub mod error;
pub mod types;
pub mod source;
pub mod store;
pub mod filter;
pub mod projection;
pub mod policy;
pub mod scene;
pub mod controls;
pub mod session;

pub use error::{DataLoadError, Error, Result};
pub use types::{ActionRecord, FilterAttribute, LatLon, RecordField};
pub use source::{ColumnMapping, RawTable, RawValue};
pub use store::RecordStore;
pub use filter::FilterState;
pub use projection::{centroid, project, FilteredView};
pub use policy::{Camera, ColorPolicy, SceneSettings, TooltipConfig, TooltipField};
pub use scene::{build, SceneDescription, ScenePoint, LegendEntry};
pub use controls::{filter_controls, DatasetVariant, FilterControl};
pub use session::{fallback_camera, render, Session};

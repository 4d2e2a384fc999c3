//! FaceForge Core Library
//!
//! Platform-agnostic scene model, editing logic, and persistence for the
//! FaceForge composite sketch editor.

pub mod asset;
pub mod case;
pub mod catalog;
pub mod editor;
pub mod feature;
pub mod history;
pub mod project;
pub mod recognition;
pub mod scene;
pub mod snap;
pub mod storage;
pub mod view;

pub use asset::{AssetDescriptor, FeatureCategory};
pub use case::{CaseInfo, CaseStatus, Priority};
pub use catalog::{AssetCatalog, DirectoryCatalog, StaticCatalog};
pub use editor::{command_for_key, Command, EditorSession, Modifiers, SelectionSource};
pub use feature::{FeatureId, FeatureUpdate, PlacedFeature, MIN_FEATURE_SIZE};
pub use history::{History, MAX_HISTORY};
pub use project::{MetadataDocument, ProjectDocument, ProjectMetadata, PROJECT_VERSION};
pub use scene::Scene;
pub use snap::{snap_scalar, snap_to_grid};
pub use storage::{FileStorage, MemoryStorage, Storage, StorageError};
pub use view::{
    CanvasSettings, ExportQuality, ViewState, CANVAS_HEIGHT, CANVAS_WIDTH,
};

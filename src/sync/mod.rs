//! Export and import pipelines.
//!
//! - `export`: workspace -> bundle store
//! - `import`: bundle store -> workspace

pub mod export;
pub mod import;

pub use export::{ExportOptions, ExportReport, GroupOutcome, export};
pub use import::{ImportOptions, ImportReport, import, single_target_language};

//! Vexel Import Library
//!
//! Reads foreign design files (zip archives of JSON, bare JSON trees,
//! simple SVG) into scene elements, and writes scenes back out as
//! archives other tools can open.

mod archive;
mod convert;
mod error;
mod export;
mod svg;

pub use archive::{write_archive, Archive, ArchiveEntry};
pub use convert::{
    import_archive, import_file, import_json, ImportStage, ImportedAsset, ImportedScene,
};
pub use error::{ImportError, ImportResult};
pub use export::export_archive;
pub use svg::import_svg;

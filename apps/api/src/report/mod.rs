//! Report engine: input model, composers and the assembler that drives them.

pub mod assembler;
pub mod composers;
pub mod draw;
pub mod format;
pub mod images;
pub mod labels;
pub mod model;
pub mod settings;

pub use assembler::DocumentAssembler;
pub use images::{HttpImageFetcher, ImagePlacer};
pub use model::ReportInput;
pub use settings::ReportConfig;

pub mod error;
pub mod export;
pub mod filters;
pub mod fonts;
pub mod hit;
pub mod raster;

pub use error::RenderError;
pub use export::{ExportFormat, clipboard_message, encode};
pub use fonts::FontBook;
pub use raster::Rasterizer;

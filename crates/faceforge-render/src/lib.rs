//! FaceForge Render Library
//!
//! Renderer abstraction and the CPU compositing backend for FaceForge.
//! The same pass draws the interactive canvas and the exporter output.

pub mod cache;
pub mod color;
pub mod export;
pub mod raster;
mod renderer;

pub use cache::ImageCache;
pub use color::parse_css_color;
pub use export::{export_image, export_png, png_bytes, ExportError};
pub use raster::RasterRenderer;
pub use renderer::{RenderContext, RenderResult, Renderer, RendererError};

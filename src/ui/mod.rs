//! Screen layout and rasterization

pub mod layout;
pub mod renderer;
pub mod text;

pub use layout::{SceneLayout, banner_x};
pub use renderer::{RendererError, SceneRenderer, save_png};
pub use text::TextRasterizer;

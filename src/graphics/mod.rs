//! Graphics module - render-target (canvas) types and the GPU backend boundary

// Module declarations
pub mod backend;
pub mod canvas;
pub mod canvas_manager;
pub mod format;
pub mod texture;

#[cfg(test)]
pub mod mock_backend;

// Re-export everything from the sub-modules
pub use backend::*;
pub use canvas::*;
pub use canvas_manager::*;
pub use format::*;
pub use texture::*;

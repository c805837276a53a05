//! GpuBackend trait - opaque GPU object surface for the render-target core
//!
//! The canvas layer never talks to a driver directly; it issues opaque
//! create/delete/blit/upload calls against this trait. Backend crates
//! (OpenGL, Vulkan, ...) implement it over their native object model. All
//! calls must be made from the thread that owns the graphics context; the
//! engine shares a backend as `Arc<Mutex<dyn GpuBackend>>` and locks around
//! each call.

use slotmap::new_key_type;

use crate::error::Result;
use crate::graphics::format::{DepthStencilFormat, TextureFormat};

new_key_type! {
    /// Opaque handle to a backend texture object
    pub struct TextureHandle;

    /// Opaque handle to a backend renderbuffer object
    pub struct RenderbufferHandle;

    /// Opaque handle to a backend framebuffer object
    pub struct FramebufferHandle;
}

/// Descriptor for creating a backend texture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureDesc {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Pixel format
    pub format: TextureFormat,
}

/// Contents of a backend renderbuffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderbufferKind {
    /// Multisample color storage, resolved into a texture later
    MultisampleColor(TextureFormat),
    /// Combined depth/stencil storage
    DepthStencil(DepthStencilFormat),
}

/// Descriptor for creating a backend renderbuffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderbufferDesc {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Storage kind (multisample color or depth/stencil)
    pub kind: RenderbufferKind,
    /// Sample count (1 = single-sampled)
    pub samples: u32,
}

/// Color attachment bound into a framebuffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorAttachment {
    /// Single-sampled texture (render destination or resolve destination)
    Texture(TextureHandle),
    /// Multisample renderbuffer (render destination before resolve)
    Renderbuffer(RenderbufferHandle),
}

/// Descriptor for creating a backend framebuffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FramebufferDesc {
    /// The single color attachment
    pub color: ColorAttachment,
    /// Optional combined depth/stencil attachment
    pub depth_stencil: Option<RenderbufferHandle>,
}

/// Opaque GPU backend interface
///
/// Implemented by backend-specific crates. Every method maps to one or more
/// driver calls; failures are reported as `OutOfMemory` or
/// `BackendError` and never leave a partially created object behind.
pub trait GpuBackend: Send + Sync {
    /// Color formats usable as render target attachments on this backend
    ///
    /// Queried once at initialization to build a
    /// [`FormatCaps`](crate::graphics::FormatCaps) table.
    fn supported_formats(&self) -> Vec<TextureFormat>;

    /// Create a texture object
    fn create_texture(&mut self, desc: &TextureDesc) -> Result<TextureHandle>;

    /// Delete a texture object; unknown handles are ignored
    fn delete_texture(&mut self, handle: TextureHandle);

    /// Upload raw pixel bytes into a texture
    ///
    /// `data` must be exactly `width * height * bytes_per_pixel` long for
    /// the texture's descriptor.
    fn write_texture(&mut self, handle: TextureHandle, data: &[u8]) -> Result<()>;

    /// Create a renderbuffer object
    fn create_renderbuffer(&mut self, desc: &RenderbufferDesc) -> Result<RenderbufferHandle>;

    /// Delete a renderbuffer object; unknown handles are ignored
    fn delete_renderbuffer(&mut self, handle: RenderbufferHandle);

    /// Create a framebuffer object binding the given attachments
    fn create_framebuffer(&mut self, desc: &FramebufferDesc) -> Result<FramebufferHandle>;

    /// Delete a framebuffer object; unknown handles are ignored
    fn delete_framebuffer(&mut self, handle: FramebufferHandle);

    /// Blit/downsample the full color contents of `src` into `dst`
    ///
    /// Used by the canvas resolve operation; `width`/`height` give the
    /// region in pixels (stereo targets pass their doubled width).
    fn blit_framebuffer(
        &mut self,
        src: FramebufferHandle,
        dst: FramebufferHandle,
        width: u32,
        height: u32,
    ) -> Result<()>;
}

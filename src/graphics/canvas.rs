//! Canvas - off-screen render target with optional MSAA and stereo output
//!
//! A canvas owns a color attachment, an optional combined depth/stencil
//! attachment, and - when multisampled - a multisample color attachment plus
//! a resolve framebuffer. All owned GPU objects are released on destroy (or
//! on drop, if destroy was never called), in reverse-acquisition order.

use std::sync::{Arc, Mutex};

use bitflags::bitflags;

use crate::error::{Error, Result};
use crate::graphics::backend::{
    ColorAttachment, FramebufferDesc, FramebufferHandle, GpuBackend, RenderbufferDesc,
    RenderbufferHandle, RenderbufferKind, TextureDesc, TextureHandle,
};
use crate::graphics::format::{DepthStencilFormat, FormatCaps, TextureFormat};
use crate::{nebula_debug, nebula_error, nebula_warn};

bitflags! {
    /// Canvas creation flags
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct CanvasFlags: u32 {
        /// Allocate a depth attachment
        const DEPTH = 1 << 0;
        /// Allocate a stencil attachment
        const STENCIL = 1 << 1;
        /// Dual-eye output (left/right halves of a double-wide target)
        const STEREO = 1 << 2;
    }
}

/// Descriptor for creating a canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanvasDesc {
    /// Logical width in pixels (per eye when stereo)
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Color attachment format; must pass the capability table
    pub format: TextureFormat,
    /// Sample count; 1 = no multisampling
    pub msaa: u32,
    /// Depth/stencil/stereo flags
    pub flags: CanvasFlags,
}

impl CanvasDesc {
    /// Descriptor with no MSAA, no depth/stencil, no stereo
    pub fn new(width: u32, height: u32, format: TextureFormat) -> Self {
        Self {
            width,
            height,
            format,
            msaa: 1,
            flags: CanvasFlags::empty(),
        }
    }
}

/// Handles allocated so far during canvas creation
///
/// On any intermediate failure the whole set is rolled back in
/// reverse-acquisition order, so a failed create leaks nothing.
#[derive(Default)]
struct Allocation {
    color: Option<TextureHandle>,
    depth_stencil: Option<RenderbufferHandle>,
    msaa_buffer: Option<RenderbufferHandle>,
    framebuffer: Option<FramebufferHandle>,
    resolve_framebuffer: Option<FramebufferHandle>,
}

impl Allocation {
    fn rollback(self, backend: &mut dyn GpuBackend) {
        if let Some(fb) = self.resolve_framebuffer {
            backend.delete_framebuffer(fb);
        }
        if let Some(fb) = self.framebuffer {
            backend.delete_framebuffer(fb);
        }
        if let Some(rb) = self.msaa_buffer {
            backend.delete_renderbuffer(rb);
        }
        if let Some(rb) = self.depth_stencil {
            backend.delete_renderbuffer(rb);
        }
        if let Some(texture) = self.color {
            backend.delete_texture(texture);
        }
    }
}

/// Off-screen render target
///
/// Created via [`Canvas::create`] with fixed dimensions and format; there is
/// no in-place resize (destroy and recreate instead). When `msaa > 1`,
/// rendering goes into the multisample attachment and [`Canvas::resolve`]
/// downsamples it into the color texture.
///
/// # Stereo
///
/// A stereo canvas allocates one double-wide color attachment
/// (`pixel_width() == 2 * width()`); the left eye renders into the left
/// half, the right eye into the right half. No multiview extension is
/// required. Depth/stencil and multisample attachments match the doubled
/// width.
pub struct Canvas {
    backend: Arc<Mutex<dyn GpuBackend>>,
    color: TextureHandle,
    framebuffer: FramebufferHandle,
    resolve_framebuffer: Option<FramebufferHandle>,
    depth_stencil: Option<RenderbufferHandle>,
    msaa_buffer: Option<RenderbufferHandle>,
    width: u32,
    height: u32,
    format: TextureFormat,
    msaa: u32,
    stereo: bool,
    destroyed: bool,
}

impl Canvas {
    /// Create a fully-initialized, immediately usable canvas
    ///
    /// Validates the format against `caps` before touching the backend, then
    /// allocates color texture, depth/stencil renderbuffer, multisample
    /// renderbuffer, primary framebuffer, and resolve framebuffer, in that
    /// order. Creation is atomic: on any intermediate failure everything
    /// allocated so far is deleted before the error is returned.
    ///
    /// # Errors
    ///
    /// - [`Error::UnsupportedFormat`] if `caps` rejects `desc.format`
    /// - [`Error::InvalidState`] for zero dimensions or `msaa == 0`
    /// - [`Error::OutOfMemory`] / [`Error::BackendError`] from the driver
    pub fn create(
        backend: &Arc<Mutex<dyn GpuBackend>>,
        caps: &FormatCaps,
        desc: &CanvasDesc,
    ) -> Result<Canvas> {
        // Fail fast, before any allocation
        if desc.width == 0 || desc.height == 0 {
            nebula_warn!(
                "nebula::Canvas",
                "Rejecting canvas with zero dimension: {}x{}",
                desc.width,
                desc.height
            );
            return Err(Error::InvalidState(format!(
                "canvas dimensions must be non-zero, got {}x{}",
                desc.width, desc.height
            )));
        }
        if desc.msaa == 0 {
            nebula_warn!("nebula::Canvas", "Rejecting canvas with msaa == 0");
            return Err(Error::InvalidState(
                "canvas sample count must be >= 1".to_string(),
            ));
        }
        if !caps.supports(desc.format) {
            return Err(Error::UnsupportedFormat(desc.format));
        }

        let mut guard = backend.lock().unwrap();
        let mut alloc = Allocation::default();
        match Self::allocate(&mut *guard, desc, &mut alloc) {
            Ok(()) => {}
            Err(e) => {
                alloc.rollback(&mut *guard);
                nebula_error!("nebula::Canvas", "Canvas creation failed: {}", e);
                return Err(e);
            }
        }
        drop(guard);

        let stereo = desc.flags.contains(CanvasFlags::STEREO);
        nebula_debug!(
            "nebula::Canvas",
            "Created {}x{} canvas ({:?}, msaa={}, stereo={})",
            desc.width,
            desc.height,
            desc.format,
            desc.msaa,
            stereo
        );

        // allocate() filled every handle the descriptor asked for
        Ok(Canvas {
            backend: Arc::clone(backend),
            color: alloc.color.unwrap(),
            framebuffer: alloc.framebuffer.unwrap(),
            resolve_framebuffer: alloc.resolve_framebuffer,
            depth_stencil: alloc.depth_stencil,
            msaa_buffer: alloc.msaa_buffer,
            width: desc.width,
            height: desc.height,
            format: desc.format,
            msaa: desc.msaa,
            stereo,
            destroyed: false,
        })
    }

    /// Allocate all backend objects for `desc` into `alloc`
    ///
    /// The caller rolls `alloc` back if this returns an error.
    fn allocate(
        backend: &mut dyn GpuBackend,
        desc: &CanvasDesc,
        alloc: &mut Allocation,
    ) -> Result<()> {
        let stereo = desc.flags.contains(CanvasFlags::STEREO);
        let pixel_width = if stereo { desc.width * 2 } else { desc.width };
        let multisampled = desc.msaa > 1;

        // Color texture: direct render destination when single-sampled,
        // resolve destination when multisampled. Always single-sampled.
        let color = backend.create_texture(&TextureDesc {
            width: pixel_width,
            height: desc.height,
            format: desc.format,
        })?;
        alloc.color = Some(color);

        // One combined depth/stencil allocation, whichever components were
        // requested. Sample count must match the render destination.
        if desc.flags.intersects(CanvasFlags::DEPTH | CanvasFlags::STENCIL) {
            let ds_format = if desc.flags.contains(CanvasFlags::STENCIL) {
                DepthStencilFormat::D24_UNORM_S8_UINT
            } else {
                DepthStencilFormat::D24_UNORM
            };
            let ds = backend.create_renderbuffer(&RenderbufferDesc {
                width: pixel_width,
                height: desc.height,
                kind: RenderbufferKind::DepthStencil(ds_format),
                samples: desc.msaa,
            })?;
            alloc.depth_stencil = Some(ds);
        }

        if multisampled {
            let msaa_buffer = backend.create_renderbuffer(&RenderbufferDesc {
                width: pixel_width,
                height: desc.height,
                kind: RenderbufferKind::MultisampleColor(desc.format),
                samples: desc.msaa,
            })?;
            alloc.msaa_buffer = Some(msaa_buffer);
        }

        // Primary framebuffer: rendering lands here
        let framebuffer = backend.create_framebuffer(&FramebufferDesc {
            color: match alloc.msaa_buffer {
                Some(rb) => ColorAttachment::Renderbuffer(rb),
                None => ColorAttachment::Texture(color),
            },
            depth_stencil: alloc.depth_stencil,
        })?;
        alloc.framebuffer = Some(framebuffer);

        // Resolve framebuffer: blit destination, color texture only
        if multisampled {
            let resolve = backend.create_framebuffer(&FramebufferDesc {
                color: ColorAttachment::Texture(color),
                depth_stencil: None,
            })?;
            alloc.resolve_framebuffer = Some(resolve);
        }

        Ok(())
    }

    /// Downsample the multisample attachment into the color texture
    ///
    /// No-op when `msaa() == 1` (zero backend calls). Otherwise issues
    /// exactly one backend blit per invocation. Call after rendering into
    /// the canvas and before sampling its color texture. Not idempotent in
    /// content (each call re-blits the current multisample contents) but
    /// safe to call repeatedly.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidState`] if the canvas was destroyed;
    /// [`Error::BackendError`] if the driver rejects the blit.
    pub fn resolve(&mut self) -> Result<()> {
        if self.destroyed {
            return Err(Error::InvalidState(
                "resolve() called on a destroyed canvas".to_string(),
            ));
        }
        let resolve_framebuffer = match self.resolve_framebuffer {
            Some(fb) => fb,
            None => return Ok(()),
        };
        let mut guard = self.backend.lock().unwrap();
        guard.blit_framebuffer(
            self.framebuffer,
            resolve_framebuffer,
            self.pixel_width(),
            self.height,
        )
    }

    /// Release every owned GPU object
    ///
    /// Objects are deleted in reverse-acquisition order (resolve
    /// framebuffer, primary framebuffer, multisample buffer, depth/stencil,
    /// color texture) so the driver never sees a framebuffer outlive its
    /// attachments. A second destroy returns [`Error::InvalidState`] and
    /// releases nothing; it is never undefined behavior. Dropping an
    /// undestroyed canvas releases the same objects quietly.
    pub fn destroy(&mut self) -> Result<()> {
        if self.destroyed {
            nebula_warn!("nebula::Canvas", "destroy() called twice");
            return Err(Error::InvalidState(
                "canvas already destroyed".to_string(),
            ));
        }
        let backend = Arc::clone(&self.backend);
        let mut guard = backend.lock().unwrap();
        self.release(&mut *guard);
        Ok(())
    }

    /// Delete owned objects in reverse-acquisition order and mark destroyed
    fn release(&mut self, backend: &mut dyn GpuBackend) {
        if let Some(fb) = self.resolve_framebuffer.take() {
            backend.delete_framebuffer(fb);
        }
        backend.delete_framebuffer(self.framebuffer);
        if let Some(rb) = self.msaa_buffer.take() {
            backend.delete_renderbuffer(rb);
        }
        if let Some(rb) = self.depth_stencil.take() {
            backend.delete_renderbuffer(rb);
        }
        backend.delete_texture(self.color);
        self.destroyed = true;
    }

    /// Seed the color texture with raw pixel bytes
    ///
    /// Used to give a render target initial contents (e.g. pixel data read
    /// through the [`Filesystem`](crate::fs::Filesystem) collaborator).
    /// `data` must be exactly `pixel_width() * height() * bytes_per_pixel`
    /// long.
    pub fn write_color(&mut self, data: &[u8]) -> Result<()> {
        if self.destroyed {
            return Err(Error::InvalidState(
                "write_color() called on a destroyed canvas".to_string(),
            ));
        }
        let expected = self.pixel_width() as usize
            * self.height as usize
            * self.format.bytes_per_pixel() as usize;
        if data.len() != expected {
            return Err(Error::InvalidState(format!(
                "color upload expects {} bytes, got {}",
                expected,
                data.len()
            )));
        }
        self.backend.lock().unwrap().write_texture(self.color, data)
    }

    /// Logical width in pixels (per eye when stereo)
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Physical width of the color attachment (doubled when stereo)
    pub fn pixel_width(&self) -> u32 {
        if self.stereo {
            self.width * 2
        } else {
            self.width
        }
    }

    /// Color attachment format
    pub fn format(&self) -> TextureFormat {
        self.format
    }

    /// Sample count (1 = no multisampling)
    pub fn msaa(&self) -> u32 {
        self.msaa
    }

    /// True if this canvas renders two eye views side by side
    pub fn stereo(&self) -> bool {
        self.stereo
    }

    /// True once `destroy()` has run
    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Handle of the color texture (the resolved image when multisampled)
    pub fn color_texture(&self) -> TextureHandle {
        self.color
    }
}

impl Drop for Canvas {
    fn drop(&mut self) {
        if self.destroyed {
            return;
        }
        let backend = Arc::clone(&self.backend);
        if let Ok(mut guard) = backend.lock() {
            self.release(&mut *guard);
        };
    }
}

#[cfg(test)]
#[path = "canvas_tests.rs"]
mod tests;

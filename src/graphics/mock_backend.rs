//! Mock GPU backend for unit tests (no GPU required)
//!
//! Tracks every create/delete/blit/upload call so tests can assert that
//! canvas creation is atomic, destruction releases everything, and resolve
//! issues exactly the expected blits. Allocation failures can be injected to
//! exercise rollback paths.

use slotmap::SlotMap;

use crate::error::{Error, Result};
use crate::graphics::backend::{
    ColorAttachment, FramebufferDesc, FramebufferHandle, GpuBackend, RenderbufferDesc,
    RenderbufferHandle, RenderbufferKind, TextureDesc, TextureHandle,
};
use crate::graphics::format::TextureFormat;

/// Counting mock implementation of [`GpuBackend`]
pub struct MockGpuBackend {
    formats: Vec<TextureFormat>,
    textures: SlotMap<TextureHandle, TextureDesc>,
    renderbuffers: SlotMap<RenderbufferHandle, RenderbufferDesc>,
    framebuffers: SlotMap<FramebufferHandle, FramebufferDesc>,
    /// Successful create_* calls, lifetime total
    pub allocation_count: usize,
    /// Renderbuffer allocations with a depth/stencil kind
    pub depth_stencil_allocation_count: usize,
    /// blit_framebuffer calls
    pub blit_count: usize,
    /// write_texture calls
    pub write_count: usize,
    /// When Some(n), the (n+1)-th allocation from now fails with OutOfMemory
    fail_after: Option<usize>,
}

impl MockGpuBackend {
    /// Mock supporting every format except `R32G32B32A32_FLOAT`
    ///
    /// The excluded format gives tests a driver-rejected format to probe
    /// the validator with.
    pub fn new() -> Self {
        let formats = TextureFormat::all()
            .iter()
            .copied()
            .filter(|f| *f != TextureFormat::R32G32B32A32_FLOAT)
            .collect();
        Self::with_formats(formats)
    }

    /// Mock supporting exactly the given formats
    pub fn with_formats(formats: Vec<TextureFormat>) -> Self {
        Self {
            formats,
            textures: SlotMap::with_key(),
            renderbuffers: SlotMap::with_key(),
            framebuffers: SlotMap::with_key(),
            allocation_count: 0,
            depth_stencil_allocation_count: 0,
            blit_count: 0,
            write_count: 0,
            fail_after: None,
        }
    }

    /// Make the (n+1)-th allocation from now fail with OutOfMemory
    pub fn fail_after(&mut self, n: usize) {
        self.fail_after = Some(n);
    }

    /// Number of currently live GPU objects
    pub fn live_object_count(&self) -> usize {
        self.textures.len() + self.renderbuffers.len() + self.framebuffers.len()
    }

    /// Descriptor of a live texture, if the handle is valid
    pub fn texture_desc(&self, handle: TextureHandle) -> Option<&TextureDesc> {
        self.textures.get(handle)
    }

    /// Descriptor of a live renderbuffer, if the handle is valid
    pub fn renderbuffer_desc(&self, handle: RenderbufferHandle) -> Option<&RenderbufferDesc> {
        self.renderbuffers.get(handle)
    }

    /// Injected-failure bookkeeping shared by the create_* methods
    fn take_allocation(&mut self) -> Result<()> {
        if let Some(remaining) = self.fail_after {
            if remaining == 0 {
                self.fail_after = None;
                return Err(Error::OutOfMemory);
            }
            self.fail_after = Some(remaining - 1);
        }
        self.allocation_count += 1;
        Ok(())
    }
}

impl Default for MockGpuBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl GpuBackend for MockGpuBackend {
    fn supported_formats(&self) -> Vec<TextureFormat> {
        self.formats.clone()
    }

    fn create_texture(&mut self, desc: &TextureDesc) -> Result<TextureHandle> {
        if !self.formats.contains(&desc.format) {
            return Err(Error::BackendError(format!(
                "mock does not support {:?}",
                desc.format
            )));
        }
        self.take_allocation()?;
        Ok(self.textures.insert(*desc))
    }

    fn delete_texture(&mut self, handle: TextureHandle) {
        self.textures.remove(handle);
    }

    fn write_texture(&mut self, handle: TextureHandle, data: &[u8]) -> Result<()> {
        let desc = self
            .textures
            .get(handle)
            .ok_or_else(|| Error::BackendError("write to unknown texture".to_string()))?;
        let expected =
            desc.width as usize * desc.height as usize * desc.format.bytes_per_pixel() as usize;
        if data.len() != expected {
            return Err(Error::BackendError(format!(
                "write of {} bytes into {}-byte texture",
                data.len(),
                expected
            )));
        }
        self.write_count += 1;
        Ok(())
    }

    fn create_renderbuffer(&mut self, desc: &RenderbufferDesc) -> Result<RenderbufferHandle> {
        self.take_allocation()?;
        if matches!(desc.kind, RenderbufferKind::DepthStencil(_)) {
            self.depth_stencil_allocation_count += 1;
        }
        Ok(self.renderbuffers.insert(*desc))
    }

    fn delete_renderbuffer(&mut self, handle: RenderbufferHandle) {
        self.renderbuffers.remove(handle);
    }

    fn create_framebuffer(&mut self, desc: &FramebufferDesc) -> Result<FramebufferHandle> {
        // A framebuffer must not reference dead attachments
        let color_alive = match desc.color {
            ColorAttachment::Texture(t) => self.textures.contains_key(t),
            ColorAttachment::Renderbuffer(rb) => self.renderbuffers.contains_key(rb),
        };
        if !color_alive {
            return Err(Error::BackendError(
                "framebuffer references dead color attachment".to_string(),
            ));
        }
        if let Some(ds) = desc.depth_stencil {
            if !self.renderbuffers.contains_key(ds) {
                return Err(Error::BackendError(
                    "framebuffer references dead depth/stencil attachment".to_string(),
                ));
            }
        }
        self.take_allocation()?;
        Ok(self.framebuffers.insert(*desc))
    }

    fn delete_framebuffer(&mut self, handle: FramebufferHandle) {
        self.framebuffers.remove(handle);
    }

    fn blit_framebuffer(
        &mut self,
        src: FramebufferHandle,
        dst: FramebufferHandle,
        _width: u32,
        _height: u32,
    ) -> Result<()> {
        if !self.framebuffers.contains_key(src) || !self.framebuffers.contains_key(dst) {
            return Err(Error::BackendError(
                "blit references dead framebuffer".to_string(),
            ));
        }
        self.blit_count += 1;
        Ok(())
    }
}

#[cfg(test)]
#[path = "mock_backend_tests.rs"]
mod tests;

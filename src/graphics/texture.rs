//! Owned GPU texture wrapper
//!
//! Wraps an opaque backend texture handle in an ownership type that releases
//! the object on every exit path, replacing manual matched create/delete
//! call pairs. Standalone textures are used to feed initial contents into
//! render targets and as sampled inputs elsewhere in the pipeline.

use std::path::Path;
use std::sync::{Arc, Mutex};

use crate::error::{Error, Result};
use crate::fs::Filesystem;
use crate::graphics::backend::{GpuBackend, TextureDesc, TextureHandle};
use crate::graphics::format::TextureFormat;
use crate::nebula_debug;

/// Owned single-sampled GPU texture
///
/// The backend object is deleted when the texture is dropped.
pub struct Texture {
    backend: Arc<Mutex<dyn GpuBackend>>,
    handle: TextureHandle,
    desc: TextureDesc,
}

impl Texture {
    /// Allocate an empty texture
    pub fn new(backend: &Arc<Mutex<dyn GpuBackend>>, desc: TextureDesc) -> Result<Texture> {
        let handle = backend.lock().unwrap().create_texture(&desc)?;
        Ok(Texture {
            backend: Arc::clone(backend),
            handle,
            desc,
        })
    }

    /// Allocate a texture and fill it with raw pixel bytes from a file
    ///
    /// The file length is validated against `width * height *
    /// bytes_per_pixel` via [`Filesystem::stat`] before anything is read or
    /// allocated; a short or oversized file is rejected with
    /// [`Error::Io`]. On upload failure the allocation is rolled back.
    pub fn from_file(
        backend: &Arc<Mutex<dyn GpuBackend>>,
        fs: &dyn Filesystem,
        path: &Path,
        width: u32,
        height: u32,
        format: TextureFormat,
    ) -> Result<Texture> {
        let expected = u64::from(width) * u64::from(height) * u64::from(format.bytes_per_pixel());
        let info = fs.stat(path)?;
        if info.is_directory {
            return Err(Error::Io(format!("{}: is a directory", path.display())));
        }
        if info.size != expected {
            return Err(Error::Io(format!(
                "{}: expected {} bytes of {:?} pixels, file has {}",
                path.display(),
                expected,
                format,
                info.size
            )));
        }

        let data = fs.read_file(path)?;
        let desc = TextureDesc {
            width,
            height,
            format,
        };
        let mut guard = backend.lock().unwrap();
        let handle = guard.create_texture(&desc)?;
        if let Err(e) = guard.write_texture(handle, &data) {
            guard.delete_texture(handle);
            return Err(e);
        }
        drop(guard);

        nebula_debug!(
            "nebula::Texture",
            "Loaded {}x{} {:?} texture from {}",
            width,
            height,
            format,
            path.display()
        );
        Ok(Texture {
            backend: Arc::clone(backend),
            handle,
            desc,
        })
    }

    /// Upload raw pixel bytes, replacing the full contents
    pub fn upload(&mut self, data: &[u8]) -> Result<()> {
        let expected = self.desc.width as usize
            * self.desc.height as usize
            * self.desc.format.bytes_per_pixel() as usize;
        if data.len() != expected {
            return Err(Error::InvalidState(format!(
                "texture upload expects {} bytes, got {}",
                expected,
                data.len()
            )));
        }
        self.backend.lock().unwrap().write_texture(self.handle, data)
    }

    /// Width in pixels
    pub fn width(&self) -> u32 {
        self.desc.width
    }

    /// Height in pixels
    pub fn height(&self) -> u32 {
        self.desc.height
    }

    /// Pixel format
    pub fn format(&self) -> TextureFormat {
        self.desc.format
    }

    /// Opaque backend handle
    pub fn handle(&self) -> TextureHandle {
        self.handle
    }
}

impl Drop for Texture {
    fn drop(&mut self) {
        if let Ok(mut guard) = self.backend.lock() {
            guard.delete_texture(self.handle);
        }
    }
}

#[cfg(test)]
#[path = "texture_tests.rs"]
mod tests;

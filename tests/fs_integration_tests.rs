//! Integration tests for the filesystem boundary feeding render targets
//!
//! Verifies that pixel data on disk flows through `StdFilesystem` into a
//! texture and onward into a canvas color attachment.

use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use slotmap::SlotMap;

use nebula_vr_engine::nebula::fs::{Filesystem, StdFilesystem};
use nebula_vr_engine::nebula::graphics::{
    Canvas, CanvasDesc, FormatCaps, FramebufferDesc, FramebufferHandle,
    GpuBackend, RenderbufferDesc, RenderbufferHandle, Texture, TextureDesc, TextureFormat,
    TextureHandle,
};
use nebula_vr_engine::nebula::{Error, Result};

/// Backend that stores uploaded pixel bytes so tests can read them back
struct CapturingBackend {
    textures: SlotMap<TextureHandle, (TextureDesc, Vec<u8>)>,
    renderbuffers: SlotMap<RenderbufferHandle, RenderbufferDesc>,
    framebuffers: SlotMap<FramebufferHandle, FramebufferDesc>,
}

impl CapturingBackend {
    fn new() -> Self {
        Self {
            textures: SlotMap::with_key(),
            renderbuffers: SlotMap::with_key(),
            framebuffers: SlotMap::with_key(),
        }
    }
}

impl GpuBackend for CapturingBackend {
    fn supported_formats(&self) -> Vec<TextureFormat> {
        vec![TextureFormat::R8G8B8A8_UNORM]
    }

    fn create_texture(&mut self, desc: &TextureDesc) -> Result<TextureHandle> {
        Ok(self.textures.insert((*desc, Vec::new())))
    }

    fn delete_texture(&mut self, handle: TextureHandle) {
        self.textures.remove(handle);
    }

    fn write_texture(&mut self, handle: TextureHandle, data: &[u8]) -> Result<()> {
        let slot = self
            .textures
            .get_mut(handle)
            .ok_or_else(|| Error::BackendError("unknown texture".to_string()))?;
        slot.1 = data.to_vec();
        Ok(())
    }

    fn create_renderbuffer(&mut self, desc: &RenderbufferDesc) -> Result<RenderbufferHandle> {
        Ok(self.renderbuffers.insert(*desc))
    }

    fn delete_renderbuffer(&mut self, handle: RenderbufferHandle) {
        self.renderbuffers.remove(handle);
    }

    fn create_framebuffer(&mut self, desc: &FramebufferDesc) -> Result<FramebufferHandle> {
        Ok(self.framebuffers.insert(*desc))
    }

    fn delete_framebuffer(&mut self, handle: FramebufferHandle) {
        self.framebuffers.remove(handle);
    }

    fn blit_framebuffer(
        &mut self,
        _src: FramebufferHandle,
        _dst: FramebufferHandle,
        _width: u32,
        _height: u32,
    ) -> Result<()> {
        Ok(())
    }
}

fn temp_file(name: &str, data: &[u8]) -> PathBuf {
    let path =
        std::env::temp_dir().join(format!("nebula_fs_it_{}_{}", std::process::id(), name));
    fs::write(&path, data).unwrap();
    path
}

#[test]
fn test_integration_texture_from_disk() {
    let backend = Arc::new(Mutex::new(CapturingBackend::new()));
    let dyn_backend: Arc<Mutex<dyn GpuBackend>> = backend.clone();

    let pixels: Vec<u8> = (0..2 * 2 * 4).map(|i| i as u8).collect();
    let path = temp_file("texture.raw", &pixels);

    let texture = Texture::from_file(
        &dyn_backend,
        &StdFilesystem,
        &path,
        2,
        2,
        TextureFormat::R8G8B8A8_UNORM,
    )
    .unwrap();

    let uploaded = backend
        .lock()
        .unwrap()
        .textures
        .get(texture.handle())
        .unwrap()
        .1
        .clone();
    assert_eq!(uploaded, pixels);

    fs::remove_file(&path).unwrap();
}

#[test]
fn test_integration_canvas_seeded_from_disk() {
    let backend = Arc::new(Mutex::new(CapturingBackend::new()));
    let dyn_backend: Arc<Mutex<dyn GpuBackend>> = backend.clone();
    let caps = FormatCaps::query(&*dyn_backend.lock().unwrap());

    let pixels = vec![0x7Fu8; 4 * 4 * 4];
    let path = temp_file("canvas_seed.raw", &pixels);

    let mut canvas = Canvas::create(
        &dyn_backend,
        &caps,
        &CanvasDesc::new(4, 4, TextureFormat::R8G8B8A8_UNORM),
    )
    .unwrap();

    // Stat first, then read: the canvas only accepts an exact-sized seed
    let info = StdFilesystem.stat(&path).unwrap();
    assert_eq!(info.size, pixels.len() as u64);
    let data = StdFilesystem.read_file(&path).unwrap();
    canvas.write_color(&data).unwrap();

    let seeded = backend
        .lock()
        .unwrap()
        .textures
        .get(canvas.color_texture())
        .unwrap()
        .1
        .clone();
    assert_eq!(seeded, pixels);

    canvas.destroy().unwrap();
    fs::remove_file(&path).unwrap();
}

#[test]
fn test_integration_truncated_file_never_reaches_gpu() {
    let backend = Arc::new(Mutex::new(CapturingBackend::new()));
    let dyn_backend: Arc<Mutex<dyn GpuBackend>> = backend.clone();

    let path = temp_file("truncated.raw", &[0u8; 5]);

    let result = Texture::from_file(
        &dyn_backend,
        &StdFilesystem,
        &path,
        4,
        4,
        TextureFormat::R8G8B8A8_UNORM,
    );

    assert!(matches!(result, Err(Error::Io(_))));
    assert!(backend.lock().unwrap().textures.is_empty());

    fs::remove_file(&path).unwrap();
}

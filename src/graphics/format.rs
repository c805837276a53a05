//! Pixel formats and the render-target capability table

use rustc_hash::FxHashSet;

use crate::graphics::backend::GpuBackend;

/// Color attachment format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(non_camel_case_types)]
pub enum TextureFormat {
    R8G8B8A8_UNORM,
    R8G8B8A8_SRGB,
    B8G8R8A8_UNORM,
    R10G10B10A2_UNORM,
    R11G11B10_FLOAT,
    R16G16B16A16_FLOAT,
    R32G32B32A32_FLOAT,
}

impl TextureFormat {
    /// Size of one pixel in bytes
    pub fn bytes_per_pixel(self) -> u32 {
        match self {
            TextureFormat::R8G8B8A8_UNORM
            | TextureFormat::R8G8B8A8_SRGB
            | TextureFormat::B8G8R8A8_UNORM
            | TextureFormat::R10G10B10A2_UNORM
            | TextureFormat::R11G11B10_FLOAT => 4,
            TextureFormat::R16G16B16A16_FLOAT => 8,
            TextureFormat::R32G32B32A32_FLOAT => 16,
        }
    }

    /// All color formats the engine knows about
    pub fn all() -> &'static [TextureFormat] {
        &[
            TextureFormat::R8G8B8A8_UNORM,
            TextureFormat::R8G8B8A8_SRGB,
            TextureFormat::B8G8R8A8_UNORM,
            TextureFormat::R10G10B10A2_UNORM,
            TextureFormat::R11G11B10_FLOAT,
            TextureFormat::R16G16B16A16_FLOAT,
            TextureFormat::R32G32B32A32_FLOAT,
        ]
    }
}

/// Depth/stencil attachment format
///
/// A canvas requesting depth and/or stencil gets exactly one combined
/// allocation; the format is chosen from the requested components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(non_camel_case_types)]
pub enum DepthStencilFormat {
    /// Depth only
    D24_UNORM,
    /// Combined depth + stencil
    D24_UNORM_S8_UINT,
}

/// Render-target format capability table
///
/// Built once from the backend's driver-reported capabilities at
/// initialization time and passed explicitly to canvas creation. Pure
/// queries, no side effects, no global state.
#[derive(Debug, Clone)]
pub struct FormatCaps {
    supported: FxHashSet<TextureFormat>,
}

impl FormatCaps {
    /// Query the backend's supported render-target formats
    pub fn query(backend: &dyn GpuBackend) -> Self {
        Self {
            supported: backend.supported_formats().into_iter().collect(),
        }
    }

    /// Build a table from an explicit format list (tests, software backends)
    pub fn from_formats(formats: &[TextureFormat]) -> Self {
        Self {
            supported: formats.iter().copied().collect(),
        }
    }

    /// True if `format` is usable as a canvas color attachment
    pub fn supports(&self, format: TextureFormat) -> bool {
        self.supported.contains(&format)
    }

    /// Number of supported formats
    pub fn len(&self) -> usize {
        self.supported.len()
    }

    /// True if no format is supported
    pub fn is_empty(&self) -> bool {
        self.supported.is_empty()
    }
}

#[cfg(test)]
#[path = "format_tests.rs"]
mod tests;

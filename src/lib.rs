/*!
# Nebula VR Engine

Render-target core for the Nebula VR rendering engine.

This crate provides the platform-agnostic canvas (off-screen render target)
layer: creation, format validation, MSAA resolve, and teardown of GPU color
and depth/stencil attachments. Backend implementations (OpenGL, Vulkan, etc.)
plug in behind the `GpuBackend` trait; the crate itself never talks to a
driver directly.

## Architecture

- **GpuBackend**: opaque create/delete/blit surface implemented per backend
- **FormatCaps**: capability table queried once at backend initialization
- **Canvas**: owned off-screen target with optional MSAA and stereo output
- **CanvasManager**: named canvas registry for the rest of the engine
- **Filesystem**: byte-oriented collaborator used to seed initial contents

All canvas operations run on the thread that owns the graphics context;
callers needing cross-thread access serialize through the `Arc<Mutex<_>>`
backend handle.
*/

// Internal modules
mod error;
pub mod fs;
pub mod graphics;
pub mod log;

// Main nebula namespace module
pub mod nebula {
    // Error types
    pub use crate::error::{Error, Result};

    // Logging sub-module (types only, NOT macros)
    pub mod log {
        pub use crate::log::{DefaultLogger, LogEntry, LogSeverity, Logger};
        // Note: nebula_* macros are NOT re-exported here - they are internal only
    }

    // Graphics sub-module with all render-target types
    pub mod graphics {
        pub use crate::graphics::*;
    }

    // Filesystem sub-module
    pub mod fs {
        pub use crate::fs::{FileInfo, Filesystem, StdFilesystem};
    }
}

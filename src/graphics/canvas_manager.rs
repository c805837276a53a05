//! Central canvas registry for the engine
//!
//! Manages named canvases over one GPU backend. Multiple canvases can exist
//! simultaneously (eye targets, mirror window, shadow maps, post-processing
//! buffers, etc.). The format capability table is queried once, when the
//! manager is created, and reused for every canvas.

use std::sync::{Arc, Mutex};

use rustc_hash::FxHashMap;

use crate::error::Result;
use crate::graphics::backend::GpuBackend;
use crate::graphics::canvas::{Canvas, CanvasDesc};
use crate::graphics::format::FormatCaps;
use crate::{nebula_bail, nebula_info};

/// Named canvas registry (managed by the engine, one per backend)
pub struct CanvasManager {
    backend: Arc<Mutex<dyn GpuBackend>>,
    caps: FormatCaps,
    canvases: FxHashMap<String, Canvas>,
}

impl CanvasManager {
    /// Create a manager over `backend`, querying its format capabilities once
    pub fn new(backend: Arc<Mutex<dyn GpuBackend>>) -> Self {
        let caps = FormatCaps::query(&*backend.lock().unwrap());
        nebula_info!(
            "nebula::CanvasManager",
            "Backend reports {} usable render target formats",
            caps.len()
        );
        Self {
            backend,
            caps,
            canvases: FxHashMap::default(),
        }
    }

    /// The capability table queried at construction
    pub fn caps(&self) -> &FormatCaps {
        &self.caps
    }

    /// Create a new named canvas
    ///
    /// Returns a reference to the created canvas.
    ///
    /// # Errors
    ///
    /// Returns an error if a canvas with the same name already exists, or if
    /// [`Canvas::create`] rejects the descriptor.
    pub fn create_canvas(&mut self, name: &str, desc: &CanvasDesc) -> Result<&Canvas> {
        if self.canvases.contains_key(name) {
            nebula_bail!("nebula::CanvasManager", "Canvas '{}' already exists", name);
        }

        let canvas = Canvas::create(&self.backend, &self.caps, desc)?;
        self.canvases.insert(name.to_string(), canvas);
        Ok(self.canvases.get(name).unwrap())
    }

    /// Get a canvas by name
    pub fn canvas(&self, name: &str) -> Option<&Canvas> {
        self.canvases.get(name)
    }

    /// Get a mutable canvas by name
    pub fn canvas_mut(&mut self, name: &str) -> Option<&mut Canvas> {
        self.canvases.get_mut(name)
    }

    /// Remove a canvas by name
    ///
    /// Returns the removed canvas, or None if not found. The canvas releases
    /// its GPU objects when dropped (or on an explicit `destroy()`).
    pub fn remove_canvas(&mut self, name: &str) -> Option<Canvas> {
        self.canvases.remove(name)
    }

    /// Get the number of canvases
    pub fn canvas_count(&self) -> usize {
        self.canvases.len()
    }

    /// Get all canvas names
    pub fn canvas_names(&self) -> Vec<&str> {
        self.canvases.keys().map(|k| k.as_str()).collect()
    }

    /// Remove all canvases, releasing their GPU objects
    pub fn clear(&mut self) {
        self.canvases.clear();
    }
}

#[cfg(test)]
#[path = "canvas_manager_tests.rs"]
mod tests;

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::Receiver;
use std::sync::{Arc, Mutex};

use mosaic_common::error::{MosaicError, MosaicResult};
use mosaic_render_engine::RenderSurface;

/// A surface that fails above a pixel count and records every resize.
pub struct MockSurface {
    pub width: u32,
    pub height: u32,
    pub scale: (f64, f64),
    /// Resizes above this many pixels fail.
    pub max_pixels: u64,
    /// Encodes fail regardless of size.
    pub fail_encode: bool,
    pub resizes: Vec<(u32, u32)>,
    pub encodes: Arc<AtomicUsize>,
    /// First encode blocks until this receives a message.
    pub gate: Mutex<Option<Receiver<()>>>,
}

impl MockSurface {
    pub fn new(width: u32, height: u32, scale: f64) -> Self {
        Self {
            width,
            height,
            scale: (scale, scale),
            max_pixels: u64::MAX,
            fail_encode: false,
            resizes: Vec::new(),
            encodes: Arc::new(AtomicUsize::new(0)),
            gate: Mutex::new(None),
        }
    }

    pub fn with_max_pixels(mut self, max_pixels: u64) -> Self {
        self.max_pixels = max_pixels;
        self
    }

    pub fn with_gate(self, gate: Receiver<()>) -> Self {
        *self.gate.lock().unwrap() = Some(gate);
        self
    }
}

impl RenderSurface for MockSurface {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn scale(&self) -> (f64, f64) {
        self.scale
    }

    fn resize(&mut self, width: u32, height: u32) -> MosaicResult<()> {
        self.resizes.push((width, height));
        self.width = width;
        self.height = height;
        Ok(())
    }

    fn set_scale(&mut self, scale_x: f64, scale_y: f64) {
        self.scale = (scale_x, scale_y);
    }

    fn force_redraw(&mut self) -> MosaicResult<()> {
        let pixels = self.width as u64 * self.height as u64;
        if pixels > self.max_pixels {
            return Err(MosaicError::render(format!(
                "{}x{} exceeds {} px",
                self.width, self.height, self.max_pixels
            )));
        }
        Ok(())
    }

    fn encode(&mut self, _mime: &str, quality: f32) -> MosaicResult<Vec<u8>> {
        self.encodes.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = self.gate.lock().unwrap().take() {
            gate.recv().ok();
        }
        if self.fail_encode {
            return Err(MosaicError::encode(format!(
                "encoder refused {}x{}",
                self.width, self.height
            )));
        }
        let len = (self.width as f64 * self.height as f64 * quality as f64).round() as usize;
        Ok(vec![0xAB; len])
    }
}

//! The render surface contract used by the exporter and the size estimator.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use mosaic_common::error::MosaicResult;

/// Size and draw scale of a surface, captured so it can be put back.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceState {
    pub width: u32,
    pub height: u32,
    pub scale_x: f64,
    pub scale_y: f64,
}

/// A single mutable raster target.
///
/// There is one surface per collage; whoever resizes it owns it until the
/// previous [`SurfaceState`] has been restored.
pub trait RenderSurface: Send {
    /// Current pixel size.
    fn size(&self) -> (u32, u32);

    /// Current draw scale (frame units to pixels).
    fn scale(&self) -> (f64, f64);

    /// Change the pixel size. Fails when the platform cannot allocate it.
    fn resize(&mut self, width: u32, height: u32) -> MosaicResult<()>;

    /// Change the draw scale.
    fn set_scale(&mut self, scale_x: f64, scale_y: f64);

    /// Rasterize the scene at the current size and scale.
    fn force_redraw(&mut self) -> MosaicResult<()>;

    /// Encode the current raster.
    fn encode(&mut self, mime: &str, quality: f32) -> MosaicResult<Vec<u8>>;

    /// Encode as a base64 `data:` URL.
    fn encode_data_url(&mut self, mime: &str, quality: f32) -> MosaicResult<String> {
        let bytes = self.encode(mime, quality)?;
        Ok(format!("data:{mime};base64,{}", STANDARD.encode(bytes)))
    }

    fn snapshot(&self) -> SurfaceState {
        let (width, height) = self.size();
        let (scale_x, scale_y) = self.scale();
        SurfaceState {
            width,
            height,
            scale_x,
            scale_y,
        }
    }

    /// Return to a previously captured state and redraw.
    fn restore(&mut self, state: &SurfaceState) -> MosaicResult<()> {
        self.resize(state.width, state.height)?;
        self.set_scale(state.scale_x, state.scale_y);
        self.force_redraw()
    }
}

/// Decoded byte length of a base64 `data:` URL payload.
///
/// Returns `None` when the input has no `,` separator.
pub fn inline_payload_len(data_url: &str) -> Option<usize> {
    let (_, payload) = data_url.split_once(',')?;
    let payload = payload.trim_end();
    let padding = payload.bytes().rev().take_while(|b| *b == b'=').count();
    Some((payload.len() * 3 / 4).saturating_sub(padding))
}

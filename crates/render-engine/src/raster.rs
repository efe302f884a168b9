//! CPU raster surface backed by `image::RgbImage`.

use std::collections::HashMap;

use image::codecs::jpeg::JpegEncoder;
use image::imageops::{self, FilterType};
use image::{Rgb, RgbImage};

use mosaic_assets::AssetLease;
use mosaic_common::error::{MosaicError, MosaicResult};
use mosaic_common::naming::EXPORT_MIME;
use mosaic_layout::FrameGeometry;
use mosaic_project_model::FrameStyle;

/// Fill used for layout items whose photo is not loaded.
const PLACEHOLDER: Rgb<u8> = Rgb([200, 200, 200]);

/// Draws a framed collage into an in-memory RGB raster.
pub struct RasterSurface {
    frame: FrameGeometry,
    style: FrameStyle,
    photos: HashMap<String, AssetLease>,
    width: u32,
    height: u32,
    scale: (f64, f64),
    raster_ceiling: Option<u64>,
    canvas: Option<RgbImage>,
}

impl RasterSurface {
    /// A surface at full frame resolution.
    pub fn new(frame: FrameGeometry, style: FrameStyle, photos: Vec<AssetLease>) -> Self {
        Self::with_scale(frame, style, photos, 1.0)
    }

    /// A surface rendering the frame at `scale` (e.g. an interactive preview).
    pub fn with_scale(
        frame: FrameGeometry,
        style: FrameStyle,
        photos: Vec<AssetLease>,
        scale: f64,
    ) -> Self {
        let scale = if scale.is_finite() && scale > 0.0 {
            scale
        } else {
            1.0
        };
        let width = scaled_extent(frame.width, scale);
        let height = scaled_extent(frame.height, scale);
        Self {
            frame,
            style,
            photos: photos
                .into_iter()
                .map(|lease| (lease.id.clone(), lease))
                .collect(),
            width,
            height,
            scale: (scale, scale),
            raster_ceiling: None,
            canvas: None,
        }
    }

    /// Refuse to allocate rasters above `pixels`, like a platform rasterizer would.
    pub fn with_raster_ceiling(mut self, pixels: u64) -> Self {
        self.raster_ceiling = Some(pixels);
        self
    }

    /// The last rasterized image, if any.
    pub fn canvas(&self) -> Option<&RgbImage> {
        self.canvas.as_ref()
    }

    fn check_ceiling(&self, width: u32, height: u32) -> MosaicResult<()> {
        if width == 0 || height == 0 {
            return Err(MosaicError::render(format!(
                "cannot rasterize an empty {width}x{height} surface"
            )));
        }
        if let Some(ceiling) = self.raster_ceiling {
            let pixels = width as u64 * height as u64;
            if pixels > ceiling {
                return Err(MosaicError::render(format!(
                    "{width}x{height} surface ({pixels} px) exceeds raster ceiling of {ceiling} px"
                )));
            }
        }
        Ok(())
    }

    fn draw(&self) -> RgbImage {
        let (sx, sy) = self.scale;
        let mut canvas = RgbImage::from_pixel(self.width, self.height, Rgb(self.style.background));

        if let Some(footer) = &self.frame.footer {
            fill_rect(
                &mut canvas,
                footer.x * sx,
                footer.y * sy,
                footer.width * sx,
                footer.height * sy,
                Rgb(self.style.footer_color),
            );
        }

        for item in &self.frame.items {
            let x = (item.x * sx).round();
            let y = (item.y * sy).round();
            let w = ((item.x + item.width) * sx).round() - x;
            let h = ((item.y + item.height) * sy).round() - y;
            if w < 1.0 || h < 1.0 {
                continue;
            }

            match self.photos.get(&item.id) {
                Some(lease) => {
                    let resized =
                        imageops::resize(&lease.pixels, w as u32, h as u32, FilterType::Triangle);
                    imageops::replace(&mut canvas, &resized, x as i64, y as i64);
                }
                None => fill_rect(&mut canvas, x, y, w, h, PLACEHOLDER),
            }
        }

        canvas
    }
}

impl crate::surface::RenderSurface for RasterSurface {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn scale(&self) -> (f64, f64) {
        self.scale
    }

    fn resize(&mut self, width: u32, height: u32) -> MosaicResult<()> {
        self.check_ceiling(width, height)?;
        self.width = width;
        self.height = height;
        self.canvas = None;
        Ok(())
    }

    fn set_scale(&mut self, scale_x: f64, scale_y: f64) {
        self.scale = (scale_x, scale_y);
        self.canvas = None;
    }

    fn force_redraw(&mut self) -> MosaicResult<()> {
        self.check_ceiling(self.width, self.height)?;
        self.canvas = Some(self.draw());
        Ok(())
    }

    fn encode(&mut self, mime: &str, quality: f32) -> MosaicResult<Vec<u8>> {
        if mime != EXPORT_MIME {
            return Err(MosaicError::unsupported(format!(
                "cannot encode {mime}, only {EXPORT_MIME} is supported"
            )));
        }
        if self.canvas.is_none() {
            self.force_redraw()?;
        }
        let canvas = self
            .canvas
            .as_ref()
            .ok_or_else(|| MosaicError::render("surface has no raster"))?;

        let mut buf = Vec::new();
        let mut encoder = JpegEncoder::new_with_quality(&mut buf, jpeg_quality(quality));
        encoder
            .encode_image(canvas)
            .map_err(|e| MosaicError::encode(e.to_string()))?;
        Ok(buf)
    }
}

/// Map `(0, 1]` onto the encoder's `1..=100`.
fn jpeg_quality(quality: f32) -> u8 {
    if !quality.is_finite() {
        return 92;
    }
    (quality * 100.0).round().clamp(1.0, 100.0) as u8
}

fn scaled_extent(extent: f64, scale: f64) -> u32 {
    let pixels = (extent * scale).round();
    if pixels.is_finite() && pixels > 0.0 {
        pixels.min(u32::MAX as f64) as u32
    } else {
        0
    }
}

fn fill_rect(canvas: &mut RgbImage, x: f64, y: f64, w: f64, h: f64, color: Rgb<u8>) {
    let x0 = x.round().max(0.0) as u32;
    let y0 = y.round().max(0.0) as u32;
    let x1 = ((x + w).round().max(0.0) as u32).min(canvas.width());
    let y1 = ((y + h).round().max(0.0) as u32).min(canvas.height());
    for py in y0..y1 {
        for px in x0..x1 {
            canvas.put_pixel(px, py, color);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use mosaic_assets::{AssetStore, DecodedImage, ImageDecoder};
    use mosaic_layout::compute_masonry;

    use super::*;
    use crate::surface::RenderSurface;

    fn surface_with_one_photo(padding: f64, footer: f64) -> (AssetStore, RasterSurface) {
        let mut store = AssetStore::new(Arc::new(ImageDecoder::new(4096)));
        store
            .insert(DecodedImage::new(
                "red",
                RgbImage::from_pixel(20, 10, Rgb([255, 0, 0])),
            ))
            .unwrap();

        let layout = compute_masonry(&store.photos(), 1, 0.0, 100.0);
        let style = FrameStyle {
            padding,
            footer_height: footer,
            background: [0, 0, 255],
            footer_color: [0, 255, 0],
        };
        let frame = FrameGeometry::new(&layout, &style);
        let surface = RasterSurface::new(frame, style, store.leases());
        (store, surface)
    }

    #[test]
    fn test_draws_background_photo_and_footer() {
        let (_store, mut surface) = surface_with_one_photo(10.0, 20.0);
        assert_eq!(surface.size(), (120, 90));
        surface.force_redraw().unwrap();

        let canvas = surface.canvas().unwrap();
        assert_eq!(canvas.get_pixel(2, 2).0, [0, 0, 255]);
        assert_eq!(canvas.get_pixel(60, 30).0, [255, 0, 0]);
        assert_eq!(canvas.get_pixel(60, 85).0, [0, 255, 0]);
    }

    #[test]
    fn test_encode_produces_jpeg_at_current_size() {
        let (_store, mut surface) = surface_with_one_photo(0.0, 0.0);
        surface.resize(50, 25).unwrap();
        surface.set_scale(0.5, 0.5);
        surface.force_redraw().unwrap();

        let bytes = surface.encode(EXPORT_MIME, 0.9).unwrap();
        assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (50, 25));
    }

    #[test]
    fn test_raster_ceiling_rejects_large_surfaces() {
        let (_store, surface) = surface_with_one_photo(0.0, 0.0);
        let mut surface = surface.with_raster_ceiling(1000);
        let err = surface.resize(100, 50).unwrap_err();
        assert!(err.to_string().contains("exceeds raster ceiling"));
        assert!(surface.resize(40, 20).is_ok());
    }

    #[test]
    fn test_only_jpeg_is_supported() {
        let (_store, mut surface) = surface_with_one_photo(0.0, 0.0);
        assert!(matches!(
            surface.encode("image/png", 0.9),
            Err(MosaicError::Unsupported { .. })
        ));
    }

    #[test]
    fn test_jpeg_quality_mapping() {
        assert_eq!(jpeg_quality(1.0), 100);
        assert_eq!(jpeg_quality(0.0), 1);
        assert_eq!(jpeg_quality(0.92), 92);
        assert_eq!(jpeg_quality(f32::NAN), 92);
    }
}

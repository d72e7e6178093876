//! QR code rasterization for the video-pitch link.
//!
//! The code is drawn as a grayscale PNG, staged in a scoped temporary file, and
//! read back as the raster the canvas embeds. The staged file is owned by a
//! `NamedTempFile`, so it is removed on every exit path.

use std::io::Write;
use std::path::Path;

use image::{GrayImage, ImageFormat, Luma};
use qrcode::{Color, EcLevel, QrCode};
use tempfile::NamedTempFile;

use crate::render::pdf::GrayRaster;
use crate::render::RenderError;

/// Pixels per QR module.
pub const BOX_SIZE: u32 = 10;
/// Quiet-zone width in modules.
pub const BORDER_MODULES: u32 = 2;

const DARK: Luma<u8> = Luma([0]);
const LIGHT: Luma<u8> = Luma([255]);

/// Encodes `data` as a QR code image (error correction M).
///
/// No validation of the payload is done: any non-empty string that fits the
/// largest QR version is accepted.
pub fn render_qr(data: &str) -> Result<GrayImage, RenderError> {
    let code = QrCode::with_error_correction_level(data.as_bytes(), EcLevel::M)
        .map_err(RenderError::Qr)?;

    let modules = code.width() as u32;
    let colors = code.to_colors();
    let side = (modules + 2 * BORDER_MODULES) * BOX_SIZE;

    Ok(GrayImage::from_fn(side, side, |px, py| {
        let mx = (px / BOX_SIZE).checked_sub(BORDER_MODULES);
        let my = (py / BOX_SIZE).checked_sub(BORDER_MODULES);
        match (mx, my) {
            (Some(mx), Some(my)) if mx < modules && my < modules => {
                match colors[(my * modules + mx) as usize] {
                    Color::Dark => DARK,
                    Color::Light => LIGHT,
                }
            }
            _ => LIGHT,
        }
    }))
}

/// Writes `image` as a PNG into a uniquely named file inside `dir`.
pub fn stage_png(image: &GrayImage, dir: &Path) -> Result<NamedTempFile, RenderError> {
    let mut file = tempfile::Builder::new()
        .prefix("qr-")
        .suffix(".png")
        .tempfile_in(dir)?;
    image.write_to(&mut file, ImageFormat::Png)?;
    file.flush()?;
    Ok(file)
}

/// Decodes a staged PNG into an embeddable grayscale raster.
pub fn load_raster(path: &Path) -> Result<GrayRaster, RenderError> {
    let image = image::open(path)?.into_luma8();
    Ok(GrayRaster {
        width_px: image.width(),
        height_px: image.height(),
        pixels: image.into_raw(),
    })
}

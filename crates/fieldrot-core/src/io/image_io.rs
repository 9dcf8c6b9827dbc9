use std::path::Path;

use image::{DynamicImage, ImageBuffer, ImageFormat};
use ndarray::Array3;

use crate::error::{FieldRotError, Result};
use crate::frame::RasterFrame;

/// Load an image file into a RasterFrame, keeping its channel layout.
///
/// Gray, gray+alpha, RGB and RGBA sources map to 1, 2, 3 and 4 channels.
/// Samples are normalized to [0.0, 1.0]; the source depth is remembered.
pub fn load_raster(path: &Path) -> Result<RasterFrame> {
    let img = image::open(path)?;
    let color = img.color();
    let bits_per_channel = color.bits_per_pixel() / u16::from(color.channel_count());
    let bit_depth = if bits_per_channel <= 8 { 8 } else { 16 };

    let (w, h) = (img.width(), img.height());
    let (channels, raw): (usize, Vec<u16>) = match (color.has_color(), color.has_alpha()) {
        (false, false) => (1, img.to_luma16().into_raw()),
        (false, true) => (2, img.to_luma_alpha16().into_raw()),
        (true, false) => (3, img.to_rgb16().into_raw()),
        (true, true) => (4, img.to_rgba16().into_raw()),
    };

    let samples: Vec<f32> = raw.into_iter().map(|v| v as f32 / 65535.0).collect();
    let data = Array3::from_shape_vec((h as usize, w as usize, channels), samples)
        .map_err(|_| FieldRotError::InvalidDimensions {
            width: w,
            height: h,
        })?;

    Ok(RasterFrame::new(data, bit_depth))
}

/// Save a RasterFrame at its own sample depth, choosing the format from the
/// file extension (PNG for `.png`, TIFF otherwise).
///
/// The TIFF encoder has no gray+alpha layout, so 2-channel frames are
/// written to TIFF as RGBA with the gray value in each color channel.
pub fn save_raster(frame: &RasterFrame, path: &Path) -> Result<()> {
    let format = match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("png") => ImageFormat::Png,
        _ => ImageFormat::Tiff,
    };
    let img = match (to_dynamic_image(frame)?, format) {
        (img @ DynamicImage::ImageLumaA8(_), ImageFormat::Tiff) => {
            DynamicImage::ImageRgba8(img.to_rgba8())
        }
        (img @ DynamicImage::ImageLumaA16(_), ImageFormat::Tiff) => {
            DynamicImage::ImageRgba16(img.to_rgba16())
        }
        (img, _) => img,
    };
    img.save_with_format(path, format)?;
    Ok(())
}

fn to_dynamic_image(frame: &RasterFrame) -> Result<DynamicImage> {
    let (h, w, channels) = frame.data.dim();
    let (w, h) = (w as u32, h as u32);
    let bad_dims = || FieldRotError::InvalidDimensions {
        width: w,
        height: h,
    };

    // Standard layout iteration is row-major, channels innermost.
    let img = if frame.bit_depth <= 8 {
        let raw: Vec<u8> = frame
            .data
            .iter()
            .map(|v| (v.clamp(0.0, 1.0) * 255.0).round() as u8)
            .collect();
        match channels {
            1 => DynamicImage::ImageLuma8(ImageBuffer::from_raw(w, h, raw).ok_or_else(bad_dims)?),
            2 => DynamicImage::ImageLumaA8(ImageBuffer::from_raw(w, h, raw).ok_or_else(bad_dims)?),
            3 => DynamicImage::ImageRgb8(ImageBuffer::from_raw(w, h, raw).ok_or_else(bad_dims)?),
            4 => DynamicImage::ImageRgba8(ImageBuffer::from_raw(w, h, raw).ok_or_else(bad_dims)?),
            n => return Err(FieldRotError::UnsupportedChannels(n)),
        }
    } else {
        let raw: Vec<u16> = frame
            .data
            .iter()
            .map(|v| (v.clamp(0.0, 1.0) * 65535.0).round() as u16)
            .collect();
        match channels {
            1 => DynamicImage::ImageLuma16(ImageBuffer::from_raw(w, h, raw).ok_or_else(bad_dims)?),
            2 => DynamicImage::ImageLumaA16(ImageBuffer::from_raw(w, h, raw).ok_or_else(bad_dims)?),
            3 => DynamicImage::ImageRgb16(ImageBuffer::from_raw(w, h, raw).ok_or_else(bad_dims)?),
            4 => DynamicImage::ImageRgba16(ImageBuffer::from_raw(w, h, raw).ok_or_else(bad_dims)?),
            n => return Err(FieldRotError::UnsupportedChannels(n)),
        }
    };
    Ok(img)
}

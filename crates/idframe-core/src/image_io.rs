use std::io::Cursor;
use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::{ColorType, ImageFormat, ImageReader, RgbaImage};

use crate::error::{IdframeError, Result};

/// Decode an uploaded file of any supported raster format into RGBA8.
///
/// Zero-sized images are rejected here so no caller ever divides by a
/// zero source dimension.
pub fn decode_image(bytes: &[u8]) -> Result<RgbaImage> {
    let img = image::load_from_memory(bytes)?;
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    if width == 0 || height == 0 {
        return Err(IdframeError::InvalidDimensions { width, height });
    }
    Ok(rgba)
}

/// Header-level facts about an uploaded file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ImageInfo {
    pub width: u32,
    pub height: u32,
    pub color: ColorType,
    pub format: Option<ImageFormat>,
}

/// Identify the format and decode just enough to report size and layout.
pub fn probe_image(bytes: &[u8]) -> Result<ImageInfo> {
    let reader = ImageReader::new(Cursor::new(bytes)).with_guessed_format()?;
    let format = reader.format();
    let img = reader.decode()?;
    Ok(ImageInfo {
        width: img.width(),
        height: img.height(),
        color: img.color(),
        format,
    })
}

/// Read and decode an image file.
pub fn load_image(path: &Path) -> Result<RgbaImage> {
    let bytes = std::fs::read(path)?;
    decode_image(&bytes)
}

/// Encode as PNG. Identical input always yields identical bytes.
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    image.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)?;
    Ok(buf)
}

/// Save as 8-bit RGBA PNG regardless of the path extension.
pub fn save_png(image: &RgbaImage, path: &Path) -> Result<()> {
    let bytes = encode_png(image)?;
    std::fs::write(path, bytes)?;
    Ok(())
}

/// Wrap encoded PNG bytes in a `data:` URL for embedding in HTML/PDF templates.
pub fn png_data_url(png: &[u8]) -> String {
    format!("data:image/png;base64,{}", STANDARD.encode(png))
}

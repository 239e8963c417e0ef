use image::RgbaImage;

/// Convert an RGBA8 bitmap (straight alpha) to an egui ColorImage.
pub fn rgba_to_color_image(image: &RgbaImage) -> egui::ColorImage {
    let (w, h) = image.dimensions();
    egui::ColorImage::from_rgba_unmultiplied([w as usize, h as usize], image.as_raw())
}

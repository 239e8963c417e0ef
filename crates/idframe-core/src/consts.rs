/// Minimum pixel count (w*h) to use row-level Rayon parallelism.
pub const PARALLEL_PIXEL_THRESHOLD: usize = 65_536;

/// Zoom change applied per wheel notch.
pub const DEFAULT_WHEEL_STEP: f64 = 0.05;

/// Slider granularity for the zoom control.
pub const DEFAULT_ZOOM_STEP: f64 = 0.01;

/// Width in pixels of every exported crop. Height follows the slot aspect ratio.
pub const DEFAULT_OUTPUT_WIDTH: u32 = 1200;

/// Largest canvas or output edge a slot may configure.
pub const MAX_DIMENSION: u32 = 16_384;

/// Photo crop window: 35x45 mm id-photo ratio.
pub const PHOTO_CANVAS_WIDTH: u32 = 280;
pub const PHOTO_CANVAS_HEIGHT: u32 = 360;
pub const PHOTO_MAX_ZOOM: f64 = 3.0;

/// Signature crop window.
pub const SIGNATURE_CANVAS_WIDTH: u32 = 400;
pub const SIGNATURE_CANVAS_HEIGHT: u32 = 160;
pub const SIGNATURE_MAX_ZOOM: f64 = 4.0;

/// Brightness cutoff separating ink from paper.
pub const DEFAULT_THRESHOLD: u8 = 190;

/// Fraction of the darkness (255 - brightness) subtracted from each ink channel.
pub const INK_BOOST_FACTOR: f64 = 0.2;

/// Crop boundary stroke drawn by the viewport renderer.
pub const BORDER_WIDTH: u32 = 2;
pub const BORDER_COLOR: [u8; 4] = [0x2c, 0x2c, 0x2c, 0xff];

/// Background of exported crops; rounding gaps resolve to this.
pub const EXPORT_BACKGROUND: [u8; 4] = [0xff, 0xff, 0xff, 0xff];

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::{
    DEFAULT_OUTPUT_WIDTH, DEFAULT_THRESHOLD, DEFAULT_WHEEL_STEP, DEFAULT_ZOOM_STEP, MAX_DIMENSION,
    PHOTO_CANVAS_HEIGHT, PHOTO_CANVAS_WIDTH, PHOTO_MAX_ZOOM, SIGNATURE_CANVAS_HEIGHT,
    SIGNATURE_CANVAS_WIDTH, SIGNATURE_MAX_ZOOM,
};
use crate::error::{IdframeError, Result};

/// Bounds of the user zoom multiplier.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ZoomRange {
    pub min: f64,
    pub max: f64,
    /// Slider granularity.
    pub step: f64,
}

impl ZoomRange {
    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }
}

impl Default for ZoomRange {
    fn default() -> Self {
        Self {
            min: 1.0,
            max: PHOTO_MAX_ZOOM,
            step: DEFAULT_ZOOM_STEP,
        }
    }
}

/// Fixed design-time parameters of one image slot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SlotConfig {
    /// Crop window size in canvas pixels. Defines the aspect ratio.
    pub canvas_width: u32,
    pub canvas_height: u32,
    #[serde(default)]
    pub zoom: ZoomRange,
    #[serde(default = "default_wheel_step")]
    pub wheel_step: f64,
    #[serde(default = "default_output_width")]
    pub output_width: u32,
}

fn default_wheel_step() -> f64 {
    DEFAULT_WHEEL_STEP
}

fn default_output_width() -> u32 {
    DEFAULT_OUTPUT_WIDTH
}

impl SlotConfig {
    pub fn photo() -> Self {
        Self {
            canvas_width: PHOTO_CANVAS_WIDTH,
            canvas_height: PHOTO_CANVAS_HEIGHT,
            zoom: ZoomRange {
                min: 1.0,
                max: PHOTO_MAX_ZOOM,
                step: DEFAULT_ZOOM_STEP,
            },
            wheel_step: DEFAULT_WHEEL_STEP,
            output_width: DEFAULT_OUTPUT_WIDTH,
        }
    }

    pub fn signature() -> Self {
        Self {
            canvas_width: SIGNATURE_CANVAS_WIDTH,
            canvas_height: SIGNATURE_CANVAS_HEIGHT,
            zoom: ZoomRange {
                min: 1.0,
                max: SIGNATURE_MAX_ZOOM,
                step: DEFAULT_ZOOM_STEP,
            },
            wheel_step: DEFAULT_WHEEL_STEP,
            output_width: DEFAULT_OUTPUT_WIDTH,
        }
    }

    /// Width / height of the crop window.
    pub fn aspect_ratio(&self) -> f64 {
        self.canvas_width as f64 / self.canvas_height as f64
    }

    /// Resolution of exported crops: fixed width, height from the aspect ratio.
    pub fn output_size(&self) -> (u32, u32) {
        let height = (self.output_width as f64 / self.aspect_ratio()).round() as u32;
        (self.output_width, height.max(1))
    }

    /// Reject configurations the viewport cannot honour.
    ///
    /// A zoom minimum below 1 would let the image shrink past the cover
    /// scale and leave part of the crop window uncovered, so it is refused.
    pub fn validate(&self) -> Result<()> {
        if self.canvas_width == 0 || self.canvas_height == 0 {
            return Err(IdframeError::InvalidConfig(format!(
                "canvas must be non-empty, got {}x{}",
                self.canvas_width, self.canvas_height
            )));
        }
        if self.output_width == 0 {
            return Err(IdframeError::InvalidConfig(
                "output_width must be > 0".into(),
            ));
        }
        if self.canvas_width > MAX_DIMENSION || self.canvas_height > MAX_DIMENSION {
            return Err(IdframeError::InvalidConfig(format!(
                "canvas {}x{} exceeds the {MAX_DIMENSION}px limit",
                self.canvas_width, self.canvas_height
            )));
        }
        let output_height = self.output_width as f64 / self.aspect_ratio();
        if self.output_width > MAX_DIMENSION || output_height.round() > MAX_DIMENSION as f64 {
            return Err(IdframeError::InvalidConfig(format!(
                "output {}x{:.0} exceeds the {MAX_DIMENSION}px limit",
                self.output_width, output_height
            )));
        }
        let zoom = &self.zoom;
        if !zoom.min.is_finite() || !zoom.max.is_finite() {
            return Err(IdframeError::InvalidConfig(
                "zoom bounds must be finite".into(),
            ));
        }
        if zoom.min < 1.0 {
            return Err(IdframeError::InvalidConfig(format!(
                "zoom.min must be >= 1 to keep the crop window covered, got {}",
                zoom.min
            )));
        }
        if zoom.min > zoom.max {
            return Err(IdframeError::InvalidConfig(format!(
                "zoom.min ({}) exceeds zoom.max ({})",
                zoom.min, zoom.max
            )));
        }
        if !(zoom.step.is_finite() && zoom.step > 0.0) {
            return Err(IdframeError::InvalidConfig(format!(
                "zoom.step must be positive, got {}",
                zoom.step
            )));
        }
        if !(self.wheel_step.is_finite() && self.wheel_step > 0.0) {
            return Err(IdframeError::InvalidConfig(format!(
                "wheel_step must be positive, got {}",
                self.wheel_step
            )));
        }
        Ok(())
    }
}

impl fmt::Display for SlotConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (w, h) = self.output_size();
        write!(
            f,
            "{}x{} window, zoom {}-{}, output {}x{}",
            self.canvas_width, self.canvas_height, self.zoom.min, self.zoom.max, w, h
        )
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CleanupConfig {
    pub default_threshold: u8,
}

impl Default for CleanupConfig {
    fn default() -> Self {
        Self {
            default_threshold: DEFAULT_THRESHOLD,
        }
    }
}

/// Complete configuration for both image slots.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WizardConfig {
    #[serde(default = "SlotConfig::photo")]
    pub photo: SlotConfig,
    #[serde(default = "SlotConfig::signature")]
    pub signature: SlotConfig,
    #[serde(default)]
    pub cleanup: CleanupConfig,
}

impl Default for WizardConfig {
    fn default() -> Self {
        Self {
            photo: SlotConfig::photo(),
            signature: SlotConfig::signature(),
            cleanup: CleanupConfig::default(),
        }
    }
}

impl WizardConfig {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: WizardConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        self.photo.validate()?;
        self.signature.validate()
    }
}

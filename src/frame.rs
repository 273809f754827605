// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Frame material handed to the predictor.
//!
//! This module provides abstractions for getting camera or video frames into
//! the predictor from common sources: decoded images, raw RGB buffers, and
//! HWC arrays.

use image::imageops::{self, FilterType};
use image::{DynamicImage, RgbImage};
use ndarray::Array3;

use crate::error::{PredictorError, Result};

/// One owned RGB video frame.
#[derive(Debug, Clone)]
pub struct Frame {
    image: RgbImage,
}

impl Frame {
    /// Create a frame from a decoded image.
    #[must_use]
    pub fn new(image: DynamicImage) -> Self {
        Self {
            image: image.to_rgb8(),
        }
    }

    /// Create a frame from a raw packed-RGB buffer.
    ///
    /// # Errors
    ///
    /// Returns an error if the buffer length does not cover
    /// `width * height` RGB pixels.
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        let image = RgbImage::from_raw(width, height, data).ok_or_else(|| {
            PredictorError::Frame(format!(
                "Raw buffer does not match a {width}x{height} RGB frame"
            ))
        })?;
        Ok(Self { image })
    }

    /// Create a frame from an HWC u8 array.
    ///
    /// # Errors
    ///
    /// Returns an error if the array does not have 3 channels or its
    /// dimensions exceed `u32::MAX`.
    pub fn from_array(arr: &Array3<u8>) -> Result<Self> {
        let shape = arr.shape();
        if shape[2] != 3 {
            return Err(PredictorError::Frame(format!(
                "Expected 3 channels, got {}",
                shape[2]
            )));
        }
        let height = u32::try_from(shape[0])
            .map_err(|_| PredictorError::Frame("Frame height exceeds u32::MAX".to_string()))?;
        let width = u32::try_from(shape[1])
            .map_err(|_| PredictorError::Frame("Frame width exceeds u32::MAX".to_string()))?;

        let mut rgb_data = Vec::with_capacity((height * width * 3) as usize);
        for y in 0..height as usize {
            for x in 0..width as usize {
                rgb_data.push(arr[[y, x, 0]]);
                rgb_data.push(arr[[y, x, 1]]);
                rgb_data.push(arr[[y, x, 2]]);
            }
        }

        Self::from_raw(width, height, rgb_data)
    }

    /// Frame width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Frame height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Whether the frame carries no pixels. Empty frames are dropped at the
    /// predictor's admission boundary.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.image.width() == 0 || self.image.height() == 0
    }

    /// Borrow the underlying RGB image.
    #[must_use]
    pub fn as_image(&self) -> &RgbImage {
        &self.image
    }

    /// Stretch the frame to exactly `width` x `height`, ignoring aspect
    /// ratio, as [`ScaleMode::ScaleFill`](crate::ScaleMode::ScaleFill)
    /// requires. Backend implementations can use this to fit frames to the
    /// model input size.
    #[must_use]
    pub fn stretch_to(&self, width: u32, height: u32) -> Self {
        Self {
            image: imageops::resize(&self.image, width, height, FilterType::Triangle),
        }
    }
}

impl From<DynamicImage> for Frame {
    fn from(image: DynamicImage) -> Self {
        Self::new(image)
    }
}

impl From<RgbImage> for Frame {
    fn from(image: RgbImage) -> Self {
        Self { image }
    }
}

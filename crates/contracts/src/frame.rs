//! Frame payloads exchanged between capture, session, and display.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::SourceId;

/// One capture result from a depth source.
///
/// Depth is stored as little-endian `u16` millimetres per pixel, row-major.
/// A value of 0 means no return / invalid measurement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepthFrame {
    /// Producing source
    pub source_id: SourceId,

    /// Strictly increasing per source
    pub frame_id: u64,

    /// Seconds since source start - primary clock
    pub timestamp: f64,

    /// Image width in pixels
    pub width: u32,

    /// Image height in pixels
    pub height: u32,

    /// Depth plane, `width * height * 2` bytes; `None` in modes without depth
    pub depth_mm: Option<Bytes>,

    /// Left rectified image, only in modes that include it
    pub left: Option<ImageData>,
}

impl DepthFrame {
    /// Expected byte length of the depth plane for these dimensions
    pub fn expected_depth_len(&self) -> usize {
        (self.width as usize) * (self.height as usize) * 2
    }

    /// Decode the depth plane into a u16 vector, row-major.
    ///
    /// Returns `None` when the frame carries no depth or the plane length
    /// does not match the dimensions.
    pub fn decode_depth(&self) -> Option<Vec<u16>> {
        let raw = self.depth_mm.as_ref()?;
        if raw.len() != self.expected_depth_len() {
            return None;
        }
        Some(
            raw.chunks_exact(2)
                .map(|c| u16::from_le_bytes([c[0], c[1]]))
                .collect(),
        )
    }
}

/// Raw image buffer with explicit format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageData {
    pub width: u32,
    pub height: u32,
    pub format: ImageFormat,
    pub data: Bytes,
}

impl ImageData {
    /// Expected byte length for the dimensions and format
    pub fn expected_len(&self) -> usize {
        (self.width as usize) * (self.height as usize) * self.format.bytes_per_pixel()
    }
}

/// Pixel format of an [`ImageData`] buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageFormat {
    Gray8,
    Rgb8,
}

impl ImageFormat {
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            Self::Gray8 => 1,
            Self::Rgb8 => 3,
        }
    }
}

/// Binary segmentation mask, 0 or 255 per pixel, row-major.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentationMask {
    pub width: u32,
    pub height: u32,
    pub data: Bytes,
}

impl SegmentationMask {
    /// Whether the pixel at (x, y) is marked
    pub fn is_set(&self, x: u32, y: u32) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        self.data[(y * self.width + x) as usize] != 0
    }

    /// Fraction of marked pixels, in [0, 1]
    pub fn coverage(&self) -> f64 {
        if self.data.is_empty() {
            return 0.0;
        }
        let set = self.data.iter().filter(|&&b| b != 0).count();
        set as f64 / self.data.len() as f64
    }
}

/// What display sinks receive: a rendered view of one stream.
///
/// Stream names take the place of window titles in an interactive viewer
/// (`"depth"` for the raw disparity, `"segmented"` after floor removal).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewFrame {
    /// Stream name, e.g. "depth" or "segmented"
    pub stream: String,

    /// Frame id of the underlying capture
    pub frame_id: u64,

    /// Capture timestamp
    pub timestamp: f64,

    /// Rendered image
    pub image: ImageData,
}

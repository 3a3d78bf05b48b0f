//! # Segmentation
//!
//! Floor-plane detection and removal over depth images.
//!
//! Pipeline:
//! - reproject subsampled depth pixels into camera-frame 3-D points
//! - RANSAC plane fit, gated to near-vertical normals (the floor, not a wall)
//! - rasterize the inlier mask at full resolution
//! - suppress masked pixels in the depth buffer
//!
//! ## Usage example
//!
//! ```ignore
//! use segmentation::FloorDetector;
//!
//! let detector = FloorDetector::new(blueprint.floor.clone(), blueprint.camera.intrinsics);
//! if let Some(floor) = detector.detect(&depth, width, height)? {
//!     let mask = detector.mask(&floor, &depth, width, height);
//!     detector.suppress(&mask, &mut depth);
//! }
//! ```

mod detector;
mod plane;
mod reproject;

pub use detector::{FloorDetector, FloorPlane};
pub use plane::Plane;
pub use reproject::reproject_depth;

//! Target dimensions for ASCII-art rendering

use serde::{Deserialize, Serialize};

/// Length the shorter side gets when no dimension is requested
pub const DEFAULT_SHORT_SIDE: u32 = 128;

/// Largest width or height an ASCII-art target may have
pub const MAX_ASCII_SIDE: u32 = 1024;

/// Width and height in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Compute the target size for a `source` image
    ///
    /// Both requested sides are used verbatim. With one side requested the
    /// other follows the source aspect ratio, truncated. With none, the
    /// shorter source side becomes [`DEFAULT_SHORT_SIDE`]. Every side ends
    /// up between one pixel and [`MAX_ASCII_SIDE`].
    pub fn resolve(source: Self, width: Option<u32>, height: Option<u32>) -> Self {
        let src_w = u64::from(source.width.max(1));
        let src_h = u64::from(source.height.max(1));

        let (width, height) = match (width, height) {
            (Some(w), Some(h)) => (w, h),
            (Some(w), None) => (w, scale(w, src_h, src_w)),
            (None, Some(h)) => (scale(h, src_w, src_h), h),
            (None, None) if src_w < src_h => (
                DEFAULT_SHORT_SIDE,
                scale(DEFAULT_SHORT_SIDE, src_h, src_w),
            ),
            (None, None) => (
                scale(DEFAULT_SHORT_SIDE, src_w, src_h),
                DEFAULT_SHORT_SIDE,
            ),
        };

        Self {
            width: width.clamp(1, MAX_ASCII_SIDE),
            height: height.clamp(1, MAX_ASCII_SIDE),
        }
    }
}

fn scale(side: u32, numerator: u64, denominator: u64) -> u32 {
    let scaled = u64::from(side) * numerator / denominator;
    u32::try_from(scaled).unwrap_or(u32::MAX).max(1)
}

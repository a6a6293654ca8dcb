//! ImageData: straight-alpha RGBA pixel buffers exchanged with callers.

use crate::error::{Canvas2dError, Canvas2dResult};
use crate::settings::PredefinedColorSpace;
use crate::surface::MAX_DIMENSION;

/// Options accepted when creating image data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ImageDataSettings {
    /// Overrides the default color space when set.
    pub color_space: Option<PredefinedColorSpace>,
}

/// Width x height RGBA pixels with unpremultiplied alpha, 4 bytes per pixel
/// in row-major order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageData {
    width: u32,
    height: u32,
    data: Vec<u8>,
    color_space: PredefinedColorSpace,
}

impl ImageData {
    /// Create transparent black image data.
    ///
    /// Zero dimensions are an index size error; dimensions above
    /// [`MAX_DIMENSION`] are an invalid dimensions error.
    pub fn new(
        width: u32,
        height: u32,
        settings: Option<&ImageDataSettings>,
    ) -> Canvas2dResult<Self> {
        Self::with_default_color_space(width, height, settings, PredefinedColorSpace::Srgb)
    }

    pub(crate) fn with_default_color_space(
        width: u32,
        height: u32,
        settings: Option<&ImageDataSettings>,
        default_color_space: PredefinedColorSpace,
    ) -> Canvas2dResult<Self> {
        if width == 0 || height == 0 {
            return Err(Canvas2dError::IndexSize(
                "Width and height must not be zero".to_string(),
            ));
        }
        if width > MAX_DIMENSION || height > MAX_DIMENSION {
            return Err(Canvas2dError::InvalidDimensions { width, height });
        }
        let len = (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(4))
            .ok_or(Canvas2dError::InvalidDimensions { width, height })?;
        let mut data = Vec::new();
        data.try_reserve_exact(len)
            .map_err(|_| Canvas2dError::InvalidDimensions { width, height })?;
        data.resize(len, 0);
        Ok(Self {
            width,
            height,
            data,
            color_space: settings
                .and_then(|s| s.color_space)
                .unwrap_or(default_color_space),
        })
    }

    /// Wrap an existing RGBA buffer.
    ///
    /// The buffer length must be a non-zero multiple of 4 (invalid state
    /// otherwise) holding a whole number of rows of `width` pixels; when
    /// `height` is given it must match the row count (index size otherwise).
    pub fn from_data(
        data: Vec<u8>,
        width: u32,
        height: Option<u32>,
        settings: Option<&ImageDataSettings>,
    ) -> Canvas2dResult<Self> {
        if data.is_empty() || data.len() % 4 != 0 {
            return Err(Canvas2dError::InvalidState(format!(
                "Image data length {} is not a non-zero multiple of 4",
                data.len()
            )));
        }
        if width == 0 {
            return Err(Canvas2dError::IndexSize("Width must not be zero".to_string()));
        }
        let pixels = data.len() / 4;
        if pixels % width as usize != 0 {
            return Err(Canvas2dError::IndexSize(format!(
                "Image data length {} is not a multiple of width {}",
                data.len(),
                width
            )));
        }
        let rows = (pixels / width as usize) as u32;
        if let Some(height) = height {
            if height != rows {
                return Err(Canvas2dError::IndexSize(format!(
                    "Height {} does not match data with {} rows",
                    height, rows
                )));
            }
        }
        Ok(Self {
            width,
            height: rows,
            data,
            color_space: settings
                .and_then(|s| s.color_space)
                .unwrap_or_default(),
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    pub fn color_space(&self) -> PredefinedColorSpace {
        self.color_space
    }

    /// RGBA value of one pixel.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = ((y as usize) * self.width as usize + x as usize) * 4;
        let mut rgba = [0; 4];
        rgba.copy_from_slice(&self.data[idx..idx + 4]);
        Some(rgba)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_new_is_transparent_black() {
        let data = ImageData::new(3, 5, None).unwrap();
        assert_eq!(data.data().len(), 3 * 5 * 4);
        assert!(data.data().iter().all(|&b| b == 0));
        assert_eq!(data.color_space(), PredefinedColorSpace::Srgb);
    }

    #[rstest]
    #[case(0, 5)]
    #[case(5, 0)]
    fn test_new_zero_dimension_is_index_size(#[case] width: u32, #[case] height: u32) {
        assert!(ImageData::new(width, height, None)
            .unwrap_err()
            .is_index_size());
    }

    #[rstest]
    #[case(MAX_DIMENSION + 1, 1)]
    #[case(1, MAX_DIMENSION + 1)]
    #[case(1u32 << 31, 1)]
    #[case(u32::MAX, u32::MAX)]
    fn test_new_oversized_is_invalid_dimensions(#[case] width: u32, #[case] height: u32) {
        assert!(matches!(
            ImageData::new(width, height, None),
            Err(Canvas2dError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn test_settings_color_space_wins() {
        let settings = ImageDataSettings {
            color_space: Some(PredefinedColorSpace::DisplayP3),
        };
        let data = ImageData::new(1, 1, Some(&settings)).unwrap();
        assert_eq!(data.color_space(), PredefinedColorSpace::DisplayP3);
    }

    #[test]
    fn test_from_data_infers_height() {
        let data = ImageData::from_data(vec![0; 2 * 3 * 4], 2, None, None).unwrap();
        assert_eq!(data.height(), 3);
    }

    #[test]
    fn test_from_data_validation() {
        assert!(ImageData::from_data(vec![0; 7], 1, None, None)
            .unwrap_err()
            .is_invalid_state());
        assert!(ImageData::from_data(vec![0; 12], 2, None, None)
            .unwrap_err()
            .is_index_size());
        assert!(ImageData::from_data(vec![0; 16], 2, Some(3), None)
            .unwrap_err()
            .is_index_size());
    }

    #[test]
    fn test_pixel_access() {
        let mut data = ImageData::new(2, 2, None).unwrap();
        data.data_mut()[12..16].copy_from_slice(&[1, 2, 3, 4]);
        assert_eq!(data.pixel(1, 1), Some([1, 2, 3, 4]));
        assert_eq!(data.pixel(2, 0), None);
    }
}

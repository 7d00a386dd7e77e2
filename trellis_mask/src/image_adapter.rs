// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! [`AlphaSource`] implementations for the `image` crate, plus one-step
//! decoding into a [`Mask`].

use image::{DynamicImage, GenericImageView, GrayImage, RgbaImage};

use crate::{AlphaSource, Mask, MaskError, from_alpha};

impl AlphaSource for RgbaImage {
    fn width(&self) -> u32 {
        self.dimensions().0
    }

    fn height(&self) -> u32 {
        self.dimensions().1
    }

    fn alpha(&self, x: u32, y: u32) -> u8 {
        self.get_pixel(x, y).0[3]
    }
}

impl AlphaSource for GrayImage {
    fn width(&self) -> u32 {
        self.dimensions().0
    }

    fn height(&self) -> u32 {
        self.dimensions().1
    }

    fn alpha(&self, _x: u32, _y: u32) -> u8 {
        // Single-channel images carry no alpha; every pixel is opaque.
        255
    }
}

impl AlphaSource for DynamicImage {
    fn width(&self) -> u32 {
        self.dimensions().0
    }

    fn height(&self) -> u32 {
        self.dimensions().1
    }

    fn alpha(&self, x: u32, y: u32) -> u8 {
        if self.color().has_alpha() {
            self.get_pixel(x, y).0[3]
        } else {
            255
        }
    }
}

/// Decode `bytes` and generate a mask at the given tolerance.
///
/// Undecodable input is reported as [`MaskError::Decode`]; a decodable but
/// zero-area image as [`MaskError::EmptyImage`].
pub fn from_image_bytes(bytes: &[u8], tolerance: f32) -> Result<Mask, MaskError> {
    let img = image::load_from_memory(bytes)?;
    let (width, height) = img.dimensions();
    if width == 0 || height == 0 {
        return Err(MaskError::EmptyImage { width, height });
    }
    Ok(from_alpha(&img, tolerance))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DEFAULT_TOLERANCE, Span};
    use alloc::vec::Vec;
    use image::Rgba;

    fn bordered_square_rgba() -> RgbaImage {
        RgbaImage::from_fn(5, 5, |x, y| {
            let border = x == 0 || y == 0 || x == 4 || y == 4;
            let alpha = if border { 0 } else { 255 };
            Rgba([10, 20, 30, alpha])
        })
    }

    #[test]
    fn rgba_alpha_channel_drives_the_mask() {
        let mask = from_alpha(&bordered_square_rgba(), DEFAULT_TOLERANCE);
        assert_eq!(mask.row_count(), 3);
        assert_eq!(mask.row(2), Some(&[Span::new(1, 3)][..]));
    }

    #[test]
    fn gray_images_are_fully_opaque() {
        let gray = GrayImage::from_pixel(3, 2, image::Luma([0]));
        let mask = from_alpha(&gray, DEFAULT_TOLERANCE);
        assert_eq!(mask.row_count(), 2);
        assert_eq!(mask.row(1), Some(&[Span::new(0, 2)][..]));
    }

    #[test]
    fn dynamic_image_without_alpha_is_fully_opaque() {
        let rgb = image::RgbImage::from_pixel(2, 2, image::Rgb([1, 2, 3]));
        let dynamic = DynamicImage::ImageRgb8(rgb);
        let mask = from_alpha(&dynamic, DEFAULT_TOLERANCE);
        assert_eq!(mask.row(0), Some(&[Span::new(0, 1)][..]));
    }

    #[test]
    fn decoded_png_round_trips_through_the_generator() {
        let mut bytes = std::io::Cursor::new(Vec::new());
        bordered_square_rgba()
            .write_to(&mut bytes, image::ImageFormat::Png)
            .expect("in-memory png encode");
        let mask =
            from_image_bytes(bytes.get_ref(), DEFAULT_TOLERANCE).expect("decode + mask");
        assert_eq!(mask.row(1), Some(&[Span::new(1, 3)][..]));
    }

    #[test]
    fn garbage_bytes_report_a_decode_error() {
        let err = from_image_bytes(b"definitely not an image", DEFAULT_TOLERANCE)
            .expect_err("decode must fail");
        assert!(matches!(err, MaskError::Decode(_)));
    }
}

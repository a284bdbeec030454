//! Rendered frames of environments.
use crate::error::TabrlError;
use anyhow::Result;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::{png::PngEncoder, ColorType};

/// An RGB raster image with 8 bits per channel.
///
/// Pixels are stored row-major, three bytes per pixel. The library never looks
/// at the pixel content; frames are produced by [`DiscreteEnv::render`] and
/// forwarded to clients, usually as [`Frame::to_base64_png`].
///
/// [`DiscreteEnv::render`]: crate::DiscreteEnv::render
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Frame {
    /// Number of bytes of a `width` x `height` RGB frame.
    fn num_bytes(width: u32, height: u32) -> Result<usize> {
        (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(3))
            .ok_or_else(|| {
                TabrlError::FrameEncoding(format!("frame of {}x{} pixels is too large", width, height))
                    .into()
            })
    }

    /// Creates a frame filled with a single color.
    pub fn filled(width: u32, height: u32, color: [u8; 3]) -> Result<Self> {
        let n = Self::num_bytes(width, height)?;
        let data = color.iter().copied().cycle().take(n).collect();
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Creates a frame from raw RGB bytes.
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        let n = Self::num_bytes(width, height)?;
        if data.len() != n {
            return Err(TabrlError::FrameEncoding(format!(
                "expected {} bytes for a {}x{} RGB frame, got {}",
                n,
                width,
                height,
                data.len()
            ))
            .into());
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGB bytes.
    pub fn as_raw(&self) -> &[u8] {
        &self.data
    }

    /// Returns the color of pixel `(x, y)`, `None` if outside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 3;
        Some([self.data[i], self.data[i + 1], self.data[i + 2]])
    }

    /// Sets the color of pixel `(x, y)`. Pixels outside the frame are ignored.
    pub fn put_pixel(&mut self, x: u32, y: u32, color: [u8; 3]) {
        if x >= self.width || y >= self.height {
            return;
        }
        let i = (y as usize * self.width as usize + x as usize) * 3;
        self.data[i..i + 3].copy_from_slice(&color);
    }

    /// Fills the rectangle `[x0, x1) x [y0, y1)`, clipped to the frame.
    pub fn fill_rect(&mut self, x0: u32, y0: u32, x1: u32, y1: u32, color: [u8; 3]) {
        for y in y0..y1.min(self.height) {
            for x in x0..x1.min(self.width) {
                self.put_pixel(x, y, color);
            }
        }
    }

    /// Fills a disk centered at `(cx, cy)`, clipped to the frame.
    pub fn fill_disk(&mut self, cx: u32, cy: u32, radius: u32, color: [u8; 3]) {
        let (cx, cy, r) = (cx as i64, cy as i64, radius as i64);
        let y0 = (cy - r).max(0);
        let y1 = (cy + r).min(self.height as i64);
        let x0 = (cx - r).max(0);
        let x1 = (cx + r).min(self.width as i64);
        for y in y0..y1 {
            for x in x0..x1 {
                if (x - cx).pow(2) + (y - cy).pow(2) <= r * r {
                    self.put_pixel(x as u32, y as u32, color);
                }
            }
        }
    }

    /// Encodes the frame as PNG.
    pub fn to_png(&self) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        PngEncoder::new(&mut bytes)
            .encode(&self.data, self.width, self.height, ColorType::Rgb8)
            .map_err(|e| TabrlError::FrameEncoding(e.to_string()))?;
        Ok(bytes)
    }

    /// Encodes the frame as PNG and then as base64, without a data-URI prefix.
    pub fn to_base64_png(&self) -> Result<String> {
        Ok(STANDARD.encode(self.to_png()?))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_from_raw_checks_length() {
        assert!(Frame::from_raw(2, 2, vec![0; 12]).is_ok());
        let err = Frame::from_raw(2, 2, vec![0; 11]).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<TabrlError>(),
            Some(TabrlError::FrameEncoding(_))
        ));
    }

    #[test]
    fn test_oversized_frames_fail() {
        let is_encoding_error = |err: anyhow::Error| {
            matches!(
                err.downcast_ref::<TabrlError>(),
                Some(TabrlError::FrameEncoding(_))
            )
        };
        assert!(is_encoding_error(Frame::filled(u32::MAX, u32::MAX, [0; 3]).unwrap_err()));
        // The size wraps around to 3 bytes in u32
        assert!(is_encoding_error(
            Frame::from_raw(u32::MAX, u32::MAX, vec![0; 3]).unwrap_err()
        ));
    }

    #[test]
    fn test_drawing_is_clipped() {
        let mut frame = Frame::filled(10, 10, [255, 255, 255]).unwrap();
        frame.fill_rect(8, 8, 20, 20, [0, 0, 0]);
        frame.fill_disk(0, 0, 3, [255, 0, 0]);
        assert_eq!(frame.pixel(9, 9), Some([0, 0, 0]));
        assert_eq!(frame.pixel(7, 7), Some([255, 255, 255]));
        assert_eq!(frame.pixel(1, 1), Some([255, 0, 0]));
        assert_eq!(frame.pixel(10, 0), None);
        assert_eq!(frame.as_raw().len(), 300);
    }

    #[test]
    fn test_base64_png_has_png_signature() {
        let frame = Frame::filled(4, 3, [10, 20, 30]).unwrap();
        let png = frame.to_png().unwrap();
        assert_eq!(&png[..8], &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a]);
        let encoded = frame.to_base64_png().unwrap();
        assert!(encoded.starts_with("iVBORw0KGgo"));
        assert!(!encoded.starts_with("data:"));
    }
}

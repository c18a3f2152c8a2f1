use std::path::Path;

use image::{DynamicImage, ImageError};

use crate::error::{ReadError, Result};

/// Converts stored 16-bit samples to metres (and metres per step for flow).
pub const DEFAULT_SCALE: f32 = 1e-4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub height: usize,
    pub width: usize,
}

impl Resolution {
    pub fn new(height: usize, width: usize) -> Self {
        Self { height, width }
    }

    pub fn pixels(&self) -> usize {
        self.height * self.width
    }
}

/// Channel-first image planes.
#[derive(Debug, Clone, PartialEq)]
pub struct Raster<T> {
    pub channels: usize,
    pub resolution: Resolution,
    pub data: Vec<T>,
}

impl<T: Copy> Raster<T> {
    pub fn plane(&self, channel: usize) -> &[T] {
        let n = self.resolution.pixels();
        &self.data[channel * n..(channel + 1) * n]
    }
}

/// Reads a single channel 16-bit depth image, scaled to physical units.
pub fn read_depth_image(path: &Path, target: Resolution, scale: f32) -> Result<Raster<f32>> {
    let buf = match decode(path)? {
        DynamicImage::ImageLuma16(buf) => buf,
        other => return Err(pixel_format(path, "16-bit single channel", &other)),
    };

    let resolution = Resolution::new(buf.height() as usize, buf.width() as usize);
    let data = buf.into_raw().into_iter().map(|v| signed(v) * scale).collect();

    Ok(fit(
        Raster {
            channels: 1,
            resolution,
            data,
        },
        target,
    ))
}

/// Reads a 3-channel 16-bit flow image as x/y/z planes.
///
/// The recorder writes x/y/z into the blue/green/red samples, so the planes
/// come out of the stored pixel in reverse order.
pub fn read_flow_image(path: &Path, target: Resolution, scale: f32) -> Result<Raster<f32>> {
    let buf = match decode(path)? {
        DynamicImage::ImageRgb16(buf) => buf,
        other => return Err(pixel_format(path, "16-bit 3 channel", &other)),
    };

    let resolution = Resolution::new(buf.height() as usize, buf.width() as usize);
    let pixels = resolution.pixels();
    let raw = buf.into_raw();

    let mut data = vec![0.0f32; 3 * pixels];
    for (i, px) in raw.chunks_exact(3).enumerate() {
        for c in 0..3 {
            data[c * pixels + i] = signed(px[2 - c]) * scale;
        }
    }

    Ok(fit(
        Raster {
            channels: 3,
            resolution,
            data,
        },
        target,
    ))
}

/// Reads a per-pixel segment id map. Values are kept as stored.
pub fn read_label_image(path: &Path, target: Resolution) -> Result<Raster<u8>> {
    let (resolution, data) = match decode(path)? {
        DynamicImage::ImageLuma8(buf) => (
            Resolution::new(buf.height() as usize, buf.width() as usize),
            buf.into_raw(),
        ),
        DynamicImage::ImageLuma16(buf) => (
            Resolution::new(buf.height() as usize, buf.width() as usize),
            buf.into_raw().into_iter().map(|v| v as u8).collect(),
        ),
        other => return Err(pixel_format(path, "single channel", &other)),
    };

    if resolution != target {
        return Err(ReadError::SizeMismatch {
            path: path.to_path_buf(),
            expected: (target.height, target.width),
            got: (resolution.height, resolution.width),
        });
    }

    Ok(Raster {
        channels: 1,
        resolution,
        data,
    })
}

/// Nearest-neighbour resize, sampling `src = floor(dst * src_len / dst_len)`
/// on each axis.
pub fn resize_nearest<T: Copy>(src: &Raster<T>, target: Resolution) -> Raster<T> {
    let (sh, sw) = (src.resolution.height, src.resolution.width);
    let (th, tw) = (target.height, target.width);

    let rows: Vec<usize> = (0..th).map(|y| ((y * sh) / th).min(sh - 1)).collect();
    let cols: Vec<usize> = (0..tw).map(|x| ((x * sw) / tw).min(sw - 1)).collect();

    let mut data = Vec::with_capacity(src.channels * target.pixels());
    for c in 0..src.channels {
        let plane = src.plane(c);
        for &sy in &rows {
            data.extend(cols.iter().map(|&sx| plane[sy * sw + sx]));
        }
    }

    Raster {
        channels: src.channels,
        resolution: target,
        data,
    }
}

fn fit<T: Copy>(raster: Raster<T>, target: Resolution) -> Raster<T> {
    if raster.resolution == target {
        raster
    } else {
        resize_nearest(&raster, target)
    }
}

// Samples are stored as unsigned shorts but hold signed values.
#[inline]
fn signed(v: u16) -> f32 {
    v as i16 as f32
}

fn decode(path: &Path) -> Result<DynamicImage> {
    image::open(path).map_err(|e| match e {
        ImageError::IoError(io) => ReadError::io(path, io),
        source => ReadError::Image {
            path: path.to_path_buf(),
            source,
        },
    })
}

fn pixel_format(path: &Path, expected: &'static str, img: &DynamicImage) -> ReadError {
    ReadError::PixelFormat {
        path: path.to_path_buf(),
        expected,
        got: format!("{:?}", img.color()),
    }
}

//! The geometric crop engine.
//!
//! Cuts a square window around a person, reserves rotation headroom with
//! symmetric padding, rotates, and normalizes to the target resolution. The
//! net source-to-output mapping must agree exactly with the coordinate
//! remapper in [`remap`](super::remap).

use crate::{common::*, error::DatasetError, processor::augment::PIXELS_PER_SCALE_UNIT};
use image::{
    imageops::{self, FilterType},
    Rgb, RgbImage,
};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CropEngineInit {
    /// Side of the output image in pixels.
    pub resolution: u32,
}

impl CropEngineInit {
    pub fn build(self) -> Result<CropEngine> {
        let Self { resolution } = self;
        ensure!(resolution > 0, "resolution must be positive");

        Ok(CropEngine { resolution })
    }
}

impl Default for CropEngineInit {
    fn default() -> Self {
        Self { resolution: 256 }
    }
}

#[derive(Debug, Clone)]
pub struct CropEngine {
    resolution: u32,
}

/// Crop geometry as the engine last saw it.
///
/// The zoom-out branch rescales `center` and `scale` before the window is
/// cut; callers comparing against the raw annotation values must account
/// for `crop_ratio`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropGeometry {
    pub center: Point2<f64>,
    pub scale: f64,
    pub crop_ratio: f64,
}

impl CropEngine {
    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    /// Cut the window of side `200 * scale` around `center` out of `image`,
    /// rotate it by `angle` degrees, and normalize to
    /// `resolution × resolution` RGB.
    ///
    /// Regions of the window outside the source image come out black. A
    /// window that misses the image entirely still yields a black image of
    /// the nominal size; only the zoom-degeneracy case fails.
    pub fn forward(
        &self,
        image: &RgbImage,
        center: Point2<f64>,
        scale: f64,
        angle: f64,
    ) -> Result<(RgbImage, CropGeometry)> {
        ensure!(scale > 0.0, "scale must be positive, but got {}", scale);

        let resolution = self.resolution;
        let crop_ratio = PIXELS_PER_SCALE_UNIT * scale / resolution as f64;

        let mut center = center;
        let mut scale = scale;

        // When the window is at least twice the output, shrink the whole
        // source first and cut the window in the shrunken coordinate space.
        let scaled_down = if crop_ratio >= 2.0 {
            let width = (image.width() as f64 / crop_ratio).floor() as u32;
            let height = (image.height() as f64 / crop_ratio).floor() as u32;

            if cmp::max(width, height) < 2 {
                return Err(DatasetError::DegenerateZoom {
                    crop_ratio,
                    width,
                    height,
                }
                .into());
            }

            center = center / crop_ratio;
            scale = scale / crop_ratio;
            Some(imageops::resize(image, width, height, FilterType::Triangle))
        } else {
            None
        };
        let source = scaled_down.as_ref().unwrap_or(image);

        let half = PIXELS_PER_SCALE_UNIT * scale / 2.0;
        let mut ul = (center - half).floor().cast::<i64>();
        let mut br = (center + half).floor().cast::<i64>();

        if crop_ratio >= 2.0 {
            // Integer truncation above can miss the output size by a pixel;
            // force the box to exactly `resolution` on both axes.
            br = br - (br - ul - resolution as i64);
        }

        let side = br.x - ul.x;
        let diagonal = (ul - br).cast::<f64>().length();
        let pad_length = ((diagonal - side as f64) / 2.0).ceil() as i64;

        if angle != 0.0 {
            ul = ul - pad_length;
            br = br + pad_length;
        }

        let canvas = paste_window(source, ul, br);

        let canvas = if angle != 0.0 {
            let rotated = rotate_about_center(&canvas, angle);
            let pad = pad_length as u32;
            imageops::crop_imm(
                &rotated,
                pad,
                pad,
                rotated.width() - 2 * pad,
                rotated.height() - 2 * pad,
            )
            .to_image()
        } else {
            canvas
        };

        let canvas = if crop_ratio < 2.0 {
            imageops::resize(&canvas, resolution, resolution, FilterType::Triangle)
        } else {
            canvas
        };

        Ok((
            canvas,
            CropGeometry {
                center,
                scale,
                crop_ratio,
            },
        ))
    }
}

/// Paste the part of `source` overlapping the `[ul, br)` box onto a black
/// canvas of the box size.
fn paste_window(source: &RgbImage, ul: Point2<i64>, br: Point2<i64>) -> RgbImage {
    let canvas_width = cmp::max(br.x - ul.x, 1) as u32;
    let canvas_height = cmp::max(br.y - ul.y, 1) as u32;
    let mut canvas = RgbImage::new(canvas_width, canvas_height);

    let (width, height) = source.dimensions();
    let left = cmp::max(ul.x, 0);
    let top = cmp::max(ul.y, 0);
    let right = cmp::min(br.x, width as i64);
    let bottom = cmp::min(br.y, height as i64);

    if right > left && bottom > top {
        let window = imageops::crop_imm(
            source,
            left as u32,
            top as u32,
            (right - left) as u32,
            (bottom - top) as u32,
        )
        .to_image();
        imageops::replace(&mut canvas, &window, left - ul.x, top - ul.y);
    }

    canvas
}

/// Rotate in place about the canvas center with bilinear resampling.
///
/// Samples falling outside the canvas come out black. The forward map
/// matches [`Point2::rotate`], which keeps rotated pixels and remapped
/// labels on the same semantic body point.
fn rotate_about_center(image: &RgbImage, degrees: f64) -> RgbImage {
    let (width, height) = image.dimensions();
    let cx = width as f64 / 2.0;
    let cy = height as f64 / 2.0;
    let (sin, cos) = degrees.to_radians().sin_cos();

    let mut output = RgbImage::new(width, height);
    for (x, y, pixel) in output.enumerate_pixels_mut() {
        let dx = x as f64 - cx;
        let dy = y as f64 - cy;
        // inverse of the forward rotation
        let src_x = cos * dx - sin * dy + cx;
        let src_y = sin * dx + cos * dy + cy;
        *pixel = sample_bilinear(image, src_x, src_y);
    }

    output
}

fn sample_bilinear(image: &RgbImage, x: f64, y: f64) -> Rgb<u8> {
    let (width, height) = image.dimensions();
    if x < 0.0 || y < 0.0 || x > (width - 1) as f64 || y > (height - 1) as f64 {
        return Rgb([0, 0, 0]);
    }

    let x0 = x.floor() as u32;
    let y0 = y.floor() as u32;
    let x1 = cmp::min(x0 + 1, width - 1);
    let y1 = cmp::min(y0 + 1, height - 1);
    let fx = x - x0 as f64;
    let fy = y - y0 as f64;

    let mut out = [0u8; 3];
    for channel in 0..3 {
        let p00 = image.get_pixel(x0, y0)[channel] as f64;
        let p10 = image.get_pixel(x1, y0)[channel] as f64;
        let p01 = image.get_pixel(x0, y1)[channel] as f64;
        let p11 = image.get_pixel(x1, y1)[channel] as f64;
        let value = p00 * (1.0 - fx) * (1.0 - fy)
            + p10 * fx * (1.0 - fy)
            + p01 * (1.0 - fx) * fy
            + p11 * fx * fy;
        out[channel] = value.clamp(0.0, 255.0).round() as u8;
    }

    Rgb(out)
}

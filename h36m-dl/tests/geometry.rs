//! Pixel/label agreement of the crop engine and the coordinate remapper.

use h36m_dl::processor::{CoordinateRemapperInit, CropEngineInit};
use image::{Rgb, RgbImage};
use keypoint::Point2;

const RESOLUTION: u32 = 256;
const VOXEL_XY_RES: usize = 64;

/// Black image with a white 3x3 marker centered on `mark`.
fn marked_image(width: u32, height: u32, mark: Point2<i64>) -> RgbImage {
    let mut image = RgbImage::new(width, height);
    for dy in -1..=1 {
        for dx in -1..=1 {
            let x = (mark.x + dx) as u32;
            let y = (mark.y + dy) as u32;
            image.put_pixel(x, y, Rgb([255, 255, 255]));
        }
    }
    image
}

/// Intensity-weighted centroid; with a black background this is the marker
/// center.
fn centroid(image: &RgbImage) -> (f64, f64) {
    let mut weight_sum = 0.0;
    let mut x_sum = 0.0;
    let mut y_sum = 0.0;
    for (x, y, pixel) in image.enumerate_pixels() {
        let weight = pixel[0] as f64 + pixel[1] as f64 + pixel[2] as f64;
        weight_sum += weight;
        x_sum += x as f64 * weight;
        y_sum += y as f64 * weight;
    }
    assert!(weight_sum > 0.0, "marker vanished");
    (x_sum / weight_sum, y_sum / weight_sum)
}

fn run_pipeline(joint: Point2<f64>, center: Point2<f64>, scale: f64, angle: f64) -> (f64, f64, f64, f64) {
    let crop_engine = CropEngineInit {
        resolution: RESOLUTION,
    }
    .build()
    .unwrap();
    let remapper = CoordinateRemapperInit {
        voxel_xy_resolution: VOXEL_XY_RES,
    }
    .build()
    .unwrap();

    let image = marked_image(500, 400, joint.cast::<i64>());
    let (crop, _) = crop_engine.forward(&image, center, scale, angle).unwrap();
    let coords = remapper
        .forward(&[joint], center, 200.0 * scale, angle, &[1.0])
        .unwrap();

    let (marker_x, marker_y) = centroid(&crop);
    let pixels_per_voxel = RESOLUTION as f64 / VOXEL_XY_RES as f64;
    let expected_x = coords[[0, 0]] * pixels_per_voxel;
    let expected_y = coords[[0, 1]] * pixels_per_voxel;

    (marker_x, marker_y, expected_x, expected_y)
}

#[test]
fn remapped_coords_hit_the_marker_without_rotation() {
    let (marker_x, marker_y, expected_x, expected_y) = run_pipeline(
        Point2::new(280.0, 230.0),
        Point2::new(250.0, 200.0),
        1.0,
        0.0,
    );

    assert!(
        (marker_x - expected_x).abs() <= 1.0 && (marker_y - expected_y).abs() <= 1.0,
        "marker at ({:.2}, {:.2}), label at ({:.2}, {:.2})",
        marker_x,
        marker_y,
        expected_x,
        expected_y
    );
}

#[test]
fn remapped_coords_follow_the_marker_under_rotation() {
    for angle in [30.0, -22.5, 90.0] {
        let (marker_x, marker_y, expected_x, expected_y) = run_pipeline(
            Point2::new(280.0, 230.0),
            Point2::new(250.0, 200.0),
            1.0,
            angle,
        );

        assert!(
            (marker_x - expected_x).abs() <= 3.0 && (marker_y - expected_y).abs() <= 3.0,
            "angle {}: marker at ({:.2}, {:.2}), label at ({:.2}, {:.2})",
            angle,
            marker_x,
            marker_y,
            expected_x,
            expected_y
        );
    }
}

#[test]
fn off_center_crop_still_matches_labels() {
    let (marker_x, marker_y, expected_x, expected_y) = run_pipeline(
        Point2::new(120.0, 310.0),
        Point2::new(150.0, 280.0),
        0.8,
        0.0,
    );

    assert!(
        (marker_x - expected_x).abs() <= 1.5 && (marker_y - expected_y).abs() <= 1.5,
        "marker at ({:.2}, {:.2}), label at ({:.2}, {:.2})",
        marker_x,
        marker_y,
        expected_x,
        expected_y
    );
}

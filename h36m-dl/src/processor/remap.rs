//! Joint-coordinate remapping into the voxel coordinate space.

use crate::common::*;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CoordinateRemapperInit {
    /// Side of the square voxel coordinate space.
    pub voxel_xy_resolution: usize,
}

impl CoordinateRemapperInit {
    pub fn build(self) -> Result<CoordinateRemapper> {
        let Self {
            voxel_xy_resolution,
        } = self;
        ensure!(voxel_xy_resolution > 0, "voxel_xy_resolution must be positive");

        Ok(CoordinateRemapper {
            voxel_xy_res: voxel_xy_resolution as f64,
        })
    }
}

impl Default for CoordinateRemapperInit {
    fn default() -> Self {
        Self {
            voxel_xy_resolution: 64,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CoordinateRemapper {
    voxel_xy_res: f64,
}

impl CoordinateRemapper {
    pub fn voxel_xy_resolution(&self) -> f64 {
        self.voxel_xy_res
    }

    /// Map raw joint positions into voxel space with the same net transform
    /// the crop engine applies to pixels.
    ///
    /// `image_xy_res` is the side of the crop window in source pixels and
    /// `angle` the rotation in degrees, both from the augmentation
    /// parameters. The depth index `z_index` rides along unmodified. Joints
    /// landing outside `[0, voxel_xy_resolution)` are kept; consumers decide
    /// what to do with them. Rows keep the input joint order as `(x, y, z)`.
    pub fn forward(
        &self,
        part: &[Point2<f64>],
        center: Point2<f64>,
        image_xy_res: f64,
        angle: f64,
        z_index: &[f64],
    ) -> Result<Array2<f64>> {
        ensure!(
            part.len() == z_index.len(),
            "joint count mismatch: {} positions vs {} depth indices",
            part.len(),
            z_index.len()
        );
        ensure!(image_xy_res > 0.0, "image_xy_res must be positive");

        let voxel_center = Point2::new(self.voxel_xy_res / 2.0, self.voxel_xy_res / 2.0);
        let radians = angle.to_radians();

        let mut coords = Array2::zeros((part.len(), 3));
        for (row, (&point, &z)) in izip!(part, z_index).enumerate() {
            let mut xy = (point - center) * self.voxel_xy_res / image_xy_res + voxel_center;
            if angle != 0.0 {
                xy = (xy - voxel_center).rotate(radians) + voxel_center;
            }
            coords[[row, 0]] = xy.x;
            coords[[row, 1]] = xy.y;
            coords[[row, 2]] = z;
        }

        Ok(coords)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn remapper(resolution: usize) -> CoordinateRemapper {
        CoordinateRemapperInit {
            voxel_xy_resolution: resolution,
        }
        .build()
        .unwrap()
    }

    #[test]
    fn center_joint_maps_to_voxel_center() {
        let remap = remapper(64);
        let center = Point2::new(100.0, 100.0);
        let coords = remap
            .forward(&[center], center, 200.0, 0.0, &[5.0])
            .unwrap();

        assert_eq!(coords[[0, 0]], 32.0);
        assert_eq!(coords[[0, 1]], 32.0);
        assert_eq!(coords[[0, 2]], 5.0);
    }

    #[test]
    fn layout_is_invariant_under_density_change() {
        let remap = remapper(64);
        let center = Point2::new(50.0, 80.0);
        let offsets = [
            Point2::new(10.0, -20.0),
            Point2::new(-35.5, 12.0),
            Point2::new(0.0, 44.0),
        ];
        let z = [1.0, 2.0, 3.0];

        let base: Vec<_> = offsets.iter().map(|&off| center + off).collect();
        let doubled: Vec<_> = offsets.iter().map(|&off| center + off * 2.0).collect();

        let lhs = remap.forward(&base, center, 200.0, 0.0, &z).unwrap();
        let rhs = remap.forward(&doubled, center, 400.0, 0.0, &z).unwrap();

        for (a, b) in lhs.iter().zip(rhs.iter()) {
            assert_abs_diff_eq!(a, b, epsilon = 1e-9);
        }
    }

    #[test]
    fn rotation_turns_counter_clockwise() {
        let remap = remapper(64);
        let center = Point2::new(100.0, 100.0);
        // 10 voxel units to the right of the window center
        let part = [Point2::new(131.25, 100.0)];
        let coords = remap.forward(&part, center, 200.0, 90.0, &[1.0]).unwrap();

        assert_abs_diff_eq!(coords[[0, 0]], 32.0, epsilon = 1e-9);
        assert_abs_diff_eq!(coords[[0, 1]], 22.0, epsilon = 1e-9);
    }

    #[test]
    fn out_of_frame_joint_is_kept() {
        let remap = remapper(64);
        let center = Point2::new(100.0, 100.0);
        let part = [Point2::new(1000.0, -400.0)];
        let coords = remap.forward(&part, center, 200.0, 0.0, &[9.0]).unwrap();

        assert!(coords[[0, 0]] >= 64.0);
        assert!(coords[[0, 1]] < 0.0);
        assert_eq!(coords[[0, 2]], 9.0);
    }

    #[test]
    fn joint_order_is_preserved() {
        let remap = remapper(64);
        let center = Point2::new(0.0, 0.0);
        let part = [Point2::new(-10.0, 0.0), Point2::new(10.0, 0.0)];
        let coords = remap.forward(&part, center, 100.0, 0.0, &[1.0, 2.0]).unwrap();

        assert!(coords[[0, 0]] < coords[[1, 0]]);
        assert_eq!(coords[[0, 2]], 1.0);
        assert_eq!(coords[[1, 2]], 2.0);
    }

    #[test]
    fn mismatched_joint_counts_are_rejected() {
        let remap = remapper(64);
        let result = remap.forward(
            &[Point2::new(0.0, 0.0)],
            Point2::new(0.0, 0.0),
            200.0,
            0.0,
            &[1.0, 2.0],
        );
        assert!(result.is_err());
    }
}

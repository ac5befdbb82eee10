//! Dense voxel-heatmap rasterization.
//!
//! The alternative supervision target: each in-frame joint becomes a
//! truncated 3D Gaussian in a `(joint, Σz_res, xy, xy)` volume, one slab of
//! depth bins per z-resolution level. Consumes the coordinate remapper's
//! output so the xy mapping is shared, not duplicated.

use crate::common::*;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VoxelRasterizerInit {
    /// Gaussian std of the xy heatmap, in voxel units.
    pub heatmap_xy_coefficient: R64,
    /// Side of the square voxel coordinate space.
    pub voxel_xy_resolution: usize,
    /// Depth-bin counts per level, coarse to fine; the last entry is the
    /// native range of the depth index.
    pub voxel_z_resolutions: Vec<usize>,
}

impl VoxelRasterizerInit {
    pub fn build(self) -> Result<VoxelRasterizer> {
        let Self {
            heatmap_xy_coefficient,
            voxel_xy_resolution,
            voxel_z_resolutions,
        } = self;

        ensure!(
            heatmap_xy_coefficient > 0.0,
            "heatmap_xy_coefficient must be positive"
        );
        ensure!(voxel_xy_resolution > 0, "voxel_xy_resolution must be positive");
        ensure!(
            !voxel_z_resolutions.is_empty(),
            "voxel_z_resolutions must not be empty"
        );
        ensure!(
            voxel_z_resolutions.iter().all(|&res| res > 0),
            "voxel_z_resolutions entries must be positive"
        );

        let fine_z_res = *voxel_z_resolutions.last().unwrap() as f64;

        Ok(VoxelRasterizer {
            xy_coeff: heatmap_xy_coefficient.raw(),
            xy_res: voxel_xy_resolution,
            z_res_list: voxel_z_resolutions,
            fine_z_res,
        })
    }
}

#[derive(Debug, Clone)]
pub struct VoxelRasterizer {
    xy_coeff: f64,
    xy_res: usize,
    z_res_list: Vec<usize>,
    fine_z_res: f64,
}

impl VoxelRasterizer {
    /// Total depth bins across all resolution levels.
    pub fn z_bins(&self) -> usize {
        self.z_res_list.iter().sum()
    }

    /// Depth window of the Gaussian at level `z_res`, in bins. Always odd;
    /// 1, 1, 1, 3, 5, 7, 13 for levels 1..=64 at coefficient 2.
    fn z_coefficient(&self, z_res: usize) -> usize {
        let raw = 6.0 * self.xy_coeff * z_res as f64 / self.fine_z_res + 1.0;
        2 * (raw / 2.0).floor() as usize + 1
    }

    /// Splat every in-frame joint into the volume.
    ///
    /// `coords` are the remapper's `(x, y, z)` rows; the z column is the
    /// 1-based depth index at the finest level. Joints outside
    /// `[0, voxel_xy_resolution)` leave their slab empty.
    pub fn forward(&self, coords: &Array2<f64>) -> Result<Array4<f32>> {
        ensure!(
            coords.ncols() == 3,
            "coords must have 3 columns, but got {}",
            coords.ncols()
        );

        let num_joints = coords.nrows();
        let mut volume = Array4::zeros((num_joints, self.z_bins(), self.xy_res, self.xy_res));

        let mut level_offset = 0;
        for &z_res in &self.z_res_list {
            let z_coeff = self.z_coefficient(z_res);

            for joint in 0..num_joints {
                let x = coords[[joint, 0]];
                let y = coords[[joint, 1]];
                let z_index = coords[[joint, 2]];

                let bound = self.xy_res as f64;
                if x < 0.0 || x >= bound || y < 0.0 || y >= bound {
                    continue;
                }

                // 1-based depth index, 0-based bin
                let z = (z_index * z_res as f64 / self.fine_z_res).ceil() as i64 - 1;
                self.splat(
                    &mut volume,
                    joint,
                    level_offset,
                    z_res,
                    Point2::new(x, y),
                    z,
                    z_coeff,
                );
            }

            level_offset += z_res;
        }

        Ok(volume)
    }

    fn splat(
        &self,
        volume: &mut Array4<f32>,
        joint: usize,
        level_offset: usize,
        z_res: usize,
        xy: Point2<f64>,
        z: i64,
        z_coeff: usize,
    ) {
        let xy_reach = (3.0 * self.xy_coeff).ceil() as i64;
        let xy_var = 2.0 * self.xy_coeff * self.xy_coeff;
        let z_reach = (z_coeff as i64 - 1) / 2;
        let z_sigma = (z_coeff as f64 - 1.0) / 6.0;

        let x0 = xy.x.floor() as i64;
        let y0 = xy.y.floor() as i64;

        for dz in -z_reach..=z_reach {
            let bin = z + dz;
            if bin < 0 || bin >= z_res as i64 {
                continue;
            }
            let z_weight = if z_reach == 0 {
                1.0
            } else {
                (-(dz * dz) as f64 / (2.0 * z_sigma * z_sigma)).exp()
            };

            for grid_y in (y0 - xy_reach)..=(y0 + xy_reach) {
                if grid_y < 0 || grid_y >= self.xy_res as i64 {
                    continue;
                }
                for grid_x in (x0 - xy_reach)..=(x0 + xy_reach) {
                    if grid_x < 0 || grid_x >= self.xy_res as i64 {
                        continue;
                    }

                    let dx = grid_x as f64 - xy.x;
                    let dy = grid_y as f64 - xy.y;
                    let value = (z_weight * (-(dx * dx + dy * dy) / xy_var).exp()) as f32;

                    let cell = &mut volume[[
                        joint,
                        level_offset + bin as usize,
                        grid_y as usize,
                        grid_x as usize,
                    ]];
                    *cell = cell.max(value);
                }
            }
        }
    }
}

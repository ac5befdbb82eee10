use crate::common::*;

/// The per-sample annotation tuple pulled from the store.
#[derive(Debug, Clone, PartialEq)]
pub struct RawSample {
    pub image_name: String,
    /// 3D joint positions, carried through for downstream consumers.
    pub joints_3d: Vec<[f64; 3]>,
    pub center: Point2<f64>,
    pub scale: f64,
    pub part: Vec<Point2<f64>>,
    pub z_index: Vec<f64>,
}

/// Supervision target variants.
#[derive(Debug, Clone, PartialEq)]
pub enum Target {
    /// Per-joint `(x, y, z)` rows in voxel coordinates.
    Coordinates(Array2<f64>),
    /// Dense per-joint Gaussian volumes.
    VoxelHeatmap(Array4<f32>),
}

/// The assembled training sample.
#[derive(Debug, Clone, PartialEq)]
pub struct PoseRecord {
    /// CHW image with values in `[0, 1]`.
    pub image: Array3<f32>,
    pub target: Target,
}

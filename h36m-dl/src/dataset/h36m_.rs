use super::*;
use crate::{
    common::*,
    error::DatasetError,
    processor::{
        AugmentSampler, AugmentSamplerInit, CoordinateRemapper, CoordinateRemapperInit,
        CropEngine, CropEngineInit, VoxelRasterizer, VoxelRasterizerInit, PIXELS_PER_SCALE_UNIT,
    },
    utils,
};

/// Supervision target selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OutputMode {
    #[default]
    Coordinates,
    VoxelHeatmap,
}

/// Which crop geometry the label remap observes when the zoom-out branch
/// rescales the window.
///
/// `PreDownscale` feeds the remapper the raw center and window size, which
/// matches the crop engine's net source-to-output mapping on both branches.
/// `PostDownscale` feeds it the adjusted values instead, for comparison
/// runs against reference outputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RemapScale {
    #[default]
    PreDownscale,
    PostDownscale,
}

/// H36M dataset configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct H36mDatasetInit {
    /// Directory holding one `{task}.json` annotation table per task.
    pub annotation_path: PathBuf,
    /// Root of the `{subject}/{image_name}` image tree.
    pub image_path: PathBuf,
    /// Subject directories covered by the annotation tables.
    pub subjects: Vec<String>,
    pub task: Task,
    pub heatmap_xy_coefficient: R64,
    pub voxel_xy_resolution: usize,
    pub voxel_z_resolutions: Vec<usize>,
    #[serde(default = "default_resolution")]
    pub resolution: u32,
    #[serde(default)]
    pub output_mode: OutputMode,
    #[serde(default)]
    pub remap_scale: RemapScale,
    #[serde(default)]
    pub augment: AugmentSamplerInit,
}

fn default_resolution() -> u32 {
    256
}

impl H36mDatasetInit {
    pub fn load(self) -> Result<H36mDataset> {
        let Self {
            annotation_path,
            image_path,
            subjects,
            task,
            heatmap_xy_coefficient,
            voxel_xy_resolution,
            voxel_z_resolutions,
            resolution,
            output_mode,
            remap_scale,
            augment,
        } = self;

        let store = AnnotationStore::load(&annotation_path)?;

        // annotation mismatches are fatal here rather than on first access
        let table = store.table(task)?;
        for &kind in &ANNOTATIONS[&task] {
            if !table.has(kind) {
                return Err(DatasetError::AnnotationKey {
                    task: task.to_string(),
                    kind: kind.to_string(),
                }
                .into());
            }
        }
        let num_joints = table
            .part
            .as_ref()
            .and_then(|column| column.first())
            .map_or(0, Vec::len);

        let sampler = augment.build()?;
        let crop = CropEngineInit { resolution }.build()?;
        let remap = CoordinateRemapperInit {
            voxel_xy_resolution,
        }
        .build()?;
        let voxel = VoxelRasterizerInit {
            heatmap_xy_coefficient,
            voxel_xy_resolution,
            voxel_z_resolutions,
        }
        .build()?;

        Ok(H36mDataset {
            store,
            task,
            image_path,
            subjects,
            num_joints,
            sampler,
            crop,
            remap,
            voxel,
            output_mode,
            remap_scale,
        })
    }
}

/// The H36M single-person pose dataset.
#[derive(Debug)]
pub struct H36mDataset {
    store: AnnotationStore,
    task: Task,
    image_path: PathBuf,
    subjects: Vec<String>,
    num_joints: usize,
    sampler: AugmentSampler,
    crop: CropEngine,
    remap: CoordinateRemapper,
    voxel: VoxelRasterizer,
    output_mode: OutputMode,
    remap_scale: RemapScale,
}

impl H36mDataset {
    pub fn task(&self) -> Task {
        self.task
    }

    pub fn subjects(&self) -> &[String] {
        &self.subjects
    }

    pub fn output_mode(&self) -> OutputMode {
        self.output_mode
    }

    /// Assemble the sample at `index` with an explicit randomness source.
    ///
    /// [`nth`](RandomAccessDataset::nth) draws from entropy; a seeded
    /// generator here makes the augmentation reproducible.
    pub fn nth_with_rng<R>(&self, index: usize, rng: &mut R) -> Result<PoseRecord>
    where
        R: Rng + ?Sized,
    {
        let raw = self.store.raw(self.task, index)?;
        let name = utils::decode_image_name(&raw.image_name)?;

        let params = self.sampler.sample(raw.scale, rng);

        let path = self.image_path.join(&name.subject).join(&raw.image_name);
        let image = image::open(&path)
            .with_context(|| format!("failed to load image file {}", path.display()))?
            .to_rgb8();

        let (crop, geometry) = self
            .crop
            .forward(&image, raw.center, params.scale, params.angle)?;

        let (center, image_xy_res) = match self.remap_scale {
            RemapScale::PreDownscale => (raw.center, params.image_xy_resolution()),
            RemapScale::PostDownscale => {
                (geometry.center, PIXELS_PER_SCALE_UNIT * geometry.scale)
            }
        };
        let coords = self
            .remap
            .forward(&raw.part, center, image_xy_res, params.angle, &raw.z_index)?;

        let target = match self.output_mode {
            OutputMode::Coordinates => Target::Coordinates(coords),
            OutputMode::VoxelHeatmap => Target::VoxelHeatmap(self.voxel.forward(&coords)?),
        };

        Ok(PoseRecord {
            image: utils::to_chw_tensor(&crop),
            target,
        })
    }
}

impl GenericDataset for H36mDataset {
    fn input_channels(&self) -> usize {
        3
    }

    fn num_joints(&self) -> usize {
        self.num_joints
    }
}

impl RandomAccessDataset for H36mDataset {
    fn num_records(&self) -> usize {
        self.store.num_samples(self.task).unwrap_or(0)
    }

    fn nth(&self, index: usize) -> Result<PoseRecord> {
        let mut rng = StdRng::from_entropy();
        self.nth_with_rng(index, &mut rng)
    }
}

//! The on-disk annotation store.

use super::{Annotation, RawSample, Task, TASKS};
use crate::{common::*, error::DatasetError};

/// Column-oriented annotation table of one task.
///
/// Index `i` across columns refers to the same sample. The image column
/// anchors the table length; the remaining kinds are optional and checked
/// against it at load time.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnnotationTable {
    pub image: Vec<String>,
    #[serde(default)]
    pub joints_3d: Option<Vec<Vec<[f64; 3]>>>,
    #[serde(default)]
    pub center: Option<Vec<[f64; 2]>>,
    #[serde(default)]
    pub part: Option<Vec<Vec<[f64; 2]>>>,
    #[serde(default)]
    pub scale: Option<Vec<f64>>,
    #[serde(default)]
    pub z_index: Option<Vec<Vec<f64>>>,
}

impl AnnotationTable {
    pub fn len(&self) -> usize {
        self.image.len()
    }

    pub fn is_empty(&self) -> bool {
        self.image.is_empty()
    }

    pub fn has(&self, kind: Annotation) -> bool {
        self.column_len(kind).is_some()
    }

    fn column_len(&self, kind: Annotation) -> Option<usize> {
        match kind {
            Annotation::Image => Some(self.image.len()),
            Annotation::Joints3d => self.joints_3d.as_ref().map(Vec::len),
            Annotation::Center => self.center.as_ref().map(Vec::len),
            Annotation::Part => self.part.as_ref().map(Vec::len),
            Annotation::Scale => self.scale.as_ref().map(Vec::len),
            Annotation::ZIndex => self.z_index.as_ref().map(Vec::len),
        }
    }

    fn validate(&self) -> Result<()> {
        let kinds = [
            Annotation::Joints3d,
            Annotation::Center,
            Annotation::Part,
            Annotation::Scale,
            Annotation::ZIndex,
        ];
        for kind in kinds {
            if let Some(len) = self.column_len(kind) {
                ensure!(
                    len == self.len(),
                    "column `{}` has {} entries, but `image` has {}",
                    kind,
                    len,
                    self.len()
                );
            }
        }
        Ok(())
    }
}

/// In-memory annotation store with a load-once, read-many lifecycle.
#[derive(Debug, Clone)]
pub struct AnnotationStore {
    tables: HashMap<Task, AnnotationTable>,
}

impl AnnotationStore {
    /// Load `{task}.json` for every known task under `dir`.
    ///
    /// Tasks without a file on disk are simply absent; touching them later
    /// fails with [`DatasetError::UnknownTask`].
    pub fn load(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        let mut tables = HashMap::new();

        for task in TASKS {
            let path = dir.join(format!("{}.json", task));
            if !path.exists() {
                warn!("no annotation table at {}", path.display());
                continue;
            }

            let file = File::open(&path)
                .with_context(|| format!("failed to open annotation table {}", path.display()))?;
            let table: AnnotationTable = serde_json::from_reader(BufReader::new(file))
                .with_context(|| format!("failed to parse annotation table {}", path.display()))?;
            table
                .validate()
                .with_context(|| format!("inconsistent annotation table {}", path.display()))?;

            info!("loaded {} samples for task {}", table.len(), task);
            tables.insert(task, table);
        }

        Ok(Self { tables })
    }

    pub fn table(&self, task: Task) -> Result<&AnnotationTable> {
        self.tables.get(&task).ok_or_else(|| {
            Error::from(DatasetError::UnknownTask {
                task: task.to_string(),
            })
        })
    }

    pub fn num_samples(&self, task: Task) -> Result<usize> {
        Ok(self.table(task)?.len())
    }

    /// Assemble the raw tuple at `index` from the columns the task requires.
    pub fn raw(&self, task: Task, index: usize) -> Result<RawSample> {
        let table = self.table(task)?;
        ensure!(
            index < table.len(),
            "index {} out of bounds for task {} with {} samples",
            index,
            task,
            table.len()
        );

        let missing = |kind: Annotation| {
            Error::from(DatasetError::AnnotationKey {
                task: task.to_string(),
                kind: kind.to_string(),
            })
        };

        let image_name = table.image[index].clone();
        let joints_3d = table
            .joints_3d
            .as_ref()
            .ok_or_else(|| missing(Annotation::Joints3d))?[index]
            .clone();
        let center = Point2::from_xy(
            table
                .center
                .as_ref()
                .ok_or_else(|| missing(Annotation::Center))?[index],
        );
        let part = table
            .part
            .as_ref()
            .ok_or_else(|| missing(Annotation::Part))?[index]
            .iter()
            .copied()
            .map(Point2::from_xy)
            .collect();
        let scale = table
            .scale
            .as_ref()
            .ok_or_else(|| missing(Annotation::Scale))?[index];
        let z_index = table
            .z_index
            .as_ref()
            .ok_or_else(|| missing(Annotation::ZIndex))?[index]
            .clone();

        Ok(RawSample {
            image_name,
            joints_3d,
            center,
            scale,
            part,
            z_index,
        })
    }
}

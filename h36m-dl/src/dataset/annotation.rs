//! Task and annotation-kind vocabulary.

use crate::common::*;

/// Dataset splits, each with its own annotation table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Task {
    Train,
    Valid,
}

pub const TASKS: [Task; 2] = [Task::Train, Task::Valid];

impl Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Task::Train => "train",
            Task::Valid => "valid",
        };
        write!(f, "{}", name)
    }
}

/// Annotation kinds stored per sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Annotation {
    /// Image identifier.
    Image,
    /// 3D joint positions in camera space.
    Joints3d,
    /// Crop center in source-image pixels.
    Center,
    /// 2D joint positions in source-image pixels.
    Part,
    /// Bounding-box scale in 200 px units.
    Scale,
    /// 1-based per-joint depth index.
    ZIndex,
}

impl Display for Annotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Annotation::Image => "image",
            Annotation::Joints3d => "joints_3d",
            Annotation::Center => "center",
            Annotation::Part => "part",
            Annotation::Scale => "scale",
            Annotation::ZIndex => "z_index",
        };
        write!(f, "{}", name)
    }
}

/// Annotation kinds each task pulls per sample, beyond the image name.
pub static ANNOTATIONS: Lazy<IndexMap<Task, Vec<Annotation>>> = Lazy::new(|| {
    TASKS
        .iter()
        .map(|&task| {
            let kinds = vec![
                Annotation::Joints3d,
                Annotation::Center,
                Annotation::Part,
                Annotation::Scale,
                Annotation::ZIndex,
            ];
            (task, kinds)
        })
        .collect()
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_match_table_columns() {
        assert_eq!(Task::Train.to_string(), "train");
        assert_eq!(Annotation::ZIndex.to_string(), "z_index");
        assert_eq!(Annotation::Joints3d.to_string(), "joints_3d");
    }

    #[test]
    fn every_task_has_a_kind_list() {
        for task in TASKS {
            assert!(!ANNOTATIONS[&task].is_empty());
        }
    }
}

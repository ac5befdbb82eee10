pub use anyhow::{bail, ensure, format_err, Context as _, Error, Result};
pub use indexmap::IndexMap;
pub use itertools::izip;
pub use keypoint::Point2;
pub use log::{info, warn};
pub use ndarray::{Array2, Array3, Array4};
pub use noisy_float::prelude::*;
pub use once_cell::sync::Lazy;
pub use rand::prelude::*;
pub use serde::{Deserialize, Serialize};
pub use std::{
    cmp,
    collections::HashMap,
    fmt,
    fmt::{Debug, Display},
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

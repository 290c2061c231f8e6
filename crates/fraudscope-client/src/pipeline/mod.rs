//! Offline dataset stages: cleaning plus train/test split, and descriptive
//! statistics. Both read one CSV file and write artifacts under a root dir.

pub mod stats;
pub mod transform;

use std::path::{Path, PathBuf};

pub(crate) fn artifact_path(root_dir: &Path, file_name: &str) -> PathBuf {
    root_dir.join(file_name)
}

//! Per-point working directories.

use crate::error::{HarnessError, Result};
use exspeed::EmissionVariant;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Scoped working directory for one parameter point.
///
/// [`PointDir::acquire`] wipes whatever a previous run left at the same
/// location and recreates empty source and build directories for both
/// variants. [`PointDir::release`] removes the directory again. A `PointDir`
/// dropped without being released (a build or run failed) stays on disk so
/// the generated sources can be inspected.
#[derive(Debug)]
pub struct PointDir {
    root: PathBuf,
    settled: bool,
}

impl PointDir {
    pub fn acquire(parent: &Path, label: &str) -> Result<Self> {
        let root = parent.join(label);
        if root.exists() {
            std::fs::remove_dir_all(&root).map_err(|e| HarnessError::io(&root, e))?;
        }
        let dir = Self {
            root,
            settled: false,
        };
        for variant in EmissionVariant::ALL {
            for path in [dir.src_dir(variant), dir.build_dir(variant)] {
                std::fs::create_dir_all(&path).map_err(|e| HarnessError::io(&path, e))?;
            }
        }
        debug!(root = %dir.root.display(), "acquired point directory");
        Ok(dir)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn src_dir(&self, variant: EmissionVariant) -> PathBuf {
        self.root.join(variant.dir_name())
    }

    pub fn build_dir(&self, variant: EmissionVariant) -> PathBuf {
        let name = match variant {
            EmissionVariant::ExceptionStyle => "buildcpp",
            EmissionVariant::ErrorCodeStyle => "buildc",
        };
        self.root.join(name)
    }

    /// Tear the directory down after a successful point.
    pub fn release(mut self) -> Result<()> {
        self.settled = true;
        std::fs::remove_dir_all(&self.root).map_err(|e| HarnessError::io(&self.root, e))
    }

    /// Keep the directory on disk and return its location.
    pub fn keep(mut self) -> PathBuf {
        self.settled = true;
        std::mem::take(&mut self.root)
    }
}

impl Drop for PointDir {
    fn drop(&mut self) {
        if !self.settled {
            warn!(
                root = %self.root.display(),
                "leaving generated sources on disk for inspection"
            );
        }
    }
}

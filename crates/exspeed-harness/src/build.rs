//! Turning a materialized [`SourceTree`] into an executable.
//!
//! Every step blocks until the external tool exits. There is no timeout and
//! no retry: a non-zero exit becomes [`HarnessError::BuildFailed`] carrying
//! the tool's stderr, and the sources stay on disk.

use crate::error::{HarnessError, Result};
use exspeed::{EmissionVariant, SourceTree};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::debug;

/// The external build collaborator.
pub trait Builder {
    /// Short name used in logs and reports.
    fn name(&self) -> &'static str;

    /// Build `tree`, already written to `src_dir`, into `build_dir`.
    ///
    /// Returns the path of the produced executable.
    fn build(&self, tree: &SourceTree, src_dir: &Path, build_dir: &Path) -> Result<PathBuf>;
}

impl<B: Builder + ?Sized> Builder for &B {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn build(&self, tree: &SourceTree, src_dir: &Path, build_dir: &Path) -> Result<PathBuf> {
        (**self).build(tree, src_dir, build_dir)
    }
}

/// Configure with `meson setup`, compile with `ninja`.
///
/// Uses the `meson.build` descriptor emitted with every tree.
#[derive(Debug, Clone)]
pub struct MesonBuilder {
    pub meson: String,
    pub ninja: String,
}

impl Default for MesonBuilder {
    fn default() -> Self {
        Self {
            meson: "meson".to_string(),
            ninja: "ninja".to_string(),
        }
    }
}

impl Builder for MesonBuilder {
    fn name(&self) -> &'static str {
        "meson"
    }

    fn build(&self, tree: &SourceTree, src_dir: &Path, build_dir: &Path) -> Result<PathBuf> {
        let mut setup = Command::new(&self.meson);
        setup.arg("setup").arg(build_dir).arg(src_dir);
        run_build_step(tree.variant, setup)?;

        let mut compile = Command::new(&self.ninja);
        compile.arg("-C").arg(build_dir);
        run_build_step(tree.variant, compile)?;

        locate_artifact(build_dir.join(&tree.executable))
    }
}

/// Invoke the C or C++ compiler directly on every compile unit.
///
/// The default flags match meson's `debugoptimized` build type.
#[derive(Debug, Clone)]
pub struct DirectBuilder {
    pub c_compiler: String,
    pub cxx_compiler: String,
    pub flags: Vec<String>,
}

impl Default for DirectBuilder {
    fn default() -> Self {
        Self {
            c_compiler: "cc".to_string(),
            cxx_compiler: "c++".to_string(),
            flags: vec!["-O2".to_string(), "-g".to_string()],
        }
    }
}

impl DirectBuilder {
    pub fn with_flags<I, S>(mut self, flags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.flags = flags.into_iter().map(Into::into).collect();
        self
    }

    fn compiler_for(&self, variant: EmissionVariant) -> &str {
        match variant {
            EmissionVariant::ExceptionStyle => &self.cxx_compiler,
            EmissionVariant::ErrorCodeStyle => &self.c_compiler,
        }
    }
}

impl Builder for DirectBuilder {
    fn name(&self) -> &'static str {
        "direct"
    }

    fn build(&self, tree: &SourceTree, src_dir: &Path, build_dir: &Path) -> Result<PathBuf> {
        // The compiler runs inside src_dir, so the output path must not be relative.
        let build_dir = build_dir
            .canonicalize()
            .map_err(|e| HarnessError::io(build_dir, e))?;
        let output = build_dir.join(&tree.executable);

        let mut compile = Command::new(self.compiler_for(tree.variant));
        compile
            .current_dir(src_dir)
            .args(&self.flags)
            .arg("-o")
            .arg(&output)
            .args(tree.compile_units().map(|unit| unit.name.as_str()));
        run_build_step(tree.variant, compile)?;

        locate_artifact(output)
    }
}

fn run_build_step(variant: EmissionVariant, mut command: Command) -> Result<()> {
    let program = command.get_program().to_string_lossy().into_owned();
    debug!(%variant, %program, "running build step");

    let output = command
        .stdin(Stdio::null())
        .output()
        .map_err(|source| HarnessError::Spawn {
            program: program.clone(),
            source,
        })?;

    if !output.status.success() {
        return Err(HarnessError::BuildFailed {
            variant,
            command: describe(&command),
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        });
    }
    Ok(())
}

fn locate_artifact(path: PathBuf) -> Result<PathBuf> {
    if path.is_file() {
        Ok(path)
    } else {
        Err(HarnessError::MissingArtifact(path))
    }
}

/// Render a command line for error messages, eliding long argument lists.
fn describe(command: &Command) -> String {
    const SHOWN: usize = 8;
    let args: Vec<_> = command
        .get_args()
        .map(|a| a.to_string_lossy().into_owned())
        .collect();
    let mut text = command.get_program().to_string_lossy().into_owned();
    for arg in args.iter().take(SHOWN) {
        text.push(' ');
        text.push_str(arg);
    }
    if args.len() > SHOWN {
        text.push_str(&format!(" ... ({} more)", args.len() - SHOWN));
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_elides_long_argument_lists() {
        let mut command = Command::new("cc");
        command.args((0..20).map(|i| format!("node{}.c", i)));
        let text = describe(&command);
        assert!(text.starts_with("cc node0.c node1.c"));
        assert!(text.ends_with("... (12 more)"));
    }

    #[test]
    fn test_direct_compiler_per_variant() {
        let builder = DirectBuilder::default();
        assert_eq!(builder.compiler_for(EmissionVariant::ExceptionStyle), "c++");
        assert_eq!(builder.compiler_for(EmissionVariant::ErrorCodeStyle), "cc");
        let builder = builder.with_flags(["-O3"]);
        assert_eq!(builder.flags, vec!["-O3".to_string()]);
    }

    #[test]
    fn test_missing_tool_is_spawn_error() {
        let dir = tempfile::tempdir().unwrap();
        let spec = exspeed::GraphSpec::new(1, 1, 0).unwrap();
        let tree = exspeed::render(&spec, EmissionVariant::ErrorCodeStyle);
        tree.write_to(dir.path()).unwrap();
        let builder = DirectBuilder {
            c_compiler: "exspeed-no-such-compiler".to_string(),
            ..DirectBuilder::default()
        };
        let err = builder.build(&tree, dir.path(), dir.path()).unwrap_err();
        assert!(matches!(err, HarnessError::Spawn { .. }), "{err}");
    }
}

//! Manifest (macbundle.yaml) data structures
//!
//! The manifest is the tool's single configuration file. It names the
//! frameworks to vendor, the executables to relocate, and (optionally) the
//! bundle's Frameworks directory. All entities are transient; nothing is
//! written back.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{MacbundleError, Result};

/// Default manifest file name
pub const MANIFEST_FILE: &str = "macbundle.yaml";

/// Top-level manifest
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Manifest {
    /// Destination Frameworks directory inside the application bundle.
    /// Overridden by --frameworks-dir / MACBUNDLE_FRAMEWORKS_DIR.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frameworks_dir: Option<PathBuf>,

    /// Frameworks to vendor into the bundle
    #[serde(default)]
    pub frameworks: Vec<FrameworkSpec>,

    /// Executables whose load paths are rewritten
    #[serde(default)]
    pub executables: Vec<ExecutableSpec>,
}

/// A framework to vendor into the bundle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameworkSpec {
    /// Framework name without the .framework suffix (e.g. "Python", "SDL")
    pub name: String,

    /// Absolute path of the installed framework directory
    pub source: PathBuf,

    /// Framework version identifier (e.g. "3.10", "A")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Relative sub-paths of shared-library binaries inside the framework
    /// that themselves need relocation after vendoring
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub binaries: Vec<String>,

    /// Glob patterns excluded from the copy, matched against paths relative
    /// to the framework root (e.g. "**/Headers", "**/.DS_Store"); matching a
    /// directory prunes its whole subtree
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclude: Vec<String>,
}

/// An executable whose embedded load commands are edited
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutableSpec {
    /// Path to the binary (absolute, or relative to the working directory)
    pub path: PathBuf,

    /// Runtime search path to register, relative to the executable
    /// (e.g. "@executable_path/../Frameworks")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rpath: Option<String>,

    /// Load-path rewrite rules, applied in order
    #[serde(default)]
    pub rewrites: Vec<RewriteRule>,
}

/// A single (old absolute path, new relocation-token path) pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewriteRule {
    /// Old absolute install path, matched exactly against load commands
    pub from: String,

    /// New relocation-token path (e.g. "@rpath/Python.framework/Versions/3.10/Python")
    pub to: String,
}

impl FrameworkSpec {
    /// Directory name of the framework bundle, e.g. "SDL.framework"
    pub fn dir_name(&self) -> String {
        format!("{}.framework", self.name)
    }

    /// Destination of this framework inside the given Frameworks directory
    pub fn destination(&self, frameworks_dir: &Path) -> PathBuf {
        frameworks_dir.join(self.dir_name())
    }
}

impl Manifest {
    /// Load and validate a manifest from a YAML file
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(MacbundleError::ManifestNotFound {
                path: path.display().to_string(),
            });
        }

        let content =
            std::fs::read_to_string(path).map_err(|e| MacbundleError::ManifestParseFailed {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;

        let manifest: Self =
            serde_yaml::from_str(&content).map_err(|e| MacbundleError::ManifestParseFailed {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;

        manifest.validate()?;
        Ok(manifest)
    }

    /// Parse a manifest from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let manifest: Self = serde_yaml::from_str(yaml)?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Validate manifest contents
    pub fn validate(&self) -> Result<()> {
        let mut seen = std::collections::HashSet::new();
        for framework in &self.frameworks {
            if framework.name.is_empty() {
                return Err(crate::error::manifest_invalid(
                    "framework name must not be empty",
                ));
            }
            if framework.name.contains('/') {
                return Err(crate::error::manifest_invalid(format!(
                    "framework name '{}' must not contain '/'",
                    framework.name
                )));
            }
            if !seen.insert(framework.name.as_str()) {
                return Err(crate::error::manifest_invalid(format!(
                    "duplicate framework name '{}'",
                    framework.name
                )));
            }
            if framework.source.as_os_str().is_empty() {
                return Err(crate::error::manifest_invalid(format!(
                    "framework '{}' has an empty source path",
                    framework.name
                )));
            }
        }

        for executable in &self.executables {
            if executable.path.as_os_str().is_empty() {
                return Err(crate::error::manifest_invalid(
                    "executable path must not be empty",
                ));
            }
            for rule in &executable.rewrites {
                if rule.from.is_empty() || rule.to.is_empty() {
                    return Err(crate::error::manifest_invalid(format!(
                        "executable '{}' has a rewrite rule with an empty side",
                        executable.path.display()
                    )));
                }
            }
        }

        Ok(())
    }

    /// Look up a framework by name
    pub fn framework(&self, name: &str) -> Result<&FrameworkSpec> {
        self.frameworks
            .iter()
            .find(|f| f.name == name)
            .ok_or_else(|| MacbundleError::FrameworkNotFound {
                name: name.to_string(),
            })
    }

    /// Resolve the bundle's Frameworks directory.
    ///
    /// Resolution order: CLI flag / environment override, then the manifest's
    /// `frameworks_dir` key.
    pub fn resolve_frameworks_dir(&self, override_dir: Option<&Path>) -> Result<PathBuf> {
        if let Some(dir) = override_dir {
            return Ok(dir.to_path_buf());
        }
        self.frameworks_dir
            .clone()
            .ok_or(MacbundleError::NoFrameworksDir)
    }
}

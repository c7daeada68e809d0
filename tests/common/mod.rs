//! Common test utilities for macbundle integration tests

pub mod macho;

use std::path::PathBuf;
use tempfile::TempDir;

/// A scratch directory laid out like a packaging workspace: framework
/// sources on one side, an application bundle on the other.
#[allow(dead_code)]
pub struct TestBundle {
    pub temp: TempDir,
    pub path: PathBuf,
}

#[allow(dead_code)]
impl TestBundle {
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let path = temp.path().to_path_buf();
        Self { temp, path }
    }

    /// The bundle's Frameworks directory (not created up front)
    pub fn frameworks_dir(&self) -> PathBuf {
        self.path.join("App.app/Contents/Frameworks")
    }

    /// Create a source framework tree with a synthetic dylib at
    /// Versions/A/<name> whose install name is its absolute source path.
    pub fn make_framework(&self, name: &str) -> PathBuf {
        let framework = self
            .path
            .join("system-frameworks")
            .join(format!("{name}.framework"));
        let version = framework.join("Versions/A");
        std::fs::create_dir_all(version.join("Resources"))
            .expect("Failed to create framework tree");

        let dylib_path = version.join(name);
        let dylib = macho::MachFixture::new()
            .id(&dylib_path.display().to_string())
            .build();
        std::fs::write(&dylib_path, dylib).expect("Failed to write framework dylib");

        std::fs::write(
            version.join("Resources/Info.plist"),
            "<plist version=\"1.0\"/>",
        )
        .expect("Failed to write Info.plist");

        #[cfg(unix)]
        {
            std::os::unix::fs::symlink("A", framework.join("Versions/Current"))
                .expect("Failed to create Current symlink");
            std::os::unix::fs::symlink(format!("Versions/Current/{name}"), framework.join(name))
                .expect("Failed to create root symlink");
        }

        framework
    }

    /// Create a synthetic application executable that links the given paths
    pub fn make_executable(&self, relative: &str, load_paths: &[&str]) -> PathBuf {
        let path = self.path.join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create executable parent");
        }

        let mut fixture = macho::MachFixture::new();
        for load_path in load_paths {
            fixture = fixture.load(load_path);
        }
        std::fs::write(&path, fixture.build()).expect("Failed to write executable");
        path
    }

    /// Write the default manifest file
    pub fn write_manifest(&self, content: &str) -> PathBuf {
        let path = self.path.join("macbundle.yaml");
        std::fs::write(&path, content).expect("Failed to write manifest");
        path
    }

    pub fn file_exists(&self, relative: &str) -> bool {
        self.path.join(relative).exists()
    }
}

#![allow(dead_code, clippy::unwrap_used, clippy::expect_used)]

pub mod go_tree {
    use std::fs;
    use std::path::{Path, PathBuf};
    use structgen::{Generator, GeneratorConfig};
    use tempfile::TempDir;

    /// Scratch Go source tree removed on drop
    pub struct GoTree {
        dir: TempDir,
    }

    impl GoTree {
        pub fn new() -> Self {
            GoTree {
                dir: tempfile::tempdir().unwrap(),
            }
        }

        pub fn root(&self) -> &Path {
            self.dir.path()
        }

        pub fn path(&self, rel: &str) -> PathBuf {
            self.dir.path().join(rel)
        }

        /// Write `contents` to `rel`, creating parent directories.
        pub fn write(&self, rel: &str, contents: &str) -> PathBuf {
            let path = self.path(rel);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(&path, contents).unwrap();
            path
        }

        pub fn read(&self, rel: &str) -> String {
            fs::read_to_string(self.path(rel)).unwrap()
        }

        pub fn exists(&self, rel: &str) -> bool {
            self.path(rel).exists()
        }
    }

    /// Generator with the given formatter argv (empty for none).
    pub fn generator(formatter: &[&str]) -> Generator {
        let config = GeneratorConfig {
            formatter: formatter.iter().map(|s| s.to_string()).collect(),
            ..GeneratorConfig::default()
        };
        Generator::new(config, false)
    }
}

pub mod toolchain {
    use std::process::Command;

    /// Check if the Go toolchain is available
    pub fn go_available() -> bool {
        Command::new("go")
            .arg("version")
            .output()
            .map(|output| output.status.success())
            .unwrap_or(false)
    }
}

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Writes `content` at `root/relative`, creating parent directories.
pub fn write<P: AsRef<Path>>(root: &Path, relative: P, content: &str) -> PathBuf {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, content).unwrap();
    path
}

pub fn read<P: AsRef<Path>>(root: &Path, relative: P) -> String {
    fs::read_to_string(root.join(relative)).unwrap()
}

/// Temporary workspace holding a template root and an output directory.
pub struct Fixture {
    pub temp: TempDir,
}

impl Fixture {
    pub fn new() -> Self {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("templates/base")).unwrap();
        Self { temp }
    }

    pub fn root(&self) -> PathBuf {
        self.temp.path().join("templates")
    }

    pub fn base(&self) -> PathBuf {
        self.root().join("base")
    }

    /// Path of a top-level extension.
    pub fn extension(&self, id: &str) -> PathBuf {
        self.root().join("extensions").join(id)
    }

    /// Creates a top-level extension, with a `config.json` when `config` is given.
    pub fn add_extension(&self, id: &str, config: Option<&str>) -> PathBuf {
        let path = self.extension(id);
        fs::create_dir_all(&path).unwrap();
        if let Some(config) = config {
            write(&path, "config.json", config);
        }
        path
    }

    /// Output directory, created.
    pub fn target(&self) -> PathBuf {
        let path = self.temp.path().join("out");
        fs::create_dir_all(&path).unwrap();
        path
    }
}

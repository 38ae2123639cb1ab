//! Layered file-tree composition.
//!
//! Each layer is first turned into a [`CopyPlan`], an ordered list of entries
//! with their filter verdicts, and the plan is then executed with one
//! [`CopyStrategy`]. Existing destination files are never overwritten, so the
//! first layer to provide a path wins.

use crate::constants::{MANIFEST_FILE, PACKAGES_DIR};
use crate::error::Result;
use crate::filter::{build_globset, LayerFilter, Verdict};
use crate::manifest::merge_manifest;
use crate::options::ScaffoldOptions;
use crate::registry::ExtensionRegistry;
use log::{debug, info};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Dir,
    File,
    /// Recreated with the same link target, never followed
    Symlink,
}

/// One planned entry of a layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyEntry {
    pub source: PathBuf,
    pub destination: PathBuf,
    /// Path relative to the layer root
    pub relative: PathBuf,
    pub kind: EntryKind,
    pub verdict: Verdict,
}

/// Ordered entries of one layer, in file-name order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CopyPlan {
    pub entries: Vec<CopyEntry>,
}

impl CopyPlan {
    /// Entries that will be created in the target.
    pub fn kept(&self) -> impl Iterator<Item = &CopyEntry> {
        self.entries.iter().filter(|e| e.verdict == Verdict::Keep)
    }

    /// Relative paths of the kept files.
    pub fn kept_files(&self) -> Vec<&Path> {
        self.kept()
            .filter(|e| e.kind == EntryKind::File)
            .map(|e| e.relative.as_path())
            .collect()
    }
}

/// Walks `source_root` and records every entry with its verdict.
///
/// A skipped directory is recorded once and its subtree is not visited.
pub fn plan_layer(source_root: &Path, dest_root: &Path, filter: &LayerFilter) -> Result<CopyPlan> {
    let mut plan = CopyPlan::default();
    if !source_root.exists() {
        return Ok(plan);
    }

    let mut walker = WalkDir::new(source_root).min_depth(1).sort_by_file_name().into_iter();
    while let Some(entry) = walker.next() {
        let entry = entry?;
        let relative = entry.path().strip_prefix(source_root).unwrap_or(entry.path()).to_path_buf();
        let file_type = entry.file_type();
        let is_dir = file_type.is_dir();
        let verdict = filter.verdict(&relative, is_dir);

        if is_dir && verdict.is_skip() {
            walker.skip_current_dir();
        }

        plan.entries.push(CopyEntry {
            source: entry.path().to_path_buf(),
            destination: dest_root.join(&relative),
            relative,
            kind: if is_dir {
                EntryKind::Dir
            } else if file_type.is_symlink() {
                EntryKind::Symlink
            } else {
                EntryKind::File
            },
            verdict,
        });
    }
    Ok(plan)
}

/// How kept files land in the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyStrategy {
    Copy,
    /// Template edits stay visible in the generated project
    HardLink,
}

impl CopyStrategy {
    pub fn for_mode(dev: bool) -> Self {
        if dev {
            CopyStrategy::HardLink
        } else {
            CopyStrategy::Copy
        }
    }

    fn transfer(&self, source: &Path, destination: &Path) -> Result<()> {
        match self {
            CopyStrategy::Copy => {
                debug!("Copying file: {}", destination.display());
                fs::copy(source, destination)?;
            }
            CopyStrategy::HardLink => {
                debug!("Linking file: {}", destination.display());
                fs::hard_link(source, destination)?;
            }
        }
        Ok(())
    }
}

/// Outcome of executing one or more plans.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CopyReport {
    pub written: usize,
    /// Files left alone because an earlier layer already wrote them
    pub existing: usize,
}

impl std::ops::AddAssign for CopyReport {
    fn add_assign(&mut self, other: Self) {
        self.written += other.written;
        self.existing += other.existing;
    }
}

/// Creates the kept entries of `plan` in the target.
pub fn execute_plan(plan: &CopyPlan, strategy: CopyStrategy) -> Result<CopyReport> {
    let mut report = CopyReport::default();
    for entry in plan.kept() {
        match entry.kind {
            EntryKind::Dir => fs::create_dir_all(&entry.destination)?,
            EntryKind::File | EntryKind::Symlink => {
                if entry.destination.symlink_metadata().is_ok() {
                    debug!("Skipping existing file: {}", entry.destination.display());
                    report.existing += 1;
                    continue;
                }
                if let Some(parent) = entry.destination.parent() {
                    fs::create_dir_all(parent)?;
                }
                if entry.kind == EntryKind::Symlink {
                    copy_symlink(&entry.source, &entry.destination)?;
                } else {
                    strategy.transfer(&entry.source, &entry.destination)?;
                }
                report.written += 1;
            }
        }
    }
    Ok(report)
}

fn copy_symlink(source: &Path, destination: &Path) -> Result<()> {
    let link_target = fs::read_link(source)?;
    debug!("Linking symlink: {} -> {}", destination.display(), link_target.display());
    #[cfg(unix)]
    std::os::unix::fs::symlink(&link_target, destination)?;
    #[cfg(windows)]
    {
        if source.is_dir() {
            std::os::windows::fs::symlink_dir(&link_target, destination)?;
        } else {
            std::os::windows::fs::symlink_file(&link_target, destination)?;
        }
    }
    Ok(())
}

/// Composes the base layer into `target_dir` and merges its manifests.
///
/// In development mode the verbatim globs are excluded from the linked pass
/// and copied afterwards.
pub fn compose_base(options: &ScaffoldOptions, base_path: &Path, target_dir: &Path) -> Result<CopyReport> {
    info!("Composing base layer from {}", base_path.display());
    let strategy = CopyStrategy::for_mode(options.dev);
    let verbatim = build_globset(&options.dev_verbatim)?;

    let plan = plan_layer(base_path, target_dir, &LayerFilter::base(options.dev, verbatim.clone()))?;
    let mut report = execute_plan(&plan, strategy)?;

    for entry in WalkDir::new(base_path).sort_by_file_name() {
        let entry = entry?;
        if entry.file_type().is_file() && entry.file_name() == MANIFEST_FILE {
            let relative = entry.path().strip_prefix(base_path).unwrap_or(entry.path());
            merge_manifest(&target_dir.join(relative), entry.path(), options.dev)?;
        }
    }

    if options.dev {
        let plan = plan_layer(base_path, target_dir, &LayerFilter::verbatim(verbatim))?;
        report += execute_plan(&plan, CopyStrategy::Copy)?;
    }

    Ok(report)
}

/// Composes each extension of `extensions`, in order, into `target_dir`.
///
/// For every extension: root files, the root manifest, the `packages`
/// subtree into the target's `packages` folder, then each package manifest.
pub fn compose_extensions<S: AsRef<str>>(
    options: &ScaffoldOptions,
    registry: &ExtensionRegistry,
    extensions: &[S],
    target_dir: &Path,
) -> Result<CopyReport> {
    let strategy = CopyStrategy::for_mode(options.dev);
    let mut report = CopyReport::default();

    for id in extensions {
        let descriptor = registry.require(id.as_ref())?;
        let extension_path = &descriptor.path;
        info!("Composing extension '{}'", descriptor.name);

        let plan = plan_layer(extension_path, target_dir, &LayerFilter::extension_root())?;
        report += execute_plan(&plan, strategy)?;

        merge_manifest(
            &target_dir.join(MANIFEST_FILE),
            &extension_path.join(MANIFEST_FILE),
            options.dev,
        )?;

        let packages_path = extension_path.join(PACKAGES_DIR);
        if !packages_path.is_dir() {
            continue;
        }
        let target_packages = target_dir.join(PACKAGES_DIR);
        let plan = plan_layer(&packages_path, &target_packages, &LayerFilter::extension_packages())?;
        report += execute_plan(&plan, strategy)?;

        let mut packages = fs::read_dir(&packages_path)?
            .collect::<std::io::Result<Vec<_>>>()?
            .into_iter()
            .filter(|entry| entry.path().is_dir())
            .map(|entry| entry.file_name())
            .collect::<Vec<_>>();
        packages.sort();
        for package in packages {
            merge_manifest(
                &target_packages.join(&package).join(MANIFEST_FILE),
                &packages_path.join(&package).join(MANIFEST_FILE),
                options.dev,
            )?;
        }
    }

    Ok(report)
}

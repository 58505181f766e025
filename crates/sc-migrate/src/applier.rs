//! Hash-gated application of ad-hoc SQL files.
//!
//! Each file is keyed by its path relative to a base directory. A file is
//! executed (inside a transaction) only when its digest differs from the one
//! stored under its key, and the new digest is stored afterwards.
//! Directories are walked depth-first; files already applied stay applied
//! when a later file fails.

use crate::error::{read_failed, MigrateError, MigrateResult};
use crate::settings::SettingsStore;
use sc_core::{calc_sql_digest, SettingName};
use sc_db::{Database, Statement};
use std::fs;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

/// Result of applying one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    Applied,
    /// Digest matched the stored one; nothing ran
    Unchanged,
}

/// Totals for one [`SqlApplier::apply`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplySummary {
    pub applied: usize,
    pub unchanged: usize,
}

impl ApplySummary {
    fn add(&mut self, outcome: ApplyOutcome) {
        match outcome {
            ApplyOutcome::Applied => self.applied += 1,
            ApplyOutcome::Unchanged => self.unchanged += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.applied + self.unchanged
    }
}

pub struct SqlApplier {
    db: Arc<dyn Database>,
    settings: SettingsStore,
    base_dir: PathBuf,
}

impl SqlApplier {
    /// `base_dir` anchors setting names; a relative base resolves against
    /// the working directory at apply time.
    pub fn new(db: Arc<dyn Database>, settings: SettingsStore, base_dir: PathBuf) -> Self {
        Self {
            db,
            settings,
            base_dir,
        }
    }

    pub fn settings(&self) -> &SettingsStore {
        &self.settings
    }

    /// Apply a file, or every `.sql` file below a directory.
    ///
    /// A path given directly is applied whatever its extension, and is
    /// followed if it is a symlink. Symlinks found while walking a directory
    /// are skipped so link cycles cannot loop.
    pub async fn apply(&self, path: &Path) -> MigrateResult<ApplySummary> {
        let mut summary = ApplySummary::default();
        let mut stack = vec![path.to_path_buf()];

        while let Some(current) = stack.pop() {
            let is_root = current.as_path() == path;
            let metadata = if is_root {
                fs::metadata(&current)
            } else {
                fs::symlink_metadata(&current)
            }
            .map_err(read_failed(&current))?;

            if metadata.file_type().is_symlink() {
                log::info!("Skipping symlink {}", current.display());
                continue;
            }
            if metadata.is_dir() {
                let mut children = fs::read_dir(&current)
                    .map_err(read_failed(&current))?
                    .map(|entry| entry.map(|e| e.path()))
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(read_failed(&current))?;
                children.sort();
                // Reversed so entries pop off the stack in name order
                stack.extend(children.into_iter().rev());
                continue;
            }

            if !is_root && !is_sql_file(&current) {
                log::info!("Skipping non-SQL file {}", current.display());
                continue;
            }
            summary.add(self.apply_file(&current).await?);
        }

        Ok(summary)
    }

    /// Apply a single file if its content changed since the last apply.
    pub async fn apply_file(&self, path: &Path) -> MigrateResult<ApplyOutcome> {
        let sql = fs::read_to_string(path).map_err(read_failed(path))?;
        let digest = calc_sql_digest(&sql);
        let name = self.setting_name(path)?;

        if self.settings.get(&name).await?.as_deref() == Some(digest.as_str()) {
            log::debug!("Unchanged: {name}");
            return Ok(ApplyOutcome::Unchanged);
        }

        log::info!("    applying {}", display_name(path));
        self.db
            .execute_in_transaction(&[Statement::batch(sql)])
            .await
            .map_err(|source| MigrateError::AdHocApplyFailed {
                path: path.display().to_string(),
                source,
            })?;

        self.settings.set(&name, &digest).await?;
        Ok(ApplyOutcome::Applied)
    }

    /// The settings key for `path`.
    pub fn setting_name(&self, path: &Path) -> MigrateResult<SettingName> {
        let absolute = absolutize(path)?;
        let base = absolutize(&self.base_dir)?;
        SettingName::from_relative_path(&relative_to(&absolute, &base)).ok_or_else(|| {
            MigrateError::InvalidSettingName {
                path: path.display().to_string(),
            }
        })
    }
}

fn is_sql_file(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "sql")
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned())
}

/// Absolute, lexically normalized form of `path`.
///
/// Symlinks are not resolved, so `a/link/..` becomes `a`.
fn absolutize(path: &Path) -> MigrateResult<PathBuf> {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        let cwd = std::env::current_dir().map_err(read_failed(Path::new(".")))?;
        cwd.join(path)
    };
    Ok(normalize(&absolute))
}

/// Drop `.` components and fold each `..` into its parent.
fn normalize(path: &Path) -> PathBuf {
    let mut parts: Vec<Component> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match parts.last() {
                Some(Component::Normal(_)) => {
                    parts.pop();
                }
                // `..` at the root stays at the root
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => parts.push(component),
            },
            other => parts.push(other),
        }
    }
    parts.iter().map(|c| c.as_os_str()).collect()
}

/// `path` expressed relative to `base`, using `..` where they diverge.
///
/// Both paths must be absolute.
fn relative_to(path: &Path, base: &Path) -> PathBuf {
    let path_parts: Vec<Component> = path.components().collect();
    let base_parts: Vec<Component> = base.components().collect();
    let common = path_parts
        .iter()
        .zip(&base_parts)
        .take_while(|(a, b)| a == b)
        .count();

    let mut relative = PathBuf::new();
    for _ in common..base_parts.len() {
        relative.push("..");
    }
    for part in &path_parts[common..] {
        relative.push(part.as_os_str());
    }
    relative
}

#[cfg(test)]
#[path = "applier_test.rs"]
mod tests;

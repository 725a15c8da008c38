//! Discovery of specification units in a commands directory.

use super::error::{Result, SpecError};
use super::model::CommandSpec;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// A unit that could not be loaded.
#[derive(Debug)]
pub struct LoadFailure {
    /// File that failed.
    pub path: PathBuf,
    /// Why it failed.
    pub error: SpecError,
}

/// Outcome of loading a directory: every good unit plus every failure.
#[derive(Debug, Default)]
pub struct LoadReport {
    pub specs: Vec<CommandSpec>,
    pub failures: Vec<LoadFailure>,
}

impl LoadReport {
    /// True when every unit loaded.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Supported unit formats, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UnitFormat {
    Yaml,
    Toml,
}

impl UnitFormat {
    fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|s| s.to_str()) {
            Some("yml" | "yaml") => Some(Self::Yaml),
            Some("toml") => Some(Self::Toml),
            _ => None,
        }
    }
}

/// Loads specification units from a directory.
pub struct SpecLoader {
    dir: PathBuf,
}

impl SpecLoader {
    /// Creates a loader for `dir`.
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self { dir: dir.as_ref().to_path_buf() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Loads every unit in the directory.
    ///
    /// The directory is created when missing. Units are visited in file name
    /// order; a unit that fails is recorded in the report and skipped.
    ///
    /// # Errors
    /// Only failing to create or list the directory itself is an error.
    pub fn load(&self) -> Result<LoadReport> {
        if !self.dir.exists() {
            fs::create_dir_all(&self.dir)?;
            info!(dir = %self.dir.display(), "Created commands directory");
        }

        let mut paths: Vec<PathBuf> = fs::read_dir(&self.dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.is_file() && UnitFormat::from_path(path).is_some())
            .collect();
        paths.sort();

        let mut report = LoadReport::default();
        let mut seen: HashMap<String, PathBuf> = HashMap::new();

        for path in paths {
            match Self::load_unit(&path) {
                Ok(spec) => {
                    let key = spec.name().to_lowercase();
                    if let Some(first) = seen.get(&key) {
                        let error = SpecError::DuplicateCommand {
                            name: spec.name().to_string(),
                            first: first.clone(),
                        };
                        warn!(path = %path.display(), error = %error, "Skipping specification unit");
                        report.failures.push(LoadFailure { path, error });
                        continue;
                    }
                    debug!(command = %spec.name(), path = %path.display(), "Loaded specification unit");
                    seen.insert(key, path);
                    report.specs.push(spec);
                }
                Err(error) => {
                    warn!(path = %path.display(), error = %error, "Skipping specification unit");
                    report.failures.push(LoadFailure { path, error });
                }
            }
        }

        info!(
            dir = %self.dir.display(),
            loaded = report.specs.len(),
            failed = report.failures.len(),
            "Loaded command specifications"
        );
        Ok(report)
    }

    /// Loads a single unit; the command name is the file stem.
    pub fn load_unit(path: &Path) -> Result<CommandSpec> {
        let name = path.file_stem().and_then(|s| s.to_str()).ok_or_else(|| {
            SpecError::InvalidDefinition(format!("unusable file name: {}", path.display()))
        })?;
        let content = fs::read_to_string(path)?;
        let spec = match UnitFormat::from_path(path) {
            Some(UnitFormat::Yaml) => CommandSpec::from_yaml_str(name, &content)?,
            Some(UnitFormat::Toml) => CommandSpec::from_toml_str(name, &content)?,
            None => {
                return Err(SpecError::InvalidDefinition(format!(
                    "unsupported unit format: {}",
                    path.display()
                )));
            }
        };
        Ok(spec.with_source(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &Path, file: &str, content: &str) {
        fs::write(dir.join(file), content).unwrap();
    }

    #[test]
    fn test_creates_missing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("commands");
        let report = SpecLoader::new(&dir).load().unwrap();
        assert!(dir.is_dir());
        assert!(report.specs.is_empty());
        assert!(report.is_clean());
    }

    #[test]
    fn test_loads_yaml_and_toml_sorted() {
        let temp_dir = TempDir::new().unwrap();
        write(temp_dir.path(), "b.yml", "actions:\n  message: [b]\n");
        write(temp_dir.path(), "a.toml", "[actions]\nmessage = [\"a\"]\n");
        write(temp_dir.path(), "c.yaml", "actions:\n  message: [c]\n");
        write(temp_dir.path(), "notes.txt", "ignored");

        let report = SpecLoader::new(temp_dir.path()).load().unwrap();
        let names: Vec<&str> = report.specs.iter().map(CommandSpec::name).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
        assert_eq!(report.specs[0].source(), Some(temp_dir.path().join("a.toml").as_path()));
    }

    #[test]
    fn test_malformed_unit_is_skipped() {
        let temp_dir = TempDir::new().unwrap();
        write(temp_dir.path(), "good.yml", "actions:\n  message: [ok]\n");
        write(temp_dir.path(), "bad.yml", "actions: [unclosed\n");

        let report = SpecLoader::new(temp_dir.path()).load().unwrap();
        assert_eq!(report.specs.len(), 1);
        assert_eq!(report.specs[0].name(), "good");
        assert_eq!(report.failures.len(), 1);
        assert!(report.failures[0].path.ends_with("bad.yml"));
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let temp_dir = TempDir::new().unwrap();
        write(temp_dir.path(), "warp.toml", "cost = 1\n");
        write(temp_dir.path(), "warp.yml", "cost: 2\n");

        let report = SpecLoader::new(temp_dir.path()).load().unwrap();
        assert_eq!(report.specs.len(), 1);
        assert!((report.specs[0].cost() - 1.0).abs() < f64::EPSILON);
        assert!(matches!(report.failures[0].error, SpecError::DuplicateCommand { .. }));
    }
}

//! Implements FileResolverPort with the `glob` crate.
//!
//! Relative specs are glob-expanded against a base directory (or the CWD); a spec that
//! matches nothing is retried as a literal path. Only regular files are kept. Results
//! are deduplicated and sorted by path string so repeated runs upload in the same order.

use crate::domain::{DomainError, FileSelection};
use crate::ports::FileResolverPort;
use glob::Pattern;
use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

/// Filesystem resolver. Stateless; the base directory travels with the selection.
#[derive(Debug, Default, Clone, Copy)]
pub struct GlobResolver;

impl GlobResolver {
    pub fn new() -> Self {
        Self
    }

    /// Expand literal paths and glob patterns.
    ///
    /// Absolute specs are accepted as-is without an existence check (opening the file
    /// for upload reports a missing one).
    pub fn resolve_specs(
        &self,
        specs: &[String],
        base_dir: Option<&Path>,
    ) -> Result<Vec<PathBuf>, DomainError> {
        let mut matched = Vec::new();

        for spec in specs {
            let spec_path = Path::new(spec);
            if spec_path.is_absolute() {
                matched.push(spec_path.to_path_buf());
                continue;
            }

            let literal = match base_dir {
                Some(base) => base.join(spec_path),
                None => spec_path.to_path_buf(),
            };
            let pattern = match base_dir {
                // Escape the base so only the user's part is treated as a pattern.
                Some(base) => base
                    .to_str()
                    .map(|b| Path::new(&Pattern::escape(b)).join(spec_path)),
                None => Some(spec_path.to_path_buf()),
            };

            let mut found = pattern.as_deref().map(expand_glob).unwrap_or_default();
            if found.is_empty() && literal.is_file() {
                found.push(literal);
            }
            debug!(spec = %spec, count = found.len(), "file spec expanded");
            matched.extend(found);
        }

        dedup_sorted(matched, specs)
    }

    /// Regular files directly inside `dir` (non-recursive) matching any pattern.
    pub fn resolve_in_dir(
        &self,
        dir: &Path,
        patterns: &[String],
    ) -> Result<Vec<PathBuf>, DomainError> {
        if !dir.is_dir() {
            return Err(DomainError::NotADirectory(dir.to_path_buf()));
        }

        let matchers: Vec<NameMatcher> = patterns.iter().map(|p| NameMatcher::new(p)).collect();
        let entries = std::fs::read_dir(dir)
            .map_err(|e| DomainError::File(format!("read {}: {}", dir.display(), e)))?;

        let mut matched = Vec::new();
        for entry in entries {
            let entry =
                entry.map_err(|e| DomainError::File(format!("read {}: {}", dir.display(), e)))?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };
            if matchers.iter().any(|m| m.matches(name)) {
                matched.push(path);
            }
        }
        debug!(dir = %dir.display(), count = matched.len(), "directory scanned");

        dedup_sorted(matched, patterns)
    }
}

impl FileResolverPort for GlobResolver {
    fn resolve(&self, selection: &FileSelection) -> Result<Vec<PathBuf>, DomainError> {
        match selection {
            FileSelection::Specs { specs, base_dir } => {
                self.resolve_specs(specs, base_dir.as_deref())
            }
            FileSelection::Directory { dir, patterns } => self.resolve_in_dir(dir, patterns),
        }
    }
}

/// File-name matcher. Malformed patterns compare literally instead of failing.
enum NameMatcher {
    Glob(Pattern),
    Literal(String),
}

impl NameMatcher {
    fn new(pattern: &str) -> Self {
        match Pattern::new(pattern) {
            Ok(p) => NameMatcher::Glob(p),
            Err(_) => NameMatcher::Literal(pattern.to_string()),
        }
    }

    fn matches(&self, name: &str) -> bool {
        match self {
            NameMatcher::Glob(p) => p.matches(name),
            NameMatcher::Literal(s) => s == name,
        }
    }
}

/// Regular files matching `pattern`. An invalid pattern yields nothing.
fn expand_glob(pattern: &Path) -> Vec<PathBuf> {
    let Some(pattern) = pattern.to_str() else {
        return Vec::new();
    };
    match glob::glob(pattern) {
        Ok(paths) => paths
            .filter_map(Result::ok)
            .filter(|p| p.is_file())
            .collect(),
        Err(e) => {
            debug!(pattern, error = %e, "invalid glob pattern; trying it as a literal path");
            Vec::new()
        }
    }
}

/// Drops `.` components so `./a.bin` and `a.bin` collapse to one entry.
fn normalize(path: &Path) -> PathBuf {
    let normalized: PathBuf = path
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect();
    if normalized.as_os_str().is_empty() {
        path.to_path_buf()
    } else {
        normalized
    }
}

fn dedup_sorted(matched: Vec<PathBuf>, specs: &[String]) -> Result<Vec<PathBuf>, DomainError> {
    let unique: BTreeMap<String, PathBuf> = matched
        .into_iter()
        .map(|p| {
            let p = normalize(&p);
            (p.to_string_lossy().into_owned(), p)
        })
        .collect();

    if unique.is_empty() {
        return Err(DomainError::NoFilesFound {
            specs: specs.to_vec(),
        });
    }
    Ok(unique.into_values().collect())
}

use crate::errors::{DeplensError, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};

/// Resolves user-given source arguments to concrete files.
pub trait SourceFileLocator {
    fn locate(&self, sources: &[PathBuf]) -> Result<Vec<PathBuf>>;
}

/// Filesystem locator for Rust sources.
///
/// - Plain files are taken as given
/// - Directories are walked, honouring `.gitignore` and `.deplensignore`
/// - Arguments with glob meta-characters are matched below their literal prefix
/// - Returns sorted, de-duplicated paths
pub struct FsLocator {
    extensions: Vec<String>,
    include: Option<GlobSet>,
    exclude: GlobSet,
}

impl FsLocator {
    pub fn new(include_patterns: &[String], exclude_patterns: &[String]) -> Result<Self> {
        let include = if include_patterns.is_empty() {
            None
        } else {
            Some(build_globset(include_patterns)?)
        };
        Ok(Self {
            extensions: vec!["rs".to_string()],
            include,
            exclude: build_globset(exclude_patterns)?,
        })
    }

    fn has_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|e| e == ext))
    }

    fn accepts(&self, path: &Path, root: &Path) -> bool {
        if !self.has_extension(path) {
            return false;
        }
        let relative = path.strip_prefix(root).unwrap_or(path);
        if self.exclude.is_match(relative) || self.exclude.is_match(path) {
            return false;
        }
        if let Some(fname) = path.file_name() {
            if self.exclude.is_match(Path::new(fname)) {
                return false;
            }
        }
        match self.include {
            Some(ref include) => include.is_match(relative) || include.is_match(path),
            None => true,
        }
    }

    fn walk(&self, root: &Path, pattern: Option<&GlobSet>, files: &mut Vec<PathBuf>) {
        let walker = WalkBuilder::new(root)
            .hidden(false)
            .git_ignore(true)
            .add_custom_ignore_filename(".deplensignore")
            .build();

        for entry in walker {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    tracing::warn!("Skipping unreadable entry under {}: {}", root.display(), e);
                    continue;
                }
            };
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            if let Some(pattern) = pattern {
                if !pattern.is_match(path) {
                    continue;
                }
            }
            if self.accepts(path, root) {
                files.push(path.to_path_buf());
            }
        }
    }
}

impl SourceFileLocator for FsLocator {
    fn locate(&self, sources: &[PathBuf]) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();

        for source in sources {
            let text = source.to_string_lossy();
            if is_glob(&text) {
                let root = literal_prefix(source);
                let pattern = build_globset(&[text.into_owned()])?;
                self.walk(&root, Some(&pattern), &mut files);
            } else if source.is_dir() {
                self.walk(source, None, &mut files);
            } else if source.is_file() {
                if self.has_extension(source) {
                    files.push(source.clone());
                }
            } else {
                return Err(DeplensError::NoFiles {
                    path: source.clone(),
                });
            }
        }

        files.sort();
        files.dedup();

        if files.is_empty() {
            let path = sources.first().cloned().unwrap_or_default();
            return Err(DeplensError::NoFiles { path });
        }

        tracing::debug!("located {} source files", files.len());
        Ok(files)
    }
}

fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(Glob::new(pattern)?);
    }
    Ok(builder.build()?)
}

fn is_glob(text: &str) -> bool {
    text.contains(['*', '?', '[', '{'])
}

/// Longest leading run of path components without glob meta-characters.
fn literal_prefix(pattern: &Path) -> PathBuf {
    let mut prefix = PathBuf::new();
    for component in pattern.components() {
        if is_glob(&component.as_os_str().to_string_lossy()) {
            break;
        }
        prefix.push(component);
    }
    if prefix.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        prefix
    }
}

use ignore::WalkBuilder;
use std::path::{Component, Path, PathBuf};

/// Files above this size are never read
const MAX_FILE_SIZE_BYTES: u64 = 4 * 1024 * 1024;

const IGNORED_SCOPES: &[&str] = &[
    // VCS / tooling
    ".git",
    ".hg",
    ".svn",
    ".idea",
    ".vscode",
    // caches / builds
    ".cache",
    "node_modules",
    "__pycache__",
    ".mypy_cache",
    ".pytest_cache",
    ".tox",
    ".venv",
    "venv",
    "build",
    "dist",
    "target",
    "site-packages",
];

/// Finds corpus files under a root (.gitignore aware)
pub struct FileScanner {
    root: PathBuf,
    extensions: Vec<String>,
}

impl FileScanner {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            extensions: Vec::new(),
        }
    }

    /// Restrict the scan to these extensions (case-insensitive, without dot)
    #[must_use]
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.extensions = extensions
            .into_iter()
            .map(|ext| ext.as_ref().trim_start_matches('.').to_lowercase())
            .collect();
        self
    }

    /// Matching files sorted by path, so every run visits them in the same order
    pub fn scan(&self) -> Vec<PathBuf> {
        if self.root.is_file() {
            return if self.matches_extension(&self.root) {
                vec![self.root.clone()]
            } else {
                Vec::new()
            };
        }

        let mut files = Vec::new();
        let root = self.root.clone();
        let mut builder = WalkBuilder::new(&self.root);
        builder
            .hidden(true)
            .git_ignore(true)
            .git_global(false)
            .git_exclude(true)
            .require_git(false);
        builder.filter_entry(move |entry| !Self::is_ignored_scope(entry.path(), &root));

        for result in builder.build() {
            match result {
                Ok(entry) => {
                    let Some(file_type) = entry.file_type() else {
                        continue;
                    };
                    if !file_type.is_file() {
                        continue;
                    }

                    let path = entry.path();
                    if let Ok(meta) = entry.metadata() {
                        if meta.len() > MAX_FILE_SIZE_BYTES {
                            log::debug!(
                                "Skipping large file {} ({} bytes > {})",
                                path.display(),
                                meta.len(),
                                MAX_FILE_SIZE_BYTES
                            );
                            continue;
                        }
                    }

                    if self.matches_extension(path) {
                        files.push(path.to_path_buf());
                    }
                }
                Err(e) => log::warn!("Failed to read entry: {e}"),
            }
        }

        files.sort();
        log::info!("Found {} files under {}", files.len(), self.root.display());
        files
    }

    /// Path relative to the scan root with `/` separators
    #[must_use]
    pub fn relative_path(&self, path: &Path) -> String {
        let relative = if self.root.is_file() {
            path.file_name().map(Path::new).unwrap_or(path)
        } else {
            path.strip_prefix(&self.root).unwrap_or(path)
        };
        relative
            .components()
            .filter_map(|component| match component {
                Component::Normal(name) => Some(name.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("/")
    }

    fn matches_extension(&self, path: &Path) -> bool {
        if self.extensions.is_empty() {
            return true;
        }
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_lowercase)
            .is_some_and(|ext| self.extensions.iter().any(|candidate| candidate == &ext))
    }

    fn is_ignored_scope(path: &Path, root: &Path) -> bool {
        if let Ok(relative) = path.strip_prefix(root) {
            for component in relative.components() {
                if let Component::Normal(name) = component {
                    let lowered = name.to_string_lossy().to_lowercase();
                    if IGNORED_SCOPES.iter().any(|ignored| ignored == &lowered) {
                        return true;
                    }
                }
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_scan_filters_and_sorts() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        std::fs::create_dir_all(root.join("pkg/sub")).unwrap();
        std::fs::create_dir_all(root.join("__pycache__")).unwrap();
        std::fs::write(root.join("pkg/sub/z.py"), "x = 1\n").unwrap();
        std::fs::write(root.join("pkg/a.py"), "x = 1\n").unwrap();
        std::fs::write(root.join("pkg/notes.md"), "# notes\n").unwrap();
        std::fs::write(root.join("__pycache__/a.py"), "x = 1\n").unwrap();

        let scanner = FileScanner::new(root).with_extensions(["py"]);
        let rel: Vec<_> = scanner
            .scan()
            .iter()
            .map(|p| scanner.relative_path(p))
            .collect();
        assert_eq!(rel, vec!["pkg/a.py", "pkg/sub/z.py"]);
    }

    #[test]
    fn test_single_file_root() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("paper.md");
        std::fs::write(&file, "text").unwrap();

        let scanner = FileScanner::new(&file).with_extensions([".MD"]);
        let files = scanner.scan();
        assert_eq!(files, vec![file.clone()]);
        assert_eq!(scanner.relative_path(&file), "paper.md");
    }
}

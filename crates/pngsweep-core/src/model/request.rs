/// Scan request and tuning constants.
///
/// A [`ScanRequest`] is built by the frontend, validated, and then frozen for
/// the lifetime of a run. [`ScanRequest::prepare`] is the only step with side
/// effects: it resolves both paths to absolute form and creates the output
/// folder.
use crate::error::ConfigError;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Extensions matched when the caller does not choose any.
pub const DEFAULT_EXTENSIONS: &[&str] = &[".webp", ".jfif", ".jif"];

/// Name of the output folder created next to the executable by default.
pub const OUTPUT_FOLDER_NAME: &str = "converted_png_images";

/// What to scan, where to write, and what to match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanRequest {
    /// Directory whose subtree is enumerated.
    pub root_path: PathBuf,
    /// Directory receiving every converted PNG (flat, by basename).
    pub output_directory: PathBuf,
    /// Remove each source file after its PNG has been written.
    pub delete_originals: bool,
    /// Lowercase suffixes including the leading dot, in selection order.
    pub matched_extensions: Vec<String>,
}

impl ScanRequest {
    /// Request with the default extension set and originals kept.
    pub fn new(root_path: impl Into<PathBuf>, output_directory: impl Into<PathBuf>) -> Self {
        Self {
            root_path: root_path.into(),
            output_directory: output_directory.into(),
            delete_originals: false,
            matched_extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
        }
    }

    pub fn with_delete_originals(mut self, delete: bool) -> Self {
        self.delete_originals = delete;
        self
    }

    /// Replace the extension set. Entries are trimmed, lowercased, and given
    /// a leading dot; blanks and duplicates are dropped.
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut normalised: Vec<String> = Vec::new();
        for ext in extensions {
            if let Some(ext) = normalise_extension(ext.as_ref()) {
                if !normalised.contains(&ext) {
                    normalised.push(ext);
                }
            }
        }
        self.matched_extensions = normalised;
        self
    }

    /// Whether `file_name` ends with one of the matched extensions,
    /// ignoring ASCII case.
    pub fn matches(&self, file_name: &str) -> bool {
        let lower = file_name.to_ascii_lowercase();
        self.matched_extensions
            .iter()
            .any(|ext| lower.len() > ext.len() && lower.ends_with(ext.as_str()))
    }

    /// Output path for `source`: output folder + basename without its last
    /// extension + `.png`.
    pub fn output_path_for(&self, source: &Path) -> Option<PathBuf> {
        let stem = source.file_stem()?;
        let mut name = stem.to_os_string();
        name.push(".png");
        Some(self.output_directory.join(name))
    }

    /// Check the request without touching the filesystem beyond `stat`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.matched_extensions.is_empty() {
            return Err(ConfigError::NoExtensions);
        }
        match fs::metadata(&self.root_path) {
            Ok(meta) if meta.is_dir() => Ok(()),
            Ok(_) => Err(ConfigError::RootNotADirectory {
                path: self.root_path.clone(),
            }),
            Err(_) => Err(ConfigError::RootNotFound {
                path: self.root_path.clone(),
            }),
        }
    }

    /// Validate, create the output folder, and resolve both paths to their
    /// canonical absolute form.
    pub fn prepare(mut self) -> Result<Self, ConfigError> {
        self.validate()?;

        self.root_path = fs::canonicalize(&self.root_path).map_err(|err| match err.kind() {
            ErrorKind::NotFound => ConfigError::RootNotFound {
                path: self.root_path.clone(),
            },
            _ => ConfigError::RootNotADirectory {
                path: self.root_path.clone(),
            },
        })?;

        let output_error = |source| ConfigError::OutputDirectory {
            path: self.output_directory.clone(),
            source,
        };
        fs::create_dir_all(&self.output_directory).map_err(output_error)?;
        let output = fs::canonicalize(&self.output_directory).map_err(output_error)?;
        self.output_directory = output;

        Ok(self)
    }
}

/// Tunable pacing constants for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanTuning {
    /// Emit a "Processing: n / total" status line every this many files.
    pub status_every_files: u64,
    /// Emit a "Counting..." status line every this many directories.
    pub status_every_dirs: u64,
    /// Directory access errors logged individually before going quiet.
    pub max_logged_dir_errors: u64,
}

impl Default for ScanTuning {
    fn default() -> Self {
        Self {
            status_every_files: 20,
            status_every_dirs: 100,
            max_logged_dir_errors: 10,
        }
    }
}

fn normalise_extension(raw: &str) -> Option<String> {
    let trimmed = raw.trim().trim_start_matches('*');
    if trimmed.is_empty() || trimmed == "." {
        return None;
    }
    let lower = trimmed.to_ascii_lowercase();
    if lower.starts_with('.') {
        Some(lower)
    } else {
        Some(format!(".{lower}"))
    }
}

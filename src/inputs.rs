//! Expansion of command-line image arguments.
//!
//! An argument may be an image file, a directory (searched recursively for
//! image files), or a bare image name that only exists inside the
//! annotation file.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::WiderError;

/// File extensions treated as images when walking directories.
pub const IMAGE_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "bmp", "webp"];

/// One image to look up.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ImageInput {
    /// A name given on the command line with no file behind it.
    Name(String),
    /// An image file on disk.
    File(PathBuf),
}

impl ImageInput {
    /// The string passed to the annotation lookup.
    pub fn query(&self) -> String {
        match self {
            ImageInput::Name(name) => name.clone(),
            ImageInput::File(path) => path.to_string_lossy().into_owned(),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        match self {
            ImageInput::Name(_) => None,
            ImageInput::File(path) => Some(path),
        }
    }
}

/// Expands `inputs` in order. Directory contents are sorted by path.
///
/// A path that does not exist is accepted as a bare name only when it has
/// no directory component; otherwise it is reported as missing.
pub fn expand_inputs(inputs: &[PathBuf]) -> Result<Vec<ImageInput>, WiderError> {
    let mut expanded = Vec::new();

    for input in inputs {
        if input.is_file() {
            expanded.push(ImageInput::File(input.clone()));
        } else if input.is_dir() {
            let files = collect_image_files(input)?;
            debug!(dir = %input.display(), images = files.len(), "expanded directory");
            expanded.extend(files.into_iter().map(ImageInput::File));
        } else if is_bare_name(input) {
            expanded.push(ImageInput::Name(input.to_string_lossy().into_owned()));
        } else {
            return Err(WiderError::InputNotFound {
                path: input.clone(),
            });
        }
    }

    Ok(expanded)
}

fn collect_image_files(root: &Path) -> Result<Vec<PathBuf>, WiderError> {
    let mut files = Vec::new();

    for entry in WalkDir::new(root).follow_links(true).sort_by_file_name() {
        let entry = entry.map_err(|source| WiderError::WalkDir {
            path: root.to_path_buf(),
            message: source.to_string(),
        })?;

        if !entry.file_type().is_file() {
            continue;
        }
        if has_image_extension(entry.path()) {
            files.push(entry.path().to_path_buf());
        } else {
            warn!(path = %entry.path().display(), "skipping non-image file");
        }
    }

    Ok(files)
}

fn has_image_extension(path: &Path) -> bool {
    let Some(ext) = path.extension().and_then(|ext| ext.to_str()) else {
        return false;
    };

    IMAGE_EXTENSIONS
        .iter()
        .any(|allowed| ext.eq_ignore_ascii_case(allowed))
}

fn is_bare_name(path: &Path) -> bool {
    path.components().count() == 1 && path.file_name().is_some()
}

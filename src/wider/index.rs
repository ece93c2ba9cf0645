//! In-memory view of a WIDER FACE ground-truth file.
//!
//! The file repeats a three-part block per image:
//!
//! ```text
//! 0--Parade/0_Parade_marchingband_1_849.jpg
//! 1
//! 449 330 122 149 0 0 0 0 0 0
//! ```
//!
//! There is no way to jump to an image's block without scanning, so the
//! index keeps the raw lines and resolves each query by looking for the
//! header line that ends with the requested file name.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, trace};

use super::record::BBoxRecord;
use crate::error::WiderError;

/// A loaded annotation file.
///
/// The lines are a snapshot taken at load time; later changes to the file
/// are not observed. The index is never mutated by queries, so it can be
/// shared freely between threads.
#[derive(Clone, Debug)]
pub struct AnnotationIndex {
    source_path: PathBuf,
    lines: Vec<String>,
    lookup: Option<SuffixTable>,
}

impl AnnotationIndex {
    /// Reads the whole annotation file at `path`.
    ///
    /// Nothing is parsed here; malformed content surfaces only when a
    /// query reaches it.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, WiderError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| WiderError::FileAccess {
            path: path.to_path_buf(),
            source,
        })?;

        let index = Self::from_str_with_source(&content, path);
        debug!(
            path = %path.display(),
            lines = index.lines.len(),
            "loaded WIDER FACE annotations"
        );
        Ok(index)
    }

    /// Builds an index from annotation text already in memory.
    ///
    /// `source_path` is only used in error messages.
    pub fn from_str_with_source(content: &str, source_path: impl Into<PathBuf>) -> Self {
        Self {
            source_path: source_path.into(),
            lines: split_lines(content),
            lookup: None,
        }
    }

    /// Adds a suffix lookup table so that repeated queries avoid a full
    /// scan. Query results and errors are the same with or without it.
    pub fn with_lookup_table(mut self) -> Self {
        let table = SuffixTable::build(&self.lines);
        debug!(
            path = %self.source_path.display(),
            entries = table.entries.len(),
            "built suffix lookup table"
        );
        self.lookup = Some(table);
        self
    }

    /// Returns true if [`with_lookup_table`](Self::with_lookup_table) was applied.
    pub fn has_lookup_table(&self) -> bool {
        self.lookup.is_some()
    }

    /// The path the annotations were loaded from.
    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    /// The raw lines, line endings stripped.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Number of raw lines held.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Returns the bounding boxes recorded for `image_name`.
    ///
    /// `image_name` may be a bare file name or a path; only its last
    /// component is matched, as a suffix of the header line. The first
    /// matching line wins. A box count of zero yields an empty vector.
    pub fn bounding_boxes(&self, image_name: &str) -> Result<Vec<BBoxRecord>, WiderError> {
        let needle = basename(image_name);

        let header = match &self.lookup {
            Some(table) => table.first_match(needle),
            None => self.lines.iter().position(|line| line.ends_with(needle)),
        };

        let Some(header) = header else {
            return Err(WiderError::ImageNotFound {
                image: image_name.to_string(),
                path: self.source_path.clone(),
            });
        };

        trace!(image = image_name, line = header + 1, "matched header line");
        self.read_block(header)
    }

    /// Walks every image block of the file in order.
    pub fn entries(&self) -> Entries<'_> {
        Entries {
            index: self,
            cursor: 0,
            failed: false,
        }
    }

    /// Reads the count line and record lines that follow the header at
    /// `header` (0-based).
    fn read_block(&self, header: usize) -> Result<Vec<BBoxRecord>, WiderError> {
        let count = self.box_count(header)?;

        // The count comes from the file; do not trust it for allocation.
        let mut boxes = Vec::with_capacity(count.min(self.lines.len()));
        for offset in 0..count {
            let line_idx = header + 2 + offset;
            let raw = self.lines.get(line_idx).ok_or_else(|| {
                self.invalid_entry(
                    line_idx,
                    format!(
                        "header '{}' declares {} box(es) but the file ends after {}",
                        self.lines[header].trim(),
                        count,
                        offset
                    ),
                )
            })?;

            let record = BBoxRecord::parse(raw).map_err(|err| self.locate(err, line_idx))?;
            boxes.push(record);
        }

        Ok(boxes)
    }

    /// Parses the count line after `header`. Zero and negative counts both
    /// describe an empty block.
    fn box_count(&self, header: usize) -> Result<usize, WiderError> {
        let line_idx = header + 1;
        let raw = self.lines.get(line_idx).ok_or_else(|| {
            self.invalid_entry(
                line_idx,
                format!(
                    "missing box count after header '{}'",
                    self.lines[header].trim()
                ),
            )
        })?;

        let count = raw.trim().parse::<i64>().map_err(|_| {
            self.invalid_entry(
                line_idx,
                format!("invalid box count '{}'; expected integer", raw.trim()),
            )
        })?;

        Ok(usize::try_from(count).unwrap_or(0))
    }

    fn invalid_entry(&self, line_idx: usize, message: String) -> WiderError {
        WiderError::InvalidEntry {
            path: self.source_path.clone(),
            line: line_idx + 1,
            message,
        }
    }

    /// Prefixes a record error with the file and 1-based line it came from.
    fn locate(&self, err: WiderError, line_idx: usize) -> WiderError {
        match err {
            WiderError::MalformedRecord { message } => WiderError::MalformedRecord {
                message: format!(
                    "{}:{}: {}",
                    self.source_path.display(),
                    line_idx + 1,
                    message
                ),
            },
            other => other,
        }
    }
}

/// Returns the final path component of `name`.
///
/// Both `/` and `\` separate components on every platform, unlike
/// POSIX basename rules where a backslash is an ordinary character: the
/// query `x\a.jpg` is looked up as `a.jpg`. A trailing separator yields
/// an empty name, which matches the first line of the file.
pub fn basename(name: &str) -> &str {
    name.rsplit(['/', '\\']).next().unwrap_or(name)
}

/// Splits `content` at `\n`, `\r\n` and lone `\r` line endings. A final
/// line ending does not start another line.
fn split_lines(content: &str) -> Vec<String> {
    if content.is_empty() {
        return Vec::new();
    }

    let normalized = content.replace("\r\n", "\n");
    let body = normalized
        .strip_suffix(['\n', '\r'])
        .unwrap_or(normalized.as_str());
    body.split(['\n', '\r']).map(str::to_owned).collect()
}

/// One image block of an annotation file.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AnnotationEntry {
    /// Header line text (the image's path relative to the dataset root).
    pub image: String,
    /// 1-based line number of the header.
    pub line: usize,
    /// Parsed boxes, in file order.
    pub boxes: Vec<BBoxRecord>,
    /// True when a zero box count was followed by a placeholder box line.
    pub placeholder: bool,
}

impl AnnotationEntry {
    /// File name part of the header.
    pub fn file_name(&self) -> &str {
        basename(&self.image)
    }
}

/// Iterator over the image blocks of an [`AnnotationIndex`].
///
/// Yields an error at most once and stops after it, since the position of
/// every later block depends on the broken one.
pub struct Entries<'a> {
    index: &'a AnnotationIndex,
    cursor: usize,
    failed: bool,
}

impl Iterator for Entries<'_> {
    type Item = Result<AnnotationEntry, WiderError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        let lines = &self.index.lines;
        while self.cursor < lines.len() && lines[self.cursor].trim().is_empty() {
            self.cursor += 1;
        }
        if self.cursor >= lines.len() {
            return None;
        }

        let header = self.cursor;
        let boxes = match self.index.read_block(header) {
            Ok(boxes) => boxes,
            Err(err) => {
                self.failed = true;
                return Some(Err(err));
            }
        };
        self.cursor = header + 2 + boxes.len();

        // Published ground-truth files write "0" followed by an all-zero
        // box line for images without faces.
        let mut placeholder = false;
        if boxes.is_empty() {
            if let Some(next) = lines.get(self.cursor) {
                if BBoxRecord::parse(next).is_ok() {
                    placeholder = true;
                    self.cursor += 1;
                }
            }
        }

        Some(Ok(AnnotationEntry {
            image: lines[header].trim().to_string(),
            line: header + 1,
            boxes,
            placeholder,
        }))
    }
}

/// Lines sorted by their reversed text.
///
/// A suffix query on the original lines is a prefix query on the reversed
/// ones, and all keys sharing a prefix form one contiguous run in sorted
/// order. The smallest original line index in that run is the line a
/// front-to-back scan would have found first.
#[derive(Clone, Debug)]
struct SuffixTable {
    entries: Vec<(String, usize)>,
}

impl SuffixTable {
    fn build(lines: &[String]) -> Self {
        let mut entries: Vec<(String, usize)> = lines
            .iter()
            .enumerate()
            .map(|(idx, line)| (line.chars().rev().collect(), idx))
            .collect();
        entries.sort();
        Self { entries }
    }

    fn first_match(&self, needle: &str) -> Option<usize> {
        let reversed: String = needle.chars().rev().collect();
        let start = self
            .entries
            .partition_point(|(key, _)| key.as_str() < reversed.as_str());

        self.entries[start..]
            .iter()
            .take_while(|(key, _)| key.starts_with(reversed.as_str()))
            .map(|(_, idx)| *idx)
            .min()
    }
}

/// Fuzz-only entrypoint: loads arbitrary text, walks it and queries it.
#[cfg(feature = "fuzzing")]
pub fn fuzz_walk_annotations(input: &str) -> Result<(), WiderError> {
    let scan = AnnotationIndex::from_str_with_source(input, "<fuzz>");
    let table = scan.clone().with_lookup_table();

    for entry in scan.entries() {
        let entry = entry?;
        let by_scan = scan.bounding_boxes(&entry.image).map_err(|e| e.to_string());
        let by_table = table.bounding_boxes(&entry.image).map_err(|e| e.to_string());
        assert_eq!(by_scan, by_table);
    }
    Ok(())
}

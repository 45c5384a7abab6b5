//! The real frame source: a directory of PNG frames on disk.
//!
//! Frame order must be deterministic, so the listing is sorted by the
//! numeric index parsed from the trailing digit run of each file stem
//! (`frame_9` before `frame_10`), falling back to the file name for stems
//! without an index. Plain lexicographic order would interleave `frame_10`
//! between `frame_1` and `frame_2`.

use crate::frame_source::{Frame, FrameError, FrameSource};

use log::debug;
use nom::{
    branch::alt, bytes::complete::take_till1, character::complete::digit1, combinator::map,
    multi::many0, IResult,
};
use std::fs;
use std::path::{Path, PathBuf};

fn parse_digit_run(s: &str) -> IResult<&str, Option<u64>> {
    // a run too long for u64 is treated as unindexed rather than an error
    map(digit1, |run: &str| run.parse().ok())(s)
}

fn parse_text_run(s: &str) -> IResult<&str, Option<u64>> {
    map(take_till1(|c: char| c.is_ascii_digit()), |_| None)(s)
}

/// The frame index of a file stem: the value of its last digit run.
fn stem_index(stem: &str) -> Option<u64> {
    let runs: IResult<&str, Vec<Option<u64>>> =
        many0(alt((parse_digit_run, parse_text_run)))(stem);
    match runs {
        Ok((_, runs)) => runs.into_iter().flatten().last(),
        Err(_) => None,
    }
}

/// Sort key for frame files: numeric index first (unindexed stems last),
/// file name as the tie-break.
fn sort_key(path: &Path) -> (u64, String) {
    let stem = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    (stem_index(&stem).unwrap_or(u64::MAX), name)
}

/// Decodes one frame file into an RGBA8 [`Frame`].
fn load_frame(path: &Path) -> Result<Frame, FrameError> {
    debug!("decoding {}", path.display());
    let image = image::open(path).map_err(|source| FrameError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    let rgba = image.to_rgba8();
    let (width, height) = rgba.dimensions();
    Frame::from_rgba(width, height, rgba.into_raw())
}

/// A [`FrameSource`] over the PNG files of a single directory, in
/// deterministic frame order. Files are decoded lazily, one per `next`
/// call, so the pipeline overlaps decoding with conversion.
pub struct DirectorySource {
    files: std::vec::IntoIter<PathBuf>,
}

impl DirectorySource {
    /// Lists and orders the frame files under `dir`. Only the listing
    /// happens here; decoding errors surface during iteration, tagged with
    /// the offending path.
    pub fn new(dir: impl AsRef<Path>) -> Result<Self, FrameError> {
        let dir = dir.as_ref();
        let io_error = |source| FrameError::Io {
            path: dir.to_path_buf(),
            source,
        };

        let mut files = Vec::new();
        for entry in fs::read_dir(dir).map_err(io_error)? {
            let path = entry.map_err(io_error)?.path();
            let is_png = path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("png"));
            if is_png {
                files.push(path);
            }
        }
        files.sort_by(|a, b| sort_key(a).cmp(&sort_key(b)));

        Ok(DirectorySource {
            files: files.into_iter(),
        })
    }
}

impl Iterator for DirectorySource {
    type Item = Result<Frame, FrameError>;

    fn next(&mut self) -> Option<Self::Item> {
        let path = self.files.next()?;
        Some(load_frame(&path))
    }
}

impl FrameSource for DirectorySource {
    fn frame_count(&self) -> Option<usize> {
        Some(self.files.len())
    }
}

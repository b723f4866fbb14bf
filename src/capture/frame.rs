//! Captured frames and their timestamp-bearing filenames.
//!
//! A frame's filename is `screenshot_<%Y%m%d_%H%M%S>.png`, so a directory
//! listing sorts chronologically. Two frames inside the same second get an
//! extra `_<n>` suffix instead of overwriting each other. Ordering decisions
//! are always made on the parsed timestamp, never on the string itself.

use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;

use crate::error::{Result, ShotlogError};

const FILE_PREFIX: &str = "screenshot_";
const FILE_EXT: &str = "png";
const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";
/// Length of a formatted `TIMESTAMP_FORMAT` value, e.g. `20250301_143005`.
const TIMESTAMP_LEN: usize = 15;

/// One captured screen image and the moment it was taken.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedFrame {
    pub path: PathBuf,
    pub timestamp: NaiveDateTime,
}

impl CapturedFrame {
    /// Pick an unused path in `dir` for a frame taken at `timestamp`.
    pub fn allocate(dir: &Path, timestamp: NaiveDateTime) -> Self {
        let stem = format!("{FILE_PREFIX}{}", timestamp.format(TIMESTAMP_FORMAT));
        let mut path = dir.join(format!("{stem}.{FILE_EXT}"));
        let mut seq = 1u32;
        while path.exists() {
            path = dir.join(format!("{stem}_{seq}.{FILE_EXT}"));
            seq += 1;
        }
        Self { path, timestamp }
    }

    /// Recover a frame from its filename. Fails when the name does not carry
    /// a capture timestamp.
    pub fn from_path(path: &Path) -> Result<Self> {
        let bad = || ShotlogError::FrameName {
            path: path.to_path_buf(),
        };

        let stem = path.file_stem().and_then(|s| s.to_str()).ok_or_else(bad)?;
        let rest = stem.strip_prefix(FILE_PREFIX).ok_or_else(bad)?;
        let raw = rest.get(..TIMESTAMP_LEN).ok_or_else(bad)?;
        match &rest[TIMESTAMP_LEN..] {
            "" => {}
            suffix
                if suffix.len() > 1
                    && suffix.starts_with('_')
                    && suffix[1..].chars().all(|c| c.is_ascii_digit()) => {}
            _ => return Err(bad()),
        }

        let timestamp =
            NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT).map_err(|_| bad())?;
        Ok(Self {
            path: path.to_path_buf(),
            timestamp,
        })
    }

    /// Caption line rendered under the image on its page.
    pub fn caption(&self) -> String {
        format!(
            "Screenshot taken: {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 1)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    #[test]
    fn allocate_and_parse_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let frame = CapturedFrame::allocate(dir.path(), ts(14, 30, 5));
        assert_eq!(
            frame.path.file_name().unwrap(),
            "screenshot_20250301_143005.png"
        );
        let parsed = CapturedFrame::from_path(&frame.path).unwrap();
        assert_eq!(parsed.timestamp, ts(14, 30, 5));
    }

    #[test]
    fn same_second_frames_get_distinct_paths() {
        let dir = tempfile::tempdir().unwrap();
        let first = CapturedFrame::allocate(dir.path(), ts(9, 0, 0));
        std::fs::write(&first.path, b"png").unwrap();
        let second = CapturedFrame::allocate(dir.path(), ts(9, 0, 0));
        assert_ne!(first.path, second.path);
        assert_eq!(
            second.path.file_name().unwrap(),
            "screenshot_20250301_090000_1.png"
        );
        // The suffixed name still parses to the same timestamp.
        let parsed = CapturedFrame::from_path(&second.path).unwrap();
        assert_eq!(parsed.timestamp, ts(9, 0, 0));
    }

    #[test]
    fn rejects_names_without_a_timestamp() {
        for name in [
            "notes.png",
            "screenshot_.png",
            "screenshot_2025.png",
            "screenshot_20250399_999999.png",
            "screenshot_20250301_143005_x.png",
        ] {
            let path = Path::new("/tmp").join(name);
            assert!(
                CapturedFrame::from_path(&path).is_err(),
                "{name} should not parse"
            );
        }
    }

    #[test]
    fn ordering_follows_the_parsed_timestamp() {
        let dir = Path::new("/scratch");
        let mut frames = vec![
            CapturedFrame::allocate(dir, ts(10, 15, 30)),
            CapturedFrame::allocate(dir, ts(10, 15, 10)),
            CapturedFrame::allocate(dir, ts(10, 15, 20)),
        ];
        frames.sort_by_key(|f| f.timestamp);
        let seconds: Vec<u32> = frames
            .iter()
            .map(|f| {
                use chrono::Timelike;
                f.timestamp.second()
            })
            .collect();
        assert_eq!(seconds, vec![10, 20, 30]);
    }
}

//! JSON writer and reader for dataset directories.
//!
//! Layout: `<root>/<split>/<n>/video.json`, with rendered frames stored
//! next to each `video.json` as `frame_<i>.png`.

use crate::error::{Result, SimError};
use crate::split::{Partition, Split};
use oceanqa_core::VideoRecord;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

pub const VIDEO_FILE: &str = "video.json";

/// Creates `out_dir`, replacing an existing directory only when `force` is set.
pub fn prepare_output(out_dir: &Path, force: bool) -> Result<()> {
    if out_dir.exists() {
        if !force {
            return Err(SimError::OutputExists(out_dir.to_path_buf()));
        }
        warn!("Removing existing output directory {}", out_dir.display());
        fs::remove_dir_all(out_dir)?;
    }
    fs::create_dir_all(out_dir)?;
    Ok(())
}

/// Writes one video record as `<dir>/video.json`.
pub fn write_video(dir: &Path, record: &VideoRecord) -> Result<()> {
    fs::create_dir_all(dir)?;
    let mut writer = BufWriter::new(File::create(dir.join(VIDEO_FILE))?);
    serde_json::to_writer(&mut writer, record)?;
    writer.flush()?;
    Ok(())
}

/// Writes `records` as numbered video directories under `dir`.
pub fn write_split(dir: &Path, records: &[VideoRecord]) -> Result<usize> {
    for (idx, record) in records.iter().enumerate() {
        write_video(&dir.join(idx.to_string()), record)?;
    }
    debug!("Wrote {} videos to {}", records.len(), dir.display());
    Ok(records.len())
}

/// Writes every split of `partition` under `out_dir`.
pub fn write_dataset(out_dir: &Path, partition: &Partition<VideoRecord>) -> Result<usize> {
    let mut written = 0;
    for split in Split::ALL {
        written += write_split(&out_dir.join(split.name()), partition.get(split))?;
    }
    info!("Successfully written {} json files", written);
    Ok(written)
}

pub fn read_video(dir: &Path) -> Result<VideoRecord> {
    let path = dir.join(VIDEO_FILE);
    if !path.is_file() {
        return Err(SimError::missing_video(dir));
    }
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}

/// Video directories directly under `dir`, in numeric order.
pub fn video_dirs(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut dirs: Vec<PathBuf> = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            dirs.push(path);
        }
    }
    dirs.sort_by_key(|path| {
        let name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default().to_string();
        (name.parse::<usize>().unwrap_or(usize::MAX), name)
    });
    Ok(dirs)
}

/// Reads every video of one split directory. A subdirectory without
/// `video.json` is an error.
pub fn read_split(dir: &Path) -> Result<Vec<VideoRecord>> {
    video_dirs(dir)?.iter().map(|path| read_video(path)).collect()
}

/// Directories holding video directories: the split directories of a dataset
/// root, or `dir` itself when it has none.
pub fn split_dirs(dir: &Path) -> Vec<PathBuf> {
    let splits: Vec<PathBuf> = Split::ALL
        .iter()
        .map(|split| dir.join(split.name()))
        .filter(|path| path.is_dir())
        .collect();

    if splits.is_empty() {
        vec![dir.to_path_buf()]
    } else {
        splits
    }
}

/// Reads a dataset root or a single split directory.
pub fn read_dataset(dir: &Path) -> Result<Vec<VideoRecord>> {
    let mut records = Vec::new();
    for split_dir in split_dirs(dir) {
        records.extend(read_split(&split_dir)?);
    }
    info!("Successfully extracted {} video dictionaries from json files", records.len());
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use oceanqa_core::{SceneConfig, Video};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use tempfile::tempdir;

    fn records(n: usize) -> Vec<VideoRecord> {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        (0..n)
            .map(|_| Video::simulate(&SceneConfig::default(), &mut rng).unwrap())
            .map(|video| VideoRecord::from(&video))
            .collect()
    }

    #[test]
    fn test_dataset_round_trip() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("data");
        prepare_output(&out, false).unwrap();

        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let partition = Partition::split(records(10), 0.2, &mut rng);
        assert_eq!(write_dataset(&out, &partition).unwrap(), 10);

        assert!(out.join("train/0/video.json").is_file());
        assert!(out.join("val/1/video.json").is_file());
        assert_eq!(read_split(&out.join("test")).unwrap(), partition.test);
        assert_eq!(read_dataset(&out).unwrap().len(), 10);
    }

    #[test]
    fn test_existing_output_needs_force() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("data");
        fs::create_dir_all(out.join("stale")).unwrap();

        assert!(matches!(prepare_output(&out, false), Err(SimError::OutputExists(_))));
        prepare_output(&out, true).unwrap();
        assert!(!out.join("stale").exists());
    }

    #[test]
    fn test_missing_video_json() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("0")).unwrap();
        assert!(matches!(read_split(dir.path()), Err(SimError::MissingVideo(_))));
    }

    #[test]
    fn test_numeric_directory_order() {
        let dir = tempdir().unwrap();
        let recs = records(12);
        write_split(dir.path(), &recs).unwrap();
        assert_eq!(read_split(dir.path()).unwrap(), recs);
    }
}

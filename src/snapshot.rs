use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use crate::engine::Snapshot;
use crate::error::SnapshotError;

fn snapshot_base_name(media: &Path, pts: f64) -> String {
    let stem = media
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "frame".to_owned());
    let total = pts.max(0.0) as u64;
    format!("snapshot-{}-{:02}m{:02}s", stem, total / 60, total % 60)
}

/// `snapshot-<stem>-<MM>m<SS>s.png`
pub fn snapshot_file_name(media: &Path, pts: f64) -> String {
    format!("{}.png", snapshot_base_name(media, pts))
}

/// Write `snapshot` as a PNG into `dir`, never overwriting an existing file.
pub fn save_png(snapshot: &Snapshot, dir: &Path, media: &Path) -> Result<PathBuf, SnapshotError> {
    if snapshot.width == 0 || snapshot.height == 0 || snapshot.rgba.is_empty() {
        return Err(SnapshotError::NoFrame);
    }
    std::fs::create_dir_all(dir)?;

    let base = snapshot_base_name(media, snapshot.pts);
    let mut path = dir.join(format!("{}.png", base));
    let mut n = 1;
    while path.exists() {
        path = dir.join(format!("{}-{}.png", base, n));
        n += 1;
    }

    let writer = BufWriter::new(File::create(&path)?);
    let mut encoder = png::Encoder::new(writer, snapshot.width, snapshot.height);
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header()?;
    writer.write_image_data(&snapshot.rgba)?;
    writer.finish()?;

    tracing::info!(path = %path.display(), "saved snapshot");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(width: u32, height: u32, pts: f64) -> Snapshot {
        Snapshot {
            rgba: vec![128; (width * height * 4) as usize],
            width,
            height,
            pts,
        }
    }

    #[test]
    fn test_file_name_uses_stem_and_time() {
        assert_eq!(
            snapshot_file_name(Path::new("/v/talk.mp4"), 125.7),
            "snapshot-talk-02m05s.png"
        );
    }

    #[test]
    fn test_save_does_not_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let media = Path::new("clip.mkv");

        let first = save_png(&frame(4, 2, 3.0), dir.path(), media).unwrap();
        let second = save_png(&frame(4, 2, 3.0), dir.path(), media).unwrap();

        assert_ne!(first, second);
        assert!(first.ends_with("snapshot-clip-00m03s.png"));
        assert!(second.ends_with("snapshot-clip-00m03s-1.png"));
        let bytes = std::fs::read(&first).unwrap();
        assert_eq!(&bytes[1..4], b"PNG");
    }

    #[test]
    fn test_collision_suffix_only_touches_extension() {
        let dir = tempfile::tempdir().unwrap();
        let media = Path::new("/v/clip.png.mkv");

        let first = save_png(&frame(2, 2, 3.0), dir.path(), media).unwrap();
        let second = save_png(&frame(2, 2, 3.0), dir.path(), media).unwrap();

        assert!(first.ends_with("snapshot-clip.png-00m03s.png"));
        assert!(second.ends_with("snapshot-clip.png-00m03s-1.png"));
    }

    #[test]
    fn test_empty_frame_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let err = save_png(&frame(0, 0, 0.0), dir.path(), Path::new("x.mp4")).unwrap_err();
        assert!(matches!(err, SnapshotError::NoFrame));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}

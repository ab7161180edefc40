use std::fs;
use std::path::{Path, PathBuf};

use crate::recording::domain::animation_assembler::AnimationAssembler;
use crate::shared::constants::{FRAME_FILE_EXTENSION, FRAME_FILE_PREFIX, FRAME_NUMBER_WIDTH};
use crate::shared::error::TrifaceError;
use crate::shared::frame::Frame;
use crate::video::domain::image_writer::ImageWriter;

/// Collects processed camera frames as numbered images in a scratch
/// directory, then hands them to an [`AnimationAssembler`].
///
/// Only `frame_*.png` files are ever deleted. `prepare` removes stale
/// frames from an earlier run and refuses a directory holding anything
/// else. After a successful merge the frames are deleted and the
/// directory is removed if that left it empty. A failed merge leaves
/// everything in place.
pub struct TempFrameRecorder {
    dir: PathBuf,
    writer: Box<dyn ImageWriter>,
    written: usize,
}

impl TempFrameRecorder {
    pub fn prepare(dir: &Path, writer: Box<dyn ImageWriter>) -> Result<Self, TrifaceError> {
        if dir.exists() {
            clear_stale_frames(dir)?;
        }
        fs::create_dir_all(dir).map_err(|e| TrifaceError::io(dir, e))?;
        Ok(Self {
            dir: dir.to_path_buf(),
            writer,
            written: 0,
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn frames_written(&self) -> usize {
        self.written
    }

    pub fn frame_path(&self, number: u64) -> PathBuf {
        self.dir.join(frame_file_name(number))
    }

    pub fn record(&mut self, number: u64, frame: &Frame) -> Result<(), Box<dyn std::error::Error>> {
        let path = self.frame_path(number);
        self.writer
            .write(&path, frame)
            .map_err(|e| format!("failed to write {}: {e}", path.display()))?;
        self.written += 1;
        Ok(())
    }

    /// Merges the recorded frames into `output`.
    ///
    /// With no frames there is nothing to merge; the directory is removed
    /// and no output is written.
    pub fn finish(
        self,
        assembler: &dyn AnimationAssembler,
        output: &Path,
    ) -> Result<(), TrifaceError> {
        let frames = self.list_frames()?;
        if frames.is_empty() {
            log::warn!("No frames recorded, skipping {}", output.display());
            return self.cleanup();
        }

        match assembler.assemble(&self.dir, &frames, output) {
            Ok(()) => {
                log::info!("Wrote {} ({} frames)", output.display(), frames.len());
                self.cleanup()
            }
            Err(e) => {
                log::warn!("Keeping frames in {} after failed merge", self.dir.display());
                Err(e)
            }
        }
    }

    fn list_frames(&self) -> Result<Vec<PathBuf>, TrifaceError> {
        let (mut frames, _) = scan(&self.dir)?;
        frames.sort();
        Ok(frames)
    }

    fn cleanup(self) -> Result<(), TrifaceError> {
        let (frames, others) = scan(&self.dir)?;
        remove_files(&frames)?;
        if !others.is_empty() {
            log::warn!(
                "Leaving {} in place, it holds {} file(s) triface did not write",
                self.dir.display(),
                others.len()
            );
            return Ok(());
        }
        fs::remove_dir(&self.dir).map_err(|e| TrifaceError::io(&self.dir, e))
    }
}

fn clear_stale_frames(dir: &Path) -> Result<(), TrifaceError> {
    if !dir.is_dir() {
        return Err(TrifaceError::Input(format!(
            "temp dir {} is not a directory",
            dir.display()
        )));
    }
    let (frames, others) = scan(dir)?;
    if let Some(other) = others.first() {
        return Err(TrifaceError::Input(format!(
            "temp dir {} already holds {}; choose an empty or dedicated directory",
            dir.display(),
            other.display()
        )));
    }
    if !frames.is_empty() {
        log::debug!("Removing {} stale frames from {}", frames.len(), dir.display());
    }
    remove_files(&frames)
}

/// Splits the entries of `dir` into frame files and everything else.
fn scan(dir: &Path) -> Result<(Vec<PathBuf>, Vec<PathBuf>), TrifaceError> {
    let entries = fs::read_dir(dir).map_err(|e| TrifaceError::io(dir, e))?;
    let mut frames = Vec::new();
    let mut others = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| TrifaceError::io(dir, e))?;
        let path = entry.path();
        let is_file = entry
            .file_type()
            .map_err(|e| TrifaceError::io(&path, e))?
            .is_file();
        if is_file && is_frame_file(&path) {
            frames.push(path);
        } else {
            others.push(path);
        }
    }
    Ok((frames, others))
}

fn remove_files(paths: &[PathBuf]) -> Result<(), TrifaceError> {
    for path in paths {
        fs::remove_file(path).map_err(|e| TrifaceError::io(path, e))?;
    }
    Ok(())
}

/// `frame_00042.png`; zero padding keeps lexical order equal to capture order.
pub fn frame_file_name(number: u64) -> String {
    format!(
        "{FRAME_FILE_PREFIX}{number:0width$}.{FRAME_FILE_EXTENSION}",
        width = FRAME_NUMBER_WIDTH
    )
}

fn is_frame_file(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    name.starts_with(FRAME_FILE_PREFIX)
        && path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case(FRAME_FILE_EXTENSION))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::video::infrastructure::image_file_writer::ImageFileWriter;
    use std::sync::{Arc, Mutex};

    struct RecordingAssembler {
        calls: Arc<Mutex<Vec<Vec<String>>>>,
        fail: bool,
    }

    impl RecordingAssembler {
        fn new(fail: bool) -> Self {
            Self {
                calls: Arc::new(Mutex::new(Vec::new())),
                fail,
            }
        }
    }

    impl AnimationAssembler for RecordingAssembler {
        fn program(&self) -> &str {
            "stub"
        }

        fn check_installed(&self) -> Result<(), TrifaceError> {
            Ok(())
        }

        fn assemble(
            &self,
            _frames_dir: &Path,
            frames: &[PathBuf],
            output: &Path,
        ) -> Result<(), TrifaceError> {
            let names = frames
                .iter()
                .map(|f| f.file_name().unwrap().to_string_lossy().into_owned())
                .collect();
            self.calls.lock().unwrap().push(names);
            if self.fail {
                return Err(TrifaceError::ExternalToolFailure {
                    program: "stub".into(),
                    status: "exit code 1".into(),
                    stderr: "no".into(),
                });
            }
            fs::write(output, b"GIF89a").map_err(|e| TrifaceError::io(output, e))
        }
    }

    fn frame() -> Frame {
        Frame::new(vec![90; 4 * 4 * 3], 4, 4, 3, 0)
    }

    fn recorder(dir: &Path) -> TempFrameRecorder {
        TempFrameRecorder::prepare(dir, Box::new(ImageFileWriter::new())).unwrap()
    }

    #[test]
    fn test_frame_file_name_is_zero_padded() {
        assert_eq!(frame_file_name(0), "frame_00000.png");
        assert_eq!(frame_file_name(42), "frame_00042.png");
        assert_eq!(frame_file_name(123456), "frame_123456.png");
    }

    #[test]
    fn test_prepare_clears_stale_files() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("frames");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("frame_00099.png"), b"stale").unwrap();

        let rec = recorder(&dir);
        assert!(rec.list_frames().unwrap().is_empty());
        assert!(!dir.join("frame_00099.png").exists());
    }

    #[test]
    fn test_prepare_refuses_directory_with_user_files() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("Pictures");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("holiday.jpg"), b"precious").unwrap();
        fs::write(dir.join("frame_00000.png"), b"stale").unwrap();

        let err = TempFrameRecorder::prepare(&dir, Box::new(ImageFileWriter::new()))
            .err()
            .unwrap();
        assert!(matches!(err, TrifaceError::Input(ref m) if m.contains("holiday.jpg")));
        assert_eq!(fs::read(dir.join("holiday.jpg")).unwrap(), b"precious");
        assert!(dir.join("frame_00000.png").exists());
    }

    #[test]
    fn test_prepare_refuses_subdirectories() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("frames");
        fs::create_dir_all(dir.join("frame_nested.png")).unwrap();

        assert!(TempFrameRecorder::prepare(&dir, Box::new(ImageFileWriter::new())).is_err());
        assert!(dir.join("frame_nested.png").is_dir());
    }

    #[test]
    fn test_prepare_rejects_plain_file() {
        let root = tempfile::tempdir().unwrap();
        let path = root.path().join("not-a-dir");
        fs::write(&path, b"x").unwrap();

        assert!(TempFrameRecorder::prepare(&path, Box::new(ImageFileWriter::new())).is_err());
        assert_eq!(fs::read(&path).unwrap(), b"x");
    }

    #[test]
    fn test_output_inside_frames_dir_survives_finish() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("frames");
        let mut rec = recorder(&dir);
        rec.record(0, &frame()).unwrap();
        rec.record(1, &frame()).unwrap();

        let output = dir.join("out.gif");
        rec.finish(&RecordingAssembler::new(false), &output).unwrap();

        assert_eq!(fs::read(&output).unwrap(), b"GIF89a");
        assert!(!dir.join("frame_00000.png").exists());
        assert!(!dir.join("frame_00001.png").exists());
    }

    #[test]
    fn test_finish_passes_sorted_frames_and_cleans_up() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("frames");
        let mut rec = recorder(&dir);
        for n in [2, 0, 1] {
            rec.record(n, &frame()).unwrap();
        }
        assert_eq!(rec.frames_written(), 3);

        let asm = RecordingAssembler::new(false);
        rec.finish(&asm, &root.path().join("out.gif")).unwrap();

        assert_eq!(
            asm.calls.lock().unwrap()[0],
            vec!["frame_00000.png", "frame_00001.png", "frame_00002.png"]
        );
        assert!(!dir.exists());
    }

    #[test]
    fn test_failed_merge_keeps_frames() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("frames");
        let mut rec = recorder(&dir);
        rec.record(0, &frame()).unwrap();

        let err = rec
            .finish(&RecordingAssembler::new(true), &root.path().join("out.gif"))
            .unwrap_err();
        assert!(matches!(err, TrifaceError::ExternalToolFailure { .. }));
        assert!(dir.join("frame_00000.png").exists());
    }

    #[test]
    fn test_no_frames_skips_merge() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("frames");
        let rec = recorder(&dir);
        let asm = RecordingAssembler::new(false);
        rec.finish(&asm, &root.path().join("out.gif")).unwrap();
        assert!(asm.calls.lock().unwrap().is_empty());
        assert!(!dir.exists());
    }

    #[test]
    fn test_back_to_back_sessions_do_not_mix_frames() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("frames");

        let mut first = recorder(&dir);
        for n in 0..3 {
            first.record(n, &frame()).unwrap();
        }
        // first session's merge failed, frames remain on disk
        let _ = first.finish(&RecordingAssembler::new(true), &root.path().join("a.gif"));

        let mut second = recorder(&dir);
        second.record(0, &frame()).unwrap();
        let asm = RecordingAssembler::new(false);
        second.finish(&asm, &root.path().join("b.gif")).unwrap();
        assert_eq!(asm.calls.lock().unwrap()[0], vec!["frame_00000.png"]);
    }

    #[test]
    fn test_non_frame_files_are_ignored() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("frames");
        let mut rec = recorder(&dir);
        rec.record(0, &frame()).unwrap();
        fs::write(dir.join("notes.txt"), b"x").unwrap();
        assert_eq!(rec.list_frames().unwrap().len(), 1);

        rec.finish(&RecordingAssembler::new(false), &root.path().join("out.gif"))
            .unwrap();
        assert!(dir.join("notes.txt").exists());
        assert!(!dir.join("frame_00000.png").exists());
    }
}

use std::time::Instant;

use crate::pipeline::frame_processor::{elapsed_ms, FrameProcessor};
use crate::pipeline::pipeline_logger::PipelineLogger;
use crate::pipeline::session::{SessionState, TrifaceSession};
use crate::presentation::domain::frame_presenter::FramePresenter;
use crate::video::domain::frame_source::FrameSource;
use crate::video::domain::image_writer::ImageWriter;

/// Still-image mode: load → detect → triangulize → show, then wait for a
/// key. With an output path the filtered frame is also written there.
pub struct TriangulateImageUseCase {
    source: Box<dyn FrameSource>,
    processor: FrameProcessor,
    presenter: Box<dyn FramePresenter>,
    image_writer: Box<dyn ImageWriter>,
    logger: Box<dyn PipelineLogger>,
}

impl TriangulateImageUseCase {
    pub fn new(
        source: Box<dyn FrameSource>,
        processor: FrameProcessor,
        presenter: Box<dyn FramePresenter>,
        image_writer: Box<dyn ImageWriter>,
        logger: Box<dyn PipelineLogger>,
    ) -> Self {
        Self {
            source,
            processor,
            presenter,
            image_writer,
            logger,
        }
    }

    pub fn execute(
        &mut self,
        session: &mut TrifaceSession,
    ) -> Result<(), Box<dyn std::error::Error>> {
        session.advance(SessionState::Capturing)?;
        let frame = self.source.frames().next().ok_or("No frame in image")??;
        self.source.close();
        let mut frame = frame.into_top_left();

        session.advance(SessionState::Detecting)?;
        let regions = self.processor.detect(&frame, self.logger.as_mut())?;
        self.logger
            .info(&format!("Found {} face(s) in image", regions.len()));

        session.advance(SessionState::Processing)?;
        self.processor
            .apply(&mut frame, &regions, self.logger.as_mut())?;

        session.advance(SessionState::Presenting)?;
        let start = Instant::now();
        self.presenter.show(&frame)?;
        self.logger.timing("present", elapsed_ms(start));
        self.logger.frame_done(0);

        if let Some(output) = session.options().output.as_deref() {
            self.image_writer.write(output, &frame)?;
            self.logger.info(&format!("Wrote {}", output.display()));
        }

        self.presenter.wait_key(0)?;
        self.presenter.close();
        session.advance(SessionState::Stopped)?;
        self.logger.summary();
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::detection::domain::face_detector::FaceDetector;
    use crate::effect::infrastructure::region_filter_effect::RegionFilterEffect;
    use crate::effect::infrastructure::triangulizor::Triangulizor;
    use crate::pipeline::pipeline_logger::NullPipelineLogger;
    use crate::shared::frame::{Frame, Origin};
    use crate::shared::options::{InputSource, RunOptions};
    use crate::shared::region::Region;
    use std::collections::VecDeque;
    use std::path::{Path, PathBuf};
    use std::sync::{Arc, Mutex};

    // --- Stubs shared with the stream use case tests ---

    pub(crate) struct StubSource {
        frames: VecDeque<Result<Frame, String>>,
        pub closed: Arc<Mutex<bool>>,
    }

    impl StubSource {
        pub fn new(frames: Vec<Frame>) -> Self {
            Self::with_results(frames.into_iter().map(Ok).collect())
        }

        pub fn with_results(frames: Vec<Result<Frame, String>>) -> Self {
            Self {
                frames: frames.into(),
                closed: Arc::new(Mutex::new(false)),
            }
        }
    }

    impl FrameSource for StubSource {
        fn frames(
            &mut self,
        ) -> Box<dyn Iterator<Item = Result<Frame, Box<dyn std::error::Error>>> + '_> {
            Box::new(
                self.frames
                    .drain(..)
                    .map(|r| r.map_err(|e| -> Box<dyn std::error::Error> { e.into() })),
            )
        }

        fn close(&mut self) {
            *self.closed.lock().unwrap() = true;
        }
    }

    /// Returns the same regions for every frame.
    pub(crate) struct StubDetector {
        pub regions: Vec<Region>,
    }

    impl FaceDetector for StubDetector {
        fn detect(&mut self, _frame: &Frame) -> Result<Vec<Region>, Box<dyn std::error::Error>> {
            Ok(self.regions.clone())
        }
    }

    #[derive(Default)]
    pub(crate) struct PresenterLog {
        pub shown: Vec<Frame>,
        pub waits: Vec<i32>,
        pub closed: bool,
    }

    /// Answers `wait_key` from a script; once the script runs out every
    /// wait times out.
    pub(crate) struct StubPresenter {
        keys: VecDeque<Option<i32>>,
        pub log: Arc<Mutex<PresenterLog>>,
    }

    impl StubPresenter {
        pub fn new(keys: Vec<Option<i32>>) -> Self {
            Self {
                keys: keys.into(),
                log: Arc::new(Mutex::new(PresenterLog::default())),
            }
        }
    }

    impl FramePresenter for StubPresenter {
        fn show(&mut self, frame: &Frame) -> Result<(), Box<dyn std::error::Error>> {
            self.log.lock().unwrap().shown.push(frame.clone());
            Ok(())
        }

        fn wait_key(&mut self, delay_ms: i32) -> Result<Option<i32>, Box<dyn std::error::Error>> {
            self.log.lock().unwrap().waits.push(delay_ms);
            Ok(self.keys.pop_front().flatten())
        }

        fn close(&mut self) {
            self.log.lock().unwrap().closed = true;
        }
    }

    pub(crate) struct StubImageWriter {
        pub written: Arc<Mutex<Vec<(PathBuf, Frame)>>>,
    }

    impl StubImageWriter {
        pub fn new() -> Self {
            Self {
                written: Arc::new(Mutex::new(Vec::new())),
            }
        }
    }

    impl ImageWriter for StubImageWriter {
        fn write(&self, path: &Path, frame: &Frame) -> Result<(), Box<dyn std::error::Error>> {
            self.written
                .lock()
                .unwrap()
                .push((path.to_path_buf(), frame.clone()));
            Ok(())
        }
    }

    pub(crate) fn gradient_frame(width: u32, height: u32, index: usize) -> Frame {
        let mut data = Vec::with_capacity((width * height * 3) as usize);
        for y in 0..height {
            for x in 0..width {
                data.extend_from_slice(&[(x * 4) as u8, (y * 4) as u8, ((x ^ y) * 7) as u8]);
            }
        }
        Frame::new(data, width, height, 3, index)
    }

    pub(crate) fn processor(regions: Vec<Region>) -> FrameProcessor {
        FrameProcessor::new(
            Box::new(StubDetector { regions }),
            Box::new(RegionFilterEffect::new(Box::new(Triangulizor::new()), 8)),
        )
    }

    pub(crate) fn face(x: u32, y: u32, size: u32) -> Region {
        Region {
            x,
            y,
            width: size,
            height: size,
            neighbors: 2,
        }
    }

    fn image_session(output: Option<&Path>) -> TrifaceSession {
        let mut options = RunOptions::new(InputSource::Image(PathBuf::from("face.png")));
        options.output = output.map(Path::to_path_buf);
        TrifaceSession::new(options)
    }

    // --- Tests ---

    #[test]
    fn test_zero_faces_output_identical_to_input() {
        let input = gradient_frame(48, 32, 0);
        let writer = StubImageWriter::new();
        let written = writer.written.clone();

        let mut uc = TriangulateImageUseCase::new(
            Box::new(StubSource::new(vec![input.clone()])),
            processor(vec![]),
            Box::new(StubPresenter::new(vec![Some(27)])),
            Box::new(writer),
            Box::new(NullPipelineLogger),
        );
        uc.execute(&mut image_session(Some(Path::new("out.png"))))
            .unwrap();

        let written = written.lock().unwrap();
        assert_eq!(written.len(), 1);
        assert_eq!(written[0].0, PathBuf::from("out.png"));
        assert_eq!(written[0].1.data(), input.data());
    }

    #[test]
    fn test_one_face_changes_only_its_region() {
        let input = gradient_frame(64, 48, 0);
        let r = face(16, 8, 24);
        let presenter = StubPresenter::new(vec![Some(32)]);
        let log = presenter.log.clone();

        let mut uc = TriangulateImageUseCase::new(
            Box::new(StubSource::new(vec![input.clone()])),
            processor(vec![r]),
            Box::new(presenter),
            Box::new(StubImageWriter::new()),
            Box::new(NullPipelineLogger),
        );
        uc.execute(&mut image_session(None)).unwrap();

        let log = log.lock().unwrap();
        let shown = &log.shown[0];
        let mut changed = 0;
        for y in 0..48 {
            for x in 0..64 {
                let i = ((y * 64 + x) * 3) as usize;
                let same = shown.data()[i..i + 3] == input.data()[i..i + 3];
                if r.contains(x, y) {
                    changed += usize::from(!same);
                } else {
                    assert!(same, "pixel ({x},{y}) outside the face changed");
                }
            }
        }
        assert!(changed > 0);
    }

    #[test]
    fn test_displays_once_then_waits_forever() {
        let presenter = StubPresenter::new(vec![Some(1)]);
        let log = presenter.log.clone();
        let source = StubSource::new(vec![gradient_frame(16, 16, 0)]);
        let closed = source.closed.clone();
        let writer = StubImageWriter::new();
        let written = writer.written.clone();

        let mut session = image_session(None);
        let mut uc = TriangulateImageUseCase::new(
            Box::new(source),
            processor(vec![]),
            Box::new(presenter),
            Box::new(writer),
            Box::new(NullPipelineLogger),
        );
        uc.execute(&mut session).unwrap();

        let log = log.lock().unwrap();
        assert_eq!(log.shown.len(), 1);
        assert_eq!(log.waits, vec![0]);
        assert!(log.closed);
        assert!(*closed.lock().unwrap());
        assert!(written.lock().unwrap().is_empty());
        assert!(session.is_stopped());
        assert_eq!(session.frames_numbered(), 0);
    }

    #[test]
    fn test_bottom_left_frame_is_flipped_before_display() {
        // 1x2 frame: bottom row stored first
        let frame = Frame::new(vec![0, 0, 0, 255, 255, 255], 1, 2, 3, 0)
            .with_origin(Origin::BottomLeft);
        let presenter = StubPresenter::new(vec![]);
        let log = presenter.log.clone();
        let mut uc = TriangulateImageUseCase::new(
            Box::new(StubSource::new(vec![frame])),
            processor(vec![]),
            Box::new(presenter),
            Box::new(StubImageWriter::new()),
            Box::new(NullPipelineLogger),
        );
        uc.execute(&mut image_session(None)).unwrap();
        assert_eq!(log.lock().unwrap().shown[0].data(), &[255, 255, 255, 0, 0, 0]);
    }

    #[test]
    fn test_empty_source_is_error() {
        let mut uc = TriangulateImageUseCase::new(
            Box::new(StubSource::new(vec![])),
            processor(vec![]),
            Box::new(StubPresenter::new(vec![])),
            Box::new(StubImageWriter::new()),
            Box::new(NullPipelineLogger),
        );
        assert!(uc.execute(&mut image_session(None)).is_err());
    }
}

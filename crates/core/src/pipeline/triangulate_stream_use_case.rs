use std::time::Instant;

use crate::pipeline::frame_processor::{elapsed_ms, FrameProcessor};
use crate::pipeline::pipeline_logger::PipelineLogger;
use crate::pipeline::session::{SessionState, TrifaceSession};
use crate::presentation::domain::frame_presenter::FramePresenter;
use crate::recording::domain::animation_assembler::AnimationAssembler;
use crate::recording::infrastructure::temp_frame_recorder::TempFrameRecorder;
use crate::shared::constants::KEY_POLL_MS;
use crate::video::domain::frame_source::FrameSource;
use crate::video::domain::image_writer::ImageWriter;

/// What a recording session needs: a writer for the numbered frames and
/// the tool that merges them.
pub struct FrameRecording {
    pub writer: Box<dyn ImageWriter>,
    pub assembler: Box<dyn AnimationAssembler>,
}

/// Camera mode: capture → detect → triangulize → show, frame after frame,
/// until the stream ends or a key is pressed.
///
/// When the session records frames, every presented frame goes to the
/// temp directory and the sequence is merged into the output file once
/// the loop stops.
pub struct TriangulateStreamUseCase {
    source: Box<dyn FrameSource>,
    processor: FrameProcessor,
    presenter: Box<dyn FramePresenter>,
    recording: Option<FrameRecording>,
    logger: Box<dyn PipelineLogger>,
}

impl TriangulateStreamUseCase {
    pub fn new(
        source: Box<dyn FrameSource>,
        processor: FrameProcessor,
        presenter: Box<dyn FramePresenter>,
        logger: Box<dyn PipelineLogger>,
    ) -> Self {
        Self {
            source,
            processor,
            presenter,
            recording: None,
            logger,
        }
    }

    pub fn with_recording(mut self, recording: FrameRecording) -> Self {
        self.recording = Some(recording);
        self
    }

    pub fn execute(
        &mut self,
        session: &mut TrifaceSession,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let options = session.options().clone();
        let mut recorder = match (&options.output, options.records_frames()) {
            (Some(output), true) => {
                let recording = self
                    .recording
                    .take()
                    .ok_or("Frame recording requested but no recorder was configured")?;
                let recorder = TempFrameRecorder::prepare(&options.temp_dir, recording.writer)?;
                self.logger.info(&format!(
                    "Recording frames to {} for {}",
                    recorder.dir().display(),
                    output.display()
                ));
                Some((recorder, recording.assembler, output.clone()))
            }
            _ => None,
        };

        session.advance(SessionState::Capturing)?;
        let mut cancelled = false;
        let mut presented = 0usize;
        for item in self.source.frames() {
            let frame = item?;
            if frame.channels() != 3 {
                log::warn!(
                    "Skipping frame {} with {} channels",
                    frame.index(),
                    frame.channels()
                );
                continue;
            }
            let mut frame = frame.into_top_left();

            session.advance(SessionState::Detecting)?;
            let regions = self.processor.detect(&frame, self.logger.as_mut())?;

            session.advance(SessionState::Processing)?;
            self.processor
                .apply(&mut frame, &regions, self.logger.as_mut())?;

            session.advance(SessionState::Presenting)?;
            let start = Instant::now();
            self.presenter.show(&frame)?;
            if let Some((recorder, _, _)) = recorder.as_mut() {
                recorder.record(session.next_frame_number(), &frame)?;
            }
            self.logger.timing("present", elapsed_ms(start));
            self.logger.frame_done(presented);
            presented += 1;

            if let Some(key) = self.presenter.wait_key(KEY_POLL_MS)? {
                log::info!("Key {key} pressed, stopping capture");
                cancelled = true;
                break;
            }
            session.advance(SessionState::Capturing)?;
        }

        if !cancelled {
            self.logger
                .info("End of stream, press any key in the window to exit");
            self.presenter.wait_key(0)?;
        }
        self.source.close();
        self.presenter.close();
        session.advance(SessionState::Stopped)?;
        self.logger
            .info(&format!("Stopped after {presented} frame(s)"));

        if let Some((recorder, assembler, output)) = recorder {
            recorder.finish(assembler.as_ref(), &output)?;
        }
        self.logger.summary();
        Ok(())
    }
}

mod common;

use assert_fs::prelude::*;
use assert_fs::TempDir;

use common::{
    dir_entries, synthesizer_expecting, test_config, FailAt, FakeMedia, FakeTranscriber,
    MockSynthesizer, MockTranslator,
};
use revoice::error::RevoiceError;
use revoice::upload::{Upload, VideoPayload};
use revoice::workflow::{JobState, Workflow};

fn clip(data: &str) -> VideoPayload {
    VideoPayload::Bytes {
        filename: "clip.mp4".to_string(),
        data: data.as_bytes().to_vec(),
    }
}

fn workflow(
    temp: &TempDir,
    media: FakeMedia,
    transcriber: FakeTranscriber,
    translator: MockTranslator,
    synthesizer: MockSynthesizer,
) -> Workflow {
    Workflow::new(
        test_config(temp.path()),
        Box::new(media),
        Box::new(transcriber),
        Box::new(translator),
        Box::new(synthesizer),
    )
}

#[tokio::test]
async fn short_english_video_is_one_untranslated_segment() {
    let temp = TempDir::new().unwrap();
    let media = FakeMedia::new(10.0, 0);
    let workflow = workflow(
        &temp,
        media.clone(),
        FakeTranscriber::default(),
        MockTranslator::new(),
        synthesizer_expecting("en"),
    );

    let result = workflow
        .submit(Upload::new(clip("hello world"), "English"))
        .await
        .unwrap();

    assert_eq!(result.segment_count, 1);
    assert_eq!(result.transcript_units, vec!["hello world"]);
    assert_eq!(result.translation_units, result.transcript_units);
    assert_eq!(result.transcript, "hello world");
    assert_eq!(result.translation, "hello world");
    assert!(result.output_path.exists());
    assert!(result.video_url.starts_with("/output/final_"));

    assert_eq!(media.calls(), vec!["probe", "extract", "remux"]);
    assert!(dir_entries(&temp.path().join("uploads")).is_empty());
    assert_eq!(dir_entries(&temp.path().join("output")).len(), 1);
}

#[tokio::test]
async fn forty_second_french_video_is_split_in_order() {
    let temp = TempDir::new().unwrap();
    let media = FakeMedia::new(40.0, 3);

    let mut translator = MockTranslator::new();
    translator
        .expect_translate()
        .withf(|_, model_id, language| {
            model_id.to_string() == "Helsinki-NLP/opus-mt-en-fr" && language.to_string() == "French"
        })
        .times(3)
        .returning(|text, _, _| Ok(format!("fr({})", text)));

    let workflow = workflow(
        &temp,
        media.clone(),
        FakeTranscriber::default(),
        translator,
        synthesizer_expecting("en"),
    );

    let result = workflow
        .submit(Upload::new(clip("whole"), "French"))
        .await
        .unwrap();

    assert_eq!(result.segment_count, 3);
    assert_eq!(result.transcript_units, vec!["part 0", "part 1", "part 2"]);
    assert_eq!(
        result.translation_units,
        vec!["fr(part 0)", "fr(part 1)", "fr(part 2)"]
    );
    assert_eq!(result.transcript, "part 0 part 1 part 2");
    assert_eq!(result.translation, "fr(part 0) fr(part 1) fr(part 2)");

    assert_eq!(
        media.calls(),
        vec!["probe", "split", "extract", "extract", "extract", "remux"]
    );
    assert!(dir_entries(&temp.path().join("uploads")).is_empty());
}

#[tokio::test]
async fn hindi_is_spoken_with_hindi_voice() {
    let temp = TempDir::new().unwrap();
    let mut translator = MockTranslator::new();
    translator
        .expect_translate()
        .withf(|_, model_id, _| model_id.to_string() == "Helsinki-NLP/opus-mt-en-hi")
        .times(1)
        .returning(|_, _, _| Ok("नमस्ते".to_string()));

    let workflow = workflow(
        &temp,
        FakeMedia::new(8.0, 0),
        FakeTranscriber::default(),
        translator,
        synthesizer_expecting("hi"),
    );

    let result = workflow
        .submit(Upload::new(clip("hello"), "Hindi"))
        .await
        .unwrap();
    assert_eq!(result.translation, "नमस्ते");
}

#[tokio::test]
async fn unknown_language_falls_back_to_identity() {
    let temp = TempDir::new().unwrap();
    let workflow = workflow(
        &temp,
        FakeMedia::new(20.0, 2),
        FakeTranscriber::default(),
        // any translator call would panic
        MockTranslator::new(),
        synthesizer_expecting("en"),
    );

    let result = workflow
        .submit(Upload::new(clip("whole"), "Klingon"))
        .await
        .unwrap();

    assert_eq!(result.translation_units, result.transcript_units);
    assert_eq!(result.segment_count, 2);
}

#[tokio::test]
async fn missing_video_is_rejected_before_any_work() {
    let temp = TempDir::new().unwrap();
    let media = FakeMedia::new(10.0, 0);
    let workflow = workflow(
        &temp,
        media.clone(),
        FakeTranscriber::default(),
        MockTranslator::new(),
        MockSynthesizer::new(),
    );

    let failure = workflow
        .submit(Upload {
            video: None,
            target_language: Some("French".to_string()),
        })
        .await
        .unwrap_err();

    assert!(matches!(failure.error, RevoiceError::Upload(_)));
    assert_eq!(failure.stage, JobState::Received);
    assert_eq!(failure.to_string(), "No video file uploaded");
    assert!(media.calls().is_empty());
    assert!(dir_entries(&temp.path().join("uploads")).is_empty());
}

#[tokio::test]
async fn probe_failure_still_removes_upload() {
    let temp = TempDir::new().unwrap();
    let workflow = workflow(
        &temp,
        FakeMedia::new(10.0, 0).failing_at(FailAt::Probe),
        FakeTranscriber::default(),
        MockTranslator::new(),
        MockSynthesizer::new(),
    );

    let failure = workflow
        .submit(Upload::new(clip("whole"), "English"))
        .await
        .unwrap_err();

    assert_eq!(failure.error.kind(), "MediaProbeError");
    assert_eq!(failure.stage, JobState::Probing);
    assert!(failure.to_string().contains("moov atom not found"));
    assert!(dir_entries(&temp.path().join("uploads")).is_empty());
}

#[tokio::test]
async fn segmentation_failure_removes_upload_and_partial_segments() {
    let temp = TempDir::new().unwrap();
    let workflow = workflow(
        &temp,
        FakeMedia::new(40.0, 3).failing_at(FailAt::Split),
        FakeTranscriber::default(),
        MockTranslator::new(),
        MockSynthesizer::new(),
    );

    let failure = workflow
        .submit(Upload::new(clip("whole"), "French"))
        .await
        .unwrap_err();

    assert_eq!(failure.error.kind(), "SegmentationError");
    assert_eq!(failure.stage, JobState::Segmenting);
    assert!(failure.partial.is_none());
    assert!(dir_entries(&temp.path().join("uploads")).is_empty());
}

#[tokio::test]
async fn segment_failure_aborts_job_and_cleans_up() {
    let temp = TempDir::new().unwrap();
    let media = FakeMedia::new(40.0, 3);
    let workflow = workflow(
        &temp,
        media.clone(),
        FakeTranscriber::failing_on(1),
        MockTranslator::new(),
        MockSynthesizer::new(),
    );

    let failure = workflow
        .submit(Upload::new(clip("whole"), "English"))
        .await
        .unwrap_err();

    match &failure.error {
        RevoiceError::SegmentProcessing { index, segment, .. } => {
            assert_eq!(*index, 1);
            assert!(segment.to_string_lossy().ends_with("_segment_001.mp4"));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(failure.stage, JobState::ProcessingSegments);
    assert!(failure.partial.is_none());
    // no segment after the failing one was touched
    assert_eq!(media.calls(), vec!["probe", "split", "extract", "extract"]);
    assert!(dir_entries(&temp.path().join("uploads")).is_empty());
    assert!(dir_entries(&temp.path().join("output")).is_empty());
}

#[tokio::test]
async fn remux_failure_keeps_computed_text() {
    let temp = TempDir::new().unwrap();
    let workflow = workflow(
        &temp,
        FakeMedia::new(12.0, 0).failing_at(FailAt::Remux),
        FakeTranscriber::default(),
        MockTranslator::new(),
        synthesizer_expecting("en"),
    );

    let failure = workflow
        .submit(Upload::new(clip("good morning"), "English"))
        .await
        .unwrap_err();

    assert_eq!(failure.error.kind(), "RemuxError");
    assert_eq!(failure.stage, JobState::Remuxing);
    let partial = failure.partial.expect("text computed before remux");
    assert_eq!(partial.transcript, "good morning");
    assert_eq!(partial.translation, "good morning");

    // half-written output and synthesized speech are both gone
    assert!(dir_entries(&temp.path().join("output")).is_empty());
    assert!(dir_entries(&temp.path().join("uploads")).is_empty());
}

#[tokio::test]
async fn synthesis_failure_is_reported_as_synthesis_error() {
    let temp = TempDir::new().unwrap();
    let mut synthesizer = MockSynthesizer::new();
    synthesizer
        .expect_synthesize()
        .times(1)
        .returning(|_, _, _| Err(RevoiceError::Http(reqwest_error())));

    let workflow = workflow(
        &temp,
        FakeMedia::new(5.0, 0),
        FakeTranscriber::default(),
        MockTranslator::new(),
        synthesizer,
    );

    let failure = workflow
        .submit(Upload::new(clip("hi"), "English"))
        .await
        .unwrap_err();

    assert_eq!(failure.error.kind(), "SynthesisError");
    assert_eq!(failure.stage, JobState::Synthesizing);
    assert!(failure.partial.is_some());
}

fn reqwest_error() -> reqwest::Error {
    // building a request with an invalid URL yields a real reqwest::Error
    reqwest::Client::new().get("not a url").build().unwrap_err()
}

#[tokio::test]
async fn upload_file_is_copied_not_moved() {
    let temp = TempDir::new().unwrap();
    temp.child("library").create_dir_all().unwrap();
    let source = temp.child("library/talk.mp4");
    source.write_str("keynote").unwrap();

    let workflow = workflow(
        &temp,
        FakeMedia::new(3.0, 0),
        FakeTranscriber::default(),
        MockTranslator::new(),
        synthesizer_expecting("en"),
    );

    let result = workflow
        .submit(Upload::new(VideoPayload::File(source.path().to_path_buf()), "English"))
        .await
        .unwrap();

    assert_eq!(result.transcript, "keynote");
    source.assert("keynote");
}

#[tokio::test]
async fn upload_named_like_a_segment_is_not_processed_as_one() {
    let temp = TempDir::new().unwrap();
    let media = FakeMedia::new(40.0, 3);
    let workflow = workflow(
        &temp,
        media.clone(),
        FakeTranscriber::default(),
        MockTranslator::new(),
        synthesizer_expecting("en"),
    );
    let upload = VideoPayload::Bytes {
        filename: "segment_007.mp4".to_string(),
        data: b"whole".to_vec(),
    };

    let result = workflow
        .submit(Upload::new(upload, "English"))
        .await
        .unwrap();

    assert_eq!(result.segment_count, 3);
    assert_eq!(result.transcript_units, vec!["part 0", "part 1", "part 2"]);
    assert_eq!(
        media.calls(),
        vec!["probe", "split", "extract", "extract", "extract", "remux"]
    );
    assert!(dir_entries(&temp.path().join("uploads")).is_empty());
}

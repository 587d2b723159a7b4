mod common;

use common::mock_video::{MockDisplay, MockSink, MockSource};
use common::mock_vision::{DrawnLine, Kind, MockImage, MockVision};
use lane_detection::config::Config;
use lane_detection::error::LaneError;
use lane_detection::pipeline::{PipelineOrchestrator, StopReason};
use lane_detection::types::{Bgr, LineSegment, Point};
use lane_detection::video_processor::Display;

const WIDTH: i32 = 960;
const HEIGHT: i32 = 480;

fn two_sided() -> Vec<LineSegment> {
    vec![
        LineSegment::new(100, 480, 200, 300),
        LineSegment::new(800, 480, 700, 300),
    ]
}

fn as_display(display: &mut MockDisplay) -> Option<&mut dyn Display<MockImage>> {
    Some(display as &mut dyn Display<MockImage>)
}

#[test]
fn two_sided_video_draws_both_lanes_on_every_frame() {
    let vision = MockVision::with_segments(two_sided());
    let orchestrator = PipelineOrchestrator::new(&vision, Config::default()).unwrap();
    let mut source = MockSource::new(WIDTH, HEIGHT, 3);
    let mut sink = MockSink::default();

    let report = orchestrator.run(&mut source, &mut sink, None).unwrap();

    assert_eq!(report.stop_reason, StopReason::EndOfStream);
    assert_eq!(report.stats.frame_count(), 3);
    assert_eq!(report.stats.durations().len(), 3);
    assert!(report.stats.mean_duration().is_some());
    assert_eq!(sink.written.len(), 3);

    for (id, frame) in sink.written.iter().enumerate() {
        assert_eq!(frame.frame_id, id as u64);
        assert_eq!(frame.kind, Kind::Blended);
        assert_eq!(
            frame.lines,
            vec![
                DrawnLine {
                    from: Point::new(100, 480),
                    to: Point::new(206, 288),
                    color: Bgr::RED,
                    thickness: 10,
                },
                DrawnLine {
                    from: Point::new(800, 480),
                    to: Point::new(693, 288),
                    color: Bgr::RED,
                    thickness: 10,
                },
            ]
        );
    }

    assert_eq!(vision.count("blend:1:0.8:0"), 3);
    assert_eq!(source.released, 1);
    assert_eq!(sink.released, 1);
}

#[test]
fn stages_run_in_order_with_configured_parameters() {
    let vision = MockVision::with_segments(two_sided());
    let orchestrator = PipelineOrchestrator::new(&vision, Config::default()).unwrap();
    let mut source = MockSource::new(WIDTH, HEIGHT, 1);
    let mut sink = MockSink::default();

    orchestrator.run(&mut source, &mut sink, None).unwrap();

    let calls = vision.calls.borrow().clone();
    assert_eq!(
        calls,
        vec![
            "grayscale",
            "blur:5",
            "canny:50:150",
            "mask:4",
            "hough",
            "blank",
            "line",
            "line",
            "blend:1:0.8:0",
        ]
    );
}

#[test]
fn no_segments_leaves_frames_untouched() {
    let vision = MockVision::default();
    let orchestrator = PipelineOrchestrator::new(&vision, Config::default()).unwrap();
    let mut source = MockSource::new(WIDTH, HEIGHT, 2);
    let mut sink = MockSink::default();

    let report = orchestrator.run(&mut source, &mut sink, None).unwrap();

    assert_eq!(report.stats.frame_count(), 2);
    assert_eq!(vision.count("blend"), 0);
    assert_eq!(vision.count("blank"), 0);
    for (id, frame) in sink.written.iter().enumerate() {
        assert_eq!(*frame, MockImage::color(WIDTH, HEIGHT, id as u64));
    }
}

#[test]
fn single_side_draws_exactly_one_line() {
    let vision = MockVision::with_segments(vec![
        LineSegment::new(100, 480, 200, 300),
        LineSegment::new(0, 200, 100, 205),
    ]);
    let orchestrator = PipelineOrchestrator::new(&vision, Config::default()).unwrap();
    let mut source = MockSource::new(WIDTH, HEIGHT, 1);
    let mut sink = MockSink::default();

    orchestrator.run(&mut source, &mut sink, None).unwrap();

    let frame = &sink.written[0];
    assert_eq!(frame.kind, Kind::Blended);
    assert_eq!(frame.lines.len(), 1);
    assert_eq!(frame.lines[0].from, Point::new(100, 480));
    assert_eq!(frame.painted, None);
}

#[test]
fn lanes_vary_per_frame_without_memory() {
    let mut vision = MockVision::with_segments(two_sided());
    vision
        .segments_by_frame
        .insert(1, vec![LineSegment::new(800, 480, 700, 300)]);
    let orchestrator = PipelineOrchestrator::new(&vision, Config::default()).unwrap();
    let mut source = MockSource::new(WIDTH, HEIGHT, 3);
    let mut sink = MockSink::default();

    orchestrator.run(&mut source, &mut sink, None).unwrap();

    let counts: Vec<usize> = sink.written.iter().map(|f| f.lines.len()).collect();
    assert_eq!(counts, vec![2, 1, 2]);
    // frame 2 is identical to frame 0: nothing carried over from frame 1
    assert_eq!(sink.written[0].lines, sink.written[2].lines);
}

#[test]
fn zero_frame_video_exits_cleanly() {
    let vision = MockVision::with_segments(two_sided());
    let orchestrator = PipelineOrchestrator::new(&vision, Config::default()).unwrap();
    let mut source = MockSource::new(WIDTH, HEIGHT, 0);
    let mut sink = MockSink::default();
    let mut display = MockDisplay::default();

    let report = orchestrator
        .run(&mut source, &mut sink, as_display(&mut display))
        .unwrap();

    assert_eq!(report.stop_reason, StopReason::EndOfStream);
    assert_eq!(report.stats.frame_count(), 0);
    assert_eq!(report.stats.mean_fps(), None);
    assert_eq!(report.stats.summary().avg_frame_secs, None);
    assert!(sink.written.is_empty());
    assert_eq!(source.released, 1);
    assert_eq!(sink.released, 1);
    assert_eq!(display.closed, 1);
}

#[test]
fn read_failure_stops_like_end_of_stream() {
    let vision = MockVision::with_segments(two_sided());
    let orchestrator = PipelineOrchestrator::new(&vision, Config::default()).unwrap();
    let mut source = MockSource::new(WIDTH, HEIGHT, 5);
    source.fail_after = Some(2);
    let mut sink = MockSink::default();

    let report = orchestrator.run(&mut source, &mut sink, None).unwrap();

    assert_eq!(report.stop_reason, StopReason::ReadFailure);
    assert_eq!(report.stats.frame_count(), 2);
    assert_eq!(sink.written.len(), 2);
    assert_eq!(source.released, 1);
    assert_eq!(sink.released, 1);
}

#[test]
fn quit_key_ends_run_early() {
    let vision = MockVision::with_segments(two_sided());
    let orchestrator = PipelineOrchestrator::new(&vision, Config::default()).unwrap();
    let mut source = MockSource::new(WIDTH, HEIGHT, 10);
    let mut sink = MockSink::default();
    let mut display = MockDisplay {
        quit_after: Some(4),
        ..Default::default()
    };

    let report = orchestrator
        .run(&mut source, &mut sink, as_display(&mut display))
        .unwrap();

    assert_eq!(report.stop_reason, StopReason::UserQuit);
    assert_eq!(report.stats.frame_count(), 4);
    assert_eq!(sink.written.len(), 4);
    assert_eq!(display.shown, 4);
    assert_eq!(display.closed, 1);
    assert_eq!(source.released, 1);
    assert_eq!(sink.released, 1);
}

#[test]
fn backend_failure_aborts_but_still_releases() {
    let mut vision = MockVision::with_segments(two_sided());
    vision.fail_on_frame = Some(1);
    let orchestrator = PipelineOrchestrator::new(&vision, Config::default()).unwrap();
    let mut source = MockSource::new(WIDTH, HEIGHT, 4);
    let mut sink = MockSink::default();
    let mut display = MockDisplay::default();

    let result = orchestrator.run(&mut source, &mut sink, as_display(&mut display));

    assert!(matches!(result, Err(LaneError::Vision(_))));
    assert_eq!(sink.written.len(), 1);
    assert_eq!(source.released, 1);
    assert_eq!(sink.released, 1);
    assert_eq!(display.closed, 1);
}

#[test]
fn write_failure_aborts_but_still_releases() {
    let vision = MockVision::with_segments(two_sided());
    let orchestrator = PipelineOrchestrator::new(&vision, Config::default()).unwrap();
    let mut source = MockSource::new(WIDTH, HEIGHT, 4);
    let mut sink = MockSink {
        fail_on_write: Some(2),
        ..Default::default()
    };

    let result = orchestrator.run(&mut source, &mut sink, None);

    assert!(matches!(result, Err(LaneError::Io { .. })));
    assert_eq!(sink.written.len(), 2);
    assert_eq!(source.released, 1);
    assert_eq!(sink.released, 1);
}

#[test]
fn frame_size_change_stops_run() {
    let vision = MockVision::with_segments(two_sided());
    let orchestrator = PipelineOrchestrator::new(&vision, Config::default()).unwrap();
    let mut source = MockSource::new(WIDTH, HEIGHT, 3);
    source.frames[1] = MockImage::color(640, 360, 1);
    let mut sink = MockSink::default();

    let report = orchestrator.run(&mut source, &mut sink, None).unwrap();

    assert_eq!(report.stop_reason, StopReason::FrameSizeMismatch);
    assert_eq!(report.stats.frame_count(), 1);
    assert_eq!(source.released, 1);
}

#[test]
fn invalid_parameters_rejected_before_processing() {
    let vision = MockVision::default();
    let mut config = Config::default();
    config.edges.low_threshold = 200.0;

    let result = PipelineOrchestrator::new(&vision, config);

    assert!(matches!(result, Err(LaneError::InvalidParameter(_))));
    assert!(vision.calls.borrow().is_empty());
}

#[test]
fn zero_area_source_fails_and_releases() {
    let vision = MockVision::with_segments(two_sided());
    let orchestrator = PipelineOrchestrator::new(&vision, Config::default()).unwrap();
    let mut source = MockSource::new(0, 0, 2);
    let mut sink = MockSink::default();

    let result = orchestrator.run(&mut source, &mut sink, None);

    assert!(matches!(result, Err(LaneError::InvalidInput(_))));
    assert!(vision.calls.borrow().is_empty());
    assert!(sink.written.is_empty());
    assert_eq!(source.released, 1);
    assert_eq!(sink.released, 1);
}

#[test]
fn debug_layers_drawn_when_enabled() {
    let vision = MockVision::default();
    let mut config = Config::default();
    config.overlay.show_region = true;
    config.overlay.show_edges = true;
    let orchestrator = PipelineOrchestrator::new(&vision, config).unwrap();
    let mut source = MockSource::new(WIDTH, HEIGHT, 1);
    let mut sink = MockSink::default();

    orchestrator.run(&mut source, &mut sink, None).unwrap();

    // No lanes, but the region outline and edge map still go through the blend.
    let frame = &sink.written[0];
    assert_eq!(frame.kind, Kind::Blended);
    assert_eq!(frame.painted, Some(Bgr::GREEN));
    assert_eq!(frame.lines.len(), 4);
    assert!(frame.lines.iter().all(|l| l.color == Bgr::YELLOW));
    assert_eq!(frame.lines[0].from, Point::new(0, 480));
    assert_eq!(frame.lines[0].to, Point::new(432, 288));
}

#[test]
fn tiny_frames_still_processed() {
    let vision = MockVision::default();
    let orchestrator = PipelineOrchestrator::new(&vision, Config::default()).unwrap();
    let mut source = MockSource::new(2, 2, 2);
    let mut sink = MockSink::default();

    let report = orchestrator.run(&mut source, &mut sink, None).unwrap();

    assert_eq!(report.stop_reason, StopReason::EndOfStream);
    assert_eq!(report.stats.frame_count(), 2);
    assert_eq!(vision.count("mask:3"), 2);
}

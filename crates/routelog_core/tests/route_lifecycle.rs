//! Route lifecycle integration tests.
//!
//! These read the on-disk channels back through the testkit reader and
//! assert the stream structure the logger guarantees: sentinel bounds,
//! init payload placement, dual-channel routing, and lock-file semantics.

use routelog_codec::FrameTag;
use routelog_core::{Config, CoreError, IdentifierCache, IdentifierStore, RouteLogger};
use routelog_testkit::fixtures::{full_log_frames, full_log_path, quick_log_frames, quick_log_path};
use routelog_testkit::{Frame, MemoryIdentifierStore, TestRoute};
use std::sync::Arc;

const INIT: &[u8] = b"init-payload";

fn tags(frames: &[Frame]) -> Vec<FrameTag> {
    frames.iter().map(|f| f.tag).collect()
}

#[test]
fn scenario_two_segments() {
    let route = TestRoute::new();
    let mut logger = route.logger(INIT);

    let segment0 = logger.segment_path().to_path_buf();
    logger.write(&[0x01, 0x02, 0x03], true).unwrap();
    logger.advance_segment().unwrap();
    let segment1 = logger.segment_path().to_path_buf();
    logger.write(&[0x04], false).unwrap();

    let lock_path = logger.lock_path().to_path_buf();
    logger.close().unwrap();

    // Segment 0: both channels carry the route preamble, the init payload,
    // the shared message, and the segment-end boundary.
    let full0 = full_log_frames(&segment0);
    let quick0 = quick_log_frames(&segment0);
    assert_eq!(
        tags(&full0),
        vec![
            FrameTag::RouteStart,
            FrameTag::SegmentStart,
            FrameTag::Data,
            FrameTag::Data,
            FrameTag::SegmentEnd,
        ]
    );
    assert_eq!(tags(&quick0), tags(&full0));
    assert_eq!(full0[2].payload, INIT);
    assert_eq!(full0[3].payload, &[0x01, 0x02, 0x03]);
    assert_eq!(quick0[3].payload, &[0x01, 0x02, 0x03]);

    // Segment 1: the quick log excludes the full-log-only message, the
    // route ends with the neutral exit code in both channels.
    let full1 = full_log_frames(&segment1);
    let quick1 = quick_log_frames(&segment1);
    assert_eq!(
        tags(&full1),
        vec![
            FrameTag::SegmentStart,
            FrameTag::Data,
            FrameTag::Data,
            FrameTag::RouteEnd,
        ]
    );
    assert_eq!(
        tags(&quick1),
        vec![FrameTag::SegmentStart, FrameTag::Data, FrameTag::RouteEnd]
    );
    assert_eq!(full1[1].payload, INIT);
    assert_eq!(full1[2].payload, &[0x04]);
    assert_eq!(quick1[1].payload, INIT);
    assert_eq!(full1.last().unwrap().exit_code(), Some(0));
    assert_eq!(quick1.last().unwrap().exit_code(), Some(0));

    assert!(!lock_path.exists());
}

#[test]
fn directory_layout() {
    let route = TestRoute::new();
    let logger = route.logger(INIT);

    let segment = logger.segment_path().to_path_buf();
    assert_eq!(segment, logger.route_path().join("0000"));
    assert!(full_log_path(&segment).exists());
    assert!(quick_log_path(&segment).exists());
    assert_eq!(
        logger.lock_path(),
        route
            .root()
            .join(format!("{}.lock", logger.route_name()))
    );
    logger.close().unwrap();
}

#[test]
fn lock_file_lifecycle() {
    let route = TestRoute::new();
    let logger = route.logger(INIT);
    let lock_path = logger.lock_path().to_path_buf();

    assert!(lock_path.exists());
    logger.close().unwrap();
    assert!(!lock_path.exists());
}

#[test]
fn dropped_logger_leaves_lock_file() {
    let route = TestRoute::new();
    let (lock_path, segment) = {
        let mut logger = route.logger(INIT);
        logger.write(b"about to crash", true).unwrap();
        (
            logger.lock_path().to_path_buf(),
            logger.segment_path().to_path_buf(),
        )
        // Dropped without close: the crash path.
    };

    assert!(lock_path.exists());

    // Channels are still decodable but end without a route-end sentinel.
    let full = full_log_frames(&segment);
    assert_eq!(full.last().unwrap().payload, b"about to crash");
    assert!(full.iter().all(|f| f.tag != FrameTag::RouteEnd));
}

#[test]
fn segment_indices_are_contiguous() {
    let route = TestRoute::new();
    let mut logger = route.logger(INIT);

    let mut seen = vec![logger.segment_index()];
    let mut paths = vec![logger.segment_path().to_path_buf()];
    for _ in 0..5 {
        logger.advance_segment().unwrap();
        seen.push(logger.segment_index());
        paths.push(logger.segment_path().to_path_buf());
    }
    logger.close().unwrap();

    assert_eq!(seen, vec![0, 1, 2, 3, 4, 5]);

    // Zero-padded directory names sort lexically in numeric order.
    let mut names: Vec<String> = paths
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    let numeric = names.clone();
    names.sort();
    assert_eq!(names, numeric);
}

#[test]
fn every_segment_begins_with_start_and_init() {
    let route = TestRoute::new();
    let mut logger = route.logger(INIT);

    let mut segments = vec![logger.segment_path().to_path_buf()];
    for _ in 0..3 {
        logger.write(b"tick", true).unwrap();
        logger.advance_segment().unwrap();
        segments.push(logger.segment_path().to_path_buf());
    }
    logger.close().unwrap();

    for (index, segment) in segments.iter().enumerate() {
        for frames in [full_log_frames(segment), quick_log_frames(segment)] {
            // Segment 0 carries the route preamble ahead of its
            // segment-level framing.
            let head = if index == 0 {
                assert_eq!(frames[0].tag, FrameTag::RouteStart);
                &frames[1..]
            } else {
                &frames[..]
            };
            assert_eq!(head[0].tag, FrameTag::SegmentStart);
            assert_eq!(head[1].tag, FrameTag::Data);
            assert_eq!(head[1].payload, INIT);
        }
    }

    // Non-terminal segments end with segment-end, the last with route-end.
    for segment in &segments[..segments.len() - 1] {
        assert_eq!(
            full_log_frames(segment).last().unwrap().tag,
            FrameTag::SegmentEnd
        );
    }
    assert_eq!(
        full_log_frames(segments.last().unwrap()).last().unwrap().tag,
        FrameTag::RouteEnd
    );
}

#[test]
fn exit_signal_last_value_wins() {
    let route = TestRoute::new();
    let mut logger = route.logger(INIT);

    logger.record_exit_signal(2);
    logger.record_exit_signal(15);
    let segment = logger.segment_path().to_path_buf();
    logger.close().unwrap();

    for frames in [full_log_frames(&segment), quick_log_frames(&segment)] {
        let last = frames.last().unwrap();
        assert_eq!(last.tag, FrameTag::RouteEnd);
        assert_eq!(last.exit_code(), Some(15));
    }
}

#[test]
fn empty_message_is_rejected() {
    let route = TestRoute::new();
    let mut logger = route.logger(INIT);

    let err = logger.write(&[], true).unwrap_err();
    assert!(matches!(err, CoreError::EmptyMessage));
    logger.close().unwrap();
}

#[test]
fn shared_frames_keep_relative_order() {
    let route = TestRoute::new();
    let mut logger = route.logger(INIT);

    let messages: Vec<(Vec<u8>, bool)> = (0u8..20)
        .map(|i| (vec![i; (i as usize % 7) + 1], i % 3 != 0))
        .collect();
    for (payload, to_quick) in &messages {
        logger.write(payload, *to_quick).unwrap();
    }

    let segment = logger.segment_path().to_path_buf();
    logger.close().unwrap();

    let full_data: Vec<Vec<u8>> = full_log_frames(&segment)
        .into_iter()
        .filter(Frame::is_data)
        .skip(1) // init payload
        .map(|f| f.payload)
        .collect();
    let quick_data: Vec<Vec<u8>> = quick_log_frames(&segment)
        .into_iter()
        .filter(Frame::is_data)
        .skip(1)
        .map(|f| f.payload)
        .collect();

    let all: Vec<Vec<u8>> = messages.iter().map(|(p, _)| p.clone()).collect();
    let quick_expected: Vec<Vec<u8>> = messages
        .iter()
        .filter(|(_, q)| *q)
        .map(|(p, _)| p.clone())
        .collect();

    assert_eq!(full_data, all);
    assert_eq!(quick_data, quick_expected);
}

#[test]
fn route_name_includes_identifier_values() {
    let route = TestRoute::new();
    let store = Arc::new(MemoryIdentifierStore::with_values(&[
        ("HardwareSerial", "a1b2c3"),
        ("BuildVersion", "1.4.2"),
    ]));
    let cache = IdentifierCache::new(Arc::clone(&store) as Arc<dyn IdentifierStore>);

    let config = route
        .config()
        .identifier_keys(["HardwareSerial", "BuildVersion"]);
    let logger = RouteLogger::create(config, &cache, INIT.to_vec()).unwrap();

    assert!(logger.route_name().starts_with("a1b2c3-1.4.2--"));
    assert!(logger.route_path().is_dir());
    logger.close().unwrap();
}

#[test]
fn missing_identifier_is_fatal() {
    let route = TestRoute::new();
    let cache = IdentifierCache::new(Arc::new(MemoryIdentifierStore::new()));

    let config = route.config().identifier_keys(["HardwareSerial"]);
    let err = RouteLogger::create(config, &cache, INIT.to_vec()).unwrap_err();
    assert!(matches!(
        err,
        CoreError::MissingIdentifier { key } if key == "HardwareSerial"
    ));
}

#[test]
fn identifier_cache_resolves_each_key_once() {
    let route = TestRoute::new();
    let store = Arc::new(MemoryIdentifierStore::with_values(&[(
        "HardwareSerial",
        "a1b2c3",
    )]));
    let cache = IdentifierCache::new(Arc::clone(&store) as Arc<dyn IdentifierStore>);

    let config = route.config().identifier_keys(["HardwareSerial"]);
    let first = RouteLogger::create(config.clone(), &cache, INIT.to_vec()).unwrap();
    first.close().unwrap();
    let second = RouteLogger::create(config, &cache, INIT.to_vec()).unwrap();
    second.close().unwrap();

    assert_eq!(store.resolve_count(), 1);
}

#[test]
fn fixed_route_name_is_lock_guarded() {
    let route = TestRoute::new();
    let cache = IdentifierCache::new(Arc::new(MemoryIdentifierStore::new()));

    let config = route.config().route_name("pinned-route");
    let first = RouteLogger::create(config.clone(), &cache, INIT.to_vec()).unwrap();

    let err = RouteLogger::create(config, &cache, INIT.to_vec()).unwrap_err();
    assert!(matches!(err, CoreError::RouteLocked));

    first.close().unwrap();
}

#[cfg(unix)]
#[test]
fn failed_advance_invalidates_logger() {
    use std::fs;
    use std::os::unix::fs::PermissionsExt;

    let route = TestRoute::new();
    let mut logger = route.logger(INIT);
    let route_path = logger.route_path().to_path_buf();
    let lock_path = logger.lock_path().to_path_buf();

    // Make the route directory unwritable so the next segment cannot be
    // created.
    fs::set_permissions(&route_path, fs::Permissions::from_mode(0o555)).unwrap();
    let err = logger.advance_segment().unwrap_err();
    assert!(matches!(err, CoreError::Io(_)));

    // The logger is unusable from here on and the lock file remains.
    let err = logger.write(b"late", true).unwrap_err();
    assert!(matches!(err, CoreError::RouteClosed));
    assert!(lock_path.exists());

    fs::set_permissions(&route_path, fs::Permissions::from_mode(0o755)).unwrap();
}

mod properties {
    use super::*;
    use proptest::prelude::*;
    use routelog_testkit::generators::write_sequence;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn all_writes_recoverable_in_order(writes in write_sequence(8)) {
            let route = TestRoute::new();
            let mut logger = route.logger(INIT);
            for (payload, to_quick) in &writes {
                logger.write(payload, *to_quick).unwrap();
            }
            let segment = logger.segment_path().to_path_buf();
            logger.close().unwrap();

            let full_data: Vec<Vec<u8>> = full_log_frames(&segment)
                .into_iter()
                .filter(Frame::is_data)
                .skip(1)
                .map(|f| f.payload)
                .collect();
            let expected: Vec<Vec<u8>> =
                writes.iter().map(|(p, _)| p.clone()).collect();
            prop_assert_eq!(full_data, expected);
        }
    }
}

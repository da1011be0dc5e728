/// End-to-end scanner integration tests.
///
/// These tests exercise the real `ScanWorker` background thread, the `jwalk`
/// enumerator, and the `image`-based PNG transform against a real temporary
/// filesystem, verifying counting, conversion, idempotent re-runs,
/// cancellation, and the event stream the UI consumes.
///
/// Test images are generated on the fly with the `image` crate as PNG bytes
/// under `.webp`/`.jfif` names; the transform sniffs content, not names.
use pngsweep_core::scanner::progress::ScanEvent;
use pngsweep_core::scanner::{ScanHandle, ScanWorker, PROGRESS_CHANNEL_CAPACITY};
use pngsweep_core::transform::{Transform, TransformError};
use pngsweep_core::{
    run_scan, CancellationToken, ChannelSink, PngTransform, RunOutcome,
    ScanError, ScanRequest, ScanState, ScanTuning,
};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

// ── Helpers ──────────────────────────────────────────────────────────────────

/// Write a small RGBA image (half of it transparent) as PNG bytes.
fn write_image(path: &Path) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    let mut img = image::RgbaImage::from_pixel(4, 4, image::Rgba([0, 128, 255, 255]));
    for x in 0..2 {
        for y in 0..4 {
            img.put_pixel(x, y, image::Rgba([0, 0, 0, 0]));
        }
    }
    img.save_with_format(path, image::ImageFormat::Png).unwrap();
}

fn write_bytes(path: &Path, bytes: &[u8]) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, bytes).unwrap();
}

/// Create a reproducible tree:
///
/// ```text
/// root/
///   alpha/
///     one.webp      (image)
///     notes.txt
///   beta/
///     gamma/
///       two.JFIF    (image)
///   three.jif       (image)
///   keep.png
/// ```
fn build_test_tree(root: &Path) {
    write_image(&root.join("alpha/one.webp"));
    write_bytes(&root.join("alpha/notes.txt"), b"hello");
    write_image(&root.join("beta/gamma/two.JFIF"));
    write_image(&root.join("three.jif"));
    write_bytes(&root.join("keep.png"), b"not scanned");
}

fn request(root: &Path) -> ScanRequest {
    ScanRequest::new(root, root.join("converted_png_images"))
}

/// Drain every event of a run, returning them with the final outcome.
///
/// Waits up to 30 seconds, enough for any tmpdir scan on any CI
/// machine but short enough that a genuinely stuck test does not block the
/// suite indefinitely.
fn drain_to_completion(handle: &ScanHandle) -> (Vec<ScanEvent>, RunOutcome) {
    let deadline = std::time::Instant::now() + Duration::from_secs(30);
    let mut events = Vec::new();
    loop {
        assert!(
            std::time::Instant::now() < deadline,
            "scanner did not complete within 30 seconds"
        );
        match handle.events.try_recv() {
            Ok(ScanEvent::Finished(outcome)) => return (events, outcome),
            Ok(event) => events.push(event),
            Err(crossbeam_channel::TryRecvError::Empty) => {
                std::thread::sleep(Duration::from_millis(5));
            }
            Err(crossbeam_channel::TryRecvError::Disconnected) => {
                panic!("scanner channel disconnected before Finished was sent");
            }
        }
    }
}

/// Transform that blocks each file until the test hands out a permit.
struct GatedTransform {
    permits: crossbeam_channel::Receiver<()>,
    started: crossbeam_channel::Sender<PathBuf>,
    inner: PngTransform,
}

impl Transform for GatedTransform {
    fn convert(&self, source: &Path, dest: &Path) -> Result<(), TransformError> {
        let _ = self.started.send(source.to_path_buf());
        let _ = self.permits.recv_timeout(Duration::from_secs(30));
        self.inner.convert(source, dest)
    }
}

/// Transform that counts calls and writes an empty file.
#[derive(Default)]
struct CountingTransform {
    calls: AtomicUsize,
}

impl Transform for CountingTransform {
    fn convert(&self, _source: &Path, dest: &Path) -> Result<(), TransformError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        fs::write(dest, b"").map_err(|source| TransformError::Write {
            path: dest.to_path_buf(),
            source,
        })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

/// Three matching and two non-matching files: three candidates, three PNGs.
#[test]
fn scan_converts_all_matching_files() {
    let tmp = TempDir::new().unwrap();
    build_test_tree(tmp.path());

    let worker = ScanWorker::new();
    let handle = worker.start(request(tmp.path())).unwrap();
    let (_events, outcome) = drain_to_completion(&handle);

    assert_eq!(outcome.state, ScanState::Finished);
    assert!(outcome.is_complete());
    assert_eq!(outcome.total_candidates, 3);
    assert_eq!(outcome.counters.processed, 3);
    assert_eq!(outcome.counters.converted, 3);
    assert_eq!(outcome.counters.errored, 0);

    let out = tmp.path().join("converted_png_images");
    for name in ["one.png", "two.png", "three.png"] {
        let png = image::open(out.join(name)).unwrap();
        assert!(!png.color().has_alpha(), "{name} must be opaque");
        assert_eq!(png.to_rgb8().get_pixel(0, 0), &image::Rgb([255, 255, 255]));
        assert_eq!(png.to_rgb8().get_pixel(3, 0), &image::Rgb([0, 128, 255]));
    }
    // Originals are kept by default.
    assert!(tmp.path().join("alpha/one.webp").exists());
}

/// Every progress snapshot and the final outcome satisfy
/// `processed == converted + skipped + errored`.
#[test]
fn counters_stay_consistent_in_every_update() {
    let tmp = TempDir::new().unwrap();
    build_test_tree(tmp.path());
    write_bytes(&tmp.path().join("broken.webp"), b"garbage");

    let worker = ScanWorker::new();
    let handle = worker.start(request(tmp.path())).unwrap();
    let (events, outcome) = drain_to_completion(&handle);

    let mut last_processed = 0;
    for event in &events {
        if let ScanEvent::Progress { counters, total } = event {
            assert!(counters.is_consistent(), "inconsistent snapshot {counters:?}");
            assert!(counters.processed <= *total);
            assert!(counters.processed >= last_processed, "counters must not decrease");
            last_processed = counters.processed;
        }
    }
    assert!(outcome.counters.is_consistent());
    assert_eq!(outcome.counters.processed, 4);
    assert_eq!(outcome.counters.errored, 1);
    assert!(!tmp.path().join("converted_png_images/broken.png").exists());
}

/// Running the same request twice converts nothing the second time.
#[test]
fn second_run_only_skips() {
    let tmp = TempDir::new().unwrap();
    build_test_tree(tmp.path());
    let worker = ScanWorker::new();

    let first = worker.start(request(tmp.path())).unwrap().wait().unwrap();
    assert_eq!(first.counters.converted, 3);

    let out = tmp.path().join("converted_png_images/one.png");
    let before = fs::read(&out).unwrap();

    let second = worker.start(request(tmp.path())).unwrap().wait().unwrap();
    assert_eq!(second.counters.converted, 0);
    assert_eq!(second.counters.skipped, second.total_candidates);
    assert_eq!(second.total_candidates, 3);
    assert_eq!(fs::read(&out).unwrap(), before);
}

/// A pre-existing destination is Skipped without invoking the transform.
#[test]
fn existing_destination_is_never_passed_to_transform() {
    let tmp = TempDir::new().unwrap();
    write_image(&tmp.path().join("a.webp"));
    write_image(&tmp.path().join("b.webp"));
    let out = tmp.path().join("converted_png_images");
    write_bytes(&out.join("a.png"), b"user data");

    let transform = Arc::new(CountingTransform::default());
    let worker = ScanWorker::with_transform(transform.clone());
    let outcome = worker.start(request(tmp.path())).unwrap().wait().unwrap();

    assert_eq!(transform.calls.load(Ordering::SeqCst), 1);
    assert_eq!(outcome.counters.skipped, 1);
    assert_eq!(outcome.counters.converted, 1);
    assert_eq!(fs::read(out.join("a.png")).unwrap(), b"user data");
}

/// `delete_originals` removes sources only after a successful conversion.
#[test]
fn delete_originals_removes_converted_sources_only() {
    let tmp = TempDir::new().unwrap();
    write_image(&tmp.path().join("good.webp"));
    write_bytes(&tmp.path().join("bad.webp"), b"garbage");

    let worker = ScanWorker::new();
    let outcome = worker
        .start(request(tmp.path()).with_delete_originals(true))
        .unwrap()
        .wait()
        .unwrap();

    assert_eq!(outcome.counters.converted, 1);
    assert_eq!(outcome.counters.errored, 1);
    assert!(!tmp.path().join("good.webp").exists());
    assert!(tmp.path().join("bad.webp").exists());
    assert!(outcome.summary().ends_with("Originals deleted."));
}

/// Cancelling mid-conversion stops before the next file.
#[test]
fn cancel_during_conversion_stops_after_in_flight_file() {
    let tmp = TempDir::new().unwrap();
    for i in 0..6 {
        write_image(&tmp.path().join(format!("img{i}.webp")));
    }

    let (permit_tx, permit_rx) = crossbeam_channel::unbounded();
    let (started_tx, started_rx) = crossbeam_channel::unbounded();
    let worker = ScanWorker::with_transform(Arc::new(GatedTransform {
        permits: permit_rx,
        started: started_tx,
        inner: PngTransform,
    }));
    let handle = worker.start(request(tmp.path())).unwrap();

    // Let two files through, then cancel while the third is in flight.
    for _ in 0..2 {
        started_rx.recv_timeout(Duration::from_secs(30)).unwrap();
        permit_tx.send(()).unwrap();
    }
    started_rx.recv_timeout(Duration::from_secs(30)).unwrap();
    handle.cancel();
    permit_tx.send(()).unwrap();

    let (_events, outcome) = drain_to_completion(&handle);
    assert_eq!(outcome.state, ScanState::Stopped);
    assert!(outcome.stopped_early);
    assert_eq!(outcome.counters.processed, 3);
    assert_eq!(outcome.counters.converted, 3);
    assert!(started_rx.try_recv().is_err(), "no file may start after cancel");

    let written = fs::read_dir(tmp.path().join("converted_png_images"))
        .unwrap()
        .count();
    assert_eq!(written, 3);
}

/// A stop observed while counting ends the run in Stopped without ever
/// entering Converting, even when the pruned walk yields nothing.
#[test]
fn stop_during_counting_ends_stopped() {
    let tmp = TempDir::new().unwrap();
    for i in 0..5 {
        write_image(&tmp.path().join(format!("d{i}/img{i}.webp")));
    }

    let (tx, rx) = crossbeam_channel::unbounded();
    let sink = ChannelSink::new(tx);
    let req = request(tmp.path()).prepare().unwrap();
    let token = CancellationToken::new();
    token.request_stop();

    let outcome = run_scan(&req, &token, &sink, &PngTransform, &ScanTuning::default());

    assert_eq!(outcome.state, ScanState::Stopped);
    assert!(outcome.stopped_early);
    assert!(!outcome.nothing_to_do());
    assert_eq!(outcome.counters.processed, 0);
    assert!(outcome.summary().starts_with("--- Scan Stopped"));

    let events: Vec<ScanEvent> = rx.try_iter().collect();
    assert!(!events
        .iter()
        .any(|e| matches!(e, ScanEvent::Phase(ScanState::Converting))));
    assert!(matches!(events.last(), Some(ScanEvent::Finished(o)) if o.state == ScanState::Stopped));
    assert_eq!(
        fs::read_dir(tmp.path().join("converted_png_images")).unwrap().count(),
        0
    );
}

/// A second start while a run is active is rejected, not queued.
#[test]
fn concurrent_start_is_rejected() {
    let tmp = TempDir::new().unwrap();
    write_image(&tmp.path().join("slow.webp"));

    let (permit_tx, permit_rx) = crossbeam_channel::unbounded();
    let (started_tx, started_rx) = crossbeam_channel::unbounded();
    let worker = ScanWorker::with_transform(Arc::new(GatedTransform {
        permits: permit_rx,
        started: started_tx,
        inner: PngTransform,
    }));

    let handle = worker.start(request(tmp.path())).unwrap();
    started_rx.recv_timeout(Duration::from_secs(30)).unwrap();
    assert!(worker.is_running());
    assert!(matches!(
        worker.start(request(tmp.path())),
        Err(ScanError::AlreadyRunning)
    ));

    permit_tx.send(()).unwrap();
    let (_events, outcome) = drain_to_completion(&handle);
    assert_eq!(outcome.counters.converted, 1);
    assert!(!worker.is_running());
}

/// Configuration errors are reported before any thread is spawned.
#[test]
fn invalid_request_is_rejected_up_front() {
    let tmp = TempDir::new().unwrap();
    let worker = ScanWorker::new();

    let missing = worker.start(request(&tmp.path().join("missing")));
    assert!(matches!(missing, Err(ScanError::Config(_))));

    let no_ext = worker.start(request(tmp.path()).with_extensions(Vec::<&str>::new()));
    assert!(matches!(no_ext, Err(ScanError::Config(_))));

    // A rejected request leaves the worker free.
    assert!(!worker.is_running());
}

/// An empty tree finishes without entering the Converting phase.
#[test]
fn empty_tree_skips_converting_phase() {
    let tmp = TempDir::new().unwrap();
    write_bytes(&tmp.path().join("readme.txt"), b"nothing to see");

    let worker = ScanWorker::new();
    let handle = worker.start(request(tmp.path())).unwrap();
    let (events, outcome) = drain_to_completion(&handle);

    assert!(outcome.nothing_to_do());
    let phases: Vec<ScanState> = events
        .iter()
        .filter_map(|e| match e {
            ScanEvent::Phase(state) => Some(*state),
            _ => None,
        })
        .collect();
    assert_eq!(phases, vec![ScanState::Counting, ScanState::Finished]);
}

/// Status lines are throttled; numeric progress is reported for every file.
#[test]
fn status_line_is_throttled_but_progress_is_not() {
    let tmp = TempDir::new().unwrap();
    for i in 0..7 {
        write_bytes(&tmp.path().join(format!("f{i}.webp")), b"x");
    }

    let (tx, rx) = crossbeam_channel::unbounded();
    let sink = ChannelSink::new(tx);
    let req = request(tmp.path()).prepare().unwrap();
    let tuning = ScanTuning {
        status_every_files: 3,
        ..ScanTuning::default()
    };
    let outcome = run_scan(
        &req,
        &CancellationToken::new(),
        &sink,
        &CountingTransform::default(),
        &tuning,
    );
    assert_eq!(outcome.counters.converted, 7);

    let events: Vec<ScanEvent> = rx.try_iter().collect();
    let per_file = events
        .iter()
        .filter(|e| matches!(e, ScanEvent::Progress { counters, .. } if counters.processed > 0))
        .count();
    let processing: Vec<&String> = events
        .iter()
        .filter_map(|e| match e {
            ScanEvent::Status(s) if s.starts_with("Processing") => Some(s),
            _ => None,
        })
        .collect();
    assert_eq!(per_file, 7);
    // 3, 6, and the final 7.
    assert_eq!(processing, ["Processing: 3 / 7", "Processing: 6 / 7", "Processing: 7 / 7"]);
    assert!(matches!(events.last(), Some(ScanEvent::Finished(_))));
}

/// Output PNGs written in a first run are not rediscovered, even with
/// `.png` in the extension set.
#[test]
fn nested_output_folder_is_not_reprocessed() {
    let tmp = TempDir::new().unwrap();
    write_image(&tmp.path().join("pic.webp"));
    let req = request(tmp.path()).with_extensions([".webp", ".png"]);

    let worker = ScanWorker::new();
    let first = worker.start(req.clone()).unwrap().wait().unwrap();
    assert_eq!(first.total_candidates, 1);
    let second = worker.start(req).unwrap().wait().unwrap();
    assert_eq!(second.total_candidates, 1);
    assert_eq!(second.counters.skipped, 1);
}

/// `PROGRESS_CHANNEL_CAPACITY` must be a positive constant so it is never
/// accidentally set to 0 (which would make every `send()` block immediately).
const _: () = assert!(
    PROGRESS_CHANNEL_CAPACITY > 0,
    "PROGRESS_CHANNEL_CAPACITY must be > 0"
);

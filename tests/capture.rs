mod common;

use camwatch::camera::capture_loop::CaptureLoop;
use camwatch::core::frame_buffer::FrameBuffer;
use common::FlakyDevice;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

fn blue(buffer: &FrameBuffer) -> Option<u8> {
    buffer.read().map(|frame| frame.data()[0])
}

#[test]
fn failed_reads_are_skipped_and_capture_keeps_publishing() {
    let closes = Arc::new(AtomicUsize::new(0));
    let device = FlakyDevice::new(Arc::clone(&closes));
    let successes = Arc::clone(&device.successes);
    let failures = Arc::clone(&device.failures);
    let buffer = Arc::new(FrameBuffer::new());
    let running = Arc::new(AtomicBool::new(true));

    let capture = CaptureLoop::new(1, Box::new(device), Arc::clone(&buffer), 100, Arc::clone(&running));
    let worker = thread::spawn(move || capture.run());

    thread::sleep(Duration::from_millis(200));
    let earlier = blue(&buffer);
    assert!(earlier.is_some());
    assert!(failures.load(Ordering::SeqCst) > 0);

    thread::sleep(Duration::from_millis(200));
    assert!(!worker.is_finished(), "capture stopped on a read failure");
    let later = blue(&buffer);
    assert!(later.is_some());
    assert_ne!(earlier, later, "no new frames after failed reads");
    // Only successful reads, which land on odd call numbers, are published.
    assert_eq!(later.map(|b| b % 2), Some(1));

    running.store(false, Ordering::Release);
    let published = worker.join().unwrap();

    assert_eq!(published, successes.load(Ordering::SeqCst) as u64);
    assert!(failures.load(Ordering::SeqCst) as u64 >= published);
    assert_eq!(closes.load(Ordering::SeqCst), 1);
}

#[test]
fn capture_returns_only_after_release() {
    let closes = Arc::new(AtomicUsize::new(0));
    let buffer = Arc::new(FrameBuffer::new());
    let running = Arc::new(AtomicBool::new(true));
    let capture = CaptureLoop::new(
        2,
        Box::new(FlakyDevice::new(Arc::clone(&closes))),
        Arc::clone(&buffer),
        50,
        Arc::clone(&running),
    );
    let worker = thread::spawn(move || capture.run());

    thread::sleep(Duration::from_millis(300));
    assert!(!worker.is_finished());
    assert_eq!(closes.load(Ordering::SeqCst), 0);

    running.store(false, Ordering::Release);
    worker.join().unwrap();
    assert_eq!(closes.load(Ordering::SeqCst), 1);
    assert!(buffer.has_frame());
}

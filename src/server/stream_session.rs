//! Multipart JPEG stream for one connected client.
//!
//! The stream is infinite and only ends when the HTTP layer drops it, which
//! happens when the client disconnects.

use crate::core::frame::Frame;
use crate::core::frame_buffer::FrameSource;
use crate::core::pacing::period_for_fps;
use crate::errors::AppError;
use axum::body::Bytes;
use futures::stream::{self, Stream};
use log::debug;
use std::convert::Infallible;
use std::sync::Arc;
use tokio::time::{interval, Interval, MissedTickBehavior};

pub const BOUNDARY: &str = "frame";
pub const MULTIPART_CONTENT_TYPE: &str = "multipart/x-mixed-replace; boundary=frame";

pub struct StreamSession {
    source: Arc<dyn FrameSource>,
    fps: u32,
    jpeg_quality: u8,
}

impl StreamSession {
    pub fn new(source: Arc<dyn FrameSource>, fps: u32, jpeg_quality: u8) -> Self {
        StreamSession {
            source,
            fps,
            jpeg_quality,
        }
    }

    /// One multipart chunk per tick that has a frame. Ticks without a frame,
    /// or whose frame fails to encode, emit nothing.
    pub fn into_stream(self) -> impl Stream<Item = Result<Bytes, Infallible>> + Send + 'static {
        let mut ticker: Interval = interval(period_for_fps(self.fps));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        stream::unfold((self, ticker), |(session, mut ticker)| async move {
            loop {
                ticker.tick().await;
                let Some(frame) = session.source.latest() else {
                    continue;
                };
                match encode_chunk(&frame, session.jpeg_quality) {
                    Ok(chunk) => return Some((Ok(chunk), (session, ticker))),
                    Err(e) => debug!("Skipping stream tick, encode failed: {}", e),
                }
            }
        })
    }
}

/// `--frame`, part header, blank line, JPEG bytes, trailing CRLF.
pub fn encode_chunk(frame: &Frame, jpeg_quality: u8) -> Result<Bytes, AppError> {
    let jpeg = frame.encode_jpeg(jpeg_quality)?;
    Ok(frame_chunk(&jpeg))
}

pub fn frame_chunk(jpeg: &[u8]) -> Bytes {
    let header = format!("--{}\r\nContent-Type: image/jpeg\r\n\r\n", BOUNDARY);
    let mut chunk = Vec::with_capacity(header.len() + jpeg.len() + 2);
    chunk.extend_from_slice(header.as_bytes());
    chunk.extend_from_slice(jpeg);
    chunk.extend_from_slice(b"\r\n");
    Bytes::from(chunk)
}

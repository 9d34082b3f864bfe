//! Deterministic test-pattern devices, for running the node without
//! hardware.

use crate::core::capture_source::{Device, DeviceProvider};
use crate::core::frame::{Frame, BYTES_PER_PIXEL};
use crate::errors::AppError;
use std::collections::BTreeSet;

const PALETTE: [[u8; 3]; 6] = [
    [200, 60, 40],
    [40, 160, 60],
    [30, 60, 200],
    [20, 180, 200],
    [160, 40, 160],
    [120, 120, 120],
];

/// Serves synthetic devices on a fixed set of indices; every other index
/// fails to open.
#[derive(Debug, Clone)]
pub struct SyntheticDeviceProvider {
    available: BTreeSet<u32>,
}

impl SyntheticDeviceProvider {
    pub fn new(available: impl IntoIterator<Item = u32>) -> Self {
        SyntheticDeviceProvider {
            available: available.into_iter().collect(),
        }
    }
}

impl DeviceProvider for SyntheticDeviceProvider {
    fn open(&self, index: u32) -> Result<Box<dyn Device>, AppError> {
        if !self.available.contains(&index) {
            return Err(AppError::Device {
                index,
                details: "no synthetic device at this index".to_string(),
            });
        }
        Ok(Box::new(SyntheticDevice::new(index)))
    }
}

/// Solid background in a per-index colour with a white bar sweeping across.
#[derive(Debug)]
pub struct SyntheticDevice {
    index: u32,
    width: u32,
    height: u32,
    tick: u64,
    closed: bool,
}

impl SyntheticDevice {
    pub fn new(index: u32) -> Self {
        SyntheticDevice {
            index,
            width: 640,
            height: 480,
            tick: 0,
            closed: false,
        }
    }

    fn render(&self) -> Vec<u8> {
        let background = PALETTE[self.index as usize % PALETTE.len()];
        let bar_width = (self.width / 16).max(1);
        let bar_x = ((self.tick * u64::from(bar_width)) % u64::from(self.width)) as u32;
        let mut data = Vec::with_capacity(self.width as usize * self.height as usize * BYTES_PER_PIXEL);
        for _ in 0..self.height {
            for x in 0..self.width {
                if x >= bar_x && x < bar_x + bar_width {
                    data.extend_from_slice(&[255, 255, 255]);
                } else {
                    data.extend_from_slice(&background);
                }
            }
        }
        data
    }
}

impl Device for SyntheticDevice {
    fn configure(&mut self, width: u32, height: u32, _fps: u32) -> Result<(), AppError> {
        if width == 0 || height == 0 {
            return Err(AppError::Device {
                index: self.index,
                details: format!("invalid resolution {}x{}", width, height),
            });
        }
        self.width = width;
        self.height = height;
        Ok(())
    }

    fn read_frame(&mut self) -> Result<Frame, AppError> {
        if self.closed {
            return Err(AppError::Device {
                index: self.index,
                details: "device is closed".to_string(),
            });
        }
        let frame = Frame::from_bgr(self.width, self.height, self.render())?;
        self.tick += 1;
        Ok(frame)
    }

    fn close(&mut self) {
        self.closed = true;
    }
}

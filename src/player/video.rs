use crossbeam_channel::Receiver;
use std::collections::VecDeque;

use super::decoder::DecodedVideoFrame;

/// Frames later than this behind the clock are dropped (seconds)
const DROP_THRESHOLD: f64 = 0.02;
/// Frames up to this far ahead of the clock are shown (seconds)
const HOLD_THRESHOLD: f64 = 0.02;
/// After a seek, frames this far before the target are skipped (seconds)
const SEEK_TOLERANCE: f64 = 0.5;

/// Buffers decoded frames and picks the one to show for a clock time.
///
/// Frames decoded before the latest seek carry an older serial and are
/// discarded on arrival.
pub struct VideoFrameQueue {
    receiver: Receiver<DecodedVideoFrame>,
    buffer: VecDeque<DecodedVideoFrame>,
    current_frame: Option<DecodedVideoFrame>,
    max_buffer_size: usize,
    serial: u64,
}

impl VideoFrameQueue {
    pub fn new(receiver: Receiver<DecodedVideoFrame>, max_buffer_size: usize) -> Self {
        Self {
            receiver,
            buffer: VecDeque::with_capacity(max_buffer_size),
            current_frame: None,
            max_buffer_size,
            serial: 0,
        }
    }

    fn receive_frames(&mut self) {
        while self.buffer.len() < self.max_buffer_size {
            match self.receiver.try_recv() {
                Ok(frame) if frame.serial < self.serial => {}
                Ok(frame) => self.buffer.push_back(frame),
                Err(_) => break,
            }
        }
    }

    /// Frame to show at `clock_time`, dropping late frames on the way.
    pub fn get_display_frame(&mut self, clock_time: f64) -> Option<&DecodedVideoFrame> {
        self.receive_frames();

        while let Some(frame) = self.buffer.front() {
            if frame.pts < clock_time - DROP_THRESHOLD {
                self.buffer.pop_front();
            } else {
                break;
            }
        }

        if let Some(frame) = self.buffer.front() {
            if frame.pts <= clock_time + HOLD_THRESHOLD {
                self.current_frame = self.buffer.pop_front();
            }
        }

        self.current_frame.as_ref()
    }

    /// The frame last handed out for display
    pub fn current_frame(&self) -> Option<&DecodedVideoFrame> {
        self.current_frame.as_ref()
    }

    /// First frame at or near `seek_target`, ignoring the clock
    pub fn get_first_frame_after_seek(&mut self, seek_target: f64) -> Option<&DecodedVideoFrame> {
        self.receive_frames();

        while let Some(frame) = self.buffer.front() {
            if frame.pts < seek_target - SEEK_TOLERANCE {
                self.buffer.pop_front();
            } else {
                break;
            }
        }

        if self.buffer.front().is_some() {
            self.current_frame = self.buffer.pop_front();
        }

        self.current_frame.as_ref()
    }

    /// Drop everything buffered, including frames still in the channel, and
    /// accept only frames tagged with `serial` or later from now on.
    pub fn flush(&mut self, serial: u64) {
        self.serial = serial;
        self.buffer.clear();
        self.current_frame = None;
        while self.receiver.try_recv().is_ok() {}
    }

    /// True when every received frame has been handed out for display.
    /// The frame on screen does not count.
    pub fn is_drained(&self) -> bool {
        self.buffer.is_empty() && self.receiver.is_empty()
    }
}

use anyhow::{anyhow, Result};
use crossbeam_channel::{Receiver, Sender, TryRecvError, TrySendError};
use ffmpeg_next::format::Pixel;
use ffmpeg_next::frame::{Audio as AudioFrame, Video as VideoFrame};
use ffmpeg_next::media::Type;
use ffmpeg_next::software::resampling::Context as ResamplerContext;
use ffmpeg_next::software::scaling::{Context as ScalerContext, Flags};
use ffmpeg_next::util::channel_layout::ChannelLayout;
use ffmpeg_next::util::format::sample::Sample;
use ffmpeg_next::{codec, Packet, Rational};
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use super::circular_buffer::CircularBuffer;
use super::clock::AudioClock;
use crate::engine::{EngineEvent, MediaInfo};
use crate::error::LoadError;

/// Audio is always resampled to interleaved stereo f32
pub const OUTPUT_CHANNELS: u16 = 2;
/// Clock rate used when the file has no audio stream
const FALLBACK_SAMPLE_RATE: u32 = 44100;

/// A decoded video frame ready for display
pub struct DecodedVideoFrame {
    pub rgba: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub pts: f64, // seconds
    /// Seek generation the frame was decoded in
    pub serial: u64,
}

/// Commands sent to the decoder thread
pub enum DecoderCommand {
    Seek { position: f64, serial: u64 },
    Pause,
    Resume,
    Stop,
}

/// Set by the decoder once every frame of a seek generation has been sent.
#[derive(Clone, Default)]
pub struct EndOfStream(Arc<AtomicU64>);

impl EndOfStream {
    pub fn mark(&self, serial: u64) {
        self.0.store(serial + 1, Ordering::Release);
    }

    pub fn reached(&self, serial: u64) -> bool {
        self.0.load(Ordering::Acquire) == serial + 1
    }
}

/// Open a media file and extract info without starting decoding
pub fn probe_media(path: &Path) -> Result<MediaInfo, LoadError> {
    if !path.exists() {
        return Err(LoadError::NotFound(path.to_path_buf()));
    }
    let unsupported = |reason: String| LoadError::UnsupportedFormat {
        path: path.to_path_buf(),
        reason,
    };

    let input = ffmpeg_next::format::input(&path).map_err(|e| match e {
        ffmpeg_next::Error::InvalidData => unsupported(e.to_string()),
        other => LoadError::Engine(other.to_string()),
    })?;

    let video_stream = input
        .streams()
        .best(Type::Video)
        .ok_or_else(|| unsupported("no video stream found".to_owned()))?;
    let frame_rate = rational_to_f64(video_stream.avg_frame_rate());

    let video_decoder = codec::Context::from_parameters(video_stream.parameters())
        .and_then(|context| context.decoder().video())
        .map_err(|e| unsupported(format!("video decoder: {}", e)))?;
    let codec_name = video_decoder.codec().map(|c| c.name().to_owned());

    let audio = match input.streams().best(Type::Audio) {
        Some(stream) => {
            let decoder = codec::Context::from_parameters(stream.parameters())
                .and_then(|context| context.decoder().audio())
                .map_err(|e| unsupported(format!("audio decoder: {}", e)))?;
            Some((decoder.rate(), decoder.channels() as u16))
        }
        None => None,
    };

    let duration = if input.duration() > 0 {
        input.duration() as f64 / ffmpeg_next::ffi::AV_TIME_BASE as f64
    } else {
        0.0
    };

    Ok(MediaInfo {
        path: path.to_path_buf(),
        width: video_decoder.width(),
        height: video_decoder.height(),
        duration,
        codec: codec_name,
        frame_rate,
        has_audio: audio.is_some(),
        sample_rate: audio.map_or(FALLBACK_SAMPLE_RATE, |(rate, _)| rate),
        channels: audio.map_or(OUTPUT_CHANNELS, |(_, channels)| channels),
    })
}

fn rational_to_f64(rate: Rational) -> Option<f64> {
    if rate.numerator() <= 0 || rate.denominator() <= 0 {
        None
    } else {
        Some(f64::from(rate))
    }
}

/// Start the decoder thread. Decode failures are logged and reported as
/// [`EngineEvent::Error`].
pub fn start_decoder_thread(
    path: &Path,
    video_sender: Sender<DecodedVideoFrame>,
    audio_buffer: Arc<CircularBuffer<f32>>,
    command_receiver: Receiver<DecoderCommand>,
    clock: AudioClock,
    stop_flag: Arc<AtomicBool>,
    end_of_stream: EndOfStream,
    events: Sender<EngineEvent>,
) -> std::io::Result<JoinHandle<()>> {
    let path = path.to_path_buf();

    thread::Builder::new()
        .name("decoder".to_owned())
        .spawn(move || {
            if let Err(e) = decode_loop(
                &path,
                video_sender,
                &audio_buffer,
                command_receiver,
                clock,
                stop_flag,
                end_of_stream,
            ) {
                tracing::error!(path = %path.display(), "decoder error: {:#}", e);
                let _ = events.send(EngineEvent::Error(e.to_string()));
            }
        })
}

/// What the decode loop should do after a command
enum Flow {
    Continue,
    Seek { position: f64, serial: u64 },
    Exit,
}

fn apply_command(command: DecoderCommand, paused: &mut bool, clock: &AudioClock) -> Flow {
    match command {
        DecoderCommand::Stop => Flow::Exit,
        DecoderCommand::Pause => {
            *paused = true;
            clock.pause();
            Flow::Continue
        }
        DecoderCommand::Resume => {
            *paused = false;
            clock.resume();
            Flow::Continue
        }
        DecoderCommand::Seek { position, serial } => Flow::Seek { position, serial },
    }
}

/// Hand a frame to the UI, waiting while the channel is full. Commands keep
/// being served meanwhile; a seek or stop abandons the frame.
fn deliver_frame(
    mut frame: DecodedVideoFrame,
    video_sender: &Sender<DecodedVideoFrame>,
    command_receiver: &Receiver<DecoderCommand>,
    paused: &mut bool,
    clock: &AudioClock,
) -> Flow {
    loop {
        match command_receiver.try_recv() {
            Ok(command) => match apply_command(command, paused, clock) {
                Flow::Continue => {}
                flow => return flow,
            },
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Disconnected) => return Flow::Exit,
        }

        match video_sender.try_send(frame) {
            Ok(()) => return Flow::Continue,
            Err(TrySendError::Full(f)) => {
                frame = f;
                thread::sleep(Duration::from_millis(1));
            }
            Err(TrySendError::Disconnected(_)) => return Flow::Exit,
        }
    }
}

/// Copy `height` rows of `width` RGBA pixels out of a buffer whose rows are
/// `stride` bytes apart.
pub(crate) fn pack_rgba(data: &[u8], stride: usize, width: u32, height: u32) -> Vec<u8> {
    let row = width as usize * 4;
    let height = height as usize;
    if stride == row {
        return data[..row * height].to_vec();
    }
    let mut out = Vec::with_capacity(row * height);
    for y in 0..height {
        let start = y * stride;
        out.extend_from_slice(&data[start..start + row]);
    }
    out
}

fn display_frame(rgba: &VideoFrame, pts: f64, serial: u64) -> DecodedVideoFrame {
    DecodedVideoFrame {
        rgba: pack_rgba(rgba.data(0), rgba.stride(0), rgba.width(), rgba.height()),
        width: rgba.width(),
        height: rgba.height(),
        pts,
        serial,
    }
}

fn decode_loop(
    path: &Path,
    video_sender: Sender<DecodedVideoFrame>,
    audio_buffer: &Arc<CircularBuffer<f32>>,
    command_receiver: Receiver<DecoderCommand>,
    clock: AudioClock,
    stop_flag: Arc<AtomicBool>,
    end_of_stream: EndOfStream,
) -> Result<()> {
    let mut input = ffmpeg_next::format::input(&path)?;

    let video_stream_index = input
        .streams()
        .best(Type::Video)
        .ok_or_else(|| anyhow!("no video stream"))?
        .index();
    let audio_stream_index = input.streams().best(Type::Audio).map(|s| s.index());

    let video_stream = input
        .stream(video_stream_index)
        .ok_or_else(|| anyhow!("video stream {} vanished", video_stream_index))?;
    let video_time_base = video_stream.time_base();
    let video_params = video_stream.parameters();

    let audio_params = match audio_stream_index {
        Some(idx) => Some(
            input
                .stream(idx)
                .ok_or_else(|| anyhow!("audio stream {} vanished", idx))?
                .parameters(),
        ),
        None => None,
    };

    let mut video_decoder = codec::Context::from_parameters(video_params)?
        .decoder()
        .video()?;

    let mut audio_decoder = match audio_params {
        Some(params) => Some(codec::Context::from_parameters(params)?.decoder().audio()?),
        None => None,
    };

    let mut scaler = ScalerContext::get(
        video_decoder.format(),
        video_decoder.width(),
        video_decoder.height(),
        Pixel::RGBA,
        video_decoder.width(),
        video_decoder.height(),
        Flags::BILINEAR,
    )?;

    let mut resampler = match audio_decoder {
        Some(ref decoder) => Some(ResamplerContext::get(
            decoder.format(),
            decoder.channel_layout(),
            decoder.rate(),
            Sample::F32(ffmpeg_next::util::format::sample::Type::Packed),
            ChannelLayout::STEREO,
            clock.sample_rate(),
        )?),
        None => None,
    };

    let mut video_frame = VideoFrame::empty();
    let mut audio_frame = AudioFrame::empty();
    let mut rgba_frame = VideoFrame::empty();

    let mut paused = true;
    let mut pending_seek: Option<(f64, u64)> = None;
    let mut at_eof = false;
    let mut serial = 0;
    // Decode one frame while paused so a seek has something to show
    let mut preview = false;

    loop {
        if stop_flag.load(Ordering::Relaxed) {
            break;
        }

        loop {
            match command_receiver.try_recv() {
                Ok(command) => match apply_command(command, &mut paused, &clock) {
                    Flow::Exit => return Ok(()),
                    Flow::Seek { position, serial } => pending_seek = Some((position, serial)),
                    Flow::Continue => {}
                },
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => return Ok(()),
            }
        }

        if let Some((target, target_serial)) = pending_seek.take() {
            serial = target_serial;
            preview = true;
            let target_ts = (target * ffmpeg_next::ffi::AV_TIME_BASE as f64) as i64;
            match input.seek(target_ts, ..target_ts) {
                Ok(()) => {
                    video_decoder.flush();
                    if let Some(ref mut dec) = audio_decoder {
                        dec.flush();
                    }
                    clock.set_position(target);
                    at_eof = false;
                }
                Err(e) => tracing::warn!(seek_target = target, "seek failed: {}", e),
            }
            if at_eof {
                end_of_stream.mark(serial);
            }
        }

        // Idle until resumed, or until a seek clears EOF
        if (paused && !preview) || at_eof {
            thread::sleep(Duration::from_millis(10));
            continue;
        }

        let mut packet = Packet::empty();
        match packet.read(&mut input) {
            Ok(()) => {
                let stream_index = packet.stream();

                if stream_index == video_stream_index {
                    video_decoder.send_packet(&packet)?;

                    while video_decoder.receive_frame(&mut video_frame).is_ok() {
                        scaler.run(&video_frame, &mut rgba_frame)?;

                        let pts = video_frame.pts().unwrap_or(0) as f64 * f64::from(video_time_base);
                        let frame = display_frame(&rgba_frame, pts, serial);
                        match deliver_frame(frame, &video_sender, &command_receiver, &mut paused, &clock) {
                            Flow::Continue => preview = false,
                            Flow::Seek { position, serial } => {
                                pending_seek = Some((position, serial));
                                break;
                            }
                            Flow::Exit => return Ok(()),
                        }
                    }
                } else if Some(stream_index) == audio_stream_index {
                    if let (Some(decoder), Some(resampler)) =
                        (audio_decoder.as_mut(), resampler.as_mut())
                    {
                        decoder.send_packet(&packet)?;

                        while decoder.receive_frame(&mut audio_frame).is_ok() {
                            let mut resampled = AudioFrame::empty();
                            if resampler.run(&audio_frame, &mut resampled).is_ok() {
                                let count = resampled.samples() * OUTPUT_CHANNELS as usize;
                                let data = resampled.data(0);
                                let bytes = &data[..(count * 4).min(data.len())];
                                let samples: Vec<f32> = bytes
                                    .chunks_exact(4)
                                    .map(|b| f32::from_ne_bytes([b[0], b[1], b[2], b[3]]))
                                    .collect();

                                // Never blocks; overwrites oldest samples when full
                                audio_buffer.push_slice(&samples);
                            }
                        }
                    }
                }
            }
            Err(ffmpeg_next::Error::Eof) => {
                // Drain frames still held by the decoder before reporting the end
                video_decoder.send_eof()?;
                while video_decoder.receive_frame(&mut video_frame).is_ok() {
                    scaler.run(&video_frame, &mut rgba_frame)?;
                    let pts = video_frame.pts().unwrap_or(0) as f64 * f64::from(video_time_base);
                    let frame = display_frame(&rgba_frame, pts, serial);
                    match deliver_frame(frame, &video_sender, &command_receiver, &mut paused, &clock) {
                        Flow::Continue => preview = false,
                        Flow::Seek { position, serial } => {
                            pending_seek = Some((position, serial));
                            break;
                        }
                        Flow::Exit => return Ok(()),
                    }
                }
                at_eof = true;
                if pending_seek.is_none() {
                    tracing::debug!(serial, "decoder reached end of stream");
                    end_of_stream.mark(serial);
                }
            }
            Err(e) => {
                tracing::trace!("skipping unreadable packet: {}", e);
            }
        }
    }

    Ok(())
}

//! FFmpeg + rodio implementation of [`MediaEngine`].

mod audio;
mod circular_buffer;
mod clock;
mod decoder;
mod video;

use crossbeam_channel::{bounded, Sender};
use egui::{ColorImage, Context, TextureHandle, TextureOptions};
use rodio::{OutputStream, OutputStreamHandle, Sink};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

use crate::engine::{EngineEvent, MediaEngine, MediaInfo, Snapshot};
use crate::error::LoadError;
use audio::AudioSource;
use circular_buffer::CircularBuffer;
use clock::AudioClock;
use decoder::{probe_media, start_decoder_thread, DecoderCommand, EndOfStream, OUTPUT_CHANNELS};
use video::VideoFrameQueue;

/// Frames buffered between the decoder and the UI
const FRAME_QUEUE_SIZE: usize = 30;

#[derive(Clone, Copy, PartialEq, Debug)]
enum PlayerState {
    Stopped,
    Playing,
    Paused,
}

/// One opened media file: decoder thread, audio sink and frame texture.
struct VideoPlayer {
    state: PlayerState,
    seeking: bool,
    seek_target: f64,
    /// Bumped on every seek; frames from older seeks are discarded
    serial: u64,
    /// Playback ran to the end; the next play starts over
    ended: bool,
    end_of_stream: EndOfStream,
    info: MediaInfo,
    events: Sender<EngineEvent>,

    // Threading
    decoder_handle: Option<JoinHandle<()>>,
    command_sender: Sender<DecoderCommand>,
    stop_flag: Arc<AtomicBool>,

    // Audio
    _output_stream: OutputStream,
    _stream_handle: OutputStreamHandle,
    sink: Sink,
    clock: AudioClock,

    // Video
    frame_queue: VideoFrameQueue,
    texture: TextureHandle,
}

impl VideoPlayer {
    /// Open a video file, paused on its first frame
    fn open(
        path: &Path,
        ctx: &Context,
        events: Sender<EngineEvent>,
        volume: f32,
    ) -> Result<Self, LoadError> {
        let info = probe_media(path)?;

        let clock = AudioClock::new(info.sample_rate, OUTPUT_CHANNELS);

        let (output_stream, stream_handle) = OutputStream::try_default()
            .map_err(|e| LoadError::Engine(format!("audio output: {}", e)))?;
        let sink = Sink::try_new(&stream_handle)
            .map_err(|e| LoadError::Engine(format!("audio sink: {}", e)))?;
        sink.set_volume(volume);

        // About one second of audio
        let buffer_size = info.sample_rate as usize * OUTPUT_CHANNELS as usize * 2;
        let audio_buffer = CircularBuffer::new(buffer_size);

        sink.append(AudioSource::new(
            audio_buffer.clone(),
            clock.clone(),
            info.has_audio,
        ));
        sink.pause();

        let (video_sender, video_receiver) = bounded(FRAME_QUEUE_SIZE);
        let frame_queue = VideoFrameQueue::new(video_receiver, FRAME_QUEUE_SIZE);

        let (command_sender, command_receiver) = bounded(16);

        let stop_flag = Arc::new(AtomicBool::new(false));
        let end_of_stream = EndOfStream::default();
        let decoder_handle = start_decoder_thread(
            path,
            video_sender,
            audio_buffer,
            command_receiver,
            clock.clone(),
            stop_flag.clone(),
            end_of_stream.clone(),
            events.clone(),
        )
        .map_err(|e| LoadError::Engine(format!("decoder thread: {}", e)))?;

        let texture = ctx.load_texture(
            "video_frame",
            ColorImage::new(
                [info.width as usize, info.height as usize],
                egui::Color32::BLACK,
            ),
            TextureOptions::LINEAR,
        );

        let mut player = Self {
            state: PlayerState::Stopped,
            seeking: false,
            seek_target: 0.0,
            serial: 0,
            ended: false,
            end_of_stream,
            info,
            events,
            decoder_handle: Some(decoder_handle),
            command_sender,
            stop_flag,
            _output_stream: output_stream,
            _stream_handle: stream_handle,
            sink,
            clock,
            frame_queue,
            texture,
        };

        // The paused decoder produces the first frame after a seek
        player.seek(0.0);

        Ok(player)
    }

    fn emit(&self, event: EngineEvent) {
        let _ = self.events.send(event);
    }

    fn play(&mut self) {
        if self.state == PlayerState::Playing {
            return;
        }
        if self.ended {
            self.seek(0.0);
        }
        self.state = PlayerState::Playing;
        // A pending seek resumes the sink once its first frame is shown
        if !self.seeking {
            self.sink.play();
        }
        let _ = self.command_sender.send(DecoderCommand::Resume);
        self.emit(EngineEvent::Playing);
    }

    fn pause(&mut self) {
        if self.state == PlayerState::Playing {
            self.state = PlayerState::Paused;
            self.sink.pause();
            let _ = self.command_sender.send(DecoderCommand::Pause);
            self.emit(EngineEvent::Paused);
        }
    }

    /// Stop playback and seek to beginning
    fn stop(&mut self) {
        self.state = PlayerState::Stopped;
        self.sink.pause();
        let _ = self.command_sender.send(DecoderCommand::Pause);
        self.seek(0.0);
        self.emit(EngineEvent::Stopped);
    }

    fn seek(&mut self, position: f64) {
        let position = clamp_position(position, self.info.duration);
        self.serial += 1;
        self.seeking = true;
        self.ended = false;
        self.seek_target = position;
        // Audio pauses during the seek so the clock holds still
        self.sink.pause();
        self.frame_queue.flush(self.serial);
        self.clock.set_position(position);
        let _ = self.command_sender.send(DecoderCommand::Seek {
            position,
            serial: self.serial,
        });
    }

    fn show(texture: &mut TextureHandle, rgba: &[u8], width: u32, height: u32) {
        let image = ColorImage::from_rgba_unmultiplied([width as usize, height as usize], rgba);
        texture.set(image, TextureOptions::LINEAR);
    }

    /// Push the frame due now to the texture (call each UI frame)
    fn update(&mut self, ctx: &Context) {
        if self.seeking {
            if let Some(frame) = self.frame_queue.get_first_frame_after_seek(self.seek_target) {
                Self::show(&mut self.texture, &frame.rgba, frame.width, frame.height);
                self.clock.set_position(frame.pts);
                self.seeking = false;
            } else if self.end_of_stream.reached(self.serial) && self.frame_queue.is_drained() {
                // Seeked past the last frame
                self.seeking = false;
            } else {
                ctx.request_repaint();
                return;
            }
            if self.state == PlayerState::Playing {
                self.sink.play();
            }
        }

        if self.state != PlayerState::Playing {
            return;
        }

        let clock_time = self.clock.position();

        if let Some(frame) = self.frame_queue.get_display_frame(clock_time) {
            Self::show(&mut self.texture, &frame.rgba, frame.width, frame.height);
        }

        if self.end_of_stream.reached(self.serial) && self.frame_queue.is_drained() {
            self.state = PlayerState::Stopped;
            self.ended = true;
            self.sink.pause();
            let _ = self.command_sender.send(DecoderCommand::Pause);
            tracing::debug!(path = %self.info.path.display(), "end of stream");
            self.emit(EngineEvent::EndReached);
            return;
        }

        ctx.request_repaint();
    }

    fn position(&self) -> f64 {
        if self.seeking {
            self.seek_target
        } else {
            self.clock.position()
        }
    }

    fn snapshot(&self) -> Option<Snapshot> {
        self.frame_queue.current_frame().map(|frame| Snapshot {
            rgba: frame.rgba.clone(),
            width: frame.width,
            height: frame.height,
            pts: frame.pts,
        })
    }
}

/// Keep a seek target inside the media. The upper bound only applies when the
/// duration is known.
fn clamp_position(position: f64, duration: f64) -> f64 {
    if duration > 0.0 {
        position.clamp(0.0, duration)
    } else {
        position.max(0.0)
    }
}

impl Drop for VideoPlayer {
    fn drop(&mut self) {
        self.stop_flag.store(true, Ordering::Relaxed);
        let _ = self.command_sender.send(DecoderCommand::Stop);

        if let Some(handle) = self.decoder_handle.take() {
            if handle.join().is_err() {
                tracing::error!("decoder thread panicked");
            }
        }
    }
}

/// The window's player handle. Lives as long as the window and swaps the
/// opened [`VideoPlayer`] on every successful load.
pub struct FfmpegEngine {
    ctx: Context,
    events: Sender<EngineEvent>,
    volume: f32,
    current: Option<VideoPlayer>,
}

impl FfmpegEngine {
    pub fn new(ctx: Context, events: Sender<EngineEvent>) -> Self {
        Self {
            ctx,
            events,
            volume: 1.0,
            current: None,
        }
    }

    /// Advance playback and upload the due frame (call each UI frame)
    pub fn update(&mut self) {
        if let Some(player) = self.current.as_mut() {
            player.update(&self.ctx);
        }
    }

    pub fn texture(&self) -> Option<&TextureHandle> {
        self.current.as_ref().map(|p| &p.texture)
    }

    pub fn video_size(&self) -> Option<(u32, u32)> {
        self.current.as_ref().map(|p| (p.info.width, p.info.height))
    }

    pub fn is_seeking(&self) -> bool {
        self.current.as_ref().is_some_and(|p| p.seeking)
    }
}

impl MediaEngine for FfmpegEngine {
    fn load_paused(&mut self, path: &Path) -> Result<MediaInfo, LoadError> {
        let player = VideoPlayer::open(path, &self.ctx, self.events.clone(), self.volume)?;
        let info = player.info.clone();
        tracing::info!(
            path = %path.display(),
            width = info.width,
            height = info.height,
            duration = info.duration,
            "media loaded"
        );
        // Dropping the previous player joins its decoder thread
        self.current = Some(player);
        Ok(info)
    }

    fn play(&mut self) {
        if let Some(player) = self.current.as_mut() {
            player.play();
        }
    }

    fn pause(&mut self) {
        if let Some(player) = self.current.as_mut() {
            player.pause();
        }
    }

    fn stop(&mut self) {
        if let Some(player) = self.current.as_mut() {
            player.stop();
        }
    }

    fn is_playing(&self) -> bool {
        self.current
            .as_ref()
            .is_some_and(|p| p.state == PlayerState::Playing)
    }

    fn seek(&mut self, seconds: f64) {
        if let Some(player) = self.current.as_mut() {
            player.seek(seconds);
        }
    }

    fn position(&self) -> f64 {
        self.current.as_ref().map_or(0.0, VideoPlayer::position)
    }

    fn duration(&self) -> f64 {
        self.current.as_ref().map_or(0.0, |p| p.info.duration)
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
        if let Some(player) = self.current.as_ref() {
            player.sink.set_volume(self.volume);
        }
    }

    fn volume(&self) -> f32 {
        self.volume
    }

    fn snapshot(&self) -> Option<Snapshot> {
        self.current.as_ref().and_then(VideoPlayer::snapshot)
    }

    fn release(&mut self) {
        if self.current.take().is_some() {
            tracing::debug!("media engine released");
        }
    }
}

//! Background music on a loop.
//!
//! The track is read into memory once. Playback goes through a rodio `Sink`
//! on the mixer thread; the frame loop polls `keep_playing()` every tick and,
//! when the sink has drained, decodes the same bytes again and appends them.
//! The restart is not sample-accurate: a tick-sized gap at the loop point is
//! expected.
//!
//! Every failure here is a warning. The caller logs it and runs silent.

use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use rodio::decoder::DecoderError;
use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink, StreamError};

/// Mixing rate requested from the output device.
pub const MIX_SAMPLE_RATE: u32 = 48_000;

#[derive(Debug, thiserror::Error)]
pub enum AudioWarning {
    #[error("failed to load music {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode music {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: DecoderError,
    },
    #[error("failed to create audio player: {0}")]
    Output(#[from] StreamError),
}

/// An encoded track held in memory, known to decode.
#[derive(Clone)]
pub struct Track {
    path: PathBuf,
    bytes: Arc<[u8]>,
}

impl Track {
    pub fn load(path: &Path) -> Result<Self, AudioWarning> {
        let bytes = fs::read(path).map_err(|source| AudioWarning::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let track = Self {
            path: path.to_path_buf(),
            bytes: Arc::from(bytes),
        };
        // Probe once so format errors surface before any device is opened.
        track.decode()?;
        Ok(track)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn decode(&self) -> Result<Decoder<Cursor<Arc<[u8]>>>, AudioWarning> {
        Decoder::new(Cursor::new(Arc::clone(&self.bytes))).map_err(|source| {
            AudioWarning::Decode {
                path: self.path.clone(),
                source,
            }
        })
    }
}

pub struct MusicLoop {
    _stream: OutputStream,
    sink: Sink,
    track: Track,
    restarts: u32,
}

impl MusicLoop {
    pub fn open(path: &Path) -> Result<Self, AudioWarning> {
        let track = Track::load(path)?;
        Self::start(track)
    }

    pub fn start(track: Track) -> Result<Self, AudioWarning> {
        let stream = open_output()?;
        let sink = Sink::connect_new(stream.mixer());
        sink.append(track.decode()?);
        log::info!("Playing music {}", track.path().display());
        Ok(Self {
            _stream: stream,
            sink,
            track,
            restarts: 0,
        })
    }

    /// Re-queues the track once the previous play-through has drained.
    /// Returns true when a restart happened.
    pub fn keep_playing(&mut self) -> bool {
        if !self.sink.empty() {
            return false;
        }
        match self.track.decode() {
            Ok(source) => {
                self.sink.append(source);
                self.restarts += 1;
                log::debug!(
                    "Music {} looped ({} restarts)",
                    self.track.path().display(),
                    self.restarts
                );
                true
            }
            Err(err) => {
                log::warn!("{err}");
                false
            }
        }
    }

    pub fn is_playing(&self) -> bool {
        !self.sink.empty() && !self.sink.is_paused()
    }

    pub fn restarts(&self) -> u32 {
        self.restarts
    }
}

fn open_output() -> Result<OutputStream, StreamError> {
    let preferred = OutputStreamBuilder::from_default_device()
        .and_then(|builder| builder.with_sample_rate(MIX_SAMPLE_RATE).open_stream());
    match preferred {
        Ok(stream) => Ok(stream),
        Err(err) => {
            log::debug!("{MIX_SAMPLE_RATE} Hz output unavailable ({err}), using device default");
            OutputStreamBuilder::open_default_stream()
        }
    }
}

/// One-line audio state for overlays and logs.
pub fn status_label(music: Option<&MusicLoop>) -> String {
    match music {
        Some(music) if music.is_playing() => {
            format!("Audio: playing (looped {}x)", music.restarts())
        }
        Some(_) => "Audio: idle".to_string(),
        None => "Audio: disabled".to_string(),
    }
}

//! Completion chime synthesis and the lazily acquired audio output

use std::f32::consts::PI;
use std::fmt;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Sample rate the chime is rendered at
pub const SAMPLE_RATE: u32 = 44_100;

/// Gain at the start of each note
const PEAK_GAIN: f32 = 0.1;
/// Gain each note decays to by the end of its duration
const FLOOR_GAIN: f32 = 0.001;

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("built without audio support")]
    Unsupported,
    #[error("no audio output device: {0}")]
    Device(String),
    #[error("playback failed: {0}")]
    Playback(String),
}

/// One sine tone of the chime
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Note {
    pub frequency: f32,
    /// Start offset from the beginning of the chime, in seconds
    pub offset: f32,
    /// Time for the gain to fall from peak to floor, in seconds
    pub duration: f32,
}

impl Note {
    const fn new(frequency: f32, offset: f32, duration: f32) -> Self {
        Self {
            frequency,
            offset,
            duration,
        }
    }

    /// Exponential envelope `t` seconds after the note starts
    pub fn gain_at(&self, t: f32) -> f32 {
        if t < 0.0 || t > self.duration {
            return 0.0;
        }
        PEAK_GAIN * (FLOOR_GAIN / PEAK_GAIN).powf(t / self.duration)
    }

    fn end(&self) -> f32 {
        self.offset + self.duration
    }
}

/// C major seventh, each note staggered by 100 ms
const COMPLETION_NOTES: [Note; 4] = [
    Note::new(523.25, 0.0, 1.5),
    Note::new(659.25, 0.1, 1.5),
    Note::new(783.99, 0.2, 1.5),
    Note::new(987.77, 0.3, 2.0),
];

/// A chord of overlapping, decaying tones
#[derive(Debug, Clone, PartialEq)]
pub struct Chime {
    notes: Vec<Note>,
}

impl Chime {
    pub fn new(notes: Vec<Note>) -> Self {
        Self { notes }
    }

    /// The chord played when a session finishes
    pub fn completion() -> Self {
        Self::new(COMPLETION_NOTES.to_vec())
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    /// Length of the whole chime in seconds
    pub fn duration(&self) -> f32 {
        self.notes.iter().map(Note::end).fold(0.0, f32::max)
    }

    /// Mix all notes into a mono buffer
    pub fn samples(&self, sample_rate: u32) -> Vec<f32> {
        let rate = sample_rate as f32;
        let len = (self.duration() * rate).ceil() as usize;
        let mut buffer = vec![0.0f32; len];

        for note in &self.notes {
            let first = (note.offset * rate).round() as usize;
            let last = ((note.end() * rate).round() as usize).min(len);
            for (i, sample) in buffer.iter_mut().enumerate().take(last).skip(first) {
                let t = i as f32 / rate - note.offset;
                *sample += (2.0 * PI * note.frequency * t).sin() * note.gain_at(t);
            }
        }

        buffer
    }
}

/// Something that can play a chime
pub trait AudioOutput {
    /// Make sure playback is not suspended
    fn resume(&mut self) -> Result<(), AudioError> {
        Ok(())
    }

    fn play(&mut self, chime: &Chime) -> Result<(), AudioError>;
}

/// Opens the audio output; run at most once
pub type AudioProbe = Box<dyn FnOnce() -> Result<Box<dyn AudioOutput>, AudioError>>;

enum SlotState {
    Unprobed(AudioProbe),
    Ready(Box<dyn AudioOutput>),
    Unavailable,
}

/// Audio output acquired on first use and kept for the process lifetime
pub struct AudioSlot {
    state: SlotState,
}

impl AudioSlot {
    pub fn new(probe: AudioProbe) -> Self {
        Self {
            state: SlotState::Unprobed(probe),
        }
    }

    pub fn unavailable() -> Self {
        Self {
            state: SlotState::Unavailable,
        }
    }

    /// Probe the output if that has not happened yet
    ///
    /// A failed probe is logged and remembered; the slot then stays silent.
    pub fn acquire(&mut self) -> Option<&mut dyn AudioOutput> {
        if matches!(self.state, SlotState::Unprobed(_)) {
            let state = std::mem::replace(&mut self.state, SlotState::Unavailable);
            if let SlotState::Unprobed(probe) = state {
                self.state = match probe() {
                    Ok(output) => {
                        info!("Audio output acquired");
                        SlotState::Ready(output)
                    }
                    Err(e) => {
                        warn!("Audio unavailable, chime disabled: {}", e);
                        SlotState::Unavailable
                    }
                };
            }
        }
        self.get()
    }

    /// The output, if it has been acquired successfully
    pub fn get(&mut self) -> Option<&mut dyn AudioOutput> {
        match &mut self.state {
            SlotState::Ready(output) => Some(output.as_mut()),
            _ => None,
        }
    }

    pub fn is_probed(&self) -> bool {
        !matches!(self.state, SlotState::Unprobed(_))
    }
}

impl fmt::Debug for AudioSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match self.state {
            SlotState::Unprobed(_) => "unprobed",
            SlotState::Ready(_) => "ready",
            SlotState::Unavailable => "unavailable",
        };
        f.debug_struct("AudioSlot").field("state", &state).finish()
    }
}

/// Audio slot for the system's default output device
pub fn system_audio(muted: bool) -> AudioSlot {
    if muted {
        debug!("Audio muted, chime disabled");
        return AudioSlot::unavailable();
    }
    AudioSlot::new(device_probe())
}

#[cfg(feature = "audio")]
fn device_probe() -> AudioProbe {
    Box::new(|| device::RodioOutput::open().map(|output| Box::new(output) as Box<dyn AudioOutput>))
}

#[cfg(not(feature = "audio"))]
fn device_probe() -> AudioProbe {
    Box::new(|| Err(AudioError::Unsupported))
}

#[cfg(feature = "audio")]
mod device {
    use rodio::{buffer::SamplesBuffer, OutputStream, Sink};

    use super::{AudioError, AudioOutput, Chime, SAMPLE_RATE};

    /// Default output device; the stream must outlive the sink
    pub struct RodioOutput {
        _stream: OutputStream,
        sink: Sink,
    }

    impl RodioOutput {
        pub fn open() -> Result<Self, AudioError> {
            let (stream, handle) =
                OutputStream::try_default().map_err(|e| AudioError::Device(e.to_string()))?;
            let sink = Sink::try_new(&handle).map_err(|e| AudioError::Device(e.to_string()))?;
            Ok(Self {
                _stream: stream,
                sink,
            })
        }
    }

    impl AudioOutput for RodioOutput {
        fn resume(&mut self) -> Result<(), AudioError> {
            if self.sink.is_paused() {
                self.sink.play();
            }
            Ok(())
        }

        fn play(&mut self, chime: &Chime) -> Result<(), AudioError> {
            let samples = chime.samples(SAMPLE_RATE);
            if samples.is_empty() {
                return Err(AudioError::Playback("empty chime".to_string()));
            }
            self.sink.append(SamplesBuffer::new(1, SAMPLE_RATE, samples));
            Ok(())
        }
    }
}

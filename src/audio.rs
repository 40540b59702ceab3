//! Sound effects
//!
//! Every cue is synthesized on the fly from a few short tones, so the game
//! needs no audio assets. Without an output device the game simply stays
//! silent.

use rodio::{OutputStream, OutputStreamHandle, Sink, Source};
use std::time::Duration;

const SAMPLE_RATE: u32 = 44_100;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sfx {
    Start,
    Pause,
    Resume,
    Rotate,
    HardDrop,
    ClearSweep,
    ClearSweepTetris,
    LineDone,
    TetrisDone,
    GameOver,
}

/// Oscillator shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Triangle,
    Square,
    Sawtooth,
}

impl Waveform {
    /// Sample at `phase` in 0.0..1.0
    fn sample(self, phase: f32) -> f32 {
        match self {
            Waveform::Sine => (phase * std::f32::consts::TAU).sin(),
            Waveform::Triangle => 1.0 - 4.0 * (phase - 0.5).abs(),
            Waveform::Square => {
                if phase < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
            Waveform::Sawtooth => 2.0 * phase - 1.0,
        }
    }
}

/// One beep
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub waveform: Waveform,
    pub freq: f32,
    /// Frequency reached by the end of the tone
    pub slide_to: Option<f32>,
    pub duration: Duration,
    pub volume: f32,
    /// Start offset from the moment the cue fires
    pub delay: Duration,
}

impl Tone {
    const fn new(waveform: Waveform, freq: f32, duration_ms: u64) -> Self {
        Self {
            waveform,
            freq,
            slide_to: None,
            duration: Duration::from_millis(duration_ms),
            volume: 0.05,
            delay: Duration::ZERO,
        }
    }

    const fn slide(mut self, to: f32) -> Self {
        self.slide_to = Some(to);
        self
    }

    const fn volume(mut self, volume: f32) -> Self {
        self.volume = volume;
        self
    }

    const fn after(mut self, delay_ms: u64) -> Self {
        self.delay = Duration::from_millis(delay_ms);
        self
    }
}

impl Sfx {
    /// The tones making up this cue
    pub fn tones(&self) -> Vec<Tone> {
        use Waveform::*;
        match self {
            Sfx::Start => vec![
                Tone::new(Triangle, 440.0, 60),
                Tone::new(Triangle, 660.0, 80).after(50),
            ],
            Sfx::Pause => vec![Tone::new(Sine, 220.0, 80)],
            Sfx::Resume => vec![Tone::new(Sine, 440.0, 80)],
            Sfx::Rotate => vec![Tone::new(Square, 700.0, 40).volume(0.04)],
            Sfx::HardDrop => vec![Tone::new(Sawtooth, 200.0, 40).slide(120.0)],
            Sfx::ClearSweep => vec![Tone::new(Sine, 900.0, 180).slide(300.0).volume(0.06)],
            Sfx::ClearSweepTetris => {
                vec![Tone::new(Sine, 1100.0, 220).slide(260.0).volume(0.08)]
            }
            Sfx::LineDone => vec![Tone::new(Triangle, 520.0, 90)],
            Sfx::TetrisDone => vec![
                Tone::new(Triangle, 520.0, 60),
                Tone::new(Triangle, 660.0, 60).after(70),
                Tone::new(Triangle, 800.0, 80).after(140),
            ],
            Sfx::GameOver => vec![
                Tone::new(Sine, 300.0, 200),
                Tone::new(Sine, 180.0, 250).after(150),
            ],
        }
    }
}

/// Mono source rendering a single tone with an exponential fade-out
#[derive(Debug, Clone)]
pub struct ToneSource {
    tone: Tone,
    index: u32,
    total: u32,
    phase: f32,
}

impl ToneSource {
    pub fn new(tone: Tone) -> Self {
        let total = (tone.duration.as_secs_f32() * SAMPLE_RATE as f32).round() as u32;
        Self {
            tone,
            index: 0,
            total,
            phase: 0.0,
        }
    }
}

impl Iterator for ToneSource {
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        if self.index >= self.total {
            return None;
        }
        let t = self.index as f32 / self.total.max(1) as f32;
        let freq = match self.tone.slide_to {
            Some(to) => self.tone.freq + (to - self.tone.freq) * t,
            None => self.tone.freq,
        };
        // Fade from full volume down to -80dB
        let gain = self.tone.volume * 0.0001f32.powf(t);
        let sample = self.tone.waveform.sample(self.phase) * gain;

        self.phase = (self.phase + freq / SAMPLE_RATE as f32).fract();
        self.index += 1;
        Some(sample)
    }
}

impl Source for ToneSource {
    fn current_frame_len(&self) -> Option<usize> {
        Some((self.total - self.index) as usize)
    }

    fn channels(&self) -> u16 {
        1
    }

    fn sample_rate(&self) -> u32 {
        SAMPLE_RATE
    }

    fn total_duration(&self) -> Option<Duration> {
        Some(self.tone.duration)
    }
}

/// Audio manager handles all sound playback
pub struct AudioManager {
    _stream: OutputStream,
    stream_handle: OutputStreamHandle,
    sfx_volume: f32,
}

impl AudioManager {
    /// Open the default output device
    pub fn new() -> Option<Self> {
        let (stream, stream_handle) = match OutputStream::try_default() {
            Ok(pair) => pair,
            Err(e) => {
                tracing::warn!("no audio output, playing silently: {}", e);
                return None;
            }
        };

        Some(Self {
            _stream: stream,
            stream_handle,
            sfx_volume: 0.5,
        })
    }

    /// Set SFX volume (0.0 to 1.0)
    pub fn set_sfx_volume(&mut self, volume: f32) {
        self.sfx_volume = volume.clamp(0.0, 1.0);
    }

    /// Fire a sound effect and forget about it
    pub fn play_sfx(&mut self, sfx: Sfx) {
        if self.sfx_volume <= 0.0 {
            return;
        }

        for tone in sfx.tones() {
            let Ok(sink) = Sink::try_new(&self.stream_handle) else {
                return;
            };
            sink.set_volume(self.sfx_volume);
            sink.append(ToneSource::new(tone).delay(tone.delay));
            sink.detach(); // Let it play and clean up automatically
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_cue_has_tones() {
        let all = [
            Sfx::Start,
            Sfx::Pause,
            Sfx::Resume,
            Sfx::Rotate,
            Sfx::HardDrop,
            Sfx::ClearSweep,
            Sfx::ClearSweepTetris,
            Sfx::LineDone,
            Sfx::TetrisDone,
            Sfx::GameOver,
        ];
        for sfx in all {
            assert!(!sfx.tones().is_empty(), "{:?}", sfx);
        }
        assert_eq!(Sfx::TetrisDone.tones().len(), 3);
    }

    #[test]
    fn test_tone_length_matches_duration() {
        let tone = Tone::new(Waveform::Sine, 440.0, 100);
        let samples = ToneSource::new(tone).count();
        assert_eq!(samples, 4410);
    }

    #[test]
    fn test_tone_fades_and_stays_in_range() {
        let tone = Tone::new(Waveform::Square, 700.0, 40).volume(0.04);
        let samples: Vec<f32> = ToneSource::new(tone).collect();
        assert!(samples.iter().all(|s| s.abs() <= 0.04 + f32::EPSILON));
        assert!(samples.last().unwrap().abs() < 0.001);
    }

    #[test]
    fn test_waveforms_span_unit_range() {
        for waveform in [
            Waveform::Sine,
            Waveform::Triangle,
            Waveform::Square,
            Waveform::Sawtooth,
        ] {
            for step in 0..100 {
                let value = waveform.sample(step as f32 / 100.0);
                assert!((-1.0..=1.0).contains(&value), "{:?}", waveform);
            }
        }
    }
}

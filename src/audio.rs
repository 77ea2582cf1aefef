//! Line-clear sound: a short synthesized bell played through rodio.
//!
//! Audio is strictly best-effort. No output device, a dead stream, or --mute
//! all degrade to the cue silently not firing; the game never notices.

use rodio::{OutputStream, OutputStreamHandle, Sink, Source};
use std::f32::consts::TAU;
use std::time::Duration;

const SAMPLE_RATE: u32 = 22_050;
/// Bell length in seconds.
const BELL_SECS: f32 = 0.3;
/// Bell partials: frequency (Hz) and amplitude. A5 plus two overtones.
const PARTIALS: [(f32, f32); 3] = [(880.0, 0.3), (1320.0, 0.2), (1760.0, 0.1)];

/// Mono source synthesizing the bell on the fly: three sine partials under a
/// linear decay envelope.
#[derive(Debug, Clone)]
pub struct Bell {
    frame: u32,
    total_frames: u32,
}

impl Bell {
    pub fn new() -> Self {
        Self {
            frame: 0,
            total_frames: (SAMPLE_RATE as f32 * BELL_SECS) as u32,
        }
    }
}

impl Default for Bell {
    fn default() -> Self {
        Self::new()
    }
}

impl Iterator for Bell {
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        if self.frame >= self.total_frames {
            return None;
        }
        let t = self.frame as f32 / SAMPLE_RATE as f32;
        let envelope = (1.0 - t / BELL_SECS).max(0.0);
        let sample: f32 = PARTIALS
            .iter()
            .map(|&(freq, amp)| (TAU * freq * t).sin() * amp)
            .sum();
        self.frame += 1;
        Some(sample * envelope)
    }
}

impl Source for Bell {
    fn current_frame_len(&self) -> Option<usize> {
        None
    }

    fn channels(&self) -> u16 {
        1
    }

    fn sample_rate(&self) -> u32 {
        SAMPLE_RATE
    }

    fn total_duration(&self) -> Option<Duration> {
        Some(Duration::from_secs_f32(BELL_SECS))
    }
}

/// Sound output handle. Holds the stream for the process lifetime; dropping
/// an `OutputStream` kills its sinks.
pub struct Sfx {
    output: Option<(OutputStream, OutputStreamHandle)>,
}

impl Sfx {
    pub fn new(mute: bool) -> Self {
        let output = if mute {
            None
        } else {
            OutputStream::try_default().ok()
        };
        Self { output }
    }

    /// Fire the line-clear bell. No-op when muted or without a device.
    pub fn play_line_clear(&self) {
        let Some((_, handle)) = &self.output else {
            return;
        };
        let Ok(sink) = Sink::try_new(handle) else {
            return;
        };
        sink.append(Bell::new());
        sink.detach();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bell_has_the_expected_length() {
        let samples: Vec<f32> = Bell::new().collect();
        assert_eq!(samples.len(), (22_050.0_f32 * 0.3) as usize);
    }

    #[test]
    fn bell_starts_at_zero_and_stays_bounded() {
        let samples: Vec<f32> = Bell::new().collect();
        assert!(samples[0].abs() < 1e-6);
        assert!(samples.iter().all(|s| s.abs() <= 0.6));
    }

    #[test]
    fn bell_decays_towards_silence() {
        let samples: Vec<f32> = Bell::new().collect();
        let peak_early = samples[..1000].iter().fold(0.0f32, |m, s| m.max(s.abs()));
        let peak_late = samples[samples.len() - 500..]
            .iter()
            .fold(0.0f32, |m, s| m.max(s.abs()));
        assert!(peak_late < peak_early / 4.0);
    }

    #[test]
    fn muted_sfx_never_opens_a_stream() {
        let sfx = Sfx::new(true);
        assert!(sfx.output.is_none());
        sfx.play_line_clear();
    }
}

//! Per-voice tone generation
//!
//! Each voice handles the complete synthesis pipeline for one tone:
//! 1. Oscillator — sine/square/sawtooth at an optionally swept frequency
//! 2. Envelope — fast linear attack, exponential decay to near-silence
//! 3. Self-termination — the voice deactivates itself at its duration
//!
//! A voice never needs cleanup by the caller; the mixer drops inactive
//! voices after every sample. This is the engine's resource-lifetime
//! guarantee: spamming cues cannot leak generators.

/// Sample rate for audio output
pub const SAMPLE_RATE: u32 = 44100;

/// Linear attack length: 0 to peak over 10ms
const ATTACK_SECS: f32 = 0.01;

/// Exponential decay target. The envelope is audibly silent here; the
/// voice cuts off entirely at its duration.
const DECAY_FLOOR: f32 = 0.001;

/// Oscillator shape for a voice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Square,
    Sawtooth,
}

impl Waveform {
    /// Sample the waveform at a phase in [0, 1). Output is in [-1, 1].
    fn sample(self, phase: f32) -> f32 {
        match self {
            Waveform::Sine => (phase * std::f32::consts::TAU).sin(),
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

/// One self-terminating synthesized tone.
#[derive(Debug, Clone)]
pub struct Voice {
    waveform: Waveform,
    /// Frequency at the start of the voice (Hz)
    start_frequency: f32,
    /// Frequency at the end of the voice; differing from the start
    /// produces an exponential sweep across the full duration
    end_frequency: f32,
    /// Envelope peak level reached at the end of the attack
    peak: f32,
    /// Attack length in samples (clamped to the duration)
    attack_samples: u32,
    /// Total voice length in samples; the voice deactivates here
    duration_samples: u32,
    /// Oscillator phase in [0, 1)
    phase: f32,
    /// Samples rendered so far
    age: u32,
    active: bool,
}

impl Voice {
    /// A steady tone at one frequency.
    pub fn new(waveform: Waveform, frequency: f32, peak: f32, duration: f32) -> Self {
        Self::sweep(waveform, frequency, frequency, peak, duration)
    }

    /// A tone sweeping exponentially from `start_frequency` to
    /// `end_frequency` over its duration.
    pub fn sweep(
        waveform: Waveform,
        start_frequency: f32,
        end_frequency: f32,
        peak: f32,
        duration: f32,
    ) -> Self {
        let duration_samples = ((duration * SAMPLE_RATE as f32) as u32).max(1);
        let attack_samples = ((ATTACK_SECS * SAMPLE_RATE as f32) as u32).min(duration_samples);
        Self {
            waveform,
            start_frequency,
            end_frequency,
            peak,
            attack_samples,
            duration_samples,
            phase: 0.0,
            age: 0,
            active: true,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Samples rendered so far (the mixer steals the oldest voice when
    /// it runs out of slots).
    pub fn age(&self) -> u32 {
        self.age
    }

    /// Render one sample at 44100Hz.
    ///
    /// Pipeline per sample:
    /// 1. Sample the oscillator at the current phase
    /// 2. Apply the envelope level
    /// 3. Advance the phase at the instantaneous (swept) frequency
    /// 4. Age the voice, deactivating past the duration
    pub fn tick(&mut self) -> f32 {
        if !self.active {
            return 0.0;
        }

        let sample = self.waveform.sample(self.phase) * self.envelope();

        let t = self.age as f32 / SAMPLE_RATE as f32;
        self.phase = (self.phase + self.frequency_at(t) / SAMPLE_RATE as f32).fract();

        self.age += 1;
        if self.age >= self.duration_samples {
            self.active = false;
        }

        sample
    }

    /// Instantaneous frequency `t` seconds into the voice.
    ///
    /// Sweeps follow an exponential ramp (equal musical intervals per
    /// unit time), the same curve the envelope decay uses.
    fn frequency_at(&self, t: f32) -> f32 {
        if self.start_frequency == self.end_frequency {
            return self.start_frequency;
        }
        let duration = self.duration_samples as f32 / SAMPLE_RATE as f32;
        let progress = (t / duration).clamp(0.0, 1.0);
        self.start_frequency * (self.end_frequency / self.start_frequency).powf(progress)
    }

    /// Envelope level at the current age: linear 0→peak over the attack,
    /// then exponential peak→`DECAY_FLOOR` at the duration.
    fn envelope(&self) -> f32 {
        if self.age < self.attack_samples {
            return self.peak * self.age as f32 / self.attack_samples as f32;
        }
        if self.duration_samples <= self.attack_samples || self.peak <= DECAY_FLOOR {
            return self.peak;
        }
        let decay_len = (self.duration_samples - self.attack_samples) as f32;
        let progress = (self.age - self.attack_samples) as f32 / decay_len;
        self.peak * (DECAY_FLOOR / self.peak).powf(progress)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attack_reaches_peak_at_10ms() {
        let mut voice = Voice::new(Waveform::Square, 440.0, 0.3, 0.1);

        // First sample is the very bottom of the attack ramp
        assert_eq!(voice.tick(), 0.0);

        // Step to the end of the attack: envelope at peak
        for _ in 1..441 {
            voice.tick();
        }
        assert!((voice.envelope() - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_decay_is_near_silent_at_duration() {
        let mut voice = Voice::new(Waveform::Square, 440.0, 0.3, 0.1);
        let total = (0.1 * SAMPLE_RATE as f32) as u32;

        for _ in 0..total - 1 {
            voice.tick();
        }
        assert!(voice.is_active());
        assert!(voice.envelope() < 0.002, "decay should approach the floor");
    }

    #[test]
    fn test_voice_self_terminates() {
        let mut voice = Voice::new(Waveform::Sine, 440.0, 0.3, 0.05);
        let total = (0.05 * SAMPLE_RATE as f32) as u32;

        for _ in 0..total {
            voice.tick();
        }
        assert!(!voice.is_active());
        assert_eq!(voice.tick(), 0.0, "dead voices render silence");
    }

    #[test]
    fn test_sweep_endpoints() {
        let voice = Voice::sweep(Waveform::Sawtooth, 880.0, 110.0, 0.2, 0.1);
        assert!((voice.frequency_at(0.0) - 880.0).abs() < 1e-3);
        assert!((voice.frequency_at(0.1) - 110.0).abs() < 1e-2);

        // Exponential, not linear: the halfway point is the geometric mean
        let mid = voice.frequency_at(0.05);
        let geometric_mean = (880.0f32 * 110.0).sqrt();
        assert!((mid - geometric_mean).abs() < 1.0);
    }

    #[test]
    fn test_steady_voice_holds_frequency() {
        let voice = Voice::new(Waveform::Sine, 440.0, 0.3, 0.1);
        assert_eq!(voice.frequency_at(0.0), 440.0);
        assert_eq!(voice.frequency_at(0.05), 440.0);
    }

    #[test]
    fn test_waveform_shapes() {
        assert_eq!(Waveform::Square.sample(0.25), 1.0);
        assert_eq!(Waveform::Square.sample(0.75), -1.0);
        assert_eq!(Waveform::Sawtooth.sample(0.0), -1.0);
        assert_eq!(Waveform::Sawtooth.sample(0.5), 0.0);
        assert!(Waveform::Sine.sample(0.0).abs() < 1e-6);
        assert!((Waveform::Sine.sample(0.25) - 1.0).abs() < 1e-6);
    }
}

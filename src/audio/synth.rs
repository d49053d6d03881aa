//! Chiptune synthesis core
//!
//! Software mixer driven from the audio callback. Provides:
//! - Voice mixing under a single master gain stage
//! - Sample-accurate note scheduling on a monotonic sample clock
//! - The looping two-voice background ostinato with cooperative
//!   cancellation
//!
//! The main entry point is `SynthCore::render()`, which fills stereo
//! buffers one sample pair at a time. Everything here is plain state;
//! sharing with the callback thread is the engine wrapper's concern.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::voice::{Voice, Waveform, SAMPLE_RATE};

/// Simultaneous voice cap. When full, the oldest voice is stolen; this
/// bounds memory no matter how fast cues arrive.
pub const MAX_VOICES: usize = 64;

/// Default length of a scheduled note
const NOTE_DURATION: f32 = 0.1;

/// Envelope peak for plain notes
const NOTE_PEAK: f32 = 0.3;

// =============================================================================
// Background music — a fixed two-voice ostinato
// =============================================================================

/// Bassline semitone offsets, one note per 200ms
const BASSLINE: [i32; 8] = [0, 0, 7, 7, 3, 3, 5, 5];
const BASSLINE_SPACING: f32 = 0.2;

/// Melody semitone offsets layered 800ms into each cycle, one per 150ms
const MELODY: [i32; 8] = [12, 15, 19, 24, 19, 15, 12, 7];
const MELODY_SPACING: f32 = 0.15;
const MELODY_DELAY: f32 = 0.8;

/// Full cycle length
const MUSIC_CYCLE: f32 = 3.2;

/// A note waiting for the clock to reach its start
struct ScheduledVoice {
    start_at: u64,
    voice: Voice,
}

/// The repeating background loop. Cancellation is cooperative: the flag
/// is checked at cycle boundaries, and notes already scheduled finish
/// naturally.
struct MusicLoop {
    next_cycle_at: u64,
    cancelled: Arc<AtomicBool>,
}

/// Mixer, scheduler, and music sequencer.
pub struct SynthCore {
    /// Monotonic sample clock; all scheduling is absolute against this
    clock: u64,
    /// Live voices, mixed every sample
    voices: Vec<Voice>,
    /// Scheduled notes not yet started
    pending: Vec<ScheduledVoice>,
    /// Tuning reference for semitone offset 0
    base_frequency: f32,
    /// Output attenuation applied to the summed mix
    master_gain: f32,
    /// Active background loop, if any
    music: Option<MusicLoop>,
}

impl SynthCore {
    pub fn new(base_frequency: f32, master_gain: f32) -> Self {
        Self {
            clock: 0,
            voices: Vec::new(),
            pending: Vec::new(),
            base_frequency,
            master_gain,
            music: None,
        }
    }

    /// Frequency of a note `semitones` above (or below) the tuning
    /// reference: `base * 2^(semitones/12)`.
    pub fn note_frequency(&self, semitones: i32) -> f32 {
        self.base_frequency * (2.0f32).powf(semitones as f32 / 12.0)
    }

    // =========================================================================
    // Scheduling — called with the state locked, never blocking on audio
    // =========================================================================

    /// Start a voice `delay` seconds from now.
    pub fn schedule_voice(&mut self, delay: f32, voice: Voice) {
        let start_at = self.clock + (delay * SAMPLE_RATE as f32) as u64;
        self.pending.push(ScheduledVoice { start_at, voice });
    }

    /// Start a voice immediately.
    pub fn play_voice(&mut self, voice: Voice) {
        self.schedule_voice(0.0, voice);
    }

    /// Play a square-wave note at a semitone offset from the tuning
    /// reference.
    pub fn play_note(&mut self, semitones: i32, duration: f32) {
        let frequency = self.note_frequency(semitones);
        self.play_voice(Voice::new(Waveform::Square, frequency, NOTE_PEAK, duration));
    }

    /// Schedule a note sequence with fixed inter-note spacing, the first
    /// note `delay` seconds from now. Notes are scheduled in sequence
    /// order and execute asynchronously to the caller.
    pub fn schedule_arpeggio(&mut self, notes: &[i32], spacing: f32, delay: f32) {
        for (index, &semitones) in notes.iter().enumerate() {
            let frequency = self.note_frequency(semitones);
            self.schedule_voice(
                delay + index as f32 * spacing,
                Voice::new(Waveform::Square, frequency, NOTE_PEAK, NOTE_DURATION),
            );
        }
    }

    /// Schedule a note sequence starting now.
    pub fn play_arpeggio(&mut self, notes: &[i32], spacing: f32) {
        self.schedule_arpeggio(notes, spacing, 0.0);
    }

    /// Start (or replace) the background loop. The first cycle begins one
    /// full period after the call.
    ///
    /// Returns the cancellation flag; setting it stops the loop at the
    /// next cycle boundary. Starting a new loop orphans the previous
    /// flag.
    pub fn start_music(&mut self) -> Arc<AtomicBool> {
        let cancelled = Arc::new(AtomicBool::new(false));
        self.music = Some(MusicLoop {
            next_cycle_at: self.clock + (MUSIC_CYCLE * SAMPLE_RATE as f32) as u64,
            cancelled: Arc::clone(&cancelled),
        });
        cancelled
    }

    /// Number of currently sounding voices
    pub fn voice_count(&self) -> usize {
        self.voices.len()
    }

    /// Whether a background loop is live (cancelled loops unregister at
    /// the next rendered sample)
    pub fn music_playing(&self) -> bool {
        self.music.is_some()
    }

    // =========================================================================
    // Rendering — called from the audio callback
    // =========================================================================

    /// Fill stereo buffers with the mixed output.
    ///
    /// Per sample pair:
    /// 1. Run the music sequencer (schedules each due cycle's notes)
    /// 2. Activate pending notes whose start time has arrived
    /// 3. Tick and sum all voices, dropping the ones that ended
    /// 4. Apply master gain and clamp
    pub fn render(&mut self, left: &mut [f32], right: &mut [f32]) {
        let len = left.len().min(right.len());

        for i in 0..len {
            self.sequence_music();
            self.activate_due_voices();

            let mut mix = 0.0f32;
            for voice in &mut self.voices {
                mix += voice.tick();
            }
            self.voices.retain(|v| v.is_active());

            let sample = (mix * self.master_gain).clamp(-1.0, 1.0);
            left[i] = sample;
            right[i] = sample;

            self.clock += 1;
        }
    }

    /// Schedule the next music cycle when its boundary passes, or drop a
    /// cancelled loop.
    fn sequence_music(&mut self) {
        let due = match &self.music {
            None => return,
            Some(music) if music.cancelled.load(Ordering::Relaxed) => {
                self.music = None;
                return;
            }
            Some(music) => self.clock >= music.next_cycle_at,
        };
        if !due {
            return;
        }

        self.schedule_arpeggio(&BASSLINE, BASSLINE_SPACING, 0.0);
        self.schedule_arpeggio(&MELODY, MELODY_SPACING, MELODY_DELAY);

        if let Some(music) = &mut self.music {
            music.next_cycle_at += (MUSIC_CYCLE * SAMPLE_RATE as f32) as u64;
        }
    }

    /// Move pending notes whose start time has arrived into the live set.
    fn activate_due_voices(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        let clock = self.clock;
        let mut index = 0;
        while index < self.pending.len() {
            if self.pending[index].start_at <= clock {
                let scheduled = self.pending.swap_remove(index);
                self.add_voice(scheduled.voice);
            } else {
                index += 1;
            }
        }
    }

    /// Add a voice, stealing the oldest one at the cap.
    fn add_voice(&mut self, voice: Voice) {
        if self.voices.len() >= MAX_VOICES {
            if let Some(oldest) = (0..self.voices.len()).max_by_key(|&i| self.voices[i].age()) {
                let _ = self.voices.swap_remove(oldest);
            }
        }
        self.voices.push(voice);
    }
}

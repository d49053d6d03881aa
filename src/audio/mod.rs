//! Audio Engine
//!
//! Procedural chiptune audio with no external assets. Every sound is a
//! short synthesized voice or a scheduled sequence of them:
//! - `voice` — oscillator + envelope for one self-terminating tone
//! - `synth` — mixer, sample-accurate scheduler, background-music loop
//! - this module — the `AudioEngine` wrapper owning the cpal stream and
//!   the fire-and-forget cue API
//!
//! The engine is an explicitly owned value: construct it once at startup,
//! drop it at shutdown. Construction is best-effort — with no output
//! device available every cue becomes a silent no-op and gameplay
//! continues (the failure is reported to stderr, never propagated).

pub mod synth;
pub mod voice;

pub use synth::{SynthCore, MAX_VOICES};
pub use voice::{Voice, Waveform, SAMPLE_RATE};

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{SampleRate, Stream, StreamConfig};

use crate::config::GameConfig;

/// Battle fanfare: a rise-and-fall major arpeggio
const BATTLE_START_NOTES: [i32; 7] = [0, 4, 7, 12, 7, 4, 0];
const BATTLE_START_SPACING: f32 = 0.08;

/// Cancellation handle for the background-music loop.
///
/// The loop plays until the handle is stopped or dropped; keep it alive
/// for as long as the music should run. Cancellation is cooperative: the
/// current cycle's notes finish, no new cycle starts.
pub struct MusicHandle {
    cancelled: Arc<AtomicBool>,
}

impl MusicHandle {
    pub fn stop(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_stopped(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

impl Drop for MusicHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

/// The audio engine: synthesis state shared with the output stream, plus
/// the cue API the game calls.
///
/// All cues are fire-and-forget: no return value, no blocking, no
/// cleanup. Voices self-terminate inside the mixer.
pub struct AudioEngine {
    /// Shared synthesis state (locked briefly by cues and the callback)
    state: Arc<Mutex<SynthCore>>,
    /// The output stream, kept alive for the engine's lifetime
    _stream: Option<Stream>,
}

impl AudioEngine {
    /// Create the engine and start the output stream.
    ///
    /// With no usable output device the engine still works — it just
    /// renders to nowhere.
    pub fn new(config: &GameConfig) -> Self {
        let state = Arc::new(Mutex::new(SynthCore::new(
            config.base_frequency,
            config.master_gain,
        )));

        let stream = init_audio_stream(Arc::clone(&state));
        if stream.is_none() {
            eprintln!("Audio output unavailable, continuing in silence");
        }

        Self {
            state,
            _stream: stream,
        }
    }

    /// Whether an output stream was acquired
    pub fn has_output(&self) -> bool {
        self._stream.is_some()
    }

    // =========================================================================
    // Cues
    // =========================================================================

    /// Play a note at a semitone offset from the tuning reference.
    pub fn play_note(&self, semitones: i32, duration: f32) {
        self.state.lock().unwrap().play_note(semitones, duration);
    }

    /// Play a note sequence with fixed inter-note spacing.
    pub fn play_arpeggio(&self, notes: &[i32], spacing: f32) {
        self.state.lock().unwrap().play_arpeggio(notes, spacing);
    }

    /// Item pickup: a sine chirp rising an octave.
    pub fn play_collect(&self) {
        self.state.lock().unwrap().play_voice(Voice::sweep(
            Waveform::Sine,
            880.0,
            1760.0,
            0.2,
            0.1,
        ));
    }

    /// Projectile launch: a sawtooth diving three octaves.
    pub fn play_shoot(&self) {
        self.state.lock().unwrap().play_voice(Voice::sweep(
            Waveform::Sawtooth,
            880.0,
            110.0,
            0.2,
            0.1,
        ));
    }

    /// Enemy destroyed: a square-wave rise, longer and louder than the
    /// rest.
    pub fn play_enemy_hit(&self) {
        self.state.lock().unwrap().play_voice(Voice::sweep(
            Waveform::Square,
            220.0,
            440.0,
            0.3,
            0.2,
        ));
    }

    /// Battle encounter fanfare.
    pub fn play_battle_start(&self) {
        self.play_arpeggio(&BATTLE_START_NOTES, BATTLE_START_SPACING);
    }

    /// Start the background ostinato loop.
    ///
    /// Restarting while a loop is live replaces it; the old handle's stop
    /// becomes a no-op.
    pub fn start_background_music(&self) -> MusicHandle {
        let cancelled = self.state.lock().unwrap().start_music();
        MusicHandle { cancelled }
    }
}

// =============================================================================
// Output stream setup
// =============================================================================

/// Build and start the output stream, rendering the shared synth state.
/// Any failure along the way (no host device, unsupported config, stream
/// refused) yields `None` and the engine stays silent.
fn init_audio_stream(state: Arc<Mutex<SynthCore>>) -> Option<Stream> {
    let host = cpal::default_host();
    let device = host.default_output_device()?;

    let config = StreamConfig {
        channels: 2,
        sample_rate: SampleRate(SAMPLE_RATE),
        buffer_size: cpal::BufferSize::Default,
    };

    let mut left_buffer = vec![0.0f32; 1024];
    let mut right_buffer = vec![0.0f32; 1024];

    let stream = device
        .build_output_stream(
            &config,
            move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                let mut synth = state.lock().unwrap();

                let samples_needed = data.len() / 2;
                if left_buffer.len() < samples_needed {
                    left_buffer.resize(samples_needed, 0.0);
                    right_buffer.resize(samples_needed, 0.0);
                }

                synth.render(
                    &mut left_buffer[..samples_needed],
                    &mut right_buffer[..samples_needed],
                );

                for i in 0..samples_needed {
                    data[i * 2] = left_buffer[i];
                    data[i * 2 + 1] = right_buffer[i];
                }
            },
            |err| eprintln!("Audio stream error: {}", err),
            None,
        )
        .ok()?;

    stream.play().ok()?;
    Some(stream)
}

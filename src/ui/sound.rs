/// Sound cues: short procedural tones via rodio.
///
/// All sounds are generated as in-memory WAV buffers at init time.
/// Playback is fire-and-forget (non-blocking) via rodio's Sink.
///
/// Compile without the "sound" feature to disable audio entirely
/// (the stub SoundEngine does nothing).

use crate::domain::matching::Outcome;
use crate::sim::event::GameEvent;

#[cfg(feature = "sound")]
mod inner {
    use std::io::Cursor;
    use std::sync::Arc;

    use rodio::{OutputStream, OutputStreamHandle, Sink};

    const SAMPLE_RATE: u32 = 22050;
    const TAU: f32 = std::f32::consts::PI * 2.0;

    pub struct SoundEngine {
        _stream: OutputStream,
        handle: OutputStreamHandle,
        sfx_roll: Arc<Vec<u8>>,
        sfx_correct: Arc<Vec<u8>>,
        sfx_incorrect: Arc<Vec<u8>>,
        sfx_bingo: Arc<Vec<u8>>,
    }

    impl SoundEngine {
        pub fn new() -> Option<Self> {
            let (stream, handle) = OutputStream::try_default().ok()?;
            Some(SoundEngine {
                _stream: stream,
                handle,
                sfx_roll: Arc::new(make_wav(&gen_roll())),
                sfx_correct: Arc::new(make_wav(&gen_notes(&[1047.0, 1319.0], 0.05))),
                sfx_incorrect: Arc::new(make_wav(&gen_buzz())),
                sfx_bingo: Arc::new(make_wav(&gen_notes(&[523.0, 659.0, 784.0, 1047.0, 1319.0], 0.1))),
            })
        }

        fn play(&self, buf: &Arc<Vec<u8>>) {
            if let Ok(sink) = Sink::try_new(&self.handle) {
                let cursor = Cursor::new(buf.as_ref().clone());
                if let Ok(src) = rodio::Decoder::new(cursor) {
                    sink.append(src);
                    sink.detach();
                }
            }
        }

        pub fn play_roll(&self) { self.play(&self.sfx_roll); }
        pub fn play_correct(&self) { self.play(&self.sfx_correct); }
        pub fn play_incorrect(&self) { self.play(&self.sfx_incorrect); }
        pub fn play_bingo(&self) { self.play(&self.sfx_bingo); }
    }

    /// Dice rattle: a few short clicks of LCG noise.
    fn gen_roll() -> Vec<f32> {
        let click = (SAMPLE_RATE as f32 * 0.02) as usize;
        let gap = (SAMPLE_RATE as f32 * 0.03) as usize;
        let mut rng: u32 = 2024;
        let mut samples = Vec::new();
        for _ in 0..4 {
            for i in 0..click {
                rng = rng.wrapping_mul(1103515245).wrapping_add(12345);
                let noise = (rng as f32 / u32::MAX as f32) * 2.0 - 1.0;
                let env = 1.0 - i as f32 / click as f32;
                samples.push(noise * env * 0.25);
            }
            samples.extend(std::iter::repeat(0.0).take(gap));
        }
        samples
    }

    /// Ascending notes with a touch of second harmonic.
    fn gen_notes(freqs: &[f32], note_dur: f32) -> Vec<f32> {
        let n = (SAMPLE_RATE as f32 * note_dur) as usize;
        let mut samples = Vec::with_capacity(n * freqs.len());
        for &freq in freqs {
            for i in 0..n {
                let t = i as f32 / SAMPLE_RATE as f32;
                let env = 1.0 - (i as f32 / n as f32) * 0.4;
                let wave = (t * freq * TAU).sin() * 0.7 + (t * freq * 2.0 * TAU).sin() * 0.3;
                samples.push(wave * env * 0.3);
            }
        }
        samples
    }

    /// Wrong pick: low descending square-ish buzz.
    fn gen_buzz() -> Vec<f32> {
        let n = (SAMPLE_RATE as f32 * 0.18) as usize;
        (0..n)
            .map(|i| {
                let p = i as f32 / n as f32;
                let freq = 220.0 - p * 90.0;
                let t = i as f32 / SAMPLE_RATE as f32;
                let wave = if (t * freq * TAU).sin() >= 0.0 { 1.0 } else { -1.0 };
                wave * (1.0 - p) * 0.15
            })
            .collect()
    }

    /// Wrap mono f32 samples into a 16-bit PCM WAV buffer.
    fn make_wav(samples: &[f32]) -> Vec<u8> {
        let num_channels: u16 = 1;
        let bits_per_sample: u16 = 16;
        let byte_rate = SAMPLE_RATE * (num_channels as u32) * (bits_per_sample as u32) / 8;
        let block_align = num_channels * bits_per_sample / 8;
        let data_size = samples.len() as u32 * 2;

        let mut buf = Vec::with_capacity(44 + data_size as usize);
        buf.extend_from_slice(b"RIFF");
        buf.extend_from_slice(&(36 + data_size).to_le_bytes());
        buf.extend_from_slice(b"WAVE");

        buf.extend_from_slice(b"fmt ");
        buf.extend_from_slice(&16u32.to_le_bytes());
        buf.extend_from_slice(&1u16.to_le_bytes()); // PCM
        buf.extend_from_slice(&num_channels.to_le_bytes());
        buf.extend_from_slice(&SAMPLE_RATE.to_le_bytes());
        buf.extend_from_slice(&byte_rate.to_le_bytes());
        buf.extend_from_slice(&block_align.to_le_bytes());
        buf.extend_from_slice(&bits_per_sample.to_le_bytes());

        buf.extend_from_slice(b"data");
        buf.extend_from_slice(&data_size.to_le_bytes());
        for &s in samples {
            let val = (s.clamp(-1.0, 1.0) * 32767.0) as i16;
            buf.extend_from_slice(&val.to_le_bytes());
        }
        buf
    }
}

// ════════════════════════════════════════════════════════════
//  Public API: compiles to no-ops when sound feature is off
// ════════════════════════════════════════════════════════════

#[cfg(feature = "sound")]
pub use inner::SoundEngine;

#[cfg(not(feature = "sound"))]
pub struct SoundEngine;

#[cfg(not(feature = "sound"))]
impl SoundEngine {
    pub fn new() -> Option<Self> { Some(SoundEngine) }
    pub fn play_roll(&self) {}
    pub fn play_correct(&self) {}
    pub fn play_incorrect(&self) {}
    pub fn play_bingo(&self) {}
}

/// Play the cue for each event that has one.
pub fn play_events(sound: Option<&SoundEngine>, events: &[GameEvent]) {
    let sfx = match sound {
        Some(s) => s,
        None => return,
    };
    for event in events {
        match event {
            GameEvent::DiceShown { .. } => sfx.play_roll(),
            GameEvent::CellOutcome { outcome: Outcome::Correct, .. } => sfx.play_correct(),
            GameEvent::CellOutcome { outcome: Outcome::Incorrect, .. } => sfx.play_incorrect(),
            GameEvent::Bingo => sfx.play_bingo(),
            _ => {}
        }
    }
}

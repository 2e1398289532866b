//! Audio encoding tests
//!
//! Covers the WAV helpers without requiring audio hardware.

use std::io::Cursor;

use cameo::voice::{SAMPLE_RATE, samples_to_wav};

/// Generate sine wave audio samples
fn sine(frequency: f32, duration_secs: f32, amplitude: f32) -> Vec<f32> {
    let num_samples = (SAMPLE_RATE as f32 * duration_secs) as usize;
    (0..num_samples)
        .map(|i| {
            let t = i as f32 / SAMPLE_RATE as f32;
            amplitude * (2.0 * std::f32::consts::PI * frequency * t).sin()
        })
        .collect()
}

#[test]
fn wav_has_riff_header() {
    let samples = sine(440.0, 0.1, 0.5);
    let wav = samples_to_wav(&samples, SAMPLE_RATE).unwrap();

    assert_eq!(&wav[0..4], b"RIFF");
    assert_eq!(&wav[8..12], b"WAVE");
    assert!(wav.len() > 44);
}

#[test]
fn wav_roundtrips_through_hound() {
    let original: Vec<f32> = vec![0.0, 0.5, -0.5, 1.0, -1.0, 0.25];
    let wav = samples_to_wav(&original, SAMPLE_RATE).unwrap();

    let mut reader = hound::WavReader::new(Cursor::new(wav)).unwrap();
    let spec = reader.spec();
    assert_eq!(spec.sample_rate, SAMPLE_RATE);
    assert_eq!(spec.channels, 1);
    assert_eq!(spec.bits_per_sample, 16);

    let read: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();
    assert_eq!(read.len(), original.len());

    // Full-scale samples clamp instead of wrapping
    assert_eq!(read[3], 32767);
    assert_eq!(read[4], -32767);
}

#[test]
fn empty_input_still_encodes() {
    let wav = samples_to_wav(&[], SAMPLE_RATE).unwrap();
    assert_eq!(wav.len(), 44);
}

use std::io::Cursor;

use voiceprep_core::{PcmBuffer, encode_wav};

/// Deterministic test signal spanning the full range, including out-of-range peaks.
fn signal(frames: usize, phase: f32) -> Vec<f32> {
    (0..frames)
        .map(|i| ((i as f32 * 0.37 + phase).sin() * 1.2).clamp(-1.5, 1.5))
        .collect()
}

fn decode(bytes: &[u8]) -> (hound::WavSpec, Vec<i16>) {
    let mut reader = hound::WavReader::new(Cursor::new(bytes)).unwrap();
    let spec = reader.spec();
    let samples = reader
        .samples::<i16>()
        .collect::<Result<Vec<_>, _>>()
        .unwrap();
    (spec, samples)
}

#[test]
fn test_roundtrip_preserves_layout_and_samples() {
    for (channels, rate, frames) in [(1u16, 16000u32, 1000usize), (2, 44100, 777), (2, 8000, 5)] {
        let data: Vec<Vec<f32>> = (0..channels)
            .map(|c| signal(frames, c as f32))
            .collect();
        let pcm = PcmBuffer::new(rate, data.clone()).unwrap();

        let wav = encode_wav(pcm);
        let (spec, samples) = decode(wav.bytes());

        assert_eq!(spec.channels, channels);
        assert_eq!(spec.sample_rate, rate);
        assert_eq!(spec.bits_per_sample, 16);
        assert_eq!(spec.sample_format, hound::SampleFormat::Int);
        assert_eq!(samples.len(), frames * channels as usize);

        for (i, &quantized) in samples.iter().enumerate() {
            let original = data[i % channels as usize][i / channels as usize].clamp(-1.0, 1.0);
            let restored = if quantized >= 0 {
                quantized as f32 / 32767.0
            } else {
                quantized as f32 / 32768.0
            };
            assert!(
                (restored - original).abs() <= 1.0 / 32768.0 + 1e-6,
                "sample {i}: {original} -> {quantized}"
            );
        }
    }
}

#[test]
fn test_quantization_matches_scale() {
    let inputs = [0.0f32, 0.1, 0.5, 0.999, 1.0, -0.1, -0.5, -1.0, 2.0, -2.0];
    let pcm = PcmBuffer::new(16000, vec![inputs.to_vec()]).unwrap();

    let (_, samples) = decode(encode_wav(pcm).bytes());

    let expected: Vec<i16> = inputs
        .iter()
        .map(|&s| {
            let s = s.clamp(-1.0, 1.0);
            if s >= 0.0 {
                (s * 32767.0).round() as i16
            } else {
                (s * 32768.0).round() as i16
            }
        })
        .collect();
    assert_eq!(samples, expected);
}

#[test]
fn test_zero_frames_decodes_as_empty() {
    let pcm = PcmBuffer::new(22050, vec![vec![]]).unwrap();
    let wav = encode_wav(pcm);

    assert_eq!(wav.byte_len(), 44);
    let (spec, samples) = decode(wav.bytes());
    assert_eq!(spec.sample_rate, 22050);
    assert!(samples.is_empty());
}

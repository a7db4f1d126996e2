//! Container probing and decoding via symphonia.

use std::io::{Cursor, ErrorKind};

use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{CODEC_TYPE_NULL, DecoderOptions};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use symphonia::default::{get_codecs, get_probe};

use super::AudioDecoder;
use crate::audio::PcmBuffer;
use crate::audio::format::normalize_mime;
use crate::error::DecodeError;

/// Decoder for the containers and codecs symphonia ships with
/// (WAV, MP3, FLAC, Ogg/Vorbis, WebM/Matroska with a supported codec).
///
/// Opus is not among them: WebM/Opus input fails with
/// [`DecodeError::UnsupportedCodec`]; use `FfmpegDecoder` for it.
#[derive(Debug, Default, Clone, Copy)]
pub struct SymphoniaDecoder;

impl SymphoniaDecoder {
    pub fn new() -> Self {
        Self
    }
}

impl AudioDecoder for SymphoniaDecoder {
    fn decode(&self, bytes: &[u8], mime_hint: Option<&str>) -> Result<PcmBuffer, DecodeError> {
        let cursor = Cursor::new(bytes.to_vec());
        let mss = MediaSourceStream::new(Box::new(cursor), Default::default());

        let mut hint = Hint::new();
        if let Some(mime) = mime_hint {
            let mime = normalize_mime(mime);
            if let Some(ext) = extension_hint(&mime) {
                hint.with_extension(ext);
            }
            hint.mime_type(&mime);
        }

        let probed = get_probe()
            .format(
                &hint,
                mss,
                &FormatOptions::default(),
                &MetadataOptions::default(),
            )
            .map_err(|err| DecodeError::Malformed(format!("failed to open container: {err}")))?;

        let mut format = probed.format;
        let track = format
            .default_track()
            .ok_or_else(|| DecodeError::Malformed("no audio track found".to_string()))?;

        if track.codec_params.codec == CODEC_TYPE_NULL {
            return Err(DecodeError::UnsupportedCodec(
                "missing codec information".to_string(),
            ));
        }

        let mut decoder = get_codecs()
            .make(&track.codec_params, &DecoderOptions::default())
            .map_err(|err| DecodeError::UnsupportedCodec(err.to_string()))?;

        let track_id = track.id;
        let expected_frames = track.codec_params.n_frames;
        let mut sample_rate = track.codec_params.sample_rate.unwrap_or(0);
        let mut channel_count = track
            .codec_params
            .channels
            .map(|c| c.count())
            .unwrap_or(0);
        let mut interleaved: Vec<f32> = Vec::new();

        loop {
            let packet = match format.next_packet() {
                Ok(packet) => packet,
                Err(SymphoniaError::IoError(err)) if err.kind() == ErrorKind::UnexpectedEof => {
                    break;
                }
                Err(SymphoniaError::ResetRequired) => {
                    return Err(DecodeError::UnsupportedCodec(
                        "stream changes parameters mid-way".to_string(),
                    ));
                }
                Err(err) => {
                    return Err(DecodeError::Truncated(format!(
                        "failed while reading stream: {err}"
                    )));
                }
            };

            if packet.track_id() != track_id {
                continue;
            }

            let decoded = match decoder.decode(&packet) {
                Ok(decoded) => decoded,
                Err(SymphoniaError::DecodeError(err)) => {
                    tracing::debug!("skipping corrupt packet: {err}");
                    continue;
                }
                Err(err) => {
                    return Err(DecodeError::Truncated(format!(
                        "failed to decode packet: {err}"
                    )));
                }
            };

            let spec = *decoded.spec();
            sample_rate = spec.rate;
            channel_count = spec.channels.count();

            let mut sample_buffer = SampleBuffer::<f32>::new(decoded.capacity() as u64, spec);
            sample_buffer.copy_interleaved_ref(decoded);
            interleaved.extend_from_slice(sample_buffer.samples());
        }

        if interleaved.is_empty() {
            return Err(DecodeError::Truncated(
                "no audio frames could be decoded".to_string(),
            ));
        }

        // The reader stops quietly at end of input, so a cut-off file only
        // shows up as fewer frames than the container header declared.
        let decoded_frames = (interleaved.len() / channel_count.max(1)) as u64;
        if let Some(expected) = expected_frames
            && decoded_frames < expected
        {
            return Err(DecodeError::Truncated(format!(
                "stream ended after {decoded_frames} of {expected} frames"
            )));
        }

        tracing::debug!(
            sample_rate,
            channels = channel_count,
            samples = interleaved.len(),
            "decoded audio"
        );

        PcmBuffer::from_interleaved(sample_rate, channel_count as u16, &interleaved)
    }
}

fn extension_hint(mime: &str) -> Option<&'static str> {
    match mime {
        "audio/wav" | "audio/x-wav" | "audio/wave" => Some("wav"),
        "audio/mp3" | "audio/mpeg" => Some("mp3"),
        "audio/webm" | "video/webm" => Some("webm"),
        "audio/ogg" => Some("ogg"),
        "audio/flac" => Some("flac"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::encode_wav;

    #[test]
    fn test_decodes_own_wav_output() {
        let pcm = PcmBuffer::new(16000, vec![vec![0.0, 0.5, -0.5, 1.0]; 2]).unwrap();
        let wav = encode_wav(pcm);

        let decoded = SymphoniaDecoder::new()
            .decode(wav.bytes(), Some("audio/wav"))
            .unwrap();

        assert_eq!(decoded.sample_rate(), 16000);
        assert_eq!(decoded.channel_count(), 2);
        assert_eq!(decoded.frame_count(), 4);
        let left = decoded.channel(0).unwrap();
        assert!((left[1] - 0.5).abs() < 1.0 / 32768.0 * 2.0);
        assert!((left[2] + 0.5).abs() < 1.0 / 32768.0 * 2.0);
    }

    #[test]
    fn test_garbage_is_malformed() {
        let err = SymphoniaDecoder::new()
            .decode(b"definitely not audio", Some("audio/webm"))
            .unwrap_err();
        assert!(matches!(err, DecodeError::Malformed(_)));
    }

    #[test]
    fn test_header_only_wav_yields_no_pcm() {
        let wav = encode_wav(PcmBuffer::silence(16000, 0).unwrap());
        let err = SymphoniaDecoder::new()
            .decode(wav.bytes(), Some("audio/wav"))
            .unwrap_err();
        assert!(matches!(err, DecodeError::Truncated(_)), "{err:?}");
    }

    #[test]
    fn test_cut_off_wav_is_truncated() {
        let pcm = PcmBuffer::new(16000, vec![vec![0.25; 16000]]).unwrap();
        let wav = encode_wav(pcm);
        let cut = &wav.bytes()[..44 + 8000];

        let err = SymphoniaDecoder::new()
            .decode(cut, Some("audio/wav"))
            .unwrap_err();

        assert!(matches!(err, DecodeError::Truncated(_)), "{err:?}");
        assert!(err.to_string().contains("16000"));
    }

    #[test]
    fn test_complete_wav_is_not_truncated() {
        let pcm = PcmBuffer::new(16000, vec![vec![0.25; 16000]]).unwrap();
        let wav = encode_wav(pcm);

        let decoded = SymphoniaDecoder::new()
            .decode(wav.bytes(), Some("audio/wav"))
            .unwrap();

        assert_eq!(decoded.frame_count(), 16000);
    }
}

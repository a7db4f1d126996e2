pub mod audio;
pub mod error;
pub mod http;
pub mod pipeline;
pub mod settings;
pub mod upload;
pub mod verbose;

pub use audio::{
    AudioDecoder, AudioMime, EncodedAudio, Mp3Codec, Mp3CodecFactory, Mp3Encoder, PcmBuffer,
    WavEncoder, encode_mp3, encode_wav, validate,
};
#[cfg(feature = "ffmpeg")]
pub use audio::FfmpegDecoder;
#[cfg(feature = "symphonia-decoder")]
pub use audio::SymphoniaDecoder;
pub use error::{DecodeError, EncodeError, ErrorKind, FormatError, PipelineError};
pub use pipeline::{PreparedUpload, convert_to_mp3, prepare_recording, upload_recording};
pub use settings::{DEFAULT_API_BASE_URL, DEFAULT_TIMEOUT_SECS, Settings};
pub use upload::{UploadClient, UploadResult, UploadTarget};
pub use verbose::init_logging;

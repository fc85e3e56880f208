//! Mono audio loading
//!
//! WAV goes through hound (integer and float PCM); everything else is probed
//! and decoded by symphonia. Multi-channel input is averaged down to mono.

use crate::error::{FileError, FileResult};
use std::path::{Path, PathBuf};
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

/// Decoded mono waveform
#[derive(Debug, Clone)]
pub struct MonoAudio {
    /// Samples in [-1, 1]
    pub samples: Vec<f32>,

    /// Sample rate in Hz
    pub sample_rate: u32,

    /// Channel count before downmixing
    pub source_channels: usize,

    /// Source file path
    pub path: PathBuf,
}

impl MonoAudio {
    /// Load any supported file and downmix it, whatever its sample rate
    pub fn load<P: AsRef<Path>>(path: P) -> FileResult<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(FileError::NotFound(path.to_path_buf()));
        }

        let is_wav = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("wav"));

        let (interleaved, sample_rate, channels) = if is_wav {
            read_wav(path)?
        } else {
            read_symphonia(path)?
        };

        if channels > 1 {
            log::debug!("{}: downmixing {} channels", path.display(), channels);
        }

        Ok(Self {
            samples: downmix(&interleaved, channels),
            sample_rate,
            source_channels: channels,
            path: path.to_path_buf(),
        })
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// No samples at all
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Duration in seconds
    pub fn duration_seconds(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / self.sample_rate as f64
    }
}

/// Load a file as mono and require `expected_sample_rate`
pub fn read_mono<P: AsRef<Path>>(path: P, expected_sample_rate: u32) -> FileResult<MonoAudio> {
    let audio = MonoAudio::load(path)?;
    if audio.sample_rate != expected_sample_rate {
        return Err(FileError::SampleRateMismatch {
            path: audio.path,
            found: audio.sample_rate,
            expected: expected_sample_rate,
        });
    }
    Ok(audio)
}

/// Average interleaved frames across channels
pub fn downmix(interleaved: &[f32], channels: usize) -> Vec<f32> {
    if channels <= 1 {
        return interleaved.to_vec();
    }

    let scale = 1.0 / channels as f32;
    interleaved
        .chunks_exact(channels)
        .map(|frame| frame.iter().sum::<f32>() * scale)
        .collect()
}

/// Interleaved samples, sample rate and channel count via hound
fn read_wav(path: &Path) -> FileResult<(Vec<f32>, u32, usize)> {
    let reader = hound::WavReader::open(path).map_err(|e| FileError::decode(path, e))?;

    let spec = reader.spec();
    let samples: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader
            .into_samples::<f32>()
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| FileError::decode(path, e))?,
        hound::SampleFormat::Int => {
            let scale = 1.0 / (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 * scale))
                .collect::<Result<Vec<_>, _>>()
                .map_err(|e| FileError::decode(path, e))?
        }
    };

    Ok((samples, spec.sample_rate, spec.channels as usize))
}

/// Interleaved samples, sample rate and channel count via symphonia
fn read_symphonia(path: &Path) -> FileResult<(Vec<f32>, u32, usize)> {
    let file = std::fs::File::open(path)?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| FileError::decode(path, e))?;

    let mut format = probed.format;

    let track = format
        .default_track()
        .ok_or_else(|| FileError::decode(path, "no audio track"))?;

    let sample_rate = track
        .codec_params
        .sample_rate
        .ok_or_else(|| FileError::decode(path, "unknown sample rate"))?;

    let mut channels = track.codec_params.channels.map(|c| c.count()).unwrap_or(0);

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| FileError::decode(path, e))?;

    let track_id = track.id;
    let mut interleaved = Vec::new();

    loop {
        let packet = match format.next_packet() {
            Ok(p) => p,
            Err(SymphoniaError::IoError(ref e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(e) => return Err(FileError::decode(path, e)),
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(decoded) => decoded,
            Err(SymphoniaError::DecodeError(e)) => {
                log::warn!("{}: skipping corrupt packet ({})", path.display(), e);
                continue;
            }
            Err(e) => return Err(FileError::decode(path, e)),
        };

        let spec = *decoded.spec();
        channels = spec.channels.count();

        let mut buffer = SampleBuffer::<f32>::new(decoded.capacity() as u64, spec);
        buffer.copy_interleaved_ref(decoded);
        interleaved.extend_from_slice(buffer.samples());
    }

    Ok((interleaved, sample_rate, channels.max(1)))
}

//! WAV output and directory listing

use crate::error::{FileError, FileResult};
use std::path::{Path, PathBuf};

/// Write 32-bit float mono WAV, creating parent directories
pub fn write_wav<P: AsRef<Path>>(path: P, samples: &[f32], sample_rate: u32) -> FileResult<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };

    let mut writer = hound::WavWriter::create(path, spec).map_err(|e| FileError::write(path, e))?;
    for &sample in samples {
        writer
            .write_sample(sample)
            .map_err(|e| FileError::write(path, e))?;
    }
    writer.finalize().map_err(|e| FileError::write(path, e))?;

    log::debug!("Wrote {} samples to {}", samples.len(), path.display());
    Ok(())
}

/// Sorted `.wav` files (any case) directly inside `dir`
pub fn list_wavs<P: AsRef<Path>>(dir: P) -> FileResult<Vec<PathBuf>> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        return Err(FileError::NotFound(dir.to_path_buf()));
    }

    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        let is_wav = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("wav"));
        if is_wav && path.is_file() {
            files.push(path);
        }
    }

    if files.is_empty() {
        return Err(FileError::NoAudioFiles(dir.to_path_buf()));
    }

    files.sort();
    Ok(files)
}

//! Directory-level enhancement and evaluation

use anyhow::{Context, Result};
use std::path::Path;
use ubke_core::{BlockProcessor, UbkeConfig, UbkeEnhancer, UbkeStream};
use ubke_file::{list_wavs, read_mono, write_wav};
use ubke_metrics::{
    DirectoryEvaluation, EvalConfig, RtfRow, RtfTable, evaluate_dirs, unavailable_notice,
};

/// Enhance every WAV in `input_dir` into `output_dir` under the same name
/// and write the per-file RTF table
pub fn enhance_dir(
    config_path: &Path,
    input_dir: &Path,
    output_dir: &Path,
    rtf_csv: &Path,
) -> Result<RtfTable> {
    let config = UbkeConfig::load(config_path)
        .with_context(|| format!("Failed to load config {}", config_path.display()))?;
    let sample_rate = config.audio.sample_rate;
    let enhancer = UbkeEnhancer::new(config).context("Invalid enhancement config")?;

    let inputs = list_wavs(input_dir)
        .with_context(|| format!("Failed to list inputs in {}", input_dir.display()))?;
    log::info!("Enhancing {} files from {}", inputs.len(), input_dir.display());

    let mut table = RtfTable::new();
    for (index, path) in inputs.iter().enumerate() {
        let audio = read_mono(path, sample_rate)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        let result = enhancer.process(&audio.samples);

        let name = path
            .file_name()
            .context("Input path has no file name")?
            .to_string_lossy()
            .into_owned();
        let output = output_dir.join(&name);
        write_wav(&output, &result.samples, sample_rate)
            .with_context(|| format!("Failed to write {}", output.display()))?;

        log::info!(
            "[{}/{}] {}: rtf={:.4}, mean_alpha={:.4}",
            index + 1,
            inputs.len(),
            name,
            result.real_time_factor,
            result.mean_alpha
        );

        table.push(RtfRow {
            file: name,
            rtf: result.real_time_factor,
            mean_alpha: result.mean_alpha,
        });
    }

    table
        .save(rtf_csv)
        .with_context(|| format!("Failed to write {}", rtf_csv.display()))?;
    if let Some(mean) = table.mean_rtf() {
        log::info!("Mean RTF {:.4}; saved RTF summary to {}", mean, rtf_csv.display());
    }

    Ok(table)
}

/// Score enhanced files against clean references and write the metrics CSV
pub fn metrics_dir(
    eval_config_path: &Path,
    clean_dir: &Path,
    enhanced_dir: &Path,
    out_csv: &Path,
) -> Result<DirectoryEvaluation> {
    let config = EvalConfig::load(eval_config_path).with_context(|| {
        format!("Failed to load evaluation config {}", eval_config_path.display())
    })?;

    if let Some(notice) = unavailable_notice(&config.metrics) {
        log::warn!("{}", notice);
    }

    let evaluation = evaluate_dirs(clean_dir, enhanced_dir, &config).with_context(|| {
        format!(
            "Failed to evaluate {} against {}",
            enhanced_dir.display(),
            clean_dir.display()
        )
    })?;

    evaluation
        .table
        .save(out_csv)
        .with_context(|| format!("Failed to write {}", out_csv.display()))?;
    log::info!(
        "Scored {} files ({} skipped); wrote metrics to {}",
        evaluation.table.rows().len(),
        evaluation.skipped.len(),
        out_csv.display()
    );

    Ok(evaluation)
}

/// Run one file through the streaming enhancer in fixed-size blocks.
///
/// The output is shifted back by the stream latency so it lines up with the
/// input sample for sample.
pub fn stream_file(config_path: &Path, input: &Path, output: &Path, block_size: usize) -> Result<()> {
    anyhow::ensure!(block_size > 0, "Block size must be positive");

    let config = UbkeConfig::load(config_path)
        .with_context(|| format!("Failed to load config {}", config_path.display()))?;
    let sample_rate = config.audio.sample_rate;
    let audio = read_mono(input, sample_rate)
        .with_context(|| format!("Failed to read {}", input.display()))?;

    let mut stream = UbkeStream::new(config).context("Invalid enhancement config")?;
    let latency = stream.latency_samples();

    let mut feed = audio.samples;
    let len = feed.len();
    feed.resize(len + latency, 0.0);

    let mut streamed = vec![0.0f32; feed.len()];
    for (block_in, block_out) in feed.chunks(block_size).zip(streamed.chunks_mut(block_size)) {
        stream.process(block_in, block_out)?;
    }

    write_wav(output, &streamed[latency..], sample_rate)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    log::info!(
        "Streamed {} samples in blocks of {} ({} frames, latency {} samples, mean_alpha={:.4})",
        len,
        block_size,
        stream.frames_processed(),
        latency,
        stream.mean_alpha()
    );

    Ok(())
}

//! Block-by-block UBKE for live input
//!
//! Samples are buffered into hop-spaced frames. The first `init_frames`
//! frames are held back until the noise power can be seeded exactly as the
//! offline path does it; after that every frame is enhanced as soon as it is
//! complete. Output runs a fixed [`UbkeStream::latency_samples`] behind the
//! input and matches [`UbkeEnhancer::process`](crate::UbkeEnhancer::process)
//! sample for sample once it starts.

use crate::config::UbkeConfig;
use crate::enhance::FrameProcessor;
use crate::error::{CoreError, CoreResult};
use crate::noise::NoisePowerTracker;
use crate::stft::{AnalysisScratch, Stft, SynthesisScratch, WINDOW_SUM_FLOOR};
use crate::BlockProcessor;
use rustfft::num_complex::Complex32;
use std::collections::VecDeque;

/// Overlap-add accumulator that releases one hop per frame
struct OverlapAdd {
    synthesis: SynthesisScratch,
    signal: Vec<f32>,
    weight: Vec<f32>,
    hop: usize,
}

impl OverlapAdd {
    fn new(stft: &Stft) -> Self {
        let span = stft.win_length().max(stft.hop_length());
        Self {
            synthesis: stft.synthesis_scratch(),
            signal: vec![0.0; span],
            weight: vec![0.0; span],
            hop: stft.hop_length(),
        }
    }

    /// Add one frame at the head of the buffer and release the samples no
    /// later frame can touch
    fn push(&mut self, stft: &Stft, spectrum: &[Complex32], ready: &mut VecDeque<f32>) {
        let frame = stft.synthesize_frame(spectrum, &mut self.synthesis);
        for ((out, wsum), (&sample, &w2)) in self
            .signal
            .iter_mut()
            .zip(self.weight.iter_mut())
            .zip(frame.iter().zip(stft.window_squared()))
        {
            *out += sample;
            *wsum += w2;
        }

        for (&sample, &w) in self.signal[..self.hop].iter().zip(&self.weight[..self.hop]) {
            let norm = if w < WINDOW_SUM_FLOOR { 1.0 } else { w };
            ready.push_back(sample / norm);
        }

        let span = self.signal.len();
        self.signal.copy_within(self.hop.., 0);
        self.weight.copy_within(self.hop.., 0);
        self.signal[span - self.hop..].fill(0.0);
        self.weight[span - self.hop..].fill(0.0);
    }

    fn reset(&mut self) {
        self.signal.fill(0.0);
        self.weight.fill(0.0);
    }
}

/// Streaming UBKE enhancer with its own noise and tracker state
pub struct UbkeStream {
    config: UbkeConfig,
    stft: Stft,
    analysis: AnalysisScratch,
    spectrum: Vec<Complex32>,
    /// Input samples not yet consumed by a full frame
    pending: Vec<f32>,
    /// Samples to drop before the next frame starts (hop > window)
    discard: usize,
    /// Frames awaiting the noise seed
    warmup: Vec<Vec<Complex32>>,
    seed_frames: usize,
    processor: Option<FrameProcessor>,
    overlap: OverlapAdd,
    ready: VecDeque<f32>,
    latency: usize,
    frames: usize,
    alpha_sum: f64,
}

impl UbkeStream {
    /// Validate the configuration and allocate all buffers
    pub fn new(config: UbkeConfig) -> CoreResult<Self> {
        config.validate()?;

        let stft = Stft::from_config(&config.audio);
        let seed_frames = config.ubke.noise_update.init_frames.max(1);
        let latency = stft.win_length() + (seed_frames - 1) * stft.hop_length() - 1;

        let mut stream = Self {
            analysis: stft.analysis_scratch(),
            spectrum: vec![Complex32::new(0.0, 0.0); stft.num_bins()],
            pending: Vec::with_capacity(stft.win_length()),
            discard: 0,
            warmup: Vec::with_capacity(seed_frames),
            seed_frames,
            processor: None,
            overlap: OverlapAdd::new(&stft),
            ready: VecDeque::new(),
            latency,
            frames: 0,
            alpha_sum: 0.0,
            config,
            stft,
        };
        stream.prime_output();
        Ok(stream)
    }

    /// Configuration in use
    pub fn config(&self) -> &UbkeConfig {
        &self.config
    }

    /// Frames enhanced so far
    pub fn frames_processed(&self) -> usize {
        self.frames
    }

    /// Mean fusion weight over the frames enhanced so far
    pub fn mean_alpha(&self) -> f32 {
        if self.frames == 0 {
            0.0
        } else {
            (self.alpha_sum / self.frames as f64) as f32
        }
    }

    /// Per-frame state, once the noise seed is complete
    pub fn frame_processor(&self) -> Option<&FrameProcessor> {
        self.processor.as_ref()
    }

    fn prime_output(&mut self) {
        self.ready.clear();
        self.ready.extend(std::iter::repeat_n(0.0, self.latency));
    }

    fn push_sample(&mut self, sample: f32) {
        if self.discard > 0 {
            self.discard -= 1;
            return;
        }

        self.pending.push(sample);
        if self.pending.len() < self.stft.win_length() {
            return;
        }

        self.stft
            .analyze_frame(&self.pending, &mut self.analysis, &mut self.spectrum);
        self.run_frame();

        let hop = self.stft.hop_length();
        let consumed = hop.min(self.pending.len());
        self.pending.drain(..consumed);
        self.discard = hop - consumed;
    }

    fn run_frame(&mut self) {
        if let Some(processor) = self.processor.as_mut() {
            let alpha = processor.process_frame(&mut self.spectrum);
            self.alpha_sum += alpha as f64;
            self.frames += 1;
            self.overlap.push(&self.stft, &self.spectrum, &mut self.ready);
            return;
        }

        self.warmup.push(self.spectrum.clone());
        if self.warmup.len() < self.seed_frames {
            return;
        }

        let noise = NoisePowerTracker::from_frames(
            self.warmup.iter().map(|f| f.as_slice()),
            self.stft.num_bins(),
            self.config.ubke.noise_update.alpha,
        );
        let mut processor = FrameProcessor::new(&self.config, noise);

        for mut spectrum in self.warmup.drain(..) {
            let alpha = processor.process_frame(&mut spectrum);
            self.alpha_sum += alpha as f64;
            self.frames += 1;
            self.overlap.push(&self.stft, &spectrum, &mut self.ready);
        }

        log::debug!(
            "Noise seeded from {} frames, streaming with {} samples latency",
            self.seed_frames,
            self.latency
        );
        self.processor = Some(processor);
    }
}

impl BlockProcessor for UbkeStream {
    fn process(&mut self, input: &[f32], output: &mut [f32]) -> CoreResult<()> {
        if input.len() != output.len() {
            return Err(CoreError::BufferMismatch {
                expected: input.len(),
                got: output.len(),
            });
        }

        for (&sample, out) in input.iter().zip(output.iter_mut()) {
            self.push_sample(sample);
            *out = self.ready.pop_front().unwrap_or(0.0);
        }

        Ok(())
    }

    fn reset(&mut self) {
        self.pending.clear();
        self.discard = 0;
        self.warmup.clear();
        self.processor = None;
        self.overlap.reset();
        self.frames = 0;
        self.alpha_sum = 0.0;
        self.prime_output();
    }

    fn latency_samples(&self) -> usize {
        self.latency
    }

    fn name(&self) -> &str {
        "UbkeStream"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latency() {
        let stream = UbkeStream::new(UbkeConfig::default()).unwrap();
        // 512 + 5 * 256 - 1
        assert_eq!(stream.latency_samples(), 1791);
        assert_eq!(stream.name(), "UbkeStream");
    }

    #[test]
    fn test_buffer_mismatch() {
        let mut stream = UbkeStream::new(UbkeConfig::default()).unwrap();
        let mut output = vec![0.0; 10];
        assert!(matches!(
            stream.process(&[0.0; 20], &mut output),
            Err(CoreError::BufferMismatch { expected: 20, got: 10 })
        ));
    }

    #[test]
    fn test_silent_during_warmup() {
        let mut stream = UbkeStream::new(UbkeConfig::default()).unwrap();
        let input = vec![0.3f32; 1000];
        let mut output = vec![1.0f32; 1000];
        stream.process(&input, &mut output).unwrap();
        assert!(output.iter().all(|&s| s == 0.0));
        assert!(stream.frame_processor().is_none());
        assert_eq!(stream.frames_processed(), 0);
    }

    #[test]
    fn test_reset_clears_state() {
        let mut stream = UbkeStream::new(UbkeConfig::default()).unwrap();
        let input: Vec<f32> = (0..8000).map(|i| ((i * 31) % 17) as f32 * 0.01).collect();
        let mut first = vec![0.0; input.len()];
        stream.process(&input, &mut first).unwrap();
        assert!(stream.frames_processed() > 0);

        stream.reset();
        assert_eq!(stream.frames_processed(), 0);
        assert!(stream.frame_processor().is_none());

        let mut second = vec![0.0; input.len()];
        stream.process(&input, &mut second).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_hop_longer_than_window() {
        let config = UbkeConfig::default()
            .with_stft(64, 64, 96)
            .with_noise_update(0.9, 2);
        let mut stream = UbkeStream::new(config).unwrap();
        let input = vec![0.1f32; 2000];
        let mut output = vec![0.0; 2000];
        stream.process(&input, &mut output).unwrap();
        assert!(output.iter().all(|s| s.is_finite()));
        // Frames start every 96 samples: 1 + (2000 - 64) / 96
        assert_eq!(stream.frames_processed(), 21);
    }
}

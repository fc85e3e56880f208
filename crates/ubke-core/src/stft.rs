//! Short-time Fourier transform with window-squared overlap-add synthesis
//!
//! Analysis:
//! - Right zero-padding up to one window for short inputs
//! - `1 + (N - win_length) / hop_length` frames
//! - Window, zero-pad (or truncate) to `n_fft`, one-sided real FFT
//!
//! Synthesis:
//! - One-sided inverse FFT, truncate/extend to `win_length`, window again
//! - Overlap-add normalized by the accumulated squared window, with a floor
//!   of [`WINDOW_SUM_FLOOR`] at the edges

use crate::config::AudioConfig;
use crate::window::WindowKind;
use realfft::{ComplexToReal, RealFftPlanner, RealToComplex};
use rustfft::num_complex::Complex32;
use std::sync::Arc;

/// Accumulated window² below this is replaced by 1.0
pub const WINDOW_SUM_FLOOR: f32 = 1e-8;

/// One-sided spectrogram stored frame-major in a flat buffer
#[derive(Debug, Clone, PartialEq)]
pub struct Spectrogram {
    data: Vec<Complex32>,
    num_frames: usize,
    num_bins: usize,
}

impl Spectrogram {
    /// Create an all-zero spectrogram
    pub fn zeros(num_frames: usize, num_bins: usize) -> Self {
        Self {
            data: vec![Complex32::new(0.0, 0.0); num_frames * num_bins],
            num_frames,
            num_bins,
        }
    }

    /// Number of frames (T)
    pub fn num_frames(&self) -> usize {
        self.num_frames
    }

    /// Number of one-sided bins (F)
    pub fn num_bins(&self) -> usize {
        self.num_bins
    }

    /// Spectrum of frame `t`
    pub fn frame(&self, t: usize) -> &[Complex32] {
        &self.data[t * self.num_bins..(t + 1) * self.num_bins]
    }

    /// Mutable spectrum of frame `t`
    pub fn frame_mut(&mut self, t: usize) -> &mut [Complex32] {
        &mut self.data[t * self.num_bins..(t + 1) * self.num_bins]
    }

    /// Iterate frames in time order
    pub fn frames(&self) -> impl Iterator<Item = &[Complex32]> {
        self.data.chunks_exact(self.num_bins.max(1))
    }

    /// Magnitudes, frame-major (T × F)
    pub fn magnitudes(&self) -> Vec<f32> {
        self.data.iter().map(|c| c.norm()).collect()
    }

    /// Phases in radians, frame-major (T × F)
    pub fn phases(&self) -> Vec<f32> {
        self.data.iter().map(|c| c.arg()).collect()
    }
}

/// Reusable buffers for [`Stft::analyze_frame`]
pub struct AnalysisScratch {
    input: Vec<f32>,
    fft: Vec<Complex32>,
}

/// Reusable buffers for [`Stft::synthesize_frame`]
pub struct SynthesisScratch {
    spectrum: Vec<Complex32>,
    time: Vec<f32>,
    fft: Vec<Complex32>,
    frame: Vec<f32>,
}

/// STFT analysis/synthesis pair with planned FFTs
pub struct Stft {
    n_fft: usize,
    win_length: usize,
    hop_length: usize,
    window_kind: WindowKind,
    /// Analysis/synthesis window
    window: Vec<f32>,
    /// Squared window, accumulated during overlap-add
    window_sq: Vec<f32>,
    fft_forward: Arc<dyn RealToComplex<f32>>,
    fft_inverse: Arc<dyn ComplexToReal<f32>>,
}

impl Stft {
    /// Plan a transform; all sizes must be non-zero
    pub fn new(n_fft: usize, win_length: usize, hop_length: usize, window: WindowKind) -> Self {
        let mut planner = RealFftPlanner::<f32>::new();
        let fft_forward = planner.plan_fft_forward(n_fft);
        let fft_inverse = planner.plan_fft_inverse(n_fft);

        let window_kind = window;
        let window = window_kind.periodic(win_length);
        let window_sq = window.iter().map(|w| w * w).collect();

        Self {
            n_fft,
            win_length,
            hop_length,
            window_kind,
            window,
            window_sq,
            fft_forward,
            fft_inverse,
        }
    }

    /// Plan a transform from the audio section of a configuration
    pub fn from_config(audio: &AudioConfig) -> Self {
        Self::new(audio.n_fft, audio.win_length, audio.hop_length, audio.window)
    }

    /// FFT size
    pub fn n_fft(&self) -> usize {
        self.n_fft
    }

    /// Window length
    pub fn win_length(&self) -> usize {
        self.win_length
    }

    /// Hop length
    pub fn hop_length(&self) -> usize {
        self.hop_length
    }

    /// Window function
    pub fn window_kind(&self) -> WindowKind {
        self.window_kind
    }

    /// Window samples
    pub fn window(&self) -> &[f32] {
        &self.window
    }

    /// Squared window samples
    pub fn window_squared(&self) -> &[f32] {
        &self.window_sq
    }

    /// Number of one-sided bins
    pub fn num_bins(&self) -> usize {
        self.n_fft / 2 + 1
    }

    /// Frame count for an input of `len` samples (after padding)
    pub fn num_frames(&self, len: usize) -> usize {
        1 + (len.max(self.win_length) - self.win_length) / self.hop_length
    }

    /// Synthesis output length for `num_frames` frames
    pub fn output_len(&self, num_frames: usize) -> usize {
        match num_frames {
            0 => 0,
            t => (t - 1) * self.hop_length + self.win_length,
        }
    }

    /// Allocate analysis buffers
    pub fn analysis_scratch(&self) -> AnalysisScratch {
        AnalysisScratch {
            input: self.fft_forward.make_input_vec(),
            fft: self.fft_forward.make_scratch_vec(),
        }
    }

    /// Allocate synthesis buffers
    pub fn synthesis_scratch(&self) -> SynthesisScratch {
        SynthesisScratch {
            spectrum: self.fft_inverse.make_input_vec(),
            time: self.fft_inverse.make_output_vec(),
            fft: self.fft_inverse.make_scratch_vec(),
            frame: vec![0.0; self.win_length],
        }
    }

    /// Window one segment of up to `win_length` samples and transform it into `out`
    pub fn analyze_frame(
        &self,
        segment: &[f32],
        scratch: &mut AnalysisScratch,
        out: &mut [Complex32],
    ) {
        scratch.input.fill(0.0);
        for ((dst, &sample), &w) in scratch
            .input
            .iter_mut()
            .zip(segment)
            .zip(&self.window)
        {
            *dst = sample * w;
        }

        self.fft_forward
            .process_with_scratch(&mut scratch.input, out, &mut scratch.fft)
            .ok();
    }

    /// Inverse-transform one spectrum and return the windowed `win_length` frame
    pub fn synthesize_frame<'a>(
        &self,
        spectrum: &[Complex32],
        scratch: &'a mut SynthesisScratch,
    ) -> &'a [f32] {
        for (dst, &src) in scratch.spectrum.iter_mut().zip(spectrum) {
            *dst = src;
        }

        // A one-sided inverse only reads the real part of DC and Nyquist
        scratch.spectrum[0].im = 0.0;
        if self.n_fft % 2 == 0 {
            if let Some(last) = scratch.spectrum.last_mut() {
                last.im = 0.0;
            }
        }

        self.fft_inverse
            .process_with_scratch(&mut scratch.spectrum, &mut scratch.time, &mut scratch.fft)
            .ok();

        let norm = 1.0 / self.n_fft as f32;
        for (i, (dst, &w)) in scratch.frame.iter_mut().zip(&self.window).enumerate() {
            let sample = scratch.time.get(i).copied().unwrap_or(0.0);
            *dst = sample * norm * w;
        }

        &scratch.frame
    }

    /// Forward transform of a whole waveform
    pub fn forward(&self, samples: &[f32]) -> Spectrogram {
        let padded;
        let signal = if samples.len() < self.win_length {
            let mut buf = samples.to_vec();
            buf.resize(self.win_length, 0.0);
            padded = buf;
            &padded[..]
        } else {
            samples
        };

        let num_frames = self.num_frames(signal.len());
        let mut spectrogram = Spectrogram::zeros(num_frames, self.num_bins());
        let mut scratch = self.analysis_scratch();

        for t in 0..num_frames {
            let start = t * self.hop_length;
            let segment = &signal[start..start + self.win_length];
            self.analyze_frame(segment, &mut scratch, spectrogram.frame_mut(t));
        }

        spectrogram
    }

    /// Inverse transform with window-squared normalized overlap-add
    pub fn inverse(&self, spectrogram: &Spectrogram) -> Vec<f32> {
        let num_frames = spectrogram.num_frames();
        let out_len = self.output_len(num_frames);
        let mut output = vec![0.0f32; out_len];
        let mut weight = vec![0.0f32; out_len];
        let mut scratch = self.synthesis_scratch();

        for t in 0..num_frames {
            let start = t * self.hop_length;
            let frame = self.synthesize_frame(spectrogram.frame(t), &mut scratch);

            let span = start..start + self.win_length;
            for ((out, wsum), (&sample, &w2)) in output[span.clone()]
                .iter_mut()
                .zip(&mut weight[span])
                .zip(frame.iter().zip(&self.window_sq))
            {
                *out += sample;
                *wsum += w2;
            }
        }

        normalize_overlap_add(&mut output, &weight);
        output
    }
}

/// Divide by the accumulated window², substituting 1.0 below the floor
pub fn normalize_overlap_add(output: &mut [f32], weight: &[f32]) {
    for (sample, &w) in output.iter_mut().zip(weight) {
        let norm = if w < WINDOW_SUM_FLOOR { 1.0 } else { w };
        *sample /= norm;
    }
}

//! # ubke-file
//!
//! Mono audio file I/O for the UBKE enhancer:
//!
//! - **Reading**: WAV (integer and float PCM) via hound, compressed formats
//!   via symphonia, downmixed to mono and checked against the expected rate
//! - **Writing**: 32-bit float mono WAV
//! - **Listing**: sorted `.wav` files of a directory
//!
//! ## Example
//!
//! ```rust,ignore
//! use ubke_file::{list_wavs, read_mono, write_wav};
//!
//! for path in list_wavs("data/noisy")? {
//!     let audio = read_mono(&path, 16000)?;
//!     write_wav("results/copy.wav", &audio.samples, audio.sample_rate)?;
//! }
//! ```

#![warn(missing_docs)]

pub mod loader;
pub mod writer;

mod error;

pub use error::{FileError, FileResult};
pub use loader::{MonoAudio, downmix, read_mono};
pub use writer::{list_wavs, write_wav};

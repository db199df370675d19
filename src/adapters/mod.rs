//! Adapters - concrete implementations of the port contracts

pub mod ffprobe;

pub use ffprobe::FfprobeAdapter;

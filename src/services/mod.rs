//! Completion capabilities module
//!
//! This module contains the optional collaborators used when a session
//! finishes: the chime and its audio output, and the confetti renderer.

pub mod audio;
pub mod celebration;

// Re-export main types
pub use audio::{system_audio, AudioError, AudioOutput, AudioProbe, AudioSlot, Chime, Note};
pub use celebration::{
    celebration_bursts, BurstConfig, CelebrationRenderer, ConfettiField, ConfettiLauncher,
};

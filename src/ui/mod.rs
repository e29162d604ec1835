//! Rendering. Every chart returns the user's click as a value instead of
//! mutating state; the app applies it and refreshes the views.

pub mod bar;
pub mod heatmap;
pub mod panels;
pub mod pie;

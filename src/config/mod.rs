//! Configuration module for Kartei.
//!
//! Handles loading and managing application settings.

mod settings;

pub use settings::{
    AnalysisSettings, AudioSettings, GenerationSettings, Settings, SpeechSettings, StoreSettings,
};

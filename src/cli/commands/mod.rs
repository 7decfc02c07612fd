//! CLI command implementations.

mod analyze;
mod audio;
mod build_deck;
mod config;
mod decks;
mod doctor;
mod fields;
mod generate;
mod session;

pub use analyze::run_analyze;
pub use audio::run_audio;
pub use build_deck::run_build_deck;
pub use config::run_config;
pub use decks::run_decks;
pub use doctor::run_doctor;
pub use fields::run_fields;
pub use generate::run_generate;
pub use session::run_session;

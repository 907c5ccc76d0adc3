//! Text-generation collaborator used by the narrative synthesizer.

pub mod client;
pub mod client_impl;
pub mod factory;
pub mod prompts;

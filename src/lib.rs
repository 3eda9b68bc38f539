//! Furniture and room image studio.
//!
//! A user picks one of five generation methods, the [`prompt`] compiler turns
//! the selection into an instruction for a multimodal image model, and the
//! [`studio::Studio`] orchestrator sends it through an [`ImageGenerator`]: either
//! the [`ProxyClient`] talking to this crate's HTTP [`server`], or the
//! [`GeminiClient`] the server itself uses.

pub mod config;
pub mod error;
pub mod generator;
pub mod input;
pub mod logger;
pub mod models;
pub mod prompt;
pub mod server;
pub mod studio;

pub use config::{Config, GeminiConfig};
pub use error::{Result, StudioError, ValidationError};
pub use generator::{GeminiClient, ImageGenerator, ProxyClient};
pub use models::{
    GenerationMethod, GenerationRequest, GenerationResult, ImagePayload, SpaceOption, StyleOption,
};
pub use prompt::{compile, CompiledPrompt, GenerationIntent, MethodParameters};
pub use studio::{Studio, StudioState};

use serde::Serialize;

use crate::models::{
    GenerationMethod, GenerationResult, ImagePayload, SpaceOption, StyleOption,
};
use crate::prompt::MethodParameters;

/// The whole session: inputs, selector state, results and status.
#[derive(Debug, Clone, Default, Serialize)]
pub struct StudioState {
    pub(crate) primary_image: Option<ImagePayload>,
    pub(crate) params: MethodParameters,
    pub(crate) history: Vec<GenerationResult>,
    pub(crate) in_flight: bool,
    pub(crate) error: Option<String>,
}

impl StudioState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_primary_image(mut self, image: ImagePayload) -> Self {
        self.primary_image = Some(image);
        self
    }

    pub fn with_params(mut self, params: MethodParameters) -> Self {
        self.params = params;
        self
    }

    pub fn set_primary_image(&mut self, image: Option<ImagePayload>) {
        self.primary_image = image;
    }

    pub fn select_method(&mut self, method: GenerationMethod) {
        self.params.method = method;
    }

    pub fn set_space(&mut self, space: SpaceOption) {
        self.params.space = space;
    }

    pub fn set_style(&mut self, style: StyleOption) {
        self.params.style = style;
    }

    pub fn set_custom_prompt(&mut self, text: impl Into<String>) {
        self.params.custom_prompt = text.into();
    }

    pub fn set_reference_image(&mut self, image: Option<ImagePayload>) {
        self.params.reference_image = image;
    }

    pub fn set_decoration_image(&mut self, image: Option<ImagePayload>) {
        self.params.decoration_image = image;
    }

    pub fn set_mask_image(&mut self, image: Option<ImagePayload>) {
        self.params.mask_image = image;
    }

    pub fn primary_image(&self) -> Option<&ImagePayload> {
        self.primary_image.as_ref()
    }

    pub fn params(&self) -> &MethodParameters {
        &self.params
    }

    pub fn method(&self) -> GenerationMethod {
        self.params.method
    }

    pub fn custom_prompt(&self) -> &str {
        &self.params.custom_prompt
    }

    /// Most recent first.
    pub fn history(&self) -> &[GenerationResult] {
        &self.history
    }

    pub fn latest(&self) -> Option<&GenerationResult> {
        self.history.first()
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Whether the generate control should be enabled.
    pub fn can_generate(&self) -> bool {
        !self.in_flight && self.primary_image.is_some() && self.params.is_complete()
    }
}

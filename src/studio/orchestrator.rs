use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::{
    error::{Result, ValidationError},
    generator::ImageGenerator,
    models::{GenerationRequest, GenerationResult},
    prompt,
};

use super::StudioState;

/// Runs generations against a shared [`StudioState`].
///
/// The state lock is only held for synchronous updates, never across the
/// remote call, so callers can observe `in_flight` while a request is pending.
#[derive(Clone)]
pub struct Studio {
    state: Arc<Mutex<StudioState>>,
    generator: Arc<dyn ImageGenerator>,
}

/// Clears the in-flight flag when dropped, whatever way the generation ends.
struct InFlight<'a> {
    state: &'a Mutex<StudioState>,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        lock(self.state).in_flight = false;
    }
}

fn lock(state: &Mutex<StudioState>) -> MutexGuard<'_, StudioState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

impl Studio {
    pub fn new(generator: Arc<dyn ImageGenerator>) -> Self {
        Self::with_state(StudioState::default(), generator)
    }

    pub fn with_state(state: StudioState, generator: Arc<dyn ImageGenerator>) -> Self {
        Self {
            state: Arc::new(Mutex::new(state)),
            generator,
        }
    }

    /// Applies a synchronous change to the session state.
    pub fn update<R>(&self, f: impl FnOnce(&mut StudioState) -> R) -> R {
        f(&mut lock(&self.state))
    }

    pub fn snapshot(&self) -> StudioState {
        lock(&self.state).clone()
    }

    pub fn can_generate(&self) -> bool {
        lock(&self.state).can_generate()
    }

    /// Validates the current inputs, calls the generator once and records the outcome.
    ///
    /// Overlapping calls on the same session are not supported; callers gate
    /// on [`Studio::can_generate`].
    pub async fn generate(&self) -> Result<GenerationResult> {
        let (request, method, consumes_custom_prompt) = {
            let mut state = lock(&self.state);
            let prepared = state
                .primary_image
                .clone()
                .ok_or(ValidationError::MissingPrimaryImage)
                .and_then(|primary| prompt::compile(&state.params).map(|compiled| (primary, compiled)));

            let (primary, compiled) = match prepared {
                Ok(prepared) => prepared,
                Err(e) => {
                    log::warn!("Generation rejected: {}", e);
                    state.error = Some(e.to_string());
                    return Err(e.into());
                }
            };

            state.in_flight = true;
            state.error = None;
            (
                GenerationRequest::new(primary, compiled.prompt, compiled.secondary_image),
                compiled.method,
                compiled.consumes_custom_prompt,
            )
        };
        let _in_flight = InFlight { state: &self.state };

        log::info!(
            "Starting {} generation via {} (secondary image: {})",
            method,
            self.generator.name(),
            request.secondary_image.is_some()
        );

        match self.generator.generate(&request).await {
            Ok(image) => {
                let result = GenerationResult::new(image, method);
                let mut state = lock(&self.state);
                state.history.insert(0, result.clone());
                if consumes_custom_prompt {
                    state.params.custom_prompt.clear();
                }
                log::info!(
                    "Generation {} finished, history now holds {} image(s)",
                    result.id,
                    state.history.len()
                );
                Ok(result)
            }
            Err(e) => {
                log::error!("Generation failed: {}", e);
                lock(&self.state).error = Some(e.user_message());
                Err(e)
            }
        }
    }

    pub fn clear_error(&self) {
        lock(&self.state).error = None;
    }
}

impl std::fmt::Debug for Studio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Studio")
            .field("generator", &self.generator.name())
            .finish_non_exhaustive()
    }
}

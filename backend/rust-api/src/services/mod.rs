use std::sync::Arc;

use crate::config::Config;

use self::completion_client::{CompletionClient, OpenAiClient};
use self::exercise_service::ExerciseService;
use self::hint_service::HintService;

pub struct AppState {
    pub config: Config,
    pub completion: Arc<dyn CompletionClient>,
}

impl AppState {
    /// Production state: OpenAI client built from the configuration.
    pub fn new(config: Config) -> Self {
        let completion: Arc<dyn CompletionClient> = Arc::new(OpenAiClient::new(
            config.openai_api_key.clone(),
            config.openai_base_url.clone(),
        ));

        Self::with_client(config, completion)
    }

    /// State with an explicit completion client (fakes in tests).
    pub fn with_client(config: Config, completion: Arc<dyn CompletionClient>) -> Self {
        Self { config, completion }
    }

    pub fn hint_service(&self) -> HintService {
        HintService::new(self.completion.clone(), self.config.openai_model.clone())
    }

    pub fn exercise_service(&self) -> ExerciseService {
        ExerciseService::new(self.completion.clone(), self.config.openai_model.clone())
    }
}

pub mod completion_client;
pub mod exercise_service;
pub mod fallback;
pub mod hint_service;
pub mod prompts;

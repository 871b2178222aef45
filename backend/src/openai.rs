use async_openai::{
    Client,
    config::OpenAIConfig,
    error::OpenAIError,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs,
    },
};
use async_trait::async_trait;
use shared::models::Character;
use thiserror::Error;

/// Gemini's OpenAI-compatible endpoint.
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/openai";
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

#[derive(Clone, Debug, PartialEq)]
pub struct GeneratorConfig {
    pub api_key: String,
    pub api_base: String,
    pub model: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_base: DEFAULT_API_BASE.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }
}

#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("OpenAI error: {0}")]
    OpenAI(#[from] OpenAIError),
    #[error("Model returned no content")]
    EmptyReply,
}

/// Produces a batch of stock phrases for a character.
#[async_trait]
pub trait GreetingGenerator: Send + Sync {
    async fn generate(&self, character: &Character) -> Result<Vec<String>, GenerationError>;
}

pub struct OpenAiGenerator {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiGenerator {
    pub fn new(config: GeneratorConfig) -> Self {
        let openai_config = OpenAIConfig::new()
            .with_api_key(config.api_key)
            .with_api_base(config.api_base);

        Self {
            client: Client::with_config(openai_config),
            model: config.model,
        }
    }
}

#[async_trait]
impl GreetingGenerator for OpenAiGenerator {
    async fn generate(&self, character: &Character) -> Result<Vec<String>, GenerationError> {
        let prompt = ChatCompletionRequestUserMessageArgs::default()
            .content(build_prompt(character))
            .build()?;
        let request = CreateChatCompletionRequestArgs::default()
            .model(self.model.clone())
            .messages(vec![ChatCompletionRequestMessage::User(prompt)])
            .build()?;

        tracing::debug!("Requesting greetings for character {}", character.id);
        let response = self.client.chat().create(request).await?;
        let text = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(GenerationError::EmptyReply)?;

        Ok(parse_phrases(&text))
    }
}

pub fn build_prompt(character: &Character) -> String {
    format!(
        "I am writing a video game in the style of The Witcher. I have an npc named {} who is {} years old. \
         They are a {} who has a {} personality. Please generate a python style list of 10 stock phrases \
         they might use when the main character talks to them. Please Return just the list without a \
         variable name and square brackets.",
        character.name, character.age, character.occupation, character.personality
    )
}

/// Splits the model reply into lines and drops the last one, which the model
/// leaves empty or as a trailing artifact.
pub fn parse_phrases(reply: &str) -> Vec<String> {
    let mut lines: Vec<String> = reply.split('\n').map(str::to_string).collect();
    lines.pop();
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geralt() -> Character {
        Character {
            id: 1,
            name: "Geralt".to_string(),
            age: 95,
            occupation: "witcher".to_string(),
            personality: "stoic".to_string(),
        }
    }

    #[test]
    fn prompt_embeds_character_attributes() {
        let prompt = build_prompt(&geralt());
        assert!(prompt.contains("named Geralt who is 95 years old"));
        assert!(prompt.contains("They are a witcher who has a stoic personality"));
        assert!(prompt.contains("10 stock phrases"));
        assert!(prompt.contains("without a variable name and square brackets"));
    }

    #[test]
    fn drops_trailing_line() {
        let reply = "\"Hmm.\",\n\"Wind's howling.\"\n";
        assert_eq!(parse_phrases(reply), vec!["\"Hmm.\",", "\"Wind's howling.\""]);

        let reply = "\"Hmm.\"\n\"Wind's howling.\"";
        assert_eq!(parse_phrases(reply), vec!["\"Hmm.\""]);
    }

    #[test]
    fn empty_reply_yields_no_phrases() {
        assert!(parse_phrases("").is_empty());
        assert!(parse_phrases("single line").is_empty());
    }

    #[test]
    fn default_config_targets_gemini() {
        let config = GeneratorConfig::default();
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.api_base, DEFAULT_API_BASE);
        assert!(config.api_key.is_empty());
    }
}

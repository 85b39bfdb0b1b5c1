use secrecy::SecretString;

use crate::SuggestError;

#[derive(Clone, Debug)]
pub struct Config {
    pub api_key: SecretString,
    pub base_url: String,
    pub model: String,
}

impl Config {
    pub fn from_env() -> Result<Self, SuggestError> {
        Self::from_env_with(|k| std::env::var(k).ok())
    }

    /// Testable helper that reads configuration values using the provided
    /// function, avoiding global environment mutation in tests.
    pub fn from_env_with<F>(mut get: F) -> Result<Self, SuggestError>
    where
        F: FnMut(&str) -> Option<String>,
    {
        let api_key = get("DRAGONFEED_GENERATION_API_KEY")
            .ok_or_else(|| SuggestError::Config("DRAGONFEED_GENERATION_API_KEY missing".into()))?;
        let base_url = get("DRAGONFEED_GENERATION_URL")
            .ok_or_else(|| SuggestError::Config("DRAGONFEED_GENERATION_URL missing".into()))?;
        let model =
            get("DRAGONFEED_GENERATION_MODEL").unwrap_or_else(|| "gemini-2.0-flash".into());
        Ok(Self {
            api_key: SecretString::new(api_key.into()),
            base_url,
            model,
        })
    }
}

//! Voice pipeline configuration.
//!
//! The speech transport (telephony, STT, TTS, turn detection) is hosted by
//! an external runtime; this module only carries the knobs that runtime
//! needs: model identifiers, platform credentials, and the system prompt.

use std::env;

/// The system prompt handed to the language model for every call.
///
/// Voice output goes straight to a TTS engine, so the prompt forbids
/// markdown and symbols the engine would read aloud.
const PHONE_OPERATOR_PROMPT: &str = "You are a helpful inbound call assistant for an inventory management system. \
Speak naturally like a phone operator. Do not use any special formatting or symbols. \
Never use asterisks or stars in your responses.\n\
\n\
You can help users:\n\
- List items by category (drinks, snacks, biscuits)\n\
- Check stock availability for items and give details about variants like quantity and price\n\
- Add items to cart with pricing calculations\n\
- Show current cart contents and total price\n\
- Complete purchase and confirm final order\n\
\n\
When users ask about categories or types of items, use the list_category_items function. \
When they want specific item details, use the get_stock_info function. \
When they want to buy something, use the add_to_cart function.\n\
\n\
Important formatting rules:\n\
- Never use asterisks (*) or stars in any responses\n\
- Never use markdown or text formatting\n\
- Just use plain text like a normal phone conversation\n\
- When listing variants, use simple text with commas or newlines\n\
- Speak naturally as if you're having a phone conversation";

/// Opening instruction for the first model turn of a call.
const GREETING_PROMPT: &str = "Greet the user. Ask how you can help them today with \
inventory management. Mention that you can help them check stock, add items to cart, \
and complete purchases.";

/// Model and credential settings for one voice session.
#[derive(Clone, Debug)]
pub struct SessionConfig {
    /// Speech-to-text model identifier.
    pub stt_model: String,
    /// Language model identifier.
    pub llm_model: String,
    /// Text-to-speech voice identifier.
    pub tts_model: String,
    /// API key for the speech platform (STT/TTS), when configured.
    pub speech_api_key: Option<String>,
    /// API key for the language-model platform, when configured.
    pub llm_api_key: Option<String>,
    /// Directory for session event logs.
    pub log_dir: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            stt_model: "nova-2".to_string(),
            llm_model: "moonshotai/kimi-k2-instruct".to_string(),
            tts_model: "aura-luna-en".to_string(),
            speech_api_key: None,
            llm_api_key: None,
            log_dir: "chat_logs".to_string(),
        }
    }
}

impl SessionConfig {
    /// Load settings from environment variables, falling back to defaults.
    ///
    /// Recognized variables: `STT_MODEL`, `LLM_MODEL`, `TTS_MODEL`,
    /// `DEEPGRAM_API_KEY`, `GROQ_API_KEY`, `CHAT_LOG_DIR`.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(value) = env::var("STT_MODEL") {
            config.stt_model = value;
        }
        if let Ok(value) = env::var("LLM_MODEL") {
            config.llm_model = value;
        }
        if let Ok(value) = env::var("TTS_MODEL") {
            config.tts_model = value;
        }
        config.speech_api_key = env::var("DEEPGRAM_API_KEY").ok();
        config.llm_api_key = env::var("GROQ_API_KEY").ok();
        if let Ok(value) = env::var("CHAT_LOG_DIR") {
            config.log_dir = value;
        }
        config
    }

    /// The phone-operator system prompt.
    #[must_use]
    pub const fn instructions() -> &'static str {
        PHONE_OPERATOR_PROMPT
    }

    /// Instruction for the greeting turn that opens a call.
    #[must_use]
    pub const fn greeting_instructions() -> &'static str {
        GREETING_PROMPT
    }
}

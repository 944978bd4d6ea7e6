use serde::Serialize;

/// Conservative window for models we have no entry for.
pub const DEFAULT_CONTEXT_WINDOW: u32 = 4096;

/// Approximate context windows for common model families. Matched by
/// case-insensitive substring so tag variants ("llama3.2:3b-instruct-q4")
/// resolve to their family entry.
const MODEL_LIMITS: &[(&str, u32)] = &[
    ("llama3.2:3b", 8192),
    ("llama3.2:1b", 8192),
    ("llama3.1:8b", 8192),
    ("llama3.1:70b", 8192),
    ("codellama:7b", 16384),
    ("mistral:7b", 8192),
    ("phi3:3.8b", 4096),
];

/// Result of a pre-flight prompt size check against a model's window.
#[derive(Debug, Clone, Serialize)]
pub struct FitCheck {
    pub estimated_tokens: u32,
    pub context_limit: u32,
    pub fits: bool,
    pub usage_percent: f64,
    pub tokens_remaining: i64,
}

/// Token estimation for local models. Both formulas here are rough
/// approximations and are never a substitute for real usage counts.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenEstimator;

impl TokenEstimator {
    pub fn new() -> Self {
        Self
    }

    /// Rough pre-flight estimate: 1 token ≈ 4 characters for English text.
    pub fn estimate(&self, text: &str) -> u32 {
        (text.chars().count() / 4) as u32
    }

    /// Post-generation estimate from word count: tokens ≈ words / 0.75.
    /// Used for accounting once generated text exists; intentionally a
    /// different formula than `estimate`, which only sees raw prompt text.
    pub fn estimate_from_words(&self, text: &str) -> u32 {
        let words = text.split_whitespace().count() as u32;
        words * 4 / 3
    }

    /// Context window size for a model, falling back to a conservative
    /// default when the family is unknown.
    pub fn context_window(&self, model_id: &str) -> u32 {
        let lower = model_id.to_lowercase();
        MODEL_LIMITS
            .iter()
            .find(|(pattern, _)| lower.contains(pattern))
            .map(|(_, limit)| *limit)
            .unwrap_or(DEFAULT_CONTEXT_WINDOW)
    }

    /// Check whether `text` fits in the model's window, keeping 20% of the
    /// window free for the response.
    pub fn check_fit(&self, model_id: &str, text: &str) -> FitCheck {
        let estimated_tokens = self.estimate(text);
        let context_limit = self.context_window(model_id);

        FitCheck {
            estimated_tokens,
            context_limit,
            fits: (estimated_tokens as f64) < context_limit as f64 * 0.8,
            usage_percent: estimated_tokens as f64 / context_limit as f64 * 100.0,
            tokens_remaining: context_limit as i64 - estimated_tokens as i64,
        }
    }
}

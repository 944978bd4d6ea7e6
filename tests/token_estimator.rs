#[cfg(test)]
mod tests {
    use ollie::tokens::{TokenEstimator, DEFAULT_CONTEXT_WINDOW};

    #[test]
    fn test_character_estimate() {
        let estimator = TokenEstimator::new();
        assert_eq!(estimator.estimate(""), 0);
        assert_eq!(estimator.estimate("abcdefgh"), 2);
        assert_eq!(estimator.estimate(&"x".repeat(4000)), 1000);
        // Integer division rounds down
        assert_eq!(estimator.estimate("abc"), 0);
    }

    #[test]
    fn test_word_estimate() {
        let estimator = TokenEstimator::new();
        assert_eq!(estimator.estimate_from_words(""), 0);
        // tokens ≈ words / 0.75
        assert_eq!(estimator.estimate_from_words("one two three"), 4);
        assert_eq!(estimator.estimate_from_words("a b c d e f"), 8);
    }

    #[test]
    fn test_formulas_diverge() {
        // The two estimators intentionally disagree: one sees characters,
        // the other words.
        let estimator = TokenEstimator::new();
        let text = "hi hi hi hi";
        assert_eq!(estimator.estimate(text), 2);
        assert_eq!(estimator.estimate_from_words(text), 5);
    }

    #[test]
    fn test_context_window_lookup() {
        let estimator = TokenEstimator::new();
        assert_eq!(estimator.context_window("llama3.2:3b"), 8192);
        assert_eq!(estimator.context_window("codellama:7b"), 16384);
        assert_eq!(estimator.context_window("phi3:3.8b"), 4096);
        // Case-insensitive substring match covers tag variants
        assert_eq!(estimator.context_window("LLAMA3.2:3B"), 8192);
        assert_eq!(estimator.context_window("codellama:7b-instruct-q4"), 16384);
        // Unknown families get the conservative default
        assert_eq!(estimator.context_window("gemma:2b"), DEFAULT_CONTEXT_WINDOW);
    }

    #[test]
    fn test_check_fit_example() {
        // A 4000-character prompt against an 8192-token window
        let estimator = TokenEstimator::new();
        let check = estimator.check_fit("llama3.2:3b", &"y".repeat(4000));

        assert_eq!(check.estimated_tokens, 1000);
        assert_eq!(check.context_limit, 8192);
        assert!(check.fits);
        assert!((check.usage_percent - 12.2).abs() < 0.05);
        assert_eq!(check.tokens_remaining, 7192);
    }

    #[test]
    fn test_check_fit_reserves_response_headroom() {
        let estimator = TokenEstimator::new();
        // 0.8 * 4096 = 3276.8; an estimate of 3277 no longer fits even
        // though it is under the raw window.
        let check = estimator.check_fit("unknown-model", &"z".repeat(3277 * 4));
        assert_eq!(check.estimated_tokens, 3277);
        assert_eq!(check.context_limit, 4096);
        assert!(!check.fits);
        assert!(check.tokens_remaining > 0);
    }
}

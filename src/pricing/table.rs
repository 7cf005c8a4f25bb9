use std::collections::HashMap;
use std::sync::LazyLock;

use tracing::debug;

use super::types::TokenPricing;

/// Token prices keyed by exact model identifier (USD per million tokens)
static TOKEN_PRICES: LazyLock<HashMap<&'static str, TokenPricing>> = LazyLock::new(|| {
    HashMap::from([
        // Llama
        ("llama-3.1-8b-instant", TokenPricing::per_million(0.05, 0.08)),
        ("llama-3.3-70b-versatile", TokenPricing::per_million(0.59, 0.79)),
        ("llama3-8b-8192", TokenPricing::per_million(0.05, 0.08)),
        ("llama3-70b-8192", TokenPricing::per_million(0.59, 0.79)),
        ("llama-3.2-11b-vision-preview", TokenPricing::per_million(0.18, 0.18)),
        ("llama-3.2-90b-vision-preview", TokenPricing::per_million(0.90, 0.90)),
        (
            "meta-llama/llama-4-scout-17b-16e-instruct",
            TokenPricing::per_million(0.11, 0.34),
        ),
        (
            "meta-llama/llama-4-maverick-17b-128e-instruct",
            TokenPricing::per_million(0.20, 0.60),
        ),
        // Safety
        ("meta-llama/llama-guard-4-12b", TokenPricing::per_million(0.20, 0.20)),
        ("llama-guard-3-8b", TokenPricing::per_million(0.20, 0.20)),
        ("meta-llama/llama-prompt-guard-2-22m", TokenPricing::per_million(0.03, 0.03)),
        ("meta-llama/llama-prompt-guard-2-86m", TokenPricing::per_million(0.04, 0.04)),
        // Reasoning
        ("openai/gpt-oss-20b", TokenPricing::per_million(0.10, 0.50)),
        ("openai/gpt-oss-120b", TokenPricing::per_million(0.15, 0.75)),
        ("qwen/qwen3-32b", TokenPricing::per_million(0.29, 0.59)),
        ("qwen-qwq-32b", TokenPricing::per_million(0.29, 0.39)),
        ("deepseek-r1-distill-llama-70b", TokenPricing::per_million(0.75, 0.99)),
        // Other chat
        ("moonshotai/kimi-k2-instruct", TokenPricing::per_million(1.00, 3.00)),
        ("moonshotai/kimi-k2-instruct-0905", TokenPricing::per_million(1.00, 3.00)),
        ("gemma2-9b-it", TokenPricing::per_million(0.20, 0.20)),
        ("mistral-saba-24b", TokenPricing::per_million(0.79, 0.79)),
    ])
});

/// Token pricing for an exact model identifier; unknown models are free
pub fn token_pricing(model: &str) -> TokenPricing {
    match TOKEN_PRICES.get(model) {
        Some(pricing) => *pricing,
        None => {
            debug!("No token pricing for model \"{model}\"");
            TokenPricing::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn priced_models() -> Vec<&'static str> {
        let mut models: Vec<&'static str> = TOKEN_PRICES.keys().copied().collect();
        models.sort_unstable();
        models
    }

    #[test]
    fn known_model_is_priced_per_token() {
        let pricing = token_pricing("llama-3.3-70b-versatile");
        assert!((pricing.input - 0.59e-6).abs() < 1e-15);
        assert!((pricing.output - 0.79e-6).abs() < 1e-15);
    }

    #[test]
    fn unknown_model_is_free() {
        let pricing = token_pricing("groq/compound");
        assert!(pricing.is_free());
    }

    #[test]
    fn lookup_is_exact() {
        assert!(token_pricing("LLAMA-3.3-70B-VERSATILE").is_free());
        assert!(token_pricing("gpt-oss-120b").is_free());
    }

    #[test]
    fn every_price_is_non_negative() {
        for model in priced_models() {
            let p = token_pricing(model);
            assert!(p.input >= 0.0 && p.output >= 0.0, "{model}");
        }
    }
}

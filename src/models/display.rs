/// Provider namespaces dropped from display names
const PROVIDER_PREFIXES: &[&str] = &[
    "meta-llama/",
    "openai/",
    "groq/",
    "qwen/",
    "moonshotai/",
    "deepseek-ai/",
    "google/",
    "mistralai/",
];

/// Human-readable name for a model identifier, e.g.
/// `meta-llama/llama-4-scout-17b-16e-instruct` -> `Llama 4 Scout 17b 16e Instruct`
pub fn display_name(model_id: &str) -> String {
    let lower = model_id.to_ascii_lowercase();
    let stripped = PROVIDER_PREFIXES
        .iter()
        .find(|prefix| lower.starts_with(*prefix))
        .map_or(model_id, |prefix| &model_id[prefix.len()..]);

    stripped
        .replace(['-', '_', '/'], " ")
        .split_whitespace()
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

use crate::options::RewriteOptions;

/// Renders the rewrite instruction sent to the model. Pure: identical input
/// produces a byte-identical prompt. Returns `None` when the scenario is
/// empty after trimming, so callers refuse before touching the network.
pub fn build_rewrite_prompt(raw_text: &str, options: &RewriteOptions) -> Option<String> {
    let text = raw_text.trim();
    if text.is_empty() {
        return None;
    }

    Some(format!(
        "You are a world-class writing assistant.\n\
         Rewrite the user's message to improve clarity, tone, and impact.\n\
         \n\
         Constraints:\n\
         - Tone: {tone}\n\
         - Target audience: {audience}\n\
         - Desired length: {length}\n\
         - Goals: {goals}\n\
         - Preserve meaning; fix grammar; keep it natural.\n\
         - Offer exactly one improved version.\n\
         \n\
         User text:\n\
         \"\"\"{text}\"\"\"",
        tone = options.tone,
        audience = options.audience,
        length = options.length,
        goals = options.goals_string(),
    ))
}

use anyhow::{bail, Context, Result};

use crate::options::RewriteOptions;
use crate::prompt::build_rewrite_prompt;

/// Builds the rewrite prompt and posts it to a running server. Ctrl-C drops
/// the in-flight request; the server still runs the upstream call to
/// completion, it just has no one left to answer.
pub async fn run_rewrite(server: &str, text: &str, options: &RewriteOptions) -> Result<String> {
    let Some(prompt) = build_rewrite_prompt(text, options) else {
        bail!("Type a scenario first.");
    };

    tokio::select! {
        result = send_rewrite(server, &prompt) => result,
        _ = tokio::signal::ctrl_c() => bail!("Rewrite cancelled."),
    }
}

async fn send_rewrite(server: &str, prompt: &str) -> Result<String> {
    let url = format!("{}/api/rewrite", server.trim_end_matches('/'));

    let response = reqwest::Client::new()
        .post(&url)
        .json(&serde_json::json!({ "prompt": prompt }))
        .send()
        .await
        .with_context(|| format!("Failed to reach {url}"))?;

    let status = response.status();
    let body = response
        .text()
        .await
        .context("Failed to read rewrite response")?;

    if !status.is_success() {
        bail!(body);
    }
    Ok(body.trim().to_string())
}

//! Provider subsystem for model inference backends.
//!
//! Every backend implements the [`Provider`] trait defined in [`traits`] and is
//! constructed by [`create_provider`] from its canonical string key. All of the
//! supported backends speak the OpenAI-compatible chat completions API, so they
//! share [`compatible::OpenAiCompatibleProvider`].
//!
//! # Extension
//!
//! To add a provider, add a match arm in [`create_provider`] and an entry in
//! [`list_providers`].

pub mod compatible;
pub mod traits;

pub use compatible::OpenAiCompatibleProvider;
pub use traits::{ChatMessage, Provider};

const MAX_API_ERROR_CHARS: usize = 200;

const OLLAMA_BASE_URL: &str = "http://localhost:11434/v1";
const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

fn is_secret_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | ':')
}

fn token_end(input: &str, from: usize) -> usize {
    let mut end = from;
    for (i, c) in input[from..].char_indices() {
        if is_secret_char(c) {
            end = from + i + c.len_utf8();
        } else {
            break;
        }
    }
    end
}

/// Scrub known secret-like token prefixes from provider error strings.
///
/// Redacts tokens with prefixes like `sk-`, `xoxb-`, `xoxp-`, `ghp_`, `gho_`,
/// `ghu_`, and `github_pat_`.
pub fn scrub_secret_patterns(input: &str) -> String {
    const PREFIXES: [&str; 7] = [
        "sk-",
        "xoxb-",
        "xoxp-",
        "ghp_",
        "gho_",
        "ghu_",
        "github_pat_",
    ];

    let mut scrubbed = input.to_string();

    for prefix in PREFIXES {
        let mut search_from = 0;
        loop {
            let Some(rel) = scrubbed[search_from..].find(prefix) else {
                break;
            };

            let start = search_from + rel;
            let content_start = start + prefix.len();
            let end = token_end(&scrubbed, content_start);

            if end == content_start {
                search_from = content_start;
                continue;
            }

            scrubbed.replace_range(start..end, "[REDACTED]");
            search_from = start + "[REDACTED]".len();
        }
    }

    scrubbed
}

/// Sanitize API error text by scrubbing secrets and truncating length.
pub fn sanitize_api_error(input: &str) -> String {
    let scrubbed = scrub_secret_patterns(input);

    if scrubbed.chars().count() <= MAX_API_ERROR_CHARS {
        return scrubbed;
    }

    let mut end = MAX_API_ERROR_CHARS;
    while end > 0 && !scrubbed.is_char_boundary(end) {
        end -= 1;
    }

    format!("{}...", &scrubbed[..end])
}

/// Build a sanitized provider error from a failed HTTP response.
pub async fn api_error(provider: &str, response: reqwest::Response) -> anyhow::Error {
    let status = response.status();
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "<failed to read provider error body>".to_string());
    let sanitized = sanitize_api_error(&body);
    anyhow::anyhow!("{provider} API error ({status}): {sanitized}")
}

/// Resolve API key for a provider from config and environment variables.
fn resolve_provider_credential(name: &str, credential_override: Option<&str>) -> Option<String> {
    if let Some(raw_override) = credential_override {
        let trimmed_override = raw_override.trim();
        if !trimmed_override.is_empty() {
            return Some(trimmed_override.to_owned());
        }
    }

    let provider_env_candidates: &[&str] = match name {
        "openai" => &["OPENAI_API_KEY"],
        _ => &[],
    };

    for env_var in provider_env_candidates
        .iter()
        .chain(["TOOLCHAT_API_KEY", "API_KEY"].iter())
    {
        if let Ok(value) = std::env::var(env_var) {
            let value = value.trim();
            if !value.is_empty() {
                return Some(value.to_string());
            }
        }
    }

    None
}

/// Factory: create the provider named in config, with an optional base URL
/// override.
pub fn create_provider(
    name: &str,
    api_key: Option<&str>,
    api_url: Option<&str>,
) -> anyhow::Result<Box<dyn Provider>> {
    let resolved_credential = resolve_provider_credential(name, api_key);
    let key = resolved_credential.as_deref();
    let url_override = api_url.map(str::trim).filter(|u| !u.is_empty());

    match name {
        "ollama" => Ok(Box::new(OpenAiCompatibleProvider::new_keyless(
            "Ollama",
            url_override.unwrap_or(OLLAMA_BASE_URL),
            key,
        ))),
        "openai" => Ok(Box::new(OpenAiCompatibleProvider::new(
            "OpenAI",
            url_override.unwrap_or(OPENAI_BASE_URL),
            key,
        ))),
        name if name.starts_with("custom:") => {
            let base_url = name.strip_prefix("custom:").unwrap_or_default().trim();
            if base_url.is_empty() {
                anyhow::bail!(
                    "Custom provider requires a URL. Format: custom:https://your-api.com"
                );
            }
            let parsed = reqwest::Url::parse(base_url)
                .map_err(|e| anyhow::anyhow!("Invalid custom provider URL `{base_url}`: {e}"))?;
            if !matches!(parsed.scheme(), "http" | "https") {
                anyhow::bail!("Custom provider URL must use http or https: {base_url}");
            }
            Ok(Box::new(OpenAiCompatibleProvider::new_keyless(
                "Custom", base_url, key,
            )))
        }
        _ => anyhow::bail!(
            "Unknown provider: {name}. Use \"ollama\", \"openai\" or \"custom:<URL>\"."
        ),
    }
}

/// Information about a supported provider for display purposes.
pub struct ProviderInfo {
    /// Canonical name used in config (e.g. `"ollama"`)
    pub name: &'static str,
    /// Human-readable display name
    pub display_name: &'static str,
    /// Whether the provider runs locally (no API key required)
    pub local: bool,
}

/// Return the list of all known providers for display in `toolchat providers`.
pub fn list_providers() -> Vec<ProviderInfo> {
    vec![
        ProviderInfo {
            name: "ollama",
            display_name: "Ollama",
            local: true,
        },
        ProviderInfo {
            name: "openai",
            display_name: "OpenAI",
            local: false,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn factory_ollama_needs_no_key() {
        assert!(create_provider("ollama", None, None).is_ok());
    }

    #[test]
    fn factory_openai() {
        let p = create_provider("openai", Some("provider-test-credential"), None).unwrap();
        assert_eq!(p.name(), "OpenAI");
    }

    #[test]
    fn factory_custom_url() {
        let p = create_provider("custom:http://10.0.0.2:8080/v1", None, None).unwrap();
        assert_eq!(p.name(), "Custom");
    }

    #[test]
    fn factory_custom_requires_url() {
        let err = create_provider("custom:", None, None).err().unwrap();
        assert!(err.to_string().contains("requires a URL"));
    }

    #[test]
    fn factory_custom_rejects_other_schemes() {
        assert!(create_provider("custom:ftp://example.com", None, None).is_err());
        assert!(create_provider("custom:not a url", None, None).is_err());
    }

    #[test]
    fn factory_unknown_provider_errors() {
        let p = create_provider("nonexistent", None, None);
        let msg = p.err().unwrap().to_string();
        assert!(msg.contains("Unknown provider"));
    }

    #[test]
    fn factory_empty_name_errors() {
        assert!(create_provider("", None, None).is_err());
    }

    #[test]
    fn listed_providers_are_unique_and_constructible() {
        let mut seen = std::collections::HashSet::new();
        for provider in list_providers() {
            assert!(
                seen.insert(provider.name),
                "Duplicate canonical provider id: {}",
                provider.name
            );
            assert!(
                create_provider(provider.name, Some("provider-test-credential"), None).is_ok(),
                "Canonical provider id should be constructible: {}",
                provider.name
            );
        }
    }

    #[test]
    fn resolve_provider_credential_prefers_explicit_argument() {
        let resolved = resolve_provider_credential("openai", Some("  explicit-key  "));
        assert_eq!(resolved, Some("explicit-key".to_string()));
    }

    // ── API error sanitization ───────────────────────────────

    #[test]
    fn sanitize_scrubs_sk_prefix() {
        let input = "request failed: sk-1234567890abcdef";
        let out = sanitize_api_error(input);
        assert!(!out.contains("sk-1234567890abcdef"));
        assert!(out.contains("[REDACTED]"));
    }

    #[test]
    fn sanitize_scrubs_multiple_prefixes() {
        let input = "keys sk-abcdef xoxb-12345 xoxp-67890";
        let out = sanitize_api_error(input);
        assert!(!out.contains("sk-abcdef"));
        assert!(!out.contains("xoxb-12345"));
        assert!(!out.contains("xoxp-67890"));
    }

    #[test]
    fn sanitize_truncates_long_error() {
        let long = "a".repeat(400);
        let result = sanitize_api_error(&long);
        assert!(result.len() <= 203);
        assert!(result.ends_with("..."));
    }

    #[test]
    fn sanitize_no_secret_no_change() {
        let input = "simple upstream timeout";
        let result = sanitize_api_error(input);
        assert_eq!(result, input);
    }

    #[test]
    fn scrub_github_personal_access_token() {
        let input = "auth failed with token ghp_abc123def456";
        let result = scrub_secret_patterns(input);
        assert_eq!(result, "auth failed with token [REDACTED]");
    }

    #[test]
    fn scrub_github_fine_grained_pat() {
        let input = "failed: github_pat_11AABBC_xyzzy789";
        let result = scrub_secret_patterns(input);
        assert_eq!(result, "failed: [REDACTED]");
    }
}

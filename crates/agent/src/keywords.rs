//! Search keywords for a natural-language question.

use crate::prompt;
use tracing::{debug, warn};
use typescout_core::message::Message;
use typescout_core::reasoning::{ReasoningService, ResponseMode};
use typescout_index::fallback_keywords;

pub const MAX_KEYWORDS: usize = 15;

/// Ask the reasoning service for keywords, or tokenize the query locally
/// when there is no service, the call fails, or nothing usable comes back.
pub async fn extract_keywords(
    service: Option<&ReasoningService>,
    query: &str,
    max: usize,
) -> Vec<String> {
    let Some(service) = service else {
        return fallback(query, max);
    };

    let messages = [Message::user(prompt::keyword_extraction(query))];
    match service.respond(&messages, ResponseMode::Thinking).await {
        Ok(text) => {
            let keywords = parse_keyword_list(&text, max);
            if keywords.is_empty() {
                debug!("Keyword response was empty, tokenizing query");
                return fallback(query, max);
            }
            debug!(?keywords, "Extracted keywords");
            keywords
        }
        Err(e) => {
            warn!(error = %e, "Keyword extraction failed, tokenizing query");
            fallback(query, max)
        }
    }
}

/// Split a comma-separated reply into lowercase keywords of two or more
/// characters. Repeats are dropped so a keyword is scored once.
pub fn parse_keyword_list(text: &str, max: usize) -> Vec<String> {
    let mut keywords: Vec<String> = Vec::new();
    for raw in text.split([',', '\n']) {
        if keywords.len() >= max {
            break;
        }
        let keyword = raw
            .trim()
            .trim_matches(|c: char| matches!(c, '"' | '\'' | '`' | '.' | '-' | '*'))
            .trim()
            .to_lowercase();
        if keyword.chars().count() >= 2 && !keywords.contains(&keyword) {
            keywords.push(keyword);
        }
    }
    keywords
}

fn fallback(query: &str, max: usize) -> Vec<String> {
    let mut keywords = fallback_keywords(query);
    keywords.truncate(max);
    keywords
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::ScriptedCompleter;
    use std::sync::Arc;
    use typescout_core::error::ProviderError;

    #[test]
    fn parses_and_cleans() {
        assert_eq!(
            parse_keyword_list(" User, \"Auth\", a, login., auth,\n- email", 15),
            vec!["user", "auth", "login", "email"]
        );
    }

    #[test]
    fn respects_max() {
        assert_eq!(parse_keyword_list("aa, bb, cc, dd", 2), vec!["aa", "bb"]);
        assert!(parse_keyword_list("aa, bb", 0).is_empty());
    }

    #[test]
    fn repeats_are_kept_once() {
        assert_eq!(parse_keyword_list("auth, AUTH, login, auth", 15), vec!["auth", "login"]);
    }

    #[tokio::test]
    async fn without_service_tokenizes() {
        let keywords = extract_keywords(None, "How do I create a user?", MAX_KEYWORDS).await;
        assert!(keywords.contains(&"create".to_string()));
        assert!(keywords.contains(&"user".to_string()));
        assert!(!keywords.contains(&"how".to_string()));
    }

    #[tokio::test]
    async fn uses_service_reply() {
        let completer = Arc::new(ScriptedCompleter::new(["login, auth, credentials"]));
        let service = ReasoningService::Callable(completer.clone());
        let keywords = extract_keywords(Some(&service), "How do I log in?", MAX_KEYWORDS).await;
        assert_eq!(keywords, vec!["login", "auth", "credentials"]);
        assert!(completer.calls()[0].0.contains("Question: \"How do I log in?\""));
    }

    #[tokio::test]
    async fn falls_back_on_error_or_empty_reply() {
        let failing = ReasoningService::callable(ScriptedCompleter::failing(
            ProviderError::Network("down".into()),
        ));
        assert_eq!(
            extract_keywords(Some(&failing), "send email", MAX_KEYWORDS).await,
            vec!["send", "email"]
        );

        let empty = ReasoningService::callable(ScriptedCompleter::new([" , "]));
        assert_eq!(
            extract_keywords(Some(&empty), "send email", MAX_KEYWORDS).await,
            vec!["send", "email"]
        );
    }
}

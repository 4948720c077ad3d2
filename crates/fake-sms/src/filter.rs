//! Regular-expression filtering of message bodies.

use regex::Regex;

use crate::types::{Message, SmsError, SmsResult};

/// A compiled body filter. Matching is a search anywhere in the body,
/// not an anchored full match.
#[derive(Debug, Clone)]
pub struct MessageFilter {
    regex: Regex,
}

impl MessageFilter {
    pub fn new(pattern: &str) -> SmsResult<Self> {
        let regex = Regex::new(pattern).map_err(|e| SmsError::InvalidPattern {
            pattern: pattern.to_string(),
            message: e.to_string(),
        })?;
        Ok(Self { regex })
    }

    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }

    pub fn matches(&self, message: &Message) -> bool {
        self.regex.is_match(&message.body)
    }

    /// Messages whose body matches, in their original order.
    pub fn apply(&self, messages: &[Message]) -> Vec<Message> {
        messages
            .iter()
            .filter(|m| self.matches(m))
            .cloned()
            .collect()
    }

    /// Split into (matching, non-matching), each in original order.
    pub fn partition(&self, messages: Vec<Message>) -> (Vec<Message>, Vec<Message>) {
        messages.into_iter().partition(|m| self.matches(m))
    }
}

/// Compile `pattern` and keep the messages whose body matches it.
pub fn filter(pattern: &str, messages: &[Message]) -> SmsResult<Vec<Message>> {
    let filter = MessageFilter::new(pattern)?;
    let kept = filter.apply(messages);
    tracing::debug!(
        "Filter '{pattern}' kept {} of {} messages",
        kept.len(),
        messages.len()
    );
    Ok(kept)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inbox() -> Vec<Message> {
        vec![
            Message::new("Acme", "Your Acme code is 123456", "1 minute ago"),
            Message::new("Bank", "Transfer approved", "2 minutes ago"),
            Message::new("Shop", "Code: 987654. Do not share", "5 minutes ago"),
        ]
    }

    #[test]
    fn test_match_all_keeps_everything_in_order() {
        let messages = inbox();
        assert_eq!(filter(".*", &messages).unwrap(), messages);
    }

    #[test]
    fn test_search_is_unanchored() {
        let kept = filter(r"\d{6}", &inbox()).unwrap();
        let originators: Vec<&str> = kept.iter().map(|m| m.originator.as_str()).collect();
        assert_eq!(originators, vec!["Acme", "Shop"]);
    }

    #[test]
    fn test_invalid_pattern() {
        let err = filter("unparsablePattern(", &inbox()).unwrap_err();
        assert!(matches!(err, SmsError::InvalidPattern { ref pattern, .. } if pattern == "unparsablePattern("));
        assert!(matches!(
            filter("unparsablePattern(", &[]),
            Err(SmsError::InvalidPattern { .. })
        ));
    }

    #[test]
    fn test_partition() {
        let f = MessageFilter::new("(?i)code").unwrap();
        let (hit, miss) = f.partition(inbox());
        assert_eq!(hit.len(), 2);
        assert_eq!(miss, vec![Message::new("Bank", "Transfer approved", "2 minutes ago")]);
        assert_eq!(f.pattern(), "(?i)code");
    }
}

//! Extractor configuration.

use serde::{Deserialize, Serialize};

/// Markup markers that identify listing blocks and their parts.
///
/// Defaults match the tiketore.com search result markup:
///
/// ```html
/// <div class="list-ticket">
///   <a href="/ticket/55">Title</a>
///   <small><span class="badge">出品中</span></small>
/// </div>
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExtractorConfig {
    /// Class word that marks the start tag of a listing block.
    #[serde(default = "default_listing_class")]
    pub listing_class: String,

    /// Tag whose `href` is the listing link and whose text is the title.
    #[serde(default = "default_anchor_tag")]
    pub anchor_tag: String,

    /// Tag name of status badges.
    #[serde(default = "default_badge_tag")]
    pub badge_tag: String,

    /// Class word a badge tag must carry.
    #[serde(default = "default_badge_class")]
    pub badge_class: String,

    /// End tag that closes a listing block.
    #[serde(default = "default_closing_tag")]
    pub closing_tag: String,
}

fn default_listing_class() -> String {
    "list-ticket".to_string()
}

fn default_anchor_tag() -> String {
    "a".to_string()
}

fn default_badge_tag() -> String {
    "span".to_string()
}

fn default_badge_class() -> String {
    "badge".to_string()
}

fn default_closing_tag() -> String {
    "small".to_string()
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            listing_class: default_listing_class(),
            anchor_tag: default_anchor_tag(),
            badge_tag: default_badge_tag(),
            badge_class: default_badge_class(),
            closing_tag: default_closing_tag(),
        }
    }
}

impl ExtractorConfig {
    /// Lowercase tag names, since the tokenizer reports them lowercased.
    pub(crate) fn normalized(&self) -> Self {
        Self {
            listing_class: self.listing_class.clone(),
            anchor_tag: self.anchor_tag.to_ascii_lowercase(),
            badge_tag: self.badge_tag.to_ascii_lowercase(),
            badge_class: self.badge_class.clone(),
            closing_tag: self.closing_tag.to_ascii_lowercase(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ExtractorConfig::default();
        assert_eq!(config.listing_class, "list-ticket");
        assert_eq!(config.anchor_tag, "a");
        assert_eq!(config.badge_tag, "span");
        assert_eq!(config.badge_class, "badge");
        assert_eq!(config.closing_tag, "small");
    }

    #[test]
    fn test_deserialize_partial() {
        let toml = r#"
            listing_class = "offer"
            closing_tag = "footer"
        "#;
        let config: ExtractorConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.listing_class, "offer");
        assert_eq!(config.closing_tag, "footer");
        assert_eq!(config.anchor_tag, "a");
        assert_eq!(config.badge_class, "badge");
    }

    #[test]
    fn test_normalized_lowercases_tags_only() {
        let config = ExtractorConfig {
            listing_class: "List-Ticket".to_string(),
            anchor_tag: "A".to_string(),
            badge_tag: "SPAN".to_string(),
            badge_class: "Badge".to_string(),
            closing_tag: "Small".to_string(),
        };
        let normalized = config.normalized();
        assert_eq!(normalized.listing_class, "List-Ticket");
        assert_eq!(normalized.anchor_tag, "a");
        assert_eq!(normalized.badge_tag, "span");
        assert_eq!(normalized.badge_class, "Badge");
        assert_eq!(normalized.closing_tag, "small");
    }
}

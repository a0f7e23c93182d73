//! Tool definitions sent with a completion request
//!
//! Only server-side tools are modeled: the provider runs them and returns
//! their results inside the assistant turn, so no local execution loop is
//! needed.

use serde::{Deserialize, Serialize};

/// Name the model uses for the hosted web search tool
pub const WEB_SEARCH_TOOL_NAME: &str = "web_search";

/// A tool made available to the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ToolDefinition {
    /// Hosted web search
    #[serde(rename = "web_search_20250305")]
    WebSearch {
        /// Tool name, always `web_search`
        name: String,
        /// Upper bound on searches per request
        #[serde(skip_serializing_if = "Option::is_none")]
        max_uses: Option<u32>,
        /// Restrict results to these domains
        #[serde(skip_serializing_if = "Option::is_none")]
        allowed_domains: Option<Vec<String>>,
    },
}

impl ToolDefinition {
    /// Web search limited to `max_uses` searches per request
    pub fn web_search(max_uses: u32) -> Self {
        Self::WebSearch {
            name: WEB_SEARCH_TOOL_NAME.to_string(),
            max_uses: Some(max_uses),
            allowed_domains: None,
        }
    }

    /// Restrict a web search tool to the given domains
    pub fn with_allowed_domains<I, S>(self, domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        match self {
            Self::WebSearch { name, max_uses, .. } => Self::WebSearch {
                name,
                max_uses,
                allowed_domains: Some(domains.into_iter().map(Into::into).collect()),
            },
        }
    }

    /// Tool name as the model sees it
    pub fn name(&self) -> &str {
        match self {
            Self::WebSearch { name, .. } => name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_web_search_wire_format() {
        let tool = ToolDefinition::web_search(5);
        assert_eq!(
            serde_json::to_value(&tool).unwrap(),
            json!({"type": "web_search_20250305", "name": "web_search", "max_uses": 5})
        );
    }

    #[test]
    fn test_allowed_domains() {
        let tool = ToolDefinition::web_search(3).with_allowed_domains(["reuters.com", "sec.gov"]);
        let value = serde_json::to_value(&tool).unwrap();
        assert_eq!(value["allowed_domains"], json!(["reuters.com", "sec.gov"]));
        assert_eq!(tool.name(), "web_search");
    }
}

//! Robots.txt parser implementation
//!
//! This module wraps the robotstxt crate. The crawler's exclusion model is
//! host-wide: a host is excluded only when the root path itself is
//! disallowed for our user agent.

use robotstxt::DefaultMatcher;

/// Parsed robots.txt data
#[derive(Debug, Clone)]
pub struct ParsedRobots {
    /// Raw robots.txt content (empty string means allow all)
    content: String,
}

impl ParsedRobots {
    /// Creates a new ParsedRobots from raw robots.txt content
    pub fn from_content(content: &str) -> Self {
        Self {
            content: content.to_string(),
        }
    }

    /// Checks if a path is allowed for the given user agent
    fn is_allowed(&self, path: &str, user_agent: &str) -> bool {
        if self.content.is_empty() {
            return true;
        }

        let mut matcher = DefaultMatcher::default();
        matcher.one_agent_allowed_by_robots(&self.content, user_agent, path)
    }

    /// True when the whole host is off limits for this agent
    ///
    /// Only the root path is consulted; rules for deeper paths never exclude
    /// a host.
    pub fn disallows_root(&self, user_agent: &str) -> bool {
        !self.is_allowed("/", user_agent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disallow_all() {
        let robots = ParsedRobots::from_content("User-agent: *\nDisallow: /");
        assert!(robots.disallows_root("TestBot"));
    }

    #[test]
    fn test_path_rule_does_not_exclude_host() {
        let robots = ParsedRobots::from_content("User-agent: *\nDisallow: /admin");
        assert!(!robots.disallows_root("TestBot"));
    }

    #[test]
    fn test_disallow_root_with_later_allow() {
        // Root itself stays disallowed, so the host is excluded
        let robots = ParsedRobots::from_content("User-agent: *\nDisallow: /\nAllow: /public");
        assert!(robots.disallows_root("TestBot"));
    }

    #[test]
    fn test_root_disallow_for_other_agent() {
        let content = "User-agent: BadBot\nDisallow: /\n\nUser-agent: *\nAllow: /";
        let robots = ParsedRobots::from_content(content);
        assert!(!robots.disallows_root("GoodBot"));
        assert!(robots.disallows_root("BadBot"));
    }

    #[test]
    fn test_root_disallow_for_our_agent_only() {
        let content = "User-agent: SumiCrawl\nDisallow: /";
        let robots = ParsedRobots::from_content(content);
        assert!(robots.disallows_root("SumiCrawl"));
        assert!(!robots.disallows_root("OtherBot"));
    }

    #[test]
    fn test_empty_disallow_allows_everything() {
        let robots = ParsedRobots::from_content("User-agent: *\nDisallow:");
        assert!(!robots.disallows_root("TestBot"));
    }

    #[test]
    fn test_invalid_robots_txt() {
        let robots = ParsedRobots::from_content("This is not valid robots.txt {{{");
        assert!(!robots.disallows_root("TestBot"));
    }

    #[test]
    fn test_empty_robots_txt() {
        let robots = ParsedRobots::from_content("");
        assert!(!robots.disallows_root("TestBot"));
    }
}

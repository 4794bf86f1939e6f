//! Line tokenizer for journey documents.
//!
//! The grammar is deliberately tiny. Each line (after an optional leading `---` frontmatter
//! block, which is skipped) becomes exactly one token, checked in this order:
//!
//! | token        | shape                                              |
//! |--------------|----------------------------------------------------|
//! | `Heading`    | 1-6 `#` then whitespace then text                  |
//! | `Step`       | `N. description` optionally followed by `` → `path` `` |
//! | `NestedStep` | an indented `N. description`                       |
//! | `Label`      | `**Key:** value` (optionally behind a `- ` bullet)  |
//! | `Blank`      | whitespace only                                    |
//! | `Text`       | anything else                                      |

use crate::utils::split_frontmatter;
use once_cell::sync::Lazy;
use regex::Regex;

static STEP: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d+)\.\s+(.+?)(?:\s*→\s*`([^`]+)`)?\s*$").expect("step pattern")
});

static NESTED_STEP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s+\d+\.\s+(.+?)\s*$").expect("nested step pattern"));

static LABEL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?:[-*]\s+)?\*\*([A-Za-z][A-Za-z0-9 _-]*):\*\*\s*(.*?)\s*$")
        .expect("label pattern")
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token<'a> {
    Heading { level: usize, text: &'a str },
    Step { number: u32, description: &'a str, link: Option<&'a str> },
    NestedStep { description: &'a str },
    Label { key: &'a str, value: &'a str },
    Blank,
    Text(&'a str),
}

/// Tokenize a journey document line by line.
pub fn tokenize(content: &str) -> Vec<Token<'_>> {
    let body = split_frontmatter(content).map(|(_, body)| body).unwrap_or(content);
    body.lines().map(classify_line).collect()
}

fn classify_line(line: &str) -> Token<'_> {
    let line = line.trim_end_matches('\r');

    if let Some(heading) = heading(line) {
        return heading;
    }

    if let Some(caps) = STEP.captures(line) {
        let number = caps.get(1).and_then(|m| m.as_str().parse().ok()).unwrap_or(0);
        let description = caps.get(2).map_or("", |m| m.as_str().trim());
        let link = caps.get(3).map(|m| m.as_str().trim()).filter(|s| !s.is_empty());
        return Token::Step { number, description, link };
    }

    if let Some(caps) = NESTED_STEP.captures(line) {
        return Token::NestedStep { description: caps.get(1).map_or("", |m| m.as_str()) };
    }

    if let Some(caps) = LABEL.captures(line) {
        let key = caps.get(1).map_or("", |m| m.as_str().trim());
        let value = caps.get(2).map_or("", |m| m.as_str());
        return Token::Label { key, value };
    }

    if line.trim().is_empty() {
        Token::Blank
    } else {
        Token::Text(line.trim())
    }
}

// Heading detection: 1-6 '#' followed by whitespace, at column 0
fn heading(line: &str) -> Option<Token<'_>> {
    let level = line.chars().take_while(|&c| c == '#').count();
    if !(1..=6).contains(&level) {
        return None;
    }
    let rest = &line[level..];
    if !(rest.starts_with(' ') || rest.starts_with('\t')) {
        return None;
    }
    Some(Token::Heading { level, text: rest.trim() })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headings_need_whitespace_after_hashes() {
        assert_eq!(tokenize("# Journey: A")[0], Token::Heading { level: 1, text: "Journey: A" });
        assert_eq!(tokenize("## Steps")[0], Token::Heading { level: 2, text: "Steps" });
        assert_eq!(tokenize("#hashtag")[0], Token::Text("#hashtag"));
        assert_eq!(tokenize("####### seven")[0], Token::Text("####### seven"));
    }

    #[test]
    fn steps_with_and_without_links() {
        let tokens = tokenize("1. Open the app\n2. Sign up → `specs/auth/signup.feature`\n");
        assert_eq!(
            tokens[0],
            Token::Step { number: 1, description: "Open the app", link: None }
        );
        assert_eq!(
            tokens[1],
            Token::Step {
                number: 2,
                description: "Sign up",
                link: Some("specs/auth/signup.feature")
            }
        );
    }

    #[test]
    fn indented_numbered_lines_are_nested_steps() {
        let tokens = tokenize("1. Checkout\n   1. Pick a plan → `specs/billing/plan.feature`\n");
        assert!(matches!(tokens[0], Token::Step { number: 1, .. }));
        assert_eq!(
            tokens[1],
            Token::NestedStep { description: "Pick a plan → `specs/billing/plan.feature`" }
        );
    }

    #[test]
    fn labels_accept_bullets() {
        assert_eq!(
            tokenize("**Actor:** New user")[0],
            Token::Label { key: "Actor", value: "New user" }
        );
        assert_eq!(
            tokenize("- **Goal:**   Get started  ")[0],
            Token::Label { key: "Goal", value: "Get started" }
        );
    }

    #[test]
    fn frontmatter_is_skipped() {
        let tokens = tokenize("---\nsteps:\n  - a\n---\n# Journey: Simple\n");
        assert_eq!(tokens, vec![Token::Heading { level: 1, text: "Journey: Simple" }]);
    }

    #[test]
    fn blank_and_text_lines() {
        let tokens = tokenize("\n   \nSome prose.\r\n");
        assert_eq!(tokens, vec![Token::Blank, Token::Blank, Token::Text("Some prose.")]);
    }
}

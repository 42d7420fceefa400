//! Directive parsing: turns a model reply into an explicit instruction.
//!
//! Precedence:
//! 1. An `answer:` marker anywhere in the reply (any case) wins; the answer
//!    is everything after its first occurrence, trimmed.
//! 2. Otherwise the first line starting with `Action: name(args)` is the
//!    directive; later action lines are ignored.
//! 3. Otherwise the reply carries no directive.
//!
//! Arguments are split as one CSV record, so a quoted argument may contain
//! commas. Each argument is then trimmed of whitespace and surrounding quotes.

use regex::Regex;
use std::sync::LazyLock;

const ANSWER_MARKER: &str = "answer:";

static ACTION_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^Action:\s*(\w+)\s*\((.*?)\)").expect("action pattern is valid")
});

/// A tool invocation requested by the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionCall {
    /// Tool name as written by the model
    pub name: String,
    /// The raw text between the parentheses
    pub raw_args: String,
    /// Positional arguments after splitting and unquoting
    pub args: Vec<String>,
}

/// What a model reply asks the loop to do next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    /// Invoke a tool and feed its output back.
    Action(ActionCall),
    /// Stop with this answer.
    FinalAnswer(String),
    /// Neither marker was found.
    None,
}

/// Parse a model reply.
pub fn parse(text: &str) -> Directive {
    // ASCII lowercasing keeps byte offsets aligned with `text`.
    if let Some(idx) = text.to_ascii_lowercase().find(ANSWER_MARKER) {
        let answer = text[idx + ANSWER_MARKER.len()..].trim();
        return Directive::FinalAnswer(answer.to_string());
    }

    text.lines()
        .find_map(|line| ACTION_LINE.captures(line))
        .map(|caps| {
            let raw_args = caps[2].to_string();
            Directive::Action(ActionCall {
                name: caps[1].to_string(),
                args: split_arguments(&raw_args),
                raw_args,
            })
        })
        .unwrap_or(Directive::None)
}

/// Split a raw argument list into positional arguments.
pub fn split_arguments(raw: &str) -> Vec<String> {
    if raw.trim().is_empty() {
        return Vec::new();
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(raw.as_bytes());

    match reader.records().next() {
        Some(Ok(record)) => record.iter().map(clean_argument).collect(),
        _ => vec![clean_argument(raw)],
    }
}

fn clean_argument(arg: &str) -> String {
    arg.trim()
        .trim_matches(|c| c == '\'' || c == '"')
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn action(name: &str, args: &[&str]) -> (String, Vec<String>) {
        (
            name.to_string(),
            args.iter().map(|a| a.to_string()).collect(),
        )
    }

    fn expect_action(directive: Directive) -> (String, Vec<String>) {
        match directive {
            Directive::Action(call) => (call.name, call.args),
            other => panic!("expected an action, got {other:?}"),
        }
    }

    #[test]
    fn single_quoted_argument_is_unwrapped() {
        let parsed = expect_action(parse("Action: search('Lenovo Laptop')"));
        assert_eq!(parsed, action("search", &["Lenovo Laptop"]));
    }

    #[test]
    fn action_after_thought_lines() {
        let reply = "Thought: I should check the price.\nAction: search_price(\"Lenovo\")\nPAUSE";
        let parsed = expect_action(parse(reply));
        assert_eq!(parsed, action("search_price", &["Lenovo"]));
    }

    #[test]
    fn first_action_line_wins() {
        let reply = "Action: search_price(\"Lenovo\")\nAction: search_reviews(\"Dell\")";
        let parsed = expect_action(parse(reply));
        assert_eq!(parsed, action("search_price", &["Lenovo"]));
    }

    #[test]
    fn answer_marker_beats_action_line() {
        let reply = "Action: search_price(\"Lenovo\")\nAnswer: it costs $400";
        assert_eq!(parse(reply), Directive::FinalAnswer("it costs $400".into()));
    }

    #[test]
    fn answer_marker_in_any_case_beats_action_line() {
        assert_eq!(
            parse("Action: search_price('Lenovo')\nanswer: $400"),
            Directive::FinalAnswer("$400".into())
        );
        assert_eq!(
            parse("ANSWER: $400\nAction: search_reviews('Lenovo')"),
            Directive::FinalAnswer("$400\nAction: search_reviews('Lenovo')".into())
        );
    }

    #[test]
    fn answer_marker_is_case_insensitive_and_uses_first_occurrence() {
        assert_eq!(
            parse("FINAL ANSWER: $400. Previous answer: $300"),
            Directive::FinalAnswer("$400. Previous answer: $300".into())
        );
        assert_eq!(parse("answer:   42  \n"), Directive::FinalAnswer("42".into()));
    }

    #[test]
    fn answer_keeps_non_ascii_text_intact() {
        assert_eq!(
            parse("Ünïcode first. Answer: café €5"),
            Directive::FinalAnswer("café €5".into())
        );
    }

    #[test]
    fn free_text_has_no_directive() {
        assert_eq!(parse("thinking..."), Directive::None);
        assert_eq!(parse(""), Directive::None);
    }

    #[test]
    fn action_must_start_the_line() {
        assert_eq!(parse("Result: Action: search_price(\"Lenovo\")"), Directive::None);
    }

    #[test]
    fn empty_parentheses_yield_no_arguments() {
        let parsed = expect_action(parse("Action: ghost()\nPAUSE"));
        assert_eq!(parsed, action("ghost", &[]));
    }

    #[test]
    fn raw_arguments_are_kept() {
        match parse("Action: compare(\"Lenovo, Inc\", 'HP' )") {
            Directive::Action(call) => {
                assert_eq!(call.raw_args, "\"Lenovo, Inc\", 'HP' ");
                assert_eq!(call.args, vec!["Lenovo, Inc", "HP"]);
            }
            other => panic!("expected an action, got {other:?}"),
        }
    }

    #[test]
    fn non_ascii_tool_name() {
        let parsed = expect_action(parse("Action: prix_é('x')"));
        assert_eq!(parsed, action("prix_é", &["x"]));

        let parsed = expect_action(parse("Action: 検索(\"ノート\")"));
        assert_eq!(parsed, action("検索", &["ノート"]));
    }

    #[test]
    fn spacing_around_name_and_parentheses() {
        let parsed = expect_action(parse("Action:search_reviews  (Lenovo ThinkPad)"));
        assert_eq!(parsed, action("search_reviews", &["Lenovo ThinkPad"]));
    }

    #[test]
    fn split_unquoted_list() {
        assert_eq!(split_arguments("a, b ,c"), vec!["a", "b", "c"]);
        assert!(split_arguments("   ").is_empty());
    }
}

//! System prompt construction.
//!
//! The prompt teaches the model the Thought / Action / PAUSE / Observation /
//! Answer protocol and lists the registered tools.

use thoughtloop_core::tool::ToolRegistry;

/// Placeholder replaced with the tool listing.
pub const TOOLS_PLACEHOLDER: &str = "{tools}";

/// The protocol prompt used when no override is configured.
pub const DEFAULT_TEMPLATE: &str = r#"You run in a loop of Thought, Action, PAUSE, Observation.
At the end of the loop you output an Answer.
Use Thought to describe your thoughts about the question you have been asked.
Use Action to run one of the actions available to you, then return PAUSE.
Observation will be the result of running those actions.

Your available actions are:

{tools}

Example session:

Question: How much does a Lenovo laptop cost and what are the reviews?
Thought: I need both the price and the reviews. I will look up the price first.
Action: search_price("Lenovo")
PAUSE

You will be called again with this:

Observation: Price of Lenovo is $400

Thought: Now I need the reviews.
Action: search_reviews("Lenovo")
PAUSE

You will be called again with this:

Observation: Reviews of Lenovo are good

You then output:

Answer: A Lenovo laptop costs $400 and the reviews are good."#;

/// Render `name: description` entries in registration order, separated by blank lines.
pub fn tool_listing(tools: &ToolRegistry) -> String {
    tools
        .descriptions()
        .map(|(name, description)| format!("{name}: {description}"))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Build the system prompt from `template`, substituting the tool listing.
///
/// A template without the placeholder gets the listing appended.
pub fn render(template: &str, tools: &ToolRegistry) -> String {
    let listing = tool_listing(tools);
    if template.contains(TOOLS_PLACEHOLDER) {
        template.replace(TOOLS_PLACEHOLDER, &listing)
    } else if listing.is_empty() {
        template.to_string()
    } else {
        format!("{template}\n\nYour available actions are:\n\n{listing}")
    }
}

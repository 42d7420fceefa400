//! Built-in tool implementations for thoughtloop.
//!
//! The demo tools answer product questions (price, reviews) with canned
//! data; they exist to exercise the Thought / Action / Observation loop.

pub mod product_search;

use thoughtloop_core::tool::ToolRegistry;

pub use product_search::{SEARCH_PRICE, SEARCH_REVIEWS, SearchPriceTool, SearchReviewsTool};

/// Create a tool registry with all built-in tools, in listing order.
pub fn default_registry() -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(SEARCH_PRICE, SearchPriceTool);
    registry.register(SEARCH_REVIEWS, SearchReviewsTool);
    registry
}

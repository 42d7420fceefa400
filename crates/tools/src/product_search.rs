//! Product lookup tools returning canned price and review data.
//!
//! In production these would query a catalog or review service. The stubs
//! answer deterministically so the agent loop can be exercised end-to-end
//! without network access.

use async_trait::async_trait;
use thoughtloop_core::error::ToolError;
use thoughtloop_core::tool::Tool;

pub const SEARCH_PRICE: &str = "search_price";
pub const SEARCH_REVIEWS: &str = "search_reviews";

/// `search_price(brand)`: the price of a product.
pub struct SearchPriceTool;

/// `search_reviews(brand)`: the reviews of a product.
pub struct SearchReviewsTool;

/// Extract the single `brand` argument.
fn brand<'a>(tool_name: &str, args: &'a [String]) -> Result<&'a str, ToolError> {
    match args {
        [brand] => Ok(brand.as_str()),
        _ => Err(ToolError::InvalidArguments(format!(
            "{tool_name} takes exactly 1 argument (brand), got {}",
            args.len()
        ))),
    }
}

#[async_trait]
impl Tool for SearchPriceTool {
    fn description(&self) -> &str {
        "Search for the price of a product. Usage: search_price(brand)"
    }

    async fn invoke(&self, args: &[String]) -> Result<String, ToolError> {
        let brand = brand(SEARCH_PRICE, args)?;
        Ok(format!("Price of {brand} is $400"))
    }
}

#[async_trait]
impl Tool for SearchReviewsTool {
    fn description(&self) -> &str {
        "Search for the reviews of a product. Usage: search_reviews(brand)"
    }

    async fn invoke(&self, args: &[String]) -> Result<String, ToolError> {
        let brand = brand(SEARCH_REVIEWS, args)?;
        Ok(format!("Reviews of {brand} are good"))
    }
}

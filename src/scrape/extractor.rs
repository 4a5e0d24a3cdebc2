//! Product field extraction
//!
//! Product pages are matched with plain patterns over the raw markup rather
//! than a DOM walk: the proxy returns whatever the storefront rendered, and
//! the few fields needed sit in well-known regions with stable ids.
//!
//! Every field is extracted by its own pure function. A field that is absent
//! keeps its default; a field whose token is present but unusable is
//! reported as a [`FieldError`] without blocking the others.

use crate::state::{Availability, ProductRecord, RecordStatus};
use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

/// Marker present only on out-of-stock product pages
const OUT_OF_STOCK_MARKER: &str = r#"id="outOfStock""#;

/// Product detail region that holds the buy-box price
static PRODUCT_DETAIL_REGION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<div[^>]*id="ppd"[^>]*>([\s\S]*?)</div>\s*</div>\s*</div>"#)
        .expect("hardcoded regex pattern is valid")
});

static PRICE_WHOLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"class="a-price-whole">(.*?)<"#).expect("hardcoded regex pattern is valid")
});

/// Average customer reviews widget
static REVIEWS_REGION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<div[^>]*id="averageCustomerReviews"[^>]*>([\s\S]*?)</div>\s*</div>"#)
        .expect("hardcoded regex pattern is valid")
});

static REVIEW_COUNT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"id="acrCustomerReviewText"[^>]*>([\d,]+)\s+ratings?<"#)
        .expect("hardcoded regex pattern is valid")
});

static RATING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"class="a-icon-alt">([\d.]+) out of 5"#)
        .expect("hardcoded regex pattern is valid")
});

/// Best-sellers rank; searched over the whole page
static ELECTRONICS_RANK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)#([\d,]+)\s+in\s+Electronics").expect("hardcoded regex pattern is valid")
});

/// A field token that was found but could not be converted
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Extracts a product record from page markup
///
/// Never fails. Conversion problems are joined into an
/// `ExtractionError` status while every other field keeps what was found.
///
/// # Example
///
/// ```
/// use shelfwatch::scrape::extract_product;
/// use shelfwatch::Availability;
///
/// let html = r#"<div id="outOfStock">Currently unavailable.</div>"#;
/// let record = extract_product(html, "https://amazon.in/dp/B0001");
/// assert_eq!(record.availability, Availability::OutOfStock);
/// ```
pub fn extract_product(markup: &str, url: &str) -> ProductRecord {
    let mut errors = Vec::new();

    let mut record = ProductRecord::new(url, extract_availability(markup), RecordStatus::Success);
    record.price = extract_price(markup);

    if let Some(count) = keep(extract_review_count(markup), &mut errors) {
        record.review_count = count;
    }
    if let Some(rating) = keep(extract_rating(markup), &mut errors) {
        record.rating = rating;
    }
    record.category_rank = keep(extract_category_rank(markup), &mut errors);

    if !errors.is_empty() {
        let message = errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        record.status = RecordStatus::ExtractionError(message);
    }

    record
}

/// Collects a field error and falls back to "absent"
fn keep<T>(result: Result<Option<T>, FieldError>, errors: &mut Vec<FieldError>) -> Option<T> {
    result.unwrap_or_else(|e| {
        errors.push(e);
        None
    })
}

/// Out-of-stock marker present ⇒ `OutOfStock`, otherwise `InStock`
///
/// There is no unknown outcome: a page missing the marker for any reason,
/// including a partially rendered page, reads as in stock.
pub fn extract_availability(markup: &str) -> Availability {
    if markup.contains(OUT_OF_STOCK_MARKER) {
        Availability::OutOfStock
    } else {
        Availability::InStock
    }
}

/// Whole-unit price from the product detail region, separators removed
pub fn extract_price(markup: &str) -> Option<String> {
    let region = capture(&PRODUCT_DETAIL_REGION, markup)?;
    let token = capture(&PRICE_WHOLE, region)?;

    let price = strip_separators(token.trim());
    if price.is_empty() {
        None
    } else {
        Some(price)
    }
}

/// Number of ratings from the customer reviews region
pub fn extract_review_count(markup: &str) -> Result<Option<u64>, FieldError> {
    let Some(token) = capture(&REVIEWS_REGION, markup).and_then(|r| capture(&REVIEW_COUNT, r))
    else {
        return Ok(None);
    };

    strip_separators(token)
        .parse::<u64>()
        .map(Some)
        .map_err(|e| FieldError::new("reviews", format!("'{}' is not a count: {}", token, e)))
}

/// Average rating out of 5 from the customer reviews region
pub fn extract_rating(markup: &str) -> Result<Option<f64>, FieldError> {
    let Some(token) = capture(&REVIEWS_REGION, markup).and_then(|r| capture(&RATING, r)) else {
        return Ok(None);
    };

    let rating = token
        .parse::<f64>()
        .map_err(|e| FieldError::new("rating", format!("'{}' is not a number: {}", token, e)))?;

    if !(0.0..=5.0).contains(&rating) {
        return Err(FieldError::new("rating", format!("{} is outside 0-5", rating)));
    }

    Ok(Some(rating))
}

/// Rank in the Electronics category, anywhere on the page
pub fn extract_category_rank(markup: &str) -> Result<Option<u64>, FieldError> {
    let Some(token) = capture(&ELECTRONICS_RANK, markup) else {
        return Ok(None);
    };

    match strip_separators(token).parse::<u64>() {
        Ok(0) => Err(FieldError::new("rank", "rank must be positive")),
        Ok(rank) => Ok(Some(rank)),
        Err(e) => Err(FieldError::new("rank", format!("'{}' is not a rank: {}", token, e))),
    }
}

/// First capture group of the first match
fn capture<'a>(pattern: &Regex, haystack: &'a str) -> Option<&'a str> {
    pattern
        .captures(haystack)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

fn strip_separators(token: &str) -> String {
    token.replace(',', "")
}

#[cfg(test)]
mod tests {
    use super::*;

    const PRODUCT_PAGE: &str = r#"
<html><body>
<div id="dp-container">
  <div id="ppd" class="a-section">
    <div id="corePrice_feature_div">
      <span class="a-price"><span class="a-price-symbol">₹</span><span class="a-price-whole">1,299<span class="a-price-decimal">.</span></span></span>
    </div>
  </div>
  </div>
</div>
<div id="averageCustomerReviews" data-asin="B0C1234567">
  <span class="a-declarative"><i class="a-icon a-icon-star"><span class="a-icon-alt">4.3 out of 5 stars</span></i></span>
  <span id="acrCustomerReviewText" class="a-size-base">2,345 ratings</span>
</div>
</div>
<ul><li><span>Best Sellers Rank: #1,520 in Electronics (See Top 100)</span></li></ul>
</body></html>
"#;

    #[test]
    fn test_full_page() {
        let record = extract_product(PRODUCT_PAGE, "https://amazon.in/dp/B0C1234567");

        assert_eq!(record.url, "https://amazon.in/dp/B0C1234567");
        assert_eq!(record.availability, Availability::InStock);
        assert_eq!(record.price.as_deref(), Some("1299"));
        assert_eq!(record.review_count, 2345);
        assert_eq!(record.rating_cell(), "4.3");
        assert_eq!(record.category_rank, Some(1520));
        assert_eq!(record.status, RecordStatus::Success);
    }

    #[test]
    fn test_out_of_stock_marker_wins() {
        let html = format!(
            r#"{}<div id="outOfStock" class="a-box">Currently unavailable.</div>"#,
            PRODUCT_PAGE
        );
        let record = extract_product(&html, "u");

        assert_eq!(record.availability, Availability::OutOfStock);
        assert_eq!(record.price.as_deref(), Some("1299"));
    }

    #[test]
    fn test_empty_markup_defaults() {
        let record = extract_product("<html></html>", "u");

        assert_eq!(record.availability, Availability::InStock);
        assert_eq!(record.price, None);
        assert_eq!(record.review_count, 0);
        assert_eq!(record.rating, 0.0);
        assert_eq!(record.category_rank, None);
        assert_eq!(record.status, RecordStatus::Success);
        assert!(record.is_unpriced_in_stock());
    }

    #[test]
    fn test_price_scoped_to_product_detail_region() {
        let html = r#"<div id="sims"><span class="a-price-whole">99<span></span></div>"#;
        assert_eq!(extract_price(html), None);
    }

    #[test]
    fn test_price_scenario() {
        let html = r#"<div id="ppd"><div><span class="a-price-whole">1,299<span class="a-price-decimal">.</span></span></div></div></div>"#;
        assert_eq!(extract_price(html).as_deref(), Some("1299"));
    }

    #[test]
    fn test_blank_price_token_is_absent() {
        let html = r#"<div id="ppd"><div><span class="a-price-whole"> <span></span></div></div></div>"#;
        assert_eq!(extract_price(html), None);
    }

    #[test]
    fn test_reviews_scenario() {
        let html = r#"<div id="averageCustomerReviews"><span class="a-icon-alt">4.3 out of 5 stars</span><a><span id="acrCustomerReviewText" class="a-size-base">2,345 ratings</span></a></div></div>"#;

        assert_eq!(extract_review_count(html), Ok(Some(2345)));
        assert_eq!(extract_rating(html), Ok(Some(4.3)));
    }

    #[test]
    fn test_single_rating_text() {
        let html = r#"<div id="averageCustomerReviews"><span id="acrCustomerReviewText">1 rating</span></div></div>"#;
        assert_eq!(extract_review_count(html), Ok(Some(1)));
    }

    #[test]
    fn test_reviews_outside_region_ignored() {
        let html = r#"<span id="acrCustomerReviewText">77 ratings</span><span class="a-icon-alt">3.9 out of 5 stars</span>"#;
        assert_eq!(extract_review_count(html), Ok(None));
        assert_eq!(extract_rating(html), Ok(None));
    }

    #[test]
    fn test_rank_case_insensitive() {
        assert_eq!(
            extract_category_rank("Best Sellers Rank #12,004 in ELECTRONICS"),
            Ok(Some(12004))
        );
        assert_eq!(extract_category_rank("#3 in Home & Kitchen"), Ok(None));
    }

    #[test]
    fn test_malformed_rating_is_field_error() {
        let html = r#"<div id="averageCustomerReviews"><span class="a-icon-alt">4.3.1 out of 5 stars</span><span id="acrCustomerReviewText">12 ratings</span></div></div>"#;
        let record = extract_product(html, "u");

        assert_eq!(record.review_count, 12);
        assert_eq!(record.rating, 0.0);
        match record.status {
            RecordStatus::ExtractionError(message) => assert!(message.starts_with("rating:")),
            other => panic!("expected extraction error, got {:?}", other),
        }
    }

    #[test]
    fn test_rating_out_of_range() {
        let html = r#"<div id="averageCustomerReviews"><span class="a-icon-alt">7.5 out of 5 stars</span></div></div>"#;
        assert!(extract_rating(html).is_err());
    }

    #[test]
    fn test_zero_rank_is_field_error() {
        assert!(extract_category_rank("#0 in Electronics").is_err());
    }

    #[test]
    fn test_field_errors_do_not_block_each_other() {
        let html = format!(
            r#"{}<div id="averageCustomerReviews"><span class="a-icon-alt">9.9 out of 5</span></div></div>#0 in Electronics"#,
            r#"<div id="ppd"><div><span class="a-price-whole">450<span></span></div></div></div>"#
        );
        let record = extract_product(&html, "u");

        assert_eq!(record.price.as_deref(), Some("450"));
        assert_eq!(record.category_rank, None);
        match record.status {
            RecordStatus::ExtractionError(message) => {
                assert!(message.contains("rating:"));
                assert!(message.contains("rank:"));
            }
            other => panic!("expected extraction error, got {:?}", other),
        }
    }

    #[test]
    fn test_extraction_is_idempotent() {
        let first = extract_product(PRODUCT_PAGE, "u");
        let mut second = extract_product(PRODUCT_PAGE, "u");

        // Only the timestamp may differ between runs
        second.last_updated = first.last_updated;
        assert_eq!(first, second);
    }
}

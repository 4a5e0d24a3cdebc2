/// Normalizes a product URL taken from an input cell
///
/// # Normalization Steps
///
/// 1. Trim surrounding whitespace
/// 2. Prepend `https://` unless the value already starts with `http`
///
/// Nothing is rejected here. Whatever the cell holds is sent to the proxy,
/// and a URL the proxy cannot scrape fails through the normal retry path.
/// Query strings and fragments are kept: they are meaningful to the proxy.
///
/// # Examples
///
/// ```
/// use shelfwatch::url::normalize_product_url;
///
/// let url = normalize_product_url("  www.amazon.in/dp/B0C1234567 ");
/// assert_eq!(url, "https://www.amazon.in/dp/B0C1234567");
/// ```
pub fn normalize_product_url(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.starts_with("http") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    }
}

//! Export artifact naming.

use chrono::NaiveDate;

/// MIME type of every exported collage.
pub const EXPORT_MIME: &str = "image/jpeg";

/// File extension matching [`EXPORT_MIME`].
pub const EXPORT_EXTENSION: &str = "jpg";

/// Suggested file name for an export: `<product>-<YYYY-MM-DD>.jpg`.
pub fn export_file_name(product: &str, date: NaiveDate) -> String {
    let product = product.trim();
    let product = if product.is_empty() { "mosaic" } else { product };
    format!(
        "{product}-{}.{EXPORT_EXTENSION}",
        date.format("%Y-%m-%d")
    )
}

/// [`export_file_name`] for the current local date.
pub fn export_file_name_today(product: &str) -> String {
    export_file_name(product, chrono::Local::now().date_naive())
}

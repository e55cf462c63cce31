//! One-shot CLI search against the local index.

use crate::search::SearchIndex;
use anyhow::Result;

/// Runs a search and renders hits plus price buckets as plain text.
pub struct QueryCommand;

impl QueryCommand {
    pub fn execute(index: &SearchIndex, query: &str) -> Result<String> {
        let outcome = index.search(query)?;

        let mut out = String::new();

        if outcome.hits.is_empty() {
            out.push_str("No products matched.\n");
        } else {
            for hit in &outcome.hits {
                let name = hit.name.as_deref().unwrap_or("N/A");
                let price = hit
                    .prices
                    .first()
                    .map(|p| format!("{p:.2} TL"))
                    .unwrap_or_else(|| "N/A".to_string());
                let rating = hit.rating_count.as_deref().unwrap_or("N/A");
                out.push_str(&format!("{name}  |  {price}  |  rating count {rating}\n"));

                for (key, value) in &hit.attributes {
                    out.push_str(&format!(
                        "    {key}: {}\n",
                        value.as_deref().unwrap_or("N/A")
                    ));
                }
            }
        }

        out.push_str("\nPrice ranges:\n");
        for bucket in &outcome.buckets {
            out.push_str(&format!("  {:<12} {}\n", bucket.key, bucket.count));
        }

        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trendyol::models::{Attributes, Product};
    use tempfile::TempDir;

    #[test]
    fn test_query_output() {
        let dir = TempDir::new().unwrap();
        let index = SearchIndex::open_or_create(dir.path(), vec![50.0, 1000.0], 10).unwrap();
        index
            .bulk_index(&[Product {
                name: Some("Logitech G502".to_string()),
                prices: vec![1299.0],
                rating_count: Some("(321)".to_string()),
                attributes: Attributes::all_absent(),
            }])
            .unwrap();

        let out = QueryCommand::execute(&index, "Logitech").unwrap();
        assert!(out.contains("Logitech G502"));
        assert!(out.contains("1299.00 TL"));
        assert!(out.contains("1000-*"));
    }

    #[test]
    fn test_query_no_match() {
        let dir = TempDir::new().unwrap();
        let index = SearchIndex::open_or_create(dir.path(), vec![50.0, 1000.0], 10).unwrap();

        let out = QueryCommand::execute(&index, "nothing").unwrap();
        assert!(out.contains("No products matched"));
    }
}

//! Full-text product index built on Tantivy.
//!
//! Stores scraped products in an on-disk index and serves the one query
//! shape the UI needs: fuzzy keyword match over name (weighted) and rating
//! count, a `prices >= 0` filter, and fixed-boundary price-range buckets.
//!
//! The index carries a **generation** counter in its commit metadata. A
//! virgin index is generation 0; every bulk load or reindex bumps it. This
//! replaces filesystem flag files as the "already ingested" record and makes
//! re-indexing an explicit, externally queryable operation.

use crate::trendyol::models::Product;
use serde::Serialize;
use std::collections::BTreeMap;
use std::ops::Bound;
use std::path::Path;
use tantivy::collector::{Count, TopDocs};
use tantivy::directory::MmapDirectory;
use tantivy::query::{BooleanQuery, BoostQuery, FuzzyTermQuery, Occur, Query, RangeQuery, TermQuery};
use tantivy::schema::{
    Field, IndexRecordOption, NumericOptions, Schema, Value, STORED, STRING, TEXT,
};
use tantivy::{Index, IndexReader, IndexWriter, ReloadPolicy, TantivyDocument, Term};
use tracing::{debug, info};

const WRITER_BUFFER_BYTES: usize = 50_000_000;

/// Errors from index plumbing and queries.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("index error: {0}")]
    Index(#[from] tantivy::TantivyError),

    #[error("failed to open index directory: {0}")]
    OpenDirectory(#[from] tantivy::directory::error::OpenDirectoryError),

    #[error("failed to create index directory: {0}")]
    CreateDirectory(#[from] std::io::Error),
}

/// Schema field handles.
#[derive(Clone, Copy)]
struct Fields {
    name: Field,
    prices: Field,
    rating_count: Field,
    attributes: Field,
}

/// One search hit, projected from a stored document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit {
    pub name: Option<String>,
    pub prices: Vec<f64>,
    pub rating_count: Option<String>,
    pub attributes: BTreeMap<String, Option<String>>,
}

/// One price-range facet bucket.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceBucket {
    pub key: String,
    pub from: Option<f64>,
    pub to: Option<f64>,
    pub count: usize,
}

/// Hits plus facet buckets for one query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchOutcome {
    pub hits: Vec<SearchHit>,
    pub buckets: Vec<PriceBucket>,
}

/// The product search index. All methods take `&self`; share via `Arc`.
pub struct SearchIndex {
    index: Index,
    reader: IndexReader,
    fields: Fields,
    bucket_boundaries: Vec<f64>,
    max_hits: usize,
}

impl SearchIndex {
    /// Opens the index at `dir`, creating it with the product schema when
    /// the directory holds none. Never rewrites an existing schema.
    pub fn open_or_create(
        dir: &Path,
        bucket_boundaries: Vec<f64>,
        max_hits: usize,
    ) -> Result<Self, SearchError> {
        std::fs::create_dir_all(dir)?;

        let (schema, fields) = Self::build_schema();
        let directory = MmapDirectory::open(dir)?;
        let index = Index::open_or_create(directory, schema)?;

        let reader = index.reader_builder().reload_policy(ReloadPolicy::Manual).try_into()?;

        info!("Opened search index at {}", dir.display());

        Ok(Self { index, reader, fields, bucket_boundaries, max_hits })
    }

    fn build_schema() -> (Schema, Fields) {
        let mut builder = Schema::builder();

        let name = builder.add_text_field("name", TEXT | STORED);
        let prices = builder.add_f64_field(
            "prices",
            NumericOptions::default().set_stored().set_indexed().set_fast(),
        );
        // Exact-match keyword field, raw page text
        let rating_count = builder.add_text_field("rating_count", STRING | STORED);
        // Stored only: retrievable, never searchable
        let attributes = builder.add_text_field("attributes", STORED);

        let schema = builder.build();
        (schema, Fields { name, prices, rating_count, attributes })
    }

    /// Current index generation; 0 for a virgin index.
    pub fn generation(&self) -> Result<u64, SearchError> {
        let metas = self.index.load_metas()?;
        Ok(metas.payload.as_deref().and_then(|p| p.parse().ok()).unwrap_or(0))
    }

    /// Number of documents visible to searches.
    pub fn num_docs(&self) -> u64 {
        self.reader.searcher().num_docs()
    }

    /// Adds products as new documents (engine-assigned identity, no dedup)
    /// and commits with a bumped generation. Returns the count added.
    pub fn bulk_index(&self, products: &[Product]) -> Result<usize, SearchError> {
        let mut writer: IndexWriter = self.index.writer(WRITER_BUFFER_BYTES)?;
        self.commit_products(&mut writer, products)?;
        Ok(products.len())
    }

    /// Replaces every document with the given products. The explicit,
    /// auditable refresh: delete-all plus re-add under one commit.
    pub fn reindex(&self, products: &[Product]) -> Result<usize, SearchError> {
        let mut writer: IndexWriter = self.index.writer(WRITER_BUFFER_BYTES)?;
        writer.delete_all_documents()?;
        self.commit_products(&mut writer, products)?;
        Ok(products.len())
    }

    fn commit_products(
        &self,
        writer: &mut IndexWriter,
        products: &[Product],
    ) -> Result<(), SearchError> {
        for product in products {
            writer.add_document(self.to_document(product))?;
        }

        let next_generation = self.generation()? + 1;
        let mut prepared = writer.prepare_commit()?;
        prepared.set_payload(&next_generation.to_string());
        prepared.commit()?;
        self.reader.reload()?;

        info!("Committed {} documents at generation {}", products.len(), next_generation);
        Ok(())
    }

    fn to_document(&self, product: &Product) -> TantivyDocument {
        let mut doc = TantivyDocument::new();

        if let Some(name) = &product.name {
            doc.add_text(self.fields.name, name);
        }
        for price in &product.prices {
            doc.add_f64(self.fields.prices, *price);
        }
        if let Some(rating_count) = &product.rating_count {
            doc.add_text(self.fields.rating_count, rating_count);
        }
        doc.add_text(self.fields.attributes, product.attributes.to_stored_json().to_string());

        doc
    }

    /// Runs the canned query: fuzzy keyword match over name (boost x3) and
    /// rating count, filtered to `prices >= 0`, with top-N hits and price
    /// bucket counts. No matches is a normal outcome, not an error.
    pub fn search(&self, query_text: &str) -> Result<SearchOutcome, SearchError> {
        let searcher = self.reader.searcher();
        let query = self.build_query(query_text);

        let top_docs = searcher.search(&query, &TopDocs::with_limit(self.max_hits))?;

        debug!("Query {:?} matched {} hits", query_text, top_docs.len());

        let mut hits = Vec::with_capacity(top_docs.len());
        for (_score, address) in top_docs {
            let doc: TantivyDocument = searcher.doc(address)?;
            hits.push(self.to_hit(&doc));
        }

        let mut buckets = Vec::new();
        for (from, to) in bucket_ranges(&self.bucket_boundaries) {
            let bucket_query = BooleanQuery::new(vec![
                (Occur::Must, self.build_query(query_text)),
                (Occur::Must, Box::new(self.price_range_query(from, to))),
            ]);
            let count = searcher.search(&bucket_query, &Count)?;
            buckets.push(PriceBucket { key: bucket_key(from, to), from, to, count });
        }

        Ok(SearchOutcome { hits, buckets })
    }

    /// The fixed query shape. Per whitespace term: name term query (boosted)
    /// plus a fuzzy variant; plus exact/fuzzy match on the raw rating-count
    /// text; all intersected with the `prices >= 0` filter kept from the
    /// original flow.
    fn build_query(&self, query_text: &str) -> Box<dyn Query> {
        let mut should: Vec<(Occur, Box<dyn Query>)> = Vec::new();

        for token in query_text.split_whitespace() {
            let term = Term::from_field_text(self.fields.name, &token.to_lowercase());

            let exact = TermQuery::new(term.clone(), IndexRecordOption::WithFreqsAndPositions);
            should.push((Occur::Should, Box::new(BoostQuery::new(Box::new(exact), 3.0))));

            if token.len() >= 3 {
                let fuzzy = FuzzyTermQuery::new(term, 1, true);
                should.push((Occur::Should, Box::new(BoostQuery::new(Box::new(fuzzy), 3.0))));
            }
        }

        let trimmed = query_text.trim();
        if !trimmed.is_empty() {
            let rating_term = Term::from_field_text(self.fields.rating_count, trimmed);
            should.push((
                Occur::Should,
                Box::new(TermQuery::new(rating_term.clone(), IndexRecordOption::Basic)),
            ));
            if trimmed.len() >= 3 {
                should.push((Occur::Should, Box::new(FuzzyTermQuery::new(rating_term, 1, true))));
            }
        }

        Box::new(BooleanQuery::new(vec![
            (Occur::Must, Box::new(BooleanQuery::new(should)) as Box<dyn Query>),
            (Occur::Must, Box::new(self.price_range_query(Some(0.0), None))),
        ]))
    }

    fn price_range_query(&self, from: Option<f64>, to: Option<f64>) -> RangeQuery {
        let lower = match from {
            Some(v) => Bound::Included(Term::from_field_f64(self.fields.prices, v)),
            None => Bound::Unbounded,
        };
        let upper = match to {
            Some(v) => Bound::Excluded(Term::from_field_f64(self.fields.prices, v)),
            None => Bound::Unbounded,
        };
        RangeQuery::new(lower, upper)
    }

    fn to_hit(&self, doc: &TantivyDocument) -> SearchHit {
        let name = doc
            .get_first(self.fields.name)
            .and_then(|v| v.as_str())
            .map(String::from);

        let prices: Vec<f64> = doc.get_all(self.fields.prices).filter_map(|v| v.as_f64()).collect();

        let rating_count = doc
            .get_first(self.fields.rating_count)
            .and_then(|v| v.as_str())
            .map(String::from);

        let attributes = doc
            .get_first(self.fields.attributes)
            .and_then(|v| v.as_str())
            .and_then(|json| serde_json::from_str(json).ok())
            .unwrap_or_default();

        SearchHit { name, prices, rating_count, attributes }
    }
}

/// Expands ascending boundaries into half-open ranges with open ends,
/// e.g. `[50, 1000]` -> `(*, 50)`, `[50, 1000)`, `[1000, *)`.
fn bucket_ranges(boundaries: &[f64]) -> Vec<(Option<f64>, Option<f64>)> {
    let mut ranges = Vec::with_capacity(boundaries.len() + 1);
    let mut lower = None;
    for boundary in boundaries {
        ranges.push((lower, Some(*boundary)));
        lower = Some(*boundary);
    }
    ranges.push((lower, None));
    ranges
}

fn bucket_key(from: Option<f64>, to: Option<f64>) -> String {
    let fmt = |v: f64| {
        if v.fract() == 0.0 {
            format!("{v:.0}")
        } else {
            v.to_string()
        }
    };
    let lower = from.map_or_else(|| "*".to_string(), fmt);
    let upper = to.map_or_else(|| "*".to_string(), fmt);
    format!("{lower}-{upper}")
}

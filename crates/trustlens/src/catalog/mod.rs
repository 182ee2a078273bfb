mod parser;

use crate::assessment::{AuthorityRecord, Product, Review};
use parser::{AuthorityRow, ProductRow, ReviewRow};
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use tracing::info;

#[derive(Debug)]
pub enum CatalogImportError {
    Io {
        file: &'static str,
        source: std::io::Error,
    },
    Csv {
        file: &'static str,
        source: csv::Error,
    },
}

impl std::fmt::Display for CatalogImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogImportError::Io { file, source } => {
                write!(f, "failed to read {}: {}", file, source)
            }
            CatalogImportError::Csv { file, source } => {
                write!(f, "invalid data in {}: {}", file, source)
            }
        }
    }
}

impl std::error::Error for CatalogImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CatalogImportError::Io { source, .. } => Some(source),
            CatalogImportError::Csv { source, .. } => Some(source),
        }
    }
}

const PRODUCTS_FILE: &str = "products.csv";
const AUTHORITIES_FILE: &str = "authorities.csv";
const REVIEWS_FILE: &str = "reviews.csv";

/// Immutable product catalog with its authority records and review history,
/// loaded once from CSV exports and indexed by product id.
#[derive(Debug)]
pub struct Catalog {
    products: Vec<Product>,
    authorities: HashMap<String, AuthorityRecord>,
    reviews: HashMap<String, Vec<Review>>,
}

impl Catalog {
    /// Load `products.csv`, `authorities.csv`, and `reviews.csv` from a
    /// directory.
    pub fn from_dir<P: AsRef<Path>>(dir: P) -> Result<Self, CatalogImportError> {
        let dir = dir.as_ref();
        let products = open_file(dir, PRODUCTS_FILE)?;
        let authorities = open_file(dir, AUTHORITIES_FILE)?;
        let reviews = open_file(dir, REVIEWS_FILE)?;
        Self::from_readers(products, authorities, reviews)
    }

    pub fn from_readers<P: Read, A: Read, R: Read>(
        products: P,
        authorities: A,
        reviews: R,
    ) -> Result<Self, CatalogImportError> {
        let product_rows: Vec<ProductRow> =
            parser::parse_rows(products).map_err(|source| CatalogImportError::Csv {
                file: PRODUCTS_FILE,
                source,
            })?;
        let authority_rows: Vec<AuthorityRow> =
            parser::parse_rows(authorities).map_err(|source| CatalogImportError::Csv {
                file: AUTHORITIES_FILE,
                source,
            })?;
        let review_rows: Vec<ReviewRow> =
            parser::parse_rows(reviews).map_err(|source| CatalogImportError::Csv {
                file: REVIEWS_FILE,
                source,
            })?;

        let products: Vec<Product> = product_rows
            .into_iter()
            .map(|row| {
                let aliases = row.alias_list();
                Product {
                    id: row.product_id,
                    brand: row.brand,
                    name: row.name,
                    category: row.category,
                    aliases,
                }
            })
            .collect();

        let mut authorities = HashMap::new();
        for row in authority_rows {
            let record = AuthorityRecord {
                has_record: row.has_record != 0,
                has_cert: row.has_cert != 0,
                penalty_count: row.penalty_count,
                notice_url: row.notice_url,
                last_notice_date: row
                    .last_notice_date
                    .as_deref()
                    .and_then(parser::parse_date),
            };
            authorities.insert(row.product_id, record);
        }

        let mut reviews: HashMap<String, Vec<Review>> = HashMap::new();
        for row in review_rows {
            let review = Review {
                review_date: row.review_date.as_deref().and_then(parser::parse_date),
                rating: row.rating,
                reviewer_reputation: row.reviewer_reputation,
                evidence_url: row.evidence_url,
            };
            reviews.entry(row.product_id).or_default().push(review);
        }

        info!(
            products = products.len(),
            authorities = authorities.len(),
            reviews = reviews.values().map(Vec::len).sum::<usize>(),
            "catalog loaded"
        );

        Ok(Self {
            products,
            authorities,
            reviews,
        })
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Exact product-id lookup, case-insensitive.
    pub fn find_by_id(&self, id: &str) -> Option<&Product> {
        let needle = id.trim();
        self.products
            .iter()
            .find(|product| product.id.eq_ignore_ascii_case(needle))
    }

    /// Case-insensitive substring match across id, name, brand, and aliases,
    /// preserving catalog order. An empty query matches nothing.
    pub fn find_candidates(&self, query: &str) -> Vec<&Product> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }
        self.products
            .iter()
            .filter(|product| matches_query(product, &needle))
            .collect()
    }

    pub fn authority_for(&self, product_id: &str) -> Option<&AuthorityRecord> {
        self.authorities.get(product_id)
    }

    pub fn reviews_for(&self, product_id: &str) -> &[Review] {
        self.reviews
            .get(product_id)
            .map_or(&[] as &[Review], Vec::as_slice)
    }

    /// The most recent reviews for display, newest first, undated last.
    pub fn recent_reviews(&self, product_id: &str, limit: usize) -> Vec<&Review> {
        let mut recent: Vec<&Review> = self.reviews_for(product_id).iter().collect();
        recent.sort_by_key(|review| std::cmp::Reverse(review.review_date));
        recent.truncate(limit);
        recent
    }
}

fn matches_query(product: &Product, needle: &str) -> bool {
    product.id.to_lowercase().contains(needle)
        || product.name.to_lowercase().contains(needle)
        || product.brand.to_lowercase().contains(needle)
        || product
            .aliases
            .iter()
            .any(|alias| alias.to_lowercase().contains(needle))
}

fn open_file(dir: &Path, file: &'static str) -> Result<std::fs::File, CatalogImportError> {
    std::fs::File::open(dir.join(file)).map_err(|source| CatalogImportError::Io { file, source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::io::Cursor;

    const PRODUCTS_CSV: &str = "\
product_id,brand,name,category,aliases
P001,Evergreen,Ginseng Complex,health supplements,ginseng plus|energy tonic
P002,Northwind,Steel Thermos,kitchenware,travel mug
P003,Evergreen,Knee Therapy Patch,Therapy patches,
";

    const AUTHORITIES_CSV: &str = "\
product_id,has_record,has_cert,penalty_count,notice_url,last_notice_date
P001,1,1,0,https://example.org/notices/p001,2025-03-01
P003,1,0,2,,
";

    const REVIEWS_CSV: &str = "\
product_id,review_date,rating,reviewer_reputation,evidence_url
P001,2025-05-20,5,1.0,https://example.org/evidence/1
P001,2024-11-02,4,,
P001,,3,0.4,
P002,2025-01-15,2,0.7,
";

    fn sample_catalog() -> Catalog {
        Catalog::from_readers(
            Cursor::new(PRODUCTS_CSV),
            Cursor::new(AUTHORITIES_CSV),
            Cursor::new(REVIEWS_CSV),
        )
        .expect("fixture catalog imports")
    }

    #[test]
    fn import_builds_typed_records_with_defaults() {
        let catalog = sample_catalog();
        assert_eq!(catalog.products().len(), 3);

        let ginseng = catalog.find_by_id("P001").expect("product present");
        assert_eq!(ginseng.aliases, vec!["ginseng plus", "energy tonic"]);

        let patch = catalog.find_by_id("P003").expect("product present");
        assert!(patch.aliases.is_empty());

        let authority = catalog.authority_for("P001").expect("record present");
        assert!(authority.has_record);
        assert!(authority.has_cert);
        assert_eq!(authority.penalty_count, 0);
        assert_eq!(
            authority.last_notice_date,
            NaiveDate::from_ymd_opt(2025, 3, 1)
        );

        let penalized = catalog.authority_for("P003").expect("record present");
        assert_eq!(penalized.penalty_count, 2);
        assert!(penalized.notice_url.is_none());
        assert!(penalized.last_notice_date.is_none());
    }

    #[test]
    fn blank_review_fields_become_none() {
        let catalog = sample_catalog();
        let reviews = catalog.reviews_for("P001");
        assert_eq!(reviews.len(), 3);

        let undated = &reviews[2];
        assert!(undated.review_date.is_none());
        assert_eq!(undated.reviewer_reputation, Some(0.4));

        let defaulted = &reviews[1];
        assert!(defaulted.reviewer_reputation.is_none());
        assert_eq!(defaulted.reputation(), 0.5);
    }

    #[test]
    fn missing_authority_is_absent_not_zeroed() {
        let catalog = sample_catalog();
        assert!(catalog.authority_for("P002").is_none());
    }

    #[test]
    fn find_by_id_ignores_case_and_whitespace() {
        let catalog = sample_catalog();
        assert!(catalog.find_by_id(" p001 ").is_some());
        assert!(catalog.find_by_id("P999").is_none());
    }

    #[test]
    fn candidates_match_alias_substrings_case_insensitively() {
        let catalog = sample_catalog();
        let matched = catalog.find_candidates("TONIC");
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].id, "P001");

        let by_brand = catalog.find_candidates("evergreen");
        assert_eq!(by_brand.len(), 2);

        assert!(catalog.find_candidates("   ").is_empty());
        assert!(catalog.find_candidates("nonexistent").is_empty());
    }

    #[test]
    fn recent_reviews_sort_newest_first_with_undated_last() {
        let catalog = sample_catalog();
        let recent = catalog.recent_reviews("P001", 3);
        assert_eq!(recent.len(), 3);
        assert_eq!(
            recent[0].review_date,
            NaiveDate::from_ymd_opt(2025, 5, 20)
        );
        assert!(recent[2].review_date.is_none());

        let capped = catalog.recent_reviews("P001", 2);
        assert_eq!(capped.len(), 2);
    }

    #[test]
    fn from_dir_propagates_io_errors() {
        let error = Catalog::from_dir("./does-not-exist").expect_err("expected io error");
        match error {
            CatalogImportError::Io { file, .. } => assert_eq!(file, "products.csv"),
            other => panic!("expected io error, got {other:?}"),
        }
    }

    #[test]
    fn malformed_rows_surface_as_csv_errors() {
        let bad_reviews = "product_id,review_date,rating,reviewer_reputation,evidence_url\nP001,2025-01-01,not-a-number,,\n";
        let error = Catalog::from_readers(
            Cursor::new(PRODUCTS_CSV),
            Cursor::new(AUTHORITIES_CSV),
            Cursor::new(bad_reviews),
        )
        .expect_err("expected csv error");
        match error {
            CatalogImportError::Csv { file, .. } => assert_eq!(file, "reviews.csv"),
            other => panic!("expected csv error, got {other:?}"),
        }
    }
}

use chrono::{Local, NaiveDate};
use clap::Args;
use std::path::PathBuf;
use trustlens::assessment::{Assessment, AssessmentConfig, AssessmentEngine, Product, Review};
use trustlens::catalog::Catalog;
use trustlens::config::AppConfig;
use trustlens::error::AppError;

#[derive(Args, Debug)]
pub(crate) struct AssessArgs {
    /// Product ID or keyword to look up
    pub(crate) query: String,
    /// Directory containing products.csv, authorities.csv, and reviews.csv
    #[arg(long)]
    pub(crate) data_dir: Option<PathBuf>,
    /// Freeze the evaluation date (YYYY-MM-DD, defaults to today)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Override the authority weight wA in [0, 1]
    #[arg(long)]
    pub(crate) authority_weight: Option<f64>,
    /// Decimal places kept on the combined score
    #[arg(long)]
    pub(crate) precision: Option<u8>,
    /// Print the most recent reviews for each match
    #[arg(long)]
    pub(crate) show_reviews: bool,
}

pub(crate) fn run_assess(args: AssessArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let data_dir = args.data_dir.unwrap_or(config.catalog.data_dir);
    let catalog = Catalog::from_dir(&data_dir)?;

    let mut assessment_config = AssessmentConfig {
        authority_weight: config.catalog.authority_weight,
        ..AssessmentConfig::default()
    };
    if let Some(weight) = args.authority_weight {
        assessment_config.authority_weight = weight.clamp(0.0, 1.0);
    }
    if let Some(precision) = args.precision {
        assessment_config.combined_precision = precision;
    }
    let engine = AssessmentEngine::new(assessment_config);
    let today = args.today.unwrap_or_else(|| Local::now().date_naive());

    let candidates = catalog.find_candidates(&args.query);
    if candidates.is_empty() {
        println!("No product found. Try another keyword or ID.");
        return Ok(());
    }

    for product in candidates {
        let authority = catalog.authority_for(&product.id);
        let reviews = catalog.reviews_for(&product.id);
        let assessment = engine.assess(product, authority, reviews, today);

        println!("{}", "=".repeat(70));
        render_assessment(product, &assessment);
        if let Some(url) = authority.and_then(|record| record.notice_url.as_deref()) {
            println!("Authority notice: {url}");
        }
        if args.show_reviews {
            for review in catalog.recent_reviews(&product.id, 3) {
                render_review(review);
            }
        }
    }
    println!("{}", "=".repeat(70));

    Ok(())
}

fn render_assessment(product: &Product, assessment: &Assessment) {
    println!(
        "[{}] {} - {} (category: {})",
        product.id, product.brand, product.name, product.category
    );
    println!(
        "AuthorityScore={:.1} | ConsumerScore={:.1} | Combined={}",
        assessment.authority_score, assessment.consumer_score, assessment.combined_score
    );
    println!("Risk Flags: {}", assessment.flag_summary());
    for line in &assessment.breakdown {
        println!("  {line}");
    }
}

fn render_review(review: &Review) {
    let date = review
        .review_date
        .map_or_else(|| "unknown".to_string(), |date| date.to_string());
    let evidence = review.evidence_url.as_deref().unwrap_or("");
    println!(
        " - {date} rating={} rep={}  {evidence}",
        review.rating,
        review.reputation()
    );
}

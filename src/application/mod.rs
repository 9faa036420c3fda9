pub mod use_cases;

pub use use_cases::blog_post::BlogPostUseCase;
pub use use_cases::link_enrichment::{EnrichmentReport, LinkEnrichmentUseCase};

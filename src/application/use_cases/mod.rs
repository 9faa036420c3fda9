pub mod blog_post;
pub mod link_enrichment;

// * SiteLens - Visual Website Ingestion & Retrieval
// * Scrapes a target page with a headless browser, describes what it sees,
// * and builds a persisted similarity index that questions can be answered
// * from.

pub mod capture;
pub mod config;
pub mod extract;
pub mod index;
pub mod ops;
pub mod pipeline;
pub mod refinery;
pub mod sitemap;
pub mod vision;

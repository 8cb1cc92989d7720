pub mod ai_ranker;
pub mod audit;
pub mod credentials;
pub mod extraction;
pub mod merger;
pub mod providers;
pub mod recommendations;
pub mod redaction;
pub mod scoring;
pub mod season;
pub mod transport;

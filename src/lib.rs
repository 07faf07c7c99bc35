// Interlink: related-article, citation and statistics tooling for a static site
//
// This is the library root. Each module corresponds to one stage of the
// post-generation pass over the article tree.

pub mod audit;
pub mod catalog;
pub mod config;
pub mod inject;
pub mod output;
pub mod pipeline;
pub mod related;
pub mod status;

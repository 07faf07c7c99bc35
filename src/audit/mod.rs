// Pre-publish audits over generated article text.

pub mod stats;

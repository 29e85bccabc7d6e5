mod token;
mod usage;

pub use token::MockTokenProvider;
pub use usage::MockUsageClient;

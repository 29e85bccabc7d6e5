mod token;
mod usage;

pub use token::AzureCliTokenProvider;
pub use usage::ArmUsageClient;

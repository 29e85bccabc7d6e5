pub mod client;
pub mod mock;
mod token;
mod usage;

pub use token::TokenProvider;
pub use usage::{
    RawUsage, Usage, UsageApi, UsageError, UsageList, UsageName, UsageProvider, UsageScope,
    ARM_ENDPOINT,
};

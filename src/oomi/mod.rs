mod authenticator;
mod client;
mod fetcher;
mod report;
mod token;

pub use fetcher::ConsumptionFetcher;

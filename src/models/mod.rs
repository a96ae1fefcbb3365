mod link;

pub use link::{ErrorBody, RateDecision, ShortenForm, ShortenResponse};

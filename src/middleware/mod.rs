mod cors;

pub use cors::{Cors, CorsPolicy};

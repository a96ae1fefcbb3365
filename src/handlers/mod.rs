mod links;

pub use links::{healthz, not_found, preflight_handler, redirect_handler, shorten_handler};

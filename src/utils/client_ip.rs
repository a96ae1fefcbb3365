use actix_web::HttpRequest;

/// Fallback identity when no usable client address header is present.
const UNKNOWN_CLIENT: &str = "0.0.0.0";

/// Derives a best-effort client identity for rate limiting.
///
/// Prefers the trusted proxy header `cf-connecting-ip`, then the first entry
/// of `x-forwarded-for`, then a placeholder. Forwarded headers are
/// client-controllable on direct connections, so this is abuse mitigation,
/// not a security boundary.
pub fn client_identity(req: &HttpRequest) -> String {
    if let Some(ip) = header_str(req, "cf-connecting-ip") {
        if !ip.is_empty() {
            return ip.to_string();
        }
    }

    if let Some(forwarded) = header_str(req, "x-forwarded-for") {
        if let Some(first) = forwarded
            .split(',')
            .next()
            .map(str::trim)
            .filter(|s| !s.is_empty())
        {
            return first.to_string();
        }
    }

    UNKNOWN_CLIENT.to_string()
}

fn header_str<'a>(req: &'a HttpRequest, name: &str) -> Option<&'a str> {
    req.headers().get(name).and_then(|v| v.to_str().ok())
}

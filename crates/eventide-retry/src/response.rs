use reqwest::header::RETRY_AFTER;
use reqwest::Method;

/// What the executor needs to know about a response
pub trait RetryableResponse {
    fn status(&self) -> u16;

    fn is_success(&self) -> bool {
        (200..300).contains(&self.status())
    }

    /// Raw `Retry-After` header value
    fn retry_after(&self) -> Option<&str> {
        None
    }
}

impl RetryableResponse for reqwest::Response {
    fn status(&self) -> u16 {
        reqwest::Response::status(self).as_u16()
    }

    fn retry_after(&self) -> Option<&str> {
        self.headers().get(RETRY_AFTER)?.to_str().ok()
    }
}

/// Default predicate: non-success responses are returned as-is
pub fn never_retry<R: RetryableResponse>(_response: &R) -> bool {
    false
}

/// GET requests retry on 429 or any 5xx; other methods only on 429.
pub fn retry_idempotent<R: RetryableResponse>(method: Method) -> impl Fn(&R) -> bool + Send + Sync {
    move |response: &R| {
        let status = response.status();
        if method == Method::GET {
            status == 429 || (500..600).contains(&status)
        } else {
            status == 429
        }
    }
}

use std::path::PathBuf;

/// Token bucket parameters for the shared rate limiter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateLimitConfig {
    pub refill_per_second: f64,
    pub burst: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            refill_per_second: 1.0,
            burst: 3,
        }
    }
}

/// Switches between the service's historical responses and the corrected ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Answer a missing row with 500 instead of 404.
    pub not_found_as_500: bool,
    /// Answer a failed login with 401 instead of 200 and an empty message.
    pub login_mismatch_unauthorized: bool,
    /// Reject register/login bodies with any empty field. When off, only a
    /// body whose fields are all empty is rejected.
    pub require_all_fields: bool,
    /// HTML served for unmatched routes.
    pub not_found_page: Option<PathBuf>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            not_found_as_500: false,
            login_mismatch_unauthorized: false,
            require_all_fields: true,
            not_found_page: None,
        }
    }
}

impl ApiConfig {
    pub fn fields_acceptable(&self, all_present: bool, all_empty: bool) -> bool {
        if self.require_all_fields {
            all_present
        } else {
            !all_empty
        }
    }
}

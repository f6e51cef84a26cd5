//! Domain constants.

/// Default field values for new events.
pub mod event_defaults {
    /// Event type applied when the creator does not pick one.
    pub const EVENT_TYPE: &str = "pickleball";

    /// Weather placeholder until a forecast is attached.
    pub const WEATHER: &str = "N/A";

    /// Fee applied when the creator does not set one.
    pub const FEES: u32 = 0;
}

/// Authentication lifetimes and limits.
pub mod auth {
    /// Bearer token lifetime in minutes.
    pub const TOKEN_TTL_MINUTES: i64 = 60;

    /// Password-reset code lifetime in minutes.
    pub const RESET_CODE_TTL_MINUTES: i64 = 30;

    /// Random bytes in a password-reset code before encoding.
    pub const RESET_CODE_BYTES: usize = 32;

    /// Minimum password length.
    pub const MIN_PASSWORD_LEN: usize = 6;

    /// Minimum username length after trimming.
    pub const MIN_USERNAME_LEN: usize = 3;
}

/// Optimistic-concurrency tuning.
pub mod concurrency {
    /// How many times a mutation re-reads and re-applies its rule after a
    /// version conflict before giving up.
    pub const MAX_UPDATE_ATTEMPTS: u32 = 3;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_product_rules() {
        assert_eq!(event_defaults::EVENT_TYPE, "pickleball");
        assert_eq!(event_defaults::WEATHER, "N/A");
        assert_eq!(event_defaults::FEES, 0);
    }

    #[test]
    fn token_outlives_reset_code() {
        assert!(auth::TOKEN_TTL_MINUTES > auth::RESET_CODE_TTL_MINUTES);
    }

    #[test]
    fn retry_budget_is_bounded() {
        assert!(concurrency::MAX_UPDATE_ATTEMPTS >= 1);
        assert!(concurrency::MAX_UPDATE_ATTEMPTS <= 10);
    }
}

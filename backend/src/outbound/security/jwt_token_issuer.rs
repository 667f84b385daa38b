//! HS256 JSON Web Token implementation of the `TokenIssuer` port.
//!
//! Expiry is checked against the injected clock rather than the system
//! time, so tests can move past a token's lifetime without sleeping.

use std::sync::Arc;

use chrono::Duration;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use mockable::Clock;
use serde::{Deserialize, Serialize};

use crate::domain::UserId;
use crate::domain::ports::{BearerToken, TokenError, TokenIssuer};

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    iat: i64,
    exp: i64,
}

/// Signs and verifies bearer tokens with a shared HMAC secret.
pub struct JwtTokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl JwtTokenIssuer {
    /// Build an issuer from the signing secret and token lifetime.
    pub fn new(secret: &[u8], ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["sub", "exp"]);
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            ttl,
            clock,
        }
    }
}

impl TokenIssuer for JwtTokenIssuer {
    fn issue(&self, user_id: &UserId) -> Result<BearerToken, TokenError> {
        let now = self.clock.utc();
        let claims = Claims {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map(BearerToken::new)
            .map_err(|err| TokenError::signing(err.to_string()))
    }

    fn verify(&self, token: &str) -> Result<UserId, TokenError> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation)
            .map_err(|err| TokenError::invalid(err.to_string()))?;
        if data.claims.exp <= self.clock.utc().timestamp() {
            return Err(TokenError::expired());
        }
        UserId::new(&data.claims.sub).map_err(|err| TokenError::invalid(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MutableClock;
    use chrono::{TimeZone, Utc};
    use rstest::{fixture, rstest};

    const SECRET: &[u8] = b"0123456789abcdef0123456789abcdef";

    #[fixture]
    fn clock() -> Arc<MutableClock> {
        let now = Utc
            .with_ymd_and_hms(2026, 3, 1, 12, 0, 0)
            .single()
            .expect("valid timestamp");
        Arc::new(MutableClock::new(now))
    }

    fn issuer(secret: &[u8], clock: &Arc<MutableClock>) -> JwtTokenIssuer {
        JwtTokenIssuer::new(secret, Duration::hours(1), clock.clone())
    }

    #[rstest]
    fn issued_tokens_verify_to_their_subject(clock: Arc<MutableClock>) {
        let issuer = issuer(SECRET, &clock);
        let user_id = UserId::random();

        let token = issuer.issue(&user_id).expect("issue");
        assert_eq!(issuer.verify(token.as_str()).expect("verify"), user_id);
    }

    #[rstest]
    fn tokens_expire_on_the_injected_clock(clock: Arc<MutableClock>) {
        let issuer = issuer(SECRET, &clock);
        let token = issuer.issue(&UserId::random()).expect("issue");

        clock.advance_seconds(3600);
        assert_eq!(issuer.verify(token.as_str()), Err(TokenError::expired()));
    }

    #[rstest]
    fn tokens_from_another_secret_are_invalid(clock: Arc<MutableClock>) {
        let foreign = issuer(b"another-secret-another-secret-00", &clock)
            .issue(&UserId::random())
            .expect("issue");

        let err = issuer(SECRET, &clock)
            .verify(foreign.as_str())
            .expect_err("foreign signature");
        assert!(matches!(err, TokenError::Invalid { .. }));
    }

    #[rstest]
    #[case("")]
    #[case("not-a-jwt")]
    #[case("a.b.c")]
    fn malformed_tokens_are_invalid(clock: Arc<MutableClock>, #[case] token: &str) {
        let err = issuer(SECRET, &clock)
            .verify(token)
            .expect_err("malformed token");
        assert!(matches!(err, TokenError::Invalid { .. }));
    }
}

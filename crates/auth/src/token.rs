//! HS256 bearer token codec.
//!
//! Tokens carry a subject id and the permission payload granted at issuance.
//! Expiry is checked against the caller-supplied clock in [`validate_claims`],
//! so the decoder itself never consults the system time.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};

use tenant_gate_core::UserId;

use crate::claims::{TokenClaims, TokenError, validate_claims};
use crate::PermissionPayload;

/// Longest accepted token lifetime, in seconds (ten years).
pub const MAX_TOKEN_LIFETIME_SECS: i64 = 10 * 366 * 24 * 60 * 60;

/// Contents of a token that passed signature and expiry checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedToken {
    pub subject: UserId,
    pub permissions: PermissionPayload,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Issues and verifies tokens under a single shared secret.
#[derive(Clone)]
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    lifetime: Duration,
}

impl core::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TokenCodec")
            .field("secret", &"<redacted>")
            .field("lifetime", &self.lifetime)
            .finish()
    }
}

impl TokenCodec {
    pub fn new(secret: &[u8], lifetime: Duration) -> Result<Self, TokenError> {
        if lifetime <= Duration::zero() || lifetime.num_seconds() > MAX_TOKEN_LIFETIME_SECS {
            return Err(TokenError::InvalidLifetime);
        }

        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is enforced by `validate_claims` against an explicit clock.
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        Ok(Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            lifetime,
        })
    }

    /// Issue a token valid from now for the configured lifetime.
    pub fn issue(
        &self,
        subject: UserId,
        permissions: PermissionPayload,
    ) -> Result<(String, DateTime<Utc>), TokenError> {
        self.issue_at(subject, permissions, Utc::now())
    }

    /// Issue a token with `iat = now` and `exp = now + lifetime`.
    ///
    /// Returns the encoded token and its expiry.
    pub fn issue_at(
        &self,
        subject: UserId,
        permissions: PermissionPayload,
        now: DateTime<Utc>,
    ) -> Result<(String, DateTime<Utc>), TokenError> {
        let iat = now.timestamp();
        let expires_at = iat
            .checked_add(self.lifetime.num_seconds())
            .and_then(|exp| DateTime::from_timestamp(exp, 0))
            .ok_or(TokenError::InvalidLifetime)?;
        let exp = expires_at.timestamp();
        let claims = TokenClaims {
            uid: subject,
            pms: permissions,
            exp,
            iat,
        };

        let token = jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| TokenError::Signing(e.to_string()))?;

        Ok((token, expires_at))
    }

    pub fn verify(&self, token: &str) -> Result<VerifiedToken, TokenError> {
        self.verify_at(token, Utc::now())
    }

    /// Verify signature and claims as of `now`.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<VerifiedToken, TokenError> {
        let data = jsonwebtoken::decode::<TokenClaims>(token, &self.decoding, &self.validation)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                _ => TokenError::malformed(e.to_string()),
            })?;
        let claims = data.claims;

        validate_claims(&claims, now)?;

        Ok(VerifiedToken {
            subject: claims.uid,
            permissions: claims.pms,
            issued_at: timestamp(claims.iat)?,
            expires_at: timestamp(claims.exp)?,
        })
    }
}

fn timestamp(secs: i64) -> Result<DateTime<Utc>, TokenError> {
    DateTime::from_timestamp(secs, 0).ok_or_else(|| TokenError::malformed("timestamp out of range"))
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::{Permission, TenantGrants};
    use tenant_gate_core::TenantId;

    fn codec(secret: &str) -> TokenCodec {
        TokenCodec::new(secret.as_bytes(), Duration::seconds(60)).unwrap()
    }

    fn user(id: u64) -> UserId {
        UserId::new(id).unwrap()
    }

    fn grants() -> PermissionPayload {
        PermissionPayload::PerTenant(
            TenantGrants::new()
                .grant(TenantId::new(1).unwrap(), [Permission::new("read")])
                .grant(TenantId::new(2).unwrap(), [Permission::new("write")]),
        )
    }

    #[test]
    fn round_trip_preserves_subject_and_payload() {
        let codec = codec("secret");
        let now = Utc::now();
        let (token, expires_at) = codec.issue_at(user(7), grants(), now).unwrap();

        let verified = codec.verify_at(&token, now).unwrap();
        assert_eq!(verified.subject, user(7));
        assert_eq!(verified.permissions, grants());
        assert_eq!(verified.expires_at, expires_at);
        assert_eq!(
            verified.expires_at.timestamp() - verified.issued_at.timestamp(),
            60
        );
    }

    #[test]
    fn expires_exactly_at_lifetime() {
        let codec = codec("secret");
        let now = Utc::now();
        let (token, _) = codec.issue_at(user(1), grants(), now).unwrap();

        assert!(codec.verify_at(&token, now + Duration::seconds(59)).is_ok());
        assert_eq!(
            codec.verify_at(&token, now + Duration::seconds(60)),
            Err(TokenError::Expired)
        );
    }

    #[test]
    fn rejects_other_secret() {
        let (token, _) = codec("one").issue(user(1), grants()).unwrap();
        assert_eq!(codec("two").verify(&token), Err(TokenError::InvalidSignature));
    }

    #[test]
    fn rejects_garbage() {
        let codec = codec("secret");
        for raw in ["", "abc", "a.b.c", "Bearer x"] {
            assert!(
                matches!(codec.verify(raw), Err(TokenError::Malformed(_))),
                "expected {raw:?} to be malformed"
            );
        }
    }

    #[test]
    fn rejects_non_hs256_algorithm() {
        let claims = TokenClaims {
            uid: user(1),
            pms: grants(),
            iat: Utc::now().timestamp(),
            exp: Utc::now().timestamp() + 60,
        };
        let token = jsonwebtoken::encode(
            &Header::new(Algorithm::HS512),
            &claims,
            &EncodingKey::from_secret(b"secret"),
        )
        .unwrap();

        assert!(matches!(codec("secret").verify(&token), Err(TokenError::Malformed(_))));
    }

    #[test]
    fn zero_lifetime_is_rejected() {
        assert!(matches!(
            TokenCodec::new(b"secret", Duration::zero()),
            Err(TokenError::InvalidLifetime)
        ));
    }

    #[test]
    fn oversized_lifetime_is_rejected() {
        let max = Duration::seconds(MAX_TOKEN_LIFETIME_SECS);
        assert!(TokenCodec::new(b"secret", max).is_ok());
        assert!(matches!(
            TokenCodec::new(b"secret", max + Duration::seconds(1)),
            Err(TokenError::InvalidLifetime)
        ));
    }

    #[test]
    fn expiry_past_the_calendar_is_an_issue_error() {
        let codec = codec("secret");
        assert_eq!(
            codec.issue_at(user(1), grants(), DateTime::<Utc>::MAX_UTC),
            Err(TokenError::InvalidLifetime)
        );
    }

    #[test]
    fn debug_output_hides_secret() {
        let rendered = format!("{:?}", codec("very-secret-value"));
        assert!(!rendered.contains("very-secret-value"));
    }

    fn payload_strategy() -> impl Strategy<Value = PermissionPayload> {
        let perm = "[a-z]{1,8}(\\.[a-z]{1,8})?".prop_map(|s| Permission::new(s));
        prop_oneof![
            prop::collection::vec(perm.clone(), 0..5).prop_map(PermissionPayload::Flat),
            prop::collection::btree_map(1u64..1000, prop::collection::vec(perm, 0..4), 0..4)
                .prop_map(|map| {
                    let grants = map.into_iter().fold(TenantGrants::new(), |g, (t, perms)| {
                        g.grant(TenantId::new(t).unwrap(), perms)
                    });
                    PermissionPayload::PerTenant(grants)
                }),
        ]
    }

    proptest! {
        #[test]
        fn any_payload_round_trips(subject in 1u64..u64::from(u32::MAX), payload in payload_strategy()) {
            let codec = codec("prop-secret");
            let (token, _) = codec.issue(user(subject), payload.clone()).unwrap();
            let verified = codec.verify(&token).unwrap();
            prop_assert_eq!(verified.subject, user(subject));
            prop_assert_eq!(verified.permissions, payload);
        }

        #[test]
        fn any_payload_fails_under_wrong_secret(payload in payload_strategy()) {
            let (token, _) = codec("issuer").issue(user(1), payload).unwrap();
            prop_assert_eq!(codec("verifier").verify(&token), Err(TokenError::InvalidSignature));
        }
    }
}

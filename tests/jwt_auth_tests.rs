// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! JWT authentication tests.
//!
//! These tests verify that session tokens issued at login can be decoded
//! by the auth middleware, catching compatibility issues early.

use carbon_tracker::middleware::auth::{create_jwt, verify_jwt};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Claims structure that must match what the middleware expects.
/// If either create_jwt or the middleware changes, this test should catch
/// the incompatibility.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    exp: usize,
    iat: usize,
}

const SIGNING_KEY: &[u8] = b"test_signing_key_32_bytes_long!!";

fn now() -> usize {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs() as usize
}

fn encode_claims(claims: &Claims) -> String {
    encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(SIGNING_KEY),
    )
    .expect("Failed to create JWT")
}

#[test]
fn test_issued_token_has_expected_claims() {
    let user_id = Uuid::new_v4();
    let token = create_jwt(&user_id, SIGNING_KEY, 24).unwrap();

    let key = DecodingKey::from_secret(SIGNING_KEY);
    let validation = Validation::new(Algorithm::HS256);
    let token_data = decode::<Claims>(&token, &key, &validation)
        .expect("Failed to decode JWT - check Claims struct compatibility");

    assert_eq!(token_data.claims.sub, user_id.to_string());
    assert_eq!(token_data.claims.exp - token_data.claims.iat, 24 * 60 * 60);
}

#[test]
fn test_externally_encoded_token_accepted() {
    let user_id = Uuid::new_v4();
    let issued_at = now();
    let token = encode_claims(&Claims {
        sub: user_id.to_string(),
        exp: issued_at + 3600,
        iat: issued_at,
    });

    assert_eq!(verify_jwt(&token, SIGNING_KEY).unwrap(), user_id);
}

#[test]
fn test_expired_token_rejected() {
    let issued_at = now() - 7200;
    let token = encode_claims(&Claims {
        sub: Uuid::new_v4().to_string(),
        // Well past the default 60s leeway
        exp: issued_at + 3600,
        iat: issued_at,
    });

    assert!(verify_jwt(&token, SIGNING_KEY).is_err());
}

#[test]
fn test_other_algorithm_rejected() {
    let issued_at = now();
    let token = encode(
        &Header::new(Algorithm::HS512),
        &Claims {
            sub: Uuid::new_v4().to_string(),
            exp: issued_at + 3600,
            iat: issued_at,
        },
        &EncodingKey::from_secret(SIGNING_KEY),
    )
    .unwrap();

    assert!(verify_jwt(&token, SIGNING_KEY).is_err());
}

use std::str::FromStr;

use anyhow::Context;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Deserializer};

/// Tokens expiring within this many seconds are already treated as expired.
pub const CLOCK_SKEW_SECS: i64 = 30;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bearer(String);

impl Bearer {
    /// new by prepending 'Bearer ' before token
    #[inline]
    pub fn new(token: &str) -> Self {
        Self(format!("Bearer {token}"))
    }

    /// return the token part
    #[inline]
    pub fn token(&self) -> &str {
        self.0.split_once(' ').map(|(_, token)| token).unwrap_or(&self.0)
    }

    /// return the token with prefix 'Bearer '
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn payload(&self) -> anyhow::Result<JwtPayload> {
        JwtPayload::from_token(self.token())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct JwtPayload {
    #[serde(default)]
    pub sub: Option<String>,
    #[serde(default, alias = "preferred_username")]
    pub username: Option<String>,
    /// Expiry in seconds since the epoch.
    #[serde(default, deserialize_with = "seconds")]
    pub exp: Option<i64>,
}

impl JwtPayload {
    #[inline]
    pub fn from_token(token: &str) -> anyhow::Result<Self> {
        token.split('.').nth(1).context("token format error")?.parse()
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.exp.and_then(|exp| DateTime::from_timestamp(exp, 0))
    }

    /// Only a known expiry can be in the past; tokens without `exp` never expire here.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at()
            .is_some_and(|expires_at| expires_at < now + Duration::seconds(CLOCK_SKEW_SECS))
    }
}

impl FromStr for JwtPayload {
    type Err = anyhow::Error;

    #[inline]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let data = base64_url::decode(s.trim_end_matches('='))?;
        let payload = serde_json::from_slice(&data)?;

        Ok(payload)
    }
}

fn seconds<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(i64),
        Float(f64),
        Text(String),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Int(v)) => Some(v),
        Some(Raw::Float(v)) => Some(v.trunc() as i64),
        Some(Raw::Text(v)) => v.trim().parse::<f64>().ok().map(|v| v.trunc() as i64),
        None => None,
    })
}

//! HS256 서명 토큰 처리.
//!
//! 서버 측 상태 없이 토큰을 발급/검증합니다. 토큰 형식:
//!
//! ```text
//! base64url({"alg":"HS256","typ":"JWT"}) "." base64url({"sub":..,"iat":..,"exp":..}) "." base64url(HMAC-SHA256)
//! ```
//!
//! 모든 base64url 인코딩은 패딩 없이 출력합니다. 해석 함수는 실패 시 에러 대신
//! `None`/`false`/만료를 반환합니다 (fail-closed).
//!
//! 토큰은 저장되지 않으므로 만료 전에 폐기할 수 없습니다.

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig, URL_SAFE_NO_PAD};
use base64::engine::DecodePaddingMode;
use base64::Engine;
use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use secrecy::ExposeSecret;
use serde::de::{self, DeserializeOwned, IgnoredAny, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use sha2::Sha256;
use std::borrow::Cow;
use tracing::debug;

use crate::error::{ConfigError, TokenError};
use crate::settings::JwtConfig;

type HmacSha256 = Hmac<Sha256>;

/// `{"alg":"HS256","typ":"JWT"}`의 base64url 인코딩.
const ENCODED_HEADER: &str = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9";

/// 페이로드 디코딩용 엔진 (패딩 유무 모두 허용).
const LENIENT_URL_SAFE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// 토큰 페이로드.
///
/// 필드 순서가 곧 직렬화 순서입니다 (`sub`, `iat`, `exp`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject - 사용자 이메일
    pub sub: String,
    /// Issued At (Unix timestamp, 초)
    pub iat: i64,
    /// Expiration (Unix timestamp, 초)
    pub exp: i64,
}

/// `sub`만 읽는 페이로드 뷰.
///
/// 키가 중복되면 첫 번째 `sub`를 사용하고 이후 값은 건너뜁니다.
struct SubjectView {
    sub: String,
}

impl<'de> Deserialize<'de> for SubjectView {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SubjectVisitor;

        impl<'de> Visitor<'de> for SubjectVisitor {
            type Value = SubjectView;

            fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str("a JSON object with a string `sub` field")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<SubjectView, A::Error> {
                let mut sub: Option<String> = None;
                while let Some(key) = map.next_key::<Cow<'de, str>>()? {
                    if key == "sub" && sub.is_none() {
                        sub = Some(map.next_value()?);
                    } else {
                        map.next_value::<IgnoredAny>()?;
                    }
                }
                sub.map(|sub| SubjectView { sub })
                    .ok_or_else(|| de::Error::missing_field("sub"))
            }
        }

        deserializer.deserialize_map(SubjectVisitor)
    }
}

#[derive(Deserialize)]
struct ExpiryView {
    exp: i64,
}

/// 토큰 발급/검증기.
///
/// 시작 시 한 번 HMAC 키를 설정하고 이후에는 읽기 전용으로 공유됩니다.
#[derive(Clone)]
pub struct TokenCodec {
    mac: HmacSha256,
    ttl: Duration,
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCodec")
            .field("ttl_secs", &self.ttl.num_seconds())
            .finish_non_exhaustive()
    }
}

impl TokenCodec {
    /// 설정에서 생성.
    ///
    /// # Errors
    ///
    /// 서명 키가 비었거나 만료 시간이 유효하지 않으면 [`ConfigError`]를 반환합니다.
    pub fn new(config: &JwtConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let ttl = Duration::try_seconds(config.expiration_secs)
            .ok_or(ConfigError::InvalidExpiration(config.expiration_secs))?;
        Self::from_secret(config.secret.expose_secret().as_bytes(), ttl)
    }

    /// 서명 키와 수명으로 직접 생성.
    pub fn from_secret(secret: &[u8], ttl: Duration) -> Result<Self, ConfigError> {
        let mac = HmacSha256::new_from_slice(secret).map_err(|_| ConfigError::Hmac)?;
        Ok(Self { mac, ttl })
    }

    /// 설정된 토큰 수명.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// 토큰 인코딩.
    ///
    /// `iat = floor(now)`, `exp = iat + floor(ttl)` (초 단위).
    pub fn encode(&self, subject: &str, now: DateTime<Utc>, ttl: Duration) -> String {
        let iat = now.timestamp();
        let claims = TokenClaims {
            sub: subject.to_string(),
            iat,
            exp: iat.saturating_add(ttl.num_seconds()),
        };

        // String/i64 필드만 있어 직렬화는 실패하지 않음
        let payload = serde_json::to_vec(&claims).unwrap_or_default();
        let signing_input = format!("{}.{}", ENCODED_HEADER, URL_SAFE_NO_PAD.encode(payload));

        let mut mac = self.mac.clone();
        mac.update(signing_input.as_bytes());
        let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());

        format!("{}.{}", signing_input, signature)
    }

    /// 설정된 수명으로 토큰 발급.
    pub fn issue(&self, subject: &str, now: DateTime<Utc>) -> String {
        self.encode(subject, now, self.ttl)
    }

    /// 서명 검증 (상수 시간 비교).
    pub fn verify_signature(&self, token: &str) -> bool {
        self.check_signature(token).is_ok()
    }

    /// 토큰 검증.
    ///
    /// 서명이 유효하고, subject가 `expected_subject`와 정확히 일치하며(대소문자 구분),
    /// 만료되지 않았을 때만 `true`. 어떤 입력에도 패닉하거나 에러를 반환하지 않습니다.
    pub fn validate(&self, token: &str, expected_subject: &str, now: DateTime<Utc>) -> bool {
        if let Err(e) = self.check_signature(token) {
            debug!(error = %e, "Token signature rejected");
            return false;
        }

        match decode_subject(token) {
            Some(subject) if subject == expected_subject => !is_expired(token, now),
            _ => false,
        }
    }

    fn check_signature(&self, token: &str) -> Result<(), TokenError> {
        let (header, payload, signature) = split(token)?;
        let signature = URL_SAFE_NO_PAD.decode(signature)?;

        let mut mac = self.mac.clone();
        mac.update(header.as_bytes());
        mac.update(b".");
        mac.update(payload.as_bytes());
        mac.verify_slice(&signature)
            .map_err(|_| TokenError::BadSignature)
    }
}

/// 비밀 키로 직접 토큰 인코딩.
///
/// [`TokenCodec`]을 보관하지 않는 호출자를 위한 무상태 형태입니다.
/// 결과는 같은 키로 만든 [`TokenCodec::encode`]와 바이트 단위로 동일합니다.
pub fn encode(subject: &str, now: DateTime<Utc>, ttl: Duration, secret: &[u8]) -> String {
    // HMAC은 임의 길이 키를 허용함
    let mac = HmacSha256::new_from_slice(secret).expect("HMAC accepts keys of any length");
    TokenCodec { mac, ttl }.encode(subject, now, ttl)
}

/// 토큰에서 subject 추출.
///
/// 서명은 확인하지 않습니다. 세 부분으로 나뉘지 않거나, 페이로드 디코딩에 실패하거나,
/// 문자열 `sub` 필드가 없으면 `None`.
pub fn decode_subject(token: &str) -> Option<String> {
    match decode_payload::<SubjectView>(token) {
        Ok(view) => Some(view.sub),
        Err(e) => {
            debug!(error = %e, "Token subject unreadable");
            None
        }
    }
}

/// 토큰 만료 여부.
///
/// `floor(now) > exp`일 때 만료입니다. 만료 시각과 같은 초까지는 유효합니다.
/// 해석할 수 없거나 `exp`가 없으면 만료로 간주합니다.
pub fn is_expired(token: &str, now: DateTime<Utc>) -> bool {
    match decode_payload::<ExpiryView>(token) {
        Ok(view) => now.timestamp() > view.exp,
        Err(e) => {
            debug!(error = %e, "Token expiry unreadable, treating as expired");
            true
        }
    }
}

fn split(token: &str) -> Result<(&str, &str, &str), TokenError> {
    let mut parts = token.split('.');
    match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(header), Some(payload), Some(signature), None) => Ok((header, payload, signature)),
        _ => Err(TokenError::Malformed),
    }
}

fn decode_payload<T: DeserializeOwned>(token: &str) -> Result<T, TokenError> {
    let (_, payload, _) = split(token)?;
    let bytes = LENIENT_URL_SAFE.decode(payload)?;
    Ok(serde_json::from_slice(&bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_SECRET: &[u8] = b"s3cret";

    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(secs, 0).unwrap()
    }

    fn codec() -> TokenCodec {
        TokenCodec::from_secret(TEST_SECRET, Duration::seconds(3600)).unwrap()
    }

    fn with_payload(token: &str, payload_json: &str) -> String {
        let parts: Vec<&str> = token.split('.').collect();
        format!(
            "{}.{}.{}",
            parts[0],
            URL_SAFE_NO_PAD.encode(payload_json),
            parts[2]
        )
    }

    #[test]
    fn test_header_constant_matches_json() {
        assert_eq!(
            ENCODED_HEADER,
            URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#)
        );
    }

    #[test]
    fn test_encode_wire_bytes() {
        let token = codec().issue("a@b.com", at(1000));

        assert_eq!(
            token,
            "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9\
             .eyJzdWIiOiJhQGIuY29tIiwiaWF0IjoxMDAwLCJleHAiOjQ2MDB9\
             .x7b5PKS7fiz2MQPYx1M1j36499g7l5e8rsyjjX_ZWcU"
        );
        assert!(!token.contains('='));
    }

    #[test]
    fn test_free_encode_matches_codec() {
        let token = encode("a@b.com", at(1000), Duration::seconds(3600), b"s3cret");
        assert_eq!(token, codec().issue("a@b.com", at(1000)));
    }

    #[test]
    fn test_scenario_expiry_boundary() {
        let token = codec().issue("a@b.com", at(1000));

        assert_eq!(decode_subject(&token), Some("a@b.com".to_string()));
        assert!(!is_expired(&token, at(1000)));
        assert!(!is_expired(&token, at(4600)));
        assert!(is_expired(&token, at(4601)));
    }

    #[test]
    fn test_sub_second_now_is_floored() {
        let now = DateTime::from_timestamp(1000, 999_000_000).unwrap();
        let token = codec().encode("a@b.com", now, Duration::milliseconds(3_600_900));

        let parts: Vec<&str> = token.split('.').collect();
        let claims: TokenClaims =
            serde_json::from_slice(&URL_SAFE_NO_PAD.decode(parts[1]).unwrap()).unwrap();
        assert_eq!(claims.iat, 1000);
        assert_eq!(claims.exp, 4600);
    }

    #[test]
    fn test_validate() {
        let codec = codec();
        let token = codec.issue("a@b.com", at(1000));

        assert!(codec.validate(&token, "a@b.com", at(1000)));
        assert!(codec.validate(&token, "a@b.com", at(4600)));
        assert!(!codec.validate(&token, "a@b.com", at(4601)));
        assert!(!codec.validate(&token, "A@b.com", at(1000)));
        assert!(!codec.validate(&token, "other@b.com", at(1000)));
    }

    #[test]
    fn test_validate_wrong_secret() {
        let token = codec().issue("a@b.com", at(1000));
        let other = TokenCodec::from_secret(b"other-secret", Duration::seconds(3600)).unwrap();

        assert!(!other.verify_signature(&token));
        assert!(!other.validate(&token, "a@b.com", at(1000)));
    }

    #[test]
    fn test_tampered_payload_rejected() {
        let codec = codec();
        let token = codec.issue("a@b.com", at(1000));
        let forged = with_payload(&token, r#"{"sub":"admin@b.com","iat":1000,"exp":99999}"#);

        // 조회 함수는 서명과 무관
        assert_eq!(decode_subject(&forged), Some("admin@b.com".to_string()));
        assert!(!codec.verify_signature(&forged));
        assert!(!codec.validate(&forged, "admin@b.com", at(1000)));
    }

    #[test]
    fn test_malformed_tokens() {
        let codec = codec();
        for token in ["", "abc", "a.b", "a.b.c.d", "!!.@@.##"] {
            assert_eq!(decode_subject(token), None, "token: {token:?}");
            assert!(is_expired(token, at(0)), "token: {token:?}");
            assert!(!codec.validate(token, "a@b.com", at(0)), "token: {token:?}");
        }
    }

    #[test]
    fn test_missing_fields_fail_closed() {
        let token = codec().issue("a@b.com", at(1000));

        let no_sub = with_payload(&token, r#"{"iat":1000,"exp":4600}"#);
        assert_eq!(decode_subject(&no_sub), None);
        assert!(!is_expired(&no_sub, at(1000)));

        let no_exp = with_payload(&token, r#"{"sub":"a@b.com","iat":1000}"#);
        assert_eq!(decode_subject(&no_exp), Some("a@b.com".to_string()));
        assert!(is_expired(&no_exp, at(0)));

        let bad_exp = with_payload(&token, r#"{"sub":"a@b.com","exp":"4600"}"#);
        assert!(is_expired(&bad_exp, at(0)));

        let numeric_sub = with_payload(&token, r#"{"sub":42,"exp":4600}"#);
        assert_eq!(decode_subject(&numeric_sub), None);
    }

    #[test]
    fn test_duplicate_sub_uses_first_occurrence() {
        let token = codec().issue("a@b.com", at(1000));

        let duplicated = with_payload(
            &token,
            r#"{"sub":"first@b.com","sub":"second@b.com","iat":1,"exp":99999}"#,
        );
        assert_eq!(decode_subject(&duplicated), Some("first@b.com".to_string()));

        // sub가 뒤에 있어도 첫 번째 값을 사용
        let trailing = with_payload(
            &token,
            r#"{"iat":1,"exp":99999,"sub":"x@b.com","sub":"y@b.com"}"#,
        );
        assert_eq!(decode_subject(&trailing), Some("x@b.com".to_string()));

        // 이스케이프된 키도 같은 키로 취급
        let escaped = with_payload(&token, r#"{"s\u0075b":"esc@b.com","exp":99999}"#);
        assert_eq!(decode_subject(&escaped), Some("esc@b.com".to_string()));
    }

    #[test]
    fn test_padded_payload_accepted() {
        let padded = format!(
            "{}.{}.sig",
            ENCODED_HEADER,
            base64::engine::general_purpose::URL_SAFE.encode(r#"{"sub":"ab","exp":1}"#)
        );
        assert!(padded.contains('='));
        assert_eq!(decode_subject(&padded), Some("ab".to_string()));
    }

    #[test]
    fn test_codec_from_config() {
        let codec = TokenCodec::new(&JwtConfig::new("s3cret", 3600)).unwrap();
        assert_eq!(codec.ttl(), Duration::seconds(3600));

        assert!(matches!(
            TokenCodec::new(&JwtConfig::new("", 3600)),
            Err(ConfigError::MissingSecret)
        ));
        assert!(matches!(
            TokenCodec::new(&JwtConfig::new("s3cret", -5)),
            Err(ConfigError::InvalidExpiration(-5))
        ));
    }

    #[test]
    fn test_debug_hides_key() {
        let debug = format!("{:?}", codec());
        assert!(debug.contains("ttl_secs: 3600"));
        assert!(!debug.contains("s3cret"));
    }
}

//! # Auth Core
//!
//! 무상태(stateless) 토큰 인증의 핵심 로직을 제공합니다.
//!
//! 이 크레이트는 인증 서버 전반에서 사용되는 기본 구성 요소를 제공합니다:
//! - HS256 서명 토큰 발급/검증 ([`TokenCodec`])
//! - 사용자 식별 정보 및 역할 ([`Identity`], [`Role`])
//! - 자격증명 저장소 / 비밀번호 해셔 추상화
//! - 회원가입/로그인 서비스 ([`AuthService`])
//! - 설정 관리
//! - 로깅 인프라

pub mod domain;
pub mod error;
pub mod logging;
pub mod password;
pub mod service;
pub mod settings;
pub mod store;
pub mod token;

pub use domain::*;
pub use error::*;
pub use logging::*;
pub use password::{Argon2Hasher, PasswordHasher};
pub use service::{AuthService, AuthSession, SignupInput};
pub use settings::*;
pub use store::{CredentialStore, InMemoryCredentialStore};
pub use token::{decode_subject, encode, is_expired, TokenClaims, TokenCodec};

//! 요청 인증 및 역할 기반 접근 제어.
//!
//! - [`AuthUser`]: Bearer 토큰으로 인증된 사용자
//! - [`AdminAuth`]: ADMIN 역할을 요구하는 추출기

mod extractor;

pub use extractor::{require_role, AdminAuth, AuthRejection, AuthUser};

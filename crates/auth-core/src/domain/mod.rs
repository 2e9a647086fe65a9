//! 도메인 모델.
//!
//! 사용자 식별 정보, 역할, 저장된 자격증명을 정의합니다.

mod identity;
mod role;

pub use identity::{Credential, Identity, NewIdentity};
pub use role::Role;

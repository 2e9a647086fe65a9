//! 설정 관리.
//!
//! 프로세스 시작 시 한 번 로드되어 이후 변경되지 않는 애플리케이션 설정입니다.
//! 기본값 → `config/default.toml`(선택) → `AUTH__` 접두사 환경 변수 순으로 덮어씁니다.

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::Path;

use crate::error::ConfigError;
use crate::logging::LogConfig;

/// 기본 토큰 수명 (초, 24시간)
pub const DEFAULT_TOKEN_TTL_SECS: i64 = 86_400;

/// 애플리케이션 설정.
#[derive(Debug, Deserialize)]
pub struct AppConfig {
    /// 서버 설정
    pub server: ServerConfig,
    /// 데이터베이스 설정
    pub database: DatabaseConfig,
    /// 토큰 서명 설정
    pub jwt: JwtConfig,
    /// CORS 설정
    pub cors: CorsConfig,
    /// 로깅 설정
    pub logging: LogConfig,
}

/// 서버 설정.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// 바인딩할 호스트
    pub host: String,
    /// 리스닝할 포트
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

impl ServerConfig {
    /// 소켓 주소 반환.
    ///
    /// # Errors
    /// `host:port` 형식이 유효하지 않으면 `AddrParseError`를 반환합니다.
    pub fn socket_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }
}

/// 데이터베이스 설정.
///
/// `url`이 없으면 메모리 저장소로 동작합니다.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// PostgreSQL 연결 URL
    #[serde(default)]
    pub url: Option<String>,
    /// 최대 연결 수
    pub max_connections: u32,
    /// 연결 타임아웃 (초)
    pub connect_timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: 10,
            connect_timeout_secs: 5,
        }
    }
}

/// 토큰 서명 설정.
///
/// 단일 공유 비밀 키와 토큰 수명. 프로세스 수명 동안 불변입니다.
#[derive(Debug, Deserialize)]
pub struct JwtConfig {
    /// HMAC-SHA256 서명 키
    pub secret: SecretString,
    /// 토큰 수명 (초)
    pub expiration_secs: i64,
}

impl JwtConfig {
    /// 새 토큰 설정 생성.
    pub fn new(secret: impl Into<String>, expiration_secs: i64) -> Self {
        Self {
            secret: SecretString::new(secret.into().into_boxed_str()),
            expiration_secs,
        }
    }

    /// 설정 유효성 검사.
    ///
    /// # Errors
    ///
    /// - 비어 있는 서명 키: [`ConfigError::MissingSecret`]
    /// - 0 이하의 만료 시간: [`ConfigError::InvalidExpiration`]
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.secret.expose_secret().trim().is_empty() {
            return Err(ConfigError::MissingSecret);
        }
        if self.expiration_secs <= 0 {
            return Err(ConfigError::InvalidExpiration(self.expiration_secs));
        }
        Ok(())
    }
}

/// CORS 설정.
#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    /// 허용할 Origin 목록
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec!["http://localhost:5173".to_string()],
        }
    }
}

impl AppConfig {
    /// 파일과 환경 변수에서 설정을 로드합니다.
    ///
    /// 파일이 없어도 에러가 아닙니다. 로드 후 [`JwtConfig::validate`]를 실행하므로
    /// 서명 키가 없으면 여기서 실패합니다.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let builder = config::Config::builder()
            // 기본값으로 시작
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("database.max_connections", 10)?
            .set_default("database.connect_timeout_secs", 5)?
            .set_default("jwt.secret", "")?
            .set_default("jwt.expiration_secs", DEFAULT_TOKEN_TTL_SECS)?
            .set_default("cors.allowed_origins", vec!["http://localhost:5173"])?
            .set_default("logging.level", "info")?
            .set_default("logging.format", "pretty")?
            // 파일에서 로드
            .add_source(config::File::from(path.as_ref()).required(false))
            // 환경 변수로 오버라이드
            .add_source(
                config::Environment::with_prefix("AUTH")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("cors.allowed_origins"),
            );

        let config: Self = builder.build()?.try_deserialize()?;
        config.jwt.validate()?;
        Ok(config)
    }

    /// 기본 경로에서 설정을 로드합니다.
    pub fn load_default() -> Result<Self, ConfigError> {
        Self::load("config/default.toml")
    }
}

use std::path::PathBuf;

/// Wire shape used to reach the search service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransportKind {
    /// `GET /search?q=<query>&limit=<n>`, answered with `{"results": [...]}`.
    #[default]
    Get,
    /// `POST /query` with `{"query_string": "<query>"}`, answered with `{"res": [...]}`.
    Post,
}

impl std::fmt::Display for TransportKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransportKind::Get => write!(f, "get"),
            TransportKind::Post => write!(f, "post"),
        }
    }
}

impl std::str::FromStr for TransportKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "get" => Ok(TransportKind::Get),
            "post" => Ok(TransportKind::Post),
            other => Err(format!("unknown transport '{other}'; expected 'get' or 'post'")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub service_url: String,
    pub transport: TransportKind,
    pub timeout_ms: u64,
    pub result_limit: u32,
    pub user_agent: String,
    pub log_level: String,
    pub fallback_path: Option<PathBuf>,
    pub fallback_enabled: bool,
}

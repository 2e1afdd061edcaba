// prober.rs
use super::ScanError;
use super::classifier::classify;
use super::report::Finding;
use reqwest::Client;
use reqwest::redirect::Policy;
use std::fmt;
use std::time::Duration;
use url::Url;

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";
pub const DEFAULT_TIMEOUT_SECS: u64 = 5;
pub const DEFAULT_CONCURRENCY: usize = 10;

/// 引擎所需的运行参数，与命令行解析无关
#[derive(Debug, Clone)]
pub struct ScanOptions {
    pub concurrency: usize,
    pub timeout: Duration,
    pub user_agent: String,
    pub proxy: Option<String>,
    /// 记录每个未命中路径的原因
    pub diagnostics: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            proxy: None,
            diagnostics: false,
        }
    }
}

/// 未记录为发现的原因，仅用于诊断输出
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbsorbReason {
    HttpStatus(u16),
    Transport(String),
    InvalidUrl(String),
}

impl fmt::Display for AbsorbReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AbsorbReason::HttpStatus(code) => write!(f, "HTTP {}", code),
            AbsorbReason::Transport(msg) => write!(f, "传输失败: {}", msg),
            AbsorbReason::InvalidUrl(msg) => write!(f, "URL无效: {}", msg),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    Found(Finding),
    Absorbed { url: String, reason: AbsorbReason },
}

impl ProbeOutcome {
    pub fn into_finding(self) -> Option<Finding> {
        match self {
            ProbeOutcome::Found(finding) => Some(finding),
            ProbeOutcome::Absorbed { .. } => None,
        }
    }
}

/// 缺少协议时补 http://
pub fn normalize_target(target: &str) -> Result<Url, ScanError> {
    let target = target.trim();
    if target.is_empty() {
        return Err(ScanError::EmptyTarget);
    }

    let with_scheme = if target.starts_with("http://") || target.starts_with("https://") {
        target.to_string()
    } else {
        format!("http://{}", target)
    };

    let url = Url::parse(&with_scheme)?;
    if url.host_str().is_none() {
        return Err(ScanError::InvalidTarget(format!("缺少主机名: {}", target)));
    }
    Ok(url)
}

pub fn build_client(options: &ScanOptions) -> Result<Client, ScanError> {
    let mut client_builder = Client::builder()
        .timeout(options.timeout)
        .user_agent(options.user_agent.as_str())
        .redirect(Policy::limited(10));

    // 配置代理
    if let Some(proxy_url) = &options.proxy {
        let proxy = reqwest::Proxy::all(proxy_url)
            .map_err(|e| ScanError::InvalidConfig(format!("代理配置错误: {}", e)))?;
        client_builder = client_builder.proxy(proxy);
    }

    client_builder
        .build()
        .map_err(|e| ScanError::ClientError(format!("创建HTTP客户端失败: {}", e)))
}

/// 对单个路径发起 GET 请求。一次扫描共用同一个 Client (连接池)。
#[derive(Debug, Clone)]
pub struct Prober {
    client: Client,
    base_url: Url,
}

impl Prober {
    pub fn new(client: Client, base_url: Url) -> Self {
        Self { client, base_url }
    }

    pub fn resolve(&self, path: &str) -> Result<Url, url::ParseError> {
        self.base_url.join(path)
    }

    /// 无法解析时用于报告的URL，基址与路径之间只保留一个 /
    fn display_url(&self, path: &str) -> String {
        let base = self.base_url.as_str().trim_end_matches('/');
        if path.starts_with('/') {
            format!("{}{}", base, path)
        } else {
            format!("{}/{}", base, path)
        }
    }

    pub async fn probe(&self, path: &str) -> Option<Finding> {
        self.probe_detailed(path).await.into_finding()
    }

    pub async fn probe_detailed(&self, path: &str) -> ProbeOutcome {
        let url = match self.resolve(path) {
            Ok(url) => url,
            Err(e) => {
                return ProbeOutcome::Absorbed {
                    url: self.display_url(path),
                    reason: AbsorbReason::InvalidUrl(e.to_string()),
                };
            }
        };
        let url_str = url.to_string();

        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => {
                return ProbeOutcome::Absorbed { url: url_str, reason: AbsorbReason::Transport(e.to_string()) };
            }
        };

        let status_code = response.status().as_u16();
        if status_code >= 400 {
            return ProbeOutcome::Absorbed { url: url_str, reason: AbsorbReason::HttpStatus(status_code) };
        }

        match response.bytes().await {
            Ok(body) => ProbeOutcome::Found(Finding {
                url: url_str,
                status_code,
                path: path.to_string(),
                category: classify(path),
                content_length: body.len(),
            }),
            Err(e) => ProbeOutcome::Absorbed { url: url_str, reason: AbsorbReason::Transport(e.to_string()) },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_gets_http_prefix() {
        assert_eq!(normalize_target("example.test").unwrap().as_str(), "http://example.test/");
        assert_eq!(normalize_target(" https://example.test/app ").unwrap().as_str(), "https://example.test/app");
    }

    #[test]
    fn empty_target_is_noop_error() {
        let err = normalize_target("   ").unwrap_err();
        assert!(err.is_noop());
    }

    #[test]
    fn malformed_target_is_rejected() {
        assert!(matches!(normalize_target("http://"), Err(ScanError::InvalidTarget(_))));
    }

    #[test]
    fn join_follows_standard_semantics() {
        let client = build_client(&ScanOptions::default()).unwrap();
        let prober = Prober::new(client, Url::parse("http://example.test/app/index.html").unwrap());
        assert_eq!(prober.resolve("/admin/").unwrap().as_str(), "http://example.test/admin/");
        assert_eq!(prober.resolve("api/").unwrap().as_str(), "http://example.test/app/api/");
    }

    #[test]
    fn display_url_has_single_separator() {
        let client = build_client(&ScanOptions::default()).unwrap();
        let prober = Prober::new(client, normalize_target("example.test").unwrap());
        assert_eq!(prober.display_url("/x"), "http://example.test/x");
        assert_eq!(prober.display_url("x"), "http://example.test/x");
    }

    #[tokio::test]
    async fn unresolvable_path_is_absorbed_without_request() {
        let client = build_client(&ScanOptions::default()).unwrap();
        let prober = Prober::new(client, normalize_target("example.test").unwrap());
        match prober.probe_detailed("//[bad").await {
            ProbeOutcome::Absorbed { url, reason: AbsorbReason::InvalidUrl(_) } => {
                assert_eq!(url, "http://example.test//[bad");
            }
            other => panic!("expected invalid url, got {:?}", other),
        }
    }
}

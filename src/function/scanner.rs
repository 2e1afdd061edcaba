// scanner.rs
use super::ScanError;
use super::catalog::{CRITICAL_PATHS, PathCatalog, ROBOTS_PATH};
use super::classifier::Category;
use super::prober::{ProbeOutcome, Prober, ScanOptions, build_client, normalize_target};
use super::report::Finding;
use chrono::{DateTime, Local};
use futures::stream::{self, StreamExt};
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

const PROGRESS_STEP: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanMode {
    Full,
    Quick,
    Custom,
}

impl fmt::Display for ScanMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ScanMode::Full => "full",
            ScanMode::Quick => "quick",
            ScanMode::Custom => "custom",
        })
    }
}

impl std::str::FromStr for ScanMode {
    type Err = ScanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "full" => Ok(ScanMode::Full),
            "quick" => Ok(ScanMode::Quick),
            "custom" => Ok(ScanMode::Custom),
            other => Err(ScanError::InvalidConfig(format!("未知扫描模式: {}", other))),
        }
    }
}

/// 一次扫描调用的状态，扫描结束后交给调用方
#[derive(Debug, Clone)]
pub struct ScanSession {
    pub mode: ScanMode,
    pub base_url: Url,
    pub started_at: DateTime<Local>,
    pub finished_at: Option<DateTime<Local>>,
    pub findings: Vec<Finding>,
    /// 快速/自定义模式下未命中的URL
    pub missed: Vec<String>,
    pub interrupted: bool,
}

impl ScanSession {
    pub fn new(mode: ScanMode, base_url: Url) -> Self {
        Self {
            mode,
            base_url,
            started_at: Local::now(),
            finished_at: None,
            findings: Vec::new(),
            missed: Vec::new(),
            interrupted: false,
        }
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Local::now());
    }

    pub fn duration(&self) -> Duration {
        self.finished_at
            .unwrap_or_else(Local::now)
            .signed_duration_since(self.started_at)
            .to_std()
            .unwrap_or_default()
    }
}

/// 扫描过程的展示回调，默认全部为空实现
pub trait ScanObserver: Sync {
    fn on_scan_start(&self, _mode: ScanMode, _base_url: &Url) {}
    fn on_category_start(&self, _name: &str, _total: usize) {}
    fn on_progress(&self, _completed: usize, _total: usize) {}
    fn on_finding(&self, _finding: &Finding) {}
    fn on_miss(&self, _url: &str) {}
    fn on_category_end(&self, _name: &str) {}
}

pub struct NoopObserver;

impl ScanObserver for NoopObserver {}

pub struct Scanner {
    options: ScanOptions,
    catalog: PathCatalog,
    cancel: Arc<AtomicBool>,
}

impl Scanner {
    pub fn new(options: ScanOptions) -> Self {
        Self::with_catalog(options, PathCatalog::default())
    }

    pub fn with_catalog(options: ScanOptions, catalog: PathCatalog) -> Self {
        Self {
            options,
            catalog,
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    /// 使用外部的中断标志 (例如 Ctrl-C 处理器持有的那个)
    pub fn with_cancel_flag(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.load(Ordering::SeqCst)
    }

    /// 每次扫描单独建立会话和连接池
    fn start(&self, mode: ScanMode, target: &str) -> Result<(ScanSession, Prober), ScanError> {
        if self.options.concurrency == 0 {
            return Err(ScanError::InvalidConfig("并发数必须大于0".into()));
        }
        let base_url = normalize_target(target)?;
        let client = build_client(&self.options)?;
        info!(%mode, target = %base_url, "开始扫描");
        Ok((ScanSession::new(mode, base_url.clone()), Prober::new(client, base_url)))
    }

    fn complete(&self, mut session: ScanSession) -> ScanSession {
        session.interrupted = self.is_cancelled();
        if session.interrupted {
            warn!(found = session.findings.len(), "扫描被中断，返回部分结果");
        }
        session.finish();
        info!(found = session.findings.len(), elapsed_ms = session.duration().as_millis() as u64, "扫描结束");
        session
    }

    /// 并发探测，但结果按输入顺序依次产出。
    /// 中断后尚未开始的路径返回 None。
    async fn probe_ordered<F>(&self, prober: &Prober, paths: &[String], mut on_outcome: F)
    where
        F: FnMut(usize, Option<ProbeOutcome>),
    {
        let mut outcomes = stream::iter(paths.iter())
            .map(|path| async move {
                if self.is_cancelled() {
                    return None;
                }
                let outcome = prober.probe_detailed(path).await;
                if let ProbeOutcome::Absorbed { url, reason } = &outcome {
                    if self.options.diagnostics {
                        info!(%url, %reason, "未命中");
                    } else {
                        debug!(%url, %reason, "未命中");
                    }
                }
                Some(outcome)
            })
            .buffered(self.options.concurrency);

        let mut completed = 0;
        while let Some(outcome) = outcomes.next().await {
            completed += 1;
            on_outcome(completed, outcome);
        }
    }

    /// 全量扫描：按字典顺序逐类探测，最后单独检查 robots.txt
    pub async fn full_scan(&self, target: &str, observer: &dyn ScanObserver) -> Result<ScanSession, ScanError> {
        self.catalog.validate()?;
        let (mut session, prober) = self.start(ScanMode::Full, target)?;
        observer.on_scan_start(ScanMode::Full, &session.base_url);

        for (name, paths) in self.catalog.categories() {
            if self.is_cancelled() {
                break;
            }
            let total = paths.len();
            debug!(category = name, total, "扫描分类");
            observer.on_category_start(name, total);

            self.probe_ordered(&prober, paths, |completed, outcome| {
                if let Some(ProbeOutcome::Found(finding)) = outcome {
                    observer.on_finding(&finding);
                    session.findings.push(finding);
                }
                if completed % PROGRESS_STEP == 0 || completed == total {
                    observer.on_progress(completed, total);
                }
            })
            .await;

            observer.on_category_end(name);
        }

        if !self.is_cancelled() {
            if let Some(mut finding) = prober.probe(ROBOTS_PATH).await {
                finding.category = Category::Robots;
                observer.on_finding(&finding);
                session.findings.push(finding);
            }
        }

        Ok(self.complete(session))
    }

    /// 快速扫描：只检查关键路径，未命中的也逐条报告
    pub async fn quick_scan(&self, target: &str, observer: &dyn ScanObserver) -> Result<ScanSession, ScanError> {
        let paths: Vec<String> = CRITICAL_PATHS.iter().map(|p| p.to_string()).collect();
        self.scan_listed(ScanMode::Quick, target, &paths, observer).await
    }

    /// 自定义扫描：路径按输入顺序探测，空列表直接返回空结果
    pub async fn custom_scan(
        &self,
        target: &str,
        paths: &[String],
        observer: &dyn ScanObserver,
    ) -> Result<ScanSession, ScanError> {
        let paths = normalize_paths(paths);
        self.scan_listed(ScanMode::Custom, target, &paths, observer).await
    }

    async fn scan_listed(
        &self,
        mode: ScanMode,
        target: &str,
        paths: &[String],
        observer: &dyn ScanObserver,
    ) -> Result<ScanSession, ScanError> {
        let (mut session, prober) = self.start(mode, target)?;
        observer.on_scan_start(mode, &session.base_url);

        let ScanSession { findings, missed, .. } = &mut session;
        self.probe_ordered(&prober, paths, |_, outcome| match outcome {
            Some(ProbeOutcome::Found(finding)) => {
                observer.on_finding(&finding);
                findings.push(finding);
            }
            Some(ProbeOutcome::Absorbed { url, .. }) => {
                observer.on_miss(&url);
                missed.push(url);
            }
            None => {}
        })
        .await;

        Ok(self.complete(session))
    }
}

/// 按模式分派扫描，命令行和交互菜单共用
pub async fn run_scan(
    scanner: &Scanner,
    mode: ScanMode,
    target: &str,
    custom_paths: &[String],
    observer: &dyn ScanObserver,
) -> Result<ScanSession, ScanError> {
    match mode {
        ScanMode::Full => scanner.full_scan(target, observer).await,
        ScanMode::Quick => scanner.quick_scan(target, observer).await,
        ScanMode::Custom => scanner.custom_scan(target, custom_paths, observer).await,
    }
}

/// 去掉空白项，并保证每条路径以 / 开头
pub fn normalize_paths(paths: &[String]) -> Vec<String> {
    paths
        .iter()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .map(|p| if p.starts_with('/') { p.to_string() } else { format!("/{}", p) })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_are_normalized() {
        let input = vec!["test".to_string(), "  ".to_string(), "/already/slash".to_string(), " api ".to_string()];
        assert_eq!(normalize_paths(&input), ["/test", "/already/slash", "/api"]);
    }

    #[test]
    fn mode_parses_case_insensitively() {
        assert_eq!("Quick".parse::<ScanMode>().unwrap(), ScanMode::Quick);
        assert!("deep".parse::<ScanMode>().is_err());
        assert_eq!(ScanMode::Custom.to_string(), "custom");
    }

    #[tokio::test]
    async fn empty_target_is_rejected_before_probing() {
        let scanner = Scanner::new(ScanOptions::default());
        let err = scanner.quick_scan("", &NoopObserver).await.unwrap_err();
        assert!(err.is_noop());
    }

    #[tokio::test]
    async fn malformed_catalog_is_reported_once() {
        let catalog = PathCatalog::from_lists(vec![("broken".to_string(), vec![String::new()])]);
        let scanner = Scanner::with_catalog(ScanOptions::default(), catalog);
        let err = scanner.full_scan("example.test", &NoopObserver).await.unwrap_err();
        assert!(matches!(err, ScanError::InvalidCatalog(_)));
    }

    #[tokio::test]
    async fn zero_concurrency_is_config_error() {
        let options = ScanOptions { concurrency: 0, ..ScanOptions::default() };
        let err = Scanner::new(options).custom_scan("example.test", &[], &NoopObserver).await.unwrap_err();
        assert!(matches!(err, ScanError::InvalidConfig(_)));
    }

    #[test]
    fn session_duration_is_non_negative() {
        let mut session = ScanSession::new(ScanMode::Full, Url::parse("http://example.test/").unwrap());
        session.finish();
        assert!(session.finished_at.is_some());
        assert!(session.duration() < Duration::from_secs(5));
    }
}

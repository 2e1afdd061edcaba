use super::ScanError;
use super::aggregate::{aggregate, is_critical};
use super::classifier::Category;
use super::scanner::ScanSession;
use serde::{Serialize, Deserialize};
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

/// 一次成功探测 (状态码 < 400) 的记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub url: String,
    pub status_code: u16,
    pub path: String,
    pub category: Category,
    pub content_length: usize,
}

// JSON 报告结构
#[derive(Debug, Serialize)]
pub struct ScanReport<'a> {
    pub target: &'a str,
    pub mode: String,
    pub scan_timestamp: String,
    pub scan_duration_ms: u64,
    pub interrupted: bool,
    pub total_count: usize,
    pub category_counts: Vec<CategoryCount>,
    pub critical_urls: Vec<&'a str>,
    pub findings: &'a [Finding],
}

#[derive(Debug, Serialize)]
pub struct CategoryCount {
    pub category: Category,
    pub count: usize,
}

impl<'a> ScanReport<'a> {
    pub fn from_session(session: &'a ScanSession) -> Self {
        let summary = aggregate(&session.findings);
        let critical_urls = session
            .findings
            .iter()
            .filter(|f| is_critical(f))
            .map(|f| f.url.as_str())
            .collect();

        Self {
            target: session.base_url.as_str(),
            mode: session.mode.to_string(),
            scan_timestamp: session.started_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            scan_duration_ms: session.duration().as_millis() as u64,
            interrupted: session.interrupted,
            total_count: summary.total_count,
            category_counts: summary
                .by_category
                .iter()
                .map(|g| CategoryCount { category: g.category, count: g.findings.len() })
                .collect(),
            critical_urls,
            findings: &session.findings,
        }
    }
}

/// 纯文本报告：头部信息 + 按分类分组的结果
pub fn render_text_report(session: &ScanSession) -> String {
    let summary = aggregate(&session.findings);
    let mut out = String::new();

    let _ = writeln!(out, "扫描结果: {}", session.base_url);
    let _ = writeln!(out, "时间: {}", session.started_at.format("%Y-%m-%d %H:%M:%S"));
    let _ = writeln!(out, "共发现: {} 项", summary.total_count);
    let _ = writeln!(out, "{}\n", "=".repeat(60));

    for group in &summary.by_category {
        let _ = writeln!(out, "\n[{}] (发现 {} 项):", group.category, group.findings.len());
        for item in &group.findings {
            let _ = writeln!(out, "  [{}] {}", item.status_code, item.url);
            let _ = writeln!(out, "      大小: {} 字节", item.content_length);
        }
    }

    out
}

/// scan_<域名>_<unix时间戳>.txt
pub fn default_report_name(target: &str, unix_ts: i64) -> String {
    let domain = target
        .trim_start_matches("http://")
        .trim_start_matches("https://")
        .split('/')
        .next()
        .unwrap_or_default();
    format!("scan_{}_{}.txt", domain, unix_ts)
}

/// 保存文本报告，没有结果时返回 Ok(None)
pub fn save_text_report(
    session: &ScanSession,
    output_path: Option<&Path>,
) -> Result<Option<PathBuf>, ScanError> {
    if session.findings.is_empty() {
        return Ok(None);
    }

    let path = match output_path {
        Some(p) => p.to_path_buf(),
        None => PathBuf::from(default_report_name(
            session.base_url.as_str(),
            chrono::Local::now().timestamp(),
        )),
    };

    write_with_parent(&path, render_text_report(session).as_bytes())?;
    Ok(Some(path))
}

pub fn save_json_report(session: &ScanSession, output_path: &Path) -> Result<(), ScanError> {
    let json = serde_json::to_string_pretty(&ScanReport::from_session(session))
        .map_err(|e| ScanError::SerializationError(format!("序列化结果失败: {}", e)))?;
    write_with_parent(output_path, json.as_bytes())
}

fn write_with_parent(path: &Path, contents: &[u8]) -> Result<(), ScanError> {
    // 创建输出目录（如果不存在）
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .map_err(|e| ScanError::IOError(format!("无法创建输出目录: {}", e)))?;
    }
    fs::write(path, contents)
        .map_err(|e| ScanError::ReportError(format!("写入报告文件失败: {}", e)))
}

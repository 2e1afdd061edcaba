// config.rs
use structopt::StructOpt;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use super::ScanError;
use super::prober::ScanOptions;
use super::scanner::{ScanMode, normalize_paths};

#[derive(Debug, StructOpt)]
#[structopt(name = "path_scan", about = "探测目标站点的API、后台和敏感文件路径")]
pub struct Config {
    /// 目标 URL (例如: example.com 或 https://example.com)，不填则进入交互菜单
    #[structopt(short, long)]
    pub target: Option<String>,

    /// 扫描模式: full / quick / custom
    #[structopt(short, long, default_value = "full")]
    pub mode: ScanMode,

    /// 自定义路径，逗号分隔 (custom 模式)
    #[structopt(short, long, use_delimiter = true)]
    pub paths: Vec<String>,

    /// 包含自定义路径的文件 (每行一个路径)
    #[structopt(long)]
    pub paths_file: Option<PathBuf>,

    /// 并发请求数量
    #[structopt(short, long, default_value = "10")]
    pub concurrency: usize,

    /// 请求超时时间 (秒)
    #[structopt(long, default_value = "5")]
    pub timeout: u64,

    /// 代理服务器 (例如: http://localhost:8080)
    #[structopt(long)]
    pub proxy: Option<String>,

    /// User-Agent 请求头
    #[structopt(long, default_value = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")]
    pub user_agent: String,

    /// 文本报告输出路径
    #[structopt(short, long)]
    pub output: Option<PathBuf>,

    /// JSON 报告输出路径
    #[structopt(long)]
    pub json: Option<PathBuf>,

    /// 输出每个未命中路径的原因 (状态码或连接错误)
    #[structopt(long)]
    pub diagnostics: bool,

    /// 输出调试日志
    #[structopt(short, long)]
    pub verbose: bool,
}

impl Config {
    pub fn validate(&self) -> Result<(), ScanError> {
        // 验证并发合理性
        if self.concurrency == 0 || self.concurrency > 100 {
            return Err(ScanError::InvalidConfig("并发数区间为1~100。".to_string()));
        }

        if self.timeout == 0 {
            return Err(ScanError::InvalidConfig("超时时间必须大于0秒。".to_string()));
        }

        // 验证代理
        if let Some(proxy) = &self.proxy {
            if !proxy.starts_with("http://") && !proxy.starts_with("https://") {
                return Err(ScanError::InvalidConfig("代理URL必须以http://或https://开头".to_string()));
            }
        }

        if self.user_agent.trim().is_empty() {
            return Err(ScanError::InvalidConfig("User-Agent不能为空。".to_string()));
        }

        if let Some(file) = &self.paths_file {
            if !file.exists() {
                return Err(ScanError::InvalidConfig("路径文件不存在。".to_string()));
            }
        }

        Ok(())
    }

    pub fn scan_options(&self) -> ScanOptions {
        ScanOptions {
            concurrency: self.concurrency,
            timeout: Duration::from_secs(self.timeout),
            user_agent: self.user_agent.clone(),
            proxy: self.proxy.clone(),
            diagnostics: self.diagnostics,
        }
    }

    /// 命令行路径在前，文件中的路径追加在后
    pub fn custom_paths(&self) -> Result<Vec<String>, ScanError> {
        let mut paths = self.paths.clone();

        if let Some(file) = &self.paths_file {
            let content = fs::read_to_string(file)
                .map_err(|e| ScanError::IOError(format!("无法读取路径文件: {}", e)))?;
            paths.extend(
                content
                    .lines()
                    .map(|line| line.trim().to_string())
                    .filter(|path| !path.is_empty()),
            );
        }

        Ok(paths)
    }

    /// custom 模式下没有任何有效路径时返回 NoPaths，调用方无需建立连接
    pub fn scan_paths(&self) -> Result<Vec<String>, ScanError> {
        let paths = self.custom_paths()?;
        if self.mode == ScanMode::Custom && normalize_paths(&paths).is_empty() {
            return Err(ScanError::NoPaths);
        }
        Ok(paths)
    }
}

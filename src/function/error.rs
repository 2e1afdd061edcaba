//错误处理板块
use thiserror::Error;
use std::io;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("目标URL不能为空")]
    EmptyTarget,

    #[error("未输入任何路径")]
    NoPaths,

    #[error("目标URL无效: {0}")]
    InvalidTarget(String),

    #[error("配置错误: {0}")]
    InvalidConfig(String),

    #[error("路径字典错误: {0}")]
    InvalidCatalog(String),

    #[error("HTTP客户端错误: {0}")]
    ClientError(String),

    #[error("文件操作错误: {0}")]
    IOError(String),

    #[error("序列化错误: {0}")]
    SerializationError(String),

    #[error("报告生成错误: {0}")]
    ReportError(String),
}

impl ScanError {
    /// 可恢复的"无需扫描"情况，调用方只需提示而不是报错退出
    pub fn is_noop(&self) -> bool {
        matches!(self, ScanError::EmptyTarget | ScanError::NoPaths)
    }
}

impl From<io::Error> for ScanError {
    fn from(err: io::Error) -> Self {
        ScanError::IOError(err.to_string())
    }
}

impl From<url::ParseError> for ScanError {
    fn from(err: url::ParseError) -> Self {
        ScanError::InvalidTarget(err.to_string())
    }
}

impl From<serde_json::Error> for ScanError {
    fn from(err: serde_json::Error) -> Self {
        ScanError::SerializationError(err.to_string())
    }
}

// classifier.rs
use serde::{Serialize, Deserialize};
use std::fmt;

/// 发现结果的分类，封闭集合
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "API")]
    Api,
    Admin,
    File,
    Directory,
    Other,
    Robots,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Api => "API",
            Category::Admin => "Admin",
            Category::File => "File",
            Category::Directory => "Directory",
            Category::Other => "Other",
            Category::Robots => "Robots",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 根据路径内容判断分类，按优先级匹配，大小写不敏感。
/// Robots 不由这里产生，只在全量扫描的 robots.txt 检查中强制指定。
pub fn classify(path: &str) -> Category {
    let lower = path.to_lowercase();
    let has = |needles: &[&str]| needles.iter().any(|n| lower.contains(n));

    if has(&["api", "rest", "graphql"]) {
        Category::Api
    } else if has(&["admin", "panel", "manage"]) {
        Category::Admin
    } else if lower.contains('.') {
        Category::File
    } else if lower.contains('/') {
        Category::Directory
    } else {
        Category::Other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_takes_priority_over_admin() {
        assert_eq!(classify("/api/admin/"), Category::Api);
        assert_eq!(classify("/REST/"), Category::Api);
        assert_eq!(classify("/graphql"), Category::Api);
        assert_eq!(classify("/api-docs/"), Category::Api);
    }

    #[test]
    fn admin_before_file_extension() {
        assert_eq!(classify("/admin.php"), Category::Admin);
        assert_eq!(classify("/phpMyAdmin/"), Category::Admin);
        assert_eq!(classify("/adminpanel/"), Category::Admin);
        assert_eq!(classify("/manager/"), Category::Admin);
    }

    #[test]
    fn files_and_directories() {
        assert_eq!(classify("/robots.txt"), Category::File);
        assert_eq!(classify("/.env"), Category::File);
        assert_eq!(classify("/uploads/"), Category::Directory);
        assert_eq!(classify("/"), Category::Directory);
        assert_eq!(classify("/login/"), Category::Directory);
    }

    #[test]
    fn bare_word_is_other() {
        assert_eq!(classify("secret"), Category::Other);
        assert_eq!(classify(""), Category::Other);
    }

    #[test]
    fn category_serializes_as_display_name() {
        assert_eq!(serde_json::to_string(&Category::Api).unwrap(), "\"API\"");
        assert_eq!(Category::Robots.to_string(), "Robots");
    }
}

// catalog.rs
use super::ScanError;
use std::collections::HashSet;

/// 字典中的一条路径，category 为其所在字典的名称
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathEntry {
    pub path: String,
    pub category: String,
}

const API_PATHS: &[&str] = &[
    "/api/", "/api/v1/", "/api/v2/", "/graphql", "/rest/", "/soap/",
    "/swagger/", "/swagger-ui/", "/api-docs/", "/wp-json/", "/json/",
    "/oauth/", "/auth/", "/login/", "/logout/", "/register/", "/signup/",
];

const ADMIN_PATHS: &[&str] = &[
    "/admin/", "/administrator/", "/wp-admin/", "/admin/login/",
    "/admincp/", "/admin123/", "/adminpanel/", "/adminarea/",
    "/dashboard/", "/control/", "/backend/", "/manager/", "/moderator/",
    "/phpmyadmin/", "/mysql/", "/pma/", "/dbadmin/", "/sql/", "/admin.php",
];

const FILE_PATHS: &[&str] = &[
    "/robots.txt", "/sitemap.xml", "/.env", "/.git/config",
    "/config.php", "/web.config", "/.htaccess", "/phpinfo.php",
    "/info.php", "/test.php", "/backup.zip", "/dump.sql",
];

const DIRECTORY_PATHS: &[&str] = &[
    "/uploads/", "/images/", "/img/", "/css/", "/js/", "/assets/",
    "/static/", "/media/", "/files/", "/downloads/", "/backup/",
    "/tmp/", "/temp/", "/cache/", "/logs/", "/config/", "/includes/",
    "/src/", "/lib/", "/vendor/", "/node_modules/", "/storage/",
];

const MISC_PATHS: &[&str] = &[
    "/", "/index.php", "/home/", "/main/", "/portal/", "/welcome/",
    "/internal/", "/intranet/", "/private/", "/secret/", "/hidden/",
];

/// 快速扫描使用的关键路径，顺序固定
pub const CRITICAL_PATHS: &[&str] = &[
    "/admin/", "/administrator/", "/wp-admin/", "/admin.php",
    "/api/", "/api/v1/", "/config.php", "/.env", "/.git/config",
    "/phpinfo.php", "/robots.txt", "/sitemap.xml", "/.htaccess",
];

pub const ROBOTS_PATH: &str = "/robots.txt";

/// 分类名 -> 有序路径列表，保持定义顺序
#[derive(Debug, Clone)]
pub struct PathCatalog {
    lists: Vec<(String, Vec<String>)>,
}

impl Default for PathCatalog {
    fn default() -> Self {
        let builtin: [(&str, &[&str]); 5] = [
            ("API & endpoints", API_PATHS),
            ("Admin panels", ADMIN_PATHS),
            ("Files & configs", FILE_PATHS),
            ("Directories", DIRECTORY_PATHS),
            ("Misc", MISC_PATHS),
        ];
        Self::from_lists(builtin.iter().map(|(name, paths)| {
            (name.to_string(), paths.iter().map(|p| p.to_string()).collect())
        }))
    }
}

impl PathCatalog {
    pub fn from_lists<I>(lists: I) -> Self
    where
        I: IntoIterator<Item = (String, Vec<String>)>,
    {
        Self { lists: lists.into_iter().collect() }
    }

    pub fn categories(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.lists.iter().map(|(name, paths)| (name.as_str(), paths.as_slice()))
    }

    pub fn entries(&self) -> impl Iterator<Item = PathEntry> + '_ {
        self.lists.iter().flat_map(|(name, paths)| {
            paths.iter().map(move |path| PathEntry {
                path: path.clone(),
                category: name.clone(),
            })
        })
    }

    pub fn len(&self) -> usize {
        self.lists.iter().map(|(_, paths)| paths.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 扫描前检查字典数据是否完整
    pub fn validate(&self) -> Result<(), ScanError> {
        let mut seen = HashSet::new();
        for (name, paths) in &self.lists {
            if name.trim().is_empty() {
                return Err(ScanError::InvalidCatalog("分类名称不能为空".into()));
            }
            if !seen.insert(name.as_str()) {
                return Err(ScanError::InvalidCatalog(format!("分类重复: {}", name)));
            }
            if let Some(idx) = paths.iter().position(|p| p.trim().is_empty()) {
                return Err(ScanError::InvalidCatalog(format!(
                    "分类 {} 的第 {} 条路径为空",
                    name,
                    idx + 1
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_keeps_definition_order() {
        let catalog = PathCatalog::default();
        let names: Vec<_> = catalog.categories().map(|(name, _)| name).collect();
        assert_eq!(
            names,
            ["API & endpoints", "Admin panels", "Files & configs", "Directories", "Misc"]
        );
        assert_eq!(catalog.len(), 17 + 19 + 12 + 22 + 11);
        assert!(catalog.validate().is_ok());
    }

    #[test]
    fn entries_carry_source_list() {
        let catalog = PathCatalog::default();
        let first = catalog.entries().next().unwrap();
        assert_eq!(first, PathEntry { path: "/api/".into(), category: "API & endpoints".into() });
        let robots = catalog.entries().find(|e| e.path == ROBOTS_PATH).unwrap();
        assert_eq!(robots.category, "Files & configs");
        let (last_name, last_paths) = catalog.categories().last().unwrap();
        assert_eq!((last_name, last_paths[0].as_str()), ("Misc", "/"));
    }

    #[test]
    fn critical_list_has_thirteen_paths() {
        assert_eq!(CRITICAL_PATHS.len(), 13);
    }

    #[test]
    fn validate_rejects_malformed_lists() {
        let dup = PathCatalog::from_lists(vec![
            ("a".to_string(), vec!["/x".to_string()]),
            ("a".to_string(), vec!["/y".to_string()]),
        ]);
        assert!(matches!(dup.validate(), Err(ScanError::InvalidCatalog(_))));

        let blank = PathCatalog::from_lists(vec![("a".to_string(), vec!["  ".to_string()])]);
        assert!(matches!(blank.validate(), Err(ScanError::InvalidCatalog(_))));

        let unnamed = PathCatalog::from_lists(vec![(String::new(), vec![])]);
        assert!(unnamed.validate().is_err());
    }
}

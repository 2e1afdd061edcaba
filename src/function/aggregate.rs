// aggregate.rs
use super::classifier::Category;
use super::report::Finding;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryGroup {
    pub category: Category,
    pub findings: Vec<Finding>,
}

/// 按分类汇总后的结果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScanSummary {
    /// 分类按首次出现的顺序排列
    pub by_category: Vec<CategoryGroup>,
    pub total_count: usize,
    /// Admin 分类且状态码恰好为 200
    pub critical: Vec<Finding>,
}

pub fn is_critical(finding: &Finding) -> bool {
    finding.category == Category::Admin && finding.status_code == 200
}

pub fn aggregate(findings: &[Finding]) -> ScanSummary {
    let mut by_category: Vec<CategoryGroup> = Vec::new();

    for finding in findings {
        match by_category.iter_mut().find(|g| g.category == finding.category) {
            Some(group) => group.findings.push(finding.clone()),
            None => by_category.push(CategoryGroup {
                category: finding.category,
                findings: vec![finding.clone()],
            }),
        }
    }

    ScanSummary {
        by_category,
        total_count: findings.len(),
        critical: findings.iter().filter(|f| is_critical(f)).cloned().collect(),
    }
}

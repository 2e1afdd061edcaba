// console.rs 终端输出，只负责展示
use super::aggregate::ScanSummary;
use super::classifier::Category;
use super::report::Finding;
use super::scanner::{ScanMode, ScanObserver, ScanSession};
use colored::{ColoredString, Colorize};
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Mutex;
use url::Url;

const BANNER: &str = r"
  _____ _ _
 / ____(_) |
| (___  _| |_ __ _ _ __ ___
 \___ \| | __/ _` | '__/ __|
 ____) | | || (_| | | | (__
|_____/|_|\__\__,_|_|  \___|

      Website path scanner
";

pub fn print_banner() {
    println!("{}", BANNER.cyan());
    println!("{}", "=".repeat(60));
}

pub fn print_help() {
    println!("\n{}", "=".repeat(60));
    println!("帮助");
    println!("{}", "=".repeat(60));
    println!("查找网站上隐藏的目录、API接口和管理后台。");
    println!("\n功能:");
    println!("  1. 全量扫描 - 检查全部内置路径");
    println!("  2. 快速扫描 - 只检查关键路径");
    println!("  3. 自定义扫描 - 检查你输入的路径");
    println!("  4. 将结果保存为文本报告");
    println!("\n内置字典包括:");
    println!("  • API 接口 (/api/, /rest/, /graphql)");
    println!("  • 管理后台 (/admin/, /wp-admin/, /phpmyadmin/)");
    println!("  • 配置文件 (robots.txt, .env, config.php)");
    println!("  • 常见目录 (/uploads/, /images/, /css/)");
    println!("\n注意:");
    println!("  • 仅用于测试你有权测试的网站");
    println!("  • 扫描前务必获得授权");
    println!("{}", "=".repeat(60));
}

fn status_line(finding: &Finding) -> ColoredString {
    let line = format!("  [{}] {}", finding.status_code, finding.url);
    if finding.status_code == 200 { line.green() } else { line.yellow() }
}

fn category_color(category: Category, text: String) -> ColoredString {
    match category {
        Category::Api => text.magenta(),
        Category::Admin => text.red(),
        Category::File => text.yellow(),
        Category::Directory => text.blue(),
        Category::Other => text.cyan(),
        Category::Robots => text.green(),
    }
}

/// 扫描过程的终端输出：命中行、未命中行和分类进度条
#[derive(Default)]
pub struct ConsoleObserver {
    progress: Mutex<Option<ProgressBar>>,
}

impl ConsoleObserver {
    pub fn new() -> Self {
        Self::default()
    }

    fn print(&self, line: impl std::fmt::Display) {
        let guard = self.progress.lock().unwrap_or_else(|e| e.into_inner());
        match guard.as_ref() {
            Some(pb) if !pb.is_finished() => pb.println(line.to_string()),
            _ => println!("{}", line),
        }
    }
}

impl ScanObserver for ConsoleObserver {
    fn on_scan_start(&self, mode: ScanMode, base_url: &Url) {
        let title = match mode {
            ScanMode::Full => "全量扫描",
            ScanMode::Quick => "快速扫描",
            ScanMode::Custom => "自定义扫描",
        };
        println!("{}", format!("[+] {}: {}", title, base_url).green());
        println!("{}", format!("[+] 开始时间: {}", chrono::Local::now().format("%Y-%m-%d %H:%M:%S")).green());
        println!("{}", "=".repeat(60));
    }

    fn on_category_start(&self, name: &str, total: usize) {
        println!("{}", format!("[*] 正在检查 {}...", name).cyan());
        let pb = ProgressBar::new(total as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("  进度: {pos}/{len} {bar:30.cyan/blue}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("##-"),
        );
        *self.progress.lock().unwrap_or_else(|e| e.into_inner()) = Some(pb);
    }

    fn on_progress(&self, completed: usize, _total: usize) {
        if let Some(pb) = self.progress.lock().unwrap_or_else(|e| e.into_inner()).as_ref() {
            pb.set_position(completed as u64);
        }
    }

    fn on_finding(&self, finding: &Finding) {
        self.print(status_line(finding));
    }

    fn on_miss(&self, url: &str) {
        self.print(format!("  [--] {} (未找到)", url));
    }

    fn on_category_end(&self, _name: &str) {
        if let Some(pb) = self.progress.lock().unwrap_or_else(|e| e.into_inner()).take() {
            pb.finish();
        }
    }
}

/// 按分类输出汇总、总数和关键发现
pub fn print_summary(session: &ScanSession, summary: &ScanSummary) {
    if summary.total_count == 0 {
        println!("{}", "\n[-] 未发现任何结果".yellow());
    } else {
        println!("\n{}", "=".repeat(60).green());
        println!("{}", "扫描结果".bold());
        println!("{}", "=".repeat(60).green());

        for group in &summary.by_category {
            let header = format!("\n[+] {} (发现 {} 项):", group.category, group.findings.len());
            println!("{}", category_color(group.category, header));
            for item in &group.findings {
                println!("{} ({} 字节)", status_line(item), item.content_length);
            }
        }

        println!("\n{}", "=".repeat(60).green());
        println!("{}", format!("[+] 共发现: {} 项", summary.total_count).green());
    }

    if !summary.critical.is_empty() {
        println!("\n{}", "[!] 关键发现:".red().bold());
        for item in &summary.critical {
            println!("{}", format!("  !!! 管理后台: {}", item.url).red());
        }
    }

    if session.interrupted {
        println!("{}", "[!] 扫描被中断，以上为部分结果".yellow());
    }
    println!("{}", format!("\n[+] 扫描耗时: {:.2} 秒", session.duration().as_secs_f64()).green());
}

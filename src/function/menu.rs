// menu.rs 交互式菜单，只在未指定 --target 时使用
use super::ScanError;
use super::aggregate::aggregate;
use super::console::{ConsoleObserver, print_banner, print_help, print_summary};
use super::prober::ScanOptions;
use super::report::save_text_report;
use super::scanner::{ScanMode, ScanSession, Scanner, run_scan};
use colored::Colorize;
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input, Select};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

const MENU_ITEMS: &[&str] = &[
    "全量扫描",
    "快速扫描 (关键路径)",
    "扫描自定义路径",
    "显示帮助",
    "退出",
];

fn prompt<T>(result: dialoguer::Result<T>) -> io::Result<T> {
    result.map_err(|e| match e {
        dialoguer::Error::IO(e) => e,
    })
}

pub fn interrupted_error() -> io::Error {
    io::Error::new(io::ErrorKind::Interrupted, "扫描被用户中断")
}

/// 逐行读取路径，输入 done 结束
fn read_custom_paths(theme: &ColorfulTheme) -> io::Result<Vec<String>> {
    println!("\n输入要检查的路径，例如: /admin/, /api/, /test.php");
    println!("输入 'done' 结束");
    println!("{}", "-".repeat(40));

    let mut paths = Vec::new();
    loop {
        let line: String = prompt(
            Input::with_theme(theme)
                .with_prompt("路径 (或 'done' 开始扫描)")
                .allow_empty(true)
                .interact_text(),
        )?;
        let line = line.trim();
        if line.eq_ignore_ascii_case("done") {
            break;
        }
        if !line.is_empty() {
            paths.push(line.to_string());
        }
    }
    Ok(paths)
}

fn offer_save(theme: &ColorfulTheme, session: &ScanSession) -> io::Result<()> {
    let save = prompt(
        Confirm::with_theme(theme)
            .with_prompt("保存结果到文件?")
            .default(false)
            .interact(),
    )?;
    if !save {
        return Ok(());
    }

    let name: String = prompt(
        Input::with_theme(theme)
            .with_prompt("文件名 (回车自动命名)")
            .allow_empty(true)
            .interact_text(),
    )?;
    let name = name.trim();
    let output = (!name.is_empty()).then(|| PathBuf::from(name));

    match save_text_report(session, output.as_deref()) {
        Ok(Some(path)) => println!("{}", format!("[+] 结果已保存至: {}", path.display()).green()),
        Ok(None) => println!("{}", "[-] 没有可保存的结果".yellow()),
        Err(e) => println!("{}", format!("[-] 保存失败: {}", e).red()),
    }
    Ok(())
}

pub async fn run_menu(options: ScanOptions, cancel: Arc<AtomicBool>) -> anyhow::Result<()> {
    let theme = ColorfulTheme::default();
    print_banner();

    loop {
        let choice = prompt(
            Select::with_theme(&theme)
                .with_prompt("主菜单")
                .items(MENU_ITEMS)
                .default(0)
                .interact(),
        )?;

        let mode = match choice {
            0 => ScanMode::Full,
            1 => ScanMode::Quick,
            2 => ScanMode::Custom,
            3 => {
                print_help();
                continue;
            }
            _ => {
                println!("{}", "\n[+] 退出程序...".green());
                return Ok(());
            }
        };

        let target: String = prompt(
            Input::with_theme(&theme)
                .with_prompt("目标URL")
                .allow_empty(true)
                .interact_text(),
        )?;
        if target.trim().is_empty() {
            println!("{}", format!("[-] {}", ScanError::EmptyTarget).red());
            continue;
        }

        let paths = if mode == ScanMode::Custom {
            read_custom_paths(&theme)?
        } else {
            Vec::new()
        };
        if mode == ScanMode::Custom && paths.is_empty() {
            println!("{}", format!("[-] {}", ScanError::NoPaths).yellow());
            continue;
        }

        cancel.store(false, Ordering::SeqCst);
        let scanner = Scanner::new(options.clone()).with_cancel_flag(Arc::clone(&cancel));
        let observer = ConsoleObserver::new();

        match run_scan(&scanner, mode, &target, &paths, &observer).await {
            Ok(session) => {
                print_summary(&session, &aggregate(&session.findings));
                if session.interrupted {
                    return Err(interrupted_error().into());
                }
                if !session.findings.is_empty() {
                    offer_save(&theme, &session)?;
                }
            }
            Err(e) if e.is_noop() => println!("{}", format!("[-] {}", e).yellow()),
            Err(e) => println!("{}", format!("[-] 扫描出错: {}", e).red()),
        }
    }
}

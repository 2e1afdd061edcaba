use anyhow::Result;
use colored::Colorize;
use path_scan::function::aggregate::aggregate;
use path_scan::function::config::Config;
use path_scan::function::console::{ConsoleObserver, print_banner, print_summary};
use path_scan::function::menu::{interrupted_error, run_menu};
use path_scan::function::report::{save_json_report, save_text_report};
use path_scan::function::scanner::{Scanner, run_scan};
use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use structopt::StructOpt;
use tracing::warn;
use tracing_subscriber::EnvFilter;

fn init_tracing(config: &Config) {
    let filter = if config.verbose {
        "path_scan=debug"
    } else if config.diagnostics {
        "path_scan=info"
    } else {
        "path_scan=warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_target(false)
        .init();
}

/// 第一次 Ctrl-C 停止发起新请求，第二次直接退出
fn spawn_interrupt_handler(cancel: Arc<AtomicBool>) {
    tokio::spawn(async move {
        while tokio::signal::ctrl_c().await.is_ok() {
            if cancel.swap(true, Ordering::SeqCst) {
                eprintln!("{}", "\n[!] 程序被用户中断".red());
                std::process::exit(130);
            }
            warn!("收到中断信号，等待进行中的请求结束");
        }
    });
}

async fn run_once(config: &Config, target: &str, cancel: Arc<AtomicBool>) -> Result<()> {
    let paths = match config.scan_paths() {
        Ok(paths) => paths,
        Err(e) if e.is_noop() => {
            println!("{}", format!("[-] {}", e).yellow());
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };
    let scanner = Scanner::new(config.scan_options()).with_cancel_flag(cancel);
    let observer = ConsoleObserver::new();

    print_banner();
    let session = match run_scan(&scanner, config.mode, target, &paths, &observer).await {
        Ok(session) => session,
        Err(e) if e.is_noop() => {
            println!("{}", format!("[-] {}", e).yellow());
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    print_summary(&session, &aggregate(&session.findings));

    if let Some(output) = &config.output {
        match save_text_report(&session, Some(output.as_path()))? {
            Some(path) => println!("{}", format!("[+] 结果已保存至: {}", path.display()).green()),
            None => println!("{}", "[-] 没有可保存的结果".yellow()),
        }
    }
    if let Some(json) = &config.json {
        save_json_report(&session, json)?;
        println!("扫描报告已保存至: {:?}", json);
    }

    if session.interrupted {
        return Err(interrupted_error().into());
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // 1. 解析命令行参数
    let config = Config::from_args();
    init_tracing(&config);
    config.validate()?;

    let cancel = Arc::new(AtomicBool::new(false));
    spawn_interrupt_handler(Arc::clone(&cancel));

    // 2. 执行扫描 (未指定目标时进入交互菜单)
    let result = match config.target.as_deref() {
        Some(target) => run_once(&config, target, cancel).await,
        None => run_menu(config.scan_options(), cancel).await,
    };

    // 3. 用户中断时以非零状态退出，不打印错误链
    if let Err(e) = &result {
        if e.downcast_ref::<io::Error>().is_some_and(|e| e.kind() == io::ErrorKind::Interrupted) {
            eprintln!("{}", "\n[!] 程序被用户中断".red());
            std::process::exit(130);
        }
    }
    result
}

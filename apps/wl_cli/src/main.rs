// apps/wl_cli/src/main.rs

//! Windline 命令行界面
//!
//! 用内置高斯翼模型在单分区网格上驱动耦合核心，
//! 用于演示、冒烟验证与配置检查。

mod commands;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Windline 执行器线耦合命令行工具
#[derive(Parser)]
#[command(name = "wl_cli")]
#[command(author = "Windline Team")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Windline actuator line coupling demo", long_about = None)]
struct Cli {
    /// 日志级别 (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 运行演示模拟
    Run(commands::run::RunArgs),
    /// 校验耦合配置文件
    Validate(commands::validate::ValidateArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // 初始化日志
    let level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Run(args) => commands::run::execute(args),
        Commands::Validate(args) => commands::validate::execute(args),
    }
}

//! # Allegro Node
//!
//! Allegro Hand 控制节点：以固定频率执行力矩控制循环，并发布关节状态。
//!
//! ```bash
//! # 仿真手，零力矩，运行 2000 拍
//! allegro-node run --max-ticks 2000
//!
//! # 从配置文件读取循环参数和手部身份，使用 PD 保持姿态
//! allegro-node run --config allegro.toml --controller pd
//!
//! # 查看生效配置
//! allegro-node config show --config allegro.toml
//! ```
//!
//! 急停（设备状态为负）时进程以非零状态码退出。

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod monitor;

use commands::{ConfigCommand, RunCommand};

/// Allegro Hand 控制节点
#[derive(Parser, Debug)]
#[command(name = "allegro-node")]
#[command(about = "Allegro Hand periodic control node", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// 运行控制循环
    Run {
        #[command(flatten)]
        args: RunCommand,
    },

    /// 配置文件工具
    #[command(subcommand)]
    Config(ConfigCommand),
}

fn main() -> Result<()> {
    // 初始化日志
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("allegro_node=info".parse()?)
                .add_directive("allegro_driver=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { args } => args.execute(),
        Commands::Config(cmd) => cmd.execute(),
    }
}

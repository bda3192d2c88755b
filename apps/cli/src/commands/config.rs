//! 配置文件命令
//!
//! 查看生效配置、检查配置文件

use allegro_tools::{HandInfo, NodeConfig, TomlConfigSource};
use anyhow::{Context, Result};
use clap::Subcommand;
use std::path::{Path, PathBuf};

/// 配置命令
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// 打印生效配置（TOML）
    Show {
        /// 配置文件路径（省略时打印默认配置）
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// 检查配置文件
    Check {
        /// 配置文件路径
        path: PathBuf,
    },
}

impl ConfigCommand {
    pub fn execute(self) -> Result<()> {
        match self {
            ConfigCommand::Show { config } => Self::show_(config.as_deref()),
            ConfigCommand::Check { path } => Self::check_(&path),
        }
    }

    fn show_(path: Option<&Path>) -> Result<()> {
        let config = load_node_config(path)?;
        print!("{}", config.to_toml_string()?);
        Ok(())
    }

    fn check_(path: &Path) -> Result<()> {
        let config = load_node_config(Some(path))?;
        let source = TomlConfigSource::load_from_file(path)
            .with_context(|| format!("读取配置文件失败: {}", path.display()))?;
        let info = HandInfo::load(&source);

        println!("✅ 配置有效: {}", path.display());
        println!("  频率: {} Hz", config.control_loop.frequency_hz);
        println!("  控制律: {:?}", config.controller.kind);
        println!("  发布通道: {}", config.sink.topic);
        println!("  手部: {} ({}), 序列号 {:?}", info.robot_name, info.which_hand, info.serial);
        Ok(())
    }
}

/// 读取节点配置（省略路径时使用默认值）
pub fn load_node_config(path: Option<&Path>) -> Result<NodeConfig> {
    match path {
        Some(p) => NodeConfig::load_from_file(p)
            .with_context(|| format!("加载配置文件失败: {}", p.display())),
        None => Ok(NodeConfig::default()),
    }
}

//! # Allegro Tools - 配置与身份信息
//!
//! **依赖原则**: 只依赖 `allegro-protocol`，不依赖驱动层或传输层
//!
//! ## 包含模块
//!
//! - `source` - 路径式键值配置源（TOML 实现）
//! - `hand_info` - 手部身份信息（启动时读取一次）
//! - `node_config` - 控制节点配置文件

pub mod hand_info;
pub mod node_config;
pub mod source;

use thiserror::Error;

pub use hand_info::{HandInfo, Handedness};
pub use node_config::{
    ControllerKind, ControllerSettings, JOINT_STATE_TOPIC, LoopSettings, NodeConfig, SinkSettings,
};
pub use source::{ConfigSource, TomlConfigSource};

/// 配置错误
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

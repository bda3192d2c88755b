//! # 手部身份信息
//!
//! 启动时从配置源读取一次。任何键缺失都不致命：对应字段保持默认值，并记录一条警告。

use crate::ConfigSource;
use std::fmt;
use tracing::{debug, warn};

/// 配置键前缀
pub const HAND_INFO_PREFIX: &str = "hand_info";

/// 左右手
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Handedness {
    Right,
    Left,
    #[default]
    Unknown,
}

impl Handedness {
    /// 解析 `which_hand` 字段（大小写不敏感，接受 `right`/`left`/`r`/`l`）
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "right" | "r" => Handedness::Right,
            "left" | "l" => Handedness::Left,
            _ => Handedness::Unknown,
        }
    }
}

impl fmt::Display for Handedness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Handedness::Right => "right",
            Handedness::Left => "left",
            Handedness::Unknown => "unknown",
        };
        write!(f, "{}", s)
    }
}

/// 手部身份信息
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HandInfo {
    pub robot_name: String,
    pub which_hand: Handedness,
    pub manufacturer: String,
    pub origin: String,
    pub serial: String,
    pub version: f64,
}

impl HandInfo {
    /// 从配置源加载
    ///
    /// 读取 `hand_info/{robot_name, which_hand, manufacturer, origin, serial, version}`。
    pub fn load(source: &dyn ConfigSource) -> Self {
        let mut info = HandInfo::default();

        if let Some(v) = read_str(source, "robot_name") {
            info.robot_name = v;
        }
        if let Some(v) = read_str(source, "which_hand") {
            info.which_hand = Handedness::parse(&v);
            if info.which_hand == Handedness::Unknown {
                warn!("Unrecognized hand_info/which_hand value: {:?}", v);
            }
        }
        if let Some(v) = read_str(source, "manufacturer") {
            info.manufacturer = v;
        }
        if let Some(v) = read_str(source, "origin") {
            info.origin = v;
        }
        if let Some(v) = read_str(source, "serial") {
            info.serial = v;
        }

        let key = format!("{}/version", HAND_INFO_PREFIX);
        match source.get_f64(&key) {
            Some(v) => info.version = v,
            None => warn!("Config key '{}' not found, using default", key),
        }

        debug!(?info, "Loaded hand info");
        info
    }
}

fn read_str(source: &dyn ConfigSource, field: &str) -> Option<String> {
    let key = format!("{}/{}", HAND_INFO_PREFIX, field);
    let value = source.get_str(&key);
    if value.is_none() {
        warn!("Config key '{}' not found, using default", key);
    }
    value
}

//! # 节点配置
//!
//! 控制节点的 TOML 配置文件。所有段与字段均可省略，缺省值即参考系统的取值
//! （1 kHz、3 ms 稳定延时、队列深度 3）。
//!
//! ```toml
//! [loop]
//! frequency_hz = 1000.0
//! settle_delay_ms = 3
//! spin = true
//!
//! [sink]
//! topic = "allegroHand/joint_states"
//! queue_depth = 3
//!
//! [controller]
//! kind = "pd"
//! kp = 1.0
//! kd = 0.05
//! max_torque = 0.7
//! ```

use crate::ConfigError;
use allegro_protocol::DOF_JOINTS;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// 默认状态发布通道名
pub const JOINT_STATE_TOPIC: &str = "allegroHand/joint_states";

/// 节点配置
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    #[serde(rename = "loop")]
    pub control_loop: LoopSettings,
    pub sink: SinkSettings,
    pub controller: ControllerSettings,
}

/// 控制循环参数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoopSettings {
    /// 控制频率（Hz）
    pub frequency_hz: f64,
    /// open 之后的硬件稳定延时（毫秒）
    pub settle_delay_ms: u64,
    /// 最大 tick 数（None 表示无限运行）
    pub max_ticks: Option<u64>,
    /// 使用 spin_sleep 实现低抖动定时
    pub spin: bool,
}

impl Default for LoopSettings {
    fn default() -> Self {
        Self {
            frequency_hz: 1000.0,
            settle_delay_ms: 3,
            max_ticks: None,
            spin: true,
        }
    }
}

/// 状态发布参数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SinkSettings {
    pub topic: String,
    /// 未消费消息的最大排队数
    pub queue_depth: usize,
}

impl Default for SinkSettings {
    fn default() -> Self {
        Self {
            topic: JOINT_STATE_TOPIC.to_string(),
            queue_depth: 3,
        }
    }
}

/// 控制律选择
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControllerKind {
    /// 零力矩（被动）
    #[default]
    Zero,
    /// 固定目标的关节 PD
    Pd,
}

/// 控制律参数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerSettings {
    pub kind: ControllerKind,
    pub kp: f64,
    pub kd: f64,
    /// 力矩限幅（绝对值）
    pub max_torque: f64,
    /// PD 目标位置（rad）；为空表示保持启动时的位置
    pub setpoint: Vec<f64>,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            kind: ControllerKind::Zero,
            kp: 1.0,
            kd: 0.05,
            max_torque: 0.7,
            setpoint: Vec::new(),
        }
    }
}

impl NodeConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: NodeConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// 检查取值范围
    pub fn validate(&self) -> Result<(), ConfigError> {
        let l = &self.control_loop;
        if !(l.frequency_hz > 0.0) || !l.frequency_hz.is_finite() {
            return Err(ConfigError::Invalid(format!(
                "loop.frequency_hz must be > 0, got {}",
                l.frequency_hz
            )));
        }
        match Duration::try_from_secs_f64(1.0 / l.frequency_hz) {
            Ok(period) if !period.is_zero() => {},
            _ => {
                return Err(ConfigError::Invalid(format!(
                    "loop.frequency_hz {} gives a period outside the representable range",
                    l.frequency_hz
                )));
            },
        }
        if l.max_ticks == Some(0) {
            return Err(ConfigError::Invalid(
                "loop.max_ticks must be > 0 when set".to_string(),
            ));
        }
        if self.sink.queue_depth == 0 {
            return Err(ConfigError::Invalid(
                "sink.queue_depth must be > 0".to_string(),
            ));
        }
        if self.sink.topic.is_empty() {
            return Err(ConfigError::Invalid("sink.topic must not be empty".to_string()));
        }

        let c = &self.controller;
        if c.kp < 0.0 || c.kd < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "controller gains must be >= 0 (kp={}, kd={})",
                c.kp, c.kd
            )));
        }
        if !(c.max_torque > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "controller.max_torque must be > 0, got {}",
                c.max_torque
            )));
        }
        if !c.setpoint.is_empty() && c.setpoint.len() != DOF_JOINTS {
            return Err(ConfigError::Invalid(format!(
                "controller.setpoint must have {} entries, got {}",
                DOF_JOINTS,
                c.setpoint.len()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = NodeConfig::default();
        assert_eq!(config.control_loop.frequency_hz, 1000.0);
        assert_eq!(config.control_loop.settle_delay_ms, 3);
        assert_eq!(config.control_loop.max_ticks, None);
        assert_eq!(config.sink.topic, "allegroHand/joint_states");
        assert_eq!(config.sink.queue_depth, 3);
        assert_eq!(config.controller.kind, ControllerKind::Zero);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = NodeConfig::from_toml_str("").unwrap();
        assert_eq!(config, NodeConfig::default());
    }

    #[test]
    fn test_partial_document() {
        let config = NodeConfig::from_toml_str(
            r#"
[loop]
frequency_hz = 333.0
max_ticks = 10

[controller]
kind = "pd"
kp = 2.0

[hand_info]
robot_name = "ignored by NodeConfig"
"#,
        )
        .unwrap();

        assert_eq!(config.control_loop.frequency_hz, 333.0);
        assert_eq!(config.control_loop.max_ticks, Some(10));
        assert_eq!(config.control_loop.settle_delay_ms, 3);
        assert_eq!(config.controller.kind, ControllerKind::Pd);
        assert_eq!(config.controller.kp, 2.0);
        assert_eq!(config.controller.kd, 0.05);
    }

    #[test]
    fn test_invalid_frequency() {
        let result = NodeConfig::from_toml_str("[loop]\nfrequency_hz = 0.0\n");
        assert!(matches!(result, Err(ConfigError::Invalid(_))));

        let result = NodeConfig::from_toml_str("[loop]\nfrequency_hz = -5.0\n");
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_frequency_with_unrepresentable_period() {
        for text in ["[loop]\nfrequency_hz = 1e-30\n", "[loop]\nfrequency_hz = 1e30\n"] {
            let result = NodeConfig::from_toml_str(text);
            assert!(matches!(result, Err(ConfigError::Invalid(_))), "{}", text);
        }
        assert!(NodeConfig::from_toml_str("[loop]\nfrequency_hz = 0.5\n").is_ok());
    }

    #[test]
    fn test_invalid_queue_depth() {
        let result = NodeConfig::from_toml_str("[sink]\nqueue_depth = 0\n");
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_invalid_setpoint_length() {
        let result = NodeConfig::from_toml_str("[controller]\nsetpoint = [0.0, 1.0]\n");
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_unknown_controller_kind() {
        let result = NodeConfig::from_toml_str("[controller]\nkind = \"grasp\"\n");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_toml_roundtrip_preserves_values() {
        let mut config = NodeConfig::default();
        config.control_loop.frequency_hz = 500.0;
        config.controller.kind = ControllerKind::Pd;
        config.controller.setpoint = vec![0.1; DOF_JOINTS];

        let text = config.to_toml_string().unwrap();
        let parsed = NodeConfig::from_toml_str(&text).unwrap();
        assert_eq!(parsed, config);
    }
}

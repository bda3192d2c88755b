//! # 配置源
//!
//! 按路径式键（如 `hand_info/robot_name`）查询配置值。键不存在返回 `None`，
//! 是否致命由调用方决定。

use crate::ConfigError;
use std::fs;
use std::path::Path;

/// 键值配置源
pub trait ConfigSource {
    fn get_str(&self, key: &str) -> Option<String>;

    fn get_f64(&self, key: &str) -> Option<f64>;
}

/// 基于 TOML 文档的配置源
///
/// 键以 `/` 分隔逐层查找嵌套表。前导 `~` 与 `/` 会被忽略，
/// 因此 `~hand_info/serial` 与 `hand_info/serial` 等价。
///
/// ```rust
/// use allegro_tools::{ConfigSource, TomlConfigSource};
///
/// let source = TomlConfigSource::from_toml_str(r#"
/// [hand_info]
/// robot_name = "allegro_hand_right"
/// version = 4.0
/// "#).unwrap();
///
/// assert_eq!(source.get_str("hand_info/robot_name").as_deref(), Some("allegro_hand_right"));
/// assert_eq!(source.get_f64("~hand_info/version"), Some(4.0));
/// assert_eq!(source.get_str("hand_info/serial"), None);
/// ```
#[derive(Debug, Clone, Default)]
pub struct TomlConfigSource {
    root: toml::Table,
}

impl TomlConfigSource {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let root: toml::Table = toml::from_str(content)?;
        Ok(Self { root })
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    fn lookup(&self, key: &str) -> Option<&toml::Value> {
        let key = key.trim_start_matches('~').trim_start_matches('/');
        let mut segments = key.split('/').filter(|s| !s.is_empty());

        let first = segments.next()?;
        let mut value = self.root.get(first)?;
        for segment in segments {
            value = value.as_table()?.get(segment)?;
        }
        Some(value)
    }
}

impl ConfigSource for TomlConfigSource {
    fn get_str(&self, key: &str) -> Option<String> {
        match self.lookup(key)? {
            toml::Value::String(s) => Some(s.clone()),
            // 序列号等字段在部分配置里写成数字
            toml::Value::Integer(i) => Some(i.to_string()),
            _ => None,
        }
    }

    fn get_f64(&self, key: &str) -> Option<f64> {
        match self.lookup(key)? {
            toml::Value::Float(f) => Some(*f),
            toml::Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const DOC: &str = r#"
[hand_info]
robot_name = "allegro_hand_left"
which_hand = "left"
serial = 1234
version = 4

[hand_info.nested]
depth = 2.5
"#;

    #[test]
    fn test_nested_lookup() {
        let source = TomlConfigSource::from_toml_str(DOC).unwrap();
        assert_eq!(source.get_f64("hand_info/nested/depth"), Some(2.5));
        assert_eq!(source.get_str("hand_info/nested/depth"), None);
    }

    #[test]
    fn test_integer_coercion() {
        let source = TomlConfigSource::from_toml_str(DOC).unwrap();
        assert_eq!(source.get_str("hand_info/serial").as_deref(), Some("1234"));
        assert_eq!(source.get_f64("hand_info/version"), Some(4.0));
    }

    #[test]
    fn test_missing_key_is_none() {
        let source = TomlConfigSource::from_toml_str(DOC).unwrap();
        assert_eq!(source.get_str("hand_info/manufacturer"), None);
        assert_eq!(source.get_str("other/robot_name"), None);
        assert_eq!(source.get_str(""), None);
        // 中间节点不是表
        assert_eq!(source.get_str("hand_info/robot_name/x"), None);
    }

    #[test]
    fn test_private_prefix_is_ignored() {
        let source = TomlConfigSource::from_toml_str(DOC).unwrap();
        assert_eq!(
            source.get_str("~hand_info/which_hand").as_deref(),
            Some("left")
        );
        assert_eq!(
            source.get_str("/hand_info/which_hand").as_deref(),
            Some("left")
        );
    }

    #[test]
    fn test_invalid_toml_is_error() {
        let result = TomlConfigSource::from_toml_str("[hand_info\nrobot_name = ");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(DOC.as_bytes()).unwrap();

        let source = TomlConfigSource::load_from_file(file.path()).unwrap();
        assert_eq!(
            source.get_str("hand_info/robot_name").as_deref(),
            Some("allegro_hand_left")
        );
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let result = TomlConfigSource::load_from_file("/nonexistent/allegro/hand.toml");
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}

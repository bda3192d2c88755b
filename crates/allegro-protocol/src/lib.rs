//! # Allegro Hand Protocol Types
//!
//! 关节身份、关节向量与设备状态码。无状态、无硬件依赖，供上层所有 crate 共享。
//!
//! CAN 帧编码不在本 crate 范围内：传输层只暴露"写力矩 / 读位置"的整体事务。

pub mod joint;
pub mod status;

pub use joint::{DOF_JOINTS, Finger, JOINT_NAMES, Joint, JointArray, JointVector};
pub use status::DeviceStatus;

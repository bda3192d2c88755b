//! 驱动层模块
//!
//! 本模块提供 Allegro Hand 的周期控制循环，包括：
//! - 启动/关闭生命周期（open → 稳定延时 → 预热 → 循环 → close）
//! - 固定周期调度（绝对截止时间，超时计数）
//! - 一阶 IIR 位置滤波与有限差分速度
//! - 可替换的控制律（[`Controller`]）
//! - 每拍状态发布（[`StateSink`]）与急停检测
//!
//! # 使用场景
//!
//! 一个进程只驱动一只手。控制循环单线程运行，
//! 其他线程通过 [`Observer`] 读取最近一拍的快照，通过 [`StopHandle`] 请求停止。

pub mod control;
mod control_loop;
mod error;
pub mod filter;
mod node;
mod observer;
pub mod scheduler;
pub mod sink;
pub mod state;

pub use control::{Controller, JointPd, ZeroTorque};
pub use control_loop::ControlCore;
pub use error::DriverError;
pub use node::{AllegroNode, AllegroNodeBuilder, RunSummary, StopReason};
pub use observer::Observer;
pub use scheduler::{LoopConfig, PeriodicScheduler, StopHandle};
pub use sink::{ChannelSink, JointStateMessage, StateSink, TracingSink};
pub use state::{HandSnapshot, LoopState};

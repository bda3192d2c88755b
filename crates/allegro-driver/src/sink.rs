//! 状态发布
//!
//! 每拍把滤波位置、发布速度、力矩命令连同关节名和时间戳打包为一条
//! [`JointStateMessage`]，发往单一命名通道。发布是纯副作用，控制循环不消费返回值，
//! 且发布不得阻塞控制循环。

use crate::state::LoopState;
use allegro_protocol::{DOF_JOINTS, JOINT_NAMES, JointVector};
use crossbeam_channel::{Receiver, Sender, TrySendError, bounded};
use tracing::trace;

/// 关节状态消息
#[derive(Debug, Clone, PartialEq)]
pub struct JointStateMessage {
    /// 时间戳（UNIX 微秒）
    pub stamp_us: u64,
    /// 序号（tick 计数）
    pub seq: u64,
    pub name: [&'static str; DOF_JOINTS],
    /// 滤波位置
    pub position: JointVector,
    /// 原始位置有限差分
    pub velocity: JointVector,
    /// 力矩命令
    pub effort: JointVector,
}

impl JointStateMessage {
    pub fn from_state(state: &LoopState, seq: u64, stamp_us: u64) -> Self {
        Self {
            stamp_us,
            seq,
            name: JOINT_NAMES,
            position: state.position_filtered,
            velocity: state.velocity,
            effort: state.torque,
        }
    }
}

/// 状态发布接口
pub trait StateSink {
    /// 通道名
    fn topic(&self) -> &str;

    fn publish(&mut self, msg: &JointStateMessage);

    /// 关闭发布（节点关闭时调用一次）
    fn shutdown(&mut self) {}
}

impl<S: StateSink + ?Sized> StateSink for Box<S> {
    fn topic(&self) -> &str {
        (**self).topic()
    }

    fn publish(&mut self, msg: &JointStateMessage) {
        (**self).publish(msg)
    }

    fn shutdown(&mut self) {
        (**self).shutdown()
    }
}

/// 基于有界通道的发布器
///
/// 队列满时丢弃最旧的一条再写入，保证订阅者拿到的是最新状态，且控制循环不阻塞。
pub struct ChannelSink {
    topic: String,
    tx: Option<Sender<JointStateMessage>>,
    /// 用于在队列满时丢弃最旧消息
    drain: Receiver<JointStateMessage>,
    dropped: u64,
}

impl ChannelSink {
    /// 创建发布器，返回订阅端
    ///
    /// `queue_depth` 为 0 时按 1 处理。
    pub fn new(
        topic: impl Into<String>,
        queue_depth: usize,
    ) -> (Self, Receiver<JointStateMessage>) {
        let (tx, rx) = bounded(queue_depth.max(1));
        let sink = Self {
            topic: topic.into(),
            tx: Some(tx),
            drain: rx.clone(),
            dropped: 0,
        };
        (sink, rx)
    }

    /// 因队列满而丢弃的消息数
    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}

impl StateSink for ChannelSink {
    fn topic(&self) -> &str {
        &self.topic
    }

    fn publish(&mut self, msg: &JointStateMessage) {
        let Some(tx) = &self.tx else {
            return;
        };

        match tx.try_send(msg.clone()) {
            Ok(()) => {},
            Err(TrySendError::Full(msg)) => {
                let _ = self.drain.try_recv();
                self.dropped += 1;
                // 订阅者可能在这期间取走消息，再失败就放弃这一条
                if tx.try_send(msg).is_err() {
                    self.dropped += 1;
                }
            },
            // drain 持有接收端，通道不会断开
            Err(TrySendError::Disconnected(_)) => {},
        }
    }

    fn shutdown(&mut self) {
        // 丢弃 Sender，订阅者读完剩余消息后会看到通道断开
        self.tx = None;
    }
}

/// 以 trace 级别日志输出状态
pub struct TracingSink {
    topic: String,
}

impl TracingSink {
    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
        }
    }
}

impl StateSink for TracingSink {
    fn topic(&self) -> &str {
        &self.topic
    }

    fn publish(&mut self, msg: &JointStateMessage) {
        trace!(
            topic = %self.topic,
            seq = msg.seq,
            stamp_us = msg.stamp_us,
            position = ?msg.position.as_array(),
            velocity = ?msg.velocity.as_array(),
            effort = ?msg.effort.as_array(),
            "joint state"
        );
    }
}

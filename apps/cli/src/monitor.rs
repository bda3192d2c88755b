//! 状态订阅端
//!
//! 在独立线程中消费发布通道，每 `every` 条消息打印一次摘要。
//! 通道断开（节点关闭）后线程退出并返回收到的消息数。

use allegro_driver::JointStateMessage;
use crossbeam_channel::Receiver;
use std::thread::{self, JoinHandle};
use tracing::info;

pub fn spawn(rx: Receiver<JointStateMessage>, every: u64) -> JoinHandle<u64> {
    thread::spawn(move || {
        let mut received = 0u64;
        for msg in rx.iter() {
            received += 1;
            if msg.seq % every == 0 {
                info!(
                    seq = msg.seq,
                    stamp_us = msg.stamp_us,
                    "{} = {:.4} rad, effort {:.4}",
                    msg.name[0],
                    msg.position[0],
                    msg.effort[0]
                );
            }
        }
        received
    })
}

//! run 命令
//!
//! 启动控制节点，直到 Ctrl+C、达到 `--max-ticks` 或急停。

use allegro_can::{SimConfig, SimulatedHand};
use allegro_driver::{
    AllegroNode, ChannelSink, Controller, JointPd, LoopConfig, StopHandle, ZeroTorque,
};
use allegro_protocol::{DOF_JOINTS, JointVector};
use allegro_tools::{ControllerKind, ControllerSettings, NodeConfig, TomlConfigSource};
use anyhow::{Context, Result, anyhow};
use clap::{Args, ValueEnum};
use std::path::PathBuf;

use super::config::load_node_config;
use crate::monitor;

/// 控制律选择
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControllerArg {
    /// 零力矩（被动）
    Zero,
    /// 保持启动姿态的关节 PD
    Pd,
}

impl From<ControllerArg> for ControllerKind {
    fn from(arg: ControllerArg) -> Self {
        match arg {
            ControllerArg::Zero => ControllerKind::Zero,
            ControllerArg::Pd => ControllerKind::Pd,
        }
    }
}

/// 控制节点运行参数
#[derive(Args, Debug)]
pub struct RunCommand {
    /// 配置文件（同时提供 [hand_info] 身份信息）
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// 控制频率（Hz，覆盖配置）
    #[arg(short, long)]
    pub frequency: Option<f64>,

    /// 运行指定拍数后退出
    #[arg(long)]
    pub max_ticks: Option<u64>,

    /// 控制律（覆盖配置）
    #[arg(long, value_enum)]
    pub controller: Option<ControllerArg>,

    /// 仿真手在第 N 次事务后断电（用于演练急停）
    #[arg(long)]
    pub power_off_after: Option<u64>,

    /// 使用普通 sleep 代替 spin_sleep
    #[arg(long)]
    pub no_spin: bool,
}

impl RunCommand {
    pub fn execute(&self) -> Result<()> {
        let mut config = load_node_config(self.config.as_deref())?;
        self.apply_overrides(&mut config);
        config.validate()?;

        let source = match &self.config {
            Some(path) => TomlConfigSource::load_from_file(path)?,
            None => TomlConfigSource::from_toml_str("")?,
        };

        let hand = SimulatedHand::new(SimConfig {
            power_off_after: self.power_off_after,
            ..Default::default()
        });
        let controller = build_controller(&config.controller)?;

        let stop = StopHandle::new();
        let stop_on_signal = stop.clone();
        ctrlc::set_handler(move || {
            eprintln!("\nReceived interrupt signal. Shutting down...");
            stop_on_signal.request_stop();
        })
        .context("Failed to set signal handler")?;

        let (sink, rx) = ChannelSink::new(config.sink.topic.clone(), config.sink.queue_depth);
        let report_every = (config.control_loop.frequency_hz.round() as u64).max(1);
        let monitor = monitor::spawn(rx, report_every);

        let mut node = AllegroNode::builder(hand, controller, sink)
            .loop_config(LoopConfig::from(&config.control_loop))
            .config_source(&source)
            .stop_handle(stop)
            .start()?;

        let result = node.run();
        drop(node);
        let received = monitor.join().map_err(|_| anyhow!("monitor thread panicked"))?;

        let summary = result?;
        println!(
            "✅ Allegro Hand node stopped: {} ticks, {} overruns, {} messages received ({:?})",
            summary.ticks, summary.overruns, received, summary.reason
        );
        Ok(())
    }

    fn apply_overrides(&self, config: &mut NodeConfig) {
        if let Some(f) = self.frequency {
            config.control_loop.frequency_hz = f;
        }
        if let Some(n) = self.max_ticks {
            config.control_loop.max_ticks = Some(n);
        }
        if let Some(c) = self.controller {
            config.controller.kind = c.into();
        }
        if self.no_spin {
            config.control_loop.spin = false;
        }
    }
}

/// 按配置构造控制律
fn build_controller(settings: &ControllerSettings) -> Result<Box<dyn Controller>> {
    match settings.kind {
        ControllerKind::Zero => Ok(Box::new(ZeroTorque)),
        ControllerKind::Pd => {
            let mut pd = JointPd::new()
                .with_gains(settings.kp, settings.kd)
                .with_max_torque(settings.max_torque);
            if !settings.setpoint.is_empty() {
                let setpoint: [f64; DOF_JOINTS] =
                    settings.setpoint.as_slice().try_into().map_err(|_| {
                        anyhow!(
                            "controller.setpoint must have {} entries, got {}",
                            DOF_JOINTS,
                            settings.setpoint.len()
                        )
                    })?;
                pd = pd.with_setpoint(JointVector::from(setpoint));
            }
            Ok(Box::new(pd))
        },
    }
}

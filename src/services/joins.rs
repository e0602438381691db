//! # Join 编号分配器
//!
//! 将组件在当前导入批次中的序号映射为一组确定的 Join 编号
//! （数字 / 模拟 / 串行各一个）。纯函数，无共享状态。
//!
//! ## 分配规则
//! `base = 1000 + index * 10`，三个编号分别为 `base + 1`、`base + 2`、`base + 3`。
//! 步长 10 为后续新增的 Join 字段预留空间，因此任意两个不同序号
//! 得到的六个编号两两不同。
//!
//! 序号由调用方按批次显式传入（而不是模块级计数器），
//! 同一流水线可以安全地重复调用和测试。编号只保证批次内唯一，
//! 不与项目中已使用的 Join 做对账。

use serde::{Deserialize, Serialize};

/// 编号起点
const JOIN_BASE: u64 = 1000;

/// 相邻序号之间的编号步长
const JOIN_STRIDE: u64 = 10;

/// Join 编号的合法上限
pub const MAX_JOIN_NUMBER: u64 = 65535;

/// 一个组件的三路 Join 编号
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JoinTriple {
    pub digital: u64,
    pub analog: u64,
    pub serial: u64,
}

impl JoinTriple {
    /// 三个编号是否都在合法范围（1..=65535）内
    pub fn in_range(&self) -> bool {
        self.serial <= MAX_JOIN_NUMBER
    }
}

/// 为批次内第 `index` 个组件分配 Join 编号
pub fn allocate(index: usize) -> JoinTriple {
    let base = JOIN_BASE + index as u64 * JOIN_STRIDE;
    JoinTriple {
        digital: base + 1,
        analog: base + 2,
        serial: base + 3,
    }
}

//! 互评核心规则
//!
//! 这里只放纯计算逻辑，不做任何 I/O：
//! - `criteria`: 作业与评分维度的参数校验
//! - `lifecycle`: 提交/评审状态机
//! - `allocation`: 评审人分配
//! - `scoring`: 单份评审的加权总分
//! - `aggregate`: 互评均分与最终成绩

pub mod aggregate;
pub mod allocation;
pub mod criteria;
pub mod lifecycle;
pub mod scoring;

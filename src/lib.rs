//! Peer Review - 作业互评分配与评分引擎
//!
//! 基于 Actix Web 与 SeaORM 构建的互评子系统。
//!
//! # 架构
//! - `config`: 配置管理
//! - `domain`: 评分维度、状态机、评审分配、评分与成绩汇总（纯逻辑）
//! - `entity`: SeaORM 数据库实体
//! - `errors`: 统一错误处理
//! - `middlewares`: JWT 认证中间件
//! - `models`: 数据模型定义
//! - `routes`: API 路由层
//! - `runtime`: 运行时生命周期管理
//! - `services`: 互评服务与通知
//! - `storage`: 数据存储层（SeaORM）
//! - `utils`: 工具函数

pub mod config;
pub mod domain;
pub mod entity;
pub mod errors;
pub mod middlewares;
pub mod models;
pub mod routes;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod utils;

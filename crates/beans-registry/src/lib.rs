//! # Beans Registry
//!
//! 这个 crate 提供了 Vela 运行时装配的 Bean 注册表与容器实现。
//!
//! ## 核心组件
//!
//! - [`BeanDefinition`] / [`DefinitionMap`] / [`BeanSet`] - Bean 定义模型
//! - [`BeanRegistry`] - 单次装配过程的可变注册表
//! - [`BeanContainer`] - 定稿后的分层容器
//! - [`PostProcessor`] - 定稿前的定义集合后处理能力
//! - [`ArtifactAdapter`] - 工件描述符到工厂 Bean 的适配器
//!
//! ## 设计原则
//!
//! - 注册表每次装配新建，定稿时被消费，恰好定稿一次
//! - 容器不可变；单例缓存与层级查找由容器负责
//! - Bean 构造委托给宿主应用注册的工厂函数

pub mod adapter;
pub mod container;
pub mod definition;
pub mod factory;
pub mod postprocessor;
pub mod registry;

pub use adapter::*;
pub use container::*;
pub use definition::*;
pub use factory::*;
pub use postprocessor::*;
pub use registry::*;

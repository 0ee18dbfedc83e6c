//! # Beans Common
//!
//! 这个 crate 提供了 Vela 运行时 Bean 装配子系统的公共契约。
//!
//! ## 核心组件
//!
//! - [`Application`] - 应用句柄 trait
//! - [`Resource`] / [`ResourceLocator`] - 资源抽象与发现
//! - [`ArtifactDescriptor`] - 工件描述符契约
//! - 各领域错误类型（[`RegistryError`]、[`ResourceError`] 等）
//!
//! ## 设计原则
//!
//! - 单线程协作式装配模型，无内部锁
//! - 按资源隔离失败，装配过程尽力而为
//! - 宿主应用通过显式注册表提供工厂与描述符

pub mod application;
pub mod artifact;
pub mod errors;
pub mod resource;

pub use application::*;
pub use artifact::*;
pub use errors::*;
pub use resource::*;

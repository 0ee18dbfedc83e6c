//! # 运行时装配编排
//!
//! 这个 crate 把注册表、声明式源与资源发现组装为完整的装配流程：
//!
//! 1. [`RuntimeConfigurator`] 驱动一次顶层装配并产出容器
//! 2. [`ResourceMergeEngine`] 合并应用级外部描述符
//! 3. [`ScriptResourceLoader`] 发现并执行插件与应用的描述符
//! 4. [`BeanAccumulator`] 跨注册表携带已产出的 Bean 集合
//!
//! 顶层入口是尽力而为语义：单个资源的失败只记日志，装配总会
//! 产出一个容器。

pub mod accumulator;
pub mod configurator;
pub mod logging;
pub mod merge;
pub mod script_loader;

pub use accumulator::BeanAccumulator;
pub use configurator::{ConfiguratorState, RuntimeConfigurator};
pub use logging::LoggingConfig;
pub use merge::ResourceMergeEngine;
pub use script_loader::ScriptResourceLoader;

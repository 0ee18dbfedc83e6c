//! # 声明式 Bean 源
//!
//! 提供描述符资源的编译与执行能力：
//!
//! - **编译**：把资源文本解析为可重复执行的声明块
//! - **执行**：在给定的绑定环境下求值声明块，产出 Bean 集合
//! - **符号源**：按符号名注册的内嵌声明块，供无文件资源的场景使用
//!
//! 默认后端基于 TOML 描述符；后端通过 [`DeclarativeBeanSource`]
//! trait 可插拔替换。

pub mod locations;
pub mod source;
pub mod symbolic;
pub mod toml_source;

pub use locations::{PLUGIN_RESOURCES_PATTERN, SPRING_RESOURCES_CLASS, SPRING_RESOURCES_XML};
pub use source::{Bindings, DeclarationBlock, DeclarativeBeanSource};
pub use symbolic::{DeclarationProviderFn, SymbolicSourceRegistry};
pub use toml_source::TomlBeanSource;

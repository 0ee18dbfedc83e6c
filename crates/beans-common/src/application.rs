//! 应用句柄定义
//!
//! 装配过程中以 `application` 绑定变量的形式暴露给声明式描述符

use std::any::Any;
use std::fmt::Debug;
use std::sync::Arc;

/// 应用句柄 trait
///
/// 宿主应用在启动序列中构造一个句柄并交给配置器；
/// 声明式描述符运行时可以通过绑定变量引用它。
pub trait Application: Send + Sync + Debug {
    /// 应用名称
    fn name(&self) -> &str;

    /// 以 `Any` 形式访问具体应用类型
    fn as_any(&self) -> &dyn Any;
}

/// 通用应用句柄实现
///
/// 适用于测试和不需要自定义应用类型的简单宿主。
#[derive(Debug, Clone)]
pub struct GenericApplication {
    name: String,
}

impl GenericApplication {
    /// 创建新的应用句柄
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// 包装为共享句柄
    pub fn shared(name: impl Into<String>) -> Arc<dyn Application> {
        Arc::new(Self::new(name))
    }
}

impl Application for GenericApplication {
    fn name(&self) -> &str {
        &self.name
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

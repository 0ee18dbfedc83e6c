//! 声明块与声明式 Bean 源抽象

use beans_common::{Application, Resource, SourceError, SourceResult};
use beans_registry::BeanSet;
use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

/// 编译后的声明块
///
/// 资源文本解析后的格式中立表示，可在不同的绑定环境下重复执行。
#[derive(Debug, Clone)]
pub struct DeclarationBlock {
    /// 来源位置（诊断用途）
    pub location: String,
    /// 解析后的声明树，`beans` 键下是 Bean 声明
    pub root: serde_json::Value,
}

impl DeclarationBlock {
    /// 从解析结果构造声明块
    pub fn new(location: impl Into<String>, root: serde_json::Value) -> Self {
        Self {
            location: location.into(),
            root,
        }
    }
}

/// 声明块执行时可见的绑定环境
///
/// 描述符通过 `{ binding = "名称" }` 形式引用绑定对象，
/// 典型绑定是当前应用实例。
#[derive(Default)]
pub struct Bindings {
    entries: HashMap<String, Arc<dyn Any + Send + Sync>>,
}

impl Bindings {
    /// 创建空绑定环境
    pub fn new() -> Self {
        Self::default()
    }

    /// 注入一个绑定对象
    pub fn bind(&mut self, name: impl Into<String>, value: Arc<dyn Any + Send + Sync>) {
        self.entries.insert(name.into(), value);
    }

    /// 注入当前应用实例，绑定名固定为 `application`
    pub fn bind_application(&mut self, application: Arc<dyn Application>) {
        self.bind("application", Arc::new(application));
    }

    /// 带应用绑定的环境
    pub fn with_application(application: Arc<dyn Application>) -> Self {
        let mut bindings = Self::new();
        bindings.bind_application(application);
        bindings
    }

    /// 查找绑定对象
    pub fn get(&self, name: &str) -> Option<&Arc<dyn Any + Send + Sync>> {
        self.entries.get(name)
    }

    /// 查找必需绑定，缺失时报错
    pub fn require(&self, name: &str) -> SourceResult<&Arc<dyn Any + Send + Sync>> {
        self.entries
            .get(name)
            .ok_or_else(|| SourceError::BindingNotFound {
                name: name.to_string(),
            })
    }

    /// 绑定数量
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl std::fmt::Debug for Bindings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bindings")
            .field("names", &self.entries.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// 声明式 Bean 源
///
/// 编译与执行分离：同一个声明块可以在不同绑定环境下多次执行。
pub trait DeclarativeBeanSource: Send + Sync {
    /// 源后端名称（诊断用途）
    fn name(&self) -> &str;

    /// 把资源编译为声明块
    fn compile(&self, resource: &dyn Resource) -> SourceResult<DeclarationBlock>;

    /// 在绑定环境下执行声明块，产出 Bean 集合
    fn run(&self, block: &DeclarationBlock, bindings: &Bindings) -> SourceResult<BeanSet>;
}

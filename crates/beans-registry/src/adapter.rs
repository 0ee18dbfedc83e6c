//! 工件适配器
//!
//! 把一个命名、有类型的工件描述符包装为容器可消费的工厂 Bean。

use beans_common::{ArtifactDescriptor, ArtifactError};
use std::any::{Any, TypeId};
use std::sync::Arc;

/// 工件适配器
///
/// 适配器自身绝不缓存实例：`is_singleton()` 为 true 时，
/// 缓存产出的实例是外围容器的职责。
#[derive(Clone)]
pub struct ArtifactAdapter {
    descriptor: Arc<dyn ArtifactDescriptor>,
    singleton: bool,
}

impl ArtifactAdapter {
    /// 包装一个工件描述符（默认单例）
    pub fn new(descriptor: Arc<dyn ArtifactDescriptor>) -> Self {
        Self {
            descriptor,
            singleton: true,
        }
    }

    /// 设置单例标记
    pub fn with_singleton(mut self, singleton: bool) -> Self {
        self.singleton = singleton;
        self
    }

    /// 设置为瞬时工件
    pub fn transient(self) -> Self {
        self.with_singleton(false)
    }

    /// 实例化工件，失败时返回实例化错误
    pub fn produce(&self) -> Result<Arc<dyn Any + Send + Sync>, ArtifactError> {
        self.descriptor.new_instance()
    }

    /// 工件声明类型
    pub fn declared_type(&self) -> TypeId {
        self.descriptor.artifact_type()
    }

    /// 工件类型名称
    pub fn type_name(&self) -> &str {
        self.descriptor.type_name()
    }

    /// 底层描述符名称
    pub fn descriptor_name(&self) -> &str {
        self.descriptor.name()
    }

    /// 是否单例
    pub fn is_singleton(&self) -> bool {
        self.singleton
    }
}

impl std::fmt::Debug for ArtifactAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArtifactAdapter")
            .field("descriptor", &self.descriptor.name())
            .field("type_name", &self.descriptor.type_name())
            .field("singleton", &self.singleton)
            .finish()
    }
}

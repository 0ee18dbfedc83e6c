//! 工件描述符契约
//!
//! 工件是宿主应用提供的领域类型；描述符把"可加载类型 + 工厂操作"
//! 打包为一个可命名的不可变引用。

use crate::errors::ArtifactError;
use std::any::{Any, TypeId};
use std::sync::Arc;

/// 工件描述符 trait
pub trait ArtifactDescriptor: Send + Sync {
    /// 工件名称
    fn name(&self) -> &str;

    /// 实例化一个新工件（可能失败）
    fn new_instance(&self) -> Result<Arc<dyn Any + Send + Sync>, ArtifactError>;

    /// 工件声明类型
    fn artifact_type(&self) -> TypeId;

    /// 工件类型名称（诊断用途）
    fn type_name(&self) -> &str;
}

/// 工厂函数类型
type ArtifactFactoryFn =
    Box<dyn Fn() -> Result<Arc<dyn Any + Send + Sync>, ArtifactError> + Send + Sync>;

/// 基于闭包的工件描述符实现
pub struct SimpleArtifactDescriptor {
    name: String,
    type_name: String,
    artifact_type: TypeId,
    factory: ArtifactFactoryFn,
}

impl SimpleArtifactDescriptor {
    /// 创建新的工件描述符
    pub fn new<T, F>(name: impl Into<String>, factory: F) -> Self
    where
        T: Send + Sync + 'static,
        F: Fn() -> Result<T, ArtifactError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            type_name: std::any::type_name::<T>().to_string(),
            artifact_type: TypeId::of::<T>(),
            factory: Box::new(move || {
                factory().map(|instance| Arc::new(instance) as Arc<dyn Any + Send + Sync>)
            }),
        }
    }
}

impl ArtifactDescriptor for SimpleArtifactDescriptor {
    fn name(&self) -> &str {
        &self.name
    }

    fn new_instance(&self) -> Result<Arc<dyn Any + Send + Sync>, ArtifactError> {
        (self.factory)()
    }

    fn artifact_type(&self) -> TypeId {
        self.artifact_type
    }

    fn type_name(&self) -> &str {
        &self.type_name
    }
}

impl std::fmt::Debug for SimpleArtifactDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimpleArtifactDescriptor")
            .field("name", &self.name)
            .field("type_name", &self.type_name)
            .field("factory", &"<function>")
            .finish()
    }
}

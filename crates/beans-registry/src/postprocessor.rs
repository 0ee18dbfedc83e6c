//! 注册表后处理器

use crate::definition::DefinitionMap;
use beans_common::RegistryError;

/// 注册表后处理器 trait
///
/// 在容器定稿前对累计的 Bean 定义集合进行调整。
/// 应用顺序即注册顺序：父容器继承的后处理器先于本地发现的执行。
pub trait PostProcessor: Send + Sync {
    /// 后处理器名称（诊断用途）
    fn name(&self) -> &str;

    /// 调整 Bean 定义集合
    fn post_process(&self, definitions: &mut DefinitionMap) -> Result<(), RegistryError>;
}

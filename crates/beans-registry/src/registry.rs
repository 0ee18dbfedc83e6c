//! 可变 Bean 注册表
//!
//! 注册表承载单次装配过程的 Bean 定义、别名与待应用后处理器。
//! 每次顶层装配新建一个注册表，定稿时被消费转换为不可变容器。

use crate::container::BeanContainer;
use crate::definition::{BeanDefinition, BeanSet, DefinitionMap};
use crate::factory::BeanFactoryRegistry;
use crate::postprocessor::PostProcessor;
use beans_common::{RegistryError, RegistryResult};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, error, warn};
use uuid::Uuid;

/// 别名解析的最大跳数，超出即视为循环
const MAX_ALIAS_HOPS: usize = 64;

/// 判断注册 `alias -> target` 是否会产生循环
pub(crate) fn alias_creates_cycle(
    aliases: &HashMap<String, String>,
    alias: &str,
    target: &str,
) -> bool {
    let mut current = target.to_string();
    for _ in 0..MAX_ALIAS_HOPS {
        if current == alias {
            return true;
        }
        match aliases.get(&current) {
            Some(next) => current = next.clone(),
            None => return false,
        }
    }
    true
}

/// 沿别名链解析规范名；链路必须终止
pub(crate) fn resolve_alias_chain(
    aliases: &HashMap<String, String>,
    name: &str,
) -> RegistryResult<String> {
    let mut chain = vec![name.to_string()];
    let mut current = name.to_string();
    while let Some(next) = aliases.get(&current) {
        if chain.contains(next) || chain.len() > MAX_ALIAS_HOPS {
            chain.push(next.clone());
            return Err(RegistryError::AliasCycle {
                chain: chain.join(" -> "),
            });
        }
        chain.push(next.clone());
        current = next.clone();
    }
    Ok(current)
}

/// 可变 Bean 注册表
pub struct BeanRegistry {
    id: Uuid,
    definitions: DefinitionMap,
    aliases: HashMap<String, String>,
    post_processors: Vec<Arc<dyn PostProcessor>>,
    parent: Option<Arc<BeanContainer>>,
    factories: Arc<BeanFactoryRegistry>,
}

impl std::fmt::Debug for BeanRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BeanRegistry")
            .field("id", &self.id)
            .field("definitions", &self.definitions.len())
            .field("aliases", &self.aliases.len())
            .field("post_processors", &self.post_processors.len())
            .field("has_parent", &self.parent.is_some())
            .finish()
    }
}

impl BeanRegistry {
    /// 创建新的注册表
    pub fn new(factories: Arc<BeanFactoryRegistry>) -> Self {
        Self {
            id: Uuid::new_v4(),
            definitions: DefinitionMap::new(),
            aliases: HashMap::new(),
            post_processors: Vec::new(),
            parent: None,
            factories,
        }
    }

    /// 创建挂接父容器的注册表
    pub fn with_parent(factories: Arc<BeanFactoryRegistry>, parent: Arc<BeanContainer>) -> Self {
        let mut registry = Self::new(factories);
        registry.parent = Some(parent);
        registry
    }

    /// 注册表标识
    ///
    /// 累积器用它判断"当前绑定的注册表是否还是同一个"。
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// 父容器
    pub fn parent(&self) -> Option<&Arc<BeanContainer>> {
        self.parent.as_ref()
    }

    /// 装配所用的 Bean 工厂注册表
    pub fn factories(&self) -> &Arc<BeanFactoryRegistry> {
        &self.factories
    }

    /// 注册 Bean 定义
    pub fn add_bean_definition(&mut self, name: impl Into<String>, definition: BeanDefinition) {
        let name = name.into();
        debug!("注册 Bean 定义: {}", name);
        self.definitions.insert(name, definition);
    }

    /// 注册别名
    ///
    /// 自引用别名被忽略；会形成循环的别名链被拒绝。
    pub fn add_alias(
        &mut self,
        alias: impl Into<String>,
        name: impl Into<String>,
    ) -> RegistryResult<()> {
        let alias = alias.into();
        let name = name.into();

        if alias == name {
            warn!("忽略自引用别名: {}", alias);
            return Ok(());
        }
        if alias_creates_cycle(&self.aliases, &alias, &name) {
            return Err(RegistryError::AliasCycle {
                chain: format!("{alias} -> {name}"),
            });
        }
        if let Some(previous) = self.aliases.insert(alias.clone(), name.clone()) {
            debug!("别名 {} 由 {} 改指 {}", alias, previous, name);
        } else {
            debug!("注册别名: {} -> {}", alias, name);
        }
        Ok(())
    }

    /// 追加待应用的后处理器（保持注册顺序）
    pub fn add_post_processor(&mut self, processor: Arc<dyn PostProcessor>) {
        debug!("登记后处理器: {}", processor.name());
        self.post_processors.push(processor);
    }

    /// 待应用的后处理器列表
    pub fn post_processors(&self) -> &[Arc<dyn PostProcessor>] {
        &self.post_processors
    }

    /// 沿别名链解析规范名
    pub fn canonical_name(&self, name: &str) -> RegistryResult<String> {
        resolve_alias_chain(&self.aliases, name)
    }

    /// 按名称（含别名）查找定义
    pub fn definition(&self, name: &str) -> Option<&BeanDefinition> {
        let canonical = self.canonical_name(name).ok()?;
        self.definitions.get(&canonical)
    }

    /// 是否包含定义（含别名）
    pub fn contains_definition(&self, name: &str) -> bool {
        self.definition(name).is_some()
    }

    /// 按注册顺序的 Bean 名称列表
    pub fn bean_names(&self) -> Vec<String> {
        self.definitions.names().map(str::to_string).collect()
    }

    /// 合并一个 Bean 集合
    ///
    /// 定义逐条注册；非法别名记录警告后跳过，不影响其余条目。
    pub fn merge_bean_set(&mut self, set: &BeanSet) {
        for (name, definition) in &set.definitions {
            self.add_bean_definition(name.clone(), definition.clone());
        }
        for (alias, name) in &set.aliases {
            if let Err(e) = self.add_alias(alias.clone(), name.clone()) {
                warn!("跳过别名 {} -> {}: {}", alias, name, e);
            }
        }
    }

    /// 定稿为不可变容器
    ///
    /// 两阶段收尾：先按注册顺序应用全部后处理器（单个处理器失败记录
    /// 日志后跳过），再生成容器。注册表被消费，定稿恰好发生一次。
    pub fn into_container(mut self) -> Arc<BeanContainer> {
        debug!(
            "注册表 {} 定稿: {} 个定义, {} 个后处理器",
            self.id,
            self.definitions.len(),
            self.post_processors.len()
        );

        for processor in &self.post_processors {
            if let Err(e) = processor.post_process(&mut self.definitions) {
                error!("后处理器 {} 执行失败: {}", processor.name(), e);
            }
        }

        BeanContainer::from_parts(
            self.definitions,
            self.aliases,
            self.parent,
            self.factories,
            self.post_processors,
        )
    }
}

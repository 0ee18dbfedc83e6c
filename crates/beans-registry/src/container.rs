//! 定稿后的 Bean 容器
//!
//! 容器是注册表定稿的产物：分层、惰性实例化、单例缓存。
//! 动态重配置入口允许向活动容器追加定义，除此之外容器不可变。

use crate::definition::{BeanDefinition, BeanProvider, BeanSet, BeanValue, DefinitionMap};
use crate::factory::{BeanFactoryRegistry, BeanSpawnContext, ResolvedValue};
use crate::postprocessor::PostProcessor;
use crate::registry::{alias_creates_cycle, resolve_alias_chain};
use beans_common::{RegistryError, RegistryResult};
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use parking_lot::RwLock;
use std::any::Any;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

/// 定稿后的 Bean 容器
pub struct BeanContainer {
    id: Uuid,
    created_at: DateTime<Utc>,
    definitions: RwLock<DefinitionMap>,
    aliases: RwLock<HashMap<String, String>>,
    parent: Option<Arc<BeanContainer>>,
    factories: Arc<BeanFactoryRegistry>,
    singletons: DashMap<String, Arc<dyn Any + Send + Sync>>,
    post_processors: Vec<Arc<dyn PostProcessor>>,
}

impl std::fmt::Debug for BeanContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BeanContainer")
            .field("id", &self.id)
            .field("definitions", &self.definitions.read().len())
            .field("singletons", &self.singletons.len())
            .field("has_parent", &self.parent.is_some())
            .finish()
    }
}

impl BeanContainer {
    pub(crate) fn from_parts(
        definitions: DefinitionMap,
        aliases: HashMap<String, String>,
        parent: Option<Arc<BeanContainer>>,
        factories: Arc<BeanFactoryRegistry>,
        post_processors: Vec<Arc<dyn PostProcessor>>,
    ) -> Arc<Self> {
        Arc::new(Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            definitions: RwLock::new(definitions),
            aliases: RwLock::new(aliases),
            parent,
            factories,
            singletons: DashMap::new(),
            post_processors,
        })
    }

    /// 容器标识
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// 定稿时间
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// 父容器
    pub fn parent(&self) -> Option<&Arc<BeanContainer>> {
        self.parent.as_ref()
    }

    /// 定稿时登记的后处理器（供子容器继承）
    pub fn post_processors(&self) -> &[Arc<dyn PostProcessor>] {
        &self.post_processors
    }

    /// 本地定义的 Bean 名称（定义顺序）
    pub fn bean_names(&self) -> Vec<String> {
        self.definitions
            .read()
            .names()
            .map(str::to_string)
            .collect()
    }

    /// 是否包含 Bean（含别名与父容器）
    pub fn contains_bean(&self, name: &str) -> bool {
        let canonical = match self.canonical_name(name) {
            Ok(canonical) => canonical,
            Err(_) => return false,
        };
        if self.definitions.read().contains(&canonical) {
            return true;
        }
        self.parent
            .as_ref()
            .is_some_and(|parent| parent.contains_bean(name))
    }

    /// 沿别名链解析规范名
    pub fn canonical_name(&self, name: &str) -> RegistryResult<String> {
        resolve_alias_chain(&self.aliases.read(), name)
    }

    /// 解析一个 Bean
    ///
    /// 规范名解析 → 单例缓存 → 本地构造（引用属性递归解析）→ 父容器回退。
    pub fn get_bean(&self, name: &str) -> RegistryResult<Arc<dyn Any + Send + Sync>> {
        let mut chain = Vec::new();
        self.get_bean_guarded(name, &mut chain)
    }

    /// 解析并向下转型一个 Bean
    pub fn get_bean_as<T: Send + Sync + 'static>(&self, name: &str) -> RegistryResult<Arc<T>> {
        let bean = self.get_bean(name)?;
        bean.downcast::<T>()
            .map_err(|_| RegistryError::TypeMismatch {
                name: name.to_string(),
                expected: std::any::type_name::<T>().to_string(),
            })
    }

    fn get_bean_guarded(
        &self,
        name: &str,
        chain: &mut Vec<String>,
    ) -> RegistryResult<Arc<dyn Any + Send + Sync>> {
        let canonical = self.canonical_name(name)?;

        if chain.contains(&canonical) {
            chain.push(canonical);
            return Err(RegistryError::ReferenceCycle {
                chain: chain.join(" -> "),
            });
        }

        // 持锁期间不构造 Bean：先拷出定义再释放读锁
        let definition = self.definitions.read().get(&canonical).cloned();
        let Some(definition) = definition else {
            if let Some(parent) = &self.parent {
                return parent.get_bean_guarded(name, chain);
            }
            return Err(RegistryError::DefinitionNotFound { name: canonical });
        };

        let singleton = match &definition.provider {
            BeanProvider::Artifact(adapter) => adapter.is_singleton(),
            BeanProvider::ClassName(_) => definition.singleton,
        };

        if singleton {
            if let Some(cached) = self.singletons.get(&canonical) {
                return Ok(cached.clone());
            }
        }

        chain.push(canonical.clone());
        let instance = self.spawn_bean(&canonical, &definition, chain)?;
        chain.pop();

        if singleton {
            self.singletons.insert(canonical, instance.clone());
        }
        Ok(instance)
    }

    fn spawn_bean(
        &self,
        name: &str,
        definition: &BeanDefinition,
        chain: &mut Vec<String>,
    ) -> RegistryResult<Arc<dyn Any + Send + Sync>> {
        match &definition.provider {
            BeanProvider::Artifact(adapter) => {
                debug!("实例化工件 Bean: {} ({})", name, adapter.type_name());
                adapter
                    .produce()
                    .map_err(|e| RegistryError::BeanCreationFailed {
                        name: name.to_string(),
                        source: Box::new(e),
                    })
            }
            BeanProvider::ClassName(class_name) => {
                let factory = self.factories.get(class_name).ok_or_else(|| {
                    RegistryError::FactoryNotRegistered {
                        class_name: class_name.clone(),
                    }
                })?;

                let mut properties = BTreeMap::new();
                for (key, value) in &definition.properties {
                    properties.insert(key.clone(), self.resolve_value(value, chain)?);
                }

                debug!("实例化 Bean: {} ({})", name, class_name);
                let context = BeanSpawnContext { name, properties };
                factory(&context)
            }
        }
    }

    fn resolve_value(
        &self,
        value: &BeanValue,
        chain: &mut Vec<String>,
    ) -> RegistryResult<ResolvedValue> {
        Ok(match value {
            BeanValue::Bool(v) => ResolvedValue::Bool(*v),
            BeanValue::Int(v) => ResolvedValue::Int(*v),
            BeanValue::Float(v) => ResolvedValue::Float(*v),
            BeanValue::Str(v) => ResolvedValue::Str(v.clone()),
            BeanValue::List(values) => {
                let mut resolved = Vec::with_capacity(values.len());
                for entry in values {
                    resolved.push(self.resolve_value(entry, chain)?);
                }
                ResolvedValue::List(resolved)
            }
            BeanValue::Ref(target) => ResolvedValue::Bean(self.get_bean_guarded(target, chain)?),
            BeanValue::Bound(bound) => ResolvedValue::Bound(bound.get().clone()),
        })
    }

    /// 动态重配置：向活动容器追加一个 Bean 集合
    ///
    /// 覆盖同名定义时丢弃其已缓存的单例；非法别名记录警告后跳过。
    pub fn apply_bean_set(&self, set: &BeanSet) {
        for (name, definition) in &set.definitions {
            if self.singletons.remove(name).is_some() {
                debug!("丢弃被覆盖定义的单例缓存: {}", name);
            }
            self.definitions.write().insert(name.clone(), definition.clone());
        }
        for (alias, name) in &set.aliases {
            if alias == name {
                warn!("忽略自引用别名: {}", alias);
                continue;
            }
            let mut aliases = self.aliases.write();
            if alias_creates_cycle(&aliases, alias, name) {
                warn!("跳过会形成循环的别名: {} -> {}", alias, name);
                continue;
            }
            aliases.insert(alias.clone(), name.clone());
        }
        debug!(
            "活动容器 {} 追加 {} 个定义, {} 个别名",
            self.id,
            set.definitions.len(),
            set.aliases.len()
        );
    }
}

//! Bean 定义模型

use crate::adapter::ArtifactAdapter;
use beans_common::RegistryError;
use std::any::Any;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

/// Bean 能力
///
/// 定义声明的能力集合决定定稿前的特殊处理；目前唯一的能力是
/// 后处理器：携带该能力的定义会在容器定稿前被提前实例化。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// 注册表后处理器
    PostProcessor,
}

impl std::str::FromStr for Capability {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "post-processor" => Ok(Self::PostProcessor),
            _ => Err(RegistryError::UnknownCapability {
                value: s.to_string(),
            }),
        }
    }
}

/// 声明式源运行期捕获的绑定对象
#[derive(Clone)]
pub struct BoundValue(Arc<dyn Any + Send + Sync>);

impl BoundValue {
    /// 包装一个绑定对象
    pub fn new(value: Arc<dyn Any + Send + Sync>) -> Self {
        Self(value)
    }

    /// 访问底层对象
    pub fn get(&self) -> &Arc<dyn Any + Send + Sync> {
        &self.0
    }
}

impl std::fmt::Debug for BoundValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("<bound>")
    }
}

impl PartialEq for BoundValue {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// Bean 属性值
#[derive(Debug, Clone, PartialEq)]
pub enum BeanValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<BeanValue>),
    /// 对另一个 Bean 的引用，容器在构造时解析
    Ref(String),
    /// 声明式源运行期解析的绑定对象
    Bound(BoundValue),
}

impl BeanValue {
    /// 构造字符串值
    pub fn str(value: impl Into<String>) -> Self {
        Self::Str(value.into())
    }

    /// 构造 Bean 引用
    pub fn reference(target: impl Into<String>) -> Self {
        Self::Ref(target.into())
    }
}

/// Bean 提供方式
#[derive(Debug, Clone)]
pub enum BeanProvider {
    /// 符号类名，经由宿主应用提供的工厂注册表解析
    ClassName(String),
    /// 工件适配器，由容器直接消费
    Artifact(ArtifactAdapter),
}

/// Bean 定义
///
/// 一个可命名、可别名的 Bean 构造声明。
#[derive(Debug, Clone)]
pub struct BeanDefinition {
    /// 提供方式
    pub provider: BeanProvider,
    /// 是否单例（默认 true），工件 Bean 以适配器的声明为准
    pub singleton: bool,
    /// 构造属性
    pub properties: BTreeMap<String, BeanValue>,
    /// 声明的能力集合
    pub capabilities: HashSet<Capability>,
}

impl BeanDefinition {
    /// 基于符号类名的定义
    pub fn of_class(class_name: impl Into<String>) -> Self {
        Self {
            provider: BeanProvider::ClassName(class_name.into()),
            singleton: true,
            properties: BTreeMap::new(),
            capabilities: HashSet::new(),
        }
    }

    /// 基于工件适配器的定义
    pub fn of_artifact(adapter: ArtifactAdapter) -> Self {
        Self {
            provider: BeanProvider::Artifact(adapter),
            singleton: true,
            properties: BTreeMap::new(),
            capabilities: HashSet::new(),
        }
    }

    /// 设置为瞬时 Bean
    pub fn transient(mut self) -> Self {
        self.singleton = false;
        self
    }

    /// 设置单例标记
    pub fn with_singleton(mut self, singleton: bool) -> Self {
        self.singleton = singleton;
        self
    }

    /// 添加构造属性
    pub fn with_property(mut self, key: impl Into<String>, value: BeanValue) -> Self {
        self.properties.insert(key.into(), value);
        self
    }

    /// 声明一项能力
    pub fn with_capability(mut self, capability: Capability) -> Self {
        self.capabilities.insert(capability);
        self
    }

    /// 符号类名（工件定义返回 None）
    pub fn class_name(&self) -> Option<&str> {
        match &self.provider {
            BeanProvider::ClassName(name) => Some(name),
            BeanProvider::Artifact(_) => None,
        }
    }

    /// 是否声明了后处理器能力
    pub fn is_post_processor(&self) -> bool {
        self.capabilities.contains(&Capability::PostProcessor)
    }
}

/// 保持插入顺序的 Bean 定义映射
#[derive(Debug, Clone, Default)]
pub struct DefinitionMap {
    entries: HashMap<String, BeanDefinition>,
    order: Vec<String>,
}

impl DefinitionMap {
    /// 创建空映射
    pub fn new() -> Self {
        Self::default()
    }

    /// 插入定义；同名定义原位替换，不改变顺序
    pub fn insert(&mut self, name: impl Into<String>, definition: BeanDefinition) {
        let name = name.into();
        if !self.entries.contains_key(&name) {
            self.order.push(name.clone());
        }
        self.entries.insert(name, definition);
    }

    /// 按名称查找定义
    pub fn get(&self, name: &str) -> Option<&BeanDefinition> {
        self.entries.get(name)
    }

    /// 按名称可变查找定义
    pub fn get_mut(&mut self, name: &str) -> Option<&mut BeanDefinition> {
        self.entries.get_mut(name)
    }

    /// 是否包含定义
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// 移除定义
    pub fn remove(&mut self, name: &str) -> Option<BeanDefinition> {
        let removed = self.entries.remove(name);
        if removed.is_some() {
            self.order.retain(|entry| entry != name);
        }
        removed
    }

    /// 定义数量
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 按插入顺序的名称迭代器
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// 按插入顺序的条目迭代器
    pub fn iter(&self) -> impl Iterator<Item = (&str, &BeanDefinition)> {
        self.order
            .iter()
            .filter_map(|name| self.entries.get(name).map(|def| (name.as_str(), def)))
    }
}

/// 一次声明式源运行产出的 Bean 集合
#[derive(Debug, Clone, Default)]
pub struct BeanSet {
    /// 按声明顺序的定义列表
    pub definitions: Vec<(String, BeanDefinition)>,
    /// 别名列表（别名 -> 规范名）
    pub aliases: Vec<(String, String)>,
}

impl BeanSet {
    /// 创建空集合
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加定义
    pub fn add_definition(&mut self, name: impl Into<String>, definition: BeanDefinition) {
        self.definitions.push((name.into(), definition));
    }

    /// 追加别名
    pub fn add_alias(&mut self, alias: impl Into<String>, name: impl Into<String>) {
        self.aliases.push((alias.into(), name.into()));
    }

    /// 合并另一个集合
    pub fn extend(&mut self, other: BeanSet) {
        self.definitions.extend(other.definitions);
        self.aliases.extend(other.aliases);
    }

    /// 定义数量
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty() && self.aliases.is_empty()
    }
}

//! Bean 工厂注册表
//!
//! 符号类名到工厂函数的显式映射，由宿主应用在装配前提供。
//! 这取代了按符号名反射加载类型的做法。

use crate::definition::{BeanDefinition, BeanProvider};
use crate::postprocessor::PostProcessor;
use beans_common::{RegistryError, RegistryResult};
use std::any::Any;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

/// 已解析的属性值
///
/// 引用与绑定已替换为实例，可直接用于 Bean 构造。
#[derive(Clone)]
pub enum ResolvedValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<ResolvedValue>),
    /// 已解析的 Bean 引用
    Bean(Arc<dyn Any + Send + Sync>),
    /// 声明式源运行期捕获的绑定对象
    Bound(Arc<dyn Any + Send + Sync>),
}

impl ResolvedValue {
    /// 作为字符串访问
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(value) => Some(value),
            _ => None,
        }
    }

    /// 作为布尔值访问
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            _ => None,
        }
    }

    /// 作为整数访问
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(value) => Some(*value),
            _ => None,
        }
    }

    /// 将 Bean 引用或绑定对象向下转型
    pub fn downcast<T: Send + Sync + 'static>(&self) -> Option<Arc<T>> {
        match self {
            Self::Bean(value) | Self::Bound(value) => value.clone().downcast::<T>().ok(),
            _ => None,
        }
    }
}

impl std::fmt::Debug for ResolvedValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bool(value) => write!(f, "Bool({value})"),
            Self::Int(value) => write!(f, "Int({value})"),
            Self::Float(value) => write!(f, "Float({value})"),
            Self::Str(value) => write!(f, "Str({value:?})"),
            Self::List(values) => f.debug_tuple("List").field(values).finish(),
            Self::Bean(_) => f.write_str("Bean(<instance>)"),
            Self::Bound(_) => f.write_str("Bound(<instance>)"),
        }
    }
}

/// Bean 实例化上下文
///
/// 工厂函数从这里取得 Bean 名称与已解析的构造属性。
#[derive(Debug)]
pub struct BeanSpawnContext<'a> {
    /// Bean 规范名
    pub name: &'a str,
    /// 已解析的构造属性
    pub properties: BTreeMap<String, ResolvedValue>,
}

impl BeanSpawnContext<'_> {
    /// 查找属性
    pub fn property(&self, key: &str) -> Option<&ResolvedValue> {
        self.properties.get(key)
    }

    /// 查找必需属性，缺失时报错
    pub fn require_property(&self, key: &str) -> RegistryResult<&ResolvedValue> {
        self.properties
            .get(key)
            .ok_or_else(|| RegistryError::MissingProperty {
                name: self.name.to_string(),
                property: key.to_string(),
            })
    }
}

/// Bean 工厂函数类型
pub type BeanFactoryFn = Arc<
    dyn Fn(&BeanSpawnContext<'_>) -> Result<Arc<dyn Any + Send + Sync>, RegistryError>
        + Send
        + Sync,
>;

/// 后处理器工厂函数类型
pub type PostProcessorFactoryFn =
    Arc<dyn Fn(&BeanDefinition) -> Result<Arc<dyn PostProcessor>, RegistryError> + Send + Sync>;

/// Bean 工厂注册表
#[derive(Clone, Default)]
pub struct BeanFactoryRegistry {
    factories: HashMap<String, BeanFactoryFn>,
    post_processor_factories: HashMap<String, PostProcessorFactoryFn>,
}

impl BeanFactoryRegistry {
    /// 创建空注册表
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册工厂函数
    pub fn register<F>(&mut self, class_name: impl Into<String>, factory: F)
    where
        F: Fn(&BeanSpawnContext<'_>) -> Result<Arc<dyn Any + Send + Sync>, RegistryError>
            + Send
            + Sync
            + 'static,
    {
        self.factories.insert(class_name.into(), Arc::new(factory));
    }

    /// 注册产出具体类型的工厂函数
    pub fn register_simple<T, F>(&mut self, class_name: impl Into<String>, factory: F)
    where
        T: Send + Sync + 'static,
        F: Fn(&BeanSpawnContext<'_>) -> Result<T, RegistryError> + Send + Sync + 'static,
    {
        self.register(class_name, move |ctx| {
            factory(ctx).map(|instance| Arc::new(instance) as Arc<dyn Any + Send + Sync>)
        });
    }

    /// 注册后处理器工厂函数
    ///
    /// 后处理器定义既可以被提前实例化，也作为普通 Bean 可解析。
    pub fn register_post_processor<F>(&mut self, class_name: impl Into<String>, factory: F)
    where
        F: Fn(&BeanDefinition) -> Result<Arc<dyn PostProcessor>, RegistryError>
            + Send
            + Sync
            + 'static,
    {
        let class_name = class_name.into();
        let factory: PostProcessorFactoryFn = Arc::new(factory);
        self.post_processor_factories
            .insert(class_name.clone(), factory.clone());

        // 普通解析路径产出包装后的处理器实例
        let plain_class = class_name.clone();
        self.factories.insert(
            class_name,
            Arc::new(move |_ctx| {
                let definition = BeanDefinition::of_class(plain_class.clone());
                factory(&definition)
                    .map(|processor| Arc::new(processor) as Arc<dyn Any + Send + Sync>)
            }),
        );
    }

    /// 查找工厂函数
    pub fn get(&self, class_name: &str) -> Option<BeanFactoryFn> {
        self.factories.get(class_name).cloned()
    }

    /// 是否注册了工厂
    pub fn contains(&self, class_name: &str) -> bool {
        self.factories.contains_key(class_name)
    }

    /// 为声明了后处理器能力的定义提前实例化处理器
    pub fn create_post_processor(
        &self,
        definition: &BeanDefinition,
    ) -> RegistryResult<Arc<dyn PostProcessor>> {
        let class_name = match &definition.provider {
            BeanProvider::ClassName(name) => name.clone(),
            BeanProvider::Artifact(adapter) => {
                return Err(RegistryError::FactoryNotRegistered {
                    class_name: adapter.type_name().to_string(),
                })
            }
        };

        let factory = self
            .post_processor_factories
            .get(&class_name)
            .ok_or(RegistryError::FactoryNotRegistered {
                class_name: class_name.clone(),
            })?;
        factory(definition)
    }
}

impl std::fmt::Debug for BeanFactoryRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BeanFactoryRegistry")
            .field("factories", &self.factories.len())
            .field(
                "post_processor_factories",
                &self.post_processor_factories.len(),
            )
            .finish()
    }
}

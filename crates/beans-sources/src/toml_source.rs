//! 基于 TOML 描述符的默认声明式源
//!
//! 描述符的形状：
//!
//! ```toml
//! [beans.fooService]
//! class = "FooService"
//! singleton = true
//! aliases = ["foo"]
//! capabilities = ["post-processor"]
//!
//! [beans.fooService.properties]
//! greeting = "你好"
//! peer = { ref = "barService" }
//! app = { binding = "application" }
//! ```

use crate::source::{Bindings, DeclarationBlock, DeclarativeBeanSource};
use beans_common::{Resource, SourceError, SourceResult};
use beans_registry::{BeanDefinition, BeanSet, BeanValue, BoundValue, Capability};
use serde_json::Value;
use tracing::{debug, warn};

/// TOML 声明式源
#[derive(Debug, Default, Clone, Copy)]
pub struct TomlBeanSource;

impl TomlBeanSource {
    /// 创建源实例
    pub fn new() -> Self {
        Self
    }

    /// 直接从文本编译声明块（符号源与测试场景）
    pub fn compile_str(location: &str, text: &str) -> SourceResult<DeclarationBlock> {
        let parsed: toml::Value =
            toml::from_str(text).map_err(|e| SourceError::CompileError {
                location: location.to_string(),
                message: e.to_string(),
            })?;
        let root = serde_json::to_value(parsed).map_err(|e| SourceError::CompileError {
            location: location.to_string(),
            message: e.to_string(),
        })?;
        Ok(DeclarationBlock::new(location, root))
    }

    fn convert_value(
        &self,
        block: &DeclarationBlock,
        bean: &str,
        value: &Value,
        bindings: &Bindings,
    ) -> SourceResult<BeanValue> {
        Ok(match value {
            Value::Bool(v) => BeanValue::Bool(*v),
            Value::Number(v) => {
                if let Some(i) = v.as_i64() {
                    BeanValue::Int(i)
                } else {
                    BeanValue::Float(v.as_f64().unwrap_or_default())
                }
            }
            Value::String(v) => BeanValue::Str(v.clone()),
            Value::Array(values) => {
                let mut converted = Vec::with_capacity(values.len());
                for entry in values {
                    converted.push(self.convert_value(block, bean, entry, bindings)?);
                }
                BeanValue::List(converted)
            }
            Value::Object(table) => {
                if let Some(Value::String(target)) = table.get("ref") {
                    BeanValue::Ref(target.clone())
                } else if let Some(Value::String(name)) = table.get("binding") {
                    let bound = bindings.require(name)?;
                    BeanValue::Bound(BoundValue::new(bound.clone()))
                } else {
                    return Err(SourceError::RunError {
                        location: block.location.clone(),
                        message: format!("Bean {bean} 的属性值无法识别: {table:?}"),
                    });
                }
            }
            Value::Null => {
                return Err(SourceError::RunError {
                    location: block.location.clone(),
                    message: format!("Bean {bean} 的属性值不允许为空"),
                })
            }
        })
    }

    fn convert_definition(
        &self,
        block: &DeclarationBlock,
        name: &str,
        entry: &Value,
        bindings: &Bindings,
        set: &mut BeanSet,
    ) -> SourceResult<()> {
        let table = entry.as_object().ok_or_else(|| SourceError::RunError {
            location: block.location.clone(),
            message: format!("Bean {name} 的声明必须是表"),
        })?;

        let class_name = table
            .get("class")
            .and_then(Value::as_str)
            .ok_or_else(|| SourceError::RunError {
                location: block.location.clone(),
                message: format!("Bean {name} 缺少 class 字段"),
            })?;

        let mut definition = BeanDefinition::of_class(class_name);

        if let Some(singleton) = table.get("singleton").and_then(Value::as_bool) {
            definition = definition.with_singleton(singleton);
        }

        if let Some(capabilities) = table.get("capabilities").and_then(Value::as_array) {
            for capability in capabilities {
                let Some(capability) = capability.as_str() else {
                    continue;
                };
                match capability.parse::<Capability>() {
                    Ok(capability) => definition = definition.with_capability(capability),
                    Err(e) => warn!("Bean {} 声明了未知能力: {}", name, e),
                }
            }
        }

        if let Some(properties) = table.get("properties").and_then(Value::as_object) {
            for (key, value) in properties {
                let converted = self.convert_value(block, name, value, bindings)?;
                definition = definition.with_property(key.clone(), converted);
            }
        }

        set.add_definition(name, definition);

        if let Some(aliases) = table.get("aliases").and_then(Value::as_array) {
            for alias in aliases.iter().filter_map(Value::as_str) {
                set.add_alias(alias, name);
            }
        }
        Ok(())
    }
}

impl DeclarativeBeanSource for TomlBeanSource {
    fn name(&self) -> &str {
        "toml"
    }

    fn compile(&self, resource: &dyn Resource) -> SourceResult<DeclarationBlock> {
        let text = resource.read_to_string()?;
        Self::compile_str(&resource.location(), &text)
    }

    fn run(&self, block: &DeclarationBlock, bindings: &Bindings) -> SourceResult<BeanSet> {
        let mut set = BeanSet::new();
        let Some(beans) = block.root.get("beans").and_then(Value::as_object) else {
            debug!("声明块 {} 不含 beans 节, 产出空集合", block.location);
            return Ok(set);
        };

        for (name, entry) in beans {
            self.convert_definition(block, name, entry, bindings, &mut set)?;
        }
        debug!(
            "声明块 {} 产出 {} 个定义, {} 个别名",
            block.location,
            set.definitions.len(),
            set.aliases.len()
        );
        Ok(set)
    }
}

//! 外部资源合并引擎
//!
//! 应用级外部描述符按固定路径解析，产物合并进目标注册表；声明了
//! 后处理器能力的定义在合并时被提前实例化，登记到注册表的待应用
//! 列表。合并完成后无条件级联到描述符资源加载器。

use crate::accumulator::BeanAccumulator;
use crate::script_loader::ScriptResourceLoader;
use beans_common::{Application, Resource, ResourceLocator};
use beans_registry::{BeanRegistry, BeanSet};
use beans_sources::{Bindings, DeclarativeBeanSource, SymbolicSourceRegistry, SPRING_RESOURCES_XML};
use std::sync::Arc;
use tracing::{debug, error, warn};

/// 外部资源合并引擎
pub struct ResourceMergeEngine {
    locator: ResourceLocator,
    source: Arc<dyn DeclarativeBeanSource>,
    loader: ScriptResourceLoader,
}

impl std::fmt::Debug for ResourceMergeEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceMergeEngine")
            .field("locator", &self.locator)
            .field("source", &self.source.name())
            .finish()
    }
}

impl ResourceMergeEngine {
    /// 创建合并引擎
    pub fn new(
        locator: ResourceLocator,
        source: Arc<dyn DeclarativeBeanSource>,
        symbolic: SymbolicSourceRegistry,
    ) -> Self {
        let loader = ScriptResourceLoader::new(locator.clone(), source.clone(), symbolic);
        Self {
            locator,
            source,
            loader,
        }
    }

    /// 内部的描述符资源加载器
    pub fn loader(&self) -> &ScriptResourceLoader {
        &self.loader
    }

    /// 合并应用级外部描述符并级联加载
    ///
    /// 外部描述符缺失是常态，记一条调试日志即可；编译、执行与
    /// 后处理器实例化的失败都只记日志，不中断装配。
    pub fn merge_external_resources(
        &self,
        registry: &mut BeanRegistry,
        application: &Arc<dyn Application>,
        accumulator: &mut Option<BeanAccumulator>,
    ) {
        match self.locator.resolve(SPRING_RESOURCES_XML) {
            Some(resource) => {
                let outcome = self
                    .source
                    .compile(&resource)
                    .and_then(|block| self.source.run(&block, &Bindings::new()));
                match outcome {
                    Ok(set) => self.merge_set(registry, &set),
                    Err(e) => error!("外部描述符 {} 处理失败: {}", resource.location(), e),
                }
            }
            None => debug!("外部描述符 {} 不存在, 跳过", SPRING_RESOURCES_XML),
        }

        self.loader.load_all(registry, application, accumulator);
    }

    fn merge_set(&self, registry: &mut BeanRegistry, set: &BeanSet) {
        debug!("找到 {} 个 Bean 定义待装配", set.definitions.len());

        // 声明了后处理器能力的定义提前实例化，其余照常合并；
        // 实例化失败的定义按普通 Bean 保留
        let factories = registry.factories().clone();
        for (name, definition) in &set.definitions {
            if definition.is_post_processor() {
                match factories.create_post_processor(definition) {
                    Ok(processor) => registry.add_post_processor(processor),
                    Err(e) => warn!("后处理器 {} 提前实例化失败: {}", name, e),
                }
            }
        }
        registry.merge_bean_set(set);
    }
}

//! 描述符资源加载器
//!
//! 负责两类声明式描述符的执行：
//!
//! - 插件描述符：按固定模式在资源根下发现，逐个编译执行
//! - 应用描述符：按符号名在符号源注册表中查找
//!
//! 首轮执行的产物全部进入累积器；此后注册表更替时直接复用累积
//! 的集合，描述符不会被重新执行。

use crate::accumulator::BeanAccumulator;
use beans_common::{Application, Resource, ResourceLocator};
use beans_registry::{BeanContainer, BeanRegistry, BeanSet};
use beans_sources::{
    Bindings, DeclarationProviderFn, DeclarativeBeanSource, SymbolicSourceRegistry,
    PLUGIN_RESOURCES_PATTERN, SPRING_RESOURCES_CLASS,
};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// 描述符资源加载器
pub struct ScriptResourceLoader {
    locator: ResourceLocator,
    source: Arc<dyn DeclarativeBeanSource>,
    symbolic: SymbolicSourceRegistry,
}

impl std::fmt::Debug for ScriptResourceLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScriptResourceLoader")
            .field("locator", &self.locator)
            .field("source", &self.source.name())
            .field("symbolic", &self.symbolic)
            .finish()
    }
}

impl ScriptResourceLoader {
    /// 创建加载器
    pub fn new(
        locator: ResourceLocator,
        source: Arc<dyn DeclarativeBeanSource>,
        symbolic: SymbolicSourceRegistry,
    ) -> Self {
        Self {
            locator,
            source,
            symbolic,
        }
    }

    /// 执行全部描述符并维护累积器
    ///
    /// 应用级描述符按符号名解析不到时，整个描述符加载阶段跳过：
    /// 不发现插件描述符，也不创建累积器。
    ///
    /// 累积器缺失时为首轮：发现并执行插件与应用描述符，产物注册进
    /// 注册表并存入新建的累积器。累积器已存在且绑定的注册表不同时，
    /// 把累积的集合合并进当前注册表；绑定相同则不做任何事。
    pub fn load_all(
        &self,
        registry: &mut BeanRegistry,
        application: &Arc<dyn Application>,
        accumulator: &mut Option<BeanAccumulator>,
    ) {
        match accumulator {
            Some(existing) => {
                if existing.is_bound_to(registry) {
                    debug!("累积器已绑定注册表 {}, 跳过加载", registry.id());
                } else {
                    existing.register_beans(registry);
                }
            }
            None => {
                let Some(provider) = self.symbolic.lookup(SPRING_RESOURCES_CLASS) else {
                    debug!(
                        "未注册符号源 {}, 跳过描述符加载阶段",
                        SPRING_RESOURCES_CLASS
                    );
                    return;
                };
                let mut fresh = BeanAccumulator::bound_to(registry);
                self.load_plugin_resources(registry, application, &mut fresh);
                self.load_application_block(provider, registry, application, &mut fresh);
                *accumulator = Some(fresh);
            }
        }
    }

    /// 执行全部描述符并把累积的集合追加到活动容器
    ///
    /// 容器定稿后的动态重配置路径：注册表照常维护，同时让活动
    /// 容器立即看到累积的定义。
    pub fn load_all_into_context(
        &self,
        registry: &mut BeanRegistry,
        application: &Arc<dyn Application>,
        accumulator: &mut Option<BeanAccumulator>,
        container: &BeanContainer,
    ) {
        self.load_all(registry, application, accumulator);
        if let Some(accumulator) = accumulator {
            accumulator.register_beans_into_context(container);
        }
    }

    fn load_plugin_resources(
        &self,
        registry: &mut BeanRegistry,
        application: &Arc<dyn Application>,
        accumulator: &mut BeanAccumulator,
    ) {
        let resources = match self.locator.discover(PLUGIN_RESOURCES_PATTERN) {
            Ok(resources) => resources,
            Err(e) => {
                warn!("插件描述符发现失败: {}", e);
                return;
            }
        };
        if resources.is_empty() {
            debug!("未发现插件描述符, 跳过");
            return;
        }

        info!("发现 {} 个插件描述符", resources.len());
        let bindings = Bindings::with_application(application.clone());
        for resource in resources {
            match self.run_resource(&resource, &bindings) {
                Ok(set) => {
                    debug!(
                        "插件描述符 {} 产出 {} 个 Bean 定义",
                        resource.location(),
                        set.definitions.len()
                    );
                    registry.merge_bean_set(&set);
                    accumulator.absorb(&set);
                }
                Err(e) => warn!("跳过插件描述符 {}: {}", resource.location(), e),
            }
        }
    }

    fn load_application_block(
        &self,
        provider: DeclarationProviderFn,
        registry: &mut BeanRegistry,
        application: &Arc<dyn Application>,
        accumulator: &mut BeanAccumulator,
    ) {
        let bindings = Bindings::with_application(application.clone());
        let outcome = provider().and_then(|block| self.source.run(&block, &bindings));
        match outcome {
            Ok(set) => {
                debug!("应用级描述符产出 {} 个 Bean 定义", set.definitions.len());
                registry.merge_bean_set(&set);
                accumulator.absorb(&set);
            }
            // 应用级描述符失败不丢弃已吸收的插件集合
            Err(e) => error!("应用级描述符执行失败: {}", e),
        }
    }

    fn run_resource(
        &self,
        resource: &dyn Resource,
        bindings: &Bindings,
    ) -> beans_common::SourceResult<BeanSet> {
        let block = self.source.compile(resource)?;
        self.source.run(&block, bindings)
    }
}

//! 运行时配置器
//!
//! 一次顶层装配的驱动者：建立注册表、继承父容器的后处理器、
//! 合并外部资源、定稿容器。装配是尽力而为的：单个资源的失败
//! 只记日志，调用者总会得到一个容器。

use crate::accumulator::BeanAccumulator;
use crate::merge::ResourceMergeEngine;
use beans_common::Application;
use beans_registry::{BeanContainer, BeanFactoryRegistry, BeanRegistry};
use std::sync::Arc;
use tracing::{debug, info};

/// 配置器状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfiguratorState {
    /// 尚未装配
    Unconfigured,
    /// 装配进行中
    Merging,
    /// 已产出容器
    Finalized,
}

/// 运行时配置器
pub struct RuntimeConfigurator {
    application: Arc<dyn Application>,
    factories: Arc<BeanFactoryRegistry>,
    merge_engine: ResourceMergeEngine,
    parent: Option<Arc<BeanContainer>>,
    state: ConfiguratorState,
    accumulator: Option<BeanAccumulator>,
}

impl std::fmt::Debug for RuntimeConfigurator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuntimeConfigurator")
            .field("application", &self.application.name())
            .field("state", &self.state)
            .field("has_parent", &self.parent.is_some())
            .field("has_accumulator", &self.accumulator.is_some())
            .finish()
    }
}

impl RuntimeConfigurator {
    /// 创建配置器
    ///
    /// 应用句柄是构造参数：没有应用就没有配置器。
    pub fn new(
        application: Arc<dyn Application>,
        factories: Arc<BeanFactoryRegistry>,
        merge_engine: ResourceMergeEngine,
    ) -> Self {
        Self {
            application,
            factories,
            merge_engine,
            parent: None,
            state: ConfiguratorState::Unconfigured,
            accumulator: None,
        }
    }

    /// 当前状态
    pub fn state(&self) -> ConfiguratorState {
        self.state
    }

    /// 当前应用句柄
    pub fn application(&self) -> &Arc<dyn Application> {
        &self.application
    }

    /// 是否持有累积器
    pub fn has_accumulator(&self) -> bool {
        self.accumulator.is_some()
    }

    /// 设置父容器
    ///
    /// 后续装配的注册表挂接到该容器，并继承其后处理器。
    pub fn set_parent(&mut self, parent: Arc<BeanContainer>) {
        debug!("设置父容器: {}", parent.id());
        self.parent = Some(parent);
    }

    /// 执行一次顶层装配
    pub fn configure(&mut self, load_external_beans: bool) -> Arc<BeanContainer> {
        self.configure_with(None, load_external_beans)
    }

    /// 以调用者提供的注册表执行一次顶层装配
    ///
    /// 每次顶层装配都以新的累积器谱系开始：描述符重新发现并执行。
    /// 单次装配内注册表更替时的复用走加载器的累积器合并路径。
    pub fn configure_with(
        &mut self,
        registry: Option<BeanRegistry>,
        load_external_beans: bool,
    ) -> Arc<BeanContainer> {
        self.state = ConfiguratorState::Merging;
        info!(
            "开始运行时装配: 应用 {}, 外部描述符{}启用",
            self.application.name(),
            if load_external_beans { "" } else { "未" }
        );

        let mut registry = registry.unwrap_or_else(|| self.default_registry());
        self.register_parent_post_processors(&mut registry);

        if load_external_beans {
            self.merge_engine.merge_external_resources(
                &mut registry,
                &self.application,
                &mut self.accumulator,
            );
        }

        // 顶层装配结束即丢弃累积器, 下一次装配重新开始
        self.accumulator = None;

        let container = registry.into_container();
        self.state = ConfiguratorState::Finalized;
        info!(
            "装配完成: 容器 {}, {} 个 Bean",
            container.id(),
            container.bean_names().len()
        );
        container
    }

    /// 丢弃累积器并回到未装配状态
    pub fn reset(&mut self) {
        debug!("配置器重置");
        self.accumulator = None;
        self.state = ConfiguratorState::Unconfigured;
    }

    fn default_registry(&self) -> BeanRegistry {
        match &self.parent {
            Some(parent) => BeanRegistry::with_parent(self.factories.clone(), parent.clone()),
            None => BeanRegistry::new(self.factories.clone()),
        }
    }

    /// 父容器的后处理器先于本地发现的登记，保持应用顺序
    fn register_parent_post_processors(&self, registry: &mut BeanRegistry) {
        let Some(parent) = &self.parent else {
            return;
        };
        for processor in parent.post_processors() {
            registry.add_post_processor(processor.clone());
        }
    }
}

//! Bean 累积器
//!
//! 累积器记录一轮描述符执行产出的全部 Bean 集合，并绑定产出时的
//! 注册表标识。后续装配换用新注册表时，把累积的集合整体合并过去
//! 即可，不需要重新执行描述符。
//!
//! 累积器由编排层显式持有并沿调用链传递；"清空"就是持有者丢弃
//! `Option` 槽位里的值。

use beans_registry::{BeanContainer, BeanRegistry, BeanSet};
use chrono::{DateTime, Utc};
use tracing::{debug, info};
use uuid::Uuid;

/// Bean 累积器
#[derive(Debug)]
pub struct BeanAccumulator {
    bound_registry: Uuid,
    accumulated: BeanSet,
    created_at: DateTime<Utc>,
}

impl BeanAccumulator {
    /// 创建绑定到给定注册表的空累积器
    pub fn bound_to(registry: &BeanRegistry) -> Self {
        debug!("创建累积器, 绑定注册表 {}", registry.id());
        Self {
            bound_registry: registry.id(),
            accumulated: BeanSet::new(),
            created_at: Utc::now(),
        }
    }

    /// 当前绑定的注册表标识
    pub fn bound_registry(&self) -> Uuid {
        self.bound_registry
    }

    /// 创建时间
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// 是否绑定到给定注册表
    pub fn is_bound_to(&self, registry: &BeanRegistry) -> bool {
        self.bound_registry == registry.id()
    }

    /// 吸收一个 Bean 集合
    pub fn absorb(&mut self, set: &BeanSet) {
        self.accumulated.extend(set.clone());
    }

    /// 已累积的 Bean 集合
    pub fn accumulated(&self) -> &BeanSet {
        &self.accumulated
    }

    /// 把累积的集合合并进注册表并重新绑定
    ///
    /// 这是注册表更替时的复用路径：不重新执行任何描述符。
    pub fn register_beans(&mut self, registry: &mut BeanRegistry) {
        info!(
            "累积器把 {} 个定义合并进注册表 {} (原绑定 {})",
            self.accumulated.definitions.len(),
            registry.id(),
            self.bound_registry
        );
        registry.merge_bean_set(&self.accumulated);
        self.bound_registry = registry.id();
    }

    /// 把累积的集合追加到活动容器
    pub fn register_beans_into_context(&self, container: &BeanContainer) {
        debug!(
            "累积器向活动容器 {} 追加 {} 个定义",
            container.id(),
            self.accumulated.definitions.len()
        );
        container.apply_bean_set(&self.accumulated);
    }
}

//! 符号源注册表
//!
//! 按符号名注册声明块的提供函数，取代按符号名动态加载描述符类
//! 的做法。宿主应用在装配前把内嵌描述符登记到这里。

use crate::source::DeclarationBlock;
use beans_common::SourceResult;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// 声明块提供函数
pub type DeclarationProviderFn =
    Arc<dyn Fn() -> SourceResult<DeclarationBlock> + Send + Sync>;

/// 符号源注册表
#[derive(Clone, Default)]
pub struct SymbolicSourceRegistry {
    providers: HashMap<String, DeclarationProviderFn>,
}

impl SymbolicSourceRegistry {
    /// 创建空注册表
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册符号源
    pub fn register<F>(&mut self, symbol: impl Into<String>, provider: F)
    where
        F: Fn() -> SourceResult<DeclarationBlock> + Send + Sync + 'static,
    {
        let symbol = symbol.into();
        debug!("注册符号源: {}", symbol);
        self.providers.insert(symbol, Arc::new(provider));
    }

    /// 按符号名查找提供函数
    pub fn lookup(&self, symbol: &str) -> Option<DeclarationProviderFn> {
        self.providers.get(symbol).cloned()
    }

    /// 是否注册了符号源
    pub fn contains(&self, symbol: &str) -> bool {
        self.providers.contains_key(symbol)
    }
}

impl std::fmt::Debug for SymbolicSourceRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SymbolicSourceRegistry")
            .field("symbols", &self.providers.keys().collect::<Vec<_>>())
            .finish()
    }
}

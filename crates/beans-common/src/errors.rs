//! 错误类型定义

use thiserror::Error;

/// Bean 注册表错误类型
#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("Bean 定义不存在: {name}")]
    DefinitionNotFound { name: String },

    #[error("别名解析失败: {alias}, 原因: {reason}")]
    AliasResolutionFailed { alias: String, reason: String },

    #[error("检测到别名循环: {chain}")]
    AliasCycle { chain: String },

    #[error("Bean 创建失败: {name}, 原因: {source}")]
    BeanCreationFailed {
        name: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("未注册的 Bean 工厂: {class_name}")]
    FactoryNotRegistered { class_name: String },

    #[error("检测到引用循环: {chain}")]
    ReferenceCycle { chain: String },

    #[error("Bean 类型转换失败: {name}, 期望 {expected}")]
    TypeMismatch { name: String, expected: String },

    #[error("后处理器执行失败: {name}, 原因: {message}")]
    PostProcessorFailed { name: String, message: String },

    #[error("必需属性缺失: {name} 需要 {property}")]
    MissingProperty { name: String, property: String },

    #[error("能力标识无法识别: {value}")]
    UnknownCapability { value: String },
}

/// 资源加载错误类型
#[derive(Error, Debug)]
pub enum ResourceError {
    #[error("资源不存在: {location}")]
    NotFound { location: String },

    #[error("资源读取失败: {location}, 原因: {source}")]
    ReadError {
        location: String,
        #[source]
        source: std::io::Error,
    },

    #[error("资源模式无效: {pattern}, 原因: {message}")]
    PatternError { pattern: String, message: String },
}

/// 声明式 Bean 源错误类型
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("描述符编译失败: {location}, 原因: {message}")]
    CompileError { location: String, message: String },

    #[error("描述符执行失败: {location}, 原因: {message}")]
    RunError { location: String, message: String },

    #[error("绑定变量不存在: {name}")]
    BindingNotFound { name: String },

    #[error("资源错误: {source}")]
    ResourceError {
        #[from]
        source: ResourceError,
    },
}

/// 工件实例化错误类型
#[derive(Error, Debug)]
pub enum ArtifactError {
    #[error("工件实例化失败: {name}, 原因: {message}")]
    InstantiationFailed { name: String, message: String },
}

impl ArtifactError {
    /// 创建实例化失败错误
    pub fn instantiation_failed(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InstantiationFailed {
            name: name.into(),
            message: message.into(),
        }
    }
}

/// 装配错误总类型
#[derive(Error, Debug)]
pub enum WiringError {
    #[error("注册表错误: {source}")]
    RegistryError {
        #[from]
        source: RegistryError,
    },

    #[error("资源错误: {source}")]
    ResourceError {
        #[from]
        source: ResourceError,
    },

    #[error("声明式源错误: {source}")]
    SourceError {
        #[from]
        source: SourceError,
    },

    #[error("工件错误: {source}")]
    ArtifactError {
        #[from]
        source: ArtifactError,
    },

    #[error("装配启动失败: {message}")]
    BootstrapFailed { message: String },
}

/// 结果类型别名
pub type RegistryResult<T> = Result<T, RegistryError>;
pub type ResourceResult<T> = Result<T, ResourceError>;
pub type SourceResult<T> = Result<T, SourceError>;
pub type WiringResult<T> = Result<T, WiringError>;

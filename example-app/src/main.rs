//! # 示例应用程序
//!
//! 演示 Vela 运行时 Bean 装配的完整流程：插件描述符发现、
//! 应用描述符执行、后处理器提前实例化、工件 Bean 与重复装配。

use beans_common::{Application, GenericApplication, RegistryError, ResourceLocator, SimpleArtifactDescriptor};
use beans_composition::{LoggingConfig, ResourceMergeEngine, RuntimeConfigurator};
use beans_registry::{
    ArtifactAdapter, BeanContainer, BeanDefinition, BeanFactoryRegistry, BeanRegistry,
    DefinitionMap, PostProcessor,
};
use beans_sources::{SymbolicSourceRegistry, TomlBeanSource};
use std::sync::Arc;
use tracing::info;

/// 问候服务，由插件描述符声明
#[derive(Debug)]
struct GreeterService {
    greeting: String,
}

/// 汇报服务，由应用描述符声明并引用问候服务
#[derive(Debug)]
struct ReportService {
    greeter: Arc<GreeterService>,
    app_name: String,
}

/// 系统时钟，作为工件 Bean 注册
#[derive(Debug)]
struct ClockService;

impl ClockService {
    fn now(&self) -> chrono::DateTime<chrono::Utc> {
        chrono::Utc::now()
    }
}

/// 定稿前统计定义数量的后处理器
struct AuditProcessor;

impl PostProcessor for AuditProcessor {
    fn name(&self) -> &str {
        "audit-processor"
    }

    fn post_process(&self, definitions: &mut DefinitionMap) -> Result<(), RegistryError> {
        info!("审计: 定稿前共有 {} 个 Bean 定义", definitions.len());
        Ok(())
    }
}

fn build_factories() -> Arc<BeanFactoryRegistry> {
    let mut factories = BeanFactoryRegistry::new();
    factories.register_simple("GreeterService", |ctx| {
        let greeting = ctx
            .property("greeting")
            .and_then(|value| value.as_str())
            .unwrap_or("hello")
            .to_string();
        Ok(GreeterService { greeting })
    });
    factories.register_simple("ReportService", |ctx| {
        let greeter = ctx
            .require_property("greeter")?
            .downcast::<GreeterService>()
            .ok_or(RegistryError::MissingProperty {
                name: ctx.name.to_string(),
                property: "greeter".to_string(),
            })?;
        let app = ctx
            .require_property("app")?
            .downcast::<Arc<dyn Application>>()
            .ok_or(RegistryError::MissingProperty {
                name: ctx.name.to_string(),
                property: "app".to_string(),
            })?;
        Ok(ReportService {
            greeter,
            app_name: app.name().to_string(),
        })
    });
    factories.register_post_processor("AuditProcessor", |_definition| Ok(Arc::new(AuditProcessor)));
    Arc::new(factories)
}

/// 应用级描述符以符号源形式内嵌在二进制里
fn build_symbolic_sources() -> SymbolicSourceRegistry {
    const APP_DESCRIPTOR: &str = r#"
[beans.reportService]
class = "ReportService"

[beans.reportService.properties]
greeter = { ref = "greeterService" }
app = { binding = "application" }
"#;

    let mut symbolic = SymbolicSourceRegistry::new();
    symbolic.register("springbeans", || {
        TomlBeanSource::compile_str("embedded:springbeans", APP_DESCRIPTOR)
    });
    symbolic
}

fn demonstrate_resolution(container: &Arc<BeanContainer>) -> anyhow::Result<()> {
    let report = container.get_bean_as::<ReportService>("reportService")?;
    info!(
        "汇报服务就绪: 应用 {}, 问候语 {:?}",
        report.app_name, report.greeter.greeting
    );

    // 别名与规范名解析到同一个单例
    let greeter = container.get_bean_as::<GreeterService>("greeter")?;
    assert!(Arc::ptr_eq(&report.greeter, &greeter));

    let clock = container.get_bean_as::<ClockService>("clock")?;
    info!("时钟工件 Bean: {}", clock.now());
    Ok(())
}

fn main() -> anyhow::Result<()> {
    LoggingConfig::development().init()?;
    info!("启动 Vela 装配示例应用");

    let resource_root = concat!(env!("CARGO_MANIFEST_DIR"), "/resources");
    let locator = ResourceLocator::new().with_root(resource_root);
    let engine = ResourceMergeEngine::new(
        locator,
        Arc::new(TomlBeanSource::new()),
        build_symbolic_sources(),
    );

    let factories = build_factories();
    let mut configurator = RuntimeConfigurator::new(
        GenericApplication::shared("vela-demo"),
        factories.clone(),
        engine,
    );

    // 工件 Bean 通过调用者预置的注册表进入装配
    let descriptor = Arc::new(SimpleArtifactDescriptor::new("clock", || Ok(ClockService)));
    let mut registry = BeanRegistry::new(factories.clone());
    registry.add_bean_definition(
        "clock",
        BeanDefinition::of_artifact(ArtifactAdapter::new(descriptor.clone())),
    );

    let container = configurator.configure_with(Some(registry), true);
    info!("首轮装配: 容器 {} 持有 {:?}", container.id(), container.bean_names());
    demonstrate_resolution(&container)?;

    // 第二轮顶层装配重新发现并执行描述符, 产出等价的新容器
    let mut registry = BeanRegistry::new(factories);
    registry.add_bean_definition(
        "clock",
        BeanDefinition::of_artifact(ArtifactAdapter::new(descriptor)),
    );
    let second = configurator.configure_with(Some(registry), true);
    info!("再次装配: 容器 {} 持有 {:?}", second.id(), second.bean_names());
    demonstrate_resolution(&second)?;

    configurator.reset();
    info!("配置器已重置");
    Ok(())
}

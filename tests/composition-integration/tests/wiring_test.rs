//! 运行时装配的端到端集成测试
//!
//! 用临时目录模拟资源根，覆盖完整装配流程：外部描述符合并、
//! 插件描述符发现、应用描述符执行、累积器复用与配置器重置。

use beans_common::{Application, GenericApplication, RegistryError, ResourceLocator};
use beans_composition::{ConfiguratorState, ResourceMergeEngine, RuntimeConfigurator, ScriptResourceLoader};
use beans_registry::{
    BeanFactoryRegistry, BeanRegistry, DefinitionMap, PostProcessor,
};
use beans_sources::{
    SymbolicSourceRegistry, TomlBeanSource, PLUGIN_RESOURCES_PATTERN, SPRING_RESOURCES_XML,
};
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::TempDir;

#[derive(Debug)]
struct FooService {
    label: String,
}

#[derive(Debug)]
struct BarService {
    foo: Arc<FooService>,
    app_name: String,
}

/// 空操作后处理器，只用来观察登记顺序
struct NamedProcessor {
    name: String,
}

impl NamedProcessor {
    fn shared(name: &str) -> Arc<dyn PostProcessor> {
        Arc::new(Self {
            name: name.to_string(),
        })
    }
}

impl PostProcessor for NamedProcessor {
    fn name(&self) -> &str {
        &self.name
    }

    fn post_process(&self, _definitions: &mut DefinitionMap) -> Result<(), RegistryError> {
        Ok(())
    }
}

fn test_factories() -> Arc<BeanFactoryRegistry> {
    let mut factories = BeanFactoryRegistry::new();
    factories.register_simple("FooService", |ctx| {
        let label = ctx
            .property("label")
            .and_then(|value| value.as_str())
            .unwrap_or("foo")
            .to_string();
        Ok(FooService { label })
    });
    factories.register_simple("BarService", |ctx| {
        let foo = ctx
            .require_property("foo")?
            .downcast::<FooService>()
            .ok_or(RegistryError::MissingProperty {
                name: ctx.name.to_string(),
                property: "foo".to_string(),
            })?;
        let app = ctx
            .require_property("app")?
            .downcast::<Arc<dyn Application>>()
            .ok_or(RegistryError::MissingProperty {
                name: ctx.name.to_string(),
                property: "app".to_string(),
            })?;
        Ok(BarService {
            foo,
            app_name: app.name().to_string(),
        })
    });
    factories.register_post_processor("AuditProcessor", |_definition| {
        Ok(NamedProcessor::shared("P3"))
    });
    Arc::new(factories)
}

fn write_resource(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn engine_for(root: &TempDir, symbolic: SymbolicSourceRegistry) -> ResourceMergeEngine {
    let locator = ResourceLocator::new().with_root(root.path());
    ResourceMergeEngine::new(locator, Arc::new(TomlBeanSource::new()), symbolic)
}

fn configurator_for(root: &TempDir, symbolic: SymbolicSourceRegistry) -> RuntimeConfigurator {
    RuntimeConfigurator::new(
        GenericApplication::shared("integration-app"),
        test_factories(),
        engine_for(root, symbolic),
    )
}

const PLUGIN_DESCRIPTOR: &str = r#"
[beans.fooService]
class = "FooService"

[beans.fooService.properties]
label = "plugin-foo"
"#;

const APP_DESCRIPTOR: &str = r#"
[beans.barService]
class = "BarService"

[beans.barService.properties]
foo = { ref = "fooService" }
app = { binding = "application" }
"#;

/// 带执行计数的应用级符号源
fn counted_symbolic(descriptor: &'static str) -> (SymbolicSourceRegistry, Arc<AtomicUsize>) {
    let counter = Arc::new(AtomicUsize::new(0));
    let observed = counter.clone();
    let mut symbolic = SymbolicSourceRegistry::new();
    symbolic.register("springbeans", move || {
        observed.fetch_add(1, Ordering::SeqCst);
        TomlBeanSource::compile_str("embedded:springbeans", descriptor)
    });
    (symbolic, counter)
}

/// 不声明任何 Bean 的应用级符号源
fn empty_app_symbolic() -> SymbolicSourceRegistry {
    let mut symbolic = SymbolicSourceRegistry::new();
    symbolic.register("springbeans", || {
        TomlBeanSource::compile_str("embedded:springbeans", "")
    });
    symbolic
}

#[test]
fn configure_without_resources_matches_disabled_external_beans() {
    let root = tempfile::tempdir().unwrap();

    let with_external = configurator_for(&root, SymbolicSourceRegistry::new()).configure(true);
    let without_external = configurator_for(&root, SymbolicSourceRegistry::new()).configure(false);

    assert_eq!(with_external.bean_names(), without_external.bean_names());
}

#[test]
fn configure_twice_without_external_beans_is_idempotent() {
    let root = tempfile::tempdir().unwrap();
    let mut configurator = configurator_for(&root, SymbolicSourceRegistry::new());

    let first = configurator.configure(false);
    let second = configurator.configure(false);

    assert_eq!(first.bean_names(), second.bean_names());
    assert_eq!(configurator.state(), ConfiguratorState::Finalized);
}

#[test]
fn descriptor_aliases_resolve_to_the_same_bean() {
    let root = tempfile::tempdir().unwrap();
    write_resource(
        root.path(),
        PLUGIN_RESOURCES_PATTERN,
        "[beans.fooService]\nclass = \"FooService\"\naliases = [\"foo\"]\n",
    );

    let container = configurator_for(&root, empty_app_symbolic()).configure(true);
    let by_name = container.get_bean_as::<FooService>("fooService").unwrap();
    let by_alias = container.get_bean_as::<FooService>("foo").unwrap();
    assert!(Arc::ptr_eq(&by_name, &by_alias));
}

#[test]
fn parent_post_processors_precede_local_discoveries() {
    let root = tempfile::tempdir().unwrap();
    write_resource(
        root.path(),
        SPRING_RESOURCES_XML,
        "[beans.auditProcessor]\nclass = \"AuditProcessor\"\ncapabilities = [\"post-processor\"]\n",
    );

    let mut parent_registry = BeanRegistry::new(test_factories());
    parent_registry.add_post_processor(NamedProcessor::shared("P1"));
    parent_registry.add_post_processor(NamedProcessor::shared("P2"));
    let parent = parent_registry.into_container();

    let mut configurator = configurator_for(&root, SymbolicSourceRegistry::new());
    configurator.set_parent(parent);
    let container = configurator.configure(true);

    let order: Vec<&str> = container
        .post_processors()
        .iter()
        .map(|processor| processor.name())
        .collect();
    assert_eq!(order, vec!["P1", "P2", "P3"]);
}

#[test]
fn accumulator_reuse_skips_descriptor_re_execution() {
    let root = tempfile::tempdir().unwrap();
    write_resource(root.path(), PLUGIN_RESOURCES_PATTERN, PLUGIN_DESCRIPTOR);

    let (symbolic, counter) = counted_symbolic(APP_DESCRIPTOR);
    let locator = ResourceLocator::new().with_root(root.path());
    let loader = ScriptResourceLoader::new(locator, Arc::new(TomlBeanSource::new()), symbolic);
    let application = GenericApplication::shared("reuse-app");

    let mut accumulator = None;
    let mut first = BeanRegistry::new(test_factories());
    loader.load_all(&mut first, &application, &mut accumulator);
    assert_eq!(counter.load(Ordering::SeqCst), 1);
    assert!(first.contains_definition("fooService"));
    assert!(first.contains_definition("barService"));

    // 删除插件描述符：第二轮若重新执行必然丢失 fooService
    fs::remove_file(root.path().join(PLUGIN_RESOURCES_PATTERN)).unwrap();

    let mut second = BeanRegistry::new(test_factories());
    loader.load_all(&mut second, &application, &mut accumulator);
    assert_eq!(counter.load(Ordering::SeqCst), 1);
    assert!(second.contains_definition("fooService"));
    assert!(second.contains_definition("barService"));
}

#[test]
fn each_top_level_configure_re_executes_descriptors() {
    let root = tempfile::tempdir().unwrap();
    let (symbolic, counter) = counted_symbolic(APP_DESCRIPTOR);
    write_resource(root.path(), PLUGIN_RESOURCES_PATTERN, PLUGIN_DESCRIPTOR);

    let mut configurator = configurator_for(&root, symbolic);
    configurator.configure(true);
    assert_eq!(counter.load(Ordering::SeqCst), 1);
    // 顶层装配结束后累积器不存续
    assert!(!configurator.has_accumulator());

    configurator.configure(true);
    assert_eq!(counter.load(Ordering::SeqCst), 2);

    configurator.reset();
    assert_eq!(configurator.state(), ConfiguratorState::Unconfigured);

    configurator.configure(true);
    assert_eq!(counter.load(Ordering::SeqCst), 3);
    assert_eq!(configurator.state(), ConfiguratorState::Finalized);
}

#[test]
fn plugin_descriptors_require_an_application_descriptor() {
    let root = tempfile::tempdir().unwrap();
    write_resource(root.path(), PLUGIN_RESOURCES_PATTERN, PLUGIN_DESCRIPTOR);

    // 应用级符号源缺席: 整个描述符加载阶段被跳过
    let container = configurator_for(&root, SymbolicSourceRegistry::new()).configure(true);
    assert!(!container.contains_bean("fooService"));
}

#[test]
fn loader_skips_phase_and_installs_no_accumulator_without_symbolic_source() {
    let root = tempfile::tempdir().unwrap();
    write_resource(root.path(), PLUGIN_RESOURCES_PATTERN, PLUGIN_DESCRIPTOR);

    let locator = ResourceLocator::new().with_root(root.path());
    let loader = ScriptResourceLoader::new(
        locator,
        Arc::new(TomlBeanSource::new()),
        SymbolicSourceRegistry::new(),
    );
    let application = GenericApplication::shared("gated-app");

    let mut accumulator = None;
    let mut registry = BeanRegistry::new(test_factories());
    loader.load_all(&mut registry, &application, &mut accumulator);

    assert!(accumulator.is_none());
    assert!(!registry.contains_definition("fooService"));
}

#[test]
fn end_to_end_plugin_and_application_beans_are_wired() {
    let root = tempfile::tempdir().unwrap();
    write_resource(root.path(), PLUGIN_RESOURCES_PATTERN, PLUGIN_DESCRIPTOR);
    let (symbolic, _) = counted_symbolic(APP_DESCRIPTOR);

    let container = configurator_for(&root, symbolic).configure(true);

    let bar = container.get_bean_as::<BarService>("barService").unwrap();
    assert_eq!(bar.foo.label, "plugin-foo");
    assert_eq!(bar.app_name, "integration-app");

    let foo = container.get_bean_as::<FooService>("fooService").unwrap();
    assert!(Arc::ptr_eq(&bar.foo, &foo));
}

#[test]
fn broken_plugin_descriptor_does_not_abort_configure() {
    let root = tempfile::tempdir().unwrap();
    write_resource(root.path(), PLUGIN_RESOURCES_PATTERN, "beans = [unclosed");
    let (symbolic, _) = counted_symbolic(
        "[beans.fooService]\nclass = \"FooService\"\n",
    );

    let container = configurator_for(&root, symbolic).configure(true);
    assert!(container.get_bean_as::<FooService>("fooService").is_ok());
}

#[test]
fn failing_application_descriptor_keeps_plugin_beans() {
    let root = tempfile::tempdir().unwrap();
    write_resource(root.path(), PLUGIN_RESOURCES_PATTERN, PLUGIN_DESCRIPTOR);
    // 应用描述符引用不存在的绑定变量, 执行必然失败
    let (symbolic, _) = counted_symbolic(
        "[beans.broken]\nclass = \"BarService\"\n[beans.broken.properties]\nx = { binding = \"missing\" }\n",
    );

    let container = configurator_for(&root, symbolic).configure(true);
    assert!(container.get_bean_as::<FooService>("fooService").is_ok());
    assert!(container.get_bean("broken").is_err());
}

#[test]
fn each_container_owns_its_singleton_instances() {
    // 定稿消费注册表：同一个注册表不可能被二次定稿，
    // 每个容器持有独立的单例缓存
    let root = tempfile::tempdir().unwrap();
    write_resource(root.path(), PLUGIN_RESOURCES_PATTERN, PLUGIN_DESCRIPTOR);

    let mut configurator = configurator_for(&root, empty_app_symbolic());
    let first = configurator.configure(true);
    let second = configurator.configure(true);
    assert_ne!(first.id(), second.id());

    let foo_first = first.get_bean_as::<FooService>("fooService").unwrap();
    let foo_second = second.get_bean_as::<FooService>("fooService").unwrap();
    assert!(!Arc::ptr_eq(&foo_first, &foo_second));
    assert!(Arc::ptr_eq(
        &foo_first,
        &first.get_bean_as::<FooService>("fooService").unwrap()
    ));
}

#[test]
fn load_all_into_context_feeds_a_live_container() {
    let root = tempfile::tempdir().unwrap();
    write_resource(root.path(), PLUGIN_RESOURCES_PATTERN, PLUGIN_DESCRIPTOR);

    let locator = ResourceLocator::new().with_root(root.path());
    let loader = ScriptResourceLoader::new(
        locator,
        Arc::new(TomlBeanSource::new()),
        empty_app_symbolic(),
    );
    let application = GenericApplication::shared("live-app");

    // 先定稿一个空容器, 再把发现的描述符喂给它
    let live = BeanRegistry::new(test_factories()).into_container();
    assert!(!live.contains_bean("fooService"));

    let mut accumulator = None;
    let mut registry = BeanRegistry::new(test_factories());
    loader.load_all_into_context(&mut registry, &application, &mut accumulator, &live);

    assert!(live.contains_bean("fooService"));
    assert_eq!(
        live.get_bean_as::<FooService>("fooService").unwrap().label,
        "plugin-foo"
    );
}

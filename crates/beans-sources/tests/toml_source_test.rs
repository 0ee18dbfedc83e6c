//! TOML 声明式源的集成测试

use beans_common::{FileResource, GenericApplication, SourceError};
use beans_sources::{Bindings, DeclarativeBeanSource, SymbolicSourceRegistry, TomlBeanSource};
use beans_registry::{BeanValue, Capability};
use std::fs;

const DESCRIPTOR: &str = r#"
[beans.fooService]
class = "FooService"
aliases = ["foo"]

[beans.fooService.properties]
greeting = "你好"
retries = 3
enabled = true

[beans.barService]
class = "BarService"
singleton = false
capabilities = ["post-processor"]

[beans.barService.properties]
peer = { ref = "fooService" }
app = { binding = "application" }
"#;

#[test]
fn compile_and_run_produces_bean_set() {
    let block = TomlBeanSource::compile_str("test.toml", DESCRIPTOR).unwrap();
    let bindings = Bindings::with_application(GenericApplication::shared("test-app"));

    let set = TomlBeanSource::new().run(&block, &bindings).unwrap();
    assert_eq!(set.definitions.len(), 2);
    assert_eq!(set.aliases, vec![("foo".to_string(), "fooService".to_string())]);

    let (_, foo) = set
        .definitions
        .iter()
        .find(|(name, _)| name == "fooService")
        .unwrap();
    assert_eq!(foo.class_name(), Some("FooService"));
    assert!(foo.singleton);
    assert_eq!(
        foo.properties.get("greeting"),
        Some(&BeanValue::str("你好"))
    );
    assert_eq!(foo.properties.get("retries"), Some(&BeanValue::Int(3)));
    assert_eq!(foo.properties.get("enabled"), Some(&BeanValue::Bool(true)));

    let (_, bar) = set
        .definitions
        .iter()
        .find(|(name, _)| name == "barService")
        .unwrap();
    assert!(!bar.singleton);
    assert!(bar.capabilities.contains(&Capability::PostProcessor));
    assert_eq!(
        bar.properties.get("peer"),
        Some(&BeanValue::reference("fooService"))
    );
    assert!(matches!(bar.properties.get("app"), Some(BeanValue::Bound(_))));
}

#[test]
fn block_is_reusable_across_binding_environments() {
    let block = TomlBeanSource::compile_str("test.toml", DESCRIPTOR).unwrap();
    let source = TomlBeanSource::new();

    let first = Bindings::with_application(GenericApplication::shared("first"));
    let second = Bindings::with_application(GenericApplication::shared("second"));

    assert_eq!(source.run(&block, &first).unwrap().definitions.len(), 2);
    assert_eq!(source.run(&block, &second).unwrap().definitions.len(), 2);
}

#[test]
fn missing_binding_is_reported() {
    let block = TomlBeanSource::compile_str("test.toml", DESCRIPTOR).unwrap();
    let result = TomlBeanSource::new().run(&block, &Bindings::new());
    assert!(matches!(result, Err(SourceError::BindingNotFound { name }) if name == "application"));
}

#[test]
fn declaration_without_class_is_rejected() {
    let block = TomlBeanSource::compile_str(
        "broken.toml",
        "[beans.broken]\nsingleton = true\n",
    )
    .unwrap();
    let result = TomlBeanSource::new().run(&block, &Bindings::new());
    assert!(matches!(result, Err(SourceError::RunError { .. })));
}

#[test]
fn empty_descriptor_yields_empty_set() {
    let block = TomlBeanSource::compile_str("empty.toml", "").unwrap();
    let set = TomlBeanSource::new().run(&block, &Bindings::new()).unwrap();
    assert!(set.is_empty());
}

#[test]
fn invalid_descriptor_fails_to_compile() {
    let result = TomlBeanSource::compile_str("broken.toml", "beans = [unclosed");
    assert!(matches!(result, Err(SourceError::CompileError { .. })));
}

#[test]
fn unknown_capability_is_skipped() {
    let block = TomlBeanSource::compile_str(
        "caps.toml",
        "[beans.svc]\nclass = \"Svc\"\ncapabilities = [\"post-processor\", \"mystery\"]\n",
    )
    .unwrap();
    let set = TomlBeanSource::new().run(&block, &Bindings::new()).unwrap();
    let (_, definition) = &set.definitions[0];
    assert_eq!(definition.capabilities.len(), 1);
    assert!(definition.is_post_processor());
}

#[test]
fn compile_reads_from_file_resource() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("beans.toml");
    fs::write(&path, DESCRIPTOR).unwrap();

    let source = TomlBeanSource::new();
    let block = source.compile(&FileResource::new(&path)).unwrap();
    let set = source
        .run(
            &block,
            &Bindings::with_application(GenericApplication::shared("file-app")),
        )
        .unwrap();
    assert_eq!(set.definitions.len(), 2);
}

#[test]
fn symbolic_registry_serves_embedded_blocks() {
    let mut registry = SymbolicSourceRegistry::new();
    registry.register("springbeans", || {
        TomlBeanSource::compile_str("embedded:springbeans", "[beans.svc]\nclass = \"Svc\"\n")
    });

    assert!(registry.contains("springbeans"));
    assert!(!registry.contains("missing"));

    let provider = registry.lookup("springbeans").unwrap();
    let block = provider().unwrap();
    let set = TomlBeanSource::new().run(&block, &Bindings::new()).unwrap();
    assert_eq!(set.definitions.len(), 1);
}

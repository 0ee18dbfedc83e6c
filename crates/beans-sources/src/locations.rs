//! 约定的资源位置
//!
//! 装配流程按这些固定位置探测应用与插件的 Bean 描述符。

/// 应用级外部 Bean 描述符的资源路径
pub const SPRING_RESOURCES_XML: &str = "spring/springbeans.xml";

/// 应用级符号源的注册名
pub const SPRING_RESOURCES_CLASS: &str = "springbeans";

/// 插件级 Bean 描述符的发现模式
pub const PLUGIN_RESOURCES_PATTERN: &str = "META-INF/spring/springbeans.groovy";

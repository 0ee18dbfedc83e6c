//! 资源抽象与发现
//!
//! 以有序的资源根目录集合模拟类路径：固定路径解析取首个命中的根，
//! 模式发现按根顺序遍历全部命中项。

use crate::errors::{ResourceError, ResourceResult};
use std::fmt::Debug;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// 资源句柄 trait
pub trait Resource: Send + Sync + Debug {
    /// 资源是否存在
    fn exists(&self) -> bool;

    /// 资源位置（诊断用途）
    fn location(&self) -> String;

    /// 打开资源读取流
    fn open(&self) -> ResourceResult<Box<dyn Read>>;

    /// 读取资源的全部文本内容
    fn read_to_string(&self) -> ResourceResult<String> {
        let mut reader = self.open()?;
        let mut text = String::new();
        reader
            .read_to_string(&mut text)
            .map_err(|source| ResourceError::ReadError {
                location: self.location(),
                source,
            })?;
        Ok(text)
    }
}

/// 文件系统资源
#[derive(Debug, Clone)]
pub struct FileResource {
    path: PathBuf,
}

impl FileResource {
    /// 创建指向给定路径的资源
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// 资源的文件路径
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Resource for FileResource {
    fn exists(&self) -> bool {
        self.path.is_file()
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }

    fn open(&self) -> ResourceResult<Box<dyn Read>> {
        let file = std::fs::File::open(&self.path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                ResourceError::NotFound {
                    location: self.location(),
                }
            } else {
                ResourceError::ReadError {
                    location: self.location(),
                    source,
                }
            }
        })?;
        Ok(Box::new(file))
    }
}

/// 资源定位器
///
/// 持有有序的资源根目录列表。发现顺序为根顺序加上每个根内
/// `glob` 的遍历顺序；跨平台的顺序不做稳定性保证。
#[derive(Debug, Clone, Default)]
pub struct ResourceLocator {
    roots: Vec<PathBuf>,
}

impl ResourceLocator {
    /// 创建空的资源定位器
    pub fn new() -> Self {
        Self { roots: Vec::new() }
    }

    /// 从根目录列表创建
    pub fn from_roots(roots: impl IntoIterator<Item = PathBuf>) -> Self {
        Self {
            roots: roots.into_iter().collect(),
        }
    }

    /// 追加一个资源根目录
    pub fn add_root(&mut self, root: impl Into<PathBuf>) {
        self.roots.push(root.into());
    }

    /// 追加根目录（构建器风格）
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.add_root(root);
        self
    }

    /// 资源根目录列表
    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    /// 解析固定路径资源
    ///
    /// 固定路径至多解析到一个资源：取首个命中的根；
    /// 多个根同时命中时记录警告并忽略其余。
    pub fn resolve(&self, relative: &str) -> Option<FileResource> {
        let mut hits = self
            .roots
            .iter()
            .map(|root| root.join(relative))
            .filter(|path| path.is_file());

        let first = hits.next().map(FileResource::new)?;
        if let Some(extra) = hits.next() {
            warn!(
                "资源 {} 在多个根目录命中, 忽略 {}",
                relative,
                extra.display()
            );
        }
        debug!("解析资源 {} -> {}", relative, first.location());
        Some(first)
    }

    /// 按 glob 模式发现资源
    ///
    /// 返回发现顺序的资源列表；模式在每个根目录下独立展开。
    pub fn discover(&self, pattern: &str) -> ResourceResult<Vec<FileResource>> {
        let mut found = Vec::new();
        for root in &self.roots {
            let full_pattern = root.join(pattern);
            let full_pattern =
                full_pattern
                    .to_str()
                    .ok_or_else(|| ResourceError::PatternError {
                        pattern: pattern.to_string(),
                        message: "资源根路径不是合法的 UTF-8".to_string(),
                    })?;

            let paths = glob::glob(full_pattern).map_err(|e| ResourceError::PatternError {
                pattern: pattern.to_string(),
                message: e.to_string(),
            })?;

            for entry in paths {
                match entry {
                    Ok(path) if path.is_file() => found.push(FileResource::new(path)),
                    Ok(_) => {}
                    Err(e) => warn!("跳过不可读的资源项: {}", e),
                }
            }
        }
        debug!("模式 {} 发现 {} 个资源", pattern, found.len());
        Ok(found)
    }
}

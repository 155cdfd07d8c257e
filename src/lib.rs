//! A compiler for modular chemical reaction networks.
//!
//! Modules declare species, concentrations and reactions, and may instantiate
//! other modules. The compiler flattens the module hierarchy into a single
//! reaction network and writes it as a `crnsimul` script.

#![deny(missing_docs)]

extern crate pest;
#[macro_use]
extern crate pest_derive;

pub mod crn;
pub mod frontend;
pub mod options;
pub mod target;
pub(crate) mod utils;

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use indexmap::IndexSet;
use log::{debug, info};

use crn::ModuleRegistry;
use options::Options;
use target::Target;

/// 编译器上下文
#[derive(Default)]
pub struct Context {
    registry: ModuleRegistry,
    options: Options,
    loaded: IndexSet<PathBuf>,
}

impl Context {
    /// 创建一个新的编译器上下文。
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置编译选项。
    pub fn set_options(mut self, options: Options) -> Self {
        self.options = options;
        self
    }

    /// 已注册的模块。
    pub fn registry(&self) -> &ModuleRegistry {
        &self.registry
    }

    /// 添加源代码。`import` 相对于 `filename` 所在的目录解析。
    ///
    /// 如果 `filename` 是一个存在的文件，它会被记为已加载，之后的 `import` 不会再次加载它。
    pub fn add_file(mut self, filename: &str, source: &str) -> Result<Self> {
        if let Ok(canonical) = std::fs::canonicalize(filename) {
            self.loaded.insert(canonical);
        }

        let unit = match frontend::parser::parse(source, filename) {
            Ok(unit) => unit,
            Err(snippet) => anyhow::bail!("{}", snippet),
        };

        if let Err(e) = frontend::check::check_unit(&unit) {
            anyhow::bail!("{}", e.to_snippet());
        }

        let base = Path::new(filename)
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        for import in &unit.imports {
            self = self.add_path(base.join(import.into_inner()))?;
        }

        let modules = match frontend::lower::lower_unit(&unit) {
            Ok(modules) => modules,
            Err(e) => anyhow::bail!("{}", e.to_snippet()),
        };
        for module in modules {
            self.registry.register(module)?;
        }
        Ok(self)
    }

    /// 添加源文件。同一个文件只会加载一次。
    pub fn add_path(self, path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let canonical = std::fs::canonicalize(path)
            .with_context(|| format!("cannot open `{}`", path.display()))?;
        if self.loaded.contains(&canonical) {
            debug!("`{}` is already loaded", path.display());
            return Ok(self);
        }

        info!("loading `{}`", path.display());
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read `{}`", path.display()))?;
        let mut context = self;
        context.loaded.insert(canonical);
        context.add_file(&path.to_string_lossy(), &source)
    }

    /// 编译为字符串。
    pub fn compile(&self) -> Result<String> {
        Ok(self.registry.compile(&self.options)?)
    }

    /// 输出到流。
    pub fn output_stream<T: Target>(self, output: impl std::io::Write) -> Result<()> {
        let module = self.registry.flatten_root(&self.options.root)?;
        T::write(output, &module, &self.options)
    }

    /// 输出到文件。
    pub fn output_file<T: Target>(self, output: impl AsRef<Path>) -> Result<()> {
        let module = self.registry.flatten_root(&self.options.root)?;
        T::write_to_file(output, &module, &self.options)
    }
}

//! 编译选项。

/// 编译选项。
#[derive(Clone, Debug)]
pub struct Options {
    /// 根模块名。
    pub root: String,
    /// 输出 `#!` 头。
    pub header: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            root: "main".to_string(),
            header: true,
        }
    }
}

use std::{fmt::Display, ops::Deref};

use annotate_snippets::{
    display_list::{DisplayList, FormatOptions},
    snippet::{Annotation, AnnotationType, Slice, Snippet, SourceAnnotation},
};

/// 位置信息片段
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Span<'a, T>
where
    T: 'a,
{
    inner: T,
    /// 文件名
    pub filename: &'a str,
    /// 整个源文件
    pub source: &'a str,
    /// 起始字节
    pub start: usize,
    /// 结束字节
    pub end: usize,
}

impl<'a, T: Display> Display for Span<'a, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.inner.fmt(f)
    }
}

impl<'a, T> Deref for Span<'a, T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl<'a, T> Span<'a, T> {
    /// 创建一个新的 `Span`。
    pub fn new(inner: T, filename: &'a str, source: &'a str, start: usize, end: usize) -> Self {
        Self {
            inner,
            filename,
            source,
            start,
            end,
        }
    }

    pub(crate) fn from_pest(inner: T, filename: &'a str, source: &'a str, span: pest::Span<'a>) -> Self {
        Self::new(inner, filename, source, span.start(), span.end())
    }

    /// 转换为内部类型。
    pub fn into_inner(self) -> T {
        self.inner
    }

    /// 只保留位置信息。
    pub fn location(&self) -> Span<'a, ()> {
        Span::new((), self.filename, self.source, self.start, self.end)
    }

    /// 起始位置的行号，从 1 开始。
    pub fn line(&self) -> usize {
        self.source[..self.start].matches('\n').count() + 1
    }

    /// 包含该片段的整行。
    pub fn lines(&self) -> LinesInfo<'a> {
        let (mut start, mut end) = (self.start, self.end);
        // 指向文件末尾时，改为指向最后一个可见字符
        let visible = self.source.trim_end().len();
        if start >= visible && visible > 0 {
            start = self.source[..visible]
                .char_indices()
                .last()
                .map_or(0, |(i, _)| i);
            end = visible;
        }

        let line_begin = self.source[..start].rfind('\n').map_or(0, |i| i + 1);
        let line_end = self.source[end..]
            .find('\n')
            .map_or(self.source.len(), |i| end + i);
        let chars = |from: usize, to: usize| self.source[from..to].chars().count();

        LinesInfo {
            filename: self.filename,
            source: &self.source[line_begin..line_end],
            line_start: self.source[..line_begin].matches('\n').count() + 1,
            range: (chars(line_begin, start), chars(line_begin, end)),
        }
    }
}

/// 所在行的信息
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LinesInfo<'a> {
    /// 文件名
    pub filename: &'a str,
    /// 包含 Span 的某几行
    pub source: &'a str,
    /// 起始行号
    pub line_start: usize,
    /// Span 在 source 中的字符范围
    pub range: (usize, usize),
}

impl<'a> LinesInfo<'a> {
    /// 转换为 annotate-snippets 的片段。
    pub fn as_annotation(&self, message: &'a str, annotation_type: AnnotationType) -> Slice<'a> {
        Slice {
            source: self.source,
            line_start: self.line_start,
            origin: Some(self.filename),
            annotations: vec![SourceAnnotation {
                range: self.range,
                label: message,
                annotation_type,
            }],
            fold: true,
        }
    }
}

/// 渲染一条带源码片段的错误信息。
pub(crate) fn error_snippet<T>(title: &str, span: &Span<'_, T>, label: &str, note: Option<&str>) -> String {
    let lines = span.lines();
    let snippet = Snippet {
        title: Some(Annotation {
            id: None,
            label: Some(title),
            annotation_type: AnnotationType::Error,
        }),
        footer: note
            .map(|note| Annotation {
                id: None,
                label: Some(note),
                annotation_type: AnnotationType::Note,
            })
            .into_iter()
            .collect(),
        slices: vec![lines.as_annotation(label, AnnotationType::Error)],
        opt: FormatOptions {
            color: true,
            ..Default::default()
        },
    };
    DisplayList::from(snippet).to_string()
}

//! 格式注册表：文档可被解释成的文本编码（静态、有序）

/// 文档格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FileFormat {
    #[default]
    Json,
    Yaml,
    Xml,
    Toml,
    Csv,
}

impl FileFormat {
    /// 格式的取值（小写，与注册表 value 一致）
    pub fn as_str(self) -> &'static str {
        match self {
            FileFormat::Json => "json",
            FileFormat::Yaml => "yaml",
            FileFormat::Xml => "xml",
            FileFormat::Toml => "toml",
            FileFormat::Csv => "csv",
        }
    }

    /// 按取值查找格式，未知取值返回 None
    pub fn from_value(value: &str) -> Option<Self> {
        FORMATS
            .iter()
            .map(|d| d.value)
            .find(|f| f.as_str() == value)
    }

    /// 底栏上显示的大写标签
    pub fn badge(self) -> String {
        self.as_str().to_uppercase()
    }
}

/// 注册表中的一项
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatDescriptor {
    pub value: FileFormat,
    pub label: &'static str,
}

/// 支持的格式，顺序即菜单顺序
pub const FORMATS: &[FormatDescriptor] = &[
    FormatDescriptor { value: FileFormat::Json, label: "JSON" },
    FormatDescriptor { value: FileFormat::Yaml, label: "YAML" },
    FormatDescriptor { value: FileFormat::Xml, label: "XML" },
    FormatDescriptor { value: FileFormat::Toml, label: "TOML" },
    FormatDescriptor { value: FileFormat::Csv, label: "CSV" },
];

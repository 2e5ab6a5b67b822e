//! 绑定键与限定符
//!
//! 键由被抽象的类型和可选的限定符组成，是容器内一切查找的身份标识。

use crate::errors::ConfigurationError;
use crate::metadata::TypeInfo;
use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// 限定符
///
/// 不透明的字符串标签，容器只比较相等性，不解释其含义。
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Qualifier(Arc<str>);

impl Qualifier {
    /// 创建并校验限定符
    pub fn new(name: impl AsRef<str>) -> Result<Self, ConfigurationError> {
        let qualifier = Self(Arc::from(name.as_ref()));
        qualifier.validate()?;
        Ok(qualifier)
    }

    /// 限定符名称
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 校验限定符格式
    ///
    /// 空字符串、包含空白或 `@ , < >` 的限定符视为格式无效。
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        let malformed = self.0.is_empty()
            || self
                .0
                .chars()
                .any(|c| c.is_whitespace() || matches!(c, '@' | ',' | '<' | '>'));

        if malformed {
            return Err(ConfigurationError::MalformedQualifier {
                qualifier: self.0.to_string(),
            });
        }
        Ok(())
    }
}

impl From<&str> for Qualifier {
    fn from(name: &str) -> Self {
        Self(Arc::from(name))
    }
}

impl From<String> for Qualifier {
    fn from(name: String) -> Self {
        Self(Arc::from(name))
    }
}

impl fmt::Display for Qualifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for Qualifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.0)
    }
}

/// 类型层面的限定符标签
///
/// 通常由 [`qualifier!`](crate::qualifier) 宏生成。
pub trait QualifierTag: Send + Sync + 'static {
    /// 限定符名称
    const NAME: &'static str;

    /// 转换为运行时限定符
    fn qualifier() -> Qualifier {
        Qualifier::from(Self::NAME)
    }
}

/// 声明类型层面的限定符
///
/// ```
/// infrastructure_common::qualifier!(pub CarBenz = "benz");
/// use infrastructure_common::QualifierTag;
/// assert_eq!(CarBenz::NAME, "benz");
/// ```
#[macro_export]
macro_rules! qualifier {
    ($(#[$meta:meta])* $vis:vis $name:ident = $value:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis struct $name;

        impl $crate::QualifierTag for $name {
            const NAME: &'static str = $value;
        }
    };
}

/// 绑定键
///
/// 两个键相等当且仅当类型与限定符都相等；类型名称只用于诊断输出。
#[derive(Clone)]
pub struct Key {
    type_info: TypeInfo,
    qualifier: Option<Qualifier>,
}

impl Key {
    /// 无限定符的键
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            type_info: TypeInfo::of::<T>(),
            qualifier: None,
        }
    }

    /// 带限定符的键
    pub fn named<T: ?Sized + 'static>(qualifier: impl Into<Qualifier>) -> Self {
        Self::of::<T>().with_qualifier(qualifier)
    }

    /// 替换限定符
    pub fn with_qualifier(mut self, qualifier: impl Into<Qualifier>) -> Self {
        self.qualifier = Some(qualifier.into());
        self
    }

    /// 替换为可选的限定符
    pub fn with_optional_qualifier(mut self, qualifier: Option<Qualifier>) -> Self {
        self.qualifier = qualifier;
        self
    }

    /// 类型ID
    pub fn type_id(&self) -> TypeId {
        self.type_info.id
    }

    /// 类型信息
    pub fn type_info(&self) -> &TypeInfo {
        &self.type_info
    }

    /// 完整类型名称
    pub fn type_name(&self) -> &'static str {
        self.type_info.full_name
    }

    /// 限定符
    pub fn qualifier(&self) -> Option<&Qualifier> {
        self.qualifier.as_ref()
    }

    /// 是否指向类型 `T`
    pub fn is<T: ?Sized + 'static>(&self) -> bool {
        self.type_info.id == TypeId::of::<T>()
    }
}

impl PartialEq for Key {
    fn eq(&self, other: &Self) -> bool {
        self.type_info.id == other.type_info.id && self.qualifier == other.qualifier
    }
}

impl Eq for Key {}

impl Hash for Key {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_info.id.hash(state);
        self.qualifier.hash(state);
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.type_info.short_name())?;
        if let Some(qualifier) = &self.qualifier {
            write!(f, "@{}", qualifier)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Key({})", self)
    }
}

/// 解析路径
///
/// 发生错误时正在构造中的键链，从根键开始。
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ResolutionPath(Vec<Key>);

impl ResolutionPath {
    /// 创建空路径
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// 追加一个键
    pub fn push(&mut self, key: Key) {
        self.0.push(key);
    }

    /// 返回追加了一个键的新路径
    pub fn with(mut self, key: Key) -> Self {
        self.0.push(key);
        self
    }

    /// 路径上的键
    pub fn keys(&self) -> &[Key] {
        &self.0
    }

    /// 路径长度
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// 路径末端的键
    pub fn last(&self) -> Option<&Key> {
        self.0.last()
    }
}

impl From<Vec<Key>> for ResolutionPath {
    fn from(keys: Vec<Key>) -> Self {
        Self(keys)
    }
}

impl fmt::Display for ResolutionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("<empty>");
        }
        for (index, key) in self.0.iter().enumerate() {
            if index > 0 {
                f.write_str(" -> ")?;
            }
            write!(f, "{}", key)?;
        }
        Ok(())
    }
}

impl fmt::Debug for ResolutionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self)
    }
}

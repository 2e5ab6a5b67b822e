//! 容器配置与统计
//!
//! 提供注入器的运行参数，可从 JSON 加载并由环境变量覆盖

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::warn;

/// 容器配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerConfig {
    /// 是否允许即时绑定
    pub jit_bindings: bool,
    /// 是否在创建时预先构造所有显式单例
    pub eager_singletons: bool,
    /// 是否在创建时校验完整的依赖图
    pub validate_dependency_graph: bool,
    /// 最大解析深度
    pub max_resolution_depth: usize,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            jit_bindings: true,
            eager_singletons: false,
            validate_dependency_graph: false,
            max_resolution_depth: 100,
        }
    }
}

impl ContainerConfig {
    /// 从 JSON 字符串加载，缺失的字段取默认值
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// 用环境变量覆盖配置
    ///
    /// 读取 `{prefix}_JIT_BINDINGS`、`{prefix}_EAGER_SINGLETONS`、
    /// `{prefix}_VALIDATE_GRAPH` 与 `{prefix}_MAX_RESOLUTION_DEPTH`，无法解析的值被忽略。
    pub fn with_env_overrides(self, prefix: &str) -> Self {
        self.with_overrides(prefix, |name| std::env::var(name).ok())
    }

    fn with_overrides(mut self, prefix: &str, lookup: impl Fn(&str) -> Option<String>) -> Self {
        override_field(&mut self.jit_bindings, &format!("{prefix}_JIT_BINDINGS"), &lookup);
        override_field(
            &mut self.eager_singletons,
            &format!("{prefix}_EAGER_SINGLETONS"),
            &lookup,
        );
        override_field(
            &mut self.validate_dependency_graph,
            &format!("{prefix}_VALIDATE_GRAPH"),
            &lookup,
        );
        override_field(
            &mut self.max_resolution_depth,
            &format!("{prefix}_MAX_RESOLUTION_DEPTH"),
            &lookup,
        );
        self
    }
}

fn override_field<T: FromStr>(field: &mut T, name: &str, lookup: &impl Fn(&str) -> Option<String>) {
    let Some(raw) = lookup(name) else {
        return;
    };
    match raw.trim().parse() {
        Ok(value) => *field = value,
        Err(_) => warn!("忽略无法解析的环境变量 {}={:?}", name, raw),
    }
}

/// 注入器统计信息
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InjectorStats {
    /// 显式绑定数量
    pub bindings: usize,
    /// 已生成的即时绑定数量
    pub jit_bindings: usize,
    /// 已缓存的单例数量
    pub cached_singletons: usize,
    /// 执行过的构造配方次数
    pub provisions: u64,
}

//! 解析栈
//!
//! 记录当前线程上正在构造的键，用于检测循环依赖和限制解析深度。
//! 每一帧都带有注入器ID，多个注入器在同一线程上交错解析时互不干扰。

use infrastructure_common::{DependencyError, DependencyResult, Key, ResolutionPath};
use std::cell::RefCell;
use std::marker::PhantomData;
use uuid::Uuid;

thread_local! {
    static RESOLUTION_STACK: RefCell<Vec<(Uuid, Key)>> = const { RefCell::new(Vec::new()) };
}

/// 当前线程上指定注入器的解析路径
pub(crate) fn current_path(injector: Uuid) -> ResolutionPath {
    RESOLUTION_STACK.with(|stack| {
        stack
            .borrow()
            .iter()
            .filter(|(id, _)| *id == injector)
            .map(|(_, key)| key.clone())
            .collect::<Vec<_>>()
            .into()
    })
}

/// 解析帧守卫，离开作用域时弹出对应的键
pub(crate) struct ResolutionGuard {
    // 帧属于当前线程
    _not_send: PhantomData<*const ()>,
}

impl ResolutionGuard {
    /// 压入一帧；键已在栈上或深度超限时返回错误
    pub(crate) fn enter(injector: Uuid, key: &Key, max_depth: usize) -> DependencyResult<Self> {
        RESOLUTION_STACK.with(|stack| {
            let mut stack = stack.borrow_mut();
            let mut path: ResolutionPath = stack
                .iter()
                .filter(|(id, _)| *id == injector)
                .map(|(_, frame)| frame.clone())
                .collect::<Vec<_>>()
                .into();

            let circular = path.keys().contains(key);
            let depth = path.len();
            path.push(key.clone());

            if circular {
                return Err(DependencyError::CircularDependency {
                    key: key.clone(),
                    path,
                });
            }
            if depth >= max_depth {
                return Err(DependencyError::ResolutionTooDeep {
                    key: key.clone(),
                    max_depth,
                    path,
                });
            }

            stack.push((injector, key.clone()));
            Ok(Self {
                _not_send: PhantomData,
            })
        })
    }
}

impl Drop for ResolutionGuard {
    fn drop(&mut self) {
        RESOLUTION_STACK.with(|stack| {
            stack.borrow_mut().pop();
        });
    }
}

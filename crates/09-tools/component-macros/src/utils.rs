//! 宏工具函数

use proc_macro2::Span;
use syn::{Ident, LitStr, Result};

/// 登记函数名称，例如 `Owner` 对应 `__register_injectable_Owner`
///
/// 保留结构体名称的大小写，`Bmw` 与 `BMW` 得到不同的函数名。
pub fn registration_fn_name(struct_name: &Ident) -> Ident {
    Ident::new(
        &format!("__register_injectable_{}", struct_name),
        Span::call_site(),
    )
}

/// 在编译期校验限定符字面量
///
/// 空字符串、包含空白或 `@ , < >` 的限定符会被拒绝。
pub fn validate_qualifier(lit: &LitStr) -> Result<()> {
    let value = lit.value();
    let malformed = value.is_empty()
        || value
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '@' | ',' | '<' | '>'));

    if malformed {
        return Err(syn::Error::new_spanned(
            lit,
            format!("限定符格式无效: {:?}", value),
        ));
    }
    Ok(())
}

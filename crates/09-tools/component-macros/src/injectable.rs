//! `#[derive(Injectable)]` 实现

use crate::utils::{registration_fn_name, validate_qualifier};
use proc_macro2::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Field, Fields, LitStr, Result, Type};

/// 结构体级参数
#[derive(Debug, Default)]
struct InjectableArgs {
    singleton: bool,
}

impl InjectableArgs {
    fn from_attrs(input: &DeriveInput) -> Result<Self> {
        let mut args = Self::default();
        for attr in input.attrs.iter().filter(|attr| attr.path().is_ident("inject")) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("singleton") {
                    args.singleton = true;
                    Ok(())
                } else {
                    Err(meta.error("未知的 inject 参数，结构体上可用: singleton"))
                }
            })?;
        }
        Ok(args)
    }
}

/// 字段的注入方式
enum FieldSource {
    /// 从依赖游标取出，可带限定符
    Injected { qualifier: Option<LitStr> },
    /// 使用 `Default::default()`，不声明依赖
    Default,
}

struct InjectField<'a> {
    ty: &'a Type,
    source: FieldSource,
}

impl<'a> InjectField<'a> {
    fn parse(field: &'a Field) -> Result<Self> {
        let mut qualifier: Option<LitStr> = None;
        let mut use_default = false;

        for attr in field.attrs.iter().filter(|attr| attr.path().is_ident("inject")) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("named") {
                    let lit: LitStr = meta.value()?.parse()?;
                    validate_qualifier(&lit)?;
                    qualifier = Some(lit);
                    Ok(())
                } else if meta.path.is_ident("default") {
                    use_default = true;
                    Ok(())
                } else {
                    Err(meta.error("未知的 inject 参数，字段上可用: named = \"...\", default"))
                }
            })?;
        }

        let source = match (qualifier, use_default) {
            (Some(lit), true) => {
                return Err(syn::Error::new_spanned(lit, "named 与 default 不能同时使用"))
            }
            (qualifier, false) => FieldSource::Injected { qualifier },
            (None, true) => FieldSource::Default,
        };

        Ok(Self {
            ty: &field.ty,
            source,
        })
    }

    /// 依赖声明；`default` 字段没有依赖
    fn dependency(&self) -> Option<TokenStream> {
        let ty = self.ty;
        match &self.source {
            FieldSource::Injected { qualifier: Some(lit) } => Some(quote! {
                <#ty as ::di_abstractions::Inject>::dependency(
                    ::std::option::Option::Some(::di_abstractions::Qualifier::from(#lit))
                )
            }),
            FieldSource::Injected { qualifier: None } => Some(quote! {
                <#ty as ::di_abstractions::Inject>::dependency(::std::option::Option::None)
            }),
            FieldSource::Default => None,
        }
    }

    fn value(&self) -> TokenStream {
        let ty = self.ty;
        match self.source {
            FieldSource::Injected { .. } => quote! { _deps.next::<#ty>()? },
            FieldSource::Default => quote! { ::std::default::Default::default() },
        }
    }
}

/// 展开 `#[derive(Injectable)]`
pub fn expand(input: DeriveInput) -> Result<TokenStream> {
    let args = InjectableArgs::from_attrs(&input)?;

    let fields = match &input.data {
        Data::Struct(data) => &data.fields,
        Data::Enum(data) => {
            return Err(syn::Error::new_spanned(
                data.enum_token,
                "Injectable 只能用于结构体",
            ))
        }
        Data::Union(data) => {
            return Err(syn::Error::new_spanned(
                data.union_token,
                "Injectable 只能用于结构体",
            ))
        }
    };

    let inject_fields = fields
        .iter()
        .map(InjectField::parse)
        .collect::<Result<Vec<_>>>()?;
    let dependencies = inject_fields.iter().filter_map(InjectField::dependency);
    let values = inject_fields.iter().map(InjectField::value);

    let construct = match fields {
        Fields::Named(named) => {
            let names = named.named.iter().map(|field| &field.ident);
            quote! { Self { #(#names: #values),* } }
        }
        Fields::Unnamed(_) => quote! { Self(#(#values),*) },
        Fields::Unit => quote! { Self },
    };

    let scope = if args.singleton {
        quote! { ::di_abstractions::Scope::Singleton }
    } else {
        quote! { ::di_abstractions::Scope::Unscoped }
    };

    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let injectable_impl = quote! {
        impl #impl_generics ::di_abstractions::Injectable for #name #ty_generics #where_clause {
            fn descriptor() -> ::di_abstractions::ConstructorDescriptor {
                ::di_abstractions::ConstructorDescriptor::new::<Self, _>(
                    ::std::vec![#(#dependencies),*],
                    |_deps: &mut ::di_abstractions::Dependencies| {
                        ::std::result::Result::Ok(#construct)
                    },
                )
                .in_scope(#scope)
            }
        }
    };

    // 泛型结构体没有唯一的类型，不登记到全局目录
    if !input.generics.params.is_empty() {
        return Ok(injectable_impl);
    }

    let registration_fn = registration_fn_name(name);
    Ok(quote! {
        #injectable_impl

        // 使用 ctor 在程序启动时登记构造描述符
        #[::ctor::ctor]
        #[allow(non_snake_case)]
        fn #registration_fn() {
            ::di_abstractions::ConstructorCatalog::global()
                .register_type::<#name>();
        }
    })
}

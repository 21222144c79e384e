//! Implementation of the `#[memoized]` attribute.
//!
//! # Generated Code Structure
//!
//! For
//!
//! ```text
//! pub fn area(width: u32, height: u32) -> u64 { ... }
//! ```
//!
//! the attribute generates
//!
//! ```text
//! pub fn area(width: u32, height: u32) -> u64 {
//!     fn __recallable_area(width: u32, height: u32) -> u64 { ... }
//!
//!     static __RECALLABLE_CACHE: ::std::sync::LazyLock<
//!         ::recallable::memoize::Memoized<
//!             ::recallable::callable::Total<fn(u32, u32) -> u64>,
//!             (u32, u32,),
//!         >,
//!     > = ::std::sync::LazyLock::new(|| {
//!         ::recallable::memoize::memoize(::recallable::callable::total(
//!             __recallable_area as fn(u32, u32) -> u64,
//!         ))
//!     });
//!
//!     match ::recallable::callable::Callable::invoke(&*__RECALLABLE_CACHE, (width, height,)) {
//!         ::core::result::Result::Ok(value) => value,
//!         ::core::result::Result::Err(never) => match never {},
//!     }
//! }
//! ```
//!
//! A function returning `Result` skips the `Total` adapter and returns the
//! result of `invoke` directly.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use syn::{FnArg, Ident, ItemFn, Pat, PatIdent, ReturnType, Signature, Type, parse_macro_input};

/// A parameter of the memoized function, reduced to its binding and type.
struct Parameter {
    name: Ident,
    parameter_type: Type,
}

/// Main implementation of the `#[memoized]` attribute.
pub fn memoized_impl(attribute: TokenStream, item: TokenStream) -> TokenStream {
    let attribute = TokenStream2::from(attribute);
    let function = parse_macro_input!(item as ItemFn);

    let expanded = expand(attribute, function).unwrap_or_else(syn::Error::into_compile_error);

    TokenStream::from(expanded)
}

fn expand(attribute: TokenStream2, function: ItemFn) -> syn::Result<TokenStream2> {
    if !attribute.is_empty() {
        return Err(syn::Error::new_spanned(
            attribute,
            "#[memoized] does not take arguments",
        ));
    }

    validate_signature(&function.sig)?;
    let parameters = collect_parameters(&function.sig)?;
    let output = match &function.sig.output {
        ReturnType::Type(_, output) => output.as_ref().clone(),
        ReturnType::Default => {
            return Err(syn::Error::new_spanned(
                &function.sig,
                "#[memoized] requires a return type; a function returning `()` has nothing to cache",
            ));
        }
    };

    let ItemFn {
        attrs,
        vis,
        sig,
        block,
    } = function;

    let inner_name = format_ident!("__recallable_{}", sig.ident);
    let mut inner_signature = sig.clone();
    inner_signature.ident = inner_name.clone();

    let outer_signature = strip_binding_modes(sig);

    let names: Vec<&Ident> = parameters.iter().map(|parameter| &parameter.name).collect();
    let types: Vec<&Type> = parameters
        .iter()
        .map(|parameter| &parameter.parameter_type)
        .collect();

    let pointer = quote! { fn(#(#types),*) -> #output };
    let key = quote! { (#(#types,)*) };
    let arguments = quote! { (#(#names,)*) };

    let (callable_type, callable, call) = if returns_result(&output) {
        (
            pointer.clone(),
            quote! { #inner_name as #pointer },
            quote! {
                ::recallable::callable::Callable::invoke(&*__RECALLABLE_CACHE, #arguments)
            },
        )
    } else {
        (
            quote! { ::recallable::callable::Total<#pointer> },
            quote! { ::recallable::callable::total(#inner_name as #pointer) },
            quote! {
                match ::recallable::callable::Callable::invoke(&*__RECALLABLE_CACHE, #arguments) {
                    ::core::result::Result::Ok(value) => value,
                    ::core::result::Result::Err(never) => match never {},
                }
            },
        )
    };

    Ok(quote! {
        #(#attrs)*
        #vis #outer_signature {
            #inner_signature #block

            static __RECALLABLE_CACHE: ::std::sync::LazyLock<
                ::recallable::memoize::Memoized<#callable_type, #key>,
            > = ::std::sync::LazyLock::new(|| ::recallable::memoize::memoize(#callable));

            #call
        }
    })
}

fn validate_signature(signature: &Signature) -> syn::Result<()> {
    if let Some(token) = &signature.constness {
        return Err(syn::Error::new_spanned(
            token,
            "#[memoized] cannot be applied to a const fn",
        ));
    }
    if let Some(token) = &signature.asyncness {
        return Err(syn::Error::new_spanned(
            token,
            "#[memoized] cannot be applied to an async fn",
        ));
    }
    if let Some(token) = &signature.unsafety {
        return Err(syn::Error::new_spanned(
            token,
            "#[memoized] cannot be applied to an unsafe fn",
        ));
    }
    if let Some(abi) = &signature.abi {
        return Err(syn::Error::new_spanned(
            abi,
            "#[memoized] cannot be applied to an extern fn",
        ));
    }
    if !signature.generics.params.is_empty() || signature.generics.where_clause.is_some() {
        return Err(syn::Error::new_spanned(
            &signature.generics,
            "#[memoized] cannot be applied to a generic fn; every instantiation would share one cache",
        ));
    }
    if let Some(variadic) = &signature.variadic {
        return Err(syn::Error::new_spanned(
            variadic,
            "#[memoized] cannot be applied to a variadic fn",
        ));
    }
    Ok(())
}

fn collect_parameters(signature: &Signature) -> syn::Result<Vec<Parameter>> {
    signature
        .inputs
        .iter()
        .map(|input| match input {
            FnArg::Receiver(receiver) => Err(syn::Error::new_spanned(
                receiver,
                "#[memoized] cannot be applied to a method taking `self`",
            )),
            FnArg::Typed(pattern_type) => {
                let name = match pattern_type.pat.as_ref() {
                    Pat::Ident(PatIdent {
                        ident,
                        by_ref: None,
                        subpat: None,
                        ..
                    }) => ident.clone(),
                    other => {
                        return Err(syn::Error::new_spanned(
                            other,
                            "#[memoized] parameters must be plain identifiers",
                        ));
                    }
                };

                let parameter_type = pattern_type.ty.as_ref();
                match parameter_type {
                    Type::Reference(_) => Err(syn::Error::new_spanned(
                        parameter_type,
                        "#[memoized] parameters must be owned; the cache outlives any borrow",
                    )),
                    Type::ImplTrait(_) => Err(syn::Error::new_spanned(
                        parameter_type,
                        "#[memoized] parameters cannot use `impl Trait`",
                    )),
                    _ => Ok(Parameter {
                        name,
                        parameter_type: parameter_type.clone(),
                    }),
                }
            }
        })
        .collect()
}

/// Removes `mut` bindings from the outer signature; the arguments are only
/// moved into the key tuple there.
fn strip_binding_modes(mut signature: Signature) -> Signature {
    for input in &mut signature.inputs {
        if let FnArg::Typed(pattern_type) = input
            && let Pat::Ident(pattern) = pattern_type.pat.as_mut()
        {
            pattern.mutability = None;
        }
    }
    signature
}

fn returns_result(output: &Type) -> bool {
    match output {
        Type::Path(type_path) => type_path
            .path
            .segments
            .last()
            .is_some_and(|segment| segment.ident == "Result"),
        Type::Group(group) => returns_result(&group.elem),
        Type::Paren(paren) => returns_result(&paren.elem),
        _ => false,
    }
}

// Path: crates/macros/src/lib.rs
//! Procedural macros for declaring Verdant services.
//!
//! `#[service_interface]` turns an inherent `impl` block into a full
//! `BlockchainService` implementation. Functions tagged `#[method]` become
//! state-mutating calls and functions tagged `#[query]` become read-only
//! queries, each dispatched by the name `"{fn_name}@v1"`.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use syn::{
    parse::Parse, parse::ParseStream, parse_macro_input, punctuated::Punctuated, spanned::Spanned,
    Expr, FnArg, ImplItem, ImplItemFn, ItemImpl, Lit, LitInt, LitStr, Meta, Token, Type,
};

struct ServiceAttributes {
    id: LitStr,
    abi_version: LitInt,
    state_schema: LitStr,
    capabilities: Option<LitStr>,
}

fn literal(expr: &Expr) -> Option<&Lit> {
    match expr {
        Expr::Lit(expr_lit) => Some(&expr_lit.lit),
        _ => None,
    }
}

impl Parse for ServiceAttributes {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let mut id = None;
        let mut abi_version = None;
        let mut state_schema = None;
        let mut capabilities = None;

        for meta in Punctuated::<Meta, Token![,]>::parse_terminated(input)? {
            let nv = match meta {
                Meta::NameValue(nv) => nv,
                other => return Err(syn::Error::new(other.span(), "expected `key = value`")),
            };
            let key = nv
                .path
                .get_ident()
                .map(|i| i.to_string())
                .unwrap_or_default();
            match (key.as_str(), literal(&nv.value)) {
                ("id", Some(Lit::Str(s))) => id = Some(s.clone()),
                ("abi_version", Some(Lit::Int(i))) => abi_version = Some(i.clone()),
                ("state_schema", Some(Lit::Str(s))) => state_schema = Some(s.clone()),
                ("capabilities", Some(Lit::Str(s))) => capabilities = Some(s.clone()),
                _ => {
                    return Err(syn::Error::new(
                        nv.span(),
                        "unknown or malformed service attribute",
                    ))
                }
            }
        }

        Ok(ServiceAttributes {
            id: id.ok_or_else(|| input.error("Missing `id` attribute"))?,
            abi_version: abi_version
                .ok_or_else(|| input.error("Missing `abi_version` attribute"))?,
            state_schema: state_schema
                .ok_or_else(|| input.error("Missing `state_schema` attribute"))?,
            capabilities,
        })
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum EntryKind {
    Method,
    Query,
}

/// Removes a `#[method]` or `#[query]` marker from `func` and reports which one it was.
fn take_marker(func: &mut ImplItemFn) -> Option<EntryKind> {
    let mut kind = None;
    func.attrs.retain(|attr| {
        if attr.path().is_ident("method") {
            kind = Some(EntryKind::Method);
            false
        } else if attr.path().is_ident("query") {
            kind = Some(EntryKind::Query);
            false
        } else {
            true
        }
    });
    kind
}

/// Builds one dispatch arm.
///
/// Expected signatures:
/// `fn name(&self, state, params: P, ctx) -> Result<R, E>` or `fn name(&self, state, ctx) -> Result<R, E>`,
/// where `P: Decode`, `R: Encode` and `E: Into<TransactionError>`.
fn dispatch_arm(func: &ImplItemFn) -> syn::Result<TokenStream2> {
    let name = &func.sig.ident;
    let dispatch_name = format!("{}@v1", name);
    let inputs: Vec<&FnArg> = func.sig.inputs.iter().collect();

    let call = match inputs.as_slice() {
        [FnArg::Receiver(_), _, FnArg::Typed(params), _] => {
            let params_ty: &Type = &params.ty;
            quote! {
                let decoded: #params_ty = verdant_types::codec::from_bytes_canonical(params)
                    .map_err(verdant_types::error::TransactionError::Deserialization)?;
                self.#name(state, decoded, ctx)
            }
        }
        [FnArg::Receiver(_), _, _] => quote! { self.#name(state, ctx) },
        _ => {
            return Err(syn::Error::new(
                func.sig.span(),
                "service entry points take (&self, state, [params,] ctx)",
            ))
        }
    };

    Ok(quote! {
        #dispatch_name => {
            let output = { #call }.map_err(verdant_types::error::TransactionError::from)?;
            verdant_types::codec::to_bytes_canonical(&output)
                .map_err(verdant_types::error::TransactionError::Serialization)
        }
    })
}

#[proc_macro_attribute]
pub fn service_interface(args: TokenStream, input: TokenStream) -> TokenStream {
    let args = parse_macro_input!(args as ServiceAttributes);
    let mut item_impl = parse_macro_input!(input as ItemImpl);

    let struct_name = item_impl.self_ty.clone();
    let service_id = args.id.value();
    let abi_version = args.abi_version;
    let state_schema = args.state_schema;
    let caps_string = args
        .capabilities
        .as_ref()
        .map(|l| l.value())
        .unwrap_or_default();
    let cap_names: Vec<&str> = caps_string
        .split(',')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .collect();

    let cap_idents = cap_names.iter().map(|c| format_ident!("{}", c));
    let cap_flags = quote! {
        verdant_types::service_configs::Capabilities::empty()
            #(| verdant_types::service_configs::Capabilities::#cap_idents)*
    };

    let as_initiative_catalog = if cap_names.contains(&"INITIATIVE_CATALOG") {
        quote! {
            fn as_initiative_catalog(&self) -> Option<&dyn verdant_api::initiative::InitiativeCatalog> {
                Some(self)
            }
        }
    } else {
        quote! {}
    };

    let mut method_arms = Vec::new();
    let mut query_arms = Vec::new();
    for item in &mut item_impl.items {
        let ImplItem::Fn(func) = item else { continue };
        let Some(kind) = take_marker(func) else {
            continue;
        };
        let arm = match dispatch_arm(func) {
            Ok(arm) => arm,
            Err(e) => return e.to_compile_error().into(),
        };
        match kind {
            EntryKind::Method => method_arms.push(arm),
            EntryKind::Query => query_arms.push(arm),
        }
    }

    let dispatch_impl = quote! {
        #[async_trait::async_trait]
        impl verdant_api::services::BlockchainService for #struct_name {
            fn id(&self) -> &str {
                #service_id
            }

            fn abi_version(&self) -> u32 {
                #abi_version
            }

            fn state_schema(&self) -> &str {
                #state_schema
            }

            fn capabilities(&self) -> verdant_types::service_configs::Capabilities {
                #cap_flags
            }

            fn as_any(&self) -> &dyn std::any::Any {
                self
            }

            #as_initiative_catalog

            #[allow(unused_variables)]
            async fn handle_service_call(
                &self,
                state: &mut dyn verdant_api::state::StateAccess,
                method: &str,
                params: &[u8],
                ctx: &mut verdant_api::transaction::context::TxContext<'_>,
            ) -> Result<Vec<u8>, verdant_types::error::TransactionError> {
                match method {
                    #(#method_arms)*
                    _ => Err(verdant_types::error::TransactionError::Unsupported(format!(
                        "Service '{}' does not support call '{}'",
                        self.id(),
                        method
                    ))),
                }
            }

            #[allow(unused_variables)]
            fn handle_service_query(
                &self,
                state: &dyn verdant_api::state::StateAccess,
                method: &str,
                params: &[u8],
                ctx: &verdant_api::transaction::context::TxContext<'_>,
            ) -> Result<Vec<u8>, verdant_types::error::TransactionError> {
                match method {
                    #(#query_arms)*
                    _ => Err(verdant_types::error::TransactionError::Unsupported(format!(
                        "Service '{}' does not support query '{}'",
                        self.id(),
                        method
                    ))),
                }
            }
        }
    };

    let output = quote! {
        #item_impl
        #dispatch_impl
    };

    TokenStream::from(output)
}

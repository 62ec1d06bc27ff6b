//! Procedural macros for boardkeep operations
//!
//! `#[operation]` attaches verb/noun/description metadata to a command struct
//! by generating its `boardkeep_operations::Operation` implementation.

use proc_macro::TokenStream;
use proc_macro2::{Span, TokenStream as TokenStream2};
use quote::quote;
use syn::{meta::ParseNestedMeta, parse_macro_input, Data, DeriveInput, Fields, LitStr};

/// Attribute macro for defining an operation
///
/// # Usage
///
/// ```ignore
/// #[operation(verb = "move", noun = "task", description = "Move a task")]
/// #[derive(Debug, Deserialize, Serialize)]
/// pub struct MoveTask {
///     pub id: TaskId,
///     pub position: i64,
/// }
/// ```
#[proc_macro_attribute]
pub fn operation(attr: TokenStream, item: TokenStream) -> TokenStream {
    let mut args = OperationArgs::default();
    let parser = syn::meta::parser(|meta| args.parse(meta));
    parse_macro_input!(attr with parser);
    let input = parse_macro_input!(item as DeriveInput);

    match expand(args, input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

#[derive(Default)]
struct OperationArgs {
    verb: Option<LitStr>,
    noun: Option<LitStr>,
    description: Option<LitStr>,
}

impl OperationArgs {
    fn parse(&mut self, meta: ParseNestedMeta) -> syn::Result<()> {
        let slot = if meta.path.is_ident("verb") {
            &mut self.verb
        } else if meta.path.is_ident("noun") {
            &mut self.noun
        } else if meta.path.is_ident("description") {
            &mut self.description
        } else {
            return Err(meta.error("unknown operation attribute, expected verb, noun or description"));
        };
        *slot = Some(meta.value()?.parse()?);
        Ok(())
    }
}

fn required(value: Option<LitStr>, key: &str) -> syn::Result<LitStr> {
    value.ok_or_else(|| syn::Error::new(Span::call_site(), format!("missing `{}` attribute", key)))
}

fn expand(args: OperationArgs, input: DeriveInput) -> syn::Result<TokenStream2> {
    let verb = required(args.verb, "verb")?;
    let noun = required(args.noun, "noun")?;
    let description = required(args.description, "description")?;

    let fields: Vec<String> = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => named
                .named
                .iter()
                .filter_map(|f| f.ident.as_ref())
                .map(|ident| ident.to_string())
                .collect(),
            Fields::Unit => Vec::new(),
            Fields::Unnamed(_) => {
                return Err(syn::Error::new_spanned(
                    &input.ident,
                    "operation does not support tuple structs",
                ))
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &input.ident,
                "operation only supports structs",
            ))
        }
    };

    let name = &input.ident;
    Ok(quote! {
        #input

        impl ::boardkeep_operations::Operation for #name {
            fn verb(&self) -> &'static str {
                #verb
            }

            fn noun(&self) -> &'static str {
                #noun
            }

            fn description(&self) -> &'static str {
                #description
            }

            fn parameters(&self) -> &'static [&'static str] {
                &[#(#fields),*]
            }
        }
    })
}

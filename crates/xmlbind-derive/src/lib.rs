//! Derive macro for xmlbind.
//!
//! `#[derive(Bind)]` declares a struct's markup binding at compile time. It
//! implements `Bind` (schema plus field traversal) and the `Item`/`FieldValue`
//! traits that let the struct appear as a nested field of other bound types.
//!
//! Container attributes: `#[xml(root = "...")]`, `#[xml(namespace = "...")]`,
//! `#[xml(rename_all = "camelCase" | "PascalCase" | "kebab-case" | "snake_case")]`,
//! `#[xml(crate = "path")]`.
//!
//! Field attributes: `#[xml(attribute)]`, `#[xml(element)]` (default),
//! `#[xml(text)]`, `#[xml(rename = "...")]`, `#[xml(required)]`, `#[xml(skip)]`.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use syn::spanned::Spanned;
use syn::{Attribute, Data, DeriveInput, Error, Fields, Ident, LitStr, Path, Type, parse_macro_input};

/// Derive `Bind` for a struct with named fields.
///
/// A unit struct derives an empty schema, which fails binding resolution.
#[proc_macro_derive(Bind, attributes(xml))]
pub fn derive_bind(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand(input)
        .unwrap_or_else(|err| err.to_compile_error())
        .into()
}

#[derive(Clone, Copy)]
enum RenameRule {
    Camel,
    Pascal,
    Kebab,
    Snake,
}

impl RenameRule {
    fn parse(lit: &LitStr) -> syn::Result<Self> {
        match lit.value().as_str() {
            "camelCase" => Ok(RenameRule::Camel),
            "PascalCase" => Ok(RenameRule::Pascal),
            "kebab-case" => Ok(RenameRule::Kebab),
            "snake_case" => Ok(RenameRule::Snake),
            other => Err(Error::new(
                lit.span(),
                format!("unknown rename rule `{other}`, expected camelCase, PascalCase, kebab-case or snake_case"),
            )),
        }
    }

    fn apply(self, field: &str) -> String {
        match self {
            RenameRule::Snake => field.to_string(),
            RenameRule::Kebab => field.replace('_', "-"),
            RenameRule::Camel | RenameRule::Pascal => {
                let mut out = String::with_capacity(field.len());
                let mut upper = matches!(self, RenameRule::Pascal);
                for c in field.chars() {
                    if c == '_' {
                        upper = !out.is_empty();
                    } else if upper {
                        out.extend(c.to_uppercase());
                        upper = false;
                    } else {
                        out.push(c);
                    }
                }
                out
            }
        }
    }
}

struct Container {
    root: Option<String>,
    namespace: Option<String>,
    rename_all: Option<RenameRule>,
    krate: Path,
}

impl Container {
    fn parse(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut container = Container {
            root: None,
            namespace: None,
            rename_all: None,
            krate: syn::parse_quote!(::xmlbind),
        };

        for attr in attrs.iter().filter(|a| a.path().is_ident("xml")) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("root") {
                    container.root = Some(meta.value()?.parse::<LitStr>()?.value());
                } else if meta.path.is_ident("namespace") {
                    container.namespace = Some(meta.value()?.parse::<LitStr>()?.value());
                } else if meta.path.is_ident("rename_all") {
                    container.rename_all = Some(RenameRule::parse(&meta.value()?.parse()?)?);
                } else if meta.path.is_ident("crate") {
                    container.krate = meta.value()?.parse::<LitStr>()?.parse()?;
                } else {
                    return Err(meta.error("unknown xml container attribute"));
                }
                Ok(())
            })?;
        }

        Ok(container)
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Placement {
    Attribute,
    Element,
    Text,
}

struct BoundField<'a> {
    ident: &'a Ident,
    ty: &'a Type,
    name: String,
    markup: String,
    placement: Placement,
    required: bool,
}

enum FieldPlan<'a> {
    Bound(BoundField<'a>),
    Skipped(&'a Ident),
}

fn parse_field<'a>(field: &'a syn::Field, rename_all: Option<RenameRule>) -> syn::Result<FieldPlan<'a>> {
    let ident = field
        .ident
        .as_ref()
        .ok_or_else(|| Error::new(field.span(), "#[derive(Bind)] needs named fields"))?;

    let mut placement = None;
    let mut rename = None;
    let mut required = false;
    let mut skip = false;

    for attr in field.attrs.iter().filter(|a| a.path().is_ident("xml")) {
        attr.parse_nested_meta(|meta| {
            let chosen = if meta.path.is_ident("attribute") {
                Some(Placement::Attribute)
            } else if meta.path.is_ident("element") {
                Some(Placement::Element)
            } else if meta.path.is_ident("text") {
                Some(Placement::Text)
            } else if meta.path.is_ident("rename") {
                rename = Some(meta.value()?.parse::<LitStr>()?.value());
                None
            } else if meta.path.is_ident("required") {
                required = true;
                None
            } else if meta.path.is_ident("skip") {
                skip = true;
                None
            } else {
                return Err(meta.error("unknown xml field attribute"));
            };

            if let Some(chosen) = chosen {
                if placement.is_some() {
                    return Err(meta.error("a field takes one of `attribute`, `element` or `text`"));
                }
                placement = Some(chosen);
            }
            Ok(())
        })?;
    }

    if skip {
        return Ok(FieldPlan::Skipped(ident));
    }

    let name = ident.to_string();
    let name = name.strip_prefix("r#").unwrap_or(&name).to_string();
    let markup = match (rename, rename_all) {
        (Some(rename), _) => rename,
        (None, Some(rule)) => rule.apply(&name),
        (None, None) => name.clone(),
    };

    Ok(FieldPlan::Bound(BoundField {
        ident,
        ty: &field.ty,
        name,
        markup,
        placement: placement.unwrap_or(Placement::Element),
        required,
    }))
}

fn default_root(type_name: &str) -> String {
    let mut chars = type_name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn expand(input: DeriveInput) -> syn::Result<TokenStream2> {
    if !input.generics.params.is_empty() {
        return Err(Error::new(
            input.generics.span(),
            "#[derive(Bind)] does not support generic types",
        ));
    }

    let fields: Vec<&syn::Field> = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => named.named.iter().collect(),
            Fields::Unit => Vec::new(),
            Fields::Unnamed(unnamed) => {
                return Err(Error::new(
                    unnamed.span(),
                    "#[derive(Bind)] does not support tuple structs",
                ));
            }
        },
        Data::Enum(data) => {
            return Err(Error::new(
                data.enum_token.span(),
                "#[derive(Bind)] only supports structs",
            ));
        }
        Data::Union(data) => {
            return Err(Error::new(
                data.union_token.span(),
                "#[derive(Bind)] only supports structs",
            ));
        }
    };

    let container = Container::parse(&input.attrs)?;
    let plans = fields
        .into_iter()
        .map(|f| parse_field(f, container.rename_all))
        .collect::<syn::Result<Vec<_>>>()?;

    let krate = &container.krate;
    let ident = &input.ident;
    let type_name = ident.to_string();
    let root = container
        .root
        .clone()
        .unwrap_or_else(|| default_root(&type_name));
    let namespace = container
        .namespace
        .as_ref()
        .map(|ns| quote!(.namespace(#ns)));

    let mut schema_fields = Vec::new();
    let mut writes = Vec::new();
    let mut reads = Vec::new();

    for plan in &plans {
        match plan {
            FieldPlan::Bound(field) => {
                let BoundField {
                    ident,
                    ty,
                    name,
                    markup,
                    placement,
                    required,
                } = field;
                let placement = match placement {
                    Placement::Attribute => format_ident!("Attribute"),
                    Placement::Element => format_ident!("Element"),
                    Placement::Text => format_ident!("Text"),
                };
                let required = required.then(|| quote!(.required()));
                schema_fields.push(quote! {
                    .field(#krate::FieldSchema::new::<#ty>(#name, #markup, #krate::Placement::#placement)#required)
                });
                writes.push(quote! { out.write(#name, &self.#ident)?; });
                reads.push(quote! { #ident: input.read(#name)?, });
            }
            FieldPlan::Skipped(ident) => {
                reads.push(quote! { #ident: ::core::default::Default::default(), });
            }
        }
    }

    Ok(quote! {
        impl #krate::Bind for #ident {
            fn schema() -> #krate::Schema {
                #krate::Schema::new(#type_name, #root)
                    #namespace
                    #(#schema_fields)*
            }

            #[allow(unused_variables)]
            fn write_fields(
                &self,
                out: &mut #krate::FieldWriter<'_>,
            ) -> ::core::result::Result<(), #krate::BindError> {
                #(#writes)*
                ::core::result::Result::Ok(())
            }

            #[allow(unused_variables)]
            fn read_fields(
                input: &#krate::FieldReader<'_>,
            ) -> ::core::result::Result<Self, #krate::BindError> {
                ::core::result::Result::Ok(Self {
                    #(#reads)*
                })
            }
        }

        impl #krate::Item for #ident {
            const KIND: #krate::Kind = #krate::Kind::Nested;

            fn write_item(
                &self,
                field: &#krate::FieldSchema,
                parent: &mut #krate::Element,
                bindings: &#krate::BindingCache,
            ) -> ::core::result::Result<(), #krate::BindError> {
                #krate::nested::write_item(self, field, parent, bindings)
            }

            fn read_item(
                field: &#krate::FieldSchema,
                parent: &#krate::Element,
                source: #krate::Source<'_>,
                bindings: &#krate::BindingCache,
            ) -> ::core::result::Result<Self, #krate::BindError> {
                #krate::nested::read_item(field, parent, source, bindings)
            }

            fn absent(
                field: &#krate::FieldSchema,
                bindings: &#krate::BindingCache,
            ) -> ::core::result::Result<Self, #krate::BindError> {
                #krate::nested::absent(field, bindings)
            }
        }

        impl #krate::FieldValue for #ident {
            const KIND: #krate::Kind = #krate::Kind::Nested;
            const OCCURS: #krate::Occurs = #krate::Occurs::One;

            fn write_field(
                &self,
                field: &#krate::FieldSchema,
                parent: &mut #krate::Element,
                bindings: &#krate::BindingCache,
            ) -> ::core::result::Result<(), #krate::BindError> {
                #krate::Item::write_item(self, field, parent, bindings)
            }

            fn read_field(
                field: &#krate::FieldSchema,
                parent: &#krate::Element,
                bindings: &#krate::BindingCache,
            ) -> ::core::result::Result<Self, #krate::BindError> {
                #krate::read_one(field, parent, bindings)
            }
        }
    })
}

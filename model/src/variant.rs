use derive_more::{AsRef, Deref};
use inflector::Inflector as _;
use proc_macro2::{Literal, Span, TokenStream};
use quote::quote;
use syn::Ident;

use crate::{
    Node,
    field::{Field, FieldIndex},
    model::View,
};

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Deref)]
pub struct VariantIndex(pub(super) usize);

#[derive(Debug, Clone, Deref, AsRef)]
pub struct VariantNode {
    pub(super) parent: FieldIndex,
    #[deref]
    #[as_ref]
    pub(super) variant: Variant,
}

impl Node for VariantNode {
    type Index = VariantIndex;
}

/// A named value of a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variant {
    pub ident: Ident,
    pub bits: u32,
    pub docs: Vec<String>,
}

impl Variant {
    pub fn new(ident: impl AsRef<str>, bits: u32) -> Self {
        Self {
            ident: Ident::new(ident.as_ref(), Span::call_site()),
            bits,
            docs: Vec::new(),
        }
    }

    pub fn docs<I>(mut self, docs: I) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        self.docs
            .extend(docs.into_iter().map(|doc| doc.as_ref().to_string()));

        self
    }

    pub fn const_name(&self) -> Ident {
        Ident::new(
            self.ident.to_string().to_screaming_snake_case().as_str(),
            Span::call_site(),
        )
    }
}

// codegen
impl<'cx> View<'cx, VariantNode> {
    pub fn generate(&self, parent: &Field) -> TokenStream {
        let ident = self.const_name();
        let ty = parent.ty();
        let value = Literal::i64_unsuffixed(parent.value_of(self.bits));
        let docs = &self.docs;

        quote! {
            #(
                #[doc = #docs]
            )*
            pub const #ident: #ty = #value;
        }
    }
}

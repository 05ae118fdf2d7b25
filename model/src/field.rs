use std::ops::Range;

use derive_more::{AsRef, Deref};
use indexmap::IndexMap;
use proc_macro2::{Literal, Span, TokenStream};
use quote::quote;
use syn::{Ident, parse_quote};

use crate::{
    Node,
    diagnostic::{Context, Diagnostic, Diagnostics},
    model::View,
    register::RegisterIndex,
    variant::VariantIndex,
};

/// Identifiers that cannot name a register or a field.
pub(crate) const KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "crate",
    "do", "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if", "impl",
    "in", "let", "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub", "ref",
    "return", "self", "static", "struct", "super", "trait", "true", "try", "type", "typeof",
    "unsafe", "unsized", "use", "virtual", "where", "while", "yield",
];

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Deref)]
pub struct FieldIndex(pub(super) usize);

#[derive(Debug, Clone, Deref, AsRef)]
pub struct FieldNode {
    pub(super) parent: RegisterIndex,
    #[deref]
    #[as_ref]
    pub(super) field: Field,
    pub(super) variants: IndexMap<Ident, VariantIndex>,
}

impl Node for FieldNode {
    type Index = FieldIndex;
}

impl FieldNode {
    pub(super) fn add_child_index(&mut self, index: VariantIndex, child_ident: Ident) {
        self.variants.insert(child_ident, index);
    }
}

#[derive(Debug, Clone)]
pub struct Field {
    pub ident: Ident,
    pub offset: u8,
    pub width: u8,
    pub signed: bool,
    pub docs: Vec<String>,
}

impl Field {
    pub fn new(ident: impl AsRef<str>, offset: u8, width: u8) -> Self {
        Self {
            ident: Ident::new(ident.as_ref(), Span::call_site()),
            offset,
            width,
            signed: false,
            docs: Vec::new(),
        }
    }

    /// Mark the field as a two's complement integer.
    pub fn signed(self) -> Self {
        Self {
            signed: true,
            ..self
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

    pub fn module_name(&self) -> Ident {
        Ident::new(
            self.ident.to_string().to_lowercase().as_str(),
            Span::call_site(),
        )
    }

    /// The domain of the parent register in which the field occupies.
    #[inline]
    pub fn domain(&self) -> Range<u32> {
        self.offset as u32..(self.offset as u32 + self.width as u32)
    }

    /// The smallest primitive integer able to hold the field's value.
    pub fn ty(&self) -> Ident {
        match (self.signed, self.width) {
            (false, 0..=8) => parse_quote! { u8 },
            (false, 9..=16) => parse_quote! { u16 },
            (false, _) => parse_quote! { u32 },
            (true, 0..=8) => parse_quote! { i8 },
            (true, 9..=16) => parse_quote! { i16 },
            (true, _) => parse_quote! { i32 },
        }
    }

    /// Interpret the low `width` bits of `bits` as a value of the field.
    pub fn value_of(&self, bits: u32) -> i64 {
        let width = self.width.clamp(1, 32) as u32;
        let bits = bits as u64 & ((1 << width) - 1);

        if self.signed && bits >> (width - 1) != 0 {
            bits as i64 - (1 << width)
        } else {
            bits as i64
        }
    }
}

impl<'cx> View<'cx, FieldNode> {
    pub fn validate(&self, context: &Context) -> Diagnostics {
        let new_context = context.clone().and(self.module_name().to_string());
        let mut diagnostics = Diagnostics::new();

        if self.width == 0 {
            diagnostics.insert(Diagnostic::empty(&self.module_name(), context.clone()));

            // variants cannot be judged against an empty domain
            return diagnostics;
        }

        let mut sorted_variants = self.variants().collect::<Vec<_>>();
        sorted_variants.sort_by(|lhs, rhs| lhs.bits.cmp(&rhs.bits));

        let variant_limit = 1u64
            .checked_shl(self.width as u32)
            .map_or(u64::MAX, |bit| bit - 1);

        for variant in &sorted_variants {
            if variant.bits as u64 > variant_limit {
                diagnostics.insert(Diagnostic::exceeds_domain(
                    &variant.const_name(),
                    &variant.bits,
                    &format!("0...0x{variant_limit:x}"),
                    new_context.clone(),
                ));
            }
        }

        // validate variant adjacency
        for window in sorted_variants.windows(2) {
            let lhs = &window[0];
            let rhs = &window[1];

            if lhs.bits == rhs.bits {
                diagnostics.insert(Diagnostic::overlap(
                    &lhs.const_name(),
                    &rhs.const_name(),
                    &lhs.bits,
                    new_context.clone(),
                ));
            }
        }

        if KEYWORDS.contains(&self.module_name().to_string().as_str()) {
            diagnostics.insert(Diagnostic::reserved(
                &self.module_name(),
                KEYWORDS.iter(),
                new_context.clone(),
            ));
        }

        diagnostics
    }
}

// codegen
impl<'cx> View<'cx, FieldNode> {
    /// The `regdef::layout::Field` describing this field.
    pub(crate) fn layout(&self) -> TokenStream {
        let name = self.module_name().to_string();
        let offset = Literal::u8_unsuffixed(self.offset);
        let width = Literal::u8_unsuffixed(self.width);

        let signed = self.signed.then(|| quote! { .signed() });

        quote! {
            ::regdef::layout::Field::new(#name, #offset, #width) #signed
        }
    }

    /// The struct member holding the field.
    pub(crate) fn member(&self) -> TokenStream {
        let ident = self.module_name();
        let ty = self.ty();
        let docs = &self.docs;

        let range = if self.width == 1 {
            format!(" Bit {}.", self.offset)
        } else {
            format!(" Bits {}..={}.", self.offset, self.domain().end - 1)
        };

        quote! {
            #(
                #[doc = #docs]
            )*
            #[doc = #range]
            pub #ident: #ty
        }
    }

    /// An expression extracting the field from `raw`.
    pub(crate) fn decode(&self) -> TokenStream {
        let offset = Literal::u8_unsuffixed(self.offset);
        let width = Literal::u8_unsuffixed(self.width);
        let ty = self.ty();

        if self.signed {
            quote! { ::regdef::codec::unpack_signed(raw, #offset, #width) as #ty }
        } else {
            quote! { ::regdef::codec::unpack(raw, #offset, #width) as #ty }
        }
    }

    /// An expression merging the field of `self` into `raw`.
    pub(crate) fn encode(&self) -> TokenStream {
        let ident = self.module_name();
        let offset = Literal::u8_unsuffixed(self.offset);
        let width = Literal::u8_unsuffixed(self.width);

        if self.signed {
            quote! { ::regdef::codec::pack_signed(raw, #offset, #width, self.#ident as i32) }
        } else {
            quote! { ::regdef::codec::pack(raw, #offset, #width, self.#ident as u32) }
        }
    }

    /// A module of named values, if the field has any.
    pub(crate) fn generate(&self) -> Option<TokenStream> {
        if self.variants.is_empty() {
            None?
        }

        let ident = self.module_name();
        let docs = &self.docs;
        let variants = self.variants().map(|variant| variant.generate(self));

        Some(quote! {
            #(
                #[doc = #docs]
            )*
            pub mod #ident {
                #(#variants)*
            }
        })
    }
}

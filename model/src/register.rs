use derive_more::{AsRef, Deref};
use indexmap::IndexMap;
use inflector::Inflector as _;
use proc_macro2::{Literal, Span, TokenStream};
use quote::quote;
use syn::{Ident, LitInt};

use crate::{
    Node,
    diagnostic::{Context, Diagnostic, Diagnostics},
    field::{FieldIndex, FieldNode, KEYWORDS},
    model::View,
};

/// Register identifiers taken by the generated crate itself.
const TAKEN: &[&str] = &["state"];

/// The largest address reachable over the 7-bit address space of the bus.
pub const MAX_ADDRESS: u8 = 0x7f;

#[derive(Debug, Clone, Hash, PartialEq, Eq, Deref)]
pub struct RegisterIndex(pub(super) Ident);

#[derive(Debug, Clone, Deref, AsRef)]
pub struct RegisterNode {
    #[deref]
    #[as_ref]
    pub(super) register: Register,
    pub(super) fields: IndexMap<Ident, FieldIndex>,
}

impl Node for RegisterNode {
    type Index = RegisterIndex;
}

impl RegisterNode {
    pub(super) fn add_child_index(&mut self, index: FieldIndex, child_ident: Ident) {
        self.fields.insert(child_ident, index);
    }
}

#[derive(Debug, Clone)]
pub struct Register {
    pub ident: Ident,
    pub address: u8,
    pub instances: Vec<u8>,
    pub width: u8,
    pub docs: Vec<String>,
}

impl Register {
    pub fn new(ident: impl AsRef<str>, address: u8) -> Self {
        Self {
            ident: Ident::new(ident.as_ref().to_lowercase().as_str(), Span::call_site()),
            address,
            instances: Vec::new(),
            width: 32,
            docs: Vec::new(),
        }
    }

    /// Set the number of meaningful bits in the register.
    pub fn width(mut self, n_bits: u8) -> Self {
        self.width = n_bits;

        self
    }

    /// Declare further addresses at which an identical register resides,
    /// such as the copy belonging to a second motor.
    pub fn instances(mut self, addresses: impl IntoIterator<Item = u8>) -> Self {
        self.instances.extend(addresses);

        self
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

    /// Every address of the register, starting with the primary one.
    pub fn addresses(&self) -> impl Iterator<Item = u8> + '_ {
        std::iter::once(self.address).chain(self.instances.iter().copied())
    }

    pub fn module_name(&self) -> Ident {
        self.ident.clone()
    }

    pub fn type_name(&self) -> Ident {
        Ident::new(
            self.ident.to_string().to_pascal_case().as_str(),
            Span::call_site(),
        )
    }
}

impl<'cx> View<'cx, RegisterNode> {
    pub fn validate(&self, context: &Context) -> Diagnostics {
        let mut diagnostics = Diagnostics::new();
        let new_context = context.clone().and(self.module_name().to_string());

        for address in self.addresses() {
            if address > MAX_ADDRESS {
                diagnostics.insert(Diagnostic::exceeds_domain(
                    &self.module_name(),
                    &format!("0x{address:02x}"),
                    &format!("0x00...0x{MAX_ADDRESS:02x}"),
                    context.clone(),
                ));
            }
        }

        if self.width == 0 {
            diagnostics.insert(Diagnostic::empty(&self.module_name(), context.clone()));
        } else if self.width > 32 {
            diagnostics.insert(Diagnostic::exceeds_domain(
                &self.module_name(),
                &format!("{} bits", self.width),
                &"32 bits",
                context.clone(),
            ));
        }

        let mut sorted_fields = self.fields().collect::<Vec<_>>();
        sorted_fields.sort_by(|lhs, rhs| lhs.offset.cmp(&rhs.offset));

        for (i, field) in sorted_fields.iter().enumerate() {
            let remaining = &sorted_fields[i + 1..];

            for other in remaining {
                if field.domain().end <= other.offset as u32 {
                    break;
                }

                // empty fields occupy nothing and are reported on their own
                if field.width == 0 || other.width == 0 {
                    continue;
                }

                let occupied_end = field.domain().end.min(other.domain().end) - 1;

                diagnostics.insert(Diagnostic::overlap(
                    &field.module_name(),
                    &other.module_name(),
                    &format!("bits {}...{occupied_end}", other.offset),
                    new_context.clone(),
                ));
            }
        }

        for field in &sorted_fields {
            if field.domain().end > self.width as u32 {
                let domain = field.domain();

                diagnostics.insert(Diagnostic::exceeds_domain(
                    &field.module_name(),
                    &format!("{}...{}", domain.start, domain.end.saturating_sub(1)),
                    &format!("0...{}", self.width.saturating_sub(1)),
                    new_context.clone(),
                ));
            }
        }

        if sorted_fields.is_empty() {
            diagnostics.insert(Diagnostic::vacant(new_context.clone()));
        }

        let module_name = self.module_name().to_string();

        if KEYWORDS.contains(&module_name.as_str()) || TAKEN.contains(&module_name.as_str()) {
            diagnostics.insert(Diagnostic::reserved(
                &self.module_name(),
                KEYWORDS.iter().chain(TAKEN),
                new_context.clone(),
            ));
        }

        for field in sorted_fields {
            diagnostics.extend(field.validate(&new_context));
        }

        diagnostics
    }

    /// Render the bit layout of the register, most significant bit first.
    /// Bits not covered by any field are shown as `_`.
    ///
    /// ```text
    /// Register(12-bit, gconf @ 0x00):
    ///      11   1 │ _
    ///      10   1 │ lock_gconf
    ///   ...
    /// ```
    pub fn layout(&self) -> String {
        let mut out = self.layout_header();

        for (start, end, name) in self.layout_rows() {
            out.push_str(&format!(
                "\n  {:>5} {:>3} │ {name}",
                position(start, end),
                end - start + 1
            ));
        }

        out
    }

    /// Render the bit layout of the register like [`layout`](Self::layout),
    /// followed by the bits `raw` holds in each group.
    ///
    /// ```text
    /// Register(12-bit, gconf @ 0x00): 0x00000088
    ///      11   1 │ _            : 0
    ///      10   1 │ lock_gconf   : 0
    ///   ...
    ///       3   1 │ poscmp_enable: 1
    /// ```
    pub fn layout_of(&self, raw: u32) -> String {
        let rows = self.layout_rows();
        let name_len = rows
            .iter()
            .map(|(.., name)| name.len())
            .max()
            .unwrap_or(0);

        let mut out = format!("{} 0x{raw:08x}", self.layout_header());

        for (start, end, name) in rows {
            let width = end - start + 1;
            let bits = raw.checked_shr(start).unwrap_or(0) & (u32::MAX >> (32 - width.min(32)));

            out.push_str(&format!(
                "\n  {:>5} {width:>3} │ {name:name_len$}: {bits:0digits$b}",
                position(start, end),
                digits = width as usize,
            ));
        }

        out
    }

    fn layout_header(&self) -> String {
        let addresses = self
            .addresses()
            .map(|address| format!("0x{address:02x}"))
            .collect::<Vec<_>>()
            .join(", ");

        format!(
            "Register({}-bit, {} @ {addresses}):",
            self.width,
            self.module_name()
        )
    }

    /// Groups of bits as `(lowest, highest, name)`, most significant first.
    fn layout_rows(&self) -> Vec<(u32, u32, String)> {
        let mut fields = self.fields().collect::<Vec<_>>();
        fields.sort_by(|lhs, rhs| rhs.offset.cmp(&lhs.offset));

        let mut rows = Vec::new();
        let mut top = self.width as u32;

        for field in &fields {
            let domain = field.domain();

            if domain.end < top {
                rows.push((domain.end, top - 1, "_".to_string()));
            }

            rows.push((
                domain.start,
                domain.end.saturating_sub(1).max(domain.start),
                field.module_name().to_string(),
            ));

            top = top.min(domain.start);
        }

        if top > 0 {
            rows.push((0, top - 1, "_".to_string()));
        }

        rows
    }
}

fn position(start: u32, end: u32) -> String {
    if start == end {
        start.to_string()
    } else {
        format!("{end}:{start}")
    }
}

// codegen
impl<'cx> View<'cx, RegisterNode> {
    fn generate_constants(&self, fields: &[View<'cx, FieldNode>]) -> TokenStream {
        let hex = |address: u8| LitInt::new(&format!("0x{address:02x}"), Span::call_site());

        let address = hex(self.address);
        let addresses = self.addresses().map(hex);
        let n_bits = Literal::u8_unsuffixed(self.width);
        let layouts = fields.iter().map(|field| field.layout());

        quote! {
            pub const ADDRESS: u8 = #address;
            pub const ADDRESSES: &[u8] = &[#(#addresses),*];
            pub const N_BITS: u8 = #n_bits;
            pub const FIELDS: &[::regdef::layout::Field] = &[#(#layouts),*];

            ::regdef::static_assertions::const_assert!(::regdef::layout::is_valid(FIELDS, N_BITS));
        }
    }

    fn generate_variants(&self, fields: &[View<'cx, FieldNode>]) -> TokenStream {
        fields.iter().fold(quote! {}, |mut acc, field| {
            acc.extend(field.generate());

            acc
        })
    }

    fn generate_value(&self, fields: &[View<'cx, FieldNode>]) -> TokenStream {
        let ident = self.type_name();
        let name = self.module_name().to_string().to_uppercase();
        let docs = &self.docs;
        let members = fields.iter().map(|field| field.member());
        let field_idents = fields
            .iter()
            .map(|field| field.module_name())
            .collect::<Vec<_>>();
        let decodes = fields.iter().map(|field| field.decode());
        let encodes = fields.iter().map(|field| field.encode());

        // a register without fields never reads its argument
        let raw_arg = if fields.is_empty() {
            quote! { _raw }
        } else {
            quote! { raw }
        };

        quote! {
            #(
                #[doc = #docs]
            )*
            #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
            #[cfg_attr(feature = "defmt", derive(::defmt::Format))]
            pub struct #ident {
                #(#members,)*
            }

            impl #ident {
                /// Decode the register from a raw word. Bits outside of every
                /// field are ignored.
                pub const fn from_raw(#raw_arg: u32) -> Self {
                    Self {
                        #(#field_idents: #decodes,)*
                    }
                }

                /// Encode the register into a raw word. Field values wider than
                /// their field are truncated.
                pub const fn raw(&self) -> u32 {
                    let raw = 0;
                    #(let raw = #encodes;)*
                    raw
                }
            }

            impl ::regdef::Register for #ident {
                const NAME: &'static str = #name;
                const ADDRESS: u8 = ADDRESS;
                const N_BITS: u8 = N_BITS;
                const FIELDS: &'static [::regdef::layout::Field] = FIELDS;

                fn from_raw(raw: u32) -> Self {
                    Self::from_raw(raw)
                }

                fn raw(&self) -> u32 {
                    Self::raw(self)
                }
            }

            impl From<u32> for #ident {
                fn from(raw: u32) -> Self {
                    Self::from_raw(raw)
                }
            }

            impl From<#ident> for u32 {
                fn from(value: #ident) -> Self {
                    value.raw()
                }
            }
        }
    }

    pub fn generate(&self) -> TokenStream {
        let mut body = quote! {};

        let module_name = self.module_name();
        let fields = self.fields().collect::<Vec<_>>();

        body.extend(self.generate_constants(&fields));
        body.extend(self.generate_variants(&fields));
        body.extend(self.generate_value(&fields));

        let docs = &self.docs;
        quote! {
            #(#[doc = #docs])*
            pub mod #module_name {
                #body
            }
        }
    }
}

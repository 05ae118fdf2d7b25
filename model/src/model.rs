use std::{collections::HashMap, marker::PhantomData};

use colored::Colorize;
use derive_more::{AsMut, AsRef, Deref, DerefMut, From};
use indexmap::IndexMap;
use proc_macro2::TokenStream;
use quote::{ToTokens, quote};
use syn::Ident;
use ters::ters;

use crate::{
    Node,
    diagnostic::{Context, Diagnostic, Diagnostics},
    error::Error,
    field::{Field, FieldIndex, FieldNode},
    notation,
    register::{Register, RegisterIndex, RegisterNode},
    variant::{Variant, VariantIndex, VariantNode},
};

/// A register map of a device.
#[ters]
#[derive(Debug, Clone, Default)]
pub struct Model {
    #[get]
    name: String,
    registers: IndexMap<RegisterIndex, RegisterNode>,
    fields: Vec<FieldNode>,
    variants: Vec<VariantNode>,
}

impl Model {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Add a register to the model.
    ///
    /// A register with the same identifier as one already present replaces it.
    pub fn add_register<'cx>(&'cx mut self, register: Register) -> RegisterEntry<'cx> {
        let index = RegisterIndex(register.module_name());

        if self.registers.contains_key(&index) {
            log::warn!("register {} redefined", register.module_name());
        }

        self.registers.insert(
            index.clone(),
            RegisterNode {
                register,
                fields: Default::default(),
            },
        );

        Entry {
            model: self,
            index,
            _p: PhantomData,
        }
        .into()
    }

    pub fn render_raw(&self) -> String {
        self.to_token_stream().to_string()
    }

    pub fn render(&self) -> Result<String, String> {
        let content = self.to_token_stream().to_string();
        let parsed = syn::parse_file(content.as_str());

        match parsed {
            Ok(file) => Ok(prettyplease::unparse(&file)),
            Err(e) => {
                let start = e.span().start().column;
                let end = e.span().end().column;

                const PADDING: usize = 50;

                let lhs = &content[start.saturating_sub(PADDING)..start];
                let err = &content[start..end].red();
                let rhs = &content[end..(end + PADDING).min(content.len())];

                Err(format!("{e}:\n{lhs}{err}{rhs}"))
            }
        }
    }

    pub fn get_register(&self, index: RegisterIndex) -> View<'_, RegisterNode> {
        View {
            model: self,
            node: &self.registers[&index],
            index,
        }
    }

    pub fn get_field(&self, index: FieldIndex) -> View<'_, FieldNode> {
        View {
            model: self,
            node: &self.fields[*index],
            index,
        }
    }

    pub fn get_variant(&self, index: VariantIndex) -> View<'_, VariantNode> {
        View {
            model: self,
            node: &self.variants[*index],
            index,
        }
    }

    pub fn registers<'cx>(&'cx self) -> impl Iterator<Item = View<'cx, RegisterNode>> {
        self.registers.iter().map(|(index, node)| View {
            model: self,
            index: index.clone(),
            node,
        })
    }

    pub fn register_count(&self) -> usize {
        self.registers.len()
    }

    /// The number of fields reachable from the registers of the model.
    pub fn field_count(&self) -> usize {
        self.registers().map(|register| register.fields.len()).sum()
    }

    pub fn variant_count(&self) -> usize {
        self.registers()
            .flat_map(|register| register.fields().collect::<Vec<_>>())
            .map(|field| field.variants.len())
            .sum()
    }

    /// Every register address of the model, including instances.
    pub fn address_count(&self) -> usize {
        self.registers()
            .map(|register| register.addresses().count())
            .sum()
    }
}

impl Model {
    pub fn validate(&self) -> Diagnostics {
        let mut diagnostics = Diagnostics::new();
        let new_context = Context::new();

        let mut occupants = HashMap::<u8, Vec<Ident>>::new();

        for register in self.registers() {
            for address in register.addresses() {
                occupants
                    .entry(address)
                    .or_default()
                    .push(register.module_name());
            }
        }

        let mut sorted_occupants = occupants.into_iter().collect::<Vec<_>>();
        sorted_occupants.sort_by_key(|(address, ..)| *address);

        for (address, registers) in sorted_occupants {
            for window in registers.windows(2) {
                diagnostics.insert(Diagnostic::overlap(
                    &window[0],
                    &window[1],
                    &format!("0x{address:02x}"),
                    new_context.clone(),
                ));
            }
        }

        // generated type names must be distinct as well
        let mut type_names = HashMap::<Ident, Ident>::new();

        for register in self.registers() {
            let type_name = register.type_name();

            if let Some(other) = type_names.insert(type_name.clone(), register.module_name()) {
                diagnostics.insert(Diagnostic::overlap(
                    &other,
                    &register.module_name(),
                    &format!("type name {type_name}"),
                    new_context.clone(),
                ));
            }
        }

        for register in self.registers() {
            diagnostics.extend(register.validate(&new_context));
        }

        diagnostics
    }
}

// codegen
impl Model {
    fn generate_registers(&self) -> TokenStream {
        self.registers().fold(quote! {}, |mut acc, register| {
            acc.extend(register.generate());

            acc
        })
    }

    /// A value of any register, dispatched on its address.
    fn generate_state(&self) -> TokenStream {
        let registers = self.registers().collect::<Vec<_>>();

        if registers.is_empty() {
            return quote! {};
        }

        let module_names = registers
            .iter()
            .map(|register| register.module_name())
            .collect::<Vec<_>>();
        let type_names = registers
            .iter()
            .map(|register| register.type_name())
            .collect::<Vec<_>>();

        let name = &self.name;
        let doc = format!(" The decoded contents of any {name} register.");

        quote! {
            #[doc = #doc]
            #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
            #[cfg_attr(feature = "defmt", derive(::defmt::Format))]
            pub enum State {
                #(
                    #type_names(#module_names::#type_names),
                )*
            }

            impl State {
                /// Decode `raw` as the register residing at `address`.
                pub fn from_raw(address: u8, raw: u32) -> Result<Self, ::regdef::UnknownAddress> {
                    #(
                        if #module_names::ADDRESSES.contains(&address) {
                            return Ok(Self::#type_names(#module_names::#type_names::from_raw(raw)));
                        }
                    )*

                    Err(::regdef::UnknownAddress(address))
                }

                /// The raw word of the contained register.
                pub const fn raw(&self) -> u32 {
                    match self {
                        #(
                            Self::#type_names(value) => value.raw(),
                        )*
                    }
                }

                /// The datasheet name of the contained register.
                pub const fn name(&self) -> &'static str {
                    match self {
                        #(
                            Self::#type_names(..) => <#module_names::#type_names as ::regdef::Register>::NAME,
                        )*
                    }
                }

                /// The number of meaningful bits of the contained register.
                pub const fn n_bits(&self) -> u8 {
                    match self {
                        #(
                            Self::#type_names(..) => #module_names::N_BITS,
                        )*
                    }
                }
            }

            #(
                impl From<#module_names::#type_names> for State {
                    fn from(value: #module_names::#type_names) -> Self {
                        Self::#type_names(value)
                    }
                }
            )*
        }
    }
}

impl ToTokens for Model {
    fn to_tokens(&self, tokens: &mut proc_macro2::TokenStream) {
        tokens.extend(self.generate_registers());
        tokens.extend(self.generate_state());
    }
}

#[derive(Debug, Deref, DerefMut, AsRef, AsMut, From)]
pub struct RegisterEntry<'cx>(Entry<'cx, RegisterIndex, ()>);

#[derive(Debug, Deref, DerefMut, AsRef, AsMut, From)]
pub struct FieldEntry<'cx>(Entry<'cx, FieldIndex, ()>);

#[derive(Debug)]
pub struct Entry<'cx, Index, Meta> {
    model: &'cx mut Model,
    index: Index,
    _p: PhantomData<Meta>,
}

impl<'cx> Entry<'cx, RegisterIndex, ()> {
    /// Add a field to the register.
    ///
    /// A field with the same identifier as one already present replaces it.
    pub fn add_field<'ncx>(&'ncx mut self, field: Field) -> FieldEntry<'ncx> {
        let index = FieldIndex(self.model.fields.len());

        // update parent
        self.model.registers[&self.index].add_child_index(index, field.module_name());

        // insert child
        self.model.fields.push(FieldNode {
            parent: self.index.clone(),
            field,
            variants: Default::default(),
        });

        Entry {
            model: self.model,
            index,
            _p: PhantomData,
        }
        .into()
    }

    /// Add every field declared by a bit notation string.
    ///
    /// See [`notation`](crate::notation) for the syntax.
    pub fn add_fields(&mut self, notation: &str) -> Result<&mut Self, Error> {
        for field in notation::parse(notation)? {
            self.add_field(field);
        }

        Ok(self)
    }

    /// Revisit a field of the register by identifier, such as to mark it signed
    /// or give it variants after adding it with [`add_fields`](Self::add_fields).
    pub fn field<'ncx>(&'ncx mut self, ident: impl AsRef<str>) -> Option<FieldEntry<'ncx>> {
        let ident = ident.as_ref().to_lowercase();

        let index = self.model.registers[&self.index]
            .fields
            .iter()
            .find_map(|(key, index)| (*key == ident).then_some(*index))?;

        Some(
            Entry {
                model: self.model,
                index,
                _p: PhantomData,
            }
            .into(),
        )
    }
}

impl<'cx> Entry<'cx, FieldIndex, ()> {
    /// Add a named value to the field.
    pub fn add_variant(&mut self, variant: Variant) -> &mut Self {
        let index = VariantIndex(self.model.variants.len());

        // update parent
        self.model.fields[*self.index].add_child_index(index, variant.const_name());

        // insert child
        self.model.variants.push(VariantNode {
            parent: self.index,
            variant,
        });

        self
    }

    /// Interpret the field as a two's complement integer.
    pub fn signed(&mut self) -> &mut Self {
        self.model.fields[*self.index].field.signed = true;

        self
    }

    pub fn docs<I>(&mut self, docs: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        self.model.fields[*self.index]
            .field
            .docs
            .extend(docs.into_iter().map(|doc| doc.as_ref().to_string()));

        self
    }
}

/// A view into the register model at a single node.
#[ters]
#[derive(Debug, Clone, Deref, AsRef)]
pub struct View<'cx, N: Node> {
    pub(super) model: &'cx Model,
    #[get]
    pub(super) index: N::Index,
    #[deref]
    #[as_ref]
    node: &'cx N,
}

impl<'cx> View<'cx, RegisterNode> {
    /// Use the model context to lookup all child fields.
    pub fn fields(&self) -> impl Iterator<Item = View<'cx, FieldNode>> {
        self.node
            .fields
            .values()
            .map(|index| self.model.get_field(*index))
    }
}

impl<'cx> View<'cx, FieldNode> {
    /// Use the model context to lookup all child variants.
    pub fn variants(&self) -> impl Iterator<Item = View<'cx, VariantNode>> {
        self.node
            .variants
            .values()
            .map(|index| self.model.get_variant(*index))
    }

    /// View the parent register.
    pub fn parent(&self) -> View<'cx, RegisterNode> {
        self.model.get_register(self.node.parent.clone())
    }
}

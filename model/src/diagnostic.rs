use std::fmt::Display;

use colored::Colorize;
use derive_more::{AsRef, Deref};
use indexmap::{IndexMap, IndexSet};
use ters::ters;

/// Elaborates diagnostics that may be emitted during model validation.
#[ters]
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub struct Diagnostic {
    #[get]
    rank: Rank,
    #[get]
    kind: Kind,
    #[get]
    message: String,
    notes: Vec<String>,
    #[get]
    context: Context,
}

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum Kind {
    // physical
    Overlap,
    ExceedsDomain,
    Empty,
    Vacant,

    // lexical
    Reserved = 2000,
}

#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum Rank {
    Warning,
    Error,
}

impl Diagnostic {
    pub fn new(rank: Rank, kind: Kind, message: impl Into<String>, context: Context) -> Self {
        Self {
            rank,
            kind,
            message: message.into(),
            notes: Default::default(),
            context,
        }
    }

    /// [lhs] and [rhs] overlap, occupying {occupied}
    pub fn overlap(
        lhs: &impl Display,
        rhs: &impl Display,
        occupied: &impl Display,
        context: Context,
    ) -> Self {
        let level = context.child_level();
        let lhs = format!("{lhs}").bold();
        let rhs = format!("{rhs}").bold();
        let occupied = format!("{occupied}").bold();

        Self::new(
            Rank::Error,
            Kind::Overlap,
            format!("{level}s [{lhs}] and [{rhs}] overlap, occupying {occupied}"),
            context,
        )
    }

    /// [foo] with domain {offending_domain} exceeds parent [bar] with domain {parent_domain}
    pub fn exceeds_domain(
        offending: &impl Display,
        offending_domain: &impl Display,
        parent_domain: &impl Display,
        context: Context,
    ) -> Self {
        let level = context.level();
        let child_level = context.child_level();
        let offending_domain = format!("{offending_domain}").bold();
        let parent_domain = format!("{parent_domain}").bold();

        Self::new(
            Rank::Error,
            Kind::ExceedsDomain,
            format!(
                "{child_level} [{offending}] with domain {offending_domain} exceeds parent {level} with domain {parent_domain}"
            ),
            context,
        )
    }

    /// [foo] occupies no bits
    pub fn empty(offending: &impl Display, context: Context) -> Self {
        let level = context.child_level().to_string();
        let offending = format!("{offending}").bold();

        Self::new(
            Rank::Error,
            Kind::Empty,
            format!("{level} [{offending}] occupies no bits"),
            context,
        )
        .notes([format!("a {level} must be at least one bit wide")])
    }

    /// register declares no fields
    pub fn vacant(context: Context) -> Self {
        let level = context.level();

        Self::new(
            Rank::Warning,
            Kind::Vacant,
            format!("{level} declares no fields"),
            context,
        )
        .notes(["every bit of this register is reserved, it will always encode to zero"])
    }

    /// "foo" is a reserved keyword
    ///
    /// note: reserved keywords: [...]
    pub fn reserved<R: AsRef<str>>(
        offending: &impl Display,
        bank: impl Iterator<Item = R>,
        context: Context,
    ) -> Self {
        let level = context.level().to_string();
        let offending = format!("{offending}").bold();

        let reserved = bank
            .map(|r| r.as_ref().bold().to_string())
            .collect::<Vec<_>>()
            .join(", ");

        Self::new(
            Rank::Error,
            Kind::Reserved,
            format!("\"{offending}\" is a reserved keyword for {level}s"),
            context,
        )
        .notes([format!("reserved {level} keywords: [{reserved}]")])
    }

    pub fn notes<I>(mut self, notes: I) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        self.notes
            .extend(notes.into_iter().map(|e| e.as_ref().to_string()));

        self
    }

    pub fn report(diagnostics: &Diagnostics) -> String {
        let mut diagnostic_groups = IndexMap::new();

        for diagnostic in diagnostics {
            diagnostic_groups
                .entry(diagnostic.context.clone())
                .or_insert(vec![])
                .push(diagnostic);
        }

        diagnostic_groups
            .iter()
            .map(|(context, diagnostics)| {
                let diagnostics = diagnostics
                    .iter()
                    .map(|diagnostic| diagnostic.to_string())
                    .collect::<Vec<_>>()
                    .join("\n");

                if context.is_empty() {
                    diagnostics.to_string()
                } else {
                    format!("in {context}:\n{diagnostics}")
                }
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let notes = if !self.notes.is_empty() {
            format!(
                "\n{}",
                self.notes
                    .iter()
                    .map(|note| format!("  {}: {note}", "note".bright_blue().bold()))
                    .collect::<Vec<_>>()
                    .join("\n")
            )
        } else {
            String::new()
        };

        let code = format!("[E{:04}]", self.kind as u32);

        let header = match &self.rank {
            Rank::Warning => format!("warning{code}").yellow().bold(),
            Rank::Error => format!("error{code}").red().bold(),
        };

        write!(f, "{header}: {}{notes}", self.message)
    }
}

pub type Diagnostics = IndexSet<Diagnostic>;

/// Count the diagnostics of each rank, as `(warnings, errors)`.
pub fn tally(diagnostics: &Diagnostics) -> (usize, usize) {
    diagnostics
        .iter()
        .fold((0, 0), |(warnings, errors), diagnostic| {
            match diagnostic.rank() {
                Rank::Warning => (warnings + 1, errors),
                Rank::Error => (warnings, errors + 1),
            }
        })
}

#[ters]
#[derive(Debug, Clone, PartialEq, Eq, Hash, AsRef, Deref)]
pub struct Context {
    #[get]
    path: Vec<String>,
}

#[expect(clippy::new_without_default)]
impl Context {
    pub fn new() -> Self {
        Context { path: Vec::new() }
    }

    pub fn and(mut self, ident: String) -> Self {
        self.path.push(ident);
        self
    }

    fn level(&self) -> &str {
        match self.path.len() {
            0 => "device",
            1 => "register",
            2 => "field",
            3 => "variant",
            _ => "",
        }
    }

    fn child_level(&self) -> &str {
        match self.path.len() {
            0 => "register",
            1 => "field",
            2 => "variant",
            _ => "",
        }
    }
}

impl Display for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            self.path
                .iter()
                .map(|segment| segment.bold().to_string())
                .collect::<Vec<_>>()
                .join("/")
        )
    }
}

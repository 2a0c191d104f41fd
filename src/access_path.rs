//! Symbolic storage locations.
//!
//! An [`AccessPath`] names a location as a base (a local variable, or a
//! placeholder for a method parameter) followed by a chain of field accesses:
//!
//! ```text
//! x            variable x
//! x.next.val   field `val` of field `next` of x
//! $0.items[3]  element 3 of field `items` of the first parameter
//! ```
//!
//! Paths are immutable; extending a path returns a new one.

use std::fmt::{self, Display};

/// Root of an access path.
#[derive(Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum AccessPathBase {
    /// Named local variable.
    Variable(String),
    /// Placeholder for the n-th parameter of the analyzed method.
    Placeholder(usize),
}

impl Display for AccessPathBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessPathBase::Variable(name) => write!(f, "{}", name),
            AccessPathBase::Placeholder(index) => write!(f, "${}", index),
        }
    }
}

/// One field access, optionally indexed (array element, tuple slot).
#[derive(Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct FieldSegment {
    pub name: String,
    pub index: Option<u32>,
}

impl Display for FieldSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.index {
            Some(index) => write!(f, "{}[{}]", self.name, index),
            None => write!(f, "{}", self.name),
        }
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct AccessPath {
    base: AccessPathBase,
    fields: Vec<FieldSegment>,
}

impl AccessPath {
    pub fn new(base: AccessPathBase) -> Self {
        Self { base, fields: Vec::new() }
    }

    pub fn variable(name: impl Into<String>) -> Self {
        Self::new(AccessPathBase::Variable(name.into()))
    }

    pub fn placeholder(index: usize) -> Self {
        Self::new(AccessPathBase::Placeholder(index))
    }

    /// `self.name`
    pub fn append_field(&self, name: impl Into<String>) -> Self {
        self.append(FieldSegment {
            name: name.into(),
            index: None,
        })
    }

    /// `self.name[index]`
    pub fn append_indexed_field(&self, name: impl Into<String>, index: u32) -> Self {
        self.append(FieldSegment {
            name: name.into(),
            index: Some(index),
        })
    }

    fn append(&self, segment: FieldSegment) -> Self {
        let mut fields = Vec::with_capacity(self.fields.len() + 1);
        fields.extend(self.fields.iter().cloned());
        fields.push(segment);
        Self {
            base: self.base.clone(),
            fields,
        }
    }

    pub fn base(&self) -> &AccessPathBase {
        &self.base
    }

    pub fn fields(&self) -> &[FieldSegment] {
        &self.fields
    }

    /// Number of field accesses after the base.
    pub fn depth(&self) -> usize {
        self.fields.len()
    }

    /// The bare base, without any fields.
    pub fn root(&self) -> Self {
        Self::new(self.base.clone())
    }

    /// Path without its last field, or `None` for a bare base.
    pub fn parent(&self) -> Option<Self> {
        let (_, init) = self.fields.split_last()?;
        Some(Self {
            base: self.base.clone(),
            fields: init.to_vec(),
        })
    }

    /// Whether `self` is `other` or one of its ancestors.
    pub fn is_prefix_of(&self, other: &Self) -> bool {
        self.base == other.base && other.fields.starts_with(&self.fields)
    }

    /// Whether the path is rooted at the variable `name`.
    pub fn is_rooted_at(&self, name: &str) -> bool {
        matches!(&self.base, AccessPathBase::Variable(v) if v == name)
    }
}

impl Display for AccessPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.base)?;
        for field in &self.fields {
            write!(f, ".{}", field)?;
        }
        Ok(())
    }
}

impl From<&str> for AccessPath {
    fn from(name: &str) -> Self {
        Self::variable(name)
    }
}

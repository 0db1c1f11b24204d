//! Type descriptors and the round-scoped Type Interner.
//!
//! Resolving a type's structural shape is host work; the interner's job is
//! to do it once per fully-qualified name per round and hand every caller
//! the same descriptor instance, so recipes can compare types by reference
//! identity instead of re-deriving or structurally comparing shapes.

use std::sync::Arc;

use dashmap::DashMap;

/// Structural category of a type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[non_exhaustive]
pub enum TypeKind {
    /// A concrete class/struct type.
    Class,
    /// An interface/trait type.
    Interface,
    /// An enumerated type.
    Enum,
    /// The host provided no shape information for this name.
    #[default]
    Unknown,
}

/// One member of a type's structural shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeMember {
    name: String,
    type_name: Option<String>,
}

impl TypeMember {
    /// Creates a member with an optional declared type name.
    #[must_use]
    pub fn new(name: impl Into<String>, type_name: Option<String>) -> Self {
        Self {
            name: name.into(),
            type_name,
        }
    }

    /// Returns the member's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the member's declared type name, if known.
    #[must_use]
    pub fn type_name(&self) -> Option<&str> {
        self.type_name.as_deref()
    }
}

/// Structural shape of a type: kind, members, and supertypes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TypeShape {
    kind: TypeKind,
    members: Vec<TypeMember>,
    supertypes: Vec<String>,
}

impl TypeShape {
    /// Creates a shape.
    #[must_use]
    pub fn new(kind: TypeKind, members: Vec<TypeMember>, supertypes: Vec<String>) -> Self {
        Self {
            kind,
            members,
            supertypes,
        }
    }

    /// Returns the structural category.
    #[must_use]
    pub const fn kind(&self) -> TypeKind {
        self.kind
    }

    /// Returns the members in declaration order.
    #[must_use]
    pub fn members(&self) -> &[TypeMember] {
        &self.members
    }

    /// Returns the fully-qualified names of direct supertypes.
    #[must_use]
    pub fn supertypes(&self) -> &[String] {
        &self.supertypes
    }
}

/// An interned type: fully-qualified name plus structural shape.
///
/// Within one round, two descriptors with the same fully-qualified name are
/// the same allocation; compare with [`TypeDescriptor::same`] before
/// falling back to structural equality.
#[derive(Debug, PartialEq, Eq)]
pub struct TypeDescriptor {
    qualified_name: String,
    shape: TypeShape,
}

impl TypeDescriptor {
    /// Returns the fully-qualified name.
    #[must_use]
    pub fn qualified_name(&self) -> &str {
        &self.qualified_name
    }

    /// Returns the structural shape.
    #[must_use]
    pub const fn shape(&self) -> &TypeShape {
        &self.shape
    }

    /// Reference-identity fast path for type equality within a round.
    #[must_use]
    pub fn same(this: &Arc<Self>, other: &Arc<Self>) -> bool {
        Arc::ptr_eq(this, other)
    }
}

/// Host-supplied type information, consumed at the interface boundary.
///
/// Implementations answer from whatever semantic model the host maintains;
/// the pipeline never derives shapes itself.
pub trait TypeSource: Sync {
    /// Returns the fully-qualified name for a type referenced by `name`
    /// within the current unit, if the host can resolve it.
    fn qualify(&self, name: &str) -> Option<String>;

    /// Returns the structural shape for a fully-qualified name.
    fn describe(&self, qualified: &str) -> Option<TypeShape>;
}

/// A [`TypeSource`] for hosts without semantic information.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTypeInfo;

impl TypeSource for NoTypeInfo {
    fn qualify(&self, _name: &str) -> Option<String> {
        None
    }

    fn describe(&self, _qualified: &str) -> Option<TypeShape> {
        None
    }
}

/// Round-scoped cache of interned type descriptors.
///
/// Insert-if-absent is atomic, so parallel unit processing may resolve the
/// same name concurrently and still observe a single descriptor instance.
/// Entries are never removed mid-round; the whole interner is dropped when
/// the round ends.
#[derive(Debug, Default)]
pub struct TypeInterner {
    table: DashMap<String, Arc<TypeDescriptor>>,
}

impl TypeInterner {
    /// Creates an empty interner for a new round.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves a fully-qualified name to its canonical descriptor.
    ///
    /// The first resolution for a name derives the shape from `source`;
    /// every subsequent resolution returns the identical instance without
    /// consulting the host again.
    #[must_use]
    pub fn resolve(&self, qualified: &str, source: &dyn TypeSource) -> Arc<TypeDescriptor> {
        if let Some(existing) = self.table.get(qualified) {
            return Arc::clone(existing.value());
        }
        let entry = self
            .table
            .entry(qualified.to_owned())
            .or_insert_with(|| {
                Arc::new(TypeDescriptor {
                    qualified_name: qualified.to_owned(),
                    shape: source.describe(qualified).unwrap_or_default(),
                })
            });
        Arc::clone(entry.value())
    }

    /// Returns the descriptor for a name already interned this round.
    #[must_use]
    pub fn lookup(&self, qualified: &str) -> Option<Arc<TypeDescriptor>> {
        self.table.get(qualified).map(|e| Arc::clone(e.value()))
    }

    /// Returns the number of interned descriptors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns `true` when nothing has been interned yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

//! Reflected type metadata.
//!
//! The core never touches the host engine's reflection API directly. A host
//! bridge captures each runtime type once as an immutable [`TypeDescriptor`]
//! (qualified name, field list with serializability classification, base type,
//! generic shape, enum members, nested types) and registers it in a
//! [`TypeRegistry`]. The skeleton generator reads only this registry, so the
//! same core runs against real reflection data or hand-built fixtures.

use std::collections::HashMap;

/// Fully qualified type name: assembly, namespace, and declaration path.
///
/// `path` holds the declaring chain outermost-first, so a nested type
/// `My.Game.Outer.Inner` has `path = ["Outer", "Inner"]`. The assembly never
/// appears in the qualified string; it only selects an output subdirectory.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QualName {
    pub assembly: String,
    pub namespace: Option<String>,
    pub path: Vec<String>,
}

impl QualName {
    /// A top-level (non-nested) type name.
    pub fn new(
        assembly: impl Into<String>,
        namespace: Option<&str>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            assembly: assembly.into(),
            namespace: namespace.map(str::to_string),
            path: vec![name.into()],
        }
    }

    /// The name of a type nested inside `self`.
    pub fn nested(&self, name: impl Into<String>) -> Self {
        let mut path = self.path.clone();
        path.push(name.into());
        Self {
            assembly: self.assembly.clone(),
            namespace: self.namespace.clone(),
            path,
        }
    }

    /// The outermost declaring type. Identity for the nested case: a
    /// top-level type is its own root.
    pub fn root(&self) -> QualName {
        Self {
            assembly: self.assembly.clone(),
            namespace: self.namespace.clone(),
            path: vec![self.path[0].clone()],
        }
    }

    /// The simple (rightmost) type name.
    pub fn name(&self) -> &str {
        self.path.last().map(String::as_str).unwrap_or_default()
    }

    pub fn is_nested(&self) -> bool {
        self.path.len() > 1
    }

    /// Dotted qualified name, e.g. `My.Game.Outer.Inner`.
    ///
    /// This string is the type's durable identity: the skeleton digest is
    /// computed from the root type's qualified name.
    pub fn qualified(&self) -> String {
        match &self.namespace {
            Some(ns) => format!("{}.{}", ns, self.path.join(".")),
            None => self.path.join("."),
        }
    }
}

impl std::fmt::Display for QualName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.qualified())
    }
}

/// Built-in value types, named the way the skeleton output spells them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    Bool,
    Byte,
    Short,
    Int,
    Long,
    UInt,
    ULong,
    Float,
    Double,
    Char,
    Str,
}

impl Primitive {
    /// The runtime's full name for this primitive.
    pub fn full_name(self) -> &'static str {
        match self {
            Primitive::Bool => "System.Boolean",
            Primitive::Byte => "System.Byte",
            Primitive::Short => "System.Int16",
            Primitive::Int => "System.Int32",
            Primitive::Long => "System.Int64",
            Primitive::UInt => "System.UInt32",
            Primitive::ULong => "System.UInt64",
            Primitive::Float => "System.Single",
            Primitive::Double => "System.Double",
            Primitive::Char => "System.Char",
            Primitive::Str => "System.String",
        }
    }
}

/// A reference to a type as it appears in a field declaration, base clause, or
/// generic argument list.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeRef {
    Primitive(Primitive),
    Named(QualName),
    /// An array of the element type; nests for jagged arrays.
    Array(Box<TypeRef>),
    /// A constructed or open generic type. `def` names the open definition;
    /// unbound parameters appear as [`TypeRef::GenericParam`] arguments.
    Generic { def: QualName, args: Vec<TypeRef> },
    /// An unbound generic parameter such as `T`.
    GenericParam(String),
}

impl TypeRef {
    pub fn named(name: QualName) -> Self {
        TypeRef::Named(name)
    }

    pub fn array(element: TypeRef) -> Self {
        TypeRef::Array(Box::new(element))
    }

    /// Unwrap array nesting down to the element type.
    pub fn element(&self) -> &TypeRef {
        let mut ty = self;
        while let TypeRef::Array(inner) = ty {
            ty = inner;
        }
        ty
    }

    /// Whether this reference is or contains an unbound generic parameter.
    pub fn is_generic_param(&self) -> bool {
        matches!(self.element(), TypeRef::GenericParam(_))
    }

    /// The declaration-site spelling: full qualified names throughout, so the
    /// emitted source never depends on `using` directives beyond the engine's.
    pub fn csharp_name(&self) -> String {
        match self {
            TypeRef::Primitive(p) => p.full_name().to_string(),
            TypeRef::Named(name) => name.qualified(),
            TypeRef::Array(element) => format!("{}[]", element.csharp_name()),
            TypeRef::Generic { def, args } => {
                let args: Vec<String> = args.iter().map(TypeRef::csharp_name).collect();
                format!("{}<{}>", def.qualified(), args.join(", "))
            }
            TypeRef::GenericParam(name) => name.clone(),
        }
    }
}

impl std::fmt::Display for TypeRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.csharp_name())
    }
}

/// One declared field with the host's serializability classification.
///
/// `serializable` collapses the host-side rules (instance field, public or
/// explicitly opted in, not opted out) into a single flag; the generator
/// applies its own element-type checks on top.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    pub name: String,
    pub ty: TypeRef,
    pub serializable: bool,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
            serializable: true,
        }
    }

    /// Mark the field excluded by the host classification.
    pub fn non_serializable(mut self) -> Self {
        self.serializable = false;
        self
    }
}

/// One enum member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumMember {
    pub name: String,
    pub value: i64,
}

impl EnumMember {
    pub fn new(name: impl Into<String>, value: i64) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// The declaration shape of a reflected type.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeShape {
    Class,
    Interface,
    Enum {
        underlying: Primitive,
        members: Vec<EnumMember>,
    },
}

/// Immutable metadata for one reflected type.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDescriptor {
    pub name: QualName,
    pub shape: TypeShape,
    pub is_public: bool,
    pub is_abstract: bool,
    /// Derives from the engine's base object type.
    pub engine_object: bool,
    /// Carries the host's serializable marker attribute.
    pub serializable_marker: bool,
    pub base: Option<TypeRef>,
    /// Generic parameter names of an open generic definition, in order.
    pub generic_params: Vec<String>,
    pub fields: Vec<FieldDescriptor>,
    /// Types declared inside this one, in declaration order.
    pub nested: Vec<QualName>,
}

impl TypeDescriptor {
    /// A public, concrete class with no fields.
    pub fn class(name: QualName) -> Self {
        Self {
            name,
            shape: TypeShape::Class,
            is_public: true,
            is_abstract: false,
            engine_object: false,
            serializable_marker: false,
            base: None,
            generic_params: Vec::new(),
            fields: Vec::new(),
            nested: Vec::new(),
        }
    }

    /// A public interface.
    pub fn interface(name: QualName) -> Self {
        Self {
            shape: TypeShape::Interface,
            ..Self::class(name)
        }
    }

    /// A public enum.
    pub fn enumeration(name: QualName, underlying: Primitive, members: Vec<EnumMember>) -> Self {
        Self {
            shape: TypeShape::Enum {
                underlying,
                members,
            },
            ..Self::class(name)
        }
    }

    pub fn with_base(mut self, base: TypeRef) -> Self {
        self.base = Some(base);
        self
    }

    pub fn with_field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    pub fn with_nested(mut self, nested: QualName) -> Self {
        self.nested.push(nested);
        self
    }

    pub fn with_generic_params(mut self, params: &[&str]) -> Self {
        self.generic_params = params.iter().map(|p| p.to_string()).collect();
        self
    }

    pub fn serializable(mut self) -> Self {
        self.serializable_marker = true;
        self
    }

    pub fn engine_object(mut self) -> Self {
        self.engine_object = true;
        self
    }

    pub fn non_public(mut self) -> Self {
        self.is_public = false;
        self
    }

    pub fn abstract_type(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    pub fn is_enum(&self) -> bool {
        matches!(self.shape, TypeShape::Enum { .. })
    }
}

/// The host bridge's captured type metadata, keyed by qualified name.
///
/// Every type the bridge saw is registered individually, nested types
/// included; lookups never recurse.
#[derive(Debug, Default)]
pub struct TypeRegistry {
    types: HashMap<String, TypeDescriptor>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a captured type, replacing any earlier capture of the same
    /// qualified name.
    pub fn register(&mut self, descriptor: TypeDescriptor) {
        self.types
            .insert(descriptor.name.qualified(), descriptor);
    }

    pub fn get(&self, name: &QualName) -> Option<&TypeDescriptor> {
        self.types.get(&name.qualified())
    }

    pub fn get_qualified(&self, qualified: &str) -> Option<&TypeDescriptor> {
        self.types.get(qualified)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

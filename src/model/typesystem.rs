//! Type model referenced from instruction operands and method signatures.
//!
//! The metadata extractor produces these records from compiled binary metadata;
//! the analytical core only references them and never constructs them itself.
//! Types form a closed sum ([`TacType`]) and declarations are plain records
//! grouped under [`TypeDefinition`], addressable by name through the
//! [`TypeRegistry`].

use rustc_hash::FxHashMap;

/// The closed sum of type shapes.
///
/// # Examples
///
/// ```rust
/// use tacscope::TacType;
///
/// // List<T[]>
/// let t = TacType::named_generic(
///     "List",
///     vec![TacType::array(TacType::type_variable("T"))],
/// );
/// assert_eq!(t.to_string(), "List<T[]>");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TacType {
    /// A named type, possibly instantiated with generic arguments.
    Named {
        /// The type name.
        name: String,
        /// Generic arguments, empty for non-generic types.
        generic_args: Vec<TacType>,
    },
    /// A single-dimensional array type.
    Array {
        /// The element type.
        element: Box<TacType>,
    },
    /// An unmanaged pointer type.
    Pointer {
        /// The pointed-to type.
        target: Box<TacType>,
    },
    /// A generic type variable from an enclosing declaration.
    TypeVariable {
        /// The variable name.
        name: String,
    },
}

impl TacType {
    /// Creates a non-generic named type.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named {
            name: name.into(),
            generic_args: Vec::new(),
        }
    }

    /// Creates a named type with generic arguments.
    #[must_use]
    pub fn named_generic(name: impl Into<String>, generic_args: Vec<TacType>) -> Self {
        Self::Named {
            name: name.into(),
            generic_args,
        }
    }

    /// Creates an array type over `element`.
    #[must_use]
    pub fn array(element: TacType) -> Self {
        Self::Array {
            element: Box::new(element),
        }
    }

    /// Creates a pointer type to `target`.
    #[must_use]
    pub fn pointer(target: TacType) -> Self {
        Self::Pointer {
            target: Box::new(target),
        }
    }

    /// Creates a generic type variable.
    #[must_use]
    pub fn type_variable(name: impl Into<String>) -> Self {
        Self::TypeVariable { name: name.into() }
    }
}

impl std::fmt::Display for TacType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Named { name, generic_args } => {
                write!(f, "{name}")?;
                if !generic_args.is_empty() {
                    let args: Vec<String> = generic_args.iter().map(ToString::to_string).collect();
                    write!(f, "<{}>", args.join(", "))?;
                }
                Ok(())
            }
            Self::Array { element } => write!(f, "{element}[]"),
            Self::Pointer { target } => write!(f, "{target}*"),
            Self::TypeVariable { name } => write!(f, "{name}"),
        }
    }
}

/// A formal parameter of a method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    /// The parameter name.
    pub name: String,
    /// The parameter type.
    pub ty: TacType,
}

/// A field declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDef {
    /// The field name.
    pub name: String,
    /// The field type.
    pub ty: TacType,
}

/// A method declaration, optionally carrying its lifted body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDef {
    /// The method name.
    pub name: String,
    /// Generic parameter names.
    pub generic_params: Vec<String>,
    /// The formal parameters.
    pub parameters: Vec<Parameter>,
    /// The return type.
    pub return_type: TacType,
    /// The lifted three-address body, if the method has one.
    pub body: Option<crate::model::MethodBody>,
}

/// A class declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassDef {
    /// The class name.
    pub name: String,
    /// The base class name, if any.
    pub base: Option<String>,
    /// Implemented interface names.
    pub interfaces: Vec<String>,
    /// Generic parameter names.
    pub generic_params: Vec<String>,
    /// Declared fields.
    pub fields: Vec<FieldDef>,
    /// Declared methods.
    pub methods: Vec<MethodDef>,
}

/// A struct declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructDef {
    /// The struct name.
    pub name: String,
    /// Implemented interface names.
    pub interfaces: Vec<String>,
    /// Generic parameter names.
    pub generic_params: Vec<String>,
    /// Declared fields.
    pub fields: Vec<FieldDef>,
    /// Declared methods.
    pub methods: Vec<MethodDef>,
}

/// An interface declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceDef {
    /// The interface name.
    pub name: String,
    /// Generic parameter names.
    pub generic_params: Vec<String>,
    /// Declared method signatures.
    pub methods: Vec<MethodDef>,
}

/// An enum declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumDef {
    /// The enum name.
    pub name: String,
    /// The underlying type.
    pub underlying: TacType,
    /// The declared members in order.
    pub members: Vec<String>,
}

/// A type declaration of any kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeDefinition {
    /// A class declaration.
    Class(ClassDef),
    /// A struct declaration.
    Struct(StructDef),
    /// An interface declaration.
    Interface(InterfaceDef),
    /// An enum declaration.
    Enum(EnumDef),
}

impl TypeDefinition {
    /// Returns the declared name of this definition.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Class(c) => &c.name,
            Self::Struct(s) => &s.name,
            Self::Interface(i) => &i.name,
            Self::Enum(e) => &e.name,
        }
    }
}

/// Read-only name-to-definition mapping produced by the metadata extractor.
///
/// # Examples
///
/// ```rust
/// use tacscope::{EnumDef, TacType, TypeDefinition, TypeRegistry};
///
/// let mut registry = TypeRegistry::new();
/// registry.insert(TypeDefinition::Enum(EnumDef {
///     name: "Color".into(),
///     underlying: TacType::named("Int32"),
///     members: vec!["Red".into(), "Green".into()],
/// }));
///
/// assert!(registry.get("Color").is_some());
/// assert!(registry.get("Missing").is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    definitions: FxHashMap<String, TypeDefinition>,
}

impl TypeRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a definition under its declared name.
    ///
    /// Returns the previous definition with the same name, if any.
    pub fn insert(&mut self, definition: TypeDefinition) -> Option<TypeDefinition> {
        self.definitions
            .insert(definition.name().to_owned(), definition)
    }

    /// Looks up a definition by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&TypeDefinition> {
        self.definitions.get(name)
    }

    /// Returns the number of registered definitions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Returns `true` if no definitions are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Iterates over all registered definitions in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = &TypeDefinition> {
        self.definitions.values()
    }
}

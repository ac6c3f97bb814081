//! Parser bound to a schema, handing out type handles by name.

use crate::schema::{Atom, Schema, TypeRef};
use std::collections::HashMap;
use std::fmt;

/// A schema plus a name index for constant-time type lookup.
///
/// If a name is defined more than once, the first definition wins, matching
/// [`Schema::find_named_type`].
#[derive(Clone)]
pub struct Parser {
    schema: Schema,
    by_name: HashMap<String, usize>,
}

impl Parser {
    pub fn new(schema: Schema) -> Self {
        let mut by_name = HashMap::with_capacity(schema.types.len());
        for (idx, def) in schema.types.iter().enumerate() {
            by_name.entry(def.name.as_str().to_owned()).or_insert(idx);
        }
        Self { schema, by_name }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Handle for the named type.
    ///
    /// Always returns a handle; check [`ParseableType::is_valid`] to find out
    /// whether the name exists in the schema.
    pub fn type_named<'a>(&'a self, name: &'a str) -> ParseableType<'a> {
        let atom = self
            .by_name
            .get(name)
            .map(|&idx| &self.schema.types[idx].atom);
        ParseableType {
            parser: self,
            name: Some(name),
            atom,
        }
    }

    fn type_for_ref<'a>(&'a self, type_ref: &'a TypeRef) -> ParseableType<'a> {
        match type_ref {
            TypeRef::Named(name) => self.type_named(name.as_str()),
            TypeRef::Inlined(atom) => ParseableType {
                parser: self,
                name: None,
                atom: Some(atom),
            },
        }
    }
}

impl fmt::Debug for Parser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Parser")
            .field("types", &self.schema.types.len())
            .finish()
    }
}

/// Handle to one type of a parser's schema.
///
/// Borrowing the parser keeps lookups allocation-free; inlined types have no
/// name.
#[derive(Clone, Copy)]
pub struct ParseableType<'a> {
    parser: &'a Parser,
    name: Option<&'a str>,
    atom: Option<&'a Atom>,
}

impl<'a> ParseableType<'a> {
    pub fn name(&self) -> Option<&'a str> {
        self.name
    }

    pub fn atom(&self) -> Option<&'a Atom> {
        self.atom
    }

    /// False when the handle names a type the schema does not define.
    pub fn is_valid(&self) -> bool {
        self.atom.is_some()
    }

    /// Type of a struct field, if this is a map with that field.
    pub fn field(&self, name: &str) -> Option<ParseableType<'a>> {
        let field = self.atom?.as_map()?.find_field(name)?;
        Some(self.parser.type_for_ref(&field.ty))
    }

    /// Element type of a list, or of a map with a uniform element type.
    pub fn element(&self) -> Option<ParseableType<'a>> {
        let element = match self.atom? {
            Atom::List(list) => &list.element_type,
            Atom::Map(map) => map.element_type.as_ref()?,
            Atom::Scalar(_) | Atom::Untyped(_) => return None,
        };
        Some(self.parser.type_for_ref(element))
    }
}

impl PartialEq for ParseableType<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.atom == other.atom
    }
}

impl fmt::Debug for ParseableType<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParseableType")
            .field("name", &self.name)
            .field("atom", &self.atom)
            .finish()
    }
}

//! The `Type` value object and its builder.
//!
//! `Type` carries no fields, so equality is vacuously structural: every
//! instance equals every other instance, the hash is a constant, and the
//! textual form is always `Type()`.
use std::any::Any;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::de::{Deserialize, Deserializer, IgnoredAny, MapAccess, Visitor};
use serde::Serialize;

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// Zero-field value object.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Type {}

/// Companion builder for [`Type`]. Holds nothing; `build` always succeeds.
#[derive(Debug, Clone, Copy, Default)]
pub struct Builder {}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl Type {
    /// Seed of the hash; with no fields nothing is ever folded into it.
    pub const HASH_CODE: i32 = 1;

    pub fn new() -> Self {
        Self {}
    }

    pub fn builder() -> Builder {
        Builder::new()
    }

    /// Dynamic equality: false for an absent argument or one of another type.
    pub fn equals(&self, other: Option<&dyn Any>) -> bool {
        match other {
            None => false,
            Some(other) => other.downcast_ref::<Type>().is_some_and(|o| self == o),
        }
    }

    pub fn hash_code(&self) -> i32 {
        Self::HASH_CODE
    }

    pub fn foo(&self) {}
}

impl Hash for Type {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.hash_code().hash(state)
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Type")?;
        f.write_str("(")?;
        f.write_str(")")
    }
}

impl<'de> Deserialize<'de> for Type {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct TypeVisitor;

        impl<'de> Visitor<'de> for TypeVisitor {
            type Value = Type;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a JSON object")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Type, A::Error>
            where
                A: MapAccess<'de>,
            {
                // no known members; drain and drop whatever is there
                while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}
                Ok(Type::new())
            }
        }

        deserializer.deserialize_map(TypeVisitor)
    }
}

impl Builder {
    pub fn new() -> Self {
        Self {}
    }

    pub fn build(&self) -> Type {
        Type::new()
    }
}

impl From<Builder> for Type {
    fn from(builder: Builder) -> Self {
        builder.build()
    }
}

// ------------------------------- Tests ------------------------------------ //

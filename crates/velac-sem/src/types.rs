//! The builtin type matrix.
//!
//! `spec.md` §3 fixes this table as process-wide, read-only configuration;
//! it needs no runtime mutation, so it's modeled as a plain `const` per
//! kind rather than a lookup structure.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Int,
    Float,
    Bool,
    Void,
}

impl TypeKind {
    pub fn name(self) -> &'static str {
        match self {
            TypeKind::Int => "int",
            TypeKind::Float => "float",
            TypeKind::Bool => "bool",
            TypeKind::Void => "void",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeInfo {
    pub kind: TypeKind,
}

impl TypeInfo {
    pub const INT: TypeInfo = TypeInfo { kind: TypeKind::Int };
    pub const FLOAT: TypeInfo = TypeInfo { kind: TypeKind::Float };
    pub const BOOL: TypeInfo = TypeInfo { kind: TypeKind::Bool };
    pub const VOID: TypeInfo = TypeInfo { kind: TypeKind::Void };

    /// Resolves a type-name source view against `{int, float, bool, void}`;
    /// anything else is `TYPE_NOT_EXISTS` territory for the caller.
    pub fn from_name(name: &str) -> Option<TypeInfo> {
        Some(match name {
            "int" => TypeInfo::INT,
            "float" => TypeInfo::FLOAT,
            "bool" => TypeInfo::BOOL,
            "void" => TypeInfo::VOID,
            _ => return None,
        })
    }

    pub fn name(self) -> &'static str {
        self.kind.name()
    }

    /// Size in bytes, per `spec.md` §3's fixed matrix.
    pub fn size(self) -> u32 {
        match self.kind {
            TypeKind::Int => 8,
            TypeKind::Float => 8,
            TypeKind::Bool => 1,
            TypeKind::Void => 0,
        }
    }

    pub fn valid_variable_type(self) -> bool {
        self.kind != TypeKind::Void
    }

    pub fn valid_return_type(self) -> bool {
        true
    }

    pub fn valid_arithmetic_operand(self) -> bool {
        matches!(self.kind, TypeKind::Int | TypeKind::Float)
    }

    pub fn valid_boolean_operand(self) -> bool {
        self.kind != TypeKind::Void
    }

    pub fn valid_ordering_operand(self) -> bool {
        matches!(self.kind, TypeKind::Int | TypeKind::Float)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_the_fixed_type_matrix() {
        assert_eq!(TypeInfo::INT.size(), 8);
        assert_eq!(TypeInfo::FLOAT.size(), 8);
        assert_eq!(TypeInfo::BOOL.size(), 1);
        assert_eq!(TypeInfo::VOID.size(), 0);

        assert!(!TypeInfo::VOID.valid_variable_type());
        assert!(TypeInfo::BOOL.valid_variable_type());

        assert!(TypeInfo::INT.valid_arithmetic_operand());
        assert!(!TypeInfo::BOOL.valid_arithmetic_operand());
        assert!(!TypeInfo::VOID.valid_arithmetic_operand());

        assert!(TypeInfo::BOOL.valid_boolean_operand());
        assert!(!TypeInfo::VOID.valid_boolean_operand());

        assert!(TypeInfo::FLOAT.valid_ordering_operand());
        assert!(!TypeInfo::BOOL.valid_ordering_operand());
    }

    #[test]
    fn from_name_rejects_unknown_type_names() {
        assert_eq!(TypeInfo::from_name("int"), Some(TypeInfo::INT));
        assert_eq!(TypeInfo::from_name("string"), None);
    }
}

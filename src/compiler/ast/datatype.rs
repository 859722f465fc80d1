use super::symbol_table::SymbolId;

/// Semantic types of the language. These are the values produced by type
/// checking, not the syntactic type annotations (see TypeSpecNode for
/// those).
///
/// ERROR is the recovery type: it is produced wherever a check fails and
/// compares equal to nothing, so one reported error does not cascade into
/// a chain of follow-up diagnostics over the same expression.
#[derive(Debug, Clone)]
#[allow(non_camel_case_types)]
pub enum DataType {
    INT,
    BOOL,
    VOID,

    /// Type of string literals. There are no string variables, only
    /// literals written with cout.
    STRING,

    /// Recovery type injected after a failed check.
    ERROR,

    /// Type of a declared function.
    FN {
        params: Vec<DataType>,
        ret: Box<DataType>,
    },

    /// Type of a struct instance. Carries the symbol of the struct
    /// definition it was declared with, two struct types are equal exactly
    /// when they name the same definition.
    STRUCT(SymbolId),

    /// Type of a struct definition symbol itself. The field scope lives on
    /// the symbol, not on the type.
    STRUCT_DEF,
}

impl DataType {
    pub fn is_int(&self) -> bool {
        matches!(self, DataType::INT)
    }

    pub fn is_bool(&self) -> bool {
        matches!(self, DataType::BOOL)
    }

    pub fn is_void(&self) -> bool {
        matches!(self, DataType::VOID)
    }

    pub fn is_string(&self) -> bool {
        matches!(self, DataType::STRING)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, DataType::ERROR)
    }

    pub fn is_fn(&self) -> bool {
        matches!(self, DataType::FN { .. })
    }

    pub fn is_struct(&self) -> bool {
        matches!(self, DataType::STRUCT(_))
    }

    pub fn is_struct_def(&self) -> bool {
        matches!(self, DataType::STRUCT_DEF)
    }
}

/// Equality is structural, except that ERROR compares equal to nothing,
/// itself included. Eq is deliberately not implemented, the relation is
/// not reflexive.
impl PartialEq for DataType {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (DataType::ERROR, _) | (_, DataType::ERROR) => false,
            (DataType::INT, DataType::INT) => true,
            (DataType::BOOL, DataType::BOOL) => true,
            (DataType::VOID, DataType::VOID) => true,
            (DataType::STRING, DataType::STRING) => true,
            (
                DataType::FN { params: lhs_params, ret: lhs_ret },
                DataType::FN { params: rhs_params, ret: rhs_ret },
            ) => lhs_params == rhs_params && lhs_ret == rhs_ret,
            (DataType::STRUCT(lhs_def), DataType::STRUCT(rhs_def)) => lhs_def == rhs_def,
            (DataType::STRUCT_DEF, DataType::STRUCT_DEF) => true,
            _ => false,
        }
    }
}

/// DataType Module Tests
#[cfg(test)]
mod tests {
    use super::DataType;
    use crate::compiler::ast::symbol_table::SymbolId;

    #[test]
    fn test_error_equals_nothing() {
        assert_ne!(DataType::ERROR, DataType::ERROR);
        assert_ne!(DataType::ERROR, DataType::INT);
        assert_ne!(DataType::INT, DataType::ERROR);
    }

    #[test]
    fn test_scalar_equality_is_structural() {
        assert_eq!(DataType::INT, DataType::INT);
        assert_eq!(DataType::BOOL, DataType::BOOL);
        assert_ne!(DataType::INT, DataType::BOOL);
        assert_ne!(DataType::VOID, DataType::STRING);
    }

    #[test]
    fn test_struct_equality_is_by_declaration() {
        let point = SymbolId::for_tests(0);
        let vector = SymbolId::for_tests(1);
        assert_eq!(DataType::STRUCT(point), DataType::STRUCT(point));
        assert_ne!(DataType::STRUCT(point), DataType::STRUCT(vector));
    }

    #[test]
    fn test_fn_equality_is_structural() {
        let unary_int = DataType::FN {
            params: vec![DataType::INT],
            ret: Box::new(DataType::BOOL),
        };
        let same = DataType::FN {
            params: vec![DataType::INT],
            ret: Box::new(DataType::BOOL),
        };
        let other = DataType::FN {
            params: vec![DataType::BOOL],
            ret: Box::new(DataType::BOOL),
        };
        assert_eq!(unary_int, same);
        assert_ne!(unary_int, other);
    }
}

// Traversal errors for Roxas.

use thiserror::Error;

use crate::domain::node::{Field, JsonShape};

/// Errors raised while classifying or walking a parse tree.
///
/// Every variant is terminal for the traversal that produced it: the walk
/// unwinds completely and cannot be resumed mid-tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    /// A schema-bound position holds a JSON value of the wrong shape.
    #[error("malformed tree: `{field}` cannot be {shape}")]
    MalformedTree { field: Field, shape: JsonShape },

    /// The tree nests deeper than the configured limit.
    #[error("tree depth exceeds limit of {limit}")]
    DepthExceeded { limit: usize },
}

impl TreeError {
    pub fn malformed(field: Field, shape: JsonShape) -> Self {
        TreeError::MalformedTree { field, shape }
    }

    /// The offending field, for malformed-tree errors.
    pub fn field(&self) -> Option<Field> {
        match self {
            TreeError::MalformedTree { field, .. } => Some(*field),
            TreeError::DepthExceeded { .. } => None,
        }
    }
}

pub type TreeResult<T> = Result<T, TreeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_message_names_field_and_shape() {
        let err = TreeError::malformed(Field::Node, JsonShape::Boolean);
        assert_eq!(err.to_string(), "malformed tree: `node` cannot be a boolean");
        assert_eq!(err.field(), Some(Field::Node));
    }

    #[test]
    fn test_depth_exceeded_has_no_field() {
        let err = TreeError::DepthExceeded { limit: 8 };
        assert_eq!(err.field(), None);
        assert!(err.to_string().contains('8'));
    }
}

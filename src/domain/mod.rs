// Domain logic for Roxas: node classification, traversal, printing and
// symbol tables. Nothing here performs I/O.

pub mod error;
pub mod node;
pub mod printer;
pub mod symbol;
pub mod walker;

pub use error::{TreeError, TreeResult};
pub use node::{classify_leaf, classify_tag, AstNode, Field, JsonShape, LeafValue, NodeTag};
pub use printer::{print_json, render_json, JsonEcho};
pub use symbol::{SymbolNotFound, SymbolRecord, SymbolTable};
pub use walker::{walk, AncestryStack, LeafVisitor, TreeWalker, WalkOptions};

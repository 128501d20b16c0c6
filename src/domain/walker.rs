//! Tree Walker
//!
//! Depth-first traversal of a parsed AST that fires a callback once per
//! leaf, handing it the chain of ancestor tags.
//!
//! The walk runs over an explicit work-list rather than the native call
//! stack, so arbitrarily deep trees cannot overflow it. The observable
//! order is the same as a recursive descent: `left` before `right`, and
//! sequence members in serialized order.

use serde_json::Value;
use std::ops::{Deref, DerefMut};

use crate::domain::error::{TreeError, TreeResult};
use crate::domain::node::{
    classify_leaf, classify_tag, has_children, AstNode, Field, JsonShape, LeafValue, NodeTag,
};

/// Ordered node tags from the tree root (bottom) to the node currently
/// being visited (top).
#[derive(Debug, Default, Clone, PartialEq)]
pub struct AncestryStack<'v> {
    frames: Vec<NodeTag<'v>>,
}

impl<'v> AncestryStack<'v> {
    pub fn new() -> Self {
        Self { frames: Vec::new() }
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// The innermost tag, i.e. the parent of the leaf being visited.
    pub fn top(&self) -> Option<&NodeTag<'v>> {
        self.frames.last()
    }

    /// Root-first view of the stack.
    pub fn as_slice(&self) -> &[NodeTag<'v>] {
        &self.frames
    }

    pub fn iter(&self) -> impl Iterator<Item = &NodeTag<'v>> {
        self.frames.iter()
    }

    /// Root-first labels, convenient for reporting.
    pub fn labels(&self) -> Vec<String> {
        self.frames.iter().map(NodeTag::label).collect()
    }

    pub fn push(&mut self, tag: NodeTag<'v>) {
        self.frames.push(tag);
    }

    pub fn pop(&mut self) -> Option<NodeTag<'v>> {
        self.frames.pop()
    }

    fn truncate(&mut self, depth: usize) {
        self.frames.truncate(depth);
    }
}

/// Receives every leaf reached by a walk.
///
/// Implemented for any `FnMut(LeafValue, &AncestryStack)` closure.
pub trait LeafVisitor<'v> {
    fn visit_leaf(&mut self, leaf: LeafValue<'v>, ancestry: &AncestryStack<'v>);
}

impl<'v, F> LeafVisitor<'v> for F
where
    F: FnMut(LeafValue<'v>, &AncestryStack<'v>),
{
    fn visit_leaf(&mut self, leaf: LeafValue<'v>, ancestry: &AncestryStack<'v>) {
        self(leaf, ancestry)
    }
}

/// Traversal options.
#[derive(Debug, Clone, Copy, Default)]
pub struct WalkOptions {
    /// Maximum number of nested nodes below the caller's stack depth.
    /// `None` means unbounded.
    pub max_depth: Option<usize>,
}

/// Restores the caller's stack depth when dropped, whether the walk
/// finished or bailed out with an error.
struct StackGuard<'s, 'v> {
    stack: &'s mut AncestryStack<'v>,
    base: usize,
}

impl<'s, 'v> StackGuard<'s, 'v> {
    fn new(stack: &'s mut AncestryStack<'v>) -> Self {
        let base = stack.depth();
        Self { stack, base }
    }
}

impl<'v> Deref for StackGuard<'_, 'v> {
    type Target = AncestryStack<'v>;

    fn deref(&self) -> &Self::Target {
        &*self.stack
    }
}

impl<'v> DerefMut for StackGuard<'_, 'v> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut *self.stack
    }
}

impl Drop for StackGuard<'_, '_> {
    fn drop(&mut self) {
        self.stack.truncate(self.base);
    }
}

enum Work<'v> {
    /// Classify a node and push its tag.
    Enter(&'v Value),
    /// A `left`/`right` position of the node on top of the stack,
    /// classified only when it is reached.
    Child(Field, Option<&'v Value>),
    /// A member of a sibling sequence.
    Element(&'v Value),
    /// Pop the tag pushed by the matching `Enter`.
    Leave,
}

/// The AST traversal engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct TreeWalker {
    options: WalkOptions,
}

impl TreeWalker {
    pub fn new(options: WalkOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> WalkOptions {
        self.options
    }

    /// Walk `root` and every descendant, calling `visitor` once per leaf.
    ///
    /// A single object at `left`/`right` is a leaf. A sequence at
    /// `left`/`right` is descended into: members that carry a non-null
    /// `left`/`right` of their own are walked as nodes, childless members
    /// are leaves of the enclosing node and must still carry a valid `node`.
    ///
    /// `right` is classified only after every leaf under `left` has fired.
    ///
    /// On return `stack` has exactly the depth it had on entry, on success
    /// and on error alike. Any malformed shape aborts the whole walk.
    pub fn walk<'v, V>(
        &self,
        root: &'v Value,
        visitor: &mut V,
        stack: &mut AncestryStack<'v>,
    ) -> TreeResult<()>
    where
        V: LeafVisitor<'v> + ?Sized,
    {
        let mut stack = StackGuard::new(stack);
        let base = stack.base;
        let mut work = vec![Work::Enter(root)];

        while let Some(item) = work.pop() {
            match item {
                Work::Enter(value) => {
                    let node = AstNode::from_value(value)?;
                    if let Some(limit) = self.options.max_depth {
                        if stack.depth() - base >= limit {
                            return Err(TreeError::DepthExceeded { limit });
                        }
                    }
                    stack.push(node.node);
                    // Reverse order: the work-list is LIFO.
                    work.push(Work::Leave);
                    work.push(Work::Child(Field::Right, node.child(Field::Right)));
                    work.push(Work::Child(Field::Left, node.child(Field::Left)));
                }
                Work::Child(field, value) => match classify_leaf(field, value)? {
                    LeafValue::Absent => {}
                    leaf @ LeafValue::Composite(_) => visitor.visit_leaf(leaf, &stack),
                    LeafValue::Sequence(items) => {
                        work.extend(items.iter().rev().map(Work::Element));
                    }
                },
                Work::Element(value) => match value {
                    Value::Object(map) if has_children(map) => work.push(Work::Enter(value)),
                    Value::Object(map) => {
                        classify_tag(Field::Node, map.get("node"))?;
                        visitor.visit_leaf(LeafValue::Composite(map), &stack);
                    }
                    other => {
                        return Err(TreeError::malformed(
                            Field::Element,
                            JsonShape::of(Some(other)),
                        ))
                    }
                },
                Work::Leave => {
                    stack.pop();
                }
            }
        }

        Ok(())
    }
}

/// Walk `root` with default options.
pub fn walk<'v, V>(root: &'v Value, visitor: &mut V, stack: &mut AncestryStack<'v>) -> TreeResult<()>
where
    V: LeafVisitor<'v> + ?Sized,
{
    TreeWalker::default().walk(root, visitor, stack)
}

//! Default child extraction.

/// Node types that know their own ordered children.
///
/// A [`Walker`](crate::Walker) built without an explicit children function
/// uses this trait. Borrowed trees implement it on the reference type so the
/// walker can hand out children without cloning:
///
/// ```rust
/// use treewalker::Children;
///
/// struct Item {
///     children: Vec<Item>,
/// }
///
/// impl<'t> Children for &'t Item {
///     fn children(&self) -> Vec<Self> {
///         self.children.iter().collect()
///     }
/// }
/// ```
pub trait Children: Sized {
    /// Returns this node's children in visiting order.
    ///
    /// An empty vector means the node is a leaf.
    fn children(&self) -> Vec<Self>;
}

/// Reads the conventional `"children"` field.
///
/// A missing field, `null`, or any non-array value yields no children.
#[cfg(feature = "json")]
impl<'t> Children for &'t serde_json::Value {
    fn children(&self) -> Vec<Self> {
        let node: &'t serde_json::Value = *self;
        match node.get("children") {
            Some(serde_json::Value::Array(items)) => items.iter().collect(),
            _ => Vec::new(),
        }
    }
}

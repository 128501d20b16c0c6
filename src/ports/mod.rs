use crate::infrastructure::BridgeError;

/// Anything that can hand over a serialized parse tree as JSON text.
pub trait ParseTreeSource {
    /// Short description for log lines and diagnostics.
    fn describe(&self) -> String;

    fn load_parse_tree(&self) -> Result<String, BridgeError>;
}

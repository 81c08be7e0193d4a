//! The binding-data envelope the host hands down for every deferred-binding
//! invocation.

/// Opaque input the host gives a registered resource factory.
///
/// `content` is the only field every binding type actually needs; the rest
/// round-trip metadata the host attaches for diagnostics or for bindings
/// that branch on protocol version.
#[derive(Debug, Clone, Default)]
pub struct BindingData {
    /// Raw payload bytes. `None` for a malformed trigger invocation.
    pub content: Option<Vec<u8>>,
    /// MIME-ish content type the host tags the payload with, e.g.
    /// `application/octet-stream`.
    pub content_type: Option<String>,
    /// Free-form source identifier (queue/topic/subscription name, etc).
    pub source: Option<String>,
    /// Binding-data wire version, used by some factories to branch on
    /// layout changes.
    pub version: Option<String>,
}

impl BindingData {
    /// Creates a new envelope carrying only `content`.
    pub fn new(content: Vec<u8>) -> Self {
        Self {
            content: Some(content),
            content_type: None,
            source: None,
            version: None,
        }
    }
}

/// What a registered factory is actually handed at dispatch time: a single
/// binding-data record, or a batch of them.
///
/// The host's own model-binding contract is dynamically typed here (a
/// factory receives "an object or an array"); this enum is the typed
/// equivalent a `match` replaces the runtime `Array.isArray` check with.
#[derive(Debug, Clone)]
pub enum BindingInput {
    /// One binding-data record.
    Single(BindingData),
    /// A list of binding-data records, e.g. a batch-triggered invocation.
    Batch(Vec<BindingData>),
}

impl From<BindingData> for BindingInput {
    fn from(data: BindingData) -> Self {
        Self::Single(data)
    }
}

impl From<Vec<BindingData>> for BindingInput {
    fn from(data: Vec<BindingData>) -> Self {
        Self::Batch(data)
    }
}

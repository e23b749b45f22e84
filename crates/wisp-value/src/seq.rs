use crate::Value;

/// Backing storage for both `List` and `Vector` values. The two kinds share
/// a representation because the reference they're built from treats list and
/// vector as two concrete faces of one abstract "multi" sequence type, and
/// because the spec requires them to compare equal to each other when their
/// elements match.
#[derive(Debug)]
pub struct SeqData {
    pub items: Vec<Value>,
    pub meta: Value,
}

impl SeqData {
    pub fn new(items: Vec<Value>) -> Self {
        SeqData {
            items,
            meta: Value::Nil,
        }
    }

    pub fn with_meta(&self, meta: Value) -> Self {
        SeqData {
            items: self.items.clone(),
            meta,
        }
    }
}

use std::rc::Rc;

use crate::runner::ds::env_record::{EnvironmentRecord, EnvironmentRecordType};

pub type JsLexEnvironmentType = Rc<LexEnvironment>;

/// One scope node: a record plus the enclosing scope.
pub struct LexEnvironment {
    pub inner: EnvironmentRecordType,
    pub outer: Option<JsLexEnvironmentType>,
}
impl LexEnvironment {
    pub fn env_record(&self) -> &dyn EnvironmentRecord {
        self.inner.as_env_record()
    }
}

//! The synthesized forwarding object.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use casement_core::{ObjRef, Value};
use casement_invoke::InvokeError;

use crate::report::BuildReport;

/// A compiled operation implementation over the uniform calling convention.
pub type OperationImpl =
    Arc<dyn Fn(Option<&ObjRef>, &[Value]) -> Result<Value, InvokeError> + Send + Sync>;

/// A forwarding implementation of one interface for one handler.
///
/// Immutable once built; freely shared between threads. Operations whose
/// handler has no binding are present but fail with
/// [`InvokeError::Unimplemented`] when invoked.
pub struct Adapter {
    pub(crate) interface: String,
    pub(crate) handler: String,
    pub(crate) ops: HashMap<String, OperationImpl>,
    pub(crate) report: BuildReport,
}

impl Adapter {
    /// Interface this adapter implements.
    pub fn interface(&self) -> &str {
        &self.interface
    }

    /// Handler this adapter was built for.
    pub fn handler(&self) -> &str {
        &self.handler
    }

    /// The synthesis report recorded at build time.
    pub fn report(&self) -> &BuildReport {
        &self.report
    }

    /// Names of all operations, in no particular order.
    pub fn operations(&self) -> impl Iterator<Item = &str> {
        self.ops.keys().map(String::as_str)
    }

    /// Invoke an operation with the uniform calling convention: a nullable
    /// instance reference plus ordered boxed arguments, one boxed result.
    pub fn invoke(
        &self,
        operation: &str,
        instance: Option<&ObjRef>,
        args: &[Value],
    ) -> Result<Value, InvokeError> {
        let imp = self
            .ops
            .get(operation)
            .ok_or_else(|| InvokeError::UnknownOperation {
                operation: operation.to_string(),
            })?;
        imp(instance, args)
    }
}

impl fmt::Debug for Adapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Adapter")
            .field("interface", &self.interface)
            .field("handler", &self.handler)
            .field("operations", &self.ops.len())
            .finish_non_exhaustive()
    }
}

//! Caller-facing variables.

use std::any::Any;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// An opaque context value attached to a variable.
///
/// The solver never inspects it; it is purely pass-through for the caller.
pub type Context = Box<dyn Any + Send + Sync>;

/// A variable in a constraint system.
///
/// A `Variable` is a cheap handle: clones refer to the same underlying
/// unknown, and identity is by allocation rather than by name. Two
/// variables built with the same name are distinct.
///
/// The current value is written only by the solver's `update_variables`
/// pass and is zero until then. Once a pass has completed, the value may
/// be read from any thread.
#[derive(Clone)]
pub struct Variable {
    data: Arc<VariableData>,
}

struct VariableData {
    name: String,
    context: Option<Context>,
    // Value stored as raw bits so completed passes are readable across
    // threads without locking.
    value: AtomicU64,
}

impl Variable {
    /// Create a new variable with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self::build(name.into(), None)
    }

    /// Create a new variable carrying an opaque caller context.
    pub fn with_context(name: impl Into<String>, context: Context) -> Self {
        Self::build(name.into(), Some(context))
    }

    fn build(name: String, context: Option<Context>) -> Self {
        Self {
            data: Arc::new(VariableData {
                name,
                context,
                value: AtomicU64::new(0.0_f64.to_bits()),
            }),
        }
    }

    /// The human-readable name of the variable.
    pub fn name(&self) -> &str {
        &self.data.name
    }

    /// The caller-supplied context, if any.
    pub fn context(&self) -> Option<&(dyn Any + Send + Sync)> {
        self.data.context.as_deref()
    }

    /// The current value of the variable.
    pub fn value(&self) -> f64 {
        f64::from_bits(self.data.value.load(Ordering::Relaxed))
    }

    /// Set the current value of the variable.
    ///
    /// This is the write slot the solver uses when updating variables;
    /// callers normally only read.
    pub fn set_value(&self, value: f64) {
        self.data.value.store(value.to_bits(), Ordering::Relaxed);
    }
}

impl PartialEq for Variable {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.data, &other.data)
    }
}

impl Eq for Variable {}

impl Hash for Variable {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (Arc::as_ptr(&self.data) as usize).hash(state);
    }
}

impl fmt::Debug for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Variable")
            .field("name", &self.data.name)
            .field("value", &self.value())
            .finish()
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

//! Type-erasure support for entities and events held behind trait objects.

use std::any::Any;

/// Access to the concrete type behind a trait object.
///
/// Implemented for every `Send + Sync + 'static` type. Call it on the trait
/// object itself (`(*boxed).as_any()`), not on a `Box` or reference to one,
/// otherwise the container type is what gets erased.
pub trait AsAny: Any + Send + Sync {
    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    fn into_any(self: Box<Self>) -> Box<dyn Any + Send + Sync>;
}

impl<T: Any + Send + Sync> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any + Send + Sync> {
        self
    }
}

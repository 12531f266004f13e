use crate::core::record::{Collection, Record};
use crate::core::value::Value;

/// Update channel of an object editor.
pub trait ObjectHandler {
    fn update_element(&mut self, updated: Record);
}

impl<F> ObjectHandler for F
where
    F: FnMut(Record),
{
    fn update_element(&mut self, updated: Record) {
        self(updated)
    }
}

/// Update channels of an array editor. The editor never builds the new
/// collection itself; the owner does.
pub trait ArrayHandler {
    fn update_element(&mut self, updated: Record, index: usize);
    fn remove_element(&mut self, removed: Value, index: usize);
    /// Returning `false` keeps the pending row's buffer for correction.
    fn add_element(&mut self, element: Record) -> bool;
}

/// Owner of a nested array: folds element events into a new collection and
/// hands it to the owning field.
pub(super) struct NestedArrayHandler<'a> {
    pub(super) current: Collection,
    pub(super) on_change: &'a mut dyn FnMut(Value),
}

impl ArrayHandler for NestedArrayHandler<'_> {
    fn update_element(&mut self, updated: Record, index: usize) {
        (self.on_change)(Value::List(
            self.current.with_element(index, Value::Object(updated)),
        ));
    }

    fn remove_element(&mut self, _removed: Value, index: usize) {
        (self.on_change)(Value::List(self.current.without_element(index)));
    }

    fn add_element(&mut self, element: Record) -> bool {
        (self.on_change)(Value::List(self.current.appended(Value::Object(element))));
        true
    }
}

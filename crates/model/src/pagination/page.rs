/// One page returned by a paginated listing operation.
///
/// `total` is the number of entities matching the filter across all pages.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub total: usize,
    pub items: Vec<T>,
}

impl<T> Page<T> {
    pub fn new(total: usize, items: Vec<T>) -> Self {
        Page { total, items }
    }

    pub fn empty(total: usize) -> Self {
        Page {
            total,
            items: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

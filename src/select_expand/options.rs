use crate::nodes::{ComputeClause, FilterClause, OrderByClause, SearchClause};

/// Query options nested under one `$select` or `$expand` item, e.g. the
/// `$filter` and `$top` of `$expand=Trips($filter=Budget gt 100;$top=2)`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SelectExpandOptions {
    pub filter: Option<FilterClause>,
    pub order_by: Option<OrderByClause>,
    pub top: Option<i64>,
    pub skip: Option<i64>,
    pub count: Option<bool>,
    pub search: Option<SearchClause>,
    pub compute: Option<ComputeClause>,
}

impl SelectExpandOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_filter(mut self, filter: FilterClause) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn with_order_by(mut self, order_by: OrderByClause) -> Self {
        self.order_by = Some(order_by);
        self
    }

    pub fn with_top(mut self, top: i64) -> Self {
        self.top = Some(top);
        self
    }

    pub fn with_skip(mut self, skip: i64) -> Self {
        self.skip = Some(skip);
        self
    }

    pub fn with_count(mut self, count: bool) -> Self {
        self.count = Some(count);
        self
    }

    pub fn with_search(mut self, search: SearchClause) -> Self {
        self.search = Some(search);
        self
    }

    pub fn with_compute(mut self, compute: ComputeClause) -> Self {
        self.compute = Some(compute);
        self
    }

    /// True when no option is set.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

use bizsearch_core::BusinessRecord;

/// Everything the renderer needs. Owned and mutated only by [`crate::SearchView`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewState {
    pub query: String,
    pub results: Vec<BusinessRecord>,
    pub loading: bool,
    pub searched: bool,
    pub using_fallback: bool,
}

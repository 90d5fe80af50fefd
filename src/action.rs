use crate::system::sort::SortMode;

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Quit,
    SortBy(SortMode),
    /// Ask the operator for a pid, then signal it.
    PromptKill,
    Kill(u32),
    None,
}

pub mod login;
pub mod overview;

/// Top-level screens reachable from the sidebar and header.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Page {
    Overview,
    Revenues,
    Expenses,
    Contracts,
    Bids,
    InfoRequests,
    Staff,
    Users,
    Login,
}

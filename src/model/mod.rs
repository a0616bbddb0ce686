pub use self::{
    capital::CapitalChange,
    overview::{ExecutionOverview, WalletOverview},
    view_state::ViewState,
};

mod capital;
mod overview;
mod view_state;

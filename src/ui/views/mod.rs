mod filter_bar;
mod run_list;

pub use filter_bar::FilterBarView;
pub use run_list::RunListView;

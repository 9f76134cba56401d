//! dramadesk-file - Filesystem-backed table store.

mod store;
mod table;

pub use store::TableStore;
pub use table::FileTable;

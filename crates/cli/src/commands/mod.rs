mod stubs;

pub use stubs::{add_stub, list_stubs, remove_stub};

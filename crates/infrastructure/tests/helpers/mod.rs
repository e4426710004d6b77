#![allow(dead_code)]
pub mod mock_exchanger;
pub mod mock_upstream;
pub mod queries;

pub use mock_exchanger::{MockExchanger, RecordingSink};
pub use mock_upstream::MockUpstream;
pub use queries::{a_query, answer_ip};

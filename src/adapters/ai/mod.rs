//! AI adapter module. Implements LlmPort for hosted and local models.
//!
//! Also hosts the backend-independent prompt builder and response parser.

pub mod hosted_adapter;
pub mod local_adapter;
pub mod mock_adapter;
pub mod prompt;
pub mod response_parser;

pub use hosted_adapter::HostedLlmAdapter;
pub use local_adapter::LocalLlmAdapter;
pub use mock_adapter::MockLlmAdapter;
pub use prompt::{build_prompt, truncate_chars};
pub use response_parser::{locate_json_array, parse_candidates};

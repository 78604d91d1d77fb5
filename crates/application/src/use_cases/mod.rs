pub mod relay;

pub use relay::{RelayDnsMessagesUseCase, RelayStats};

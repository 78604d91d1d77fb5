mod relay_dns_messages;

pub use relay_dns_messages::{RelayDnsMessagesUseCase, RelayStats};

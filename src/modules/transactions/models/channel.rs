use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Sales channel a transaction came through
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Channel {
    /// EvenPass ticket paid through the mobile-money gateway
    WebGateway,
    /// Bulk allocation settled off-platform (no gateway fee)
    OfflineBulk,
    /// DemDem Voyage booking
    Transport(TransportService),
}

/// Transport sub-channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TransportService {
    /// Ferry crossings
    Maritime,
    /// Intercity shared rides
    Intercity,
    /// Urban express lines
    Express,
    /// Subscription passes
    Pass,
}

impl Channel {
    pub const ALL: [Channel; 6] = [
        Channel::WebGateway,
        Channel::OfflineBulk,
        Channel::Transport(TransportService::Maritime),
        Channel::Transport(TransportService::Intercity),
        Channel::Transport(TransportService::Express),
        Channel::Transport(TransportService::Pass),
    ];

    /// Settled through the payment gateway, hence subject to gateway fees
    pub fn is_online(&self) -> bool {
        !matches!(self, Channel::OfflineBulk)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::WebGateway => "web_gateway",
            Channel::OfflineBulk => "offline_bulk",
            Channel::Transport(TransportService::Maritime) => "transport_maritime",
            Channel::Transport(TransportService::Intercity) => "transport_intercity",
            Channel::Transport(TransportService::Express) => "transport_express",
            Channel::Transport(TransportService::Pass) => "transport_pass",
        }
    }

    /// Reporting bucket of the financial summary
    pub fn category(&self) -> RevenueCategory {
        match self {
            Channel::WebGateway => RevenueCategory::TicketingOnline,
            Channel::OfflineBulk => RevenueCategory::TicketingBulk,
            Channel::Transport(TransportService::Maritime) => RevenueCategory::Maritime,
            Channel::Transport(TransportService::Intercity) => RevenueCategory::Intercity,
            Channel::Transport(TransportService::Express) => RevenueCategory::Express,
            Channel::Transport(TransportService::Pass) => RevenueCategory::Subscriptions,
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Channel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        Channel::ALL
            .into_iter()
            .find(|c| c.as_str() == normalized)
            .ok_or_else(|| format!("Invalid channel: {}", s))
    }
}

impl TryFrom<String> for Channel {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Channel> for String {
    fn from(channel: Channel) -> Self {
        channel.as_str().to_string()
    }
}

/// Category breakdown of the financial summary
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RevenueCategory {
    TicketingOnline,
    TicketingBulk,
    Maritime,
    Intercity,
    Express,
    Subscriptions,
}

impl RevenueCategory {
    pub fn is_transport(&self) -> bool {
        !matches!(
            self,
            RevenueCategory::TicketingOnline | RevenueCategory::TicketingBulk
        )
    }
}

use serde::Serialize;

/// What the page shows: the observable state of the minting session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UiStatus {
    pub wallet_connected: bool,
    /// True while any write is awaiting confirmation
    pub loading: bool,
    pub presale_started: bool,
    pub presale_ended: bool,
    pub is_owner: bool,
    /// Decimal count of minted tokens
    pub token_ids_minted: String,
}

impl Default for UiStatus {
    fn default() -> Self {
        Self {
            wallet_connected: false,
            loading: false,
            presale_started: false,
            presale_ended: false,
            is_owner: false,
            token_ids_minted: "0".to_string(),
        }
    }
}

/// The action the page offers for a given status, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    ConnectWallet,
    Loading,
    StartPresale,
    PresaleNotStarted,
    PresaleMint,
    PublicMint,
}

impl UiStatus {
    pub fn action(&self) -> Action {
        if !self.wallet_connected {
            Action::ConnectWallet
        } else if self.loading {
            Action::Loading
        } else if self.is_owner && !self.presale_started {
            Action::StartPresale
        } else if !self.presale_started {
            Action::PresaleNotStarted
        } else if !self.presale_ended {
            Action::PresaleMint
        } else {
            Action::PublicMint
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Action::ConnectWallet => "Connect your wallet",
            Action::Loading => "Loading...",
            Action::StartPresale => "Start Presale!",
            Action::PresaleNotStarted => "Presale hasn't started!",
            Action::PresaleMint => {
                "Presale has started!!! If your address is whitelisted, Mint a Crypto Dev 🥳"
            }
            Action::PublicMint => "Public Mint 🚀",
        };
        f.write_str(text)
    }
}

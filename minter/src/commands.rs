//! Single-shot command dispatch.

use crate::args::Command;
use crate::gate::WalletBackend;
use crate::operations::Minter;

/// Run one CLI command against the session.
///
/// Like the page, every command connects first, so the printed status shows
/// the wallet as connected. A failed connection ends the command. Operation
/// failures are logged by the operations and reflected in the status.
pub async fn run_once<W: WalletBackend>(minter: &Minter<W>, command: &Command) {
    if let Command::Status = command {
        let _ = minter.refresh().await;
        return;
    }
    if minter.connect_wallet().await.is_err() {
        return;
    }

    match command {
        Command::PresaleMint => {
            let _ = minter.presale_mint().await;
            let _ = minter.get_token_ids_minted().await;
        }
        Command::Mint => {
            let _ = minter.public_mint().await;
            let _ = minter.get_token_ids_minted().await;
        }
        Command::StartPresale => {
            let _ = minter.start_presale().await;
        }
        Command::PresaleStarted => {
            let _ = minter.check_if_presale_started().await;
        }
        Command::PresaleEnded => {
            let _ = minter.check_if_presale_ended().await;
        }
        Command::Owner => {
            let _ = minter.get_owner().await;
        }
        Command::TokenIds => {
            let _ = minter.get_token_ids_minted().await;
        }
        Command::Connect | Command::Status | Command::Watch { .. } => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::ConnectionGate;
    use crate::status::Action;
    use crate::testing::{FakeWallet, RecordingNotifier, SIGNER};
    use alloy::primitives::{U256, address};
    use chain_args::RequiredNetwork;
    use std::sync::Arc;

    fn minter(wallet: &FakeWallet) -> (Minter<FakeWallet>, Arc<RecordingNotifier>) {
        let notifier = Arc::new(RecordingNotifier::default());
        let gate = ConnectionGate::new(wallet.clone(), RequiredNetwork::default(), notifier.clone());
        let contract = address!("0xcdcdcdcdcdcdcdcdcdcdcdcdcdcdcdcdcdcdcdcd");
        (Minter::new(gate, contract, notifier.clone()), notifier)
    }

    #[tokio::test]
    async fn test_presale_mint_reports_connected_wallet() {
        let wallet = FakeWallet::on_chain(5);
        wallet.state_mut().presale_started = true;
        let (minter, _) = minter(&wallet);

        run_once(&minter, &Command::PresaleMint).await;

        let status = minter.status();
        assert!(status.wallet_connected);
        assert_ne!(status.action(), Action::ConnectWallet);
        assert_eq!(status.token_ids_minted, "1");
        assert_eq!(wallet.state().calls, vec!["presaleMint", "tokenIds"]);
    }

    #[tokio::test]
    async fn test_every_command_connects_first() {
        for command in [
            Command::Connect,
            Command::Mint,
            Command::StartPresale,
            Command::PresaleStarted,
            Command::PresaleEnded,
            Command::Owner,
            Command::TokenIds,
            Command::Status,
        ] {
            let wallet = FakeWallet::on_chain(5);
            wallet.state_mut().owner = SIGNER;
            let (minter, _) = minter(&wallet);

            run_once(&minter, &command).await;

            assert!(minter.status().wallet_connected, "{command:?}");
            assert_eq!(wallet.state().connects, 1, "{command:?}");
        }
    }

    #[tokio::test]
    async fn test_owner_command_offers_start_presale() {
        let wallet = FakeWallet::on_chain(5);
        wallet.state_mut().owner = SIGNER;
        let (minter, _) = minter(&wallet);

        run_once(&minter, &Command::Owner).await;

        assert_eq!(minter.status().action(), Action::StartPresale);
    }

    #[tokio::test]
    async fn test_wrong_network_runs_nothing() {
        let wallet = FakeWallet::on_chain(1);
        wallet.state_mut().token_ids = U256::from(4);
        let (minter, notifier) = minter(&wallet);

        run_once(&minter, &Command::Mint).await;

        assert!(wallet.state().calls.is_empty());
        assert!(wallet.state().payments.is_empty());
        assert!(!minter.status().wallet_connected);
        assert_eq!(notifier.messages(), vec!["Change the network to Goerli"]);
    }
}

use alloy::primitives::Address;
use chain_args::RequiredNetwork;
use term_table::row::Row;
use term_table::table_cell::{Alignment as CellAlignment, TableCell};
use term_table::{Table, TableStyle};

use crate::status::UiStatus;

fn yes_no(flag: bool) -> &'static str {
    if flag { "yes" } else { "no" }
}

fn field_row(label: &str, value: String) -> Row {
    Row::new(vec![
        TableCell::builder(label)
            .alignment(CellAlignment::Right)
            .build(),
        TableCell::builder(value)
            .alignment(CellAlignment::Left)
            .build(),
    ])
}

fn banner_row(text: String) -> Row {
    Row::new(vec![
        TableCell::builder(text)
            .col_span(2)
            .alignment(CellAlignment::Center)
            .build(),
    ])
}

/// Render the session status as a table, with the action the page would offer.
pub fn status_table(status: &UiStatus, network: &RequiredNetwork, contract: Address) -> String {
    let mut table = Table::new();
    table.style = TableStyle::extended();

    table.add_row(banner_row("Welcome to Crypto Devs!".to_string()));
    table.add_row(field_row("Network", network.to_string()));
    table.add_row(field_row("Contract", contract.to_string()));
    table.add_row(field_row("Wallet connected", yes_no(status.wallet_connected).to_string()));
    table.add_row(field_row("Presale started", yes_no(status.presale_started).to_string()));
    table.add_row(field_row("Presale ended", yes_no(status.presale_ended).to_string()));
    table.add_row(field_row("Owner", yes_no(status.is_owner).to_string()));
    table.add_row(field_row(
        "Minted",
        format!("{}/20 have been minted", status.token_ids_minted),
    ));
    table.add_row(banner_row(status.action().to_string()));

    table.render()
}
